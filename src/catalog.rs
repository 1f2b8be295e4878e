use async_trait::async_trait;

use crate::error::AppError;
use crate::models::ServiceWithPrices;

pub const CATALOG_FETCH_FAILED: &str = "サービスの取得に失敗しました";

#[async_trait]
pub trait ServiceSource {
    async fn load_services(&self) -> Result<Vec<ServiceWithPrices>, AppError>;
}

#[derive(Debug)]
pub enum CatalogState {
    Loading,
    Error(String),
    Ready(Vec<ServiceWithPrices>),
}

/// Fetches the bookable services and their price options and keeps the
/// loading/error/ready state the page renders from. A failed read never
/// propagates; it lands in `CatalogState::Error` as a displayable message.
pub struct CatalogLoader<S> {
    source: S,
    state: CatalogState,
}

impl<S: ServiceSource + Sync> CatalogLoader<S> {
    pub fn new(source: S) -> Self {
        CatalogLoader {
            source,
            state: CatalogState::Loading,
        }
    }

    pub fn state(&self) -> &CatalogState {
        &self.state
    }

    pub async fn load(&mut self) {
        match self.source.load_services().await {
            Ok(services) => self.state = CatalogState::Ready(services),
            Err(e) => {
                error!("Error fetching services: {e}");
                let message = e.user_message();
                self.state = CatalogState::Error(if message.is_empty() {
                    CATALOG_FETCH_FAILED.to_string()
                } else {
                    message
                });
            }
        }
    }

    /// Re-runs the same query, resetting to `Loading` first.
    pub async fn refetch(&mut self) {
        self.state = CatalogState::Loading;
        self.load().await;
    }
}
