use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{json, Value};
use sqlx::PgPool;

use crate::catalog::{CatalogLoader, CatalogState, CATALOG_FETCH_FAILED};
use crate::config::Config;
use crate::form::BookingForm;
use crate::identity::{Bootstrap, LineAuth, LOGIN_REQUIRED_MESSAGE};
use crate::models::SelectedService;
use crate::page::ReservationPage;
use crate::selection::{build_cards, EMPTY_CATALOG_MESSAGE};
use crate::workflow::SUBMIT_FALLBACK_ERROR;

pub struct AppState {
    pub config: Config,
    pub pool: PgPool,
    pub line: LineAuth,
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/healthz", get(health))
        .route("/api/services", get(list_services))
        .route("/api/reservations", post(create_reservation))
        .with_state(state)
}

async fn health() -> &'static str {
    "ok"
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ServicesQuery {
    selected_price_id: Option<i32>,
}

/// Catalog read for the webview: the service cards with the add-on rule and
/// the current selection already applied. Refetch is the client calling this
/// route again.
async fn list_services(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ServicesQuery>,
) -> (StatusCode, Json<Value>) {
    let mut loader = CatalogLoader::new(state.pool.clone());
    loader.load().await;
    match loader.state() {
        CatalogState::Ready(services) => {
            let cards = build_cards(services, query.selected_price_id);
            let body = if cards.is_empty() {
                json!({ "services": cards, "emptyMessage": EMPTY_CATALOG_MESSAGE })
            } else {
                json!({ "services": cards })
            };
            (StatusCode::OK, Json(body))
        }
        CatalogState::Error(message) => {
            (StatusCode::BAD_GATEWAY, Json(json!({ "error": message })))
        }
        CatalogState::Loading => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": CATALOG_FETCH_FAILED })),
        ),
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ReservationRequest {
    id_token: Option<String>,
    access_token: Option<String>,
    selection: SelectedService,
    #[serde(default)]
    date: String,
    #[serde(default)]
    time: String,
    #[serde(default)]
    customer_name: String,
    #[serde(default)]
    customer_phone: String,
    #[serde(default)]
    customer_email: String,
    #[serde(default)]
    notes: String,
}

async fn create_reservation(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ReservationRequest>,
) -> (StatusCode, Json<Value>) {
    let bootstrap = state
        .line
        .bootstrap(
            request.id_token.as_deref(),
            request.access_token.as_deref(),
            state.config.is_production(),
        )
        .await;
    let identity = match bootstrap {
        Bootstrap::Ready(identity) => identity,
        Bootstrap::LoginRequired => {
            return (
                StatusCode::UNAUTHORIZED,
                Json(json!({ "error": LOGIN_REQUIRED_MESSAGE, "loginRequired": true })),
            );
        }
        Bootstrap::Failed(message) => {
            return (StatusCode::UNAUTHORIZED, Json(json!({ "error": message })));
        }
    };

    let mut form = BookingForm::new();
    form.set_date(&request.date);
    form.set_time(&request.time);
    form.set_customer_name(&request.customer_name);
    form.set_customer_phone(&request.customer_phone);
    form.set_customer_email(&request.customer_email);
    form.set_notes(&request.notes);
    let Some(payload) = form.try_submit() else {
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({ "errors": form.errors() })),
        );
    };

    let mut page = ReservationPage::new();
    page.select_service(request.selection);
    page.submit(&state.pool, Some(&identity.line_user_id), &payload)
        .await;

    if page.submit_success {
        (
            StatusCode::OK,
            Json(json!({ "success": true, "displayName": identity.display_name })),
        )
    } else {
        let message = page
            .submit_error
            .unwrap_or_else(|| SUBMIT_FALLBACK_ERROR.to_string());
        (StatusCode::BAD_GATEWAY, Json(json!({ "error": message })))
    }
}
