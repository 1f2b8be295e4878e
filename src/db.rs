use async_trait::async_trait;
use chrono::NaiveDateTime;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use crate::catalog::ServiceSource;
use crate::error::AppError;
use crate::models::{Service, ServicePrice, ServiceWithPrices};
use crate::workflow::BookingStore;

pub async fn get_db_pool(database_url: &str) -> sqlx::Pool<sqlx::Postgres> {
    PgPoolOptions::new()
        .connect(database_url)
        .await
        .expect("Failed to connect to DB")
}

/// Catalog read: every service joined with its price options, services
/// ordered by id ascending, prices in backend order.
pub async fn fetch_services(pool: &PgPool) -> Result<Vec<ServiceWithPrices>, sqlx::Error> {
    let services = sqlx::query_as::<_, Service>(
        "SELECT id, service_name FROM m_services ORDER BY id",
    )
    .fetch_all(pool)
    .await?;

    let prices = sqlx::query_as::<_, ServicePrice>(
        "SELECT p.id, p.service_id, p.time, p.price
         FROM m_service_prices p
         JOIN m_services s ON p.service_id = s.id
         ORDER BY s.id, p.id",
    )
    .fetch_all(pool)
    .await?;

    let mut out: Vec<ServiceWithPrices> = services
        .into_iter()
        .map(|s| ServiceWithPrices {
            id: s.id,
            service_name: s.service_name,
            prices: Vec::new(),
        })
        .collect();
    for price in prices {
        if let Some(service) = out.iter_mut().find(|s| s.id == price.service_id) {
            service.prices.push(price);
        }
    }
    Ok(out)
}

/// Resolves the internal user id for a LINE user id, creating the profile
/// row on first contact. A single upsert keyed on the unique `user_line_id`
/// column, so two racing first bookings cannot produce duplicate rows.
pub async fn find_or_create_user(pool: &PgPool, line_user_id: &str) -> Result<i32, sqlx::Error> {
    let id: i32 = sqlx::query_scalar(
        "INSERT INTO user_profiles (user_line_id) VALUES ($1)
         ON CONFLICT (user_line_id) DO UPDATE SET user_line_id = EXCLUDED.user_line_id
         RETURNING id",
    )
    .bind(line_user_id)
    .fetch_one(pool)
    .await?;
    Ok(id)
}

pub async fn insert_reservation(
    pool: &PgPool,
    user_id: i32,
    service_price_id: i32,
    date_and_time: NaiveDateTime,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO reservations (user_id, service_price_id, date_and_time)
         VALUES ($1, $2, $3)",
    )
    .bind(user_id)
    .bind(service_price_id)
    .bind(date_and_time)
    .execute(pool)
    .await?;
    Ok(())
}

#[async_trait]
impl ServiceSource for PgPool {
    async fn load_services(&self) -> Result<Vec<ServiceWithPrices>, AppError> {
        Ok(fetch_services(self).await?)
    }
}

#[async_trait]
impl BookingStore for PgPool {
    async fn find_or_create_user(&self, line_user_id: &str) -> Result<i32, AppError> {
        Ok(find_or_create_user(self, line_user_id).await?)
    }

    async fn insert_reservation(
        &self,
        user_id: i32,
        service_price_id: i32,
        date_and_time: NaiveDateTime,
    ) -> Result<(), AppError> {
        Ok(insert_reservation(self, user_id, service_price_id, date_and_time).await?)
    }
}
