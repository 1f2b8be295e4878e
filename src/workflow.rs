use async_trait::async_trait;
use chrono::NaiveDateTime;

use crate::error::AppError;
use crate::form::BookingPayload;

pub const SUBMIT_FALLBACK_ERROR: &str = "予約の送信に失敗しました。再度お試しください。";

/// Persistence seam of the submission workflow. The Postgres implementation
/// lives in `db`; tests use an in-memory store.
#[async_trait]
pub trait BookingStore {
    async fn find_or_create_user(&self, line_user_id: &str) -> Result<i32, AppError>;

    async fn insert_reservation(
        &self,
        user_id: i32,
        service_price_id: i32,
        date_and_time: NaiveDateTime,
    ) -> Result<(), AppError>;
}

/// Runs the two persistence steps in order: resolve-or-create the user
/// profile, then insert the reservation referencing it. Not transactional;
/// a profile created before a failed insert simply gets reused on the next
/// attempt.
pub async fn submit_booking<S: BookingStore + Sync>(
    store: &S,
    line_user_id: &str,
    service_price_id: i32,
    payload: &BookingPayload,
) -> Result<(), AppError> {
    let date_and_time = NaiveDateTime::parse_from_str(&payload.date_time, "%Y-%m-%dT%H:%M:%S")
        .map_err(|e| AppError::Invalid(format!("bad date-time {:?}: {e}", payload.date_time)))?;

    let user_id = store.find_or_create_user(line_user_id).await?;
    info!(
        "Creating reservation for user {user_id} ({line_user_id}), price {service_price_id} at {date_and_time}"
    );
    store
        .insert_reservation(user_id, service_price_id, date_and_time)
        .await
}

#[cfg(test)]
mod tests {
    use super::*;

    struct NoopStore;

    #[async_trait]
    impl BookingStore for NoopStore {
        async fn find_or_create_user(&self, _line_user_id: &str) -> Result<i32, AppError> {
            Ok(1)
        }

        async fn insert_reservation(
            &self,
            _user_id: i32,
            _service_price_id: i32,
            _date_and_time: NaiveDateTime,
        ) -> Result<(), AppError> {
            Ok(())
        }
    }

    fn payload(date_time: &str) -> BookingPayload {
        BookingPayload {
            date_time: date_time.to_string(),
            customer_name: "山田太郎".to_string(),
            customer_phone: None,
            customer_email: None,
            notes: None,
        }
    }

    #[tokio::test]
    async fn rejects_malformed_date_time() {
        let result = submit_booking(&NoopStore, "U1", 11, &payload("tomorrowish")).await;
        assert!(matches!(result, Err(AppError::Invalid(_))));
    }

    #[tokio::test]
    async fn accepts_combined_form_output() {
        let result = submit_booking(&NoopStore, "U1", 11, &payload("2025-01-10T14:30:00")).await;
        assert!(result.is_ok());
    }
}
