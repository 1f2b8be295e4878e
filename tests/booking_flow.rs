use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use salon_booking::error::AppError;
use salon_booking::form::BookingForm;
use salon_booking::models::{Reservation, SelectedService, UserProfile};
use salon_booking::page::ReservationPage;
use salon_booking::workflow::BookingStore;

/// In-memory stand-in for the reservation backend. `find_or_create_user`
/// mirrors the upsert: one row per LINE user id, ever.
#[derive(Default)]
struct MemoryStore {
    users: Mutex<Vec<UserProfile>>,
    reservations: Mutex<Vec<Reservation>>,
    fail_reservation_insert: bool,
}

impl MemoryStore {
    fn failing_on_insert() -> Self {
        MemoryStore {
            fail_reservation_insert: true,
            ..MemoryStore::default()
        }
    }

    fn user_count(&self) -> usize {
        self.users.lock().unwrap().len()
    }

    fn reservations(&self) -> Vec<Reservation> {
        self.reservations.lock().unwrap().clone()
    }
}

#[async_trait]
impl BookingStore for MemoryStore {
    async fn find_or_create_user(&self, line_user_id: &str) -> Result<i32, AppError> {
        let mut users = self.users.lock().unwrap();
        if let Some(user) = users.iter().find(|u| u.user_line_id == line_user_id) {
            return Ok(user.id);
        }
        let id = users.len() as i32 + 1;
        users.push(UserProfile {
            id,
            user_line_id: line_user_id.to_string(),
        });
        Ok(id)
    }

    async fn insert_reservation(
        &self,
        user_id: i32,
        service_price_id: i32,
        date_and_time: NaiveDateTime,
    ) -> Result<(), AppError> {
        if self.fail_reservation_insert {
            return Err(AppError::Database(sqlx::Error::Protocol(
                "reservations insert failed".to_string(),
            )));
        }
        let mut reservations = self.reservations.lock().unwrap();
        let id = reservations.len() as i32 + 1;
        reservations.push(Reservation {
            id,
            user_id,
            service_price_id,
            date_and_time,
        });
        Ok(())
    }
}

fn selection() -> SelectedService {
    SelectedService {
        service_id: 1,
        price_id: 11,
        service_name: "アクセスバース".to_string(),
        time: Some(60),
        price: 8000,
    }
}

fn filled_form() -> BookingForm {
    let mut form = BookingForm::new();
    form.set_date("2025-01-10");
    form.set_time("14:30");
    form.set_customer_name("山田太郎");
    form
}

fn payload() -> salon_booking::form::BookingPayload {
    filled_form()
        .try_submit_as_of(NaiveDate::from_ymd_opt(2025, 1, 1).unwrap())
        .expect("form should validate")
}

#[tokio::test]
async fn first_booking_creates_one_profile_and_one_reservation() {
    let store = MemoryStore::default();
    let mut page = ReservationPage::new();
    page.select_service(selection());
    page.submit(&store, Some("U-first"), &payload()).await;

    assert!(page.submit_success);
    assert_eq!(page.submit_error, None);
    assert_eq!(store.user_count(), 1);
    let reservations = store.reservations();
    assert_eq!(reservations.len(), 1);
    assert_eq!(reservations[0].user_id, 1);
    assert_eq!(reservations[0].service_price_id, 11);
    assert_eq!(
        reservations[0].date_and_time,
        NaiveDate::from_ymd_opt(2025, 1, 10)
            .unwrap()
            .and_hms_opt(14, 30, 0)
            .unwrap()
    );
}

#[tokio::test]
async fn repeat_booking_reuses_existing_profile() {
    let store = MemoryStore::default();

    let mut first = ReservationPage::new();
    first.select_service(selection());
    first.submit(&store, Some("U-repeat"), &payload()).await;
    assert!(first.submit_success);

    let mut second = ReservationPage::new();
    second.select_service(selection());
    second.submit(&store, Some("U-repeat"), &payload()).await;
    assert!(second.submit_success);

    assert_eq!(store.user_count(), 1);
    let reservations = store.reservations();
    assert_eq!(reservations.len(), 2);
    assert!(reservations.iter().all(|r| r.user_id == 1));
}

#[tokio::test]
async fn success_clears_selection_for_the_next_booking() {
    let store = MemoryStore::default();
    let mut page = ReservationPage::new();
    page.select_service(selection());
    page.submit(&store, Some("U-ok"), &payload()).await;

    assert!(page.submit_success);
    assert_eq!(page.selection, None);
    assert!(!page.submitting);
}

#[tokio::test]
async fn reservation_insert_failure_keeps_selection_and_surfaces_error() {
    let store = MemoryStore::failing_on_insert();
    let mut page = ReservationPage::new();
    page.select_service(selection());
    page.submit(&store, Some("U-fail"), &payload()).await;

    assert!(!page.submit_success);
    let message = page.submit_error.as_deref().expect("error surfaced");
    assert!(message.contains("reservations insert failed"));
    assert_eq!(page.selection, Some(selection()));
    // The profile row created in step 1 persists; it is reused next time.
    assert_eq!(store.user_count(), 1);
    assert!(store.reservations().is_empty());
}

#[tokio::test]
async fn failed_attempt_can_be_resubmitted_against_same_profile() {
    let failing = MemoryStore::failing_on_insert();
    let mut page = ReservationPage::new();
    page.select_service(selection());
    page.submit(&failing, Some("U-retry"), &payload()).await;
    assert!(!page.submit_success);

    // The user resubmits; the selection survived the failure.
    let working = MemoryStore::default();
    page.submit(&working, Some("U-retry"), &payload()).await;
    assert!(page.submit_success);
    assert_eq!(working.reservations().len(), 1);
}

#[tokio::test]
async fn submit_without_selection_is_a_noop() {
    let store = MemoryStore::default();
    let mut page = ReservationPage::new();
    page.submit(&store, Some("U-nothing"), &payload()).await;

    assert!(!page.submit_success);
    assert_eq!(page.submit_error, None);
    assert_eq!(store.user_count(), 0);
    assert!(store.reservations().is_empty());
}

#[tokio::test]
async fn submit_without_identity_is_a_noop() {
    let store = MemoryStore::default();
    let mut page = ReservationPage::new();
    page.select_service(selection());
    page.submit(&store, None, &payload()).await;

    assert!(!page.submit_success);
    assert_eq!(page.submit_error, None);
    assert_eq!(page.selection, Some(selection()));
    assert_eq!(store.user_count(), 0);
}

#[tokio::test]
async fn invalid_form_never_reaches_the_store() {
    let store = MemoryStore::default();
    let mut form = BookingForm::new();
    let today = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
    assert!(form.try_submit_as_of(today).is_none());
    assert_eq!(form.errors().count(), 3);
    assert_eq!(store.user_count(), 0);
}
