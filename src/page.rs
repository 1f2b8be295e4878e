use crate::form::{self, BookingPayload};
use crate::models::SelectedService;
use crate::workflow::{submit_booking, BookingStore, SUBMIT_FALLBACK_ERROR};

/// Explicit page-level state: the single active selection, the in-flight
/// flag and the last submission outcome. Owned by the request handler, never
/// ambient.
#[derive(Debug, Default)]
pub struct ReservationPage {
    pub selection: Option<SelectedService>,
    pub submitting: bool,
    pub submit_error: Option<String>,
    pub submit_success: bool,
}

impl ReservationPage {
    pub fn new() -> Self {
        ReservationPage::default()
    }

    /// Picking a price option replaces the selection and clears any outcome
    /// of a previous submission.
    pub fn select_service(&mut self, selected: SelectedService) {
        self.selection = Some(selected);
        self.submit_error = None;
        self.submit_success = false;
    }

    /// Placeholder shown instead of the form while nothing is selected.
    pub fn form_hint(&self) -> Option<&'static str> {
        if self.selection.is_none() {
            Some(form::NO_SERVICE_SELECTED)
        } else {
            None
        }
    }

    pub fn submit_label(&self) -> &'static str {
        if self.submitting {
            "予約中..."
        } else {
            "予約を送信"
        }
    }

    /// The submission workflow. A missing selection or identity makes this a
    /// no-op. Success clears the selection for the next booking; failure
    /// surfaces the message and leaves the selection untouched.
    pub async fn submit<S: BookingStore + Sync>(
        &mut self,
        store: &S,
        line_user_id: Option<&str>,
        payload: &BookingPayload,
    ) {
        let Some(selection) = self.selection.clone() else {
            return;
        };
        let Some(line_user_id) = line_user_id else {
            return;
        };

        self.submitting = true;
        self.submit_error = None;
        match submit_booking(store, line_user_id, selection.price_id, payload).await {
            Ok(()) => {
                self.submit_success = true;
                self.selection = None;
            }
            Err(e) => {
                error!("Booking error: {e}");
                let message = e.user_message();
                self.submit_error = Some(if message.is_empty() {
                    SUBMIT_FALLBACK_ERROR.to_string()
                } else {
                    message
                });
            }
        }
        self.submitting = false;
    }
}
