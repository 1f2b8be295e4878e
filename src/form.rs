use chrono::{Local, NaiveDate};
use serde::Serialize;

pub const NO_SERVICE_SELECTED: &str = "サービスを選択してください";
pub const DATE_REQUIRED: &str = "予約日を選択してください";
pub const DATE_IN_PAST: &str = "過去の日付は選択できません";
pub const TIME_REQUIRED: &str = "予約時間を選択してください";
pub const NAME_REQUIRED: &str = "お名前を入力してください";

/// Half-hour booking grid, 09:00 through 17:30 inclusive.
pub const TIME_SLOTS: [&str; 18] = [
    "09:00", "09:30", "10:00", "10:30", "11:00", "11:30", "12:00", "12:30", "13:00", "13:30",
    "14:00", "14:30", "15:00", "15:30", "16:00", "16:30", "17:00", "17:30",
];

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormErrors {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_name: Option<String>,
}

impl FormErrors {
    pub fn is_empty(&self) -> bool {
        self.count() == 0
    }

    pub fn count(&self) -> usize {
        [&self.date, &self.time, &self.customer_name]
            .iter()
            .filter(|e| e.is_some())
            .count()
    }
}

/// What the form hands to the submission workflow once validation passes.
/// Empty optional fields are normalized to `None`, never empty strings.
#[derive(Debug, Clone, PartialEq)]
pub struct BookingPayload {
    /// Combined `YYYY-MM-DDTHH:MM:00`, naive local salon time.
    pub date_time: String,
    pub customer_name: String,
    pub customer_phone: Option<String>,
    pub customer_email: Option<String>,
    pub notes: Option<String>,
}

/// Draft state of the booking form. Editing a field clears that field's
/// error; validation runs only on a submit attempt.
#[derive(Debug, Clone, Default)]
pub struct BookingForm {
    pub date: String,
    pub time: String,
    pub customer_name: String,
    pub customer_phone: String,
    pub customer_email: String,
    pub notes: String,
    errors: FormErrors,
}

impl BookingForm {
    pub fn new() -> Self {
        BookingForm::default()
    }

    pub fn errors(&self) -> &FormErrors {
        &self.errors
    }

    pub fn set_date(&mut self, value: &str) {
        self.date = value.to_string();
        self.errors.date = None;
    }

    pub fn set_time(&mut self, value: &str) {
        self.time = value.to_string();
        self.errors.time = None;
    }

    pub fn set_customer_name(&mut self, value: &str) {
        self.customer_name = value.to_string();
        self.errors.customer_name = None;
    }

    pub fn set_customer_phone(&mut self, value: &str) {
        self.customer_phone = value.to_string();
    }

    pub fn set_customer_email(&mut self, value: &str) {
        self.customer_email = value.to_string();
    }

    pub fn set_notes(&mut self, value: &str) {
        self.notes = value.to_string();
    }

    /// Validates and assembles the submission payload. On failure the
    /// field-keyed errors are stored and `None` is returned.
    pub fn try_submit(&mut self) -> Option<BookingPayload> {
        self.try_submit_as_of(Local::now().date_naive())
    }

    pub fn try_submit_as_of(&mut self, today: NaiveDate) -> Option<BookingPayload> {
        if !self.validate_as_of(today) {
            return None;
        }
        Some(BookingPayload {
            date_time: format!("{}T{}:00", self.date, self.time),
            customer_name: self.customer_name.trim().to_string(),
            customer_phone: optional(&self.customer_phone),
            customer_email: optional(&self.customer_email),
            notes: optional(&self.notes),
        })
    }

    fn validate_as_of(&mut self, today: NaiveDate) -> bool {
        let mut errors = FormErrors::default();
        if self.date.is_empty() {
            errors.date = Some(DATE_REQUIRED.to_string());
        } else {
            match NaiveDate::parse_from_str(&self.date, "%Y-%m-%d") {
                Ok(date) if date < today => errors.date = Some(DATE_IN_PAST.to_string()),
                Ok(_) => {}
                Err(_) => errors.date = Some(DATE_REQUIRED.to_string()),
            }
        }
        if self.time.is_empty() || !TIME_SLOTS.contains(&self.time.as_str()) {
            errors.time = Some(TIME_REQUIRED.to_string());
        }
        if self.customer_name.trim().is_empty() {
            errors.customer_name = Some(NAME_REQUIRED.to_string());
        }
        let valid = errors.is_empty();
        self.errors = errors;
        valid
    }
}

fn optional(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
