use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct Service {
    pub id: i32,
    pub service_name: String,
}

/// A purchasable duration/cost option of a service. `time` is the duration
/// in minutes; a flat-fee single session has no duration.
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct ServicePrice {
    pub id: i32,
    pub service_id: i32,
    pub time: Option<i32>,
    pub price: i32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ServiceWithPrices {
    pub id: i32,
    pub service_name: String,
    pub prices: Vec<ServicePrice>,
}

#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct UserProfile {
    pub id: i32,
    pub user_line_id: String,
}

#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct Reservation {
    pub id: i32,
    pub user_id: i32,
    pub service_price_id: i32,
    pub date_and_time: NaiveDateTime,
}

/// The single active selection reported by the service cards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectedService {
    pub service_id: i32,
    pub price_id: i32,
    pub service_name: String,
    pub time: Option<i32>,
    pub price: i32,
}
