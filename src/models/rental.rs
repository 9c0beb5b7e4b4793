use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Rental {
    pub id: i64,
    pub customer_id: i64,
    pub bike_id: i64,
    pub start_date: NaiveDateTime,
    pub end_date: NaiveDateTime,
    pub actual_return_date: Option<NaiveDateTime>,
    pub total_price: f64,
    pub is_delivery: bool,
    pub delivery_address: Option<String>,
    pub payment_status: PaymentStatus,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub enum PaymentStatus {
    Active,
    Done,
    Cancelled,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Active => "Active",
            PaymentStatus::Done => "Done",
            PaymentStatus::Cancelled => "Cancelled",
        }
    }

    pub fn parse(s: &str) -> Self {
        match s {
            "Done" => PaymentStatus::Done,
            "Cancelled" => PaymentStatus::Cancelled,
            _ => PaymentStatus::Active,
        }
    }
}
