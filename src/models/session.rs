use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// The four wizard steps, in order. Each step is gated on the previous
/// step's data being present in the session.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum BookingStep {
    Dates,
    BikeSelect,
    CustomerInfo,
    Checkout,
}

impl BookingStep {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStep::Dates => "dates",
            BookingStep::BikeSelect => "bike_select",
            BookingStep::CustomerInfo => "customer_info",
            BookingStep::Checkout => "checkout",
        }
    }

    pub fn path(&self) -> &'static str {
        match self {
            BookingStep::Dates => "/book/dates",
            BookingStep::BikeSelect => "/book/bikes",
            BookingStep::CustomerInfo => "/book/customer",
            BookingStep::Checkout => "/book/checkout",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PendingDates {
    pub email: String,
    pub pickup_date: String,
    pub pickup_time: String,
    pub return_date: String,
    pub return_time: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PendingCustomer {
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub citizen_id: String,
    pub line_id: Option<String>,
}

/// Everything the wizard has collected so far, serialized as one JSON
/// blob in the booking_sessions table.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionData {
    pub dates: Option<PendingDates>,
    pub category_id: Option<i64>,
    pub bike_id: Option<i64>,
    pub customer: Option<PendingCustomer>,
}

#[derive(Debug, Clone)]
pub struct BookingSession {
    pub token: String,
    pub data: SessionData,
    pub last_activity: NaiveDateTime,
    pub expires_at: NaiveDateTime,
}

impl BookingSession {
    /// The earliest step whose prerequisites are not yet met. A visitor
    /// asking for anything later gets redirected here.
    pub fn earliest_unmet_step(&self) -> BookingStep {
        if self.data.dates.is_none() {
            BookingStep::Dates
        } else if self.data.bike_id.is_none() {
            BookingStep::BikeSelect
        } else if self.data.customer.is_none() {
            BookingStep::CustomerInfo
        } else {
            BookingStep::Checkout
        }
    }

    /// True when all prerequisites of `step` are present.
    pub fn can_enter(&self, step: BookingStep) -> bool {
        match step {
            BookingStep::Dates => true,
            BookingStep::BikeSelect => self.data.dates.is_some(),
            BookingStep::CustomerInfo => self.data.dates.is_some() && self.data.bike_id.is_some(),
            BookingStep::Checkout => {
                self.data.dates.is_some()
                    && self.data.bike_id.is_some()
                    && self.data.customer.is_some()
            }
        }
    }
}
