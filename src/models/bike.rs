use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BikeCategory {
    pub id: i64,
    pub name: String,
    pub price_daily: f64,
    pub price_weekly: f64,
    pub price_monthly: f64,
    pub deposit_amount: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bike {
    pub id: i64,
    pub license_plate: String,
    pub model_name: String,
    pub color: String,
    pub engine_size: String,
    pub image_url: Option<String>,
    pub description: Option<String>,
    pub status: BikeStatus,
    pub category_id: i64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub enum BikeStatus {
    Available,
    Rented,
    Fix,
}

impl BikeStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BikeStatus::Available => "Available",
            BikeStatus::Rented => "Rented",
            BikeStatus::Fix => "Fix",
        }
    }

    pub fn parse(s: &str) -> Self {
        Self::try_parse(s).unwrap_or(BikeStatus::Available)
    }

    pub fn try_parse(s: &str) -> Option<Self> {
        match s {
            "Available" => Some(BikeStatus::Available),
            "Rented" => Some(BikeStatus::Rented),
            "Fix" => Some(BikeStatus::Fix),
            _ => None,
        }
    }
}
