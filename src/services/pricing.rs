use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use crate::models::BikeCategory;

#[derive(Debug, Clone, Copy)]
pub struct Quote {
    pub rental_days: i64,
    pub rental_price: f64,
    pub deposit_amount: f64,
    pub total_price: f64,
}

/// Both endpoints count as rental days, and same-day rentals still bill
/// one day.
pub fn rental_days(pickup: NaiveDate, ret: NaiveDate) -> i64 {
    ((ret - pickup).num_days() + 1).max(1)
}

pub fn quote(category: &BikeCategory, pickup: NaiveDate, ret: NaiveDate) -> Quote {
    let days = rental_days(pickup, ret);
    let rental_price = category.price_daily * days as f64;
    Quote {
        rental_days: days,
        rental_price,
        deposit_amount: category.deposit_amount,
        total_price: rental_price + category.deposit_amount,
    }
}

/// Dates arrive from the form as free-form strings; they are only parsed
/// here, at pricing time.
pub fn parse_form_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok()
}

/// Missing or malformed times fall back to midnight rather than failing
/// the whole checkout.
pub fn combine_date_time(date: NaiveDate, time: &str) -> NaiveDateTime {
    let time = NaiveTime::parse_from_str(time.trim(), "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(time.trim(), "%H:%M:%S"))
        .unwrap_or(NaiveTime::MIN);
    date.and_time(time)
}
