use chrono::{Duration, NaiveDateTime, Utc};
use rusqlite::Connection;

use crate::db::queries;
use crate::models::{
    Bike, BikeCategory, BookingSession, PendingCustomer, PendingDates, SessionData,
};
use crate::services::pricing::{self, Quote};

const SESSION_TTL_MINUTES: i64 = 30;

#[derive(Debug, thiserror::Error)]
pub enum BookingError {
    #[error("pickup or return date is not a valid date")]
    InvalidDates,
    #[error("selected bike is no longer available")]
    BikeMissing,
    #[error("bike is already booked for an overlapping period")]
    Conflict,
    #[error(transparent)]
    Db(#[from] anyhow::Error),
}

/// Load the visitor's session, or start a fresh one when the token is
/// absent or expired.
pub fn load_or_new(conn: &Connection, token: Option<&str>) -> anyhow::Result<BookingSession> {
    if let Some(token) = token {
        if let Some(session) = queries::get_booking_session(conn, token)? {
            return Ok(session);
        }
    }
    Ok(new_session())
}

fn new_session() -> BookingSession {
    let now = Utc::now().naive_utc();
    BookingSession {
        token: uuid::Uuid::new_v4().to_string(),
        data: SessionData::default(),
        last_activity: now,
        expires_at: now + Duration::minutes(SESSION_TTL_MINUTES),
    }
}

fn touch_and_save(conn: &Connection, session: &mut BookingSession) -> anyhow::Result<()> {
    let now = Utc::now().naive_utc();
    session.last_activity = now;
    session.expires_at = now + Duration::minutes(SESSION_TTL_MINUTES);
    queries::save_booking_session(conn, session)
}

pub fn submit_dates(
    conn: &Connection,
    session: &mut BookingSession,
    dates: PendingDates,
) -> anyhow::Result<()> {
    session.data.dates = Some(dates);
    touch_and_save(conn, session)
}

/// Narrowing by category re-displays the bike step with the filter kept.
pub fn select_category(
    conn: &Connection,
    session: &mut BookingSession,
    category_id: i64,
) -> anyhow::Result<()> {
    session.data.category_id = Some(category_id);
    touch_and_save(conn, session)
}

/// Choosing a bike finalizes the step and drops any category narrowing.
pub fn select_bike(
    conn: &Connection,
    session: &mut BookingSession,
    bike_id: i64,
) -> anyhow::Result<()> {
    session.data.bike_id = Some(bike_id);
    session.data.category_id = None;
    touch_and_save(conn, session)
}

pub fn submit_customer(
    conn: &Connection,
    session: &mut BookingSession,
    customer: PendingCustomer,
) -> anyhow::Result<()> {
    session.data.customer = Some(customer);
    touch_and_save(conn, session)
}

/// Drop all pending wizard state, returning the visitor to the dates step.
pub fn clear(conn: &Connection, token: &str) -> anyhow::Result<()> {
    queries::delete_booking_session(conn, token)
}

/// The fully priced checkout view for a session that has passed all gates.
pub struct CheckoutView {
    pub bike: Bike,
    pub category: BikeCategory,
    pub dates: PendingDates,
    pub customer: PendingCustomer,
    pub start_date: NaiveDateTime,
    pub end_date: NaiveDateTime,
    pub quote: Quote,
}

pub fn build_quote(conn: &Connection, session: &BookingSession) -> Result<CheckoutView, BookingError> {
    let dates = session
        .data
        .dates
        .clone()
        .ok_or_else(|| BookingError::Db(anyhow::anyhow!("dates missing from session")))?;
    let bike_id = session
        .data
        .bike_id
        .ok_or_else(|| BookingError::Db(anyhow::anyhow!("bike missing from session")))?;
    let customer = session
        .data
        .customer
        .clone()
        .ok_or_else(|| BookingError::Db(anyhow::anyhow!("customer missing from session")))?;

    let bike = queries::get_bike(conn, bike_id)?.ok_or(BookingError::BikeMissing)?;
    let category = queries::get_category(conn, bike.category_id)?
        .ok_or_else(|| BookingError::Db(anyhow::anyhow!("bike has no category")))?;

    let pickup = pricing::parse_form_date(&dates.pickup_date).ok_or(BookingError::InvalidDates)?;
    let ret = pricing::parse_form_date(&dates.return_date).ok_or(BookingError::InvalidDates)?;

    let quote = pricing::quote(&category, pickup, ret);
    let start_date = pricing::combine_date_time(pickup, &dates.pickup_time);
    let end_date = pricing::combine_date_time(ret, &dates.return_time);

    Ok(CheckoutView {
        bike,
        category,
        dates,
        customer,
        start_date,
        end_date,
        quote,
    })
}

#[derive(Debug)]
pub struct ConfirmedBooking {
    pub rental_id: i64,
    pub customer_id: i64,
    pub rental_days: i64,
    pub total_price: f64,
}

/// Confirm the booking: customer upsert + rental insert, atomically. The
/// session survives a failure so the visitor can retry, and is dropped on
/// success.
pub fn confirm(
    conn: &mut Connection,
    session: &BookingSession,
    delivery_address: Option<&str>,
) -> Result<ConfirmedBooking, BookingError> {
    let view = build_quote(conn, session)?;

    let record = queries::CheckoutRecord {
        citizen_id: &view.customer.citizen_id,
        first_name: &view.customer.first_name,
        last_name: &view.customer.last_name,
        phone: &view.customer.phone,
        email: &view.dates.email,
        line_id: view.customer.line_id.as_deref(),
        bike_id: view.bike.id,
        start_date: view.start_date,
        end_date: view.end_date,
        total_price: view.quote.total_price,
        delivery_address,
    };

    let outcome = queries::confirm_checkout(conn, &record).map_err(|e| match e {
        queries::CheckoutError::Conflict => BookingError::Conflict,
        queries::CheckoutError::Db(e) => BookingError::Db(e.into()),
    })?;

    queries::delete_booking_session(conn, &session.token)?;

    tracing::info!(
        rental_id = outcome.rental_id,
        customer_id = outcome.customer_id,
        bike_id = view.bike.id,
        total_price = view.quote.total_price,
        "booking confirmed"
    );

    Ok(ConfirmedBooking {
        rental_id: outcome.rental_id,
        customer_id: outcome.customer_id,
        rental_days: view.quote.rental_days,
        total_price: view.quote.total_price,
    })
}
