use std::sync::Arc;

use axum::extract::State;
use axum::http::HeaderMap;
use axum::response::{IntoResponse, Redirect, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::db::queries;
use crate::errors::AppError;
use crate::models::{BikeCategory, BookingSession, BookingStep, PendingCustomer, PendingDates};
use crate::services::wizard;
use crate::state::AppState;

/// The wizard is keyed by an opaque token the client carries in this
/// header. The dates step mints one when it is missing.
fn session_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get("x-session-token")
        .and_then(|v| v.to_str().ok())
        .filter(|s| !s.is_empty())
}

/// A step with unmet prerequisites redirects to the earliest unmet step,
/// never an error page.
fn gate(session: &BookingSession, step: BookingStep) -> Result<(), Response> {
    if session.can_enter(step) {
        Ok(())
    } else {
        Err(Redirect::to(session.earliest_unmet_step().path()).into_response())
    }
}

// GET /book/dates
#[derive(Serialize)]
pub struct DatesView {
    session: Option<String>,
    dates: Option<PendingDates>,
}

pub async fn dates_page(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<DatesView>, AppError> {
    let db = state.db.lock().unwrap();
    let session = match session_token(&headers) {
        Some(token) => queries::get_booking_session(&db, token)?,
        None => None,
    };

    Ok(Json(DatesView {
        session: session.as_ref().map(|s| s.token.clone()),
        dates: session.and_then(|s| s.data.dates),
    }))
}

// POST /book/dates
#[derive(Deserialize)]
pub struct DatesForm {
    pub email: String,
    pub pickup_date: String,
    pub pickup_time: String,
    pub return_date: String,
    pub return_time: String,
}

pub async fn submit_dates(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(form): Json<DatesForm>,
) -> Result<Json<serde_json::Value>, AppError> {
    let db = state.db.lock().unwrap();
    let _ = queries::expire_old_booking_sessions(&db);

    let mut session = wizard::load_or_new(&db, session_token(&headers))?;
    wizard::submit_dates(
        &db,
        &mut session,
        PendingDates {
            email: form.email,
            pickup_date: form.pickup_date,
            pickup_time: form.pickup_time,
            return_date: form.return_date,
            return_time: form.return_time,
        },
    )?;

    Ok(Json(serde_json::json!({
        "ok": true,
        "session": session.token,
        "next": BookingStep::BikeSelect.path(),
    })))
}

// GET /book/bikes
#[derive(Serialize)]
pub struct BikesView {
    session: String,
    category_id: Option<i64>,
    bikes: Vec<queries::BikeListing>,
    categories: Vec<BikeCategory>,
}

pub async fn bikes_page(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let db = state.db.lock().unwrap();
    let session = wizard::load_or_new(&db, session_token(&headers))?;
    if let Err(redirect) = gate(&session, BookingStep::BikeSelect) {
        return Ok(redirect);
    }

    let bikes = queries::list_available_bikes(&db, session.data.category_id)?;
    let categories = queries::list_categories(&db)?;

    Ok(Json(BikesView {
        session: session.token,
        category_id: session.data.category_id,
        bikes,
        categories,
    })
    .into_response())
}

// POST /book/bikes
#[derive(Deserialize)]
pub struct BikeSelectForm {
    pub bike_id: Option<i64>,
    pub category_id: Option<i64>,
}

pub async fn choose_bike(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(form): Json<BikeSelectForm>,
) -> Result<Response, AppError> {
    let db = state.db.lock().unwrap();
    let mut session = wizard::load_or_new(&db, session_token(&headers))?;
    if let Err(redirect) = gate(&session, BookingStep::BikeSelect) {
        return Ok(redirect);
    }

    if let Some(bike_id) = form.bike_id {
        let bike = queries::get_bike(&db, bike_id)?
            .ok_or_else(|| AppError::NotFound(format!("bike {bike_id}")))?;
        wizard::select_bike(&db, &mut session, bike.id)?;
        Ok(Json(serde_json::json!({
            "ok": true,
            "session": session.token,
            "next": BookingStep::CustomerInfo.path(),
        }))
        .into_response())
    } else if let Some(category_id) = form.category_id {
        wizard::select_category(&db, &mut session, category_id)?;
        Ok(Json(serde_json::json!({
            "ok": true,
            "session": session.token,
            "next": BookingStep::BikeSelect.path(),
        }))
        .into_response())
    } else {
        Err(AppError::BadRequest(
            "bike_id or category_id is required".to_string(),
        ))
    }
}

// GET /book/customer
#[derive(Serialize)]
pub struct CustomerView {
    session: String,
    customer: Option<PendingCustomer>,
}

pub async fn customer_page(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let db = state.db.lock().unwrap();
    let session = wizard::load_or_new(&db, session_token(&headers))?;
    if let Err(redirect) = gate(&session, BookingStep::CustomerInfo) {
        return Ok(redirect);
    }

    Ok(Json(CustomerView {
        session: session.token.clone(),
        customer: session.data.customer,
    })
    .into_response())
}

// POST /book/customer
#[derive(Deserialize)]
pub struct CustomerForm {
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub citizen_id: String,
    pub line_id: Option<String>,
}

pub async fn submit_customer(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(form): Json<CustomerForm>,
) -> Result<Response, AppError> {
    let db = state.db.lock().unwrap();
    let mut session = wizard::load_or_new(&db, session_token(&headers))?;
    if let Err(redirect) = gate(&session, BookingStep::CustomerInfo) {
        return Ok(redirect);
    }

    wizard::submit_customer(
        &db,
        &mut session,
        PendingCustomer {
            first_name: form.first_name,
            last_name: form.last_name,
            phone: form.phone,
            citizen_id: form.citizen_id,
            line_id: form.line_id,
        },
    )?;

    Ok(Json(serde_json::json!({
        "ok": true,
        "session": session.token,
        "next": BookingStep::Checkout.path(),
    }))
    .into_response())
}

// GET /book/checkout
#[derive(Serialize)]
pub struct CheckoutPreview {
    session: String,
    bike_id: i64,
    license_plate: String,
    model_name: String,
    category_name: String,
    email: String,
    pickup: String,
    return_by: String,
    rental_days: i64,
    price_daily: f64,
    rental_price: f64,
    deposit_amount: f64,
    total_price: f64,
}

pub async fn checkout_page(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let db = state.db.lock().unwrap();
    let session = wizard::load_or_new(&db, session_token(&headers))?;
    if let Err(redirect) = gate(&session, BookingStep::Checkout) {
        return Ok(redirect);
    }

    let view = wizard::build_quote(&db, &session)?;

    Ok(Json(CheckoutPreview {
        session: session.token,
        bike_id: view.bike.id,
        license_plate: view.bike.license_plate,
        model_name: view.bike.model_name,
        category_name: view.category.name,
        email: view.dates.email,
        pickup: view.start_date.format("%Y-%m-%d %H:%M").to_string(),
        return_by: view.end_date.format("%Y-%m-%d %H:%M").to_string(),
        rental_days: view.quote.rental_days,
        price_daily: view.category.price_daily,
        rental_price: view.quote.rental_price,
        deposit_amount: view.quote.deposit_amount,
        total_price: view.quote.total_price,
    })
    .into_response())
}

// POST /book/checkout/confirm
#[derive(Deserialize, Default)]
pub struct ConfirmForm {
    pub delivery_address: Option<String>,
}

pub async fn confirm_booking(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Option<Json<ConfirmForm>>,
) -> Result<Response, AppError> {
    let form = body.map(|Json(f)| f).unwrap_or_default();

    let mut db = state.db.lock().unwrap();
    let session = wizard::load_or_new(&db, session_token(&headers))?;
    if let Err(redirect) = gate(&session, BookingStep::Checkout) {
        return Ok(redirect);
    }

    let booked = wizard::confirm(&mut db, &session, form.delivery_address.as_deref())?;

    Ok(Json(serde_json::json!({
        "ok": true,
        "message": "Booking confirmed! Thank you.",
        "rental_id": booked.rental_id,
        "customer_id": booked.customer_id,
        "rental_days": booked.rental_days,
        "total_price": booked.total_price,
    }))
    .into_response())
}

// POST /book/clear
pub async fn clear_booking(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<serde_json::Value>, AppError> {
    let db = state.db.lock().unwrap();
    if let Some(token) = session_token(&headers) {
        wizard::clear(&db, token)?;
    }

    Ok(Json(serde_json::json!({
        "ok": true,
        "next": BookingStep::Dates.path(),
    })))
}
