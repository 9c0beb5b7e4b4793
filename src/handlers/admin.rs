use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::HeaderMap;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::db::queries;
use crate::errors::AppError;
use crate::models::{Admin, BikeStatus, PaymentStatus};
use crate::services::{auth, fleet};
use crate::state::AppState;

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let auth = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");
    auth.strip_prefix("Bearer ").filter(|t| !t.is_empty())
}

fn authorize(state: &Arc<AppState>, headers: &HeaderMap) -> Result<Admin, AppError> {
    let token = bearer_token(headers).ok_or(AppError::Unauthorized)?;
    let db = state.db.lock().unwrap();
    auth::authenticate(&db, token)?.ok_or(AppError::Unauthorized)
}

// POST /api/admin/login
#[derive(Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Serialize)]
pub struct LoginResponse {
    token: String,
    username: String,
    role: String,
}

pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let db = state.db.lock().unwrap();
    let outcome = auth::login(&db, &body.username, &body.password)?;

    Ok(Json(LoginResponse {
        token: outcome.token,
        username: outcome.admin.username,
        role: outcome.admin.role.as_str().to_string(),
    }))
}

// POST /api/admin/logout
pub async fn logout(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<serde_json::Value>, AppError> {
    let token = bearer_token(&headers).ok_or(AppError::Unauthorized)?;
    let db = state.db.lock().unwrap();
    auth::logout(&db, token)?;
    Ok(Json(serde_json::json!({"ok": true})))
}

// GET /api/admin/dashboard
#[derive(Serialize)]
pub struct DashboardResponse {
    total_bikes: i64,
    available_bikes: i64,
    active_rentals: i64,
}

pub async fn dashboard(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<DashboardResponse>, AppError> {
    authorize(&state, &headers)?;

    let db = state.db.lock().unwrap();
    let stats = queries::get_dashboard_stats(&db)?;

    Ok(Json(DashboardResponse {
        total_bikes: stats.total_bikes,
        available_bikes: stats.available_bikes,
        active_rentals: stats.active_rentals,
    }))
}

// GET /api/admin/customers
#[derive(Deserialize)]
pub struct CustomersQuery {
    pub limit: Option<i64>,
}

#[derive(Serialize)]
pub struct CustomerResponse {
    id: i64,
    citizen_id: String,
    first_name: String,
    last_name: String,
    phone: String,
    email: String,
    line_id: Option<String>,
    created_at: String,
}

pub async fn get_customers(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(query): Query<CustomersQuery>,
) -> Result<Json<Vec<CustomerResponse>>, AppError> {
    authorize(&state, &headers)?;

    let db = state.db.lock().unwrap();
    let customers = queries::list_customers(&db, query.limit.unwrap_or(100))?;

    let response: Vec<CustomerResponse> = customers
        .into_iter()
        .map(|c| CustomerResponse {
            id: c.id,
            citizen_id: c.citizen_id,
            first_name: c.first_name,
            last_name: c.last_name,
            phone: c.phone,
            email: c.email,
            line_id: c.line_id,
            created_at: c.created_at.format("%Y-%m-%d %H:%M:%S").to_string(),
        })
        .collect();

    Ok(Json(response))
}

// GET /api/admin/rentals
#[derive(Deserialize)]
pub struct RentalsQuery {
    pub status: Option<String>,
    pub limit: Option<i64>,
}

#[derive(Serialize)]
pub struct RentalResponse {
    id: i64,
    customer_id: i64,
    customer_name: String,
    bike_id: i64,
    license_plate: String,
    model_name: String,
    start_date: String,
    end_date: String,
    actual_return_date: Option<String>,
    total_price: f64,
    is_delivery: bool,
    delivery_address: Option<String>,
    payment_status: String,
    created_at: String,
}

pub async fn get_rentals(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(query): Query<RentalsQuery>,
) -> Result<Json<Vec<RentalResponse>>, AppError> {
    authorize(&state, &headers)?;

    let db = state.db.lock().unwrap();
    let rentals = queries::list_rentals(&db, query.status.as_deref(), query.limit.unwrap_or(50))?;

    let response: Vec<RentalResponse> = rentals
        .into_iter()
        .map(|r| RentalResponse {
            id: r.rental.id,
            customer_id: r.rental.customer_id,
            customer_name: r.customer_name,
            bike_id: r.rental.bike_id,
            license_plate: r.license_plate,
            model_name: r.model_name,
            start_date: r.rental.start_date.format("%Y-%m-%d %H:%M:%S").to_string(),
            end_date: r.rental.end_date.format("%Y-%m-%d %H:%M:%S").to_string(),
            actual_return_date: r
                .rental
                .actual_return_date
                .map(|d| d.format("%Y-%m-%d %H:%M:%S").to_string()),
            total_price: r.rental.total_price,
            is_delivery: r.rental.is_delivery,
            delivery_address: r.rental.delivery_address,
            payment_status: r.rental.payment_status.as_str().to_string(),
            created_at: r.rental.created_at.format("%Y-%m-%d %H:%M:%S").to_string(),
        })
        .collect();

    Ok(Json(response))
}

// POST /api/admin/rentals/:id/cancel
pub async fn cancel_rental(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Result<Json<serde_json::Value>, AppError> {
    authorize(&state, &headers)?;

    let db = state.db.lock().unwrap();
    let updated = queries::update_rental_status(&db, id, PaymentStatus::Cancelled)?;

    if updated {
        Ok(Json(serde_json::json!({"ok": true})))
    } else {
        Err(AppError::NotFound(format!("rental {id}")))
    }
}

// GET /api/admin/bikes
pub async fn get_bikes(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<Vec<queries::BikeListing>>, AppError> {
    authorize(&state, &headers)?;

    let db = state.db.lock().unwrap();
    let bikes = queries::list_bikes(&db)?;
    Ok(Json(bikes))
}

// GET /api/admin/categories
pub async fn get_categories(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<Vec<crate::models::BikeCategory>>, AppError> {
    authorize(&state, &headers)?;

    let db = state.db.lock().unwrap();
    let categories = queries::list_categories(&db)?;
    Ok(Json(categories))
}

// POST /api/admin/bikes
#[derive(Deserialize)]
pub struct BikeForm {
    pub license_plate: String,
    pub model_name: String,
    pub color: String,
    pub engine_size: String,
    pub image_url: Option<String>,
    pub description: Option<String>,
    pub category_id: i64,
    pub status: Option<String>,
}

fn bike_input(form: BikeForm) -> Result<queries::BikeInput, AppError> {
    let status = match form.status.as_deref() {
        None => BikeStatus::Available,
        Some(s) => BikeStatus::try_parse(s)
            .ok_or_else(|| AppError::BadRequest(format!("unknown bike status: {s}")))?,
    };

    Ok(queries::BikeInput {
        license_plate: form.license_plate,
        model_name: form.model_name,
        color: form.color,
        engine_size: form.engine_size,
        image_url: form.image_url,
        description: form.description,
        status,
        category_id: form.category_id,
    })
}

pub async fn create_bike(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(form): Json<BikeForm>,
) -> Result<Json<serde_json::Value>, AppError> {
    authorize(&state, &headers)?;

    let input = bike_input(form)?;
    let db = state.db.lock().unwrap();

    if queries::get_category(&db, input.category_id)?.is_none() {
        return Err(AppError::BadRequest(format!(
            "unknown category: {}",
            input.category_id
        )));
    }
    if queries::license_plate_taken(&db, &input.license_plate, None)? {
        return Err(AppError::Conflict(format!(
            "license plate already registered: {}",
            input.license_plate
        )));
    }

    let id = queries::insert_bike(&db, &input)?;
    Ok(Json(serde_json::json!({"ok": true, "id": id})))
}

// POST /api/admin/bikes/:id
pub async fn update_bike(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<i64>,
    Json(form): Json<BikeForm>,
) -> Result<Json<serde_json::Value>, AppError> {
    authorize(&state, &headers)?;

    let input = bike_input(form)?;
    let db = state.db.lock().unwrap();

    if queries::license_plate_taken(&db, &input.license_plate, Some(id))? {
        return Err(AppError::Conflict(format!(
            "license plate already registered: {}",
            input.license_plate
        )));
    }

    if queries::update_bike(&db, id, &input)? {
        Ok(Json(serde_json::json!({"ok": true})))
    } else {
        Err(AppError::NotFound(format!("bike {id}")))
    }
}

// POST /api/admin/bikes/:id/delete
pub async fn delete_bike(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Result<Json<serde_json::Value>, AppError> {
    authorize(&state, &headers)?;

    let db = state.db.lock().unwrap();
    fleet::delete_bike(&db, id)?;
    Ok(Json(serde_json::json!({"ok": true})))
}

// POST /api/admin/bikes/add-inventory
#[derive(Deserialize)]
pub struct AddInventoryRequest {
    pub source_bike_id: i64,
    pub license_plate: String,
}

pub async fn add_inventory(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(body): Json<AddInventoryRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    authorize(&state, &headers)?;

    let db = state.db.lock().unwrap();
    if queries::license_plate_taken(&db, &body.license_plate, None)? {
        return Err(AppError::Conflict(format!(
            "license plate already registered: {}",
            body.license_plate
        )));
    }

    let id = fleet::add_inventory(&db, body.source_bike_id, &body.license_plate)?;
    Ok(Json(serde_json::json!({"ok": true, "id": id})))
}

// POST /api/admin/bikes/:id/status
#[derive(Deserialize)]
pub struct StatusRequest {
    pub status: String,
}

pub async fn set_bike_status(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<i64>,
    Json(body): Json<StatusRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    authorize(&state, &headers)?;

    let new_status = BikeStatus::try_parse(&body.status)
        .ok_or_else(|| AppError::BadRequest(format!("unknown bike status: {}", body.status)))?;

    let db = state.db.lock().unwrap();
    let change = fleet::change_bike_status(&db, id, new_status)?;

    Ok(Json(serde_json::json!({
        "ok": true,
        "status": change.new_status.as_str(),
        "closed_rental_id": change.closed_rental_id,
    })))
}
