pub mod config;
pub mod db;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod services;
pub mod state;

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// The full application router. Shared between main and the integration
/// tests so the two cannot drift apart.
pub fn app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(handlers::health::health))
        .route(
            "/book/dates",
            get(handlers::booking::dates_page).post(handlers::booking::submit_dates),
        )
        .route(
            "/book/bikes",
            get(handlers::booking::bikes_page).post(handlers::booking::choose_bike),
        )
        .route(
            "/book/customer",
            get(handlers::booking::customer_page).post(handlers::booking::submit_customer),
        )
        .route("/book/checkout", get(handlers::booking::checkout_page))
        .route(
            "/book/checkout/confirm",
            post(handlers::booking::confirm_booking),
        )
        .route("/book/clear", post(handlers::booking::clear_booking))
        .route("/api/admin/login", post(handlers::admin::login))
        .route("/api/admin/logout", post(handlers::admin::logout))
        .route("/api/admin/dashboard", get(handlers::admin::dashboard))
        .route("/api/admin/customers", get(handlers::admin::get_customers))
        .route("/api/admin/rentals", get(handlers::admin::get_rentals))
        .route(
            "/api/admin/rentals/:id/cancel",
            post(handlers::admin::cancel_rental),
        )
        .route(
            "/api/admin/bikes",
            get(handlers::admin::get_bikes).post(handlers::admin::create_bike),
        )
        .route(
            "/api/admin/bikes/add-inventory",
            post(handlers::admin::add_inventory),
        )
        .route("/api/admin/bikes/:id", post(handlers::admin::update_bike))
        .route(
            "/api/admin/bikes/:id/delete",
            post(handlers::admin::delete_bike),
        )
        .route(
            "/api/admin/bikes/:id/status",
            post(handlers::admin::set_bike_status),
        )
        .route(
            "/api/admin/categories",
            get(handlers::admin::get_categories),
        )
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
