use std::sync::{Arc, Mutex};

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::response::Response;
use axum::Router;
use tower::ServiceExt;

use bikeshop::config::AppConfig;
use bikeshop::db;
use bikeshop::db::queries;
use bikeshop::models::BikeStatus;
use bikeshop::services::auth;
use bikeshop::state::AppState;

// ── Helpers ──

fn test_config() -> AppConfig {
    AppConfig {
        port: 3000,
        database_url: ":memory:".to_string(),
        admin_username: "admin".to_string(),
        admin_password: "test-password".to_string(),
    }
}

fn test_state() -> Arc<AppState> {
    let config = test_config();
    let conn = db::init_db(":memory:").unwrap();
    auth::seed_admin(&conn, &config).unwrap();
    Arc::new(AppState {
        db: Arc::new(Mutex::new(conn)),
        config,
    })
}

fn test_app(state: Arc<AppState>) -> Router {
    bikeshop::app(state)
}

/// Category priced per the acceptance scenario (500/day, 1000 deposit)
/// plus one bike in it. Returns the bike id.
fn seed_catalog(state: &Arc<AppState>) -> i64 {
    let db = state.db.lock().unwrap();
    db.execute(
        "INSERT INTO bike_categories (id, name, price_daily, price_weekly, price_monthly, deposit_amount)
         VALUES (99, 'Test Scooter', 500.0, 3000.0, 9000.0, 1000.0)",
        [],
    )
    .unwrap();
    queries::insert_bike(
        &db,
        &queries::BikeInput {
            license_plate: "1กข 1234".to_string(),
            model_name: "Honda Click 125".to_string(),
            color: "Red".to_string(),
            engine_size: "125cc".to_string(),
            image_url: None,
            description: Some("City scooter".to_string()),
            status: BikeStatus::Available,
            category_id: 99,
        },
    )
    .unwrap()
}

fn get(uri: &str, session: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri(uri);
    if let Some(token) = session {
        builder = builder.header("x-session-token", token);
    }
    builder.body(Body::empty()).unwrap()
}

fn post_json(uri: &str, session: Option<&str>, body: serde_json::Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header("Content-Type", "application/json");
    if let Some(token) = session {
        builder = builder.header("x-session-token", token);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

fn admin_get(uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header("Authorization", format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap()
}

fn admin_post(uri: &str, token: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("Authorization", format!("Bearer {token}"))
        .header("Content-Type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_json(res: Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(res.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn login_admin(state: &Arc<AppState>) -> String {
    let res = test_app(state.clone())
        .oneshot(post_json(
            "/api/admin/login",
            None,
            serde_json::json!({"username": "admin", "password": "test-password"}),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let json = body_json(res).await;
    json["token"].as_str().unwrap().to_string()
}

/// Drive the wizard up to checkout for the given bike and citizen id.
/// Returns the session token.
async fn fill_wizard(state: &Arc<AppState>, bike_id: i64, citizen_id: &str, phone: &str) -> String {
    let res = test_app(state.clone())
        .oneshot(post_json(
            "/book/dates",
            None,
            serde_json::json!({
                "email": "rider@example.com",
                "pickup_date": "2024-01-01",
                "pickup_time": "09:00",
                "return_date": "2024-01-03",
                "return_time": "18:00",
            }),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let json = body_json(res).await;
    let token = json["session"].as_str().unwrap().to_string();
    assert_eq!(json["next"], "/book/bikes");

    let res = test_app(state.clone())
        .oneshot(post_json(
            "/book/bikes",
            Some(&token),
            serde_json::json!({"bike_id": bike_id}),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let res = test_app(state.clone())
        .oneshot(post_json(
            "/book/customer",
            Some(&token),
            serde_json::json!({
                "first_name": "Somchai",
                "last_name": "Jaidee",
                "phone": phone,
                "citizen_id": citizen_id,
            }),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    token
}

// ── Health ──

#[tokio::test]
async fn test_health() {
    let state = test_state();
    let res = test_app(state)
        .oneshot(get("/health", None))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

// ── Wizard Flow ──

#[tokio::test]
async fn test_full_booking_flow_prices_the_scenario() {
    let state = test_state();
    let bike_id = seed_catalog(&state);
    let token = fill_wizard(&state, bike_id, "1103700123456", "0812345678").await;

    // checkout quote: 3 days x 500 + 1000 deposit
    let res = test_app(state.clone())
        .oneshot(get("/book/checkout", Some(&token)))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let quote = body_json(res).await;
    assert_eq!(quote["rental_days"], 3);
    assert_eq!(quote["rental_price"], 1500.0);
    assert_eq!(quote["deposit_amount"], 1000.0);
    assert_eq!(quote["total_price"], 2500.0);
    assert_eq!(quote["license_plate"], "1กข 1234");

    let res = test_app(state.clone())
        .oneshot(post_json("/book/checkout/confirm", Some(&token), serde_json::json!({})))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let json = body_json(res).await;
    assert_eq!(json["ok"], true);
    assert_eq!(json["total_price"], 2500.0);

    // rental row exists and is Active
    let rental_id = json["rental_id"].as_i64().unwrap();
    {
        let db = state.db.lock().unwrap();
        let rental = queries::get_rental(&db, rental_id).unwrap().unwrap();
        assert_eq!(rental.payment_status, bikeshop::models::PaymentStatus::Active);
        assert_eq!(rental.total_price, 2500.0);
        assert!(rental.actual_return_date.is_none());
    }

    // wizard state is gone: the old token no longer resolves
    let res = test_app(state)
        .oneshot(get("/book/dates", Some(&token)))
        .await
        .unwrap();
    let json = body_json(res).await;
    assert!(json["session"].is_null());
}

#[tokio::test]
async fn test_bikes_without_dates_redirects_to_dates() {
    let state = test_state();
    seed_catalog(&state);

    let res = test_app(state)
        .oneshot(get("/book/bikes", None))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert_eq!(res.headers().get("location").unwrap(), "/book/dates");
}

#[tokio::test]
async fn test_customer_without_bike_redirects_to_bikes() {
    let state = test_state();
    seed_catalog(&state);

    let res = test_app(state.clone())
        .oneshot(post_json(
            "/book/dates",
            None,
            serde_json::json!({
                "email": "rider@example.com",
                "pickup_date": "2024-01-01",
                "pickup_time": "09:00",
                "return_date": "2024-01-03",
                "return_time": "18:00",
            }),
        ))
        .await
        .unwrap();
    let token = body_json(res).await["session"].as_str().unwrap().to_string();

    let res = test_app(state.clone())
        .oneshot(get("/book/customer", Some(&token)))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert_eq!(res.headers().get("location").unwrap(), "/book/bikes");

    // checkout is gated the same way
    let res = test_app(state)
        .oneshot(get("/book/checkout", Some(&token)))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert_eq!(res.headers().get("location").unwrap(), "/book/bikes");
}

#[tokio::test]
async fn test_category_narrowing_redisplays_then_clears_on_bike_pick() {
    let state = test_state();
    let bike_id = seed_catalog(&state);
    {
        // a second bike in one of the seeded categories
        let db = state.db.lock().unwrap();
        queries::insert_bike(
            &db,
            &queries::BikeInput {
                license_plate: "2ขค 567".to_string(),
                model_name: "Yamaha NMAX".to_string(),
                color: "Black".to_string(),
                engine_size: "155cc".to_string(),
                image_url: None,
                description: None,
                status: BikeStatus::Available,
                category_id: 2,
            },
        )
        .unwrap();
    }

    let res = test_app(state.clone())
        .oneshot(post_json(
            "/book/dates",
            None,
            serde_json::json!({
                "email": "rider@example.com",
                "pickup_date": "2024-01-01",
                "pickup_time": "09:00",
                "return_date": "2024-01-03",
                "return_time": "18:00",
            }),
        ))
        .await
        .unwrap();
    let token = body_json(res).await["session"].as_str().unwrap().to_string();

    // narrow to category 2 — stays on the bikes step
    let res = test_app(state.clone())
        .oneshot(post_json(
            "/book/bikes",
            Some(&token),
            serde_json::json!({"category_id": 2}),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(body_json(res).await["next"], "/book/bikes");

    let res = test_app(state.clone())
        .oneshot(get("/book/bikes", Some(&token)))
        .await
        .unwrap();
    let json = body_json(res).await;
    assert_eq!(json["category_id"], 2);
    let bikes = json["bikes"].as_array().unwrap();
    assert_eq!(bikes.len(), 1);
    assert_eq!(bikes[0]["model_name"], "Yamaha NMAX");

    // picking a concrete bike drops the narrowing
    let res = test_app(state.clone())
        .oneshot(post_json(
            "/book/bikes",
            Some(&token),
            serde_json::json!({"bike_id": bike_id}),
        ))
        .await
        .unwrap();
    assert_eq!(body_json(res).await["next"], "/book/customer");

    let res = test_app(state)
        .oneshot(get("/book/bikes", Some(&token)))
        .await
        .unwrap();
    let json = body_json(res).await;
    assert!(json["category_id"].is_null());
    assert_eq!(json["bikes"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_choosing_unknown_bike_is_not_found() {
    let state = test_state();
    seed_catalog(&state);

    let res = test_app(state.clone())
        .oneshot(post_json(
            "/book/dates",
            None,
            serde_json::json!({
                "email": "rider@example.com",
                "pickup_date": "2024-01-01",
                "pickup_time": "09:00",
                "return_date": "2024-01-03",
                "return_time": "18:00",
            }),
        ))
        .await
        .unwrap();
    let token = body_json(res).await["session"].as_str().unwrap().to_string();

    let res = test_app(state)
        .oneshot(post_json(
            "/book/bikes",
            Some(&token),
            serde_json::json!({"bike_id": 424242}),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_double_booking_fails_and_preserves_session() {
    let state = test_state();
    let bike_id = seed_catalog(&state);

    let first = fill_wizard(&state, bike_id, "1103700123456", "0812345678").await;
    let res = test_app(state.clone())
        .oneshot(post_json("/book/checkout/confirm", Some(&first), serde_json::json!({})))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    // same bike, overlapping dates, different visitor
    let second = fill_wizard(&state, bike_id, "9988776655443", "0800000000").await;
    let res = test_app(state.clone())
        .oneshot(post_json("/book/checkout/confirm", Some(&second), serde_json::json!({})))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CONFLICT);
    let json = body_json(res).await;
    assert!(
        json["error"].as_str().unwrap().contains("overlapping"),
        "expected overlap reason, got: {json}"
    );

    // no partial customer write
    {
        let db = state.db.lock().unwrap();
        assert!(queries::get_customer_by_citizen_id(&db, "9988776655443")
            .unwrap()
            .is_none());
    }

    // the session survives, so the visitor can retry from checkout
    let res = test_app(state)
        .oneshot(get("/book/checkout", Some(&second)))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_booking_twice_updates_customer_instead_of_duplicating() {
    let state = test_state();
    let bike_id = seed_catalog(&state);

    let token = fill_wizard(&state, bike_id, "1103700123456", "0812345678").await;
    test_app(state.clone())
        .oneshot(post_json("/book/checkout/confirm", Some(&token), serde_json::json!({})))
        .await
        .unwrap();

    // same citizen id again, later dates, new phone number
    let res = test_app(state.clone())
        .oneshot(post_json(
            "/book/dates",
            None,
            serde_json::json!({
                "email": "rider@example.com",
                "pickup_date": "2024-02-10",
                "pickup_time": "09:00",
                "return_date": "2024-02-11",
                "return_time": "18:00",
            }),
        ))
        .await
        .unwrap();
    let token = body_json(res).await["session"].as_str().unwrap().to_string();
    test_app(state.clone())
        .oneshot(post_json(
            "/book/bikes",
            Some(&token),
            serde_json::json!({"bike_id": bike_id}),
        ))
        .await
        .unwrap();
    test_app(state.clone())
        .oneshot(post_json(
            "/book/customer",
            Some(&token),
            serde_json::json!({
                "first_name": "Somchai",
                "last_name": "Jaidee",
                "phone": "0899999999",
                "citizen_id": "1103700123456",
            }),
        ))
        .await
        .unwrap();
    let res = test_app(state.clone())
        .oneshot(post_json("/book/checkout/confirm", Some(&token), serde_json::json!({})))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let admin_token = login_admin(&state).await;
    let res = test_app(state)
        .oneshot(admin_get("/api/admin/customers", &admin_token))
        .await
        .unwrap();
    let customers = body_json(res).await;
    let customers = customers.as_array().unwrap();
    assert_eq!(customers.len(), 1);
    assert_eq!(customers[0]["phone"], "0899999999");
}

#[tokio::test]
async fn test_clear_drops_wizard_state() {
    let state = test_state();
    let bike_id = seed_catalog(&state);
    let token = fill_wizard(&state, bike_id, "1103700123456", "0812345678").await;

    let res = test_app(state.clone())
        .oneshot(post_json("/book/clear", Some(&token), serde_json::json!({})))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(body_json(res).await["next"], "/book/dates");

    let res = test_app(state)
        .oneshot(get("/book/checkout", Some(&token)))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert_eq!(res.headers().get("location").unwrap(), "/book/dates");
}

#[tokio::test]
async fn test_delivery_address_marks_rental_as_delivery() {
    let state = test_state();
    let bike_id = seed_catalog(&state);
    let token = fill_wizard(&state, bike_id, "1103700123456", "0812345678").await;

    let res = test_app(state.clone())
        .oneshot(post_json(
            "/book/checkout/confirm",
            Some(&token),
            serde_json::json!({"delivery_address": "99 Beach Road, Phuket"}),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let rental_id = body_json(res).await["rental_id"].as_i64().unwrap();

    let db = state.db.lock().unwrap();
    let rental = queries::get_rental(&db, rental_id).unwrap().unwrap();
    assert!(rental.is_delivery);
    assert_eq!(rental.delivery_address.as_deref(), Some("99 Beach Road, Phuket"));
}

// ── Admin Auth ──

#[tokio::test]
async fn test_admin_requires_auth() {
    let state = test_state();

    let res = test_app(state.clone())
        .oneshot(get("/api/admin/dashboard", None))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let res = test_app(state)
        .oneshot(admin_get("/api/admin/dashboard", "not-a-token"))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_admin_login_rejects_bad_credentials_generically() {
    let state = test_state();

    let res = test_app(state.clone())
        .oneshot(post_json(
            "/api/admin/login",
            None,
            serde_json::json!({"username": "admin", "password": "wrong"}),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let wrong_pw = body_json(res).await;

    let res = test_app(state)
        .oneshot(post_json(
            "/api/admin/login",
            None,
            serde_json::json!({"username": "nobody", "password": "test-password"}),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let no_user = body_json(res).await;

    // unknown user and wrong password are indistinguishable
    assert_eq!(wrong_pw["error"], no_user["error"]);
    assert_eq!(wrong_pw["error"], "invalid credentials");
}

#[tokio::test]
async fn test_admin_logout_invalidates_token() {
    let state = test_state();
    let token = login_admin(&state).await;

    let res = test_app(state.clone())
        .oneshot(admin_get("/api/admin/dashboard", &token))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let res = test_app(state.clone())
        .oneshot(admin_post("/api/admin/logout", &token, serde_json::json!({})))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let res = test_app(state)
        .oneshot(admin_get("/api/admin/dashboard", &token))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

// ── Admin Console ──

#[tokio::test]
async fn test_dashboard_counts() {
    let state = test_state();
    let bike_id = seed_catalog(&state);
    let admin_token = login_admin(&state).await;

    let wizard_token = fill_wizard(&state, bike_id, "1103700123456", "0812345678").await;
    test_app(state.clone())
        .oneshot(post_json("/book/checkout/confirm", Some(&wizard_token), serde_json::json!({})))
        .await
        .unwrap();

    let res = test_app(state)
        .oneshot(admin_get("/api/admin/dashboard", &admin_token))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let json = body_json(res).await;
    assert_eq!(json["total_bikes"], 1);
    assert_eq!(json["available_bikes"], 1);
    assert_eq!(json["active_rentals"], 1);
}

#[tokio::test]
async fn test_bike_crud() {
    let state = test_state();
    let admin_token = login_admin(&state).await;

    // create
    let res = test_app(state.clone())
        .oneshot(admin_post(
            "/api/admin/bikes",
            &admin_token,
            serde_json::json!({
                "license_plate": "3คง 890",
                "model_name": "Honda PCX 160",
                "color": "White",
                "engine_size": "160cc",
                "category_id": 2,
            }),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let id = body_json(res).await["id"].as_i64().unwrap();

    // duplicate plate rejected
    let res = test_app(state.clone())
        .oneshot(admin_post(
            "/api/admin/bikes",
            &admin_token,
            serde_json::json!({
                "license_plate": "3คง 890",
                "model_name": "Honda PCX 160",
                "color": "Black",
                "engine_size": "160cc",
                "category_id": 2,
            }),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CONFLICT);

    // edit
    let res = test_app(state.clone())
        .oneshot(admin_post(
            &format!("/api/admin/bikes/{id}"),
            &admin_token,
            serde_json::json!({
                "license_plate": "3คง 890",
                "model_name": "Honda PCX 160",
                "color": "Matte Black",
                "engine_size": "160cc",
                "category_id": 2,
                "status": "Fix",
            }),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let res = test_app(state.clone())
        .oneshot(admin_get("/api/admin/bikes", &admin_token))
        .await
        .unwrap();
    let bikes = body_json(res).await;
    let bikes = bikes.as_array().unwrap().clone();
    assert_eq!(bikes.len(), 1);
    assert_eq!(bikes[0]["color"], "Matte Black");
    assert_eq!(bikes[0]["status"], "Fix");
    assert_eq!(bikes[0]["category_name"], "Scooter 150-160cc");

    // a bike in Fix is not offered to the wizard
    let res = test_app(state.clone())
        .oneshot(post_json(
            "/book/dates",
            None,
            serde_json::json!({
                "email": "rider@example.com",
                "pickup_date": "2024-01-01",
                "pickup_time": "09:00",
                "return_date": "2024-01-03",
                "return_time": "18:00",
            }),
        ))
        .await
        .unwrap();
    let wizard_token = body_json(res).await["session"].as_str().unwrap().to_string();
    let res = test_app(state.clone())
        .oneshot(get("/book/bikes", Some(&wizard_token)))
        .await
        .unwrap();
    assert_eq!(body_json(res).await["bikes"].as_array().unwrap().len(), 0);

    // delete (no rental history, not rented)
    let res = test_app(state.clone())
        .oneshot(admin_post(
            &format!("/api/admin/bikes/{id}/delete"),
            &admin_token,
            serde_json::json!({}),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let res = test_app(state)
        .oneshot(admin_get("/api/admin/bikes", &admin_token))
        .await
        .unwrap();
    assert_eq!(body_json(res).await.as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_create_bike_with_unknown_category_rejected() {
    let state = test_state();
    let admin_token = login_admin(&state).await;

    let res = test_app(state)
        .oneshot(admin_post(
            "/api/admin/bikes",
            &admin_token,
            serde_json::json!({
                "license_plate": "3คง 890",
                "model_name": "Honda PCX 160",
                "color": "White",
                "engine_size": "160cc",
                "category_id": 12345,
            }),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_add_inventory_clones_under_new_plate() {
    let state = test_state();
    let bike_id = seed_catalog(&state);
    let admin_token = login_admin(&state).await;

    let res = test_app(state.clone())
        .oneshot(admin_post(
            "/api/admin/bikes/add-inventory",
            &admin_token,
            serde_json::json!({"source_bike_id": bike_id, "license_plate": "9ศส 111"}),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let res = test_app(state)
        .oneshot(admin_get("/api/admin/bikes", &admin_token))
        .await
        .unwrap();
    let bikes = body_json(res).await;
    let bikes = bikes.as_array().unwrap().clone();
    assert_eq!(bikes.len(), 2);
    assert!(bikes
        .iter()
        .all(|b| b["model_name"] == "Honda Click 125" && b["status"] == "Available"));
}

#[tokio::test]
async fn test_return_transition_closes_open_rental() {
    let state = test_state();
    let bike_id = seed_catalog(&state);
    let admin_token = login_admin(&state).await;

    let wizard_token = fill_wizard(&state, bike_id, "1103700123456", "0812345678").await;
    let res = test_app(state.clone())
        .oneshot(post_json("/book/checkout/confirm", Some(&wizard_token), serde_json::json!({})))
        .await
        .unwrap();
    let rental_id = body_json(res).await["rental_id"].as_i64().unwrap();

    // pickup: admin hands the bike over
    let res = test_app(state.clone())
        .oneshot(admin_post(
            &format!("/api/admin/bikes/{bike_id}/status"),
            &admin_token,
            serde_json::json!({"status": "Rented"}),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert!(body_json(res).await["closed_rental_id"].is_null());

    // return: Rented -> Available closes the rental
    let res = test_app(state.clone())
        .oneshot(admin_post(
            &format!("/api/admin/bikes/{bike_id}/status"),
            &admin_token,
            serde_json::json!({"status": "Available"}),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(body_json(res).await["closed_rental_id"], rental_id);

    let res = test_app(state.clone())
        .oneshot(admin_get("/api/admin/rentals?status=Done", &admin_token))
        .await
        .unwrap();
    let rentals = body_json(res).await;
    let rentals = rentals.as_array().unwrap().clone();
    assert_eq!(rentals.len(), 1);
    assert_eq!(rentals[0]["id"], rental_id);
    assert!(!rentals[0]["actual_return_date"].is_null());

    // doing it again is a no-op, not an error
    test_app(state.clone())
        .oneshot(admin_post(
            &format!("/api/admin/bikes/{bike_id}/status"),
            &admin_token,
            serde_json::json!({"status": "Rented"}),
        ))
        .await
        .unwrap();
    let res = test_app(state)
        .oneshot(admin_post(
            &format!("/api/admin/bikes/{bike_id}/status"),
            &admin_token,
            serde_json::json!({"status": "Available"}),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert!(body_json(res).await["closed_rental_id"].is_null());
}

#[tokio::test]
async fn test_delete_guards_report_specific_reasons() {
    let state = test_state();
    let bike_id = seed_catalog(&state);
    let admin_token = login_admin(&state).await;

    let wizard_token = fill_wizard(&state, bike_id, "1103700123456", "0812345678").await;
    test_app(state.clone())
        .oneshot(post_json("/book/checkout/confirm", Some(&wizard_token), serde_json::json!({})))
        .await
        .unwrap();
    test_app(state.clone())
        .oneshot(admin_post(
            &format!("/api/admin/bikes/{bike_id}/status"),
            &admin_token,
            serde_json::json!({"status": "Rented"}),
        ))
        .await
        .unwrap();

    // rented bikes cannot be deleted
    let res = test_app(state.clone())
        .oneshot(admin_post(
            &format!("/api/admin/bikes/{bike_id}/delete"),
            &admin_token,
            serde_json::json!({}),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CONFLICT);
    assert_eq!(body_json(res).await["error"], "bike is currently rented");

    // even after return, the rental history pins the bike
    test_app(state.clone())
        .oneshot(admin_post(
            &format!("/api/admin/bikes/{bike_id}/status"),
            &admin_token,
            serde_json::json!({"status": "Available"}),
        ))
        .await
        .unwrap();
    let res = test_app(state)
        .oneshot(admin_post(
            &format!("/api/admin/bikes/{bike_id}/delete"),
            &admin_token,
            serde_json::json!({}),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CONFLICT);
    assert_eq!(body_json(res).await["error"], "bike has rental history");
}

#[tokio::test]
async fn test_cancel_rental() {
    let state = test_state();
    let bike_id = seed_catalog(&state);
    let admin_token = login_admin(&state).await;

    let wizard_token = fill_wizard(&state, bike_id, "1103700123456", "0812345678").await;
    let res = test_app(state.clone())
        .oneshot(post_json("/book/checkout/confirm", Some(&wizard_token), serde_json::json!({})))
        .await
        .unwrap();
    let rental_id = body_json(res).await["rental_id"].as_i64().unwrap();

    let res = test_app(state.clone())
        .oneshot(admin_post(
            &format!("/api/admin/rentals/{rental_id}/cancel"),
            &admin_token,
            serde_json::json!({}),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let res = test_app(state.clone())
        .oneshot(admin_get("/api/admin/rentals?status=Cancelled", &admin_token))
        .await
        .unwrap();
    assert_eq!(body_json(res).await.as_array().unwrap().len(), 1);

    let res = test_app(state)
        .oneshot(admin_post(
            "/api/admin/rentals/424242/cancel",
            &admin_token,
            serde_json::json!({}),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_unknown_status_value_rejected() {
    let state = test_state();
    let bike_id = seed_catalog(&state);
    let admin_token = login_admin(&state).await;

    let res = test_app(state)
        .oneshot(admin_post(
            &format!("/api/admin/bikes/{bike_id}/status"),
            &admin_token,
            serde_json::json!({"status": "Vanished"}),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}
