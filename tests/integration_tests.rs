use std::sync::{Arc, Barrier};

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use chrono::{Duration, Local, NaiveDate};
use serde_json::{json, Value};
use tower::ServiceExt;

use continental::config::AppConfig;
use continental::db;
use continental::db::queries;
use continental::handlers;
use continental::models::{BookingRequest, BookingStatus};
use continental::services::{auth, booking};
use continental::state::AppState;

// ── Helpers ──

fn test_config() -> AppConfig {
    AppConfig {
        port: 3000,
        database_url: ":memory:".to_string(),
        jwt_secret: "integration-test-secret".to_string(),
        jwt_expiration_hours: 1,
        static_dir: "frontend".to_string(),
        admin_email: "admin@thecontinental.com".to_string(),
        admin_password: "admin123".to_string(),
    }
}

fn test_state() -> Arc<AppState> {
    let conn = db::init_db(":memory:").unwrap();
    Arc::new(AppState::new(conn, test_config()))
}

fn admin_token(state: &AppState) -> String {
    let conn = state.conn().unwrap();
    let hash = auth::hash_password("admin123").unwrap();
    queries::upsert_admin(&conn, "admin", "admin@thecontinental.com", &hash, "Admin").unwrap();
    let admin = queries::get_user_by_email(&conn, "admin@thecontinental.com")
        .unwrap()
        .unwrap();
    state.jwt.generate_token(&admin).unwrap()
}

fn days_from_now(days: i64) -> String {
    (Local::now().date_naive() + Duration::days(days))
        .format("%Y-%m-%d")
        .to_string()
}

fn json_request(method: &str, uri: &str, token: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("Content-Type", "application/json");
    if let Some(token) = token {
        builder = builder.header("Authorization", format!("Bearer {token}"));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

fn get_request(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(token) = token {
        builder = builder.header("Authorization", format!("Bearer {token}"));
    }
    builder.body(Body::empty()).unwrap()
}

fn delete_request(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("DELETE").uri(uri);
    if let Some(token) = token {
        builder = builder.header("Authorization", format!("Bearer {token}"));
    }
    builder.body(Body::empty()).unwrap()
}

fn raw_request(method: &str, uri: &str, content_type: Option<&str>, body: &str) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(content_type) = content_type {
        builder = builder.header("Content-Type", content_type);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
    let res = app.clone().oneshot(req).await.unwrap();
    let status = res.status();
    let body = axum::body::to_bytes(res.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).unwrap_or(Value::Null)
    };
    (status, value)
}

async fn create_room(app: &Router, token: &str, number: &str, room_type: &str, price: f64) -> i64 {
    let (status, body) = send(
        app,
        json_request(
            "POST",
            "/api/rooms",
            Some(token),
            json!({
                "roomNumber": number,
                "roomType": room_type,
                "price": price,
                "description": "test room",
                "amenities": ["WiFi", "TV"],
                "maxOccupancy": 2
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "room create failed: {body}");
    body["id"].as_i64().unwrap()
}

fn booking_body(room: i64, check_in: &str, check_out: &str) -> Value {
    json!({
        "room": room,
        "customerName": "John Wick",
        "customerEmail": "john@example.com",
        "customerPhone": "555-0100",
        "checkIn": check_in,
        "checkOut": check_out,
        "specialRequests": "quiet floor"
    })
}

// ── Health ──

#[tokio::test]
async fn test_health() {
    let app = handlers::router(test_state());
    let (status, body) = send(&app, get_request("/api/health", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "OK");
}

// ── Rooms ──

#[tokio::test]
async fn test_room_writes_require_admin() {
    let state = test_state();
    let app = handlers::router(state.clone());
    let new_room = json!({"roomNumber": "101", "roomType": "Single", "price": 6500, "maxOccupancy": 1});

    let (status, _) = send(&app, json_request("POST", "/api/rooms", None, new_room.clone())).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(
        &app,
        json_request("POST", "/api/rooms", Some("not-a-jwt"), new_room.clone()),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = send(
        &app,
        json_request(
            "POST",
            "/api/users/register",
            None,
            json!({"username": "guest", "email": "guest@example.com", "password": "secret1", "fullName": "Guest"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let customer = body["token"].as_str().unwrap().to_string();

    let (status, _) = send(
        &app,
        json_request("POST", "/api/rooms", Some(&customer), new_room),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_room_crud() {
    let state = test_state();
    let token = admin_token(&state);
    let app = handlers::router(state);

    let id = create_room(&app, &token, "101", "Single", 6500.0).await;
    create_room(&app, &token, "301", "Suite", 20500.0).await;

    let (status, body) = send(&app, get_request(&format!("/api/rooms/{id}"), None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["roomNumber"], "101");
    assert_eq!(body["amenities"], json!(["WiFi", "TV"]));
    assert_eq!(body["isAvailable"], true);

    let (status, body) = send(&app, get_request("/api/rooms?roomType=Suite", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);

    let (status, body) = send(
        &app,
        json_request(
            "PUT",
            &format!("/api/rooms/{id}"),
            Some(&token),
            json!({"price": 7000, "isAvailable": false}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["price"], 7000.0);
    assert_eq!(body["isAvailable"], false);
    assert_eq!(body["roomNumber"], "101");

    let (status, _) = send(
        &app,
        json_request(
            "POST",
            "/api/rooms",
            Some(&token),
            json!({"roomNumber": "101", "roomType": "Double", "price": 1, "maxOccupancy": 1}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = send(&app, delete_request(&format!("/api/rooms/{id}"), Some(&token))).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(&app, get_request(&format!("/api/rooms/{id}"), None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_room_with_bookings_is_rejected() {
    let state = test_state();
    let token = admin_token(&state);
    let app = handlers::router(state);

    let room = create_room(&app, &token, "201", "Double", 9800.0).await;
    let (status, _) = send(
        &app,
        json_request(
            "POST",
            "/api/bookings",
            None,
            booking_body(room, &days_from_now(10), &days_from_now(12)),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(&app, delete_request(&format!("/api/rooms/{room}"), Some(&token))).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["error"].is_string());
}

// ── Availability ──

#[tokio::test]
async fn test_availability_excludes_booked_rooms() {
    let state = test_state();
    let token = admin_token(&state);
    let app = handlers::router(state);

    let a = create_room(&app, &token, "201", "Double", 9800.0).await;
    let b = create_room(&app, &token, "202", "Double", 9800.0).await;
    create_room(&app, &token, "301", "Suite", 20500.0).await;

    let check_in = days_from_now(20);
    let check_out = days_from_now(23);
    let (status, _) = send(
        &app,
        json_request("POST", "/api/bookings", None, booking_body(a, &check_in, &check_out)),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let uri = format!("/api/bookings/available?checkIn={check_in}&checkOut={check_out}&roomType=Double");
    let (status, body) = send(&app, get_request(&uri, None)).await;
    assert_eq!(status, StatusCode::OK);
    let ids: Vec<i64> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["id"].as_i64().unwrap())
        .collect();
    assert_eq!(ids, vec![b]);

    // The stay ends on check_out, so the next night starts free.
    let uri = format!(
        "/api/bookings/available?checkIn={check_out}&checkOut={}",
        days_from_now(25)
    );
    let (_, body) = send(&app, get_request(&uri, None)).await;
    assert_eq!(body.as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_availability_validates_query() {
    let app = handlers::router(test_state());

    let (status, _) = send(&app, get_request("/api/bookings/available", None)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let uri = format!(
        "/api/bookings/available?checkIn={}&checkOut={}",
        days_from_now(5),
        days_from_now(5)
    );
    let (status, _) = send(&app, get_request(&uri, None)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        get_request("/api/bookings/available?checkIn=2030-02-30&checkOut=2030-03-02", None),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

// ── Bookings ──

#[tokio::test]
async fn test_create_booking_and_conflict() {
    let state = test_state();
    let token = admin_token(&state);
    let app = handlers::router(state);

    let room = create_room(&app, &token, "201", "Double", 9800.0).await;
    let check_in = days_from_now(30);
    let check_out = days_from_now(33);

    let (status, body) = send(
        &app,
        json_request("POST", "/api/bookings", None, booking_body(room, &check_in, &check_out)),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["status"], "Pending");
    assert_eq!(body["totalPrice"], 29400.0);
    assert_eq!(body["room"]["roomNumber"], "201");
    assert_eq!(body["checkIn"], check_in.as_str());

    // Overlapping stay through the legacy alias.
    let (status, body) = send(
        &app,
        json_request(
            "POST",
            "/api/book",
            None,
            booking_body(room, &days_from_now(32), &days_from_now(35)),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["error"].is_string());

    // Back-to-back stay is fine.
    let (status, _) = send(
        &app,
        json_request("POST", "/api/book", None, booking_body(room, &check_out, &days_from_now(35))),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn test_create_booking_rejects_bad_input() {
    let state = test_state();
    let token = admin_token(&state);
    let app = handlers::router(state);
    let room = create_room(&app, &token, "101", "Single", 6500.0).await;

    let (status, _) = send(
        &app,
        json_request(
            "POST",
            "/api/bookings",
            None,
            booking_body(room, &days_from_now(-1), &days_from_now(2)),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        json_request(
            "POST",
            "/api/bookings",
            None,
            booking_body(room, &days_from_now(5), &days_from_now(4)),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        json_request("POST", "/api/bookings", None, json!({"room": room, "checkIn": days_from_now(1)})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        json_request(
            "POST",
            "/api/bookings",
            None,
            booking_body(9999, &days_from_now(5), &days_from_now(6)),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_booking_by_room_type() {
    let state = test_state();
    let token = admin_token(&state);
    let app = handlers::router(state);
    create_room(&app, &token, "301", "Suite", 20500.0).await;

    let mut body = booking_body(0, &days_from_now(7), &days_from_now(9));
    body.as_object_mut().unwrap().remove("room");
    body["roomType"] = json!("Suite");

    let (status, created) = send(&app, json_request("POST", "/api/bookings", None, body.clone())).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["room"]["roomNumber"], "301");
    assert_eq!(created["totalPrice"], 41000.0);

    // The only suite is now taken for those nights.
    let (status, _) = send(&app, json_request("POST", "/api/bookings", None, body)).await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_booking_admin_lifecycle() {
    let state = test_state();
    let token = admin_token(&state);
    let app = handlers::router(state);
    let room = create_room(&app, &token, "201", "Double", 9800.0).await;
    let check_in = days_from_now(40);
    let check_out = days_from_now(42);

    let (_, created) = send(
        &app,
        json_request("POST", "/api/bookings", None, booking_body(room, &check_in, &check_out)),
    )
    .await;
    let id = created["id"].as_i64().unwrap();

    let (status, _) = send(&app, get_request("/api/bookings", None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, list) = send(&app, get_request("/api/bookings", Some(&token))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list.as_array().unwrap().len(), 1);

    let (status, body) = send(
        &app,
        json_request(
            "PUT",
            &format!("/api/bookings/{id}"),
            Some(&token),
            json!({"status": "Confirmed"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "Confirmed");

    let (status, _) = send(
        &app,
        json_request(
            "PUT",
            &format!("/api/bookings/{id}"),
            Some(&token),
            json!({"status": "Lost"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Cancelling frees the dates.
    let (status, _) = send(
        &app,
        json_request(
            "PUT",
            &format!("/api/bookings/{id}"),
            Some(&token),
            json!({"status": "Cancelled"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = send(
        &app,
        json_request("POST", "/api/bookings", None, booking_body(room, &check_in, &check_out)),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = send(&app, delete_request(&format!("/api/bookings/{id}"), Some(&token))).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = send(&app, get_request(&format!("/api/bookings/{id}"), Some(&token))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_concurrent_requests_book_once() {
    let state = test_state();
    let token = admin_token(&state);
    let app = handlers::router(state);
    let room = create_room(&app, &token, "201", "Double", 9800.0).await;
    let check_in = days_from_now(50);
    let check_out = days_from_now(52);

    let mut handles = Vec::new();
    for _ in 0..8 {
        let app = app.clone();
        let body = booking_body(room, &check_in, &check_out);
        handles.push(tokio::spawn(async move {
            send(&app, json_request("POST", "/api/bookings", None, body)).await.0
        }));
    }

    let mut created = 0;
    let mut conflicts = 0;
    for handle in handles {
        match handle.await.unwrap() {
            StatusCode::CREATED => created += 1,
            StatusCode::CONFLICT => conflicts += 1,
            other => panic!("unexpected status {other}"),
        }
    }
    assert_eq!(created, 1);
    assert_eq!(conflicts, 7);
}

/// Separate connections to one file only stay consistent through the
/// database write lock, not the in-process mutex.
#[test]
fn test_separate_connections_book_once() {
    let path = std::env::temp_dir().join(format!("continental-race-{}.db", uuid::Uuid::new_v4()));
    let path_str = path.to_string_lossy().to_string();

    let room_id = {
        let conn = db::init_db(&path_str).unwrap();
        conn.execute(
            "INSERT INTO rooms (room_number, room_type, price, max_occupancy) VALUES ('201', 'Double', 9800, 2)",
            [],
        )
        .unwrap();
        conn.last_insert_rowid()
    };

    let today = NaiveDate::from_ymd_opt(2030, 1, 1).unwrap();
    let workers = 6;
    let barrier = Arc::new(Barrier::new(workers));
    let handles: Vec<_> = (0..workers)
        .map(|i| {
            let barrier = barrier.clone();
            let path = path_str.clone();
            std::thread::spawn(move || {
                let mut conn = db::init_db(&path).unwrap();
                let request = BookingRequest {
                    room: Some(room_id.into()),
                    customer_name: Some(format!("Guest {i}")),
                    customer_email: Some(format!("guest{i}@example.com")),
                    customer_phone: Some("555-0100".to_string()),
                    check_in: Some("2030-03-01".to_string()),
                    check_out: Some("2030-03-04".to_string()),
                    ..Default::default()
                };
                barrier.wait();
                booking::create_booking(&mut conn, &request, today).is_ok()
            })
        })
        .collect();

    let successes = handles
        .into_iter()
        .map(|h| h.join().unwrap())
        .filter(|ok| *ok)
        .count();
    assert_eq!(successes, 1);

    {
        let conn = db::init_db(&path_str).unwrap();
        let bookings = queries::list_bookings(&conn).unwrap();
        assert_eq!(bookings.len(), 1);
        assert_eq!(bookings[0].status, BookingStatus::Pending);
    }

    for suffix in ["", "-wal", "-shm"] {
        let _ = std::fs::remove_file(format!("{path_str}{suffix}"));
    }
}

// ── Messages ──

#[tokio::test]
async fn test_message_flow() {
    let state = test_state();
    let token = admin_token(&state);
    let app = handlers::router(state);

    let (status, _) = send(
        &app,
        json_request("POST", "/api/messages", None, json!({"name": "Winston"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(
        &app,
        json_request(
            "POST",
            "/api/messages",
            None,
            json!({"name": "Winston", "email": "winston@example.com", "subject": "Rules", "message": "No business on the grounds."}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["isRead"], false);
    let id = body["id"].as_i64().unwrap();

    let (status, _) = send(&app, get_request("/api/messages", None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = send(
        &app,
        json_request("PUT", &format!("/api/messages/{id}/read"), Some(&token), json!({})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["isRead"], true);

    let (status, list) = send(&app, get_request("/api/messages", Some(&token))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list.as_array().unwrap().len(), 1);

    let (status, _) = send(&app, delete_request(&format!("/api/messages/{id}"), Some(&token))).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = send(&app, get_request(&format!("/api/messages/{id}"), Some(&token))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// ── Users ──

#[tokio::test]
async fn test_register_login_me() {
    let app = handlers::router(test_state());

    let register = json!({
        "username": "winston",
        "email": "winston@example.com",
        "password": "continental",
        "fullName": "Winston Scott"
    });
    let (status, body) = send(&app, json_request("POST", "/api/users/register", None, register.clone())).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["user"]["role"], "customer");
    assert!(body["user"].get("passwordHash").is_none());

    let (status, _) = send(&app, json_request("POST", "/api/users/register", None, register)).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = send(
        &app,
        json_request(
            "POST",
            "/api/users/login",
            None,
            json!({"email": "winston@example.com", "password": "wrong"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = send(
        &app,
        json_request(
            "POST",
            "/api/users/login",
            None,
            json!({"email": "winston@example.com", "password": "continental"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let token = body["token"].as_str().unwrap().to_string();

    let (status, body) = send(&app, get_request("/api/users/me", Some(&token))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["username"], "winston");
    assert_eq!(body["fullName"], "Winston Scott");

    let (status, _) = send(&app, get_request("/api/users/me", None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

// ── Request decoding ──

#[tokio::test]
async fn test_blank_room_filters_are_ignored() {
    let state = test_state();
    let token = admin_token(&state);
    let app = handlers::router(state);
    create_room(&app, &token, "101", "Single", 6500.0).await;
    create_room(&app, &token, "301", "Suite", 20500.0).await;

    let (status, body) = send(&app, get_request("/api/rooms?roomType=&isAvailable=", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 2);

    let (status, body) = send(&app, get_request("/api/rooms?roomType=&isAvailable=true", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 2);

    let (status, body) = send(&app, get_request("/api/rooms?roomType=Penthouse", None)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_booking_accepts_room_id_as_string() {
    let state = test_state();
    let token = admin_token(&state);
    let app = handlers::router(state);
    let room = create_room(&app, &token, "201", "Double", 9800.0).await;

    let mut body = booking_body(room, &days_from_now(60), &days_from_now(61));
    body["room"] = json!(room.to_string());

    let (status, created) = send(&app, json_request("POST", "/api/bookings", None, body)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["room"]["id"], room);

    let mut body = booking_body(room, &days_from_now(62), &days_from_now(63));
    body["room"] = json!("two-oh-one");
    let (status, res) = send(&app, json_request("POST", "/api/bookings", None, body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(res["error"].is_string());
}

#[tokio::test]
async fn test_malformed_input_gets_error_envelope() {
    let app = handlers::router(test_state());

    let (status, body) = send(
        &app,
        raw_request("POST", "/api/bookings", Some("application/json"), "{not json"),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    let (status, body) = send(
        &app,
        raw_request("POST", "/api/bookings", Some("application/json"), r#"{"room": true}"#),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    let (status, body) = send(
        &app,
        raw_request("POST", "/api/messages", None, r#"{"name": "Winston"}"#),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    let (status, body) = send(&app, get_request("/api/rooms/abc", None)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_demoted_admin_loses_access() {
    let state = test_state();
    let token = admin_token(&state);
    let app = handlers::router(state.clone());

    let (status, _) = send(&app, get_request("/api/bookings", Some(&token))).await;
    assert_eq!(status, StatusCode::OK);

    {
        let conn = state.conn().unwrap();
        conn.execute(
            "UPDATE users SET role = 'customer' WHERE email = ?1",
            ["admin@thecontinental.com"],
        )
        .unwrap();
    }

    let (status, body) = send(&app, get_request("/api/bookings", Some(&token))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert!(body["error"].is_string());

    // The token itself still authenticates.
    let (status, body) = send(&app, get_request("/api/users/me", Some(&token))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["role"], "customer");
}
