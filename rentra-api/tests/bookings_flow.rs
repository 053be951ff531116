use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::response::Response;
use axum::Router;
use rentra_api::{app, AppState};
use rentra_catalog::{Fleet, QuoteConfig};
use rentra_store::{MemoryReservationStore, MemoryUserDirectory};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

fn test_app() -> Router {
    let state = AppState {
        store: Arc::new(MemoryReservationStore::new(QuoteConfig::default())),
        directory: Arc::new(MemoryUserDirectory::new()),
        mirror: None,
        fleet: Arc::new(Fleet::standard()),
    };
    app(state)
}

fn create_booking_body(vehicle_id: u32, pickup: (&str, &str), ret: (&str, &str)) -> Value {
    json!({
        "user_id": "renter@example.com",
        "vehicle_id": vehicle_id,
        "pickup_date": pickup.0,
        "pickup_time": pickup.1,
        "return_date": ret.0,
        "return_time": ret.1,
        "pickup_location": "Airport",
        "return_location": "Downtown",
        "driver_name": "Alex Doe",
        "driver_phone": "555-0100",
        "driver_email": "renter@example.com",
    })
}

fn post_json(uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn read_json(response: Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_create_then_overlap_then_boundary_touch() {
    let app = test_app();

    let body = create_booking_body(1, ("2030-06-01", "09:00 AM"), ("2030-06-03", "09:00 AM"));
    let response = app.clone().oneshot(post_json("/v1/bookings", &body)).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let created = read_json(response).await;
    let first_id = created["id"].as_str().unwrap().to_string();
    assert_eq!(created["days"], 2);
    // $45.00/day: base 9000 + insurance 3000 + tax 1200
    assert_eq!(created["total_cents"], 13200);

    // Overlapping request on the same vehicle is rejected with the blocker.
    let body = create_booking_body(1, ("2030-06-02", "10:00 AM"), ("2030-06-04", "10:00 AM"));
    let response = app.clone().oneshot(post_json("/v1/bookings", &body)).await.unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let rejection = read_json(response).await;
    assert_eq!(rejection["rejection"]["kind"], "conflict");
    assert_eq!(rejection["rejection"]["blocking"], first_id.as_str());

    // Back-to-back handoff at the exact return instant is allowed.
    let body = create_booking_body(1, ("2030-06-03", "09:00 AM"), ("2030-06-05", "09:00 AM"));
    let response = app.clone().oneshot(post_json("/v1/bookings", &body)).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    // Same interval on another vehicle is independent.
    let body = create_booking_body(2, ("2030-06-02", "10:00 AM"), ("2030-06-04", "10:00 AM"));
    let response = app.clone().oneshot(post_json("/v1/bookings", &body)).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
}

#[tokio::test]
async fn test_cancel_frees_the_interval() {
    let app = test_app();

    let body = create_booking_body(3, ("2030-07-01", "09:00 AM"), ("2030-07-03", "09:00 AM"));
    let response = app.clone().oneshot(post_json("/v1/bookings", &body)).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let id = read_json(response).await["id"].as_str().unwrap().to_string();

    let response = app
        .clone()
        .oneshot(post_json(
            &format!("/v1/bookings/{}/cancel", id),
            &json!({}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(read_json(response).await["status"], "CANCELLED");

    // The cancelled reservation no longer blocks the window.
    let body = create_booking_body(3, ("2030-07-02", "10:00 AM"), ("2030-07-04", "10:00 AM"));
    let response = app.clone().oneshot(post_json("/v1/bookings", &body)).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
}

#[tokio::test]
async fn test_reschedule_excludes_self() {
    let app = test_app();

    let body = create_booking_body(4, ("2030-08-01", "09:00 AM"), ("2030-08-03", "09:00 AM"));
    let response = app.clone().oneshot(post_json("/v1/bookings", &body)).await.unwrap();
    let id = read_json(response).await["id"].as_str().unwrap().to_string();

    let update = json!({
        "pickup_date": "2030-08-01",
        "pickup_time": "09:00 AM",
        "return_date": "2030-08-04",
        "return_time": "09:00 AM",
        "notes": "extended by a day",
    });
    let request = Request::builder()
        .method("PUT")
        .uri(format!("/v1/bookings/{}", id))
        .header("content-type", "application/json")
        .body(Body::from(update.to_string()))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let updated = read_json(response).await;
    assert_eq!(updated["days"], 3);
    assert_eq!(updated["notes"], "extended by a day");
}

#[tokio::test]
async fn test_day_filter_excludes_booked_vehicle() {
    let app = test_app();

    let body = create_booking_body(1, ("2030-06-01", "09:00 AM"), ("2030-06-03", "09:00 AM"));
    let response = app.clone().oneshot(post_json("/v1/bookings", &body)).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    // Day-level filter over the booked days drops vehicle 1 even though
    // parts of those days are technically free.
    let response = app
        .clone()
        .oneshot(get("/v1/vehicles?start=2030-06-01&end=2030-06-02"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let vehicles = read_json(response).await;
    let vehicles = vehicles.as_array().unwrap();
    assert_eq!(vehicles.len(), 24);
    assert!(vehicles.iter().all(|v| v["id"] != 1));

    // Unfiltered listing still has the whole fleet.
    let response = app.clone().oneshot(get("/v1/vehicles")).await.unwrap();
    let vehicles = read_json(response).await;
    assert_eq!(vehicles.as_array().unwrap().len(), 25);
}

#[tokio::test]
async fn test_invalid_interval_is_unprocessable() {
    let app = test_app();

    let body = create_booking_body(5, ("2030-06-03", "09:00 AM"), ("2030-06-01", "09:00 AM"));
    let response = app.clone().oneshot(post_json("/v1/bookings", &body)).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let rejection = read_json(response).await;
    assert_eq!(rejection["rejection"]["kind"], "empty_interval");
}

#[tokio::test]
async fn test_unknown_vehicle_is_not_found() {
    let app = test_app();

    let body = create_booking_body(99, ("2030-06-01", "09:00 AM"), ("2030-06-03", "09:00 AM"));
    let response = app.clone().oneshot(post_json("/v1/bookings", &body)).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_favorites_round_trip() {
    let app = test_app();

    let request = Request::builder()
        .method("PUT")
        .uri("/v1/users/renter@example.com/favorites/3")
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(get("/v1/users/renter@example.com/favorites"))
        .await
        .unwrap();
    assert_eq!(read_json(response).await, json!([3]));

    let request = Request::builder()
        .method("DELETE")
        .uri("/v1/users/renter@example.com/favorites/3")
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(get("/v1/users/renter@example.com/favorites"))
        .await
        .unwrap();
    assert_eq!(read_json(response).await, json!([]));
}

#[tokio::test]
async fn test_availability_probe_reports_blocker() {
    let app = test_app();

    let body = create_booking_body(6, ("2030-09-01", "09:00 AM"), ("2030-09-03", "09:00 AM"));
    let response = app.clone().oneshot(post_json("/v1/bookings", &body)).await.unwrap();
    let id = read_json(response).await["id"].as_str().unwrap().to_string();

    let uri = "/v1/vehicles/6/availability?pickup_date=2030-09-02&pickup_time=10:00%20AM&return_date=2030-09-04&return_time=10:00%20AM";
    let response = app.clone().oneshot(get(uri)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let probe = read_json(response).await;
    assert_eq!(probe["available"], false);
    assert_eq!(probe["blocking"], id.as_str());

    let uri = "/v1/vehicles/6/availability?pickup_date=2030-09-03&pickup_time=09:00%20AM&return_date=2030-09-05&return_time=09:00%20AM";
    let response = app.clone().oneshot(get(uri)).await.unwrap();
    let probe = read_json(response).await;
    assert_eq!(probe["available"], true);
    assert!(probe["blocking"].is_null());
}
