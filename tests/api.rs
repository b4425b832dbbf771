use std::net::SocketAddr;

use axum::{
    body::{to_bytes, Body},
    extract::ConnectInfo,
    http::{Request, StatusCode},
    Router,
};
use sea_orm::DatabaseConnection;
use tower::ServiceExt;

use delivery_zones::{routes, AppState, Config, Geocoder};

fn test_config() -> Config {
    Config {
        database_url: "postgres://localhost/unused".to_string(),
        server_host: "127.0.0.1".to_string(),
        server_port: 0,
        free_radius_meters: 5_000.0,
        max_delivery_radius_meters: 80_000.0,
        slot_capacity: 10,
        primary_hub: "PG".to_string(),
        geocoder_url: "http://127.0.0.1:9".to_string(),
        geocoder_user_agent: "delivery-zones-tests".to_string(),
        geocoder_timeout_secs: 1,
    }
}

// Routes exercised here answer before touching the database
fn app() -> Router {
    let config = test_config();
    let state = AppState {
        db: std::sync::Arc::new(DatabaseConnection::default()),
        policy: config.delivery_policy().unwrap(),
        geocoder: Geocoder::new(&config).unwrap(),
        config,
    };
    routes::create_router(state)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .extension(ConnectInfo(SocketAddr::from(([127, 0, 0, 1], 40000))))
        .body(Body::empty())
        .unwrap()
}

async fn json_body(response: axum::response::Response) -> serde_json::Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_list_stations() {
    let response = app().oneshot(get("/api/stations")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["primary_hub"], "PG");
    assert_eq!(body["free_radius_meters"], 5000.0);
    assert_eq!(body["stations"].as_array().unwrap().len(), 3);
    assert_eq!(body["stations"][1]["name"], "LIS");
}

#[tokio::test]
async fn test_pickup_schedule_requires_station() {
    let response = app().oneshot(get("/api/schedule?kind=pickup")).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = json_body(response).await;
    assert!(body["error"].as_str().unwrap().contains("station"));
}

#[tokio::test]
async fn test_unknown_station_is_rejected() {
    let response = app()
        .oneshot(get("/api/schedule?kind=pickup&station=OPO"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_delivery_options_needs_location() {
    let response = app().oneshot(get("/api/delivery-options")).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app()
        .oneshot(get("/api/delivery-options?lat=38.72"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
