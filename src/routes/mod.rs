use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use crate::handlers::delivery;
use crate::middleware::rate_limit::{create_public_governor, log_request};
use crate::AppState;

pub fn create_router(state: AppState) -> Router {
    // IP-based rate limiting for the public API
    let public_governor = create_public_governor();

    let delivery_routes = Router::new()
        .route("/stations", get(delivery::list_stations))
        .route("/delivery-options", get(delivery::delivery_options))
        .route("/schedule", get(delivery::get_schedule))
        .route("/bookings", post(delivery::create_booking))
        .route("/bookings/{id}", get(delivery::get_booking))
        .layer(public_governor);

    Router::new()
        .nest("/api", delivery_routes)
        .layer(middleware::from_fn(log_request))
        .with_state(state)
}
