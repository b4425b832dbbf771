pub mod config;
pub mod db;
pub mod delivery;
pub mod entities;
pub mod error;
pub mod geocoding;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod utils;

use std::sync::Arc;

use sea_orm::DatabaseConnection;

pub use config::Config;
pub use delivery::DeliveryPolicy;
pub use error::{AppError, AppResult};
pub use geocoding::Geocoder;

#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DatabaseConnection>,
    pub config: Config,
    pub policy: DeliveryPolicy,
    pub geocoder: Geocoder,
}
