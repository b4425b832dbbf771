use std::env;
use std::str::FromStr;

use crate::delivery::pricing::MAX_DELIVERY_RADIUS_METERS;
use crate::delivery::schedule::DEFAULT_SLOT_CAPACITY;
use crate::delivery::stations::{
    StationRegistry, DEFAULT_FREE_RADIUS_METERS, DEFAULT_PRIMARY_HUB, STATIONS,
};
use crate::delivery::DeliveryPolicy;
use crate::error::AppResult;

#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub server_host: String,
    pub server_port: u16,
    pub free_radius_meters: f64,
    pub max_delivery_radius_meters: f64,
    pub slot_capacity: u32,
    pub primary_hub: String,
    pub geocoder_url: String,
    pub geocoder_user_agent: String,
    pub geocoder_timeout_secs: u64,
}

fn parsed_var<T: FromStr>(name: &str, default: T) -> T {
    match env::var(name) {
        Ok(value) => value
            .parse()
            .unwrap_or_else(|_| panic!("{} must be a number", name)),
        Err(_) => default,
    }
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        Self {
            database_url: env::var("DATABASE_URL")
                .expect("DATABASE_URL must be set"),
            server_host: env::var("SERVER_HOST")
                .unwrap_or_else(|_| "0.0.0.0".to_string()),
            server_port: parsed_var("SERVER_PORT", 3000),
            free_radius_meters: parsed_var("FREE_RADIUS_METERS", DEFAULT_FREE_RADIUS_METERS),
            max_delivery_radius_meters: parsed_var(
                "MAX_DELIVERY_RADIUS_METERS",
                MAX_DELIVERY_RADIUS_METERS,
            ),
            slot_capacity: parsed_var("SLOT_CAPACITY", DEFAULT_SLOT_CAPACITY),
            primary_hub: env::var("PRIMARY_HUB")
                .unwrap_or_else(|_| DEFAULT_PRIMARY_HUB.to_string()),
            geocoder_url: env::var("GEOCODER_URL")
                .unwrap_or_else(|_| "https://nominatim.openstreetmap.org".to_string()),
            geocoder_user_agent: env::var("GEOCODER_USER_AGENT")
                .unwrap_or_else(|_| concat!("delivery-zones/", env!("CARGO_PKG_VERSION")).to_string()),
            geocoder_timeout_secs: parsed_var("GEOCODER_TIMEOUT_SECS", 5),
        }
    }

    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }

    pub fn delivery_policy(&self) -> AppResult<DeliveryPolicy> {
        Ok(DeliveryPolicy {
            registry: StationRegistry::new(STATIONS, self.free_radius_meters, &self.primary_hub)?,
            max_delivery_radius_m: self.max_delivery_radius_meters,
            slot_capacity: self.slot_capacity,
        })
    }
}
