use std::time::Duration;

use serde::Deserialize;

use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::utils::geo::Coordinate;

/// Nominatim search hit; coordinates arrive as strings.
#[derive(Debug, Deserialize)]
pub struct SearchHit {
    pub lat: String,
    pub lon: String,
    #[serde(default)]
    pub display_name: Option<String>,
}

/// Address lookup against a Nominatim-compatible `/search` endpoint.
#[derive(Clone)]
pub struct Geocoder {
    client: reqwest::Client,
    base_url: String,
}

impl Geocoder {
    pub fn new(config: &Config) -> AppResult<Self> {
        let client = reqwest::Client::builder()
            .user_agent(config.geocoder_user_agent.clone())
            .timeout(Duration::from_secs(config.geocoder_timeout_secs))
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.geocoder_url.trim_end_matches('/').to_string(),
        })
    }

    pub async fn lookup(&self, address: &str) -> AppResult<Coordinate> {
        let hits: Vec<SearchHit> = self
            .client
            .get(format!("{}/search", self.base_url))
            .query(&[("q", address), ("format", "json"), ("limit", "1")])
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(|e| AppError::UpstreamUnavailable(format!("Geocoding request failed: {}", e)))?
            .json()
            .await
            .map_err(|e| {
                AppError::UpstreamUnavailable(format!("Invalid geocoding response: {}", e))
            })?;

        let coordinate = first_coordinate(&hits, address)?;
        tracing::debug!(
            address,
            resolved = hits.first().and_then(|h| h.display_name.as_deref()).unwrap_or(""),
            lat = coordinate.lat,
            lng = coordinate.lng,
            "Geocoded address"
        );
        Ok(coordinate)
    }
}

fn first_coordinate(hits: &[SearchHit], address: &str) -> AppResult<Coordinate> {
    let hit = hits.first().ok_or_else(|| {
        AppError::UpstreamUnavailable(format!("No geocoding result for: {}", address))
    })?;

    let parse = |value: &str| {
        value.parse::<f64>().map_err(|_| {
            AppError::UpstreamUnavailable(format!("Invalid coordinate in geocoding result: {}", value))
        })
    };

    Ok(Coordinate::new(parse(&hit.lat)?, parse(&hit.lon)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_coordinate() {
        let body = r#"[
            {"lat": "38.7077", "lon": "-9.1365", "display_name": "Praça do Comércio, Lisboa"},
            {"lat": "0", "lon": "0"}
        ]"#;
        let hits: Vec<SearchHit> = serde_json::from_str(body).unwrap();

        let coordinate = first_coordinate(&hits, "Praça do Comércio").unwrap();
        assert_eq!(coordinate, Coordinate::new(38.7077, -9.1365));
    }

    #[test]
    fn test_no_hits_is_upstream_error() {
        let result = first_coordinate(&[], "Rua Inexistente");
        assert!(matches!(result, Err(AppError::UpstreamUnavailable(_))));
    }

    #[test]
    fn test_bad_coordinate_is_upstream_error() {
        let hits = vec![SearchHit {
            lat: "north".to_string(),
            lon: "-9.1".to_string(),
            display_name: None,
        }];
        assert!(matches!(
            first_coordinate(&hits, "x"),
            Err(AppError::UpstreamUnavailable(_))
        ));
    }
}
