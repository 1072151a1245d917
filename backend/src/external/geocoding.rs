//! Address geocoding
//!
//! Integrates with a Nominatim-compatible search endpoint. Geocoding is a
//! best-effort enrichment: every failure is logged and reported as "no
//! result", never as an error to the caller.

use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::GeocodingConfig;
use crate::error::{AppError, AppResult};
use shared::GpsCoordinates;

/// Best match for an address
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GeocodeResult {
    pub location: GpsCoordinates,
    pub display_name: String,
}

/// Resolves a free-form address to coordinates
#[async_trait]
pub trait Geocoder: Send + Sync {
    async fn geocode(&self, address: &str) -> Option<GeocodeResult>;
}

/// Geocoder used when geocoding is switched off
#[derive(Debug, Clone, Default)]
pub struct DisabledGeocoder;

#[async_trait]
impl Geocoder for DisabledGeocoder {
    async fn geocode(&self, _address: &str) -> Option<GeocodeResult> {
        None
    }
}

/// Nominatim search API client
#[derive(Clone)]
pub struct NominatimGeocoder {
    client: Client,
    endpoint: String,
}

/// One entry of a Nominatim search response
#[derive(Debug, Deserialize)]
struct NominatimPlace {
    lat: String,
    lon: String,
    display_name: String,
}

impl NominatimGeocoder {
    pub fn new(config: &GeocodingConfig) -> AppResult<Self> {
        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AppError::Configuration(format!("Geocoding client: {}", e)))?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
        })
    }

    async fn search(&self, address: &str) -> AppResult<Option<GeocodeResult>> {
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[("format", "json"), ("limit", "1"), ("q", address)])
            .send()
            .await
            .map_err(|e| AppError::ExternalService(format!("Geocoding request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(AppError::ExternalService(format!(
                "Geocoding API returned {}",
                response.status()
            )));
        }

        let places: Vec<NominatimPlace> = response
            .json()
            .await
            .map_err(|e| AppError::ExternalService(format!("Failed to parse geocoding response: {}", e)))?;

        places.into_iter().next().map(parse_place).transpose()
    }
}

fn parse_place(place: NominatimPlace) -> AppResult<GeocodeResult> {
    let parse = |value: &str| {
        Decimal::from_str(value.trim())
            .map_err(|e| AppError::ExternalService(format!("Invalid coordinate {:?}: {}", value, e)))
    };

    Ok(GeocodeResult {
        location: GpsCoordinates::new(parse(&place.lat)?, parse(&place.lon)?),
        display_name: place.display_name,
    })
}

#[async_trait]
impl Geocoder for NominatimGeocoder {
    async fn geocode(&self, address: &str) -> Option<GeocodeResult> {
        match self.search(address).await {
            Ok(result) => {
                if result.is_none() {
                    tracing::debug!("No geocoding match for {:?}", address);
                }
                result
            }
            Err(e) => {
                tracing::warn!("Geocoding failed for {:?}: {}", address, e);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_place() {
        let place: NominatimPlace = serde_json::from_str(
            r#"{"lat": "37.7749", "lon": "-122.4194", "display_name": "San Francisco"}"#,
        )
        .unwrap();
        let result = parse_place(place).unwrap();
        assert_eq!(result.location.latitude, Decimal::new(377749, 4));
        assert_eq!(result.location.longitude, Decimal::new(-1224194, 4));
    }

    #[test]
    fn test_parse_place_rejects_garbage() {
        let place = NominatimPlace {
            lat: "north".to_string(),
            lon: "0".to_string(),
            display_name: String::new(),
        };
        assert!(parse_place(place).is_err());
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_yields_none() {
        let geocoder = NominatimGeocoder::new(&GeocodingConfig {
            enabled: true,
            endpoint: "http://127.0.0.1:9/search".to_string(),
            user_agent: "AuthentifyTest/1.0".to_string(),
            timeout_secs: 1,
        })
        .unwrap();
        assert_eq!(geocoder.geocode("123 Main St").await, None);
    }

    #[tokio::test]
    async fn test_disabled_geocoder() {
        assert_eq!(DisabledGeocoder.geocode("anywhere").await, None);
    }
}
