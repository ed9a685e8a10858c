//! Blocking HTTP client for MapQuest-style elevation profile services

use super::{ElevationService, format_lat_lng_collection, parse_height_response};
use crate::{ElevationConfig, Result, TrackError};
use reqwest::StatusCode;
use reqwest::blocking::Client;
use std::time::Duration;

/// Message the profile service answers with when a request covers too much ground
const TOO_LARGE_MARKER: &str = "exceeds the maximum allowed distance";

/// Elevation service backed by a key/value form POST to a profile endpoint
///
/// The response is expected as XML with one `<height>` element per requested
/// coordinate.
#[derive(Debug, Clone)]
pub struct HttpElevationService {
    client: Client,
    endpoint: String,
    api_key: String,
}

impl HttpElevationService {
    pub fn new(config: &ElevationConfig) -> Result<Self> {
        config.validate()?;
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| TrackError::ElevationService(format!("HTTP client setup failed: {}", e)))?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            api_key: config.api_key.clone().unwrap_or_default(),
        })
    }

    #[inline]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl ElevationService for HttpElevationService {
    fn lookup(&self, coordinates: &[(f64, f64)]) -> Result<Vec<f64>> {
        let collection = format_lat_lng_collection(coordinates);
        let form = [
            ("key", self.api_key.as_str()),
            ("inFormat", "kvp"),
            ("latLngCollection", collection.as_str()),
            ("outFormat", "xml"),
            ("useFilter", "true"),
        ];

        tracing::debug!(
            "Requesting {} elevations from {}",
            coordinates.len(),
            self.endpoint
        );
        let response = self
            .client
            .post(&self.endpoint)
            .form(&form)
            .send()
            .map_err(|e| TrackError::ElevationService(format!("Request failed: {}", e)))?;

        let status = response.status();
        let body = response
            .text()
            .map_err(|e| TrackError::ElevationService(format!("Reading response failed: {}", e)))?;

        read_profile_response(status, &body, coordinates.len())
    }
}

/// Map a profile response to heights or the matching error
///
/// The too-large marker wins over the status code; the service reports it with
/// either a success or an error status.
fn read_profile_response(status: StatusCode, body: &str, requested: usize) -> Result<Vec<f64>> {
    if body.contains(TOO_LARGE_MARKER) {
        return Err(TrackError::ElevationRequestTooLarge { points: requested });
    }
    if !status.is_success() {
        return Err(TrackError::ElevationService(format!(
            "Service answered with HTTP {}",
            status
        )));
    }

    parse_height_response(body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_uses_config() {
        let config = ElevationConfig {
            endpoint: "http://localhost:9/profile".to_string(),
            ..Default::default()
        };
        let service = HttpElevationService::new(&config).unwrap();
        assert_eq!(service.endpoint(), "http://localhost:9/profile");
        assert!(service.api_key.is_empty());
    }

    #[test]
    fn test_response_too_large_marker() {
        let body = "<response><info><messages><message>Request exceeds the maximum allowed distance</message></messages></info></response>";
        assert!(matches!(
            read_profile_response(StatusCode::OK, body, 200),
            Err(TrackError::ElevationRequestTooLarge { points: 200 })
        ));
        assert!(matches!(
            read_profile_response(StatusCode::BAD_REQUEST, body, 3),
            Err(TrackError::ElevationRequestTooLarge { points: 3 })
        ));
    }

    #[test]
    fn test_response_error_status() {
        let result = read_profile_response(StatusCode::INTERNAL_SERVER_ERROR, "oops", 2);
        match result {
            Err(TrackError::ElevationService(message)) => assert!(message.contains("500")),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_response_heights() {
        let body = "<response><elevationProfile><distance>0</distance><height>12.5</height></elevationProfile><elevationProfile><distance>0.1</distance><height>13</height></elevationProfile></response>";
        assert_eq!(
            read_profile_response(StatusCode::OK, body, 2).unwrap(),
            vec![12.5, 13.0]
        );
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let config = ElevationConfig {
            chunk_size: 0,
            ..Default::default()
        };
        assert!(matches!(
            HttpElevationService::new(&config),
            Err(TrackError::InvalidConfig(_))
        ));
    }
}
