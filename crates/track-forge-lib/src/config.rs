//! Engine configuration
//!
//! All tunables of the engines live here. The library never reads files or
//! environment variables itself: the application shell fills these structs
//! and passes them in.

use crate::{Result, TrackError};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Default MapQuest-style elevation profile endpoint
pub const DEFAULT_ELEVATION_ENDPOINT: &str = "http://open.mapquestapi.com/elevation/v1/profile";

/// Point thinning settings
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ThinningConfig {
    /// Minimum distance in meters between two retained points.
    /// Default: 0.2
    pub min_distance_meters: f64,
}

impl Default for ThinningConfig {
    fn default() -> Self {
        Self {
            min_distance_meters: 0.2,
        }
    }
}

/// Remote elevation correction settings
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ElevationConfig {
    /// Number of points sent per service request (default 200)
    pub chunk_size: usize,
    /// Profile endpoint of the elevation service
    pub endpoint: String,
    /// API key sent with every request
    pub api_key: Option<String>,
    /// Transport timeout for a single request
    pub timeout_secs: u64,
}

impl Default for ElevationConfig {
    fn default() -> Self {
        Self {
            chunk_size: 200,
            endpoint: DEFAULT_ELEVATION_ENDPOINT.to_string(),
            api_key: None,
            timeout_secs: 30,
        }
    }
}

impl ElevationConfig {
    pub fn validate(&self) -> Result<()> {
        if self.chunk_size == 0 {
            return Err(TrackError::InvalidConfig(
                "elevation chunk size must be at least 1".to_string(),
            ));
        }
        if self.timeout_secs == 0 {
            return Err(TrackError::InvalidConfig(
                "elevation timeout must be at least 1 second".to_string(),
            ));
        }
        Ok(())
    }
}

/// Configuration of every engine
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EngineConfig {
    pub thinning: ThinningConfig,
    pub elevation: ElevationConfig,
}

impl EngineConfig {
    pub fn with_min_distance(mut self, meters: f64) -> Self {
        self.thinning.min_distance_meters = meters;
        self
    }

    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.elevation.chunk_size = chunk_size;
        self
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.elevation.endpoint = endpoint.into();
        self
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.elevation.api_key = Some(api_key.into());
        self
    }

    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.elevation.timeout_secs = secs;
        self
    }

    /// Check every value before handing the config to an engine
    ///
    /// A non-positive thinning distance is accepted: thinning treats it as a no-op.
    pub fn validate(&self) -> Result<()> {
        if self.thinning.min_distance_meters.is_nan() {
            return Err(TrackError::InvalidConfig(
                "thinning distance is not a number".to_string(),
            ));
        }
        self.elevation.validate()
    }
}
