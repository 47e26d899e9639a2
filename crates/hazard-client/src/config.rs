//! # Client Configuration
//!
//! Environment-based configuration for the reporting client.

use std::env;
use std::time::Duration;

use hazard_domain::Position;

use crate::geolocation::PositionOptions;

/// Report creation endpoint, relative to the API base URL
pub const REPORTS_CREATE_PATH: &str = "/reports/create";

/// Verified reports listing endpoint, relative to the API base URL
pub const VERIFIED_REPORTS_PATH: &str = "/reports/verified";

/// Zoom used by the location picker
pub const PICKER_ZOOM: u8 = 16;

/// Zoom used by the verified reports overview
pub const OVERVIEW_ZOOM: u8 = 13;

/// Overview map center (Asansol)
pub const DEFAULT_CENTER: Position = Position::new(23.6823, 86.9536);

/// Reports shown in the sidebar summary
pub const SUMMARY_LIMIT: usize = 5;

pub const DEFAULT_API_URL: &str = "http://localhost:5000";
pub const DEFAULT_TILE_URL: &str = "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png";
pub const TILE_ATTRIBUTION: &str =
    "&copy; <a href=\"https://www.openstreetmap.org/copyright\">OpenStreetMap</a>";

const DEFAULT_GEOLOCATION_TIMEOUT_MS: u64 = 15_000;

/// Client configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Backend base URL, without trailing slash
    pub api_url: String,

    /// Device location query options
    pub geolocation: PositionOptions,

    /// Slippy-map tile URL template
    pub tile_url: String,
}

impl ClientConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self {
            api_url: normalize_base_url(
                &env::var("HAZARD_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string()),
            ),

            geolocation: PositionOptions {
                enable_high_accuracy: env::var("HAZARD_HIGH_ACCURACY")
                    .map(|v| v == "true" || v == "1")
                    .unwrap_or(true),
                timeout: Duration::from_millis(
                    env::var("HAZARD_GEOLOCATION_TIMEOUT_MS")
                        .ok()
                        .and_then(|v| v.parse().ok())
                        .unwrap_or(DEFAULT_GEOLOCATION_TIMEOUT_MS),
                ),
            },

            tile_url: env::var("HAZARD_TILE_URL")
                .unwrap_or_else(|_| DEFAULT_TILE_URL.to_string()),
        }
    }

    #[must_use]
    pub fn with_api_url(mut self, api_url: &str) -> Self {
        self.api_url = normalize_base_url(api_url);
        self
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::from_env()
    }
}

fn normalize_base_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_api_url_strips_trailing_slash() {
        let config = ClientConfig::from_env().with_api_url("https://api.example.org/ ");
        assert_eq!(config.api_url, "https://api.example.org");
    }

    #[test]
    fn test_geolocation_timeout_is_bounded() {
        let config = ClientConfig::from_env();
        assert!(config.geolocation.timeout > Duration::ZERO);
    }
}
