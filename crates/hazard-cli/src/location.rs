//! Operator-supplied coordinates as a location source.

use async_trait::async_trait;
use hazard_client::{LocationSource, PositionOptions};
use hazard_domain::{GeolocationError, Position};

/// Resolves immediately to the coordinates given on the command line
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedLocation(pub Position);

#[async_trait(?Send)]
impl LocationSource for FixedLocation {
    async fn current_position(
        &self,
        _options: &PositionOptions,
    ) -> Result<Position, GeolocationError> {
        Ok(self.0)
    }
}

fn parse_bounded(raw: &str, limit: f64, axis: &str) -> Result<f64, String> {
    let value: f64 = raw
        .trim()
        .parse()
        .map_err(|_| format!("`{raw}` is not a number"))?;
    if !value.is_finite() || value.abs() > limit {
        return Err(format!("{axis} must be between -{limit} and {limit}"));
    }
    Ok(value)
}

/// clap value parser for `--lat`
pub fn parse_latitude(raw: &str) -> Result<f64, String> {
    parse_bounded(raw, 90.0, "latitude")
}

/// clap value parser for `--lng`
pub fn parse_longitude(raw: &str) -> Result<f64, String> {
    parse_bounded(raw, 180.0, "longitude")
}
