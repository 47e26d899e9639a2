//! # Hazard Reporting - Domain Model
//!
//! Value types shared by the submission pipeline, the location picker and
//! the verified-reports map. Nothing in this crate performs I/O; every type
//! here is owned and mutated by the client core or the frontend.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// VALUE OBJECTS
// =============================================================================

/// A latitude/longitude pair, stored exactly as produced by the device or
/// the map marker. Never rounded, never clamped.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub lat: f64,
    pub lng: f64,
}

impl Position {
    #[must_use]
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Great-circle distance to another point (Haversine formula)
    #[must_use]
    pub fn distance_to_km(&self, other: &Self) -> f64 {
        const EARTH_RADIUS_KM: f64 = 6371.0;

        let lat1 = self.lat.to_radians();
        let lat2 = other.lat.to_radians();
        let delta_lat = (other.lat - self.lat).to_radians();
        let delta_lng = (other.lng - self.lng).to_radians();

        let a = (delta_lat / 2.0).sin().powi(2)
            + lat1.cos() * lat2.cos() * (delta_lng / 2.0).sin().powi(2);
        let c = 2.0 * a.sqrt().asin();

        EARTH_RADIUS_KM * c
    }
}

impl From<(f64, f64)> for Position {
    fn from((lat, lng): (f64, f64)) -> Self {
        Self { lat, lng }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.4}, {:.4}", self.lat, self.lng)
    }
}

/// Image chosen by the user, carried as raw bytes so the payload can be
/// built identically in the browser and on the command line.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageAttachment {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl ImageAttachment {
    pub fn new(
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            bytes,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl fmt::Debug for ImageAttachment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageAttachment")
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

// =============================================================================
// FORM STATE
// =============================================================================

/// In-progress report held by the form. `Default` is the initial value.
///
/// `position` stays `None` until a successful geolocation result or a marker
/// drag sets it, and is only cleared again by a full reset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReportDraft {
    pub description: String,
    pub image: Option<ImageAttachment>,
    pub position: Option<Position>,
}

impl ReportDraft {
    #[must_use]
    pub fn is_pristine(&self) -> bool {
        *self == Self::default()
    }
}

/// Outcome slot for one geolocation attempt.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum GeolocationResult {
    #[default]
    Idle,
    Pending,
    Success(Position),
    Failure(GeolocationError),
}

impl GeolocationResult {
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }

    #[must_use]
    pub const fn position(&self) -> Option<Position> {
        match self {
            Self::Success(position) => Some(*position),
            _ => None,
        }
    }

    /// Message to show under the location button, if any
    #[must_use]
    pub const fn error(&self) -> Option<&GeolocationError> {
        match self {
            Self::Failure(err) => Some(err),
            _ => None,
        }
    }
}

/// Report submission lifecycle
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SubmissionState {
    #[default]
    Idle,
    Validating,
    InFlight,
    Succeeded,
    Failed(String),
}

impl SubmissionState {
    pub const SUCCESS_MESSAGE: &'static str = "Report submitted successfully!";

    /// Whether the submit control is enabled
    #[must_use]
    pub const fn accepts_submit(&self) -> bool {
        !matches!(self, Self::InFlight)
    }

    /// The single message banner this state shows
    #[must_use]
    pub fn banner(&self) -> Option<Banner> {
        match self {
            Self::Succeeded => Some(Banner {
                kind: BannerKind::Success,
                text: Self::SUCCESS_MESSAGE.to_string(),
            }),
            Self::Failed(message) => Some(Banner {
                kind: BannerKind::Error,
                text: message.clone(),
            }),
            Self::Idle | Self::Validating | Self::InFlight => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BannerKind {
    Success,
    Error,
}

impl BannerKind {
    pub const fn class(self) -> &'static str {
        match self {
            Self::Success => "banner-success",
            Self::Error => "banner-error",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Banner {
    pub kind: BannerKind,
    pub text: String,
}

// =============================================================================
// VERIFIED REPORTS
// =============================================================================

/// A moderated report as returned by the verified-reports listing.
///
/// `priority` and `status` are kept as the server's raw strings so values
/// this client does not know about still round-trip and render.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "WireReport")]
pub struct VerifiedReport {
    #[serde(rename = "_id")]
    pub id: String,
    pub description: String,
    pub latitude: f64,
    pub longitude: f64,
    pub image_url: Option<String>,
    pub priority: Option<String>,
    pub status: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

impl VerifiedReport {
    #[must_use]
    pub const fn position(&self) -> Position {
        Position::new(self.latitude, self.longitude)
    }

    #[must_use]
    pub fn severity(&self) -> SeverityTier {
        SeverityTier::classify(self.priority.as_deref())
    }

    #[must_use]
    pub fn category(&self) -> StatusCategory {
        StatusCategory::classify(self.status.as_deref())
    }

    /// Badge text: the server's value, or "Moderate" when absent
    #[must_use]
    pub fn priority_label(&self) -> &str {
        non_blank(self.priority.as_deref()).unwrap_or("Moderate")
    }

    /// Badge text: the server's value, or "Verified" when absent
    #[must_use]
    pub fn status_label(&self) -> &str {
        non_blank(self.status.as_deref()).unwrap_or("Verified")
    }
}

/// Listing entry as sent. Document stores often emit both `_id` and an
/// `id` virtual; `_id` wins and `id` only fills in when it is missing.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireReport {
    #[serde(rename = "_id")]
    mongo_id: Option<String>,
    id: Option<String>,
    #[serde(default)]
    description: String,
    latitude: f64,
    longitude: f64,
    image_url: Option<String>,
    priority: Option<String>,
    status: Option<String>,
    created_at: Option<DateTime<Utc>>,
}

impl TryFrom<WireReport> for VerifiedReport {
    type Error = String;

    fn try_from(wire: WireReport) -> Result<Self, Self::Error> {
        let id = wire
            .mongo_id
            .or(wire.id)
            .ok_or_else(|| "missing field `_id`".to_string())?;
        Ok(Self {
            id,
            description: wire.description,
            latitude: wire.latitude,
            longitude: wire.longitude,
            image_url: wire.image_url,
            priority: wire.priority,
            status: wire.status,
            created_at: wire.created_at,
        })
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

/// Visual severity tier derived from a report's priority.
/// Ordered so that `Urgent > Moderate > Low > Unknown`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeverityTier {
    Unknown,
    Low,
    Moderate,
    Urgent,
}

impl SeverityTier {
    /// Absent or blank priority counts as moderate
    #[must_use]
    pub fn classify(priority: Option<&str>) -> Self {
        let Some(priority) = non_blank(priority) else {
            return Self::Moderate;
        };
        match priority.trim().to_ascii_lowercase().as_str() {
            "urgent" => Self::Urgent,
            "moderate" => Self::Moderate,
            "low" => Self::Low,
            _ => Self::Unknown,
        }
    }

    pub const fn class(self) -> &'static str {
        match self {
            Self::Urgent => "priority-urgent",
            Self::Moderate => "priority-moderate",
            Self::Low => "priority-low",
            Self::Unknown => "priority-unknown",
        }
    }

    /// Marker fill color
    pub const fn color(self) -> &'static str {
        match self {
            Self::Urgent => "#ef4444",
            Self::Moderate => "#eab308",
            Self::Low => "#22c55e",
            Self::Unknown => "#9ca3af",
        }
    }

    pub const fn legend_label(self) -> &'static str {
        match self {
            Self::Urgent => "Urgent Priority",
            Self::Moderate => "Moderate Priority",
            Self::Low => "Low Priority",
            Self::Unknown => "Unclassified",
        }
    }
}

/// Visual category derived from a report's moderation status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusCategory {
    Verified,
    Resolved,
    Reviewing,
    Unknown,
}

impl StatusCategory {
    /// Absent or blank status counts as verified
    #[must_use]
    pub fn classify(status: Option<&str>) -> Self {
        let Some(status) = non_blank(status) else {
            return Self::Verified;
        };
        match status.trim().to_ascii_lowercase().as_str() {
            "verified" => Self::Verified,
            "resolved" => Self::Resolved,
            "reviewing" => Self::Reviewing,
            _ => Self::Unknown,
        }
    }

    pub const fn class(self) -> &'static str {
        match self {
            Self::Verified => "status-verified",
            Self::Resolved => "status-resolved",
            Self::Reviewing => "status-reviewing",
            Self::Unknown => "status-unknown",
        }
    }
}

// =============================================================================
// ERRORS
// =============================================================================

/// Device location failures. None of these end the session; the user may retry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, thiserror::Error)]
pub enum GeolocationError {
    #[error("Location access was denied. Please allow location access and try again.")]
    PermissionDenied,

    #[error("Your location is currently unavailable. Please try again.")]
    PositionUnavailable,

    #[error("Timed out while getting your location. Please try again.")]
    Timeout,

    #[error("Location is not supported on this device.")]
    Unsupported,
}

impl GeolocationError {
    /// Map a W3C `GeolocationPositionError.code`
    #[must_use]
    pub const fn from_code(code: u16) -> Self {
        match code {
            1 => Self::PermissionDenied,
            3 => Self::Timeout,
            _ => Self::PositionUnavailable,
        }
    }
}

/// Input rejected before any network call. Checked in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, thiserror::Error)]
pub enum ValidationError {
    #[error("Description is required.")]
    DescriptionRequired,

    #[error("Location is required. Please get your location first.")]
    LocationRequired,
}

/// Every error the reporting client surfaces to the user
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HazardError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Location(#[from] GeolocationError),

    #[error("{0}")]
    Network(String),

    /// Map tiles or icons failed to load; only visual fidelity degrades
    #[error("Asset failed to load: {0}")]
    AssetLoad(String),
}
