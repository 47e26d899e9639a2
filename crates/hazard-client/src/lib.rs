//! # Hazard Reporting Client Core
//!
//! Platform-agnostic state machines behind the report form and the
//! verified-reports map:
//!
//! - Geolocation acquisition with a bounded wait and stale-result guard
//! - Headless map/marker synchronization for the location picker
//! - Report submission controller (validate, confirm, send, reset)
//! - Verified reports store with priority/status classification
//!
//! Every async step is split into a `begin`/`finish` pair so a reactive UI
//! can own the state while the network call runs elsewhere. The `async`
//! drivers on each type simply chain those steps.

#![forbid(unsafe_code)]
#![warn(clippy::all)]

pub mod api;
pub mod config;
pub mod context;
pub mod error;
pub mod geolocation;
pub mod map_sync;
pub mod submission;
pub mod verified;

pub use api::{ReportPayload, ReportReceipt, ReportsApi};
pub use config::ClientConfig;
pub use context::{CredentialStore, RequestContext};
pub use error::ApiError;
pub use geolocation::{GeolocationAcquirer, LocationSource, PositionOptions};
pub use map_sync::{MapCommand, MapPositionSync};
pub use submission::{Confirmation, ReportSubmissionController, SubmitOutcome};
pub use verified::{ReportMarker, VerifiedReportsMap};

#[cfg(feature = "http")]
pub use api::http::HttpReportsApi;

pub use hazard_domain as domain;
