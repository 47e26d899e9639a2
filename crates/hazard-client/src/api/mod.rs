//! # Reports API
//!
//! Transport-neutral interface to the backend's report endpoints, plus the
//! response interpretation shared by every transport.

mod payload;

#[cfg(feature = "http")]
pub mod http;

pub use payload::{ReportPayload, format_coordinate, validate_draft};

use async_trait::async_trait;
use hazard_domain::VerifiedReport;
use serde::{Deserialize, Serialize};

use crate::context::RequestContext;
use crate::error::{ApiError, Result};

/// Backend report endpoints.
///
/// Futures are not required to be `Send`: the browser transport runs on the
/// single UI thread.
#[async_trait(?Send)]
pub trait ReportsApi {
    /// `POST /reports/create` with a multipart body
    async fn create_report(
        &self,
        ctx: &RequestContext,
        payload: &ReportPayload,
    ) -> Result<ReportReceipt>;

    /// `GET /reports/verified`, full collection
    async fn verified_reports(&self, ctx: &RequestContext) -> Result<Vec<VerifiedReport>>;
}

/// Optional body of a successful create call
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "WireReceipt")]
pub struct ReportReceipt {
    #[serde(rename = "_id")]
    pub id: Option<String>,
    pub message: Option<String>,
}

// `_id` wins when the backend also emits the `id` virtual
#[derive(Deserialize)]
struct WireReceipt {
    #[serde(default, rename = "_id")]
    mongo_id: Option<String>,
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

impl From<WireReceipt> for ReportReceipt {
    fn from(wire: WireReceipt) -> Self {
        Self {
            id: wire.mongo_id.or(wire.id),
            message: wire.message,
        }
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

fn is_success(status: u16) -> bool {
    (200..300).contains(&status)
}

/// `message` from a JSON error body, if any
pub fn error_message(body: &str) -> Option<String> {
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.message)
        .filter(|m| !m.is_empty())
}

/// Map a create-report response. A 2xx with an empty or non-JSON body is
/// still a success.
pub fn interpret_create(status: u16, body: &str) -> Result<ReportReceipt> {
    if !is_success(status) {
        return Err(ApiError::Status {
            status,
            message: error_message(body),
        });
    }
    Ok(serde_json::from_str(body).unwrap_or_default())
}

/// Map a verified-reports listing response
pub fn interpret_listing(status: u16, body: &str) -> Result<Vec<VerifiedReport>> {
    if !is_success(status) {
        return Err(ApiError::Status {
            status,
            message: error_message(body),
        });
    }
    Ok(serde_json::from_str(body)?)
}
