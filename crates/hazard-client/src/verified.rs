//! # Verified Reports Map
//!
//! Holds the last fetched collection of verified reports and derives the
//! classified markers and sidebar summary from it.

use chrono::{DateTime, Utc};
use hazard_domain::{Position, SeverityTier, StatusCategory, VerifiedReport};
use tracing::{debug, info, warn};

use crate::api::ReportsApi;
use crate::config::SUMMARY_LIMIT;
use crate::context::RequestContext;
use crate::error::ApiError;

pub const FETCH_FAILED_MESSAGE: &str = "Failed to fetch reports. Please try again later.";

/// One map marker, borrowed from the collection
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReportMarker<'a> {
    pub report: &'a VerifiedReport,
    pub position: Position,
    pub tier: SeverityTier,
    pub category: StatusCategory,
}

impl ReportMarker<'_> {
    pub fn id(&self) -> &str {
        &self.report.id
    }

    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        self.report.created_at
    }
}

/// Identifies one refresh call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshTicket {
    generation: u64,
}

#[derive(Debug, Clone, Default)]
pub struct VerifiedReportsMap {
    reports: Vec<VerifiedReport>,
    loading: bool,
    error: Option<String>,
    generation: u64,
    detached: bool,
}

impl VerifiedReportsMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reports(&self) -> &[VerifiedReport] {
        &self.reports
    }

    pub const fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn count(&self) -> usize {
        self.reports.len()
    }

    /// Start a refresh: loading on, previous error cleared. Any refresh
    /// still outstanding is superseded.
    pub fn begin_refresh(&mut self) -> RefreshTicket {
        self.generation += 1;
        self.loading = true;
        self.error = None;
        RefreshTicket {
            generation: self.generation,
        }
    }

    /// Apply a fetch result. Success replaces the collection wholesale; a
    /// failure leaves no collection behind, only the error banner.
    /// Returns `false` when the ticket was superseded.
    pub fn finish_refresh(
        &mut self,
        ticket: RefreshTicket,
        result: Result<Vec<VerifiedReport>, ApiError>,
    ) -> bool {
        if self.detached || ticket.generation != self.generation {
            debug!("discarding superseded verified reports fetch");
            return false;
        }

        self.loading = false;
        match result {
            Ok(reports) => {
                info!(count = reports.len(), "verified reports loaded");
                self.reports = reports;
            }
            Err(err) => {
                warn!(error = %err, "failed to fetch verified reports");
                self.reports.clear();
                self.error = Some(FETCH_FAILED_MESSAGE.to_string());
            }
        }
        true
    }

    /// Fetch and apply the full collection
    pub async fn refresh<A>(&mut self, api: &A, ctx: &RequestContext) -> &[VerifiedReport]
    where
        A: ReportsApi + ?Sized,
    {
        let ticket = self.begin_refresh();
        let result = api.verified_reports(ctx).await;
        self.finish_refresh(ticket, result);
        &self.reports
    }

    /// Page torn down: later fetches are ignored
    pub fn detach(&mut self) {
        self.detached = true;
    }

    /// One marker per report, in received order
    pub fn markers(&self) -> Vec<ReportMarker<'_>> {
        self.reports
            .iter()
            .map(|report| ReportMarker {
                report,
                position: report.position(),
                tier: report.severity(),
                category: report.category(),
            })
            .collect()
    }

    /// First reports as received, for the sidebar
    pub fn summary(&self) -> &[VerifiedReport] {
        &self.reports[..self.reports.len().min(SUMMARY_LIMIT)]
    }
}
