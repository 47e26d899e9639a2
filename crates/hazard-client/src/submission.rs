//! # Report Submission Controller
//!
//! Owns the form's draft, submission state and location slot.
//!
//! ```text
//! Idle ─submit─▶ Validating ─confirm─▶ InFlight ─2xx─▶ Succeeded (draft reset)
//!                   │   │                  └─error─▶ Failed(msg) (draft kept)
//!                   │   └─declined─▶ Idle
//!                   └─invalid─▶ Failed(msg)
//! ```
//!
//! A reactive UI drives the individual steps (`validate`, `decline`,
//! `dispatch`, `complete`) around its own task spawning; [`submit`] chains
//! them for callers that can hold `&mut self` across the request.
//!
//! [`submit`]: ReportSubmissionController::submit

use std::future::Future;

use hazard_domain::{
    GeolocationError, GeolocationResult, HazardError, ImageAttachment, Position, ReportDraft,
    SubmissionState, ValidationError,
};
use tracing::{debug, info, warn};

use crate::api::{ReportPayload, ReportReceipt, ReportsApi, validate_draft};
use crate::context::RequestContext;
use crate::error::ApiError;
use crate::geolocation::{
    AcquisitionTicket, GeolocationAcquirer, LocationSource, PositionOptions, locate,
};

pub const CONFIRM_PROMPT: &str = "Submit this hazard report?";
pub const SUBMIT_FALLBACK_MESSAGE: &str = "Failed to submit.";

/// Blocking yes/no gate shown before anything is sent
pub trait Confirmation {
    fn confirm(&self, prompt: &str) -> bool;
}

impl<F> Confirmation for F
where
    F: Fn(&str) -> bool,
{
    fn confirm(&self, prompt: &str) -> bool {
        self(prompt)
    }
}

/// How a submit action ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Submitted(ReportReceipt),
    Rejected(ValidationError),
    Declined,
    /// Network failure; the message is what the banner shows
    Failed(String),
    /// A submission is already in flight
    Busy,
    /// The result arrived after the form was reset or torn down
    Discarded,
}

/// Identifies one in-flight request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmissionTicket {
    epoch: u64,
}

/// Identifies one pending image read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttachmentTicket {
    epoch: u64,
}

#[derive(Debug, Clone, Default)]
pub struct ReportSubmissionController {
    draft: ReportDraft,
    state: SubmissionState,
    location: GeolocationAcquirer,
    epoch: u64,
    detached: bool,
}

impl ReportSubmissionController {
    pub fn new(options: PositionOptions) -> Self {
        Self {
            location: GeolocationAcquirer::new(options),
            ..Self::default()
        }
    }

    pub const fn draft(&self) -> &ReportDraft {
        &self.draft
    }

    pub const fn state(&self) -> &SubmissionState {
        &self.state
    }

    pub const fn position(&self) -> Option<Position> {
        self.draft.position
    }

    pub const fn location(&self) -> &GeolocationResult {
        self.location.result()
    }

    pub const fn location_options(&self) -> &PositionOptions {
        self.location.options()
    }

    /// Whether the submit control is enabled
    pub const fn can_submit(&self) -> bool {
        !self.detached && self.state.accepts_submit()
    }

    // -------------------------------------------------------------------------
    // Draft edits
    // -------------------------------------------------------------------------

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.draft.description = description.into();
    }

    pub fn set_image(&mut self, image: Option<ImageAttachment>) {
        self.draft.image = image;
    }

    /// Start reading a chosen file; the bytes arrive later
    pub const fn begin_attach(&self) -> AttachmentTicket {
        AttachmentTicket { epoch: self.epoch }
    }

    /// Apply a finished read. Reads that outlive a reset or teardown are
    /// dropped so a photo never lands in the next report's draft.
    pub fn finish_attach(&mut self, ticket: AttachmentTicket, image: Option<ImageAttachment>) -> bool {
        if self.detached || ticket.epoch != self.epoch {
            debug!("discarding image read for a stale form");
            return false;
        }
        self.set_image(image);
        true
    }

    /// Commit a position from the map (marker drag) or the device
    pub fn set_position(&mut self, position: Position) {
        self.draft.position = Some(position);
    }

    // -------------------------------------------------------------------------
    // Location
    // -------------------------------------------------------------------------

    pub fn begin_locate(&mut self) -> AcquisitionTicket {
        self.location.begin()
    }

    /// Apply a device result; a success becomes the draft's position
    pub fn finish_locate(
        &mut self,
        ticket: AcquisitionTicket,
        outcome: Result<Position, GeolocationError>,
    ) -> Option<Position> {
        if self.detached {
            return None;
        }
        let position = self.location.resolve(ticket, outcome)?;
        self.set_position(position);
        Some(position)
    }

    /// Run one acquisition attempt against `source`
    pub async fn locate<S, D>(&mut self, source: &S, deadline: D) -> &GeolocationResult
    where
        S: LocationSource + ?Sized,
        D: Future<Output = ()>,
    {
        let ticket = self.begin_locate();
        let options = *self.location.options();
        let outcome = locate(source, &options, deadline).await;
        self.finish_locate(ticket, outcome);
        self.location.result()
    }

    // -------------------------------------------------------------------------
    // Submission
    // -------------------------------------------------------------------------

    /// Submit pressed: check the draft. Failures are terminal for this
    /// attempt and nothing is sent.
    pub fn validate(&mut self) -> Result<(), SubmitOutcome> {
        if !self.can_submit() {
            return Err(SubmitOutcome::Busy);
        }
        self.state = SubmissionState::Validating;

        match validate_draft(&self.draft) {
            Ok(_) => Ok(()),
            Err(err) => {
                debug!(error = %err, "report rejected before sending");
                self.state = SubmissionState::Failed(err.to_string());
                Err(SubmitOutcome::Rejected(err))
            }
        }
    }

    /// Confirmation refused; nothing changes but the state
    pub fn decline(&mut self) {
        if self.state == SubmissionState::Validating {
            self.state = SubmissionState::Idle;
        }
    }

    /// Confirmation accepted: freeze the payload and go in flight
    pub fn dispatch(&mut self) -> Result<(SubmissionTicket, ReportPayload), SubmitOutcome> {
        match self.state {
            SubmissionState::InFlight => return Err(SubmitOutcome::Busy),
            SubmissionState::Validating => {}
            _ => self.validate()?,
        }

        let payload = ReportPayload::from_draft(&self.draft).map_err(|err| {
            self.state = SubmissionState::Failed(err.to_string());
            SubmitOutcome::Rejected(err)
        })?;

        self.state = SubmissionState::InFlight;
        info!(
            lat = payload.position.lat,
            lng = payload.position.lng,
            has_image = payload.image.is_some(),
            "submitting hazard report"
        );
        Ok((SubmissionTicket { epoch: self.epoch }, payload))
    }

    /// Apply the network outcome of a dispatched request
    pub fn complete(
        &mut self,
        ticket: SubmissionTicket,
        outcome: Result<ReportReceipt, ApiError>,
    ) -> SubmitOutcome {
        if self.detached || ticket.epoch != self.epoch {
            debug!("discarding submission result for a stale form");
            return SubmitOutcome::Discarded;
        }

        match outcome {
            Ok(receipt) => {
                info!(id = receipt.id.as_deref().unwrap_or("-"), "hazard report accepted");
                self.reset();
                self.state = SubmissionState::Succeeded;
                SubmitOutcome::Submitted(receipt)
            }
            Err(err) => {
                let message = err.user_message(SUBMIT_FALLBACK_MESSAGE);
                warn!(error = %HazardError::from(err), "hazard report rejected");
                self.state = SubmissionState::Failed(message.clone());
                SubmitOutcome::Failed(message)
            }
        }
    }

    /// Validate, confirm, send and apply the result
    pub async fn submit<A, C>(
        &mut self,
        api: &A,
        ctx: &RequestContext,
        confirm: &C,
    ) -> SubmitOutcome
    where
        A: ReportsApi + ?Sized,
        C: Confirmation + ?Sized,
    {
        if let Err(outcome) = self.validate() {
            return outcome;
        }
        if !confirm.confirm(CONFIRM_PROMPT) {
            self.decline();
            return SubmitOutcome::Declined;
        }

        let (ticket, payload) = match self.dispatch() {
            Ok(dispatched) => dispatched,
            Err(outcome) => return outcome,
        };
        let outcome = api.create_report(ctx, &payload).await;
        self.complete(ticket, outcome)
    }

    /// Form torn down: every later result is dropped
    pub fn detach(&mut self) {
        if !self.draft.is_pristine() {
            debug!("form torn down with an unsent draft");
        }
        self.detached = true;
        self.epoch += 1;
        self.location.invalidate();
    }

    /// Back to the initial draft. The location slot goes too so a stale
    /// position is never silently reused for the next report.
    fn reset(&mut self) {
        self.draft = ReportDraft::default();
        self.location.invalidate();
        self.epoch += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use fake::Fake;
    use hazard_domain::VerifiedReport;
    use std::cell::RefCell;

    struct ScriptedApi {
        response: Result<ReportReceipt, ApiError>,
        sent: RefCell<Vec<ReportPayload>>,
    }

    impl ScriptedApi {
        fn accepting() -> Self {
            Self {
                response: Ok(ReportReceipt::default()),
                sent: RefCell::new(Vec::new()),
            }
        }

        fn failing(err: ApiError) -> Self {
            Self {
                response: Err(err),
                sent: RefCell::new(Vec::new()),
            }
        }
    }

    #[async_trait(?Send)]
    impl ReportsApi for ScriptedApi {
        async fn create_report(
            &self,
            _ctx: &RequestContext,
            payload: &ReportPayload,
        ) -> Result<ReportReceipt, ApiError> {
            self.sent.borrow_mut().push(payload.clone());
            self.response.clone()
        }

        async fn verified_reports(
            &self,
            _ctx: &RequestContext,
        ) -> Result<Vec<VerifiedReport>, ApiError> {
            Ok(Vec::new())
        }
    }

    fn ctx() -> RequestContext {
        RequestContext::new("http://localhost:5000")
    }

    fn yes(_: &str) -> bool {
        true
    }

    fn no(_: &str) -> bool {
        false
    }

    fn filled() -> ReportSubmissionController {
        let mut controller = ReportSubmissionController::default();
        controller.set_description("Open drain near the school gate");
        controller.set_position(Position::new(23.68, 86.95));
        controller.set_image(Some(ImageAttachment::new("drain.jpg", "image/jpeg", vec![1, 2, 3])));
        controller
    }

    #[test]
    fn test_position_reads_back_unchanged() {
        let mut controller = ReportSubmissionController::default();
        for _ in 0..100 {
            let p = Position::new((-90.0_f64..90.0).fake(), (-180.0_f64..180.0).fake());
            controller.set_position(p);
            assert_eq!(controller.position(), Some(p));
        }
    }

    #[tokio::test]
    async fn test_empty_description_always_rejected() {
        let api = ScriptedApi::accepting();

        let mut controller = ReportSubmissionController::default();
        let outcome = controller.submit(&api, &ctx(), &yes).await;
        assert_eq!(outcome, SubmitOutcome::Rejected(ValidationError::DescriptionRequired));

        controller.set_position(Position::new(1.0, 1.0));
        let outcome = controller.submit(&api, &ctx(), &yes).await;
        assert_eq!(outcome, SubmitOutcome::Rejected(ValidationError::DescriptionRequired));
        assert_eq!(
            controller.state(),
            &SubmissionState::Failed("Description is required.".into())
        );
        assert!(api.sent.borrow().is_empty());
    }

    #[tokio::test]
    async fn test_missing_location_rejected() {
        let api = ScriptedApi::accepting();
        let mut controller = ReportSubmissionController::default();
        controller.set_description("pothole");

        let outcome = controller.submit(&api, &ctx(), &yes).await;
        assert_eq!(outcome, SubmitOutcome::Rejected(ValidationError::LocationRequired));
        assert!(api.sent.borrow().is_empty());
    }

    #[tokio::test]
    async fn test_declined_confirmation_sends_nothing() {
        let api = ScriptedApi::accepting();
        let mut controller = filled();
        let before = controller.draft().clone();

        let outcome = controller.submit(&api, &ctx(), &no).await;
        assert_eq!(outcome, SubmitOutcome::Declined);
        assert_eq!(controller.state(), &SubmissionState::Idle);
        assert_eq!(controller.draft(), &before);
        assert!(api.sent.borrow().is_empty());
    }

    #[tokio::test]
    async fn test_success_resets_draft() {
        let api = ScriptedApi::accepting();
        let mut controller = filled();

        let outcome = controller.submit(&api, &ctx(), &yes).await;
        assert!(matches!(outcome, SubmitOutcome::Submitted(_)));
        assert_eq!(controller.state(), &SubmissionState::Succeeded);
        assert_eq!(controller.draft(), &ReportDraft::default());
        assert_eq!(controller.location(), &GeolocationResult::Idle);

        let sent = api.sent.borrow();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].position, Position::new(23.68, 86.95));
        assert!(sent[0].image.is_some());
    }

    #[tokio::test]
    async fn test_failure_preserves_draft_and_uses_server_message() {
        let api = ScriptedApi::failing(ApiError::Status {
            status: 400,
            message: Some("Image must be under 5MB".into()),
        });
        let mut controller = filled();
        let before = controller.draft().clone();

        let outcome = controller.submit(&api, &ctx(), &yes).await;
        assert_eq!(outcome, SubmitOutcome::Failed("Image must be under 5MB".into()));
        assert_eq!(controller.draft(), &before);
        assert_eq!(
            controller.state().banner().map(|b| b.text),
            Some("Image must be under 5MB".to_string())
        );
    }

    #[tokio::test]
    async fn test_failure_without_message_uses_fallback() {
        let api = ScriptedApi::failing(ApiError::Transport("connection reset".into()));
        let mut controller = filled();

        let outcome = controller.submit(&api, &ctx(), &yes).await;
        assert_eq!(outcome, SubmitOutcome::Failed(SUBMIT_FALLBACK_MESSAGE.into()));
    }

    #[test]
    fn test_in_flight_blocks_second_submit() {
        let mut controller = filled();
        controller.validate().unwrap();
        let (ticket, _payload) = controller.dispatch().unwrap();
        assert!(!controller.can_submit());
        assert_eq!(controller.validate(), Err(SubmitOutcome::Busy));
        assert_eq!(controller.dispatch().unwrap_err(), SubmitOutcome::Busy);

        controller.complete(ticket, Ok(ReportReceipt::default()));
        assert!(controller.can_submit());
    }

    #[test]
    fn test_retry_after_failure_replaces_message() {
        let mut controller = filled();
        controller.validate().unwrap();
        let (ticket, _) = controller.dispatch().unwrap();
        controller.complete(ticket, Err(ApiError::Status { status: 500, message: None }));
        assert!(matches!(controller.state(), SubmissionState::Failed(_)));

        controller.validate().unwrap();
        assert_eq!(controller.state(), &SubmissionState::Validating);
        assert!(controller.state().banner().is_none());
    }

    #[test]
    fn test_result_after_detach_is_discarded() {
        let mut controller = filled();
        let before = controller.draft().clone();
        controller.validate().unwrap();
        let (ticket, _) = controller.dispatch().unwrap();

        controller.detach();
        assert_eq!(
            controller.complete(ticket, Ok(ReportReceipt::default())),
            SubmitOutcome::Discarded
        );
        assert_eq!(controller.draft(), &before);
    }

    #[test]
    fn test_image_read_after_reset_is_dropped() {
        let mut controller = filled();
        let pending_read = controller.begin_attach();

        controller.validate().unwrap();
        let (ticket, _) = controller.dispatch().unwrap();
        controller.complete(ticket, Ok(ReportReceipt::default()));

        let late = ImageAttachment::new("tree.jpg", "image/jpeg", vec![0xff, 0xd8]);
        assert!(!controller.finish_attach(pending_read, Some(late)));
        assert!(controller.draft().is_pristine());

        let current = controller.begin_attach();
        let photo = ImageAttachment::new("drain.png", "image/png", vec![0x89]);
        assert!(controller.finish_attach(current, Some(photo.clone())));
        assert_eq!(controller.draft().image, Some(photo));
    }

    #[test]
    fn test_image_read_after_detach_is_dropped() {
        let mut controller = ReportSubmissionController::default();
        let pending_read = controller.begin_attach();
        controller.detach();
        let photo = ImageAttachment::new("tree.jpg", "image/jpeg", vec![0xff]);
        assert!(!controller.finish_attach(pending_read, Some(photo)));
        assert!(controller.draft().image.is_none());
    }

    #[test]
    fn test_location_result_fills_position() {
        let mut controller = ReportSubmissionController::default();
        let ticket = controller.begin_locate();
        assert!(controller.location().is_pending());

        let p = Position::new(23.68, 86.95);
        assert_eq!(controller.finish_locate(ticket, Ok(p)), Some(p));
        assert_eq!(controller.position(), Some(p));
    }

    #[test]
    fn test_location_failure_keeps_existing_position() {
        let mut controller = ReportSubmissionController::default();
        let p = Position::new(23.68, 86.95);
        controller.set_position(p);

        let ticket = controller.begin_locate();
        controller.finish_locate(ticket, Err(GeolocationError::Timeout));
        assert_eq!(controller.position(), Some(p));
        assert_eq!(controller.location().error(), Some(&GeolocationError::Timeout));
    }

    #[test]
    fn test_stale_location_not_reused_after_success() {
        let mut controller = filled();
        let stale = controller.begin_locate();

        controller.validate().unwrap();
        let (ticket, _) = controller.dispatch().unwrap();
        controller.complete(ticket, Ok(ReportReceipt::default()));

        assert_eq!(controller.finish_locate(stale, Ok(Position::new(9.0, 9.0))), None);
        assert_eq!(controller.position(), None);
    }
}
