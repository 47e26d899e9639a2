//! Location capture through submission, with in-memory collaborators.

use std::cell::RefCell;
use std::future::pending;
use std::rc::Rc;

use async_trait::async_trait;
use hazard_client::api::{ReportPayload, ReportReceipt, ReportsApi};
use hazard_client::config::PICKER_ZOOM;
use hazard_client::context::StaticCredential;
use hazard_client::domain::{
    GeolocationError, GeolocationResult, Position, ReportDraft, SubmissionState, VerifiedReport,
};
use hazard_client::error::ApiError;
use hazard_client::geolocation::{LocationSource, PositionOptions};
use hazard_client::{MapCommand, MapPositionSync, ReportSubmissionController, RequestContext, SubmitOutcome};

struct Device(Position);

#[async_trait(?Send)]
impl LocationSource for Device {
    async fn current_position(
        &self,
        options: &PositionOptions,
    ) -> Result<Position, GeolocationError> {
        assert!(options.enable_high_accuracy);
        Ok(self.0)
    }
}

#[derive(Default)]
struct RecordingBackend {
    received: RefCell<Vec<(Option<String>, ReportPayload)>>,
}

#[async_trait(?Send)]
impl ReportsApi for RecordingBackend {
    async fn create_report(
        &self,
        ctx: &RequestContext,
        payload: &ReportPayload,
    ) -> Result<ReportReceipt, ApiError> {
        self.received
            .borrow_mut()
            .push((ctx.authorization(), payload.clone()));
        Ok(ReportReceipt {
            id: Some("66f1c0".into()),
            message: None,
        })
    }

    async fn verified_reports(&self, _ctx: &RequestContext) -> Result<Vec<VerifiedReport>, ApiError> {
        Ok(Vec::new())
    }
}

#[tokio::test]
async fn test_locate_drag_submit_reset() {
    let controller = Rc::new(RefCell::new(ReportSubmissionController::new(PositionOptions::default())));
    let backend = RecordingBackend::default();
    let ctx = RequestContext::from_store(
        "http://localhost:5000",
        &StaticCredential(Some("session-token".into())),
    );

    let sink = Rc::clone(&controller);
    let mut map = MapPositionSync::new(PICKER_ZOOM, move |p| sink.borrow_mut().set_position(p));

    // map mounted before any position exists
    assert_eq!(map.sync(controller.borrow().position()), None);

    // device resolves
    let acquired = Position::new(23.68, 86.95);
    {
        let mut form = controller.borrow_mut();
        let result = form.locate(&Device(acquired), pending()).await;
        assert_eq!(result, &GeolocationResult::Success(acquired));
    }

    // map recenters on the committed value
    assert_eq!(
        map.sync(controller.borrow().position()),
        Some(MapCommand::SetView { center: acquired, zoom: PICKER_ZOOM })
    );

    // drag and release
    let dragged = Position::new(23.70, 86.96);
    map.drag_end(dragged);
    assert_eq!(controller.borrow().position(), Some(dragged));
    assert_eq!(map.sync(controller.borrow().position()), None);

    // submit
    let mut form = controller.borrow_mut();
    form.set_description("pothole");
    form.validate().unwrap();
    let (ticket, payload) = form.dispatch().unwrap();
    assert_eq!(form.state(), &SubmissionState::InFlight);
    assert!(!form.can_submit());

    let outcome = backend.create_report(&ctx, &payload).await;
    assert!(matches!(form.complete(ticket, outcome), SubmitOutcome::Submitted(_)));

    assert_eq!(form.draft(), &ReportDraft::default());
    assert_eq!(form.position(), None);
    assert_eq!(form.state(), &SubmissionState::Succeeded);
    drop(form);

    let received = backend.received.borrow();
    assert_eq!(received.len(), 1);
    let (auth, sent) = &received[0];
    assert_eq!(auth.as_deref(), Some("Bearer session-token"));
    assert_eq!(sent.description, "pothole");
    assert_eq!(sent.position, dragged);
    let fields = sent.text_fields();
    assert_eq!(fields[1], ("latitude", "23.7".to_string()));
    assert_eq!(fields[2], ("longitude", "86.96".to_string()));
}

#[tokio::test]
async fn test_failed_submission_keeps_everything() {
    struct Rejecting;

    #[async_trait(?Send)]
    impl ReportsApi for Rejecting {
        async fn create_report(
            &self,
            _ctx: &RequestContext,
            _payload: &ReportPayload,
        ) -> Result<ReportReceipt, ApiError> {
            Err(ApiError::Status {
                status: 503,
                message: None,
            })
        }

        async fn verified_reports(&self, _ctx: &RequestContext) -> Result<Vec<VerifiedReport>, ApiError> {
            Ok(Vec::new())
        }
    }

    let mut form = ReportSubmissionController::default();
    form.locate(&Device(Position::new(23.68, 86.95)), pending()).await;
    form.set_description("Collapsed footbridge railing");
    let before = form.draft().clone();

    let ctx = RequestContext::new("http://localhost:5000");
    let outcome = form.submit(&Rejecting, &ctx, &|_: &str| true).await;

    assert_eq!(outcome, SubmitOutcome::Failed("Failed to submit.".into()));
    assert_eq!(form.draft(), &before);
    assert!(form.can_submit());
}
