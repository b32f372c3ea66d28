use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info, trace, warn};

use crate::{
    config::ComparatorConfig,
    error::{CompareError, CompareResult, ValidationError, ViewError},
    payload::ComparisonPayload,
    record::RecordId,
    section::{ComparisonSection, SectionAssembler},
    view::{
        fetch::{ComparisonFetcher, FetchCompletion, PendingFetch, SessionId},
        model::ComparisonView,
        signal::{Notification, NotificationSink, ViewSignal},
        status::ViewStatus,
        subject::{SUBJECT_FIELDS, SubjectLookup, SubjectSummary},
    },
};

/// Drives one comparison view: selection, fetch, display and teardown.
///
/// All transitions are synchronous except the backend fetch. The fetch is
/// split into [`begin_compare`](Self::begin_compare), which commits the
/// controller to `Loading` and hands out a [`PendingFetch`], and
/// [`complete_fetch`](Self::complete_fetch), which applies the result. Every
/// fetch belongs to a session; leaving the session (back or close) cancels it
/// and any result that still arrives is dropped.
///
/// See [`ViewStatus`] for the transition table.
#[derive(Debug)]
pub struct ComparisonController<F, N> {
    // === Collaborators ===
    fetcher: Arc<F>,
    notifier: N,
    signals: async_channel::Sender<ViewSignal>,
    assembler: SectionAssembler,
    config: ComparatorConfig,

    // === Subject ===
    subject_id: RecordId,
    subject: SubjectSummary,

    // === Session State ===
    status: ViewStatus,
    candidate: Option<RecordId>,
    payload: Option<ComparisonPayload>,
    sections: Vec<ComparisonSection>,
    error: Option<String>,

    /// Active session. Completions tagged with any other id are stale.
    session: SessionId,

    /// Cancels the fetch of the active session, if one is in flight.
    in_flight: Option<CancellationToken>,
}

impl<F, N> ComparisonController<F, N>
where
    F: ComparisonFetcher,
    N: NotificationSink,
{
    /// Creates a controller for `subject_id` and the receiving end of its
    /// outbound signal channel.
    pub fn new(
        subject_id: impl Into<RecordId>,
        fetcher: Arc<F>,
        notifier: N,
        config: ComparatorConfig,
    ) -> (Self, async_channel::Receiver<ViewSignal>) {
        let (signals, rx) = async_channel::unbounded();
        let controller = Self {
            fetcher,
            notifier,
            signals,
            assembler: SectionAssembler::from_config(&config),
            subject: SubjectSummary::placeholder(config.subject_placeholder()),
            config,

            subject_id: subject_id.into(),

            status: ViewStatus::Idle,
            candidate: None,
            payload: None,
            sections: Vec::new(),
            error: None,
            session: SessionId::default(),
            in_flight: None,
        };
        (controller, rx)
    }

    // ========================================================================
    // Selection Step
    // ========================================================================

    /// Records `id` as the comparison candidate. A blank id clears it.
    pub fn select_target(&mut self, id: impl Into<RecordId>) -> CompareResult<()> {
        let id = id.into();
        let candidate = (!id.is_blank()).then_some(id);
        self.set_candidate(candidate)
    }

    pub fn clear_selection(&mut self) -> CompareResult<()> {
        self.set_candidate(None)
    }

    fn set_candidate(&mut self, candidate: Option<RecordId>) -> CompareResult<()> {
        self.ensure(self.status.accepts_selection(), "select a comparison target")?;

        debug!(candidate = ?candidate, "Comparison target selected");
        self.candidate = candidate.clone();
        self.status = ViewStatus::Selecting;
        self.emit(ViewSignal::SelectionChanged(candidate));
        Ok(())
    }

    /// Loads the subject's display name. Failures keep the placeholder.
    #[tracing::instrument(skip_all, fields(subject = %self.subject_id))]
    pub async fn load_subject<L: SubjectLookup>(&mut self, lookup: &L) -> &SubjectSummary {
        match lookup.lookup(&self.subject_id, &SUBJECT_FIELDS).await {
            Ok(record) => {
                self.subject =
                    SubjectSummary::from_record(&record, self.config.subject_placeholder());
            }
            Err(failure) => {
                warn!(error = %failure, "Subject lookup failed, keeping placeholder");
                self.subject = SubjectSummary::placeholder(self.config.subject_placeholder());
            }
        }
        &self.subject
    }

    // ========================================================================
    // Compare
    // ========================================================================

    /// Validates the selection and, if valid, enters `Loading`.
    ///
    /// Validation failures are reported through the notification sink and
    /// leave the view in `Selecting`. A request while a fetch is in flight is
    /// rejected without notification.
    pub fn begin_compare(&mut self) -> CompareResult<PendingFetch<F>> {
        match self.status {
            ViewStatus::Idle | ViewStatus::Selecting => {}
            ViewStatus::Loading => {
                warn!(session = %self.session, "Compare requested while a fetch is in flight");
                return Err(ViewError::FetchInFlight.into());
            }
            ViewStatus::ShowingComparison => {
                return Err(self.invalid("request a comparison"));
            }
        }

        let candidate = match self.validate_candidate() {
            Ok(candidate) => candidate,
            Err(e) => {
                warn!(error = %e, "Comparison request rejected");
                self.status = ViewStatus::Selecting;
                self.notifier.notify(Notification::error(e.to_string()));
                return Err(e.into());
            }
        };

        self.session = self.session.next();
        let cancel = CancellationToken::new();
        self.in_flight = Some(cancel.clone());
        self.error = None;
        self.status = ViewStatus::Loading;
        self.emit(ViewSignal::CompareRequested);
        info!(session = %self.session, candidate = %candidate, "Comparison requested");

        Ok(PendingFetch::new(
            self.session,
            self.subject_id.clone(),
            candidate,
            cancel,
            Arc::clone(&self.fetcher),
            self.config.fetch_timeout(),
        ))
    }

    fn validate_candidate(&self) -> Result<RecordId, ValidationError> {
        match &self.candidate {
            None => Err(ValidationError::NoCandidateSelected),
            Some(candidate) if *candidate == self.subject_id => Err(ValidationError::SameAsSubject),
            Some(candidate) => Ok(candidate.clone()),
        }
    }

    /// Applies a finished fetch.
    ///
    /// Returns `Ok(false)` when the completion belongs to a session that is no
    /// longer active; the state is left untouched. A failed fetch is reported,
    /// the view returns to `Selecting`, and the error is returned.
    pub fn complete_fetch(&mut self, completion: FetchCompletion) -> CompareResult<bool> {
        let FetchCompletion { session, outcome } = completion;
        if session != self.session || !self.status.is_loading() {
            trace!(
                stale = %session,
                active = %self.session,
                status = %self.status,
                "Discarding stale comparison response"
            );
            return Ok(false);
        }
        self.in_flight = None;

        let payload = outcome
            .map_err(CompareError::from)
            .and_then(|payload| payload.validate().map(|_| payload));

        match payload {
            Ok(payload) => {
                self.sections = self.assembler.assemble(Some(&payload));
                self.payload = Some(payload);
                self.status = ViewStatus::ShowingComparison;
                info!(session = %session, sections = self.sections.len(), "Comparison ready");
                Ok(true)
            }
            Err(e) => {
                let message = e.to_string();
                self.notifier.notify(Notification::error(message.clone()));
                self.error = Some(message);
                self.status = ViewStatus::Selecting;
                Err(e)
            }
        }
    }

    /// Validates, fetches and applies the comparison in one call.
    pub async fn request_compare(&mut self) -> CompareResult<()> {
        let pending = self.begin_compare()?;
        let completion = pending.run().await;
        self.complete_fetch(completion).map(|_| ())
    }

    // ========================================================================
    // Leaving
    // ========================================================================

    /// Returns from the comparison (or an unfinished fetch) to a fresh selection.
    pub fn go_back(&mut self) -> CompareResult<()> {
        self.ensure(
            matches!(
                self.status,
                ViewStatus::Loading | ViewStatus::ShowingComparison
            ),
            "go back",
        )?;

        self.teardown();
        self.status = ViewStatus::Selecting;
        debug!(session = %self.session, "Back to selection");
        self.emit(ViewSignal::BackRequested);
        Ok(())
    }

    /// Asks the host to dismiss the view. Valid from any state.
    pub fn close(&mut self) {
        self.teardown();
        self.status = ViewStatus::Idle;
        debug!(session = %self.session, "View closed");
        self.emit(ViewSignal::CloseRequested);
    }

    /// Abandons the selection step; behaves like [`close`](Self::close).
    pub fn cancel(&mut self) -> CompareResult<()> {
        self.ensure(self.status.accepts_selection(), "cancel")?;
        self.emit(ViewSignal::CancelRequested);
        self.close();
        Ok(())
    }

    /// Ends the active session: later completions for it are ignored.
    fn teardown(&mut self) {
        self.session = self.session.next();
        if let Some(cancel) = self.in_flight.take() {
            cancel.cancel();
        }
        self.candidate = None;
        self.payload = None;
        self.sections.clear();
        self.error = None;
    }

    // ========================================================================
    // Helpers
    // ========================================================================

    fn emit(&self, signal: ViewSignal) {
        if let Err(e) = self.signals.try_send(signal) {
            trace!(error = %e, "View signal dropped, host is gone");
        }
    }

    fn ensure(&self, allowed: bool, action: &'static str) -> CompareResult<()> {
        if allowed {
            Ok(())
        } else {
            Err(self.invalid(action))
        }
    }

    fn invalid(&self, action: &'static str) -> CompareError {
        debug!(status = %self.status, action, "Rejected view transition");
        ViewError::InvalidTransition {
            from: self.status,
            action,
        }
        .into()
    }
}

// ================================================================================================
// Accessors
// ================================================================================================

impl<F, N> ComparisonController<F, N> {
    pub fn status(&self) -> ViewStatus {
        self.status
    }

    pub fn subject_id(&self) -> &RecordId {
        &self.subject_id
    }

    pub fn subject(&self) -> &SubjectSummary {
        &self.subject
    }

    pub fn candidate(&self) -> Option<&RecordId> {
        self.candidate.as_ref()
    }

    pub fn payload(&self) -> Option<&ComparisonPayload> {
        self.payload.as_ref()
    }

    pub fn sections(&self) -> &[ComparisonSection] {
        &self.sections
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn session(&self) -> SessionId {
        self.session
    }

    pub fn config(&self) -> &ComparatorConfig {
        &self.config
    }

    /// Snapshot for the presentation layer.
    pub fn view(&self) -> ComparisonView {
        ComparisonView {
            status: self.status,
            subject_name: self.subject.name.clone(),
            subject_number: self.subject.number.clone(),
            comparison_label: self.config.comparison_label().to_string(),
            quote1_name: self.config.quote1_name().to_string(),
            quote2_name: self.config.quote2_name().to_string(),
            candidate_id: self.candidate.as_ref().map(|c| c.to_string()),
            sections: self.sections.clone(),
            error: self.error.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use serde_json::json;

    use super::*;
    use crate::{
        error::FetchError,
        record::RawRecord,
        view::{fetch::FetchFailure, signal::Severity},
    };

    // ============================================================================
    // Fixtures
    // ============================================================================

    #[derive(Default)]
    struct Recorder(Mutex<Vec<Notification>>);

    impl NotificationSink for Arc<Recorder> {
        fn notify(&self, notification: Notification) {
            self.0.lock().expect("poisoned").push(notification);
        }
    }

    impl Recorder {
        fn messages(&self) -> Vec<String> {
            self.0
                .lock()
                .expect("poisoned")
                .iter()
                .map(|n| n.message.clone())
                .collect()
        }
    }

    #[derive(Debug)]
    struct StubFetcher {
        result: Result<ComparisonPayload, FetchFailure>,
        calls: Mutex<Vec<(RecordId, RecordId)>>,
    }

    impl StubFetcher {
        fn ok(payload: ComparisonPayload) -> Arc<Self> {
            Arc::new(Self {
                result: Ok(payload),
                calls: Mutex::new(Vec::new()),
            })
        }

        fn failing(failure: FetchFailure) -> Arc<Self> {
            Arc::new(Self {
                result: Err(failure),
                calls: Mutex::new(Vec::new()),
            })
        }

        fn call_count(&self) -> usize {
            self.calls.lock().expect("poisoned").len()
        }
    }

    impl ComparisonFetcher for StubFetcher {
        async fn fetch_comparison(
            &self,
            subject: &RecordId,
            candidate: &RecordId,
        ) -> Result<ComparisonPayload, FetchFailure> {
            self.calls
                .lock()
                .expect("poisoned")
                .push((subject.clone(), candidate.clone()));
            self.result.clone()
        }
    }

    fn sample_payload() -> ComparisonPayload {
        serde_json::from_value(json!({
            "sectionOrder": ["Quote", "QuoteLineItem"],
            "quote1Data": {
                "Quote": {
                    "objectLabel": "Quote",
                    "record": { "Name": "Q-1", "GrandTotal": 1500.5 },
                    "fields": [
                        { "apiName": "Name", "label": "Name", "type": "string" },
                        { "apiName": "GrandTotal", "label": "Grand Total", "type": "currency" }
                    ]
                }
            },
            "quote2Data": {
                "Quote": { "objectLabel": "Quote", "record": { "Name": "Q-2", "GrandTotal": 10 } }
            }
        }))
        .expect("fixture should decode")
    }

    type Controller = ComparisonController<StubFetcher, Arc<Recorder>>;

    fn controller(
        fetcher: Arc<StubFetcher>,
    ) -> (Controller, Arc<Recorder>, async_channel::Receiver<ViewSignal>) {
        let recorder = Arc::new(Recorder::default());
        let (controller, rx) = ComparisonController::new(
            "0Q0SUBJECT",
            fetcher,
            Arc::clone(&recorder),
            ComparatorConfig::default(),
        );
        (controller, recorder, rx)
    }

    fn drain(rx: &async_channel::Receiver<ViewSignal>) -> Vec<ViewSignal> {
        std::iter::from_fn(|| rx.try_recv().ok()).collect()
    }

    // ============================================================================
    // Tests
    // ============================================================================

    #[test]
    fn test_select_target_stores_candidate_and_signals() {
        let (mut c, _, rx) = controller(StubFetcher::ok(sample_payload()));
        assert_eq!(c.status(), ViewStatus::Idle);

        c.select_target("0Q0OTHER").expect("selection is allowed");
        assert_eq!(c.status(), ViewStatus::Selecting);
        assert_eq!(c.candidate(), Some(&RecordId::from("0Q0OTHER")));

        c.select_target("").expect("clearing is allowed");
        assert_eq!(c.candidate(), None);

        assert_eq!(
            drain(&rx),
            vec![
                ViewSignal::SelectionChanged(Some(RecordId::from("0Q0OTHER"))),
                ViewSignal::SelectionChanged(None),
            ]
        );
    }

    #[tokio::test]
    async fn test_compare_without_candidate_is_rejected() {
        let fetcher = StubFetcher::ok(sample_payload());
        let (mut c, recorder, _rx) = controller(Arc::clone(&fetcher));

        let err = c.request_compare().await.unwrap_err();
        assert!(matches!(
            err,
            CompareError::Validation(ValidationError::NoCandidateSelected)
        ));
        assert_eq!(c.status(), ViewStatus::Selecting);
        assert_eq!(fetcher.call_count(), 0);
        assert_eq!(recorder.messages(), ["Please select a comparison quote."]);
        let notification = &recorder.0.lock().expect("poisoned")[0];
        assert_eq!(notification.title, "Error");
        assert_eq!(notification.severity, Severity::Error);
    }

    #[tokio::test]
    async fn test_compare_with_subject_itself_is_rejected() {
        let fetcher = StubFetcher::ok(sample_payload());
        let (mut c, recorder, _rx) = controller(Arc::clone(&fetcher));
        c.select_target("0Q0SUBJECT").expect("selection is allowed");

        let err = c.request_compare().await.unwrap_err();
        assert!(matches!(
            err,
            CompareError::Validation(ValidationError::SameAsSubject)
        ));
        assert_eq!(c.status(), ViewStatus::Selecting);
        assert_eq!(fetcher.call_count(), 0);
        assert_eq!(
            recorder.messages(),
            ["Please select a different quote for comparison."]
        );
    }

    #[tokio::test]
    async fn test_successful_compare_shows_sections() {
        let fetcher = StubFetcher::ok(sample_payload());
        let (mut c, recorder, rx) = controller(Arc::clone(&fetcher));
        c.select_target("0Q0OTHER").expect("selection is allowed");

        c.request_compare().await.expect("compare should succeed");

        assert_eq!(c.status(), ViewStatus::ShowingComparison);
        assert_eq!(c.sections().len(), 2);
        assert_eq!(c.sections()[0].quote1_fields()[1].formatted_value, "$1,500.50");
        assert_eq!(c.sections()[0].quote2_fields()[1].formatted_value, "$10.00");
        assert_eq!(c.sections()[1].object_label, "Unknown Object");
        assert!(c.payload().is_some());
        assert!(recorder.messages().is_empty());
        assert_eq!(
            fetcher.calls.lock().expect("poisoned").as_slice(),
            [(RecordId::from("0Q0SUBJECT"), RecordId::from("0Q0OTHER"))]
        );
        assert!(drain(&rx).contains(&ViewSignal::CompareRequested));

        let view = c.view();
        assert!(view.show_comparison());
        assert!(view.has_sections());
        assert!(!view.is_loading());
    }

    #[tokio::test]
    async fn test_failed_compare_returns_to_selection() {
        let fetcher = StubFetcher::failing(FetchFailure::with_body("Server Error", "Quote not found"));
        let (mut c, recorder, _rx) = controller(fetcher);
        c.select_target("0Q0OTHER").expect("selection is allowed");

        let err = c.request_compare().await.unwrap_err();
        assert!(matches!(
            err,
            CompareError::Fetch(FetchError::Backend(ref m)) if m == "Quote not found"
        ));
        assert_eq!(c.status(), ViewStatus::Selecting);
        assert_eq!(c.error(), Some("Quote not found"));
        assert_eq!(c.candidate(), Some(&RecordId::from("0Q0OTHER")));
        assert_eq!(recorder.messages(), ["Quote not found"]);
        assert!(c.sections().is_empty());
    }

    #[tokio::test]
    async fn test_invalid_payload_is_reported_as_fetch_failure() {
        let mut payload = sample_payload();
        payload.section_order.push("Quote".to_string());
        let (mut c, recorder, _rx) = controller(StubFetcher::ok(payload));
        c.select_target("0Q0OTHER").expect("selection is allowed");

        assert!(c.request_compare().await.is_err());
        assert_eq!(c.status(), ViewStatus::Selecting);
        assert_eq!(
            recorder.messages(),
            ["Duplicate section key in section order: 'Quote'"]
        );
    }

    #[test]
    fn test_second_compare_while_loading_is_rejected() {
        let fetcher = StubFetcher::ok(sample_payload());
        let (mut c, recorder, _rx) = controller(Arc::clone(&fetcher));
        c.select_target("0Q0OTHER").expect("selection is allowed");

        let _pending = c.begin_compare().expect("first compare starts");
        let err = c.begin_compare().unwrap_err();
        assert!(matches!(err, CompareError::View(ViewError::FetchInFlight)));
        assert_eq!(c.status(), ViewStatus::Loading);
        assert!(recorder.messages().is_empty());
    }

    #[tokio::test]
    async fn test_go_back_clears_session() {
        let (mut c, _, rx) = controller(StubFetcher::ok(sample_payload()));
        c.select_target("0Q0OTHER").expect("selection is allowed");
        c.request_compare().await.expect("compare should succeed");

        c.go_back().expect("back is allowed from the comparison");
        assert_eq!(c.status(), ViewStatus::Selecting);
        assert!(c.payload().is_none());
        assert!(c.sections().is_empty());
        assert!(c.candidate().is_none());
        assert!(c.error().is_none());
        assert!(!c.view().has_sections());
        assert_eq!(drain(&rx).last(), Some(&ViewSignal::BackRequested));
    }

    #[tokio::test]
    async fn test_late_response_after_go_back_is_discarded() {
        let (mut c, recorder, _rx) = controller(StubFetcher::ok(sample_payload()));
        c.select_target("0Q0OTHER").expect("selection is allowed");

        let pending = c.begin_compare().expect("compare starts");
        let stale_session = pending.session();
        c.go_back().expect("back is allowed while loading");

        let completion = FetchCompletion {
            session: stale_session,
            outcome: Ok(sample_payload()),
        };
        assert!(!c.complete_fetch(completion).expect("stale completions are not errors"));
        assert_eq!(c.status(), ViewStatus::Selecting);
        assert!(c.sections().is_empty());
        assert!(recorder.messages().is_empty());
    }

    #[tokio::test]
    async fn test_late_response_after_reselect_does_not_hijack_new_session() {
        let (mut c, _, _rx) = controller(StubFetcher::ok(sample_payload()));
        c.select_target("0Q0OTHER").expect("selection is allowed");
        let stale = c.begin_compare().expect("first compare starts");
        c.go_back().expect("back while loading");

        c.select_target("0Q0THIRD").expect("selection is allowed");
        let fresh = c.begin_compare().expect("second compare starts");

        let stale_completion = stale.run().await;
        assert_eq!(stale_completion.outcome(), &Err(FetchError::Cancelled));
        assert!(!c.complete_fetch(stale_completion).expect("discarded"));
        assert_eq!(c.status(), ViewStatus::Loading);

        let fresh_completion = fresh.run().await;
        assert!(c.complete_fetch(fresh_completion).expect("applied"));
        assert_eq!(c.status(), ViewStatus::ShowingComparison);
    }

    #[tokio::test]
    async fn test_late_failure_after_close_is_silent() {
        let (mut c, recorder, rx) =
            controller(StubFetcher::failing(FetchFailure::new("Network error")));
        c.select_target("0Q0OTHER").expect("selection is allowed");

        let pending = c.begin_compare().expect("compare starts");
        c.close();
        let completion = pending.run().await;

        assert!(!c.complete_fetch(completion).expect("discarded"));
        assert_eq!(c.status(), ViewStatus::Idle);
        assert!(c.error().is_none());
        assert!(recorder.messages().is_empty());
        assert_eq!(drain(&rx).last(), Some(&ViewSignal::CloseRequested));
    }

    #[test]
    fn test_cancel_from_selection_closes() {
        let (mut c, _, rx) = controller(StubFetcher::ok(sample_payload()));
        c.select_target("0Q0OTHER").expect("selection is allowed");

        c.cancel().expect("cancel is allowed while selecting");
        assert_eq!(c.status(), ViewStatus::Idle);
        assert!(c.candidate().is_none());

        let signals = drain(&rx);
        assert_eq!(
            &signals[signals.len() - 2..],
            [ViewSignal::CancelRequested, ViewSignal::CloseRequested]
        );
    }

    #[test]
    fn test_invalid_transitions_are_rejected() {
        let (mut c, _, _rx) = controller(StubFetcher::ok(sample_payload()));

        let err = c.go_back().unwrap_err();
        assert!(matches!(
            err,
            CompareError::View(ViewError::InvalidTransition {
                from: ViewStatus::Idle,
                ..
            })
        ));

        c.select_target("0Q0OTHER").expect("selection is allowed");
        let _pending = c.begin_compare().expect("compare starts");
        assert!(c.select_target("0Q0THIRD").is_err());
        assert!(c.cancel().is_err());
        assert_eq!(c.candidate(), Some(&RecordId::from("0Q0OTHER")));
    }

    #[test]
    fn test_dropped_signal_receiver_is_not_an_error() {
        let (mut c, _, rx) = controller(StubFetcher::ok(sample_payload()));
        drop(rx);
        c.select_target("0Q0OTHER").expect("selection still works");
        c.close();
        assert_eq!(c.status(), ViewStatus::Idle);
    }

    struct Lookup(Result<RawRecord, FetchFailure>);

    impl SubjectLookup for Lookup {
        async fn lookup(&self, id: &RecordId, fields: &[&str]) -> Result<RawRecord, FetchFailure> {
            assert_eq!(id.as_str(), "0Q0SUBJECT");
            assert_eq!(fields, SUBJECT_FIELDS);
            self.0.clone()
        }
    }

    #[tokio::test]
    async fn test_load_subject() {
        let (mut c, _, _rx) = controller(StubFetcher::ok(sample_payload()));
        assert_eq!(c.subject().name, "Current Quote");

        let record = json!({ "Name": "Acme Renewal", "QuoteNumber": "00000042" });
        let lookup = Lookup(Ok(record.as_object().cloned().expect("object fixture")));
        let subject = c.load_subject(&lookup).await;
        assert_eq!(subject.name, "Acme Renewal");
        assert_eq!(c.view().subject_number, "00000042");
    }

    #[tokio::test]
    async fn test_load_subject_failure_keeps_placeholder() {
        let (mut c, _, _rx) = controller(StubFetcher::ok(sample_payload()));
        let lookup = Lookup(Err(FetchFailure::new("No access")));
        let subject = c.load_subject(&lookup).await;
        assert_eq!(subject, &SubjectSummary::placeholder("Current Quote"));
    }
}
