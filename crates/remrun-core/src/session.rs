//! Execution state machine
//!
//! Sequences one execution attempt through its phases and exposes the
//! current phase and latest output to frontends. The state lives behind a
//! shared handle so a UI can inspect it while a run is in flight; phase
//! transitions are additionally emitted on an optional event channel.
//!
//! A session is busy from the moment a run is admitted until that run
//! reaches `Complete` or `Failed` — the busy window covers both the
//! submission call and the whole poll loop, so a second submission can never
//! race an outstanding poll loop through this API. Only the latest output is
//! retained; there is no execution history.

use std::sync::{Arc, Mutex};

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::catalog::LanguageCatalog;
use crate::clients::{PollingClient, SubmissionClient};
use crate::config::RunnerConfig;
use crate::correlator::RequestId;
use crate::errors::ExecutionError;
use crate::protocol::ExecutionRequest;

/// Phase of the current (or most recent) execution attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionPhase {
    /// No request outstanding; submit permitted.
    Idle,
    /// Request id issued, bodies encoded, submission call in flight.
    Submitting,
    /// Submission acknowledged; poll loop active.
    Polling,
    /// Output populated from a successful poll.
    Complete,
    /// A submission or polling error terminated the attempt.
    Failed,
}

/// Notifications emitted while a run progresses.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    PhaseChanged(ExecutionPhase),
    OutputReady(String),
    ExecutionFailed(String),
}

struct SessionState {
    phase: ExecutionPhase,
    output: Option<String>,
    active_request: Option<RequestId>,
    cancel: Option<CancellationToken>,
}

/// Drives one execution at a time against the configured backend.
///
/// Cloning yields another handle onto the same state, so one handle can run
/// while another observes `phase()` or calls `cancel()`.
#[derive(Clone)]
pub struct ExecutionSession {
    catalog: LanguageCatalog,
    submission: SubmissionClient,
    polling: PollingClient,
    state: Arc<Mutex<SessionState>>,
    events: Option<mpsc::UnboundedSender<SessionEvent>>,
}

impl ExecutionSession {
    pub fn new(config: &RunnerConfig) -> Result<Self, ExecutionError> {
        config.validate()?;
        let catalog = LanguageCatalog::builtin();
        catalog.validate()?;

        Ok(ExecutionSession {
            catalog,
            submission: SubmissionClient::new(&config.submission_url)
                .with_timeout(config.request_timeout()),
            polling: PollingClient::new(&config.result_url)
                .with_timeout(config.request_timeout())
                .with_interval(config.poll_interval())
                .with_max_attempts(config.max_poll_attempts),
            state: Arc::new(Mutex::new(SessionState {
                phase: ExecutionPhase::Idle,
                output: None,
                active_request: None,
                cancel: None,
            })),
            events: None,
        })
    }

    /// Attach a channel that receives phase transitions and terminal events.
    pub fn with_events(mut self, events: mpsc::UnboundedSender<SessionEvent>) -> Self {
        self.events = Some(events);
        self
    }

    pub fn catalog(&self) -> &LanguageCatalog {
        &self.catalog
    }

    pub fn phase(&self) -> ExecutionPhase {
        self.state.lock().unwrap().phase
    }

    /// Latest displayed output: execution output after a completed run,
    /// error text after a failed one.
    pub fn output(&self) -> Option<String> {
        self.state.lock().unwrap().output.clone()
    }

    pub fn active_request(&self) -> Option<RequestId> {
        self.state.lock().unwrap().active_request.clone()
    }

    /// Submission is admitted in `Idle`, `Complete`, and `Failed`, and
    /// refused for the whole Submitting + Polling window.
    pub fn submit_allowed(&self) -> bool {
        matches!(
            self.phase(),
            ExecutionPhase::Idle | ExecutionPhase::Complete | ExecutionPhase::Failed
        )
    }

    /// Abort the outstanding poll loop, if any. The running `execute` call
    /// observes the cancellation and moves the session to `Failed`.
    pub fn cancel(&self) {
        let state = self.state.lock().unwrap();
        if let Some(cancel) = &state.cancel {
            cancel.cancel();
        }
    }

    /// Run one execution attempt to a terminal phase.
    ///
    /// Validation failures (unknown language, empty code, session busy) are
    /// rejected before any network call and leave the session state
    /// untouched. Transport failures mark the session `Failed` with the
    /// user-facing error text in the output slot; a submission failure never
    /// triggers a poll, and a polling failure never re-submits.
    pub async fn execute(
        &self,
        language_id: u32,
        source_code: &str,
        stdin: &str,
    ) -> Result<String, ExecutionError> {
        let language = self.catalog.find(language_id)?.clone();
        if source_code.trim().is_empty() {
            return Err(ExecutionError::ValidationError(
                "Code body is empty".to_string(),
            ));
        }

        let (request_id, cancel) = self.admit()?;
        let request = ExecutionRequest::encode(request_id.clone(), language.id, source_code, stdin);
        log::info!(
            "Submitting {} ({}) as request {}",
            language.file_name,
            language.name,
            request_id
        );

        if let Err(err) = self.submission.submit(&request).await {
            return Err(self.fail(err));
        }

        self.set_phase(ExecutionPhase::Polling);

        match self.polling.poll_until_ready(&request_id, &cancel).await {
            Ok(result) => Ok(self.complete(result.output)),
            Err(err) => Err(self.fail(err)),
        }
    }

    fn admit(&self) -> Result<(RequestId, CancellationToken), ExecutionError> {
        let mut state = self.state.lock().unwrap();

        match state.phase {
            ExecutionPhase::Submitting | ExecutionPhase::Polling => {
                return Err(ExecutionError::ValidationError(
                    "An execution is already in flight".to_string(),
                ));
            }
            ExecutionPhase::Complete | ExecutionPhase::Failed => {
                // A terminal session passes back through Idle on resubmit.
                state.phase = ExecutionPhase::Idle;
                self.send_event(SessionEvent::PhaseChanged(ExecutionPhase::Idle));
            }
            ExecutionPhase::Idle => {}
        }

        // An abandoned handle may still own a poll loop; cut it loose
        // before this attempt starts.
        if let Some(previous) = state.cancel.take() {
            previous.cancel();
        }

        let request_id = RequestId::generate();
        let cancel = CancellationToken::new();
        state.phase = ExecutionPhase::Submitting;
        state.output = None;
        state.active_request = Some(request_id.clone());
        state.cancel = Some(cancel.clone());
        self.send_event(SessionEvent::PhaseChanged(ExecutionPhase::Submitting));

        Ok((request_id, cancel))
    }

    fn set_phase(&self, phase: ExecutionPhase) {
        self.state.lock().unwrap().phase = phase;
        self.send_event(SessionEvent::PhaseChanged(phase));
    }

    fn complete(&self, output: String) -> String {
        {
            let mut state = self.state.lock().unwrap();
            state.phase = ExecutionPhase::Complete;
            state.output = Some(output.clone());
            state.active_request = None;
            state.cancel = None;
        }
        self.send_event(SessionEvent::PhaseChanged(ExecutionPhase::Complete));
        self.send_event(SessionEvent::OutputReady(output.clone()));
        output
    }

    fn fail(&self, err: ExecutionError) -> ExecutionError {
        let text = err.display_text();
        {
            let mut state = self.state.lock().unwrap();
            state.phase = ExecutionPhase::Failed;
            state.output = Some(text.clone());
            state.active_request = None;
            state.cancel = None;
        }
        log::warn!("Execution failed: {}", text);
        self.send_event(SessionEvent::PhaseChanged(ExecutionPhase::Failed));
        self.send_event(SessionEvent::ExecutionFailed(text));
        err
    }

    fn send_event(&self, event: SessionEvent) {
        if let Some(events) = &self.events {
            // A dropped receiver only means nobody is watching.
            let _ = events.send(event);
        }
    }
}
