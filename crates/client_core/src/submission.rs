//! Submission state machine: what the user sees while a diagnosis is requested.

use std::mem;

use shared::{
    error::ValidationError,
    protocol::{DiagnosisResult, SubmissionRequest},
};
use thiserror::Error;
use tracing::{debug, warn};

use crate::{
    error::ExchangeError,
    exchange::{DiagnosisExchange, ExchangeOutcome},
    render::{render, DiagnosisView},
};

const ERROR_PREFIX: &str = "Error: ";

/// Raw form input. Absent fields are empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormValues {
    pub username: String,
    pub issue: String,
}

impl FormValues {
    pub fn new(username: impl Into<String>, issue: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            issue: issue.into(),
        }
    }
}

/// Exactly one of these is shown at any time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum UiState {
    #[default]
    Idle,
    Loading,
    Result(DiagnosisResult),
    Error(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionEvent {
    Submitted,
    Rejected(String),
    Succeeded(DiagnosisResult),
    Failed(String),
}

/// The visibility region a state occupies; `Idle` occupies none.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Region {
    LoadingIndicator,
    ErrorBanner,
    ResultPanel,
}

impl UiState {
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Loading => "loading",
            Self::Result(_) => "result",
            Self::Error(_) => "error",
        }
    }

    pub fn visible_region(&self) -> Option<Region> {
        match self {
            Self::Idle => None,
            Self::Loading => Some(Region::LoadingIndicator),
            Self::Error(_) => Some(Region::ErrorBanner),
            Self::Result(_) => Some(Region::ResultPanel),
        }
    }

    /// Pure transition function.
    ///
    /// A submit while loading is suppressed, and outcomes arriving outside `Loading` are
    /// stale and leave the state untouched.
    pub fn transition(self, event: SubmissionEvent) -> Self {
        match (self, event) {
            (Self::Loading, SubmissionEvent::Submitted | SubmissionEvent::Rejected(_)) => {
                Self::Loading
            }
            (_, SubmissionEvent::Submitted) => Self::Loading,
            (_, SubmissionEvent::Rejected(reason)) => Self::Error(error_message(&reason)),
            (Self::Loading, SubmissionEvent::Succeeded(result)) => Self::Result(result),
            (Self::Loading, SubmissionEvent::Failed(description)) => {
                Self::Error(error_message(&description))
            }
            (state, _) => state,
        }
    }
}

fn error_message(description: &str) -> String {
    format!("{ERROR_PREFIX}{description}")
}

fn apply(state: &mut UiState, event: SubmissionEvent) {
    let previous = mem::take(state);
    let from = previous.name();
    *state = previous.transition(event);
    debug!(from, to = state.name(), "submission state transition");
}

fn outcome_event(outcome: ExchangeOutcome) -> SubmissionEvent {
    match outcome {
        Ok(result) => SubmissionEvent::Succeeded(result),
        Err(err) => SubmissionEvent::Failed(err.to_string()),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmitRejected {
    #[error("a submission is already in flight")]
    AlreadyInFlight,
    #[error(transparent)]
    Invalid(#[from] ValidationError),
}

/// Holds the state in `Loading` for the lifetime of one exchange.
///
/// Dropping it without settling (a cancelled future, a panic) moves the state to an
/// interrupted error so the form is never left disabled.
struct InFlight<'a> {
    state: &'a mut UiState,
}

impl<'a> InFlight<'a> {
    fn acquire(state: &'a mut UiState) -> Self {
        apply(state, SubmissionEvent::Submitted);
        Self { state }
    }

    fn settle(self, outcome: ExchangeOutcome) {
        apply(self.state, outcome_event(outcome));
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if self.state.is_loading() {
            warn!("submission dropped before the exchange settled");
            apply(
                self.state,
                SubmissionEvent::Failed(ExchangeError::Interrupted.to_string()),
            );
        }
    }
}

/// Sole writer of the [`UiState`].
#[derive(Debug, Default)]
pub struct SubmissionController {
    state: UiState,
}

impl SubmissionController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &UiState {
        &self.state
    }

    /// The submit affordance is enabled exactly when nothing is in flight.
    pub fn submit_enabled(&self) -> bool {
        !self.state.is_loading()
    }

    pub fn view(&self) -> Option<DiagnosisView> {
        match &self.state {
            UiState::Result(result) => Some(render(result)),
            _ => None,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match &self.state {
            UiState::Error(message) => Some(message),
            _ => None,
        }
    }

    /// Validates the form and enters `Loading`, returning the request to dispatch.
    ///
    /// For callers that run the exchange elsewhere and report back through
    /// [`SubmissionController::settle`].
    pub fn begin(&mut self, form: FormValues) -> Result<SubmissionRequest, SubmitRejected> {
        let request = self.prepare(form)?;
        apply(&mut self.state, SubmissionEvent::Submitted);
        Ok(request)
    }

    pub fn settle(&mut self, outcome: ExchangeOutcome) {
        if !self.state.is_loading() {
            warn!(
                state = self.state.name(),
                "ignoring diagnosis outcome with no submission in flight"
            );
            return;
        }
        apply(&mut self.state, outcome_event(outcome));
    }

    /// Runs one full submission against `exchange` and returns the settled state.
    pub async fn submit<E>(&mut self, exchange: &E, form: FormValues) -> &UiState
    where
        E: DiagnosisExchange + ?Sized,
    {
        let request = match self.prepare(form) {
            Ok(request) => request,
            Err(rejected) => {
                debug!("submission not dispatched: {rejected}");
                return &self.state;
            }
        };

        let in_flight = InFlight::acquire(&mut self.state);
        let outcome = exchange.diagnose(&request).await;
        in_flight.settle(outcome);

        &self.state
    }

    fn prepare(&mut self, form: FormValues) -> Result<SubmissionRequest, SubmitRejected> {
        if self.state.is_loading() {
            return Err(SubmitRejected::AlreadyInFlight);
        }

        let request = SubmissionRequest::new(form.username, form.issue);
        if let Err(err) = request.validate() {
            apply(&mut self.state, SubmissionEvent::Rejected(err.to_string()));
            return Err(err.into());
        }
        Ok(request)
    }
}

#[cfg(test)]
#[path = "tests/submission_tests.rs"]
mod tests;
