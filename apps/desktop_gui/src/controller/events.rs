//! Events delivered from the backend worker to the UI thread.

use client_core::ExchangeOutcome;

pub enum UiEvent {
    Info(String),
    BackendUnavailable(String),
    DiagnosisFinished(ExchangeOutcome),
}
