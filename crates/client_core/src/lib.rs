//! Client side of the helpdesk diagnosis flow: the HTTP exchange with the diagnosis
//! service and the submission state machine front-ends render from.

pub mod config;
pub mod error;
pub mod exchange;
pub mod render;
pub mod submission;

pub use config::{load_settings, Settings};
pub use error::{ConfigError, ExchangeError};
pub use exchange::{DiagnosisExchange, ExchangeOutcome, HttpDiagnosisExchange};
pub use render::{render, DiagnosisView};
pub use submission::{
    FormValues, Region, SubmissionController, SubmissionEvent, SubmitRejected, UiState,
};
