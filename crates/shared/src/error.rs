use thiserror::Error;

/// Client-side checks applied to a submission before it is sent.
///
/// These are advisory; the diagnosis service remains the authority on what it accepts.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please describe the issue before submitting")]
    EmptyIssue,
}
