//! Placeholder substitution for displaying a diagnosis.

use shared::protocol::DiagnosisResult;

// Shown in place of a missing or falsy field. The ticket fallback follows the `#`.
pub const NO_DIAGNOSIS: &str = "No diagnosis available";
pub const NO_COMMAND: &str = "No command executed";
pub const NO_OUTPUT: &str = "No command output";
pub const NO_FIX: &str = "No fix suggested";
pub const UNASSIGNED_TICKET: &str = "unassigned";

/// Display text for the five result regions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagnosisView {
    pub diagnosis: String,
    pub executed_command: String,
    pub command_output: String,
    pub suggested_fix: String,
    pub ticket: String,
}

pub fn render(result: &DiagnosisResult) -> DiagnosisView {
    let ticket = match &result.ticket_id {
        Some(id) => format!("#{id}"),
        None => format!("#{UNASSIGNED_TICKET}"),
    };

    DiagnosisView {
        diagnosis: or_placeholder(result.diagnosis.as_deref(), NO_DIAGNOSIS),
        executed_command: or_placeholder(result.executed_command.as_deref(), NO_COMMAND),
        command_output: or_placeholder(result.command_output.as_deref(), NO_OUTPUT),
        suggested_fix: or_placeholder(result.suggested_fix.as_deref(), NO_FIX),
        ticket,
    }
}

fn or_placeholder(value: Option<&str>, placeholder: &str) -> String {
    match value {
        Some(text) if !text.is_empty() => text.to_string(),
        _ => placeholder.to_string(),
    }
}
