use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::{domain::TicketId, error::ValidationError};

/// Path of the diagnosis endpoint, resolved against the service origin.
pub const DIAGNOSE_PATH: &str = "/diagnose";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionRequest {
    pub username: String,
    pub issue: String,
}

impl SubmissionRequest {
    pub fn new(username: impl Into<String>, issue: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            issue: issue.into(),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.issue.trim().is_empty() {
            return Err(ValidationError::EmptyIssue);
        }
        Ok(())
    }
}

/// Successful response body of `POST /diagnose`.
///
/// Every field may be missing. Narrative fields tolerate any JSON scalar so a loosely typed
/// service never turns a successful diagnosis into a decode failure; falsy scalars (`null`,
/// `false`, numeric zero) decode as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiagnosisResult {
    #[serde(
        default,
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub diagnosis: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub executed_command: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub command_output: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub suggested_fix: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ticket_id: Option<TicketId>,
}

fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null | Value::Bool(false)) => None,
        Some(Value::Number(n)) if n.as_f64() == Some(0.0) => None,
        Some(Value::String(text)) => Some(text),
        Some(other) => Some(other.to_string()),
    })
}
