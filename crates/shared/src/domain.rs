use std::fmt;

use serde::{Deserialize, Serialize};

/// Tracking ticket identifier issued by the diagnosis service.
///
/// The service may send either a JSON number or a string; both are kept verbatim so that
/// falsy-looking values such as `0` or `""` still render.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TicketId {
    Number(serde_json::Number),
    Text(String),
}

impl fmt::Display for TicketId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(number) => write!(f, "{number}"),
            Self::Text(text) => f.write_str(text),
        }
    }
}

impl From<i64> for TicketId {
    fn from(value: i64) -> Self {
        Self::Number(value.into())
    }
}

impl From<&str> for TicketId {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_numeric_and_textual_ids() {
        let number: TicketId = serde_json::from_str("1042").expect("number");
        let text: TicketId = serde_json::from_str("\"INC-7\"").expect("text");

        assert_eq!(number, TicketId::from(1042));
        assert_eq!(text, TicketId::from("INC-7"));
        assert_eq!(number.to_string(), "1042");
        assert_eq!(text.to_string(), "INC-7");
    }

    #[test]
    fn keeps_falsy_values() {
        let zero: TicketId = serde_json::from_str("0").expect("zero");
        let empty: TicketId = serde_json::from_str("\"\"").expect("empty");

        assert_eq!(zero.to_string(), "0");
        assert_eq!(empty.to_string(), "");
    }
}
