use thiserror::Error;

/// Normalized failure of one diagnosis exchange.
///
/// The `Display` text of every variant is the failure description shown to the user after
/// the `"Error: "` prefix.
#[derive(Debug, Error)]
pub enum ExchangeError {
    #[error("Server error: {status_text}")]
    Server { status: u16, status_text: String },
    #[error("{0}")]
    Network(#[source] reqwest::Error),
    #[error("{0}")]
    MalformedBody(#[source] serde_json::Error),
    #[error("diagnosis backend unavailable: {0}")]
    Unavailable(String),
    #[error("submission interrupted before the diagnosis service responded")]
    Interrupted,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid diagnosis service url '{url}': {source}")]
    InvalidServerUrl {
        url: String,
        source: url::ParseError,
    },
    #[error("unsupported scheme '{scheme}' in diagnosis service url '{url}'")]
    UnsupportedScheme { url: String, scheme: String },
}
