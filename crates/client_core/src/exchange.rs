use async_trait::async_trait;
use hyper::ext::ReasonPhrase;
use reqwest::{Client, Response};
use shared::protocol::{DiagnosisResult, SubmissionRequest};
use tracing::{info, warn};
use url::Url;

use crate::{
    config::Settings,
    error::{ConfigError, ExchangeError},
};

pub type ExchangeOutcome = Result<DiagnosisResult, ExchangeError>;

/// One request/response interaction with the diagnosis service per call.
#[async_trait]
pub trait DiagnosisExchange: Send + Sync {
    async fn diagnose(&self, request: &SubmissionRequest) -> ExchangeOutcome;
}

pub struct HttpDiagnosisExchange {
    http: Client,
    endpoint: Url,
}

impl HttpDiagnosisExchange {
    pub fn new(endpoint: Url) -> Self {
        Self {
            http: Client::new(),
            endpoint,
        }
    }

    pub fn from_settings(settings: &Settings) -> Result<Self, ConfigError> {
        Ok(Self::new(settings.diagnose_endpoint()?))
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl DiagnosisExchange for HttpDiagnosisExchange {
    async fn diagnose(&self, request: &SubmissionRequest) -> ExchangeOutcome {
        info!(
            endpoint = %self.endpoint,
            username = %request.username,
            issue_len = request.issue.len(),
            "submitting diagnosis request"
        );

        let res = self
            .http
            .post(self.endpoint.clone())
            .json(request)
            .send()
            .await
            .map_err(|err| {
                warn!("diagnosis request failed: {err}");
                ExchangeError::Network(err)
            })?;

        let status = res.status();
        if !status.is_success() {
            warn!(status = status.as_u16(), "diagnosis service rejected request");
            return Err(ExchangeError::Server {
                status: status.as_u16(),
                status_text: status_text(&res),
            });
        }

        let body = res.bytes().await.map_err(ExchangeError::Network)?;
        let result: DiagnosisResult = serde_json::from_slice(&body).map_err(|err| {
            warn!("diagnosis response is not valid JSON: {err}");
            ExchangeError::MalformedBody(err)
        })?;

        info!(ticket = ?result.ticket_id, "diagnosis received");
        Ok(result)
    }
}

/// Reason phrase the service sent on the status line.
///
/// hyper only records the phrase when it differs from the canonical one, so the canonical
/// reason fills in otherwise. Unknown codes without a phrase yield an empty string.
fn status_text(res: &Response) -> String {
    if let Some(reason) = res.extensions().get::<ReasonPhrase>() {
        return String::from_utf8_lossy(reason.as_bytes()).into_owned();
    }
    res.status()
        .canonical_reason()
        .unwrap_or_default()
        .to_string()
}

#[cfg(test)]
#[path = "tests/exchange_tests.rs"]
mod tests;
