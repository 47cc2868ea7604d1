//! One round-trip to the generation API.

use crate::config::Config;
use crate::error::{AppError, CallError};
use crate::http_client::HttpClient;
use serde_json::{json, Value};
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// What every call of one fan-out is asked to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    pub prompt: String,
    pub count: usize,
    pub timeout: Duration,
}

/// Endpoint and credentials shared by all calls.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiSettings {
    pub endpoint: String,
    pub model: String,
    pub token: String,
    pub max_output_tokens: u32,
}

impl std::fmt::Debug for ApiSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiSettings")
            .field("endpoint", &self.endpoint)
            .field("model", &self.model)
            .field("token", &"<redacted>")
            .field("max_output_tokens", &self.max_output_tokens)
            .finish()
    }
}

impl ApiSettings {
    /// Fails with a usage error when no token is configured.
    pub fn from_config(config: &Config) -> Result<Self, AppError> {
        let token = config
            .get_api_token()
            .ok_or_else(|| AppError::Usage(format!("{} not set", crate::config::TOKEN_ENV)))?;
        Ok(Self {
            endpoint: config.endpoint.clone(),
            model: config.model.clone(),
            token: token.to_string(),
            max_output_tokens: config.max_output_tokens,
        })
    }

    pub fn request_body(&self, prompt: &str) -> Value {
        json!({
            "model": self.model,
            "input": prompt,
            "max_output_tokens": self.max_output_tokens,
            "text": {
                "format": {
                    "type": "text"
                }
            },
            "reasoning": {
                "effort": "none"
            }
        })
    }
}

/// Outcome of one network call, before any decoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawCallResult {
    Failure { error: CallError, elapsed: Duration },
    Success { body: Vec<u8>, elapsed: Duration },
}

impl RawCallResult {
    pub fn elapsed(&self) -> Duration {
        match self {
            RawCallResult::Failure { elapsed, .. } | RawCallResult::Success { elapsed, .. } => {
                *elapsed
            }
        }
    }
}

/// Performs one call, bounded by `request.timeout` and `cancel`.
///
/// A non-2xx status is a failure carrying the status code and body text.
pub async fn dispatch(
    client: &dyn HttpClient,
    settings: &ApiSettings,
    request: &GenerationRequest,
    cancel: &CancellationToken,
) -> RawCallResult {
    let started = Instant::now();
    let body = settings.request_body(&request.prompt);
    let authorization = format!("Bearer {}", settings.token);
    let headers = [
        ("Content-Type", "application/json"),
        ("Authorization", authorization.as_str()),
    ];

    let response = tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(CallError::Cancelled),
        result = tokio::time::timeout(
            request.timeout,
            client.post_json(&settings.endpoint, &headers, &body),
        ) => result.unwrap_or_else(|_| Err(CallError::Timeout(request.timeout))),
    };
    let elapsed = started.elapsed();

    match response {
        Ok(response) if response.is_success() => {
            debug!("Call succeeded with status {} in {:?}", response.status, elapsed);
            RawCallResult::Success {
                body: response.body,
                elapsed,
            }
        }
        Ok(response) => RawCallResult::Failure {
            error: CallError::Status {
                status: response.status,
                body: String::from_utf8_lossy(&response.body).into_owned(),
            },
            elapsed,
        },
        Err(error) => RawCallResult::Failure { error, elapsed },
    }
}
