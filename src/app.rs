use crate::api::{ApiSettings, GenerationRequest};
use crate::config::Config;
use crate::coordinator::{FanOut, FanOutOutcome};
use crate::environment;
use crate::error::AppError;
use crate::http_client::HttpClient;
use crate::prompt;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::info;

/// Turns task descriptions into deduplicated command suggestions.
pub struct App {
    fan_out: FanOut,
    timeout: Duration,
}

impl App {
    /// Builds the generator from loaded configuration.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Usage`] when no API token is configured.
    pub fn new(config: &Config, client: Arc<dyn HttpClient>) -> Result<Self, AppError> {
        let settings = Arc::new(ApiSettings::from_config(config)?);
        info!("Using model {} at {}", settings.model, settings.endpoint);
        Ok(Self {
            fan_out: FanOut::new(client, settings),
            timeout: config.timeout(),
        })
    }

    /// Generates commands for `task` with the local environment as context.
    pub async fn generate(
        &self,
        task: &str,
        count: usize,
        cancel: &CancellationToken,
    ) -> Result<FanOutOutcome, AppError> {
        self.generate_with_context(task, &environment::gather_context(), count, cancel)
            .await
    }

    /// Generates commands for `task` with an explicit context.
    ///
    /// # Errors
    ///
    /// - [`AppError::Call`] with the first failed call
    /// - [`AppError::EmptyResult`] when every call succeeded but none produced
    ///   a usable command
    pub async fn generate_with_context(
        &self,
        task: &str,
        context: &BTreeMap<String, String>,
        count: usize,
        cancel: &CancellationToken,
    ) -> Result<FanOutOutcome, AppError> {
        let request = Arc::new(GenerationRequest {
            prompt: prompt::build_prompt(task, context),
            count,
            timeout: self.timeout,
        });
        info!("Processing task: {}", task);

        let outcome = self.fan_out.run(request, cancel).await?;
        if outcome.aggregated.commands.is_empty() {
            return Err(AppError::EmptyResult);
        }
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CallError;
    use crate::http_client::HttpResponse;
    use async_trait::async_trait;
    use serde_json::{json, Value};
    use std::sync::Mutex;

    /// Answers every call with the same body and records the prompts sent.
    struct FixedClient {
        status: u16,
        body: String,
        prompts: Mutex<Vec<String>>,
    }

    impl FixedClient {
        fn new(status: u16, body: Value) -> Arc<Self> {
            Arc::new(Self {
                status,
                body: body.to_string(),
                prompts: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl HttpClient for FixedClient {
        async fn post_json(
            &self,
            _url: &str,
            _headers: &[(&str, &str)],
            body: &Value,
        ) -> Result<HttpResponse, CallError> {
            let prompt = body["input"].as_str().unwrap_or_default().to_string();
            self.prompts.lock().unwrap().push(prompt);
            Ok(HttpResponse {
                status: self.status,
                body: self.body.clone().into_bytes(),
            })
        }
    }

    fn config() -> Config {
        Config {
            api_token: Some("token".to_string()),
            ..Config::default()
        }
    }

    fn context() -> BTreeMap<String, String> {
        BTreeMap::from([("shell".to_string(), "bash".to_string())])
    }

    #[test]
    fn test_new_without_token_is_usage_error() {
        let client = FixedClient::new(200, json!({}));
        let err = App::new(&Config::default(), client).err().unwrap();
        assert!(matches!(err, AppError::Usage(_)));
    }

    #[tokio::test]
    async fn test_generate_sends_prompt_to_every_call() {
        let client = FixedClient::new(200, json!({"output_text": "```bash\nls -la\n```"}));
        let app = App::new(&config(), client.clone()).unwrap();

        let outcome = app
            .generate_with_context("list files", &context(), 3, &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(outcome.aggregated.commands, vec!["ls -la"]);
        assert_eq!(outcome.calls.len(), 3);
        let prompts = client.prompts.lock().unwrap();
        assert_eq!(prompts.len(), 3);
        assert!(prompts.iter().all(|p| p.ends_with("Task:\nlist files\n")));
        assert!(prompts[0].contains("for POSIX bash"));
    }

    #[tokio::test]
    async fn test_generate_with_no_commands_is_empty_result() {
        let client = FixedClient::new(200, json!({"output_text": "```sh\n\n```"}));
        let app = App::new(&config(), client).unwrap();

        let err = app
            .generate_with_context("list files", &context(), 2, &CancellationToken::new())
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::EmptyResult));
        assert_eq!(err.exit_code(), 1);
    }

    #[tokio::test]
    async fn test_generate_surfaces_call_failure() {
        let client = FixedClient::new(401, json!({"error": {"message": "invalid key"}}));
        let app = App::new(&config(), client).unwrap();

        let err = app
            .generate_with_context("list files", &context(), 3, &CancellationToken::new())
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Call(CallError::Status { status: 401, .. })));
        assert!(err.to_string().starts_with("API error: status 401"));
    }
}
