//! Concurrent fan-out of generation calls and aggregation of their results.
//!
//! [`FanOut::run`] launches one task per call, waits for every task to finish
//! and only then aggregates. Aggregation walks calls in index order, so the
//! resulting command list does not depend on which call finished first.
//!
//! Any failed call fails the whole operation: the failure observed first (in
//! completion order) is returned and no commands are produced.

use crate::api::{dispatch, ApiSettings, GenerationRequest, RawCallResult};
use crate::error::CallError;
use crate::http_client::HttpClient;
use crate::{normalizer, sanitizer};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Per-call diagnostics kept for the verbose report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallResult {
    pub index: usize,
    pub elapsed: Duration,
    /// Body of an accepted (2xx) response, decodable or not.
    pub raw_body: Option<Vec<u8>>,
    pub outcome: Result<Vec<String>, CallError>,
}

impl CallResult {
    /// Turns a raw call outcome into sanitized commands for call `index`.
    pub fn from_raw(index: usize, raw: RawCallResult) -> Self {
        match raw {
            RawCallResult::Failure { error, elapsed } => Self {
                index,
                elapsed,
                raw_body: None,
                outcome: Err(error),
            },
            RawCallResult::Success { body, elapsed } => {
                let outcome = normalizer::extract(&body)
                    .map(|candidates| {
                        candidates
                            .iter()
                            .map(|c| sanitizer::sanitize(c))
                            .filter(|cmd| !cmd.is_empty())
                            .collect()
                    })
                    .map_err(CallError::from);
                Self {
                    index,
                    elapsed,
                    raw_body: Some(body),
                    outcome,
                }
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregatedResult {
    pub commands: Vec<String>,
    pub total_duration: Duration,
    pub any_failed: bool,
}

impl AggregatedResult {
    /// Mean per-call duration over `calls` calls.
    pub fn average_duration(&self, calls: usize) -> Duration {
        match u32::try_from(calls) {
            Ok(0) | Err(_) => self.total_duration,
            Ok(n) => self.total_duration / n,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FanOutOutcome {
    pub aggregated: AggregatedResult,
    /// Individual calls in index order.
    pub calls: Vec<CallResult>,
}

/// Aggregates per-call results regardless of the order they are given in.
///
/// Commands are deduplicated keeping the first occurrence when scanning
/// calls by index, then each call's commands in order. Durations are summed.
pub fn aggregate(calls: &[CallResult]) -> AggregatedResult {
    let mut ordered: Vec<&CallResult> = calls.iter().collect();
    ordered.sort_by_key(|call| call.index);

    let mut seen = HashSet::new();
    let mut commands = Vec::new();
    let mut total_duration = Duration::ZERO;
    let mut any_failed = false;

    for call in ordered {
        total_duration += call.elapsed;
        match &call.outcome {
            Ok(call_commands) => {
                for cmd in call_commands {
                    if seen.insert(cmd.as_str()) {
                        commands.push(cmd.clone());
                    }
                }
            }
            Err(_) => any_failed = true,
        }
    }

    AggregatedResult {
        commands,
        total_duration,
        any_failed,
    }
}

/// Issues identical generation calls concurrently.
pub struct FanOut {
    client: Arc<dyn HttpClient>,
    settings: Arc<ApiSettings>,
}

impl FanOut {
    pub fn new(client: Arc<dyn HttpClient>, settings: Arc<ApiSettings>) -> Self {
        Self { client, settings }
    }

    /// Runs `request.count` calls and aggregates them once all have finished.
    ///
    /// # Errors
    ///
    /// Returns the first failure in completion order if any call failed,
    /// including [`CallError::Cancelled`] when `cancel` fires.
    pub async fn run(
        &self,
        request: Arc<GenerationRequest>,
        cancel: &CancellationToken,
    ) -> Result<FanOutOutcome, CallError> {
        info!("Launching {} concurrent generation calls", request.count);

        let mut tasks = JoinSet::new();
        for index in 0..request.count {
            let client = Arc::clone(&self.client);
            let settings = Arc::clone(&self.settings);
            let request = Arc::clone(&request);
            let cancel = cancel.child_token();
            tasks.spawn(async move {
                let raw = dispatch(client.as_ref(), &settings, &request, &cancel).await;
                CallResult::from_raw(index, raw)
            });
        }

        let mut slots: Vec<Option<CallResult>> = vec![None; request.count];
        let mut first_failure: Option<CallError> = None;

        while let Some(joined) = tasks.join_next().await {
            let call = match joined {
                Ok(call) => call,
                Err(join_error) => {
                    debug!("Generation task did not complete: {}", join_error);
                    first_failure.get_or_insert(CallError::Join(join_error.to_string()));
                    continue;
                }
            };

            debug!("Call {} finished in {:?}", call.index + 1, call.elapsed);
            if let Err(error) = &call.outcome {
                debug!("Call {} failed: {}", call.index + 1, error);
                first_failure.get_or_insert_with(|| error.clone());
            }
            let index = call.index;
            slots[index] = Some(call);
        }

        let calls: Vec<CallResult> = slots.into_iter().flatten().collect();

        if let Some(error) = first_failure {
            let spent: Duration = calls.iter().map(|c| c.elapsed).sum();
            debug!("Discarding {} collected calls ({:?} spent)", calls.len(), spent);
            return Err(error);
        }

        let aggregated = aggregate(&calls);
        info!(
            "Collected {} unique commands from {} calls in {:?}",
            aggregated.commands.len(),
            calls.len(),
            aggregated.total_duration
        );

        Ok(FanOutOutcome { aggregated, calls })
    }
}
