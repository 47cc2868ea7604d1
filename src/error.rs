//! Error taxonomy and exit codes.
//!
//! [`CallError`] describes why a single API call failed. [`AppError`] is what
//! the binary reports to the user; each variant maps to one process exit code.

use std::time::Duration;
use thiserror::Error;

/// Failure of one generation call.
///
/// `Clone` so the coordinator can keep the first observed failure while the
/// remaining calls drain.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CallError {
    #[error("request failed: {0}")]
    Transport(String),

    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    #[error("status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("invalid response: {0}")]
    Decode(String),

    #[error("request cancelled")]
    Cancelled,

    #[error("call task failed: {0}")]
    Join(String),
}

impl CallError {
    /// Builds a transport error from the source chain, skipping causes whose
    /// text an outer error already printed.
    pub fn transport(err: &(dyn std::error::Error + 'static)) -> Self {
        let mut message = err.to_string();
        let mut source = err.source();
        while let Some(cause) = source {
            let text = cause.to_string();
            if !message.contains(&text) {
                message.push_str(": ");
                message.push_str(&text);
            }
            source = cause.source();
        }
        CallError::Transport(message)
    }
}

impl From<serde_json::Error> for CallError {
    fn from(err: serde_json::Error) -> Self {
        CallError::Decode(err.to_string())
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Error: {0}")]
    Usage(String),

    #[error("Config error: {0:#}")]
    Config(anyhow::Error),

    #[error("API error: {0}")]
    Call(#[from] CallError),

    #[error("No commands generated")]
    EmptyResult,

    #[error("Selection error: {0}")]
    Selection(String),

    #[error("Execution error: {0}")]
    Launch(#[source] std::io::Error),

    #[error("command exited with status {code}")]
    CommandFailed { code: i32 },

    #[error("Output error: {0}")]
    Io(#[from] std::io::Error),
}

impl AppError {
    pub fn exit_code(&self) -> i32 {
        match self {
            AppError::Usage(_) | AppError::Config(_) => 2,
            AppError::CommandFailed { code } => *code,
            AppError::Call(_)
            | AppError::EmptyResult
            | AppError::Selection(_)
            | AppError::Launch(_)
            | AppError::Io(_) => 1,
        }
    }

    /// Message for stderr, or `None` when the failure speaks for itself
    /// (the executed command already wrote its own output).
    pub fn user_message(&self) -> Option<String> {
        match self {
            AppError::CommandFailed { .. } => None,
            other => Some(other.to_string()),
        }
    }
}
