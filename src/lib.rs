//! ai-cmd - natural-language to shell command.
//!
//! This library provides the core of the `ai` binary: it asks a hosted
//! text-generation API for a shell command that performs a described task,
//! lets the user pick one, and runs it. It supports:
//!
//! - **Concurrent generation** of several suggestions per task
//! - **Response normalization** across the known API response shapes
//! - **Sanitization** of model output down to one command line
//! - **Verbose diagnostics** with per-call timings and raw responses
//!
//! # Architecture
//!
//! - [`config`] - Configuration management (API token, endpoint, model)
//! - [`http_client`] - HTTP client abstraction
//! - [`api`] - Request construction and a single API call
//! - [`normalizer`] - Candidate extraction from response payloads
//! - [`sanitizer`] - Reduction of candidates to one command line
//! - [`coordinator`] - Concurrent fan-out and aggregation
//! - [`environment`] / [`prompt`] - Prompt construction
//! - [`app`] - Wires the above into one `generate` operation
//! - [`selector`] / [`executor`] - Interactive choice and execution
//! - [`report`] - Verbose output
//! - [`interrupt`] - Ctrl-C handling
//! - [`cli`] - Command-line parsing
//! - [`error`] - Error types and exit codes
//!
//! # Example
//!
//! ```ignore
//! use ai_cmd::{app::App, config::Config, http_client::ReqwestHttpClient};
//! use std::sync::Arc;
//! use tokio_util::sync::CancellationToken;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load()?;
//!     let app = App::new(&config, Arc::new(ReqwestHttpClient::new()))?;
//!
//!     let outcome = app.generate("find the biggest file here", 3, &CancellationToken::new()).await?;
//!     for cmd in &outcome.aggregated.commands {
//!         println!("{}", cmd);
//!     }
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod app;
pub mod cli;
pub mod config;
pub mod coordinator;
pub mod environment;
pub mod error;
pub mod executor;
pub mod http_client;
pub mod interrupt;
pub mod normalizer;
pub mod prompt;
pub mod report;
pub mod sanitizer;
pub mod selector;
