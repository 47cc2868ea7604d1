//! Execution of the chosen command through the user's shell.
//!
//! The command runs as `<shell> -c <command>` with the terminal's stdin,
//! stdout and stderr and the current environment, so it behaves as if typed
//! directly.

use crate::error::AppError;
use std::io;
use std::process::{Command, ExitStatus};
use tracing::{debug, info};

// =============================================================================
// Traits for Dependency Injection
// =============================================================================

/// Trait for running system processes.
///
/// This abstraction enables testing without spawning real processes.
pub trait ProcessRunner: Send + Sync {
    /// Runs a program with inherited standard streams and waits for it.
    fn run_inherited(&self, program: &str, args: &[&str]) -> io::Result<ExitStatus>;
}

/// Default process runner using std::process::Command.
pub struct SystemProcessRunner;

impl ProcessRunner for SystemProcessRunner {
    fn run_inherited(&self, program: &str, args: &[&str]) -> io::Result<ExitStatus> {
        Command::new(program).args(args).status()
    }
}

// =============================================================================
// Executor Implementation
// =============================================================================

/// Runs commands through a shell.
///
/// # Example
///
/// ```ignore
/// let executor = Executor::from_env();
/// executor.execute("ls -la")?;
/// ```
pub struct Executor {
    shell: String,
}

impl Executor {
    pub fn new(shell: impl Into<String>) -> Self {
        Self {
            shell: shell.into(),
        }
    }

    /// Uses `$SHELL`, falling back to `sh` as found on `PATH`.
    pub fn from_env() -> Self {
        match std::env::var("SHELL").ok().filter(|s| !s.is_empty()) {
            Some(shell) => Self::new(shell),
            None => {
                let sh = which::which("sh")
                    .map(|p| p.to_string_lossy().into_owned())
                    .unwrap_or_else(|_| "sh".to_string());
                Self::new(sh)
            }
        }
    }

    pub fn shell(&self) -> &str {
        &self.shell
    }

    /// Executes `command` with the system process runner.
    pub fn execute(&self, command: &str) -> Result<(), AppError> {
        self.execute_with_runner(command, &SystemProcessRunner)
    }

    /// Executes `command` with an injected runner (for testing).
    ///
    /// # Errors
    ///
    /// - [`AppError::Launch`] if the shell cannot be started
    /// - [`AppError::CommandFailed`] if the command exits non-zero; the code
    ///   is 1 when the process was terminated by a signal
    pub fn execute_with_runner(&self, command: &str, runner: &impl ProcessRunner) -> Result<(), AppError> {
        info!("Executing via {}: {}", self.shell, command);

        let status = runner
            .run_inherited(&self.shell, &["-c", command])
            .map_err(|e| {
                debug!("Could not launch {}: {}", self.shell, e);
                AppError::Launch(e)
            })?;

        if status.success() {
            Ok(())
        } else {
            debug!("Command failed with status: {}", status);
            Err(AppError::CommandFailed {
                code: status.code().unwrap_or(1),
            })
        }
    }
}
