//! Ctrl-C handling.
//!
//! What an interrupt means depends on where the program is: while calls are
//! in flight it cancels them, while waiting for a selection it exits, and
//! while the chosen command runs it is left to the child process.

use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::info;

/// Exit code for a process ended by SIGINT.
pub const INTERRUPTED_EXIT_CODE: i32 = 130;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Phase {
    Generating = 0,
    Selecting = 1,
    Executing = 2,
}

impl Phase {
    fn from_u8(value: u8) -> Self {
        match value {
            0 => Phase::Generating,
            1 => Phase::Selecting,
            _ => Phase::Executing,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reaction {
    Cancel,
    Exit,
    Ignore,
}

pub fn reaction(phase: Phase) -> Reaction {
    match phase {
        Phase::Generating => Reaction::Cancel,
        Phase::Selecting => Reaction::Exit,
        Phase::Executing => Reaction::Ignore,
    }
}

/// Tracks the current phase and owns the cancellation token for generation.
pub struct Interrupts {
    phase: Arc<AtomicU8>,
    token: CancellationToken,
}

impl Interrupts {
    pub fn new() -> Self {
        Self {
            phase: Arc::new(AtomicU8::new(Phase::Generating as u8)),
            token: CancellationToken::new(),
        }
    }

    /// Creates the tracker and spawns the Ctrl-C listener on the current runtime.
    pub fn install() -> Self {
        let interrupts = Self::new();
        let phase = Arc::clone(&interrupts.phase);
        let token = interrupts.token.clone();

        tokio::spawn(async move {
            while tokio::signal::ctrl_c().await.is_ok() {
                match reaction(Phase::from_u8(phase.load(Ordering::SeqCst))) {
                    Reaction::Cancel => {
                        info!("Interrupted, cancelling outstanding calls");
                        token.cancel();
                    }
                    Reaction::Exit => std::process::exit(INTERRUPTED_EXIT_CODE),
                    Reaction::Ignore => {}
                }
            }
        });

        interrupts
    }

    pub fn token(&self) -> &CancellationToken {
        &self.token
    }

    pub fn phase(&self) -> Phase {
        Phase::from_u8(self.phase.load(Ordering::SeqCst))
    }

    pub fn enter(&self, phase: Phase) {
        self.phase.store(phase as u8, Ordering::SeqCst);
    }
}

impl Default for Interrupts {
    fn default() -> Self {
        Self::new()
    }
}
