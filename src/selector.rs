//! Interactive choice among generated commands.

use crate::error::AppError;
use std::io::{self, BufRead, Write};
use tracing::info;

/// Lists `commands` and reads a 1-based choice using custom I/O streams.
///
/// # Errors
///
/// Returns [`AppError::Selection`] if the input is not a number in range
/// (including end of input), or [`AppError::Io`] if I/O fails.
pub fn select_command_with_io<R: BufRead, W: Write>(
    commands: &[String],
    input: &mut R,
    output: &mut W,
) -> Result<String, AppError> {
    writeln!(output, "Select a command:")?;
    for (i, cmd) in commands.iter().enumerate() {
        writeln!(output, "  {}) {}", i + 1, cmd)?;
    }
    write!(output, "Enter number: ")?;
    output.flush()?;

    let mut line = String::new();
    input.read_line(&mut line)?;
    let choice = line.trim();

    match choice.parse::<usize>() {
        Ok(n) if (1..=commands.len()).contains(&n) => {
            info!("User selected command {}", n);
            Ok(commands[n - 1].clone())
        }
        _ => Err(AppError::Selection("invalid selection".to_string())),
    }
}

/// Lists `commands` on stdout and reads the choice from stdin.
///
/// This is a convenience wrapper around [`select_command_with_io`].
pub fn select_command(commands: &[String]) -> Result<String, AppError> {
    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut output = io::stdout();
    select_command_with_io(commands, &mut input, &mut output)
}
