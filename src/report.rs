//! Verbose diagnostics printed with `-v`.

use crate::coordinator::FanOutOutcome;
use std::io::{self, Write};

/// Writes timings, the deduplicated commands and each call's raw response.
pub fn print_verbose<W: Write>(outcome: &FanOutOutcome, out: &mut W) -> io::Result<()> {
    let aggregated = &outcome.aggregated;
    let calls = outcome.calls.len();

    writeln!(out, "=== VERBOSE OUTPUT ===")?;
    writeln!(out, "Commands generated: {}", aggregated.commands.len())?;
    writeln!(out, "Total API request time: {:?}", aggregated.total_duration)?;
    writeln!(out, "Number of concurrent API calls: {}", calls)?;
    writeln!(out, "Average API request time: {:?}", aggregated.average_duration(calls))?;
    for call in &outcome.calls {
        writeln!(out, "API Call {} time: {:?}", call.index + 1, call.elapsed)?;
    }

    writeln!(out, "\nGenerated commands:")?;
    for (i, cmd) in aggregated.commands.iter().enumerate() {
        writeln!(out, "  {}) {}", i + 1, cmd)?;
    }

    let mut captured = 0;
    for call in &outcome.calls {
        let Some(body) = call.raw_body.as_deref().filter(|b| !b.is_empty()) else {
            continue;
        };
        captured += 1;
        writeln!(out, "\nAPI Call {} Response (pretty-printed):", call.index + 1)?;
        writeln!(out, "{}", pretty_body(body))?;
    }

    if captured == 0 {
        writeln!(out, "\nNote: Raw API responses not captured")?;
    }

    writeln!(out, "=== END VERBOSE OUTPUT ===")?;
    Ok(())
}

/// Pretty-printed JSON, or the body as text when it is not JSON.
fn pretty_body(body: &[u8]) -> String {
    serde_json::from_slice::<serde_json::Value>(body)
        .ok()
        .and_then(|value| serde_json::to_string_pretty(&value).ok())
        .unwrap_or_else(|| String::from_utf8_lossy(body).into_owned())
}
