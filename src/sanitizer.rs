//! Reduction of free-form model output to a single command line.
//!
//! This is a best-effort heuristic, not a shell parser. It strips formatting
//! artifacts commonly found around generated commands (markdown fences,
//! comment lines, prompt markers) and keeps the first plausible line.

use regex::Regex;
use std::sync::LazyLock;

static CODE_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)```(?:sh|bash|zsh)?\n(.*?)\n```").expect("code block pattern is valid")
});

const PROMPT_MARKERS: [&str; 2] = ["$ ", "> "];

/// Returns the single command contained in `candidate`, or an empty string
/// if nothing plausible remains.
pub fn sanitize(candidate: &str) -> String {
    let mut text = candidate.trim();

    if let Some(inner) = CODE_BLOCK.captures(text).and_then(|c| c.get(1)) {
        text = inner.as_str().trim();
    }

    if let Some(line) = text.lines().find(|line| is_command_line(line)) {
        text = line.trim();
    }

    if let Some((first, _)) = text.split_once('\n') {
        text = first.trim();
    }

    for marker in PROMPT_MARKERS {
        text = text.strip_prefix(marker).unwrap_or(text);
    }

    text.trim().to_string()
}

fn is_command_line(line: &str) -> bool {
    matches!(line.chars().next(), Some(c) if c != '#' && c != ';')
}
