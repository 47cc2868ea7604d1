use std::collections::BTreeMap;
use std::fmt::Write;

const RULES: &[&str] = &[
    "NO explanations or extra text. Only the command.",
    "Avoid destructive actions (rm -rf, chmod -R, sudo, moving/deleting) unless explicitly requested.",
    "Prefer read-only queries (ls/find/stat/du/grep) when unsure.",
    "Use utilities commonly available on Linux/macOS.",
    "Must run correctly in the current working directory.",
    "If paths contain spaces, quote them safely.",
    "If the task is ambiguous, choose the safest widely useful command.",
];

/// Composes the generation prompt for `task`.
///
/// Context entries with empty values are left out.
pub fn build_prompt(task: &str, context: &BTreeMap<String, String>) -> String {
    let shell = context
        .get("shell")
        .map(String::as_str)
        .filter(|s| !s.is_empty())
        .unwrap_or("sh");

    let mut prompt = String::new();
    prompt.push_str("You are a shell command generator.\n");
    let _ = writeln!(prompt, "Output exactly one safe, single-line command for POSIX {}", shell);
    prompt.push_str("Rules:\n");
    for rule in RULES {
        let _ = writeln!(prompt, "- {}", rule);
    }

    prompt.push_str("\nEnvironment context:\n");
    for (key, value) in context {
        if value.is_empty() {
            continue;
        }
        let _ = writeln!(prompt, "- {}: {}", key, value);
    }

    prompt.push_str("\nTask:\n");
    prompt.push_str(task);
    prompt.push('\n');
    prompt
}
