//! Environment context used to enrich the prompt.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

const ISSUE_FILE: &str = "/etc/issue";

/// Returns the user's shell from `$SHELL`, or `sh` when unset.
pub fn user_shell() -> String {
    std::env::var("SHELL")
        .ok()
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "sh".to_string())
}

/// Collects OS family, architecture, shell and a one-line OS identification.
pub fn gather_context() -> BTreeMap<String, String> {
    let mut context = BTreeMap::new();
    context.insert("os".to_string(), std::env::consts::OS.to_string());
    context.insert("arch".to_string(), std::env::consts::ARCH.to_string());
    context.insert("shell".to_string(), user_shell());
    context.insert("safe_mode".to_string(), "on".to_string());
    context.insert("system".to_string(), read_system_info(Path::new(ISSUE_FILE)));
    context
}

/// Reads an `/etc/issue` style file, dropping the getty `\n` and `\l`
/// escapes. Returns an empty string when the file cannot be read.
pub fn read_system_info(path: &Path) -> String {
    match fs::read_to_string(path) {
        Ok(content) => content
            .replace("\\n", "")
            .replace("\\l", "")
            .trim()
            .to_string(),
        Err(_) => String::new(),
    }
}
