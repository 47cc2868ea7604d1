use anyhow::{anyhow, Context, Result};
use dirs::home_dir;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;

pub const DEFAULT_ENDPOINT: &str = "https://api.openai.com/v1/responses";
pub const DEFAULT_MODEL: &str = "gpt-5.1";
pub const DEFAULT_MAX_OUTPUT_TOKENS: u32 = 500;
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

pub const TOKEN_ENV: &str = "OPENAI_TOKEN";
pub const ENDPOINT_ENV: &str = "AI_CMD_ENDPOINT";
pub const MODEL_ENV: &str = "AI_CMD_MODEL";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api_token: Option<String>,
    pub endpoint: String,
    pub model: String,
    pub max_output_tokens: u32,
    pub timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_token: None,
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model: DEFAULT_MODEL.to_string(),
            max_output_tokens: DEFAULT_MAX_OUTPUT_TOKENS,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl Config {
    /// Load configuration from the config file, then apply environment overrides.
    pub fn load() -> Result<Self> {
        let config_path = Self::get_config_path()?;
        let contents = Self::read_file(&config_path)?;
        Self::from_sources(contents.as_deref(), |key| std::env::var(key).ok())
    }

    /// Builds a config from optional file contents and an environment lookup.
    pub fn from_sources<F>(file_contents: Option<&str>, env: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = match file_contents {
            Some(content) => toml::from_str::<Config>(content).context("invalid config file")?,
            None => {
                info!("No config file found, using defaults");
                Self::default()
            }
        };

        // Environment variables override config file
        if let Some(token) = env(TOKEN_ENV).filter(|t| !t.is_empty()) {
            config.api_token = Some(token);
        }
        if let Some(endpoint) = env(ENDPOINT_ENV).filter(|e| !e.is_empty()) {
            config.endpoint = endpoint;
        }
        if let Some(model) = env(MODEL_ENV).filter(|m| !m.is_empty()) {
            config.model = model;
        }

        Ok(config)
    }

    fn read_file(config_path: &Path) -> Result<Option<String>> {
        if !config_path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(config_path)
            .with_context(|| format!("could not read {}", config_path.display()))?;
        info!("Loaded config from: {}", config_path.display());
        Ok(Some(content))
    }

    pub fn get_config_path() -> Result<PathBuf> {
        Ok(Self::get_config_dir()?.join("config.toml"))
    }

    pub fn get_config_dir() -> Result<PathBuf> {
        let home = home_dir().ok_or_else(|| anyhow!("Could not find home directory"))?;
        Ok(home.join(".ai-cmd"))
    }

    pub fn get_api_token(&self) -> Option<&str> {
        self.api_token.as_deref().filter(|t| !t.is_empty())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn show_config_info(&self) -> Result<()> {
        let config_path = Self::get_config_path()?;
        println!("Configuration file: {}", config_path.display());

        if config_path.exists() {
            println!("Status: Found");
        } else {
            println!("Status: Not found (using defaults)");
        }
        println!("API token: {}", if self.get_api_token().is_some() { "Set" } else { "Not set" });
        println!("Endpoint: {}", self.endpoint);
        println!("Model: {}", self.model);
        println!("Max output tokens: {}", self.max_output_tokens);
        println!("Timeout: {}s", self.timeout_secs);

        println!("\nTo set the API token:");
        println!("  export {}=<your-token>", TOKEN_ENV);
        println!("\nOr add it to the config file:");
        println!("  api_token = \"<your-token>\"");

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> + use<> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_without_file_or_env() {
        let config = Config::from_sources(None, env_from(&[])).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.timeout(), Duration::from_secs(30));
        assert!(config.get_api_token().is_none());
    }

    #[test]
    fn test_file_values_are_loaded() {
        let file = r#"
            api_token = "from-file"
            model = "gpt-test"
            timeout_secs = 5
        "#;
        let config = Config::from_sources(Some(file), env_from(&[])).unwrap();
        assert_eq!(config.get_api_token(), Some("from-file"));
        assert_eq!(config.model, "gpt-test");
        assert_eq!(config.timeout_secs, 5);
        assert_eq!(config.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(config.max_output_tokens, DEFAULT_MAX_OUTPUT_TOKENS);
    }

    #[test]
    fn test_env_overrides_file() {
        let file = r#"api_token = "from-file""#;
        let env = env_from(&[
            (TOKEN_ENV, "from-env"),
            (ENDPOINT_ENV, "http://127.0.0.1:8080/v1/responses"),
        ]);
        let config = Config::from_sources(Some(file), env).unwrap();
        assert_eq!(config.get_api_token(), Some("from-env"));
        assert_eq!(config.endpoint, "http://127.0.0.1:8080/v1/responses");
    }

    #[test]
    fn test_empty_env_token_is_ignored() {
        let config = Config::from_sources(None, env_from(&[(TOKEN_ENV, "")])).unwrap();
        assert!(config.get_api_token().is_none());
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let result = Config::from_sources(Some("timeout_secs = \"soon\""), env_from(&[]));
        assert!(result.is_err());
    }

    #[test]
    fn test_read_file_missing_returns_none() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        assert!(Config::read_file(&path).unwrap().is_none());
    }

    #[test]
    fn test_read_file_existing_returns_contents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "model = \"gpt-mini\"\n").unwrap();

        let contents = Config::read_file(&path).unwrap();
        let config = Config::from_sources(contents.as_deref(), env_from(&[])).unwrap();
        assert_eq!(config.model, "gpt-mini");
    }
}
