//! Configuration management for Wayfarer
//!
//! Supports environment variables, config files, and runtime overrides.
//!
//! Config file location: ~/.config/wayfarer/config.toml

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::core::error::{Result, WayfarerError};
use crate::transcript::is_speaker_name;

/// Main configuration for Wayfarer
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Chat-completions endpoint configuration
    #[serde(default)]
    pub llm: LlmConfig,
    /// Group chat configuration
    #[serde(default)]
    pub chat: ChatConfig,
    /// Trip input limits and output location
    #[serde(default)]
    pub trip: TripConfig,
    /// Whether to show debug output
    #[serde(default)]
    pub debug: bool,
}

/// Chat-completions endpoint configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// API credential. Never written back to the config file.
    #[serde(default, skip_serializing)]
    pub api_key: Option<String>,
    /// Base URL of an OpenAI-compatible API
    pub base_url: String,
    /// Model used by every persona
    pub model: String,
    /// Sampling temperature
    pub temperature: f32,
    /// Sampling seed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

/// Group chat configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
    /// Name every turn header is addressed to
    pub coordinator: String,
    /// Name of the proxy that opens the conversation
    pub proxy: String,
    /// Maximum number of rounds, including the opening message
    pub max_rounds: usize,
    /// Substring that ends the conversation when a turn contains it
    pub termination_sentinel: String,
    /// Recent turns each persona sees besides the opening message (None = all)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context_window: Option<usize>,
}

/// Trip input limits
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TripConfig {
    /// Shortest accepted trip, in days
    pub min_days: u32,
    /// Longest accepted trip, in days
    pub max_days: u32,
    /// Duration used when none is given
    pub default_days: u32,
    /// Where downloaded plans are written
    pub output_dir: PathBuf,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: "https://api.openai.com/v1".to_string(),
            model: "gpt-4".to_string(),
            temperature: 0.7,
            seed: Some(42),
            timeout_secs: 120,
        }
    }
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            coordinator: "chat_manager".to_string(),
            proxy: "user_proxy".to_string(),
            max_rounds: 12,
            termination_sentinel: "FINAL PLAN COMPLETE".to_string(),
            context_window: None,
        }
    }
}

impl Default for TripConfig {
    fn default() -> Self {
        Self {
            min_days: 1,
            max_days: 30,
            default_days: 3,
            output_dir: PathBuf::from("."),
        }
    }
}

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("wayfarer")
    }

    /// Get the config file path
    pub fn config_file() -> PathBuf {
        Self::config_dir().join("config.toml")
    }

    /// Load configuration from file, environment, and defaults
    /// Priority: CLI args > env vars > config file > defaults
    ///
    /// A missing config file means defaults. A config file that exists but
    /// does not parse is an error.
    pub fn load() -> Result<Self> {
        // Try to load .env file if it exists
        let _ = dotenvy::dotenv();

        let config_path = Self::config_file();
        let mut config = if config_path.exists() {
            Self::load_from_file(&config_path)?
        } else {
            Self::default()
        };

        config.apply_env(|key| env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a file only
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| WayfarerError::config(format!("Failed to read config: {}", e)))?;

        Self::from_toml(&content).map_err(|e| {
            WayfarerError::config(format!("Invalid config file {}: {}", path.display(), e))
        })
    }

    /// Override settings from environment variables read through `var`.
    ///
    /// `OPENAI_API_KEY`, `OPENAI_BASE_URL`, `WAYFARER_MODEL` and
    /// `WAYFARER_DEBUG` are recognised. Blank values are ignored.
    pub fn apply_env(&mut self, var: impl Fn(&str) -> Option<String>) {
        let lookup = |key: &str| var(key).filter(|v| !v.trim().is_empty());

        if let Some(key) = lookup("OPENAI_API_KEY") {
            self.llm.api_key = Some(key);
        }

        if let Some(url) = lookup("OPENAI_BASE_URL") {
            self.llm.base_url = url;
        }

        if let Some(model) = lookup("WAYFARER_MODEL") {
            self.llm.model = model;
        }

        if let Some(debug) = lookup("WAYFARER_DEBUG") {
            self.debug = debug == "true" || debug == "1";
        }
    }

    /// Parse configuration from TOML text
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Check internal consistency
    pub fn validate(&self) -> Result<()> {
        url::Url::parse(&self.llm.base_url).map_err(|e| {
            WayfarerError::config(format!("Invalid base_url '{}': {}", self.llm.base_url, e))
        })?;

        if self.chat.coordinator.trim().is_empty() {
            return Err(WayfarerError::config("chat.coordinator must not be empty"));
        }

        if !is_speaker_name(&self.chat.proxy) {
            return Err(WayfarerError::config(format!(
                "chat.proxy '{}' must contain only letters, digits and underscores",
                self.chat.proxy
            )));
        }

        if self.chat.max_rounds == 0 {
            return Err(WayfarerError::config("chat.max_rounds must be at least 1"));
        }

        if self.trip.min_days == 0 || self.trip.min_days > self.trip.max_days {
            return Err(WayfarerError::config(format!(
                "Invalid trip range {}..={}",
                self.trip.min_days, self.trip.max_days
            )));
        }

        Ok(())
    }

    /// Return the API key or fail before any conversation is attempted
    pub fn require_api_key(&self) -> Result<&str> {
        self.llm
            .api_key
            .as_deref()
            .filter(|k| !k.trim().is_empty())
            .ok_or(WayfarerError::MissingApiKey)
    }

    /// Full URL of the chat-completions endpoint
    pub fn completions_url(&self) -> Result<String> {
        let base = self.llm.base_url.trim_end_matches('/');
        let url = url::Url::parse(&format!("{}/chat/completions", base)).map_err(|e| {
            WayfarerError::config(format!("Invalid base_url '{}': {}", self.llm.base_url, e))
        })?;
        Ok(url.to_string())
    }

    /// Save configuration to file
    pub fn save(&self) -> Result<PathBuf> {
        let config_dir = Self::config_dir();
        let config_path = Self::config_file();

        if !config_dir.exists() {
            fs::create_dir_all(&config_dir)
                .map_err(|e| WayfarerError::config(format!("Failed to create config dir: {}", e)))?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| WayfarerError::config(format!("Failed to serialize config: {}", e)))?;

        fs::write(&config_path, content)
            .map_err(|e| WayfarerError::config(format!("Failed to write config: {}", e)))?;

        Ok(config_path)
    }

    /// Generate a default config file content for display
    pub fn default_config_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config)
            .unwrap_or_else(|_| String::from("# Error generating config"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.chat.coordinator, "chat_manager");
        assert_eq!(config.chat.proxy, "user_proxy");
        assert_eq!(config.chat.max_rounds, 12);
        assert_eq!(config.llm.temperature, 0.7);
        assert_eq!(config.llm.seed, Some(42));
        assert_eq!(config.trip.max_days, 30);
        assert_eq!(config.trip.default_days, 3);
    }

    #[test]
    fn test_api_key_not_serialized() {
        let mut config = Config::default();
        config.llm.api_key = Some("sk-secret".to_string());
        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert!(!toml_str.contains("sk-secret"));
        assert!(toml_str.contains("coordinator"));
    }

    #[test]
    fn test_missing_api_key() {
        let mut config = Config::default();
        config.llm.api_key = None;
        assert!(matches!(
            config.require_api_key(),
            Err(WayfarerError::MissingApiKey)
        ));

        config.llm.api_key = Some("   ".to_string());
        assert!(config.require_api_key().is_err());
    }

    #[test]
    fn test_completions_url() {
        let mut config = Config::default();
        config.llm.base_url = "http://localhost:8080/v1/".to_string();
        assert_eq!(
            config.completions_url().unwrap(),
            "http://localhost:8080/v1/chat/completions"
        );
    }

    #[test]
    fn test_from_toml_partial() {
        let config = Config::from_toml(
            r#"
            [llm]
            base_url = "http://localhost:11434/v1"
            model = "llama3"
            temperature = 0.2
            timeout_secs = 30

            [chat]
            coordinator = "host"
            proxy = "traveler"
            max_rounds = 6
            termination_sentinel = "DONE"
            "#,
        )
        .unwrap();

        assert_eq!(config.llm.model, "llama3");
        assert_eq!(config.llm.seed, Some(42));
        assert_eq!(config.chat.coordinator, "host");
        assert_eq!(config.trip.max_days, 30);
    }

    #[test]
    fn test_partial_section_keeps_defaults() {
        let config = Config::from_toml("[llm]\nmodel = \"from-file\"\n").unwrap();
        assert_eq!(config.llm.model, "from-file");
        assert_eq!(config.llm.base_url, "https://api.openai.com/v1");
        assert_eq!(config.llm.timeout_secs, 120);
        assert_eq!(config.chat.max_rounds, 12);
    }

    #[test]
    fn test_env_overrides_file() {
        let mut config = Config::from_toml("debug = true\n[llm]\nmodel = \"gpt-4\"\n").unwrap();
        let env: HashMap<&str, &str> = [
            ("WAYFARER_MODEL", "from-env"),
            ("OPENAI_BASE_URL", "http://localhost:8080/v1"),
            ("OPENAI_API_KEY", "sk-env"),
            ("WAYFARER_DEBUG", "0"),
        ]
        .into_iter()
        .collect();

        config.apply_env(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.llm.model, "from-env");
        assert_eq!(config.llm.base_url, "http://localhost:8080/v1");
        assert_eq!(config.require_api_key().unwrap(), "sk-env");
        assert!(!config.debug);
    }

    #[test]
    fn test_blank_env_ignored() {
        let mut config = Config::default();
        config.apply_env(|key| (key == "WAYFARER_MODEL").then(|| "  ".to_string()));
        assert_eq!(config.llm.model, "gpt-4");
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        fs::write(&path, "[trip]\nmax_days = 14\n").unwrap();
        let config = Config::load_from_file(&path).unwrap();
        assert_eq!(config.trip.max_days, 14);
        assert_eq!(config.trip.min_days, 1);

        fs::write(&path, "[trip\nmax_days = ").unwrap();
        let err = Config::load_from_file(&path).unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn test_proxy_name_validated() {
        let mut config = Config::default();
        config.chat.proxy = "food-guide".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_range_rejected() {
        let mut config = Config::default();
        config.trip.min_days = 10;
        config.trip.max_days = 5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_dir() {
        let dir = Config::config_dir();
        assert!(dir.to_string_lossy().contains("wayfarer"));
    }
}
