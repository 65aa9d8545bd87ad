//! Configuration for the meeting summarizer.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use url::Url;

use crate::meeting::core::errors::{SummarizerError, SummarizerResult};

/// Maximum time since the last successful update before a refresh is forced.
pub const UPDATE_INTERVAL_MS: u64 = 15_000;
/// Minimum time between two update attempts.
pub const MIN_UPDATE_INTERVAL_MS: u64 = 10_000;
/// Period of the background scheduler.
pub const POLL_INTERVAL_MS: u64 = 5_000;
/// Buffered character count that triggers an early update.
pub const CHAR_THRESHOLD: usize = 1_200;
/// Maximum number of buffered delta characters.
pub const MAX_DELTA_CHARS: usize = 5_000;
/// Maximum rolling summary bullets.
pub const SUMMARY_MAX: usize = 6;
/// Maximum decisions.
pub const DECISIONS_MAX: usize = 10;
/// Maximum action items.
pub const ACTION_ITEMS_MAX: usize = 15;

/// Environment variable overriding the Ollama base URL.
pub const OLLAMA_URL_ENV: &str = "LIVE_SUMMARY_OLLAMA_URL";
/// Environment variable overriding the completion model.
pub const MODEL_ENV: &str = "LIVE_SUMMARY_MODEL";
/// Environment variable pointing at the local flag store.
pub const FLAGS_PATH_ENV: &str = "LIVE_SUMMARY_FLAGS_PATH";

/// Top-level configuration for the live summarizer.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MeetingConfig {
    /// Scheduling and list size settings.
    pub summarizer: SummarizerConfig,
    /// Completion model settings.
    pub llm: LlmConfig,
    /// Optional path of the local flag store.
    pub flags_path: Option<PathBuf>,
}

impl MeetingConfig {
    /// Validate configuration invariants.
    ///
    /// # Errors
    /// Returns an error if any values are out of range or invalid.
    pub fn validate(&self) -> SummarizerResult<()> {
        self.summarizer.validate()?;
        self.llm.validate()
    }

    /// Load a configuration from a JSON file and validate it.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read, parsed, or is invalid.
    pub fn from_json_file(path: impl AsRef<Path>) -> SummarizerResult<Self> {
        let raw = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Build the default configuration with environment overrides applied.
    ///
    /// # Errors
    /// Returns an error if an override produces an invalid configuration.
    pub fn from_env() -> SummarizerResult<Self> {
        let mut config = Self::default();
        if let Ok(base_url) = std::env::var(OLLAMA_URL_ENV) {
            config.llm.base_url = Some(base_url);
        }
        if let Ok(model) = std::env::var(MODEL_ENV) {
            config.llm.model = model;
        }
        if let Ok(path) = std::env::var(FLAGS_PATH_ENV) {
            config.flags_path = Some(PathBuf::from(path));
        }
        config.validate()?;
        Ok(config)
    }
}

/// Scheduling thresholds and list bounds.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SummarizerConfig {
    /// Staleness interval in milliseconds.
    pub update_interval_ms: u64,
    /// Cooldown between attempts in milliseconds.
    pub min_update_interval_ms: u64,
    /// Background poll period in milliseconds.
    pub poll_interval_ms: u64,
    /// Buffer size that triggers an early update.
    pub char_threshold: usize,
    /// Maximum buffered characters.
    pub max_delta_chars: usize,
    /// Maximum rolling summary bullets.
    pub summary_max: usize,
    /// Maximum decisions.
    pub decisions_max: usize,
    /// Maximum action items.
    pub action_items_max: usize,
}

impl Default for SummarizerConfig {
    fn default() -> Self {
        Self {
            update_interval_ms: UPDATE_INTERVAL_MS,
            min_update_interval_ms: MIN_UPDATE_INTERVAL_MS,
            poll_interval_ms: POLL_INTERVAL_MS,
            char_threshold: CHAR_THRESHOLD,
            max_delta_chars: MAX_DELTA_CHARS,
            summary_max: SUMMARY_MAX,
            decisions_max: DECISIONS_MAX,
            action_items_max: ACTION_ITEMS_MAX,
        }
    }
}

impl SummarizerConfig {
    /// Validate configuration invariants.
    ///
    /// # Errors
    /// Returns an error if any values are out of range.
    pub fn validate(&self) -> SummarizerResult<()> {
        let positive = [
            ("update_interval_ms", self.update_interval_ms),
            ("min_update_interval_ms", self.min_update_interval_ms),
            ("poll_interval_ms", self.poll_interval_ms),
        ];
        for (name, value) in positive {
            if value == 0 {
                return Err(SummarizerError::InvalidConfig(format!(
                    "summarizer.{name} must be > 0"
                )));
            }
        }

        let bounds = [
            ("char_threshold", self.char_threshold),
            ("max_delta_chars", self.max_delta_chars),
            ("summary_max", self.summary_max),
            ("decisions_max", self.decisions_max),
            ("action_items_max", self.action_items_max),
        ];
        for (name, value) in bounds {
            if value == 0 {
                return Err(SummarizerError::InvalidConfig(format!(
                    "summarizer.{name} must be > 0"
                )));
            }
        }

        if self.char_threshold > self.max_delta_chars {
            return Err(SummarizerError::InvalidConfig(
                "summarizer.char_threshold must not exceed summarizer.max_delta_chars".to_string(),
            ));
        }

        Ok(())
    }
}

/// Builder for summarizer configuration.
#[derive(Debug, Clone, Default)]
pub struct SummarizerConfigBuilder {
    update_interval_ms: Option<u64>,
    min_update_interval_ms: Option<u64>,
    poll_interval_ms: Option<u64>,
    char_threshold: Option<usize>,
    max_delta_chars: Option<usize>,
}

impl SummarizerConfigBuilder {
    /// Create a new builder with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the staleness interval.
    #[must_use]
    pub const fn update_interval_ms(mut self, ms: u64) -> Self {
        self.update_interval_ms = Some(ms);
        self
    }

    /// Set the cooldown between attempts.
    #[must_use]
    pub const fn min_update_interval_ms(mut self, ms: u64) -> Self {
        self.min_update_interval_ms = Some(ms);
        self
    }

    /// Set the background poll period.
    #[must_use]
    pub const fn poll_interval_ms(mut self, ms: u64) -> Self {
        self.poll_interval_ms = Some(ms);
        self
    }

    /// Set the early-update character threshold.
    #[must_use]
    pub const fn char_threshold(mut self, chars: usize) -> Self {
        self.char_threshold = Some(chars);
        self
    }

    /// Set the maximum buffered characters.
    #[must_use]
    pub const fn max_delta_chars(mut self, chars: usize) -> Self {
        self.max_delta_chars = Some(chars);
        self
    }

    /// Build and validate the configuration.
    ///
    /// # Errors
    /// Returns an error if the resulting configuration is invalid.
    pub fn build(self) -> SummarizerResult<SummarizerConfig> {
        let default = SummarizerConfig::default();
        let config = SummarizerConfig {
            update_interval_ms: self.update_interval_ms.unwrap_or(default.update_interval_ms),
            min_update_interval_ms: self
                .min_update_interval_ms
                .unwrap_or(default.min_update_interval_ms),
            poll_interval_ms: self.poll_interval_ms.unwrap_or(default.poll_interval_ms),
            char_threshold: self.char_threshold.unwrap_or(default.char_threshold),
            max_delta_chars: self.max_delta_chars.unwrap_or(default.max_delta_chars),
            ..default
        };
        config.validate()?;
        Ok(config)
    }
}

/// Completion model settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Ollama completion model name.
    pub model: String,
    /// Temperature for generation.
    pub temperature: f64,
    /// Optional max tokens.
    pub max_tokens: Option<u64>,
    /// Optional custom base URL.
    pub base_url: Option<String>,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            model: "ministral-3:8b-instruct-2512-q8_0".to_string(),
            temperature: 0.2,
            max_tokens: None,
            base_url: None,
        }
    }
}

impl LlmConfig {
    /// Validate configuration invariants.
    ///
    /// # Errors
    /// Returns an error if the model is empty or the base URL is malformed.
    pub fn validate(&self) -> SummarizerResult<()> {
        if self.model.trim().is_empty() {
            return Err(SummarizerError::InvalidConfig(
                "llm.model must not be empty".to_string(),
            ));
        }
        if let Some(base_url) = &self.base_url {
            Url::parse(base_url)?;
        }
        Ok(())
    }
}
