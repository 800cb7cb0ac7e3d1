//! Classifier configuration
//!
//! Values come from the environment. A missing `GEMINI_API_KEY` is not an
//! error here: the model stage then fails fast to `unknown`, and it is up to
//! the host process to report the missing credential at startup.

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::lexicon::{KeywordLexicon, LexiconError};
use crate::retry::{RetryPolicy, DEFAULT_MAX_RETRIES, DEFAULT_RETRY_DELAY_MS};

pub const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-flash";
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Gemini API configuration
#[derive(Clone)]
pub struct GeminiConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
    pub max_output_tokens: Option<u32>,
    pub temperature: Option<f32>,
    pub timeout_seconds: u64,
}

impl std::fmt::Debug for GeminiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "***"))
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("max_output_tokens", &self.max_output_tokens)
            .field("temperature", &self.temperature)
            .field("timeout_seconds", &self.timeout_seconds)
            .finish()
    }
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_GEMINI_MODEL.to_string(),
            base_url: DEFAULT_GEMINI_BASE_URL.to_string(),
            max_output_tokens: Some(32),
            temperature: Some(0.0),
            timeout_seconds: 30,
        }
    }
}

impl GeminiConfig {
    /// Read `GEMINI_API_KEY`, `GEMINI_MODEL`, `GEMINI_BASE_URL` and
    /// `GEMINI_TIMEOUT_SECONDS`
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            api_key: std::env::var("GEMINI_API_KEY")
                .ok()
                .filter(|key| !key.trim().is_empty()),
            model: std::env::var("GEMINI_MODEL").unwrap_or(defaults.model),
            base_url: std::env::var("GEMINI_BASE_URL").unwrap_or(defaults.base_url),
            timeout_seconds: env_parse("GEMINI_TIMEOUT_SECONDS", defaults.timeout_seconds),
            ..defaults
        }
    }

    pub fn has_credential(&self) -> bool {
        self.api_key.is_some()
    }
}

/// Everything needed to build a sentiment pipeline
#[derive(Debug, Clone)]
pub struct ClassifierConfig {
    pub gemini: GeminiConfig,
    /// Attempt budget for the model stage
    pub max_retries: u32,
    /// Base backoff delay; doubles after every failed attempt
    pub retry_delay_ms: u64,
    /// Optional YAML lexicon replacing the built-in keyword lists
    pub lexicon_path: Option<PathBuf>,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            gemini: GeminiConfig::default(),
            max_retries: DEFAULT_MAX_RETRIES,
            retry_delay_ms: DEFAULT_RETRY_DELAY_MS,
            lexicon_path: None,
        }
    }
}

impl ClassifierConfig {
    /// Read the Gemini settings plus `SENTIMENT_MAX_RETRIES`,
    /// `SENTIMENT_RETRY_DELAY_MS` and `SENTIMENT_LEXICON_PATH`
    pub fn from_env() -> Self {
        Self {
            gemini: GeminiConfig::from_env(),
            max_retries: env_parse("SENTIMENT_MAX_RETRIES", DEFAULT_MAX_RETRIES),
            retry_delay_ms: env_parse("SENTIMENT_RETRY_DELAY_MS", DEFAULT_RETRY_DELAY_MS),
            lexicon_path: std::env::var("SENTIMENT_LEXICON_PATH")
                .ok()
                .filter(|p| !p.trim().is_empty())
                .map(PathBuf::from),
        }
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.max_retries, Duration::from_millis(self.retry_delay_ms))
    }

    /// The configured lexicon file, or the built-in lists
    pub fn load_lexicon(&self) -> Result<KeywordLexicon, LexiconError> {
        match &self.lexicon_path {
            Some(path) => KeywordLexicon::from_yaml_file(path),
            None => Ok(KeywordLexicon::default()),
        }
    }
}

fn env_parse<T: FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|value| value.trim().parse().ok())
        .unwrap_or(default)
}
