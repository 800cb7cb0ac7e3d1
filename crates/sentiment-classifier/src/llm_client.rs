//! LLM client abstraction
//!
//! The model-backed classifier talks to the outside world only through
//! [`LlmClient`], so tests can substitute a stub and count calls.

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

/// Errors from a single model call
#[derive(Error, Debug)]
pub enum LlmError {
    #[error("No API credential configured for {provider}")]
    MissingCredential { provider: String },

    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Model API returned HTTP {status}: {body}")]
    Api { status: u16, body: String },

    #[error("Failed to decode model response: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid model response: {0}")]
    InvalidResponse(String),
}

impl LlmError {
    /// Errors that no amount of retrying will fix
    pub fn is_permanent(&self) -> bool {
        match self {
            LlmError::MissingCredential { .. } => true,
            LlmError::Api { status, .. } => matches!(status, 401 | 403),
            _ => false,
        }
    }
}

/// A JSON schema the model should constrain its answer to
#[derive(Debug, Clone)]
pub struct ResponseSchema {
    pub name: String,
    pub schema: Value,
}

/// Minimal generative-model client
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Send a prompt and return the raw text of the first candidate.
    /// When `schema` is given the provider is asked for schema-constrained JSON.
    async fn generate(
        &self,
        prompt: &str,
        schema: Option<&ResponseSchema>,
    ) -> Result<String, LlmError>;

    fn model_name(&self) -> &str;

    fn provider_name(&self) -> &str;

    /// Whether a credential is present. Clients without one fail fast.
    fn has_credential(&self) -> bool {
        true
    }
}
