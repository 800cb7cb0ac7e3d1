//! Pipeline factory
//!
//! Builds the standard keyword → Gemini pipeline from a [`ClassifierConfig`].

use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

use crate::config::ClassifierConfig;
use crate::gemini_client::GeminiClient;
use crate::lexicon::LexiconError;
use crate::llm_client::LlmError;
use crate::pipeline::SentimentPipeline;

/// Errors building a pipeline from configuration
#[derive(Error, Debug)]
pub enum SetupError {
    #[error("Lexicon error: {0}")]
    Lexicon(#[from] LexiconError),

    #[error("Model client error: {0}")]
    Client(#[from] LlmError),
}

/// Create the standard pipeline backed by Gemini
pub fn create_pipeline(config: &ClassifierConfig) -> Result<SentimentPipeline, SetupError> {
    let lexicon = Arc::new(config.load_lexicon()?);
    let client = GeminiClient::new(config.gemini.clone())?;

    if !config.gemini.has_credential() {
        warn!("GEMINI_API_KEY not set; model fallback will report unknown sentiment");
    }

    let policy = config.retry_policy();
    info!(
        "Sentiment pipeline: {} positive / {} negative keywords, model {} ({} attempts, {:?} base backoff)",
        lexicon.positive().len(),
        lexicon.negative().len(),
        config.gemini.model,
        policy.max_attempts(),
        policy.base_delay()
    );

    Ok(SentimentPipeline::standard(lexicon, Arc::new(client), policy))
}
