//! Sentiment classification for student feedback
//!
//! This crate classifies free-text feedback as `positive`, `negative`,
//! `neutral` or `unknown`. It has no database or HTTP-server dependencies;
//! persistence stays in the `student-feedback` service.
//!
//! ## Architecture
//!
//! ```text
//! Feedback text → KeywordMatcher → (no match) → ModelClassifier → SentimentLabel
//!                                                  │
//!                                        LlmClient + RetryPolicy
//! ```
//!
//! `classify` is total: model failures, malformed output, a missing API key
//! and empty input all end as `unknown` rather than an error.

pub mod config;
pub mod factory;
pub mod gemini_client;
pub mod keyword;
pub mod label;
pub mod lexicon;
pub mod llm_client;
pub mod model;
pub mod pipeline;
pub mod retry;
pub mod strategy;

// Re-exports for convenience
pub use config::{ClassifierConfig, GeminiConfig};
pub use factory::{create_pipeline, SetupError};
pub use gemini_client::GeminiClient;
pub use keyword::{KeywordMatcher, KeywordScore};
pub use label::SentimentLabel;
pub use lexicon::{KeywordLexicon, LexiconError};
pub use llm_client::{LlmClient, LlmError, ResponseSchema};
pub use model::ModelClassifier;
pub use pipeline::{Classification, ClassificationAttempt, SentimentPipeline};
pub use retry::{RetryPolicy, DEFAULT_MAX_RETRIES, DEFAULT_RETRY_DELAY_MS};
pub use strategy::{SentimentStrategy, StrategyOutcome};
