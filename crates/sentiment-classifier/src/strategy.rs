//! Classifier strategy abstraction
//!
//! A strategy is one stage of the sentiment pipeline. It either decides a
//! label or defers to the next stage by returning `None`.

use async_trait::async_trait;
use serde::Serialize;

use crate::label::SentimentLabel;

/// What a single strategy produced for one piece of text
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct StrategyOutcome {
    /// `None` defers to the next strategy
    pub label: Option<SentimentLabel>,
    /// Outbound model calls made by this strategy
    pub model_calls: u32,
    /// Last failure seen when the strategy degraded to `Unknown`
    pub failure: Option<String>,
}

impl StrategyOutcome {
    pub fn undecided() -> Self {
        Self::default()
    }

    pub fn decided(label: SentimentLabel) -> Self {
        Self {
            label: Some(label),
            ..Self::default()
        }
    }
}

/// One stage of the classification pipeline
#[async_trait]
pub trait SentimentStrategy: Send + Sync {
    /// Short identifier recorded in the classification attempt
    fn name(&self) -> &'static str;

    /// Evaluate the text. Must not fail; failures collapse into the outcome.
    async fn evaluate(&self, text: &str) -> StrategyOutcome;
}
