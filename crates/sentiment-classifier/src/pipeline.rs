//! Sentiment Pipeline
//!
//! Runs an ordered list of strategies and stops at the first one that
//! decides. The standard pipeline is keyword matcher, then model.
//!
//! ```text
//! text ─▶ empty? ─yes─▶ unknown
//!           │no
//!           ▼
//!      KeywordMatcher ─Some─▶ label
//!           │None
//!           ▼
//!      ModelClassifier ─▶ label | unknown
//! ```

use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info};

use crate::keyword::KeywordMatcher;
use crate::label::SentimentLabel;
use crate::lexicon::KeywordLexicon;
use crate::llm_client::LlmClient;
use crate::model::ModelClassifier;
use crate::retry::RetryPolicy;
use crate::strategy::SentimentStrategy;

/// Diagnostic record of how a label was produced. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct ClassificationAttempt {
    /// Strategy that decided, `None` for empty input or when nothing decided
    pub strategy: Option<&'static str>,
    /// Outbound model calls consumed
    pub model_calls: u32,
    /// Why the label is `unknown`, when it is
    pub failure: Option<String>,
}

/// Label plus the attempt that produced it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Classification {
    pub label: SentimentLabel,
    pub attempt: ClassificationAttempt,
}

/// Ordered chain of classifier strategies
#[derive(Clone, Default)]
pub struct SentimentPipeline {
    strategies: Vec<Arc<dyn SentimentStrategy>>,
}

impl std::fmt::Debug for SentimentPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SentimentPipeline")
            .field("strategies", &self.strategy_names())
            .finish()
    }
}

impl SentimentPipeline {
    pub fn new(strategies: Vec<Arc<dyn SentimentStrategy>>) -> Self {
        Self { strategies }
    }

    /// Keyword matcher followed by the model classifier
    pub fn standard(
        lexicon: Arc<KeywordLexicon>,
        client: Arc<dyn LlmClient>,
        policy: RetryPolicy,
    ) -> Self {
        Self::new(vec![
            Arc::new(KeywordMatcher::new(lexicon)),
            Arc::new(ModelClassifier::new(client, policy)),
        ])
    }

    /// Append a strategy to the end of the chain
    pub fn with_strategy(mut self, strategy: Arc<dyn SentimentStrategy>) -> Self {
        self.strategies.push(strategy);
        self
    }

    pub fn strategy_names(&self) -> Vec<&'static str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }

    /// Classify feedback text. Total: always yields one of the four labels.
    pub async fn classify(&self, text: &str) -> SentimentLabel {
        self.classify_detailed(text).await.label
    }

    /// Classify and report which strategy decided
    pub async fn classify_detailed(&self, text: &str) -> Classification {
        if text.trim().is_empty() {
            debug!("Empty feedback text; skipping classification");
            return Classification {
                label: SentimentLabel::Unknown,
                attempt: ClassificationAttempt {
                    failure: Some("empty feedback text".to_string()),
                    ..ClassificationAttempt::default()
                },
            };
        }

        let mut model_calls = 0;
        for strategy in &self.strategies {
            let outcome = strategy.evaluate(text).await;
            model_calls += outcome.model_calls;

            if let Some(label) = outcome.label {
                info!(
                    "Sentiment {} decided by {} strategy ({} model call(s))",
                    label,
                    strategy.name(),
                    model_calls
                );
                return Classification {
                    label,
                    attempt: ClassificationAttempt {
                        strategy: Some(strategy.name()),
                        model_calls,
                        failure: outcome.failure,
                    },
                };
            }
            debug!("{} strategy made no decision", strategy.name());
        }

        Classification {
            label: SentimentLabel::Unknown,
            attempt: ClassificationAttempt {
                strategy: None,
                model_calls,
                failure: Some("no strategy reached a decision".to_string()),
            },
        }
    }
}
