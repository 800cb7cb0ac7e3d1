//! Keyword Matcher
//!
//! Offline first-pass classifier. Lower-cases the text and counts substring
//! occurrences of every lexicon keyword (no tokenization).
//!
//! | positive hits | negative hits | result     |
//! |---------------|---------------|------------|
//! | > 0           | 0             | `positive` |
//! | 0             | > 0           | `negative` |
//! | > 0           | > 0           | `neutral`  |
//! | 0             | 0             | no decision |

use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

use crate::label::SentimentLabel;
use crate::lexicon::KeywordLexicon;
use crate::strategy::{SentimentStrategy, StrategyOutcome};

/// Hit counts for one piece of text
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeywordScore {
    pub positive_hits: usize,
    pub negative_hits: usize,
}

impl KeywordScore {
    /// Apply the tie-break policy
    pub fn label(&self) -> Option<SentimentLabel> {
        match (self.positive_hits > 0, self.negative_hits > 0) {
            (true, false) => Some(SentimentLabel::Positive),
            (false, true) => Some(SentimentLabel::Negative),
            (true, true) => Some(SentimentLabel::Neutral),
            (false, false) => None,
        }
    }
}

/// Lexicon-based matcher
#[derive(Debug, Clone)]
pub struct KeywordMatcher {
    lexicon: Arc<KeywordLexicon>,
}

impl Default for KeywordMatcher {
    fn default() -> Self {
        Self::new(Arc::new(KeywordLexicon::default()))
    }
}

impl KeywordMatcher {
    pub fn new(lexicon: Arc<KeywordLexicon>) -> Self {
        Self { lexicon }
    }

    /// Count keyword occurrences in `text`
    pub fn score(&self, text: &str) -> KeywordScore {
        let lowered = text.to_lowercase();
        let positive_hits = count_hits(&lowered, self.lexicon.positive(), "positive");
        let negative_hits = count_hits(&lowered, self.lexicon.negative(), "negative");
        KeywordScore {
            positive_hits,
            negative_hits,
        }
    }

    /// Decide a label, or `None` when no keyword matched
    pub fn match_text(&self, text: &str) -> Option<SentimentLabel> {
        self.score(text).label()
    }
}

fn count_hits(lowered: &str, keywords: &[String], list: &str) -> usize {
    keywords
        .iter()
        .map(|keyword| {
            let hits = lowered.matches(keyword.as_str()).count();
            if hits > 0 {
                debug!("Matched {} keyword '{}' x{}", list, keyword, hits);
            }
            hits
        })
        .sum()
}

#[async_trait]
impl SentimentStrategy for KeywordMatcher {
    fn name(&self) -> &'static str {
        "keyword"
    }

    async fn evaluate(&self, text: &str) -> StrategyOutcome {
        match self.match_text(text) {
            Some(label) => StrategyOutcome::decided(label),
            None => StrategyOutcome::undecided(),
        }
    }
}
