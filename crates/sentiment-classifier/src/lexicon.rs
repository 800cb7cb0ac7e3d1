//! Keyword lexicon
//!
//! The curated positive/negative word lists used by the keyword matcher.
//! A lexicon is an immutable value handed to the matcher at construction,
//! so deployments and tests can swap in their own lists.
//!
//! ## YAML format
//!
//! ```yaml
//! positive:
//!   - great
//!   - well explained
//! negative:
//!   - confusing
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;
use tracing::info;

const DEFAULT_POSITIVE: &[&str] = &[
    "good",
    "great",
    "excellent",
    "amazing",
    "awesome",
    "fantastic",
    "wonderful",
    "helpful",
    "engaging",
    "enjoyed",
    "interesting",
    "knowledgeable",
    "inspiring",
    "loved",
    "best",
    "well explained",
];

const DEFAULT_NEGATIVE: &[&str] = &[
    "bad",
    "poor",
    "boring",
    "confusing",
    "terrible",
    "awful",
    "worst",
    "useless",
    "disappointing",
    "unclear",
    "rude",
    "waste",
    "frustrating",
    "disorganized",
    "hard to follow",
    "too fast",
];

/// Errors loading a lexicon file
#[derive(Error, Debug)]
pub enum LexiconError {
    #[error("Failed to read lexicon file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid lexicon YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Lexicon has no keywords in either list")]
    Empty,
}

/// Positive and negative keyword lists, stored lower-cased
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordLexicon {
    #[serde(default)]
    positive: Vec<String>,
    #[serde(default)]
    negative: Vec<String>,
}

impl Default for KeywordLexicon {
    fn default() -> Self {
        Self::new(
            DEFAULT_POSITIVE.iter().copied(),
            DEFAULT_NEGATIVE.iter().copied(),
        )
    }
}

impl KeywordLexicon {
    /// Build a lexicon from two word lists. Entries are trimmed and
    /// lower-cased; blanks and duplicates are dropped.
    pub fn new<P, N, S, T>(positive: P, negative: N) -> Self
    where
        P: IntoIterator<Item = S>,
        N: IntoIterator<Item = T>,
        S: AsRef<str>,
        T: AsRef<str>,
    {
        Self {
            positive: normalize(positive),
            negative: normalize(negative),
        }
    }

    /// Parse a lexicon from YAML text
    pub fn from_yaml_str(yaml: &str) -> Result<Self, LexiconError> {
        let raw: KeywordLexicon = serde_yaml::from_str(yaml)?;
        let lexicon = Self::new(raw.positive, raw.negative);
        if lexicon.is_empty() {
            return Err(LexiconError::Empty);
        }
        Ok(lexicon)
    }

    /// Load a lexicon from a YAML file
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, LexiconError> {
        let path = path.as_ref();
        let yaml = std::fs::read_to_string(path).map_err(|source| LexiconError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let lexicon = Self::from_yaml_str(&yaml)?;
        info!(
            "Loaded sentiment lexicon from {} ({} positive, {} negative)",
            path.display(),
            lexicon.positive.len(),
            lexicon.negative.len()
        );
        Ok(lexicon)
    }

    pub fn positive(&self) -> &[String] {
        &self.positive
    }

    pub fn negative(&self) -> &[String] {
        &self.negative
    }

    pub fn is_empty(&self) -> bool {
        self.positive.is_empty() && self.negative.is_empty()
    }
}

fn normalize<I, S>(words: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut out: Vec<String> = Vec::new();
    for word in words {
        let word = word.as_ref().trim().to_lowercase();
        if !word.is_empty() && !out.contains(&word) {
            out.push(word);
        }
    }
    out
}
