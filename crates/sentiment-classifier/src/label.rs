//! Sentiment labels
//!
//! `Unknown` is a classification-failure sentinel. It is stored as its own
//! value and must never be folded into `Neutral`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Outcome of classifying one piece of feedback
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SentimentLabel {
    Positive,
    Negative,
    Neutral,
    Unknown,
}

impl SentimentLabel {
    /// The three labels a model is allowed to answer with
    pub const OPINIONS: [SentimentLabel; 3] = [
        SentimentLabel::Positive,
        SentimentLabel::Negative,
        SentimentLabel::Neutral,
    ];

    /// Storage/wire form of the label
    pub fn as_str(&self) -> &'static str {
        match self {
            SentimentLabel::Positive => "positive",
            SentimentLabel::Negative => "negative",
            SentimentLabel::Neutral => "neutral",
            SentimentLabel::Unknown => "unknown",
        }
    }

    /// True for every label except `Unknown`
    pub fn is_opinion(&self) -> bool {
        !matches!(self, SentimentLabel::Unknown)
    }
}

impl fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string is not one of the four label words
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("'{0}' is not a sentiment label")]
pub struct InvalidLabel(pub String);

impl FromStr for SentimentLabel {
    type Err = InvalidLabel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "positive" => Ok(SentimentLabel::Positive),
            "negative" => Ok(SentimentLabel::Negative),
            "neutral" => Ok(SentimentLabel::Neutral),
            "unknown" => Ok(SentimentLabel::Unknown),
            _ => Err(InvalidLabel(s.to_string())),
        }
    }
}
