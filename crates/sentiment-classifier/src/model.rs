//! Model-Backed Classifier
//!
//! Fallback stage for text the keyword matcher could not decide. Asks the
//! model for one of three words under a JSON schema, retries transport and
//! parse failures per the [`RetryPolicy`], and collapses anything terminal
//! into `unknown`. No model error ever leaves this module.

use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::label::SentimentLabel;
use crate::llm_client::{LlmClient, LlmError, ResponseSchema};
use crate::retry::RetryPolicy;
use crate::strategy::{SentimentStrategy, StrategyOutcome};

/// LLM-backed sentiment classifier
#[derive(Clone)]
pub struct ModelClassifier {
    client: Arc<dyn LlmClient>,
    policy: RetryPolicy,
    schema: ResponseSchema,
}

impl std::fmt::Debug for ModelClassifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelClassifier")
            .field("provider", &self.client.provider_name())
            .field("model", &self.client.model_name())
            .field("policy", &self.policy)
            .finish()
    }
}

impl ModelClassifier {
    pub fn new(client: Arc<dyn LlmClient>, policy: RetryPolicy) -> Self {
        Self {
            client,
            policy,
            schema: sentiment_schema(),
        }
    }

    /// Classify via the model. Returns `Unknown` on exhaustion, malformed
    /// output or a missing credential.
    pub async fn classify_with_model(&self, text: &str) -> SentimentLabel {
        self.run(text).await.label.unwrap_or(SentimentLabel::Unknown)
    }

    async fn run(&self, text: &str) -> StrategyOutcome {
        if !self.client.has_credential() {
            warn!(
                "No {} credential configured; sentiment is unknown",
                self.client.provider_name()
            );
            return StrategyOutcome {
                label: Some(SentimentLabel::Unknown),
                model_calls: 0,
                failure: Some(
                    LlmError::MissingCredential {
                        provider: self.client.provider_name().to_string(),
                    }
                    .to_string(),
                ),
            };
        }

        let prompt = build_prompt(text);
        let outcome = self
            .policy
            .run(
                |attempt| {
                    let prompt = prompt.as_str();
                    async move {
                        debug!(
                            "Requesting {} sentiment via {} (attempt {})",
                            self.schema.name,
                            self.client.model_name(),
                            attempt + 1
                        );
                        self.client
                            .generate(prompt, Some(&self.schema))
                            .await
                            .and_then(|raw| parse_model_response(&raw))
                    }
                },
                |err: &LlmError| !err.is_permanent(),
            )
            .await;

        match outcome.result {
            Ok(label) => {
                info!(
                    "Model classified feedback as {} after {} attempt(s)",
                    label, outcome.attempts
                );
                StrategyOutcome {
                    label: Some(label),
                    model_calls: outcome.attempts,
                    failure: None,
                }
            }
            Err(err) => {
                warn!(
                    "Model classification failed after {} attempt(s): {}",
                    outcome.attempts, err
                );
                StrategyOutcome {
                    label: Some(SentimentLabel::Unknown),
                    model_calls: outcome.attempts,
                    failure: Some(err.to_string()),
                }
            }
        }
    }
}

#[async_trait]
impl SentimentStrategy for ModelClassifier {
    fn name(&self) -> &'static str {
        "model"
    }

    async fn evaluate(&self, text: &str) -> StrategyOutcome {
        self.run(text).await
    }
}

/// Prompt asking for exactly one of the three opinion words
pub fn build_prompt(text: &str) -> String {
    format!(
        "You are a sentiment analysis assistant for student course feedback.\n\
         Classify the feedback below as exactly one of: \"positive\", \"negative\", or \"neutral\".\n\
         Respond with JSON of the form {{\"sentiment\": \"<label>\"}} and nothing else.\n\
         Feedback: \"{}\"",
        text.replace('"', "'")
    )
}

/// Gemini response schema restricting output to the three labels
pub fn sentiment_schema() -> ResponseSchema {
    let allowed: Vec<&str> = SentimentLabel::OPINIONS.iter().map(|l| l.as_str()).collect();
    ResponseSchema {
        name: "sentiment".to_string(),
        schema: json!({
            "type": "OBJECT",
            "properties": {
                "sentiment": {
                    "type": "STRING",
                    "enum": allowed
                }
            },
            "required": ["sentiment"]
        }),
    }
}

/// Parse a model answer into one of the three opinion labels.
///
/// JSON objects must carry a `sentiment` string naming an allowed label.
/// Anything else is treated as free text: lower-cased, stripped down to
/// alphabetic characters and searched for `positive`, `negative`, `neutral`
/// in that order.
pub fn parse_model_response(raw: &str) -> Result<SentimentLabel, LlmError> {
    let trimmed = raw.trim();

    if trimmed.starts_with('{') {
        let value: Value = serde_json::from_str(trimmed)?;
        let field = value
            .get("sentiment")
            .and_then(Value::as_str)
            .ok_or_else(|| {
                LlmError::InvalidResponse(format!("missing 'sentiment' field in {}", trimmed))
            })?;
        return match field.parse::<SentimentLabel>() {
            Ok(label) if label.is_opinion() => Ok(label),
            _ => Err(LlmError::InvalidResponse(format!(
                "'{}' is not an allowed sentiment",
                field
            ))),
        };
    }

    let letters: String = trimmed
        .to_lowercase()
        .chars()
        .filter(|c| c.is_alphabetic())
        .collect();

    SentimentLabel::OPINIONS
        .into_iter()
        .find(|label| letters.contains(label.as_str()))
        .ok_or_else(|| {
            LlmError::InvalidResponse(format!("unexpected sentiment response '{}'", trimmed))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_parse_structured() {
        assert_eq!(
            parse_model_response(r#"{"sentiment":"negative"}"#).unwrap(),
            SentimentLabel::Negative
        );
        assert_eq!(
            parse_model_response(" {\"sentiment\": \" Neutral \"}\n").unwrap(),
            SentimentLabel::Neutral
        );
    }

    #[test]
    fn test_parse_structured_rejects_outside_values() {
        assert!(parse_model_response(r#"{"sentiment":"joyful"}"#).is_err());
        assert!(parse_model_response(r#"{"sentiment":"unknown"}"#).is_err());
        assert!(parse_model_response(r#"{"mood":"positive"}"#).is_err());
        assert!(parse_model_response(r#"{"sentiment": 1}"#).is_err());
    }

    #[test]
    fn test_parse_malformed_json() {
        let err = parse_model_response(r#"{"sentiment": "#).unwrap_err();
        assert!(matches!(err, LlmError::Json(_)));
    }

    #[test]
    fn test_parse_free_text_with_noise() {
        assert_eq!(
            parse_model_response("\"Positive.\"\n").unwrap(),
            SentimentLabel::Positive
        );
        assert_eq!(
            parse_model_response("**NEGATIVE**").unwrap(),
            SentimentLabel::Negative
        );
        assert_eq!(
            parse_model_response("neu-tral").unwrap(),
            SentimentLabel::Neutral
        );
        assert!(parse_model_response("joyful").is_err());
        assert!(parse_model_response("").is_err());
    }

    #[test]
    fn test_prompt_embeds_feedback() {
        let prompt = build_prompt("The \"lab\" ran late");
        assert!(prompt.contains("'lab' ran late"));
        assert!(prompt.contains("\"sentiment\""));
    }

    #[test]
    fn test_schema_lists_only_opinions() {
        let schema = sentiment_schema();
        assert_eq!(
            schema.schema["properties"]["sentiment"]["enum"],
            json!(["positive", "negative", "neutral"])
        );
    }

    #[tokio::test]
    async fn test_failure_diagnostic_omits_api_key() {
        let client = crate::gemini_client::GeminiClient::new(crate::config::GeminiConfig {
            api_key: Some("SUPERSECRETKEY123".to_string()),
            base_url: "http://127.0.0.1:1/v1beta/models".to_string(),
            timeout_seconds: 5,
            ..crate::config::GeminiConfig::default()
        })
        .unwrap();
        let classifier = ModelClassifier::new(Arc::new(client), RetryPolicy::no_retry());

        let outcome = classifier.evaluate("We covered chapter four").await;
        assert_eq!(outcome.label, Some(SentimentLabel::Unknown));
        assert_eq!(outcome.model_calls, 1);

        let failure = outcome.failure.unwrap();
        assert!(!failure.contains("SUPERSECRETKEY123"), "{}", failure);
    }

    proptest! {
        #[test]
        fn prop_parse_never_yields_unknown(raw in ".{0,64}") {
            if let Ok(label) = parse_model_response(&raw) {
                prop_assert!(label.is_opinion());
            }
        }
    }
}
