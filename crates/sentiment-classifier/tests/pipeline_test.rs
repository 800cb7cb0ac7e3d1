//! End-to-end behaviour of the keyword → model pipeline against a scripted
//! model stub. Backoff timing runs on tokio's paused clock.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::Instant;

use sentiment_classifier::{
    KeywordLexicon, LlmClient, LlmError, ResponseSchema, RetryPolicy, SentimentLabel,
    SentimentPipeline,
};

/// Model stub replaying a script, then repeating a fallback reply
struct ScriptedClient {
    script: Mutex<VecDeque<Result<String, LlmError>>>,
    fallback: Box<dyn Fn() -> Result<String, LlmError> + Send + Sync>,
    calls: AtomicU32,
    call_times: Mutex<Vec<Instant>>,
    credential: bool,
}

impl ScriptedClient {
    fn new(
        script: Vec<Result<String, LlmError>>,
        fallback: impl Fn() -> Result<String, LlmError> + Send + Sync + 'static,
    ) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(script.into()),
            fallback: Box::new(fallback),
            calls: AtomicU32::new(0),
            call_times: Mutex::new(Vec::new()),
            credential: true,
        })
    }

    fn always(reply: &'static str) -> Arc<Self> {
        Self::new(vec![], move || Ok(reply.to_string()))
    }

    fn always_failing() -> Arc<Self> {
        Self::new(vec![], || {
            Err(LlmError::Api {
                status: 503,
                body: "unavailable".to_string(),
            })
        })
    }

    fn without_credential() -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(VecDeque::new()),
            fallback: Box::new(|| Ok("positive".to_string())),
            calls: AtomicU32::new(0),
            call_times: Mutex::new(Vec::new()),
            credential: false,
        })
    }

    fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }

    fn gaps(&self) -> Vec<Duration> {
        let times = self.call_times.lock().unwrap();
        times.windows(2).map(|w| w[1] - w[0]).collect()
    }
}

#[async_trait]
impl LlmClient for ScriptedClient {
    async fn generate(
        &self,
        _prompt: &str,
        schema: Option<&ResponseSchema>,
    ) -> Result<String, LlmError> {
        assert!(schema.is_some(), "model stage should request structured output");
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.call_times.lock().unwrap().push(Instant::now());
        let next = self.script.lock().unwrap().pop_front();
        next.unwrap_or_else(|| (self.fallback)())
    }

    fn model_name(&self) -> &str {
        "scripted"
    }

    fn provider_name(&self) -> &str {
        "Stub"
    }

    fn has_credential(&self) -> bool {
        self.credential
    }
}

fn pipeline(client: Arc<ScriptedClient>) -> SentimentPipeline {
    SentimentPipeline::standard(
        Arc::new(KeywordLexicon::default()),
        client,
        RetryPolicy::default(),
    )
}

fn transport_error() -> LlmError {
    LlmError::InvalidResponse("connection reset".to_string())
}

#[tokio::test(start_paused = true)]
async fn test_positive_keyword_skips_model() {
    let client = ScriptedClient::always("negative");
    let result = pipeline(client.clone())
        .classify_detailed("The teacher was great")
        .await;

    assert_eq!(result.label, SentimentLabel::Positive);
    assert_eq!(result.attempt.strategy, Some("keyword"));
    assert_eq!(client.calls(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_mixed_keywords_are_neutral() {
    let client = ScriptedClient::always("negative");
    let label = pipeline(client.clone())
        .classify("Good class but confusing explanations")
        .await;

    assert_eq!(label, SentimentLabel::Neutral);
    assert_eq!(client.calls(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_no_keywords_invokes_model() {
    let client = ScriptedClient::always(r#"{"sentiment":"neutral"}"#);
    let result = pipeline(client.clone())
        .classify_detailed("The session ran for two hours")
        .await;

    assert_eq!(result.label, SentimentLabel::Neutral);
    assert_eq!(result.attempt.strategy, Some("model"));
    assert_eq!(result.attempt.model_calls, 1);
    assert_eq!(client.calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_two_failures_then_success_backs_off() {
    let client = ScriptedClient::new(
        vec![
            Err(transport_error()),
            Err(transport_error()),
            Ok(r#"{"sentiment":"negative"}"#.to_string()),
        ],
        || Ok("positive".to_string()),
    );

    let result = pipeline(client.clone())
        .classify_detailed("The session ran for two hours")
        .await;

    assert_eq!(result.label, SentimentLabel::Negative);
    assert_eq!(result.attempt.model_calls, 3);
    assert!(result.attempt.failure.is_none());
    assert_eq!(client.calls(), 3);

    let gaps = client.gaps();
    assert_eq!(gaps.len(), 2);
    assert!(gaps[0] >= Duration::from_secs(1) && gaps[0] < Duration::from_millis(1010));
    assert!(gaps[1] >= Duration::from_secs(2) && gaps[1] < Duration::from_millis(2010));
}

#[tokio::test(start_paused = true)]
async fn test_always_failing_model_is_unknown_after_budget() {
    let client = ScriptedClient::always_failing();
    let result = pipeline(client.clone())
        .classify_detailed("The session ran for two hours")
        .await;

    assert_eq!(result.label, SentimentLabel::Unknown);
    assert_eq!(client.calls(), 3);
    assert_eq!(result.attempt.model_calls, 3);
    assert!(result.attempt.failure.unwrap().contains("503"));
}

#[tokio::test(start_paused = true)]
async fn test_invalid_label_is_unknown_after_budget() {
    let client = ScriptedClient::always(r#"{"sentiment":"joyful"}"#);
    let label = pipeline(client.clone())
        .classify("The session ran for two hours")
        .await;

    assert_eq!(label, SentimentLabel::Unknown);
    assert_eq!(client.calls(), 3);
}

#[tokio::test(start_paused = true)]
async fn test_free_text_invalid_label_is_unknown() {
    let client = ScriptedClient::always("joyful");
    let label = pipeline(client.clone())
        .classify("The session ran for two hours")
        .await;

    assert_eq!(label, SentimentLabel::Unknown);
    assert_eq!(client.calls(), 3);
}

#[tokio::test(start_paused = true)]
async fn test_auth_failure_is_not_retried() {
    let client = ScriptedClient::new(vec![], || {
        Err(LlmError::Api {
            status: 403,
            body: "forbidden".to_string(),
        })
    });
    let label = pipeline(client.clone())
        .classify("The session ran for two hours")
        .await;

    assert_eq!(label, SentimentLabel::Unknown);
    assert_eq!(client.calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_missing_credential_fails_fast() {
    let client = ScriptedClient::without_credential();
    let start = Instant::now();
    let result = pipeline(client.clone())
        .classify_detailed("The session ran for two hours")
        .await;

    assert_eq!(result.label, SentimentLabel::Unknown);
    assert_eq!(result.attempt.model_calls, 0);
    assert_eq!(client.calls(), 0);
    assert!(start.elapsed() < Duration::from_millis(10));
}

#[tokio::test(start_paused = true)]
async fn test_classification_is_idempotent() {
    let client = ScriptedClient::always(r#"{"sentiment":"positive"}"#);
    let pipeline = pipeline(client.clone());

    let first = pipeline.classify("The session ran for two hours").await;
    let second = pipeline.classify("The session ran for two hours").await;
    assert_eq!(first, second);
    assert_eq!(first, SentimentLabel::Positive);
}

#[tokio::test(start_paused = true)]
async fn test_empty_input_makes_no_calls() {
    let client = ScriptedClient::always("positive");
    let result = pipeline(client.clone()).classify_detailed("").await;

    assert_eq!(result.label, SentimentLabel::Unknown);
    assert_eq!(result.attempt.strategy, None);
    assert_eq!(client.calls(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_custom_lexicon_changes_routing() {
    let client = ScriptedClient::always("negative");
    let pipeline = SentimentPipeline::standard(
        Arc::new(KeywordLexicon::new(["hours"], Vec::<&str>::new())),
        client.clone(),
        RetryPolicy::default(),
    );

    assert_eq!(
        pipeline.classify("The session ran for two hours").await,
        SentimentLabel::Positive
    );
    // "great" is not in this lexicon, so the model decides
    assert_eq!(
        pipeline.classify("The teacher was great").await,
        SentimentLabel::Negative
    );
    assert_eq!(client.calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_concurrent_classifications_are_independent() {
    let client = ScriptedClient::always(r#"{"sentiment":"neutral"}"#);
    let pipeline = Arc::new(pipeline(client.clone()));

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let pipeline = Arc::clone(&pipeline);
            tokio::spawn(async move {
                if i % 2 == 0 {
                    pipeline.classify("Excellent pacing").await
                } else {
                    pipeline.classify("Room 204 on Thursday").await
                }
            })
        })
        .collect();

    for (i, handle) in handles.into_iter().enumerate() {
        let label = handle.await.unwrap();
        let expected = if i % 2 == 0 {
            SentimentLabel::Positive
        } else {
            SentimentLabel::Neutral
        };
        assert_eq!(label, expected);
    }
    assert_eq!(client.calls(), 4);
}

#[tokio::test(start_paused = true)]
async fn test_cancelled_request_stops_retrying() {
    let client = ScriptedClient::always_failing();
    let pipeline = pipeline(client.clone());

    let result = tokio::time::timeout(
        Duration::from_millis(1500),
        pipeline.classify("The session ran for two hours"),
    )
    .await;

    assert!(result.is_err());
    // First call plus the retry after the 1s backoff; the 2s backoff is abandoned
    assert_eq!(client.calls(), 2);
    tokio::time::sleep(Duration::from_secs(10)).await;
    assert_eq!(client.calls(), 2);
}
