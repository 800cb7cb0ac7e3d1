//! Feedback API routes
//!
//! Endpoints:
//! - POST /api/saveFeedback - classify and store a submission
//! - GET  /api/getFeedback  - all submissions, newest first
//! - GET  /api/health       - liveness probe

use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header, HeaderValue, Method, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{info, warn};

use sentiment_classifier::SentimentPipeline;

use crate::error::ApiError;
use crate::models::{FeedbackRecord, SaveFeedbackRequest, SaveFeedbackResponse};
use crate::store::FeedbackStore;

// =============================================================================
// STATE
// =============================================================================

/// Shared state for feedback routes
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<SentimentPipeline>,
    pub store: Arc<dyn FeedbackStore>,
}

impl AppState {
    pub fn new(pipeline: SentimentPipeline, store: Arc<dyn FeedbackStore>) -> Self {
        Self {
            pipeline: Arc::new(pipeline),
            store,
        }
    }
}

// =============================================================================
// ROUTER
// =============================================================================

/// Create the feedback API router with tracing and CORS layers
pub fn create_router(state: AppState, frontend_origin: Option<&str>) -> Router {
    Router::new()
        .route("/api/saveFeedback", post(save_feedback))
        .route("/api/getFeedback", get(get_feedback))
        .route("/api/health", get(health))
        .with_state(Arc::new(state))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors_layer(frontend_origin)),
        )
}

/// Credentialed CORS for a single origin, or permissive CORS when no
/// origin is configured
pub fn cors_layer(frontend_origin: Option<&str>) -> CorsLayer {
    let restricted = frontend_origin.and_then(|origin| match origin.parse::<HeaderValue>() {
        Ok(value) => Some(value),
        Err(e) => {
            warn!("Ignoring invalid FRONTEND_ORIGIN '{}': {}", origin, e);
            None
        }
    });

    match restricted {
        Some(origin) => CorsLayer::new()
            .allow_origin(origin)
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
            .allow_credentials(true),
        None => CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any),
    }
}

// =============================================================================
// HANDLERS
// =============================================================================

async fn save_feedback(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<SaveFeedbackRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<SaveFeedbackResponse>), ApiError> {
    let Json(request) = payload.map_err(|e| ApiError::InvalidBody(e.body_text()))?;
    let submission = request.validate().ok_or(ApiError::MissingFields)?;

    let classification = state.pipeline.classify_detailed(&submission.feedback).await;
    if let Some(reason) = &classification.attempt.failure {
        warn!(
            "Feedback for '{}' classified as {}: {}",
            submission.course, classification.label, reason
        );
    }

    let label = classification.label;
    let record = state
        .store
        .insert(submission.into_new_feedback(label))
        .await
        .map_err(ApiError::SaveFailed)?;

    info!(
        "Saved feedback {} (course: {}, teacher: {}, sentiment: {}, model calls: {})",
        record.feedback_id,
        record.course,
        record.teacher,
        label,
        classification.attempt.model_calls
    );

    Ok((
        StatusCode::CREATED,
        Json(SaveFeedbackResponse {
            message: "Feedback saved successfully".to_string(),
            sentiment: label,
        }),
    ))
}

async fn get_feedback(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<FeedbackRecord>>, ApiError> {
    let records = state
        .store
        .list_recent()
        .await
        .map_err(ApiError::FetchFailed)?;
    Ok(Json(records))
}

async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}
