//! Student feedback service
//!
//! Students submit course feedback; each submission is classified by the
//! `sentiment-classifier` pipeline and stored with its label so staff can
//! review it.
//!
//! ## Request flow
//! POST /api/saveFeedback -> validate -> SentimentPipeline -> FeedbackStore
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use sentiment_classifier::{create_pipeline, ClassifierConfig};
//! use student_feedback::store::MemoryFeedbackStore;
//!
//! # async fn run() -> anyhow::Result<()> {
//! let pipeline = create_pipeline(&ClassifierConfig::from_env())?;
//! let label = pipeline.classify("The lectures were engaging").await;
//! assert_eq!(label.as_str(), "positive");
//! let _store = Arc::new(MemoryFeedbackStore::new());
//! # Ok(())
//! # }
//! ```

// Service configuration
pub mod config;

// Records and request/response payloads
pub mod models;

// Storage abstraction and in-memory store
pub mod store;

// Database integration (when enabled)
#[cfg(feature = "database")]
pub mod database;

// HTTP layer
#[cfg(feature = "server")]
pub mod api;
#[cfg(feature = "server")]
pub mod error;

pub use config::{ServerConfig, StoreKind};
pub use models::{FeedbackRecord, NewFeedback, SaveFeedbackRequest, SaveFeedbackResponse};
pub use store::{FeedbackStore, MemoryFeedbackStore, StoreError};

#[cfg(feature = "database")]
pub use database::{DatabaseConfig, DatabaseManager, PgFeedbackRepository};

#[cfg(feature = "server")]
pub use api::{create_router, AppState};
#[cfg(feature = "server")]
pub use error::ApiError;

pub use sentiment_classifier::{Classification, SentimentLabel, SentimentPipeline};
