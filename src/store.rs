//! Feedback storage abstraction
//!
//! Route handlers only see [`FeedbackStore`]. Postgres lives behind the
//! `database` feature; [`MemoryFeedbackStore`] serves tests and local runs.

use async_trait::async_trait;
use chrono::Utc;
use std::sync::RwLock;
use thiserror::Error;
use uuid::Uuid;

use crate::models::{FeedbackRecord, NewFeedback};

/// Storage errors
#[derive(Error, Debug)]
pub enum StoreError {
    #[cfg(feature = "database")]
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

/// Persistence for feedback records
#[async_trait]
pub trait FeedbackStore: Send + Sync {
    /// Persist a submission, assigning id and submission time
    async fn insert(&self, feedback: NewFeedback) -> Result<FeedbackRecord, StoreError>;

    /// All records, newest first
    async fn list_recent(&self) -> Result<Vec<FeedbackRecord>, StoreError>;
}

/// In-process store
#[derive(Debug, Default)]
pub struct MemoryFeedbackStore {
    records: RwLock<Vec<FeedbackRecord>>,
}

impl MemoryFeedbackStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.read().map(|r| r.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl FeedbackStore for MemoryFeedbackStore {
    async fn insert(&self, feedback: NewFeedback) -> Result<FeedbackRecord, StoreError> {
        let record = FeedbackRecord {
            feedback_id: Uuid::new_v4(),
            student_email: feedback.student_email,
            course: feedback.course,
            teacher: feedback.teacher,
            feedback_text: feedback.feedback_text,
            sentiment: feedback.sentiment.to_string(),
            submitted_at: Utc::now(),
        };

        self.records
            .write()
            .map_err(|e| StoreError::Unavailable(e.to_string()))?
            .push(record.clone());

        Ok(record)
    }

    async fn list_recent(&self) -> Result<Vec<FeedbackRecord>, StoreError> {
        let records = self
            .records
            .read()
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;

        // Insertion order breaks ties between equal timestamps
        let mut out: Vec<FeedbackRecord> = records.iter().rev().cloned().collect();
        out.sort_by(|a, b| b.submitted_at.cmp(&a.submitted_at));
        Ok(out)
    }
}
