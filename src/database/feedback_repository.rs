//! Feedback repository - Postgres storage for submissions
//!
//! Table layout:
//! - feedback_id uuid PK
//! - student_email text
//! - course text
//! - teacher text
//! - feedback_text text
//! - sentiment text ('positive' | 'negative' | 'neutral' | 'unknown')
//! - submitted_at timestamptz

use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use tracing::{debug, info};
use uuid::Uuid;

use crate::models::{FeedbackRecord, NewFeedback};
use crate::store::{FeedbackStore, StoreError};

/// Postgres-backed [`FeedbackStore`]
#[derive(Clone, Debug)]
pub struct PgFeedbackRepository {
    pool: PgPool,
}

impl PgFeedbackRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FeedbackStore for PgFeedbackRepository {
    async fn insert(&self, feedback: NewFeedback) -> Result<FeedbackRecord, StoreError> {
        let record = sqlx::query_as::<_, FeedbackRecord>(
            r#"
            INSERT INTO feedback (feedback_id, student_email, course, teacher, feedback_text, sentiment, submitted_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING feedback_id, student_email, course, teacher, feedback_text, sentiment, submitted_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&feedback.student_email)
        .bind(&feedback.course)
        .bind(&feedback.teacher)
        .bind(&feedback.feedback_text)
        .bind(feedback.sentiment.as_str())
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        info!(
            "Stored feedback {} for course '{}' (sentiment: {})",
            record.feedback_id, record.course, record.sentiment
        );

        Ok(record)
    }

    async fn list_recent(&self) -> Result<Vec<FeedbackRecord>, StoreError> {
        let records = sqlx::query_as::<_, FeedbackRecord>(
            r#"
            SELECT feedback_id, student_email, course, teacher, feedback_text, sentiment, submitted_at
            FROM feedback
            ORDER BY submitted_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        debug!("Fetched {} feedback rows", records.len());
        Ok(records)
    }
}
