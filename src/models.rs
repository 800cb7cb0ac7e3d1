//! Feedback records and API payloads
//!
//! Wire names follow the web client: submissions arrive camelCase
//! (`studentEmail`, `feedback`), stored rows go back out with the column
//! names the admin table reads (`Course`, `FeedbackText`, `SubmittedAt`).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use sentiment_classifier::SentimentLabel;

/// A stored feedback row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "database", derive(sqlx::FromRow))]
#[serde(rename_all = "PascalCase")]
pub struct FeedbackRecord {
    pub feedback_id: Uuid,
    pub student_email: String,
    pub course: String,
    pub teacher: String,
    pub feedback_text: String,
    /// Lowercase label word; `unknown` is kept distinct from `neutral`
    pub sentiment: String,
    pub submitted_at: DateTime<Utc>,
}

/// Fields for inserting a new feedback row. Id and timestamp are assigned
/// by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewFeedback {
    pub student_email: String,
    pub course: String,
    pub teacher: String,
    pub feedback_text: String,
    pub sentiment: SentimentLabel,
}

/// `POST /api/saveFeedback` body
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveFeedbackRequest {
    #[serde(default)]
    pub student_email: Option<String>,
    #[serde(default)]
    pub course: Option<String>,
    #[serde(default)]
    pub teacher: Option<String>,
    #[serde(default)]
    pub feedback: Option<String>,
}

/// A submission whose required fields are all present and non-blank
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidSubmission {
    pub student_email: String,
    pub course: String,
    pub teacher: String,
    pub feedback: String,
}

impl SaveFeedbackRequest {
    /// Trim every field; `None` if any is missing or blank
    pub fn validate(self) -> Option<ValidSubmission> {
        fn required(value: Option<String>) -> Option<String> {
            value
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        }

        Some(ValidSubmission {
            student_email: required(self.student_email)?,
            course: required(self.course)?,
            teacher: required(self.teacher)?,
            feedback: required(self.feedback)?,
        })
    }
}

impl ValidSubmission {
    pub fn into_new_feedback(self, sentiment: SentimentLabel) -> NewFeedback {
        NewFeedback {
            student_email: self.student_email,
            course: self.course,
            teacher: self.teacher,
            feedback_text: self.feedback,
            sentiment,
        }
    }
}

/// `POST /api/saveFeedback` success body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveFeedbackResponse {
    pub message: String,
    pub sentiment: SentimentLabel,
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    #[test]
    fn test_request_uses_camel_case() {
        let req: SaveFeedbackRequest = serde_json::from_value(json!({
            "studentEmail": "a@uni.edu",
            "course": "CS101",
            "teacher": "Dr. Lee",
            "feedback": "Great pacing"
        }))
        .unwrap();

        let valid = req.validate().unwrap();
        assert_eq!(valid.student_email, "a@uni.edu");
        assert_eq!(valid.feedback, "Great pacing");
    }

    #[test]
    fn test_validate_rejects_missing_and_blank() {
        let missing = SaveFeedbackRequest {
            student_email: Some("a@uni.edu".into()),
            course: Some("CS101".into()),
            teacher: Some("Dr. Lee".into()),
            feedback: None,
        };
        assert!(missing.validate().is_none());

        let blank = SaveFeedbackRequest {
            student_email: Some("a@uni.edu".into()),
            course: Some("   ".into()),
            teacher: Some("Dr. Lee".into()),
            feedback: Some("ok".into()),
        };
        assert!(blank.validate().is_none());
    }

    #[test]
    fn test_validate_trims() {
        let req = SaveFeedbackRequest {
            student_email: Some(" a@uni.edu ".into()),
            course: Some(" CS101".into()),
            teacher: Some("Dr. Lee ".into()),
            feedback: Some("\tfine\n".into()),
        };
        let valid = req.validate().unwrap();
        assert_eq!(valid.course, "CS101");
        assert_eq!(valid.feedback, "fine");
    }

    #[test]
    fn test_record_uses_admin_column_names() {
        let record = FeedbackRecord {
            feedback_id: Uuid::nil(),
            student_email: "a@uni.edu".into(),
            course: "CS101".into(),
            teacher: "Dr. Lee".into(),
            feedback_text: "Great".into(),
            sentiment: "positive".into(),
            submitted_at: Utc::now(),
        };

        let value = serde_json::to_value(&record).unwrap();
        for key in [
            "FeedbackId",
            "StudentEmail",
            "Course",
            "Teacher",
            "FeedbackText",
            "Sentiment",
            "SubmittedAt",
        ] {
            assert!(value.get(key).is_some(), "missing {}", key);
        }
    }

    proptest! {
        #[test]
        fn prop_validate_accepts_exactly_non_blank_fields(
            email in "[ \t]{0,2}[a-z@.]{0,8}[ \t]{0,2}",
            course in "[ \t]{0,2}[A-Z0-9]{0,6}[ \t]{0,2}",
            feedback in "[ \t\n]{0,2}[a-z ]{0,20}[ \t\n]{0,2}",
        ) {
            let req = SaveFeedbackRequest {
                student_email: Some(email.clone()),
                course: Some(course.clone()),
                teacher: Some("Dr. Lee".into()),
                feedback: Some(feedback.clone()),
            };
            let all_present = [&email, &course, &feedback]
                .iter()
                .all(|v| !v.trim().is_empty());

            match req.validate() {
                Some(valid) => {
                    prop_assert!(all_present);
                    prop_assert_eq!(valid.student_email, email.trim());
                    prop_assert_eq!(valid.course, course.trim());
                    prop_assert_eq!(valid.feedback, feedback.trim());
                }
                None => prop_assert!(!all_present),
            }
        }
    }
}
