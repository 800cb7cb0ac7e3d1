//! HTTP-layer errors
//!
//! Internal causes are logged; clients only see the fixed messages the web
//! pages already display.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::store::StoreError;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Missing fields")]
    MissingFields,

    #[error("Invalid request body: {0}")]
    InvalidBody(String),

    #[error("Error saving feedback")]
    SaveFailed(#[source] StoreError),

    #[error("Error fetching feedback")]
    FetchFailed(#[source] StoreError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::MissingFields | ApiError::InvalidBody(_) => StatusCode::BAD_REQUEST,
            ApiError::SaveFailed(_) | ApiError::FetchFailed(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        match &self {
            ApiError::SaveFailed(source) | ApiError::FetchFailed(source) => {
                error!("{}: {}", self, source);
            }
            ApiError::InvalidBody(reason) => {
                tracing::debug!("Rejected request body: {}", reason);
            }
            ApiError::MissingFields => {}
        }

        let message = match &self {
            // Malformed JSON reads the same as an incomplete form to the client
            ApiError::InvalidBody(_) => ApiError::MissingFields.to_string(),
            other => other.to_string(),
        };

        (status, Json(json!({ "message": message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(ApiError::MissingFields.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ApiError::InvalidBody("eof".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::SaveFailed(StoreError::Unavailable("down".into())).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_messages_hide_internal_cause() {
        let err = ApiError::FetchFailed(StoreError::Unavailable("pool timed out".into()));
        assert_eq!(err.to_string(), "Error fetching feedback");
    }
}
