//! Mapping of domain errors onto HTTP responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::domains::posts::PostError;

/// An error response: status code plus a small JSON body.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    body: serde_json::Value,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            body: json!({ "error": message.into() }),
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl From<PostError> for ApiError {
    fn from(err: PostError) -> Self {
        match err {
            PostError::NotFound(_) => Self {
                status: StatusCode::NOT_FOUND,
                body: json!({ "message": "Post not found" }),
            },
            PostError::Conflict(_) => Self {
                status: StatusCode::CONFLICT,
                body: json!({ "error": err.to_string() }),
            },
            PostError::Validation(message) => Self::bad_request(message),
            PostError::Persistence(_) => Self {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                body: json!({ "error": err.to_string() }),
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}
