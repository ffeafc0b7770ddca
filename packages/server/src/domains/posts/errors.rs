use thiserror::Error;

use crate::common::PostId;

/// Errors surfaced by the post store and the post service.
#[derive(Error, Debug)]
pub enum PostError {
    #[error("Post not found: {0}")]
    NotFound(PostId),

    #[error("Post already exists: {0}")]
    Conflict(PostId),

    #[error("Database error: {0}")]
    Persistence(#[from] sqlx::Error),

    #[error("{0}")]
    Validation(String),
}

impl PostError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, PostError::NotFound(_))
    }
}

pub type PostResult<T> = Result<T, PostError>;
