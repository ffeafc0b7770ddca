use serde::{Deserialize, Serialize};

use crate::common::{AuthorId, PostId};
use crate::domains::posts::errors::{PostError, PostResult};

/// Upper bound on post content, in characters.
pub const MAX_CONTENT_CHARS: usize = 5000;

/// JSON body of `POST /posts`. The author comes from the `X-User-ID` header.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreatePostRequest {
    pub content: Option<String>,
    pub parent_post_id: Option<PostId>,
    pub original_post_id: Option<PostId>,
}

impl CreatePostRequest {
    pub fn with_author(self, author_id: AuthorId) -> CreatePostInput {
        CreatePostInput {
            author_id,
            content: self.content,
            parent_post_id: self.parent_post_id,
            original_post_id: self.original_post_id,
        }
    }
}

/// Input to `PostService::create_post`.
#[derive(Debug, Clone)]
pub struct CreatePostInput {
    pub author_id: AuthorId,
    pub content: Option<String>,
    pub parent_post_id: Option<PostId>,
    pub original_post_id: Option<PostId>,
}

impl CreatePostInput {
    /// Plain content post with no links.
    pub fn new(author_id: AuthorId, content: impl Into<String>) -> Self {
        Self {
            author_id,
            content: Some(content.into()),
            parent_post_id: None,
            original_post_id: None,
        }
    }

    pub fn reply_to(mut self, parent_post_id: PostId) -> Self {
        self.parent_post_id = Some(parent_post_id);
        self
    }

    /// A share of `original_post_id`, with no content of its own.
    pub fn share(author_id: AuthorId, original_post_id: PostId) -> Self {
        Self {
            author_id,
            content: None,
            parent_post_id: None,
            original_post_id: Some(original_post_id),
        }
    }

    /// Request-level rules: content is required unless this is a share, and
    /// present content must be 1..=5000 characters.
    pub fn validate(&self) -> PostResult<()> {
        match &self.content {
            None if self.original_post_id.is_none() => Err(PostError::Validation(
                "Content is required when creating a new post".to_string(),
            )),
            Some(content) => {
                let len = content.chars().count();
                if len == 0 || len > MAX_CONTENT_CHARS {
                    return Err(PostError::Validation(format!(
                        "Content length should be between 1 and {} characters",
                        MAX_CONTENT_CHARS
                    )));
                }
                Ok(())
            }
            None => Ok(()),
        }
    }
}

/// Body of simple acknowledgement responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_post_is_valid() {
        let input = CreatePostInput::new(AuthorId::new(), "hello");
        assert!(input.validate().is_ok());
    }

    #[test]
    fn pure_share_needs_no_content() {
        let input = CreatePostInput::share(AuthorId::new(), PostId::new());
        assert!(input.validate().is_ok());
    }

    #[test]
    fn missing_content_without_share_is_rejected() {
        let input = CreatePostInput {
            author_id: AuthorId::new(),
            content: None,
            parent_post_id: Some(PostId::new()),
            original_post_id: None,
        };
        let err = input.validate().unwrap_err();
        assert!(matches!(err, PostError::Validation(_)));
        assert_eq!(err.to_string(), "Content is required when creating a new post");
    }

    #[test]
    fn empty_content_is_rejected_even_on_a_share() {
        let mut input = CreatePostInput::share(AuthorId::new(), PostId::new());
        input.content = Some(String::new());
        assert!(input.validate().is_err());
    }

    #[test]
    fn length_is_counted_in_characters() {
        let at_limit = "é".repeat(MAX_CONTENT_CHARS);
        assert!(CreatePostInput::new(AuthorId::new(), at_limit).validate().is_ok());

        let over = "a".repeat(MAX_CONTENT_CHARS + 1);
        assert!(CreatePostInput::new(AuthorId::new(), over).validate().is_err());
    }

    #[test]
    fn request_body_accepts_missing_fields() {
        let req: CreatePostRequest = serde_json::from_str(r#"{"content":"hi"}"#).unwrap();
        let author = AuthorId::new();
        let input = req.with_author(author);
        assert_eq!(input.author_id, author);
        assert_eq!(input.content.as_deref(), Some("hi"));
        assert!(input.parent_post_id.is_none());
        assert!(input.original_post_id.is_none());
    }
}
