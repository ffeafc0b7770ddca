//! REST endpoints for posts.
//!
//! POST   /posts               create (author from the X-User-ID header)
//! GET    /posts/:id           fetch one
//! GET    /posts/:id/replies   direct replies
//! GET    /posts/author/:id    posts by one author
//! DELETE /posts/:id           delete with reply cascade
//!
//! Handlers parse and validate the request, call `PostService`, and map
//! `PostError` to a status code. They hold no business rules.

use axum::{
    extract::{rejection::JsonRejection, Extension, Path},
    http::{HeaderMap, StatusCode},
    Json,
};
use tracing::{info, warn};

use crate::common::{AuthorId, PostId};
use crate::domains::posts::{CreatePostRequest, MessageResponse, Post};
use crate::server::app::AppState;
use crate::server::error::ApiError;

/// Header carrying the id of the user making the request.
pub const USER_ID_HEADER: &str = "x-user-id";

fn parse_post_id(raw: &str, message: &str) -> Result<PostId, ApiError> {
    PostId::parse(raw).map_err(|e| {
        warn!(raw_id = %raw, error = %e, "{}", message);
        ApiError::bad_request(message)
    })
}

pub async fn create_post_handler(
    Extension(state): Extension<AppState>,
    headers: HeaderMap,
    body: Result<Json<CreatePostRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Post>), ApiError> {
    let raw_author = headers
        .get(USER_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| {
            warn!("Missing X-User-ID header");
            ApiError::bad_request("X-User-ID header is required")
        })?;

    let author_id = AuthorId::parse(raw_author).map_err(|e| {
        warn!(author_id = %raw_author, error = %e, "Invalid AuthorID");
        ApiError::bad_request("Invalid AuthorID")
    })?;

    let Json(request) = body.map_err(|e| {
        warn!(author_id = %author_id, error = %e, "Invalid request body");
        ApiError::bad_request("Invalid request body")
    })?;

    let input = request.with_author(author_id);
    if let Err(e) = input.validate() {
        warn!(author_id = %author_id, error = %e, "Rejected post");
        return Err(e.into());
    }

    let post = state.posts.create_post(input).await?;
    Ok((StatusCode::CREATED, Json(post)))
}

pub async fn get_post_handler(
    Extension(state): Extension<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Post>, ApiError> {
    let post_id = parse_post_id(&id, "Invalid post ID")?;

    let post = state.posts.get_post(post_id).await.map_err(|e| {
        if e.is_not_found() {
            info!(post_id = %post_id, "Post not found");
        } else {
            warn!(post_id = %post_id, error = %e, "Error retrieving post");
        }
        ApiError::from(e)
    })?;

    Ok(Json(post))
}

pub async fn get_replies_handler(
    Extension(state): Extension<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<Post>>, ApiError> {
    let parent_id = parse_post_id(&id, "Invalid parent post ID")?;

    let replies = state.posts.get_replies(parent_id).await.map_err(|e| {
        warn!(post_id = %parent_id, error = %e, "Error fetching replies");
        ApiError::from(e)
    })?;

    info!(post_id = %parent_id, replies = replies.len(), "Replies retrieved");
    Ok(Json(replies))
}

pub async fn get_posts_by_author_handler(
    Extension(state): Extension<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<Post>>, ApiError> {
    let author_id = AuthorId::parse(&id).map_err(|e| {
        warn!(raw_id = %id, error = %e, "Invalid author ID");
        ApiError::bad_request("Invalid author ID")
    })?;

    let posts = state
        .posts
        .get_posts_by_author(author_id)
        .await
        .map_err(|e| {
            warn!(author_id = %author_id, error = %e, "Error fetching posts by author");
            ApiError::from(e)
        })?;

    info!(author_id = %author_id, posts = posts.len(), "Author posts retrieved");
    Ok(Json(posts))
}

pub async fn delete_post_handler(
    Extension(state): Extension<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    let post_id = parse_post_id(&id, "Invalid post ID")?;

    state.posts.delete_post(post_id).await.map_err(|e| {
        warn!(post_id = %post_id, error = %e, "Error deleting post");
        ApiError::from(e)
    })?;

    Ok(Json(MessageResponse::new("Post deleted successfully")))
}
