use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::common::{AuthorId, PostId};

/// A post - original content, a reply to another post, or a share of one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Post {
    pub id: PostId,

    /// Absent only for a pure share
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,

    pub author_id: AuthorId,

    // Links (immutable once set)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_post_id: Option<PostId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_post_id: Option<PostId>,

    // Denormalized counters, maintained by PostService
    pub replies_count: i32,
    pub shares_count: i32,

    pub created_at: DateTime<Utc>,
}

// =============================================================================
// SQL Queries - ALL queries must be in models/
// =============================================================================

impl Post {
    /// Find post by ID
    pub async fn find_by_id(id: PostId, pool: &PgPool) -> sqlx::Result<Option<Self>> {
        sqlx::query_as::<_, Post>("SELECT * FROM posts WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find all posts by an author, oldest first
    pub async fn find_by_author(author_id: AuthorId, pool: &PgPool) -> sqlx::Result<Vec<Self>> {
        sqlx::query_as::<_, Post>(
            "SELECT * FROM posts WHERE author_id = $1 ORDER BY created_at, id",
        )
        .bind(author_id)
        .fetch_all(pool)
        .await
    }

    /// Find direct replies to a post, oldest first
    pub async fn find_by_parent(parent_id: PostId, pool: &PgPool) -> sqlx::Result<Vec<Self>> {
        sqlx::query_as::<_, Post>(
            "SELECT * FROM posts WHERE parent_post_id = $1 ORDER BY created_at, id",
        )
        .bind(parent_id)
        .fetch_all(pool)
        .await
    }

    /// Insert a fully-built post (id and timestamp are assigned by the caller)
    pub async fn insert(&self, pool: &PgPool) -> sqlx::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO posts (
                id,
                content,
                author_id,
                parent_post_id,
                original_post_id,
                replies_count,
                shares_count,
                created_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(self.id)
        .bind(&self.content)
        .bind(self.author_id)
        .bind(self.parent_post_id)
        .bind(self.original_post_id)
        .bind(self.replies_count)
        .bind(self.shares_count)
        .bind(self.created_at)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Overwrite both counters. Returns false when no row matched.
    pub async fn update_counters(
        id: PostId,
        replies_count: i32,
        shares_count: i32,
        pool: &PgPool,
    ) -> sqlx::Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE posts
            SET replies_count = $1, shares_count = $2
            WHERE id = $3
            "#,
        )
        .bind(replies_count)
        .bind(shares_count)
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Hard delete (no-op when the row is already gone)
    pub async fn delete(id: PostId, pool: &PgPool) -> sqlx::Result<()> {
        sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(())
    }
}
