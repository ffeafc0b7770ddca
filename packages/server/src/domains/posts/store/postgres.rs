use async_trait::async_trait;
use sqlx::PgPool;

use super::PostStore;
use crate::common::{AuthorId, PostId};
use crate::domains::posts::errors::{PostError, PostResult};
use crate::domains::posts::models::Post;

/// PostgreSQL-backed post store. Queries live on the `Post` model.
#[derive(Clone)]
pub struct PgPostStore {
    pool: PgPool,
}

impl PgPostStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PostStore for PgPostStore {
    async fn find_by_id(&self, id: PostId) -> PostResult<Post> {
        Post::find_by_id(id, &self.pool)
            .await?
            .ok_or(PostError::NotFound(id))
    }

    async fn find_by_author(&self, author_id: AuthorId) -> PostResult<Vec<Post>> {
        Ok(Post::find_by_author(author_id, &self.pool).await?)
    }

    async fn find_by_parent(&self, parent_id: PostId) -> PostResult<Vec<Post>> {
        Ok(Post::find_by_parent(parent_id, &self.pool).await?)
    }

    async fn save(&self, post: &Post) -> PostResult<()> {
        post.insert(&self.pool).await.map_err(|e| {
            if let sqlx::Error::Database(db) = &e {
                if db.is_unique_violation() {
                    return PostError::Conflict(post.id);
                }
            }
            PostError::Persistence(e)
        })
    }

    async fn update_counters(
        &self,
        id: PostId,
        replies_count: i32,
        shares_count: i32,
    ) -> PostResult<()> {
        if Post::update_counters(id, replies_count, shares_count, &self.pool).await? {
            Ok(())
        } else {
            Err(PostError::NotFound(id))
        }
    }

    async fn delete(&self, id: PostId) -> PostResult<()> {
        Ok(Post::delete(id, &self.pool).await?)
    }

    async fn ping(&self) -> PostResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
