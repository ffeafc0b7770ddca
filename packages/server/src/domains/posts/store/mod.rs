//! Persistence for posts.
//!
//! `PostStore` is an infrastructure trait only: id-addressed primitives with
//! no business rules and no cascading. Counter maintenance and cascade
//! ordering belong to `PostService`.

mod memory;
mod postgres;

pub use memory::InMemoryPostStore;
pub use postgres::PgPostStore;

use async_trait::async_trait;

use crate::common::{AuthorId, PostId};
use crate::domains::posts::errors::PostResult;
use crate::domains::posts::models::Post;

#[async_trait]
pub trait PostStore: Send + Sync {
    /// Point lookup. `PostError::NotFound` when absent.
    async fn find_by_id(&self, id: PostId) -> PostResult<Post>;

    /// All posts by an author, in creation order.
    async fn find_by_author(&self, author_id: AuthorId) -> PostResult<Vec<Post>>;

    /// Direct replies to a post. Empty when there are none; every call
    /// re-runs the lookup.
    async fn find_by_parent(&self, parent_id: PostId) -> PostResult<Vec<Post>>;

    /// Insert a new post. `PostError::Conflict` if the id is taken.
    async fn save(&self, post: &Post) -> PostResult<()>;

    /// Overwrite only the two counters. `PostError::NotFound` when absent.
    async fn update_counters(
        &self,
        id: PostId,
        replies_count: i32,
        shares_count: i32,
    ) -> PostResult<()>;

    /// Remove a post. Deleting a missing id is not an error.
    async fn delete(&self, id: PostId) -> PostResult<()>;

    /// Liveness probe for health checks.
    async fn ping(&self) -> PostResult<()> {
        Ok(())
    }
}
