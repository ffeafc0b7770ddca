use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::PostStore;
use crate::common::{AuthorId, PostId};
use crate::domains::posts::errors::{PostError, PostResult};
use crate::domains::posts::models::Post;

#[derive(Default)]
struct Inner {
    posts: HashMap<PostId, (u64, Post)>,
    next_seq: u64,
}

impl Inner {
    /// Posts matching `keep`, in insertion order.
    fn collect(&self, keep: impl Fn(&Post) -> bool) -> Vec<Post> {
        let mut matched: Vec<&(u64, Post)> =
            self.posts.values().filter(|(_, post)| keep(post)).collect();
        matched.sort_by_key(|(seq, _)| *seq);
        matched.into_iter().map(|(_, post)| post.clone()).collect()
    }
}

/// In-memory post store
///
/// Thread-safe and cloneable; clones share the same data. Used by tests and
/// for running the service without a database.
#[derive(Clone, Default)]
pub struct InMemoryPostStore {
    inner: Arc<RwLock<Inner>>,
}

impl InMemoryPostStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.posts.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl PostStore for InMemoryPostStore {
    async fn find_by_id(&self, id: PostId) -> PostResult<Post> {
        let inner = self.inner.read().await;
        inner
            .posts
            .get(&id)
            .map(|(_, post)| post.clone())
            .ok_or(PostError::NotFound(id))
    }

    async fn find_by_author(&self, author_id: AuthorId) -> PostResult<Vec<Post>> {
        let inner = self.inner.read().await;
        Ok(inner.collect(|post| post.author_id == author_id))
    }

    async fn find_by_parent(&self, parent_id: PostId) -> PostResult<Vec<Post>> {
        let inner = self.inner.read().await;
        Ok(inner.collect(|post| post.parent_post_id == Some(parent_id)))
    }

    async fn save(&self, post: &Post) -> PostResult<()> {
        let mut inner = self.inner.write().await;
        if inner.posts.contains_key(&post.id) {
            return Err(PostError::Conflict(post.id));
        }
        let seq = inner.next_seq;
        inner.next_seq += 1;
        inner.posts.insert(post.id, (seq, post.clone()));
        Ok(())
    }

    async fn update_counters(
        &self,
        id: PostId,
        replies_count: i32,
        shares_count: i32,
    ) -> PostResult<()> {
        let mut inner = self.inner.write().await;
        let (_, post) = inner.posts.get_mut(&id).ok_or(PostError::NotFound(id))?;
        post.replies_count = replies_count;
        post.shares_count = shares_count;
        Ok(())
    }

    async fn delete(&self, id: PostId) -> PostResult<()> {
        self.inner.write().await.posts.remove(&id);
        Ok(())
    }
}
