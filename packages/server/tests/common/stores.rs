//! Store wrappers for exercising failure and concurrency paths.
//!
//! Both wrap an `InMemoryPostStore` and delegate everything they are not
//! told to interfere with.

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use hornet_core::common::{AuthorId, PostId};
use hornet_core::domains::posts::{InMemoryPostStore, Post, PostError, PostResult, PostStore};
use tokio::sync::Barrier;

/// A store operation that can be made to fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Fault {
    FindById(PostId),
    FindByParent(PostId),
    Save,
    UpdateCounters(PostId),
    Delete(PostId),
}

/// Fails the configured operations with a persistence error.
pub struct FaultyStore {
    pub inner: InMemoryPostStore,
    faults: Mutex<HashSet<Fault>>,
}

impl FaultyStore {
    pub fn new(inner: InMemoryPostStore) -> Self {
        Self {
            inner,
            faults: Mutex::new(HashSet::new()),
        }
    }

    pub fn inject(&self, fault: Fault) {
        self.faults.lock().unwrap().insert(fault);
    }

    pub fn clear(&self) {
        self.faults.lock().unwrap().clear();
    }

    fn check(&self, op: Fault) -> PostResult<()> {
        if self.faults.lock().unwrap().contains(&op) {
            return Err(PostError::Persistence(sqlx::Error::PoolTimedOut));
        }
        Ok(())
    }
}

#[async_trait]
impl PostStore for FaultyStore {
    async fn find_by_id(&self, id: PostId) -> PostResult<Post> {
        self.check(Fault::FindById(id))?;
        self.inner.find_by_id(id).await
    }

    async fn find_by_author(&self, author_id: AuthorId) -> PostResult<Vec<Post>> {
        self.inner.find_by_author(author_id).await
    }

    async fn find_by_parent(&self, parent_id: PostId) -> PostResult<Vec<Post>> {
        self.check(Fault::FindByParent(parent_id))?;
        self.inner.find_by_parent(parent_id).await
    }

    async fn save(&self, post: &Post) -> PostResult<()> {
        self.check(Fault::Save)?;
        self.inner.save(post).await
    }

    async fn update_counters(
        &self,
        id: PostId,
        replies_count: i32,
        shares_count: i32,
    ) -> PostResult<()> {
        self.check(Fault::UpdateCounters(id))?;
        self.inner
            .update_counters(id, replies_count, shares_count)
            .await
    }

    async fn delete(&self, id: PostId) -> PostResult<()> {
        self.check(Fault::Delete(id))?;
        self.inner.delete(id).await
    }
}

/// Holds the first `parties` lookups of `target` at a barrier *after* they
/// have read the post, so every party sees the same counter values before
/// any of them writes.
pub struct GatedStore {
    pub inner: InMemoryPostStore,
    target: PostId,
    remaining: AtomicUsize,
    barrier: Barrier,
}

impl GatedStore {
    pub fn new(inner: InMemoryPostStore, target: PostId, parties: usize) -> Self {
        Self {
            inner,
            target,
            remaining: AtomicUsize::new(parties),
            barrier: Barrier::new(parties),
        }
    }
}

#[async_trait]
impl PostStore for GatedStore {
    async fn find_by_id(&self, id: PostId) -> PostResult<Post> {
        let post = self.inner.find_by_id(id).await;
        let gated = id == self.target
            && self
                .remaining
                .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
                .is_ok();
        if gated {
            self.barrier.wait().await;
        }
        post
    }

    async fn find_by_author(&self, author_id: AuthorId) -> PostResult<Vec<Post>> {
        self.inner.find_by_author(author_id).await
    }

    async fn find_by_parent(&self, parent_id: PostId) -> PostResult<Vec<Post>> {
        self.inner.find_by_parent(parent_id).await
    }

    async fn save(&self, post: &Post) -> PostResult<()> {
        self.inner.save(post).await
    }

    async fn update_counters(
        &self,
        id: PostId,
        replies_count: i32,
        shares_count: i32,
    ) -> PostResult<()> {
        self.inner
            .update_counters(id, replies_count, shares_count)
            .await
    }

    async fn delete(&self, id: PostId) -> PostResult<()> {
        self.inner.delete(id).await
    }
}
