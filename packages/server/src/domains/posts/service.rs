//! Post lifecycle: creation with reply/share linkage, lookups, and cascading
//! deletion with counter rollback.
//!
//! Failures on the post an operation targets are returned to the caller.
//! Failures while maintaining counters on *other* posts, or while cascading
//! into a deleted post's replies, are logged and published as
//! [`SecondaryFailure`]s and never change the primary result.
//!
//! Counter updates are an unguarded read-modify-write through the store.
//! Concurrent operations against the same parent or original can lose an
//! update; nothing reconciles the drift afterwards.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use crate::common::{AuthorId, PostId};
use crate::domains::posts::data::CreatePostInput;
use crate::domains::posts::errors::PostResult;
use crate::domains::posts::events::{Counter, CounterChange, SecondaryFailure};
use crate::domains::posts::models::Post;
use crate::domains::posts::store::PostStore;

const FAILURE_CHANNEL_CAPACITY: usize = 256;

/// Whether a delete was requested directly or reached through a cascade.
/// Only top-level deletes decrement the parent's `replies_count`; a cascaded
/// reply's parent is itself being deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CascadeMode {
    TopLevel,
    CascadeChild,
}

pub struct PostService {
    store: Arc<dyn PostStore>,
    failures: broadcast::Sender<SecondaryFailure>,
}

impl PostService {
    pub fn new(store: Arc<dyn PostStore>) -> Self {
        let (failures, _) = broadcast::channel(FAILURE_CHANNEL_CAPACITY);
        Self { store, failures }
    }

    pub fn store(&self) -> &Arc<dyn PostStore> {
        &self.store
    }

    /// Receive every secondary failure published after this call.
    pub fn subscribe_failures(&self) -> broadcast::Receiver<SecondaryFailure> {
        self.failures.subscribe()
    }

    /// Create a post and bump the counters of the post it replies to or
    /// shares.
    ///
    /// The input is assumed to have passed `CreatePostInput::validate`.
    pub async fn create_post(&self, input: CreatePostInput) -> PostResult<Post> {
        let post = Post {
            id: PostId::new(),
            content: input.content,
            author_id: input.author_id,
            parent_post_id: input.parent_post_id,
            original_post_id: input.original_post_id,
            replies_count: 0,
            shares_count: 0,
            created_at: Utc::now(),
        };

        self.store.save(&post).await?;
        info!(post_id = %post.id, author_id = %post.author_id, "Post created");

        if let Some(parent_id) = post.parent_post_id {
            self.adjust_counter_best_effort(
                parent_id,
                Counter::Replies,
                CounterChange::Increment,
                post.id,
            )
            .await;
        }

        if let Some(original_id) = post.original_post_id {
            self.adjust_counter_best_effort(
                original_id,
                Counter::Shares,
                CounterChange::Increment,
                post.id,
            )
            .await;
        }

        Ok(post)
    }

    pub async fn get_post(&self, id: PostId) -> PostResult<Post> {
        self.store.find_by_id(id).await
    }

    /// Direct replies to `parent_id`; empty when there are none.
    pub async fn get_replies(&self, parent_id: PostId) -> PostResult<Vec<Post>> {
        self.store.find_by_parent(parent_id).await
    }

    pub async fn get_posts_by_author(&self, author_id: AuthorId) -> PostResult<Vec<Post>> {
        self.store.find_by_author(author_id).await
    }

    /// Delete a post together with its whole reply subtree.
    ///
    /// Fails only if the post itself cannot be found or removed. Descendants
    /// that fail to delete are reported and skipped; their siblings are still
    /// processed. The subtree is walked with an explicit stack, and a visited
    /// set guards against malformed (cyclic) reply graphs.
    pub async fn delete_post(&self, id: PostId) -> PostResult<()> {
        let mut pending = Vec::new();
        let mut visited = HashSet::from([id]);

        self.delete_single(id, CascadeMode::TopLevel, &mut pending)
            .await?;

        let mut cascaded = 0usize;
        while let Some(child_id) = pending.pop() {
            if !visited.insert(child_id) {
                debug!(post_id = %child_id, root = %id, "Reply already visited, skipping");
                continue;
            }

            match self
                .delete_single(child_id, CascadeMode::CascadeChild, &mut pending)
                .await
            {
                Ok(()) => cascaded += 1,
                Err(e) => {
                    warn!(post_id = %child_id, root = %id, error = %e, "Failed to delete reply");
                    self.report(SecondaryFailure::CascadeDelete {
                        post_id: child_id,
                        root: id,
                        reason: e.to_string(),
                    });
                }
            }
        }

        info!(post_id = %id, cascaded, "Post deleted");
        Ok(())
    }

    /// Remove one post, queue its direct replies onto `pending`, and roll
    /// back the counters it contributed to.
    ///
    /// The rollback runs before any queued reply is deleted.
    async fn delete_single(
        &self,
        id: PostId,
        mode: CascadeMode,
        pending: &mut Vec<PostId>,
    ) -> PostResult<()> {
        let post = self.store.find_by_id(id).await?;
        self.store.delete(id).await?;
        debug!(post_id = %id, ?mode, "Post removed from store");

        if post.replies_count > 0 {
            match self.store.find_by_parent(id).await {
                // Reversed so replies are popped in store order
                Ok(replies) => pending.extend(replies.into_iter().rev().map(|r| r.id)),
                Err(e) => {
                    warn!(post_id = %id, error = %e, "Failed to fetch replies for cascade");
                    self.report(SecondaryFailure::ReplyLookup {
                        parent: id,
                        reason: e.to_string(),
                    });
                }
            }
        }

        if let Some(parent_id) = post.parent_post_id {
            if mode == CascadeMode::TopLevel {
                self.adjust_counter_best_effort(
                    parent_id,
                    Counter::Replies,
                    CounterChange::Decrement,
                    id,
                )
                .await;
            }
        }

        if let Some(original_id) = post.original_post_id {
            self.adjust_counter_best_effort(
                original_id,
                Counter::Shares,
                CounterChange::Decrement,
                id,
            )
            .await;
        }

        Ok(())
    }

    async fn adjust_counter_best_effort(
        &self,
        target: PostId,
        counter: Counter,
        change: CounterChange,
        source_post: PostId,
    ) {
        if let Err(e) = self.adjust_counter(target, counter, change).await {
            warn!(
                post_id = %source_post,
                target_post_id = %target,
                %counter,
                %change,
                error = %e,
                "Failed to update counter"
            );
            self.report(SecondaryFailure::CounterUpdate {
                target,
                counter,
                change,
                source_post,
                reason: e.to_string(),
            });
        }
    }

    async fn adjust_counter(
        &self,
        target: PostId,
        counter: Counter,
        change: CounterChange,
    ) -> PostResult<()> {
        let post = self.store.find_by_id(target).await?;
        let (mut replies, mut shares) = (post.replies_count, post.shares_count);
        match counter {
            Counter::Replies => replies = change.apply(replies),
            Counter::Shares => shares = change.apply(shares),
        }
        self.store.update_counters(target, replies, shares).await
    }

    fn report(&self, failure: SecondaryFailure) {
        // Ignore send errors (no active receivers)
        let _ = self.failures.send(failure);
    }
}
