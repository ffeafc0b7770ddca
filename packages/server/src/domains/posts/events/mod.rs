use thiserror::Error;

use crate::common::PostId;

/// Which denormalized counter a side effect touches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Counter {
    Replies,
    Shares,
}

impl std::fmt::Display for Counter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Counter::Replies => write!(f, "replies_count"),
            Counter::Shares => write!(f, "shares_count"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CounterChange {
    Increment,
    Decrement,
}

impl CounterChange {
    /// Apply to a stored value. Decrements floor at zero.
    pub fn apply(self, value: i32) -> i32 {
        match self {
            CounterChange::Increment => value.saturating_add(1),
            CounterChange::Decrement => value.saturating_sub(1).max(0),
        }
    }
}

impl std::fmt::Display for CounterChange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CounterChange::Increment => write!(f, "increment"),
            CounterChange::Decrement => write!(f, "decrement"),
        }
    }
}

/// A best-effort side effect that failed after its primary operation had
/// already succeeded.
///
/// These never reach the caller of the primary operation. `PostService` logs
/// them and publishes them to anyone holding a receiver from
/// `PostService::subscribe_failures`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SecondaryFailure {
    /// Counter maintenance on a linked post (parent or original).
    #[error("failed to {change} {counter} on post {target} (triggered by {source_post}): {reason}")]
    CounterUpdate {
        target: PostId,
        counter: Counter,
        change: CounterChange,
        source_post: PostId,
        reason: String,
    },

    /// The reply list of a deleted post could not be read, so its subtree
    /// was not cascaded.
    #[error("failed to list replies of deleted post {parent}: {reason}")]
    ReplyLookup { parent: PostId, reason: String },

    /// A descendant could not be removed during a cascade from `root`.
    #[error("failed to cascade delete post {post_id} (from {root}): {reason}")]
    CascadeDelete {
        post_id: PostId,
        root: PostId,
        reason: String,
    },
}
