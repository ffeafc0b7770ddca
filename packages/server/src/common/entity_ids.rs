//! Typed ids for the entities this service knows about.

pub use super::id::Id;

/// Marker for posts (content posts, replies and shares alike).
pub struct Post;

/// Marker for the users who author posts. Users live in another service;
/// only their id travels through this one.
pub struct Author;

pub type PostId = Id<Post>;

pub type AuthorId = Id<Author>;
