// Hornet posts service - API Core
//
// Posts, replies and shares with denormalized reply/share counters and
// cascading deletion of reply trees. HTTP handlers in server/ call into
// domains/posts, which owns every business rule; storage sits behind the
// PostStore trait.

pub mod common;
pub mod config;
pub mod domains;
pub mod server;

pub use config::*;
