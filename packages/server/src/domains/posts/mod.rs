pub mod data;
pub mod errors;
pub mod events;
pub mod models;
pub mod service;
pub mod store;

// Re-export data types (request/response bodies)
pub use data::{CreatePostInput, CreatePostRequest, MessageResponse, MAX_CONTENT_CHARS};

pub use errors::{PostError, PostResult};
pub use events::{Counter, CounterChange, SecondaryFailure};

// Re-export models (domain models)
pub use models::post::Post;

pub use service::PostService;
pub use store::{InMemoryPostStore, PgPostStore, PostStore};
