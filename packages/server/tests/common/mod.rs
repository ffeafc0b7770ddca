// Common test utilities

pub mod harness;
pub mod stores;

pub use harness::*;
pub use stores::*;
