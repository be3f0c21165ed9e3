//! Trait definitions for FOSSology operations.
//!
//! Entity types implement the traits they support; operations that need
//! more context than an ID (upload creation, summaries, moves) are
//! inherent methods on the entity instead.

mod get;
mod list;

pub use get::Get;
pub use list::{List, DEFAULT_PAGE_SIZE};
