//! Post use-cases: create, read, list, owner-only delete.

pub mod service;

pub use service::{PostError, PostService};
