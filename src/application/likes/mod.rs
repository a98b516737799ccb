//! Like use-cases
//!
//! A like moves a `(post, user)` pair from NoLike to Liked and back; no
//! other states exist.

pub mod service;

pub use service::{LikeError, LikeOutcome, LikeService, LikesOnPost};
