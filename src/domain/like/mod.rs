//! Like aggregate
//!
//! At most one like exists per `(post_id, user_id)` pair; the store's
//! unique index is what guarantees it.

pub mod model;
pub mod repository;

pub use model::{CreateLikeDto, Like, LikeWithAuthor};
pub use repository::LikeRepository;
