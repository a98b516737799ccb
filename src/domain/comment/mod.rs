//! Comment aggregate

pub mod model;
pub mod repository;

pub use model::{Comment, CommentWithAuthor, CreateCommentDto};
pub use repository::CommentRepository;
