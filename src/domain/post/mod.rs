//! Post aggregate

pub mod model;
pub mod repository;

pub use model::{CreatePostDto, Post, PostFilter, PostWithAuthor};
pub use repository::PostRepository;
