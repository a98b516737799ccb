//! Domain layer: entities, creation DTOs and repository interfaces.

pub mod comment;
pub mod like;
pub mod post;
pub mod repositories;
pub mod user;

pub use comment::{Comment, CommentRepository, CommentWithAuthor, CreateCommentDto};
pub use like::{CreateLikeDto, Like, LikeRepository, LikeWithAuthor};
pub use post::{CreatePostDto, Post, PostFilter, PostRepository, PostWithAuthor};
pub use repositories::{DomainResult, RepositoryProvider};
pub use user::{AuthorSummary, CreateUserDto, User, UserRepository};

pub use crate::shared::errors::DomainError;
