//! Repository traits for the domain layer
//!
//! Contains:
//! - `RepositoryProvider`: unified access to all per-aggregate repositories
//! - `DomainResult`: standard result type for repository operations

use super::comment::CommentRepository;
use super::like::LikeRepository;
use super::post::PostRepository;
use super::user::UserRepository;
use crate::shared::errors::DomainError;

/// Result type for repository operations
pub type DomainResult<T> = Result<T, DomainError>;

/// Provides access to all domain repositories.
///
/// Injected into every domain service at construction, so tests can swap
/// the SeaORM-backed provider for the in-memory one:
///
/// ```ignore
/// async fn handle(repos: &dyn RepositoryProvider) {
///     let post = repos.posts().find_by_id("...").await?;
///     let like = repos.likes().find_by_post_and_user(&post.id, "...").await?;
/// }
/// ```
pub trait RepositoryProvider: Send + Sync {
    fn users(&self) -> &dyn UserRepository;
    fn posts(&self) -> &dyn PostRepository;
    fn comments(&self) -> &dyn CommentRepository;
    fn likes(&self) -> &dyn LikeRepository;
}
