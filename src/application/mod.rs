//! Application layer: one service per aggregate.
//!
//! Services depend only on the injected [`RepositoryProvider`] and the
//! pagination resolver; they never call each other. Every repository error
//! is translated into the service's own error type here, so nothing from
//! the persistence layer crosses this boundary.
//!
//! [`RepositoryProvider`]: crate::domain::RepositoryProvider

pub mod comments;
pub mod identity;
pub mod likes;
pub mod posts;

use tracing::error;

use crate::domain::DomainError;

pub use comments::{CommentError, CommentService};
pub use identity::{AuthError, AuthToken, UserError, UserService};
pub use likes::{LikeError, LikeOutcome, LikeService, LikesOnPost};
pub use posts::{PostError, PostService};

/// Record a persistence failure with its cause before the caller collapses
/// it into a generic error kind.
pub(crate) fn log_storage_failure(operation: &'static str, err: &DomainError) {
    error!(operation, error = %err, "Persistence operation failed");
}
