//! Database repository implementations
//!
//! Per-aggregate SeaORM repositories + unified RepositoryProvider.

pub mod comment_repository;
pub mod like_repository;
pub mod post_repository;
pub mod repository_provider;
pub mod user_repository;

pub use repository_provider::SeaOrmRepositoryProvider;

use sea_orm::sea_query::{Alias, Expr, SimpleExpr};
use sea_orm::EntityTrait;

/// SQLite insertion order, used to break `created_at` ties the same way the
/// in-memory store does.
pub(super) fn rowid<E: EntityTrait>(entity: E) -> SimpleExpr {
    Expr::col((entity, Alias::new("rowid"))).into()
}
