//! Like repository interface

use async_trait::async_trait;

use super::model::{CreateLikeDto, Like, LikeWithAuthor};
use crate::domain::DomainResult;
use crate::shared::PageWindow;

#[async_trait]
pub trait LikeRepository: Send + Sync {
    /// Insert a like. A second like for the same `(post_id, user_id)`
    /// must fail with `DomainError::Conflict`, even under concurrent calls.
    async fn create(&self, dto: CreateLikeDto) -> DomainResult<Like>;

    async fn find_by_post_and_user(
        &self,
        post_id: &str,
        user_id: &str,
    ) -> DomainResult<Option<Like>>;

    /// Likes on a post, newest first, each joined with the liking user.
    async fn find_page_for_post(
        &self,
        post_id: &str,
        window: PageWindow,
    ) -> DomainResult<Vec<LikeWithAuthor>>;

    async fn count_for_post(&self, post_id: &str) -> DomainResult<u64>;

    /// Delete by the like's own id. `DomainError::NotFound` if already gone.
    async fn delete(&self, id: &str) -> DomainResult<()>;
}
