//! Post repository interface

use async_trait::async_trait;

use super::model::{CreatePostDto, Post, PostFilter, PostWithAuthor};
use crate::domain::DomainResult;
use crate::shared::PageWindow;

#[async_trait]
pub trait PostRepository: Send + Sync {
    async fn create(&self, dto: CreatePostDto) -> DomainResult<Post>;

    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Post>>;

    /// Posts matching `filter` with their authors, newest first.
    async fn find_page(
        &self,
        filter: &PostFilter,
        window: PageWindow,
    ) -> DomainResult<Vec<PostWithAuthor>>;

    async fn count(&self, filter: &PostFilter) -> DomainResult<u64>;

    /// Delete by id. Comments and likes on the post go with it.
    /// Returns `DomainError::NotFound` when no row was removed.
    async fn delete(&self, id: &str) -> DomainResult<()>;
}
