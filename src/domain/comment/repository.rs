//! Comment repository interface

use async_trait::async_trait;

use super::model::{Comment, CommentWithAuthor, CreateCommentDto};
use crate::domain::DomainResult;
use crate::shared::PageWindow;

#[async_trait]
pub trait CommentRepository: Send + Sync {
    /// Insert a comment. A dangling `post_id` is rejected by the store.
    async fn create(&self, dto: CreateCommentDto) -> DomainResult<Comment>;

    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Comment>>;

    /// Comments on a post, newest first, each joined with its author.
    async fn find_page_for_post(
        &self,
        post_id: &str,
        window: PageWindow,
    ) -> DomainResult<Vec<CommentWithAuthor>>;

    /// Replace the content. `DomainError::NotFound` if the row is gone.
    async fn update_content(&self, id: &str, content: String) -> DomainResult<Comment>;

    async fn delete(&self, id: &str) -> DomainResult<()>;
}
