//! Comment management service
//!
//! Update and delete are restricted to the comment's author; someone else's
//! comment is reported as not found, the same way posts are.

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info};

use crate::application::log_storage_failure;
use crate::domain::{
    Comment, CommentWithAuthor, CreateCommentDto, DomainError, RepositoryProvider,
};
use crate::shared::PaginationParams;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommentError {
    #[error("Post not found")]
    PostNotFound,
    #[error("Comment not found")]
    CommentNotFound,
    /// The comment could not be written.
    #[error("Comment could not be created")]
    CreationFailed,
    #[error("Internal error")]
    Unknown,
}

pub struct CommentService {
    repos: Arc<dyn RepositoryProvider>,
}

impl CommentService {
    pub fn new(repos: Arc<dyn RepositoryProvider>) -> Self {
        Self { repos }
    }

    pub async fn create_comment(
        &self,
        content: String,
        post_id: &str,
        author_id: &str,
    ) -> Result<Comment, CommentError> {
        let post = self.repos.posts().find_by_id(post_id).await.map_err(|e| {
            log_storage_failure("create_comment", &e);
            CommentError::CreationFailed
        })?;
        if post.is_none() {
            return Err(CommentError::PostNotFound);
        }

        let comment = self
            .repos
            .comments()
            .create(CreateCommentDto {
                content,
                post_id: post_id.to_string(),
                author_id: author_id.to_string(),
            })
            .await
            .map_err(|e| {
                log_storage_failure("create_comment", &e);
                CommentError::CreationFailed
            })?;

        metrics::counter!("comments_created_total").increment(1);
        info!(comment_id = %comment.id, post_id, author_id, "Comment created");
        Ok(comment)
    }

    /// Comments on a post, newest first. An empty page is not an error.
    pub async fn list_comments(
        &self,
        post_id: &str,
        params: PaginationParams,
    ) -> Result<Vec<CommentWithAuthor>, CommentError> {
        self.repos
            .comments()
            .find_page_for_post(post_id, params.window())
            .await
            .map_err(|e| unknown("list_comments", e))
    }

    pub async fn update_comment(
        &self,
        comment_id: &str,
        caller_id: &str,
        content: String,
    ) -> Result<Comment, CommentError> {
        self.find_owned(comment_id, caller_id).await?;

        match self.repos.comments().update_content(comment_id, content).await {
            Ok(comment) => {
                debug!(comment_id, "Comment updated");
                Ok(comment)
            }
            Err(e) if e.is_not_found() => Err(CommentError::CommentNotFound),
            Err(e) => Err(unknown("update_comment", e)),
        }
    }

    pub async fn delete_comment(&self, comment_id: &str, caller_id: &str) -> Result<(), CommentError> {
        self.find_owned(comment_id, caller_id).await?;

        match self.repos.comments().delete(comment_id).await {
            Ok(()) => {
                info!(comment_id, caller_id, "Comment deleted");
                Ok(())
            }
            Err(e) if e.is_not_found() => Err(CommentError::CommentNotFound),
            Err(e) => Err(unknown("delete_comment", e)),
        }
    }

    async fn find_owned(&self, comment_id: &str, caller_id: &str) -> Result<Comment, CommentError> {
        let comment = self
            .repos
            .comments()
            .find_by_id(comment_id)
            .await
            .map_err(|e| unknown("find_comment", e))?
            .ok_or(CommentError::CommentNotFound)?;

        if !comment.is_authored_by(caller_id) {
            debug!(comment_id, caller_id, "Caller is not the comment author");
            return Err(CommentError::CommentNotFound);
        }
        Ok(comment)
    }
}

fn unknown(operation: &'static str, err: DomainError) -> CommentError {
    log_storage_failure(operation, &err);
    CommentError::Unknown
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::InMemoryRepositoryProvider;
    use crate::test_support::{seed_post, seed_user};

    fn service(repos: &InMemoryRepositoryProvider) -> CommentService {
        CommentService::new(Arc::new(repos.clone()))
    }

    #[tokio::test]
    async fn post_without_comments_lists_empty() {
        let repos = InMemoryRepositoryProvider::new();
        let alice = seed_user(&repos, "alice").await;
        let post = seed_post(&repos, &alice).await;

        let comments = service(&repos)
            .list_comments(&post.id, PaginationParams::new(1, 10))
            .await
            .unwrap();
        assert!(comments.is_empty());
    }

    #[tokio::test]
    async fn comment_on_missing_post_creates_nothing() {
        let repos = InMemoryRepositoryProvider::new();
        let alice = seed_user(&repos, "alice").await;
        let svc = service(&repos);

        let err = svc
            .create_comment("hello".into(), "missing-post", &alice.id)
            .await
            .unwrap_err();
        assert_eq!(err, CommentError::PostNotFound);

        let listed = svc
            .list_comments("missing-post", PaginationParams::new(1, 10))
            .await
            .unwrap();
        assert!(listed.is_empty());
    }

    #[tokio::test]
    async fn write_failure_is_creation_failed() {
        let repos = InMemoryRepositoryProvider::new();
        let alice = seed_user(&repos, "alice").await;
        let post = seed_post(&repos, &alice).await;
        repos.set_unavailable(true);

        let err = service(&repos)
            .create_comment("hello".into(), &post.id, &alice.id)
            .await
            .unwrap_err();
        assert_eq!(err, CommentError::CreationFailed);
    }

    #[tokio::test]
    async fn listing_carries_author_and_is_newest_first() {
        let repos = InMemoryRepositoryProvider::new();
        let alice = seed_user(&repos, "alice").await;
        let bob = seed_user(&repos, "bob").await;
        let post = seed_post(&repos, &alice).await;
        let svc = service(&repos);

        svc.create_comment("first".into(), &post.id, &alice.id)
            .await
            .unwrap();
        svc.create_comment("second".into(), &post.id, &bob.id)
            .await
            .unwrap();
        svc.create_comment("third".into(), &post.id, &alice.id)
            .await
            .unwrap();

        let page = svc
            .list_comments(&post.id, PaginationParams::new(1, 2))
            .await
            .unwrap();
        let contents: Vec<_> = page.iter().map(|c| c.comment.content.as_str()).collect();
        assert_eq!(contents, ["third", "second"]);
        assert_eq!(page[1].author.username, "bob");
        assert_eq!(page[1].author.id, bob.id);

        let rest = svc
            .list_comments(&post.id, PaginationParams::new(2, 2))
            .await
            .unwrap();
        assert_eq!(rest.len(), 1);
        assert_eq!(rest[0].comment.content, "first");
    }

    #[tokio::test]
    async fn author_can_update_and_delete() {
        let repos = InMemoryRepositoryProvider::new();
        let alice = seed_user(&repos, "alice").await;
        let post = seed_post(&repos, &alice).await;
        let svc = service(&repos);
        let comment = svc
            .create_comment("draft".into(), &post.id, &alice.id)
            .await
            .unwrap();

        let updated = svc
            .update_comment(&comment.id, &alice.id, "final".into())
            .await
            .unwrap();
        assert_eq!(updated.content, "final");
        assert!(updated.updated_at >= comment.updated_at);

        svc.delete_comment(&comment.id, &alice.id).await.unwrap();
        assert_eq!(
            svc.delete_comment(&comment.id, &alice.id).await.unwrap_err(),
            CommentError::CommentNotFound
        );
    }

    #[tokio::test]
    async fn other_users_cannot_touch_a_comment() {
        let repos = InMemoryRepositoryProvider::new();
        let alice = seed_user(&repos, "alice").await;
        let bob = seed_user(&repos, "bob").await;
        let post = seed_post(&repos, &alice).await;
        let svc = service(&repos);
        let comment = svc
            .create_comment("mine".into(), &post.id, &alice.id)
            .await
            .unwrap();

        assert_eq!(
            svc.update_comment(&comment.id, &bob.id, "hijack".into())
                .await
                .unwrap_err(),
            CommentError::CommentNotFound
        );
        assert_eq!(
            svc.delete_comment(&comment.id, &bob.id).await.unwrap_err(),
            CommentError::CommentNotFound
        );

        let listed = svc
            .list_comments(&post.id, PaginationParams::new(1, 10))
            .await
            .unwrap();
        assert_eq!(listed[0].comment.content, "mine");
    }

    #[tokio::test]
    async fn missing_comment_is_not_found() {
        let repos = InMemoryRepositoryProvider::new();
        let alice = seed_user(&repos, "alice").await;
        let svc = service(&repos);

        assert_eq!(
            svc.update_comment("nope", &alice.id, "x".into())
                .await
                .unwrap_err(),
            CommentError::CommentNotFound
        );
    }

    #[tokio::test]
    async fn list_failure_is_unknown() {
        let repos = InMemoryRepositoryProvider::new();
        repos.set_unavailable(true);
        let err = service(&repos)
            .list_comments("any", PaginationParams::new(1, 10))
            .await
            .unwrap_err();
        assert_eq!(err, CommentError::Unknown);
    }
}
