//! Post management service

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info};

use crate::application::log_storage_failure;
use crate::domain::{
    CreatePostDto, DomainError, Post, PostFilter, PostWithAuthor, RepositoryProvider,
};
use crate::shared::{PaginatedResult, PaginationParams};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PostError {
    /// The post does not exist, or exists but belongs to someone else.
    #[error("Post not found")]
    NotFound,
    #[error("Internal error")]
    Unknown,
}

fn storage_failure(operation: &'static str, err: DomainError) -> PostError {
    log_storage_failure(operation, &err);
    PostError::Unknown
}

pub struct PostService {
    repos: Arc<dyn RepositoryProvider>,
}

impl PostService {
    pub fn new(repos: Arc<dyn RepositoryProvider>) -> Self {
        Self { repos }
    }

    pub async fn create_post(
        &self,
        title: String,
        content: String,
        author_id: &str,
    ) -> Result<Post, PostError> {
        let post = self
            .repos
            .posts()
            .create(CreatePostDto {
                title,
                content,
                author_id: author_id.to_string(),
            })
            .await
            .map_err(|e| storage_failure("create_post", e))?;

        metrics::counter!("posts_created_total").increment(1);
        info!(post_id = %post.id, author_id, "Post created");
        Ok(post)
    }

    pub async fn get_post(&self, post_id: &str) -> Result<Post, PostError> {
        self.repos
            .posts()
            .find_by_id(post_id)
            .await
            .map_err(|e| storage_failure("get_post", e))?
            .ok_or(PostError::NotFound)
    }

    /// All posts, newest first.
    pub async fn list_posts(
        &self,
        params: PaginationParams,
    ) -> Result<PaginatedResult<PostWithAuthor>, PostError> {
        self.list(PostFilter::all(), params).await
    }

    /// One author's posts, newest first.
    pub async fn list_posts_by_user(
        &self,
        author_id: &str,
        params: PaginationParams,
    ) -> Result<PaginatedResult<PostWithAuthor>, PostError> {
        self.list(PostFilter::by_author(author_id), params).await
    }

    async fn list(
        &self,
        filter: PostFilter,
        params: PaginationParams,
    ) -> Result<PaginatedResult<PostWithAuthor>, PostError> {
        let posts = self.repos.posts();
        let total = posts
            .count(&filter)
            .await
            .map_err(|e| storage_failure("count_posts", e))?;
        let items = posts
            .find_page(&filter, params.window())
            .await
            .map_err(|e| storage_failure("list_posts", e))?;

        Ok(PaginatedResult::new(items, total, params.page, params.limit))
    }

    /// Delete a post owned by `caller_id`.
    ///
    /// A post owned by another user is reported exactly like a missing one.
    pub async fn delete_post(&self, post_id: &str, caller_id: &str) -> Result<(), PostError> {
        let post = self
            .repos
            .posts()
            .find_by_id(post_id)
            .await
            .map_err(|e| storage_failure("find_post", e))?;

        match post {
            Some(post) if post.is_owned_by(caller_id) => {}
            Some(_) => {
                debug!(post_id, caller_id, "Delete refused: caller is not the owner");
                return Err(PostError::NotFound);
            }
            None => return Err(PostError::NotFound),
        }

        match self.repos.posts().delete(post_id).await {
            Ok(()) => {
                info!(post_id, caller_id, "Post deleted");
                Ok(())
            }
            // Removed by a concurrent request after the ownership check.
            Err(e) if e.is_not_found() => Err(PostError::NotFound),
            Err(e) => Err(storage_failure("delete_post", e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::InMemoryRepositoryProvider;
    use crate::test_support::{seed_post, seed_user};

    fn service(repos: &InMemoryRepositoryProvider) -> PostService {
        PostService::new(Arc::new(repos.clone()))
    }

    #[tokio::test]
    async fn create_then_get() {
        let repos = InMemoryRepositoryProvider::new();
        let alice = seed_user(&repos, "alice").await;
        let svc = service(&repos);

        let post = svc
            .create_post("Hello".into(), "First post".into(), &alice.id)
            .await
            .unwrap();
        assert_eq!(post.author_id, alice.id);

        let fetched = svc.get_post(&post.id).await.unwrap();
        assert_eq!(fetched.title, "Hello");
        assert_eq!(svc.get_post("missing").await.unwrap_err(), PostError::NotFound);
    }

    #[tokio::test]
    async fn create_fails_with_unknown_when_store_is_down() {
        let repos = InMemoryRepositoryProvider::new();
        let alice = seed_user(&repos, "alice").await;
        repos.set_unavailable(true);

        let err = service(&repos)
            .create_post("t".into(), "c".into(), &alice.id)
            .await
            .unwrap_err();
        assert_eq!(err, PostError::Unknown);
    }

    #[tokio::test]
    async fn listing_is_newest_first_and_page_count_is_consistent() {
        let repos = InMemoryRepositoryProvider::new();
        let alice = seed_user(&repos, "alice").await;
        let mut created = Vec::new();
        for _ in 0..7 {
            created.push(seed_post(&repos, &alice).await.id);
        }
        let svc = service(&repos);

        for limit in 1..=8u32 {
            let page = svc
                .list_posts(PaginationParams::new(1, limit))
                .await
                .unwrap();
            assert_eq!(page.total, 7);
            assert_eq!(page.total_pages, 7u64.div_ceil(u64::from(limit)));
            assert!(page.items.len() <= limit as usize);
        }

        let page = svc.list_posts(PaginationParams::new(1, 3)).await.unwrap();
        let ids: Vec<_> = page.items.iter().map(|p| p.post.id.clone()).collect();
        let newest: Vec<_> = created.iter().rev().take(3).cloned().collect();
        assert_eq!(ids, newest);
        assert!(page
            .items
            .windows(2)
            .all(|w| w[0].post.created_at >= w[1].post.created_at));
        assert!(page
            .items
            .iter()
            .all(|p| p.author.username == "alice" && p.author.id == alice.id));

        let last = svc.list_posts(PaginationParams::new(3, 3)).await.unwrap();
        assert_eq!(last.items.len(), 1);
        assert_eq!(last.items[0].post.id, created[0]);
        assert_eq!(last.page, 3);
    }

    #[tokio::test]
    async fn listing_by_user_filters_both_items_and_total() {
        let repos = InMemoryRepositoryProvider::new();
        let alice = seed_user(&repos, "alice").await;
        let bob = seed_user(&repos, "bob").await;
        for _ in 0..3 {
            seed_post(&repos, &alice).await;
        }
        for _ in 0..5 {
            seed_post(&repos, &bob).await;
        }
        let svc = service(&repos);

        let page = svc
            .list_posts_by_user(&bob.id, PaginationParams::new(1, 2))
            .await
            .unwrap();
        assert_eq!(page.total, 5);
        assert_eq!(page.total_pages, 3);
        assert!(page
            .items
            .iter()
            .all(|p| p.post.author_id == bob.id && p.author.username == "bob"));

        let none = svc
            .list_posts_by_user("nobody", PaginationParams::new(1, 10))
            .await
            .unwrap();
        assert_eq!(none.total, 0);
        assert_eq!(none.total_pages, 0);
        assert!(none.items.is_empty());
    }

    #[tokio::test]
    async fn owner_can_delete() {
        let repos = InMemoryRepositoryProvider::new();
        let alice = seed_user(&repos, "alice").await;
        let post = seed_post(&repos, &alice).await;
        let svc = service(&repos);

        svc.delete_post(&post.id, &alice.id).await.unwrap();
        assert_eq!(svc.get_post(&post.id).await.unwrap_err(), PostError::NotFound);
    }

    #[tokio::test]
    async fn foreign_post_is_indistinguishable_from_missing() {
        let repos = InMemoryRepositoryProvider::new();
        let alice = seed_user(&repos, "alice").await;
        let mallory = seed_user(&repos, "mallory").await;
        let post = seed_post(&repos, &alice).await;
        let svc = service(&repos);

        let foreign = svc.delete_post(&post.id, &mallory.id).await.unwrap_err();
        let missing = svc.delete_post("no-such-post", &mallory.id).await.unwrap_err();
        assert_eq!(foreign, PostError::NotFound);
        assert_eq!(foreign, missing);
        assert_eq!(foreign.to_string(), missing.to_string());

        // still there
        assert!(svc.get_post(&post.id).await.is_ok());
    }
}
