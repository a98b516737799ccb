use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info};

use crate::application::log_storage_failure;
use crate::domain::{CreateLikeDto, DomainError, Like, LikeWithAuthor, RepositoryProvider};
use crate::shared::PaginationParams;

/// Result of a like request that did not fail.
#[derive(Debug, Clone)]
pub enum LikeOutcome {
    Liked(Like),
    /// The caller had already liked the post. Nothing was written.
    AlreadyLiked,
}

#[derive(Debug, Clone)]
pub enum LikesOnPost {
    Likes { likes: Vec<LikeWithAuthor>, total: u64 },
    /// The requested page is empty.
    NoLikesFound,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LikeError {
    #[error("Post not found")]
    PostNotFound,
    #[error("Like not found")]
    LikeNotFound,
    #[error("Internal error")]
    Unknown,
}

fn storage_failure(operation: &'static str, err: DomainError) -> LikeError {
    log_storage_failure(operation, &err);
    LikeError::Unknown
}

pub struct LikeService {
    repos: Arc<dyn RepositoryProvider>,
}

impl LikeService {
    pub fn new(repos: Arc<dyn RepositoryProvider>) -> Self {
        Self { repos }
    }

    /// Like `post_id` on behalf of `user_id`.
    ///
    /// The lookup before the insert only short-circuits the common repeat
    /// case. Two concurrent requests can both miss it; the store's unique
    /// key on `(post_id, user_id)` rejects the second insert, and that
    /// conflict is reported as [`LikeOutcome::AlreadyLiked`].
    pub async fn create_like(&self, post_id: &str, user_id: &str) -> Result<LikeOutcome, LikeError> {
        self.require_post(post_id).await?;

        let existing = self
            .repos
            .likes()
            .find_by_post_and_user(post_id, user_id)
            .await
            .map_err(|e| storage_failure("find_like", e))?;
        if existing.is_some() {
            debug!(post_id, user_id, "Post already liked");
            return Ok(LikeOutcome::AlreadyLiked);
        }

        let dto = CreateLikeDto {
            post_id: post_id.to_string(),
            user_id: user_id.to_string(),
        };
        match self.repos.likes().create(dto).await {
            Ok(like) => {
                metrics::counter!("likes_created_total").increment(1);
                info!(like_id = %like.id, post_id, user_id, "Post liked");
                Ok(LikeOutcome::Liked(like))
            }
            Err(e) if e.is_conflict() => {
                debug!(post_id, user_id, "Concurrent like rejected by unique key");
                Ok(LikeOutcome::AlreadyLiked)
            }
            // Post removed between the existence check and the insert.
            Err(e) if e.is_not_found() => Err(LikeError::PostNotFound),
            Err(e) => Err(storage_failure("create_like", e)),
        }
    }

    pub async fn get_likes_on_post(
        &self,
        post_id: &str,
        params: PaginationParams,
    ) -> Result<LikesOnPost, LikeError> {
        self.require_post(post_id).await?;

        let likes = self.repos.likes();
        let page = likes
            .find_page_for_post(post_id, params.window())
            .await
            .map_err(|e| storage_failure("list_likes", e))?;
        if page.is_empty() {
            return Ok(LikesOnPost::NoLikesFound);
        }

        let total = likes
            .count_for_post(post_id)
            .await
            .map_err(|e| storage_failure("count_likes", e))?;
        Ok(LikesOnPost::Likes { likes: page, total })
    }

    pub async fn delete_like_on_post(&self, post_id: &str, user_id: &str) -> Result<(), LikeError> {
        let like = self
            .repos
            .likes()
            .find_by_post_and_user(post_id, user_id)
            .await
            .map_err(|e| storage_failure("find_like", e))?
            .ok_or(LikeError::LikeNotFound)?;

        match self.repos.likes().delete(&like.id).await {
            Ok(()) => {
                info!(like_id = %like.id, post_id, user_id, "Like removed");
                Ok(())
            }
            Err(e) if e.is_not_found() => Err(LikeError::LikeNotFound),
            Err(e) => Err(storage_failure("delete_like", e)),
        }
    }

    async fn require_post(&self, post_id: &str) -> Result<(), LikeError> {
        match self.repos.posts().find_by_id(post_id).await {
            Ok(Some(_)) => Ok(()),
            Ok(None) => Err(LikeError::PostNotFound),
            Err(e) => Err(storage_failure("find_post", e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::LikeRepository;
    use crate::infrastructure::InMemoryRepositoryProvider;
    use crate::test_support::{seed_post, seed_user};

    fn service(repos: &InMemoryRepositoryProvider) -> LikeService {
        LikeService::new(Arc::new(repos.clone()))
    }

    fn page() -> PaginationParams {
        PaginationParams::new(1, 10)
    }

    #[tokio::test]
    async fn liking_twice_keeps_one_record() {
        let repos = InMemoryRepositoryProvider::new();
        let alice = seed_user(&repos, "alice").await;
        let post = seed_post(&repos, &alice).await;
        let svc = service(&repos);

        let first = svc.create_like(&post.id, &alice.id).await.unwrap();
        assert!(matches!(first, LikeOutcome::Liked(ref l) if l.user_id == alice.id));

        let second = svc.create_like(&post.id, &alice.id).await.unwrap();
        assert!(matches!(second, LikeOutcome::AlreadyLiked));

        assert_eq!(repos.count_for_post(&post.id).await.unwrap(), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_duplicate_likes_produce_one_record() {
        let repos = InMemoryRepositoryProvider::new();
        let alice = seed_user(&repos, "alice").await;
        let post = seed_post(&repos, &alice).await;
        let svc = Arc::new(service(&repos));

        let handles: Vec<_> = (0..16)
            .map(|_| {
                let svc = svc.clone();
                let post_id = post.id.clone();
                let user_id = alice.id.clone();
                tokio::spawn(async move { svc.create_like(&post_id, &user_id).await })
            })
            .collect();

        let mut liked = 0;
        for handle in handles {
            match handle.await.unwrap().unwrap() {
                LikeOutcome::Liked(_) => liked += 1,
                LikeOutcome::AlreadyLiked => {}
            }
        }
        assert_eq!(liked, 1);
        assert_eq!(repos.count_for_post(&post.id).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn like_on_missing_post() {
        let repos = InMemoryRepositoryProvider::new();
        let alice = seed_user(&repos, "alice").await;
        let svc = service(&repos);

        assert_eq!(
            svc.create_like("missing", &alice.id).await.unwrap_err(),
            LikeError::PostNotFound
        );
        assert_eq!(
            svc.get_likes_on_post("missing", page()).await.unwrap_err(),
            LikeError::PostNotFound
        );
    }

    #[tokio::test]
    async fn deleting_missing_like_leaves_store_untouched() {
        let repos = InMemoryRepositoryProvider::new();
        let alice = seed_user(&repos, "alice").await;
        let bob = seed_user(&repos, "bob").await;
        let post = seed_post(&repos, &alice).await;
        let svc = service(&repos);
        svc.create_like(&post.id, &alice.id).await.unwrap();

        assert_eq!(
            svc.delete_like_on_post(&post.id, &bob.id).await.unwrap_err(),
            LikeError::LikeNotFound
        );
        assert_eq!(repos.count_for_post(&post.id).await.unwrap(), 1);
        assert!(repos
            .find_by_post_and_user(&post.id, &alice.id)
            .await
            .unwrap()
            .is_some());
    }

    #[tokio::test]
    async fn likes_listing_follows_like_and_unlike() {
        let repos = InMemoryRepositoryProvider::new();
        let alice = seed_user(&repos, "alice").await;
        let bob = seed_user(&repos, "bob").await;
        let post = seed_post(&repos, &alice).await;
        let svc = service(&repos);

        assert!(matches!(
            svc.get_likes_on_post(&post.id, page()).await.unwrap(),
            LikesOnPost::NoLikesFound
        ));

        svc.create_like(&post.id, &alice.id).await.unwrap();
        svc.create_like(&post.id, &bob.id).await.unwrap();

        match svc.get_likes_on_post(&post.id, page()).await.unwrap() {
            LikesOnPost::Likes { likes, total } => {
                assert_eq!(total, 2);
                let names: Vec<_> = likes.iter().map(|l| l.user.username.as_str()).collect();
                assert_eq!(names, ["bob", "alice"]);
            }
            LikesOnPost::NoLikesFound => panic!("expected likes"),
        }

        svc.delete_like_on_post(&post.id, &alice.id).await.unwrap();
        svc.delete_like_on_post(&post.id, &bob.id).await.unwrap();

        assert!(matches!(
            svc.get_likes_on_post(&post.id, page()).await.unwrap(),
            LikesOnPost::NoLikesFound
        ));

        // and back again
        svc.create_like(&post.id, &bob.id).await.unwrap();
        assert!(matches!(
            svc.get_likes_on_post(&post.id, page()).await.unwrap(),
            LikesOnPost::Likes { total: 1, .. }
        ));
    }

    #[tokio::test]
    async fn store_failure_is_unknown() {
        let repos = InMemoryRepositoryProvider::new();
        let alice = seed_user(&repos, "alice").await;
        let post = seed_post(&repos, &alice).await;
        repos.set_unavailable(true);

        let svc = service(&repos);
        assert_eq!(
            svc.create_like(&post.id, &alice.id).await.unwrap_err(),
            LikeError::Unknown
        );
        assert_eq!(
            svc.delete_like_on_post(&post.id, &alice.id).await.unwrap_err(),
            LikeError::Unknown
        );
    }
}
