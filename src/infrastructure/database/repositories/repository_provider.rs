//! SeaORM implementation of RepositoryProvider

use sea_orm::DatabaseConnection;

use crate::domain::{
    CommentRepository, LikeRepository, PostRepository, RepositoryProvider, UserRepository,
};

use super::comment_repository::SeaOrmCommentRepository;
use super::like_repository::SeaOrmLikeRepository;
use super::post_repository::SeaOrmPostRepository;
use super::user_repository::SeaOrmUserRepository;

/// Unified repository provider backed by SeaORM.
///
/// Holds one connection pool and exposes per-aggregate repository accessors.
///
/// ```ignore
/// let repos = SeaOrmRepositoryProvider::new(db.clone());
/// let post = repos.posts().find_by_id(&post_id).await?;
/// ```
pub struct SeaOrmRepositoryProvider {
    users: SeaOrmUserRepository,
    posts: SeaOrmPostRepository,
    comments: SeaOrmCommentRepository,
    likes: SeaOrmLikeRepository,
}

impl SeaOrmRepositoryProvider {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            users: SeaOrmUserRepository::new(db.clone()),
            posts: SeaOrmPostRepository::new(db.clone()),
            comments: SeaOrmCommentRepository::new(db.clone()),
            likes: SeaOrmLikeRepository::new(db),
        }
    }
}

impl RepositoryProvider for SeaOrmRepositoryProvider {
    fn users(&self) -> &dyn UserRepository {
        &self.users
    }

    fn posts(&self) -> &dyn PostRepository {
        &self.posts
    }

    fn comments(&self) -> &dyn CommentRepository {
        &self.comments
    }

    fn likes(&self) -> &dyn LikeRepository {
        &self.likes
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::Utc;
    use sea_orm::{ActiveModelTrait, Set};
    use sea_orm_migration::MigratorTrait;

    use super::*;
    use crate::application::{AuthError, LikeOutcome, LikeService, PostService, UserService};
    use crate::domain::{CreateCommentDto, CreateLikeDto, PostFilter};
    use crate::infrastructure::crypto::jwt::JwtConfig;
    use crate::infrastructure::database::entities::post;
    use crate::infrastructure::database::migrator::Migrator;
    use crate::infrastructure::{init_database, DatabaseConfig};
    use crate::shared::PaginationParams;
    use crate::test_support::{seed_post, seed_user};

    /// Migrated in-memory SQLite. A single connection keeps every query on
    /// the same database.
    async fn sqlite() -> (DatabaseConnection, Arc<SeaOrmRepositoryProvider>) {
        let db = init_database(&DatabaseConfig {
            url: "sqlite::memory:".into(),
            max_connections: 1,
        })
        .await
        .unwrap();
        Migrator::up(&db, None).await.unwrap();
        let repos = Arc::new(SeaOrmRepositoryProvider::new(db.clone()));
        (db, repos)
    }

    fn like(post_id: &str, user_id: &str) -> CreateLikeDto {
        CreateLikeDto {
            post_id: post_id.into(),
            user_id: user_id.into(),
        }
    }

    #[tokio::test]
    async fn duplicate_like_violates_unique_index() {
        let (_db, repos) = sqlite().await;
        let alice = seed_user(repos.as_ref(), "alice").await;
        let post = seed_post(repos.as_ref(), &alice).await;

        repos.likes().create(like(&post.id, &alice.id)).await.unwrap();
        let err = repos
            .likes()
            .create(like(&post.id, &alice.id))
            .await
            .unwrap_err();
        assert!(err.is_conflict(), "{err}");
        assert_eq!(repos.likes().count_for_post(&post.id).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn dangling_references_are_not_found() {
        let (_db, repos) = sqlite().await;
        let alice = seed_user(repos.as_ref(), "alice").await;

        let err = repos
            .likes()
            .create(like("missing", &alice.id))
            .await
            .unwrap_err();
        assert!(err.is_not_found(), "{err}");

        let err = repos
            .comments()
            .create(CreateCommentDto {
                content: "hi".into(),
                post_id: "missing".into(),
                author_id: alice.id.clone(),
            })
            .await
            .unwrap_err();
        assert!(err.is_not_found(), "{err}");
    }

    #[tokio::test]
    async fn like_service_sees_already_liked() {
        let (_db, repos) = sqlite().await;
        let alice = seed_user(repos.as_ref(), "alice").await;
        let post = seed_post(repos.as_ref(), &alice).await;
        let svc = LikeService::new(repos.clone());

        let first = svc.create_like(&post.id, &alice.id).await.unwrap();
        assert!(matches!(first, LikeOutcome::Liked(ref l) if l.user_id == alice.id));
        let second = svc.create_like(&post.id, &alice.id).await.unwrap();
        assert!(matches!(second, LikeOutcome::AlreadyLiked));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_likes_store_one_row() {
        let (_db, repos) = sqlite().await;
        let alice = seed_user(repos.as_ref(), "alice").await;
        let post = seed_post(repos.as_ref(), &alice).await;
        let svc = Arc::new(LikeService::new(repos.clone()));

        let tasks: Vec<_> = (0..16)
            .map(|_| {
                let svc = svc.clone();
                let (post_id, user_id) = (post.id.clone(), alice.id.clone());
                tokio::spawn(async move { svc.create_like(&post_id, &user_id).await })
            })
            .collect();

        let mut liked = 0;
        for task in tasks {
            if let LikeOutcome::Liked(_) = task.await.unwrap().unwrap() {
                liked += 1;
            }
        }
        assert_eq!(liked, 1);
        assert_eq!(repos.likes().count_for_post(&post.id).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn deleting_post_cascades() {
        let (_db, repos) = sqlite().await;
        let alice = seed_user(repos.as_ref(), "alice").await;
        let bob = seed_user(repos.as_ref(), "bob").await;
        let post = seed_post(repos.as_ref(), &alice).await;

        let comment = repos
            .comments()
            .create(CreateCommentDto {
                content: "nice".into(),
                post_id: post.id.clone(),
                author_id: bob.id.clone(),
            })
            .await
            .unwrap();
        repos.likes().create(like(&post.id, &bob.id)).await.unwrap();

        PostService::new(repos.clone())
            .delete_post(&post.id, &alice.id)
            .await
            .unwrap();

        assert!(repos.posts().find_by_id(&post.id).await.unwrap().is_none());
        assert!(repos.comments().find_by_id(&comment.id).await.unwrap().is_none());
        assert!(repos
            .likes()
            .find_by_post_and_user(&post.id, &bob.id)
            .await
            .unwrap()
            .is_none());
        assert_eq!(repos.likes().count_for_post(&post.id).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn registration_conflicts_name_the_column() {
        let (_db, repos) = sqlite().await;
        let users = UserService::new(repos.clone(), JwtConfig::default())
            .with_password_cost(crate::infrastructure::crypto::password::MIN_COST);

        users
            .register("alice", "alice@example.com", "password123")
            .await
            .unwrap();
        assert_eq!(
            users
                .register("alice", "other@example.com", "password123")
                .await
                .unwrap_err(),
            AuthError::UsernameTaken
        );
        assert_eq!(
            users
                .register("alicia", "alice@example.com", "password123")
                .await
                .unwrap_err(),
            AuthError::EmailTaken
        );
    }

    #[tokio::test]
    async fn listings_are_ordered_and_carry_authors() {
        let (db, repos) = sqlite().await;
        let carol = seed_user(repos.as_ref(), "carol").await;
        seed_user(repos.as_ref(), "alice").await;
        seed_user(repos.as_ref(), "bob").await;

        let names: Vec<_> = repos
            .users()
            .find_page(PaginationParams::new(1, 10).window())
            .await
            .unwrap()
            .into_iter()
            .map(|u| u.username)
            .collect();
        assert_eq!(names, ["alice", "bob", "carol"]);

        // same timestamp: the later insert comes first
        let created_at = Utc::now();
        let mut ids = Vec::new();
        for n in 0..3 {
            let id = format!("post-{n}");
            post::ActiveModel {
                id: Set(id.clone()),
                title: Set(format!("title {n}")),
                content: Set("content".into()),
                author_id: Set(carol.id.clone()),
                created_at: Set(created_at),
            }
            .insert(&db)
            .await
            .unwrap();
            ids.push(id);
        }

        let page = repos
            .posts()
            .find_page(&PostFilter::by_author(&carol.id), PaginationParams::new(1, 2).window())
            .await
            .unwrap();
        let listed: Vec<_> = page.iter().map(|p| p.post.id.as_str()).collect();
        assert_eq!(listed, ["post-2", "post-1"]);
        assert!(page.iter().all(|p| p.author.username == "carol"));
        assert_eq!(
            repos
                .posts()
                .count(&PostFilter::by_author(&carol.id))
                .await
                .unwrap(),
            3
        );
    }
}
