//! In-memory repository provider
//!
//! Mirrors the relational store closely enough for tests and for running
//! without a database: foreign keys are checked on insert, deleting a post
//! cascades to its comments and likes, and `(post_id, user_id)` is unique
//! for likes.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use crate::domain::{
    AuthorSummary, Comment, CommentRepository, CommentWithAuthor, CreateCommentDto, CreateLikeDto,
    CreatePostDto, CreateUserDto, DomainError, DomainResult, Like, LikeRepository, LikeWithAuthor,
    Post, PostFilter, PostRepository, PostWithAuthor, RepositoryProvider, User, UserRepository,
};
use crate::shared::PageWindow;

/// A stored value plus its insertion sequence, used to break `created_at` ties.
#[derive(Clone)]
struct Row<T> {
    seq: u64,
    value: T,
}

#[derive(Default)]
struct MemoryState {
    users: DashMap<String, User>,
    usernames: DashMap<String, String>,
    emails: DashMap<String, String>,
    posts: DashMap<String, Row<Post>>,
    comments: DashMap<String, Row<Comment>>,
    likes: DashMap<(String, String), Row<Like>>,
    seq: AtomicU64,
    unavailable: AtomicBool,
}

impl MemoryState {
    fn next_seq(&self) -> u64 {
        self.seq.fetch_add(1, Ordering::SeqCst)
    }

    fn check_available(&self) -> DomainResult<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(DomainError::Storage("in-memory store is unavailable".into()));
        }
        Ok(())
    }

    fn author(&self, user_id: &str) -> Option<AuthorSummary> {
        self.users.get(user_id).map(|u| u.summary())
    }

    fn require_user(&self, user_id: &str) -> DomainResult<()> {
        if self.users.contains_key(user_id) {
            Ok(())
        } else {
            Err(DomainError::not_found("User", "id", user_id))
        }
    }

    fn require_post(&self, post_id: &str) -> DomainResult<()> {
        if self.posts.contains_key(post_id) {
            Ok(())
        } else {
            Err(DomainError::not_found("Post", "id", post_id))
        }
    }
}

/// Newest first, latest insert wins ties.
fn newest_first<T>(rows: &mut [Row<T>], created_at: impl Fn(&T) -> DateTime<Utc>) {
    rows.sort_by(|a, b| {
        created_at(&b.value)
            .cmp(&created_at(&a.value))
            .then(b.seq.cmp(&a.seq))
    });
}

fn page<T>(items: impl IntoIterator<Item = T>, window: PageWindow) -> Vec<T> {
    items
        .into_iter()
        .skip(window.skip as usize)
        .take(window.take as usize)
        .collect()
}

/// In-memory implementation of every repository, sharing one state.
#[derive(Clone, Default)]
pub struct InMemoryRepositoryProvider {
    state: Arc<MemoryState>,
}

impl InMemoryRepositoryProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent operation fail with `DomainError::Storage`.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.state.unavailable.store(unavailable, Ordering::SeqCst);
    }
}

impl RepositoryProvider for InMemoryRepositoryProvider {
    fn users(&self) -> &dyn UserRepository {
        self
    }

    fn posts(&self) -> &dyn PostRepository {
        self
    }

    fn comments(&self) -> &dyn CommentRepository {
        self
    }

    fn likes(&self) -> &dyn LikeRepository {
        self
    }
}

// ── Users ───────────────────────────────────────────────────────

#[async_trait]
impl UserRepository for InMemoryRepositoryProvider {
    async fn create(&self, dto: CreateUserDto) -> DomainResult<User> {
        let s = &self.state;
        s.check_available()?;

        let id = uuid::Uuid::new_v4().to_string();

        match s.usernames.entry(dto.username.clone()) {
            Entry::Occupied(_) => {
                return Err(DomainError::Conflict(format!(
                    "username '{}' already exists",
                    dto.username
                )))
            }
            Entry::Vacant(v) => {
                v.insert(id.clone());
            }
        }
        match s.emails.entry(dto.email.clone()) {
            Entry::Occupied(_) => {
                s.usernames.remove(&dto.username);
                return Err(DomainError::Conflict(format!(
                    "email '{}' already exists",
                    dto.email
                )));
            }
            Entry::Vacant(v) => {
                v.insert(id.clone());
            }
        }

        let now = Utc::now();
        let user = User {
            id: id.clone(),
            username: dto.username,
            email: dto.email,
            password_hash: dto.password_hash,
            bio: dto.bio,
            created_at: now,
            updated_at: now,
        };
        s.users.insert(id, user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, id: &str) -> DomainResult<Option<User>> {
        self.state.check_available()?;
        Ok(self.state.users.get(id).map(|u| u.clone()))
    }

    async fn find_by_username(&self, username: &str) -> DomainResult<Option<User>> {
        self.state.check_available()?;
        let id = self.state.usernames.get(username).map(|id| id.clone());
        Ok(id.and_then(|id| self.state.users.get(&id).map(|u| u.clone())))
    }

    async fn find_by_email(&self, email: &str) -> DomainResult<Option<User>> {
        self.state.check_available()?;
        let id = self.state.emails.get(email).map(|id| id.clone());
        Ok(id.and_then(|id| self.state.users.get(&id).map(|u| u.clone())))
    }

    async fn find_page(&self, window: PageWindow) -> DomainResult<Vec<User>> {
        self.state.check_available()?;
        let mut users: Vec<User> = self.state.users.iter().map(|u| u.clone()).collect();
        users.sort_by(|a, b| a.username.cmp(&b.username).then(a.id.cmp(&b.id)));
        Ok(page(users, window))
    }

    async fn count(&self) -> DomainResult<u64> {
        self.state.check_available()?;
        Ok(self.state.users.len() as u64)
    }
}

// ── Posts ───────────────────────────────────────────────────────

#[async_trait]
impl PostRepository for InMemoryRepositoryProvider {
    async fn create(&self, dto: CreatePostDto) -> DomainResult<Post> {
        let s = &self.state;
        s.check_available()?;
        s.require_user(&dto.author_id)?;

        let post = Post {
            id: uuid::Uuid::new_v4().to_string(),
            title: dto.title,
            content: dto.content,
            author_id: dto.author_id,
            created_at: Utc::now(),
        };
        let row = Row {
            seq: s.next_seq(),
            value: post.clone(),
        };
        s.posts.insert(post.id.clone(), row);
        Ok(post)
    }

    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Post>> {
        self.state.check_available()?;
        Ok(self.state.posts.get(id).map(|r| r.value.clone()))
    }

    async fn find_page(
        &self,
        filter: &PostFilter,
        window: PageWindow,
    ) -> DomainResult<Vec<PostWithAuthor>> {
        let s = &self.state;
        s.check_available()?;
        let mut rows: Vec<Row<Post>> = s
            .posts
            .iter()
            .filter(|r| filter.matches(&r.value))
            .map(|r| r.clone())
            .collect();
        newest_first(&mut rows, |p| p.created_at);

        let joined = rows.into_iter().filter_map(|r| {
            s.author(&r.value.author_id)
                .map(|author| PostWithAuthor { post: r.value, author })
        });
        Ok(page(joined, window))
    }

    async fn count(&self, filter: &PostFilter) -> DomainResult<u64> {
        self.state.check_available()?;
        Ok(self
            .state
            .posts
            .iter()
            .filter(|r| filter.matches(&r.value))
            .count() as u64)
    }

    async fn delete(&self, id: &str) -> DomainResult<()> {
        let s = &self.state;
        s.check_available()?;
        if s.posts.remove(id).is_none() {
            return Err(DomainError::not_found("Post", "id", id));
        }
        s.comments.retain(|_, r| r.value.post_id != id);
        s.likes.retain(|(post_id, _), _| post_id != id);
        Ok(())
    }
}

// ── Comments ────────────────────────────────────────────────────

#[async_trait]
impl CommentRepository for InMemoryRepositoryProvider {
    async fn create(&self, dto: CreateCommentDto) -> DomainResult<Comment> {
        let s = &self.state;
        s.check_available()?;
        s.require_post(&dto.post_id)?;
        s.require_user(&dto.author_id)?;

        let now = Utc::now();
        let comment = Comment {
            id: uuid::Uuid::new_v4().to_string(),
            content: dto.content,
            post_id: dto.post_id,
            author_id: dto.author_id,
            created_at: now,
            updated_at: now,
        };
        let row = Row {
            seq: s.next_seq(),
            value: comment.clone(),
        };
        s.comments.insert(comment.id.clone(), row);
        Ok(comment)
    }

    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Comment>> {
        self.state.check_available()?;
        Ok(self.state.comments.get(id).map(|r| r.value.clone()))
    }

    async fn find_page_for_post(
        &self,
        post_id: &str,
        window: PageWindow,
    ) -> DomainResult<Vec<CommentWithAuthor>> {
        let s = &self.state;
        s.check_available()?;
        let mut rows: Vec<Row<Comment>> = s
            .comments
            .iter()
            .filter(|r| r.value.post_id == post_id)
            .map(|r| r.clone())
            .collect();
        newest_first(&mut rows, |c| c.created_at);

        let joined = rows.into_iter().filter_map(|r| {
            s.author(&r.value.author_id).map(|author| CommentWithAuthor {
                comment: r.value,
                author,
            })
        });
        Ok(page(joined, window))
    }

    async fn update_content(&self, id: &str, content: String) -> DomainResult<Comment> {
        self.state.check_available()?;
        let mut row = self
            .state
            .comments
            .get_mut(id)
            .ok_or_else(|| DomainError::not_found("Comment", "id", id))?;
        row.value.content = content;
        row.value.updated_at = Utc::now();
        Ok(row.value.clone())
    }

    async fn delete(&self, id: &str) -> DomainResult<()> {
        self.state.check_available()?;
        self.state
            .comments
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| DomainError::not_found("Comment", "id", id))
    }
}

// ── Likes ───────────────────────────────────────────────────────

#[async_trait]
impl LikeRepository for InMemoryRepositoryProvider {
    async fn create(&self, dto: CreateLikeDto) -> DomainResult<Like> {
        let s = &self.state;
        s.check_available()?;
        s.require_post(&dto.post_id)?;
        s.require_user(&dto.user_id)?;

        // Entry API holds the shard lock, making check-and-insert atomic.
        match s.likes.entry((dto.post_id.clone(), dto.user_id.clone())) {
            Entry::Occupied(_) => Err(DomainError::Conflict(format!(
                "like on post '{}' by user '{}' already exists",
                dto.post_id, dto.user_id
            ))),
            Entry::Vacant(v) => {
                let like = Like {
                    id: uuid::Uuid::new_v4().to_string(),
                    post_id: dto.post_id,
                    user_id: dto.user_id,
                    created_at: Utc::now(),
                };
                v.insert(Row {
                    seq: s.next_seq(),
                    value: like.clone(),
                });
                Ok(like)
            }
        }
    }

    async fn find_by_post_and_user(
        &self,
        post_id: &str,
        user_id: &str,
    ) -> DomainResult<Option<Like>> {
        self.state.check_available()?;
        let key = (post_id.to_string(), user_id.to_string());
        Ok(self.state.likes.get(&key).map(|r| r.value.clone()))
    }

    async fn find_page_for_post(
        &self,
        post_id: &str,
        window: PageWindow,
    ) -> DomainResult<Vec<LikeWithAuthor>> {
        let s = &self.state;
        s.check_available()?;
        let mut rows: Vec<Row<Like>> = s
            .likes
            .iter()
            .filter(|r| r.value.post_id == post_id)
            .map(|r| r.clone())
            .collect();
        newest_first(&mut rows, |l| l.created_at);

        let joined = rows.into_iter().filter_map(|r| {
            s.author(&r.value.user_id).map(|user| LikeWithAuthor {
                like: r.value,
                user,
            })
        });
        Ok(page(joined, window))
    }

    async fn count_for_post(&self, post_id: &str) -> DomainResult<u64> {
        self.state.check_available()?;
        Ok(self
            .state
            .likes
            .iter()
            .filter(|r| r.value.post_id == post_id)
            .count() as u64)
    }

    async fn delete(&self, id: &str) -> DomainResult<()> {
        self.state.check_available()?;
        let key = self
            .state
            .likes
            .iter()
            .find(|r| r.value.id == id)
            .map(|r| r.key().clone());

        match key.and_then(|k| self.state.likes.remove(&k)) {
            Some(_) => Ok(()),
            None => Err(DomainError::not_found("Like", "id", id)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{seed_post, seed_user};

    #[tokio::test]
    async fn duplicate_username_is_conflict() {
        let repos = InMemoryRepositoryProvider::new();
        seed_user(&repos, "alice").await;
        let err = repos
            .users()
            .create(CreateUserDto {
                username: "alice".into(),
                email: "other@example.com".into(),
                password_hash: "hash".into(),
                bio: None,
            })
            .await
            .unwrap_err();
        assert!(err.is_conflict());
        assert!(repos.users().find_by_email("other@example.com").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn duplicate_like_is_conflict() {
        let repos = InMemoryRepositoryProvider::new();
        let alice = seed_user(&repos, "alice").await;
        let post = seed_post(&repos, &alice).await;
        let dto = CreateLikeDto {
            post_id: post.id.clone(),
            user_id: alice.id.clone(),
        };

        repos.likes().create(dto.clone()).await.unwrap();
        let err = repos.likes().create(dto).await.unwrap_err();
        assert!(err.is_conflict());
        assert_eq!(repos.likes().count_for_post(&post.id).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn deleting_post_cascades() {
        let repos = InMemoryRepositoryProvider::new();
        let alice = seed_user(&repos, "alice").await;
        let post = seed_post(&repos, &alice).await;
        let comment = repos
            .comments()
            .create(CreateCommentDto {
                content: "hi".into(),
                post_id: post.id.clone(),
                author_id: alice.id.clone(),
            })
            .await
            .unwrap();
        repos
            .likes()
            .create(CreateLikeDto {
                post_id: post.id.clone(),
                user_id: alice.id.clone(),
            })
            .await
            .unwrap();

        repos.posts().delete(&post.id).await.unwrap();

        assert!(repos.comments().find_by_id(&comment.id).await.unwrap().is_none());
        assert_eq!(repos.likes().count_for_post(&post.id).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn comment_on_missing_post_is_rejected() {
        let repos = InMemoryRepositoryProvider::new();
        let alice = seed_user(&repos, "alice").await;
        let err = repos
            .comments()
            .create(CreateCommentDto {
                content: "hi".into(),
                post_id: "missing".into(),
                author_id: alice.id,
            })
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn unavailable_store_fails_every_call() {
        let repos = InMemoryRepositoryProvider::new();
        repos.set_unavailable(true);
        let err = repos.users().count().await.unwrap_err();
        assert!(matches!(err, DomainError::Storage(_)));
    }
}
