//! Post domain entity

use chrono::{DateTime, Utc};

use crate::domain::user::AuthorSummary;

/// A post owned by exactly one user.
#[derive(Debug, Clone)]
pub struct Post {
    pub id: String,
    pub title: String,
    pub content: String,
    pub author_id: String,
    pub created_at: DateTime<Utc>,
}

impl Post {
    pub fn is_owned_by(&self, user_id: &str) -> bool {
        self.author_id == user_id
    }
}

/// Listing row: the post plus who wrote it.
#[derive(Debug, Clone)]
pub struct PostWithAuthor {
    pub post: Post,
    pub author: AuthorSummary,
}

#[derive(Debug, Clone)]
pub struct CreatePostDto {
    pub title: String,
    pub content: String,
    pub author_id: String,
}

/// Predicate shared by post listing and counting, so a page and its
/// `total` are always computed against the same rows.
#[derive(Debug, Clone, Default)]
pub struct PostFilter {
    pub author_id: Option<String>,
}

impl PostFilter {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn by_author(author_id: impl Into<String>) -> Self {
        Self {
            author_id: Some(author_id.into()),
        }
    }

    pub fn matches(&self, post: &Post) -> bool {
        match &self.author_id {
            Some(author) => &post.author_id == author,
            None => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_post(author: &str) -> Post {
        Post {
            id: "p1".into(),
            title: "Hello".into(),
            content: "World".into(),
            author_id: author.into(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn ownership_is_by_author_id() {
        let post = sample_post("alice");
        assert!(post.is_owned_by("alice"));
        assert!(!post.is_owned_by("bob"));
    }

    #[test]
    fn filter_by_author() {
        let post = sample_post("alice");
        assert!(PostFilter::all().matches(&post));
        assert!(PostFilter::by_author("alice").matches(&post));
        assert!(!PostFilter::by_author("bob").matches(&post));
    }
}
