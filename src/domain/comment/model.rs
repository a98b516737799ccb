//! Comment domain entity

use chrono::{DateTime, Utc};

use crate::domain::user::AuthorSummary;

/// A comment on a post
#[derive(Debug, Clone)]
pub struct Comment {
    pub id: String,
    pub content: String,
    pub post_id: String,
    pub author_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Comment {
    pub fn is_authored_by(&self, user_id: &str) -> bool {
        self.author_id == user_id
    }
}

#[derive(Debug, Clone)]
pub struct CreateCommentDto {
    pub content: String,
    pub post_id: String,
    pub author_id: String,
}

/// Listing row: the comment plus who wrote it.
#[derive(Debug, Clone)]
pub struct CommentWithAuthor {
    pub comment: Comment,
    pub author: AuthorSummary,
}
