use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::domain::{Comment, CommentWithAuthor};
use crate::interfaces::http::common::AuthorDto;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CommentRequest {
    #[validate(length(min = 1, max = 2000, message = "content must be 1-2000 characters"))]
    pub content: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CommentDto {
    pub id: String,
    pub content: String,
    pub post_id: String,
    pub author_id: String,
    /// Present in listings
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<AuthorDto>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Comment> for CommentDto {
    fn from(c: Comment) -> Self {
        Self {
            id: c.id,
            content: c.content,
            post_id: c.post_id,
            author_id: c.author_id,
            author: None,
            created_at: c.created_at,
            updated_at: c.updated_at,
        }
    }
}

impl From<CommentWithAuthor> for CommentDto {
    fn from(c: CommentWithAuthor) -> Self {
        Self {
            author: Some(c.author.into()),
            ..Self::from(c.comment)
        }
    }
}
