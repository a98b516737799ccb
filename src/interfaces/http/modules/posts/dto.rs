use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::domain::{Post, PostWithAuthor};
use crate::interfaces::http::common::AuthorDto;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreatePostRequest {
    #[validate(length(min = 1, max = 200, message = "title must be 1-200 characters"))]
    pub title: String,
    #[validate(length(min = 1, max = 10000, message = "content must be 1-10000 characters"))]
    pub content: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PostDto {
    pub id: String,
    pub title: String,
    pub content: String,
    pub author_id: String,
    /// Present in listings
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<AuthorDto>,
    pub created_at: DateTime<Utc>,
}

impl From<Post> for PostDto {
    fn from(p: Post) -> Self {
        Self {
            id: p.id,
            title: p.title,
            content: p.content,
            author_id: p.author_id,
            author: None,
            created_at: p.created_at,
        }
    }
}

impl From<PostWithAuthor> for PostDto {
    fn from(p: PostWithAuthor) -> Self {
        Self {
            author: Some(p.author.into()),
            ..Self::from(p.post)
        }
    }
}
