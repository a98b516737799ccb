use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{Like, LikeWithAuthor};
use crate::interfaces::http::common::AuthorDto;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum LikeStatus {
    Liked,
    AlreadyLiked,
    Unliked,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum LikesListStatus {
    #[serde(rename = "ok")]
    Listed,
    NoLikesFound,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LikeDto {
    pub id: String,
    pub post_id: String,
    pub user_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<AuthorDto>,
    pub created_at: DateTime<Utc>,
}

impl From<Like> for LikeDto {
    fn from(l: Like) -> Self {
        Self {
            id: l.id,
            post_id: l.post_id,
            user_id: l.user_id,
            user: None,
            created_at: l.created_at,
        }
    }
}

impl From<LikeWithAuthor> for LikeDto {
    fn from(l: LikeWithAuthor) -> Self {
        Self {
            user: Some(l.user.into()),
            ..Self::from(l.like)
        }
    }
}

/// Outcome of a like or unlike request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LikeStatusResponse {
    pub status: LikeStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub like: Option<LikeDto>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LikesListResponse {
    pub status: LikesListStatus,
    pub items: Vec<LikeDto>,
    pub total: u64,
    pub page: u32,
    pub limit: u32,
}
