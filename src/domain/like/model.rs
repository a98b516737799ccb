use chrono::{DateTime, Utc};

use crate::domain::user::AuthorSummary;

#[derive(Debug, Clone)]
pub struct Like {
    pub id: String,
    pub post_id: String,
    pub user_id: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct CreateLikeDto {
    pub post_id: String,
    pub user_id: String,
}

#[derive(Debug, Clone)]
pub struct LikeWithAuthor {
    pub like: Like,
    pub user: AuthorSummary,
}
