use chrono::{DateTime, Utc};

/// User model
#[derive(Clone, Debug)]
pub struct User {
    pub id: String,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub bio: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn summary(&self) -> AuthorSummary {
        AuthorSummary {
            id: self.id.clone(),
            username: self.username.clone(),
        }
    }
}

/// Minimal author identity attached to listed posts, comments and likes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthorSummary {
    pub id: String,
    pub username: String,
}
