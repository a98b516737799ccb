use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::User;

/// Public profile. `email` is only present on the caller's own profile.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UserDto {
    pub id: String,
    pub username: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub bio: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl UserDto {
    /// Profile as seen by its owner.
    pub fn private(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: Some(user.email),
            bio: user.bio,
            created_at: user.created_at,
        }
    }
}

impl From<User> for UserDto {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: None,
            bio: user.bio,
            created_at: user.created_at,
        }
    }
}
