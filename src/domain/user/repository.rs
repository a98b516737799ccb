use async_trait::async_trait;

use super::{CreateUserDto, User};
use crate::domain::DomainResult;
use crate::shared::PageWindow;

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a user. A taken username or email yields `DomainError::Conflict`.
    async fn create(&self, dto: CreateUserDto) -> DomainResult<User>;

    async fn find_by_id(&self, id: &str) -> DomainResult<Option<User>>;
    async fn find_by_username(&self, username: &str) -> DomainResult<Option<User>>;
    async fn find_by_email(&self, email: &str) -> DomainResult<Option<User>>;

    /// Users ordered by username ascending.
    async fn find_page(&self, window: PageWindow) -> DomainResult<Vec<User>>;
    async fn count(&self) -> DomainResult<u64>;
}
