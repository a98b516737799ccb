use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};

use crate::domain::{CreateUserDto, DomainResult, User, UserRepository};
use crate::infrastructure::database::entities::user;
use crate::shared::PageWindow;

pub struct SeaOrmUserRepository {
    db: DatabaseConnection,
}

impl SeaOrmUserRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

// ── Conversion helpers ──────────────────────────────────────────

pub(super) fn user_model_to_domain(model: user::Model) -> User {
    User {
        id: model.id,
        username: model.username,
        email: model.email,
        password_hash: model.password_hash,
        bio: model.bio,
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}

// ── Repository implementation ───────────────────────────────────

#[async_trait]
impl UserRepository for SeaOrmUserRepository {
    async fn create(&self, dto: CreateUserDto) -> DomainResult<User> {
        let now = Utc::now();

        let new_user = user::ActiveModel {
            id: Set(uuid::Uuid::new_v4().to_string()),
            username: Set(dto.username),
            email: Set(dto.email),
            password_hash: Set(dto.password_hash),
            bio: Set(dto.bio),
            created_at: Set(now),
            updated_at: Set(now),
        };

        // Unique violations surface as DomainError::Conflict.
        let model = new_user.insert(&self.db).await?;
        Ok(user_model_to_domain(model))
    }

    async fn find_by_id(&self, id: &str) -> DomainResult<Option<User>> {
        let model = user::Entity::find_by_id(id).one(&self.db).await?;
        Ok(model.map(user_model_to_domain))
    }

    async fn find_by_username(&self, username: &str) -> DomainResult<Option<User>> {
        let model = user::Entity::find()
            .filter(user::Column::Username.eq(username))
            .one(&self.db)
            .await?;
        Ok(model.map(user_model_to_domain))
    }

    async fn find_by_email(&self, email: &str) -> DomainResult<Option<User>> {
        let model = user::Entity::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await?;
        Ok(model.map(user_model_to_domain))
    }

    async fn find_page(&self, window: PageWindow) -> DomainResult<Vec<User>> {
        let models = user::Entity::find()
            .order_by_asc(user::Column::Username)
            .order_by_asc(user::Column::Id)
            .offset(window.skip)
            .limit(window.take)
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(user_model_to_domain).collect())
    }

    async fn count(&self) -> DomainResult<u64> {
        Ok(user::Entity::find().count(&self.db).await?)
    }
}
