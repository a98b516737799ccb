//! SeaORM implementation of LikeRepository

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, Order, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set,
};
use tracing::debug;

use super::rowid;
use super::user_repository::user_model_to_domain;
use crate::domain::{
    CreateLikeDto, DomainError, DomainResult, Like, LikeRepository, LikeWithAuthor,
};
use crate::infrastructure::database::entities::{like, user};
use crate::shared::PageWindow;

pub struct SeaOrmLikeRepository {
    db: DatabaseConnection,
}

impl SeaOrmLikeRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn model_to_domain(m: like::Model) -> Like {
    Like {
        id: m.id,
        post_id: m.post_id,
        user_id: m.user_id,
        created_at: m.created_at,
    }
}

#[async_trait]
impl LikeRepository for SeaOrmLikeRepository {
    async fn create(&self, dto: CreateLikeDto) -> DomainResult<Like> {
        let model = like::ActiveModel {
            id: Set(uuid::Uuid::new_v4().to_string()),
            post_id: Set(dto.post_id),
            user_id: Set(dto.user_id),
            created_at: Set(Utc::now()),
        };

        // uq_likes_post_user rejects duplicates -> DomainError::Conflict
        let model = model.insert(&self.db).await?;
        debug!(like_id = %model.id, post_id = %model.post_id, "Like inserted");
        Ok(model_to_domain(model))
    }

    async fn find_by_post_and_user(
        &self,
        post_id: &str,
        user_id: &str,
    ) -> DomainResult<Option<Like>> {
        let model = like::Entity::find()
            .filter(like::Column::PostId.eq(post_id))
            .filter(like::Column::UserId.eq(user_id))
            .one(&self.db)
            .await?;
        Ok(model.map(model_to_domain))
    }

    async fn find_page_for_post(
        &self,
        post_id: &str,
        window: PageWindow,
    ) -> DomainResult<Vec<LikeWithAuthor>> {
        let rows = like::Entity::find()
            .find_also_related(user::Entity)
            .filter(like::Column::PostId.eq(post_id))
            .order_by_desc(like::Column::CreatedAt)
            .order_by(rowid(like::Entity), Order::Desc)
            .offset(window.skip)
            .limit(window.take)
            .all(&self.db)
            .await?;

        Ok(rows
            .into_iter()
            .filter_map(|(l, u)| {
                u.map(|u| LikeWithAuthor {
                    like: model_to_domain(l),
                    user: user_model_to_domain(u).summary(),
                })
            })
            .collect())
    }

    async fn count_for_post(&self, post_id: &str) -> DomainResult<u64> {
        Ok(like::Entity::find()
            .filter(like::Column::PostId.eq(post_id))
            .count(&self.db)
            .await?)
    }

    async fn delete(&self, id: &str) -> DomainResult<()> {
        let result = like::Entity::delete_by_id(id).exec(&self.db).await?;

        if result.rows_affected == 0 {
            return Err(DomainError::not_found("Like", "id", id));
        }
        Ok(())
    }
}
