//! SeaORM implementation of CommentRepository

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, Order, QueryFilter,
    QueryOrder, QuerySelect, Set,
};

use super::rowid;
use super::user_repository::user_model_to_domain;
use crate::domain::{
    Comment, CommentRepository, CommentWithAuthor, CreateCommentDto, DomainError, DomainResult,
};
use crate::infrastructure::database::entities::{comment, user};
use crate::shared::PageWindow;

pub struct SeaOrmCommentRepository {
    db: DatabaseConnection,
}

impl SeaOrmCommentRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn model_to_domain(m: comment::Model) -> Comment {
    Comment {
        id: m.id,
        content: m.content,
        post_id: m.post_id,
        author_id: m.author_id,
        created_at: m.created_at,
        updated_at: m.updated_at,
    }
}

#[async_trait]
impl CommentRepository for SeaOrmCommentRepository {
    async fn create(&self, dto: CreateCommentDto) -> DomainResult<Comment> {
        let now = Utc::now();
        let model = comment::ActiveModel {
            id: Set(uuid::Uuid::new_v4().to_string()),
            content: Set(dto.content),
            post_id: Set(dto.post_id),
            author_id: Set(dto.author_id),
            created_at: Set(now),
            updated_at: Set(now),
        };
        Ok(model_to_domain(model.insert(&self.db).await?))
    }

    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Comment>> {
        let model = comment::Entity::find_by_id(id).one(&self.db).await?;
        Ok(model.map(model_to_domain))
    }

    async fn find_page_for_post(
        &self,
        post_id: &str,
        window: PageWindow,
    ) -> DomainResult<Vec<CommentWithAuthor>> {
        let rows = comment::Entity::find()
            .find_also_related(user::Entity)
            .filter(comment::Column::PostId.eq(post_id))
            .order_by_desc(comment::Column::CreatedAt)
            .order_by(rowid(comment::Entity), Order::Desc)
            .offset(window.skip)
            .limit(window.take)
            .all(&self.db)
            .await?;

        Ok(rows
            .into_iter()
            .filter_map(|(c, author)| {
                author.map(|a| CommentWithAuthor {
                    comment: model_to_domain(c),
                    author: user_model_to_domain(a).summary(),
                })
            })
            .collect())
    }

    async fn update_content(&self, id: &str, content: String) -> DomainResult<Comment> {
        let existing = comment::Entity::find_by_id(id).one(&self.db).await?;

        let Some(existing) = existing else {
            return Err(DomainError::not_found("Comment", "id", id));
        };

        let mut active: comment::ActiveModel = existing.into();
        active.content = Set(content);
        active.updated_at = Set(Utc::now());
        Ok(model_to_domain(active.update(&self.db).await?))
    }

    async fn delete(&self, id: &str) -> DomainResult<()> {
        let result = comment::Entity::delete_by_id(id).exec(&self.db).await?;

        if result.rows_affected == 0 {
            return Err(DomainError::not_found("Comment", "id", id));
        }
        Ok(())
    }
}
