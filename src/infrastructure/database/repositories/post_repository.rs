//! SeaORM implementation of PostRepository

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, Order, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Select, Set,
};
use tracing::debug;

use super::rowid;
use super::user_repository::user_model_to_domain;
use crate::domain::{
    CreatePostDto, DomainError, DomainResult, Post, PostFilter, PostRepository, PostWithAuthor,
};
use crate::infrastructure::database::entities::{post, user};
use crate::shared::PageWindow;

pub struct SeaOrmPostRepository {
    db: DatabaseConnection,
}

impl SeaOrmPostRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn model_to_domain(m: post::Model) -> Post {
    Post {
        id: m.id,
        title: m.title,
        content: m.content,
        author_id: m.author_id,
        created_at: m.created_at,
    }
}

/// Base query for a filter; listing and counting both start here.
fn filtered(filter: &PostFilter) -> Select<post::Entity> {
    let mut query = post::Entity::find();
    if let Some(author_id) = &filter.author_id {
        query = query.filter(post::Column::AuthorId.eq(author_id.as_str()));
    }
    query
}

#[async_trait]
impl PostRepository for SeaOrmPostRepository {
    async fn create(&self, dto: CreatePostDto) -> DomainResult<Post> {
        let model = post::ActiveModel {
            id: Set(uuid::Uuid::new_v4().to_string()),
            title: Set(dto.title),
            content: Set(dto.content),
            author_id: Set(dto.author_id),
            created_at: Set(Utc::now()),
        };
        let model = model.insert(&self.db).await?;
        debug!(post_id = %model.id, "Post inserted");
        Ok(model_to_domain(model))
    }

    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Post>> {
        let model = post::Entity::find_by_id(id).one(&self.db).await?;
        Ok(model.map(model_to_domain))
    }

    async fn find_page(
        &self,
        filter: &PostFilter,
        window: PageWindow,
    ) -> DomainResult<Vec<PostWithAuthor>> {
        let rows = filtered(filter)
            .find_also_related(user::Entity)
            .order_by_desc(post::Column::CreatedAt)
            .order_by(rowid(post::Entity), Order::Desc)
            .offset(window.skip)
            .limit(window.take)
            .all(&self.db)
            .await?;

        Ok(rows
            .into_iter()
            .filter_map(|(p, author)| {
                author.map(|a| PostWithAuthor {
                    post: model_to_domain(p),
                    author: user_model_to_domain(a).summary(),
                })
            })
            .collect())
    }

    async fn count(&self, filter: &PostFilter) -> DomainResult<u64> {
        Ok(filtered(filter).count(&self.db).await?)
    }

    async fn delete(&self, id: &str) -> DomainResult<()> {
        let result = post::Entity::delete_by_id(id).exec(&self.db).await?;

        if result.rows_affected == 0 {
            return Err(DomainError::not_found("Post", "id", id));
        }
        debug!(post_id = id, "Post deleted");
        Ok(())
    }
}
