use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};

use super::dto::{CreatePostRequest, PostDto};
use crate::application::{PostError, PostService};
use crate::interfaces::http::common::{
    api_error, internal_error, ApiError, ApiResponse, Deleted, PageQuery, PaginatedResponse,
    ValidatedJson,
};
use crate::interfaces::http::middleware::AuthenticatedUser;
use crate::shared::PaginationPolicy;

#[derive(Clone)]
pub struct PostHandlerState {
    pub posts: Arc<PostService>,
    pub pagination: PaginationPolicy,
}

fn post_error(e: PostError) -> ApiError {
    match e {
        PostError::NotFound => api_error(StatusCode::NOT_FOUND, e.to_string()),
        PostError::Unknown => internal_error(),
    }
}

#[utoipa::path(
    post,
    path = "/api/v1/posts",
    tag = "Posts",
    security(("bearer_auth" = [])),
    request_body = CreatePostRequest,
    responses(
        (status = 201, description = "Post created", body = ApiResponse<PostDto>),
        (status = 422, description = "Validation error")
    )
)]
pub async fn create_post(
    State(state): State<PostHandlerState>,
    Extension(caller): Extension<AuthenticatedUser>,
    ValidatedJson(req): ValidatedJson<CreatePostRequest>,
) -> Result<(StatusCode, Json<ApiResponse<PostDto>>), ApiError> {
    let post = state
        .posts
        .create_post(req.title, req.content, &caller.user_id)
        .await
        .map_err(post_error)?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(PostDto::from(post))),
    ))
}

#[utoipa::path(
    get,
    path = "/api/v1/posts",
    tag = "Posts",
    security(("bearer_auth" = [])),
    params(PageQuery),
    responses(
        (status = 200, description = "Posts, newest first", body = ApiResponse<PaginatedResponse<PostDto>>),
        (status = 400, description = "Invalid pagination")
    )
)]
pub async fn list_posts(
    State(state): State<PostHandlerState>,
    Query(query): Query<PageQuery>,
) -> Result<Json<ApiResponse<PaginatedResponse<PostDto>>>, ApiError> {
    let params = query.resolve(&state.pagination)?;
    let page = state.posts.list_posts(params).await.map_err(post_error)?;
    Ok(Json(ApiResponse::success(PaginatedResponse::from_result(
        page,
        PostDto::from,
    ))))
}

#[utoipa::path(
    get,
    path = "/api/v1/users/{id}/posts",
    tag = "Posts",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Author ID"), PageQuery),
    responses(
        (status = 200, description = "The author's posts, newest first", body = ApiResponse<PaginatedResponse<PostDto>>),
        (status = 400, description = "Invalid pagination")
    )
)]
pub async fn list_user_posts(
    State(state): State<PostHandlerState>,
    Path(author_id): Path<String>,
    Query(query): Query<PageQuery>,
) -> Result<Json<ApiResponse<PaginatedResponse<PostDto>>>, ApiError> {
    let params = query.resolve(&state.pagination)?;
    let page = state
        .posts
        .list_posts_by_user(&author_id, params)
        .await
        .map_err(post_error)?;
    Ok(Json(ApiResponse::success(PaginatedResponse::from_result(
        page,
        PostDto::from,
    ))))
}

#[utoipa::path(
    get,
    path = "/api/v1/posts/{id}",
    tag = "Posts",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Post ID")),
    responses(
        (status = 200, description = "Post", body = ApiResponse<PostDto>),
        (status = 404, description = "Not found")
    )
)]
pub async fn get_post(
    State(state): State<PostHandlerState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<PostDto>>, ApiError> {
    let post = state.posts.get_post(&id).await.map_err(post_error)?;
    Ok(Json(ApiResponse::success(PostDto::from(post))))
}

#[utoipa::path(
    delete,
    path = "/api/v1/posts/{id}",
    tag = "Posts",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Post ID")),
    responses(
        (status = 200, description = "Deleted", body = ApiResponse<Deleted>),
        (status = 404, description = "Not found or not owned by the caller")
    )
)]
pub async fn delete_post(
    State(state): State<PostHandlerState>,
    Extension(caller): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Deleted>>, ApiError> {
    state
        .posts
        .delete_post(&id, &caller.user_id)
        .await
        .map_err(post_error)?;
    Ok(Json(ApiResponse::success(Deleted { id })))
}
