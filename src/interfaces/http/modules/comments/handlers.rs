use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};

use super::dto::{CommentDto, CommentRequest};
use crate::application::{CommentError, CommentService};
use crate::interfaces::http::common::{
    api_error, internal_error, ApiError, ApiResponse, Deleted, PageQuery, ValidatedJson,
};
use crate::interfaces::http::middleware::AuthenticatedUser;
use crate::shared::PaginationPolicy;

#[derive(Clone)]
pub struct CommentHandlerState {
    pub comments: Arc<CommentService>,
    pub pagination: PaginationPolicy,
}

fn comment_error(e: CommentError) -> ApiError {
    match e {
        CommentError::PostNotFound | CommentError::CommentNotFound => {
            api_error(StatusCode::NOT_FOUND, e.to_string())
        }
        CommentError::CreationFailed | CommentError::Unknown => internal_error(),
    }
}

#[utoipa::path(
    post,
    path = "/api/v1/posts/{id}/comments",
    tag = "Comments",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Post ID")),
    request_body = CommentRequest,
    responses(
        (status = 201, description = "Comment created", body = ApiResponse<CommentDto>),
        (status = 404, description = "Post not found"),
        (status = 422, description = "Validation error")
    )
)]
pub async fn create_comment(
    State(state): State<CommentHandlerState>,
    Extension(caller): Extension<AuthenticatedUser>,
    Path(post_id): Path<String>,
    ValidatedJson(req): ValidatedJson<CommentRequest>,
) -> Result<(StatusCode, Json<ApiResponse<CommentDto>>), ApiError> {
    let comment = state
        .comments
        .create_comment(req.content, &post_id, &caller.user_id)
        .await
        .map_err(comment_error)?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(CommentDto::from(comment))),
    ))
}

#[utoipa::path(
    get,
    path = "/api/v1/posts/{id}/comments",
    tag = "Comments",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Post ID"), PageQuery),
    responses(
        (status = 200, description = "Comments, newest first; empty when there are none", body = ApiResponse<Vec<CommentDto>>),
        (status = 400, description = "Invalid pagination")
    )
)]
pub async fn list_comments(
    State(state): State<CommentHandlerState>,
    Path(post_id): Path<String>,
    Query(query): Query<PageQuery>,
) -> Result<Json<ApiResponse<Vec<CommentDto>>>, ApiError> {
    let params = query.resolve(&state.pagination)?;
    let comments = state
        .comments
        .list_comments(&post_id, params)
        .await
        .map_err(comment_error)?;
    Ok(Json(ApiResponse::success(
        comments.into_iter().map(CommentDto::from).collect(),
    )))
}

#[utoipa::path(
    put,
    path = "/api/v1/comments/{id}",
    tag = "Comments",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Comment ID")),
    request_body = CommentRequest,
    responses(
        (status = 200, description = "Comment updated", body = ApiResponse<CommentDto>),
        (status = 404, description = "Not found or not authored by the caller")
    )
)]
pub async fn update_comment(
    State(state): State<CommentHandlerState>,
    Extension(caller): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
    ValidatedJson(req): ValidatedJson<CommentRequest>,
) -> Result<Json<ApiResponse<CommentDto>>, ApiError> {
    let comment = state
        .comments
        .update_comment(&id, &caller.user_id, req.content)
        .await
        .map_err(comment_error)?;
    Ok(Json(ApiResponse::success(CommentDto::from(comment))))
}

#[utoipa::path(
    delete,
    path = "/api/v1/comments/{id}",
    tag = "Comments",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Comment ID")),
    responses(
        (status = 200, description = "Deleted", body = ApiResponse<Deleted>),
        (status = 404, description = "Not found or not authored by the caller")
    )
)]
pub async fn delete_comment(
    State(state): State<CommentHandlerState>,
    Extension(caller): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Deleted>>, ApiError> {
    state
        .comments
        .delete_comment(&id, &caller.user_id)
        .await
        .map_err(comment_error)?;
    Ok(Json(ApiResponse::success(Deleted { id })))
}
