use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};

use super::dto::{LikeDto, LikeStatus, LikeStatusResponse, LikesListResponse, LikesListStatus};
use crate::application::{LikeError, LikeOutcome, LikeService, LikesOnPost};
use crate::interfaces::http::common::{api_error, internal_error, ApiError, ApiResponse, PageQuery};
use crate::interfaces::http::middleware::AuthenticatedUser;
use crate::shared::PaginationPolicy;

#[derive(Clone)]
pub struct LikeHandlerState {
    pub likes: Arc<LikeService>,
    pub pagination: PaginationPolicy,
}

fn like_error(e: LikeError) -> ApiError {
    match e {
        LikeError::PostNotFound | LikeError::LikeNotFound => {
            api_error(StatusCode::NOT_FOUND, e.to_string())
        }
        LikeError::Unknown => internal_error(),
    }
}

#[utoipa::path(
    post,
    path = "/api/v1/posts/{id}/likes",
    tag = "Likes",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Post ID")),
    responses(
        (status = 201, description = "Post liked", body = ApiResponse<LikeStatusResponse>),
        (status = 200, description = "Caller had already liked the post", body = ApiResponse<LikeStatusResponse>),
        (status = 404, description = "Post not found")
    )
)]
pub async fn create_like(
    State(state): State<LikeHandlerState>,
    Extension(caller): Extension<AuthenticatedUser>,
    Path(post_id): Path<String>,
) -> Result<(StatusCode, Json<ApiResponse<LikeStatusResponse>>), ApiError> {
    let outcome = state
        .likes
        .create_like(&post_id, &caller.user_id)
        .await
        .map_err(like_error)?;

    let (status, body) = match outcome {
        LikeOutcome::Liked(like) => (
            StatusCode::CREATED,
            LikeStatusResponse {
                status: LikeStatus::Liked,
                like: Some(LikeDto::from(like)),
            },
        ),
        LikeOutcome::AlreadyLiked => (
            StatusCode::OK,
            LikeStatusResponse {
                status: LikeStatus::AlreadyLiked,
                like: None,
            },
        ),
    };
    Ok((status, Json(ApiResponse::success(body))))
}

#[utoipa::path(
    get,
    path = "/api/v1/posts/{id}/likes",
    tag = "Likes",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Post ID"), PageQuery),
    responses(
        (status = 200, description = "Likes, newest first, or status no_likes_found", body = ApiResponse<LikesListResponse>),
        (status = 404, description = "Post not found")
    )
)]
pub async fn get_likes(
    State(state): State<LikeHandlerState>,
    Path(post_id): Path<String>,
    Query(query): Query<PageQuery>,
) -> Result<Json<ApiResponse<LikesListResponse>>, ApiError> {
    let params = query.resolve(&state.pagination)?;
    let result = state
        .likes
        .get_likes_on_post(&post_id, params)
        .await
        .map_err(like_error)?;

    let body = match result {
        LikesOnPost::Likes { likes, total } => LikesListResponse {
            status: LikesListStatus::Listed,
            items: likes.into_iter().map(LikeDto::from).collect(),
            total,
            page: params.page,
            limit: params.limit,
        },
        LikesOnPost::NoLikesFound => LikesListResponse {
            status: LikesListStatus::NoLikesFound,
            items: Vec::new(),
            total: 0,
            page: params.page,
            limit: params.limit,
        },
    };
    Ok(Json(ApiResponse::success(body)))
}

#[utoipa::path(
    delete,
    path = "/api/v1/posts/{id}/likes",
    tag = "Likes",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Post ID")),
    responses(
        (status = 200, description = "Like removed", body = ApiResponse<LikeStatusResponse>),
        (status = 404, description = "Caller has not liked the post")
    )
)]
pub async fn delete_like(
    State(state): State<LikeHandlerState>,
    Extension(caller): Extension<AuthenticatedUser>,
    Path(post_id): Path<String>,
) -> Result<Json<ApiResponse<LikeStatusResponse>>, ApiError> {
    state
        .likes
        .delete_like_on_post(&post_id, &caller.user_id)
        .await
        .map_err(like_error)?;
    Ok(Json(ApiResponse::success(LikeStatusResponse {
        status: LikeStatus::Unliked,
        like: None,
    })))
}
