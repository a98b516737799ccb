use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};

use super::dto::UserDto;
use crate::application::{UserError, UserService};
use crate::interfaces::http::common::{
    api_error, internal_error, ApiError, ApiResponse, PageQuery, PaginatedResponse,
};
use crate::interfaces::http::middleware::AuthenticatedUser;
use crate::shared::PaginationPolicy;

#[derive(Clone)]
pub struct UserHandlerState {
    pub users: Arc<UserService>,
    pub pagination: PaginationPolicy,
}

fn user_error(e: UserError) -> ApiError {
    match e {
        UserError::BadRequest => api_error(StatusCode::BAD_REQUEST, e.to_string()),
        UserError::NotFound => api_error(StatusCode::NOT_FOUND, e.to_string()),
        UserError::Unknown => internal_error(),
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/users/me",
    tag = "Users",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Caller's profile", body = ApiResponse<UserDto>),
        (status = 400, description = "Account no longer exists"),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn get_me(
    State(state): State<UserHandlerState>,
    Extension(caller): Extension<AuthenticatedUser>,
) -> Result<Json<ApiResponse<UserDto>>, ApiError> {
    let user = state.users.get_me(&caller.user_id).await.map_err(user_error)?;
    Ok(Json(ApiResponse::success(UserDto::private(user))))
}

#[utoipa::path(
    get,
    path = "/api/v1/users",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(PageQuery),
    responses(
        (status = 200, description = "Users by username", body = ApiResponse<PaginatedResponse<UserDto>>),
        (status = 400, description = "Invalid pagination")
    )
)]
pub async fn list_users(
    State(state): State<UserHandlerState>,
    Query(query): Query<PageQuery>,
) -> Result<Json<ApiResponse<PaginatedResponse<UserDto>>>, ApiError> {
    let params = query.resolve(&state.pagination)?;
    let page = state.users.list_users(params).await.map_err(user_error)?;
    Ok(Json(ApiResponse::success(PaginatedResponse::from_result(
        page,
        UserDto::from,
    ))))
}

#[utoipa::path(
    get,
    path = "/api/v1/users/{id}",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "User ID")),
    responses(
        (status = 200, description = "Public profile", body = ApiResponse<UserDto>),
        (status = 404, description = "Not found")
    )
)]
pub async fn get_user(
    State(state): State<UserHandlerState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<UserDto>>, ApiError> {
    let user = state.users.get_user(&id).await.map_err(user_error)?;
    Ok(Json(ApiResponse::success(UserDto::from(user))))
}
