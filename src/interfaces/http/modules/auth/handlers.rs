use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Json};

use super::dto::{LoginRequest, LoginResponse, RegisterRequest};
use crate::application::{AuthError, UserService};
use crate::interfaces::http::common::{api_error, internal_error, ApiError, ApiResponse, ValidatedJson};
use crate::interfaces::http::modules::users::UserDto;

#[derive(Clone)]
pub struct AuthHandlerState {
    pub users: Arc<UserService>,
}

fn auth_error(e: AuthError) -> ApiError {
    match e {
        AuthError::Validation(msg) => api_error(StatusCode::UNPROCESSABLE_ENTITY, msg),
        AuthError::UsernameTaken | AuthError::EmailTaken => {
            api_error(StatusCode::CONFLICT, e.to_string())
        }
        AuthError::InvalidCredentials => api_error(StatusCode::UNAUTHORIZED, e.to_string()),
        AuthError::Unknown => internal_error(),
    }
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/register",
    tag = "Authentication",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = ApiResponse<UserDto>),
        (status = 400, description = "Malformed body"),
        (status = 409, description = "Username or email already taken"),
        (status = 422, description = "Validation error")
    )
)]
pub async fn register(
    State(state): State<AuthHandlerState>,
    ValidatedJson(req): ValidatedJson<RegisterRequest>,
) -> Result<(StatusCode, Json<ApiResponse<UserDto>>), ApiError> {
    let user = state
        .users
        .register(&req.username, &req.email, &req.password)
        .await
        .map_err(auth_error)?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(UserDto::private(user))),
    ))
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    tag = "Authentication",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Token issued", body = ApiResponse<LoginResponse>),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn login(
    State(state): State<AuthHandlerState>,
    ValidatedJson(req): ValidatedJson<LoginRequest>,
) -> Result<Json<ApiResponse<LoginResponse>>, ApiError> {
    let token = state
        .users
        .login(&req.login, &req.password)
        .await
        .map_err(auth_error)?;

    Ok(Json(ApiResponse::success(LoginResponse::from(token))))
}
