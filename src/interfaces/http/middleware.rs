//! Bearer-token authentication middleware

use axum::{
    body::Body,
    extract::State,
    http::{header, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use tracing::debug;

use crate::infrastructure::crypto::jwt::{verify_token, JwtConfig, TokenClaims};
use crate::interfaces::http::common::ApiResponse;

#[derive(Debug)]
enum AuthRejection {
    MissingToken,
    MalformedHeader,
    InvalidToken,
    ExpiredToken,
}

#[derive(Clone)]
pub struct AuthState {
    pub jwt_config: JwtConfig,
}

/// Identity of the caller, inserted into request extensions by
/// [`auth_middleware`].
#[derive(Clone, Debug)]
pub struct AuthenticatedUser {
    pub user_id: String,
    pub username: String,
}

impl From<TokenClaims> for AuthenticatedUser {
    fn from(claims: TokenClaims) -> Self {
        Self {
            user_id: claims.sub,
            username: claims.username,
        }
    }
}

fn bearer_token(value: &str) -> Option<&str> {
    value
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

pub async fn auth_middleware(
    State(auth): State<AuthState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let Some(value) = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
    else {
        return rejection_response(AuthRejection::MissingToken);
    };

    let Some(token) = bearer_token(value) else {
        return rejection_response(AuthRejection::MalformedHeader);
    };

    let claims = match verify_token(token, &auth.jwt_config) {
        Ok(claims) => claims,
        Err(e) => {
            debug!(error = %e, "Rejected bearer token");
            return rejection_response(AuthRejection::InvalidToken);
        }
    };
    if claims.is_expired() {
        return rejection_response(AuthRejection::ExpiredToken);
    }

    request
        .extensions_mut()
        .insert(AuthenticatedUser::from(claims));
    next.run(request).await
}

fn rejection_response(rejection: AuthRejection) -> Response {
    let message = match rejection {
        AuthRejection::MissingToken => "Missing authentication token",
        AuthRejection::MalformedHeader => "Authorization header must be 'Bearer <token>'",
        AuthRejection::InvalidToken => "Invalid authentication token",
        AuthRejection::ExpiredToken => "Token has expired",
    };
    (
        StatusCode::UNAUTHORIZED,
        Json(ApiResponse::<()>::error(message)),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_bearer_token() {
        assert_eq!(bearer_token("Bearer abc.def"), Some("abc.def"));
        assert_eq!(bearer_token("Bearer "), None);
        assert_eq!(bearer_token("Basic dXNlcg=="), None);
    }
}
