//! Response envelope, pagination query and error helpers shared by handlers

pub mod validated_json;

pub use validated_json::ValidatedJson;

use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::AuthorSummary;
use crate::shared::{validate_pagination, PaginatedResult, PaginationParams, PaginationPolicy};

/// Standard API response envelope.
///
/// Success: `{"success": true, "data": {...}}`,
/// failure: `{"success": false, "data": null, "error": "..."}`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

/// Error half of every handler's return type.
pub type ApiError = (StatusCode, Json<ApiResponse<()>>);

pub fn api_error(status: StatusCode, message: impl Into<String>) -> ApiError {
    (status, Json(ApiResponse::error(message)))
}

/// 500 without internal detail; the cause has already been logged.
pub fn internal_error() -> ApiError {
    api_error(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
}

/// Page of items plus paging metadata
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PaginatedResponse<T> {
    pub items: Vec<T>,
    /// Total number of items across all pages
    pub total: u64,
    pub page: u32,
    pub limit: u32,
    pub total_pages: u64,
}

impl<T> PaginatedResponse<T> {
    pub fn from_result<U>(result: PaginatedResult<U>, f: impl FnMut(U) -> T) -> Self {
        let result = result.map(f);
        Self {
            items: result.items,
            total: result.total,
            page: result.page,
            limit: result.limit,
            total_pages: result.total_pages,
        }
    }
}

/// `?page=&limit=` query. Values are checked against the configured
/// [`PaginationPolicy`] before any service call.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PageQuery {
    /// 1-based page number (default 1)
    pub page: Option<i64>,
    /// Page size (default and maximum come from configuration)
    pub limit: Option<i64>,
}

impl PageQuery {
    pub fn resolve(&self, policy: &PaginationPolicy) -> Result<PaginationParams, ApiError> {
        validate_pagination(self.page, self.limit, policy)
            .map_err(|e| api_error(StatusCode::BAD_REQUEST, e.to_string()))
    }
}

/// Body of a successful delete
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct Deleted {
    pub id: String,
}

/// Minimal user identity embedded in comments and likes
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AuthorDto {
    pub id: String,
    pub username: String,
}

impl From<AuthorSummary> for AuthorDto {
    fn from(a: AuthorSummary) -> Self {
        Self {
            id: a.id,
            username: a.username,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_query_defaults_and_bounds() {
        let policy = PaginationPolicy::default();

        let params = PageQuery::default().resolve(&policy).unwrap();
        assert_eq!(params, PaginationParams::new(1, 10));

        let (status, _) = PageQuery {
            page: Some(0),
            limit: None,
        }
        .resolve(&policy)
        .unwrap_err();
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, Json(body)) = PageQuery {
            page: None,
            limit: Some(101),
        }
        .resolve(&policy)
        .unwrap_err();
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body.error.as_deref(), Some("limit must not exceed 100"));
    }

    #[test]
    fn error_envelope_shape() {
        let json = serde_json::to_value(ApiResponse::<()>::error("boom")).unwrap();
        assert_eq!(json, serde_json::json!({"success": false, "data": null, "error": "boom"}));
    }
}
