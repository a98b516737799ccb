//! Request-level validation helpers shared by the HTTP handlers.

use thiserror::Error;

use crate::shared::types::PaginationParams;

/// Bounds applied to `page`/`limit` query parameters.
#[derive(Debug, Clone, Copy)]
pub struct PaginationPolicy {
    pub default_limit: u32,
    pub max_limit: u32,
}

impl Default for PaginationPolicy {
    fn default() -> Self {
        Self {
            default_limit: 10,
            max_limit: 100,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PaginationError {
    #[error("page must be a positive integer")]
    InvalidPage,
    #[error("limit must be a positive integer")]
    InvalidLimit,
    #[error("limit must not exceed {0}")]
    LimitTooLarge(u32),
}

/// Validate raw `page`/`limit` values before any domain call.
///
/// Missing values fall back to page 1 and the policy's default limit.
pub fn validate_pagination(
    page: Option<i64>,
    limit: Option<i64>,
    policy: &PaginationPolicy,
) -> Result<PaginationParams, PaginationError> {
    let page = page.unwrap_or(1);
    let limit = limit.unwrap_or(i64::from(policy.default_limit));

    if page < 1 || page > i64::from(u32::MAX) {
        return Err(PaginationError::InvalidPage);
    }
    if limit < 1 {
        return Err(PaginationError::InvalidLimit);
    }
    if limit > i64::from(policy.max_limit) {
        return Err(PaginationError::LimitTooLarge(policy.max_limit));
    }

    Ok(PaginationParams::new(page as u32, limit as u32))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_when_missing() {
        let p = validate_pagination(None, None, &PaginationPolicy::default()).unwrap();
        assert_eq!(p, PaginationParams::new(1, 10));
    }

    #[test]
    fn rejects_non_positive_values() {
        let policy = PaginationPolicy::default();
        assert_eq!(
            validate_pagination(Some(0), Some(10), &policy),
            Err(PaginationError::InvalidPage)
        );
        assert_eq!(
            validate_pagination(Some(1), Some(0), &policy),
            Err(PaginationError::InvalidLimit)
        );
        assert_eq!(
            validate_pagination(Some(-3), None, &policy),
            Err(PaginationError::InvalidPage)
        );
    }

    #[test]
    fn enforces_max_limit() {
        let policy = PaginationPolicy {
            default_limit: 10,
            max_limit: 50,
        };
        assert_eq!(
            validate_pagination(Some(1), Some(51), &policy),
            Err(PaginationError::LimitTooLarge(50))
        );
        assert!(validate_pagination(Some(1), Some(50), &policy).is_ok());
    }
}
