/// Pagination query parameters (1-based page).
///
/// Both fields must be validated as `>= 1` by the transport layer before
/// they reach a domain service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationParams {
    pub page: u32,
    pub limit: u32,
}

impl PaginationParams {
    pub fn new(page: u32, limit: u32) -> Self {
        Self { page, limit }
    }

    pub fn window(&self) -> PageWindow {
        resolve(self.page, self.limit)
    }
}

/// Bounded `(skip, take)` window handed to list queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub skip: u64,
    pub take: u64,
}

/// Convert a `(page, limit)` pair into a `(skip, take)` window.
///
/// Assumes validated input (`page >= 1`, `limit >= 1`); no upper bound is
/// applied here, callers enforce their own maximum `limit`.
pub fn resolve(page: u32, limit: u32) -> PageWindow {
    let page = u64::from(page);
    let limit = u64::from(limit);
    PageWindow {
        skip: page.saturating_sub(1) * limit,
        take: limit,
    }
}

/// Paginated response wrapper
#[derive(Debug)]
pub struct PaginatedResult<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u32,
    pub limit: u32,
    pub total_pages: u64,
}

impl<T> PaginatedResult<T> {
    pub fn new(items: Vec<T>, total: u64, page: u32, limit: u32) -> Self {
        let total_pages = if limit == 0 {
            0
        } else {
            total.div_ceil(u64::from(limit))
        };
        Self {
            items,
            total,
            page,
            limit,
            total_pages,
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> PaginatedResult<U> {
        PaginatedResult {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            page: self.page,
            limit: self.limit,
            total_pages: self.total_pages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_page_starts_at_zero() {
        assert_eq!(resolve(1, 10), PageWindow { skip: 0, take: 10 });
    }

    #[test]
    fn window_matches_formula() {
        for page in 1..=20u32 {
            for limit in 1..=25u32 {
                let w = resolve(page, limit);
                assert_eq!(w.skip, u64::from((page - 1) * limit));
                assert_eq!(w.take, u64::from(limit));
            }
        }
    }

    #[test]
    fn large_values_do_not_overflow() {
        let w = resolve(u32::MAX, u32::MAX);
        assert_eq!(w.take, u64::from(u32::MAX));
        assert_eq!(w.skip, (u64::from(u32::MAX) - 1) * u64::from(u32::MAX));
    }

    #[test]
    fn total_pages_rounds_up() {
        let r: PaginatedResult<()> = PaginatedResult::new(vec![], 21, 1, 10);
        assert_eq!(r.total_pages, 3);

        let r: PaginatedResult<()> = PaginatedResult::new(vec![], 20, 1, 10);
        assert_eq!(r.total_pages, 2);

        let r: PaginatedResult<()> = PaginatedResult::new(vec![], 0, 1, 10);
        assert_eq!(r.total_pages, 0);
    }

    #[test]
    fn params_window_delegates_to_resolve() {
        let params = PaginationParams::new(3, 7);
        assert_eq!(params.window(), PageWindow { skip: 14, take: 7 });
    }
}
