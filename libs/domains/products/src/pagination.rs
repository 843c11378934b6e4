//! Page/limit to offset/limit translation.

pub const DEFAULT_PAGE: u64 = 1;
pub const DEFAULT_LIMIT: u64 = 10;

/// Postgres binds OFFSET and LIMIT as BIGINT.
pub const MAX_ROWS: u64 = i64::MAX as u64;

/// Offset and row count for one page of results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationParams {
    pub skip: u64,
    pub take: u64,
}

impl PaginationParams {
    /// `skip = (page - 1) * limit`, `take = limit`.
    ///
    /// Values that are absent or below 1 fall back to page 1 and limit 10.
    /// Both results are capped at [`MAX_ROWS`].
    ///
    /// ```
    /// use domain_products::PaginationParams;
    ///
    /// let params = PaginationParams::new(Some(2), Some(5));
    /// assert_eq!((params.skip, params.take), (5, 5));
    /// ```
    pub fn new(page: Option<u64>, limit: Option<u64>) -> Self {
        let page = page.filter(|page| *page >= 1).unwrap_or(DEFAULT_PAGE);
        let take = limit
            .filter(|limit| *limit >= 1)
            .unwrap_or(DEFAULT_LIMIT)
            .min(MAX_ROWS);

        Self {
            skip: (page - 1).saturating_mul(take).min(MAX_ROWS),
            take,
        }
    }
}

impl Default for PaginationParams {
    fn default() -> Self {
        Self::new(None, None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_page() {
        assert_eq!(
            PaginationParams::new(Some(2), Some(5)),
            PaginationParams { skip: 5, take: 5 }
        );
    }

    #[test]
    fn test_defaults() {
        assert_eq!(
            PaginationParams::default(),
            PaginationParams { skip: 0, take: 10 }
        );
        assert_eq!(PaginationParams::new(None, Some(20)).skip, 0);
    }

    #[test]
    fn test_out_of_range_values_fall_back() {
        assert_eq!(
            PaginationParams::new(Some(0), Some(0)),
            PaginationParams { skip: 0, take: 10 }
        );
    }

    #[test]
    fn test_huge_values_fit_in_bigint() {
        let params = PaginationParams::new(Some(u64::MAX), Some(u64::MAX));
        assert_eq!(params, PaginationParams { skip: MAX_ROWS, take: MAX_ROWS });

        let params = PaginationParams::new(Some(3), Some(u64::MAX));
        assert_eq!(params.skip, MAX_ROWS);
        assert!(i64::try_from(params.take).is_ok());
    }
}
