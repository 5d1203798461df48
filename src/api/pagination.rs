use serde::Deserialize;
use utoipa::IntoParams;

const DEFAULT_PAGE_SIZE: i64 = 10;
const MAX_PAGE_SIZE: i64 = 100;

/// Page-number pagination used by all list endpoints.
#[derive(Debug, Default, Clone, Copy, Deserialize, IntoParams)]
pub struct PageParams {
    /// 1-based page number (default: 1)
    pub page: Option<i64>,
    /// Page size (default: 10, max: 100)
    pub limit: Option<i64>,
}

impl PageParams {
    /// Clamp raw parameters to (page, limit, offset).
    pub fn resolve(&self) -> (i64, i64, i64) {
        let page = self.page.unwrap_or(1).max(1);
        let limit = self.limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE);
        let offset = (page - 1) * limit;
        (page, limit, offset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let params = PageParams::default();
        assert_eq!(params.resolve(), (1, 10, 0));
    }

    #[test]
    fn test_offset_from_page() {
        let params = PageParams {
            page: Some(3),
            limit: Some(20),
        };
        assert_eq!(params.resolve(), (3, 20, 40));
    }

    #[test]
    fn test_clamps_out_of_range_values() {
        let params = PageParams {
            page: Some(0),
            limit: Some(100_000),
        };
        assert_eq!(params.resolve(), (1, 100, 0));

        let params = PageParams {
            page: Some(-2),
            limit: Some(0),
        };
        assert_eq!(params.resolve(), (1, 1, 0));
    }
}
