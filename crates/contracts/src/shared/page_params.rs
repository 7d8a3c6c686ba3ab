//! `page` / `limit` query parameters.
//!
//! Both are read the way a browser `parseInt(x, 10)` would: leading
//! whitespace is skipped and the leading run of digits is used ("3abc" → 3).
//! Missing, non-numeric or out-of-range input falls back to the defaults.

use serde::{Deserialize, Serialize};

pub const DEFAULT_PAGE: u64 = 1;
pub const DEFAULT_PAGE_SIZE: u64 = 30;
pub const MAX_PAGE_SIZE: u64 = 500;

/// Pagination as seen at the HTTP boundary: `page` is 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageParams {
    pub page: u64,
    pub limit: u64,
}

impl Default for PageParams {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_PAGE_SIZE,
        }
    }
}

impl PageParams {
    pub fn parse(page: Option<&str>, limit: Option<&str>) -> Self {
        Self::parse_with(page, limit, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE)
    }

    /// Same as [`PageParams::parse`] with a server-configured default and cap.
    pub fn parse_with(
        page: Option<&str>,
        limit: Option<&str>,
        default_limit: u64,
        max_limit: u64,
    ) -> Self {
        let max_limit = max_limit.max(1);
        let page = page
            .and_then(parse_leading_int)
            .filter(|p| *p >= 1)
            .map(|p| p as u64)
            .unwrap_or(DEFAULT_PAGE);
        let limit = limit
            .and_then(parse_leading_int)
            .filter(|l| *l >= 1)
            .map(|l| l as u64)
            .unwrap_or(default_limit)
            .clamp(1, max_limit);
        Self { page, limit }
    }

    /// Zero-based page index used by client state.
    pub fn page_index(&self) -> u64 {
        self.page.saturating_sub(1)
    }

    pub fn offset(&self) -> u64 {
        self.page_index().saturating_mul(self.limit)
    }
}

/// `ceil(count / page_size)`; a zero page size yields zero pages.
pub fn page_count(count: u64, page_size: u64) -> u64 {
    if page_size == 0 {
        0
    } else {
        count.div_ceil(page_size)
    }
}

fn parse_leading_int(raw: &str) -> Option<i64> {
    let s = raw.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }
    // Overflow is treated like garbage input
    let value: i64 = digits[..end].parse().ok()?;
    Some(if negative { -value } else { value })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_when_missing() {
        assert_eq!(PageParams::parse(None, None), PageParams::default());
        assert_eq!(PageParams::default(), PageParams { page: 1, limit: 30 });
    }

    #[test]
    fn test_non_numeric_defaults() {
        let params = PageParams::parse(Some("abc"), Some(""));
        assert_eq!(params, PageParams { page: 1, limit: 30 });
    }

    #[test]
    fn test_out_of_range_defaults() {
        assert_eq!(PageParams::parse(Some("0"), Some("-5")), PageParams::default());
        assert_eq!(PageParams::parse(Some("-2"), Some("0")), PageParams::default());
    }

    #[test]
    fn test_leading_digits_are_used() {
        let params = PageParams::parse(Some(" 3abc"), Some("10.5"));
        assert_eq!(params, PageParams { page: 3, limit: 10 });
    }

    #[test]
    fn test_limit_is_capped() {
        let params = PageParams::parse(Some("2"), Some("100000"));
        assert_eq!(params.limit, MAX_PAGE_SIZE);
    }

    #[test]
    fn test_parse_with_server_limits() {
        let params = PageParams::parse_with(None, None, 50, 200);
        assert_eq!(params, PageParams { page: 1, limit: 50 });
        let params = PageParams::parse_with(Some("2"), Some("1000"), 50, 200);
        assert_eq!(params, PageParams { page: 2, limit: 200 });
    }

    #[test]
    fn test_index_and_offset() {
        let params = PageParams { page: 3, limit: 10 };
        assert_eq!(params.page_index(), 2);
        assert_eq!(params.offset(), 20);
    }

    #[test]
    fn test_page_count() {
        assert_eq!(page_count(25, 10), 3);
        assert_eq!(page_count(30, 10), 3);
        assert_eq!(page_count(0, 10), 0);
        assert_eq!(page_count(5, 0), 0);
    }
}
