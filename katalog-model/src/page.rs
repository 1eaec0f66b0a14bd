#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

pub const DEFAULT_PAGE: usize = 1;
pub const DEFAULT_LIMIT: usize = 10;
pub const MAX_LIMIT: usize = 50;

/// Normalized, 1-indexed page selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: usize,
    limit: usize,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl PageRequest {
    /// Clamp raw values: `page >= 1`, `limit` in `[1, MAX_LIMIT]`.
    /// Missing values take the defaults.
    pub fn new(page: Option<i64>, limit: Option<i64>) -> Self {
        let page = page
            .map(|p| p.max(1) as usize)
            .unwrap_or(DEFAULT_PAGE);
        let limit = limit
            .map(|l| l.clamp(1, MAX_LIMIT as i64) as usize)
            .unwrap_or(DEFAULT_LIMIT);
        Self { page, limit }
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Half-open index range of this page within `total` items.
    pub fn bounds(&self, total: usize) -> (usize, usize) {
        let start = (self.page - 1).saturating_mul(self.limit).min(total);
        let end = self.page.saturating_mul(self.limit).min(total);
        (start, end)
    }
}

/// One page of results plus the bookkeeping clients need to keep scrolling.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: usize,
    pub page: usize,
    pub limit: usize,
    pub has_more: bool,
}

impl<T> Page<T> {
    /// Slice `all` according to `request`. `all` must already be ordered.
    pub fn slice(mut all: Vec<T>, request: PageRequest) -> Self {
        let total = all.len();
        let (start, end) = request.bounds(total);
        all.truncate(end);
        let items = all.split_off(start);
        Self {
            items,
            total,
            page: request.page(),
            limit: request.limit(),
            has_more: request.page().saturating_mul(request.limit()) < total,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamps_out_of_range_values() {
        let request = PageRequest::new(Some(0), Some(500));
        assert_eq!(request.page(), 1);
        assert_eq!(request.limit(), MAX_LIMIT);

        let request = PageRequest::new(Some(-3), Some(0));
        assert_eq!(request.page(), 1);
        assert_eq!(request.limit(), 1);
    }

    #[test]
    fn defaults_apply_when_missing() {
        assert_eq!(PageRequest::new(None, None), PageRequest::default());
        assert_eq!(PageRequest::default().limit(), DEFAULT_LIMIT);
    }

    #[test]
    fn pages_cover_every_item_once() {
        let all: Vec<u32> = (0..23).collect();
        let mut seen = Vec::new();
        let mut page_no = 1;
        loop {
            let page =
                Page::slice(all.clone(), PageRequest::new(Some(page_no), Some(5)));
            assert_eq!(page.total, 23);
            assert_eq!(page.has_more, page_no * 5 < 23);
            seen.extend(page.items);
            if !page.has_more {
                break;
            }
            page_no += 1;
        }
        assert_eq!(page_no, 5);
        assert_eq!(seen, all);
    }

    #[test]
    fn page_past_the_end_is_empty() {
        let page = Page::slice(vec![1, 2, 3], PageRequest::new(Some(9), Some(2)));
        assert!(page.items.is_empty());
        assert_eq!(page.total, 3);
        assert!(!page.has_more);
    }
}
