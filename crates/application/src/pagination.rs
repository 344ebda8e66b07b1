use serde::{Deserialize, Serialize};

/// Page size used when a filter does not carry one.
pub const DEFAULT_PAGE_LIMIT: u32 = 10;

/// One page of a filtered listing.
///
/// `total` is the size of the filtered set before slicing. `pages` is
/// `ceil(total / limit)`, so an empty set has zero pages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    /// Items on this page.
    #[serde(alias = "users", alias = "roles", alias = "permissions", alias = "logs")]
    pub items: Vec<T>,
    /// Filtered count before pagination.
    pub total: usize,
    /// 1-based page number.
    pub page: u32,
    /// Page size used for slicing.
    #[serde(default = "default_limit")]
    pub limit: u32,
    /// Number of pages for `total` at `limit`.
    pub pages: u32,
}

fn default_limit() -> u32 {
    DEFAULT_PAGE_LIMIT
}

/// Normalized 1-based page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    /// 1-based page number.
    pub page: u32,
    /// Page size, never zero.
    pub limit: u32,
}

impl PageRequest {
    /// Normalizes optional filter values. Missing or zero values fall back to
    /// page 1 and [`DEFAULT_PAGE_LIMIT`].
    #[must_use]
    pub fn new(page: Option<u32>, limit: Option<u32>) -> Self {
        Self {
            page: page.filter(|page| *page > 0).unwrap_or(1),
            limit: limit
                .filter(|limit| *limit > 0)
                .unwrap_or(DEFAULT_PAGE_LIMIT),
        }
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(None, None)
    }
}

/// Returns `ceil(total / limit)`; zero items yield zero pages.
#[must_use]
pub fn page_count(total: usize, limit: u32) -> u32 {
    let limit = usize::try_from(limit.max(1)).unwrap_or(usize::MAX);
    u32::try_from(total.div_ceil(limit)).unwrap_or(u32::MAX)
}

/// Slices an already filtered and ordered set into one page.
#[must_use]
pub fn paginate<T>(items: Vec<T>, request: PageRequest) -> Page<T> {
    let total = items.len();
    let limit = usize::try_from(request.limit).unwrap_or(usize::MAX);
    let start = usize::try_from(request.page.saturating_sub(1))
        .unwrap_or(usize::MAX)
        .saturating_mul(limit);

    let items = items.into_iter().skip(start).take(limit).collect();

    Page {
        items,
        total,
        page: request.page,
        limit: request.limit,
        pages: page_count(total, request.limit),
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::{DEFAULT_PAGE_LIMIT, PageRequest, page_count, paginate};

    #[test]
    fn request_defaults_missing_and_zero_values() {
        assert_eq!(
            PageRequest::new(None, None),
            PageRequest {
                page: 1,
                limit: DEFAULT_PAGE_LIMIT
            }
        );
        assert_eq!(
            PageRequest::new(Some(0), Some(0)),
            PageRequest {
                page: 1,
                limit: DEFAULT_PAGE_LIMIT
            }
        );
    }

    #[test]
    fn empty_set_has_zero_pages() {
        let page = paginate(Vec::<u8>::new(), PageRequest::default());
        assert_eq!(page.total, 0);
        assert_eq!(page.pages, 0);
        assert!(page.items.is_empty());
    }

    #[test]
    fn page_past_the_end_is_empty_but_keeps_totals() {
        let page = paginate((0..5).collect::<Vec<_>>(), PageRequest::new(Some(4), Some(2)));
        assert!(page.items.is_empty());
        assert_eq!(page.total, 5);
        assert_eq!(page.pages, 3);
        assert_eq!(page.page, 4);
    }

    #[test]
    fn deserializes_listing_specific_item_keys() {
        let page = serde_json::from_value::<super::Page<u8>>(serde_json::json!({
            "logs": [1, 2],
            "total": 12,
            "page": 1,
            "pages": 6
        }));
        assert!(page.is_ok());
        let page = page.unwrap_or_else(|_| unreachable!());
        assert_eq!(page.items, vec![1, 2]);
        assert_eq!(page.limit, DEFAULT_PAGE_LIMIT);
    }

    proptest! {
        #[test]
        fn page_count_is_ceiling(total in 0usize..500, limit in 1u32..50) {
            let limit_usize = usize::try_from(limit).unwrap_or(usize::MAX);
            let expected = total.div_ceil(limit_usize);
            prop_assert_eq!(usize::try_from(page_count(total, limit)).unwrap_or(usize::MAX), expected);
        }

        #[test]
        fn pages_concatenate_to_the_full_set(total in 0usize..120, limit in 1u32..25) {
            let items: Vec<usize> = (0..total).collect();
            let first = paginate(items.clone(), PageRequest::new(Some(1), Some(limit)));
            let mut rebuilt = Vec::new();
            for page in 1..=first.pages {
                let slice = paginate(items.clone(), PageRequest::new(Some(page), Some(limit)));
                prop_assert_eq!(slice.total, total);
                prop_assert_eq!(slice.pages, first.pages);
                rebuilt.extend(slice.items);
            }
            prop_assert_eq!(rebuilt, items);
        }
    }
}
