//! Forgiving page slicing for poll listings.

use serde::Serialize;

/// Polls per page on the main listing.
pub const POLLS_PER_PAGE: usize = 6;

/// Polls per page on a user's own listing.
pub const USER_POLLS_PER_PAGE: usize = 7;

/// One page of a listing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    /// Items on this page.
    pub items: Vec<T>,

    /// 1-based page number.
    pub number: usize,

    /// Total number of pages, at least 1.
    pub num_pages: usize,

    /// Total number of items across all pages.
    pub count: usize,

    pub has_previous: bool,
    pub has_next: bool,
}

impl<T> Page<T> {
    /// Slice `items` into the requested page.
    ///
    /// Missing, non-numeric or sub-1 page numbers give the first page. A
    /// number past the end gives the last page. An empty list has a single
    /// empty page.
    pub fn of(items: Vec<T>, per_page: usize, page: Option<&str>) -> Self {
        let per_page = per_page.max(1);
        let count = items.len();
        let num_pages = count.div_ceil(per_page).max(1);

        let number = page
            .and_then(|p| p.trim().parse::<usize>().ok())
            .filter(|&n| n >= 1)
            .unwrap_or(1)
            .min(num_pages);

        let items = items
            .into_iter()
            .skip((number - 1) * per_page)
            .take(per_page)
            .collect();

        Self {
            items,
            number,
            num_pages,
            count,
            has_previous: number > 1,
            has_next: number < num_pages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numbers(n: usize) -> Vec<usize> {
        (1..=n).collect()
    }

    #[test]
    fn test_first_page_by_default() {
        let page = Page::of(numbers(13), 6, None);
        assert_eq!(page.items, vec![1, 2, 3, 4, 5, 6]);
        assert_eq!(page.number, 1);
        assert_eq!(page.num_pages, 3);
        assert!(!page.has_previous);
        assert!(page.has_next);
    }

    #[test]
    fn test_last_partial_page() {
        let page = Page::of(numbers(13), 6, Some("3"));
        assert_eq!(page.items, vec![13]);
        assert!(page.has_previous);
        assert!(!page.has_next);
    }

    #[test]
    fn test_invalid_numbers_give_first_page() {
        for raw in ["abc", "0", "-2", ""] {
            assert_eq!(Page::of(numbers(13), 6, Some(raw)).number, 1, "page {raw:?}");
        }
    }

    #[test]
    fn test_out_of_range_gives_last_page() {
        let page = Page::of(numbers(14), 7, Some("99"));
        assert_eq!(page.number, 2);
        assert_eq!(page.items, (8..=14).collect::<Vec<_>>());
    }

    #[test]
    fn test_empty_list() {
        let page: Page<usize> = Page::of(Vec::new(), 6, Some("4"));
        assert!(page.items.is_empty());
        assert_eq!(page.number, 1);
        assert_eq!(page.num_pages, 1);
        assert_eq!(page.count, 0);
    }
}
