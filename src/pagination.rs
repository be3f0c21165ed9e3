//! Pagination utilities for FOSSology API responses.

use reqwest::header::HeaderMap;
use serde::Serialize;

/// Response header carrying the total number of pages of a list endpoint.
pub const TOTAL_PAGES_HEADER: &str = "X-TOTAL-PAGES";

/// A page of results from the FOSSology API.
#[derive(Debug, Clone, Serialize)]
#[serde(bound = "T: Serialize")]
pub struct Page<T> {
    /// The items on this page.
    pub items: Vec<T>,
    /// Total number of pages, as reported by the server (if known).
    pub total_pages: Option<u32>,
    /// Current page number (1-indexed).
    pub page: u32,
    /// Number of items per page.
    pub count: u32,
    /// Whether there are more pages.
    pub has_more: bool,
}

impl<T> Page<T> {
    /// Create a new page from items and pagination info.
    #[must_use]
    pub fn new(items: Vec<T>, page: u32, count: u32, total_pages: Option<u32>) -> Self {
        let has_more = match total_pages {
            Some(t) => page < t,
            None => items.len() >= count as usize,
        };
        Self {
            items,
            total_pages,
            page,
            count,
            has_more,
        }
    }

    /// Map the items to a different type.
    #[must_use]
    pub fn map<U, F: FnMut(T) -> U>(self, f: F) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total_pages: self.total_pages,
            page: self.page,
            count: self.count,
            has_more: self.has_more,
        }
    }

    /// Returns true if this page has no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns the number of items on this page.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns an iterator over the items in this page.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }
}

impl<T> IntoIterator for Page<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a, T> IntoIterator for &'a Page<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

/// Read the total page count from list response headers.
pub(crate) fn total_pages(headers: &HeaderMap) -> Option<u32> {
    headers
        .get(TOTAL_PAGES_HEADER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::HeaderValue;

    #[test]
    fn test_page_has_more_with_total_pages() {
        let page: Page<i32> = Page::new(vec![1; 20], 1, 20, Some(3));
        assert!(page.has_more);

        let page: Page<i32> = Page::new(vec![1; 5], 3, 20, Some(3));
        assert!(!page.has_more);
    }

    #[test]
    fn test_page_has_more_without_total() {
        // Full page suggests more
        let page: Page<i32> = Page::new(vec![1; 20], 1, 20, None);
        assert!(page.has_more);

        // Partial page means no more
        let page: Page<i32> = Page::new(vec![1; 7], 1, 20, None);
        assert!(!page.has_more);
    }

    #[test]
    fn test_page_map() {
        let page = Page::new(vec![1, 2, 3], 1, 20, Some(1));
        let mapped = page.map(|x| x * 2);
        assert_eq!(mapped.items, vec![2, 4, 6]);
        assert_eq!(mapped.page, 1);
        assert_eq!(mapped.total_pages, Some(1));
    }

    #[test]
    fn test_total_pages_header() {
        let mut headers = HeaderMap::new();
        assert_eq!(total_pages(&headers), None);

        headers.insert(TOTAL_PAGES_HEADER, HeaderValue::from_static("4"));
        assert_eq!(total_pages(&headers), Some(4));

        headers.insert(TOTAL_PAGES_HEADER, HeaderValue::from_static("many"));
        assert_eq!(total_pages(&headers), None);
    }
}
