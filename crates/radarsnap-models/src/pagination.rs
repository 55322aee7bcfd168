//! Generic paginated list envelope.

use serde::{Deserialize, Serialize};

/// Paginated list response as produced by the backend's list endpoints.
///
/// `next` / `previous` carry fully-qualified URLs for the adjacent pages,
/// or `None` at either end of the result set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paginated<T> {
    /// Total number of records across all pages.
    pub count: u64,
    /// URL of the next page, if any.
    pub next: Option<String>,
    /// URL of the previous page, if any.
    pub previous: Option<String>,
    /// Records on this page.
    pub results: Vec<T>,
}

impl<T> Paginated<T> {
    /// A single-page envelope containing every record (used by the mock
    /// backend and by tests).
    pub fn single_page(results: Vec<T>) -> Self {
        Self {
            count: results.len() as u64,
            next: None,
            previous: None,
            results,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_page_counts_results() {
        let page = Paginated::single_page(vec!["a", "b", "c"]);
        assert_eq!(page.count, 3);
        assert!(page.next.is_none());
        assert!(page.previous.is_none());
    }

    #[test]
    fn paginated_roundtrip() {
        let json = r#"{"count":12,"next":"https://api.test/p?page=3","previous":null,"results":[1,2,3]}"#;
        let page: Paginated<u32> = serde_json::from_str(json).unwrap();
        assert_eq!(page.count, 12);
        assert_eq!(page.results, vec![1, 2, 3]);
        assert!(page.next.is_some());
    }
}
