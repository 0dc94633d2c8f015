//! Page-number pagination over ordered result sets.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Posts shown per listing page.
pub const POSTS_PER_PAGE: u64 = 10;

/// What to do with a page number outside `1..=total_pages`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Overflow {
    /// The page does not exist.
    Reject,
    /// Serve the last page instead.
    Clamp,
}

/// The page a client asked for, as given in the query string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageNumber {
    /// 1-based page number.
    Number(u64),
    /// The literal `last`.
    Last,
    /// Anything that is neither a number nor `last`.
    Invalid,
}

impl PageNumber {
    /// Parse a `page` query value. An absent value means the first page.
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            None => Self::Number(1),
            Some("last") => Self::Last,
            Some(value) => value.parse().map_or(Self::Invalid, Self::Number),
        }
    }
}

impl Default for PageNumber {
    fn default() -> Self {
        Self::Number(1)
    }
}

impl fmt::Display for PageNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Last => f.write_str("last"),
            Self::Invalid => f.write_str("invalid"),
        }
    }
}

/// A requested page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub number: PageNumber,
    pub size: u64,
    pub overflow: Overflow,
}

/// The slice of the result set a resolved page covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub number: u64,
    pub offset: u64,
    pub limit: u64,
    pub total_pages: u64,
}

impl PageRequest {
    /// Out-of-range and non-numeric pages are rejected.
    pub fn strict(number: PageNumber) -> Self {
        Self {
            number,
            size: POSTS_PER_PAGE,
            overflow: Overflow::Reject,
        }
    }

    /// Out-of-range pages fall back to the last page, non-numeric ones to
    /// the first.
    pub fn lenient(number: PageNumber) -> Self {
        Self {
            number,
            size: POSTS_PER_PAGE,
            overflow: Overflow::Clamp,
        }
    }

    pub fn with_size(mut self, size: u64) -> Self {
        self.size = size;
        self
    }

    /// Map this request onto a result set of `total` items.
    ///
    /// An empty result set still has one (empty) page.
    pub fn resolve(&self, total: u64) -> Option<PageWindow> {
        let size = self.size.max(1);
        let total_pages = total.div_ceil(size).max(1);

        let number = match (self.number, self.overflow) {
            (PageNumber::Number(n), _) if (1..=total_pages).contains(&n) => n,
            (PageNumber::Last, _) => total_pages,
            (_, Overflow::Reject) => return None,
            (PageNumber::Invalid, Overflow::Clamp) => 1,
            (PageNumber::Number(_), Overflow::Clamp) => total_pages,
        };

        Some(PageWindow {
            number,
            offset: (number - 1) * size,
            limit: size,
            total_pages,
        })
    }
}

/// One page of results plus enough metadata to navigate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub number: u64,
    pub size: u64,
    pub total_items: u64,
    pub total_pages: u64,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, window: PageWindow, total_items: u64) -> Self {
        Self {
            items,
            number: window.number,
            size: window.limit,
            total_items,
            total_pages: window.total_pages,
        }
    }

    pub fn has_next(&self) -> bool {
        self.number < self.total_pages
    }

    pub fn has_previous(&self) -> bool {
        self.number > 1
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            number: self.number,
            size: self.size,
            total_items: self.total_items,
            total_pages: self.total_pages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strict(n: u64) -> PageRequest {
        PageRequest::strict(PageNumber::Number(n))
    }

    fn lenient(n: u64) -> PageRequest {
        PageRequest::lenient(PageNumber::Number(n))
    }

    #[test]
    fn test_twenty_five_items_make_three_pages() {
        let sizes: Vec<u64> = (1..=3)
            .map(|n| {
                let w = strict(n).resolve(25).unwrap();
                assert_eq!(w.total_pages, 3);
                w.limit.min(25 - w.offset)
            })
            .collect();

        assert_eq!(sizes, vec![10, 10, 5]);
        assert!(strict(4).resolve(25).is_none());
    }

    #[test]
    fn test_empty_result_has_one_page() {
        let w = strict(1).resolve(0).unwrap();
        assert_eq!(w.number, 1);
        assert_eq!(w.offset, 0);
        assert_eq!(w.total_pages, 1);

        assert!(strict(2).resolve(0).is_none());
    }

    #[test]
    fn test_strict_rejects_page_zero() {
        assert!(strict(0).resolve(5).is_none());
    }

    #[test]
    fn test_lenient_clamps_to_last_page() {
        let w = lenient(9).resolve(25).unwrap();
        assert_eq!(w.number, 3);
        assert_eq!(w.offset, 20);

        let w = lenient(0).resolve(25).unwrap();
        assert_eq!(w.number, 3);
    }

    #[test]
    fn test_page_navigation_flags() {
        let w = strict(2).resolve(25).unwrap();
        let page = Page::new(vec![1, 2, 3], w, 25);

        assert!(page.has_next());
        assert!(page.has_previous());

        let doubled = page.map(|n| n * 2);
        assert_eq!(doubled.items, vec![2, 4, 6]);
        assert_eq!(doubled.number, 2);
    }

    #[test]
    fn test_parse_page_number() {
        assert_eq!(PageNumber::parse(None), PageNumber::Number(1));
        assert_eq!(PageNumber::parse(Some("3")), PageNumber::Number(3));
        assert_eq!(PageNumber::parse(Some("last")), PageNumber::Last);
        assert_eq!(PageNumber::parse(Some("two")), PageNumber::Invalid);
        assert_eq!(PageNumber::parse(Some("-1")), PageNumber::Invalid);
    }

    #[test]
    fn test_last_page_resolves_in_both_modes() {
        let w = PageRequest::strict(PageNumber::Last).resolve(25).unwrap();
        assert_eq!(w.number, 3);

        let w = PageRequest::lenient(PageNumber::Last).resolve(0).unwrap();
        assert_eq!(w.number, 1);
    }

    #[test]
    fn test_non_numeric_page() {
        assert!(PageRequest::strict(PageNumber::Invalid).resolve(25).is_none());

        let w = PageRequest::lenient(PageNumber::Invalid).resolve(25).unwrap();
        assert_eq!(w.number, 1);
        assert_eq!(w.offset, 0);
    }
}
