//! Pagination stage.
//!
//! [`paginate`] slices an ordered sequence into fixed-size pages. It never
//! fails and never indexes out of bounds: a page past the end (or page 0)
//! comes back empty, and an empty input still reports one page.

use serde::{Deserialize, Serialize};

use crate::error::{Result, SearchError};

/// Page size used when none is configured.
pub const DEFAULT_PAGE_SIZE: usize = 25;

/// Which page to return and how large pages are.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageRequest {
    page_size: usize,
    page_number: usize,
}

impl PageRequest {
    /// Creates a page request. `page_number` is 1-based.
    ///
    /// Returns [`SearchError::InvalidPageSize`] when `page_size` is zero.
    pub fn new(page_size: usize, page_number: usize) -> Result<Self> {
        if page_size == 0 {
            return Err(SearchError::InvalidPageSize);
        }
        Ok(PageRequest {
            page_size,
            page_number,
        })
    }

    /// First page with the given size.
    pub fn first(page_size: usize) -> Result<Self> {
        PageRequest::new(page_size, 1)
    }

    /// Same page size, different page number.
    pub fn with_page(self, page_number: usize) -> Self {
        PageRequest {
            page_number,
            ..self
        }
    }

    /// Number of items per page.
    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// 1-based page number.
    pub fn page_number(&self) -> usize {
        self.page_number
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        PageRequest {
            page_size: DEFAULT_PAGE_SIZE,
            page_number: 1,
        }
    }
}

impl<'de> Deserialize<'de> for PageRequest {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(rename_all = "camelCase")]
        struct Raw {
            #[serde(default = "default_page_size")]
            page_size: usize,
            #[serde(default = "first_page")]
            page_number: usize,
        }

        fn default_page_size() -> usize {
            DEFAULT_PAGE_SIZE
        }

        fn first_page() -> usize {
            1
        }

        let raw = Raw::deserialize(deserializer)?;
        PageRequest::new(raw.page_size, raw.page_number).map_err(serde::de::Error::custom)
    }
}

/// One page of results plus navigation metadata.
///
/// Serializes in camelCase with the navigation flags (`hasNext`,
/// `hasPrevious`, `isFirstPage`, `isLastPage`) alongside the fields.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    /// Items on this page, in order.
    pub items: Vec<T>,
    /// Number of items across all pages.
    pub total_items: usize,
    /// Number of pages; at least 1.
    pub total_pages: usize,
    /// The requested 1-based page number.
    pub page_number: usize,
    /// The page size used.
    pub page_size: usize,
}

impl<T> Page<T> {
    /// Returns `true` if a later page exists.
    pub fn has_next(&self) -> bool {
        self.page_number < self.total_pages
    }

    /// Returns `true` if an earlier page exists.
    pub fn has_previous(&self) -> bool {
        self.page_number > 1
    }

    /// Returns `true` on page 1.
    pub fn is_first_page(&self) -> bool {
        self.page_number == 1
    }

    /// Returns `true` on the final page.
    pub fn is_last_page(&self) -> bool {
        self.page_number == self.total_pages
    }

    /// Maps every item, keeping the metadata.
    pub fn map<U, F>(self, f: F) -> Page<U>
    where
        F: FnMut(T) -> U,
    {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total_items: self.total_items,
            total_pages: self.total_pages,
            page_number: self.page_number,
            page_size: self.page_size,
        }
    }
}

impl<T: Serialize> Serialize for Page<T> {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeStruct;

        let mut state = serializer.serialize_struct("Page", 9)?;
        state.serialize_field("items", &self.items)?;
        state.serialize_field("totalItems", &self.total_items)?;
        state.serialize_field("totalPages", &self.total_pages)?;
        state.serialize_field("pageNumber", &self.page_number)?;
        state.serialize_field("pageSize", &self.page_size)?;
        state.serialize_field("hasNext", &self.has_next())?;
        state.serialize_field("hasPrevious", &self.has_previous())?;
        state.serialize_field("isFirstPage", &self.is_first_page())?;
        state.serialize_field("isLastPage", &self.is_last_page())?;
        state.end()
    }
}

/// Cuts one page out of an ordered sequence.
///
/// ```
/// use a1_search::{paginate, PageRequest};
///
/// let page = paginate(vec!["LeBron James", "Stephen Curry"], PageRequest::new(1, 2).unwrap());
/// assert_eq!(page.items, vec!["Stephen Curry"]);
/// assert_eq!(page.total_pages, 2);
/// ```
pub fn paginate<T>(items: Vec<T>, request: PageRequest) -> Page<T> {
    let total_items = items.len();
    let total_pages = total_items.div_ceil(request.page_size).max(1);

    let page_items = match request.page_number.checked_sub(1) {
        Some(index) => {
            let start = index.saturating_mul(request.page_size);
            items
                .into_iter()
                .skip(start)
                .take(request.page_size)
                .collect()
        }
        None => Vec::new(),
    };

    Page {
        items: page_items,
        total_items,
        total_pages,
        page_number: request.page_number,
        page_size: request.page_size,
    }
}
