use serde::{Deserialize, Serialize};

use super::base::{envelope_meta, ResponseMeta};
use crate::error::ValidationError;

fn yes() -> bool {
    true
}

/// Number of pages needed to show `total` items, `size` per page.
///
/// Returns `0` when `size` is `0`.
///
/// ```
/// use backend_kit::responses::page_count;
///
/// assert_eq!(page_count(47, 10), 5);
/// assert_eq!(page_count(0, 10), 0);
/// assert_eq!(page_count(10, 0), 0);
/// ```
pub fn page_count(total: u64, size: u64) -> u64 {
    if size == 0 {
        0
    } else {
        total.div_ceil(size)
    }
}

/// Offset pagination metadata.
///
/// `page` and `size` are at least `1`; `total` and `pages` may be `0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "PageInfoRepr")]
pub struct PageInfo {
    page: u64,
    size: u64,
    total: u64,
    pages: u64,
}

#[derive(Deserialize)]
struct PageInfoRepr {
    page: u64,
    size: u64,
    total: u64,
    pages: u64,
}

impl TryFrom<PageInfoRepr> for PageInfo {
    type Error = ValidationError;

    fn try_from(repr: PageInfoRepr) -> Result<Self, Self::Error> {
        Self::with_pages(repr.page, repr.size, repr.total, repr.pages)
    }
}

impl PageInfo {
    /// Builds page metadata, deriving `pages` from `total` and `size`.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] on `page` or `size` below `1`.
    pub fn new(page: u64, size: u64, total: u64) -> Result<Self, ValidationError> {
        Self::with_pages(page, size, total, page_count(total, size))
    }

    /// Builds page metadata with an explicit page count.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] on `page` or `size` below `1`.
    pub fn with_pages(page: u64, size: u64, total: u64, pages: u64) -> Result<Self, ValidationError> {
        if page < 1 {
            return Err(ValidationError::new("page", "must be at least 1"));
        }
        if size < 1 {
            return Err(ValidationError::new("size", "must be at least 1"));
        }
        Ok(Self {
            page,
            size,
            total,
            pages,
        })
    }

    /// Current page, 1-indexed.
    pub fn page(&self) -> u64 {
        self.page
    }

    /// Items per page.
    pub fn size(&self) -> u64 {
        self.size
    }

    /// Total items across all pages.
    pub fn total(&self) -> u64 {
        self.total
    }

    /// Total pages.
    pub fn pages(&self) -> u64 {
        self.pages
    }

    /// Returns `true` if a page follows this one.
    pub fn has_next(&self) -> bool {
        self.page < self.pages
    }

    /// Returns `true` if a page precedes this one.
    pub fn has_previous(&self) -> bool {
        self.page > 1
    }
}

/// Offset-paginated list envelope.
///
/// # Examples
///
/// ```
/// use backend_kit::responses::{PageInfo, PaginatedResponse};
///
/// let response = PaginatedResponse::new(vec!["a", "b"], PageInfo::new(1, 2, 5).unwrap());
/// assert_eq!(response.page_info().pages(), 3);
/// assert!(response.page_info().has_next());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaginatedResponse<T> {
    #[serde(default = "yes")]
    success: bool,
    items: Vec<T>,
    page_info: PageInfo,
    #[serde(flatten)]
    meta: ResponseMeta,
}

impl<T> PaginatedResponse<T> {
    /// Wraps one page of items.
    pub fn new(items: Vec<T>, page_info: PageInfo) -> Self {
        Self {
            success: true,
            items,
            page_info,
            meta: ResponseMeta::now(),
        }
    }

    /// Returns the outcome flag.
    pub fn success(&self) -> bool {
        self.success
    }

    /// Returns the items on this page, in order.
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Consumes the envelope and returns its items.
    pub fn into_items(self) -> Vec<T> {
        self.items
    }

    /// Returns the page metadata.
    pub fn page_info(&self) -> &PageInfo {
        &self.page_info
    }
}

envelope_meta!(PaginatedResponse<T>);

/// Cursor pagination metadata.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CursorInfo {
    cursor: String,
    has_next: bool,
    #[serde(default)]
    has_previous: bool,
    count: usize,
}

impl CursorInfo {
    /// Builds cursor metadata.
    pub fn new(cursor: impl Into<String>, has_next: bool, has_previous: bool, count: usize) -> Self {
        Self {
            cursor: cursor.into(),
            has_next,
            has_previous,
            count,
        }
    }

    /// Opaque position token.
    pub fn cursor(&self) -> &str {
        &self.cursor
    }

    /// Whether items exist after the cursor.
    pub fn has_next(&self) -> bool {
        self.has_next
    }

    /// Whether items exist before the cursor.
    pub fn has_previous(&self) -> bool {
        self.has_previous
    }

    /// Number of items in the page.
    pub fn count(&self) -> usize {
        self.count
    }
}

/// Cursor-paginated list envelope.
///
/// `cursor_info.count` always equals the number of items: it is derived at
/// construction and checked on deserialization.
///
/// ```
/// use backend_kit::responses::CursorPaginatedResponse;
///
/// let response = CursorPaginatedResponse::new(vec![1, 2], "c", true, false);
/// assert_eq!(response.cursor_info().count(), 2);
///
/// let tampered = r#"{"items": [1], "cursor_info": {"cursor": "c", "has_next": false, "count": 3}}"#;
/// assert!(serde_json::from_str::<CursorPaginatedResponse<u8>>(tampered).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    try_from = "CursorPaginatedRepr<T>",
    bound(deserialize = "T: Deserialize<'de>")
)]
pub struct CursorPaginatedResponse<T> {
    success: bool,
    items: Vec<T>,
    cursor_info: CursorInfo,
    #[serde(flatten)]
    meta: ResponseMeta,
}

#[derive(Deserialize)]
struct CursorPaginatedRepr<T> {
    #[serde(default = "yes")]
    success: bool,
    items: Vec<T>,
    cursor_info: CursorInfo,
    #[serde(flatten)]
    meta: ResponseMeta,
}

impl<T> TryFrom<CursorPaginatedRepr<T>> for CursorPaginatedResponse<T> {
    type Error = ValidationError;

    fn try_from(repr: CursorPaginatedRepr<T>) -> Result<Self, Self::Error> {
        if repr.cursor_info.count != repr.items.len() {
            return Err(ValidationError::new(
                "cursor_info.count",
                format!(
                    "is {} but the page holds {} items",
                    repr.cursor_info.count,
                    repr.items.len()
                ),
            ));
        }
        Ok(Self {
            success: repr.success,
            items: repr.items,
            cursor_info: repr.cursor_info,
            meta: repr.meta,
        })
    }
}

impl<T> CursorPaginatedResponse<T> {
    /// Wraps one cursor page; the count is taken from `items`.
    pub fn new(items: Vec<T>, cursor: impl Into<String>, has_next: bool, has_previous: bool) -> Self {
        let cursor_info = CursorInfo::new(cursor, has_next, has_previous, items.len());
        Self {
            success: true,
            items,
            cursor_info,
            meta: ResponseMeta::now(),
        }
    }

    /// Returns the outcome flag.
    pub fn success(&self) -> bool {
        self.success
    }

    /// Returns the items, in order.
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Consumes the envelope and returns its items.
    pub fn into_items(self) -> Vec<T> {
        self.items
    }

    /// Returns the cursor metadata.
    pub fn cursor_info(&self) -> &CursorInfo {
        &self.cursor_info
    }
}

envelope_meta!(CursorPaginatedResponse<T>);
