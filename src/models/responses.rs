//! Response types for the recipe API
//!
//! Defines the shape of the list endpoint's body and the page navigation
//! built on top of it.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Body of `GET /api/recipes`
///
/// Recipes are kept as opaque JSON. `total` and `totalPages` must be
/// non-negative integers; a body carrying `45.0`, `null` or a string there
/// is rejected rather than coerced. The cache keeps the raw body as sent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipePage {
    /// Recipes on this page
    pub recipes: Vec<Value>,
    /// Number of recipes across all pages
    pub total: u64,
    /// Number of pages at the requested limit
    pub total_pages: u64,
}

impl RecipePage {
    /// True when the page has nothing to show.
    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }

    /// Navigation state for this page when it was fetched as `page`.
    pub fn cursor(&self, page: u32) -> PageCursor {
        let total_pages = u32::try_from(self.total_pages).unwrap_or(u32::MAX);
        PageCursor::new(page, total_pages)
    }
}

/// Previous/next navigation over a paginated list.
///
/// The current page is always kept within `1..=total_pages` (or 1 when there
/// are no pages at all).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageCursor {
    page: u32,
    total_pages: u32,
}

impl PageCursor {
    pub fn new(page: u32, total_pages: u32) -> Self {
        Self {
            page: page.clamp(1, total_pages.max(1)),
            total_pages,
        }
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn total_pages(&self) -> u32 {
        self.total_pages
    }

    pub fn has_prev(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }

    /// Cursor one page back, or the same cursor on the first page.
    pub fn prev(self) -> Self {
        Self::new(self.page.saturating_sub(1), self.total_pages)
    }

    /// Cursor one page forward, or the same cursor on the last page.
    pub fn next(self) -> Self {
        Self::new(self.page.saturating_add(1), self.total_pages)
    }
}
