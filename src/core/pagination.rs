//! Page slicing and pagination metadata

use serde::Serialize;

/// Rows per page used by the employee and shift tables
pub const DEFAULT_PAGE_SIZE: usize = 8;

/// Return the items on a 1-based `page` of `size` items.
///
/// Out-of-range pages yield an empty slice rather than an error. Page 0 is
/// treated as page 1.
pub fn paginate<T>(items: &[T], page: usize, size: usize) -> &[T] {
    let size = size.max(1);
    let start = page.max(1).saturating_sub(1).saturating_mul(size);
    if start >= items.len() {
        return &[];
    }
    let end = start.saturating_add(size).min(items.len());
    &items[start..end]
}

/// Number of pages needed for `total` items
pub fn total_pages(total: usize, size: usize) -> usize {
    if total == 0 { 0 } else { total.div_ceil(size.max(1)) }
}

/// Pagination metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaginationMeta {
    /// Current page number (starts at 1)
    pub page: usize,

    /// Number of items per page
    pub limit: usize,

    /// Total number of items (after filters)
    pub total: usize,

    /// Total number of pages
    pub total_pages: usize,

    /// Whether there is a next page
    pub has_next: bool,

    /// Whether there is a previous page
    pub has_prev: bool,
}

impl PaginationMeta {
    /// Create pagination metadata from calculation
    pub fn new(page: usize, limit: usize, total: usize) -> Self {
        // Ensure limit is at least 1 to avoid division by zero
        let limit = limit.max(1);
        let page = page.max(1);
        let start = (page - 1) * limit;

        Self {
            page,
            limit,
            total,
            total_pages: total_pages(total, limit),
            has_next: start + limit < total,
            has_prev: page > 1,
        }
    }

    /// The page selector is only shown when there is more than one page
    pub fn should_render(&self) -> bool {
        self.total_pages > 1
    }

    /// 1-based index of the first row shown, 0 when the page is empty
    pub fn first_item(&self) -> usize {
        let start = (self.page - 1) * self.limit;
        if start >= self.total { 0 } else { start + 1 }
    }

    /// 1-based index of the last row shown, 0 when the page is empty
    pub fn last_item(&self) -> usize {
        if self.first_item() == 0 {
            0
        } else {
            (self.page * self.limit).min(self.total)
        }
    }

    /// Page numbers for the selector buttons
    pub fn page_numbers(&self) -> std::ops::RangeInclusive<usize> {
        1..=self.total_pages
    }

    /// "Showing 9 to 16 of 20 employees"
    pub fn showing_label(&self, plural_noun: &str) -> String {
        format!(
            "Showing {} to {} of {} {}",
            self.first_item(),
            self.last_item(),
            self.total,
            plural_noun
        )
    }
}
