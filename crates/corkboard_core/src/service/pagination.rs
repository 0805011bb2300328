//! Pagination window calculator.
//!
//! # Responsibility
//! - Compute the bounded, fixed-width slice of page indices shown around the
//!   current page.
//!
//! # Invariants
//! - The window never starts below page 0 and never runs past `total_pages`.
//! - All inputs produce a defined (possibly empty) result; there is no
//!   failure path.

const DEFAULT_BAR_LENGTH: u32 = 5;

/// Fixed-width pagination bar configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationBar {
    bar_length: u32,
}

impl Default for PaginationBar {
    fn default() -> Self {
        Self {
            bar_length: DEFAULT_BAR_LENGTH,
        }
    }
}

impl PaginationBar {
    /// Creates a bar with the given length. Zero falls back to the default.
    pub fn new(bar_length: u32) -> Self {
        if bar_length == 0 {
            Self::default()
        } else {
            Self { bar_length }
        }
    }

    /// Returns the page indices `[start, end)` shown around `current_page`.
    ///
    /// `start = max(current_page - bar_length / 2, 0)` and
    /// `end = min(start + bar_length, total_pages)`. An out-of-range
    /// `current_page` degrades to a truncated or empty window.
    pub fn window(&self, current_page: u32, total_pages: u32) -> Vec<u32> {
        let start = current_page.saturating_sub(self.bar_length / 2);
        let end = total_pages.min(start.saturating_add(self.bar_length));
        (start..end).collect()
    }

    /// Returns the configured bar length for display logic.
    pub fn bar_length(&self) -> u32 {
        self.bar_length
    }
}

/// Returns the number of pages needed for `total_items` at `page_size`.
///
/// `page_size` of zero is treated as one to keep the result defined.
pub fn total_pages(total_items: u64, page_size: u32) -> u32 {
    let size = u64::from(page_size.max(1));
    total_items.div_ceil(size) as u32
}
