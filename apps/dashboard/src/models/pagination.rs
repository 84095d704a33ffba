//! Server-computed pagination, consumed read-only
//!
//! The API reports totals; the client never recomputes them. The only logic
//! here is the page-button window: at most five page numbers centered on the
//! current page and clamped to the valid range.

use serde::Deserialize;

/// Pagination block attached to every list response
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub count: u32,
    pub limit: u32,
    pub page_no: u32,
    pub total_count: u32,
    pub total_pages: u32,
}

impl Pagination {
    /// Page numbers to render as buttons, centered on the current page
    pub fn page_window(&self) -> Vec<u32> {
        let current = i64::from(self.page_no);
        let total = i64::from(self.total_pages);

        (current - 2..=current + 2)
            .filter(|page| *page >= 1 && *page <= total)
            .map(|page| page as u32)
            .collect()
    }

    /// Whether a previous page exists
    pub fn has_prev(&self) -> bool {
        self.page_no > 1
    }

    /// Whether a next page exists
    pub fn has_next(&self) -> bool {
        self.page_no < self.total_pages
    }

    /// "Showing X to Y of Z results" label for the footer
    pub fn range_label(&self) -> String {
        let first = (self.page_no - 1) * self.limit + 1;
        let last = (self.page_no * self.limit).min(self.total_count);
        format!("Showing {} to {} of {} results", first, last, self.total_count)
    }
}
