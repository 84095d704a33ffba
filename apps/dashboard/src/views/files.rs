//! Files page view
//!
//! Same page-at-a-time contract as the users view, filtering on filename.
//! Downloads request a short-lived URL on demand; a failed download is
//! logged, never surfaced as a blocking view error.

use tracing::debug;

use crate::api::{ApiError, FilesPage};
use crate::models::{FileCard, Pagination};
use crate::views::PageRequest;
use crate::views::users::render_pager;

/// An issued download for a file on the loaded page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadRequest {
    pub file_id: String,
}

/// Files list state
pub struct FilesView {
    page_size: u32,
    page_no: u32,
    search: String,
    files: Vec<FileCard>,
    pagination: Option<Pagination>,
    loading: bool,
    error: Option<String>,
    seq: u64,
    latest_seq: u64,
}

impl FilesView {
    /// Create an empty view with the configured page size
    pub fn new(page_size: u32) -> Self {
        Self {
            page_size,
            page_no: 1,
            search: String::new(),
            files: Vec::new(),
            pagination: None,
            loading: false,
            error: None,
            seq: 0,
            latest_seq: 0,
        }
    }

    fn issue(&mut self) -> PageRequest {
        self.seq += 1;
        self.latest_seq = self.seq;
        self.loading = true;

        PageRequest {
            seq: self.latest_seq,
            limit: self.page_size,
            page_no: self.page_no,
        }
    }

    /// Entering the page: render what is cached and revalidate in background
    pub fn open(&mut self) -> PageRequest {
        self.issue()
    }

    /// Manual refresh; ignored while a fetch is already in flight
    pub fn refresh(&mut self) -> Option<PageRequest> {
        if self.loading {
            return None;
        }
        Some(self.issue())
    }

    /// Move to the next page; `None` while loading or at the boundary
    pub fn next_page(&mut self) -> Option<PageRequest> {
        let pagination = self.pagination?;
        if self.loading || !pagination.has_next() {
            return None;
        }
        self.page_no += 1;
        Some(self.issue())
    }

    /// Move to the previous page; `None` while loading or at the boundary
    pub fn prev_page(&mut self) -> Option<PageRequest> {
        let pagination = self.pagination?;
        if self.loading || !pagination.has_prev() {
            return None;
        }
        self.page_no -= 1;
        Some(self.issue())
    }

    /// Jump to a page number; out-of-range targets are ignored
    pub fn goto(&mut self, page_no: u32) -> Option<PageRequest> {
        if self.loading || page_no == 0 {
            return None;
        }
        if let Some(pagination) = self.pagination {
            if page_no > pagination.total_pages || page_no == pagination.page_no {
                return None;
            }
        }
        self.page_no = page_no;
        Some(self.issue())
    }

    /// Update the search term; filtering is local, never a fetch
    pub fn set_search(&mut self, term: &str) {
        self.search = term.to_string();
    }

    /// Apply a page fetch completion, discarding anything stale
    pub fn complete(&mut self, seq: u64, result: Result<FilesPage, ApiError>) {
        if seq != self.latest_seq {
            debug!("Discarding stale files response (seq {})", seq);
            return;
        }
        self.loading = false;

        match result {
            Ok(page) => {
                self.page_no = page.pagination.page_no;
                self.pagination = Some(page.pagination);
                self.files = page.files.into_iter().map(FileCard::from).collect();
                self.error = None;
            }
            Err(e) => self.error = Some(e.to_string()),
        }
    }

    /// Request a download for a file on the loaded page
    pub fn download(&self, file_id: &str) -> Option<DownloadRequest> {
        if !self.files.iter().any(|f| f.id == file_id) {
            return None;
        }

        Some(DownloadRequest {
            file_id: file_id.to_string(),
        })
    }

    /// The loaded page narrowed by the search term (case-insensitive)
    pub fn filtered(&self) -> Vec<&FileCard> {
        let needle = self.search.to_lowercase();
        self.files
            .iter()
            .filter(|file| needle.is_empty() || file.filename.to_lowercase().contains(&needle))
            .collect()
    }

    /// Whether a page fetch is in flight
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Render the files surface
    pub fn render(&self) -> String {
        let mut out = String::new();
        out.push_str("== Files ==\n");
        out.push_str("Browse and download files\n");

        if self.loading {
            out.push_str("Refreshing...\n");
        }
        if let Some(error) = &self.error {
            out.push_str(&format!("[error] {}\n", error));
        }
        if !self.search.is_empty() {
            out.push_str(&format!("Filter: \"{}\"\n", self.search));
        }
        out.push('\n');

        let filtered = self.filtered();
        if filtered.is_empty() {
            if self.search.is_empty() {
                out.push_str("No files available\n");
            } else {
                out.push_str("No files found. Try adjusting your search terms\n");
            }
        }
        for file in &filtered {
            out.push_str(&format!(
                "{} | {} | {} | {} | {} downloads | owner {} | id {}\n",
                file.filename,
                file.category.to_string().to_uppercase(),
                file.size_label,
                file.upload_date.format("%Y-%m-%d"),
                file.download_count,
                file.owner_id,
                file.id,
            ));
        }

        if let Some(p) = &self.pagination {
            if p.total_pages > 1 {
                out.push('\n');
                out.push_str(&format!("{}\n", p.range_label()));
                out.push_str(&render_pager(p, self.loading));
            }
        }

        out
    }
}
