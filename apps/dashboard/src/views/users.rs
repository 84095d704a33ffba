//! Users page view
//!
//! One server page at a time, stale-while-revalidate: the cached page keeps
//! rendering while a refetch runs, and pagination controls are disabled
//! until it lands. The search box narrows only the loaded page.

use tracing::debug;

use crate::api::{ApiError, UsersPage};
use crate::models::{Pagination, UsageStats, UserCard, format_size};
use crate::views::PageRequest;

/// An issued detail fetch for a single user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailRequest {
    pub seq: u64,
    pub user_id: String,
}

/// Profile panel data for one user
#[derive(Debug, Clone)]
pub struct UserDetail {
    pub user: UserCard,
    pub stats: UsageStats,
}

/// Users list state
pub struct UsersView {
    page_size: u32,
    page_no: u32,
    search: String,
    users: Vec<UserCard>,
    pagination: Option<Pagination>,
    loading: bool,
    error: Option<String>,
    seq: u64,
    latest_seq: u64,
    detail: Option<UserDetail>,
    detail_loading: bool,
    latest_detail_seq: u64,
}

impl UsersView {
    /// Create an empty view with the configured page size
    pub fn new(page_size: u32) -> Self {
        Self {
            page_size,
            page_no: 1,
            search: String::new(),
            users: Vec::new(),
            pagination: None,
            loading: false,
            error: None,
            seq: 0,
            latest_seq: 0,
            detail: None,
            detail_loading: false,
            latest_detail_seq: 0,
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
        self.detail = None;
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
    pub fn complete(&mut self, seq: u64, result: Result<UsersPage, ApiError>) {
        if seq != self.latest_seq {
            debug!("Discarding stale users response (seq {})", seq);
            return;
        }
        self.loading = false;

        match result {
            Ok(page) => {
                self.page_no = page.pagination.page_no;
                self.pagination = Some(page.pagination);
                self.users = page.users.into_iter().map(UserCard::from).collect();
                self.error = None;
            }
            Err(e) => self.error = Some(e.to_string()),
        }
    }

    /// Request the profile panel for a user on the loaded page
    pub fn view_user(&mut self, user_id: &str) -> Option<DetailRequest> {
        if self.detail_loading {
            return None;
        }
        if !self.users.iter().any(|u| u.id == user_id) {
            return None;
        }

        self.seq += 1;
        self.latest_detail_seq = self.seq;
        self.detail_loading = true;

        Some(DetailRequest {
            seq: self.latest_detail_seq,
            user_id: user_id.to_string(),
        })
    }

    /// Apply a detail fetch completion
    pub fn complete_detail(&mut self, seq: u64, result: Result<UserDetail, ApiError>) {
        if seq != self.latest_detail_seq {
            debug!("Discarding stale user detail response (seq {})", seq);
            return;
        }
        self.detail_loading = false;

        match result {
            Ok(detail) => {
                self.detail = Some(detail);
                self.error = None;
            }
            Err(e) => self.error = Some(e.to_string()),
        }
    }

    /// The loaded page narrowed by the search term (case-insensitive)
    pub fn filtered(&self) -> Vec<&UserCard> {
        let needle = self.search.to_lowercase();
        self.users
            .iter()
            .filter(|user| needle.is_empty() || user.name.to_lowercase().contains(&needle))
            .collect()
    }

    /// Whether a page fetch is in flight
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Render the users surface
    pub fn render(&self) -> String {
        let mut out = String::new();
        out.push_str("== Users ==\n");

        match &self.pagination {
            Some(p) => out.push_str(&format!(
                "Manage and view all system users ({} total users)\n",
                p.total_count
            )),
            None => out.push_str("Manage and view all system users\n"),
        }
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
            out.push_str("No users found\n");
        }
        for user in &filtered {
            out.push_str(&format!(
                "[{}] {} <{}> | {} | {} | {} | joined {}\n",
                user.initials(),
                user.name,
                user.email,
                user.role,
                user.location,
                user.status,
                user.join_date,
            ));
        }

        if let Some(detail) = &self.detail {
            out.push('\n');
            out.push_str(&format!("-- {} --\n", detail.user.name));
            out.push_str(&format!("{}\n", detail.user.bio));
            out.push_str(&format!("Phone: {}\n", detail.user.phone));
            out.push_str(&format!(
                "Member since {}\n",
                detail.user.created_at.format("%Y-%m-%d")
            ));
            out.push_str(&format!(
                "Storage used: {} (actual {})\n",
                format_size(detail.stats.total_storage_used),
                format_size(detail.stats.actual_storage_used),
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

/// Render the shared pagination control line
pub(crate) fn render_pager(p: &Pagination, loading: bool) -> String {
    let mut out = String::new();

    let prev = if p.has_prev() && !loading { "<prev>" } else { "(prev)" };
    let next = if p.has_next() && !loading { "<next>" } else { "(next)" };

    out.push_str(prev);
    for page in p.page_window() {
        if page == p.page_no {
            out.push_str(&format!(" [{}]", page));
        } else {
            out.push_str(&format!(" {}", page));
        }
    }
    out.push(' ');
    out.push_str(next);
    out.push('\n');

    out
}
