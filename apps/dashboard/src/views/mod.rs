//! Page views
//!
//! Each view is a plain state machine: commands mutate it and may yield a
//! request for the shell to dispatch, completions feed results back in, and
//! `render` produces the current screen. Views never perform I/O themselves,
//! which is what makes the "no network call" contracts checkable.

pub mod files;
pub mod home;
pub mod login;
pub mod users;

/// One issued page fetch
///
/// The sequence number is monotonically increasing per view; a completion
/// carrying anything but the latest issued sequence is discarded, so a slow
/// response can never overwrite a newer page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub seq: u64,
    pub limit: u32,
    pub page_no: u32,
}
