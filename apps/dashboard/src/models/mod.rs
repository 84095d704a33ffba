//! View models and their display derivations

pub mod file;
pub mod pagination;
pub mod user;

pub use file::{ApiFile, DownloadInfo, FileCard, FileCategory, format_size};
pub use pagination::Pagination;
pub use user::{ApiUser, UsageStats, UserCard, UserStatus};
