//! File model and display derivations
//!
//! Size formatting and the MIME-to-category mapping are pure functions of
//! the fetched record; unmapped MIME types fall back to the document bucket.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::Deserialize;

/// File record as served by the remote query API
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiFile {
    pub id: String,
    #[serde(rename = "ownerID")]
    pub owner_id: String,
    pub filename: String,
    pub mime_type: String,
    pub size: u64,
    pub upload_date: DateTime<Utc>,
    pub download_count: u64,
}

/// Coarse file type bucket derived from the MIME type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileCategory {
    Image,
    Video,
    Pdf,
    Archive,
    Document,
    Spreadsheet,
    Text,
}

impl FileCategory {
    /// Map a MIME type onto a category; unknown types become documents
    pub fn from_mime(mime_type: &str) -> Self {
        let mime = mime_type.to_ascii_lowercase();

        if mime.starts_with("image/") {
            FileCategory::Image
        } else if mime.starts_with("video/") {
            FileCategory::Video
        } else if mime.contains("pdf") {
            FileCategory::Pdf
        } else if mime.contains("zip") || mime.contains("rar") || mime.contains("tar") {
            FileCategory::Archive
        } else if mime.contains("word") || mime.contains("document") {
            FileCategory::Document
        } else if mime.contains("sheet") || mime.contains("excel") {
            FileCategory::Spreadsheet
        } else if mime.starts_with("text/") {
            FileCategory::Text
        } else {
            FileCategory::Document
        }
    }
}

impl fmt::Display for FileCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            FileCategory::Image => "image",
            FileCategory::Video => "video",
            FileCategory::Pdf => "pdf",
            FileCategory::Archive => "archive",
            FileCategory::Document => "document",
            FileCategory::Spreadsheet => "spreadsheet",
            FileCategory::Text => "text",
        };
        write!(f, "{}", label)
    }
}

/// Format a byte count using base-1024 units with one decimal
pub fn format_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["KB", "MB", "GB", "TB"];

    if bytes < 1024 {
        return format!("{} B", bytes);
    }

    let mut value = bytes as f64 / 1024.0;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    let rounded = (value * 10.0).round() / 10.0;
    if rounded.fract() == 0.0 {
        format!("{} {}", rounded as u64, UNITS[unit])
    } else {
        format!("{:.1} {}", rounded, UNITS[unit])
    }
}

/// File view model with display-ready fields
#[derive(Debug, Clone)]
pub struct FileCard {
    pub id: String,
    pub owner_id: String,
    pub filename: String,
    pub category: FileCategory,
    pub size_label: String,
    pub upload_date: DateTime<Utc>,
    pub download_count: u64,
}

impl From<ApiFile> for FileCard {
    fn from(file: ApiFile) -> Self {
        FileCard {
            category: FileCategory::from_mime(&file.mime_type),
            size_label: format_size(file.size),
            id: file.id,
            owner_id: file.owner_id,
            filename: file.filename,
            upload_date: file.upload_date,
            download_count: file.download_count,
        }
    }
}

/// Short-lived download handle returned by the API
#[derive(Debug, Clone, Deserialize)]
pub struct DownloadInfo {
    pub url: String,
    pub filename: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mime_categories() {
        assert_eq!(FileCategory::from_mime("image/png"), FileCategory::Image);
        assert_eq!(FileCategory::from_mime("video/mp4"), FileCategory::Video);
        assert_eq!(FileCategory::from_mime("application/pdf"), FileCategory::Pdf);
        assert_eq!(
            FileCategory::from_mime("application/zip"),
            FileCategory::Archive
        );
        assert_eq!(
            FileCategory::from_mime("application/x-tar"),
            FileCategory::Archive
        );
        assert_eq!(
            FileCategory::from_mime("application/msword"),
            FileCategory::Document
        );
        assert_eq!(
            FileCategory::from_mime("application/vnd.ms-excel"),
            FileCategory::Spreadsheet
        );
        assert_eq!(FileCategory::from_mime("text/plain"), FileCategory::Text);
    }

    #[test]
    fn test_unknown_mime_falls_back_to_document() {
        assert_eq!(
            FileCategory::from_mime("application/octet-stream"),
            FileCategory::Document
        );
        assert_eq!(FileCategory::from_mime(""), FileCategory::Document);
    }

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(0), "0 B");
        assert_eq!(format_size(512), "512 B");
        assert_eq!(format_size(1536), "1.5 KB");
        assert_eq!(format_size(876_544), "856 KB");
        assert_eq!(format_size(2_516_582), "2.4 MB");
        assert_eq!(format_size(1_073_741_824), "1 GB");
    }

    #[test]
    fn test_card_derivations() {
        let file: ApiFile = serde_json::from_str(
            r#"{
                "id": "f-1",
                "ownerID": "u-1",
                "filename": "Logo_Final.png",
                "mimeType": "image/png",
                "size": 876544,
                "uploadDate": "2024-03-12T00:00:00Z",
                "downloadCount": 3
            }"#,
        )
        .unwrap();

        let card = FileCard::from(file);
        assert_eq!(card.category, FileCategory::Image);
        assert_eq!(card.size_label, "856 KB");
        assert_eq!(card.owner_id, "u-1");
    }
}
