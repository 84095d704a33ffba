//! Configuration for the dashboard client

use std::path::PathBuf;

use anyhow::Result;

/// Default page size for the paginated list views
pub const DEFAULT_PAGE_SIZE: u32 = 12;

/// Dashboard configuration
#[derive(Debug, Clone)]
pub struct DashboardConfig {
    /// GraphQL endpoint of the remote query API
    pub api_url: String,
    /// Directory completed downloads are saved into
    pub downloads_dir: PathBuf,
    /// Records requested per page in the list views
    pub page_size: u32,
}

impl DashboardConfig {
    /// Create a new DashboardConfig from environment variables
    ///
    /// # Environment Variables
    /// - `ADMINHUB_API_URL`: GraphQL endpoint (default: "http://localhost:8888/query")
    /// - `ADMINHUB_DOWNLOADS_DIR`: download target directory (default: "$HOME/Downloads",
    ///   falling back to "downloads" when HOME is unset)
    /// - `ADMINHUB_PAGE_SIZE`: page size for list views (default: 12)
    pub fn from_env() -> Result<Self> {
        let api_url = std::env::var("ADMINHUB_API_URL")
            .unwrap_or_else(|_| "http://localhost:8888/query".to_string());

        let downloads_dir = match std::env::var("ADMINHUB_DOWNLOADS_DIR") {
            Ok(dir) => PathBuf::from(dir),
            Err(_) => match std::env::var("HOME") {
                Ok(home) => PathBuf::from(home).join("Downloads"),
                Err(_) => PathBuf::from("downloads"),
            },
        };

        let page_size = std::env::var("ADMINHUB_PAGE_SIZE")
            .unwrap_or_else(|_| DEFAULT_PAGE_SIZE.to_string())
            .parse()
            .unwrap_or(DEFAULT_PAGE_SIZE);

        Ok(DashboardConfig {
            api_url,
            downloads_dir,
            page_size,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_defaults_when_env_unset() -> Result<()> {
        unsafe {
            std::env::remove_var("ADMINHUB_API_URL");
            std::env::remove_var("ADMINHUB_PAGE_SIZE");
        }

        let config = DashboardConfig::from_env()?;
        assert_eq!(config.api_url, "http://localhost:8888/query");
        assert_eq!(config.page_size, DEFAULT_PAGE_SIZE);
        Ok(())
    }

    #[test]
    #[serial]
    fn test_env_overrides() -> Result<()> {
        unsafe {
            std::env::set_var("ADMINHUB_API_URL", "https://api.example.com/query");
            std::env::set_var("ADMINHUB_PAGE_SIZE", "25");
        }

        let config = DashboardConfig::from_env()?;
        assert_eq!(config.api_url, "https://api.example.com/query");
        assert_eq!(config.page_size, 25);

        unsafe {
            std::env::remove_var("ADMINHUB_API_URL");
            std::env::remove_var("ADMINHUB_PAGE_SIZE");
        }
        Ok(())
    }
}
