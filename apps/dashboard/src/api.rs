//! Remote query client
//!
//! Typed GraphQL-over-HTTP client for the admin query API. Every operation
//! is request/response; the session token, when present, travels as a bearer
//! header. Server-reported errors keep their message verbatim so the views
//! can surface it unchanged, and anything auth-flavored is classified as
//! `ApiError::Unauthorized` so the guard can treat it as a logout.

use std::path::{Path, PathBuf};

use reqwest::StatusCode;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use thiserror::Error;
use tracing::info;

use crate::config::DashboardConfig;
use crate::models::{ApiFile, ApiUser, DownloadInfo, Pagination, UsageStats};
use crate::session::{SessionStore, UserSnapshot};

/// Custom error type for remote query operations
#[derive(Error, Debug)]
pub enum ApiError {
    /// The request never produced a usable response
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The server answered with an error message
    #[error("{0}")]
    Server(String),

    /// The server rejected the session
    #[error("Authentication failed: {0}")]
    Unauthorized(String),

    /// The response parsed but carried no data
    #[error("Response contained no data")]
    MissingData,

    /// The response body could not be decoded
    #[error("Malformed response: {0}")]
    Decode(#[from] serde_json::Error),

    /// A completed download could not be written to disk
    #[error("Failed to save download: {0}")]
    Save(#[from] std::io::Error),
}

impl ApiError {
    /// Whether this error means the session is no longer valid
    pub fn is_auth_failure(&self) -> bool {
        matches!(self, ApiError::Unauthorized(_))
    }
}

const LOGIN_MUTATION: &str = r#"
mutation Login($email: String!, $password: String!) {
  login(input: { email: $email, password: $password }) {
    user { name }
    token
  }
}"#;

const GET_USERS_QUERY: &str = r#"
query GetUsers($limit: Int, $pageNo: Int) {
  getUsers(limit: $limit, pageNo: $pageNo) {
    users { id name email role createdAt }
    pagination { count totalCount pageNo totalPages limit }
  }
}"#;

const GET_USER_BY_ID_QUERY: &str = r#"
query GetUserByID($userID: ID!) {
  getUserByID(userID: $userID) { id name email role createdAt }
}"#;

const GET_USAGE_STATS_QUERY: &str = r#"
query GetUsageStatsByUser($userID: ID!) {
  getUsageStatsByUser(userID: $userID) { totalStorageUsed actualStorageUsed }
}"#;

const GET_FILES_QUERY: &str = r#"
query GetFiles($limit: Int, $pageNo: Int) {
  getFiles(limit: $limit, pageNo: $pageNo) {
    files { id ownerID filename mimeType size uploadDate downloadCount }
    pagination { count totalCount pageNo totalPages limit }
  }
}"#;

const DOWNLOAD_FILE_QUERY: &str = r#"
query DownloadFile($fileID: ID!) {
  downloadFile(fileID: $fileID) { url filename }
}"#;

/// Successful login payload
#[derive(Debug, Clone, Deserialize)]
pub struct LoginPayload {
    pub token: String,
    pub user: UserSnapshot,
}

/// One page of users plus the server-reported pagination
#[derive(Debug, Clone, Deserialize)]
pub struct UsersPage {
    pub users: Vec<ApiUser>,
    pub pagination: Pagination,
}

/// One page of files plus the server-reported pagination
#[derive(Debug, Clone, Deserialize)]
pub struct FilesPage {
    pub files: Vec<ApiFile>,
    pub pagination: Pagination,
}

#[derive(Deserialize)]
struct GraphqlError {
    message: String,
}

#[derive(Deserialize)]
struct GraphqlResponse<T> {
    data: Option<T>,
    errors: Option<Vec<GraphqlError>>,
}

#[derive(Deserialize)]
struct LoginData {
    login: LoginPayload,
}

#[derive(Deserialize)]
struct UsersData {
    #[serde(rename = "getUsers")]
    get_users: UsersPage,
}

#[derive(Deserialize)]
struct UserData {
    #[serde(rename = "getUserByID")]
    get_user_by_id: ApiUser,
}

#[derive(Deserialize)]
struct StatsData {
    #[serde(rename = "getUsageStatsByUser")]
    get_usage_stats_by_user: UsageStats,
}

#[derive(Deserialize)]
struct FilesData {
    #[serde(rename = "getFiles")]
    get_files: FilesPage,
}

#[derive(Deserialize)]
struct DownloadData {
    #[serde(rename = "downloadFile")]
    download_file: DownloadInfo,
}

/// Whether a server error message signals an invalid session
fn is_auth_message(message: &str) -> bool {
    let message = message.to_ascii_lowercase();
    message.contains("unauthorized")
        || message.contains("unauthenticated")
        || message.contains("access denied")
        || message.contains("invalid token")
        || message.contains("token expired")
}

/// Turn an HTTP status and response body into a typed result
fn parse_response<T: DeserializeOwned>(status: StatusCode, body: &str) -> Result<T, ApiError> {
    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        return Err(ApiError::Unauthorized(format!(
            "server returned {}",
            status
        )));
    }

    let response: GraphqlResponse<T> = serde_json::from_str(body)?;

    if let Some(first) = response.errors.into_iter().flatten().next() {
        if is_auth_message(&first.message) {
            return Err(ApiError::Unauthorized(first.message));
        }
        return Err(ApiError::Server(first.message));
    }

    response.data.ok_or(ApiError::MissingData)
}

/// Typed client for the remote query API
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    endpoint: String,
    session: SessionStore,
}

impl ApiClient {
    /// Create a new client bound to the configured endpoint
    pub fn new(config: &DashboardConfig, session: SessionStore) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: config.api_url.clone(),
            session,
        }
    }

    /// Execute one GraphQL operation
    async fn execute<T: DeserializeOwned>(
        &self,
        query: &str,
        variables: Value,
    ) -> Result<T, ApiError> {
        let mut request = self
            .http
            .post(&self.endpoint)
            .json(&json!({ "query": query, "variables": variables }));

        if let Some(token) = self.session.token() {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        parse_response(status, &body)
    }

    /// Exchange credentials for a session token
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginPayload, ApiError> {
        info!("Submitting login for {}", email);

        let data: LoginData = self
            .execute(
                LOGIN_MUTATION,
                json!({ "email": email, "password": password }),
            )
            .await?;

        Ok(data.login)
    }

    /// Fetch one page of users
    pub async fn users(&self, limit: u32, page_no: u32) -> Result<UsersPage, ApiError> {
        let data: UsersData = self
            .execute(
                GET_USERS_QUERY,
                json!({ "limit": limit, "pageNo": page_no }),
            )
            .await?;

        Ok(data.get_users)
    }

    /// Fetch a single user by id
    pub async fn user_by_id(&self, user_id: &str) -> Result<ApiUser, ApiError> {
        let data: UserData = self
            .execute(GET_USER_BY_ID_QUERY, json!({ "userID": user_id }))
            .await?;

        Ok(data.get_user_by_id)
    }

    /// Fetch storage usage statistics for a user
    pub async fn usage_stats(&self, user_id: &str) -> Result<UsageStats, ApiError> {
        let data: StatsData = self
            .execute(GET_USAGE_STATS_QUERY, json!({ "userID": user_id }))
            .await?;

        Ok(data.get_usage_stats_by_user)
    }

    /// Fetch one page of files
    pub async fn files(&self, limit: u32, page_no: u32) -> Result<FilesPage, ApiError> {
        let data: FilesData = self
            .execute(
                GET_FILES_QUERY,
                json!({ "limit": limit, "pageNo": page_no }),
            )
            .await?;

        Ok(data.get_files)
    }

    /// Request a short-lived download URL for a file
    pub async fn download_url(&self, file_id: &str) -> Result<DownloadInfo, ApiError> {
        let data: DownloadData = self
            .execute(DOWNLOAD_FILE_QUERY, json!({ "fileID": file_id }))
            .await?;

        Ok(data.download_file)
    }

    /// Transfer the bytes behind a download URL into the target directory
    pub async fn fetch_to(
        &self,
        info: &DownloadInfo,
        dir: &Path,
    ) -> Result<PathBuf, ApiError> {
        let response = self.http.get(&info.url).send().await?;

        if response.status() == StatusCode::UNAUTHORIZED {
            return Err(ApiError::Unauthorized("download link rejected".to_string()));
        }
        if !response.status().is_success() {
            return Err(ApiError::Server(format!(
                "download failed with {}",
                response.status()
            )));
        }

        let bytes = response.bytes().await?;
        std::fs::create_dir_all(dir)?;
        let dest = dir.join(&info.filename);
        std::fs::write(&dest, &bytes)?;

        info!("Saved {} ({} bytes)", dest.display(), bytes.len());
        Ok(dest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_users_page() {
        let body = r#"{
            "data": {
                "getUsers": {
                    "users": [
                        {"id": "1", "name": "Jane", "email": "jane@example.com",
                         "role": "admin", "createdAt": "2024-03-15T12:00:00Z"}
                    ],
                    "pagination": {"count": 1, "totalCount": 97, "pageNo": 3,
                                   "totalPages": 10, "limit": 10}
                }
            }
        }"#;

        let data: UsersData = parse_response(StatusCode::OK, body).unwrap();
        assert_eq!(data.get_users.users.len(), 1);
        assert_eq!(data.get_users.pagination.total_count, 97);
    }

    #[test]
    fn test_server_error_message_kept_verbatim() {
        let body = r#"{"data": null, "errors": [{"message": "record not found"}]}"#;
        let result: Result<UsersData, _> = parse_response(StatusCode::OK, body);

        match result {
            Err(ApiError::Server(message)) => assert_eq!(message, "record not found"),
            other => panic!("expected server error, got {:?}", other.err()),
        }
    }

    #[test]
    fn test_auth_flavored_error_classified() {
        let body = r#"{"data": null, "errors": [{"message": "Access denied: invalid token"}]}"#;
        let result: Result<UsersData, _> = parse_response(StatusCode::OK, body);

        assert!(matches!(result, Err(ApiError::Unauthorized(_))));
    }

    #[test]
    fn test_http_401_classified() {
        let result: Result<UsersData, _> = parse_response(StatusCode::UNAUTHORIZED, "");
        assert!(result.as_ref().err().map(ApiError::is_auth_failure).unwrap_or(false));
    }

    #[test]
    fn test_missing_data_detected() {
        let body = r#"{"data": null}"#;
        let result: Result<UsersData, _> = parse_response(StatusCode::OK, body);
        assert!(matches!(result, Err(ApiError::MissingData)));
    }

    #[test]
    fn test_parse_login_payload() {
        let body = r#"{"data": {"login": {"token": "abc", "user": {"name": "Jane"}}}}"#;
        let data: LoginData = parse_response(StatusCode::OK, body).unwrap();

        assert_eq!(data.login.token, "abc");
        assert_eq!(data.login.user.name, "Jane");
    }
}
