use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use activity_core::Platform;

/// Identity created by the authentication collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub external_user_id: String,
    pub email: Option<String>,
    pub name: Option<String>,
}

/// A named view over a subset of a user's accounts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub id: String,
    pub user_id: String,
    pub slug: String,
    pub name: String,
    pub description: Option<String>,
    pub theme: Option<String>,
}

/// A credential + identity on one platform, bound to a profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub id: String,
    pub profile_id: String,
    pub platform: Platform,
    pub platform_user_id: Option<String>,
    pub platform_username: Option<String>,
    pub access_token_encrypted: String,
    pub refresh_token_encrypted: Option<String>,
    pub token_expires_at: Option<DateTime<Utc>>,
    pub is_active: bool,
    pub last_fetched_at: Option<DateTime<Utc>>,
}

/// A long-lived credential a user presents as `Authorization: Bearer <key>`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiKey {
    pub id: String,
    pub user_id: String,
    pub key_hash: String,
    pub name: String,
    pub last_used_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterType {
    Include,
    Exclude,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterKey {
    Repo,
    Subreddit,
    Keyword,
}

/// An include/exclude rule scoping a profile's timeline to specific
/// repos, subreddits, or keywords.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileFilter {
    pub id: String,
    pub profile_id: String,
    pub account_id: String,
    pub filter_type: FilterType,
    pub filter_key: FilterKey,
    pub filter_value: String,
}

/// Per-profile OAuth app credentials.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlatformCredentials {
    pub id: String,
    pub profile_id: String,
    pub platform: Platform,
    pub client_id: String,
    pub client_secret_encrypted: String,
    pub redirect_uri: Option<String>,
    pub reddit_username: Option<String>,
    pub is_verified: bool,
    pub metadata: serde_json::Value,
}
