use async_trait::async_trait;

use crate::directory_error::DirectoryError;
use crate::domain::{Account, ApiKey, PlatformCredentials, Profile, ProfileFilter, User};
use activity_core::Platform;

/// Relational-entity directory: users, profiles, accounts, API keys,
/// filters, and per-profile platform credentials. Sits alongside
/// [`crate::Backend`] — `Backend` owns content-addressed snapshots,
/// `Directory` owns the mutable relational rows the HTTP surface and
/// refresh orchestrator key off of.
#[async_trait]
pub trait Directory: Send + Sync {
    async fn create_user(&self, user: User) -> Result<User, DirectoryError>;
    async fn get_user(&self, id: &str) -> Result<Option<User>, DirectoryError>;
    async fn get_user_by_external_id(&self, external_user_id: &str) -> Result<Option<User>, DirectoryError>;

    async fn create_profile(&self, profile: Profile) -> Result<Profile, DirectoryError>;
    async fn get_profile(&self, id: &str) -> Result<Option<Profile>, DirectoryError>;
    async fn get_profile_by_slug(&self, user_id: &str, slug: &str) -> Result<Option<Profile>, DirectoryError>;
    async fn list_profiles_for_user(&self, user_id: &str) -> Result<Vec<Profile>, DirectoryError>;
    async fn update_profile(&self, profile: Profile) -> Result<Profile, DirectoryError>;
    async fn delete_profile(&self, id: &str) -> Result<(), DirectoryError>;

    async fn create_account(&self, account: Account) -> Result<Account, DirectoryError>;
    async fn get_account(&self, id: &str) -> Result<Option<Account>, DirectoryError>;
    /// The account and the user who owns the profile it belongs to — used
    /// by single-account refresh and by access-control checks.
    async fn get_account_with_owner(&self, id: &str) -> Result<Option<(Account, User)>, DirectoryError>;
    async fn list_accounts_for_profile(&self, profile_id: &str) -> Result<Vec<Account>, DirectoryError>;
    async fn list_active_accounts_for_user(&self, user_id: &str) -> Result<Vec<Account>, DirectoryError>;
    /// One page of active accounts across every user, ordered by account
    /// id. `cursor` is the id of the last account seen (exclusive); `None`
    /// starts from the beginning. Returns the page plus a cursor for the
    /// next page, or `None` once there's nothing left — used by the
    /// scheduled sweep so it never has to hold every active account in
    /// memory at once.
    async fn list_active_accounts_page(
        &self,
        cursor: Option<&str>,
        limit: usize,
    ) -> Result<(Vec<Account>, Option<String>), DirectoryError>;
    async fn update_account(&self, account: Account) -> Result<Account, DirectoryError>;
    async fn delete_account(&self, id: &str) -> Result<(), DirectoryError>;

    async fn create_api_key(&self, key: ApiKey) -> Result<ApiKey, DirectoryError>;
    async fn get_api_key_by_hash(&self, key_hash: &str) -> Result<Option<ApiKey>, DirectoryError>;
    async fn touch_api_key(&self, id: &str) -> Result<(), DirectoryError>;

    async fn list_filters_for_profile(&self, profile_id: &str) -> Result<Vec<ProfileFilter>, DirectoryError>;
    async fn create_filter(&self, filter: ProfileFilter) -> Result<ProfileFilter, DirectoryError>;
    async fn delete_filter(&self, id: &str) -> Result<(), DirectoryError>;

    async fn get_platform_credentials(
        &self,
        profile_id: &str,
        platform: Platform,
    ) -> Result<Option<PlatformCredentials>, DirectoryError>;
    async fn upsert_platform_credentials(
        &self,
        creds: PlatformCredentials,
    ) -> Result<PlatformCredentials, DirectoryError>;
    async fn delete_platform_credentials(&self, profile_id: &str, platform: Platform) -> Result<(), DirectoryError>;

    /// Per-account key→value JSON settings.
    /// Empty object if the account has never had settings written.
    async fn get_account_settings(&self, account_id: &str) -> Result<serde_json::Value, DirectoryError>;
    /// Upsert each key in `patch` into the account's settings object,
    /// leaving keys not present in `patch` untouched, and return the
    /// merged object.
    async fn upsert_account_settings(
        &self,
        account_id: &str,
        patch: serde_json::Value,
    ) -> Result<serde_json::Value, DirectoryError>;
    /// Drop all settings for an account.
    async fn delete_account_settings(&self, account_id: &str) -> Result<(), DirectoryError>;
}
