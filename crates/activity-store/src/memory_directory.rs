use async_trait::async_trait;
use dashmap::DashMap;

use crate::directory::Directory;
use crate::directory_error::DirectoryError;
use crate::domain::{Account, ApiKey, PlatformCredentials, Profile, ProfileFilter, User};
use activity_core::Platform;

/// In-memory [`Directory`], for tests and local dev — same shape as
/// [`crate::InMemoryBackend`]: `DashMap`s behind a cheaply-clonable handle.
#[derive(Clone, Default)]
pub struct InMemoryDirectory {
    users: DashMap<String, User>,
    profiles: DashMap<String, Profile>,
    accounts: DashMap<String, Account>,
    api_keys: DashMap<String, ApiKey>,
    filters: DashMap<String, ProfileFilter>,
    credentials: DashMap<String, PlatformCredentials>,
    account_settings: DashMap<String, serde_json::Value>,
}

impl InMemoryDirectory {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Directory for InMemoryDirectory {
    async fn create_user(&self, user: User) -> Result<User, DirectoryError> {
        self.users.insert(user.id.clone(), user.clone());
        Ok(user)
    }

    async fn get_user(&self, id: &str) -> Result<Option<User>, DirectoryError> {
        Ok(self.users.get(id).map(|u| u.clone()))
    }

    async fn get_user_by_external_id(&self, external_user_id: &str) -> Result<Option<User>, DirectoryError> {
        Ok(self
            .users
            .iter()
            .find(|u| u.external_user_id == external_user_id)
            .map(|u| u.clone()))
    }

    async fn create_profile(&self, profile: Profile) -> Result<Profile, DirectoryError> {
        let clash = self
            .profiles
            .iter()
            .any(|p| p.user_id == profile.user_id && p.slug == profile.slug);
        if clash {
            return Err(DirectoryError::Conflict(format!(
                "slug '{}' already in use for this user",
                profile.slug
            )));
        }
        self.profiles.insert(profile.id.clone(), profile.clone());
        Ok(profile)
    }

    async fn get_profile(&self, id: &str) -> Result<Option<Profile>, DirectoryError> {
        Ok(self.profiles.get(id).map(|p| p.clone()))
    }

    async fn get_profile_by_slug(&self, user_id: &str, slug: &str) -> Result<Option<Profile>, DirectoryError> {
        Ok(self
            .profiles
            .iter()
            .find(|p| p.user_id == user_id && p.slug == slug)
            .map(|p| p.clone()))
    }

    async fn list_profiles_for_user(&self, user_id: &str) -> Result<Vec<Profile>, DirectoryError> {
        Ok(self
            .profiles
            .iter()
            .filter(|p| p.user_id == user_id)
            .map(|p| p.clone())
            .collect())
    }

    async fn update_profile(&self, profile: Profile) -> Result<Profile, DirectoryError> {
        if !self.profiles.contains_key(&profile.id) {
            return Err(DirectoryError::NotFound(profile.id));
        }
        let clash = self
            .profiles
            .iter()
            .any(|p| p.id != profile.id && p.user_id == profile.user_id && p.slug == profile.slug);
        if clash {
            return Err(DirectoryError::Conflict(format!(
                "slug '{}' already in use for this user",
                profile.slug
            )));
        }
        self.profiles.insert(profile.id.clone(), profile.clone());
        Ok(profile)
    }

    async fn delete_profile(&self, id: &str) -> Result<(), DirectoryError> {
        self.profiles.remove(id);
        let stale: Vec<String> = self
            .accounts
            .iter()
            .filter(|a| a.profile_id == id)
            .map(|a| a.id.clone())
            .collect();
        for account_id in stale {
            self.accounts.remove(&account_id);
        }
        let stale_filters: Vec<String> = self
            .filters
            .iter()
            .filter(|f| f.profile_id == id)
            .map(|f| f.id.clone())
            .collect();
        for filter_id in stale_filters {
            self.filters.remove(&filter_id);
        }
        Ok(())
    }

    async fn create_account(&self, account: Account) -> Result<Account, DirectoryError> {
        let clash = self.accounts.iter().any(|a| {
            a.profile_id == account.profile_id
                && a.platform == account.platform
                && a.platform_user_id == account.platform_user_id
        });
        if clash {
            return Err(DirectoryError::Conflict(
                "account already connected for this profile/platform/platform_user_id".into(),
            ));
        }
        self.accounts.insert(account.id.clone(), account.clone());
        Ok(account)
    }

    async fn get_account(&self, id: &str) -> Result<Option<Account>, DirectoryError> {
        Ok(self.accounts.get(id).map(|a| a.clone()))
    }

    async fn get_account_with_owner(&self, id: &str) -> Result<Option<(Account, User)>, DirectoryError> {
        let Some(account) = self.accounts.get(id).map(|a| a.clone()) else {
            return Ok(None);
        };
        let Some(profile) = self.profiles.get(&account.profile_id).map(|p| p.clone()) else {
            return Ok(None);
        };
        let Some(user) = self.users.get(&profile.user_id).map(|u| u.clone()) else {
            return Ok(None);
        };
        Ok(Some((account, user)))
    }

    async fn list_accounts_for_profile(&self, profile_id: &str) -> Result<Vec<Account>, DirectoryError> {
        Ok(self
            .accounts
            .iter()
            .filter(|a| a.profile_id == profile_id)
            .map(|a| a.clone())
            .collect())
    }

    async fn list_active_accounts_for_user(&self, user_id: &str) -> Result<Vec<Account>, DirectoryError> {
        let profile_ids: Vec<String> = self
            .profiles
            .iter()
            .filter(|p| p.user_id == user_id)
            .map(|p| p.id.clone())
            .collect();
        Ok(self
            .accounts
            .iter()
            .filter(|a| a.is_active && profile_ids.contains(&a.profile_id))
            .map(|a| a.clone())
            .collect())
    }

    async fn list_active_accounts_page(
        &self,
        cursor: Option<&str>,
        limit: usize,
    ) -> Result<(Vec<Account>, Option<String>), DirectoryError> {
        let mut active: Vec<Account> = self
            .accounts
            .iter()
            .filter(|a| a.is_active)
            .map(|a| a.clone())
            .collect();
        active.sort_by(|a, b| a.id.cmp(&b.id));

        let start = match cursor {
            Some(after) => active.partition_point(|a| a.id.as_str() <= after),
            None => 0,
        };
        let remaining = &active[start..];
        let page: Vec<Account> = remaining.iter().take(limit).cloned().collect();
        let next_cursor = if remaining.len() > page.len() {
            page.last().map(|a| a.id.clone())
        } else {
            None
        };
        Ok((page, next_cursor))
    }

    async fn update_account(&self, account: Account) -> Result<Account, DirectoryError> {
        if !self.accounts.contains_key(&account.id) {
            return Err(DirectoryError::NotFound(account.id));
        }
        self.accounts.insert(account.id.clone(), account.clone());
        Ok(account)
    }

    async fn delete_account(&self, id: &str) -> Result<(), DirectoryError> {
        self.accounts.remove(id);
        Ok(())
    }

    async fn create_api_key(&self, key: ApiKey) -> Result<ApiKey, DirectoryError> {
        self.api_keys.insert(key.id.clone(), key.clone());
        Ok(key)
    }

    async fn get_api_key_by_hash(&self, key_hash: &str) -> Result<Option<ApiKey>, DirectoryError> {
        Ok(self
            .api_keys
            .iter()
            .find(|k| k.key_hash == key_hash)
            .map(|k| k.clone()))
    }

    async fn touch_api_key(&self, id: &str) -> Result<(), DirectoryError> {
        if let Some(mut key) = self.api_keys.get_mut(id) {
            key.last_used_at = Some(chrono::Utc::now());
        }
        Ok(())
    }

    async fn list_filters_for_profile(&self, profile_id: &str) -> Result<Vec<ProfileFilter>, DirectoryError> {
        Ok(self
            .filters
            .iter()
            .filter(|f| f.profile_id == profile_id)
            .map(|f| f.clone())
            .collect())
    }

    async fn create_filter(&self, filter: ProfileFilter) -> Result<ProfileFilter, DirectoryError> {
        self.filters.insert(filter.id.clone(), filter.clone());
        Ok(filter)
    }

    async fn delete_filter(&self, id: &str) -> Result<(), DirectoryError> {
        self.filters.remove(id);
        Ok(())
    }

    async fn get_platform_credentials(
        &self,
        profile_id: &str,
        platform: Platform,
    ) -> Result<Option<PlatformCredentials>, DirectoryError> {
        Ok(self
            .credentials
            .iter()
            .find(|c| c.profile_id == profile_id && c.platform == platform)
            .map(|c| c.clone()))
    }

    async fn upsert_platform_credentials(
        &self,
        creds: PlatformCredentials,
    ) -> Result<PlatformCredentials, DirectoryError> {
        let existing_id = self
            .credentials
            .iter()
            .find(|c| c.profile_id == creds.profile_id && c.platform == creds.platform)
            .map(|c| c.id.clone());
        if let Some(id) = existing_id {
            self.credentials.remove(&id);
        }
        self.credentials.insert(creds.id.clone(), creds.clone());
        Ok(creds)
    }

    async fn delete_platform_credentials(&self, profile_id: &str, platform: Platform) -> Result<(), DirectoryError> {
        let existing_id = self
            .credentials
            .iter()
            .find(|c| c.profile_id == profile_id && c.platform == platform)
            .map(|c| c.id.clone());
        if let Some(id) = existing_id {
            self.credentials.remove(&id);
        }
        Ok(())
    }

    async fn get_account_settings(&self, account_id: &str) -> Result<serde_json::Value, DirectoryError> {
        Ok(self
            .account_settings
            .get(account_id)
            .map(|v| v.clone())
            .unwrap_or_else(|| serde_json::json!({})))
    }

    async fn upsert_account_settings(
        &self,
        account_id: &str,
        patch: serde_json::Value,
    ) -> Result<serde_json::Value, DirectoryError> {
        let serde_json::Value::Object(patch_map) = patch else {
            return Err(DirectoryError::Conflict("settings patch must be a JSON object".into()));
        };
        let mut current = self
            .account_settings
            .get(account_id)
            .map(|v| v.clone())
            .unwrap_or_else(|| serde_json::json!({}));
        let serde_json::Value::Object(current_map) = &mut current else {
            unreachable!("account_settings always stores an object");
        };
        for (key, value) in patch_map {
            current_map.insert(key, value);
        }
        self.account_settings.insert(account_id.to_string(), current.clone());
        Ok(current)
    }

    async fn delete_account_settings(&self, account_id: &str) -> Result<(), DirectoryError> {
        self.account_settings.remove(account_id);
        Ok(())
    }
}
