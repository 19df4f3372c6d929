use std::sync::Arc;

use activity_core::{ItemPayload, Platform, StoreId};
use activity_providers::{RawGithubCommit, RawGithubMeta, RawGithubPr};
use activity_store::{Account, Backend, FilterKey, FilterType, InMemoryBackend, Profile, ProfileFilter, PutOptions, Store};
use activity_timeline::{assemble_profile_timeline, Window};
use chrono::Utc;

fn test_account(id: &str, platform: Platform) -> Account {
    Account {
        id: id.into(),
        profile_id: "profile-1".into(),
        platform,
        platform_user_id: Some("p1".into()),
        platform_username: Some("alice".into()),
        access_token_encrypted: "unused-in-this-test".into(),
        refresh_token_encrypted: None,
        token_expires_at: None,
        is_active: true,
        last_fetched_at: None,
    }
}

struct FakeDirectory {
    accounts: Vec<Account>,
    filters: Vec<ProfileFilter>,
}

#[async_trait::async_trait]
impl activity_store::Directory for FakeDirectory {
    async fn create_user(&self, user: activity_store::User) -> Result<activity_store::User, activity_store::DirectoryError> {
        Ok(user)
    }
    async fn get_user(&self, _id: &str) -> Result<Option<activity_store::User>, activity_store::DirectoryError> {
        Ok(None)
    }
    async fn get_user_by_external_id(&self, _id: &str) -> Result<Option<activity_store::User>, activity_store::DirectoryError> {
        Ok(None)
    }
    async fn create_profile(&self, profile: Profile) -> Result<Profile, activity_store::DirectoryError> {
        Ok(profile)
    }
    async fn get_profile(&self, _id: &str) -> Result<Option<Profile>, activity_store::DirectoryError> {
        Ok(None)
    }
    async fn get_profile_by_slug(&self, _user_id: &str, _slug: &str) -> Result<Option<Profile>, activity_store::DirectoryError> {
        Ok(None)
    }
    async fn list_profiles_for_user(&self, _user_id: &str) -> Result<Vec<Profile>, activity_store::DirectoryError> {
        Ok(Vec::new())
    }
    async fn update_profile(&self, profile: Profile) -> Result<Profile, activity_store::DirectoryError> {
        Ok(profile)
    }
    async fn delete_profile(&self, _id: &str) -> Result<(), activity_store::DirectoryError> {
        Ok(())
    }
    async fn create_account(&self, account: Account) -> Result<Account, activity_store::DirectoryError> {
        Ok(account)
    }
    async fn get_account(&self, _id: &str) -> Result<Option<Account>, activity_store::DirectoryError> {
        Ok(None)
    }
    async fn get_account_with_owner(&self, _id: &str) -> Result<Option<(Account, activity_store::User)>, activity_store::DirectoryError> {
        Ok(None)
    }
    async fn list_accounts_for_profile(&self, profile_id: &str) -> Result<Vec<Account>, activity_store::DirectoryError> {
        Ok(self.accounts.iter().filter(|a| a.profile_id == profile_id).cloned().collect())
    }
    async fn list_active_accounts_for_user(&self, _user_id: &str) -> Result<Vec<Account>, activity_store::DirectoryError> {
        Ok(Vec::new())
    }
    async fn list_active_accounts_page(
        &self,
        _cursor: Option<&str>,
        _limit: usize,
    ) -> Result<(Vec<Account>, Option<String>), activity_store::DirectoryError> {
        Ok((Vec::new(), None))
    }
    async fn update_account(&self, account: Account) -> Result<Account, activity_store::DirectoryError> {
        Ok(account)
    }
    async fn delete_account(&self, _id: &str) -> Result<(), activity_store::DirectoryError> {
        Ok(())
    }
    async fn create_api_key(&self, key: activity_store::ApiKey) -> Result<activity_store::ApiKey, activity_store::DirectoryError> {
        Ok(key)
    }
    async fn get_api_key_by_hash(&self, _key_hash: &str) -> Result<Option<activity_store::ApiKey>, activity_store::DirectoryError> {
        Ok(None)
    }
    async fn touch_api_key(&self, _id: &str) -> Result<(), activity_store::DirectoryError> {
        Ok(())
    }
    async fn list_filters_for_profile(&self, profile_id: &str) -> Result<Vec<ProfileFilter>, activity_store::DirectoryError> {
        Ok(self.filters.iter().filter(|f| f.profile_id == profile_id).cloned().collect())
    }
    async fn create_filter(&self, filter: ProfileFilter) -> Result<ProfileFilter, activity_store::DirectoryError> {
        Ok(filter)
    }
    async fn delete_filter(&self, _id: &str) -> Result<(), activity_store::DirectoryError> {
        Ok(())
    }
    async fn get_platform_credentials(
        &self,
        _profile_id: &str,
        _platform: Platform,
    ) -> Result<Option<activity_store::PlatformCredentials>, activity_store::DirectoryError> {
        Ok(None)
    }
    async fn upsert_platform_credentials(
        &self,
        creds: activity_store::PlatformCredentials,
    ) -> Result<activity_store::PlatformCredentials, activity_store::DirectoryError> {
        Ok(creds)
    }
    async fn delete_platform_credentials(&self, _profile_id: &str, _platform: Platform) -> Result<(), activity_store::DirectoryError> {
        Ok(())
    }
    async fn get_account_settings(&self, _account_id: &str) -> Result<serde_json::Value, activity_store::DirectoryError> {
        Ok(serde_json::json!({}))
    }
    async fn upsert_account_settings(
        &self,
        _account_id: &str,
        patch: serde_json::Value,
    ) -> Result<serde_json::Value, activity_store::DirectoryError> {
        Ok(patch)
    }
    async fn delete_account_settings(&self, _account_id: &str) -> Result<(), activity_store::DirectoryError> {
        Ok(())
    }
}

#[tokio::test]
async fn assembles_github_commits_into_timeline_snapshot() {
    let backend: Arc<dyn Backend> = Arc::new(InMemoryBackend::new());
    let account = test_account("acct-1", Platform::Github);

    let meta_store: Store<RawGithubMeta> = Store::new(backend.clone(), StoreId::GithubMeta { account: account.id.clone() }.to_string());
    meta_store
        .put(
            &RawGithubMeta {
                login: "alice".into(),
                tracked_repos: vec!["alice/project".into()],
            },
            PutOptions::default(),
        )
        .await
        .unwrap();

    let commits_store: Store<Vec<RawGithubCommit>> = Store::new(
        backend.clone(),
        StoreId::GithubCommits {
            account: account.id.clone(),
            owner: "alice".into(),
            repo: "project".into(),
        }
        .to_string(),
    );
    commits_store
        .put(
            &vec![RawGithubCommit {
                sha: "deadbeef".into(),
                message: "add feature".into(),
                branch: "main".into(),
                author_date: Utc::now(),
                additions: 10,
                deletions: 2,
                files_changed: 3,
            }],
            PutOptions::default(),
        )
        .await
        .unwrap();

    let prs_store: Store<Vec<RawGithubPr>> = Store::new(
        backend.clone(),
        StoreId::GithubPrs {
            account: account.id.clone(),
            owner: "alice".into(),
            repo: "project".into(),
        }
        .to_string(),
    );
    prs_store.put(&Vec::new(), PutOptions::default()).await.unwrap();

    let directory = FakeDirectory {
        accounts: vec![account],
        filters: Vec::new(),
    };
    let profile = Profile {
        id: "profile-1".into(),
        user_id: "user-1".into(),
        slug: "main".into(),
        name: "Main".into(),
        description: None,
        theme: None,
    };

    let snapshot = assemble_profile_timeline(&directory, backend, &profile, Window::default())
        .await
        .unwrap();

    assert_eq!(snapshot.data.user_id, "user-1");
    assert_eq!(snapshot.data.groups.len(), 1);
    assert_eq!(snapshot.data.groups[0].items.len(), 1);
    match &snapshot.data.groups[0].items[0] {
        activity_core::Entry::CommitGroup(group) => {
            assert_eq!(group.repo, "alice/project");
            assert_eq!(group.commits.len(), 1);
            assert!(matches!(group.commits[0].payload, ItemPayload::Commit { .. }));
        }
        _ => panic!("expected a commit group"),
    }
    assert!(!snapshot.meta.parents.is_empty());
}

#[tokio::test]
async fn profile_filter_excludes_repo() {
    let backend: Arc<dyn Backend> = Arc::new(InMemoryBackend::new());
    let account = test_account("acct-1", Platform::Github);

    let meta_store: Store<RawGithubMeta> = Store::new(backend.clone(), StoreId::GithubMeta { account: account.id.clone() }.to_string());
    meta_store
        .put(
            &RawGithubMeta {
                login: "alice".into(),
                tracked_repos: vec!["alice/keep".into(), "alice/drop".into()],
            },
            PutOptions::default(),
        )
        .await
        .unwrap();

    for repo in ["keep", "drop"] {
        let commits_store: Store<Vec<RawGithubCommit>> = Store::new(
            backend.clone(),
            StoreId::GithubCommits {
                account: account.id.clone(),
                owner: "alice".into(),
                repo: repo.into(),
            }
            .to_string(),
        );
        commits_store
            .put(
                &vec![RawGithubCommit {
                    sha: format!("{repo}-sha"),
                    message: "work".into(),
                    branch: "main".into(),
                    author_date: Utc::now(),
                    additions: 1,
                    deletions: 0,
                    files_changed: 1,
                }],
                PutOptions::default(),
            )
            .await
            .unwrap();
    }

    let filter = ProfileFilter {
        id: "f1".into(),
        profile_id: "profile-1".into(),
        account_id: account.id.clone(),
        filter_type: FilterType::Exclude,
        filter_key: FilterKey::Repo,
        filter_value: "alice/drop".into(),
    };

    let directory = FakeDirectory {
        accounts: vec![account],
        filters: vec![filter],
    };
    let profile = Profile {
        id: "profile-1".into(),
        user_id: "user-1".into(),
        slug: "main".into(),
        name: "Main".into(),
        description: None,
        theme: None,
    };

    let snapshot = assemble_profile_timeline(&directory, backend, &profile, Window::default())
        .await
        .unwrap();

    let repos: Vec<&str> = snapshot
        .data
        .groups
        .iter()
        .flat_map(|g| &g.items)
        .filter_map(|entry| match entry {
            activity_core::Entry::CommitGroup(group) => Some(group.repo.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(repos, vec!["alice/keep"]);
}
