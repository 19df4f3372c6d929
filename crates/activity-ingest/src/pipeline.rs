use std::sync::Arc;
use std::time::Duration;

use activity_crypto::TokenCipher;
use activity_providers::{PlatformResult, Provider, ProviderError};
use activity_rate_limit::Gate;
use activity_store::{Account, Backend};

use crate::error::IngestError;
use crate::locks::AccountLocks;
use crate::shard::ShardStat;
use crate::{github, raw_shard, reddit, twitter};

/// Per-platform provider fetch timeout (platform-configurable, default 30s).
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// A timed-out fetch is recorded on the gate as a failure with this retry-after.
const TIMEOUT_RETRY_AFTER: Duration = Duration::from_secs(60);

#[derive(Debug, Clone, PartialEq)]
pub enum IngestStatus {
    /// The gate rejected the fetch; nothing was called or written.
    Skipped,
    Ingested { shards: Vec<ShardStat> },
}

/// Run the full per-account ingestion pipeline for one account.
///
/// Acquires the account's lock before decrypting/fetching so at most one
/// ingestion for `account.id` runs at a time; re-checks the gate
/// after acquiring the lock in case a concurrent caller already ran.
pub async fn ingest_account(
    account: &Account,
    cipher: &TokenCipher,
    gate: &Gate,
    provider: &dyn Provider,
    backend: Arc<dyn Backend>,
    locks: &AccountLocks,
) -> Result<IngestStatus, IngestError> {
    if !gate.should_fetch(&account.id) {
        return Ok(IngestStatus::Skipped);
    }

    let lock = locks.lock_for(&account.id);
    let _guard = lock.lock().await;

    if !gate.should_fetch(&account.id) {
        return Ok(IngestStatus::Skipped);
    }

    let token = cipher.decrypt(&account.access_token_encrypted)?;

    let fetch = tokio::time::timeout(DEFAULT_FETCH_TIMEOUT, provider.fetch(&token)).await;
    let outcome = match fetch {
        Err(_elapsed) => {
            gate.record_rate_limited(&account.id, TIMEOUT_RETRY_AFTER);
            return Err(IngestError::Timeout);
        }
        Ok(Err(ProviderError::RateLimited { retry_after_secs })) => {
            gate.record_rate_limited(&account.id, Duration::from_secs(retry_after_secs));
            return Err(IngestError::Provider(ProviderError::RateLimited { retry_after_secs }));
        }
        Ok(Err(other)) => {
            gate.record_failure(&account.id);
            return Err(IngestError::Provider(other));
        }
        Ok(Ok(outcome)) => outcome,
    };

    gate.record_success(&account.id, outcome.headers);

    let shards = match outcome.result {
        PlatformResult::Github(raw) => github::ingest_github(backend, &account.id, raw).await?,
        PlatformResult::Reddit(raw) => reddit::ingest_reddit(backend, &account.id, raw).await?,
        PlatformResult::Twitter(raw) => twitter::ingest_twitter(backend, &account.id, raw).await?,
        PlatformResult::Bluesky(raw) => raw_shard::ingest_bluesky(backend, &account.id, raw).await?,
        PlatformResult::Youtube(raw) => raw_shard::ingest_youtube(backend, &account.id, raw).await?,
        PlatformResult::Devpad(raw) => raw_shard::ingest_devpad(backend, &account.id, raw).await?,
    };

    Ok(IngestStatus::Ingested { shards })
}

#[cfg(test)]
mod tests {
    use super::*;
    use activity_core::Platform;
    use activity_providers::{
        MemoryProvider, PlatformResult, RawGithub, RawGithubCommit, RawGithubMeta, RawGithubRepoActivity,
    };
    use activity_store::InMemoryBackend;
    use chrono::Utc;
    use std::collections::HashMap;

    fn test_account() -> Account {
        let cipher = TokenCipher::new(&[3u8; 32]);
        Account {
            id: "acct-1".into(),
            profile_id: "profile-1".into(),
            platform: Platform::Github,
            platform_user_id: Some("gh-1".into()),
            platform_username: Some("octocat".into()),
            access_token_encrypted: cipher.encrypt("gho_token").unwrap(),
            refresh_token_encrypted: None,
            token_expires_at: None,
            is_active: true,
            last_fetched_at: None,
        }
    }

    #[tokio::test]
    async fn ingests_github_and_writes_shards() {
        let backend: Arc<dyn Backend> = Arc::new(InMemoryBackend::new());
        let cipher = TokenCipher::new(&[3u8; 32]);
        let gate = Gate::new();
        let locks = AccountLocks::new();
        let account = test_account();

        let mut repos = HashMap::new();
        repos.insert(
            "octocat/hello-world".to_string(),
            RawGithubRepoActivity {
                commits: vec![RawGithubCommit {
                    sha: "aaa".into(),
                    message: "init".into(),
                    branch: "main".into(),
                    author_date: Utc::now(),
                    additions: 1,
                    deletions: 0,
                    files_changed: 1,
                }],
                prs: vec![],
            },
        );
        let provider = MemoryProvider::new(Platform::Github);
        provider.set_result(PlatformResult::Github(RawGithub {
            meta: RawGithubMeta {
                login: "octocat".into(),
                tracked_repos: vec!["octocat/hello-world".into()],
            },
            repos,
        }));

        let status = ingest_account(&account, &cipher, &gate, &provider, backend, &locks)
            .await
            .unwrap();

        match status {
            IngestStatus::Ingested { shards } => {
                assert_eq!(shards.len(), 3); // meta + commits + prs
                assert!(shards.iter().any(|s| s.store_id.contains("/meta")));
                assert!(shards.iter().any(|s| s.store_id.contains("/commits/")));
            }
            IngestStatus::Skipped => panic!("expected ingestion to run"),
        }
        assert_eq!(provider.get_call_count(), 1);
    }

    #[tokio::test]
    async fn circuit_open_skips_without_calling_provider() {
        let backend: Arc<dyn Backend> = Arc::new(InMemoryBackend::new());
        let cipher = TokenCipher::new(&[3u8; 32]);
        let gate = Gate::new();
        let locks = AccountLocks::new();
        let account = test_account();

        gate.record_failure(&account.id);
        gate.record_failure(&account.id);
        gate.record_failure(&account.id);

        let provider = MemoryProvider::new(Platform::Github);
        let status = ingest_account(&account, &cipher, &gate, &provider, backend, &locks)
            .await
            .unwrap();

        assert_eq!(status, IngestStatus::Skipped);
        assert_eq!(provider.get_call_count(), 0);
    }

    #[tokio::test]
    async fn rate_limited_fetch_records_gate_and_errors() {
        let backend: Arc<dyn Backend> = Arc::new(InMemoryBackend::new());
        let cipher = TokenCipher::new(&[3u8; 32]);
        let gate = Gate::new();
        let locks = AccountLocks::new();
        let account = test_account();

        let provider = MemoryProvider::new(Platform::Github);
        provider.set_simulate_rate_limit(Some(120));

        let err = ingest_account(&account, &cipher, &gate, &provider, backend, &locks)
            .await
            .unwrap_err();

        assert!(matches!(err, IngestError::Provider(ProviderError::RateLimited { retry_after_secs: 120 })));
        assert!(!gate.should_fetch(&account.id));
    }
}
