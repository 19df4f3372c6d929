use std::collections::HashMap;
use std::sync::Arc;

use activity_core::Platform;
use activity_crypto::TokenCipher;
use activity_ingest::{ingest_account, AccountLocks, IngestStatus};
use activity_rate_limit::Gate;
use activity_store::{Backend, Directory};

use crate::background::BackgroundTasks;
use crate::error::RefreshError;
use crate::providers::ProviderRegistry;
use crate::single::{reassemble_profile, run_ingest_and_reassemble};

/// `refreshAllAccounts(user)` status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BulkRefreshStatus {
    /// At least one cooperative-platform refresh was queued.
    Processing,
    /// Every active account was processed inline.
    Completed,
}

/// Result of `refreshAllAccounts(user)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BulkRefreshOutcome {
    pub status: BulkRefreshStatus,
    pub succeeded: usize,
    pub failed: usize,
    pub total: usize,
    /// Number of accounts queued as background work, per cooperative platform.
    pub queued_by_platform: HashMap<Platform, usize>,
}

#[allow(clippy::too_many_arguments)]
pub async fn refresh_all_accounts(
    directory: Arc<dyn Directory>,
    backend: Arc<dyn Backend>,
    cipher: &Arc<TokenCipher>,
    gate: &Gate,
    providers: &ProviderRegistry,
    locks: &AccountLocks,
    background: &dyn BackgroundTasks,
    user_id: &str,
) -> Result<BulkRefreshOutcome, RefreshError> {
    let accounts = directory.list_active_accounts_for_user(user_id).await?;
    let total = accounts.len();

    let (cooperative, inline): (Vec<_>, Vec<_>) = accounts.into_iter().partition(|a| a.platform.is_cooperative());

    let mut succeeded = 0usize;
    let mut failed = 0usize;
    let mut any_new_snapshot = false;
    let mut touched_profiles: Vec<String> = Vec::new();

    for account in &inline {
        let provider = match providers.get(account.platform) {
            Some(provider) => provider,
            None => {
                failed += 1;
                tracing::warn!(account_id = %account.id, platform = %account.platform, "no provider registered");
                continue;
            }
        };

        match ingest_account(account, cipher.as_ref(), gate, provider.as_ref(), backend.clone(), locks).await {
            Ok(IngestStatus::Ingested { .. }) => {
                succeeded += 1;
                any_new_snapshot = true;
                if !touched_profiles.contains(&account.profile_id) {
                    touched_profiles.push(account.profile_id.clone());
                }
            }
            Ok(IngestStatus::Skipped) => {
                succeeded += 1;
            }
            Err(err) => {
                failed += 1;
                tracing::warn!(account_id = %account.id, error = %err, "inline refresh failed");
            }
        }
    }

    if any_new_snapshot {
        for profile_id in &touched_profiles {
            reassemble_profile(directory.as_ref(), backend.clone(), profile_id).await?;
        }
    }

    let mut queued_by_platform: HashMap<Platform, usize> = HashMap::new();
    for account in &cooperative {
        let platform = account.platform;
        let provider = match providers.get(platform) {
            Some(provider) => provider,
            None => {
                failed += 1;
                tracing::warn!(account_id = %account.id, platform = %platform, "no provider registered");
                continue;
            }
        };

        let job_directory = directory.clone();
        let job_backend = backend.clone();
        let job_cipher = cipher.clone();
        let job_gate = gate.clone();
        let job_locks = locks.clone();
        let job_account = account.clone();

        background
            .spawn(Box::pin(async move {
                run_ingest_and_reassemble(job_directory, job_backend, job_cipher.as_ref(), &job_gate, provider.as_ref(), &job_locks, &job_account).await;
            }))
            .await;

        *queued_by_platform.entry(platform).or_insert(0) += 1;
    }

    let status = if queued_by_platform.values().any(|&n| n > 0) {
        BulkRefreshStatus::Processing
    } else {
        BulkRefreshStatus::Completed
    };

    Ok(BulkRefreshOutcome {
        status,
        succeeded,
        failed,
        total,
        queued_by_platform,
    })
}
