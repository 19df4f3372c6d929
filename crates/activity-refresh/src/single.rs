use std::sync::Arc;

use activity_core::Platform;
use activity_crypto::TokenCipher;
use activity_ingest::{ingest_account, AccountLocks, IngestError, IngestStatus};
use activity_providers::ProviderError;
use activity_rate_limit::Gate;
use activity_store::{Backend, Directory};
use activity_timeline::assemble_profile_timeline;

use crate::background::BackgroundTasks;
use crate::error::RefreshError;
use crate::providers::ProviderRegistry;

/// Outcome of [`refresh_single_account`].
#[derive(Debug, Clone, PartialEq)]
pub enum SingleRefreshStatus {
    /// A cooperative platform's refresh was queued as a background task.
    Processing { platform: Platform },
    /// Ingestion produced a new snapshot and the profile's timeline was reassembled.
    Refreshed,
    /// The gate rejected the fetch; nothing changed.
    Skipped,
}

/// `refreshSingleAccount(user, account_id)`.
///
/// `user_id` scopes ownership: the looked-up account's owning user must match.
/// `directory` is an `Arc` (rather than `&dyn`) because a cooperative
/// platform's background job must be able to own it past this call's return.
#[allow(clippy::too_many_arguments)]
pub async fn refresh_single_account(
    directory: Arc<dyn Directory>,
    backend: Arc<dyn Backend>,
    cipher: &Arc<TokenCipher>,
    gate: &Gate,
    providers: &ProviderRegistry,
    locks: &AccountLocks,
    background: &dyn BackgroundTasks,
    user_id: &str,
    account_id: &str,
) -> Result<SingleRefreshStatus, RefreshError> {
    let (account, owner) = directory
        .get_account_with_owner(account_id)
        .await?
        .ok_or_else(|| RefreshError::NotFound(account_id.to_string()))?;

    if owner.id != user_id {
        return Err(RefreshError::NotFound(account_id.to_string()));
    }
    if !account.is_active {
        return Err(RefreshError::Inactive(account_id.to_string()));
    }

    if account.platform.is_cooperative() {
        let platform = account.platform;
        let provider = providers
            .get(platform)
            .ok_or_else(|| RefreshError::Ingest(ProviderError::UnknownPlatform(platform.as_str().to_string()).into()))?;

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

        return Ok(SingleRefreshStatus::Processing { platform });
    }

    let provider = providers
        .get(account.platform)
        .ok_or_else(|| RefreshError::Ingest(ProviderError::UnknownPlatform(account.platform.as_str().to_string()).into()))?;

    let status = match ingest_account(&account, cipher.as_ref(), gate, provider.as_ref(), backend.clone(), locks).await {
        Ok(status) => status,
        Err(IngestError::Provider(err)) => {
            tracing::warn!(account_id = %account.id, error = %err, "refresh: provider fetch failed, surfacing as skipped");
            return Ok(SingleRefreshStatus::Skipped);
        }
        Err(IngestError::Timeout) => {
            tracing::warn!(account_id = %account.id, "refresh: provider fetch timed out, surfacing as skipped");
            return Ok(SingleRefreshStatus::Skipped);
        }
        Err(err) => return Err(err.into()),
    };

    match status {
        IngestStatus::Skipped => Ok(SingleRefreshStatus::Skipped),
        IngestStatus::Ingested { .. } => {
            reassemble_profile(directory.as_ref(), backend, &account.profile_id).await?;
            Ok(SingleRefreshStatus::Refreshed)
        }
    }
}

/// Reassemble the timeline for the profile owning `profile_id`, if it still exists.
pub(crate) async fn reassemble_profile(directory: &dyn Directory, backend: Arc<dyn Backend>, profile_id: &str) -> Result<(), RefreshError> {
    if let Some(profile) = directory.get_profile(profile_id).await? {
        assemble_profile_timeline(directory, backend, &profile, Default::default()).await?;
    }
    Ok(())
}

/// Background-task body for a cooperative platform: ingest, then reassemble
/// if a new snapshot was produced. Logged rather than propagated — this
/// runs detached, with nothing left to return an error to.
pub(crate) async fn run_ingest_and_reassemble(
    directory: Arc<dyn Directory>,
    backend: Arc<dyn Backend>,
    cipher: &TokenCipher,
    gate: &Gate,
    provider: &dyn activity_providers::Provider,
    locks: &AccountLocks,
    account: &activity_store::Account,
) {
    let status = match ingest_account(account, cipher, gate, provider, backend.clone(), locks).await {
        Ok(status) => status,
        Err(err) => {
            tracing::warn!(account_id = %account.id, error = %err, "background ingestion failed");
            return;
        }
    };

    if matches!(status, IngestStatus::Skipped) {
        return;
    }

    if let Err(err) = reassemble_profile(directory.as_ref(), backend, &account.profile_id).await {
        tracing::warn!(account_id = %account.id, error = %err, "background timeline reassembly failed");
    }
}
