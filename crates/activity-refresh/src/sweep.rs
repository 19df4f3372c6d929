use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use activity_crypto::TokenCipher;
use activity_ingest::{ingest_account, AccountLocks, IngestStatus};
use activity_rate_limit::Gate;
use activity_store::{Account, Backend, Directory};
use tokio_util::sync::CancellationToken;

use crate::error::RefreshError;
use crate::providers::ProviderRegistry;
use crate::single::reassemble_profile;

/// Default interval between scheduled sweeps.
pub const DEFAULT_SWEEP_INTERVAL: Duration = Duration::from_secs(15 * 60);

/// Accounts fetched per page while enumerating active accounts, so a
/// sweep never has to hold the whole directory in memory at once.
const SWEEP_PAGE_SIZE: usize = 200;

/// Tally from one pass of [`run_sweep`]. Per-account failures are
/// logged and counted, never propagated — a single bad account must not
/// abort the sweep.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepReport {
    pub total: usize,
    pub ingested: usize,
    pub skipped: usize,
    pub failed: usize,
    pub profiles_reassembled: usize,
}

/// One pass of the scheduled sweep: every active account across every
/// user, fetched page by page, gated and ingested; once a profile's
/// accounts are all processed and at least one produced a new snapshot,
/// its timeline is reassembled once.
pub async fn run_sweep(
    directory: Arc<dyn Directory>,
    backend: Arc<dyn Backend>,
    cipher: &Arc<TokenCipher>,
    gate: &Gate,
    providers: &ProviderRegistry,
    locks: &AccountLocks,
) -> Result<SweepReport, RefreshError> {
    let mut by_profile: HashMap<String, Vec<Account>> = HashMap::new();
    let mut cursor: Option<String> = None;
    loop {
        let (page, next_cursor) = directory
            .list_active_accounts_page(cursor.as_deref(), SWEEP_PAGE_SIZE)
            .await?;
        for account in page {
            by_profile.entry(account.profile_id.clone()).or_default().push(account);
        }
        match next_cursor {
            Some(c) => cursor = Some(c),
            None => break,
        }
    }

    let mut report = SweepReport::default();

    for (profile_id, accounts) in by_profile {
        let mut any_new_snapshot = false;

        for account in &accounts {
            report.total += 1;

            let provider = match providers.get(account.platform) {
                Some(provider) => provider,
                None => {
                    report.failed += 1;
                    tracing::warn!(account_id = %account.id, platform = %account.platform, "sweep: no provider registered");
                    continue;
                }
            };

            match ingest_account(account, cipher.as_ref(), gate, provider.as_ref(), backend.clone(), locks).await {
                Ok(IngestStatus::Ingested { .. }) => {
                    report.ingested += 1;
                    any_new_snapshot = true;
                }
                Ok(IngestStatus::Skipped) => {
                    report.skipped += 1;
                }
                Err(err) => {
                    report.failed += 1;
                    tracing::warn!(account_id = %account.id, error = %err, "sweep: per-account ingest failed");
                }
            }
        }

        if any_new_snapshot {
            match reassemble_profile(directory.as_ref(), backend.clone(), &profile_id).await {
                Ok(()) => report.profiles_reassembled += 1,
                Err(err) => tracing::warn!(profile_id, error = %err, "sweep: timeline reassembly failed"),
            }
        }
    }

    Ok(report)
}

/// Drives [`run_sweep`] on a `tokio::time::interval`, stopping when `cancel`
/// fires. The in-flight sweep pass is allowed to finish (its merges
/// complete their current `put`s) before the loop exits.
pub async fn run_sweep_loop(
    directory: Arc<dyn Directory>,
    backend: Arc<dyn Backend>,
    cipher: Arc<TokenCipher>,
    gate: Gate,
    providers: ProviderRegistry,
    locks: AccountLocks,
    interval: Duration,
    cancel: CancellationToken,
) {
    let mut ticker = tokio::time::interval(interval);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("scheduled sweep loop cancelled");
                break;
            }
            _ = ticker.tick() => {
                match run_sweep(directory.clone(), backend.clone(), &cipher, &gate, &providers, &locks).await {
                    Ok(report) => tracing::info!(
                        total = report.total,
                        ingested = report.ingested,
                        skipped = report.skipped,
                        failed = report.failed,
                        profiles_reassembled = report.profiles_reassembled,
                        "scheduled sweep completed"
                    ),
                    Err(err) => tracing::error!(error = %err, "scheduled sweep aborted"),
                }
            }
        }
    }
}
