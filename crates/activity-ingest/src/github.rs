use std::collections::HashSet;
use std::sync::Arc;

use activity_core::StoreId;
use activity_providers::{RawGithub, RawGithubCommit, RawGithubMeta, RawGithubPr};
use activity_store::{Backend, PutOptions, Store, StoreError};

use crate::merge::merge_by_key;
use crate::shard::ShardStat;

/// Merge-and-put GitHub's meta store plus one commits/one PRs store per
/// tracked repo.
pub async fn ingest_github(
    backend: Arc<dyn Backend>,
    account_id: &str,
    incoming: RawGithub,
) -> Result<Vec<ShardStat>, StoreError> {
    let mut stats = Vec::new();

    stats.push(put_meta(backend.clone(), account_id, incoming.meta).await?);

    for (repo, activity) in incoming.repos {
        let Some((owner, repo_name)) = repo.split_once('/') else {
            continue;
        };
        stats.push(put_commits(backend.clone(), account_id, owner, repo_name, activity.commits).await?);
        stats.push(put_prs(backend.clone(), account_id, owner, repo_name, activity.prs).await?);
    }

    Ok(stats)
}

async fn put_meta(backend: Arc<dyn Backend>, account_id: &str, incoming: RawGithubMeta) -> Result<ShardStat, StoreError> {
    let store_id = StoreId::GithubMeta { account: account_id.to_string() }.to_string();
    let store: Store<RawGithubMeta> = Store::new(backend, store_id.clone());

    let existing = store.get_latest().await?.map(|s| s.data);
    let (merged, new_count) = match existing {
        None => {
            let new_count = incoming.tracked_repos.len();
            (incoming, new_count)
        }
        Some(existing) => {
            let known: HashSet<String> = existing.tracked_repos.iter().cloned().collect();
            let mut tracked_repos = existing.tracked_repos;
            let mut new_count = 0;
            for repo in incoming.tracked_repos {
                if !known.contains(&repo) {
                    tracked_repos.push(repo);
                    new_count += 1;
                }
            }
            (
                RawGithubMeta {
                    login: incoming.login,
                    tracked_repos,
                },
                new_count,
            )
        }
    };

    let total = merged.tracked_repos.len();
    let meta = store.put(&merged, PutOptions::default()).await?;
    Ok(ShardStat {
        store_id,
        version: meta.version,
        total,
        new_count,
    })
}

async fn put_commits(
    backend: Arc<dyn Backend>,
    account_id: &str,
    owner: &str,
    repo: &str,
    incoming: Vec<RawGithubCommit>,
) -> Result<ShardStat, StoreError> {
    let store_id = StoreId::GithubCommits {
        account: account_id.to_string(),
        owner: owner.to_string(),
        repo: repo.to_string(),
    }
    .to_string();
    let store: Store<Vec<RawGithubCommit>> = Store::new(backend, store_id.clone());

    let existing = store.get_latest().await?.map(|s| s.data).unwrap_or_default();
    // Discovery order preserved, new items appended; commits never resort.
    let (merged, new_count) = merge_by_key(existing, incoming, |c| c.sha.clone());
    let total = merged.len();
    let meta = store.put(&merged, PutOptions::default()).await?;
    Ok(ShardStat {
        store_id,
        version: meta.version,
        total,
        new_count,
    })
}

async fn put_prs(
    backend: Arc<dyn Backend>,
    account_id: &str,
    owner: &str,
    repo: &str,
    incoming: Vec<RawGithubPr>,
) -> Result<ShardStat, StoreError> {
    let store_id = StoreId::GithubPrs {
        account: account_id.to_string(),
        owner: owner.to_string(),
        repo: repo.to_string(),
    }
    .to_string();
    let store: Store<Vec<RawGithubPr>> = Store::new(backend, store_id.clone());

    let existing = store.get_latest().await?.map(|s| s.data).unwrap_or_default();
    let (merged, new_count) = merge_by_key(existing, incoming, |pr| pr.number);
    let total = merged.len();
    let meta = store.put(&merged, PutOptions::default()).await?;
    Ok(ShardStat {
        store_id,
        version: meta.version,
        total,
        new_count,
    })
}
