use std::collections::HashMap;
use std::sync::Arc;

use activity_core::{StoreId, TimelineItem};
use activity_normalize::{normalize_bluesky, normalize_devpad, normalize_github, normalize_reddit, normalize_twitter, normalize_youtube};
use activity_providers::{
    RawBluesky, RawDevpad, RawGithub, RawGithubCommit, RawGithubMeta, RawGithubPr, RawGithubRepoActivity, RawReddit,
    RawRedditComment, RawSocialPost, RawTwitter, RawYoutube,
};
use activity_store::{Account, Backend, ParentRef, Store};
use activity_core::Platform;

use crate::error::TimelineError;

/// Dispatches to the right platform loader for `account`.
pub async fn load_account(backend: Arc<dyn Backend>, account: &Account) -> Result<LoadedAccount, TimelineError> {
    match account.platform {
        Platform::Github => load_github(backend, &account.id).await,
        Platform::Reddit => load_reddit(backend, &account.id).await,
        Platform::Twitter => load_twitter(backend, &account.id).await,
        Platform::Bluesky => load_bluesky(backend, &account.id).await,
        Platform::Youtube => load_youtube(backend, &account.id).await,
        Platform::Devpad => load_devpad(backend, &account.id).await,
    }
}

/// One account's normalized items plus the source-snapshot parent refs
/// they were derived from.
pub struct LoadedAccount {
    pub items: Vec<TimelineItem>,
    pub parents: Vec<ParentRef>,
}

fn parent(store_id: impl Into<String>, version: impl Into<String>, role: &str) -> ParentRef {
    ParentRef {
        store_id: store_id.into(),
        version: version.into(),
        role: role.to_string(),
    }
}

/// Loads and normalizes the latest per-platform data for one GitHub
/// account: meta plus every `(owner,repo)` commits/PRs store listed in
/// meta.
pub async fn load_github(backend: Arc<dyn Backend>, account_id: &str) -> Result<LoadedAccount, TimelineError> {
    let meta_store_id = StoreId::GithubMeta { account: account_id.to_string() }.to_string();
    let meta_store: Store<RawGithubMeta> = Store::new(backend.clone(), meta_store_id.clone());
    let Some(meta_snapshot) = meta_store.get_latest().await? else {
        return Ok(LoadedAccount { items: Vec::new(), parents: Vec::new() });
    };

    let mut parents = vec![parent(&meta_store_id, &meta_snapshot.meta.version, "meta")];
    let mut repos: HashMap<String, RawGithubRepoActivity> = HashMap::new();

    for repo in &meta_snapshot.data.tracked_repos {
        let Some((owner, repo_name)) = repo.split_once('/') else {
            continue;
        };

        let commits_store_id = StoreId::GithubCommits {
            account: account_id.to_string(),
            owner: owner.to_string(),
            repo: repo_name.to_string(),
        }
        .to_string();
        let commits_store: Store<Vec<RawGithubCommit>> = Store::new(backend.clone(), commits_store_id.clone());
        let commits = if let Some(snap) = commits_store.get_latest().await? {
            parents.push(parent(&commits_store_id, &snap.meta.version, "commits"));
            snap.data
        } else {
            Vec::new()
        };

        let prs_store_id = StoreId::GithubPrs {
            account: account_id.to_string(),
            owner: owner.to_string(),
            repo: repo_name.to_string(),
        }
        .to_string();
        let prs_store: Store<Vec<RawGithubPr>> = Store::new(backend.clone(), prs_store_id.clone());
        let prs = if let Some(snap) = prs_store.get_latest().await? {
            parents.push(parent(&prs_store_id, &snap.meta.version, "prs"));
            snap.data
        } else {
            Vec::new()
        };

        repos.insert(repo.clone(), RawGithubRepoActivity { commits, prs });
    }

    let raw = RawGithub {
        meta: meta_snapshot.data,
        repos,
    };
    Ok(LoadedAccount {
        items: normalize_github(&raw),
        parents,
    })
}

/// Reddit's loader: posts+comments; meta is not part of the loader's
/// output for this platform since it carries no normalizable data.
pub async fn load_reddit(backend: Arc<dyn Backend>, account_id: &str) -> Result<LoadedAccount, TimelineError> {
    let posts_store_id = StoreId::RedditPosts { account: account_id.to_string() }.to_string();
    let posts_store: Store<Vec<RawSocialPost>> = Store::new(backend.clone(), posts_store_id.clone());
    let comments_store_id = StoreId::RedditComments { account: account_id.to_string() }.to_string();
    let comments_store: Store<Vec<RawRedditComment>> = Store::new(backend.clone(), comments_store_id.clone());

    let mut parents = Vec::new();
    let posts = if let Some(snap) = posts_store.get_latest().await? {
        parents.push(parent(&posts_store_id, &snap.meta.version, "posts"));
        snap.data
    } else {
        Vec::new()
    };
    let comments = if let Some(snap) = comments_store.get_latest().await? {
        parents.push(parent(&comments_store_id, &snap.meta.version, "comments"));
        snap.data
    } else {
        Vec::new()
    };

    let raw = RawReddit { posts, comments };
    Ok(LoadedAccount {
        items: normalize_reddit(&raw),
        parents,
    })
}

/// Twitter's loader: tweets+meta — unlike Reddit, the meta store is
/// listed as a source even though it contributes no items.
pub async fn load_twitter(backend: Arc<dyn Backend>, account_id: &str) -> Result<LoadedAccount, TimelineError> {
    let tweets_store_id = StoreId::TwitterTweets { account: account_id.to_string() }.to_string();
    let tweets_store: Store<Vec<RawSocialPost>> = Store::new(backend.clone(), tweets_store_id.clone());
    let meta_store_id = StoreId::TwitterMeta { account: account_id.to_string() }.to_string();
    // Only the snapshot's version is needed for lineage, so avoid coupling
    // to activity-ingest's `SyncMeta` payload type: peek the index directly.
    let meta_store: Store<serde_json::Value> = Store::new(backend.clone(), meta_store_id.clone());

    let mut parents = Vec::new();
    let tweets = if let Some(snap) = tweets_store.get_latest().await? {
        parents.push(parent(&tweets_store_id, &snap.meta.version, "tweets"));
        snap.data
    } else {
        Vec::new()
    };
    if let Some(latest_meta) = meta_store.list().await?.into_iter().next() {
        parents.push(parent(&meta_store_id, &latest_meta.version, "meta"));
    }

    let raw = RawTwitter { tweets };
    Ok(LoadedAccount {
        items: normalize_twitter(&raw),
        parents,
    })
}

/// Bluesky/YouTube/Devpad each keep a single `raw/<platform>/<account>`
/// shard rather than a per-entity one; the timeline loader mirrors that.
pub async fn load_bluesky(backend: Arc<dyn Backend>, account_id: &str) -> Result<LoadedAccount, TimelineError> {
    let store_id = StoreId::Raw {
        platform: "bluesky".to_string(),
        account: account_id.to_string(),
    }
    .to_string();
    let store: Store<RawBluesky> = Store::new(backend, store_id.clone());
    let Some(snap) = store.get_latest().await? else {
        return Ok(LoadedAccount { items: Vec::new(), parents: Vec::new() });
    };
    Ok(LoadedAccount {
        items: normalize_bluesky(&snap.data),
        parents: vec![parent(&store_id, &snap.meta.version, "raw")],
    })
}

pub async fn load_youtube(backend: Arc<dyn Backend>, account_id: &str) -> Result<LoadedAccount, TimelineError> {
    let store_id = StoreId::Raw {
        platform: "youtube".to_string(),
        account: account_id.to_string(),
    }
    .to_string();
    let store: Store<RawYoutube> = Store::new(backend, store_id.clone());
    let Some(snap) = store.get_latest().await? else {
        return Ok(LoadedAccount { items: Vec::new(), parents: Vec::new() });
    };
    Ok(LoadedAccount {
        items: normalize_youtube(&snap.data),
        parents: vec![parent(&store_id, &snap.meta.version, "raw")],
    })
}

pub async fn load_devpad(backend: Arc<dyn Backend>, account_id: &str) -> Result<LoadedAccount, TimelineError> {
    let store_id = StoreId::Raw {
        platform: "devpad".to_string(),
        account: account_id.to_string(),
    }
    .to_string();
    let store: Store<RawDevpad> = Store::new(backend, store_id.clone());
    let Some(snap) = store.get_latest().await? else {
        return Ok(LoadedAccount { items: Vec::new(), parents: Vec::new() });
    };
    Ok(LoadedAccount {
        items: normalize_devpad(&snap.data),
        parents: vec![parent(&store_id, &snap.meta.version, "raw")],
    })
}
