use activity_core::{Platform, StoreId};
use activity_refresh::{refresh_all_accounts, refresh_single_account, BulkRefreshOutcome, SingleRefreshStatus};
use activity_store::Account;
use axum::extract::{Path, Query, State};
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::auth::{require_owner, AuthenticatedUser};
use crate::error::AppError;
use crate::state::AppState;

/// Wire view of an [`Account`]. Tokens never round-trip through the
/// API in either direction once stored.
#[derive(Debug, Serialize)]
pub struct ConnectionView {
    pub id: String,
    pub profile_id: String,
    pub platform: Platform,
    pub platform_user_id: Option<String>,
    pub platform_username: Option<String>,
    pub token_expires_at: Option<DateTime<Utc>>,
    pub is_active: bool,
    pub last_fetched_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub settings: Option<serde_json::Value>,
}

impl ConnectionView {
    fn from_account(account: Account, settings: Option<serde_json::Value>) -> Self {
        Self {
            id: account.id,
            profile_id: account.profile_id,
            platform: account.platform,
            platform_user_id: account.platform_user_id,
            platform_username: account.platform_username,
            token_expires_at: account.token_expires_at,
            is_active: account.is_active,
            last_fetched_at: account.last_fetched_at,
            settings,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ListConnectionsQuery {
    pub profile_id: Option<String>,
    #[serde(default)]
    pub include_settings: bool,
}

/// `GET /connections?profile_id=&include_settings=`.
pub async fn list_connections(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Query(query): Query<ListConnectionsQuery>,
) -> Result<Json<Vec<ConnectionView>>, AppError> {
    let profile_id = query
        .profile_id
        .ok_or_else(|| AppError::BadRequest("profile_id is required".to_string()))?;

    let profile = state
        .directory
        .get_profile(&profile_id)
        .await?
        .ok_or_else(|| AppError::NotFound("resource not found: profile".to_string()))?;
    require_owner(&user, &profile.user_id)?;

    let accounts = state.directory.list_accounts_for_profile(&profile_id).await?;
    let mut views = Vec::with_capacity(accounts.len());
    for account in accounts {
        let settings = if query.include_settings {
            Some(state.directory.get_account_settings(&account.id).await?)
        } else {
            None
        };
        views.push(ConnectionView::from_account(account, settings));
    }
    Ok(Json(views))
}

#[derive(Debug, Deserialize)]
pub struct CreateConnectionRequest {
    pub profile_id: String,
    pub platform: Platform,
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub platform_user_id: Option<String>,
    pub platform_username: Option<String>,
    pub token_expires_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize)]
pub struct CreateConnectionResponse {
    pub account_id: String,
    pub profile_id: String,
}

/// `POST /connections`.
pub async fn create_connection(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(body): Json<CreateConnectionRequest>,
) -> Result<(axum::http::StatusCode, Json<CreateConnectionResponse>), AppError> {
    let profile = state
        .directory
        .get_profile(&body.profile_id)
        .await?
        .ok_or_else(|| AppError::NotFound("resource not found: profile".to_string()))?;
    require_owner(&user, &profile.user_id)?;

    let access_token_encrypted = state.cipher.encrypt(&body.access_token)?;
    let refresh_token_encrypted = body.refresh_token.as_deref().map(|t| state.cipher.encrypt(t)).transpose()?;

    let account = Account {
        id: uuid::Uuid::new_v4().to_string(),
        profile_id: body.profile_id.clone(),
        platform: body.platform,
        platform_user_id: body.platform_user_id,
        platform_username: body.platform_username,
        access_token_encrypted,
        refresh_token_encrypted,
        token_expires_at: body.token_expires_at,
        is_active: true,
        last_fetched_at: None,
    };

    let created = state.directory.create_account(account).await?;
    Ok((
        axum::http::StatusCode::CREATED,
        Json(CreateConnectionResponse {
            account_id: created.id,
            profile_id: created.profile_id,
        }),
    ))
}

async fn owned_account(state: &AppState, user: &AuthenticatedUser, account_id: &str) -> Result<Account, AppError> {
    let (account, owner) = state
        .directory
        .get_account_with_owner(account_id)
        .await?
        .ok_or_else(|| AppError::NotFound("resource not found: account".to_string()))?;
    require_owner(user, &owner.id)?;
    Ok(account)
}

#[derive(Debug, Deserialize)]
pub struct UpdateConnectionRequest {
    pub is_active: bool,
}

/// `PATCH /connections/:account_id`.
pub async fn update_connection(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(account_id): Path<String>,
    Json(body): Json<UpdateConnectionRequest>,
) -> Result<Json<ConnectionView>, AppError> {
    let mut account = owned_account(&state, &user, &account_id).await?;
    account.is_active = body.is_active;
    let updated = state.directory.update_account(account).await?;
    Ok(Json(ConnectionView::from_account(updated, None)))
}

#[derive(Debug, Serialize)]
pub struct DeleteConnectionResponse {
    pub deleted: bool,
    pub account_id: String,
    pub platform: Platform,
    pub deleted_stores: usize,
    pub affected_users: Vec<String>,
}

/// `DELETE /connections/:account_id`: cascades through every
/// platform-scoped store for this account, the rate-limit/settings rows,
/// and the account row itself, then queues timeline reassembly for every
/// affected user.
pub async fn delete_connection(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(account_id): Path<String>,
) -> Result<Json<DeleteConnectionResponse>, AppError> {
    let (account, owner) = state
        .directory
        .get_account_with_owner(&account_id)
        .await?
        .ok_or_else(|| AppError::NotFound("resource not found: account".to_string()))?;
    require_owner(&user, &owner.id)?;

    let store_ids = platform_store_ids(state.backend.clone(), &account).await?;
    let mut deleted_stores = 0usize;
    for store_id in &store_ids {
        deleted_stores += state.backend.delete_store(store_id).await? as usize;
    }

    state.directory.delete_account_settings(&account_id).await?;
    state.directory.delete_account(&account_id).await?;
    state.gate.forget(&account_id);

    let profile_id = account.profile_id.clone();
    let directory = state.directory.clone();
    let backend = state.backend.clone();
    state
        .background
        .spawn(Box::pin(async move {
            if let Ok(Some(profile)) = directory.get_profile(&profile_id).await {
                let window = activity_timeline::Window::default();
                if let Err(err) = activity_timeline::assemble_profile_timeline(directory.as_ref(), backend, &profile, window).await {
                    tracing::warn!(profile_id = %profile.id, error = %err, "timeline reassembly after connection delete failed");
                }
            }
        }))
        .await;

    Ok(Json(DeleteConnectionResponse {
        deleted: true,
        account_id: account.id,
        platform: account.platform,
        deleted_stores,
        affected_users: vec![owner.id],
    }))
}

/// Every store-id touched by this account, including GitHub's per-repo
/// commits/PRs shards discovered from its meta store's `tracked_repos`
/// for GitHub accounts.
async fn platform_store_ids(backend: std::sync::Arc<dyn activity_store::Backend>, account: &Account) -> Result<Vec<String>, AppError> {
    let id = account.id.clone();
    match account.platform {
        Platform::Github => {
            let mut ids = vec![StoreId::GithubMeta { account: id.clone() }.to_string()];
            let meta_store: activity_store::Store<activity_providers::RawGithubMeta> =
                activity_store::Store::new(backend, ids[0].clone());
            if let Some(meta) = meta_store.get_latest().await? {
                for repo in meta.data.tracked_repos {
                    let Some((owner, repo_name)) = repo.split_once('/') else {
                        continue;
                    };
                    ids.push(
                        StoreId::GithubCommits {
                            account: id.clone(),
                            owner: owner.to_string(),
                            repo: repo_name.to_string(),
                        }
                        .to_string(),
                    );
                    ids.push(
                        StoreId::GithubPrs {
                            account: id.clone(),
                            owner: owner.to_string(),
                            repo: repo_name.to_string(),
                        }
                        .to_string(),
                    );
                }
            }
            Ok(ids)
        }
        Platform::Reddit => Ok(vec![
            StoreId::RedditMeta { account: id.clone() }.to_string(),
            StoreId::RedditPosts { account: id.clone() }.to_string(),
            StoreId::RedditComments { account: id }.to_string(),
        ]),
        Platform::Twitter => Ok(vec![
            StoreId::TwitterMeta { account: id.clone() }.to_string(),
            StoreId::TwitterTweets { account: id }.to_string(),
        ]),
        Platform::Bluesky | Platform::Youtube | Platform::Devpad => Ok(vec![StoreId::Raw {
            platform: account.platform.as_str().to_string(),
            account: id,
        }
        .to_string()]),
    }
}

#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RefreshResponse {
    Processing { platform: Platform },
    Refreshed,
    Skipped,
}

impl From<SingleRefreshStatus> for RefreshResponse {
    fn from(status: SingleRefreshStatus) -> Self {
        match status {
            SingleRefreshStatus::Processing { platform } => RefreshResponse::Processing { platform },
            SingleRefreshStatus::Refreshed => RefreshResponse::Refreshed,
            SingleRefreshStatus::Skipped => RefreshResponse::Skipped,
        }
    }
}

/// `POST /connections/:account_id/refresh`.
pub async fn refresh_connection(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(account_id): Path<String>,
) -> Result<Json<RefreshResponse>, AppError> {
    let status = refresh_single_account(
        state.directory.clone(),
        state.backend.clone(),
        &state.cipher,
        &state.gate,
        &state.providers,
        &state.locks,
        state.background.as_ref(),
        &user.user_id,
        &account_id,
    )
    .await?;
    Ok(Json(status.into()))
}

#[derive(Debug, Serialize)]
pub struct BulkRefreshResponse {
    pub status: &'static str,
    pub succeeded: usize,
    pub failed: usize,
    pub total: usize,
    pub queued_by_platform: std::collections::BTreeMap<String, usize>,
}

impl From<BulkRefreshOutcome> for BulkRefreshResponse {
    fn from(outcome: BulkRefreshOutcome) -> Self {
        Self {
            status: match outcome.status {
                activity_refresh::BulkRefreshStatus::Processing => "processing",
                activity_refresh::BulkRefreshStatus::Completed => "completed",
            },
            succeeded: outcome.succeeded,
            failed: outcome.failed,
            total: outcome.total,
            queued_by_platform: outcome
                .queued_by_platform
                .into_iter()
                .map(|(platform, count)| (platform.as_str().to_string(), count))
                .collect(),
        }
    }
}

/// `POST /connections/refresh-all`.
pub async fn refresh_all_connections(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<Json<BulkRefreshResponse>, AppError> {
    let outcome = refresh_all_accounts(
        state.directory.clone(),
        state.backend.clone(),
        &state.cipher,
        &state.gate,
        &state.providers,
        &state.locks,
        state.background.as_ref(),
        &user.user_id,
    )
    .await?;
    Ok(Json(outcome.into()))
}

/// `GET /connections/:account_id/settings`.
pub async fn get_settings(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(account_id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    owned_account(&state, &user, &account_id).await?;
    Ok(Json(state.directory.get_account_settings(&account_id).await?))
}

/// `PUT /connections/:account_id/settings`: upserts each key.
pub async fn put_settings(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(account_id): Path<String>,
    Json(patch): Json<serde_json::Value>,
) -> Result<Json<serde_json::Value>, AppError> {
    owned_account(&state, &user, &account_id).await?;
    Ok(Json(state.directory.upsert_account_settings(&account_id, patch).await?))
}

/// `GET /connections/:account_id/repos`: GitHub's tracked-repo list.
pub async fn get_repos(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(account_id): Path<String>,
) -> Result<Json<Vec<String>>, AppError> {
    let account = owned_account(&state, &user, &account_id).await?;
    if account.platform != Platform::Github {
        return Err(AppError::BadRequest("repos is only meaningful for github connections".to_string()));
    }

    let store_id = StoreId::GithubMeta { account: account_id }.to_string();
    let store: activity_store::Store<activity_providers::RawGithubMeta> = activity_store::Store::new(state.backend.clone(), store_id);
    let repos = store.get_latest().await?.map(|s| s.data.tracked_repos).unwrap_or_default();
    Ok(Json(repos))
}

/// `GET /connections/:account_id/subreddits`: distinct subreddits
/// seen in the account's latest posts snapshot — Reddit's meta store
/// carries only sync bookkeeping (no subreddit list of its own), so the
/// posts shard is the closest thing to a tracked-subreddit index.
pub async fn get_subreddits(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(account_id): Path<String>,
) -> Result<Json<Vec<String>>, AppError> {
    let account = owned_account(&state, &user, &account_id).await?;
    if account.platform != Platform::Reddit {
        return Err(AppError::BadRequest("subreddits is only meaningful for reddit connections".to_string()));
    }

    let store_id = StoreId::RedditPosts { account: account_id }.to_string();
    let store: activity_store::Store<Vec<activity_providers::RawSocialPost>> = activity_store::Store::new(state.backend.clone(), store_id);
    let posts = store.get_latest().await?.map(|s| s.data).unwrap_or_default();
    let mut subreddits: Vec<String> = posts.into_iter().filter_map(|p| p.subreddit).collect();
    subreddits.sort();
    subreddits.dedup();
    Ok(Json(subreddits))
}
