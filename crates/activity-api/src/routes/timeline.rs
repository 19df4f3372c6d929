use std::str::FromStr;

use activity_core::{Platform, StoreId, TimelinePayload};
use activity_store::Store;
use axum::extract::{Path, Query, State};
use axum::Json;
use chrono::NaiveDate;
use serde::Deserialize;

use crate::auth::{require_owner, AuthenticatedUser};
use crate::error::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct TimelineQuery {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

/// `GET /timeline/:user_id`.
pub async fn get_timeline(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(user_id): Path<String>,
    Query(query): Query<TimelineQuery>,
) -> Result<Json<TimelinePayload>, AppError> {
    if user.user_id != user_id {
        return Err(AppError::Forbidden("Cannot access other user timelines".to_string()));
    }

    let store_id = StoreId::Timeline { user: user_id.clone() }.to_string();
    let store: Store<TimelinePayload> = Store::new(state.backend.clone(), store_id);
    let snapshot = store
        .get_latest()
        .await?
        .ok_or_else(|| AppError::NotFound("Resource not found: timeline".to_string()))?;

    let mut payload = snapshot.data;
    if query.from.is_some() || query.to.is_some() {
        payload.groups.retain(|g| {
            query.from.map(|from| g.date >= from).unwrap_or(true) && query.to.map(|to| g.date <= to).unwrap_or(true)
        });
    }

    Ok(Json(payload))
}

#[derive(Debug, Deserialize)]
pub struct RawQuery {
    pub account_id: Option<String>,
}

/// `GET /timeline/:user_id/raw/:platform?account_id=`.
///
/// Each platform has a different number of shards; this route surfaces
/// the one shard that best represents
/// "the raw snapshot" for that platform — GitHub's `meta` shard (which
/// carries the tracked-repo list), Reddit's `posts` shard, Twitter's
/// `tweets` shard, and the single `raw/<platform>/<account>` shard for
/// Bluesky/YouTube/Devpad.
pub async fn get_raw(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path((user_id, platform)): Path<(String, String)>,
    Query(query): Query<RawQuery>,
) -> Result<Json<serde_json::Value>, AppError> {
    require_owner(&user, &user_id)?;

    let account_id = query
        .account_id
        .ok_or_else(|| AppError::BadRequest("account_id is required".to_string()))?;

    let platform = Platform::from_str(&platform).map_err(|_| AppError::BadRequest(format!("unknown platform: {platform}")))?;

    let store_id = match platform {
        Platform::Github => StoreId::GithubMeta { account: account_id }.to_string(),
        Platform::Reddit => StoreId::RedditPosts { account: account_id }.to_string(),
        Platform::Twitter => StoreId::TwitterTweets { account: account_id }.to_string(),
        Platform::Bluesky | Platform::Youtube | Platform::Devpad => StoreId::Raw {
            platform: platform.as_str().to_string(),
            account: account_id,
        }
        .to_string(),
    };

    let store: Store<serde_json::Value> = Store::new(state.backend.clone(), store_id);
    let snapshot = store
        .get_latest()
        .await?
        .ok_or_else(|| AppError::NotFound("Resource not found: raw snapshot".to_string()))?;

    Ok(Json(snapshot.data))
}
