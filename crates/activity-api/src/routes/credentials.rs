use std::str::FromStr;

use activity_core::Platform;
use activity_store::PlatformCredentials;
use axum::extract::{Path, Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::auth::{require_owner, AuthenticatedUser};
use crate::error::AppError;
use crate::state::AppState;

/// Wire view of [`PlatformCredentials`] — the encrypted secret never
/// round-trips back out.
#[derive(Debug, Serialize)]
pub struct CredentialsView {
    pub id: String,
    pub profile_id: String,
    pub platform: Platform,
    pub client_id: String,
    pub redirect_uri: Option<String>,
    pub reddit_username: Option<String>,
    pub is_verified: bool,
    pub metadata: serde_json::Value,
}

impl From<PlatformCredentials> for CredentialsView {
    fn from(c: PlatformCredentials) -> Self {
        Self {
            id: c.id,
            profile_id: c.profile_id,
            platform: c.platform,
            client_id: c.client_id,
            redirect_uri: c.redirect_uri,
            reddit_username: c.reddit_username,
            is_verified: c.is_verified,
            metadata: c.metadata,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CredentialsQuery {
    pub profile_id: Option<String>,
}

async fn owned_profile(state: &AppState, user: &AuthenticatedUser, profile_id: &str) -> Result<(), AppError> {
    let profile = state
        .directory
        .get_profile(profile_id)
        .await?
        .ok_or_else(|| AppError::NotFound("resource not found: profile".to_string()))?;
    require_owner(user, &profile.user_id)
}

/// `GET /credentials/:platform?profile_id=`.
pub async fn get_credentials(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(platform): Path<String>,
    Query(query): Query<CredentialsQuery>,
) -> Result<Json<CredentialsView>, AppError> {
    let profile_id = query.profile_id.ok_or_else(|| AppError::BadRequest("profile_id is required".to_string()))?;
    owned_profile(&state, &user, &profile_id).await?;

    let platform = Platform::from_str(&platform).map_err(|_| AppError::BadRequest(format!("unknown platform: {platform}")))?;
    let creds = state
        .directory
        .get_platform_credentials(&profile_id, platform)
        .await?
        .ok_or_else(|| AppError::NotFound("resource not found: credentials".to_string()))?;
    Ok(Json(creds.into()))
}

#[derive(Debug, Deserialize)]
pub struct UpsertCredentialsRequest {
    pub profile_id: String,
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: Option<String>,
    pub reddit_username: Option<String>,
    #[serde(default)]
    pub metadata: serde_json::Value,
}

const MIN_CLIENT_ID_LEN: usize = 14;
const MIN_CLIENT_SECRET_LEN: usize = 20;

/// `POST /credentials/:platform`: Reddit requires `reddit_username`
/// plus longer `client_id`/`client_secret` than other platforms.
pub async fn upsert_credentials(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(platform): Path<String>,
    Json(body): Json<UpsertCredentialsRequest>,
) -> Result<(axum::http::StatusCode, Json<CredentialsView>), AppError> {
    owned_profile(&state, &user, &body.profile_id).await?;
    let platform = Platform::from_str(&platform).map_err(|_| AppError::BadRequest(format!("unknown platform: {platform}")))?;

    if body.client_id.len() < MIN_CLIENT_ID_LEN {
        return Err(AppError::BadRequest(format!("client_id must be at least {MIN_CLIENT_ID_LEN} characters")));
    }
    if body.client_secret.len() < MIN_CLIENT_SECRET_LEN {
        return Err(AppError::BadRequest(format!(
            "client_secret must be at least {MIN_CLIENT_SECRET_LEN} characters"
        )));
    }
    if platform == Platform::Reddit && body.reddit_username.as_deref().map(str::trim).unwrap_or("").is_empty() {
        return Err(AppError::BadRequest("reddit_username is required for the reddit platform".to_string()));
    }

    let existing_id = state
        .directory
        .get_platform_credentials(&body.profile_id, platform)
        .await?
        .map(|c| c.id);

    let creds = PlatformCredentials {
        id: existing_id.unwrap_or_else(|| uuid::Uuid::new_v4().to_string()),
        profile_id: body.profile_id,
        platform,
        client_id: body.client_id,
        client_secret_encrypted: state.cipher.encrypt(&body.client_secret)?,
        redirect_uri: body.redirect_uri,
        reddit_username: body.reddit_username,
        is_verified: false,
        metadata: body.metadata,
    };
    let upserted = state.directory.upsert_platform_credentials(creds).await?;
    Ok((axum::http::StatusCode::CREATED, Json(upserted.into())))
}

/// `DELETE /credentials/:platform?profile_id=`.
pub async fn delete_credentials(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(platform): Path<String>,
    Query(query): Query<CredentialsQuery>,
) -> Result<axum::http::StatusCode, AppError> {
    let profile_id = query.profile_id.ok_or_else(|| AppError::BadRequest("profile_id is required".to_string()))?;
    owned_profile(&state, &user, &profile_id).await?;
    let platform = Platform::from_str(&platform).map_err(|_| AppError::BadRequest(format!("unknown platform: {platform}")))?;

    state
        .directory
        .get_platform_credentials(&profile_id, platform)
        .await?
        .ok_or_else(|| AppError::NotFound("resource not found: credentials".to_string()))?;

    state.directory.delete_platform_credentials(&profile_id, platform).await?;
    Ok(axum::http::StatusCode::NO_CONTENT)
}
