use activity_store::{FilterKey, FilterType, ProfileFilter};
use axum::extract::{Path, State};
use axum::Json;
use serde::Deserialize;

use crate::auth::{require_owner, AuthenticatedUser};
use crate::error::AppError;
use crate::state::AppState;

async fn owned_profile_for_filters(state: &AppState, user: &AuthenticatedUser, profile_id: &str) -> Result<(), AppError> {
    let profile = state
        .directory
        .get_profile(profile_id)
        .await?
        .ok_or_else(|| AppError::NotFound("resource not found: profile".to_string()))?;
    require_owner(user, &profile.user_id)
}

/// `GET /profiles/:id/filters`.
pub async fn list_filters(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(profile_id): Path<String>,
) -> Result<Json<Vec<ProfileFilter>>, AppError> {
    owned_profile_for_filters(&state, &user, &profile_id).await?;
    Ok(Json(state.directory.list_filters_for_profile(&profile_id).await?))
}

#[derive(Debug, Deserialize)]
pub struct CreateFilterRequest {
    pub account_id: String,
    pub filter_type: FilterType,
    pub filter_key: FilterKey,
    pub filter_value: String,
}

/// `POST /profiles/:id/filters`: 404 if the referenced account
/// doesn't exist, 403 if it belongs to another user's profile.
pub async fn create_filter(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(profile_id): Path<String>,
    Json(body): Json<CreateFilterRequest>,
) -> Result<(axum::http::StatusCode, Json<ProfileFilter>), AppError> {
    owned_profile_for_filters(&state, &user, &profile_id).await?;

    let (account, owner) = state
        .directory
        .get_account_with_owner(&body.account_id)
        .await?
        .ok_or_else(|| AppError::NotFound("resource not found: account".to_string()))?;
    require_owner(&user, &owner.id)?;

    let filter = ProfileFilter {
        id: uuid::Uuid::new_v4().to_string(),
        profile_id,
        account_id: account.id,
        filter_type: body.filter_type,
        filter_key: body.filter_key,
        filter_value: body.filter_value,
    };
    let created = state.directory.create_filter(filter).await?;
    Ok((axum::http::StatusCode::CREATED, Json(created)))
}

/// `DELETE /profiles/:id/filters/:filter_id`.
pub async fn delete_filter(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path((profile_id, filter_id)): Path<(String, String)>,
) -> Result<axum::http::StatusCode, AppError> {
    owned_profile_for_filters(&state, &user, &profile_id).await?;

    let exists = state
        .directory
        .list_filters_for_profile(&profile_id)
        .await?
        .into_iter()
        .any(|f| f.id == filter_id);
    if !exists {
        return Err(AppError::NotFound("resource not found: filter".to_string()));
    }

    state.directory.delete_filter(&filter_id).await?;
    Ok(axum::http::StatusCode::NO_CONTENT)
}
