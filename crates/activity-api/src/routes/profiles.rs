use activity_store::Profile;
use axum::extract::{Path, Query, State};
use axum::Json;
use chrono::NaiveDate;
use serde::Deserialize;

use crate::auth::{require_owner, AuthenticatedUser};
use crate::error::AppError;
use crate::state::AppState;

/// Lowercase alphanumeric + `-`, 3+ chars.
fn validate_slug(slug: &str) -> Result<(), AppError> {
    if slug.len() < 3 || !slug.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-') {
        return Err(AppError::BadRequest(format!(
            "slug must be lowercase alphanumeric and '-', at least 3 characters: {slug}"
        )));
    }
    Ok(())
}

#[derive(Debug, Deserialize)]
pub struct CreateProfileRequest {
    pub slug: String,
    pub name: String,
    pub description: Option<String>,
    pub theme: Option<String>,
}

/// `POST /profiles`.
pub async fn create_profile(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(body): Json<CreateProfileRequest>,
) -> Result<(axum::http::StatusCode, Json<Profile>), AppError> {
    validate_slug(&body.slug)?;

    let profile = Profile {
        id: uuid::Uuid::new_v4().to_string(),
        user_id: user.user_id,
        slug: body.slug,
        name: body.name,
        description: body.description,
        theme: body.theme,
    };
    let created = state.directory.create_profile(profile).await.map_err(|e| match e {
        activity_store::DirectoryError::Conflict(msg) => AppError::Conflict(format!("slug_taken: {msg}")),
        other => other.into(),
    })?;
    Ok((axum::http::StatusCode::CREATED, Json(created)))
}

/// `GET /profiles`: every profile the caller owns.
pub async fn list_profiles(State(state): State<AppState>, user: AuthenticatedUser) -> Result<Json<Vec<Profile>>, AppError> {
    Ok(Json(state.directory.list_profiles_for_user(&user.user_id).await?))
}

async fn owned_profile(state: &AppState, user: &AuthenticatedUser, profile_id: &str) -> Result<Profile, AppError> {
    let profile = state
        .directory
        .get_profile(profile_id)
        .await?
        .ok_or_else(|| AppError::NotFound("resource not found: profile".to_string()))?;
    require_owner(user, &profile.user_id)?;
    Ok(profile)
}

/// `GET /profiles/:id`.
pub async fn get_profile(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(profile_id): Path<String>,
) -> Result<Json<Profile>, AppError> {
    Ok(Json(owned_profile(&state, &user, &profile_id).await?))
}

#[derive(Debug, Deserialize)]
pub struct UpdateProfileRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub theme: Option<String>,
}

/// `PATCH /profiles/:id`.
pub async fn update_profile(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(profile_id): Path<String>,
    Json(body): Json<UpdateProfileRequest>,
) -> Result<Json<Profile>, AppError> {
    let mut profile = owned_profile(&state, &user, &profile_id).await?;
    if let Some(name) = body.name {
        profile.name = name;
    }
    if body.description.is_some() {
        profile.description = body.description;
    }
    if body.theme.is_some() {
        profile.theme = body.theme;
    }
    let updated = state.directory.update_profile(profile).await.map_err(|e| match e {
        activity_store::DirectoryError::Conflict(msg) => AppError::Conflict(format!("slug_taken: {msg}")),
        other => other.into(),
    })?;
    Ok(Json(updated))
}

/// `DELETE /profiles/:id`: cascades to accounts and filters per
/// [`activity_store::Directory::delete_profile`].
pub async fn delete_profile(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(profile_id): Path<String>,
) -> Result<axum::http::StatusCode, AppError> {
    owned_profile(&state, &user, &profile_id).await?;
    state.directory.delete_profile(&profile_id).await?;
    Ok(axum::http::StatusCode::NO_CONTENT)
}

#[derive(Debug, Deserialize)]
pub struct ProfileTimelineQuery {
    pub limit: Option<usize>,
    pub before: Option<NaiveDate>,
}

/// `GET /profiles/:slug/timeline?limit=&before=`.
pub async fn get_profile_timeline(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(slug): Path<String>,
    Query(query): Query<ProfileTimelineQuery>,
) -> Result<Json<activity_core::TimelinePayload>, AppError> {
    if let Some(limit) = query.limit {
        if !(1..=200).contains(&limit) {
            return Err(AppError::BadRequest("limit must be between 1 and 200 inclusive".to_string()));
        }
    }

    let profile = state
        .directory
        .get_profile_by_slug(&user.user_id, &slug)
        .await?
        .ok_or_else(|| AppError::NotFound("resource not found: profile".to_string()))?;

    let window = activity_timeline::Window {
        before: query.before,
        limit: query.limit,
    };
    let snapshot = activity_timeline::assemble_profile_timeline(state.directory.as_ref(), state.backend.clone(), &profile, window).await?;
    Ok(Json(snapshot.data))
}
