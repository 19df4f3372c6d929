use axum::extract::{FromRef, FromRequestParts};
use axum::http::request::Parts;

use crate::error::AppError;
use crate::state::AppState;

/// The user an `Authorization: Bearer <key>` header resolved to.
/// Extracting this from a request performs the full auth check: missing
/// header, unknown key, both surface as 401 before the handler ever runs.
pub struct AuthenticatedUser {
    pub user_id: String,
}

/// `sha256`-free key hashing: `blake3`, already the workspace's one
/// content-hashing crate (grounded on `dpc-rostra`, per DESIGN.md), used
/// here for the `key_hash` index lookup instead of pulling in a second
/// hash crate for a single column.
pub fn hash_api_key(raw_key: &str) -> String {
    blake3::hash(raw_key.as_bytes()).to_hex().to_string()
}

impl<S> FromRequestParts<S> for AuthenticatedUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);

        let header = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| AppError::Unauthorized("Authentication required".to_string()))?;

        let raw_key = header
            .strip_prefix("Bearer ")
            .ok_or_else(|| AppError::Unauthorized("Authentication required".to_string()))?;

        let key_hash = hash_api_key(raw_key);
        let api_key = app_state
            .directory
            .get_api_key_by_hash(&key_hash)
            .await?
            .ok_or_else(|| AppError::Unauthorized("Authentication required".to_string()))?;

        app_state.directory.touch_api_key(&api_key.id).await?;

        Ok(AuthenticatedUser { user_id: api_key.user_id })
    }
}

/// 403 unless `user.user_id == owner_user_id`: the check every
/// connection/profile/filter/credential route runs before acting on
/// someone else's resource.
pub fn require_owner(user: &AuthenticatedUser, owner_user_id: &str) -> Result<(), AppError> {
    if user.user_id == owner_user_id {
        Ok(())
    } else {
        Err(AppError::Forbidden("not the owner of this resource".to_string()))
    }
}
