mod connections;
mod credentials;
mod filters;
mod health;
mod profiles;
mod timeline;

use axum::routing::{get, patch, post};
use axum::Router;

use crate::state::AppState;

/// Builds the `/api/v1` router. Auth and ownership checks live in
/// each handler via the [`crate::auth::AuthenticatedUser`] extractor.
pub fn build_router(state: AppState) -> Router {
    let api = Router::new()
        .route("/timeline/{user_id}", get(timeline::get_timeline))
        .route("/timeline/{user_id}/raw/{platform}", get(timeline::get_raw))
        .route("/connections", get(connections::list_connections).post(connections::create_connection))
        .route(
            "/connections/{account_id}",
            patch(connections::update_connection).delete(connections::delete_connection),
        )
        .route("/connections/{account_id}/refresh", post(connections::refresh_connection))
        .route("/connections/refresh-all", post(connections::refresh_all_connections))
        .route(
            "/connections/{account_id}/settings",
            get(connections::get_settings).put(connections::put_settings),
        )
        .route("/connections/{account_id}/repos", get(connections::get_repos))
        .route("/connections/{account_id}/subreddits", get(connections::get_subreddits))
        .route("/profiles", get(profiles::list_profiles).post(profiles::create_profile))
        .route(
            "/profiles/{profile_id}",
            get(profiles::get_profile).patch(profiles::update_profile).delete(profiles::delete_profile),
        )
        .route("/profiles/{slug}/timeline", get(profiles::get_profile_timeline))
        .route(
            "/profiles/{profile_id}/filters",
            get(filters::list_filters).post(filters::create_filter),
        )
        .route("/profiles/{profile_id}/filters/{filter_id}", axum::routing::delete(filters::delete_filter))
        .route(
            "/credentials/{platform}",
            get(credentials::get_credentials).post(credentials::upsert_credentials).delete(credentials::delete_credentials),
        )
        .with_state(state);

    Router::new().route("/healthz", get(health::healthz)).nest("/api/v1", api)
}
