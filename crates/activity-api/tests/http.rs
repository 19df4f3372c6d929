use std::sync::Arc;

use activity_crypto::TokenCipher;
use activity_ingest::AccountLocks;
use activity_rate_limit::Gate;
use activity_refresh::{InlineBackgroundTasks, ProviderRegistry};
use activity_store::{Directory, InMemoryBackend, InMemoryDirectory, User};
use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::{json, Value};
use tower::ServiceExt;

use activity_api::routes::build_router;
use activity_api::state::AppState;

async fn test_state() -> (AppState, String) {
    let directory: Arc<dyn Directory> = Arc::new(InMemoryDirectory::new());
    let backend = Arc::new(InMemoryBackend::new());
    let cipher = Arc::new(TokenCipher::new(&[9u8; 32]));

    let user = directory
        .create_user(User {
            id: uuid::Uuid::new_v4().to_string(),
            external_user_id: "ext-1".to_string(),
            email: Some("a@example.com".to_string()),
            name: Some("Ada".to_string()),
        })
        .await
        .unwrap();

    let raw_key = "test-key-0123456789";
    let api_key = activity_store::ApiKey {
        id: uuid::Uuid::new_v4().to_string(),
        user_id: user.id.clone(),
        key_hash: activity_api::auth::hash_api_key(raw_key),
        name: "test".to_string(),
        last_used_at: None,
    };
    directory.create_api_key(api_key).await.unwrap();

    let state = AppState {
        directory,
        backend,
        cipher,
        gate: Gate::new(),
        locks: AccountLocks::new(),
        providers: ProviderRegistry::new(),
        background: Arc::new(InlineBackgroundTasks),
    };
    (state, raw_key.to_string())
}

fn auth(req: axum::http::request::Builder, key: &str) -> axum::http::request::Builder {
    req.header("authorization", format!("Bearer {key}"))
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn healthz_needs_no_auth() {
    let (state, _key) = test_state().await;
    let router = build_router(state);

    let response = router
        .oneshot(Request::builder().uri("/healthz").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn protected_route_without_auth_is_401() {
    let (state, _key) = test_state().await;
    let router = build_router(state);

    let response = router
        .oneshot(Request::builder().uri("/api/v1/profiles").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn create_profile_then_duplicate_slug_conflicts() {
    let (state, key) = test_state().await;
    let router = build_router(state);

    let make_request = || {
        auth(Request::builder().method("POST").uri("/api/v1/profiles"), &key)
            .header("content-type", "application/json")
            .body(Body::from(
                json!({ "slug": "ada", "name": "Ada's feed", "description": null, "theme": null }).to_string(),
            ))
            .unwrap()
    };

    let first = router.clone().oneshot(make_request()).await.unwrap();
    assert_eq!(first.status(), StatusCode::CREATED);

    let second = router.oneshot(make_request()).await.unwrap();
    assert_eq!(second.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn connection_lifecycle_create_read_delete() {
    let (state, key) = test_state().await;
    let router = build_router(state);

    let create_profile = router
        .clone()
        .oneshot(
            auth(Request::builder().method("POST").uri("/api/v1/profiles"), &key)
                .header("content-type", "application/json")
                .body(Body::from(json!({ "slug": "bea", "name": "Bea", "description": null, "theme": null }).to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(create_profile.status(), StatusCode::CREATED);
    let profile = body_json(create_profile).await;
    let profile_id = profile["id"].as_str().unwrap().to_string();

    let create_connection = router
        .clone()
        .oneshot(
            auth(Request::builder().method("POST").uri("/api/v1/connections"), &key)
                .header("content-type", "application/json")
                .body(Body::from(
                    json!({
                        "profile_id": profile_id,
                        "platform": "bluesky",
                        "access_token": "tok_abc",
                        "refresh_token": null,
                        "platform_user_id": "did:plc:abc",
                        "platform_username": "ada.bsky.social",
                        "token_expires_at": null,
                    })
                    .to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(create_connection.status(), StatusCode::CREATED);
    let created = body_json(create_connection).await;
    let account_id = created["account_id"].as_str().unwrap().to_string();

    let list = router
        .clone()
        .oneshot(
            auth(
                Request::builder().uri(format!("/api/v1/connections?profile_id={profile_id}")),
                &key,
            )
            .body(Body::empty())
            .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(list.status(), StatusCode::OK);
    let connections = body_json(list).await;
    assert_eq!(connections.as_array().unwrap().len(), 1);

    let delete = router
        .clone()
        .oneshot(
            auth(
                Request::builder().method("DELETE").uri(format!("/api/v1/connections/{account_id}")),
                &key,
            )
            .body(Body::empty())
            .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(delete.status(), StatusCode::OK);
    let deleted = body_json(delete).await;
    assert_eq!(deleted["deleted"], true);

    let list_after = router
        .oneshot(
            auth(
                Request::builder().uri(format!("/api/v1/connections?profile_id={profile_id}")),
                &key,
            )
            .body(Body::empty())
            .unwrap(),
        )
        .await
        .unwrap();
    let connections_after = body_json(list_after).await;
    assert_eq!(connections_after.as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn wrong_owner_is_forbidden() {
    let (state, key) = test_state().await;
    // A second user with its own key, to attempt cross-owner access.
    let other_user = state
        .directory
        .create_user(User {
            id: uuid::Uuid::new_v4().to_string(),
            external_user_id: "ext-2".to_string(),
            email: None,
            name: None,
        })
        .await
        .unwrap();
    let other_raw_key = "other-key-0123456789";
    state
        .directory
        .create_api_key(activity_store::ApiKey {
            id: uuid::Uuid::new_v4().to_string(),
            user_id: other_user.id.clone(),
            key_hash: activity_api::auth::hash_api_key(other_raw_key),
            name: "other".to_string(),
            last_used_at: None,
        })
        .await
        .unwrap();

    let router = build_router(state);

    let create_profile = router
        .clone()
        .oneshot(
            auth(Request::builder().method("POST").uri("/api/v1/profiles"), &key)
                .header("content-type", "application/json")
                .body(Body::from(json!({ "slug": "carl", "name": "Carl", "description": null, "theme": null }).to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    let profile = body_json(create_profile).await;
    let profile_id = profile["id"].as_str().unwrap().to_string();

    let response = router
        .oneshot(
            auth(Request::builder().uri(format!("/api/v1/profiles/{profile_id}")), other_raw_key)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}
