use std::sync::Arc;
use std::time::Duration;

use activity_api::config::AppConfig;
use activity_api::state::AppState;
use activity_api::routes;
use activity_crypto::TokenCipher;
use activity_ingest::AccountLocks;
use activity_providers::{BlueskyProvider, DevpadProvider, GithubProvider, RedditProvider, TwitterProvider, YoutubeProvider};
use activity_rate_limit::Gate;
use activity_refresh::{run_sweep_loop, ProviderRegistry, TokioBackgroundTasks};
use activity_store::{Backend, Directory, InMemoryBackend, InMemoryDirectory};
use tokio_util::sync::CancellationToken;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

const MAX_CONCURRENT_BACKGROUND_JOBS: usize = 16;

#[tokio::main]
async fn main() {
    let config = AppConfig::load().unwrap_or_else(|err| {
        eprintln!("{err}");
        std::process::exit(1);
    });

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(&config.log_filter).unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let backend: Arc<dyn Backend> = match &config.database_url {
        Some(url) => {
            let sqlx_backend = activity_store_sqlx::SqlxBackend::connect(url).await.unwrap_or_else(|err| {
                tracing::error!(error = %err, "failed to connect to database");
                std::process::exit(1);
            });
            sqlx_backend.migrate().await.unwrap_or_else(|err| {
                tracing::error!(error = %err, "failed to run migrations");
                std::process::exit(1);
            });
            Arc::new(sqlx_backend)
        }
        None => {
            tracing::warn!("no database.url configured, using in-memory backend (not durable)");
            Arc::new(InMemoryBackend::new())
        }
    };
    let directory: Arc<dyn Directory> = Arc::new(InMemoryDirectory::new());

    let cipher = Arc::new(TokenCipher::from_base64_key(&config.token_key_base64).unwrap_or_else(|err| {
        tracing::error!(error = %err, "invalid crypto.token_key");
        std::process::exit(1);
    }));
    let gate = Gate::new();
    let locks = AccountLocks::new();

    let mut providers = ProviderRegistry::new();
    providers.register(Arc::new(GithubProvider::new(config.provider_base_urls.github.clone())));
    providers.register(Arc::new(BlueskyProvider::new(config.provider_base_urls.bluesky.clone())));
    providers.register(Arc::new(YoutubeProvider::new(config.provider_base_urls.youtube.clone())));
    providers.register(Arc::new(DevpadProvider::new(config.provider_base_urls.devpad.clone())));
    providers.register(Arc::new(RedditProvider::new(config.provider_base_urls.reddit.clone())));
    providers.register(Arc::new(TwitterProvider::new(config.provider_base_urls.twitter.clone())));

    let shutdown = CancellationToken::new();
    let background: Arc<dyn activity_refresh::BackgroundTasks> =
        Arc::new(TokioBackgroundTasks::new(shutdown.clone(), MAX_CONCURRENT_BACKGROUND_JOBS));

    let sweep_handle = tokio::spawn(run_sweep_loop(
        directory.clone(),
        backend.clone(),
        cipher.clone(),
        gate.clone(),
        providers.clone(),
        locks.clone(),
        config.sweep_interval,
        shutdown.clone(),
    ));

    let state = AppState {
        directory,
        backend,
        cipher,
        gate,
        locks,
        providers,
        background,
    };

    let app = routes::build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .layer(tower_http::timeout::TimeoutLayer::new(config.request_timeout));

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await.unwrap_or_else(|err| {
        tracing::error!(error = %err, addr, "failed to bind");
        std::process::exit(1);
    });
    tracing::info!(addr, "activity-api listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(shutdown.clone()))
        .await
        .unwrap_or_else(|err| tracing::error!(error = %err, "server error"));

    shutdown.cancel();
    let _ = tokio::time::timeout(Duration::from_secs(10), sweep_handle).await;
}

async fn shutdown_signal(cancel: CancellationToken) {
    let ctrl_c = async {
        tokio::signal::ctrl_c().await.expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("shutdown signal received");
    cancel.cancel();
}
