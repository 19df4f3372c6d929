use std::collections::BTreeMap;
use std::time::Duration;

use serde::Deserialize;

/// Application configuration: host/port, the token-at-rest encryption
/// key, sweep/timeout intervals, logging, and the storage/provider
/// backends this binary needs at startup.
///
/// Loaded via a layered config loader — flatten a YAML document into
/// dot-separated keys, then let environment variables (`SERVER_PORT` →
/// `server.port`) override anything the file set — scoped to exactly the
/// keys this binary needs rather than a generic typed/registry/validation
/// layer.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    /// Base64-encoded 32-byte AES-256-GCM key for token-at-rest encryption.
    pub token_key_base64: String,
    pub sweep_interval: Duration,
    pub request_timeout: Duration,
    pub log_filter: String,
    /// `sqlx::AnyPool` connection string; absent means the in-memory backend.
    pub database_url: Option<String>,
    pub provider_base_urls: ProviderBaseUrls,
}

/// Per-platform adapter base URLs — providers sit behind HTTP, and the
/// adapters themselves are external collaborators this process only
/// talks to over the network.
#[derive(Debug, Clone)]
pub struct ProviderBaseUrls {
    pub github: String,
    pub bluesky: String,
    pub youtube: String,
    pub devpad: String,
    pub reddit: String,
    pub twitter: String,
}

#[derive(Debug, Deserialize)]
struct RawFile {
    #[serde(default)]
    server: Option<RawServer>,
    #[serde(default)]
    crypto: Option<RawCrypto>,
    #[serde(default)]
    sweep: Option<RawSweep>,
    #[serde(default)]
    log: Option<RawLog>,
    #[serde(default)]
    database: Option<RawDatabase>,
    #[serde(default)]
    providers: Option<RawProviders>,
}

#[derive(Debug, Deserialize, Default)]
struct RawDatabase {
    url: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
struct RawProviders {
    github_base_url: Option<String>,
    bluesky_base_url: Option<String>,
    youtube_base_url: Option<String>,
    devpad_base_url: Option<String>,
    reddit_base_url: Option<String>,
    twitter_base_url: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
struct RawServer {
    host: Option<String>,
    port: Option<u16>,
    request_timeout_secs: Option<u64>,
}

#[derive(Debug, Deserialize, Default)]
struct RawCrypto {
    token_key: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
struct RawSweep {
    interval_secs: Option<u64>,
}

#[derive(Debug, Deserialize, Default)]
struct RawLog {
    filter: Option<String>,
}

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_SWEEP_SECS: u64 = 15 * 60;
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
const DEFAULT_LOG_FILTER: &str = "info";
const DEFAULT_GITHUB_BASE_URL: &str = "http://localhost:9001/github";
const DEFAULT_BLUESKY_BASE_URL: &str = "http://localhost:9001/bluesky";
const DEFAULT_YOUTUBE_BASE_URL: &str = "http://localhost:9001/youtube";
const DEFAULT_DEVPAD_BASE_URL: &str = "http://localhost:9001/devpad";
const DEFAULT_REDDIT_BASE_URL: &str = "http://localhost:9001/reddit";
const DEFAULT_TWITTER_BASE_URL: &str = "http://localhost:9001/twitter";

impl AppConfig {
    /// Read `config/<profile>.yaml` if it exists (profile defaults to
    /// `ACTIVITY_PROFILE`, else `"default"`), then overlay every
    /// `ACTIVITY_*` environment variable, lower-cased with `_` mapped to
    /// `.`, onto the same dotted config keys.
    pub fn load() -> Result<Self, ConfigError> {
        let profile = std::env::var("ACTIVITY_PROFILE").unwrap_or_else(|_| "default".to_string());
        let path = format!("config/{profile}.yaml");

        let raw: RawFile = match std::fs::read_to_string(&path) {
            Ok(contents) => serde_yaml::from_str(&contents).map_err(|e| ConfigError(format!("{path}: {e}")))?,
            Err(_) => RawFile {
                server: None,
                crypto: None,
                sweep: None,
                log: None,
                database: None,
                providers: None,
            },
        };

        let mut flat = flatten(&raw);
        overlay_env(&mut flat, "ACTIVITY_");

        let host = flat.get("server.host").cloned().unwrap_or_else(|| DEFAULT_HOST.to_string());
        let port = flat
            .get("server.port")
            .map(|v| v.parse::<u16>().map_err(|e| ConfigError(format!("server.port: {e}"))))
            .transpose()?
            .unwrap_or(DEFAULT_PORT);
        let token_key_base64 = flat
            .get("crypto.token_key")
            .cloned()
            .ok_or_else(|| ConfigError("crypto.token_key is required (set ACTIVITY_CRYPTO_TOKEN_KEY or config/<profile>.yaml crypto.token_key)".into()))?;
        let sweep_interval = flat
            .get("sweep.interval_secs")
            .map(|v| v.parse::<u64>().map_err(|e| ConfigError(format!("sweep.interval_secs: {e}"))))
            .transpose()?
            .map(Duration::from_secs)
            .unwrap_or_else(|| Duration::from_secs(DEFAULT_SWEEP_SECS));
        let request_timeout = flat
            .get("server.request_timeout_secs")
            .map(|v| v.parse::<u64>().map_err(|e| ConfigError(format!("server.request_timeout_secs: {e}"))))
            .transpose()?
            .map(Duration::from_secs)
            .unwrap_or_else(|| Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS));
        let log_filter = flat.get("log.filter").cloned().unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());
        let database_url = flat.get("database.url").cloned();

        let provider_base_urls = ProviderBaseUrls {
            github: flat.get("providers.github_base_url").cloned().unwrap_or_else(|| DEFAULT_GITHUB_BASE_URL.to_string()),
            bluesky: flat.get("providers.bluesky_base_url").cloned().unwrap_or_else(|| DEFAULT_BLUESKY_BASE_URL.to_string()),
            youtube: flat.get("providers.youtube_base_url").cloned().unwrap_or_else(|| DEFAULT_YOUTUBE_BASE_URL.to_string()),
            devpad: flat.get("providers.devpad_base_url").cloned().unwrap_or_else(|| DEFAULT_DEVPAD_BASE_URL.to_string()),
            reddit: flat.get("providers.reddit_base_url").cloned().unwrap_or_else(|| DEFAULT_REDDIT_BASE_URL.to_string()),
            twitter: flat.get("providers.twitter_base_url").cloned().unwrap_or_else(|| DEFAULT_TWITTER_BASE_URL.to_string()),
        };

        Ok(Self {
            host,
            port,
            token_key_base64,
            sweep_interval,
            request_timeout,
            log_filter,
            database_url,
            provider_base_urls,
        })
    }
}

#[derive(Debug)]
pub struct ConfigError(String);

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "config error: {}", self.0)
    }
}

impl std::error::Error for ConfigError {}

fn flatten(raw: &RawFile) -> BTreeMap<String, String> {
    let mut out = BTreeMap::new();
    if let Some(server) = &raw.server {
        insert(&mut out, "server.host", &server.host);
        insert_num(&mut out, "server.port", server.port);
        insert_num(&mut out, "server.request_timeout_secs", server.request_timeout_secs);
    }
    if let Some(crypto) = &raw.crypto {
        insert(&mut out, "crypto.token_key", &crypto.token_key);
    }
    if let Some(sweep) = &raw.sweep {
        insert_num(&mut out, "sweep.interval_secs", sweep.interval_secs);
    }
    if let Some(log) = &raw.log {
        insert(&mut out, "log.filter", &log.filter);
    }
    if let Some(database) = &raw.database {
        insert(&mut out, "database.url", &database.url);
    }
    if let Some(providers) = &raw.providers {
        insert(&mut out, "providers.github_base_url", &providers.github_base_url);
        insert(&mut out, "providers.bluesky_base_url", &providers.bluesky_base_url);
        insert(&mut out, "providers.youtube_base_url", &providers.youtube_base_url);
        insert(&mut out, "providers.devpad_base_url", &providers.devpad_base_url);
        insert(&mut out, "providers.reddit_base_url", &providers.reddit_base_url);
        insert(&mut out, "providers.twitter_base_url", &providers.twitter_base_url);
    }
    out
}

fn insert(out: &mut BTreeMap<String, String>, key: &str, value: &Option<String>) {
    if let Some(v) = value {
        out.insert(key.to_string(), v.clone());
    }
}

fn insert_num<T: ToString>(out: &mut BTreeMap<String, String>, key: &str, value: Option<T>) {
    if let Some(v) = value {
        out.insert(key.to_string(), v.to_string());
    }
}

/// Overlay every `<prefix><A>_<B>` environment variable as dotted key
/// `a.b` (lower-cased, `_` → `.`).
fn overlay_env(flat: &mut BTreeMap<String, String>, prefix: &str) {
    for (key, value) in std::env::vars() {
        if let Some(rest) = key.strip_prefix(prefix) {
            let dotted = rest.to_lowercase().replace('_', ".");
            flat.insert(dotted, value);
        }
    }
}
