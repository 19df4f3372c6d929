use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use activity_core::Platform;
use activity_rate_limit::RateLimitHeaders;
use async_trait::async_trait;

use crate::error::ProviderError;
use crate::provider::{FetchOutcome, Provider};
use crate::raw::{PlatformResult, RawSocialPost, RawTwitter};

/// Memory-backed `Provider` test double. Exposes setter methods used
/// directly by the test scenarios (`set_tweets`, `set_simulate_rate_limit`,
/// `set_simulate_auth_expired`, `get_call_count`), plus a generic
/// `set_result` for seeding the other platform shapes.
pub struct MemoryProvider {
    platform: Platform,
    result: Mutex<PlatformResult>,
    headers: Mutex<RateLimitHeaders>,
    simulate_rate_limit: Mutex<Option<u64>>,
    simulate_auth_expired: Mutex<bool>,
    call_count: AtomicU64,
}

impl MemoryProvider {
    pub fn new(platform: Platform) -> Self {
        let result = match platform {
            Platform::Github => PlatformResult::Github(Default::default()),
            Platform::Reddit => PlatformResult::Reddit(Default::default()),
            Platform::Twitter => PlatformResult::Twitter(Default::default()),
            Platform::Bluesky => PlatformResult::Bluesky(Default::default()),
            Platform::Youtube => PlatformResult::Youtube(Default::default()),
            Platform::Devpad => PlatformResult::Devpad(Default::default()),
        };
        Self {
            platform,
            result: Mutex::new(result),
            headers: Mutex::new(RateLimitHeaders::default()),
            simulate_rate_limit: Mutex::new(None),
            simulate_auth_expired: Mutex::new(false),
            call_count: AtomicU64::new(0),
        }
    }

    pub fn set_result(&self, result: PlatformResult) {
        *self.result.lock().unwrap() = result;
    }

    pub fn set_headers(&self, headers: RateLimitHeaders) {
        *self.headers.lock().unwrap() = headers;
    }

    /// Seed this double (assumed `Platform::Twitter`) with raw tweets.
    pub fn set_tweets(&self, tweets: Vec<RawSocialPost>) {
        *self.result.lock().unwrap() = PlatformResult::Twitter(RawTwitter { tweets });
    }

    pub fn set_simulate_rate_limit(&self, retry_after_secs: Option<u64>) {
        *self.simulate_rate_limit.lock().unwrap() = retry_after_secs;
    }

    pub fn set_simulate_auth_expired(&self, simulate: bool) {
        *self.simulate_auth_expired.lock().unwrap() = simulate;
    }

    pub fn get_call_count(&self) -> u64 {
        self.call_count.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Provider for MemoryProvider {
    fn platform(&self) -> Platform {
        self.platform
    }

    async fn fetch(&self, _access_token: &str) -> Result<FetchOutcome, ProviderError> {
        self.call_count.fetch_add(1, Ordering::SeqCst);

        if *self.simulate_auth_expired.lock().unwrap() {
            return Err(ProviderError::AuthExpired);
        }
        if let Some(retry_after_secs) = *self.simulate_rate_limit.lock().unwrap() {
            return Err(ProviderError::RateLimited { retry_after_secs });
        }

        Ok(FetchOutcome {
            result: self.result.lock().unwrap().clone(),
            headers: self.headers.lock().unwrap().clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn counts_calls() {
        let p = MemoryProvider::new(Platform::Twitter);
        p.fetch("token").await.unwrap();
        p.fetch("token").await.unwrap();
        assert_eq!(p.get_call_count(), 2);
    }

    #[tokio::test]
    async fn simulated_rate_limit_short_circuits_fetch() {
        let p = MemoryProvider::new(Platform::Twitter);
        p.set_simulate_rate_limit(Some(120));
        let err = p.fetch("token").await.unwrap_err();
        assert!(matches!(err, ProviderError::RateLimited { retry_after_secs: 120 }));
    }

    #[tokio::test]
    async fn simulated_auth_expired_short_circuits_fetch() {
        let p = MemoryProvider::new(Platform::Github);
        p.set_simulate_auth_expired(true);
        let err = p.fetch("token").await.unwrap_err();
        assert!(matches!(err, ProviderError::AuthExpired));
    }

    #[tokio::test]
    async fn set_tweets_is_returned_verbatim() {
        let p = MemoryProvider::new(Platform::Twitter);
        p.set_tweets(vec![RawSocialPost {
            id: "1".into(),
            url: "https://twitter.com/alice/status/1".into(),
            author: "alice".into(),
            content: "hello".into(),
            created_at: chrono::Utc::now(),
            reply_count: 0,
            repost_count: 0,
            like_count: 0,
            has_media: false,
            is_reply: false,
            is_repost: false,
            subreddit: None,
        }]);
        let outcome = p.fetch("token").await.unwrap();
        match outcome.result {
            PlatformResult::Twitter(RawTwitter { tweets }) => assert_eq!(tweets.len(), 1),
            _ => panic!("expected twitter result"),
        }
    }
}
