use activity_core::Platform;
use activity_rate_limit::RateLimitHeaders;
use async_trait::async_trait;

use crate::error::ProviderError;
use crate::raw::PlatformResult;

/// What a successful fetch carries: the platform-shaped payload plus the
/// rate-limit headers observed on the response.
#[derive(Debug, Clone)]
pub struct FetchOutcome {
    pub result: PlatformResult,
    pub headers: RateLimitHeaders,
}

/// One platform's fetch method. Implementors own their own HTTP
/// client and base URL; the ingestion pipeline only ever sees this trait.
#[async_trait]
pub trait Provider: Send + Sync {
    fn platform(&self) -> Platform;
    async fn fetch(&self, access_token: &str) -> Result<FetchOutcome, ProviderError>;
}
