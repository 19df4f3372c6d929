use activity_core::Platform;
use async_trait::async_trait;

use crate::error::ProviderError;
use crate::http_util::{error_for_status, extract_rate_limit_headers};
use crate::provider::{FetchOutcome, Provider};
use crate::raw::{PlatformResult, RawTwitter};

#[derive(Clone)]
pub struct TwitterProvider {
    client: reqwest::Client,
    base_url: String,
}

impl TwitterProvider {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl Provider for TwitterProvider {
    fn platform(&self) -> Platform {
        Platform::Twitter
    }

    async fn fetch(&self, access_token: &str) -> Result<FetchOutcome, ProviderError> {
        let url = format!("{}/activity", self.base_url);
        let resp = self
            .client
            .get(&url)
            .bearer_auth(access_token)
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(error_for_status(resp).await);
        }

        let headers = extract_rate_limit_headers(&resp);
        let raw: RawTwitter = resp
            .json()
            .await
            .map_err(|e| ProviderError::ApiError {
                status: 200,
                message: format!("malformed twitter activity response: {e}"),
            })?;

        Ok(FetchOutcome {
            result: PlatformResult::Twitter(raw),
            headers,
        })
    }
}
