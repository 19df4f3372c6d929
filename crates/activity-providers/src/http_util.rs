use activity_rate_limit::RateLimitHeaders;
use chrono::{TimeZone, Utc};
use reqwest::Response;

use crate::error::ProviderError;

/// Pull `X-RateLimit-{Remaining,Limit,Reset}` off a response.
/// `Reset` is a unix timestamp, as GitHub/Reddit/Twitter all send it.
pub fn extract_rate_limit_headers(resp: &Response) -> RateLimitHeaders {
    let headers = resp.headers();
    let parse_u64 = |name: &str| headers.get(name).and_then(|v| v.to_str().ok()?.parse::<u64>().ok());
    let parse_i64 = |name: &str| headers.get(name).and_then(|v| v.to_str().ok()?.parse::<i64>().ok());

    RateLimitHeaders {
        remaining: parse_u64("x-ratelimit-remaining"),
        limit: parse_u64("x-ratelimit-limit"),
        reset_at: parse_i64("x-ratelimit-reset").and_then(|secs| Utc.timestamp_opt(secs, 0).single()),
    }
}

/// Map a non-2xx response to the right `ProviderError` variant.
pub async fn error_for_status(resp: Response) -> ProviderError {
    let status = resp.status();
    if status.as_u16() == 429 {
        let retry_after_secs = resp
            .headers()
            .get("retry-after")
            .and_then(|v| v.to_str().ok()?.parse().ok())
            .unwrap_or(60);
        return ProviderError::RateLimited { retry_after_secs };
    }
    if status.as_u16() == 401 || status.as_u16() == 403 {
        return ProviderError::AuthExpired;
    }
    let message = resp
        .text()
        .await
        .unwrap_or_else(|_| "<no response body>".to_string());
    ProviderError::ApiError {
        status: status.as_u16(),
        message,
    }
}
