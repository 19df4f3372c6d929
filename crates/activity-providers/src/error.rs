/// Errors a `Provider::fetch` can return.
#[derive(Debug)]
pub enum ProviderError {
    RateLimited { retry_after_secs: u64 },
    AuthExpired,
    ApiError { status: u16, message: String },
    NetworkError(String),
    UnknownPlatform(String),
}

impl std::fmt::Display for ProviderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProviderError::RateLimited { retry_after_secs } => {
                write!(f, "rate limited, retry after {retry_after_secs}s")
            }
            ProviderError::AuthExpired => write!(f, "access token expired or revoked"),
            ProviderError::ApiError { status, message } => {
                write!(f, "provider api error ({status}): {message}")
            }
            ProviderError::NetworkError(msg) => write!(f, "network error: {msg}"),
            ProviderError::UnknownPlatform(p) => write!(f, "unknown platform: {p}"),
        }
    }
}

impl std::error::Error for ProviderError {}

impl From<reqwest::Error> for ProviderError {
    fn from(err: reqwest::Error) -> Self {
        ProviderError::NetworkError(err.to_string())
    }
}
