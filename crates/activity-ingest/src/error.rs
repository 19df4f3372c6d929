use activity_crypto::CryptoError;
use activity_providers::ProviderError;
use activity_store::StoreError;

/// Errors surfaced by [`crate::ingest_account`].
#[derive(Debug)]
pub enum IngestError {
    Crypto(CryptoError),
    Provider(ProviderError),
    Store(StoreError),
    /// The provider fetch exceeded the per-platform timeout (default
    /// 30s). Recorded on the gate as a failure with `retry_after = 60s`.
    Timeout,
}

impl std::fmt::Display for IngestError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IngestError::Crypto(e) => write!(f, "token decryption failed: {e}"),
            IngestError::Provider(e) => write!(f, "provider fetch failed: {e}"),
            IngestError::Store(e) => write!(f, "store error: {e}"),
            IngestError::Timeout => write!(f, "provider fetch timed out"),
        }
    }
}

impl std::error::Error for IngestError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            IngestError::Crypto(e) => Some(e),
            IngestError::Provider(e) => Some(e),
            IngestError::Store(e) => Some(e),
            IngestError::Timeout => None,
        }
    }
}

impl From<CryptoError> for IngestError {
    fn from(e: CryptoError) -> Self {
        IngestError::Crypto(e)
    }
}

impl From<ProviderError> for IngestError {
    fn from(e: ProviderError) -> Self {
        IngestError::Provider(e)
    }
}

impl From<StoreError> for IngestError {
    fn from(e: StoreError) -> Self {
        IngestError::Store(e)
    }
}
