use activity_crypto::CryptoError;
use activity_ingest::IngestError;
use activity_store::DirectoryError;
use activity_timeline::TimelineError;

/// Errors raised by the refresh orchestrator.
#[derive(Debug)]
pub enum RefreshError {
    NotFound(String),
    Inactive(String),
    Directory(DirectoryError),
    Ingest(IngestError),
    Timeline(TimelineError),
}

impl std::fmt::Display for RefreshError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RefreshError::NotFound(what) => write!(f, "not found: {what}"),
            RefreshError::Inactive(what) => write!(f, "inactive: {what}"),
            RefreshError::Directory(err) => write!(f, "directory error: {err}"),
            RefreshError::Ingest(err) => write!(f, "ingest error: {err}"),
            RefreshError::Timeline(err) => write!(f, "timeline error: {err}"),
        }
    }
}

impl std::error::Error for RefreshError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RefreshError::Directory(err) => Some(err),
            RefreshError::Ingest(err) => Some(err),
            RefreshError::Timeline(err) => Some(err),
            RefreshError::NotFound(_) | RefreshError::Inactive(_) => None,
        }
    }
}

impl From<DirectoryError> for RefreshError {
    fn from(err: DirectoryError) -> Self {
        RefreshError::Directory(err)
    }
}

impl From<IngestError> for RefreshError {
    fn from(err: IngestError) -> Self {
        RefreshError::Ingest(err)
    }
}

impl From<TimelineError> for RefreshError {
    fn from(err: TimelineError) -> Self {
        RefreshError::Timeline(err)
    }
}

impl From<CryptoError> for RefreshError {
    fn from(err: CryptoError) -> Self {
        RefreshError::Ingest(IngestError::from(err))
    }
}
