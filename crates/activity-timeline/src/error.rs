use activity_store::{DirectoryError, StoreError};

/// Errors raised while assembling a profile timeline.
#[derive(Debug)]
pub enum TimelineError {
    Store(StoreError),
    Directory(DirectoryError),
}

impl std::fmt::Display for TimelineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TimelineError::Store(e) => write!(f, "store error: {e}"),
            TimelineError::Directory(e) => write!(f, "directory error: {e}"),
        }
    }
}

impl std::error::Error for TimelineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TimelineError::Store(e) => Some(e),
            TimelineError::Directory(e) => Some(e),
        }
    }
}

impl From<StoreError> for TimelineError {
    fn from(e: StoreError) -> Self {
        TimelineError::Store(e)
    }
}

impl From<DirectoryError> for TimelineError {
    fn from(e: DirectoryError) -> Self {
        TimelineError::Directory(e)
    }
}
