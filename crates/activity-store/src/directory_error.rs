/// Errors raised by the [`crate::Directory`] layer.
#[derive(Debug)]
pub enum DirectoryError {
    NotFound(String),
    Conflict(String),
    Backend(Box<dyn std::error::Error + Send + Sync>),
}

impl std::fmt::Display for DirectoryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DirectoryError::NotFound(what) => write!(f, "not found: {what}"),
            DirectoryError::Conflict(msg) => write!(f, "conflict: {msg}"),
            DirectoryError::Backend(err) => write!(f, "directory backend error: {err}"),
        }
    }
}

impl std::error::Error for DirectoryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DirectoryError::Backend(err) => Some(err.as_ref()),
            _ => None,
        }
    }
}
