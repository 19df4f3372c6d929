/// Errors raised by the store layer.
///
/// Mirrors the reference data crate's manual `Display`/`Error` impls
/// (no `thiserror`) rather than deriving.
#[derive(Debug)]
pub enum StoreError {
    NotFound(String),
    Decode(String),
    Backend(Box<dyn std::error::Error + Send + Sync>),
    ParentNotFound { store_id: String, version: String },
}

impl StoreError {
    pub fn backend(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        StoreError::Backend(Box::new(err))
    }
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::NotFound(what) => write!(f, "not found: {what}"),
            StoreError::Decode(msg) => write!(f, "decode error: {msg}"),
            StoreError::Backend(err) => write!(f, "backend error: {err}"),
            StoreError::ParentNotFound { store_id, version } => {
                write!(f, "parent not found: {store_id}@{version}")
            }
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StoreError::Backend(err) => Some(err.as_ref()),
            _ => None,
        }
    }
}
