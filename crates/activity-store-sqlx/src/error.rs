use activity_store::StoreError;

/// Extension trait for converting `sqlx::Error` into `StoreError`.
///
/// Due to Rust's orphan rules we can't implement `From<sqlx::Error> for
/// StoreError` here (both types live in other crates). Use
/// `.into_store_error()` instead.
pub trait SqlxErrorExt {
    fn into_store_error(self) -> StoreError;
}

impl SqlxErrorExt for sqlx::Error {
    fn into_store_error(self) -> StoreError {
        match &self {
            sqlx::Error::RowNotFound => StoreError::NotFound("row not found".into()),
            _ => StoreError::backend(self),
        }
    }
}

pub type SqlxResult<T> = Result<T, StoreError>;
