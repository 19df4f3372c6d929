mod backend;
mod error;

pub use backend::SqlxBackend;
pub use error::{SqlxErrorExt, SqlxResult};
