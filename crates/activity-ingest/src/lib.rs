mod error;
mod github;
mod locks;
mod merge;
mod meta;
mod pipeline;
mod raw_shard;
mod reddit;
mod shard;
mod twitter;

pub use error::IngestError;
pub use locks::AccountLocks;
pub use meta::SyncMeta;
pub use pipeline::{ingest_account, IngestStatus, DEFAULT_FETCH_TIMEOUT};
pub use shard::ShardStat;
