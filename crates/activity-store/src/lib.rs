mod backend;
mod codec;
mod directory;
mod directory_error;
mod domain;
mod error;
mod memory;
mod memory_directory;
mod snapshot;
mod store;

pub use backend::Backend;
pub use codec::{content_hash, Codec, JsonCodec};
pub use directory::Directory;
pub use directory_error::DirectoryError;
pub use domain::{Account, ApiKey, FilterKey, FilterType, PlatformCredentials, Profile, ProfileFilter, User};
pub use error::StoreError;
pub use memory::InMemoryBackend;
pub use memory_directory::InMemoryDirectory;
pub use snapshot::{ParentRef, PutOptions, Snapshot, SnapshotMeta};
pub use store::Store;
