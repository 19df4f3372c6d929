use async_trait::async_trait;

use crate::error::StoreError;
use crate::snapshot::SnapshotMeta;

/// Blob + relational-index backend underlying every `Store<T>`.
///
/// Two implementations ship in this workspace: [`crate::memory::InMemoryBackend`]
/// (tests/dev) and `activity-store-sqlx::SqlxBackend` (cloud object store +
/// relational DB binding). Neither this trait nor `Store<T>` knows which
/// one is in use.
#[async_trait]
pub trait Backend: Send + Sync {
    /// Write a blob at `key`, overwriting any existing value.
    async fn put(&self, key: &str, bytes: Vec<u8>) -> Result<(), StoreError>;
    /// Read a blob, or `None` if `key` has never been written.
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError>;
    /// Remove a blob. No-op if it doesn't exist.
    async fn delete(&self, key: &str) -> Result<(), StoreError>;
    /// Whether a blob exists, without fetching its bytes.
    async fn head(&self, key: &str) -> Result<bool, StoreError>;
    /// Keys under `prefix`, in unspecified order.
    async fn list(&self, prefix: &str) -> Result<Vec<String>, StoreError>;

    /// Insert a snapshot's index row. Fails atomically (no blob or index
    /// row left behind) if any parent does not already exist.
    async fn insert_snapshot(&self, meta: SnapshotMeta) -> Result<(), StoreError>;
    /// Look up one snapshot's metadata by `(store_id, version)`.
    async fn get_snapshot_meta(
        &self,
        store_id: &str,
        version: &str,
    ) -> Result<Option<SnapshotMeta>, StoreError>;
    /// All snapshot metadata for a store, newest-first by `created_at`,
    /// ties broken by `version` ascending.
    async fn list_snapshot_metas(&self, store_id: &str) -> Result<Vec<SnapshotMeta>, StoreError>;
    /// Remove one snapshot's index row and its parent edges.
    async fn delete_snapshot(&self, store_id: &str, version: &str) -> Result<(), StoreError>;
    /// Remove every snapshot row for `store_id` (used by cascading
    /// connection deletes).
    async fn delete_store(&self, store_id: &str) -> Result<u64, StoreError>;
}
