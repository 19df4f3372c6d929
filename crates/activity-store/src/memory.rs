use async_trait::async_trait;
use dashmap::DashMap;

use crate::backend::Backend;
use crate::error::StoreError;
use crate::snapshot::SnapshotMeta;

/// In-memory `Backend`, for tests and local dev.
///
/// Mirrors the reference cache crate's `InMemoryStore`: a `DashMap` behind
/// a cheaply-`Clone`-able handle, no global state.
#[derive(Clone, Default)]
pub struct InMemoryBackend {
    blobs: DashMap<String, Vec<u8>>,
    snapshots: DashMap<String, Vec<SnapshotMeta>>,
}

impl InMemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    fn find_meta(&self, store_id: &str, version: &str) -> Option<SnapshotMeta> {
        self.snapshots
            .get(store_id)
            .and_then(|v| v.iter().find(|m| m.version == version).cloned())
    }
}

#[async_trait]
impl Backend for InMemoryBackend {
    async fn put(&self, key: &str, bytes: Vec<u8>) -> Result<(), StoreError> {
        self.blobs.insert(key.to_string(), bytes);
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self.blobs.get(key).map(|v| v.clone()))
    }

    async fn delete(&self, key: &str) -> Result<(), StoreError> {
        self.blobs.remove(key);
        Ok(())
    }

    async fn head(&self, key: &str) -> Result<bool, StoreError> {
        Ok(self.blobs.contains_key(key))
    }

    async fn list(&self, prefix: &str) -> Result<Vec<String>, StoreError> {
        Ok(self
            .blobs
            .iter()
            .map(|e| e.key().clone())
            .filter(|k| k.starts_with(prefix))
            .collect())
    }

    async fn insert_snapshot(&self, meta: SnapshotMeta) -> Result<(), StoreError> {
        for parent in &meta.parents {
            if self.find_meta(&parent.store_id, &parent.version).is_none() {
                return Err(StoreError::ParentNotFound {
                    store_id: parent.store_id.clone(),
                    version: parent.version.clone(),
                });
            }
        }
        self.snapshots
            .entry(meta.store_id.clone())
            .or_default()
            .push(meta);
        Ok(())
    }

    async fn get_snapshot_meta(
        &self,
        store_id: &str,
        version: &str,
    ) -> Result<Option<SnapshotMeta>, StoreError> {
        Ok(self.find_meta(store_id, version))
    }

    async fn list_snapshot_metas(&self, store_id: &str) -> Result<Vec<SnapshotMeta>, StoreError> {
        let mut metas = self
            .snapshots
            .get(store_id)
            .map(|v| v.clone())
            .unwrap_or_default();
        metas.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| a.version.cmp(&b.version))
        });
        Ok(metas)
    }

    async fn delete_snapshot(&self, store_id: &str, version: &str) -> Result<(), StoreError> {
        if let Some(mut v) = self.snapshots.get_mut(store_id) {
            v.retain(|m| m.version != version);
        }
        Ok(())
    }

    async fn delete_store(&self, store_id: &str) -> Result<u64, StoreError> {
        let removed = self
            .snapshots
            .remove(store_id)
            .map(|(_, v)| v.len() as u64)
            .unwrap_or(0);
        let blob_prefix = format!("{store_id}/");
        let keys: Vec<String> = self
            .blobs
            .iter()
            .map(|e| e.key().clone())
            .filter(|k| k.starts_with(&blob_prefix))
            .collect();
        for k in keys {
            self.blobs.remove(&k);
        }
        Ok(removed)
    }
}
