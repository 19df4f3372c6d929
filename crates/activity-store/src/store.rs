use std::marker::PhantomData;
use std::sync::Arc;

use chrono::Utc;

use crate::backend::Backend;
use crate::codec::{content_hash, Codec, JsonCodec};
use crate::error::StoreError;
use crate::snapshot::{PutOptions, Snapshot, SnapshotMeta};

/// A single append-only, content-addressed store of `T`, bound to one
/// `store_id`. Thin wrapper over a shared [`Backend`] plus a
/// [`Codec`]; cheap to clone.
pub struct Store<T, C = JsonCodec> {
    backend: Arc<dyn Backend>,
    store_id: String,
    _payload: PhantomData<T>,
    _codec: PhantomData<C>,
}

impl<T, C> Clone for Store<T, C> {
    fn clone(&self) -> Self {
        Self {
            backend: self.backend.clone(),
            store_id: self.store_id.clone(),
            _payload: PhantomData,
            _codec: PhantomData,
        }
    }
}

fn blob_key(store_id: &str, version: &str) -> String {
    format!("{store_id}/{version}")
}

impl<T, C> Store<T, C>
where
    T: serde::Serialize + serde::de::DeserializeOwned,
    C: Codec<T>,
{
    pub fn new(backend: Arc<dyn Backend>, store_id: impl Into<String>) -> Self {
        Self {
            backend,
            store_id: store_id.into(),
            _payload: PhantomData,
            _codec: PhantomData,
        }
    }

    pub fn store_id(&self) -> &str {
        &self.store_id
    }

    /// Append `value` as a new version. Fails atomically if any of
    /// `opts.parents` does not already exist in its own store: the blob
    /// is written only after the index insert has validated parents.
    pub async fn put(&self, value: &T, opts: PutOptions) -> Result<SnapshotMeta, StoreError> {
        let encoded = C::encode(value)?;
        let hash = content_hash(&encoded);
        let created_at = Utc::now();
        let version = format!(
            "{}-{}",
            created_at.format("%Y%m%dT%H%M%S%.9fZ"),
            uuid::Uuid::new_v4()
        );

        let meta = SnapshotMeta {
            store_id: self.store_id.clone(),
            version: version.clone(),
            content_hash: hash,
            created_at,
            tags: opts.tags,
            metadata: opts.metadata,
            parents: opts.parents,
        };

        self.backend.insert_snapshot(meta.clone()).await?;
        self.backend
            .put(&blob_key(&self.store_id, &version), encoded)
            .await?;
        Ok(meta)
    }

    /// Fetch a specific version, or `None` if it has never existed.
    pub async fn get(&self, version: &str) -> Result<Option<Snapshot<T>>, StoreError> {
        let Some(meta) = self
            .backend
            .get_snapshot_meta(&self.store_id, version)
            .await?
        else {
            return Ok(None);
        };
        let Some(bytes) = self.backend.get(&blob_key(&self.store_id, version)).await? else {
            return Ok(None);
        };
        let data = C::decode(&bytes)?;
        Ok(Some(Snapshot { meta, data }))
    }

    /// Fetch the newest version by `created_at`, ties broken by `version`
    /// ascending.
    pub async fn get_latest(&self) -> Result<Option<Snapshot<T>>, StoreError> {
        let metas = self.backend.list_snapshot_metas(&self.store_id).await?;
        let Some(meta) = metas.into_iter().next() else {
            return Ok(None);
        };
        self.get(&meta.version).await
    }

    /// All versions' metadata, newest-first.
    pub async fn list(&self) -> Result<Vec<SnapshotMeta>, StoreError> {
        self.backend.list_snapshot_metas(&self.store_id).await
    }

    pub async fn delete(&self, version: &str) -> Result<(), StoreError> {
        self.backend
            .delete_snapshot(&self.store_id, version)
            .await?;
        self.backend
            .delete(&blob_key(&self.store_id, version))
            .await
    }
}
