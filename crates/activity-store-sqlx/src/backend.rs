use activity_store::{Backend, ParentRef, SnapshotMeta, StoreError};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::any::{AnyPoolOptions, AnyRow};
use sqlx::{AnyPool, Row};

use crate::error::SqlxErrorExt;

/// `Backend` over an `sqlx::AnyPool` (Postgres or SQLite, selected by the
/// connection URL's scheme): a single pool-wrapping struct collapsed onto
/// one concrete type so it can be boxed as `Arc<dyn Backend>`.
pub struct SqlxBackend {
    pool: AnyPool,
}

impl SqlxBackend {
    pub async fn connect(database_url: &str) -> Result<Self, StoreError> {
        sqlx::any::install_default_drivers();
        let pool = AnyPoolOptions::new()
            .max_connections(10)
            .connect(database_url)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "failed to connect sqlx pool");
                SqlxErrorExt::into_store_error(e)
            })?;
        Ok(Self { pool })
    }

    pub fn from_pool(pool: AnyPool) -> Self {
        Self { pool }
    }

    /// Run the crate's bundled migrations. Call once at startup.
    pub async fn migrate(&self) -> Result<(), StoreError> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "failed to run sqlx migrations");
                StoreError::backend(e)
            })?;
        tracing::info!("sqlx migrations applied");
        Ok(())
    }

    pub fn pool(&self) -> &AnyPool {
        &self.pool
    }
}

fn row_to_meta(row: AnyRow) -> Result<SnapshotMeta, StoreError> {
    let created_at_str: String = row
        .try_get("created_at")
        .map_err(SqlxErrorExt::into_store_error)?;
    let created_at: DateTime<Utc> = DateTime::parse_from_rfc3339(&created_at_str)
        .map_err(|e| StoreError::Decode(e.to_string()))?
        .with_timezone(&Utc);
    let tags: Option<String> = row.try_get("tags").map_err(SqlxErrorExt::into_store_error)?;
    let metadata: Option<String> = row
        .try_get("metadata")
        .map_err(SqlxErrorExt::into_store_error)?;

    Ok(SnapshotMeta {
        store_id: row.try_get("store_id").map_err(SqlxErrorExt::into_store_error)?,
        version: row.try_get("version").map_err(SqlxErrorExt::into_store_error)?,
        content_hash: row
            .try_get("content_hash")
            .map_err(SqlxErrorExt::into_store_error)?,
        created_at,
        tags: tags
            .map(|t| serde_json::from_str(&t))
            .transpose()
            .map_err(|e| StoreError::Decode(e.to_string()))?,
        metadata: metadata
            .map(|m| serde_json::from_str(&m))
            .transpose()
            .map_err(|e| StoreError::Decode(e.to_string()))?,
        parents: Vec::new(),
    })
}

impl SqlxBackend {
    async fn load_parents(&self, store_id: &str, version: &str) -> Result<Vec<ParentRef>, StoreError> {
        let rows = sqlx::query(
            "SELECT parent_store_id, parent_version, role FROM snapshot_parents \
             WHERE store_id = ? AND version = ?",
        )
        .bind(store_id)
        .bind(version)
        .fetch_all(&self.pool)
        .await
        .map_err(SqlxErrorExt::into_store_error)?;

        rows.into_iter()
            .map(|r| {
                Ok(ParentRef {
                    store_id: r.try_get("parent_store_id").map_err(SqlxErrorExt::into_store_error)?,
                    version: r.try_get("parent_version").map_err(SqlxErrorExt::into_store_error)?,
                    role: r.try_get("role").map_err(SqlxErrorExt::into_store_error)?,
                })
            })
            .collect()
    }
}

#[async_trait]
impl Backend for SqlxBackend {
    async fn put(&self, key: &str, bytes: Vec<u8>) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM blobs WHERE key = ?")
            .bind(key)
            .execute(&self.pool)
            .await
            .map_err(SqlxErrorExt::into_store_error)?;
        sqlx::query("INSERT INTO blobs (key, bytes) VALUES (?, ?)")
            .bind(key)
            .bind(bytes)
            .execute(&self.pool)
            .await
            .map_err(SqlxErrorExt::into_store_error)?;
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        let row = sqlx::query("SELECT bytes FROM blobs WHERE key = ?")
            .bind(key)
            .fetch_optional(&self.pool)
            .await
            .map_err(SqlxErrorExt::into_store_error)?;
        row.map(|r| r.try_get::<Vec<u8>, _>("bytes").map_err(SqlxErrorExt::into_store_error))
            .transpose()
    }

    async fn delete(&self, key: &str) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM blobs WHERE key = ?")
            .bind(key)
            .execute(&self.pool)
            .await
            .map_err(SqlxErrorExt::into_store_error)?;
        Ok(())
    }

    async fn head(&self, key: &str) -> Result<bool, StoreError> {
        let row = sqlx::query("SELECT 1 as present FROM blobs WHERE key = ?")
            .bind(key)
            .fetch_optional(&self.pool)
            .await
            .map_err(SqlxErrorExt::into_store_error)?;
        Ok(row.is_some())
    }

    async fn list(&self, prefix: &str) -> Result<Vec<String>, StoreError> {
        let like = format!("{prefix}%");
        let rows = sqlx::query("SELECT key FROM blobs WHERE key LIKE ?")
            .bind(like)
            .fetch_all(&self.pool)
            .await
            .map_err(SqlxErrorExt::into_store_error)?;
        rows.into_iter()
            .map(|r| r.try_get("key").map_err(SqlxErrorExt::into_store_error))
            .collect()
    }

    async fn insert_snapshot(&self, meta: SnapshotMeta) -> Result<(), StoreError> {
        let mut tx = self.pool.begin().await.map_err(SqlxErrorExt::into_store_error)?;

        for parent in &meta.parents {
            let exists = sqlx::query("SELECT 1 as present FROM snapshots WHERE store_id = ? AND version = ?")
                .bind(&parent.store_id)
                .bind(&parent.version)
                .fetch_optional(&mut *tx)
                .await
                .map_err(SqlxErrorExt::into_store_error)?;
            if exists.is_none() {
                return Err(StoreError::ParentNotFound {
                    store_id: parent.store_id.clone(),
                    version: parent.version.clone(),
                });
            }
        }

        let tags = meta
            .tags
            .as_ref()
            .map(serde_json::to_string)
            .transpose()
            .map_err(|e| StoreError::Decode(e.to_string()))?;
        let metadata = meta
            .metadata
            .as_ref()
            .map(serde_json::to_string)
            .transpose()
            .map_err(|e| StoreError::Decode(e.to_string()))?;

        sqlx::query(
            "INSERT INTO snapshots (store_id, version, content_hash, created_at, tags, metadata) \
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(&meta.store_id)
        .bind(&meta.version)
        .bind(&meta.content_hash)
        .bind(meta.created_at.to_rfc3339())
        .bind(tags)
        .bind(metadata)
        .execute(&mut *tx)
        .await
        .map_err(SqlxErrorExt::into_store_error)?;

        for parent in &meta.parents {
            sqlx::query(
                "INSERT INTO snapshot_parents (store_id, version, parent_store_id, parent_version, role) \
                 VALUES (?, ?, ?, ?, ?)",
            )
            .bind(&meta.store_id)
            .bind(&meta.version)
            .bind(&parent.store_id)
            .bind(&parent.version)
            .bind(&parent.role)
            .execute(&mut *tx)
            .await
            .map_err(SqlxErrorExt::into_store_error)?;
        }

        tx.commit().await.map_err(SqlxErrorExt::into_store_error)
    }

    async fn get_snapshot_meta(&self, store_id: &str, version: &str) -> Result<Option<SnapshotMeta>, StoreError> {
        let row = sqlx::query(
            "SELECT store_id, version, content_hash, created_at, tags, metadata \
             FROM snapshots WHERE store_id = ? AND version = ?",
        )
        .bind(store_id)
        .bind(version)
        .fetch_optional(&self.pool)
        .await
        .map_err(SqlxErrorExt::into_store_error)?;

        let Some(row) = row else { return Ok(None) };
        let mut meta = row_to_meta(row)?;
        meta.parents = self.load_parents(store_id, version).await?;
        Ok(Some(meta))
    }

    async fn list_snapshot_metas(&self, store_id: &str) -> Result<Vec<SnapshotMeta>, StoreError> {
        let rows = sqlx::query(
            "SELECT store_id, version, content_hash, created_at, tags, metadata \
             FROM snapshots WHERE store_id = ? ORDER BY created_at DESC, version ASC",
        )
        .bind(store_id)
        .fetch_all(&self.pool)
        .await
        .map_err(SqlxErrorExt::into_store_error)?;

        let mut metas = Vec::with_capacity(rows.len());
        for row in rows {
            let version: String = row.try_get("version").map_err(SqlxErrorExt::into_store_error)?;
            let mut meta = row_to_meta(row)?;
            meta.parents = self.load_parents(store_id, &version).await?;
            metas.push(meta);
        }
        Ok(metas)
    }

    async fn delete_snapshot(&self, store_id: &str, version: &str) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM snapshots WHERE store_id = ? AND version = ?")
            .bind(store_id)
            .bind(version)
            .execute(&self.pool)
            .await
            .map_err(SqlxErrorExt::into_store_error)?;
        Ok(())
    }

    async fn delete_store(&self, store_id: &str) -> Result<u64, StoreError> {
        let result = sqlx::query("DELETE FROM snapshots WHERE store_id = ?")
            .bind(store_id)
            .execute(&self.pool)
            .await
            .map_err(SqlxErrorExt::into_store_error)?;
        let blob_prefix = format!("{store_id}/%");
        sqlx::query("DELETE FROM blobs WHERE key LIKE ?")
            .bind(blob_prefix)
            .execute(&self.pool)
            .await
            .map_err(SqlxErrorExt::into_store_error)?;
        Ok(result.rows_affected())
    }
}
