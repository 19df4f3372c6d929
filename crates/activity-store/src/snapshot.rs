use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A parent edge: a directed reference from a snapshot to one of the
/// source snapshots it was derived from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParentRef {
    pub store_id: String,
    pub version: String,
    pub role: String,
}

/// Metadata for one appended record in a store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotMeta {
    pub store_id: String,
    pub version: String,
    pub content_hash: String,
    pub created_at: DateTime<Utc>,
    pub tags: Option<Vec<String>>,
    pub metadata: Option<serde_json::Value>,
    pub parents: Vec<ParentRef>,
}

/// A decoded snapshot: metadata plus the typed payload it carries.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot<T> {
    pub meta: SnapshotMeta,
    pub data: T,
}

/// Options accepted by `Store::put`.
#[derive(Debug, Clone, Default)]
pub struct PutOptions {
    pub parents: Vec<ParentRef>,
    pub tags: Option<Vec<String>>,
    pub metadata: Option<serde_json::Value>,
}

impl PutOptions {
    pub fn with_parents(parents: Vec<ParentRef>) -> Self {
        Self {
            parents,
            ..Default::default()
        }
    }
}
