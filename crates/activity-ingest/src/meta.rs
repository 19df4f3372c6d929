use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Bookkeeping written to the `{reddit,twitter}/<account>/meta` store.
///
/// GitHub's raw payload carries its own meta substructure (`login`,
/// `tracked_repos`); Reddit and Twitter's raw shapes don't, so the meta
/// shard here just records when the account last produced data and how
/// much of it there was.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SyncMeta {
    pub last_synced_at: DateTime<Utc>,
    pub item_count: usize,
}
