use std::sync::Arc;

use activity_core::StoreId;
use activity_providers::{RawBluesky, RawDevpad, RawTask, RawVideo, RawYoutube};
use activity_store::{Backend, PutOptions, Store, StoreError};

use crate::merge::{merge_by_key, sort_newest_first};
use crate::shard::ShardStat;

/// Platforms without a dedicated `StoreId` shape (Bluesky, YouTube,
/// Devpad) get a single `raw/<platform>/<account>` shard rather than
/// being split further.
pub async fn ingest_bluesky(backend: Arc<dyn Backend>, account_id: &str, incoming: RawBluesky) -> Result<Vec<ShardStat>, StoreError> {
    let store_id = StoreId::Raw {
        platform: "bluesky".to_string(),
        account: account_id.to_string(),
    }
    .to_string();
    let store: Store<RawBluesky> = Store::new(backend, store_id.clone());

    let existing = store.get_latest().await?.map(|s| s.data).unwrap_or_default();
    let (mut merged_posts, new_count) = merge_by_key(existing.posts, incoming.posts, |p| p.id.clone());
    sort_newest_first(&mut merged_posts, |p| p.created_at);
    let total = merged_posts.len();
    let payload = RawBluesky { posts: merged_posts };
    let meta = store.put(&payload, PutOptions::default()).await?;
    Ok(vec![ShardStat {
        store_id,
        version: meta.version,
        total,
        new_count,
    }])
}

pub async fn ingest_youtube(backend: Arc<dyn Backend>, account_id: &str, incoming: RawYoutube) -> Result<Vec<ShardStat>, StoreError> {
    let store_id = StoreId::Raw {
        platform: "youtube".to_string(),
        account: account_id.to_string(),
    }
    .to_string();
    let store: Store<RawYoutube> = Store::new(backend, store_id.clone());

    let existing = store.get_latest().await?.map(|s| s.data).unwrap_or_default();
    let (merged_videos, new_count): (Vec<RawVideo>, usize) = merge_by_key(existing.videos, incoming.videos, |v| v.video_id.clone());
    let total = merged_videos.len();
    let payload = RawYoutube { videos: merged_videos };
    let meta = store.put(&payload, PutOptions::default()).await?;
    Ok(vec![ShardStat {
        store_id,
        version: meta.version,
        total,
        new_count,
    }])
}

pub async fn ingest_devpad(backend: Arc<dyn Backend>, account_id: &str, incoming: RawDevpad) -> Result<Vec<ShardStat>, StoreError> {
    let store_id = StoreId::Raw {
        platform: "devpad".to_string(),
        account: account_id.to_string(),
    }
    .to_string();
    let store: Store<RawDevpad> = Store::new(backend, store_id.clone());

    let existing = store.get_latest().await?.map(|s| s.data).unwrap_or_default();
    let (merged_tasks, new_count): (Vec<RawTask>, usize) = merge_by_key(existing.tasks, incoming.tasks, |t| t.task_id.clone());
    let total = merged_tasks.len();
    let payload = RawDevpad { tasks: merged_tasks };
    let meta = store.put(&payload, PutOptions::default()).await?;
    Ok(vec![ShardStat {
        store_id,
        version: meta.version,
        total,
        new_count,
    }])
}
