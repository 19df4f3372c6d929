use std::sync::Arc;

use activity_core::StoreId;
use activity_providers::{RawRedditComment, RawReddit, RawSocialPost};
use activity_store::{Backend, PutOptions, Store, StoreError};
use chrono::Utc;

use crate::merge::{merge_by_key, sort_newest_first};
use crate::meta::SyncMeta;
use crate::shard::ShardStat;

/// Merge-and-put Reddit's meta/posts/comments stores.
pub async fn ingest_reddit(backend: Arc<dyn Backend>, account_id: &str, incoming: RawReddit) -> Result<Vec<ShardStat>, StoreError> {
    let posts = put_posts(backend.clone(), account_id, incoming.posts).await?;
    let comments = put_comments(backend.clone(), account_id, incoming.comments).await?;
    let meta = put_meta(backend, account_id, posts.total + comments.total).await?;
    Ok(vec![meta, posts, comments])
}

async fn put_posts(backend: Arc<dyn Backend>, account_id: &str, incoming: Vec<RawSocialPost>) -> Result<ShardStat, StoreError> {
    let store_id = StoreId::RedditPosts { account: account_id.to_string() }.to_string();
    let store: Store<Vec<RawSocialPost>> = Store::new(backend, store_id.clone());

    let existing = store.get_latest().await?.map(|s| s.data).unwrap_or_default();
    let (mut merged, new_count) = merge_by_key(existing, incoming, |p| p.id.clone());
    sort_newest_first(&mut merged, |p| p.created_at);
    let total = merged.len();
    let meta = store.put(&merged, PutOptions::default()).await?;
    Ok(ShardStat {
        store_id,
        version: meta.version,
        total,
        new_count,
    })
}

async fn put_comments(
    backend: Arc<dyn Backend>,
    account_id: &str,
    incoming: Vec<RawRedditComment>,
) -> Result<ShardStat, StoreError> {
    let store_id = StoreId::RedditComments { account: account_id.to_string() }.to_string();
    let store: Store<Vec<RawRedditComment>> = Store::new(backend, store_id.clone());

    let existing = store.get_latest().await?.map(|s| s.data).unwrap_or_default();
    let (mut merged, new_count) = merge_by_key(existing, incoming, |c| c.id.clone());
    sort_newest_first(&mut merged, |c| c.created_at);
    let total = merged.len();
    let meta = store.put(&merged, PutOptions::default()).await?;
    Ok(ShardStat {
        store_id,
        version: meta.version,
        total,
        new_count,
    })
}

async fn put_meta(backend: Arc<dyn Backend>, account_id: &str, item_count: usize) -> Result<ShardStat, StoreError> {
    let store_id = StoreId::RedditMeta { account: account_id.to_string() }.to_string();
    let store: Store<SyncMeta> = Store::new(backend, store_id.clone());
    let existing = store.get_latest().await?;
    let new_count = usize::from(existing.is_none());
    let sync_meta = SyncMeta {
        last_synced_at: Utc::now(),
        item_count,
    };
    let meta = store.put(&sync_meta, PutOptions::default()).await?;
    Ok(ShardStat {
        store_id,
        version: meta.version,
        total: 1,
        new_count,
    })
}
