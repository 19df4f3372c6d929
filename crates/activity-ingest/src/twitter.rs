use std::sync::Arc;

use activity_core::StoreId;
use activity_providers::{RawSocialPost, RawTwitter};
use activity_store::{Backend, PutOptions, Store, StoreError};
use chrono::Utc;

use crate::merge::{merge_by_key, sort_newest_first};
use crate::meta::SyncMeta;
use crate::shard::ShardStat;

/// Merge-and-put Twitter's meta/tweets stores.
pub async fn ingest_twitter(backend: Arc<dyn Backend>, account_id: &str, incoming: RawTwitter) -> Result<Vec<ShardStat>, StoreError> {
    let tweets = put_tweets(backend.clone(), account_id, incoming.tweets).await?;
    let meta = put_meta(backend, account_id, tweets.total).await?;
    Ok(vec![meta, tweets])
}

async fn put_tweets(backend: Arc<dyn Backend>, account_id: &str, incoming: Vec<RawSocialPost>) -> Result<ShardStat, StoreError> {
    let store_id = StoreId::TwitterTweets { account: account_id.to_string() }.to_string();
    let store: Store<Vec<RawSocialPost>> = Store::new(backend, store_id.clone());

    let existing = store.get_latest().await?.map(|s| s.data).unwrap_or_default();
    let (mut merged, new_count) = merge_by_key(existing, incoming, |t| t.id.clone());
    sort_newest_first(&mut merged, |t| t.created_at);
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
    let store_id = StoreId::TwitterMeta { account: account_id.to_string() }.to_string();
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
