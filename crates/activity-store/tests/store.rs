use std::sync::Arc;

use activity_store::{Backend, InMemoryBackend, ParentRef, PutOptions, Store, StoreError};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Widget {
    name: String,
    count: u32,
}

fn store(backend: &Arc<dyn Backend>, store_id: &str) -> Store<Widget> {
    Store::new(backend.clone(), store_id)
}

#[tokio::test]
async fn put_then_get_latest_round_trips() {
    let backend: Arc<dyn Backend> = Arc::new(InMemoryBackend::new());
    let s = store(&backend, "raw/github/acct-1");

    let w = Widget {
        name: "a".into(),
        count: 1,
    };
    let meta = s.put(&w, PutOptions::default()).await.unwrap();

    let latest = s.get_latest().await.unwrap().expect("a version exists");
    assert_eq!(latest.data, w);
    assert_eq!(latest.meta.version, meta.version);
}

#[tokio::test]
async fn identical_payloads_get_distinct_versions_same_hash() {
    let backend: Arc<dyn Backend> = Arc::new(InMemoryBackend::new());
    let s = store(&backend, "raw/github/acct-1");

    let w = Widget {
        name: "a".into(),
        count: 1,
    };
    let m1 = s.put(&w, PutOptions::default()).await.unwrap();
    let m2 = s.put(&w, PutOptions::default()).await.unwrap();

    assert_ne!(m1.version, m2.version);
    assert_eq!(m1.content_hash, m2.content_hash);

    let versions = s.list().await.unwrap();
    assert_eq!(versions.len(), 2);
    // newest first
    assert_eq!(versions[0].version, m2.version);
}

#[tokio::test]
async fn put_with_missing_parent_is_rejected_atomically() {
    let backend: Arc<dyn Backend> = Arc::new(InMemoryBackend::new());
    let s = store(&backend, "timeline/user-1");

    let w = Widget {
        name: "derived".into(),
        count: 0,
    };
    let opts = PutOptions::with_parents(vec![ParentRef {
        store_id: "raw/github/acct-1".into(),
        version: "does-not-exist".into(),
        role: "source".into(),
    }]);

    let err = s.put(&w, opts).await.unwrap_err();
    assert!(matches!(err, StoreError::ParentNotFound { .. }));

    // nothing should have been written: blob-less, version-less
    assert!(s.list().await.unwrap().is_empty());
}

#[tokio::test]
async fn lineage_resolves_to_existing_parent_snapshot() {
    let backend: Arc<dyn Backend> = Arc::new(InMemoryBackend::new());
    let raw = store(&backend, "raw/github/acct-1");
    let timeline = store(&backend, "timeline/user-1");

    let raw_meta = raw
        .put(
            &Widget {
                name: "raw".into(),
                count: 1,
            },
            PutOptions::default(),
        )
        .await
        .unwrap();

    let opts = PutOptions::with_parents(vec![ParentRef {
        store_id: raw.store_id().to_string(),
        version: raw_meta.version.clone(),
        role: "source".into(),
    }]);
    let derived_meta = timeline
        .put(
            &Widget {
                name: "derived".into(),
                count: 2,
            },
            opts,
        )
        .await
        .unwrap();

    assert_eq!(derived_meta.parents.len(), 1);
    assert_eq!(derived_meta.parents[0].version, raw_meta.version);

    let fetched_parent = backend
        .get_snapshot_meta(&raw_meta.store_id, &raw_meta.version)
        .await
        .unwrap()
        .expect("parent snapshot still resolvable");
    assert_eq!(fetched_parent.content_hash, raw_meta.content_hash);
}

#[tokio::test]
async fn delete_removes_blob_and_index_entry() {
    let backend: Arc<dyn Backend> = Arc::new(InMemoryBackend::new());
    let s = store(&backend, "raw/reddit/acct-2");

    let meta = s
        .put(
            &Widget {
                name: "x".into(),
                count: 5,
            },
            PutOptions::default(),
        )
        .await
        .unwrap();

    s.delete(&meta.version).await.unwrap();
    assert!(s.get(&meta.version).await.unwrap().is_none());
    assert!(s.list().await.unwrap().is_empty());
}
