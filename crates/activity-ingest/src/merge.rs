use std::collections::{HashMap, HashSet};
use std::hash::Hash;

use chrono::{DateTime, Utc};

/// Merge `incoming` into `existing` by natural key: items
/// already present are replaced by their incoming value (so mutable
/// fields such as metrics update), items only in `incoming` are appended
/// in their incoming order. Returns the merged list and the count of
/// genuinely new items.
pub fn merge_by_key<T, K>(existing: Vec<T>, incoming: Vec<T>, key_fn: impl Fn(&T) -> K) -> (Vec<T>, usize)
where
    T: Clone,
    K: Eq + Hash,
{
    let existing_keys: HashSet<K> = existing.iter().map(&key_fn).collect();
    let mut incoming_by_key: HashMap<K, T> = incoming.iter().map(|item| (key_fn(item), item.clone())).collect();

    let mut merged: Vec<T> = existing
        .into_iter()
        .map(|item| {
            let key = key_fn(&item);
            incoming_by_key.remove(&key).unwrap_or(item)
        })
        .collect();

    let mut new_count = 0;
    for item in incoming {
        let key = key_fn(&item);
        if !existing_keys.contains(&key) {
            merged.push(item);
            new_count += 1;
        }
    }

    (merged, new_count)
}

/// Re-sort a merged list newest-first by timestamp (posts/tweets
/// order is newest-first after merge).
pub fn sort_newest_first<T>(items: &mut [T], timestamp_fn: impl Fn(&T) -> DateTime<Utc>) {
    items.sort_by(|a, b| timestamp_fn(b).cmp(&timestamp_fn(a)));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Item {
        id: String,
        value: u32,
    }

    #[test]
    fn replaces_existing_and_appends_new() {
        let existing = vec![
            Item { id: "a".into(), value: 1 },
            Item { id: "b".into(), value: 2 },
        ];
        let incoming = vec![
            Item { id: "b".into(), value: 20 },
            Item { id: "c".into(), value: 3 },
        ];
        let (merged, new_count) = merge_by_key(existing, incoming, |i| i.id.clone());
        assert_eq!(new_count, 1);
        assert_eq!(
            merged,
            vec![
                Item { id: "a".into(), value: 1 },
                Item { id: "b".into(), value: 20 },
                Item { id: "c".into(), value: 3 },
            ]
        );
    }

    #[test]
    fn empty_existing_counts_all_as_new() {
        let incoming = vec![Item { id: "a".into(), value: 1 }, Item { id: "b".into(), value: 2 }];
        let (merged, new_count) = merge_by_key(Vec::new(), incoming, |i| i.id.clone());
        assert_eq!(new_count, 2);
        assert_eq!(merged.len(), 2);
    }

    #[test]
    fn preserves_discovery_order_for_untouched_items() {
        let existing = vec![
            Item { id: "z".into(), value: 1 },
            Item { id: "a".into(), value: 2 },
        ];
        let (merged, _) = merge_by_key(existing, Vec::new(), |i| i.id.clone());
        assert_eq!(merged[0].id, "z");
        assert_eq!(merged[1].id, "a");
    }
}
