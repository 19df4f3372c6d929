use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::Mutex;

/// Per-account mutex registry ("at most one ingestion for a given
/// `account_id` at a time... an in-process per-account mutex around
/// `fetch→merge→put`"). Mirrors the rate-limit gate's `DashMap`-backed
/// per-key registry shape.
#[derive(Clone, Default)]
pub struct AccountLocks {
    locks: Arc<DashMap<String, Arc<Mutex<()>>>>,
}

impl AccountLocks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lock_for(&self, account_id: &str) -> Arc<Mutex<()>> {
        self.locks
            .entry(account_id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn same_account_shares_a_lock() {
        let locks = AccountLocks::new();
        let a = locks.lock_for("acct-1");
        let b = locks.lock_for("acct-1");
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[tokio::test]
    async fn distinct_accounts_get_distinct_locks() {
        let locks = AccountLocks::new();
        let a = locks.lock_for("acct-1");
        let b = locks.lock_for("acct-2");
        assert!(!Arc::ptr_eq(&a, &b));
    }
}
