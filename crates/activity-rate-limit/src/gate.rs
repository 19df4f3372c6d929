use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use dashmap::DashMap;

use crate::state::{GateState, GateStatus, RateLimitHeaders};

/// Per-account rate-limit / circuit-breaker gate.
///
/// Mirrors the reference rate-limit crate's `DashMap`-backed, cheaply
/// `Clone`-able registry shape, but keyed by account id rather than by a
/// generic key, and driven by observed response headers rather than a
/// fixed token-bucket rate.
#[derive(Clone, Default)]
pub struct Gate {
    states: Arc<DashMap<String, GateState>>,
}

const CIRCUIT_BREAKER_THRESHOLD: u32 = 3;
const CIRCUIT_BREAKER_COOLDOWN: Duration = Duration::from_secs(5 * 60);

impl Gate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether ingestion should proceed for `account_id` right now.
    pub fn should_fetch(&self, account_id: &str) -> bool {
        self.states
            .get(account_id)
            .map(|s| s.should_fetch_at(Utc::now()))
            .unwrap_or(true)
    }

    pub fn status(&self, account_id: &str) -> GateStatus {
        self.states
            .get(account_id)
            .map(|s| s.status_at(Utc::now()))
            .unwrap_or(GateStatus::Open)
    }

    /// Transition on a successful fetch: adopt the observed headers and
    /// clear failure tracking.
    pub fn record_success(&self, account_id: &str, headers: RateLimitHeaders) {
        let mut entry = self.states.entry(account_id.to_string()).or_default();
        entry.remaining = headers.remaining;
        entry.limit = headers.limit;
        entry.reset_at = headers.reset_at;
        entry.consecutive_failures = 0;
        entry.circuit_open_until = None;
    }

    /// Transition on a `rate_limited` provider error: the bucket is
    /// exhausted until `now + retry_after`.
    pub fn record_rate_limited(&self, account_id: &str, retry_after: Duration) {
        let now = Utc::now();
        let mut entry = self.states.entry(account_id.to_string()).or_default();
        entry.remaining = Some(0);
        entry.reset_at = Some(now + retry_after);
        entry.consecutive_failures += 1;
        entry.last_failure_at = Some(now);
        if entry.consecutive_failures >= CIRCUIT_BREAKER_THRESHOLD {
            entry.circuit_open_until = Some(now + CIRCUIT_BREAKER_COOLDOWN);
        }
    }

    /// Transition on any other failure (auth expiry, api error, network
    /// error): tracked the same way, but without forcing `remaining` to 0.
    pub fn record_failure(&self, account_id: &str) {
        let now = Utc::now();
        let mut entry = self.states.entry(account_id.to_string()).or_default();
        entry.consecutive_failures += 1;
        entry.last_failure_at = Some(now);
        if entry.consecutive_failures >= CIRCUIT_BREAKER_THRESHOLD {
            entry.circuit_open_until = Some(now + CIRCUIT_BREAKER_COOLDOWN);
        }
    }

    /// Drops all tracked state for `account_id` (connection deletion).
    pub fn forget(&self, account_id: &str) {
        self.states.remove(account_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration as ChronoDuration;

    #[test]
    fn fresh_account_is_open() {
        let gate = Gate::new();
        assert!(gate.should_fetch("acct-1"));
        assert_eq!(gate.status("acct-1"), GateStatus::Open);
    }

    #[test]
    fn success_clears_failures_and_opens_circuit() {
        let gate = Gate::new();
        gate.record_failure("acct-1");
        gate.record_failure("acct-1");
        gate.record_success(
            "acct-1",
            RateLimitHeaders {
                remaining: Some(10),
                limit: Some(100),
                reset_at: Some(Utc::now() + ChronoDuration::hours(1)),
            },
        );
        assert!(gate.should_fetch("acct-1"));
    }

    #[test]
    fn rate_limited_blocks_until_reset() {
        let gate = Gate::new();
        gate.record_rate_limited("acct-1", Duration::from_secs(3600));
        assert!(!gate.should_fetch("acct-1"));
        assert_eq!(gate.status("acct-1"), GateStatus::RateLimited);
    }

    #[test]
    fn remaining_zero_but_reset_passed_allows_fetch() {
        let gate = Gate::new();
        gate.record_success(
            "acct-1",
            RateLimitHeaders {
                remaining: Some(0),
                limit: Some(100),
                reset_at: Some(Utc::now() - ChronoDuration::seconds(1)),
            },
        );
        assert!(gate.should_fetch("acct-1"));
    }

    #[test]
    fn three_consecutive_failures_opens_circuit() {
        let gate = Gate::new();
        gate.record_failure("acct-1");
        gate.record_failure("acct-1");
        assert!(gate.should_fetch("acct-1"));
        gate.record_failure("acct-1");
        assert!(!gate.should_fetch("acct-1"));
        assert_eq!(gate.status("acct-1"), GateStatus::CircuitOpen);
    }

    #[test]
    fn accounts_are_independent() {
        let gate = Gate::new();
        gate.record_rate_limited("acct-1", Duration::from_secs(3600));
        assert!(!gate.should_fetch("acct-1"));
        assert!(gate.should_fetch("acct-2"));
    }

    #[test]
    fn forget_resets_to_fresh_state() {
        let gate = Gate::new();
        gate.record_rate_limited("acct-1", Duration::from_secs(3600));
        gate.forget("acct-1");
        assert!(gate.should_fetch("acct-1"));
        assert_eq!(gate.status("acct-1"), GateStatus::Open);
    }
}
