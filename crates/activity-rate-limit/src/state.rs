use chrono::{DateTime, Utc};

/// Per-account gate state. Not an explicit `open`/`rate_limited`/
/// `circuit_open` enum — like the spec's `shouldFetch`, membership in
/// each state is derived from the fields rather than tracked directly.
#[derive(Debug, Clone, Default)]
pub struct GateState {
    pub remaining: Option<u64>,
    pub limit: Option<u64>,
    pub reset_at: Option<DateTime<Utc>>,
    pub circuit_open_until: Option<DateTime<Utc>>,
    pub consecutive_failures: u32,
    pub last_failure_at: Option<DateTime<Utc>>,
}

/// Which of the three named states `GateState` currently represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateStatus {
    Open,
    RateLimited,
    CircuitOpen,
}

impl GateState {
    pub(crate) fn should_fetch_at(&self, now: DateTime<Utc>) -> bool {
        if let Some(until) = self.circuit_open_until {
            if now < until {
                return false;
            }
        }
        if self.remaining == Some(0) {
            if let Some(reset_at) = self.reset_at {
                if now < reset_at {
                    return false;
                }
            }
        }
        true
    }

    pub fn status_at(&self, now: DateTime<Utc>) -> GateStatus {
        if self.circuit_open_until.is_some_and(|u| now < u) {
            GateStatus::CircuitOpen
        } else if self.remaining == Some(0) && self.reset_at.is_some_and(|r| now < r) {
            GateStatus::RateLimited
        } else {
            GateStatus::Open
        }
    }
}

/// Rate-limit headers extracted from a successful provider response
/// (`X-RateLimit-{Remaining,Limit,Reset}`).
#[derive(Debug, Clone, Default)]
pub struct RateLimitHeaders {
    pub remaining: Option<u64>,
    pub limit: Option<u64>,
    pub reset_at: Option<DateTime<Utc>>,
}
