//! # Timestamp Freshness Policy
//!
//! Bounds how old a caller-claimed timestamp may be. This is a data
//! validity check on the request, not a liveness mechanism.

/// Decides whether a claimed timestamp is fresh enough.
///
/// - `age_limit_ms == 0` disables the check entirely; every request
///   passes, including one with no timestamp at all.
/// - Otherwise an absent or non-numeric timestamp fails, and a numeric
///   one must satisfy `timestamp + age_limit_ms > now_ms`. The boundary
///   is exclusive: at `now == timestamp + limit` the request is already
///   stale.
///
/// Only a lower bound on recency is enforced. A timestamp ahead of
/// server time is accepted; this mirrors observed wire behavior and is
/// kept pending product clarification. The addition saturates, so
/// absurdly large claims land on the accepted side for the same reason.
pub fn timestamp_is_fresh(timestamp: Option<&str>, age_limit_ms: u64, now_ms: u64) -> bool {
    if age_limit_ms == 0 {
        return true;
    }

    let Some(raw) = timestamp else {
        return false;
    };
    let Ok(claimed) = raw.parse::<u64>() else {
        return false;
    };

    claimed.saturating_add(age_limit_ms) > now_ms
}
