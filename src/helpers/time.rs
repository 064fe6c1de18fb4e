use chrono::Utc;
use tokio::time::Instant;

pub fn now_i64() -> i64 {
    Utc::now().timestamp()
}

pub fn get_instant() -> Instant {
    Instant::now()
}

/// Seconds from `now` until `unix_ts`, floored at zero.
pub fn seconds_until(unix_ts: i64) -> u64 {
    (unix_ts - now_i64()).max(0) as u64
}
