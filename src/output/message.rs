//! Human-readable expiry sentences
//!
//! Bucketing is by whole days remaining, floored, so a certificate that
//! expired two hours ago already reads as "expired yesterday".

use crate::models::{ErrorKind, ExpiryResult};
use chrono::{DateTime, Utc};

const SECONDS_PER_DAY: i64 = 86_400;

/// Whole days from `now` until `expires_at`, rounded towards negative infinity
pub fn days_remaining(expires_at: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    (expires_at - now).num_seconds().div_euclid(SECONDS_PER_DAY)
}

/// Format a resolution result against the current wall clock
pub fn format_result(host: &str, result: &ExpiryResult) -> String {
    format_result_at(host, result, Utc::now())
}

/// Format a resolution result against a fixed point in time
pub fn format_result_at(host: &str, result: &ExpiryResult, now: DateTime<Utc>) -> String {
    match result {
        ExpiryResult::Expires(expires_at) => format_days(host, days_remaining(*expires_at, now)),
        ExpiryResult::Failed(kind) => format_error(host, kind),
    }
}

fn format_days(host: &str, days: i64) -> String {
    match days {
        d if d > 1 => format!("{} will expire in {} days", host, d),
        1 => format!("{} will expire tomorrow", host),
        0 => format!("{} expires today", host),
        -1 => format!("{} expired yesterday", host),
        d => format!("{} expired {} days ago", host, -d),
    }
}

fn format_error(host: &str, kind: &ErrorKind) -> String {
    match kind {
        ErrorKind::Timeout => format!("Timed out connecting {}", host),
        ErrorKind::NoSuchHost => "No such host.".to_string(),
        ErrorKind::NoRoute => "I don't understand what you typed.".to_string(),
        ErrorKind::Other(cause) => {
            tracing::warn!("Checking {} failed: {}", host, cause);
            "Something went wrong.".to_string()
        }
    }
}
