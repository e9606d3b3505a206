//! Calendar-day bucketing for all daily-reset logic.
//!
//! The camp runs on a fixed UTC+7 clock. Rather than pulling in a timezone
//! database for a single fixed shift, every daily decision reduces to an
//! integer "day index": the number of whole days since the epoch after
//! shifting the instant into camp-local time. Two instants share a calendar
//! day exactly when their day indices are equal.

use chrono::{DateTime, Utc};

/// Fixed camp-local offset (UTC+7) in milliseconds.
pub const CAMP_UTC_OFFSET_MS: i64 = 7 * 60 * 60 * 1000;

/// Milliseconds per calendar day.
pub const MILLIS_PER_DAY: i64 = 86_400_000;

/// Day index of `instant` under the fixed camp offset.
///
/// Pure function of the instant; uses euclidean division so pre-epoch
/// instants still bucket correctly.
pub fn day_index(instant: DateTime<Utc>) -> i64 {
    (instant.timestamp_millis() + CAMP_UTC_OFFSET_MS).div_euclid(MILLIS_PER_DAY)
}
