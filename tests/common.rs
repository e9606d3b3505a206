//! Test utilities & fixtures shared by the integration suites.

use chrono::{DateTime, TimeZone, Utc};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tempfile::TempDir;

use campbot::camp::{clock, SnapshotStore};
use campbot::config::CampConfig;

/// A throwaway store in a temp dir plus a seeded RNG and default economy
/// knobs. Keep the TempDir alive for the test's duration.
pub fn setup() -> (TempDir, SnapshotStore, StdRng, CampConfig) {
    let dir = TempDir::new().expect("tempdir");
    let store = SnapshotStore::open(dir.path()).expect("store");
    (dir, store, StdRng::seed_from_u64(1234), CampConfig::default())
}

/// Noon camp-local time on the given camp day index.
pub fn at_day(day: i64) -> DateTime<Utc> {
    Utc.timestamp_millis_opt(
        day * clock::MILLIS_PER_DAY - clock::CAMP_UTC_OFFSET_MS + 12 * 3_600_000,
    )
    .unwrap()
}
