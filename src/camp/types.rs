//! Core data model for the camp economy.
//!
//! Everything below serializes into the single JSON snapshot document owned
//! by [`SnapshotStore`](crate::camp::store::SnapshotStore). Fields added
//! after the first release carry `#[serde(default)]` so older snapshots keep
//! loading.

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// One daily objective. Replaced wholesale when a set regenerates; the
/// `done` flag is flipped by the chat glue when it observes completion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quest {
    pub description: String,
    pub reward: u64,
    #[serde(default)]
    pub done: bool,
}

/// Daily-claim cooldown state: the last successful claim instant and the
/// current consecutive-day streak.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DailyState {
    #[serde(default)]
    pub last: Option<DateTime<Utc>>,
    #[serde(default)]
    pub streak: u32,
}

/// Per-user ledger entry. Created lazily on first reference, never deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub user_id: String,
    #[serde(default)]
    pub balance: u64,
    #[serde(default)]
    pub daily: DailyState,
    /// Wood on hand, keyed by wood code, in whole kilograms. Entries are
    /// removed when they reach zero; no zero-kg stacks persist.
    #[serde(default)]
    pub inventory: BTreeMap<String, u64>,
    #[serde(default)]
    pub quests: Vec<Quest>,
}

impl UserProfile {
    pub fn new(user_id: &str, quests: Vec<Quest>) -> Self {
        Self {
            user_id: user_id.to_string(),
            balance: 0,
            daily: DailyState::default(),
            inventory: BTreeMap::new(),
            quests,
        }
    }

    /// Kilograms of `code` currently held.
    pub fn wood(&self, code: &str) -> u64 {
        self.inventory.get(code).copied().unwrap_or(0)
    }
}

/// Fire timer: `until` is the instant the fire goes out, if one was ever lit.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FireState {
    #[serde(default)]
    pub until: Option<DateTime<Utc>>,
}

impl FireState {
    /// Whether the fire is still burning at `now`.
    pub fn is_live(&self, now: DateTime<Utc>) -> bool {
        self.until.map(|u| u > now).unwrap_or(false)
    }

    /// Remaining burn time at `now`, clamped to zero.
    pub fn remaining(&self, now: DateTime<Utc>) -> Duration {
        match self.until {
            Some(until) if until > now => until - now,
            _ => Duration::zero(),
        }
    }
}

/// Group daily-attendance tracker. `day` is the camp day index the current
/// `completed` set belongs to; a claim on a later day resets the set.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Attendance {
    #[serde(default)]
    pub day: Option<i64>,
    #[serde(default)]
    pub completed: Vec<String>,
}

/// A named group sharing a wood stockpile and a fire. Created lazily on
/// first reference, never deleted. The owner, once set, is always also a
/// member; a user belongs to at most one tent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tent {
    pub name: String,
    #[serde(default)]
    pub owner_id: Option<String>,
    /// Opaque external authorization tag; the engine never interprets it.
    #[serde(default)]
    pub role_id: Option<String>,
    /// Member user ids in insertion order.
    #[serde(default)]
    pub members: Vec<String>,
    #[serde(default)]
    pub inventory: BTreeMap<String, u64>,
    #[serde(default)]
    pub fire: FireState,
    #[serde(default)]
    pub quests: Vec<Quest>,
    #[serde(default)]
    pub attendance: Attendance,
}

impl Tent {
    pub fn new(name: &str, quests: Vec<Quest>) -> Self {
        Self {
            name: name.to_string(),
            owner_id: None,
            role_id: None,
            members: Vec::new(),
            inventory: BTreeMap::new(),
            fire: FireState::default(),
            quests,
            attendance: Attendance::default(),
        }
    }

    pub fn is_member(&self, user_id: &str) -> bool {
        self.members.iter().any(|m| m == user_id)
    }

    /// Kilograms of `code` in the stockpile.
    pub fn wood(&self, code: &str) -> u64 {
        self.inventory.get(code).copied().unwrap_or(0)
    }

    /// Total stockpile across all wood codes, the leaderboard metric.
    pub fn total_wood(&self) -> u64 {
        self.inventory.values().sum()
    }
}

/// The whole persisted state graph: every mutation saves this document in
/// full before the operation is considered complete.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CampDb {
    #[serde(default)]
    pub users: BTreeMap<String, UserProfile>,
    #[serde(default)]
    pub tents: BTreeMap<String, Tent>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn fire_remaining_clamps_to_zero() {
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        let mut fire = FireState::default();
        assert!(!fire.is_live(now));
        assert_eq!(fire.remaining(now), Duration::zero());

        fire.until = Some(now - Duration::minutes(5));
        assert!(!fire.is_live(now));
        assert_eq!(fire.remaining(now), Duration::zero());

        fire.until = Some(now + Duration::minutes(5));
        assert!(fire.is_live(now));
        assert_eq!(fire.remaining(now), Duration::minutes(5));
    }

    #[test]
    fn snapshot_round_trips_all_fields() {
        let mut db = CampDb::default();
        let mut profile = UserProfile::new(
            "alice",
            vec![Quest {
                description: "Share 1 picture".into(),
                reward: 100,
                done: true,
            }],
        );
        profile.balance = 450;
        profile.daily.streak = 3;
        profile.daily.last = Some(Utc.with_ymd_and_hms(2024, 6, 1, 9, 30, 0).unwrap());
        profile.inventory.insert("03".into(), 12);
        db.users.insert("alice".into(), profile);

        let mut tent = Tent::new("north-ridge", Vec::new());
        tent.owner_id = Some("alice".into());
        tent.role_id = Some("rid-9".into());
        tent.members.push("alice".into());
        tent.inventory.insert("04".into(), 2);
        tent.fire.until = Some(Utc.with_ymd_and_hms(2024, 6, 1, 13, 0, 0).unwrap());
        tent.attendance.day = Some(19_875);
        tent.attendance.completed.push("alice".into());
        db.tents.insert("north-ridge".into(), tent);

        let json = serde_json::to_string_pretty(&db).unwrap();
        let back: CampDb = serde_json::from_str(&json).unwrap();
        assert_eq!(back.users["alice"].balance, 450);
        assert_eq!(back.users["alice"].daily.streak, 3);
        assert_eq!(back.users["alice"].wood("03"), 12);
        assert!(back.users["alice"].quests[0].done);
        let tent = &back.tents["north-ridge"];
        assert_eq!(tent.owner_id.as_deref(), Some("alice"));
        assert_eq!(tent.role_id.as_deref(), Some("rid-9"));
        assert_eq!(tent.wood("04"), 2);
        assert!(tent.fire.until.is_some());
        assert_eq!(tent.attendance.day, Some(19_875));
    }
}
