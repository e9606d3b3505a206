//! Tent registry: group membership, the shared stockpile, the fire timer,
//! tent quests, and group daily attendance.
//!
//! A user's tent is resolved by a reverse scan over all tents
//! ([`find_by_member`]); keeping that lookup unambiguous is why
//! [`add_member`] rejects a user who is already pitched elsewhere. Policy
//! composites (fire cost, fuel requirements, attendance payouts) live in
//! the operations layer; this module performs the state mutations once
//! eligibility has been confirmed.

use chrono::{DateTime, Duration, Utc};
use rand::Rng;

use crate::camp::clock;
use crate::camp::errors::CampError;
use crate::camp::quests;
use crate::camp::store::SnapshotStore;
use crate::camp::types::{Quest, Tent};

/// Result of marking one member's daily attendance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttendanceUpdate {
    pub completed: usize,
    pub members: usize,
    /// True exactly when every current member has attended today and the
    /// tent is not empty. Signals the external bulk reward.
    pub all_done: bool,
}

/// One leaderboard row: tents rank by total stockpile, ties by remaining
/// fire time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TentStanding {
    pub name: String,
    pub total_kg: u64,
    pub fire_left: Duration,
}

/// Lazily create tent `name` with empty defaults; idempotent.
pub fn ensure<R: Rng>(
    store: &mut SnapshotStore,
    rng: &mut R,
    name: &str,
) -> Result<Tent, CampError> {
    Ok(store.ensure_tent(name, rng)?.clone())
}

/// Assign (or re-assign) a tent's owner and external role tag, adding the
/// owner to the member list if absent. A previous owner keeps their
/// membership.
///
/// Precondition: the caller has already verified that the invoking user
/// holds the authorization role for owner assignment; the engine performs
/// no authorization here.
pub fn set_owner<R: Rng>(
    store: &mut SnapshotStore,
    rng: &mut R,
    name: &str,
    owner_id: &str,
    role_id: Option<&str>,
) -> Result<(), CampError> {
    let tent = store.ensure_tent(name, rng)?;
    tent.owner_id = Some(owner_id.to_string());
    tent.role_id = role_id.map(str::to_string);
    if !tent.is_member(owner_id) {
        tent.members.push(owner_id.to_string());
    }
    store.save()?;
    log::debug!("tent {}: owner set to {}", name, owner_id);
    Ok(())
}

/// Add a member. Joining the same tent twice is a no-op; joining while
/// pitched in another tent is rejected so membership stays unambiguous.
pub fn add_member<R: Rng>(
    store: &mut SnapshotStore,
    rng: &mut R,
    name: &str,
    user_id: &str,
) -> Result<(), CampError> {
    if let Some(existing) = find_by_member(store, user_id) {
        if existing.name == name {
            return Ok(());
        }
        return Err(CampError::AlreadyPitched {
            user: user_id.to_string(),
            tent: existing.name.clone(),
        });
    }
    store
        .ensure_tent(name, rng)?
        .members
        .push(user_id.to_string());
    store.save()
}

/// Remove a member; removing a non-member is a no-op.
pub fn remove_member<R: Rng>(
    store: &mut SnapshotStore,
    rng: &mut R,
    name: &str,
    user_id: &str,
) -> Result<(), CampError> {
    let tent = store.ensure_tent(name, rng)?;
    tent.members.retain(|m| m != user_id);
    store.save()
}

/// The tent `user_id` belongs to, if any. Linear scan, first match; this
/// is the sole membership lookup.
pub fn find_by_member<'a>(store: &'a SnapshotStore, user_id: &str) -> Option<&'a Tent> {
    store.db().tents.values().find(|t| t.is_member(user_id))
}

/// Add wood to the tent stockpile. Quantities arrive from chat glue as
/// arbitrary integers; negative amounts clamp to zero.
pub fn add_wood<R: Rng>(
    store: &mut SnapshotStore,
    rng: &mut R,
    name: &str,
    code: &str,
    kg: i64,
) -> Result<(), CampError> {
    let kg = kg.max(0) as u64;
    let tent = store.ensure_tent(name, rng)?;
    *tent.inventory.entry(code.to_string()).or_insert(0) += kg;
    store.save()
}

/// Remove wood from the tent stockpile, failing without mutation on a
/// shortfall. A stack drained to zero is removed entirely.
pub fn consume_wood<R: Rng>(
    store: &mut SnapshotStore,
    rng: &mut R,
    name: &str,
    code: &str,
    kg: u64,
) -> Result<(), CampError> {
    let tent = store.ensure_tent(name, rng)?;
    let have = tent.wood(code);
    if have < kg {
        return Err(CampError::InsufficientResource {
            code: code.to_string(),
            have,
            need: kg,
        });
    }
    if have == kg {
        tent.inventory.remove(code);
    } else if let Some(stack) = tent.inventory.get_mut(code) {
        *stack -= kg;
    }
    store.save()
}

/// Light the fire for `minutes` from `now`, unconditionally overwriting
/// any existing timer. Callers pre-check that no fire is already live.
pub fn start_fire<R: Rng>(
    store: &mut SnapshotStore,
    rng: &mut R,
    name: &str,
    minutes: i64,
    now: DateTime<Utc>,
) -> Result<(), CampError> {
    let tent = store.ensure_tent(name, rng)?;
    tent.fire.until = Some(now + Duration::minutes(minutes));
    store.save()?;
    log::debug!("tent {}: fire lit for {} min", name, minutes);
    Ok(())
}

/// Top up the fire: a live timer extends from its current expiry, a dead
/// or never-lit one counts from `now`.
pub fn extend_fire<R: Rng>(
    store: &mut SnapshotStore,
    rng: &mut R,
    name: &str,
    minutes: i64,
    now: DateTime<Utc>,
) -> Result<(), CampError> {
    let tent = store.ensure_tent(name, rng)?;
    let base = match tent.fire.until {
        Some(until) if until > now => until,
        _ => now,
    };
    tent.fire.until = Some(base + Duration::minutes(minutes));
    store.save()
}

/// Mark one member's attendance for today. The first mark of a new camp
/// day resets the completed set; marking twice is idempotent. Returns the
/// completion signal that triggers the external bulk reward.
pub fn mark_attendance<R: Rng>(
    store: &mut SnapshotStore,
    rng: &mut R,
    name: &str,
    user_id: &str,
    now: DateTime<Utc>,
) -> Result<AttendanceUpdate, CampError> {
    let today = clock::day_index(now);
    let update = {
        let tent = store.ensure_tent(name, rng)?;
        if tent.attendance.day != Some(today) {
            tent.attendance.day = Some(today);
            tent.attendance.completed.clear();
        }
        if !tent.attendance.completed.iter().any(|u| u == user_id) {
            tent.attendance.completed.push(user_id.to_string());
        }
        let completed = tent.attendance.completed.len();
        let members = tent.members.len();
        AttendanceUpdate {
            completed,
            members,
            all_done: members > 0 && completed == members,
        }
    };
    store.save()?;
    Ok(update)
}

/// Rank all tents: total stockpile descending, ties broken by remaining
/// fire time descending.
pub fn leaderboard(store: &SnapshotStore, now: DateTime<Utc>) -> Vec<TentStanding> {
    let mut rows: Vec<TentStanding> = store
        .db()
        .tents
        .values()
        .map(|t| TentStanding {
            name: t.name.clone(),
            total_kg: t.total_wood(),
            fire_left: t.fire.remaining(now),
        })
        .collect();
    rows.sort_by(|a, b| {
        b.total_kg
            .cmp(&a.total_kg)
            .then(b.fire_left.cmp(&a.fire_left))
    });
    rows
}

/// The tent's current quest set. Unlike the user path there is no day
/// coupling: tent quests only change through [`refresh_quests`].
pub fn tent_quests<R: Rng>(
    store: &mut SnapshotStore,
    rng: &mut R,
    name: &str,
) -> Result<Vec<Quest>, CampError> {
    Ok(store.ensure_tent(name, rng)?.quests.clone())
}

/// Replace the tent's quest set wholesale.
pub fn refresh_quests<R: Rng>(
    store: &mut SnapshotStore,
    rng: &mut R,
    name: &str,
) -> Result<Vec<Quest>, CampError> {
    let fresh = quests::generate(rng);
    store.ensure_tent(name, rng)?.quests = fresh.clone();
    store.save()?;
    Ok(fresh)
}
