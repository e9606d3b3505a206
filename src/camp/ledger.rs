//! Per-user ledger operations: balance, daily claim, quests, and wood
//! inventory.
//!
//! Every operation follows the same shape: read the profile (lazily
//! creating it), validate, mutate, and commit the whole snapshot through
//! [`SnapshotStore::save`]. Validation failures return a typed
//! [`CampError`] before any state changes.

use chrono::{DateTime, Utc};
use rand::Rng;

use crate::camp::clock;
use crate::camp::errors::CampError;
use crate::camp::loot::{self, LootDrop};
use crate::camp::quests;
use crate::camp::store::SnapshotStore;
use crate::camp::types::{Quest, UserProfile};

/// Base daily reward; streaks 2 and 3 get fixed bumps.
pub const DAILY_BASE_REWARD: u64 = 100;
/// Inclusive range of the long-streak bonus roll (streak above 7).
pub const STREAK_BONUS_MIN: u64 = 700;
pub const STREAK_BONUS_MAX: u64 = 1999;

/// Outcome of a successful daily claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DailyClaim {
    pub amount: u64,
    pub streak: u32,
}

/// Fetch (lazily creating) a profile and return a copy for display.
pub fn profile<R: Rng>(
    store: &mut SnapshotStore,
    rng: &mut R,
    user_id: &str,
) -> Result<UserProfile, CampError> {
    Ok(store.ensure_user(user_id, rng)?.clone())
}

/// Claim the daily reward.
///
/// Same camp day as the previous claim is [`CampError::AlreadyClaimed`]
/// with no state change. A claim on the day right after the previous one
/// extends the streak; any gap resets it to 1. Streaks 1/2/3 pay
/// 100/200/300; streaks 4 through 7 have no tier of their own and fall
/// through to the base 100 (kept as-is for parity with the deployed
/// economy); past 7 the reward is rolled uniformly from
/// [`STREAK_BONUS_MIN`]..=[`STREAK_BONUS_MAX`].
pub fn claim_daily<R: Rng>(
    store: &mut SnapshotStore,
    rng: &mut R,
    user_id: &str,
    now: DateTime<Utc>,
) -> Result<DailyClaim, CampError> {
    let today = clock::day_index(now);
    store.ensure_user(user_id, rng)?;

    let claim = {
        let profile = store
            .db_mut()
            .users
            .get_mut(user_id)
            .expect("user present after ensure");
        let last_day = profile.daily.last.map(clock::day_index);
        if last_day == Some(today) {
            return Err(CampError::AlreadyClaimed);
        }
        if last_day == Some(today - 1) {
            profile.daily.streak += 1;
        } else {
            profile.daily.streak = 1;
        }
        profile.daily.last = Some(now);

        let reward = match profile.daily.streak {
            2 => 200,
            3 => 300,
            s if s > 7 => rng.gen_range(STREAK_BONUS_MIN..=STREAK_BONUS_MAX),
            _ => DAILY_BASE_REWARD,
        };
        profile.balance += reward;
        DailyClaim {
            amount: reward,
            streak: profile.daily.streak,
        }
    };
    store.save()?;
    log::debug!(
        "daily claim: user={} amount={} streak={}",
        user_id,
        claim.amount,
        claim.streak
    );
    Ok(claim)
}

/// Return the user's current quest set, regenerating it when the day index
/// derived from the last daily claim differs from today's.
///
/// The refresh day is read off `daily.last` rather than a dedicated
/// quest-generation field, so claiming the daily reward also pins the quest
/// set for the day while a user who never claims regenerates on every
/// call. Inherited behavior; kept for compatibility and a candidate fix.
pub fn daily_quests<R: Rng>(
    store: &mut SnapshotStore,
    rng: &mut R,
    user_id: &str,
    now: DateTime<Utc>,
) -> Result<Vec<Quest>, CampError> {
    let today = clock::day_index(now);
    let stale = {
        let profile = store.ensure_user(user_id, rng)?;
        profile.daily.last.map(clock::day_index) != Some(today)
    };
    if stale {
        let fresh = quests::generate(rng);
        store
            .db_mut()
            .users
            .get_mut(user_id)
            .expect("user present after ensure")
            .quests = fresh;
        store.save()?;
    }
    Ok(store
        .db()
        .users
        .get(user_id)
        .expect("user present after ensure")
        .quests
        .clone())
}

/// Replace the user's quest set unconditionally. Fees for voluntary
/// refreshes are charged by the operations layer, not here.
pub fn refresh_quests<R: Rng>(
    store: &mut SnapshotStore,
    rng: &mut R,
    user_id: &str,
) -> Result<Vec<Quest>, CampError> {
    store.ensure_user(user_id, rng)?;
    let fresh = quests::generate(rng);
    store
        .db_mut()
        .users
        .get_mut(user_id)
        .expect("user present after ensure")
        .quests = fresh.clone();
    store.save()?;
    Ok(fresh)
}

/// Move coins between users. Fails with [`CampError::InsufficientFunds`]
/// on a zero amount or a short sender balance; the recipient is lazily
/// created. Debit and credit commit together.
pub fn transfer<R: Rng>(
    store: &mut SnapshotStore,
    rng: &mut R,
    from_id: &str,
    to_id: &str,
    amount: u64,
) -> Result<(), CampError> {
    if amount == 0 {
        return Err(CampError::InsufficientFunds);
    }
    let sender_balance = store.ensure_user(from_id, rng)?.balance;
    if sender_balance < amount {
        return Err(CampError::InsufficientFunds);
    }
    store.ensure_user(to_id, rng)?;

    let db = store.db_mut();
    db.users
        .get_mut(from_id)
        .expect("sender present after ensure")
        .balance -= amount;
    db.users
        .get_mut(to_id)
        .expect("recipient present after ensure")
        .balance += amount;
    store.save()?;
    log::debug!("transfer: {} -> {} amount={}", from_id, to_id, amount);
    Ok(())
}

/// Credit `amount` coins to a user (group rewards and the like).
pub fn credit<R: Rng>(
    store: &mut SnapshotStore,
    rng: &mut R,
    user_id: &str,
    amount: u64,
) -> Result<u64, CampError> {
    store.ensure_user(user_id, rng)?.balance += amount;
    store.save()?;
    Ok(store
        .db()
        .users
        .get(user_id)
        .expect("user present after ensure")
        .balance)
}

/// Debit `amount` coins, failing without mutation when the balance is short.
pub fn debit<R: Rng>(
    store: &mut SnapshotStore,
    rng: &mut R,
    user_id: &str,
    amount: u64,
) -> Result<u64, CampError> {
    let profile = store.ensure_user(user_id, rng)?;
    if profile.balance < amount {
        return Err(CampError::InsufficientFunds);
    }
    profile.balance -= amount;
    store.save()?;
    Ok(store
        .db()
        .users
        .get(user_id)
        .expect("user present after ensure")
        .balance)
}

/// The `limit` richest profiles, highest balance first. Ties keep the
/// underlying map iteration order.
pub fn top_balances(store: &SnapshotStore, limit: usize) -> Vec<(String, u64)> {
    let mut rows: Vec<(String, u64)> = store
        .db()
        .users
        .values()
        .map(|u| (u.user_id.clone(), u.balance))
        .collect();
    rows.sort_by(|a, b| b.1.cmp(&a.1));
    rows.truncate(limit);
    rows
}

/// Gather wood: sample the drop table and credit the user's inventory.
pub fn pickup_wood<R: Rng>(
    store: &mut SnapshotStore,
    rng: &mut R,
    user_id: &str,
) -> Result<LootDrop, CampError> {
    let drop = loot::sample(rng);
    let profile = store.ensure_user(user_id, rng)?;
    *profile.inventory.entry(drop.code.clone()).or_insert(0) += drop.kg;
    store.save()?;
    log::debug!(
        "pickup: user={} code={} kg={}",
        user_id,
        drop.code,
        drop.kg
    );
    Ok(drop)
}

/// Unconditionally add wood to a user's inventory.
pub fn add_wood<R: Rng>(
    store: &mut SnapshotStore,
    rng: &mut R,
    user_id: &str,
    code: &str,
    kg: u64,
) -> Result<(), CampError> {
    let profile = store.ensure_user(user_id, rng)?;
    *profile.inventory.entry(code.to_string()).or_insert(0) += kg;
    store.save()
}

/// Remove wood from a user's inventory. A shortfall fails with
/// [`CampError::InsufficientResource`] and leaves the stack untouched; a
/// stack drained to zero is removed entirely.
pub fn consume_wood<R: Rng>(
    store: &mut SnapshotStore,
    rng: &mut R,
    user_id: &str,
    code: &str,
    kg: u64,
) -> Result<(), CampError> {
    let profile = store.ensure_user(user_id, rng)?;
    let have = profile.wood(code);
    if have < kg {
        return Err(CampError::InsufficientResource {
            code: code.to_string(),
            have,
            need: kg,
        });
    }
    if have == kg {
        profile.inventory.remove(code);
    } else if let Some(stack) = profile.inventory.get_mut(code) {
        *stack -= kg;
    }
    store.save()
}

/// Hand wood to another user: consume from the sender, credit the receiver.
pub fn give_wood<R: Rng>(
    store: &mut SnapshotStore,
    rng: &mut R,
    from_id: &str,
    to_id: &str,
    code: &str,
    kg: u64,
) -> Result<(), CampError> {
    consume_wood(store, rng, from_id, code, kg)?;
    add_wood(store, rng, to_id, code, kg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use tempfile::TempDir;

    fn setup() -> (TempDir, SnapshotStore, StdRng) {
        let dir = TempDir::new().expect("tempdir");
        let store = SnapshotStore::open(dir.path()).expect("store");
        (dir, store, StdRng::seed_from_u64(99))
    }

    fn at_day(day: i64) -> DateTime<Utc> {
        // Noon camp time on the given camp day index.
        Utc.timestamp_millis_opt(day * clock::MILLIS_PER_DAY - clock::CAMP_UTC_OFFSET_MS + 12 * 3_600_000)
            .unwrap()
    }

    #[test]
    fn first_claim_pays_base_and_starts_streak() {
        let (_dir, mut store, mut rng) = setup();
        let claim = claim_daily(&mut store, &mut rng, "alice", at_day(100)).unwrap();
        assert_eq!(claim, DailyClaim { amount: 100, streak: 1 });
        assert_eq!(store.db().users["alice"].balance, 100);
    }

    #[test]
    fn second_claim_same_day_is_rejected_without_mutation() {
        let (_dir, mut store, mut rng) = setup();
        claim_daily(&mut store, &mut rng, "alice", at_day(100)).unwrap();
        let err = claim_daily(&mut store, &mut rng, "alice", at_day(100)).unwrap_err();
        assert!(matches!(err, CampError::AlreadyClaimed));
        assert_eq!(store.db().users["alice"].balance, 100);
        assert_eq!(store.db().users["alice"].daily.streak, 1);
    }

    #[test]
    fn streak_tiers_and_fall_through() {
        let (_dir, mut store, mut rng) = setup();
        let expected = [100u64, 200, 300, 100, 100, 100, 100];
        for (i, want) in expected.iter().enumerate() {
            let claim =
                claim_daily(&mut store, &mut rng, "bob", at_day(200 + i as i64)).unwrap();
            assert_eq!(claim.streak, i as u32 + 1);
            assert_eq!(claim.amount, *want, "streak {}", i + 1);
        }
        // Streak 8 and beyond rolls the bonus range.
        let claim = claim_daily(&mut store, &mut rng, "bob", at_day(207)).unwrap();
        assert_eq!(claim.streak, 8);
        assert!((STREAK_BONUS_MIN..=STREAK_BONUS_MAX).contains(&claim.amount));
    }

    #[test]
    fn gap_resets_streak() {
        let (_dir, mut store, mut rng) = setup();
        claim_daily(&mut store, &mut rng, "carol", at_day(300)).unwrap();
        claim_daily(&mut store, &mut rng, "carol", at_day(301)).unwrap();
        let claim = claim_daily(&mut store, &mut rng, "carol", at_day(303)).unwrap();
        assert_eq!(claim.streak, 1);
        assert_eq!(claim.amount, 100);
    }

    #[test]
    fn transfer_moves_funds_and_rejects_shortfall() {
        let (_dir, mut store, mut rng) = setup();
        credit(&mut store, &mut rng, "alice", 500).unwrap();
        transfer(&mut store, &mut rng, "alice", "bob", 200).unwrap();
        assert_eq!(store.db().users["alice"].balance, 300);
        assert_eq!(store.db().users["bob"].balance, 200);

        let err = transfer(&mut store, &mut rng, "alice", "bob", 301).unwrap_err();
        assert!(matches!(err, CampError::InsufficientFunds));
        let err = transfer(&mut store, &mut rng, "alice", "bob", 0).unwrap_err();
        assert!(matches!(err, CampError::InsufficientFunds));
        assert_eq!(store.db().users["alice"].balance, 300);
        assert_eq!(store.db().users["bob"].balance, 200);
    }

    #[test]
    fn consume_exact_removes_the_stack() {
        let (_dir, mut store, mut rng) = setup();
        add_wood(&mut store, &mut rng, "alice", "03", 5).unwrap();
        consume_wood(&mut store, &mut rng, "alice", "03", 5).unwrap();
        assert!(!store.db().users["alice"].inventory.contains_key("03"));
    }

    #[test]
    fn consume_shortfall_leaves_inventory_unchanged() {
        let (_dir, mut store, mut rng) = setup();
        add_wood(&mut store, &mut rng, "alice", "03", 2).unwrap();
        let err = consume_wood(&mut store, &mut rng, "alice", "03", 3).unwrap_err();
        assert!(matches!(
            err,
            CampError::InsufficientResource { have: 2, need: 3, .. }
        ));
        assert_eq!(store.db().users["alice"].wood("03"), 2);
    }

    #[test]
    fn quests_regenerate_when_claim_day_differs() {
        let (_dir, mut store, mut rng) = setup();
        claim_daily(&mut store, &mut rng, "alice", at_day(400)).unwrap();
        let same_day = daily_quests(&mut store, &mut rng, "alice", at_day(400)).unwrap();
        let again = daily_quests(&mut store, &mut rng, "alice", at_day(400)).unwrap();
        assert_eq!(same_day, again, "stable within the claim day");

        // Next day the derived day index differs, so the set regenerates
        // (wholesale replacement, fresh done flags).
        store
            .db_mut()
            .users
            .get_mut("alice")
            .unwrap()
            .quests[0]
            .done = true;
        let next_day = daily_quests(&mut store, &mut rng, "alice", at_day(401)).unwrap();
        assert!(next_day.iter().all(|q| !q.done));
    }

    #[test]
    fn top_balances_sorts_descending() {
        let (_dir, mut store, mut rng) = setup();
        credit(&mut store, &mut rng, "alice", 50).unwrap();
        credit(&mut store, &mut rng, "bob", 500).unwrap();
        credit(&mut store, &mut rng, "carol", 200).unwrap();
        let top = top_balances(&store, 2);
        assert_eq!(top, vec![("bob".to_string(), 500), ("carol".to_string(), 200)]);
    }

    #[test]
    fn pickup_credits_a_table_drop() {
        let (_dir, mut store, mut rng) = setup();
        let drop = pickup_wood(&mut store, &mut rng, "alice").unwrap();
        assert_eq!(store.db().users["alice"].wood(&drop.code), drop.kg);
    }

    #[test]
    fn give_wood_moves_between_users() {
        let (_dir, mut store, mut rng) = setup();
        add_wood(&mut store, &mut rng, "alice", "05", 4).unwrap();
        give_wood(&mut store, &mut rng, "alice", "bob", "05", 3).unwrap();
        assert_eq!(store.db().users["alice"].wood("05"), 1);
        assert_eq!(store.db().users["bob"].wood("05"), 3);

        let err = give_wood(&mut store, &mut rng, "alice", "bob", "05", 2).unwrap_err();
        assert!(matches!(err, CampError::InsufficientResource { .. }));
        assert_eq!(store.db().users["bob"].wood("05"), 3);
    }
}
