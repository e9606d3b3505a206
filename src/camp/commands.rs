//! Statically declared operation registry.
//!
//! The chat platform parses user input into a typed [`CampCommand`] and
//! hands it to [`dispatch`]; nothing here touches raw text. Policy
//! composites that the deployed bot enacted in command glue live in this
//! layer: fire-making eligibility, the paid quest reroll, the group
//! attendance payout, and owner-gated member management. The modules
//! underneath (`ledger`, `tent`) stay policy-free primitives.

use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use std::collections::BTreeMap;

use crate::camp::errors::CampError;
use crate::camp::ledger::{self, DailyClaim};
use crate::camp::loot::LootDrop;
use crate::camp::store::SnapshotStore;
use crate::camp::tent::{self, AttendanceUpdate, TentStanding};
use crate::camp::types::{Quest, UserProfile};
use crate::config::CampConfig;

/// Wood a tent must stock to light a fire: 3 kg Green Wood, 2 kg Dry Wood.
pub const FIRE_FUEL: [(&str, u64); 2] = [("03", 3), ("04", 2)];

/// Every operation the engine accepts, with already-parsed arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CampCommand {
    // User ledger
    Profile { user: String },
    ClaimDaily { user: String },
    DailyQuests { user: String },
    /// Paid reroll of the user's quest set.
    RerollQuests { user: String },
    Transfer { from: String, to: String, amount: u64 },
    TopBalances,

    // Wood
    PickupWood { user: String },
    GiveWood { from: String, to: String, code: String, kg: u64 },
    /// Drop wood into the caller's tent stockpile.
    StashWood { user: String, code: String, kg: i64 },

    // Tent management. `SetTentOwner` carries the precondition that the
    // caller already holds the external authorization role.
    SetTentOwner { name: String, owner: String, role_id: Option<String> },
    TentAddMember { owner: String, target: String },
    TentRemoveMember { owner: String, target: String },
    TentMembers { user: String },
    TentInventory { user: String },

    // Fire
    FireCheck { user: String },
    MakeFire { user: String },
    StokeFire { user: String, code: String, kg: u64 },

    // Group daily and quests
    TentDaily { user: String },
    TentQuests { user: String },
    RefreshTentQuests { user: String },
    TentLeaderboard,
}

/// Plain result values the chat glue formats into messages.
#[derive(Debug, Clone)]
pub enum CampReply {
    Profile(UserProfile),
    Daily(DailyClaim),
    Quests(Vec<Quest>),
    Balances(Vec<(String, u64)>),
    Drop(LootDrop),
    Members(Vec<String>),
    Inventory(BTreeMap<String, u64>),
    /// Remaining burn time; `None` when no fire is live.
    Fire(Option<Duration>),
    Attendance { update: AttendanceUpdate, reward_paid: u64 },
    Standings(Vec<TentStanding>),
    Ack,
}

/// Name of the tent the user belongs to, or [`CampError::NotAMember`].
fn my_tent(store: &SnapshotStore, user: &str) -> Result<String, CampError> {
    tent::find_by_member(store, user)
        .map(|t| t.name.clone())
        .ok_or_else(|| CampError::NotAMember(user.to_string()))
}

/// Same lookup, but additionally requires the user to be the tent's owner.
fn my_owned_tent(store: &SnapshotStore, user: &str) -> Result<String, CampError> {
    let name = my_tent(store, user)?;
    let tent = store
        .db()
        .tents
        .get(&name)
        .ok_or_else(|| CampError::NoSuchTent(name.clone()))?;
    if tent.owner_id.as_deref() != Some(user) {
        return Err(CampError::Unauthorized(format!(
            "only the owner of {} may do that",
            name
        )));
    }
    Ok(name)
}

/// Execute one operation against the store at instant `now`.
pub fn dispatch<R: Rng>(
    store: &mut SnapshotStore,
    rng: &mut R,
    config: &CampConfig,
    command: CampCommand,
    now: DateTime<Utc>,
) -> Result<CampReply, CampError> {
    match command {
        CampCommand::Profile { user } => {
            Ok(CampReply::Profile(ledger::profile(store, rng, &user)?))
        }
        CampCommand::ClaimDaily { user } => {
            Ok(CampReply::Daily(ledger::claim_daily(store, rng, &user, now)?))
        }
        CampCommand::DailyQuests { user } => Ok(CampReply::Quests(ledger::daily_quests(
            store, rng, &user, now,
        )?)),
        CampCommand::RerollQuests { user } => {
            ledger::debit(store, rng, &user, config.quest_refresh_cost)?;
            Ok(CampReply::Quests(ledger::refresh_quests(store, rng, &user)?))
        }
        CampCommand::Transfer { from, to, amount } => {
            ledger::transfer(store, rng, &from, &to, amount)?;
            Ok(CampReply::Ack)
        }
        CampCommand::TopBalances => Ok(CampReply::Balances(ledger::top_balances(
            store,
            config.leaderboard_size,
        ))),

        CampCommand::PickupWood { user } => {
            Ok(CampReply::Drop(ledger::pickup_wood(store, rng, &user)?))
        }
        CampCommand::GiveWood { from, to, code, kg } => {
            ledger::give_wood(store, rng, &from, &to, &code, kg)?;
            Ok(CampReply::Ack)
        }
        CampCommand::StashWood { user, code, kg } => {
            let name = my_tent(store, &user)?;
            tent::add_wood(store, rng, &name, &code, kg)?;
            Ok(CampReply::Ack)
        }

        CampCommand::SetTentOwner { name, owner, role_id } => {
            tent::set_owner(store, rng, &name, &owner, role_id.as_deref())?;
            Ok(CampReply::Ack)
        }
        CampCommand::TentAddMember { owner, target } => {
            let name = my_owned_tent(store, &owner)?;
            tent::add_member(store, rng, &name, &target)?;
            Ok(CampReply::Ack)
        }
        CampCommand::TentRemoveMember { owner, target } => {
            let name = my_owned_tent(store, &owner)?;
            tent::remove_member(store, rng, &name, &target)?;
            Ok(CampReply::Ack)
        }
        CampCommand::TentMembers { user } => {
            let name = my_tent(store, &user)?;
            let members = store
                .db()
                .tents
                .get(&name)
                .map(|t| t.members.clone())
                .unwrap_or_default();
            Ok(CampReply::Members(members))
        }
        CampCommand::TentInventory { user } => {
            let name = my_tent(store, &user)?;
            let inventory = store
                .db()
                .tents
                .get(&name)
                .map(|t| t.inventory.clone())
                .unwrap_or_default();
            Ok(CampReply::Inventory(inventory))
        }

        CampCommand::FireCheck { user } => {
            let name = my_tent(store, &user)?;
            let remaining = store
                .db()
                .tents
                .get(&name)
                .filter(|t| t.fire.is_live(now))
                .map(|t| t.fire.remaining(now));
            Ok(CampReply::Fire(remaining))
        }
        CampCommand::MakeFire { user } => {
            make_fire(store, rng, config, &user, now)?;
            Ok(CampReply::Ack)
        }
        CampCommand::StokeFire { user, code, kg } => {
            let name = my_tent(store, &user)?;
            tent::consume_wood(store, rng, &name, &code, kg)?;
            // Every kilogram burns for one minute, always at least one.
            let minutes = (kg as i64).max(1);
            tent::extend_fire(store, rng, &name, minutes, now)?;
            Ok(CampReply::Ack)
        }

        CampCommand::TentDaily { user } => {
            let name = my_tent(store, &user)?;
            let update = tent::mark_attendance(store, rng, &name, &user, now)?;
            let mut reward_paid = 0;
            if update.all_done {
                let members = store
                    .db()
                    .tents
                    .get(&name)
                    .map(|t| t.members.clone())
                    .unwrap_or_default();
                for member in &members {
                    ledger::credit(store, rng, member, config.attendance_reward)?;
                }
                reward_paid = config.attendance_reward;
                log::debug!(
                    "tent {}: full attendance, paid {} to {} members",
                    name,
                    config.attendance_reward,
                    members.len()
                );
            }
            Ok(CampReply::Attendance { update, reward_paid })
        }
        CampCommand::TentQuests { user } => {
            let name = my_tent(store, &user)?;
            Ok(CampReply::Quests(tent::tent_quests(store, rng, &name)?))
        }
        CampCommand::RefreshTentQuests { user } => {
            let name = my_owned_tent(store, &user)?;
            Ok(CampReply::Quests(tent::refresh_quests(store, rng, &name)?))
        }
        CampCommand::TentLeaderboard => {
            let mut standings = tent::leaderboard(store, now);
            standings.truncate(config.leaderboard_size);
            Ok(CampReply::Standings(standings))
        }
    }
}

/// Fire-making composite: requires no live fire, [`CampConfig::fire_cost`]
/// coins on the user, and the [`FIRE_FUEL`] quantities in the tent
/// stockpile. All checks pass before anything is debited, so a shortfall
/// leaves balance, stockpile, and timer untouched.
fn make_fire<R: Rng>(
    store: &mut SnapshotStore,
    rng: &mut R,
    config: &CampConfig,
    user: &str,
    now: DateTime<Utc>,
) -> Result<(), CampError> {
    let name = my_tent(store, user)?;

    {
        let tent = store
            .db()
            .tents
            .get(&name)
            .ok_or_else(|| CampError::NoSuchTent(name.clone()))?;
        if tent.fire.is_live(now) {
            return Err(CampError::FireAlreadyLit(name.clone()));
        }
        for (code, need) in FIRE_FUEL {
            let have = tent.wood(code);
            if have < need {
                return Err(CampError::InsufficientResource {
                    code: code.to_string(),
                    have,
                    need,
                });
            }
        }
    }
    let balance = store.ensure_user(user, rng)?.balance;
    if balance < config.fire_cost {
        return Err(CampError::InsufficientFunds);
    }

    for (code, need) in FIRE_FUEL {
        tent::consume_wood(store, rng, &name, code, need)?;
    }
    ledger::debit(store, rng, user, config.fire_cost)?;
    tent::start_fire(store, rng, &name, config.fire_minutes, now)?;
    log::debug!("tent {}: fire made by {}", name, user);
    Ok(())
}
