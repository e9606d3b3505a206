//! Camp data model, randomized mechanics, and snapshot persistence.
//! The leaves (clock, loot, quests) are pure helpers; `ledger` and `tent`
//! carry the stateful operations, and `commands` is the typed entry point
//! the chat glue drives.

pub mod clock;
pub mod commands;
pub mod errors;
pub mod ledger;
pub mod loot;
pub mod quests;
pub mod store;
pub mod tent;
pub mod types;

pub use clock::{day_index, CAMP_UTC_OFFSET_MS, MILLIS_PER_DAY};
pub use commands::{dispatch, CampCommand, CampReply, FIRE_FUEL};
pub use errors::CampError;
pub use ledger::DailyClaim;
pub use loot::{sample, LootDrop, LootEntry, WOOD_TABLE};
pub use quests::{generate, QUEST_POOL, QUEST_SLOTS};
pub use store::SnapshotStore;
pub use tent::{AttendanceUpdate, TentStanding};
pub use types::*;
