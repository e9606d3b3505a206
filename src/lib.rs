//! # Campbot - game-state engine for a chat-bot camping economy
//!
//! Campbot is the persistent state machine behind a chat-bot virtual
//! economy: users earn and spend coins, gather wood through weighted-random
//! pickups, and organize into tents that pool wood and keep a shared fire
//! burning.
//!
//! The chat platform itself (command parsing, message rendering, role
//! checks) is an external collaborator: it turns user input into a typed
//! [`camp::CampCommand`], calls [`camp::dispatch`], and formats the
//! [`camp::CampReply`] into messages. The engine never parses raw text and
//! emits no user-facing prose.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use campbot::camp::{dispatch, CampCommand, SnapshotStore};
//! use campbot::config::Config;
//! use chrono::Utc;
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = Config::load("config.toml")?;
//!     let mut store = SnapshotStore::open(&config.storage.data_dir)?;
//!     let mut rng = rand::thread_rng();
//!
//!     let reply = dispatch(
//!         &mut store,
//!         &mut rng,
//!         &config.camp,
//!         CampCommand::ClaimDaily { user: "alice".into() },
//!         Utc::now(),
//!     )?;
//!     println!("{:?}", reply);
//!     Ok(())
//! }
//! ```
//!
//! ## Module organization
//!
//! - [`camp`] - Data model, randomized mechanics, ledger and tent
//!   operations, snapshot persistence, and the typed command registry
//! - [`config`] - TOML configuration with validated economy knobs
//!
//! ## Persistence model
//!
//! All state lives in one JSON snapshot document. Every mutating operation
//! runs read-mutate-save: it commits the whole graph before returning, so a
//! crash loses at most the operation in flight. There is no incremental or
//! transactional write; see [`camp::store`] for the trade-offs.

pub mod camp;
pub mod config;
