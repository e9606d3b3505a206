//! Binary entrypoint for the campbot CLI.
//!
//! Commands:
//! - `init` - create a starter `config.toml` and an empty snapshot
//! - `status` - print a brief summary of the snapshot
//! - `top` - print the richest users
//! - `tents` - print the tent leaderboard
//!
//! The chat-platform service embeds the library directly; this binary is an
//! operator tool for initializing and inspecting a deployment.
use anyhow::Result;
use chrono::Utc;
use clap::{Parser, Subcommand};
use log::info;

use campbot::camp::{ledger, tent, SnapshotStore};
use campbot::config::Config;

#[derive(Parser)]
#[command(name = "campbot")]
#[command(about = "Game-state engine for a chat-bot camping economy")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long, default_value = "config.toml", global = true)]
    config: String,

    /// Verbose logging (-v, -vv for more)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a starter config.toml and an empty snapshot
    Init,
    /// Show snapshot status and statistics
    Status,
    /// Show the balance leaderboard
    Top,
    /// Show the tent leaderboard
    Tents,
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        _ => log::LevelFilter::Debug,
    };
    env_logger::Builder::from_default_env()
        .filter_level(level)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Init => {
            Config::create_default(&cli.config)?;
            let config = Config::load(&cli.config)?;
            SnapshotStore::open(&config.storage.data_dir)?;
            info!("initialized config at {} and snapshot under {}", cli.config, config.storage.data_dir);
            println!("Created {} and an empty snapshot.", cli.config);
        }
        Commands::Status => {
            let config = Config::load(&cli.config)?;
            let store = SnapshotStore::open(&config.storage.data_dir)?;
            let db = store.db();
            let now = Utc::now();
            let live_fires = db.tents.values().filter(|t| t.fire.is_live(now)).count();
            println!("users: {}", db.users.len());
            println!("tents: {} ({} with a live fire)", db.tents.len(), live_fires);
        }
        Commands::Top => {
            let config = Config::load(&cli.config)?;
            let store = SnapshotStore::open(&config.storage.data_dir)?;
            for (rank, (user, balance)) in ledger::top_balances(&store, config.camp.leaderboard_size)
                .into_iter()
                .enumerate()
            {
                println!("{:>2}. {} - {} coins", rank + 1, user, balance);
            }
        }
        Commands::Tents => {
            let config = Config::load(&cli.config)?;
            let store = SnapshotStore::open(&config.storage.data_dir)?;
            let now = Utc::now();
            let mut standings = tent::leaderboard(&store, now);
            standings.truncate(config.camp.leaderboard_size);
            for (rank, row) in standings.into_iter().enumerate() {
                println!(
                    "{:>2}. {} - {} kg, fire {} min left",
                    rank + 1,
                    row.name,
                    row.total_kg,
                    row.fire_left.num_minutes()
                );
            }
        }
    }

    Ok(())
}
