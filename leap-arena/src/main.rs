//! Leap Arena
//!
//! Plays batches of headless games between two CPU strategies and reports
//! how they fared.

mod arena;
mod stats;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use clap::Parser;
use rand::Rng;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use leap_core::StrategyKind;

use crate::arena::Arena;

#[derive(Parser, Debug)]
#[command(name = "arena", about = "CPU-vs-CPU self-play for the Leap hopping game")]
struct Args {
    /// Number of games to play
    #[arg(short, long, default_value_t = 100)]
    games: u64,

    /// Strategy for the side starting at the bottom left
    #[arg(long, default_value_t = StrategyKind::Longest)]
    player: StrategyKind,

    /// Strategy for the side starting at the top right
    #[arg(long, default_value_t = StrategyKind::Mirror)]
    opponent: StrategyKind,

    /// Turns per game before it is scored as a draw
    #[arg(long, default_value_t = 400)]
    max_turns: u32,

    /// Seed for the random strategies (drawn from the OS if unset)
    #[arg(long)]
    seed: Option<u64>,

    /// Seconds between progress lines
    #[arg(long, default_value_t = 5)]
    log_interval: u64,

    /// Log every chain in move notation
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    let seed = args.seed.unwrap_or_else(|| rand::rng().random());

    println!("Leap Arena");
    println!("==========");
    println!("{} (player) vs {} (opponent)", args.player, args.opponent);
    println!("Games: {}, turn cap: {}, seed: {}", args.games, args.max_turns, seed);
    println!();

    // Stop after the current game on SIGINT
    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();
    ctrlc::set_handler(move || {
        warn!("interrupt received, finishing current game");
        r.store(false, Ordering::SeqCst);
    })?;

    let mut arena = Arena::new(args.player, args.opponent, args.max_turns, seed).verbose(args.verbose);

    let start = Instant::now();
    let played = arena.run(args.games, running.clone(), args.log_interval)?;
    info!(played, "arena finished");

    println!("\n==========");
    println!("Time: {:.2}s", start.elapsed().as_secs_f64());
    println!();
    arena.stats.print_summary();

    if !running.load(Ordering::SeqCst) {
        println!("\nInterrupted after {} of {} games.", played, args.games);
    }
    Ok(())
}
