//! Arena statistics tracking.

use std::time::Instant;

use leap_core::Piece;
use tracing::info;

use crate::arena::{GameRecord, Outcome};

/// Totals collected over a batch of games.
#[derive(Debug, Default)]
pub struct ArenaStats {
    pub games: u64,

    pub player_wins: u64,
    pub opponent_wins: u64,

    /// Games that hit the turn cap
    pub draws: u64,

    /// Games where the side to move had no chain
    pub stalls: u64,

    /// Turns (chains) played over all games
    pub total_turns: u64,

    /// Single moves played over all games
    pub total_moves: u64,

    /// Longest chain seen in any game
    pub longest_chain: usize,

    /// For rate calculation
    start_time: Option<Instant>,
    last_log_time: Option<Instant>,
    last_log_games: u64,
}

impl ArenaStats {
    pub fn new() -> Self {
        Self {
            start_time: Some(Instant::now()),
            last_log_time: Some(Instant::now()),
            ..Default::default()
        }
    }

    /// Fold one finished game into the totals
    pub fn record(&mut self, record: &GameRecord) {
        self.games += 1;
        match record.outcome {
            Outcome::Win(Piece::Opponent) => self.opponent_wins += 1,
            Outcome::Win(_) => self.player_wins += 1,
            Outcome::Draw => self.draws += 1,
            Outcome::Stall(_) => self.stalls += 1,
        }
        self.total_turns += record.turns as u64;
        self.total_moves += record.moves;
        self.longest_chain = self.longest_chain.max(record.longest_chain);
    }

    pub fn average_turns(&self) -> f64 {
        if self.games == 0 {
            return 0.0;
        }
        self.total_turns as f64 / self.games as f64
    }

    /// Mean number of moves per chain
    pub fn average_chain(&self) -> f64 {
        if self.total_turns == 0 {
            return 0.0;
        }
        self.total_moves as f64 / self.total_turns as f64
    }

    /// Get current games per second
    pub fn games_per_sec(&self) -> f64 {
        if let Some(start) = self.start_time {
            let elapsed = start.elapsed().as_secs_f64();
            if elapsed > 0.0 {
                return self.games as f64 / elapsed;
            }
        }
        0.0
    }

    /// Check if we should log progress
    pub fn should_log(&self, interval_secs: u64) -> bool {
        if let Some(last) = self.last_log_time {
            last.elapsed().as_secs() >= interval_secs
        } else {
            true
        }
    }

    /// Log progress and reset log timer
    pub fn log_progress(&mut self) {
        let now = Instant::now();
        let elapsed_total = self.start_time.map(|s| s.elapsed().as_secs()).unwrap_or(0);

        // Rate since last log
        let rate = match self.last_log_time {
            Some(last) if last.elapsed().as_secs_f64() > 0.0 => {
                (self.games - self.last_log_games) as f64 / last.elapsed().as_secs_f64()
            }
            _ => self.games_per_sec(),
        };

        info!(
            "[{:02}:{:02}:{:02}] games={} rate={:.1}/s player={} opponent={} draw={} stall={} avg_turns={:.1}",
            elapsed_total / 3600,
            (elapsed_total % 3600) / 60,
            elapsed_total % 60,
            self.games,
            rate,
            self.player_wins,
            self.opponent_wins,
            self.draws,
            self.stalls,
            self.average_turns(),
        );

        self.last_log_time = Some(now);
        self.last_log_games = self.games;
    }

    /// Print final summary
    pub fn print_summary(&self) {
        println!("Games played: {}", self.games);
        println!("  - Player wins: {}", self.player_wins);
        println!("  - Opponent wins: {}", self.opponent_wins);
        println!("  - Draws (turn cap): {}", self.draws);
        println!("  - Stalls: {}", self.stalls);
        println!("Total turns: {}", self.total_turns);
        println!("Average turns per game: {:.1}", self.average_turns());
        println!("Longest chain: {}", self.longest_chain);
        println!("Average chain length: {:.2}", self.average_chain());

        if let Some(start) = self.start_time {
            let elapsed = start.elapsed().as_secs_f64();
            if elapsed > 0.0 {
                println!("Average rate: {:.1} games/sec", self.games as f64 / elapsed);
            }
        }
    }
}
