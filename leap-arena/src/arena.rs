//! Self-play between two CPU strategies.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use rand::{rngs::StdRng, Rng, SeedableRng};
use tracing::{debug, info, warn};

use leap_core::{chain_notation, Board, LeapError, LeapResult, Piece, Strategy, StrategyKind};

use crate::stats::ArenaStats;

/// How a single game ended.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Outcome {
    Win(Piece),
    /// The turn cap was reached.
    Draw,
    /// The side to move had no legal chain.
    Stall(Piece),
}

/// Summary of one finished game.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct GameRecord {
    pub outcome: Outcome,
    /// Chains played by both sides
    pub turns: u32,
    /// Single moves played by both sides
    pub moves: u64,
    pub longest_chain: usize,
}

/// Plays batches of games between a Player strategy and an Opponent strategy.
pub struct Arena {
    player: StrategyKind,
    opponent: StrategyKind,
    max_turns: u32,
    verbose: bool,
    /// Seeds for the strategies of each game
    seeds: StdRng,
    pub stats: ArenaStats,
}

impl Arena {
    pub fn new(player: StrategyKind, opponent: StrategyKind, max_turns: u32, seed: u64) -> Self {
        Self {
            player,
            opponent,
            max_turns,
            verbose: false,
            seeds: StdRng::seed_from_u64(seed),
            stats: ArenaStats::new(),
        }
    }

    /// Log every chain as it is played.
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Play one game from the initial layout.
    pub fn play_game(&mut self, game: u64) -> LeapResult<GameRecord> {
        self.play_from(game, Board::new())
    }

    /// Play one game from an arbitrary position until a side wins, the side
    /// to move is stuck, or the turn cap is hit.
    pub fn play_from(&mut self, game: u64, mut board: Board) -> LeapResult<GameRecord> {
        let mut player = self.player.build(Piece::Player, self.seeds.random());
        let mut opponent = self.opponent.build(Piece::Opponent, self.seeds.random());
        player.on_start(&board);
        opponent.on_start(&board);

        let mut record = GameRecord {
            outcome: Outcome::Draw,
            turns: 0,
            moves: 0,
            longest_chain: 0,
        };

        while record.turns < self.max_turns {
            if let Some(winner) = board.winner() {
                record.outcome = Outcome::Win(winner);
                return Ok(record);
            }

            let side = board.turn();
            let strategy: &mut Box<dyn Strategy> = match side {
                Piece::Opponent => &mut opponent,
                _ => &mut player,
            };

            let chain = strategy.next_moves(&board);
            if chain.is_empty() {
                record.outcome = Outcome::Stall(side);
                return Ok(record);
            }
            if self.verbose {
                info!(game, turn = record.turns + 1, ?side, "{}", chain_notation(&chain));
            }

            // A chain stops at the move that wins, even if it had more hops.
            let mut played = 0;
            for &mov in &chain {
                if !board.is_valid_move(&mov, side) {
                    warn!(%mov, strategy = strategy.name(), "strategy produced an illegal move");
                    return Err(LeapError::IllegalMove { mov });
                }
                board.perform_move(mov, true);
                played += 1;
                if board.winner().is_some() {
                    break;
                }
            }
            board.try_end_turn();

            record.turns += 1;
            record.moves += played as u64;
            record.longest_chain = record.longest_chain.max(played);

            if let Some(winner) = board.winner() {
                record.outcome = Outcome::Win(winner);
                return Ok(record);
            }
        }

        Ok(record)
    }

    /// Play up to `games` games, stopping early once `running` is cleared.
    /// Returns the number of games played.
    pub fn run(&mut self, games: u64, running: Arc<AtomicBool>, log_interval_secs: u64) -> LeapResult<u64> {
        for game in 1..=games {
            if !running.load(Ordering::SeqCst) {
                info!(played = game - 1, "interrupted");
                return Ok(game - 1);
            }

            let record = self.play_game(game)?;
            debug!(game, ?record, "game finished");
            self.stats.record(&record);

            if self.stats.should_log(log_interval_secs) {
                self.stats.log_progress();
            }
        }
        Ok(games)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use leap_core::{Pos, Region};

    #[test]
    fn test_game_respects_turn_cap() {
        let mut arena = Arena::new(StrategyKind::Random, StrategyKind::Random, 10, 1);
        let record = arena.play_game(1).unwrap();
        assert!(record.turns <= 10);
        assert!(record.moves >= record.turns as u64);
        assert!(record.longest_chain >= 1);
    }

    #[test]
    fn test_cap_reached_is_draw() {
        let mut arena = Arena::new(StrategyKind::Longest, StrategyKind::Longest, 1, 0);
        let record = arena.play_game(1).unwrap();
        assert_eq!(record.outcome, Outcome::Draw);
        assert_eq!(record.turns, 1);
    }

    #[test]
    fn test_same_seed_same_game() {
        let mut a = Arena::new(StrategyKind::Random, StrategyKind::Mirror, 60, 7);
        let mut b = Arena::new(StrategyKind::Random, StrategyKind::Mirror, 60, 7);
        for game in 1..=3 {
            assert_eq!(a.play_game(game).unwrap(), b.play_game(game).unwrap());
        }
    }

    #[test]
    fn test_stuck_side_stalls() {
        let mut board = Board::empty();
        board.set_piece(Pos::from_row_col(0, 0), Piece::Player);
        for (row, col) in [(0, 1), (1, 0), (0, 2), (2, 0)] {
            board.set_piece(Pos::from_row_col(row, col), Piece::Opponent);
        }

        let mut arena = Arena::new(StrategyKind::Longest, StrategyKind::Longest, 10, 0);
        let record = arena.play_from(1, board).unwrap();
        assert_eq!(record.outcome, Outcome::Stall(Piece::Player));
        assert_eq!(record.turns, 0);
    }

    #[test]
    fn test_finished_board_is_a_win() {
        let mut board = Board::empty();
        for square in Region::OPPONENT_HOME.positions() {
            board.set_piece(square, Piece::Player);
        }

        let mut arena = Arena::new(StrategyKind::Mirror, StrategyKind::Mirror, 10, 0);
        let record = arena.play_from(1, board).unwrap();
        assert_eq!(record.outcome, Outcome::Win(Piece::Player));
        assert_eq!(record.turns, 0);
    }

    #[test]
    fn test_win_mid_chain_ends_the_game() {
        // The player fills the opponent's home except (1,4). The longest
        // chain hops (1,2)->(1,4), which wins, then (1,4)->(3,4) back out.
        let mut board = Board::empty();
        for square in Region::OPPONENT_HOME.positions() {
            if square != Pos::from_row_col(1, 4) {
                board.set_piece(square, Piece::Player);
            }
        }
        board.set_piece(Pos::from_row_col(1, 2), Piece::Player);
        board.set_piece(Pos::from_row_col(1, 3), Piece::Opponent);
        assert_eq!(board.winner(), None);

        let mut arena = Arena::new(StrategyKind::Longest, StrategyKind::Longest, 10, 0);
        let record = arena.play_from(1, board).unwrap();
        assert_eq!(
            record,
            GameRecord {
                outcome: Outcome::Win(Piece::Player),
                turns: 1,
                moves: 1,
                longest_chain: 1,
            }
        );
    }

    #[test]
    fn test_run_stops_when_interrupted() {
        let mut arena = Arena::new(StrategyKind::Random, StrategyKind::Random, 5, 3);
        let running = Arc::new(AtomicBool::new(false));
        assert_eq!(arena.run(10, running, 3600).unwrap(), 0);
        assert_eq!(arena.stats.games, 0);

        let running = Arc::new(AtomicBool::new(true));
        assert_eq!(arena.run(4, running, 3600).unwrap(), 4);
        assert_eq!(arena.stats.games, 4);
        assert_eq!(arena.stats.draws + arena.stats.stalls + arena.stats.player_wins + arena.stats.opponent_wins, 4);
    }
}
