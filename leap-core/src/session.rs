//! A single game between a human side and a CPU side.
//!
//! [`Game`] owns the live board and the CPU strategy for the lifetime of a
//! game and is the one place that checks requests coming from a shell before
//! they reach the rules engine.

use tracing::{debug, info, warn};

use crate::{Board, Chain, LeapError, LeapResult, Move, Piece, Pos, Strategy, StrategyKind};

pub struct Game {
    board: Board,
    strategy: Box<dyn Strategy>,
}

impl Game {
    /// Side controlled by the person at the shell.
    pub const HUMAN: Piece = Piece::Player;
    /// Side controlled by the strategy.
    pub const CPU: Piece = Piece::Opponent;

    /// Start a game in the initial layout with the human to move.
    pub fn new(strategy: Box<dyn Strategy>) -> Game {
        let mut game = Game {
            board: Board::new(),
            strategy,
        };
        game.strategy.on_start(&game.board);
        info!(strategy = game.strategy.name(), "game started");
        game
    }

    /// Start a game with one of the built-in strategies.
    pub fn with_kind(kind: StrategyKind, seed: u64) -> Game {
        Game::new(kind.build(Game::CPU, seed))
    }

    /// Reset the board and let the strategy record its reference again.
    pub fn new_game(&mut self) {
        self.board.init();
        self.strategy.on_start(&self.board);
        info!(strategy = self.strategy.name(), "new game");
    }

    /// Swap the CPU strategy and start over.
    pub fn set_strategy(&mut self, strategy: Box<dyn Strategy>) {
        self.strategy = strategy;
        self.new_game();
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn strategy_name(&self) -> &'static str {
        self.strategy.name()
    }

    pub fn winner(&self) -> Option<Piece> {
        self.board.winner()
    }

    pub fn is_over(&self) -> bool {
        self.winner().is_some()
    }

    /// Legal destinations for the piece on `src`, for highlighting.
    pub fn valid_moves(&self, src: Pos) -> Vec<Move> {
        self.board.valid_moves(src, self.board.piece_at(src))
    }

    /// The side to move has no legal move at all, so the game cannot go on.
    pub fn is_stalled(&self) -> bool {
        let side = self.board.turn();
        !self.is_over()
            && self
                .board
                .positions_of(side)
                .into_iter()
                .all(|src| self.board.valid_moves(src, side).is_empty())
    }

    fn ensure_running(&self) -> LeapResult<()> {
        match self.winner() {
            Some(winner) => Err(LeapError::GameOver { winner }),
            None => Ok(()),
        }
    }

    /// Validate and apply one move of the side to move. The turn ends by itself
    /// when the piece has nowhere further to go. Returns the winner, if this
    /// move decided the game.
    pub fn play(&mut self, mov: Move) -> LeapResult<Option<Piece>> {
        Pos::new(mov.src.row, mov.src.col)?;
        Pos::new(mov.dest.row, mov.dest.col)?;
        self.ensure_running()?;
        if self.board.turn() != mov.piece {
            return Err(LeapError::NotYourTurn { piece: mov.piece });
        }
        if self.board.piece_at(mov.src) != mov.piece || !self.board.is_valid_move(&mov, mov.piece) {
            return Err(LeapError::IllegalMove { mov });
        }

        self.board.perform_move(mov, true);
        debug!(%mov, turn = ?self.board.turn(), "move played");
        Ok(self.winner())
    }

    /// Stop the current chain early. Returns whether the turn passed.
    pub fn end_turn(&mut self) -> bool {
        let ended = self.board.try_end_turn();
        debug!(ended, turn = ?self.board.turn(), "end turn requested");
        ended
    }

    /// Let the strategy play the CPU's turn.
    ///
    /// Each move of the chosen chain is re-validated before it is applied, and
    /// the turn is handed back afterwards. Returns the moves actually played,
    /// which stop early if one of them wins. An empty chain means the CPU had
    /// no legal move and the turn stays where it is.
    pub fn cpu_turn(&mut self) -> LeapResult<Chain> {
        self.ensure_running()?;
        if self.board.turn() != Game::CPU {
            return Err(LeapError::NotYourTurn { piece: Game::CPU });
        }

        let chain = self.strategy.next_moves(&self.board);
        if chain.is_empty() {
            info!(strategy = self.strategy.name(), "cpu has no legal move");
            return Ok(chain);
        }

        let mut played = Vec::with_capacity(chain.len());
        for mov in chain {
            if !self.board.is_valid_move(&mov, Game::CPU) {
                warn!(%mov, strategy = self.strategy.name(), "strategy produced an illegal move");
                return Err(LeapError::IllegalMove { mov });
            }
            self.board.perform_move(mov, true);
            played.push(mov);
            if self.is_over() {
                break;
            }
        }
        self.board.try_end_turn();

        debug!(moves = played.len(), winner = ?self.winner(), "cpu turn played");
        Ok(played)
    }
}
