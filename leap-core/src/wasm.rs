//! WASM bindings for leap-core
//!
//! Provides a JavaScript-friendly API over a [`Game`] so a browser front end
//! can run the rules and the CPU locally.

use wasm_bindgen::prelude::*;

use crate::{Game, Move, Piece, Pos, StrategyKind};

/// WASM-friendly wrapper around a game session
#[wasm_bindgen]
pub struct WasmGame {
    inner: Game,
}

#[wasm_bindgen]
impl WasmGame {
    /// Start a game. `strategy` is "longest", "mirror" or "random"; the seed
    /// drives the random strategy (pass e.g. `Date.now()`).
    #[wasm_bindgen(constructor)]
    pub fn new(strategy: &str, seed: u64) -> Result<WasmGame, JsError> {
        let kind: StrategyKind = strategy.parse()?;
        Ok(WasmGame {
            inner: Game::with_kind(kind, seed),
        })
    }

    /// Reset to the starting layout
    #[wasm_bindgen(js_name = newGame)]
    pub fn new_game(&mut self) {
        self.inner.new_game();
    }

    /// Piece at a cell: 0 (empty), 1 (player) or 2 (cpu)
    pub fn cell(&self, row: u8, col: u8) -> Result<u8, JsError> {
        let pos = Pos::new(row, col)?;
        Ok(self.inner.board().piece_at(pos) as u8)
    }

    /// Side to move (1 or 2)
    pub fn turn(&self) -> u8 {
        self.inner.board().turn() as u8
    }

    /// Winner: 0 (none), 1 (player) or 2 (cpu)
    pub fn winner(&self) -> u8 {
        self.inner.winner().map_or(0, |piece| piece as u8)
    }

    /// Whether the side to move has no legal move left
    #[wasm_bindgen(js_name = isStalled)]
    pub fn is_stalled(&self) -> bool {
        self.inner.is_stalled()
    }

    /// Legal moves for the piece at (row, col) as JSON
    /// Each move is { src: {row, col}, dest: {row, col}, piece }
    #[wasm_bindgen(js_name = validMoves)]
    pub fn valid_moves(&self, row: u8, col: u8) -> Result<JsValue, JsError> {
        let moves = self.inner.valid_moves(Pos::new(row, col)?);
        Ok(serde_wasm_bindgen::to_value(&moves)?)
    }

    /// Play a move for the player. Returns false if it was rejected.
    #[wasm_bindgen(js_name = playMove)]
    pub fn play_move(&mut self, src_row: u8, src_col: u8, dest_row: u8, dest_col: u8) -> bool {
        let (Ok(src), Ok(dest)) = (Pos::new(src_row, src_col), Pos::new(dest_row, dest_col)) else {
            return false;
        };
        self.inner.play(Move::new(src, dest, Game::HUMAN)).is_ok()
    }

    /// End the player's chain early
    #[wasm_bindgen(js_name = endTurn)]
    pub fn end_turn(&mut self) -> bool {
        self.inner.end_turn()
    }

    /// Play the CPU turn and return its chain as JSON, for animating
    #[wasm_bindgen(js_name = cpuTurn)]
    pub fn cpu_turn(&mut self) -> Result<JsValue, JsError> {
        let chain = self.inner.cpu_turn()?;
        Ok(serde_wasm_bindgen::to_value(&chain)?)
    }

    /// Last move as JSON, or null
    #[wasm_bindgen(js_name = lastMove)]
    pub fn last_move(&self) -> Result<JsValue, JsError> {
        Ok(serde_wasm_bindgen::to_value(&self.inner.board().last_move())?)
    }

    /// Whether it is the player's turn
    #[wasm_bindgen(js_name = isPlayerTurn)]
    pub fn is_player_turn(&self) -> bool {
        self.inner.board().turn() == Piece::Player
    }
}
