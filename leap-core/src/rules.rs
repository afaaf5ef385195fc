//! Move legality, move application, turn hand-over and win detection.

use tracing::trace;

use crate::{Board, Move, Piece, Pos};

impl Board {
    // ========== Legality ==========

    /// Check whether `piece` may make `mov` now.
    ///
    /// Only the side to move may move. A step is legal only as the opening
    /// move of the side's chain; a hop must satisfy [`Board::is_valid_hop`].
    /// The destination must be empty either way.
    pub fn is_valid_move(&self, mov: &Move, piece: Piece) -> bool {
        let is_first_move = self.last_move().map_or(true, |last| last.piece != piece);
        let is_step = is_first_move && mov.distance() == 1;

        self.turn() == piece
            && (is_step || self.is_valid_hop(mov, piece))
            && self.is_empty(mov.dest)
    }

    /// Check the hop rules for `mov`.
    ///
    /// The move must jump two cells along one axis over an occupied cell into
    /// an empty one. It must either open the chain or continue it from where
    /// the previous hop landed, and it may not land on any square the current
    /// chain has departed from. Squares that were only jumped over are not
    /// protected.
    pub fn is_valid_hop(&self, mov: &Move, piece: Piece) -> bool {
        let can_hop = match self.last_move() {
            Some(last) => {
                let is_first_move = self.piece_at(last.dest) != piece;
                let is_continuation = last.distance() == 2 && last.dest == mov.src;
                let creates_cycle = self
                    .current_chain()
                    .iter()
                    .any(|earlier| earlier.src == mov.dest);
                !creates_cycle && (is_first_move || is_continuation)
            }
            None => true,
        };

        let jumps_piece = mov.midpoint().is_some_and(|mid| !self.is_empty(mid));

        can_hop && jumps_piece && self.is_empty(mov.dest)
    }

    /// Legal single-ply moves for the piece standing on `src`.
    ///
    /// Candidates carry `piece`, but are validated against the piece actually
    /// occupying `src`. Empty if `src` is empty.
    pub fn valid_moves(&self, src: Pos, piece: Piece) -> Vec<Move> {
        let occupant = self.piece_at(src);
        if occupant.is_none() {
            return Vec::new();
        }
        self.candidate_moves(src, piece)
            .into_iter()
            .filter(|mov| self.is_valid_move(mov, occupant))
            .collect()
    }

    // ========== Application ==========

    /// Apply `mov`: clear the source, fill the destination and push the move.
    ///
    /// With `auto_end`, the turn is offered to end when the moved piece has
    /// nowhere further to go. The move is NOT re-validated; callers check it
    /// with [`Board::is_valid_move`] first.
    pub fn perform_move(&mut self, mov: Move, auto_end: bool) {
        self.set_piece(mov.src, Piece::None);
        self.set_piece(mov.dest, mov.piece);
        self.push_move(mov);

        if auto_end && self.valid_moves(mov.dest, mov.piece).is_empty() {
            let ended = self.try_end_turn();
            trace!(%mov, ended, "chain exhausted");
        }
    }

    /// Hand the move to the other side if the last move's destination still
    /// holds a piece of the side to move. Returns whether the turn changed.
    ///
    /// The check makes repeated calls harmless: once the turn has passed, the
    /// last destination belongs to the side that is no longer moving.
    pub fn try_end_turn(&mut self) -> bool {
        let ready = self
            .last_move()
            .is_some_and(|last| self.piece_at(last.dest) == self.turn());
        if ready {
            self.flip_turn();
        }
        ready
    }

    // ========== Win Detection ==========

    /// Check whether every piece of `piece`'s side is inside its target block.
    /// A side with no pieces on the board has not won.
    pub fn has_won(&self, piece: Piece) -> bool {
        let Some(target) = piece.target() else {
            return false;
        };
        let positions = self.positions_of(piece);
        !positions.is_empty() && positions.iter().all(|&pos| target.contains(pos))
    }

    /// The winning side, if any. Opponent is checked first.
    pub fn winner(&self) -> Option<Piece> {
        [Piece::Opponent, Piece::Player]
            .into_iter()
            .find(|&piece| self.has_won(piece))
    }
}
