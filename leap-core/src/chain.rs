//! Exhaustive hop-chain enumeration.
//!
//! Lookahead never touches the live board: every branch applies its move to a
//! fresh clone with auto-end disabled, so the clone's move stack still carries
//! the chain and the cycle rule keeps bounding the recursion.

use crate::{Board, Move, Piece, Pos};

/// One turn's worth of moves by a single piece, in order.
pub type Chain = Vec<Move>;

impl Board {
    /// Every legal chain the piece on `src` can start now.
    ///
    /// Each single-ply move is recorded as its own chain before the search
    /// descends from its destination, so the result holds every prefix of
    /// every hop chain, and every step as a length-1 chain.
    pub fn valid_chains(&self, src: Pos, piece: Piece) -> Vec<Chain> {
        let mut chains = Vec::new();

        for mov in self.valid_moves(src, piece) {
            chains.push(vec![mov]);

            let mut next = self.clone();
            next.perform_move(mov, false);

            for tail in next.valid_chains(mov.dest, mov.piece) {
                let mut chain = Vec::with_capacity(tail.len() + 1);
                chain.push(mov);
                chain.extend(tail);
                chains.push(chain);
            }
        }

        chains
    }
}
