//! CPU move selection.
//!
//! A [`Strategy`] looks at every chain the side to move can play and picks one.
//! Three heuristics are provided:
//!
//! - [`LongestChain`]: the chain with the most moves.
//! - [`MirrorOpponent`]: the chain that leaves the mover's average position
//!   closest to where the other side's pieces stood at the start of the game.
//! - [`RandomChain`]: a uniformly random piece, then a uniformly random chain.

use std::fmt;
use std::str::FromStr;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::{Board, Centroid, Chain, LeapError, Piece, Pos};

/// All chains available to the piece standing on `src`.
#[derive(Clone, Debug)]
pub struct PieceChains {
    pub src: Pos,
    pub chains: Vec<Chain>,
}

/// Enumerate the chains of every piece of the side to move, row-major.
/// Pieces with no legal chain are left out.
pub fn piece_chains(board: &Board) -> Vec<PieceChains> {
    let side = board.turn();
    board
        .positions_of(side)
        .into_iter()
        .map(|src| PieceChains {
            src,
            chains: board.valid_chains(src, side),
        })
        .filter(|options| !options.chains.is_empty())
        .collect()
}

/// Move selection for a CPU side.
pub trait Strategy: Send {
    /// Short name, as accepted by [`StrategyKind::from_str`].
    fn name(&self) -> &'static str;

    /// Called once per game, before the first CPU turn.
    fn on_start(&mut self, _board: &Board) {}

    /// Pick one chain out of `options`. Never called with an empty slice.
    fn choose(&mut self, board: &Board, options: &[PieceChains]) -> Chain;

    /// The chain to play this turn, or an empty chain if the side to move has
    /// no legal move.
    fn next_moves(&mut self, board: &Board) -> Chain {
        let options = piece_chains(board);
        if options.is_empty() {
            debug!(strategy = self.name(), side = ?board.turn(), "no legal move");
            return Vec::new();
        }
        let chain = self.choose(board, &options);
        debug!(
            strategy = self.name(),
            side = ?board.turn(),
            pieces = options.len(),
            len = chain.len(),
            "chain selected"
        );
        chain
    }
}

/// Prefer the chain with the most moves. Ties go to the first one found.
#[derive(Clone, Copy, Debug, Default)]
pub struct LongestChain;

impl Strategy for LongestChain {
    fn name(&self) -> &'static str {
        "longest"
    }

    fn choose(&mut self, _board: &Board, options: &[PieceChains]) -> Chain {
        let mut best: Option<&Chain> = None;
        for chain in options.iter().flat_map(|options| &options.chains) {
            if best.map_or(true, |longest| chain.len() > longest.len()) {
                best = Some(chain);
            }
        }
        best.cloned().unwrap_or_default()
    }
}

/// Steer the mover's average position toward a reference point recorded at
/// game start: the average position of the other side's pieces, i.e. the
/// centre of the block this side has to fill.
#[derive(Clone, Debug)]
pub struct MirrorOpponent {
    side: Piece,
    reference: Option<Centroid>,
}

impl MirrorOpponent {
    pub fn new(side: Piece) -> MirrorOpponent {
        MirrorOpponent {
            side,
            reference: None,
        }
    }

    pub fn reference(&self) -> Option<Centroid> {
        self.reference
    }

    /// Mover's average position after playing `chain` on a copy of `board`.
    fn resulting_average(board: &Board, chain: &Chain) -> Option<Centroid> {
        let mover = chain.first()?.piece;
        let mut after = board.clone();
        for &mov in chain {
            after.perform_move(mov, false);
        }
        after.average_position(mover)
    }
}

impl Strategy for MirrorOpponent {
    fn name(&self) -> &'static str {
        "mirror"
    }

    fn on_start(&mut self, board: &Board) {
        self.reference = board.average_position(self.side.opponent());
        debug!(side = ?self.side, reference = ?self.reference, "reference recorded");
    }

    fn choose(&mut self, board: &Board, options: &[PieceChains]) -> Chain {
        if self.reference.is_none() {
            warn!(side = ?self.side, "mirror strategy used before on_start; recording now");
            self.on_start(board);
        }
        let Some(reference) = self.reference else {
            return options[0].chains[0].clone();
        };

        let mut best: Option<(f64, &Chain)> = None;
        for chain in options.iter().flat_map(|options| &options.chains) {
            let Some(average) = Self::resulting_average(board, chain) else {
                continue;
            };
            let distance = average.distance(&reference);
            if best.map_or(true, |(closest, _)| distance < closest) {
                best = Some((distance, chain));
            }
        }
        best.map(|(_, chain)| chain.clone()).unwrap_or_default()
    }
}

/// Uniformly random piece, then a uniformly random chain for it.
#[derive(Clone, Debug)]
pub struct RandomChain {
    rng: StdRng,
}

impl RandomChain {
    pub fn new(seed: u64) -> RandomChain {
        RandomChain {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Strategy for RandomChain {
    fn name(&self) -> &'static str {
        "random"
    }

    fn choose(&mut self, _board: &Board, options: &[PieceChains]) -> Chain {
        let piece = &options[self.rng.random_range(0..options.len())];
        piece.chains[self.rng.random_range(0..piece.chains.len())].clone()
    }
}

/// Selector for the built-in strategies, chosen when a game is set up.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StrategyKind {
    Longest,
    Mirror,
    #[default]
    Random,
}

impl StrategyKind {
    pub const ALL: [StrategyKind; 3] = [
        StrategyKind::Longest,
        StrategyKind::Mirror,
        StrategyKind::Random,
    ];

    pub fn name(self) -> &'static str {
        match self {
            StrategyKind::Longest => "longest",
            StrategyKind::Mirror => "mirror",
            StrategyKind::Random => "random",
        }
    }

    /// Build a strategy playing `side`. `seed` only matters for `Random`.
    pub fn build(self, side: Piece, seed: u64) -> Box<dyn Strategy> {
        match self {
            StrategyKind::Longest => Box::new(LongestChain),
            StrategyKind::Mirror => Box::new(MirrorOpponent::new(side)),
            StrategyKind::Random => Box::new(RandomChain::new(seed)),
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for StrategyKind {
    type Err = LeapError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_ascii_lowercase();
        match StrategyKind::ALL.into_iter().find(|kind| kind.name() == name) {
            Some(kind) => Ok(kind),
            None => Err(LeapError::UnknownStrategy { name }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Move;

    fn pos(row: u8, col: u8) -> Pos {
        Pos::from_row_col(row, col)
    }

    /// Player piece at (7,0) with a three-hop line east and a lone step piece.
    fn hop_line_board() -> Board {
        let mut board = Board::empty();
        board.set_piece(pos(7, 0), Piece::Player);
        board.set_piece(pos(7, 1), Piece::Opponent);
        board.set_piece(pos(7, 3), Piece::Opponent);
        board.set_piece(pos(7, 5), Piece::Opponent);
        board.set_piece(pos(6, 0), Piece::Opponent);
        board.set_piece(pos(5, 0), Piece::Opponent);
        board.set_piece(pos(3, 3), Piece::Player);
        board
    }

    /// Player piece at (0,0) boxed in so that it has no move.
    fn stuck_board() -> Board {
        let mut board = Board::empty();
        board.set_piece(pos(0, 0), Piece::Player);
        for &(r, c) in &[(0, 1), (1, 0), (0, 2), (2, 0)] {
            board.set_piece(pos(r, c), Piece::Opponent);
        }
        board
    }

    fn assert_playable(board: &Board, chain: &Chain) {
        let mut board = board.clone();
        for mov in chain {
            assert!(board.is_valid_move(mov, board.turn()), "{mov} rejected");
            board.perform_move(*mov, false);
        }
    }

    #[test]
    fn test_piece_chains_skips_stuck_pieces() {
        let mut board = stuck_board();
        board.set_piece(pos(4, 4), Piece::Player);
        let options = piece_chains(&board);
        assert_eq!(options.len(), 1);
        assert_eq!(options[0].src, pos(4, 4));
    }

    #[test]
    fn test_no_move_yields_empty_chain() {
        let board = stuck_board();
        for kind in StrategyKind::ALL {
            let mut strategy = kind.build(Piece::Player, 7);
            strategy.on_start(&board);
            assert!(strategy.next_moves(&board).is_empty(), "{kind}");
        }
    }

    #[test]
    fn test_longest_picks_longest_chain() {
        let board = hop_line_board();
        let chain = LongestChain.next_moves(&board);
        assert_eq!(chain.len(), 3);
        assert_eq!(chain[0].src, pos(7, 0));
        assert_eq!(chain[2].dest, pos(7, 6));
        assert_playable(&board, &chain);
    }

    #[test]
    fn test_longest_tie_goes_to_first() {
        let board = Board::new();
        let options = piece_chains(&board);
        let longest = options
            .iter()
            .flat_map(|o| &o.chains)
            .map(Vec::len)
            .max()
            .unwrap();
        let first = options
            .iter()
            .flat_map(|o| &o.chains)
            .find(|c| c.len() == longest)
            .unwrap()
            .clone();
        assert_eq!(LongestChain.next_moves(&board), first);
    }

    #[test]
    fn test_mirror_records_reference_on_start() {
        let board = Board::new();
        let mut strategy = MirrorOpponent::new(Piece::Opponent);
        assert_eq!(strategy.reference(), None);
        strategy.on_start(&board);
        assert_eq!(strategy.reference(), Some(Centroid { row: 6.0, col: 1.5 }));
    }

    #[test]
    fn test_mirror_minimises_distance_to_reference() {
        let board = Board::new();
        let mut strategy = MirrorOpponent::new(Piece::Player);
        strategy.on_start(&board);
        let reference = strategy.reference().unwrap();

        let chosen = strategy.next_moves(&board);
        assert_playable(&board, &chosen);
        let chosen_distance = MirrorOpponent::resulting_average(&board, &chosen)
            .unwrap()
            .distance(&reference);

        for options in piece_chains(&board) {
            for chain in &options.chains {
                let distance = MirrorOpponent::resulting_average(&board, chain)
                    .unwrap()
                    .distance(&reference);
                assert!(chosen_distance <= distance);
            }
        }

        let start = board.average_position(Piece::Player).unwrap();
        assert!(chosen_distance < start.distance(&reference));
    }

    #[test]
    fn test_mirror_without_on_start_still_moves() {
        let board = Board::new();
        let mut strategy = MirrorOpponent::new(Piece::Player);
        let chain = strategy.next_moves(&board);
        assert!(!chain.is_empty());
        assert!(strategy.reference().is_some());
    }

    #[test]
    fn test_random_is_reproducible_and_legal() {
        let board = Board::new();
        let first = RandomChain::new(42).next_moves(&board);
        let second = RandomChain::new(42).next_moves(&board);
        assert_eq!(first, second);
        assert_playable(&board, &first);
    }

    #[test]
    fn test_random_only_picks_pieces_that_can_move() {
        let mut board = stuck_board();
        board.set_piece(pos(4, 4), Piece::Player);
        let mut strategy = RandomChain::new(3);
        for _ in 0..20 {
            let chain = strategy.next_moves(&board);
            assert_eq!(chain[0].src, pos(4, 4));
        }
    }

    #[test]
    fn test_strategy_kind_parse() {
        assert_eq!("longest".parse::<StrategyKind>(), Ok(StrategyKind::Longest));
        assert_eq!(" Mirror ".parse::<StrategyKind>(), Ok(StrategyKind::Mirror));
        assert_eq!("random".parse::<StrategyKind>(), Ok(StrategyKind::Random));
        assert_eq!(
            "greedy".parse::<StrategyKind>(),
            Err(LeapError::UnknownStrategy {
                name: "greedy".to_string()
            })
        );
        for kind in StrategyKind::ALL {
            assert_eq!(kind.to_string().parse::<StrategyKind>(), Ok(kind));
            assert_eq!(kind.build(Piece::Opponent, 0).name(), kind.name());
        }
    }

    #[test]
    fn test_opponent_mirror_heads_for_player_home() {
        let mut board = Board::new();
        let mut strategy = MirrorOpponent::new(Piece::Opponent);
        strategy.on_start(&board);
        board.perform_move(Move::new(pos(5, 3), pos(4, 3), Piece::Player), true);
        assert_eq!(board.turn(), Piece::Opponent);

        let reference = strategy.reference().unwrap();
        let before = board.average_position(Piece::Opponent).unwrap();
        let chain = strategy.next_moves(&board);
        assert_playable(&board, &chain);
        let after = MirrorOpponent::resulting_average(&board, &chain).unwrap();
        assert!(after.distance(&reference) < before.distance(&reference));
    }
}
