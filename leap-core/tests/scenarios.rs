//! End-to-end rule scenarios through the public API.

use leap_core::{Board, Game, Move, Piece, Pos, Region, StrategyKind, PIECES_PER_SIDE};

fn pos(row: u8, col: u8) -> Pos {
    Pos::from_row_col(row, col)
}

#[test]
fn test_initial_layout() {
    let board = Board::new();
    assert_eq!(board.turn(), Piece::Player);

    let players = board.positions_of(Piece::Player);
    assert_eq!(players.len(), PIECES_PER_SIDE);
    assert!(players
        .iter()
        .all(|p| (5..=7).contains(&p.row) && (0..=3).contains(&p.col)));

    let opponents = board.positions_of(Piece::Opponent);
    assert_eq!(opponents.len(), PIECES_PER_SIDE);
    assert!(opponents
        .iter()
        .all(|p| (0..=2).contains(&p.row) && (4..=7).contains(&p.col)));
}

#[test]
fn test_init_resets_a_played_board() {
    let mut board = Board::new();
    board.perform_move(Move::new(pos(5, 0), pos(4, 0), Piece::Player), true);
    assert_eq!(board.turn(), Piece::Opponent);
    board.init();
    assert_eq!(board, Board::new());
}

#[test]
fn test_step_destination_from_start() {
    let board = Board::new();
    let dests: Vec<Pos> = board
        .valid_moves(pos(5, 0), Piece::Player)
        .iter()
        .map(|m| m.dest)
        .collect();
    assert!(dests.contains(&pos(4, 0)));
    assert!(!dests.contains(&pos(3, 0)));
    assert!(!board.is_valid_move(&Move::new(pos(5, 0), pos(3, 0), Piece::Player), Piece::Player));
}

#[test]
fn test_hop_then_cycle_rejected() {
    let mut board = Board::empty();
    board.set_piece(pos(4, 4), Piece::Player);
    board.set_piece(pos(3, 4), Piece::Opponent);

    let hop = Move::new(pos(4, 4), pos(2, 4), Piece::Player);
    assert!(board.is_valid_move(&hop, Piece::Player));
    board.perform_move(hop, false);

    let back = Move::new(pos(2, 4), pos(4, 4), Piece::Player);
    assert!(!board.is_valid_move(&back, Piece::Player));
}

#[test]
fn test_player_wins_from_opponent_home() {
    let mut board = Board::empty();
    for square in Region::OPPONENT_HOME.positions() {
        board.set_piece(square, Piece::Player);
    }
    assert_eq!(board.positions_of(Piece::Player).len(), 12);
    assert_eq!(board.winner(), Some(Piece::Player));
}

#[test]
fn test_mixed_board_has_no_winner() {
    let mut board = Board::new();
    // Swap one pair of pieces across the board: neither side is complete.
    board.set_piece(pos(0, 7), Piece::Player);
    board.set_piece(pos(7, 0), Piece::Opponent);
    assert_eq!(board.winner(), None);
}

#[test]
fn test_try_end_turn_twice() {
    let mut board = Board::new();
    board.perform_move(Move::new(pos(6, 2), pos(4, 2), Piece::Player), false);
    assert!(board.try_end_turn());
    assert!(!board.try_end_turn());
    assert_eq!(board.turn(), Piece::Opponent);
}

#[test]
fn test_move_serializes_for_shells() {
    let mov = Move::new(pos(5, 0), pos(4, 0), Piece::Player);
    let json = serde_json::to_value(mov).unwrap();
    assert_eq!(
        json,
        serde_json::json!({
            "src": { "row": 5, "col": 0 },
            "dest": { "row": 4, "col": 0 },
            "piece": "player"
        })
    );
    let back: Move = serde_json::from_value(json).unwrap();
    assert_eq!(back, mov);
}

#[test]
fn test_human_versus_cpu_opening() {
    let mut game = Game::with_kind(StrategyKind::Mirror, 0);
    let opening = Move::new(pos(5, 3), pos(4, 3), Game::HUMAN);
    assert_eq!(game.play(opening), Ok(None));

    let reply = game.cpu_turn().unwrap();
    assert!(!reply.is_empty());
    assert_eq!(game.board().turn(), Game::HUMAN);

    let stack = game.board().move_stack();
    assert_eq!(stack[0], opening);
    assert_eq!(&stack[1..], reply.as_slice());
}

#[test]
fn test_off_board_move_never_reaches_the_board() {
    let json = r#"{"src":{"row":9,"col":0},"dest":{"row":8,"col":0},"piece":"player"}"#;
    assert!(serde_json::from_str::<Move>(json).is_err());

    let mut game = Game::with_kind(StrategyKind::Random, 3);
    let off_board = Move::new(Pos { row: 9, col: 0 }, Pos { row: 8, col: 0 }, Game::HUMAN);
    assert!(game.play(off_board).is_err());
    assert_eq!(game.board(), &Board::new());
}
