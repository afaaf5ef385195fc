//! Leap Web API
//!
//! Serves a single in-memory game between a human (Player) and the CPU
//! (Opponent) to a browser front end. The rules and the CPU strategies live
//! in leap-core; this binary only translates JSON to core calls and back.

use std::fmt::Display;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use clap::Parser;
use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use leap_core::{Board, Game, Move, Pos, StrategyKind, BOARD_SIZE};

// =============================================================================
// Configuration
// =============================================================================

#[derive(Parser, Debug)]
#[command(name = "leap-api", about = "HTTP API for the Leap hopping game")]
struct Config {
    /// Port to listen on
    #[arg(long, env = "PORT", default_value_t = 5000)]
    port: u16,

    /// Address to bind
    #[arg(long, env = "LEAP_HOST", default_value = "0.0.0.0")]
    host: String,

    /// CPU strategy: longest, mirror or random
    #[arg(long, env = "LEAP_STRATEGY", default_value_t = StrategyKind::Random)]
    strategy: StrategyKind,

    /// Seed for the random strategy (drawn from the OS if unset)
    #[arg(long, env = "LEAP_SEED")]
    seed: Option<u64>,
}

// =============================================================================
// Session State
// =============================================================================

/// Shared application state
struct AppStateInner {
    session: Mutex<Game>,
    /// Source of seeds for strategies built on reset
    seeds: Mutex<StdRng>,
}

type AppState = Arc<AppStateInner>;

impl AppStateInner {
    fn new(kind: StrategyKind, seed: u64) -> Self {
        let mut seeds = StdRng::seed_from_u64(seed);
        let game = Game::with_kind(kind, seeds.random());
        Self {
            session: Mutex::new(game),
            seeds: Mutex::new(seeds),
        }
    }

    /// A handler that panicked mid-request leaves a consistent board behind,
    /// so a poisoned lock is still usable.
    fn game(&self) -> MutexGuard<'_, Game> {
        self.session.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn next_seed(&self) -> u64 {
        self.seeds
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .random()
    }
}

// =============================================================================
// JSON Models
// =============================================================================

#[derive(Serialize, Debug)]
struct MoveModel {
    src: [u8; 2],
    dest: [u8; 2],
    piece: u8,
    notation: String,
}

#[derive(Serialize, Debug)]
struct GameStateModel {
    /// Rows top to bottom: 0 empty, 1 player, 2 cpu
    board: Vec<Vec<u8>>,
    turn: u8,
    winner: Option<u8>,
    /// The side to move has no legal move; the game cannot continue
    stalled: bool,
    last_move: Option<MoveModel>,
    /// Moves of the chain the side to move is in the middle of
    chain: Vec<MoveModel>,
    move_count: usize,
    strategy: &'static str,
}

#[derive(Deserialize, Debug)]
struct MoveRequest {
    src: [u8; 2],
    dest: [u8; 2],
}

#[derive(Deserialize, Debug, Default)]
struct ResetRequest {
    strategy: Option<String>,
}

#[derive(Serialize, Debug)]
struct EndTurnModel {
    ended: bool,
    game: GameStateModel,
}

#[derive(Serialize, Debug)]
struct CpuTurnModel {
    chain: Vec<MoveModel>,
    game: GameStateModel,
}

#[derive(Serialize, Debug)]
struct HistoryEntryModel {
    index: usize,
    player: u8,
    notation: String,
}

#[derive(Serialize, Debug)]
struct HistoryModel {
    moves: Vec<HistoryEntryModel>,
    total_moves: usize,
}

#[derive(Serialize, Debug)]
struct HealthModel {
    status: String,
}

#[derive(Serialize, Debug)]
struct ErrorModel {
    detail: String,
}

type ApiError = (StatusCode, Json<ErrorModel>);

fn bad_request(err: impl Display) -> ApiError {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorModel {
            detail: err.to_string(),
        }),
    )
}

// =============================================================================
// Conversion Functions
// =============================================================================

fn move_to_model(mov: &Move) -> MoveModel {
    MoveModel {
        src: [mov.src.row, mov.src.col],
        dest: [mov.dest.row, mov.dest.col],
        piece: mov.piece as u8,
        notation: mov.to_string(),
    }
}

fn game_to_model(game: &Game) -> GameStateModel {
    let board = game.board();
    let rows = (0..BOARD_SIZE)
        .map(|row| {
            (0..BOARD_SIZE)
                .map(|col| board.piece_at(Pos::from_row_col(row, col)) as u8)
                .collect()
        })
        .collect();

    GameStateModel {
        board: rows,
        turn: board.turn() as u8,
        winner: game.winner().map(|piece| piece as u8),
        stalled: game.is_stalled(),
        last_move: board.last_move().map(move_to_model),
        chain: board.current_chain().iter().map(move_to_model).collect(),
        move_count: board.move_stack().len(),
        strategy: game.strategy_name(),
    }
}

fn request_to_move(req: &MoveRequest, board: &Board) -> Result<Move, ApiError> {
    let src = Pos::new(req.src[0], req.src[1]).map_err(bad_request)?;
    let dest = Pos::new(req.dest[0], req.dest[1]).map_err(bad_request)?;
    Ok(Move::new(src, dest, board.piece_at(src)))
}

// =============================================================================
// API Endpoints
// =============================================================================

async fn get_game(State(state): State<AppState>) -> Json<GameStateModel> {
    Json(game_to_model(&state.game()))
}

async fn get_moves(
    State(state): State<AppState>,
    Path((row, col)): Path<(u8, u8)>,
) -> Result<Json<Vec<MoveModel>>, ApiError> {
    let src = Pos::new(row, col).map_err(bad_request)?;
    let moves = state.game().valid_moves(src);
    Ok(Json(moves.iter().map(move_to_model).collect()))
}

async fn make_move(
    State(state): State<AppState>,
    Json(req): Json<MoveRequest>,
) -> Result<Json<GameStateModel>, ApiError> {
    let mut game = state.game();
    let mov = request_to_move(&req, game.board())?;
    if mov.piece != Game::HUMAN {
        return Err(bad_request(format!("no player piece on {}", mov.src)));
    }

    game.play(mov).map_err(bad_request)?;
    Ok(Json(game_to_model(&game)))
}

async fn end_turn(State(state): State<AppState>) -> Json<EndTurnModel> {
    let mut game = state.game();
    let ended = game.end_turn();
    Json(EndTurnModel {
        ended,
        game: game_to_model(&game),
    })
}

async fn cpu_turn(State(state): State<AppState>) -> Result<Json<CpuTurnModel>, ApiError> {
    let mut game = state.game();
    let chain = game.cpu_turn().map_err(bad_request)?;
    Ok(Json(CpuTurnModel {
        chain: chain.iter().map(move_to_model).collect(),
        game: game_to_model(&game),
    }))
}

async fn reset_game(
    State(state): State<AppState>,
    body: Option<Json<ResetRequest>>,
) -> Result<Json<GameStateModel>, ApiError> {
    let req = body.map(|Json(req)| req).unwrap_or_default();
    let mut game = state.game();

    match req.strategy {
        Some(name) => {
            let kind: StrategyKind = name.parse().map_err(bad_request)?;
            game.set_strategy(kind.build(Game::CPU, state.next_seed()));
        }
        None => game.new_game(),
    }
    debug!(strategy = game.strategy_name(), "reset");
    Ok(Json(game_to_model(&game)))
}

async fn get_history(State(state): State<AppState>) -> Json<HistoryModel> {
    let game = state.game();
    let stack = game.board().move_stack();

    let moves = stack
        .iter()
        .enumerate()
        .map(|(i, mov)| HistoryEntryModel {
            index: i + 1,
            player: mov.piece as u8,
            notation: mov.to_string(),
        })
        .collect();

    Json(HistoryModel {
        moves,
        total_moves: stack.len(),
    })
}

async fn health() -> Json<HealthModel> {
    Json(HealthModel {
        status: "ok".to_string(),
    })
}

// =============================================================================
// Main
// =============================================================================

fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/game", get(get_game))
        .route("/moves/{row}/{col}", get(get_moves))
        .route("/move", post(make_move))
        .route("/end-turn", post(end_turn))
        .route("/cpu", post(cpu_turn))
        .route("/reset", post(reset_game))
        .route("/history", get(get_history))
        .route("/health", get(health))
        .layer(cors)
        .with_state(state)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::parse();
    let seed = config.seed.unwrap_or_else(|| rand::rng().random());
    info!(strategy = %config.strategy, seed, "starting session");

    let state: AppState = Arc::new(AppStateInner::new(config.strategy, seed));

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Leap API running on http://{addr}");
    axum::serve(listener, app(state)).await?;
    Ok(())
}
