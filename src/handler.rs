// HTTP handler bindings for the game core
//
// This module provides thin wrapper functions that bind Rocket HTTP routes
// to the bot engine and the turn resolver. Handlers are responsible for:
// - Deserializing incoming JSON requests
// - Extracting shared state from Rocket's managed state
// - Delegating to core methods
// - Serializing responses

use log::info;
use rocket::serde::json::Json;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use neon_snake::debug_logger::DebugLogger;
use neon_snake::game::{GameState, TurnReport, TurnResolver};
use neon_snake::types::{Difficulty, MoveRequest};

/// Everything the routes share
pub struct AppState {
    pub resolver: TurnResolver,
    pub logger: DebugLogger,
    pub decisions: AtomicU64,
}

impl AppState {
    pub fn new(resolver: TurnResolver, logger: DebugLogger) -> Self {
        AppState {
            resolver,
            logger,
            decisions: AtomicU64::new(0),
        }
    }
}

/// GET / endpoint
/// Returns server metadata
#[get("/")]
pub fn index(app: &rocket::State<AppState>) -> Json<Value> {
    let config = app.resolver.config();

    Json(json!({
        "name": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
        "grid_size": config.board.grid_size,
        "difficulties": Difficulty::all().iter().map(|d| d.as_str()).collect::<Vec<_>>(),
    }))
}

/// POST /move endpoint
/// Runs the bot engine on the posted board and returns its direction
#[post("/move", format = "json", data = "<move_req>")]
pub fn get_move(app: &rocket::State<AppState>, move_req: Json<MoveRequest>) -> Json<Value> {
    let start_time = Instant::now();
    let request = move_req.into_inner();
    let sequence = app.decisions.fetch_add(1, Ordering::Relaxed);

    let chosen_move = app.resolver.bot().get_move(
        &request.bot,
        request.opponent.as_ref(),
        request.food,
        request.difficulty,
        &mut rand::rng(),
    );

    info!(
        "Decision {}: snake {} chose {} on {} ({}us)",
        sequence,
        request.bot.id,
        chosen_move.as_str(),
        request.difficulty.as_str(),
        start_time.elapsed().as_micros()
    );

    app.logger.log_move(sequence, request, chosen_move);

    Json(json!({ "move": chosen_move.as_str() }))
}

/// POST /tick endpoint
/// Resolves one tick of the posted snapshot
#[post("/tick", format = "json", data = "<state>")]
pub fn tick(app: &rocket::State<AppState>, state: Json<GameState>) -> Json<TurnReport> {
    let report = app.resolver.resolve(&state, &mut rand::rng());
    Json(report)
}
