// Library exports for the Snake game core
// The server, replay and simulate binaries all build on these modules

pub mod bot;
pub mod config;
pub mod debug_logger;
pub mod game;
pub mod game_loop;
pub mod replay;
pub mod simulation;
pub mod store;
pub mod types;
