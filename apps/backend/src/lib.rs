#![deny(clippy::wildcard_imports)]
#![cfg_attr(test, allow(clippy::wildcard_imports))]

pub mod bots;
pub mod domain;
pub mod error;
pub mod render;
pub mod room;
pub mod routes;
pub mod state;
pub mod utils;
pub mod ws;

#[cfg(test)]
pub mod test_bootstrap;

// Re-exports for public API
pub use bots::{BotDifficulty, BotProfile, BotStrategy};
pub use domain::{Card, CardId, GameSnapshot, GameState, Phase, PileId, Rank, RejectReason, Suit};
pub use error::AppError;
pub use render::{DifficultyPrompt, GameRenderer};
pub use room::{BotSpec, RoomRegistry};
pub use state::app_state::AppState;

// Auto-initialize logging for unit tests
#[cfg(test)]
#[ctor::ctor]
fn init_test_logging() {
    test_bootstrap::logging::init();
}
