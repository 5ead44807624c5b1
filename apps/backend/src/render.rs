//! Presentation seams.
//!
//! The engine never talks to an input/output device directly. Anything
//! that wants to draw a game or ask for a difficulty implements these;
//! the bot simulator ships the only CLI implementation.

use crate::bots::profiles::BotDifficulty;
use crate::domain::snapshot::GameSnapshot;

/// Draws one snapshot of a game. Called after every authoritative update.
pub trait GameRenderer {
    fn render(&mut self, snapshot: &GameSnapshot);
}

/// Asks the local user which opponent tier to face.
pub trait DifficultyPrompt {
    fn prompt_difficulty(&mut self) -> BotDifficulty;
}
