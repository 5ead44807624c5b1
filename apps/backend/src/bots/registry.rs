//! Difficulty → strategy wiring.
//!
//! Keep ordering stable and constructors side-effect free; same seed ⇒
//! same behavior.

use crate::bots::chain::ChainStrategy;
use crate::bots::profiles::BotDifficulty;
use crate::bots::random::RandomStrategy;
use crate::bots::trait_def::BotStrategy;

/// Build the move-selection policy for a difficulty tier.
///
/// The lower tiers play uniformly random valid moves; their difficulty
/// comes from the profile's reaction delays. The upper tiers add the
/// chain lookahead on top of much shorter delays.
pub fn make_strategy(difficulty: BotDifficulty, seed: Option<u64>) -> Box<dyn BotStrategy> {
    match difficulty {
        BotDifficulty::Easy | BotDifficulty::Medium => Box::new(RandomStrategy::new(seed)),
        BotDifficulty::Hard | BotDifficulty::Impossible => Box::new(ChainStrategy::new(seed)),
    }
}
