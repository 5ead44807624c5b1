//! Uniform-random strategy for the lower difficulty tiers.

use rand::prelude::*;

use crate::bots::trait_def::{BotMove, BotStrategy, BotView};

/// Picks uniformly among the currently-valid moves, or nothing when
/// blocked. Deterministic when seeded, which the tests rely on.
pub struct RandomStrategy {
    rng: StdRng,
}

impl RandomStrategy {
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_entropy(),
        };
        Self { rng }
    }
}

impl BotStrategy for RandomStrategy {
    fn choose_move(&mut self, view: &BotView) -> Option<BotMove> {
        view.valid_moves().choose(&mut self.rng).copied()
    }
}
