//! Chain strategy for the higher difficulty tiers.
//!
//! Greedy one-ply lookahead: among the valid moves, prefer the one that
//! leaves the most follow-up plays from the remaining hand, i.e. the play
//! that empties the hand soonest. Ties break randomly so the bot does not
//! telegraph a fixed ordering. Heuristic quality is deliberately a policy
//! detail behind [`BotStrategy`]; nothing outside this module depends on it.

use rand::prelude::*;

use crate::bots::trait_def::{BotMove, BotStrategy, BotView};
use crate::domain::cards::Card;
use crate::domain::validator::ranks_adjacent;

pub struct ChainStrategy {
    rng: StdRng,
}

impl ChainStrategy {
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_entropy(),
        };
        Self { rng }
    }

    /// How many cards could be played immediately after `mv`, against the
    /// tops as they would stand once the moved card lands.
    fn follow_ups(view: &BotView, mv: &BotMove) -> usize {
        let played = match view.hand.iter().find(|c| c.id == mv.card_id) {
            Some(card) => *card,
            None => return 0,
        };

        let mut tops: Vec<Card> = Vec::with_capacity(2);
        for (i, top) in view.pile_tops.iter().enumerate() {
            if i == mv.pile.index() {
                tops.push(played);
            } else if let Some(top) = top {
                tops.push(*top);
            }
        }

        view.hand
            .iter()
            .filter(|c| c.id != played.id)
            .filter(|c| tops.iter().any(|t| ranks_adjacent(c.rank, t.rank)))
            .count()
    }
}

impl BotStrategy for ChainStrategy {
    fn choose_move(&mut self, view: &BotView) -> Option<BotMove> {
        let moves = view.valid_moves();
        let best = moves
            .iter()
            .map(|mv| Self::follow_ups(view, mv))
            .max()?;

        let candidates: Vec<BotMove> = moves
            .into_iter()
            .filter(|mv| Self::follow_ups(view, mv) == best)
            .collect();
        candidates.choose(&mut self.rng).copied()
    }
}
