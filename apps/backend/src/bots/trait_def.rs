//! Bot strategy trait definition.

use crate::domain::cards::{Card, CardId};
use crate::domain::state::{opponent, GameState, Phase, PileId, Seat};
use crate::domain::validator::ranks_adjacent;

/// What a bot is allowed to know: the same view a human client renders.
/// Own hand in full, pile tops, and counts only for the opponent.
#[derive(Debug, Clone)]
pub struct BotView {
    pub seat: Seat,
    pub phase: Phase,
    pub hand: Vec<Card>,
    pub pile_tops: [Option<Card>; 2],
    pub kitty_size: usize,
    pub opponent_hand_size: usize,
}

/// A play the bot wants to propose.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BotMove {
    pub card_id: CardId,
    pub pile: PileId,
}

impl BotView {
    /// Snapshot the state from one seat's perspective.
    pub fn from_state(state: &GameState, seat: Seat) -> Self {
        let player = &state.players[seat as usize];
        Self {
            seat,
            phase: state.phase,
            hand: player.hand.clone(),
            pile_tops: state.pile_tops(),
            kitty_size: player.kitty.len(),
            opponent_hand_size: state.players[opponent(seat) as usize].hand.len(),
        }
    }

    /// Every (card, pile) pair that would pass validation right now.
    pub fn valid_moves(&self) -> Vec<BotMove> {
        let mut moves = Vec::new();
        for card in &self.hand {
            for pile in PileId::ALL {
                if let Some(top) = &self.pile_tops[pile.index()] {
                    if ranks_adjacent(card.rank, top.rank) {
                        moves.push(BotMove {
                            card_id: card.id,
                            pile,
                        });
                    }
                }
            }
        }
        moves
    }
}

/// Move selection policy, one instance per agent.
///
/// Implementations pick from `view.valid_moves()` only; the proposal still
/// goes through the same validator and arbiter path a human client uses,
/// so a stale choice simply loses the race. Returning `None` means the bot
/// sits this cycle out.
pub trait BotStrategy: Send {
    fn choose_move(&mut self, view: &BotView) -> Option<BotMove>;
}
