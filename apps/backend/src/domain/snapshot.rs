//! Per-viewer wire views of the game state.
//!
//! Seated players see their own hand; everyone else's hand is reported as
//! a size only. Spectators receive the same snapshot with no `you` block.

use serde::{Deserialize, Serialize};

use crate::domain::cards::Card;
use crate::domain::state::{GameState, Phase, Seat};

/// What everyone may know about one seat.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeatView {
    pub name: String,
    pub hand_size: usize,
    pub kitty_size: usize,
}

/// The viewer's private slice of the state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrivateView {
    pub seat: Seat,
    pub hand: Vec<Card>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameSnapshot {
    pub room_id: String,
    pub phase: Phase,
    /// Position of the latest commit reflected by this snapshot.
    pub seq: u64,
    /// Visible pile tops, `PileId` order. `None` only before the deal.
    pub pile_tops: [Option<Card>; 2],
    pub seats: [SeatView; 2],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub you: Option<PrivateView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub winner: Option<Seat>,
    /// Loser's remaining card count, present once the game is over.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lost_by: Option<usize>,
}

impl GameSnapshot {
    pub fn for_viewer(
        state: &GameState,
        room_id: &str,
        seat_names: [&str; 2],
        viewer: Option<Seat>,
    ) -> Self {
        let seats = [0usize, 1].map(|i| SeatView {
            name: seat_names[i].to_string(),
            hand_size: state.players[i].hand.len(),
            kitty_size: state.players[i].kitty.len(),
        });

        let you = viewer.map(|seat| PrivateView {
            seat,
            hand: state.players[seat as usize].hand.clone(),
        });

        let lost_by = match (state.phase, state.winner) {
            (Phase::Finished, Some(winner)) => Some(
                state.players[crate::domain::state::opponent(winner) as usize].cards_remaining(),
            ),
            _ => None,
        };

        Self {
            room_id: room_id.to_string(),
            phase: state.phase,
            seq: state.commit_seq,
            pile_tops: state.pile_tops(),
            seats,
            you,
            winner: state.winner,
            lost_by,
        }
    }
}
