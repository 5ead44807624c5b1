//! Game state container and the zones it is partitioned into.

use serde::{Deserialize, Serialize};

use crate::domain::cards::Card;

pub type Seat = u8; // 0..=1
pub const SEATS: usize = 2;

/// A hand never holds more than five cards.
pub const HAND_LIMIT: usize = 5;
pub const DECK_SIZE: usize = 52;

/// Returns the opposing seat (0 ↔ 1).
#[inline]
pub fn opponent(seat: Seat) -> Seat {
    1 - seat
}

/// Overall room progression phases.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Room created, waiting for two seated players and a start signal.
    Waiting,
    /// Deal complete, both sides racing.
    InProgress,
    /// One side emptied hand and kitty (or the game stalemated).
    Finished,
}

/// The two shared center piles, addressed by position.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PileId {
    Left,
    Right,
}

impl PileId {
    pub const ALL: [PileId; 2] = [PileId::Left, PileId::Right];

    #[inline]
    pub fn index(self) -> usize {
        match self {
            PileId::Left => 0,
            PileId::Right => 1,
        }
    }
}

/// One player's private zones.
#[derive(Debug, Clone, Default)]
pub struct PlayerState {
    /// Up to [`HAND_LIMIT`] playable cards.
    pub hand: Vec<Card>,
    /// Face-down reserve; draw = pop from the back.
    pub kitty: Vec<Card>,
}

impl PlayerState {
    /// Hand plus kitty; zero means this player has won.
    pub fn cards_remaining(&self) -> usize {
        self.hand.len() + self.kitty.len()
    }
}

/// A shared center pile.
///
/// `prev_top` holds the top card as it was before the most recent commit to
/// this pile. A proposal that validates against `prev_top` but not against
/// the current top lost a race and is rejected `StaleTarget` rather than
/// `PileNotAdjacent`.
#[derive(Debug, Clone, Default)]
pub struct CenterPile {
    pub stack: Vec<Card>,
    pub prev_top: Option<Card>,
    /// Cards cleared by re-deals. Never returns to play; counted for
    /// the conservation invariant.
    pub exhausted: Vec<Card>,
}

impl CenterPile {
    pub fn top(&self) -> Option<&Card> {
        self.stack.last()
    }
}

/// Entire per-room game container. Single owner: the room actor; every
/// other component sees read snapshots only.
#[derive(Debug, Clone)]
pub struct GameState {
    pub phase: Phase,
    pub players: [PlayerState; SEATS],
    pub piles: [CenterPile; 2],
    pub winner: Option<Seat>,
    /// Total order of committed mutations (moves, pickups, re-deals).
    pub commit_seq: u64,
    /// How many cards this game was dealt. Conservation invariant: the
    /// zones must always sum back to this.
    pub dealt_cards: usize,
}

impl GameState {
    /// An empty pre-deal state.
    pub fn waiting() -> Self {
        Self {
            phase: Phase::Waiting,
            players: [PlayerState::default(), PlayerState::default()],
            piles: [CenterPile::default(), CenterPile::default()],
            winner: None,
            commit_seq: 0,
            dealt_cards: 0,
        }
    }

    pub fn pile(&self, pile: PileId) -> &CenterPile {
        &self.piles[pile.index()]
    }

    /// Every card currently tracked by the game, across all zones.
    pub fn total_cards(&self) -> usize {
        let players: usize = self.players.iter().map(PlayerState::cards_remaining).sum();
        let piles: usize = self
            .piles
            .iter()
            .map(|p| p.stack.len() + p.exhausted.len())
            .sum();
        players + piles
    }

    /// Pile tops as a pair, in `PileId` order.
    pub fn pile_tops(&self) -> [Option<Card>; 2] {
        [
            self.piles[0].top().copied(),
            self.piles[1].top().copied(),
        ]
    }
}
