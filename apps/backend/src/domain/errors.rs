//! Domain-level error types.
//!
//! `RejectReason` covers every recoverable way a proposal can fail; it is
//! reported to the originating caller only and never terminates a room.
//! `EngineError` is the fatal class: an internal invariant violation that
//! must abort the room rather than continue with corrupted state.

use std::error::Error;
use std::fmt::{Display, Formatter, Result as FmtResult};

use serde::{Deserialize, Serialize};

/// Why a proposal (move, pickup, start) was not committed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectReason {
    /// The referenced card is not in the proposing player's hand.
    CardNotInHand,
    /// The card is not within one rank (with wraparound) of the pile top.
    PileNotAdjacent,
    /// The proposal lost a race: it targeted a pile top that another
    /// commit replaced, and it is not adjacent to the new top.
    StaleTarget,
    /// Pickup with five cards already in hand.
    HandFull,
    /// Pickup with no kitty cards left.
    KittyEmpty,
    /// Proposal from a spectator or unknown connection.
    NotASeatedPlayer,
    /// Start signal with fewer than two seated players.
    NotEnoughPlayers,
    /// Proposal arrived after the room reached `Finished`.
    GameAlreadyOver,
}

impl Display for RejectReason {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            RejectReason::CardNotInHand => write!(f, "card not in hand"),
            RejectReason::PileNotAdjacent => write!(f, "card not adjacent to pile top"),
            RejectReason::StaleTarget => write!(f, "pile top changed before the move landed"),
            RejectReason::HandFull => write!(f, "hand already holds five cards"),
            RejectReason::KittyEmpty => write!(f, "kitty is empty"),
            RejectReason::NotASeatedPlayer => write!(f, "connection does not hold a seat"),
            RejectReason::NotEnoughPlayers => write!(f, "two seated players are required"),
            RejectReason::GameAlreadyOver => write!(f, "game is already over"),
        }
    }
}

impl Error for RejectReason {}

/// Fatal per-room failure: a mutation broke an engine invariant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// The 52-card conservation check failed after a mutation.
    CardConservation { expected: usize, actual: usize },
}

impl Display for EngineError {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            EngineError::CardConservation { expected, actual } => write!(
                f,
                "card conservation violated: expected {expected} cards, counted {actual}"
            ),
        }
    }
}

impl Error for EngineError {}
