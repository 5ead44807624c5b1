//! Deterministic deck construction and dealing.

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::domain::cards::{Card, Rank, Suit};
use crate::domain::state::{CenterPile, GameState, Phase, PlayerState, DECK_SIZE, HAND_LIMIT};

/// Generate the full 52-card deck in standard order, ids 0..52.
fn full_deck() -> Vec<Card> {
    let mut deck = Vec::with_capacity(DECK_SIZE);
    for suit in Suit::ALL {
        for rank in Rank::ALL {
            deck.push(Card {
                id: deck.len() as u8,
                rank,
                suit,
            });
        }
    }
    deck
}

/// Shuffle and partition a fresh deck into an in-progress game.
///
/// Each side receives a five-card hand and a 21-card kitty, then one card
/// is drawn from the top of each kitty to seed its center pile, leaving
/// 20 kitty cards per side. ChaCha-seeded so a seed reproduces a deal
/// exactly across runs and platforms.
pub fn deal(seed: u64) -> GameState {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut deck = full_deck();
    deck.shuffle(&mut rng);

    let mut players: [PlayerState; 2] = Default::default();
    let mut piles: [CenterPile; 2] = Default::default();

    for player in players.iter_mut() {
        player.hand = deck.split_off(deck.len() - HAND_LIMIT);
    }
    let half = deck.len() / 2;
    players[1].kitty = deck.split_off(half);
    players[0].kitty = deck;

    for (pile, player) in piles.iter_mut().zip(players.iter_mut()) {
        if let Some(card) = player.kitty.pop() {
            pile.stack.push(card);
        }
    }

    GameState {
        phase: Phase::InProgress,
        players,
        piles,
        winner: None,
        commit_seq: 0,
        dealt_cards: DECK_SIZE,
    }
}
