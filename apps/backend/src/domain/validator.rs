//! Pure move validation.
//!
//! Side-effect-free point-in-time checks; both the human proposal path and
//! the bot loop call these against a snapshot without synchronization.

use crate::domain::cards::{Card, CardId, Rank};
use crate::domain::errors::RejectReason;
use crate::domain::state::{CenterPile, PlayerState, HAND_LIMIT};

/// Two ranks are adjacent when they differ by one, or when they are the
/// lowest and highest rank (wraparound: 0 ↔ 12).
pub fn ranks_adjacent(a: Rank, b: Rank) -> bool {
    let diff = (i16::from(a.value()) - i16::from(b.value())).abs();
    diff == 1 || diff == i16::from(Rank::COUNT) - 1
}

/// Validate a proposed play against a hand and a pile top.
///
/// Rules in order: the card must be in the hand (`CardNotInHand`), then its
/// rank must be adjacent to the pile's visible top (`PileNotAdjacent`).
pub fn validate_play(
    hand: &[Card],
    pile: &CenterPile,
    card_id: CardId,
) -> Result<Card, RejectReason> {
    let card = hand
        .iter()
        .find(|c| c.id == card_id)
        .copied()
        .ok_or(RejectReason::CardNotInHand)?;

    let top = pile.top().ok_or(RejectReason::PileNotAdjacent)?;
    if !ranks_adjacent(card.rank, top.rank) {
        return Err(RejectReason::PileNotAdjacent);
    }
    Ok(card)
}

/// Validate a pickup request: hand below the limit and a non-empty kitty.
pub fn validate_pickup(player: &PlayerState) -> Result<(), RejectReason> {
    if player.hand.len() >= HAND_LIMIT {
        return Err(RejectReason::HandFull);
    }
    if player.kitty.is_empty() {
        return Err(RejectReason::KittyEmpty);
    }
    Ok(())
}

/// Whether any of `cards` could be played on a pile showing `top`.
pub fn any_adjacent(cards: &[Card], top: &Card) -> bool {
    cards.iter().any(|c| ranks_adjacent(c.rank, top.rank))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::cards::Suit;

    fn card(id: CardId, value: u8) -> Card {
        Card {
            id,
            rank: Rank::from_value(value).unwrap(),
            suit: Suit::Spades,
        }
    }

    fn pile_with_top(value: u8) -> CenterPile {
        CenterPile {
            stack: vec![card(50, value)],
            prev_top: None,
            exhausted: Vec::new(),
        }
    }

    #[test]
    fn adjacency_accepts_exactly_neighbors_and_wraparound() {
        for a in 0..Rank::COUNT {
            for b in 0..Rank::COUNT {
                let ra = Rank::from_value(a).unwrap();
                let rb = Rank::from_value(b).unwrap();
                let diff = (i16::from(a) - i16::from(b)).abs();
                let expected = diff == 1 || diff == 12;
                assert_eq!(
                    ranks_adjacent(ra, rb),
                    expected,
                    "ranks {a} and {b} misclassified"
                );
            }
        }
    }

    #[test]
    fn play_rejects_card_not_in_hand_before_adjacency() {
        let hand = [card(1, 6)];
        // Card 9 is absent; even though rank 6 would be adjacent, the
        // missing-card rule wins.
        assert_eq!(
            validate_play(&hand, &pile_with_top(5), 9),
            Err(RejectReason::CardNotInHand)
        );
    }

    #[test]
    fn play_accepts_adjacent_and_rejects_distant() {
        let hand = [card(1, 6), card(2, 0)];
        assert!(validate_play(&hand, &pile_with_top(5), 1).is_ok());
        assert_eq!(
            validate_play(&hand, &pile_with_top(5), 2),
            Err(RejectReason::PileNotAdjacent)
        );
        // Wraparound: 0 onto 12.
        assert!(validate_play(&hand, &pile_with_top(12), 2).is_ok());
    }

    #[test]
    fn pickup_preconditions() {
        let mut player = PlayerState::default();
        player.kitty = vec![card(10, 3)];
        assert!(validate_pickup(&player).is_ok());

        player.hand = (0..5).map(|i| card(i, 2)).collect();
        assert_eq!(validate_pickup(&player), Err(RejectReason::HandFull));

        player.hand.pop();
        player.kitty.clear();
        assert_eq!(validate_pickup(&player), Err(RejectReason::KittyEmpty));
    }
}
