//! The pile arbiter: the single commit path for every game mutation.
//!
//! These functions are synchronous read-modify-write steps over the one
//! `GameState` a room owns. The room actor's mailbox is the serialization
//! point; nothing here locks because nothing else can hold the state.
//! Each committed mutation takes the next position in `commit_seq`, which
//! is the room's total order.

use crate::domain::cards::{Card, CardId};
use crate::domain::errors::{EngineError, RejectReason};
use crate::domain::state::{opponent, GameState, Phase, PileId, Seat, HAND_LIMIT};
use crate::domain::validator::{ranks_adjacent, validate_pickup, validate_play};

/// A committed play: card moved from a hand onto a center pile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayCommit {
    pub seat: Seat,
    pub pile: PileId,
    pub new_top: Card,
    pub hand_size: usize,
    pub seq: u64,
}

/// A committed pickup: one kitty card drawn into a hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PickupCommit {
    pub seat: Seat,
    pub hand_size: usize,
    pub kitty_size: usize,
    pub seq: u64,
}

/// A committed re-deal: both piles cleared and reseeded from the kitties.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RedealCommit {
    pub tops: [Card; 2],
    pub seq: u64,
}

/// Result of deadlock resolution after an arbitration step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeadlockOutcome {
    Redeal(RedealCommit),
    /// Neither side can ever move again and the kitties cannot reseed the
    /// piles: the game ends, won by whoever holds fewer cards.
    Stalemate { winner: Option<Seat> },
}

/// Game over record: the winner and the loser's remaining card count
/// (the externally consumed "lost by N" statistic).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WinRecord {
    pub winner: Seat,
    pub margin: usize,
}

/// Attempt to commit a play proposal.
///
/// First-accepted-wins: validation runs against the pile top as it is
/// *now*. A proposal aimed at a top that another commit has since buried
/// is re-validated here against the new top; if it no longer fits but
/// would have fit the previous top, the caller lost the race
/// (`StaleTarget`).
pub fn play_card(
    state: &mut GameState,
    seat: Seat,
    card_id: CardId,
    pile_id: PileId,
) -> Result<PlayCommit, RejectReason> {
    if state.phase == Phase::Finished {
        return Err(RejectReason::GameAlreadyOver);
    }

    let hand = &state.players[seat as usize].hand;
    let pile = state.pile(pile_id);

    let card = match validate_play(hand, pile, card_id) {
        Ok(card) => card,
        Err(RejectReason::PileNotAdjacent) => {
            let lost_race = hand
                .iter()
                .find(|c| c.id == card_id)
                .zip(pile.prev_top.as_ref())
                .is_some_and(|(card, prev)| ranks_adjacent(card.rank, prev.rank));
            return Err(if lost_race {
                RejectReason::StaleTarget
            } else {
                RejectReason::PileNotAdjacent
            });
        }
        Err(reason) => return Err(reason),
    };

    let player = &mut state.players[seat as usize];
    player.hand.retain(|c| c.id != card.id);
    let hand_size = player.hand.len();

    let pile = &mut state.piles[pile_id.index()];
    pile.prev_top = pile.top().copied();
    pile.stack.push(card);

    state.commit_seq += 1;
    Ok(PlayCommit {
        seat,
        pile: pile_id,
        new_top: card,
        hand_size,
        seq: state.commit_seq,
    })
}

/// Attempt to commit a pickup: draw one kitty card into the hand.
pub fn pickup(state: &mut GameState, seat: Seat) -> Result<PickupCommit, RejectReason> {
    if state.phase == Phase::Finished {
        return Err(RejectReason::GameAlreadyOver);
    }

    let player = &mut state.players[seat as usize];
    validate_pickup(player)?;

    if let Some(card) = player.kitty.pop() {
        player.hand.push(card);
    }

    state.commit_seq += 1;
    Ok(PickupCommit {
        seat,
        hand_size: state.players[seat as usize].hand.len(),
        kitty_size: state.players[seat as usize].kitty.len(),
        seq: state.commit_seq,
    })
}

/// Win condition: a side whose hand and kitty are both empty wins
/// immediately. Freezes the state so no later proposal can commit.
pub fn check_win(state: &mut GameState) -> Option<WinRecord> {
    if state.phase != Phase::InProgress {
        return None;
    }
    for seat in 0..2u8 {
        if state.players[seat as usize].cards_remaining() == 0 {
            state.phase = Phase::Finished;
            state.winner = Some(seat);
            return Some(WinRecord {
                winner: seat,
                margin: state.players[opponent(seat) as usize].cards_remaining(),
            });
        }
    }
    None
}

/// A seat is blocked when no hand card fits either pile top and no kitty
/// card it could still draw (the next `HAND_LIMIT - hand` cards, the
/// bounded lookahead) fits either.
pub fn seat_blocked(state: &GameState, seat: Seat) -> bool {
    let player = &state.players[seat as usize];
    let tops: Vec<Card> = state.pile_tops().iter().flatten().copied().collect();

    let playable = |card: &Card| tops.iter().any(|top| ranks_adjacent(card.rank, top.rank));

    if player.hand.iter().any(playable) {
        return false;
    }
    let reach = HAND_LIMIT.saturating_sub(player.hand.len());
    !player.kitty.iter().rev().take(reach).any(playable)
}

/// Deadlock resolution, run after every commit and rejection.
///
/// While both seats are blocked, each pile's cards are moved to its
/// exhausted discard (they never return to play) and the pile is reseeded
/// from its owner's kitty, falling back to the opponent's when one side is
/// dry. When fewer than two kitty cards exist in total the standoff cannot
/// be broken and the game finishes as a stalemate.
pub fn resolve_deadlock(state: &mut GameState) -> Vec<DeadlockOutcome> {
    let mut outcomes = Vec::new();

    while state.phase == Phase::InProgress && seat_blocked(state, 0) && seat_blocked(state, 1) {
        let kitty_total: usize = state.players.iter().map(|p| p.kitty.len()).sum();
        if kitty_total < 2 {
            let winner = match state.players[0]
                .cards_remaining()
                .cmp(&state.players[1].cards_remaining())
            {
                std::cmp::Ordering::Less => Some(0),
                std::cmp::Ordering::Greater => Some(1),
                std::cmp::Ordering::Equal => None,
            };
            state.phase = Phase::Finished;
            state.winner = winner;
            outcomes.push(DeadlockOutcome::Stalemate { winner });
            break;
        }

        let mut tops = [None, None];
        for (i, slot) in tops.iter_mut().enumerate() {
            let pile = &mut state.piles[i];
            let cleared: Vec<Card> = pile.stack.drain(..).collect();
            pile.exhausted.extend(cleared);
            pile.prev_top = None;

            let seed = state.players[i].kitty.pop().or_else(|| {
                state.players[opponent(i as Seat) as usize].kitty.pop()
            });
            if let Some(card) = seed {
                state.piles[i].stack.push(card);
                *slot = Some(card);
            }
        }

        if let (Some(left), Some(right)) = (tops[0], tops[1]) {
            state.commit_seq += 1;
            outcomes.push(DeadlockOutcome::Redeal(RedealCommit {
                tops: [left, right],
                seq: state.commit_seq,
            }));
        }
    }

    outcomes
}

/// The card conservation invariant: every zone summed (exhausted discards
/// included) equals what was dealt. A failure here is the only fatal
/// condition for a room: the caller must abort rather than continue with
/// corrupted state.
pub fn check_conservation(state: &GameState) -> Result<(), EngineError> {
    if state.phase == Phase::Waiting {
        return Ok(());
    }
    let actual = state.total_cards();
    if actual != state.dealt_cards {
        return Err(EngineError::CardConservation {
            expected: state.dealt_cards,
            actual,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::cards::{Rank, Suit};
    use crate::domain::state::{CenterPile, PlayerState};

    fn card(id: CardId, value: u8) -> Card {
        Card {
            id,
            rank: Rank::from_value(value).unwrap(),
            suit: Suit::Clubs,
        }
    }

    /// Hand-built in-progress state; id space is kept disjoint per zone.
    fn state_with(
        hands: [Vec<Card>; 2],
        kitties: [Vec<Card>; 2],
        tops: [Card; 2],
    ) -> GameState {
        let dealt_cards =
            hands.iter().map(Vec::len).sum::<usize>() + kitties.iter().map(Vec::len).sum::<usize>() + 2;
        GameState {
            phase: Phase::InProgress,
            players: [
                PlayerState {
                    hand: hands[0].clone(),
                    kitty: kitties[0].clone(),
                },
                PlayerState {
                    hand: hands[1].clone(),
                    kitty: kitties[1].clone(),
                },
            ],
            piles: [
                CenterPile {
                    stack: vec![tops[0]],
                    prev_top: None,
                    exhausted: Vec::new(),
                },
                CenterPile {
                    stack: vec![tops[1]],
                    prev_top: None,
                    exhausted: Vec::new(),
                },
            ],
            winner: None,
            commit_seq: 0,
            dealt_cards,
        }
    }

    #[test]
    fn plays_against_piles_at_five_and_nine() {
        // Piles at rank 5 and rank 9; hand {6, 4, 10, 8, 0}.
        let hand = vec![card(1, 6), card(2, 4), card(3, 10), card(4, 8), card(5, 0)];
        let mut state = state_with(
            [hand, vec![card(20, 2)]],
            [vec![card(30, 7)], vec![card(31, 11)]],
            [card(40, 5), card(41, 9)],
        );

        // Rank 0 onto the pile at 5: not adjacent, no wraparound involved.
        assert_eq!(
            play_card(&mut state, 0, 5, PileId::Left),
            Err(RejectReason::PileNotAdjacent)
        );

        // Rank 6 onto the pile at 5: adjacency +1, commits.
        let commit = play_card(&mut state, 0, 1, PileId::Left).unwrap();
        assert_eq!(commit.new_top.rank.value(), 6);
        assert_eq!(commit.hand_size, 4);
        assert_eq!(commit.seq, 1);
    }

    #[test]
    fn wraparound_zero_onto_twelve_commits() {
        let mut state = state_with(
            [vec![card(1, 0)], vec![card(20, 5)]],
            [Vec::new(), Vec::new()],
            [card(40, 12), card(41, 6)],
        );
        let commit = play_card(&mut state, 0, 1, PileId::Left).unwrap();
        assert_eq!(commit.new_top.rank.value(), 0);
    }

    #[test]
    fn race_loser_gets_stale_target() {
        // Both seats aim at the pile showing 5. Seat 0's 6 lands first;
        // seat 1's 4 fit the old top but not the new one.
        let mut state = state_with(
            [vec![card(1, 6)], vec![card(20, 4), card(21, 9)]],
            [Vec::new(), Vec::new()],
            [card(40, 5), card(41, 11)],
        );

        assert!(play_card(&mut state, 0, 1, PileId::Left).is_ok());
        assert_eq!(
            play_card(&mut state, 1, 20, PileId::Left),
            Err(RejectReason::StaleTarget)
        );
        // A card that fit neither the old nor the new top is a plain
        // adjacency rejection, not a race loss.
        assert_eq!(
            play_card(&mut state, 1, 21, PileId::Left),
            Err(RejectReason::PileNotAdjacent)
        );
        // Exactly one of the two racing cards made it onto the pile.
        assert_eq!(state.piles[0].stack.len(), 2);
        assert_eq!(state.piles[0].top().unwrap().rank.value(), 6);
    }

    #[test]
    fn pickup_draws_until_full_then_rejects() {
        let mut state = state_with(
            [Vec::new(), vec![card(20, 5)]],
            [
                (0..6).map(|i| card(30 + i, 3)).collect(),
                Vec::new(),
            ],
            [card(40, 8), card(41, 11)],
        );

        for expected in 1..=5 {
            let commit = pickup(&mut state, 0).unwrap();
            assert_eq!(commit.hand_size, expected);
        }
        assert_eq!(pickup(&mut state, 0), Err(RejectReason::HandFull));
        assert_eq!(pickup(&mut state, 1), Err(RejectReason::KittyEmpty));
    }

    #[test]
    fn win_freezes_the_game() {
        let mut state = state_with(
            [vec![card(1, 6)], vec![card(20, 2), card(21, 3)]],
            [Vec::new(), Vec::new()],
            [card(40, 5), card(41, 9)],
        );

        play_card(&mut state, 0, 1, PileId::Left).unwrap();
        let record = check_win(&mut state).unwrap();
        assert_eq!(record.winner, 0);
        assert_eq!(record.margin, 2);
        assert_eq!(state.phase, Phase::Finished);

        assert_eq!(
            play_card(&mut state, 1, 21, PileId::Right),
            Err(RejectReason::GameAlreadyOver)
        );
        assert_eq!(pickup(&mut state, 1), Err(RejectReason::GameAlreadyOver));
    }

    #[test]
    fn deadlock_redeals_and_changes_both_piles() {
        // Both hands are full (so the kitty is out of reach) and nothing
        // fits the tops at 5 and 9. The kitty tops (6 and 10) will fit
        // once the piles are reseeded.
        let full_hand_a: Vec<Card> = [0, 0, 2, 2, 12]
            .iter()
            .enumerate()
            .map(|(i, &v)| card(i as CardId, v))
            .collect();
        let full_hand_b: Vec<Card> = [1, 3, 7, 12, 12]
            .iter()
            .enumerate()
            .map(|(i, &v)| card(20 + i as CardId, v))
            .collect();
        let mut state = state_with(
            [full_hand_a, full_hand_b],
            [
                vec![card(30, 2), card(31, 6)],
                vec![card(32, 0), card(33, 10)],
            ],
            [card(40, 5), card(41, 9)],
        );
        assert!(seat_blocked(&state, 0));
        assert!(seat_blocked(&state, 1));

        let outcomes = resolve_deadlock(&mut state);
        assert!(matches!(outcomes[0], DeadlockOutcome::Redeal(_)));

        // Both piles were reseeded from the kitty tops.
        assert_eq!(state.piles[0].top().unwrap().rank.value(), 6);
        assert_eq!(state.piles[1].top().unwrap().rank.value(), 10);
        assert_eq!(state.piles[0].exhausted.len(), 1);
        assert_eq!(state.piles[1].exhausted.len(), 1);

        // The reseeded tops made a hand playable again (7 fits 6).
        assert!(!seat_blocked(&state, 1));
        // Nothing was created or destroyed.
        assert_eq!(state.total_cards(), 16);
    }

    #[test]
    fn exhausted_kitties_stalemate_to_the_smaller_holding() {
        let mut state = state_with(
            [vec![card(1, 0)], vec![card(20, 3), card(21, 3)]],
            [Vec::new(), Vec::new()],
            [card(40, 5), card(41, 9)],
        );
        let outcomes = resolve_deadlock(&mut state);
        assert_eq!(
            outcomes,
            vec![DeadlockOutcome::Stalemate { winner: Some(0) }]
        );
        assert_eq!(state.phase, Phase::Finished);
        assert_eq!(state.winner, Some(0));
    }

    #[test]
    fn conservation_detects_a_lost_card() {
        let mut state = crate::domain::dealing::deal(99);
        assert!(check_conservation(&state).is_ok());
        state.players[0].hand.pop();
        assert!(matches!(
            check_conservation(&state),
            Err(EngineError::CardConservation {
                expected: 52,
                actual: 51
            })
        ));
    }
}
