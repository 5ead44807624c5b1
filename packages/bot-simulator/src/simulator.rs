//! In-memory game runner.
//!
//! Drives two strategies straight against the domain engine, with no
//! actors, timers, or sockets, for rapid head-to-head evaluation. The same
//! arbiter functions the server uses keep the simulation honest.

use speed_backend::bots::trait_def::{BotStrategy, BotView};
use speed_backend::domain::arbiter::{self, DeadlockOutcome};
use speed_backend::domain::dealing::deal;
use speed_backend::domain::snapshot::GameSnapshot;
use speed_backend::domain::state::{Phase, Seat, HAND_LIMIT};
use speed_backend::render::GameRenderer;

#[derive(Debug, Clone, Copy)]
pub struct GameOutcome {
    pub winner: Option<Seat>,
    pub commits: u64,
    pub redeals: usize,
    pub stalemate: bool,
}

struct Counters {
    redeals: usize,
    stalemate: bool,
}

fn absorb(outcomes: &[DeadlockOutcome], counters: &mut Counters) {
    for outcome in outcomes {
        match outcome {
            DeadlockOutcome::Redeal(_) => counters.redeals += 1,
            DeadlockOutcome::Stalemate { .. } => counters.stalemate = true,
        }
    }
}

/// Play one full game between two strategies and report how it went.
pub fn run_game(
    seed: u64,
    strategies: &mut [Box<dyn BotStrategy>; 2],
    names: [&str; 2],
    mut renderer: Option<&mut dyn GameRenderer>,
) -> GameOutcome {
    let mut state = deal(seed);
    let mut counters = Counters {
        redeals: 0,
        stalemate: false,
    };

    // The opening layout itself can be dead.
    absorb(&arbiter::resolve_deadlock(&mut state), &mut counters);

    while state.phase == Phase::InProgress {
        let mut progressed = false;

        for seat in 0..2u8 {
            if state.phase != Phase::InProgress {
                break;
            }

            let view = BotView::from_state(&state, seat);
            if let Some(chosen) = strategies[seat as usize].choose_move(&view) {
                if arbiter::play_card(&mut state, seat, chosen.card_id, chosen.pile).is_ok() {
                    progressed = true;
                }
            } else if view.hand.len() < HAND_LIMIT
                && view.kitty_size > 0
                && arbiter::pickup(&mut state, seat).is_ok()
            {
                progressed = true;
            }

            arbiter::check_win(&mut state);
            let outcomes = arbiter::resolve_deadlock(&mut state);
            if !outcomes.is_empty() {
                progressed = true;
            }
            absorb(&outcomes, &mut counters);

            if let Some(renderer) = renderer.as_deref_mut() {
                renderer.render(&GameSnapshot::for_viewer(&state, "local", names, None));
            }
        }

        // Safety valve: a round with no commit and no re-deal cannot make
        // progress, and the engine should have stalemated already.
        if !progressed && state.phase == Phase::InProgress {
            break;
        }
    }

    GameOutcome {
        winner: state.winner,
        commits: state.commit_seq,
        redeals: counters.redeals,
        stalemate: counters.stalemate,
    }
}
