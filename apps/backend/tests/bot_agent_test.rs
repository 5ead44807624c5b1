//! Bot agent timing and lifecycle, run against miniature delay profiles.

mod support;

use std::sync::Arc;
use std::time::Duration;

use actix::prelude::*;
use speed_backend::bots::agent::{BotAgent, ViewUpdate};
use speed_backend::bots::profiles::{BotDifficulty, BotProfile};
use speed_backend::bots::registry::make_strategy;
use speed_backend::bots::trait_def::BotView;
use speed_backend::domain::state::Phase;
use speed_backend::room::actor::{BotSpec, InjectState, Join, StartGame};
use speed_backend::room::registry::RoomRegistry;
use speed_backend::ws::protocol::ServerMsg;
use uuid::Uuid;

use support::{card, recording_room, recording_session, state_with, wait_until};

/// Real profile shape, toy delays, so the suite stays fast.
static FAST_PROFILE: BotProfile = BotProfile {
    name: "Test Bot",
    intro_text: "beep",
    win_text: "you win",
    lose_text: "you lose",
    min_delay: Duration::from_millis(10),
    max_delay: Duration::from_millis(30),
    pickup_interval: Duration::from_millis(15),
};

fn playable_view() -> BotView {
    BotView {
        seat: 1,
        phase: Phase::InProgress,
        hand: vec![card(1, 6)],
        pile_tops: [Some(card(40, 5)), Some(card(41, 11))],
        kitty_size: 3,
        opponent_hand_size: 5,
    }
}

#[actix_web::test]
async fn agent_proposes_and_picks_up_then_stops_on_finish() {
    let (room, proposals, pickups) = recording_room();

    let agent = BotAgent::new(
        Uuid::new_v4(),
        room.clone().recipient(),
        room.recipient(),
        &FAST_PROFILE,
        make_strategy(BotDifficulty::Hard, Some(7)),
    )
    .start();

    agent.do_send(ViewUpdate(playable_view()));

    // Both timers fire: a think cycle proposes the one valid move, and the
    // independent pickup timer requests a draw (hand of one, kitty of three).
    let proposals_probe = Arc::clone(&proposals);
    let pickups_probe = Arc::clone(&pickups);
    assert!(
        wait_until(
            move || {
                !proposals_probe.lock().unwrap().is_empty()
                    && *pickups_probe.lock().unwrap() > 0
            },
            Duration::from_secs(2)
        )
        .await,
        "agent should propose a move and request a pickup"
    );
    assert!(
        proposals.lock().unwrap().iter().all(|(card_id, _)| *card_id == 1),
        "only the valid move is ever proposed"
    );

    // A finished view cancels both timers immediately.
    let mut final_view = playable_view();
    final_view.phase = Phase::Finished;
    agent.do_send(ViewUpdate(final_view));
    tokio::time::sleep(Duration::from_millis(60)).await;

    let proposals_after = proposals.lock().unwrap().len();
    let pickups_after = *pickups.lock().unwrap();
    tokio::time::sleep(Duration::from_millis(200)).await;

    assert_eq!(
        proposals.lock().unwrap().len(),
        proposals_after,
        "no proposal may be emitted after the room finished"
    );
    assert_eq!(*pickups.lock().unwrap(), pickups_after);
}

#[actix_web::test]
async fn blocked_agent_sits_the_cycle_out() {
    let (room, proposals, _pickups) = recording_room();

    let agent = BotAgent::new(
        Uuid::new_v4(),
        room.clone().recipient(),
        room.recipient(),
        &FAST_PROFILE,
        make_strategy(BotDifficulty::Easy, Some(7)),
    )
    .start();

    // Nothing in hand fits a top, and the kitty is empty: the bot must
    // neither propose nor pick up, just idle through its cycles.
    agent.do_send(ViewUpdate(BotView {
        seat: 1,
        phase: Phase::InProgress,
        hand: vec![card(1, 0), card(2, 2)],
        pile_tops: [Some(card(40, 5)), Some(card(41, 9))],
        kitty_size: 0,
        opponent_hand_size: 5,
    }));

    tokio::time::sleep(Duration::from_millis(150)).await;
    assert!(proposals.lock().unwrap().is_empty());
}

#[actix_web::test]
async fn bot_room_plays_through_the_same_path_and_chats() {
    let registry = Arc::new(RoomRegistry::new());
    let spec = BotSpec {
        difficulty: BotDifficulty::Hard,
        profile: &FAST_PROFILE,
    };
    let (_room_id, room) = registry.create(Some(spec));

    let human = Uuid::new_v4();
    let (session, events) = recording_session();
    room.do_send(Join {
        conn_id: human,
        name: "Ana".to_string(),
        addr: session.recipient(),
    });
    room.do_send(StartGame { conn_id: human });

    // Intro flavor text arrives when the match starts.
    let intro_events = Arc::clone(&events);
    assert!(
        wait_until(
            move || {
                intro_events.lock().unwrap().iter().any(|msg| matches!(
                    msg,
                    ServerMsg::BotSays { message, .. } if message == "beep"
                ))
            },
            Duration::from_secs(2)
        )
        .await,
        "bot intro should be broadcast at start"
    );

    // Hand the bot a one-card win; it must get there through the normal
    // proposal path within a couple of think cycles.
    room.do_send(InjectState(state_with(
        [vec![card(1, 2)], vec![card(20, 6)]],
        [vec![card(30, 2)], Vec::new()],
        [card(40, 5), card(41, 11)],
    )));

    let finish_events = Arc::clone(&events);
    assert!(
        wait_until(
            move || {
                finish_events.lock().unwrap().iter().any(|msg| matches!(
                    msg,
                    ServerMsg::BotSays { message, .. } if message == "you lose"
                ))
            },
            Duration::from_secs(3)
        )
        .await,
        "bot should win through the ordinary arbitration path"
    );
}
