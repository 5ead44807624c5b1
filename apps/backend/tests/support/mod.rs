#![allow(dead_code)]

pub mod logging;

use std::sync::{Arc, Mutex};
use std::time::Duration;

use actix::prelude::*;
use speed_backend::domain::cards::{Card, CardId, Rank, Suit};
use speed_backend::domain::state::{CenterPile, GameState, Phase, PileId, PlayerState};
use speed_backend::room::actor::{ProposeMove, RequestPickup};
use speed_backend::ws::protocol::ServerMsg;
use speed_backend::ws::session::Outbound;

// Auto-initialize logging for every integration test binary.
#[ctor::ctor]
fn init_test_logging() {
    logging::init();
}

pub type Events = Arc<Mutex<Vec<ServerMsg>>>;

/// Stand-in for a websocket session: records everything the room sends.
pub struct RecordingSession {
    events: Events,
}

impl Actor for RecordingSession {
    type Context = Context<Self>;
}

impl Handler<Outbound> for RecordingSession {
    type Result = ();

    fn handle(&mut self, msg: Outbound, _ctx: &mut Self::Context) -> Self::Result {
        self.events.lock().unwrap().push(msg.0);
    }
}

pub fn recording_session() -> (Addr<RecordingSession>, Events) {
    let events: Events = Arc::new(Mutex::new(Vec::new()));
    let addr = RecordingSession {
        events: Arc::clone(&events),
    }
    .start();
    (addr, events)
}

/// Stand-in for a room on the receiving end of a bot agent's timers.
pub struct RecordingRoom {
    pub proposals: Arc<Mutex<Vec<(CardId, PileId)>>>,
    pub pickups: Arc<Mutex<usize>>,
}

impl Actor for RecordingRoom {
    type Context = Context<Self>;
}

impl Handler<ProposeMove> for RecordingRoom {
    type Result = ();

    fn handle(&mut self, msg: ProposeMove, _ctx: &mut Self::Context) -> Self::Result {
        self.proposals.lock().unwrap().push((msg.card_id, msg.pile));
    }
}

impl Handler<RequestPickup> for RecordingRoom {
    type Result = ();

    fn handle(&mut self, _msg: RequestPickup, _ctx: &mut Self::Context) -> Self::Result {
        *self.pickups.lock().unwrap() += 1;
    }
}

pub fn recording_room() -> (
    Addr<RecordingRoom>,
    Arc<Mutex<Vec<(CardId, PileId)>>>,
    Arc<Mutex<usize>>,
) {
    let proposals = Arc::new(Mutex::new(Vec::new()));
    let pickups = Arc::new(Mutex::new(0));
    let addr = RecordingRoom {
        proposals: Arc::clone(&proposals),
        pickups: Arc::clone(&pickups),
    }
    .start();
    (addr, proposals, pickups)
}

/// Poll until `pred` holds or the timeout expires; true when it held.
pub async fn wait_until(pred: impl Fn() -> bool, timeout: Duration) -> bool {
    let deadline = tokio::time::Instant::now() + timeout;
    while tokio::time::Instant::now() < deadline {
        if pred() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    pred()
}

pub fn latest_snapshot(events: &Events) -> Option<speed_backend::GameSnapshot> {
    events
        .lock()
        .unwrap()
        .iter()
        .rev()
        .find_map(|msg| match msg {
            ServerMsg::GameState { game } => Some(game.clone()),
            _ => None,
        })
}

pub fn rejections(events: &Events) -> Vec<speed_backend::RejectReason> {
    events
        .lock()
        .unwrap()
        .iter()
        .filter_map(|msg| match msg {
            ServerMsg::Rejected { reason } => Some(*reason),
            _ => None,
        })
        .collect()
}

pub fn card(id: CardId, value: u8) -> Card {
    Card {
        id,
        rank: Rank::from_value(value).unwrap(),
        suit: Suit::Clubs,
    }
}

/// Hand-built in-progress state for deterministic arbitration scenarios.
pub fn state_with(hands: [Vec<Card>; 2], kitties: [Vec<Card>; 2], tops: [Card; 2]) -> GameState {
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
