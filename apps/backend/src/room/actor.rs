//! Per-room game authority.
//!
//! One `RoomActor` per room. Its mailbox is the single serialization point
//! required for arbitration: every proposal, whether from a human session
//! or a bot timer, arrives as a message, handlers run one at a time, and
//! each commit takes
//! the next position in the room's total order. Rooms share nothing;
//! multiple rooms run fully in parallel.

use std::collections::HashMap;
use std::sync::Arc;

use actix::prelude::*;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::bots::agent::{BotAgent, StopBot, ViewUpdate};
use crate::bots::profiles::{profile, BotDifficulty, BotProfile};
use crate::bots::registry::make_strategy;
use crate::bots::trait_def::BotView;
use crate::domain::arbiter::{self, DeadlockOutcome};
use crate::domain::cards::CardId;
use crate::domain::dealing::deal;
use crate::domain::errors::RejectReason;
use crate::domain::snapshot::GameSnapshot;
use crate::domain::state::{opponent, GameState, Phase, PileId, Seat};
use crate::room::registry::RoomRegistry;
use crate::ws::protocol::{CardPos, ErrorCode, LobbyConnection, ServerMsg};
use crate::ws::session::Outbound;

/// Which bot takes the opposing seat in a bot room.
///
/// Carried as a value (rather than a bare difficulty) so tests can run a
/// real bot with miniature delays.
#[derive(Clone, Copy)]
pub struct BotSpec {
    pub difficulty: BotDifficulty,
    pub profile: &'static BotProfile,
}

impl BotSpec {
    pub fn for_difficulty(difficulty: BotDifficulty) -> Self {
        Self {
            difficulty,
            profile: profile(difficulty),
        }
    }
}

// ---------------------------------------------------------------------------
// Messages
// ---------------------------------------------------------------------------

#[derive(Message)]
#[rtype(result = "()")]
pub struct Join {
    pub conn_id: Uuid,
    pub name: String,
    pub addr: Recipient<Outbound>,
}

#[derive(Message)]
#[rtype(result = "()")]
pub struct Leave {
    pub conn_id: Uuid,
}

#[derive(Message)]
#[rtype(result = "()")]
pub struct UpdateName {
    pub conn_id: Uuid,
    pub name: String,
}

#[derive(Message)]
#[rtype(result = "()")]
pub struct StartGame {
    pub conn_id: Uuid,
}

#[derive(Message)]
#[rtype(result = "()")]
pub struct ProposeMove {
    pub conn_id: Uuid,
    pub card_id: CardId,
    pub pile: PileId,
}

#[derive(Message)]
#[rtype(result = "()")]
pub struct RequestPickup {
    pub conn_id: Uuid,
}

#[derive(Message)]
#[rtype(result = "()")]
pub struct EphemeralPosition {
    pub conn_id: Uuid,
    pub card_id: CardId,
    pub pos: Option<CardPos>,
}

/// IMPORTANT: test hook. Integration tests inject hand-built states to
/// exercise race and deadlock paths deterministically; production code
/// never sends this.
#[doc(hidden)]
#[derive(Message)]
#[rtype(result = "()")]
pub struct InjectState(pub GameState);

// ---------------------------------------------------------------------------
// Actor
// ---------------------------------------------------------------------------

struct Member {
    name: String,
    addr: Recipient<Outbound>,
}

struct BotSeat {
    spec: BotSpec,
    conn_id: Uuid,
    agent: Option<Addr<BotAgent>>,
}

pub struct RoomActor {
    room_id: String,
    registry: Arc<RoomRegistry>,
    members: HashMap<Uuid, Member>,
    /// Lobby display order.
    join_order: Vec<Uuid>,
    seats: [Option<Uuid>; 2],
    bot: Option<BotSeat>,
    state: GameState,
}

impl RoomActor {
    pub fn new(room_id: String, bot: Option<BotSpec>, registry: Arc<RoomRegistry>) -> Self {
        let bot = bot.map(|spec| BotSeat {
            spec,
            conn_id: Uuid::new_v4(),
            agent: None,
        });
        let mut seats = [None, None];
        if let Some(bot) = &bot {
            // The bot always holds the second seat; the creator takes the first.
            seats[1] = Some(bot.conn_id);
        }
        Self {
            room_id,
            registry,
            members: HashMap::new(),
            join_order: Vec::new(),
            seats,
            bot,
            state: GameState::waiting(),
        }
    }

    fn seat_of(&self, conn_id: Uuid) -> Option<Seat> {
        self.seats
            .iter()
            .position(|s| *s == Some(conn_id))
            .map(|i| i as Seat)
    }

    fn seat_name(&self, seat: Seat) -> String {
        match self.seats[seat as usize] {
            Some(conn_id) => {
                if let Some(bot) = &self.bot {
                    if bot.conn_id == conn_id {
                        return bot.spec.profile.name.to_string();
                    }
                }
                self.members
                    .get(&conn_id)
                    .map(|m| m.name.clone())
                    .unwrap_or_else(|| "Player".to_string())
            }
            None => "Open".to_string(),
        }
    }

    fn send_to(&self, conn_id: Uuid, msg: ServerMsg) {
        if let Some(member) = self.members.get(&conn_id) {
            let _ = member.addr.do_send(Outbound(msg));
        }
    }

    fn broadcast(&self, msg: ServerMsg) {
        for member in self.members.values() {
            let _ = member.addr.do_send(Outbound(msg.clone()));
        }
    }

    fn lobby_connections(&self) -> Vec<LobbyConnection> {
        let mut connections: Vec<LobbyConnection> = self
            .join_order
            .iter()
            .filter_map(|conn_id| {
                self.members.get(conn_id).map(|m| LobbyConnection {
                    id: *conn_id,
                    name: m.name.clone(),
                    seated: self.seat_of(*conn_id).is_some(),
                })
            })
            .collect();
        if let Some(bot) = &self.bot {
            connections.push(LobbyConnection {
                id: bot.conn_id,
                name: bot.spec.profile.name.to_string(),
                seated: true,
            });
        }
        connections
    }

    fn broadcast_lobby(&self) {
        self.broadcast(ServerMsg::LobbyState {
            room_id: self.room_id.clone(),
            connections: self.lobby_connections(),
            game_started: self.state.phase != Phase::Waiting,
        });
    }

    fn snapshot_for(&self, viewer: Option<Seat>) -> GameSnapshot {
        let names = [self.seat_name(0), self.seat_name(1)];
        GameSnapshot::for_viewer(
            &self.state,
            &self.room_id,
            [names[0].as_str(), names[1].as_str()],
            viewer,
        )
    }

    /// Authoritative broadcast: each member gets its own view, the bot gets
    /// a `BotView`. Per-recipient delivery preserves commit order.
    fn broadcast_state(&self) {
        for (conn_id, member) in &self.members {
            let snapshot = self.snapshot_for(self.seat_of(*conn_id));
            let _ = member.addr.do_send(Outbound(ServerMsg::GameState { game: snapshot }));
        }
        self.push_bot_view();
    }

    fn push_bot_view(&self) {
        let Some(bot) = &self.bot else { return };
        let Some(agent) = &bot.agent else { return };
        let Some(seat) = self.seat_of(bot.conn_id) else {
            return;
        };
        agent.do_send(ViewUpdate(BotView::from_state(&self.state, seat)));
    }

    /// Post-arbitration pipeline, run after every commit *and* rejection:
    /// win check, deadlock resolution, conservation check, broadcast.
    fn after_arbitration(&mut self, ctx: &mut Context<Self>, committed: bool) {
        let win = arbiter::check_win(&mut self.state);
        let outcomes = arbiter::resolve_deadlock(&mut self.state);

        if let Err(err) = arbiter::check_conservation(&self.state) {
            error!(
                room_id = %self.room_id,
                error = %err,
                "engine invariant violated, aborting room"
            );
            self.broadcast(ServerMsg::Error {
                code: ErrorCode::Internal,
                message: "internal engine error, room closed".to_string(),
            });
            ctx.stop();
            return;
        }

        for outcome in &outcomes {
            if let DeadlockOutcome::Redeal(redeal) = outcome {
                info!(
                    room_id = %self.room_id,
                    seq = redeal.seq,
                    "deadlock resolved by re-deal"
                );
                self.broadcast(ServerMsg::Redeal {
                    tops: redeal.tops,
                    seq: redeal.seq,
                });
            }
        }

        let stalemated = outcomes
            .iter()
            .any(|o| matches!(o, DeadlockOutcome::Stalemate { .. }));

        if committed || !outcomes.is_empty() {
            self.broadcast_state();
        }

        if win.is_some() || stalemated {
            self.on_finished();
        }
    }

    fn on_finished(&mut self) {
        info!(
            room_id = %self.room_id,
            winner = ?self.state.winner,
            "game finished"
        );
        if let Some(bot) = &self.bot {
            let bot_seat = self.seat_of(bot.conn_id);
            let line = match (self.state.winner, bot_seat) {
                (Some(winner), Some(seat)) if winner == seat => Some(bot.spec.profile.lose_text),
                (Some(_), Some(_)) => Some(bot.spec.profile.win_text),
                _ => None,
            };
            if let Some(message) = line {
                self.broadcast(ServerMsg::BotSays {
                    name: bot.spec.profile.name.to_string(),
                    message: message.to_string(),
                });
            }
            if let Some(agent) = &bot.agent {
                // Also pushed a Finished view above; the explicit stop keeps
                // the cancellation immediate even if that message is behind.
                agent.do_send(StopBot);
            }
        }
    }

    fn spawn_bot(&mut self, ctx: &mut Context<Self>) {
        let Some(bot) = &mut self.bot else { return };
        let agent = BotAgent::new(
            bot.conn_id,
            ctx.address().recipient::<ProposeMove>(),
            ctx.address().recipient::<RequestPickup>(),
            bot.spec.profile,
            make_strategy(bot.spec.difficulty, None),
        )
        .start();
        bot.agent = Some(agent);
    }
}

impl Actor for RoomActor {
    type Context = Context<Self>;

    fn started(&mut self, _ctx: &mut Self::Context) {
        info!(room_id = %self.room_id, bot = self.bot.is_some(), "room opened");
    }

    fn stopped(&mut self, _ctx: &mut Self::Context) {
        if let Some(agent) = self.bot.as_ref().and_then(|b| b.agent.as_ref()) {
            agent.do_send(StopBot);
        }
        self.registry.remove(&self.room_id);
        info!(room_id = %self.room_id, "room closed");
    }
}

impl Handler<Join> for RoomActor {
    type Result = ();

    fn handle(&mut self, msg: Join, _ctx: &mut Self::Context) -> Self::Result {
        let seated = if self.state.phase == Phase::Waiting {
            match self.seats.iter_mut().find(|s| s.is_none()) {
                Some(slot) => {
                    *slot = Some(msg.conn_id);
                    true
                }
                None => false,
            }
        } else {
            false
        };

        debug!(
            room_id = %self.room_id,
            conn_id = %msg.conn_id,
            seated,
            "connection joined"
        );
        self.members.insert(
            msg.conn_id,
            Member {
                name: msg.name,
                addr: msg.addr,
            },
        );
        self.join_order.push(msg.conn_id);

        self.send_to(
            msg.conn_id,
            ServerMsg::RoomJoined {
                room_id: self.room_id.clone(),
                player_id: msg.conn_id,
                seated,
            },
        );
        // Late joiners and spectators get the current state immediately.
        if self.state.phase != Phase::Waiting {
            let snapshot = self.snapshot_for(self.seat_of(msg.conn_id));
            self.send_to(msg.conn_id, ServerMsg::GameState { game: snapshot });
        }
        self.broadcast_lobby();
    }
}

impl Handler<Leave> for RoomActor {
    type Result = ();

    fn handle(&mut self, msg: Leave, ctx: &mut Self::Context) -> Self::Result {
        let seat = self.seat_of(msg.conn_id);
        if self.members.remove(&msg.conn_id).is_none() {
            return;
        }
        self.join_order.retain(|id| *id != msg.conn_id);

        if let Some(seat) = seat {
            self.seats[seat as usize] = None;
            if self.state.phase == Phase::InProgress {
                // A seated player abandoning a live game forfeits it.
                warn!(
                    room_id = %self.room_id,
                    seat,
                    "seated player left mid-game, opponent wins"
                );
                self.state.phase = Phase::Finished;
                self.state.winner = Some(opponent(seat));
                self.broadcast_state();
                self.on_finished();
            }
        }

        self.broadcast_lobby();
        if self.members.is_empty() {
            ctx.stop();
        }
    }
}

impl Handler<UpdateName> for RoomActor {
    type Result = ();

    fn handle(&mut self, msg: UpdateName, _ctx: &mut Self::Context) -> Self::Result {
        if let Some(member) = self.members.get_mut(&msg.conn_id) {
            member.name = msg.name;
            self.broadcast_lobby();
        }
    }
}

impl Handler<StartGame> for RoomActor {
    type Result = ();

    fn handle(&mut self, msg: StartGame, ctx: &mut Self::Context) -> Self::Result {
        if self.seat_of(msg.conn_id).is_none() {
            self.send_to(
                msg.conn_id,
                ServerMsg::Rejected {
                    reason: RejectReason::NotASeatedPlayer,
                },
            );
            return;
        }
        if self.state.phase != Phase::Waiting {
            self.send_to(
                msg.conn_id,
                ServerMsg::Error {
                    code: ErrorCode::BadRequest,
                    message: "game already started".to_string(),
                },
            );
            return;
        }
        if self.seats.iter().any(|s| s.is_none()) {
            self.send_to(
                msg.conn_id,
                ServerMsg::Rejected {
                    reason: RejectReason::NotEnoughPlayers,
                },
            );
            return;
        }

        self.state = deal(rand::random());
        info!(room_id = %self.room_id, "game started");
        self.spawn_bot(ctx);
        self.broadcast_lobby();

        if let Some(bot) = &self.bot {
            self.broadcast(ServerMsg::BotSays {
                name: bot.spec.profile.name.to_string(),
                message: bot.spec.profile.intro_text.to_string(),
            });
        }

        // The opening layout can already be deadlocked; the usual pipeline
        // broadcasts the dealt state either way.
        self.after_arbitration(ctx, true);
    }
}

impl Handler<ProposeMove> for RoomActor {
    type Result = ();

    fn handle(&mut self, msg: ProposeMove, ctx: &mut Self::Context) -> Self::Result {
        if self.state.phase == Phase::Waiting {
            self.send_to(
                msg.conn_id,
                ServerMsg::Error {
                    code: ErrorCode::BadRequest,
                    message: "game not started".to_string(),
                },
            );
            return;
        }
        let Some(seat) = self.seat_of(msg.conn_id) else {
            self.send_to(
                msg.conn_id,
                ServerMsg::Rejected {
                    reason: RejectReason::NotASeatedPlayer,
                },
            );
            return;
        };

        let committed = match arbiter::play_card(&mut self.state, seat, msg.card_id, msg.pile) {
            Ok(commit) => {
                debug!(
                    room_id = %self.room_id,
                    seat,
                    card_id = msg.card_id,
                    pile = ?msg.pile,
                    seq = commit.seq,
                    "move committed"
                );
                self.send_to(
                    msg.conn_id,
                    ServerMsg::MoveCommitted {
                        pile: commit.pile,
                        new_top: commit.new_top,
                        hand_size: commit.hand_size,
                        seq: commit.seq,
                    },
                );
                true
            }
            Err(reason) => {
                debug!(
                    room_id = %self.room_id,
                    seat,
                    card_id = msg.card_id,
                    %reason,
                    "move rejected"
                );
                self.send_to(msg.conn_id, ServerMsg::Rejected { reason });
                false
            }
        };

        self.after_arbitration(ctx, committed);
    }
}

impl Handler<RequestPickup> for RoomActor {
    type Result = ();

    fn handle(&mut self, msg: RequestPickup, ctx: &mut Self::Context) -> Self::Result {
        if self.state.phase == Phase::Waiting {
            self.send_to(
                msg.conn_id,
                ServerMsg::Error {
                    code: ErrorCode::BadRequest,
                    message: "game not started".to_string(),
                },
            );
            return;
        }
        let Some(seat) = self.seat_of(msg.conn_id) else {
            self.send_to(
                msg.conn_id,
                ServerMsg::Rejected {
                    reason: RejectReason::NotASeatedPlayer,
                },
            );
            return;
        };

        let committed = match arbiter::pickup(&mut self.state, seat) {
            Ok(commit) => {
                self.send_to(
                    msg.conn_id,
                    ServerMsg::PickupCommitted {
                        hand_size: commit.hand_size,
                        kitty_size: commit.kitty_size,
                        seq: commit.seq,
                    },
                );
                true
            }
            Err(reason) => {
                self.send_to(msg.conn_id, ServerMsg::Rejected { reason });
                false
            }
        };

        self.after_arbitration(ctx, committed);
    }
}

impl Handler<EphemeralPosition> for RoomActor {
    type Result = ();

    fn handle(&mut self, msg: EphemeralPosition, _ctx: &mut Self::Context) -> Self::Result {
        // Not validated, not ordered, not part of any commit: relayed
        // verbatim to everyone else for visual smoothness only.
        let relay = ServerMsg::MovingCard {
            player_id: msg.conn_id,
            card_id: msg.card_id,
            pos: msg.pos,
        };
        for (conn_id, member) in &self.members {
            if *conn_id != msg.conn_id {
                let _ = member.addr.do_send(Outbound(relay.clone()));
            }
        }
    }
}

impl Handler<InjectState> for RoomActor {
    type Result = ();

    fn handle(&mut self, msg: InjectState, _ctx: &mut Self::Context) -> Self::Result {
        self.state = msg.0;
        self.broadcast_state();
    }
}
