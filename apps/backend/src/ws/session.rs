//! Websocket session actor: one per connection.
//!
//! The session is a thin gateway: it validates frames into `ClientMsg`,
//! forwards room traffic to the room actor's mailbox, and writes back
//! whatever the room sends it. It holds no game state.

use std::sync::Arc;
use std::time::{Duration, Instant};

use actix::prelude::*;
use actix_web::{web, Error, HttpRequest, HttpResponse};
use actix_web_actors::ws;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::room::actor::{
    BotSpec, EphemeralPosition, Join, Leave, ProposeMove, RequestPickup, RoomActor, StartGame,
    UpdateName,
};
use crate::room::registry::RoomRegistry;
use crate::state::app_state::AppState;
use crate::ws::protocol::{ClientMsg, ErrorCode, ServerMsg, PROTOCOL_VERSION};

const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(20);
const CLIENT_TIMEOUT: Duration = Duration::from_secs(40);

/// Server-to-client payload routed through the session.
#[derive(Message, Clone)]
#[rtype(result = "()")]
pub struct Outbound(pub ServerMsg);

pub async fn upgrade(
    req: HttpRequest,
    stream: web::Payload,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, Error> {
    let session = WsSession::new(Uuid::new_v4(), app_state.rooms());
    ws::start(session, &req, stream)
}

pub struct WsSession {
    conn_id: Uuid,
    rooms: Arc<RoomRegistry>,
    room: Option<Addr<RoomActor>>,
    last_heartbeat: Instant,
    hello_done: bool,
}

impl WsSession {
    fn new(conn_id: Uuid, rooms: Arc<RoomRegistry>) -> Self {
        Self {
            conn_id,
            rooms,
            room: None,
            last_heartbeat: Instant::now(),
            hello_done: false,
        }
    }

    fn send_json(ctx: &mut ws::WebsocketContext<Self>, msg: &ServerMsg) {
        match serde_json::to_string(msg) {
            Ok(payload) => ctx.text(payload),
            Err(err) => warn!(error = %err, "[WS SESSION] failed to serialize outbound message"),
        }
    }

    fn send_error(
        ctx: &mut ws::WebsocketContext<Self>,
        code: ErrorCode,
        message: impl Into<String>,
    ) {
        Self::send_json(
            ctx,
            &ServerMsg::Error {
                code,
                message: message.into(),
            },
        );
    }

    fn send_error_and_close(
        &self,
        ctx: &mut ws::WebsocketContext<Self>,
        code: ErrorCode,
        message: impl Into<String>,
    ) {
        Self::send_error(ctx, code, message);
        ctx.close(Some(ws::CloseReason::from(ws::CloseCode::Error)));
        ctx.stop();
    }

    fn start_heartbeat(&mut self, ctx: &mut ws::WebsocketContext<Self>) {
        ctx.run_interval(HEARTBEAT_INTERVAL, |actor, ctx| {
            if Instant::now().duration_since(actor.last_heartbeat) > CLIENT_TIMEOUT {
                warn!(conn_id = %actor.conn_id, "[WS SESSION] heartbeat timed out");
                ctx.close(Some(ws::CloseReason::from(ws::CloseCode::Normal)));
                ctx.stop();
                return;
            }
            ctx.ping(b"keepalive");
        });
    }

    fn enter_room(
        &mut self,
        ctx: &mut ws::WebsocketContext<Self>,
        room: Addr<RoomActor>,
        name: String,
    ) {
        room.do_send(Join {
            conn_id: self.conn_id,
            name,
            addr: ctx.address().recipient::<Outbound>(),
        });
        self.room = Some(room);
    }

    fn handle_client_msg(&mut self, cmd: ClientMsg, ctx: &mut ws::WebsocketContext<Self>) {
        match cmd {
            ClientMsg::Hello { protocol } => {
                if protocol != PROTOCOL_VERSION {
                    self.send_error_and_close(
                        ctx,
                        ErrorCode::BadProtocol,
                        "Unsupported protocol version",
                    );
                    return;
                }
                self.hello_done = true;
                Self::send_json(
                    ctx,
                    &ServerMsg::HelloAck {
                        protocol: PROTOCOL_VERSION,
                    },
                );
            }

            _ if !self.hello_done => {
                self.send_error_and_close(ctx, ErrorCode::BadRequest, "Must send hello first");
            }

            ClientMsg::CreateRoom { name, bot } => {
                if self.room.is_some() {
                    Self::send_error(ctx, ErrorCode::BadRequest, "Already in a room");
                    return;
                }
                let (room_id, room) = self.rooms.create(bot.map(BotSpec::for_difficulty));
                debug!(conn_id = %self.conn_id, %room_id, "created room");
                self.enter_room(ctx, room, name);
            }

            ClientMsg::JoinRoom { room_id, name } => {
                if self.room.is_some() {
                    Self::send_error(ctx, ErrorCode::BadRequest, "Already in a room");
                    return;
                }
                let Some(room) = self.rooms.get(&room_id) else {
                    Self::send_error(ctx, ErrorCode::RoomNotFound, "No such room");
                    return;
                };
                self.enter_room(ctx, room, name);
            }

            ClientMsg::UpdateName { name } => {
                let Some(room) = &self.room else {
                    Self::send_error(ctx, ErrorCode::NotInRoom, "Join a room first");
                    return;
                };
                room.do_send(UpdateName {
                    conn_id: self.conn_id,
                    name,
                });
            }

            ClientMsg::StartGame => {
                let Some(room) = &self.room else {
                    Self::send_error(ctx, ErrorCode::NotInRoom, "Join a room first");
                    return;
                };
                room.do_send(StartGame {
                    conn_id: self.conn_id,
                });
            }

            ClientMsg::ProposeMove { card_id, pile } => {
                let Some(room) = &self.room else {
                    Self::send_error(ctx, ErrorCode::NotInRoom, "Join a room first");
                    return;
                };
                room.do_send(ProposeMove {
                    conn_id: self.conn_id,
                    card_id,
                    pile,
                });
            }

            ClientMsg::RequestPickup => {
                let Some(room) = &self.room else {
                    Self::send_error(ctx, ErrorCode::NotInRoom, "Join a room first");
                    return;
                };
                room.do_send(RequestPickup {
                    conn_id: self.conn_id,
                });
            }

            ClientMsg::MovingCard { card_id, pos } => {
                // Ephemeral channel: silently dropped when not in a room.
                if let Some(room) = &self.room {
                    room.do_send(EphemeralPosition {
                        conn_id: self.conn_id,
                        card_id,
                        pos,
                    });
                }
            }
        }
    }
}

impl Actor for WsSession {
    type Context = ws::WebsocketContext<Self>;

    fn started(&mut self, ctx: &mut Self::Context) {
        debug!(conn_id = %self.conn_id, "[WS SESSION] started");
        self.start_heartbeat(ctx);
    }

    fn stopped(&mut self, _ctx: &mut Self::Context) {
        if let Some(room) = &self.room {
            room.do_send(Leave {
                conn_id: self.conn_id,
            });
        }
        debug!(conn_id = %self.conn_id, "[WS SESSION] stopped");
    }
}

impl StreamHandler<Result<ws::Message, ws::ProtocolError>> for WsSession {
    fn handle(&mut self, msg: Result<ws::Message, ws::ProtocolError>, ctx: &mut Self::Context) {
        match msg {
            Ok(ws::Message::Ping(payload)) => {
                self.last_heartbeat = Instant::now();
                ctx.pong(&payload);
            }
            Ok(ws::Message::Pong(_)) => {
                self.last_heartbeat = Instant::now();
            }
            Ok(ws::Message::Text(text)) => {
                self.last_heartbeat = Instant::now();

                let parsed: Result<ClientMsg, _> = serde_json::from_str(&text);
                let Ok(cmd) = parsed else {
                    self.send_error_and_close(ctx, ErrorCode::BadRequest, "Malformed JSON");
                    return;
                };
                self.handle_client_msg(cmd, ctx);
            }
            Ok(ws::Message::Binary(_)) => {
                self.last_heartbeat = Instant::now();
                self.send_error_and_close(ctx, ErrorCode::BadRequest, "Binary not supported");
            }
            Ok(ws::Message::Close(reason)) => {
                ctx.close(reason);
                ctx.stop();
            }
            Ok(ws::Message::Continuation(_)) | Ok(ws::Message::Nop) => {
                self.last_heartbeat = Instant::now();
            }
            Err(err) => {
                warn!(
                    conn_id = %self.conn_id,
                    error = %err,
                    "[WS SESSION] protocol error"
                );
                ctx.close(Some(ws::CloseReason::from(ws::CloseCode::Error)));
                ctx.stop();
            }
        }
    }
}

impl Handler<Outbound> for WsSession {
    type Result = ();

    fn handle(&mut self, msg: Outbound, ctx: &mut Self::Context) -> Self::Result {
        Self::send_json(ctx, &msg.0);
    }
}
