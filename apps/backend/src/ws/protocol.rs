//! Typed websocket protocol.
//!
//! Two channels share the socket but never mix: the authoritative channel
//! (commits, rejections, snapshots, lobby) is ordered per room by commit
//! sequence; the ephemeral channel (`MovingCard`) is a best-effort relay
//! for drag positions and can never change game outcome. Every inbound
//! frame must parse into `ClientMsg`; there is no ad-hoc payload parsing
//! past this boundary.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::bots::profiles::BotDifficulty;
use crate::domain::cards::{Card, CardId};
use crate::domain::errors::RejectReason;
use crate::domain::snapshot::GameSnapshot;
use crate::domain::state::PileId;

pub const PROTOCOL_VERSION: i32 = 1;

/// Normalized drag coordinates. `None` means the drag ended.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CardPos {
    pub x: f32,
    pub y: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMsg {
    Hello {
        protocol: i32,
    },
    /// Open a new room; with `bot` set, the opposing seat is taken by the
    /// configured difficulty's bot.
    CreateRoom {
        name: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        bot: Option<BotDifficulty>,
    },
    JoinRoom {
        room_id: String,
        name: String,
    },
    UpdateName {
        name: String,
    },
    StartGame,
    ProposeMove {
        card_id: CardId,
        pile: PileId,
    },
    RequestPickup,
    /// Ephemeral drag hint; relayed verbatim, never validated.
    MovingCard {
        card_id: CardId,
        pos: Option<CardPos>,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LobbyConnection {
    pub id: Uuid,
    pub name: String,
    pub seated: bool,
}

#[allow(clippy::large_enum_variant)]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMsg {
    HelloAck {
        protocol: i32,
    },

    RoomJoined {
        room_id: String,
        player_id: Uuid,
        seated: bool,
    },

    LobbyState {
        room_id: String,
        connections: Vec<LobbyConnection>,
        game_started: bool,
    },

    /// Authoritative per-viewer snapshot, sent in commit order.
    GameState {
        game: GameSnapshot,
    },

    /// Ack to the proposer of a committed move.
    MoveCommitted {
        pile: PileId,
        new_top: Card,
        hand_size: usize,
        seq: u64,
    },

    /// Ack to the requester of a committed pickup.
    PickupCommitted {
        hand_size: usize,
        kitty_size: usize,
        seq: u64,
    },

    /// Broadcast when the arbiter resolved a deadlock by reseeding.
    Redeal {
        tops: [Card; 2],
        seq: u64,
    },

    /// Reported to the originating caller only.
    Rejected {
        reason: RejectReason,
    },

    /// Ephemeral relay of another member's drag position.
    MovingCard {
        player_id: Uuid,
        card_id: CardId,
        pos: Option<CardPos>,
    },

    /// Bot flavor text (intro at start, win/lose line at the end).
    BotSays {
        name: String,
        message: String,
    },

    Error {
        code: ErrorCode,
        message: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    BadProtocol,
    BadRequest,
    RoomNotFound,
    NotInRoom,
    Internal,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_messages_are_type_tagged() {
        let msg: ClientMsg = serde_json::from_str(
            r#"{"type":"propose_move","card_id":17,"pile":"left"}"#,
        )
        .unwrap();
        assert!(matches!(
            msg,
            ClientMsg::ProposeMove {
                card_id: 17,
                pile: PileId::Left
            }
        ));
    }

    #[test]
    fn unknown_message_types_fail_to_parse() {
        assert!(serde_json::from_str::<ClientMsg>(r#"{"type":"format_disk"}"#).is_err());
    }

    #[test]
    fn rejection_reason_is_snake_case_on_the_wire() {
        let json = serde_json::to_string(&ServerMsg::Rejected {
            reason: RejectReason::StaleTarget,
        })
        .unwrap();
        assert_eq!(json, r#"{"type":"rejected","reason":"stale_target"}"#);
    }

    #[test]
    fn moving_card_end_of_drag_is_null_pos() {
        let msg: ClientMsg =
            serde_json::from_str(r#"{"type":"moving_card","card_id":3,"pos":null}"#).unwrap();
        assert!(matches!(
            msg,
            ClientMsg::MovingCard { card_id: 3, pos: None }
        ));
    }
}
