//! Live room lookup.
//!
//! Maps join codes to running room actors. Rooms deregister themselves
//! when their last connection leaves.

use std::sync::Arc;

use actix::prelude::*;
use dashmap::DashMap;
use tracing::info;

use crate::room::actor::{BotSpec, RoomActor};
use crate::utils::room_code::generate_room_code;

#[derive(Default)]
pub struct RoomRegistry {
    rooms: DashMap<String, Addr<RoomActor>>,
}

impl RoomRegistry {
    pub fn new() -> Self {
        Self {
            rooms: DashMap::new(),
        }
    }

    /// Open a new room under a fresh join code and start its actor.
    pub fn create(self: &Arc<Self>, bot: Option<BotSpec>) -> (String, Addr<RoomActor>) {
        let room_id = loop {
            let candidate = generate_room_code();
            if !self.rooms.contains_key(&candidate) {
                break candidate;
            }
        };
        let addr = RoomActor::new(room_id.clone(), bot, Arc::clone(self)).start();
        self.rooms.insert(room_id.clone(), addr.clone());
        info!(%room_id, "room registered");
        (room_id, addr)
    }

    /// Join codes are case-insensitive on the way in.
    pub fn get(&self, room_id: &str) -> Option<Addr<RoomActor>> {
        self.rooms
            .get(&room_id.to_ascii_uppercase())
            .map(|entry| entry.value().clone())
    }

    pub fn remove(&self, room_id: &str) {
        self.rooms.remove(room_id);
    }

    pub fn active_rooms(&self) -> usize {
        self.rooms.len()
    }
}
