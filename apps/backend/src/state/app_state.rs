//! Application state containing shared resources.

use std::sync::Arc;

use crate::room::registry::RoomRegistry;

#[derive(Clone)]
pub struct AppState {
    rooms: Arc<RoomRegistry>,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            rooms: Arc::new(RoomRegistry::new()),
        }
    }

    pub fn rooms(&self) -> Arc<RoomRegistry> {
        Arc::clone(&self.rooms)
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
