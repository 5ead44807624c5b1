//! Room lifecycle: the per-room authority actor and the live-room registry.

pub mod actor;
pub mod registry;

pub use actor::{BotSpec, RoomActor};
pub use registry::RoomRegistry;
