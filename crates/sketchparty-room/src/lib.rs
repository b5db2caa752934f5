//! Room core for Sketchparty.
//!
//! Each room runs as an isolated Tokio task (actor model) that owns its
//! roster, phase machine, round state and timers. The [`RoomDirectory`]
//! maps room names to running rooms and exposes the operations the
//! message-routing layer dispatches into.
//!
//! # Key types
//!
//! - [`RoomDirectory`] — creates/destroys rooms, routes player actions
//! - [`RoomHandle`] — send commands to a running room actor
//! - [`GameConfig`] — per-room timing and scoring settings
//! - [`Player`] / [`PlayerConnection`] — a participant and their
//!   best-effort message sink
//! - [`RoomError`] — what can go wrong at the room boundary

mod config;
mod directory;
mod error;
mod player;
mod room;

pub use config::GameConfig;
pub use directory::RoomDirectory;
pub use error::RoomError;
pub use player::{Player, PlayerConnection};
pub use room::{RoomHandle, RoomInfo};
