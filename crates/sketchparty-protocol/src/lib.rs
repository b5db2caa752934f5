//! Payload shapes for Sketchparty.
//!
//! This crate defines every message that drives the room core or leaves it:
//! the structures that get serialized, sent to clients, and deserialized on
//! the other side. How those structures become bytes on a socket is the
//! transport's concern — the room core only speaks in these shapes.
//!
//! ```text
//! Transport (frames) → Protocol (GameMessage) → Room core (state machine)
//! ```

mod types;

pub use types::{
    Announcement, AnnouncementKind, ChatMessage, ChosenWord, DrawData,
    GameError, GameErrorKind, GameMessage, GameState, JoinRoomHandshake,
    NewWords, Phase, PhaseChange, PlayerData, PlayersList, RoundDrawInfo,
    MOTION_EVENT_FINISHED, MOTION_EVENT_ONGOING,
};
