//! Error types for the room layer.

/// Errors that can occur during room operations.
///
/// Note what is *not* here: a guess outside GAME_RUNNING, a chosen word
/// outside NEW_ROUND, or a disconnect for an unknown player are all quietly
/// ignored — they are expected races with the phase machine, not faults.
#[derive(Debug, thiserror::Error)]
pub enum RoomError {
    /// No room with this name exists.
    #[error("room {0:?} not found")]
    NotFound(String),

    /// A room with this name already exists.
    #[error("room {0:?} already exists")]
    AlreadyExists(String),

    /// The room is at capacity — no seat for a fresh player.
    #[error("room {0:?} is full")]
    RoomFull(String),

    /// The room's mailbox is closed; it is shutting down or gone.
    #[error("room {0:?} is unavailable")]
    Unavailable(String),
}
