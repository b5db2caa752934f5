//! A connected participant's live state.

use sketchparty_protocol::{GameMessage, PlayerData};
use tokio::sync::mpsc;
use tokio::time::Instant;

/// The room core's view of a client connection: a best-effort message sink.
///
/// The transport layer owns the receiving end and serializes each message
/// onto the actual socket. A dropped receiver means the connection is gone;
/// sends to it are skipped, never errors.
pub type PlayerConnection = mpsc::UnboundedSender<GameMessage>;

/// Where a roster entry currently stands.
///
/// A disconnected player is not removed — the entry flips to
/// `PendingRejoin` and keeps its seat, score and roster position for the
/// grace window. `epoch` distinguishes overlapping disconnect cycles:
/// a scheduled removal only applies while the epoch it was created for is
/// still the entry's current one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PlayerStatus {
    Active,
    PendingRejoin { since: Instant, epoch: u64 },
}

/// One roster entry.
#[derive(Debug)]
pub struct Player {
    pub username: String,
    /// Stable client identifier; survives reconnects.
    pub client_id: String,
    pub(crate) conn: PlayerConnection,
    pub is_drawing: bool,
    /// May go negative — the drawer is penalized for unguessed rounds.
    pub score: i32,
    /// 1-based scoreboard position, refreshed on every rankings broadcast.
    pub rank: usize,
    pub(crate) status: PlayerStatus,
}

impl Player {
    pub(crate) fn new(
        username: String,
        client_id: String,
        conn: PlayerConnection,
    ) -> Self {
        Self {
            username,
            client_id,
            conn,
            is_drawing: false,
            score: 0,
            rank: 0,
            status: PlayerStatus::Active,
        }
    }

    pub(crate) fn is_active(&self) -> bool {
        self.status == PlayerStatus::Active
    }

    /// Whether the connection can still accept messages.
    pub(crate) fn is_open(&self) -> bool {
        !self.conn.is_closed()
    }

    /// Best-effort delivery: closed or broken connections are skipped so a
    /// half-dead socket never aborts a broadcast.
    pub(crate) fn send(&self, msg: GameMessage) {
        if self.is_open() {
            let _ = self.conn.send(msg);
        }
    }

    /// This player's scoreboard row.
    pub fn data(&self) -> PlayerData {
        PlayerData {
            username: self.username.clone(),
            is_drawing: self.is_drawing,
            score: self.score,
            rank: self.rank,
        }
    }
}
