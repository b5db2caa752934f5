//! Message types for the drawing game.
//!
//! Every type here travels between server and client as JSON. The top-level
//! wrapper is [`GameMessage`]: an internally-tagged enum, so every message
//! carries a `"type"` field that names its payload shape. A chat message
//! looks like:
//!
//! ```json
//! { "type": "chat_message", "from": "ada", "room_name": "lounge",
//!   "message": "is it a cat?", "timestamp": 1700000000000 }
//! ```
//!
//! The tag-first layout lets a dispatcher peek at `"type"` and route the
//! payload without knowing anything else about it.

use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Phase
// ---------------------------------------------------------------------------

/// The stage a room is currently in.
///
/// Serialized in SCREAMING_SNAKE_CASE (`"GAME_RUNNING"`, ...) because that is
/// what clients display and switch on.
///
/// - **WaitingForPlayers**: fewer than two players; nothing is scheduled.
/// - **WaitingForStart**: enough players to play, short grace before the
///   first round so stragglers can join.
/// - **NewRound**: the next drawing player is picking one of three words.
/// - **GameRunning**: the drawing player draws, everyone else guesses.
/// - **ShowWord**: the word is revealed before the next round starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Phase {
    WaitingForPlayers,
    WaitingForStart,
    NewRound,
    GameRunning,
    ShowWord,
}

impl Phase {
    /// Whether clients have a canvas worth looking at in this phase.
    /// Late joiners only get the drawing log replayed when this is true.
    pub fn drawing_visible(&self) -> bool {
        matches!(self, Self::GameRunning | Self::ShowWord)
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::WaitingForPlayers => "WAITING_FOR_PLAYERS",
            Self::WaitingForStart => "WAITING_FOR_START",
            Self::NewRound => "NEW_ROUND",
            Self::GameRunning => "GAME_RUNNING",
            Self::ShowWord => "SHOW_WORD",
        };
        write!(f, "{name}")
    }
}

// ---------------------------------------------------------------------------
// Inbound payloads
// ---------------------------------------------------------------------------

/// A chat line from a player. During `GAME_RUNNING` every chat line is also
/// evaluated as a guess; `from` must be the sender's display name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub from: String,
    pub room_name: String,
    pub message: String,
    /// Milliseconds since the Unix epoch, stamped by the sender.
    pub timestamp: u64,
}

/// First message a client sends after the socket is up.
/// Parsed by the transport; the room core receives the fields directly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JoinRoomHandshake {
    pub username: String,
    pub client_id: String,
    pub room_name: String,
}

/// `motion_event` value for a stroke segment that is still being drawn.
pub const MOTION_EVENT_ONGOING: i32 = 2;
/// `motion_event` value for the segment that ends a stroke.
pub const MOTION_EVENT_FINISHED: i32 = 1;

/// One segment of a stroke on the canvas.
///
/// The room core treats this as opaque except for `motion_event`, which it
/// needs to leave every client's canvas in a finished state when a round
/// ends mid-stroke. Everything else is relayed untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrawData {
    pub room_name: String,
    pub color: i32,
    pub thickness: f32,
    pub from_x: f32,
    pub from_y: f32,
    pub to_x: f32,
    pub to_y: f32,
    pub motion_event: i32,
}

impl DrawData {
    /// Whether this segment left the stroke unfinished.
    pub fn is_ongoing(&self) -> bool {
        self.motion_event == MOTION_EVENT_ONGOING
    }

    /// A copy of this segment marked as the end of the stroke.
    pub fn finished(&self) -> DrawData {
        DrawData {
            motion_event: MOTION_EVENT_FINISHED,
            ..self.clone()
        }
    }
}

// ---------------------------------------------------------------------------
// Outbound payloads
// ---------------------------------------------------------------------------

/// What a server-side announcement is about. Clients style the chat line
/// accordingly (join/leave in grey, correct guesses in green, and so on).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnnouncementKind {
    PlayerJoined,
    PlayerLeft,
    PlayerGuessedWord,
    EverybodyGuessedIt,
}

/// A server-generated chat line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Announcement {
    pub message: String,
    /// Milliseconds since the Unix epoch.
    pub timestamp: u64,
    pub kind: AnnouncementKind,
}

/// Countdown update, broadcast once per second while a phase timer runs.
///
/// `phase` is `Some` on the first tick of a countdown only — the phase name
/// is sent once, after that clients just decrement their local display from
/// `time_ms`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhaseChange {
    pub phase: Option<Phase>,
    /// Milliseconds remaining in the current phase.
    pub time_ms: u64,
    pub drawing_player: Option<String>,
}

/// One row of the scoreboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerData {
    pub username: String,
    pub is_drawing: bool,
    pub score: i32,
    /// 1-based position in the score ordering; ties get distinct ranks.
    pub rank: usize,
}

/// The full scoreboard, ordered by descending score.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayersList {
    pub players: Vec<PlayerData>,
}

/// Who is drawing and what the guessers see.
///
/// `word` is the secret itself for the drawing player (and for everyone
/// during `SHOW_WORD`), the underscore mask for everyone else.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    pub drawing_player: String,
    pub word: String,
}

/// The three candidate words offered privately to the next drawing player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewWords {
    pub new_words: Vec<String>,
}

/// The drawing player's pick (inbound), and the reveal broadcast to the
/// whole room when the round ends (outbound). Same shape both ways.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChosenWord {
    pub chosen_word: String,
    pub room_name: String,
}

/// The round's drawing log, replayed to a late joiner so their canvas
/// catches up. Each entry is one serialized [`GameMessage::DrawData`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundDrawInfo {
    pub data: Vec<String>,
}

/// Why a join was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameErrorKind {
    RoomNotFound,
    RoomFull,
}

/// Join failure, reported to the connection that attempted it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameError {
    pub error_kind: GameErrorKind,
}

// ---------------------------------------------------------------------------
// GameMessage — the envelope
// ---------------------------------------------------------------------------

/// Every message on the wire, tagged with a `"type"` field.
///
/// `#[serde(tag = "type")]` produces internally-tagged JSON: the payload's
/// fields sit next to the tag instead of being nested under it, e.g.
/// `{ "type": "chosen_word", "chosen_word": "apple", "room_name": "lounge" }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GameMessage {
    ChatMessage(ChatMessage),
    JoinRoomHandshake(JoinRoomHandshake),
    DrawData(DrawData),
    Announcement(Announcement),
    PhaseChange(PhaseChange),
    PlayersList(PlayersList),
    GameState(GameState),
    NewWords(NewWords),
    ChosenWord(ChosenWord),
    RoundDrawInfo(RoundDrawInfo),
    GameError(GameError),
}

macro_rules! impl_from_payload {
    ($($payload:ident),* $(,)?) => {
        $(
            impl From<$payload> for GameMessage {
                fn from(payload: $payload) -> Self {
                    GameMessage::$payload(payload)
                }
            }
        )*
    };
}

impl_from_payload!(
    ChatMessage,
    JoinRoomHandshake,
    DrawData,
    Announcement,
    PhaseChange,
    PlayersList,
    GameState,
    NewWords,
    ChosenWord,
    RoundDrawInfo,
    GameError,
);

// =========================================================================
// Tests
// =========================================================================
