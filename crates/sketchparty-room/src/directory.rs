//! Room directory: the name → room map, plus the dispatch surface the
//! message-routing layer calls into.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use sketchparty_protocol::{ChatMessage, DrawData, PlayerData};
use sketchparty_words::WordBank;

use crate::player::PlayerConnection;
use crate::room::{spawn_room, RoomHandle};
use crate::{GameConfig, RoomError};

/// Counter for generating unique room uids.
///
/// Names can be reused over a server's lifetime; the uid never is. A dying
/// room actor unregisters itself by (name, uid), so it can never evict a
/// newer room that took over its name.
static NEXT_ROOM_UID: AtomicU64 = AtomicU64::new(1);

/// Default mailbox size for room actors.
const DEFAULT_CHANNEL_SIZE: usize = 64;

/// Tracks every active room by name.
///
/// Cheap to clone — all clones share the same map. The lock only guards
/// the map itself: every game operation resolves its handle under the lock
/// and then talks to the room actor outside it, so rooms never contend
/// with each other.
#[derive(Clone, Default)]
pub struct RoomDirectory {
    rooms: Arc<Mutex<HashMap<String, RoomHandle>>>,
}

impl RoomDirectory {
    /// Creates a new, empty directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a room and spawns its actor. Fails when the name is taken.
    pub fn create_room(
        &self,
        name: &str,
        max_players: usize,
        config: GameConfig,
    ) -> Result<RoomHandle, RoomError> {
        let mut rooms = self.rooms.lock().expect("room directory lock");
        if rooms.contains_key(name) {
            return Err(RoomError::AlreadyExists(name.to_string()));
        }

        let uid = NEXT_ROOM_UID.fetch_add(1, Ordering::Relaxed);
        let handle = spawn_room(
            name.to_string(),
            uid,
            max_players,
            config,
            WordBank::default(),
            self.clone(),
            DEFAULT_CHANNEL_SIZE,
        );
        rooms.insert(name.to_string(), handle.clone());
        tracing::info!(room = %name, max_players, "room created");
        Ok(handle)
    }

    pub fn room_exists(&self, name: &str) -> bool {
        self.rooms
            .lock()
            .expect("room directory lock")
            .contains_key(name)
    }

    /// The handle for a room, if it exists.
    pub fn lookup(&self, name: &str) -> Option<RoomHandle> {
        self.rooms
            .lock()
            .expect("room directory lock")
            .get(name)
            .cloned()
    }

    pub fn room_count(&self) -> usize {
        self.rooms.lock().expect("room directory lock").len()
    }

    /// Removes a room and shuts its actor down. The actor cancels every
    /// timer it owns on the way out.
    pub async fn remove_room(&self, name: &str) -> Result<(), RoomError> {
        let handle = self
            .rooms
            .lock()
            .expect("room directory lock")
            .remove(name)
            .ok_or_else(|| RoomError::NotFound(name.to_string()))?;
        tracing::info!(room = %name, "room removed from directory");
        let _ = handle.shutdown().await;
        Ok(())
    }

    /// Called by a dying room actor. Only removes the entry if it still
    /// belongs to that exact room instance.
    pub(crate) fn unregister(&self, name: &str, uid: u64) {
        let mut rooms = self.rooms.lock().expect("room directory lock");
        if rooms.get(name).is_some_and(|h| h.uid() == uid) {
            rooms.remove(name);
            tracing::info!(room = %name, "empty room unregistered");
        }
    }

    // -----------------------------------------------------------------
    // Dispatch surface — one entry point per inbound message type.
    // -----------------------------------------------------------------

    fn resolve(&self, room_name: &str) -> Result<RoomHandle, RoomError> {
        self.lookup(room_name)
            .ok_or_else(|| RoomError::NotFound(room_name.to_string()))
    }

    /// Seats a player in a room (or re-admits them within the grace
    /// window) and returns their scoreboard row.
    pub async fn join_room(
        &self,
        room_name: &str,
        client_id: &str,
        username: &str,
        conn: PlayerConnection,
    ) -> Result<PlayerData, RoomError> {
        self.resolve(room_name)?.join(client_id, username, conn).await
    }

    /// Evaluates a chat line as a guess. `Ok(false)` means plain chat.
    pub async fn submit_guess(
        &self,
        room_name: &str,
        message: ChatMessage,
    ) -> Result<bool, RoomError> {
        self.resolve(room_name)?.guess(message).await
    }

    /// Relays a stroke segment into a room.
    pub async fn submit_drawing_event(
        &self,
        room_name: &str,
        sender_client_id: &str,
        event: DrawData,
    ) -> Result<(), RoomError> {
        self.resolve(room_name)?
            .drawing_event(sender_client_id, event)
            .await
    }

    /// Submits the drawing player's chosen word.
    pub async fn submit_chosen_word(
        &self,
        room_name: &str,
        word: &str,
    ) -> Result<(), RoomError> {
        self.resolve(room_name)?.choose_word(word).await
    }

    /// Reports a dropped connection to the player's room.
    pub async fn player_disconnected(
        &self,
        room_name: &str,
        client_id: &str,
    ) -> Result<(), RoomError> {
        self.resolve(room_name)?.disconnect(client_id).await
    }
}
