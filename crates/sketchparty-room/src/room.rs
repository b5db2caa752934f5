//! Room actor: an isolated Tokio task that owns one game room.
//!
//! Each room runs in its own task and holds every piece of mutable game
//! state — roster, phase, round data, timers. The outside world (and the
//! room's own countdown and removal timers) reach it only through message
//! passing, so player actions, timer ticks and disconnects all serialize
//! through one mailbox. That single ordering is what makes the phase
//! machine's guarantees cheap: a transition's side effects run to completion
//! before the next event is even looked at.

use std::collections::HashMap;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use rand::seq::{IndexedRandom, SliceRandom};
use sketchparty_protocol::{
    Announcement, AnnouncementKind, ChatMessage, ChosenWord, DrawData,
    GameMessage, GameState, NewWords, Phase, PhaseChange, PlayerData,
    PlayersList, RoundDrawInfo,
};
use sketchparty_timer::{Countdown, CountdownConfig, CountdownEvent};
use sketchparty_words::{underscore_mask, WordBank};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::Instant;

use crate::directory::RoomDirectory;
use crate::player::{Player, PlayerConnection, PlayerStatus};
use crate::{GameConfig, RoomError};

/// Commands sent to a room actor through its mailbox.
pub(crate) enum RoomCommand {
    /// Add a player (or re-admit one inside the rejoin grace window).
    Join {
        client_id: String,
        username: String,
        conn: PlayerConnection,
        reply: oneshot::Sender<Result<PlayerData, RoomError>>,
    },

    /// A player's connection dropped.
    Disconnect { client_id: String },

    /// Evaluate a chat line as a guess. Replies whether it was correct.
    Guess {
        message: ChatMessage,
        reply: oneshot::Sender<bool>,
    },

    /// Relay a stroke segment from a player.
    Draw {
        sender_client_id: String,
        event: DrawData,
    },

    /// The drawing player picked their word.
    ChooseWord { word: String },

    /// A rejoin grace window ran out. Sent by the room's own removal
    /// timer; `epoch` makes stale timers harmless.
    FinalizeRemoval { client_id: String, epoch: u64 },

    /// Request a snapshot of the room's current state.
    GetInfo { reply: oneshot::Sender<RoomInfo> },

    /// Shut the room down.
    Shutdown,
}

/// A snapshot of room state for callers outside the actor.
#[derive(Debug, Clone)]
pub struct RoomInfo {
    pub name: String,
    pub phase: Phase,
    /// Active players in scoreboard order (descending score, rank 1 first).
    pub players: Vec<PlayerData>,
    pub max_players: usize,
    pub drawing_player: Option<String>,
}

impl RoomInfo {
    pub fn player_count(&self) -> usize {
        self.players.len()
    }
}

/// Handle to a running room actor. Cheap to clone — it's an
/// `mpsc::Sender` wrapper. The `RoomDirectory` holds one per room.
#[derive(Clone)]
pub struct RoomHandle {
    name: String,
    uid: u64,
    sender: mpsc::Sender<RoomCommand>,
}

impl RoomHandle {
    /// The room's name (its key in the directory).
    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn uid(&self) -> u64 {
        self.uid
    }

    fn unavailable(&self) -> RoomError {
        RoomError::Unavailable(self.name.clone())
    }

    /// Adds a player and returns their scoreboard row, or why they can't
    /// join.
    pub async fn join(
        &self,
        client_id: &str,
        username: &str,
        conn: PlayerConnection,
    ) -> Result<PlayerData, RoomError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(RoomCommand::Join {
                client_id: client_id.to_string(),
                username: username.to_string(),
                conn,
                reply: reply_tx,
            })
            .await
            .map_err(|_| self.unavailable())?;
        reply_rx.await.map_err(|_| self.unavailable())?
    }

    /// Reports a dropped connection. Unknown client ids are ignored by the
    /// actor; a disconnect can race the end of its own grace window.
    pub async fn disconnect(&self, client_id: &str) -> Result<(), RoomError> {
        self.sender
            .send(RoomCommand::Disconnect {
                client_id: client_id.to_string(),
            })
            .await
            .map_err(|_| self.unavailable())
    }

    /// Evaluates a chat line as a guess. `Ok(false)` means "just chat" —
    /// the transport relays it to the other players.
    pub async fn guess(&self, message: ChatMessage) -> Result<bool, RoomError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(RoomCommand::Guess {
                message,
                reply: reply_tx,
            })
            .await
            .map_err(|_| self.unavailable())?;
        reply_rx.await.map_err(|_| self.unavailable())
    }

    /// Relays a stroke segment (fire-and-forget).
    pub async fn drawing_event(
        &self,
        sender_client_id: &str,
        event: DrawData,
    ) -> Result<(), RoomError> {
        self.sender
            .send(RoomCommand::Draw {
                sender_client_id: sender_client_id.to_string(),
                event,
            })
            .await
            .map_err(|_| self.unavailable())
    }

    /// Submits the drawing player's chosen word (fire-and-forget).
    pub async fn choose_word(&self, word: &str) -> Result<(), RoomError> {
        self.sender
            .send(RoomCommand::ChooseWord {
                word: word.to_string(),
            })
            .await
            .map_err(|_| self.unavailable())
    }

    /// Requests the current room snapshot.
    pub async fn info(&self) -> Result<RoomInfo, RoomError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(RoomCommand::GetInfo { reply: reply_tx })
            .await
            .map_err(|_| self.unavailable())?;
        reply_rx.await.map_err(|_| self.unavailable())
    }

    /// Tells the room to shut down.
    pub async fn shutdown(&self) -> Result<(), RoomError> {
        self.sender
            .send(RoomCommand::Shutdown)
            .await
            .map_err(|_| self.unavailable())
    }
}

/// A scheduled end-of-grace-window removal for one disconnected player.
struct RemovalTask {
    task: JoinHandle<()>,
    epoch: u64,
}

impl Drop for RemovalTask {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// The internal room actor state. Runs inside a Tokio task.
pub(crate) struct RoomActor {
    name: String,
    uid: u64,
    max_players: usize,
    config: GameConfig,
    words: WordBank,
    directory: RoomDirectory,

    /// The roster. Order matters for the drawing rotation; entries in the
    /// grace window stay in place with a `PendingRejoin` status.
    players: Vec<Player>,
    phase: Phase,

    /// The round's secret word. `None` until the drawer picks (or the
    /// pick window runs out and a fallback is drawn).
    word: Option<String>,
    /// The three candidates last offered to the drawer.
    candidate_words: Option<Vec<String>>,
    /// Usernames that guessed this round's word, in guess order.
    winning_players: Vec<String>,
    /// Serialized stroke segments of the current round, for replay to
    /// late joiners.
    draw_log: Vec<String>,
    last_draw_event: Option<DrawData>,
    /// Position in the drawing rotation (an index into the active roster).
    drawing_player_index: usize,
    /// Client id of the current drawing player.
    drawing_player: Option<String>,
    /// When the current phase countdown was armed; guess scores are
    /// computed against this.
    round_started_at: Instant,

    /// The one armed countdown, if any. Replacing it cancels the old one.
    countdown: Option<Countdown>,
    /// Whether the current countdown has already broadcast its phase name.
    countdown_announced: bool,

    removal_tasks: HashMap<String, RemovalTask>,
    removal_epoch: u64,

    receiver: mpsc::Receiver<RoomCommand>,
    /// Clone of our own mailbox sender, handed to removal timers.
    loopback: mpsc::Sender<RoomCommand>,
}

/// Spawns a new room actor task and returns a handle to it.
pub(crate) fn spawn_room(
    name: String,
    uid: u64,
    max_players: usize,
    config: GameConfig,
    words: WordBank,
    directory: RoomDirectory,
    channel_size: usize,
) -> RoomHandle {
    let (tx, rx) = mpsc::channel(channel_size);

    let actor = RoomActor {
        name: name.clone(),
        uid,
        max_players,
        config,
        words,
        directory,
        players: Vec::new(),
        phase: Phase::WaitingForPlayers,
        word: None,
        candidate_words: None,
        winning_players: Vec::new(),
        draw_log: Vec::new(),
        last_draw_event: None,
        drawing_player_index: 0,
        drawing_player: None,
        round_started_at: Instant::now(),
        countdown: None,
        countdown_announced: false,
        removal_tasks: HashMap::new(),
        removal_epoch: 0,
        receiver: rx,
        loopback: tx.clone(),
    };

    tokio::spawn(actor.run());

    RoomHandle {
        name,
        uid,
        sender: tx,
    }
}

/// Resolves to the armed countdown's next event, or pends forever when no
/// countdown is running (`select!` keeps serving the mailbox either way).
async fn next_countdown_event(
    countdown: &mut Option<Countdown>,
) -> Option<CountdownEvent> {
    match countdown {
        Some(cd) => cd.next_event().await,
        None => std::future::pending().await,
    }
}

impl RoomActor {
    async fn run(mut self) {
        tracing::info!(
            room = %self.name,
            max_players = self.max_players,
            "room opened"
        );

        loop {
            tokio::select! {
                cmd = self.receiver.recv() => match cmd {
                    Some(cmd) => {
                        if self.handle_command(cmd) {
                            break;
                        }
                    }
                    // Every handle is gone; nothing can reach this room.
                    None => break,
                },
                ev = next_countdown_event(&mut self.countdown) => match ev {
                    Some(ev) => self.handle_countdown_event(ev),
                    None => self.countdown = None,
                },
            }
        }

        self.kill();
        tracing::info!(room = %self.name, "room closed");
    }

    /// Handles one command. Returns `true` when the room should die.
    fn handle_command(&mut self, cmd: RoomCommand) -> bool {
        match cmd {
            RoomCommand::Join {
                client_id,
                username,
                conn,
                reply,
            } => {
                let result = self.handle_join(client_id, username, conn);
                let _ = reply.send(result);
                false
            }
            RoomCommand::Disconnect { client_id } => {
                self.handle_disconnect(&client_id)
            }
            RoomCommand::Guess { message, reply } => {
                let _ = reply.send(self.handle_guess(&message));
                false
            }
            RoomCommand::Draw {
                sender_client_id,
                event,
            } => {
                self.handle_draw(&sender_client_id, event);
                false
            }
            RoomCommand::ChooseWord { word } => {
                self.handle_chosen_word(word);
                false
            }
            RoomCommand::FinalizeRemoval { client_id, epoch } => {
                self.finalize_removal(&client_id, epoch);
                false
            }
            RoomCommand::GetInfo { reply } => {
                let _ = reply.send(self.info());
                false
            }
            RoomCommand::Shutdown => {
                tracing::info!(room = %self.name, "room shutting down");
                true
            }
        }
    }

    // -----------------------------------------------------------------
    // Membership
    // -----------------------------------------------------------------

    fn handle_join(
        &mut self,
        client_id: String,
        username: String,
        conn: PlayerConnection,
    ) -> Result<PlayerData, RoomError> {
        // Transport retries land here: an already-seated client id keeps
        // its seat and simply gets its row back.
        if let Some(existing) = self
            .players
            .iter()
            .find(|p| p.is_active() && p.client_id == client_id)
        {
            return Ok(existing.data());
        }

        let rejoining = self
            .players
            .iter()
            .any(|p| !p.is_active() && p.client_id == client_id);

        // A pending player's seat was never released, so a rejoin is
        // exempt from the capacity check.
        if !rejoining && self.active_len() >= self.max_players {
            return Err(RoomError::RoomFull(self.name.clone()));
        }

        if rejoining {
            self.cancel_removal(&client_id);
            let drawing =
                self.drawing_player.as_deref() == Some(client_id.as_str());
            let player = self
                .players
                .iter_mut()
                .find(|p| p.client_id == client_id)
                .expect("pending entry just matched");
            player.conn = conn;
            player.status = PlayerStatus::Active;
            player.is_drawing = drawing;
            tracing::info!(
                room = %self.name,
                client_id = %client_id,
                username = %player.username,
                "player rejoined within grace window"
            );
        } else {
            self.players
                .push(Player::new(username.clone(), client_id.clone(), conn));
            tracing::info!(
                room = %self.name,
                client_id = %client_id,
                username = %username,
                players = self.active_len(),
                "player joined"
            );
        }

        self.apply_join_triggers();

        let idx = self
            .players
            .iter()
            .position(|p| p.client_id == client_id)
            .expect("joined player is in the roster");
        let joined_name = self.players[idx].username.clone();

        self.send_round_state(idx);
        self.broadcast_player_states();
        self.send_draw_log(idx);
        self.broadcast(announce(
            format!("{joined_name} joined the party!"),
            AnnouncementKind::PlayerJoined,
        ));

        Ok(self.players[idx].data())
    }

    /// Roster-size transitions, evaluated after every join.
    fn apply_join_triggers(&mut self) {
        let n = self.active_len();
        if n == 1 {
            self.transition_to(Phase::WaitingForPlayers);
        } else if n == 2 && self.phase == Phase::WaitingForPlayers {
            self.shuffle_roster();
            self.transition_to(Phase::WaitingForStart);
        } else if self.phase == Phase::WaitingForStart && n == self.max_players
        {
            self.shuffle_roster();
            self.transition_to(Phase::NewRound);
        }
    }

    /// Returns `true` when the room emptied out and should die.
    fn handle_disconnect(&mut self, client_id: &str) -> bool {
        let Some(idx) = self
            .players
            .iter()
            .position(|p| p.is_active() && p.client_id == client_id)
        else {
            // Already pending, already finalized, or never here.
            tracing::debug!(
                room = %self.name,
                client_id = %client_id,
                "disconnect for unknown player, ignoring"
            );
            return false;
        };

        self.removal_epoch += 1;
        let epoch = self.removal_epoch;
        let username = self.players[idx].username.clone();
        self.players[idx].status = PlayerStatus::PendingRejoin {
            since: Instant::now(),
            epoch,
        };
        self.schedule_removal(client_id.to_string(), epoch);

        tracing::info!(
            room = %self.name,
            client_id = %client_id,
            username = %username,
            grace_secs = self.config.rejoin_grace.as_secs(),
            "player disconnected, grace window started"
        );

        self.broadcast_player_states();
        self.broadcast(announce(
            format!("{username} has left the party"),
            AnnouncementKind::PlayerLeft,
        ));

        match self.active_len() {
            0 => true,
            1 => {
                // One lonely player can't play a round; park the room and
                // drop whatever transition was pending.
                self.transition_to(Phase::WaitingForPlayers);
                false
            }
            _ => false,
        }
    }

    fn schedule_removal(&mut self, client_id: String, epoch: u64) {
        let grace = self.config.rejoin_grace;
        let loopback = self.loopback.clone();
        let cid = client_id.clone();
        let task = tokio::spawn(async move {
            tokio::time::sleep(grace).await;
            let _ = loopback
                .send(RoomCommand::FinalizeRemoval {
                    client_id: cid,
                    epoch,
                })
                .await;
        });
        self.removal_tasks
            .insert(client_id, RemovalTask { task, epoch });
    }

    fn cancel_removal(&mut self, client_id: &str) {
        // Dropping the task entry aborts the timer.
        self.removal_tasks.remove(client_id);
    }

    fn finalize_removal(&mut self, client_id: &str, epoch: u64) {
        if self
            .removal_tasks
            .get(client_id)
            .is_some_and(|t| t.epoch == epoch)
        {
            self.removal_tasks.remove(client_id);
        }

        let Some(idx) = self
            .players
            .iter()
            .position(|p| p.client_id == client_id)
        else {
            return;
        };

        match self.players[idx].status {
            PlayerStatus::PendingRejoin { epoch: current, since }
                if current == epoch =>
            {
                let player = self.players.remove(idx);
                tracing::info!(
                    room = %self.name,
                    client_id = %client_id,
                    username = %player.username,
                    pending_secs = since.elapsed().as_secs(),
                    "grace window elapsed, player removed for good"
                );
            }
            // The player rejoined (or started a newer grace window) after
            // this timer was scheduled; the removal is stale.
            _ => {}
        }
    }

    // -----------------------------------------------------------------
    // Phase machine
    // -----------------------------------------------------------------

    /// The one place the phase changes. Stores the new value and runs that
    /// phase's entry side effects before anything else can observe it.
    fn transition_to(&mut self, phase: Phase) {
        tracing::debug!(
            room = %self.name,
            from = %self.phase,
            to = %phase,
            "phase transition"
        );
        self.phase = phase;
        match phase {
            Phase::WaitingForPlayers => self.on_waiting_for_players(),
            Phase::WaitingForStart => self.on_waiting_for_start(),
            Phase::NewRound => self.on_new_round(),
            Phase::GameRunning => self.on_game_running(),
            Phase::ShowWord => self.on_show_word(),
        }
    }

    fn on_waiting_for_players(&mut self) {
        // No countdown in the lobby; whatever was armed is void now.
        self.countdown = None;
        self.broadcast(
            PhaseChange {
                phase: Some(Phase::WaitingForPlayers),
                time_ms: self.config.waiting_for_start_delay.as_millis() as u64,
                drawing_player: None,
            }
            .into(),
        );
    }

    fn on_waiting_for_start(&mut self) {
        // The countdown's first tick announces the phase to everyone.
        self.arm_countdown(self.config.waiting_for_start_delay);
    }

    fn on_new_round(&mut self) {
        self.draw_log.clear();
        self.last_draw_event = None;

        let candidates = self.words.candidates(self.config.word_candidates);
        self.candidate_words = Some(candidates.clone());
        self.next_drawing_player();
        self.broadcast_player_states();
        if let Some(drawer) = self.drawing_player_entry() {
            drawer.send(NewWords { new_words: candidates }.into());
        }
        self.arm_countdown(self.config.new_round_delay);
    }

    fn on_game_running(&mut self) {
        self.winning_players.clear();

        // The drawer's explicit pick wins; otherwise fall back to a random
        // candidate, then to the bank, so an unresponsive client never
        // blocks the round.
        let word = self
            .word
            .clone()
            .or_else(|| {
                self.candidate_words
                    .as_ref()
                    .and_then(|words| words.choose(&mut rand::rng()).cloned())
            })
            .or_else(|| self.words.random_word())
            .unwrap_or_default();
        self.word = Some(word.clone());

        if self.drawing_player_entry().is_none() {
            // The rotation assigns a drawer on every NEW_ROUND, so this
            // path only exists to recover from an inconsistent roster.
            self.assign_random_drawer();
        }
        let drawer_name = self.drawing_player_name().unwrap_or_default();
        let drawer_id = self.drawing_player.clone().unwrap_or_default();

        self.broadcast_except(
            GameState {
                drawing_player: drawer_name.clone(),
                word: underscore_mask(&word),
            }
            .into(),
            &drawer_id,
        );
        if let Some(drawer) = self.drawing_player_entry() {
            drawer.send(
                GameState {
                    drawing_player: drawer_name,
                    word: word.clone(),
                }
                .into(),
            );
        }

        self.arm_countdown(self.config.game_running_delay);
        tracing::info!(
            room = %self.name,
            secs = self.config.game_running_delay.as_secs(),
            "drawing phase started"
        );
    }

    fn on_show_word(&mut self) {
        if self.winning_players.is_empty() {
            let penalty = self.config.nobody_guessed_penalty;
            if let Some(drawer) = self.drawing_player_entry_mut() {
                drawer.score -= penalty;
            }
        }
        self.finish_off_drawing();
        self.broadcast_player_states();
        if let Some(word) = self.word.clone() {
            self.broadcast(
                ChosenWord {
                    chosen_word: word,
                    room_name: self.name.clone(),
                }
                .into(),
            );
        }
        self.arm_countdown(self.config.show_word_delay);
    }

    /// Arms the phase countdown, cancelling whatever was armed before.
    /// At most one countdown per room can ever be live.
    fn arm_countdown(&mut self, delay: Duration) {
        self.countdown = Some(Countdown::start(CountdownConfig::new(
            delay,
            self.config.countdown_tick,
        )));
        self.countdown_announced = false;
        self.round_started_at = Instant::now();
    }

    fn handle_countdown_event(&mut self, ev: CountdownEvent) {
        match ev {
            CountdownEvent::Tick { remaining } => {
                // The phase name goes out once; later ticks only carry the
                // remaining time.
                let phase = if self.countdown_announced {
                    None
                } else {
                    Some(self.phase)
                };
                self.countdown_announced = true;
                self.broadcast(
                    PhaseChange {
                        phase,
                        time_ms: remaining.as_millis() as u64,
                        drawing_player: self.drawing_player_name(),
                    }
                    .into(),
                );
            }
            CountdownEvent::Elapsed => {
                self.countdown = None;
                let next = match self.phase {
                    Phase::WaitingForStart => Phase::NewRound,
                    Phase::NewRound => {
                        // The drawer never picked; clear the stale word so
                        // GAME_RUNNING draws a fallback.
                        self.word = None;
                        Phase::GameRunning
                    }
                    Phase::GameRunning => Phase::ShowWord,
                    Phase::ShowWord => Phase::NewRound,
                    // No timer is ever armed in the lobby; follow the
                    // table anyway if one somehow fires.
                    Phase::WaitingForPlayers => Phase::NewRound,
                };
                self.transition_to(next);
            }
        }
    }

    // -----------------------------------------------------------------
    // Drawing rotation
    // -----------------------------------------------------------------

    /// Advances the rotation: clears the old drawer's flag, assigns the
    /// next active player (clamped to the last seat when players left),
    /// then steps the index with wraparound.
    fn next_drawing_player(&mut self) {
        if let Some(prev) = self.drawing_player.take() {
            if let Some(p) =
                self.players.iter_mut().find(|p| p.client_id == prev)
            {
                p.is_drawing = false;
            }
        }

        let active: Vec<usize> = self
            .players
            .iter()
            .enumerate()
            .filter(|(_, p)| p.is_active())
            .map(|(i, _)| i)
            .collect();
        if active.is_empty() {
            return;
        }

        let seat = if self.drawing_player_index < active.len() {
            self.drawing_player_index
        } else {
            active.len() - 1
        };
        self.drawing_player_index = if seat < active.len() - 1 {
            seat + 1
        } else {
            0
        };

        let player = &mut self.players[active[seat]];
        player.is_drawing = true;
        self.drawing_player = Some(player.client_id.clone());
    }

    fn assign_random_drawer(&mut self) {
        let active: Vec<usize> = self
            .players
            .iter()
            .enumerate()
            .filter(|(_, p)| p.is_active())
            .map(|(i, _)| i)
            .collect();
        let Some(&idx) = active.choose(&mut rand::rng()) else {
            return;
        };
        tracing::warn!(
            room = %self.name,
            username = %self.players[idx].username,
            "no drawing player at round start, picked one at random"
        );
        let player = &mut self.players[idx];
        player.is_drawing = true;
        self.drawing_player = Some(player.client_id.clone());
    }

    // -----------------------------------------------------------------
    // Guessing & scoring
    // -----------------------------------------------------------------

    /// Evaluates a chat line as a guess; scores, announces and possibly
    /// ends the round on a hit. Returns whether the guess was correct.
    fn handle_guess(&mut self, msg: &ChatMessage) -> bool {
        if !self.is_guess_correct(msg) {
            return false;
        }

        let score = guess_score(&self.config, self.round_started_at.elapsed());
        let bonus = drawer_bonus(&self.config, self.active_len());

        if let Some(guesser) = self
            .players
            .iter_mut()
            .find(|p| p.is_active() && p.username == msg.from)
        {
            guesser.score += score;
        }
        if let Some(drawer) = self.drawing_player_entry_mut() {
            drawer.score += bonus;
        }

        self.broadcast_player_states();
        self.broadcast(announce(
            format!("{} has guessed it!", msg.from),
            AnnouncementKind::PlayerGuessedWord,
        ));

        self.winning_players.push(msg.from.clone());
        if self.winning_players.len() >= self.active_len().saturating_sub(1) {
            // Every guesser got it — no point sitting out the timer.
            self.broadcast(announce(
                "Everybody guessed it! New round is starting...".to_string(),
                AnnouncementKind::EverybodyGuessedIt,
            ));
            self.transition_to(Phase::NewRound);
        }
        true
    }

    fn is_guess_correct(&self, msg: &ChatMessage) -> bool {
        let Some(word) = &self.word else {
            return false;
        };
        self.phase == Phase::GameRunning
            && self.drawing_player_name().as_deref() != Some(msg.from.as_str())
            && !self.winning_players.contains(&msg.from)
            && guess_matches(&msg.message, word)
    }

    // -----------------------------------------------------------------
    // Drawing relay
    // -----------------------------------------------------------------

    fn handle_draw(&mut self, sender_client_id: &str, event: DrawData) {
        if self.phase != Phase::GameRunning {
            return;
        }
        let msg = GameMessage::DrawData(event.clone());
        match serde_json::to_string(&msg) {
            Ok(serialized) => self.draw_log.push(serialized),
            Err(error) => {
                tracing::error!(room = %self.name, %error, "stroke segment not loggable");
            }
        }
        self.last_draw_event = Some(event);
        self.broadcast_except(msg, sender_client_id);
    }

    /// If the round ended mid-stroke, broadcast a synthesized final
    /// segment so every canvas is left in a finished state.
    fn finish_off_drawing(&mut self) {
        if let Some(last) = &self.last_draw_event {
            if !self.draw_log.is_empty() && last.is_ongoing() {
                self.broadcast(GameMessage::DrawData(last.finished()));
            }
        }
    }

    fn handle_chosen_word(&mut self, word: String) {
        if self.phase != Phase::NewRound {
            // Late or duplicate pick; the phase table stays authoritative.
            tracing::debug!(
                room = %self.name,
                phase = %self.phase,
                "chosen word outside of round setup, ignoring"
            );
            return;
        }
        self.word = Some(word);
        self.transition_to(Phase::GameRunning);
    }

    // -----------------------------------------------------------------
    // Broadcasts & per-player sends
    // -----------------------------------------------------------------

    fn broadcast(&self, msg: GameMessage) {
        for player in self.players.iter().filter(|p| p.is_active()) {
            player.send(msg.clone());
        }
    }

    fn broadcast_except(&self, msg: GameMessage, except_client_id: &str) {
        for player in self.players.iter().filter(|p| p.is_active()) {
            if player.client_id != except_client_id {
                player.send(msg.clone());
            }
        }
    }

    /// Recomputes ranks and broadcasts the scoreboard.
    fn broadcast_player_states(&mut self) {
        let mut order: Vec<usize> = self
            .players
            .iter()
            .enumerate()
            .filter(|(_, p)| p.is_active())
            .map(|(i, _)| i)
            .collect();
        // Stable sort: ties keep roster order.
        order.sort_by_key(|&i| std::cmp::Reverse(self.players[i].score));
        for (pos, &i) in order.iter().enumerate() {
            self.players[i].rank = pos + 1;
        }

        let players = order.iter().map(|&i| self.players[i].data()).collect();
        self.broadcast(PlayersList { players }.into());
    }

    /// Brings a joining player up to speed: the current word (secret or
    /// masked, depending on who they are and the phase) and the phase
    /// countdown.
    fn send_round_state(&self, idx: usize) {
        let player = &self.players[idx];

        if let (Some(word), Some(drawer_name)) =
            (&self.word, self.drawing_player_name())
        {
            let visible = if player.is_drawing || self.phase == Phase::ShowWord
            {
                word.clone()
            } else {
                underscore_mask(word)
            };
            player.send(
                GameState {
                    drawing_player: drawer_name,
                    word: visible,
                }
                .into(),
            );
        }

        player.send(
            PhaseChange {
                phase: Some(self.phase),
                time_ms: self.config.phase_delay(self.phase).as_millis() as u64,
                drawing_player: self.drawing_player_name(),
            }
            .into(),
        );
    }

    /// Replays the round's strokes to a late joiner.
    fn send_draw_log(&self, idx: usize) {
        if self.phase.drawing_visible() {
            self.players[idx].send(
                RoundDrawInfo {
                    data: self.draw_log.clone(),
                }
                .into(),
            );
        }
    }

    // -----------------------------------------------------------------
    // Lookups
    // -----------------------------------------------------------------

    fn active_len(&self) -> usize {
        self.players.iter().filter(|p| p.is_active()).count()
    }

    /// The drawing player's roster entry, whatever its status — a drawer
    /// inside the grace window still "owns" the round.
    fn drawing_player_entry(&self) -> Option<&Player> {
        let id = self.drawing_player.as_deref()?;
        self.players.iter().find(|p| p.client_id == id)
    }

    fn drawing_player_entry_mut(&mut self) -> Option<&mut Player> {
        let id = self.drawing_player.clone()?;
        self.players.iter_mut().find(|p| p.client_id == id)
    }

    fn drawing_player_name(&self) -> Option<String> {
        self.drawing_player_entry().map(|p| p.username.clone())
    }

    fn shuffle_roster(&mut self) {
        self.players.shuffle(&mut rand::rng());
    }

    fn info(&self) -> RoomInfo {
        let mut players: Vec<PlayerData> = self
            .players
            .iter()
            .filter(|p| p.is_active())
            .map(|p| p.data())
            .collect();
        players.sort_by_key(|p| std::cmp::Reverse(p.score));
        for (pos, p) in players.iter_mut().enumerate() {
            p.rank = pos + 1;
        }

        RoomInfo {
            name: self.name.clone(),
            phase: self.phase,
            players,
            max_players: self.max_players,
            drawing_player: self.drawing_player_name(),
        }
    }

    /// Cancels everything the room owns, then removes it from the
    /// directory. A cancelled timer can never mutate a dead room.
    fn kill(&mut self) {
        self.countdown = None;
        self.removal_tasks.clear();
        self.directory.unregister(&self.name, self.uid);
    }
}

// ---------------------------------------------------------------------------
// Scoring & matching
// ---------------------------------------------------------------------------

/// Score for a correct guess: the flat base plus the time bonus scaled by
/// how much of the guessing window is left, truncated toward zero.
/// A guess at the halfway mark with the default config scores 75.
fn guess_score(config: &GameConfig, elapsed: Duration) -> i32 {
    let window = config.game_running_delay.as_millis() as f32;
    let fraction_left = 1.0 - elapsed.as_millis() as f32 / window;
    (config.guess_score_base as f32
        + config.guess_score_time_bonus as f32 * fraction_left) as i32
}

/// The drawer's cut per correct guess: the bonus split evenly (integer
/// division) across the active roster.
fn drawer_bonus(config: &GameConfig, active_players: usize) -> i32 {
    config.drawer_guess_bonus / active_players.max(1) as i32
}

/// Exact matching, case-insensitive and whitespace-trimmed. "Apple" and
/// " apple " both match "apple"; "apples" does not.
fn guess_matches(guess: &str, word: &str) -> bool {
    guess.trim().to_lowercase() == word.trim().to_lowercase()
}

fn announce(message: String, kind: AnnouncementKind) -> GameMessage {
    Announcement {
        message,
        timestamp: unix_millis(),
        kind,
    }
    .into()
}

/// Wall-clock milliseconds for announcement timestamps.
fn unix_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default()
}
