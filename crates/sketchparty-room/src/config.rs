//! Timing and scoring configuration for a room.

use std::time::Duration;

use sketchparty_protocol::Phase;

/// Per-room game settings.
///
/// The defaults are the tuned production values; tests shrink the delays to
/// keep virtual-clock runs tight.
#[derive(Debug, Clone)]
pub struct GameConfig {
    /// Interval between countdown broadcasts.
    pub countdown_tick: Duration,

    /// WAITING_FOR_START → NEW_ROUND.
    pub waiting_for_start_delay: Duration,
    /// NEW_ROUND → GAME_RUNNING (the drawer's word-picking window).
    pub new_round_delay: Duration,
    /// GAME_RUNNING → SHOW_WORD (the guessing window).
    pub game_running_delay: Duration,
    /// SHOW_WORD → NEW_ROUND.
    pub show_word_delay: Duration,

    /// How long a disconnected player's seat, score and rank are held for
    /// a rejoin before being discarded.
    pub rejoin_grace: Duration,

    /// How many candidate words the drawer gets to pick from.
    pub word_candidates: usize,

    /// Flat score for any correct guess.
    pub guess_score_base: i32,
    /// Extra score scaled by how much of the guessing window was left.
    pub guess_score_time_bonus: i32,
    /// Bonus split across the roster and credited to the drawer per
    /// correct guess.
    pub drawer_guess_bonus: i32,
    /// Deducted from the drawer when a round ends with no correct guess.
    pub nobody_guessed_penalty: i32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            countdown_tick: Duration::from_secs(1),
            waiting_for_start_delay: Duration::from_secs(10),
            new_round_delay: Duration::from_secs(20),
            game_running_delay: Duration::from_secs(60),
            show_word_delay: Duration::from_secs(10),
            rejoin_grace: Duration::from_secs(60),
            word_candidates: 3,
            guess_score_base: 50,
            guess_score_time_bonus: 50,
            drawer_guess_bonus: 50,
            nobody_guessed_penalty: 50,
        }
    }
}

impl GameConfig {
    /// The countdown length armed on entry to `phase`.
    ///
    /// WAITING_FOR_PLAYERS has no timer — it only advances when players
    /// arrive — so its delay is zero.
    pub fn phase_delay(&self, phase: Phase) -> Duration {
        match phase {
            Phase::WaitingForPlayers => Duration::ZERO,
            Phase::WaitingForStart => self.waiting_for_start_delay,
            Phase::NewRound => self.new_round_delay,
            Phase::GameRunning => self.game_running_delay,
            Phase::ShowWord => self.show_word_delay,
        }
    }
}
