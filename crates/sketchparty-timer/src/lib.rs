//! Cancellable phase countdown for Sketchparty rooms.
//!
//! A [`Countdown`] drives one phase of a room: it emits a [`CountdownEvent::Tick`]
//! once per tick interval (the first tick fires immediately, carrying the
//! full remaining time) and a single [`CountdownEvent::Elapsed`] once the
//! configured duration is exhausted.
//!
//! # Integration
//!
//! The countdown is designed to sit inside a room actor's `tokio::select!`
//! loop, next to the command mailbox:
//!
//! ```ignore
//! loop {
//!     tokio::select! {
//!         Some(cmd) = mailbox.recv() => { /* handle commands */ }
//!         Some(ev) = countdown.next_event() => { /* broadcast tick / advance phase */ }
//!     }
//! }
//! ```
//!
//! # Cancellation
//!
//! Dropping a `Countdown` aborts its timer task and tears down its event
//! channel, so no tick and no elapsed event can be observed afterwards —
//! even one that was already in flight when the countdown was replaced.
//! Overwriting a room's countdown with a fresh one is therefore the whole
//! cancellation story: at most one countdown per room can ever deliver.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time;
use tracing::{trace, warn};

/// Configuration for a single countdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CountdownConfig {
    /// Total time until [`CountdownEvent::Elapsed`] fires.
    pub duration: Duration,
    /// Interval between [`CountdownEvent::Tick`]s. Default: 1 second.
    pub tick_interval: Duration,
}

impl CountdownConfig {
    pub fn new(duration: Duration, tick_interval: Duration) -> Self {
        Self {
            duration,
            tick_interval,
        }
    }

    /// Fix any out-of-range values so the config is safe to run.
    ///
    /// Called automatically by [`Countdown::start`]. A zero tick interval
    /// would spin; it is replaced with the default of 1 second.
    pub fn validated(mut self) -> Self {
        if self.tick_interval.is_zero() {
            warn!("countdown tick interval of zero — using 1s");
            self.tick_interval = Duration::from_secs(1);
        }
        self
    }
}

impl Default for CountdownConfig {
    fn default() -> Self {
        Self {
            duration: Duration::from_secs(60),
            tick_interval: Duration::from_secs(1),
        }
    }
}

/// What a running countdown reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountdownEvent {
    /// Periodic progress report. `remaining` counts down from the full
    /// duration on the first tick.
    Tick { remaining: Duration },
    /// The duration is exhausted. Emitted exactly once, after the last tick.
    Elapsed,
}

/// A running, cancellable countdown.
///
/// Owns the timer task; dropping the countdown cancels it (see the module
/// docs for why that is race-free).
#[derive(Debug)]
pub struct Countdown {
    duration: Duration,
    events: mpsc::UnboundedReceiver<CountdownEvent>,
    task: JoinHandle<()>,
}

impl Countdown {
    /// Spawns the timer task and starts counting immediately.
    pub fn start(config: CountdownConfig) -> Self {
        let CountdownConfig {
            duration,
            tick_interval,
        } = config.validated();

        let (tx, rx) = mpsc::unbounded_channel();
        let task = tokio::spawn(async move {
            let ticks = duration.as_millis() / tick_interval.as_millis().max(1);
            let mut remaining = duration;
            for _ in 0..ticks {
                if tx.send(CountdownEvent::Tick { remaining }).is_err() {
                    // Receiver gone — the countdown was cancelled.
                    return;
                }
                trace!(remaining_ms = remaining.as_millis() as u64, "countdown tick");
                time::sleep(tick_interval).await;
                remaining = remaining.saturating_sub(tick_interval);
            }
            // Sleep out any remainder when the duration is not a whole
            // number of tick intervals, so Elapsed lands on time.
            if !remaining.is_zero() {
                time::sleep(remaining).await;
            }
            let _ = tx.send(CountdownEvent::Elapsed);
        });

        Self {
            duration,
            events: rx,
            task,
        }
    }

    /// The next tick or the final elapsed event.
    ///
    /// Returns `None` once `Elapsed` has been consumed and the timer task
    /// is done.
    pub async fn next_event(&mut self) -> Option<CountdownEvent> {
        self.events.recv().await
    }

    /// The full duration this countdown was started with.
    pub fn duration(&self) -> Duration {
        self.duration
    }
}

impl Drop for Countdown {
    fn drop(&mut self) {
        self.task.abort();
    }
}
