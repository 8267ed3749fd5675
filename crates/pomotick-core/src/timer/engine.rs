//! Timer state machine.
//!
//! The timer counts whole ticks. It owns an injected [`TickSource`] but never
//! waits on it: the owner of the source calls `tick()` once per delivered
//! tick.
//!
//! ## State Transitions
//!
//! ```text
//! (mode, idle)    -- start -->          (mode, running)
//! (mode, running) -- tick, rem > 0 -->  (mode, running), rem -= 1
//! (mode, running) -- tick, rem == 0 --> (next, idle) -> start   [auto-advance]
//!                                       (mode, idle)            [otherwise]
//! (any)           -- switch_to(m) -->   (m, idle), rem = total
//! ```
//!
//! ## Usage
//!
//! ```
//! use pomotick_core::{Mode, Timer};
//!
//! let mut timer = Timer::new();
//! timer.start();
//! for _ in 0..10 {
//!     timer.tick().unwrap();
//! }
//! assert_eq!(timer.remaining_secs(), 25 * 60 - 10);
//! assert_eq!(timer.mode(), Mode::Focus);
//! ```

use std::fmt;
use std::time::Duration;

use chrono::Utc;
use tracing::{debug, info};

use super::mode::{Durations, Mode, LONG_BREAK_EVERY};
use super::ticker::{ManualTicker, TickSource, TICK_PERIOD};
use crate::error::{CoreError, HandlerError, Result, ValidationError};
use crate::events::Event;

/// Callback invoked after every completion transition.
pub type ModeChangeHandler = Box<dyn FnMut() -> Result<(), HandlerError> + Send>;

/// Pomodoro countdown timer.
pub struct Timer<T: TickSource = ManualTicker> {
    mode: Mode,
    durations: Durations,
    total_secs: u64,
    remaining_secs: u64,
    running: bool,
    auto_advance: bool,
    focus_completions: u64,
    tick_period: Duration,
    ticker: T,
    on_mode_change: Option<ModeChangeHandler>,
}

impl Timer<ManualTicker> {
    /// Timer with default durations and a [`ManualTicker`].
    pub fn new() -> Self {
        Self::with_ticker(ManualTicker::new())
    }
}

impl Default for Timer<ManualTicker> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: TickSource> Timer<T> {
    pub fn with_ticker(ticker: T) -> Self {
        Self::with_durations(Durations::default(), ticker)
    }

    /// Create an idle timer in Focus mode with the full focus duration left.
    pub fn with_durations(durations: Durations, ticker: T) -> Self {
        let total_secs = durations.seconds_for(Mode::Focus);
        Self {
            mode: Mode::Focus,
            durations,
            total_secs,
            remaining_secs: total_secs,
            running: false,
            auto_advance: true,
            focus_completions: 0,
            tick_period: TICK_PERIOD,
            ticker,
            on_mode_change: None,
        }
    }

    /// Period requested from the tick source on `start()`.
    pub fn with_tick_period(mut self, period: Duration) -> Self {
        self.tick_period = period;
        self
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn durations(&self) -> Durations {
        self.durations
    }

    pub fn focus_minutes(&self) -> u32 {
        self.durations.focus_minutes()
    }

    pub fn short_break_minutes(&self) -> u32 {
        self.durations.short_break_minutes()
    }

    pub fn long_break_minutes(&self) -> u32 {
        self.durations.long_break_minutes()
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn auto_advance(&self) -> bool {
        self.auto_advance
    }

    pub fn focus_completions(&self) -> u64 {
        self.focus_completions
    }

    pub fn remaining_secs(&self) -> u64 {
        self.remaining_secs
    }

    pub fn total_secs(&self) -> u64 {
        self.total_secs
    }

    pub fn tick_period(&self) -> Duration {
        self.tick_period
    }

    pub fn ticker(&self) -> &T {
        &self.ticker
    }

    /// Remaining time as `MM:SS`.
    pub fn formatted_remaining(&self) -> String {
        format_clock(self.remaining_secs)
    }

    /// Share of the interval still to go, 1.0 at the start and 0.0 at the end.
    pub fn remaining_fraction(&self) -> f64 {
        if self.total_secs == 0 {
            return 0.0;
        }
        self.remaining_secs as f64 / self.total_secs as f64
    }

    /// Build a full state snapshot event.
    pub fn snapshot(&self) -> Event {
        Event::StateSnapshot {
            mode: self.mode,
            running: self.running,
            auto_advance: self.auto_advance,
            remaining_secs: self.remaining_secs,
            total_secs: self.total_secs,
            remaining_fraction: self.remaining_fraction(),
            display: self.formatted_remaining(),
            focus_completions: self.focus_completions,
            durations: self.durations,
            at: Utc::now(),
        }
    }

    // ── Configuration ────────────────────────────────────────────────
    //
    // Setters only store values. The active countdown picks them up on the
    // next switch_to/reset, or on recompute_active_duration().

    pub fn set_focus_minutes(&mut self, minutes: u32) -> Result<(), ValidationError> {
        self.durations.set(Mode::Focus, minutes)
    }

    pub fn set_short_break_minutes(&mut self, minutes: u32) -> Result<(), ValidationError> {
        self.durations.set(Mode::ShortBreak, minutes)
    }

    pub fn set_long_break_minutes(&mut self, minutes: u32) -> Result<(), ValidationError> {
        self.durations.set(Mode::LongBreak, minutes)
    }

    /// Replace all three durations at once. A `Durations` value is always
    /// valid, so this cannot fail.
    pub fn set_durations(&mut self, durations: Durations) {
        self.durations = durations;
    }

    pub fn set_auto_advance(&mut self, enabled: bool) {
        self.auto_advance = enabled;
    }

    /// Re-derive `total_secs` for the current mode from its configured
    /// duration.
    ///
    /// A running timer keeps the seconds already elapsed (clamped at zero
    /// remaining); an idle timer snaps to the full new duration.
    pub fn recompute_active_duration(&mut self) {
        let elapsed = self.total_secs.saturating_sub(self.remaining_secs);
        self.total_secs = self.durations.seconds_for(self.mode);
        self.remaining_secs = if self.running {
            self.total_secs.saturating_sub(elapsed)
        } else {
            self.total_secs
        };
        debug!(
            mode = %self.mode,
            total_secs = self.total_secs,
            remaining_secs = self.remaining_secs,
            "active duration recomputed"
        );
    }

    /// Register the mode-change handler, replacing any previous one.
    ///
    /// The handler runs synchronously inside `tick()`, once per completion
    /// transition, after the new mode is set and before it is started. It
    /// is not called for manual `switch_to`, `reset`, `pause` or `start`.
    pub fn on_mode_change<F>(&mut self, handler: F)
    where
        F: FnMut() -> Result<(), HandlerError> + Send + 'static,
    {
        self.on_mode_change = Some(Box::new(handler));
    }

    pub fn clear_mode_change_handler(&mut self) {
        self.on_mode_change = None;
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Begin counting down. Returns `None` if already running.
    pub fn start(&mut self) -> Option<Event> {
        if self.running {
            return None;
        }
        self.ticker.arm(self.tick_period);
        self.running = true;
        debug!(mode = %self.mode, remaining_secs = self.remaining_secs, "timer started");
        Some(Event::TimerStarted {
            mode: self.mode,
            remaining_secs: self.remaining_secs,
            at: Utc::now(),
        })
    }

    /// Stop counting down, keeping the remaining time. Returns `None` if the
    /// timer was already idle.
    pub fn pause(&mut self) -> Option<Event> {
        if !self.running {
            return None;
        }
        self.stop_ticking();
        debug!(mode = %self.mode, remaining_secs = self.remaining_secs, "timer paused");
        Some(Event::TimerPaused {
            mode: self.mode,
            remaining_secs: self.remaining_secs,
            at: Utc::now(),
        })
    }

    /// Stop and restore the full configured duration of the current mode.
    pub fn reset(&mut self) -> Event {
        self.stop_ticking();
        self.load_interval(self.mode);
        debug!(mode = %self.mode, total_secs = self.total_secs, "timer reset");
        Event::TimerReset {
            mode: self.mode,
            total_secs: self.total_secs,
            at: Utc::now(),
        }
    }

    /// Stop and enter `mode` with its full configured duration.
    pub fn switch_to(&mut self, mode: Mode) -> Event {
        let from = self.mode;
        self.stop_ticking();
        self.load_interval(mode);
        debug!(%from, to = %mode, total_secs = self.total_secs, "mode switched");
        Event::ModeSwitched {
            from,
            to: mode,
            total_secs: self.total_secs,
            at: Utc::now(),
        }
    }

    /// Advance by one tick.
    ///
    /// Returns `Ok(None)` when the timer is idle (a tick that arrived after
    /// the source was cancelled). A handler failure during a completion
    /// transition is returned as [`CoreError::Notification`]; the new mode
    /// is already in place but left idle.
    pub fn tick(&mut self) -> Result<Option<Event>> {
        if !self.running {
            return Ok(None);
        }

        if self.remaining_secs == 0 {
            self.stop_ticking();
            if self.auto_advance {
                return self.complete_interval().map(Some);
            }
            debug!(mode = %self.mode, "interval finished, auto-advance off");
            return Ok(Some(Event::TimerHalted {
                mode: self.mode,
                at: Utc::now(),
            }));
        }

        self.remaining_secs -= 1;
        Ok(Some(Event::Tick {
            mode: self.mode,
            remaining_secs: self.remaining_secs,
            total_secs: self.total_secs,
            at: Utc::now(),
        }))
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn complete_interval(&mut self) -> Result<Event> {
        let from = self.mode;
        let to = match from {
            Mode::Focus => {
                self.focus_completions += 1;
                if self.focus_completions % LONG_BREAK_EVERY == 0 {
                    Mode::LongBreak
                } else {
                    Mode::ShortBreak
                }
            }
            Mode::ShortBreak | Mode::LongBreak => Mode::Focus,
        };
        self.switch_to(to);
        info!(
            %from,
            %to,
            focus_completions = self.focus_completions,
            "interval completed"
        );

        if let Some(handler) = self.on_mode_change.as_mut() {
            handler().map_err(CoreError::Notification)?;
        }

        self.start();
        Ok(Event::IntervalCompleted {
            from,
            to,
            focus_completions: self.focus_completions,
            at: Utc::now(),
        })
    }

    fn stop_ticking(&mut self) {
        self.ticker.cancel();
        self.running = false;
    }

    fn load_interval(&mut self, mode: Mode) {
        self.mode = mode;
        self.total_secs = self.durations.seconds_for(mode);
        self.remaining_secs = self.total_secs;
    }
}

impl<T: TickSource + fmt::Debug> fmt::Debug for Timer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Timer")
            .field("mode", &self.mode)
            .field("durations", &self.durations)
            .field("total_secs", &self.total_secs)
            .field("remaining_secs", &self.remaining_secs)
            .field("running", &self.running)
            .field("auto_advance", &self.auto_advance)
            .field("focus_completions", &self.focus_completions)
            .field("ticker", &self.ticker)
            .field("on_mode_change", &self.on_mode_change.is_some())
            .finish()
    }
}

/// Format seconds as `MM:SS`. Minutes are not wrapped into hours.
pub fn format_clock(secs: u64) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}
