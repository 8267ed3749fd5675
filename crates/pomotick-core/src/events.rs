use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::timer::{Durations, Mode};

/// Every timer operation that changes state produces an Event.
///
/// Events are return values for the caller to log or render. They are not
/// the change notification: only [`Event::IntervalCompleted`] coincides with
/// a call to the registered mode-change handler.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    TimerStarted {
        mode: Mode,
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    TimerPaused {
        mode: Mode,
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    TimerReset {
        mode: Mode,
        total_secs: u64,
        at: DateTime<Utc>,
    },
    /// Manual switch to a (possibly identical) mode.
    ModeSwitched {
        from: Mode,
        to: Mode,
        total_secs: u64,
        at: DateTime<Utc>,
    },
    /// One second counted down.
    Tick {
        mode: Mode,
        remaining_secs: u64,
        total_secs: u64,
        at: DateTime<Utc>,
    },
    /// Countdown reached zero with auto-advance off; the timer stopped.
    TimerHalted {
        mode: Mode,
        at: DateTime<Utc>,
    },
    /// Countdown reached zero with auto-advance on; the timer moved on.
    IntervalCompleted {
        from: Mode,
        to: Mode,
        focus_completions: u64,
        at: DateTime<Utc>,
    },
    StateSnapshot {
        mode: Mode,
        running: bool,
        auto_advance: bool,
        remaining_secs: u64,
        total_secs: u64,
        remaining_fraction: f64,
        display: String,
        focus_completions: u64,
        durations: Durations,
        at: DateTime<Utc>,
    },
}
