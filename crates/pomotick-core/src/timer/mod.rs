mod engine;
mod mode;
mod ticker;

pub use engine::{format_clock, ModeChangeHandler, Timer};
pub use mode::{
    Durations, Mode, DEFAULT_FOCUS_MINUTES, DEFAULT_LONG_BREAK_MINUTES,
    DEFAULT_SHORT_BREAK_MINUTES, LONG_BREAK_EVERY,
};
pub use ticker::{IntervalTicker, ManualTicker, Tick, TickSource, TICK_PERIOD};
