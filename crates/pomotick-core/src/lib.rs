//! # pomotick Core Library
//!
//! The core of the pomotick Pomodoro timer: a tick-driven state machine
//! alternating focus intervals with short and long breaks, and the settings
//! store the integrating layer hydrates it from.
//!
//! ## Architecture
//!
//! - **Timer**: owns all timing state. It counts whole ticks delivered by an
//!   injected [`TickSource`] and knows nothing about rendering; a single
//!   mode-change handler is its only outbound notification
//! - **Storage**: a [`Settings`] record behind the [`SettingsStore`] trait,
//!   with TOML-file and in-memory backends. The timer never calls the store
//! - **Events**: every operation reports what it did as an [`Event`]
//!
//! ## Key Components
//!
//! - [`Timer`]: Core timer state machine
//! - [`IntervalTicker`]: tokio-backed tick source for real hosts
//! - [`FileSettingsStore`]: Settings persistence

pub mod error;
pub mod events;
pub mod storage;
pub mod timer;

pub use error::{ConfigError, CoreError, HandlerError, ValidationError};
pub use events::Event;
pub use storage::{FileSettingsStore, MemorySettingsStore, Settings, SettingsStore};
pub use timer::{Durations, IntervalTicker, ManualTicker, Mode, Tick, TickSource, Timer};
