//! Tick sources.
//!
//! A [`TickSource`] is the scheduling primitive injected into a
//! [`Timer`](super::Timer). The timer arms it on `start()` and cancels it
//! whenever it stops counting; whoever owns the source is responsible for
//! calling `Timer::tick()` once per delivered tick.
//!
//! - [`ManualTicker`] schedules nothing. Tests drive `tick()` by hand and use
//!   its counters to check that only one source is ever live.
//! - [`IntervalTicker`] runs a tokio interval task that pushes [`Tick`]s into
//!   a channel.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

/// One simulated second.
pub const TICK_PERIOD: Duration = Duration::from_secs(1);

pub trait TickSource {
    /// Begin delivering ticks every `period`. Arming an armed source is a no-op.
    fn arm(&mut self, period: Duration);

    /// Stop delivering ticks. Cancelling an idle source is a no-op.
    fn cancel(&mut self);

    fn is_armed(&self) -> bool;
}

/// A tick source that never fires on its own.
#[derive(Debug, Clone, Default)]
pub struct ManualTicker {
    armed: bool,
    period: Option<Duration>,
    arm_count: u32,
    cancel_count: u32,
}

impl ManualTicker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of times the source went from idle to armed.
    pub fn arm_count(&self) -> u32 {
        self.arm_count
    }

    /// Number of times the source went from armed to idle.
    pub fn cancel_count(&self) -> u32 {
        self.cancel_count
    }

    /// Live sources right now: 0 or 1.
    pub fn live_sources(&self) -> u32 {
        self.arm_count - self.cancel_count
    }

    pub fn period(&self) -> Option<Duration> {
        self.period
    }
}

impl TickSource for ManualTicker {
    fn arm(&mut self, period: Duration) {
        if self.armed {
            return;
        }
        self.armed = true;
        self.period = Some(period);
        self.arm_count += 1;
    }

    fn cancel(&mut self) {
        if !self.armed {
            return;
        }
        self.armed = false;
        self.cancel_count += 1;
    }

    fn is_armed(&self) -> bool {
        self.armed
    }
}

/// A tick delivered by an [`IntervalTicker`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tick {
    pub generation: u64,
}

/// Tokio-backed periodic tick source.
///
/// Each `arm` spawns one interval task tagged with the current generation.
/// `cancel` aborts the task and bumps the generation, so ticks that were
/// already queued in the channel fail [`IntervalTicker::accepts`].
///
/// `arm` must be called from within a tokio runtime.
#[derive(Debug)]
pub struct IntervalTicker {
    tx: mpsc::UnboundedSender<Tick>,
    generation: u64,
    task: Option<JoinHandle<()>>,
}

impl IntervalTicker {
    /// Create an idle ticker and the receiving end of its tick channel.
    pub fn new() -> (Self, mpsc::UnboundedReceiver<Tick>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let ticker = Self {
            tx,
            generation: 0,
            task: None,
        };
        (ticker, rx)
    }

    /// Whether `tick` came from the currently armed task.
    pub fn accepts(&self, tick: Tick) -> bool {
        self.task.is_some() && tick.generation == self.generation
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

impl TickSource for IntervalTicker {
    fn arm(&mut self, period: Duration) {
        if self.task.is_some() {
            return;
        }
        let generation = self.generation;
        let tx = self.tx.clone();
        self.task = Some(tokio::spawn(async move {
            // First tick one full period after arming, not immediately.
            let mut interval = tokio::time::interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                if tx.send(Tick { generation }).is_err() {
                    break;
                }
            }
        }));
        tracing::trace!(generation, ?period, "tick source armed");
    }

    fn cancel(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            tracing::trace!(generation = self.generation, "tick source cancelled");
            self.generation = self.generation.wrapping_add(1);
        }
    }

    fn is_armed(&self) -> bool {
        self.task.is_some()
    }
}

impl Drop for IntervalTicker {
    fn drop(&mut self) {
        self.cancel();
    }
}
