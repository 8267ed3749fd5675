//! Integration tests for the timer state machine.
//!
//! Drives full focus/break cycles through the public API with a manual tick
//! source, and exercises the settings hydrate/persist flow around it.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use pomotick_core::{
    Durations, Event, ManualTicker, MemorySettingsStore, Mode, Settings, SettingsStore, Timer,
};

fn short_timer() -> Timer {
    Timer::with_durations(Durations::new(1, 1, 2).unwrap(), ManualTicker::new())
}

/// Tick until the timer leaves `mode` or stops, returning the completion
/// event if one happened.
fn run_out(timer: &mut Timer) -> Option<Event> {
    let mode = timer.mode();
    // Remaining seconds to count down plus the tick that sees zero.
    for _ in 0..=timer.remaining_secs() {
        let event = timer.tick().unwrap();
        if timer.mode() != mode || !timer.is_running() {
            return event;
        }
    }
    None
}

#[test]
fn test_completion_cadence_over_four_focus_intervals() {
    let mut timer = short_timer();
    let mut entered_after_focus = Vec::new();
    timer.start();

    while timer.focus_completions() < 4 {
        let was_focus = timer.mode() == Mode::Focus;
        let event = run_out(&mut timer).expect("interval should complete");
        assert!(matches!(event, Event::IntervalCompleted { .. }));
        if was_focus {
            entered_after_focus.push(timer.mode());
        } else {
            assert_eq!(timer.mode(), Mode::Focus);
        }
        assert!(timer.is_running(), "auto-advance restarts the next interval");
    }

    assert_eq!(
        entered_after_focus,
        vec![
            Mode::ShortBreak,
            Mode::ShortBreak,
            Mode::ShortBreak,
            Mode::LongBreak
        ]
    );
    assert_eq!(timer.focus_completions(), 4);
    assert_eq!(timer.total_secs(), 120);
    // One live source throughout the whole chain.
    assert_eq!(timer.ticker().live_sources(), 1);
}

#[test]
fn test_fifth_focus_goes_back_to_short_break() {
    let mut timer = short_timer();
    timer.start();
    while timer.focus_completions() < 5 {
        run_out(&mut timer);
    }
    assert_eq!(timer.mode(), Mode::ShortBreak);
}

#[test]
fn test_completions_survive_switch_and_pause() {
    let mut timer = short_timer();
    timer.start();
    run_out(&mut timer);
    assert_eq!(timer.focus_completions(), 1);

    timer.pause();
    timer.switch_to(Mode::Focus);
    timer.reset();
    assert_eq!(timer.focus_completions(), 1);
}

#[test]
fn test_manual_switch_mid_focus_does_not_count() {
    let mut timer = short_timer();
    timer.start();
    for _ in 0..30 {
        timer.tick().unwrap();
    }
    timer.switch_to(Mode::ShortBreak);
    assert_eq!(timer.focus_completions(), 0);
}

#[test]
fn test_disabling_auto_advance_mid_chain_halts_next_interval() {
    let mut timer = short_timer();
    timer.start();
    run_out(&mut timer);
    assert_eq!(timer.mode(), Mode::ShortBreak);

    timer.set_auto_advance(false);
    let event = run_out(&mut timer);
    assert!(matches!(event, Some(Event::TimerHalted { mode: Mode::ShortBreak, .. })));
    assert_eq!(timer.mode(), Mode::ShortBreak);
    assert_eq!(timer.remaining_secs(), 0);
    assert!(!timer.is_running());

    timer.reset();
    assert_eq!(timer.remaining_secs(), 60);
}

#[test]
fn test_handler_rerenders_by_querying_state() {
    let mut timer = short_timer();
    let seen = Arc::new(Mutex::new(Vec::new()));
    let dirty = Arc::new(AtomicUsize::new(0));

    let flag = Arc::clone(&dirty);
    timer.on_mode_change(move || {
        flag.fetch_add(1, Ordering::SeqCst);
        Ok(())
    });

    timer.start();
    for _ in 0..3 {
        run_out(&mut timer);
        // The handler carries no payload; the host re-queries on its signal.
        if dirty.swap(0, Ordering::SeqCst) > 0 {
            seen.lock().unwrap().push(timer.mode());
        }
    }

    assert_eq!(
        *seen.lock().unwrap(),
        vec![Mode::ShortBreak, Mode::Focus, Mode::ShortBreak]
    );
}

#[test]
fn test_settings_hydrate_edit_persist_flow() {
    let mut store = MemorySettingsStore::with_settings(Settings {
        focus_minutes: 25,
        short_break_minutes: 5,
        long_break_minutes: 15,
        auto_advance: true,
        dark_mode: true,
    });

    let mut timer = Timer::new();
    store.load().unwrap().apply_to(&mut timer).unwrap();
    timer.start();
    for _ in 0..10 {
        timer.tick().unwrap();
    }
    assert_eq!(timer.remaining_secs(), 1490);

    // Edit while running: the countdown keeps its elapsed ten seconds.
    timer.set_focus_minutes(30).unwrap();
    timer.recompute_active_duration();
    assert_eq!(timer.total_secs(), 1800);
    assert_eq!(timer.remaining_secs(), 1790);

    let dark_mode = store.load().unwrap().dark_mode;
    store.save(&Settings::capture_from(&timer, dark_mode)).unwrap();
    let stored = store.load().unwrap();
    assert_eq!(stored.focus_minutes, 30);
    assert!(stored.dark_mode);
}
