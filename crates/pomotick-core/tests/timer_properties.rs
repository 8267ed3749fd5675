//! Property tests: timer invariants under arbitrary operation sequences.

use pomotick_core::{Durations, ManualTicker, Mode, TickSource, Timer};
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Op {
    Start,
    Pause,
    Reset,
    Tick(u16),
    SwitchTo(Mode),
    SetMinutes(Mode, u32),
    Recompute,
    SetAutoAdvance(bool),
}

fn mode_strategy() -> impl Strategy<Value = Mode> {
    prop_oneof![
        Just(Mode::Focus),
        Just(Mode::ShortBreak),
        Just(Mode::LongBreak)
    ]
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        Just(Op::Start),
        Just(Op::Pause),
        Just(Op::Reset),
        (0u16..200).prop_map(Op::Tick),
        mode_strategy().prop_map(Op::SwitchTo),
        (mode_strategy(), 0u32..4).prop_map(|(m, n)| Op::SetMinutes(m, n)),
        Just(Op::Recompute),
        any::<bool>().prop_map(Op::SetAutoAdvance),
    ]
}

fn apply(timer: &mut Timer, op: &Op) {
    match op {
        Op::Start => {
            timer.start();
        }
        Op::Pause => {
            timer.pause();
        }
        Op::Reset => {
            timer.reset();
        }
        Op::Tick(n) => {
            for _ in 0..*n {
                timer.tick().unwrap();
            }
        }
        Op::SwitchTo(mode) => {
            timer.switch_to(*mode);
        }
        Op::SetMinutes(mode, minutes) => {
            let before = timer.durations();
            let result = match mode {
                Mode::Focus => timer.set_focus_minutes(*minutes),
                Mode::ShortBreak => timer.set_short_break_minutes(*minutes),
                Mode::LongBreak => timer.set_long_break_minutes(*minutes),
            };
            if *minutes == 0 {
                assert!(result.is_err());
                assert_eq!(timer.durations(), before);
            } else {
                assert!(result.is_ok());
            }
        }
        Op::Recompute => timer.recompute_active_duration(),
        Op::SetAutoAdvance(on) => timer.set_auto_advance(*on),
    }
}

proptest! {
    #[test]
    fn remaining_never_exceeds_total(ops in prop::collection::vec(op_strategy(), 0..60)) {
        let mut timer = Timer::with_durations(Durations::new(1, 1, 2).unwrap(), ManualTicker::new());
        for op in &ops {
            let completions_before = timer.focus_completions();
            let mode_before = timer.mode();
            apply(&mut timer, op);

            prop_assert!(timer.remaining_secs() <= timer.total_secs());
            prop_assert_eq!(timer.is_running(), timer.ticker().is_armed());
            prop_assert!(timer.ticker().live_sources() <= 1);

            let gained = timer.focus_completions() - completions_before;
            let max_gain = u64::from(match op { Op::Tick(n) => *n, _ => 0 });
            prop_assert!(gained <= max_gain);
            if gained > 0 {
                prop_assert!(matches!(op, Op::Tick(_)));
            }
            if !matches!(op, Op::Tick(_)) && !matches!(op, Op::SwitchTo(_)) {
                prop_assert_eq!(timer.mode(), mode_before);
            }
        }
    }

    #[test]
    fn switch_to_always_loads_full_interval(
        ops in prop::collection::vec(op_strategy(), 0..30),
        target in mode_strategy(),
    ) {
        let mut timer = Timer::with_durations(Durations::new(1, 1, 2).unwrap(), ManualTicker::new());
        for op in &ops {
            apply(&mut timer, op);
        }
        timer.switch_to(target);
        let expected = timer.durations().seconds_for(target);
        prop_assert_eq!(timer.mode(), target);
        prop_assert_eq!(timer.total_secs(), expected);
        prop_assert_eq!(timer.remaining_secs(), expected);
        prop_assert!(!timer.is_running());
    }

    #[test]
    fn reset_restores_configured_duration(ops in prop::collection::vec(op_strategy(), 0..30)) {
        let mut timer = Timer::with_durations(Durations::new(1, 1, 2).unwrap(), ManualTicker::new());
        for op in &ops {
            apply(&mut timer, op);
        }
        timer.reset();
        let expected = timer.durations().seconds_for(timer.mode());
        prop_assert_eq!(timer.total_secs(), expected);
        prop_assert_eq!(timer.remaining_secs(), expected);
        prop_assert!(!timer.is_running());
    }

    #[test]
    fn running_countdown_rate_is_one_per_tick(starts in 1usize..5, ticks in 0u64..1500) {
        let mut timer = Timer::new();
        for _ in 0..starts {
            timer.start();
        }
        for _ in 0..ticks {
            timer.tick().unwrap();
        }
        prop_assert_eq!(timer.remaining_secs(), 1500 - ticks);
        prop_assert_eq!(timer.ticker().arm_count(), 1);
    }
}
