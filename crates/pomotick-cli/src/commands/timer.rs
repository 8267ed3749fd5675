use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use clap::{Args, Subcommand};
use pomotick_core::storage::{FileSettingsStore, Settings, SettingsStore};
use pomotick_core::timer::{IntervalTicker, Mode, TickSource, Timer};
use pomotick_core::Event;

const BAR_WIDTH: usize = 24;

#[derive(Subcommand)]
pub enum TimerAction {
    /// Run the timer in the foreground until Ctrl-C
    Run(RunArgs),
    /// Print the state of a timer loaded from settings as JSON
    Status {
        /// Mode to show instead of focus
        #[arg(long)]
        mode: Option<Mode>,
    },
}

#[derive(Args)]
pub struct RunArgs {
    /// Mode to start in (focus, short_break, long_break)
    #[arg(long, default_value = "focus")]
    mode: Mode,
    /// Focus minutes for this run
    #[arg(long)]
    focus: Option<u32>,
    /// Short break minutes for this run
    #[arg(long)]
    short_break: Option<u32>,
    /// Long break minutes for this run
    #[arg(long)]
    long_break: Option<u32>,
    /// Stop at zero instead of starting the next interval
    #[arg(long)]
    no_auto_advance: bool,
    /// Length of one timer second in milliseconds
    #[arg(long, default_value_t = 1000)]
    tick_ms: u64,
    /// Stop after this many completed focus intervals
    #[arg(long)]
    completions: Option<u64>,
    /// Persist the durations and auto-advance flag used for this run
    #[arg(long)]
    save: bool,
    /// Suppress progress output and print the final state as JSON
    #[arg(long)]
    json: bool,
}

pub fn run(action: TimerAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        TimerAction::Run(args) => {
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()?;
            runtime.block_on(run_foreground(args))
        }
        TimerAction::Status { mode } => {
            let store = FileSettingsStore::open_default()?;
            let mut timer = Timer::new();
            store.load()?.apply_to(&mut timer)?;
            if let Some(mode) = mode {
                timer.switch_to(mode);
            }
            println!("{}", serde_json::to_string_pretty(&timer.snapshot())?);
            Ok(())
        }
    }
}

async fn run_foreground(args: RunArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut store = FileSettingsStore::open_default()?;
    let stored = store.load()?;
    let mut settings = stored.clone();
    if let Some(minutes) = args.focus {
        settings.focus_minutes = minutes;
    }
    if let Some(minutes) = args.short_break {
        settings.short_break_minutes = minutes;
    }
    if let Some(minutes) = args.long_break {
        settings.long_break_minutes = minutes;
    }
    if args.no_auto_advance {
        settings.auto_advance = false;
    }

    let (ticker, mut ticks) = IntervalTicker::new();
    let mut timer =
        Timer::with_ticker(ticker).with_tick_period(Duration::from_millis(args.tick_ms.max(1)));
    settings.apply_to(&mut timer)?;
    timer.switch_to(args.mode);

    if args.save {
        store.save(&Settings::capture_from(&timer, stored.dark_mode))?;
        tracing::info!(path = %store.path().display(), "settings saved");
    }

    let changed = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&changed);
    timer.on_mode_change(move || {
        flag.store(true, Ordering::SeqCst);
        Ok(())
    });

    let quiet = args.json;
    if !quiet {
        render_header(&timer);
    }
    timer.start();

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            Some(tick) = ticks.recv() => {
                if !timer.ticker().accepts(tick) {
                    tracing::trace!(generation = tick.generation, "dropping stale tick");
                    continue;
                }
                let event = timer.tick()?;
                if changed.swap(false, Ordering::SeqCst) && !quiet {
                    println!();
                    render_header(&timer);
                }
                match event {
                    Some(Event::Tick { .. }) if !quiet => render_progress(&timer)?,
                    Some(Event::TimerHalted { mode, .. }) => {
                        if !quiet {
                            println!();
                            println!("{} finished", label(mode));
                        }
                        break;
                    }
                    Some(Event::IntervalCompleted { .. }) => {
                        if args
                            .completions
                            .is_some_and(|limit| timer.focus_completions() >= limit)
                        {
                            timer.pause();
                            break;
                        }
                    }
                    _ => {}
                }
            }
            _ = &mut ctrl_c => {
                timer.pause();
                if !quiet {
                    println!();
                }
                break;
            }
        }
    }

    if quiet {
        println!("{}", serde_json::to_string_pretty(&timer.snapshot())?);
    } else {
        println!(
            "stopped in {} at {} ({} focus intervals completed)",
            label(timer.mode()),
            timer.formatted_remaining(),
            timer.focus_completions()
        );
    }
    Ok(())
}

fn label(mode: Mode) -> &'static str {
    match mode {
        Mode::Focus => "Focus",
        Mode::ShortBreak => "Short Break",
        Mode::LongBreak => "Long Break",
    }
}

fn render_header<T: TickSource>(timer: &Timer<T>) {
    println!(
        "== {} ({} min) == completed: {}",
        label(timer.mode()),
        timer.total_secs() / 60,
        timer.focus_completions()
    );
}

fn render_progress<T: TickSource>(timer: &Timer<T>) -> std::io::Result<()> {
    let filled = (timer.remaining_fraction() * BAR_WIDTH as f64).round() as usize;
    let bar: String = "#".repeat(filled) + &"-".repeat(BAR_WIDTH.saturating_sub(filled));
    let mut stdout = std::io::stdout().lock();
    write!(stdout, "\r{} [{bar}]", timer.formatted_remaining())?;
    stdout.flush()
}
