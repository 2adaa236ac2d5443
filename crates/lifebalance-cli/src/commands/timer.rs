use clap::Subcommand;
use lifebalance_core::{
    Config, Event, FocusTimer, KeyValueStore, ManualTicker, SettingsEdit, SqliteStore, TickHandle,
    TickSource,
};
use std::io::Write;
use std::time::Duration;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::time::{interval_at, Instant, Interval, MissedTickBehavior};

const TICK_PERIOD: Duration = Duration::from_secs(1);

#[derive(Subcommand)]
pub enum TimerAction {
    /// Print current timer state as JSON
    Status,
    /// Replace all settings; values below 1 become 1
    Settings {
        #[arg(allow_hyphen_values = true)]
        work_min: String,
        #[arg(allow_hyphen_values = true)]
        break_min: String,
        #[arg(allow_hyphen_values = true)]
        cycles: String,
    },
    /// Change one setting (work, break, cycles)
    Set {
        field: String,
        #[arg(allow_hyphen_values = true)]
        value: String,
    },
    /// Stop and rewind to a fresh work interval
    Reset,
    /// Run the timer in the foreground until every cycle is done.
    /// Type `p` + Enter to pause or resume, `q` + Enter to quit
    Run,
}

/// One-second tokio interval, at most one alive at a time.
#[derive(Default)]
struct IntervalTicker {
    next_id: u64,
    live: Option<(TickHandle, Interval)>,
}

impl IntervalTicker {
    /// Wait for the next tick. Never completes while nothing is registered.
    async fn wait(&mut self) {
        match self.live.as_mut() {
            Some((_, interval)) => {
                interval.tick().await;
            }
            None => std::future::pending().await,
        }
    }
}

/// Keyboard controls read line by line while `timer run` is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Control {
    TogglePause,
    Quit,
}

fn parse_control(line: &str) -> Option<Control> {
    match line.trim() {
        "p" | "pause" | "resume" => Some(Control::TogglePause),
        "q" | "quit" => Some(Control::Quit),
        _ => None,
    }
}

impl TickSource for IntervalTicker {
    fn register(&mut self) -> TickHandle {
        self.next_id += 1;
        let handle = TickHandle::new(self.next_id);
        let mut interval = interval_at(Instant::now() + TICK_PERIOD, TICK_PERIOD);
        interval.set_missed_tick_behavior(MissedTickBehavior::Burst);
        self.live = Some((handle, interval));
        handle
    }

    fn deregister(&mut self, handle: TickHandle) {
        if self.live.as_ref().is_some_and(|(h, _)| *h == handle) {
            self.live = None;
        }
    }
}

/// Settings fields arrive as text; anything unparsable counts as 0 and is
/// clamped up to 1 by the engine.
fn numeric(raw: &str) -> i64 {
    raw.trim().parse().unwrap_or(0)
}

fn parse_edit(field: &str, value: &str) -> Result<SettingsEdit, String> {
    let value = numeric(value);
    match field {
        "work" | "work_min" | "workMin" => Ok(SettingsEdit::WorkMinutes(value)),
        "break" | "break_min" | "breakMin" => Ok(SettingsEdit::BreakMinutes(value)),
        "cycles" => Ok(SettingsEdit::Cycles(value)),
        other => Err(format!("unknown timer setting: {other}")),
    }
}

fn print_event(event: &Event) -> Result<(), serde_json::Error> {
    println!("{}", serde_json::to_string(event)?);
    Ok(())
}

/// Tick until every cycle completes or `q` arrives on `controls`. Closing
/// `controls` while paused also ends the run.
async fn drive<S, R>(
    timer: &mut FocusTimer<S, IntervalTicker>,
    controls: R,
) -> Result<(), Box<dyn std::error::Error>>
where
    S: KeyValueStore,
    R: AsyncBufRead + Unpin,
{
    let mut lines = controls.lines();
    let mut controls_open = true;

    if let Some(event) = timer.start() {
        print_event(&event)?;
    }
    loop {
        tokio::select! {
            _ = timer.ticker_mut().wait() => {
                if let Some(event) = timer.tick() {
                    if event.is_interval_end() {
                        eprint!("\x07");
                    }
                    print_event(&event)?;
                    if matches!(event, Event::CyclesCompleted { .. }) {
                        break;
                    }
                }
                eprint!("\r{:?} {} ({}%)   ", timer.mode(), timer.display(), timer.done_percent());
                std::io::stderr().flush()?;
            }
            line = lines.next_line(), if controls_open => {
                let Some(line) = line? else {
                    controls_open = false;
                    if !timer.is_running() {
                        break;
                    }
                    continue;
                };
                match parse_control(&line) {
                    Some(Control::TogglePause) => {
                        let event = if timer.is_running() { timer.pause() } else { timer.start() };
                        if let Some(event) = event {
                            eprintln!();
                            print_event(&event)?;
                        }
                    }
                    Some(Control::Quit) => break,
                    None => tracing::debug!(line = %line, "ignored timer control"),
                }
            }
        }
    }
    eprintln!();
    Ok(())
}

pub fn run(action: TimerAction) -> Result<(), Box<dyn std::error::Error>> {
    let defaults = Config::load_or_default().timer_defaults();
    let store = SqliteStore::open()?;

    match action {
        TimerAction::Status => {
            let timer = FocusTimer::load(store, ManualTicker::new(), defaults)?;
            println!("{}", serde_json::to_string_pretty(&timer.snapshot())?);
        }
        TimerAction::Settings {
            work_min,
            break_min,
            cycles,
        } => {
            let mut timer = FocusTimer::load(store, ManualTicker::new(), defaults)?;
            let event =
                timer.apply_settings(numeric(&work_min), numeric(&break_min), numeric(&cycles))?;
            println!("{}", serde_json::to_string_pretty(&event)?);
        }
        TimerAction::Set { field, value } => {
            let mut timer = FocusTimer::load(store, ManualTicker::new(), defaults)?;
            let event = timer.change_settings(parse_edit(&field, &value)?)?;
            println!("{}", serde_json::to_string_pretty(&event)?);
        }
        TimerAction::Reset => {
            let mut timer = FocusTimer::load(store, ManualTicker::new(), defaults)?;
            println!("{}", serde_json::to_string_pretty(&timer.reset()?)?);
        }
        TimerAction::Run => {
            let mut timer = FocusTimer::load(store, IntervalTicker::default(), defaults)?;
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_time()
                .build()?;
            runtime.block_on(drive(&mut timer, BufReader::new(tokio::io::stdin())))?;
        }
    }
    Ok(())
}
