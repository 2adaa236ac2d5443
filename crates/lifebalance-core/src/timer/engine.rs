//! Focus timer engine.
//!
//! A work/break cycle state machine advanced one second per `tick()`. The
//! engine does not own a clock: a [`TickSource`] delivers the ticks, and the
//! engine only decides when that source is registered.
//!
//! ## State Transitions
//!
//! ```text
//! (stopped, Work) --start--> (running, Work) --0s--> (running, Break)
//!        ^                         |                        |
//!        |                         +<---------0s------------+
//!        +--- last work interval / reset / settings change
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! let mut timer = FocusTimer::load(store, ticker, config.timer_defaults())?;
//! timer.start();
//! // Once per second while running:
//! if let Some(event) = timer.tick() { /* ring the bell */ }
//! ```

use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::settings::{SettingsEdit, TimerSettings};
use super::ticker::{TickHandle, TickSource};
use crate::error::Result;
use crate::events::Event;
use crate::storage::KeyValueStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerMode {
    Work,
    Break,
}

/// Core focus timer.
///
/// Runtime position is never persisted; only settings reach the store.
pub struct FocusTimer<S, T> {
    store: S,
    ticker: T,
    settings: TimerSettings,
    mode: TimerMode,
    remaining_secs: u64,
    total_secs: u64,
    completed_work_sessions: u32,
    /// Present exactly while running.
    tick_handle: Option<TickHandle>,
}

impl<S: KeyValueStore, T: TickSource> FocusTimer<S, T> {
    /// Restore settings (clamped) and come up stopped at the start of a work
    /// interval. The clamped settings are written back.
    pub fn load(store: S, ticker: T, defaults: TimerSettings) -> Result<Self> {
        let settings = TimerSettings::load(&store, defaults);
        let mut timer = Self {
            store,
            ticker,
            settings,
            mode: TimerMode::Work,
            remaining_secs: settings.work_secs(),
            total_secs: settings.work_secs(),
            completed_work_sessions: 0,
            tick_handle: None,
        };
        timer.reset()?;
        Ok(timer)
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn mode(&self) -> TimerMode {
        self.mode
    }

    pub fn is_running(&self) -> bool {
        self.tick_handle.is_some()
    }

    pub fn remaining_secs(&self) -> u64 {
        self.remaining_secs
    }

    pub fn total_secs(&self) -> u64 {
        self.total_secs
    }

    pub fn completed_work_sessions(&self) -> u32 {
        self.completed_work_sessions
    }

    pub fn settings(&self) -> TimerSettings {
        self.settings
    }

    pub fn ticker(&self) -> &T {
        &self.ticker
    }

    pub fn ticker_mut(&mut self) -> &mut T {
        &mut self.ticker
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// 0 ..= 100 progress through the current interval.
    pub fn done_percent(&self) -> u8 {
        if self.total_secs == 0 {
            return 0;
        }
        let done = 1.0 - (self.remaining_secs as f64 / self.total_secs as f64);
        (done * 100.0).round().clamp(0.0, 100.0) as u8
    }

    /// Remaining time as `m:ss`.
    pub fn display(&self) -> String {
        format!("{}:{:02}", self.remaining_secs / 60, self.remaining_secs % 60)
    }

    pub fn snapshot(&self) -> Event {
        Event::StateSnapshot {
            mode: self.mode,
            running: self.is_running(),
            remaining_secs: self.remaining_secs,
            total_secs: self.total_secs,
            completed_work_sessions: self.completed_work_sessions,
            done_percent: self.done_percent(),
            display: self.display(),
            settings: self.settings,
            at: Utc::now(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Begin ticking. No-op while already running.
    pub fn start(&mut self) -> Option<Event> {
        if self.is_running() {
            return None;
        }
        self.tick_handle = Some(self.ticker.register());
        tracing::debug!(mode = ?self.mode, remaining = self.remaining_secs, "timer started");
        Some(Event::TimerStarted {
            mode: self.mode,
            remaining_secs: self.remaining_secs,
            at: Utc::now(),
        })
    }

    /// Stop ticking, keeping the current position. No-op while stopped.
    pub fn pause(&mut self) -> Option<Event> {
        if !self.stop_ticking() {
            return None;
        }
        tracing::debug!(remaining = self.remaining_secs, "timer paused");
        Some(Event::TimerPaused {
            mode: self.mode,
            remaining_secs: self.remaining_secs,
            at: Utc::now(),
        })
    }

    /// Advance one second. Returns an event when an interval ends.
    pub fn tick(&mut self) -> Option<Event> {
        if !self.is_running() {
            return None;
        }
        if self.remaining_secs > 0 {
            self.remaining_secs -= 1;
            return None;
        }

        match self.mode {
            TimerMode::Work => {
                self.completed_work_sessions += 1;
                if self.completed_work_sessions >= self.settings.cycles {
                    self.stop_ticking();
                    self.rewind();
                    tracing::debug!(cycles = self.settings.cycles, "all cycles completed");
                    return Some(Event::CyclesCompleted {
                        cycles: self.settings.cycles,
                        at: Utc::now(),
                    });
                }
                self.enter(TimerMode::Break);
            }
            TimerMode::Break => self.enter(TimerMode::Work),
        }

        let finished = match self.mode {
            TimerMode::Work => TimerMode::Break,
            TimerMode::Break => TimerMode::Work,
        };
        tracing::debug!(?finished, next = ?self.mode, "interval completed");
        Some(Event::IntervalCompleted {
            finished,
            next: self.mode,
            completed_work_sessions: self.completed_work_sessions,
            total_secs: self.total_secs,
            at: Utc::now(),
        })
    }

    /// Re-apply the current settings: persist them and stop at the start of
    /// a fresh work interval.
    pub fn reset(&mut self) -> Result<Event> {
        self.apply(self.settings)?;
        Ok(Event::TimerReset {
            total_secs: self.total_secs,
            at: Utc::now(),
        })
    }

    /// Replace all settings. Values below 1 are clamped. Any run in progress
    /// is discarded.
    pub fn apply_settings(&mut self, work_min: i64, break_min: i64, cycles: i64) -> Result<Event> {
        let settings = TimerSettings::from_raw(work_min, break_min, cycles);
        self.apply(settings)?;
        Ok(Event::SettingsApplied {
            settings,
            at: Utc::now(),
        })
    }

    /// Edit one settings field. Like every settings change this discards the
    /// current run rather than continuing it with the new durations.
    pub fn change_settings(&mut self, edit: SettingsEdit) -> Result<Event> {
        let settings = self.settings.with_edit(edit);
        self.apply(settings)?;
        Ok(Event::SettingsApplied {
            settings,
            at: Utc::now(),
        })
    }

    // ── Internal ─────────────────────────────────────────────────────

    /// Persist first: a failed write leaves the run untouched.
    fn apply(&mut self, settings: TimerSettings) -> Result<()> {
        let settings = settings.clamped();
        settings.save(&mut self.store)?;
        self.settings = settings;
        self.stop_ticking();
        self.rewind();
        tracing::debug!(settings = ?self.settings, "timer reset");
        Ok(())
    }

    /// Deregister the tick source. Returns whether it was registered.
    fn stop_ticking(&mut self) -> bool {
        match self.tick_handle.take() {
            Some(handle) => {
                self.ticker.deregister(handle);
                true
            }
            None => false,
        }
    }

    fn rewind(&mut self) {
        self.completed_work_sessions = 0;
        self.enter(TimerMode::Work);
    }

    fn enter(&mut self, mode: TimerMode) {
        self.mode = mode;
        self.total_secs = match mode {
            TimerMode::Work => self.settings.work_secs(),
            TimerMode::Break => self.settings.break_secs(),
        };
        self.remaining_secs = self.total_secs;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StorageError;
    use crate::storage::MemoryStore;
    use crate::timer::settings::SETTINGS_KEY;
    use crate::timer::ManualTicker;

    fn timer(work: u32, brk: u32, cycles: u32) -> FocusTimer<MemoryStore, ManualTicker> {
        FocusTimer::load(
            MemoryStore::new(),
            ManualTicker::new(),
            TimerSettings::new(work, brk, cycles),
        )
        .unwrap()
    }

    fn run_ticks<S: KeyValueStore, T: TickSource>(t: &mut FocusTimer<S, T>, n: usize) -> Vec<Event> {
        (0..n).filter_map(|_| t.tick()).collect()
    }

    #[test]
    fn loads_stopped_at_full_work_interval() {
        let t = timer(25, 5, 4);
        assert_eq!(t.mode(), TimerMode::Work);
        assert!(!t.is_running());
        assert_eq!(t.remaining_secs(), 1500);
        assert_eq!(t.total_secs(), 1500);
        assert_eq!(t.done_percent(), 0);
        assert_eq!(t.display(), "25:00");
    }

    #[test]
    fn load_writes_clamped_settings() {
        let store = MemoryStore::new()
            .with_entry(SETTINGS_KEY, r#"{"workMin":-2,"breakMin":3,"cycles":2}"#);
        let t = FocusTimer::load(store, ManualTicker::new(), TimerSettings::new(25, 5, 4)).unwrap();
        assert_eq!(t.settings(), TimerSettings::new(1, 3, 2));
        assert_eq!(t.remaining_secs(), 60);
        let store = t.into_store();
        assert_eq!(
            store.get(SETTINGS_KEY).unwrap().as_deref(),
            Some(r#"{"workMin":1,"breakMin":3,"cycles":2}"#)
        );
    }

    #[test]
    fn tick_is_ignored_while_stopped() {
        let mut t = timer(1, 1, 1);
        assert!(t.tick().is_none());
        assert_eq!(t.remaining_secs(), 60);
    }

    #[test]
    fn start_is_idempotent() {
        let mut t = timer(1, 1, 1);
        assert!(t.start().is_some());
        assert!(t.start().is_none());
        assert_eq!(t.ticker().active(), 1);
        assert_eq!(t.ticker().registrations(), 1);
    }

    #[test]
    fn pause_is_idempotent_and_releases_ticker() {
        let mut t = timer(1, 1, 1);
        assert!(t.pause().is_none());
        t.start();
        assert!(t.pause().is_some());
        assert!(t.pause().is_none());
        assert_eq!(t.ticker().active(), 0);
    }

    #[test]
    fn pause_then_start_resumes_exactly() {
        let mut t = timer(1, 1, 2);
        t.start();
        run_ticks(&mut t, 17);
        t.pause();
        assert_eq!(t.remaining_secs(), 43);
        run_ticks(&mut t, 5);
        assert_eq!(t.remaining_secs(), 43);
        t.start();
        assert_eq!(t.remaining_secs(), 43);
        assert_eq!(t.mode(), TimerMode::Work);
        t.tick();
        assert_eq!(t.remaining_secs(), 42);
    }

    #[test]
    fn work_break_cycle_and_terminal_stop() {
        let mut t = timer(1, 1, 2);
        t.start();

        // Countdown reaches zero, the following tick switches interval.
        assert!(run_ticks(&mut t, 60).is_empty());
        assert_eq!(t.remaining_secs(), 0);
        assert_eq!(t.mode(), TimerMode::Work);

        let ev = t.tick().unwrap();
        assert!(matches!(
            ev,
            Event::IntervalCompleted {
                finished: TimerMode::Work,
                next: TimerMode::Break,
                completed_work_sessions: 1,
                ..
            }
        ));
        assert_eq!(t.mode(), TimerMode::Break);
        assert_eq!(t.remaining_secs(), 60);
        assert_eq!(t.total_secs(), 60);
        assert!(t.is_running());

        let events = run_ticks(&mut t, 61);
        assert_eq!(events.len(), 1);
        assert_eq!(t.mode(), TimerMode::Work);
        assert_eq!(t.remaining_secs(), 60);
        assert_eq!(t.completed_work_sessions(), 1);

        let events = run_ticks(&mut t, 61);
        assert!(matches!(events.as_slice(), [Event::CyclesCompleted { cycles: 2, .. }]));
        assert!(!t.is_running());
        assert_eq!(t.ticker().active(), 0);
        assert_eq!(t.completed_work_sessions(), 0);
        assert_eq!(t.mode(), TimerMode::Work);
        assert_eq!(t.remaining_secs(), 60);
        assert_eq!(t.total_secs(), 60);
    }

    #[test]
    fn single_cycle_stops_after_first_work_interval() {
        let mut t = timer(1, 5, 1);
        t.start();
        let events = run_ticks(&mut t, 61);
        assert!(matches!(events.as_slice(), [Event::CyclesCompleted { cycles: 1, .. }]));
        assert!(!t.is_running());
        assert!(t.tick().is_none());
    }

    #[test]
    fn break_completion_does_not_count() {
        let mut t = timer(1, 2, 3);
        t.start();
        run_ticks(&mut t, 61);
        assert_eq!(t.completed_work_sessions(), 1);
        assert_eq!(t.remaining_secs(), 120);
        run_ticks(&mut t, 121);
        assert_eq!(t.mode(), TimerMode::Work);
        assert_eq!(t.completed_work_sessions(), 1);
    }

    #[test]
    fn apply_settings_discards_progress() {
        let mut t = timer(1, 1, 2);
        t.start();
        run_ticks(&mut t, 30);
        assert_eq!(t.remaining_secs(), 30);

        let ev = t.apply_settings(2, 1, 2).unwrap();
        assert!(matches!(ev, Event::SettingsApplied { .. }));
        assert!(!t.is_running());
        assert_eq!(t.ticker().active(), 0);
        assert_eq!(t.mode(), TimerMode::Work);
        assert_eq!(t.remaining_secs(), 120);
        assert_eq!(t.total_secs(), 120);
    }

    #[test]
    fn apply_settings_clamps_zero() {
        let mut t = timer(25, 5, 4);
        t.apply_settings(0, 0, 0).unwrap();
        assert_eq!(t.settings(), TimerSettings::new(1, 1, 1));
        assert_eq!(t.remaining_secs(), 60);
        let store = t.into_store();
        assert_eq!(
            store.get(SETTINGS_KEY).unwrap().as_deref(),
            Some(r#"{"workMin":1,"breakMin":1,"cycles":1}"#)
        );
    }

    /// Store that can be switched into refusing writes.
    #[derive(Default)]
    struct FlakyStore {
        inner: MemoryStore,
        fail_writes: bool,
    }

    impl KeyValueStore for FlakyStore {
        fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
            self.inner.get(key)
        }

        fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
            if self.fail_writes {
                return Err(StorageError::QueryFailed("disk full".into()));
            }
            self.inner.set(key, value)
        }

        fn remove(&mut self, key: &str) -> Result<(), StorageError> {
            self.inner.remove(key)
        }
    }

    #[test]
    fn failed_settings_write_keeps_current_run() {
        let mut t = FocusTimer::load(
            FlakyStore::default(),
            ManualTicker::new(),
            TimerSettings::new(1, 1, 2),
        )
        .unwrap();
        t.start();
        run_ticks(&mut t, 30);
        t.store.fail_writes = true;

        assert!(t.apply_settings(10, 1, 2).is_err());
        assert!(t.change_settings(SettingsEdit::WorkMinutes(7)).is_err());
        assert!(t.reset().is_err());
        assert_eq!(t.settings(), TimerSettings::new(1, 1, 2));
        assert!(t.is_running());
        assert_eq!(t.remaining_secs(), 30);
        assert_eq!(t.total_secs(), 60);

        run_ticks(&mut t, 31);
        assert_eq!(t.mode(), TimerMode::Break);
        assert_eq!(t.total_secs(), 60);
        assert_eq!(
            t.into_store().inner.get(SETTINGS_KEY).unwrap().as_deref(),
            Some(r#"{"workMin":1,"breakMin":1,"cycles":2}"#)
        );
    }

    #[test]
    fn change_settings_during_break_resets_to_work() {
        let mut t = timer(1, 1, 3);
        t.start();
        run_ticks(&mut t, 65);
        assert_eq!(t.mode(), TimerMode::Break);
        t.change_settings(SettingsEdit::Cycles(5)).unwrap();
        assert_eq!(t.settings(), TimerSettings::new(1, 1, 5));
        assert_eq!(t.mode(), TimerMode::Work);
        assert_eq!(t.completed_work_sessions(), 0);
        assert!(!t.is_running());
    }

    #[test]
    fn reset_stops_and_rewinds() {
        let mut t = timer(1, 1, 3);
        t.start();
        run_ticks(&mut t, 70);
        let ev = t.reset().unwrap();
        assert!(matches!(ev, Event::TimerReset { total_secs: 60, .. }));
        assert!(!t.is_running());
        assert_eq!(t.completed_work_sessions(), 0);
        assert_eq!(t.remaining_secs(), 60);
    }

    #[test]
    fn done_percent_and_display() {
        let mut t = timer(1, 1, 1);
        t.start();
        run_ticks(&mut t, 15);
        assert_eq!(t.done_percent(), 25);
        assert_eq!(t.display(), "0:45");
        run_ticks(&mut t, 45);
        assert_eq!(t.done_percent(), 100);
        assert_eq!(t.display(), "0:00");
    }

    #[test]
    fn restart_after_terminal_registers_once_more() {
        let mut t = timer(1, 1, 1);
        t.start();
        run_ticks(&mut t, 61);
        t.start();
        assert_eq!(t.ticker().active(), 1);
        assert_eq!(t.ticker().registrations(), 2);
    }

    #[test]
    fn snapshot_reports_state() {
        let mut t = timer(2, 1, 1);
        t.start();
        run_ticks(&mut t, 60);
        match t.snapshot() {
            Event::StateSnapshot {
                running,
                remaining_secs,
                done_percent,
                display,
                ..
            } => {
                assert!(running);
                assert_eq!(remaining_secs, 60);
                assert_eq!(done_percent, 50);
                assert_eq!(display, "1:00");
            }
            other => panic!("Expected StateSnapshot, got {other:?}"),
        }
    }
}
