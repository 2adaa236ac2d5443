use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::timer::{TimerMode, TimerSettings};

/// Every timer state change produces an Event.
/// Front-ends render them; `tick` results double as the audible cue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    TimerStarted {
        mode: TimerMode,
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    TimerPaused {
        mode: TimerMode,
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    TimerReset {
        total_secs: u64,
        at: DateTime<Utc>,
    },
    /// An interval ran out and the next one began.
    IntervalCompleted {
        finished: TimerMode,
        next: TimerMode,
        completed_work_sessions: u32,
        total_secs: u64,
        at: DateTime<Utc>,
    },
    /// The last work interval ran out; the engine stopped itself.
    CyclesCompleted {
        cycles: u32,
        at: DateTime<Utc>,
    },
    SettingsApplied {
        settings: TimerSettings,
        at: DateTime<Utc>,
    },
    StateSnapshot {
        mode: TimerMode,
        running: bool,
        remaining_secs: u64,
        total_secs: u64,
        completed_work_sessions: u32,
        done_percent: u8,
        display: String,
        settings: TimerSettings,
        at: DateTime<Utc>,
    },
}

impl Event {
    /// Whether this event marks the end of an interval.
    pub fn is_interval_end(&self) -> bool {
        matches!(
            self,
            Event::IntervalCompleted { .. } | Event::CyclesCompleted { .. }
        )
    }
}
