use serde::{Deserialize, Serialize};

use crate::storage::{load_json, save_json, KeyValueStore};
use crate::error::Result;

pub const SETTINGS_KEY: &str = "timer-settings";

/// Work/break durations and the number of work intervals per session.
///
/// Every field is at least 1 once it has passed through [`clamped`](Self::clamped).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerSettings {
    #[serde(rename = "workMin")]
    pub work_min: u32,
    #[serde(rename = "breakMin")]
    pub break_min: u32,
    pub cycles: u32,
}

/// A single edit to one settings field, as a settings form produces it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsEdit {
    WorkMinutes(i64),
    BreakMinutes(i64),
    Cycles(i64),
}

impl TimerSettings {
    pub fn new(work_min: u32, break_min: u32, cycles: u32) -> Self {
        Self {
            work_min,
            break_min,
            cycles,
        }
    }

    /// Build from raw user values, clamping each to a minimum of 1.
    pub fn from_raw(work_min: i64, break_min: i64, cycles: i64) -> Self {
        Self {
            work_min: clamp_field(work_min),
            break_min: clamp_field(break_min),
            cycles: clamp_field(cycles),
        }
    }

    pub fn clamped(self) -> Self {
        Self {
            work_min: self.work_min.max(1),
            break_min: self.break_min.max(1),
            cycles: self.cycles.max(1),
        }
    }

    pub fn with_edit(self, edit: SettingsEdit) -> Self {
        match edit {
            SettingsEdit::WorkMinutes(v) => Self {
                work_min: clamp_field(v),
                ..self
            },
            SettingsEdit::BreakMinutes(v) => Self {
                break_min: clamp_field(v),
                ..self
            },
            SettingsEdit::Cycles(v) => Self {
                cycles: clamp_field(v),
                ..self
            },
        }
    }

    pub fn work_secs(&self) -> u64 {
        u64::from(self.work_min).saturating_mul(60)
    }

    pub fn break_secs(&self) -> u64 {
        u64::from(self.break_min).saturating_mul(60)
    }

    /// Restore persisted settings, always clamped.
    ///
    /// Fields that are missing, zero or not numbers take the value from
    /// `defaults`. A record that is not a JSON object yields `defaults`.
    pub fn load<S: KeyValueStore + ?Sized>(store: &S, defaults: TimerSettings) -> Self {
        let defaults = defaults.clamped();
        let Some(record) = load_json::<serde_json::Value, _>(store, SETTINGS_KEY) else {
            return defaults;
        };
        if !record.is_object() {
            tracing::warn!(key = SETTINGS_KEY, "settings record is not an object");
            return defaults;
        }
        Self {
            work_min: stored_field(&record, "workMin", defaults.work_min),
            break_min: stored_field(&record, "breakMin", defaults.break_min),
            cycles: stored_field(&record, "cycles", defaults.cycles),
        }
    }

    pub fn save<S: KeyValueStore + ?Sized>(&self, store: &mut S) -> Result<()> {
        save_json(store, SETTINGS_KEY, self)
    }
}

fn clamp_field(value: i64) -> u32 {
    value.clamp(1, i64::from(u32::MAX)) as u32
}

fn stored_field(record: &serde_json::Value, name: &str, fallback: u32) -> u32 {
    match record.get(name).and_then(serde_json::Value::as_f64) {
        Some(v) if v.is_finite() && v != 0.0 => clamp_field(v.trunc() as i64),
        _ => fallback,
    }
}
