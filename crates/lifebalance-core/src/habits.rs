//! Daily habit checklist and mood.
//!
//! One record per calendar day under `habits-YYYY-MM-DD`. A day without a
//! record reads as all unchecked with a neutral mood.

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{Result, ValidationError};
use crate::storage::{load_json, save_json, KeyValueStore};

pub const DEFAULT_HABITS: [&str; 6] = [
    "Stretch 2 minutes",
    "10-minute walk",
    "3-line journal",
    "2 cups of water",
    "15-min digital detox",
    "3 gratitudes",
];

pub const HABIT_KEY_PREFIX: &str = "habits-";

const MOOD_FACES: [&str; 5] = ["😞", "🙁", "😐", "🙂", "😄"];

/// Mood on a five-point scale, `-2 ..= 2`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct Mood(i8);

impl Mood {
    pub const MIN: i8 = -2;
    pub const MAX: i8 = 2;

    pub fn new(value: i64) -> Result<Self, ValidationError> {
        if !(i64::from(Self::MIN)..=i64::from(Self::MAX)).contains(&value) {
            return Err(ValidationError::InvalidValue {
                field: "mood".into(),
                message: format!("{value} is outside {}..={}", Self::MIN, Self::MAX),
            });
        }
        Ok(Self(value as i8))
    }

    fn saturating(value: i64) -> Self {
        Self(value.clamp(i64::from(Self::MIN), i64::from(Self::MAX)) as i8)
    }

    pub fn value(&self) -> i8 {
        self.0
    }

    pub fn face(&self) -> &'static str {
        let index = i16::from(self.0) - i16::from(Self::MIN);
        usize::try_from(index)
            .ok()
            .and_then(|i| MOOD_FACES.get(i))
            .copied()
            .unwrap_or("😐")
    }
}

impl TryFrom<i64> for Mood {
    type Error = ValidationError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Mood> for i64 {
    fn from(mood: Mood) -> Self {
        i64::from(mood.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HabitDayRecord {
    pub checks: Vec<bool>,
    pub mood: Mood,
}

/// On-disk shape; tolerant of missing fields and out-of-range moods.
#[derive(Deserialize)]
struct StoredRecord {
    #[serde(default)]
    checks: Vec<bool>,
    #[serde(default)]
    mood: i64,
}

impl HabitDayRecord {
    pub fn untouched(habit_count: usize) -> Self {
        Self {
            checks: vec![false; habit_count],
            mood: Mood::default(),
        }
    }

    pub fn done_count(&self) -> usize {
        self.checks.iter().filter(|c| **c).count()
    }
}

/// `habits-YYYY-MM-DD`
pub fn day_key(date: NaiveDate) -> String {
    format!("{HABIT_KEY_PREFIX}{}", date.format("%Y-%m-%d"))
}

pub struct HabitDay<S> {
    store: S,
    templates: Vec<String>,
    date: NaiveDate,
    record: HabitDayRecord,
}

impl<S: KeyValueStore> HabitDay<S> {
    /// Today's record, using the device-local date.
    pub fn today(store: S, templates: Vec<String>) -> Self {
        Self::for_date(store, templates, Local::now().date_naive())
    }

    pub fn for_date(store: S, templates: Vec<String>, date: NaiveDate) -> Self {
        let record = match load_json::<StoredRecord, _>(&store, &day_key(date)) {
            Some(stored) => {
                let mut checks = stored.checks;
                checks.resize(templates.len(), false);
                HabitDayRecord {
                    checks,
                    mood: Mood::saturating(stored.mood),
                }
            }
            None => HabitDayRecord::untouched(templates.len()),
        };
        Self {
            store,
            templates,
            date,
            record,
        }
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn templates(&self) -> &[String] {
        &self.templates
    }

    pub fn record(&self) -> &HabitDayRecord {
        &self.record
    }

    pub fn mood(&self) -> Mood {
        self.record.mood
    }

    /// Whether a record for this day exists in the store.
    pub fn is_persisted(&self) -> bool {
        matches!(self.store.get(&day_key(self.date)), Ok(Some(_)))
    }

    /// Flip one habit and persist the full day record.
    pub fn toggle(&mut self, index: usize) -> Result<bool> {
        let len = self.record.checks.len();
        let check = self
            .record
            .checks
            .get_mut(index)
            .ok_or_else(|| ValidationError::OutOfBounds {
                collection: "habits".into(),
                index,
                len,
            })?;
        *check = !*check;
        let now_checked = *check;
        self.persist()?;
        Ok(now_checked)
    }

    pub fn set_mood(&mut self, value: i64) -> Result<()> {
        self.record.mood = Mood::new(value)?;
        self.persist()
    }

    /// Delete the day's record, returning to the untouched state.
    pub fn reset_today(&mut self) -> Result<()> {
        self.store.remove(&day_key(self.date))?;
        self.record = HabitDayRecord::untouched(self.templates.len());
        tracing::info!(date = %self.date, "habit day reset");
        Ok(())
    }

    /// Share of habits done, `0 ..= 100`.
    pub fn progress_percent(&self) -> u8 {
        let total = self.record.checks.len().max(1);
        let pct = 100.0 * self.record.done_count() as f64 / total as f64;
        pct.round() as u8
    }

    pub fn into_store(self) -> S {
        self.store
    }

    fn persist(&mut self) -> Result<()> {
        save_json(&mut self.store, &day_key(self.date), &self.record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    fn templates() -> Vec<String> {
        DEFAULT_HABITS.iter().map(|h| h.to_string()).collect()
    }

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 7).unwrap()
    }

    #[test]
    fn key_uses_zero_padded_date() {
        assert_eq!(day_key(day()), "habits-2026-03-07");
    }

    #[test]
    fn absent_day_is_untouched() {
        let habits = HabitDay::for_date(MemoryStore::new(), templates(), day());
        assert_eq!(habits.record(), &HabitDayRecord::untouched(6));
        assert_eq!(habits.progress_percent(), 0);
        assert!(!habits.is_persisted());
    }

    #[test]
    fn toggle_persists_full_record() {
        let mut habits = HabitDay::for_date(MemoryStore::new(), templates(), day());
        assert!(habits.toggle(1).unwrap());
        habits.set_mood(-1).unwrap();
        let store = habits.into_store();
        assert_eq!(
            store.get("habits-2026-03-07").unwrap().as_deref(),
            Some(r#"{"checks":[false,true,false,false,false,false],"mood":-1}"#)
        );

        let reloaded = HabitDay::for_date(store, templates(), day());
        assert_eq!(reloaded.record().checks[1], true);
        assert_eq!(reloaded.mood().value(), -1);
    }

    #[test]
    fn toggle_twice_unchecks() {
        let mut habits = HabitDay::for_date(MemoryStore::new(), templates(), day());
        habits.toggle(0).unwrap();
        assert!(!habits.toggle(0).unwrap());
        assert_eq!(habits.progress_percent(), 0);
        assert!(habits.is_persisted());
    }

    #[test]
    fn toggle_out_of_range_is_rejected() {
        let mut habits = HabitDay::for_date(MemoryStore::new(), templates(), day());
        assert!(habits.toggle(6).is_err());
        assert!(!habits.is_persisted());
    }

    #[test]
    fn mood_bounds() {
        let mut habits = HabitDay::for_date(MemoryStore::new(), templates(), day());
        assert!(habits.set_mood(3).is_err());
        assert!(habits.set_mood(-3).is_err());
        habits.set_mood(2).unwrap();
        assert_eq!(habits.mood().face(), "😄");
        assert_eq!(Mood::default().face(), "😐");
    }

    #[test]
    fn mood_rejects_out_of_range_json() {
        assert_eq!(serde_json::from_str::<Mood>("-1").unwrap().face(), "🙁");
        assert!(serde_json::from_str::<Mood>("7").is_err());
        assert!(serde_json::from_str::<Mood>("-128").is_err());
        assert!(serde_json::from_str::<HabitDayRecord>(r#"{"checks":[],"mood":9}"#).is_err());
        assert_eq!(serde_json::to_string(&Mood::new(-2).unwrap()).unwrap(), "-2");
    }

    #[test]
    fn progress_rounds() {
        let mut habits = HabitDay::for_date(MemoryStore::new(), templates(), day());
        habits.toggle(0).unwrap();
        assert_eq!(habits.progress_percent(), 17);
        habits.toggle(1).unwrap();
        habits.toggle(2).unwrap();
        assert_eq!(habits.progress_percent(), 50);
    }

    #[test]
    fn empty_template_list_does_not_divide_by_zero() {
        let habits = HabitDay::for_date(MemoryStore::new(), Vec::new(), day());
        assert_eq!(habits.progress_percent(), 0);
    }

    #[test]
    fn reset_removes_key_but_looks_like_all_false() {
        let mut explicit = HabitDay::for_date(MemoryStore::new(), templates(), day());
        explicit.toggle(0).unwrap();
        explicit.toggle(0).unwrap();

        let mut reset = HabitDay::for_date(MemoryStore::new(), templates(), day());
        reset.toggle(3).unwrap();
        reset.reset_today().unwrap();

        assert_eq!(explicit.progress_percent(), reset.progress_percent());
        assert!(explicit.is_persisted());
        assert!(!reset.is_persisted());
        assert_eq!(reset.record(), &HabitDayRecord::untouched(6));
    }

    #[test]
    fn stored_record_is_fitted_to_templates() {
        let store = MemoryStore::new()
            .with_entry("habits-2026-03-07", r#"{"checks":[true],"mood":9}"#);
        let habits = HabitDay::for_date(store, templates(), day());
        assert_eq!(habits.record().checks, vec![true, false, false, false, false, false]);
        assert_eq!(habits.mood().value(), 2);

        let store = MemoryStore::new().with_entry(
            "habits-2026-03-07",
            r#"{"checks":[true,true,true,true,true,true,true,true]}"#,
        );
        let habits = HabitDay::for_date(store, templates(), day());
        assert_eq!(habits.record().checks.len(), 6);
        assert_eq!(habits.progress_percent(), 100);
    }

    #[test]
    fn garbage_record_falls_back_to_untouched() {
        let store = MemoryStore::new().with_entry("habits-2026-03-07", "checks=yes");
        let habits = HabitDay::for_date(store, templates(), day());
        assert_eq!(habits.record(), &HabitDayRecord::untouched(6));
    }

    #[test]
    fn days_are_independent() {
        let mut monday = HabitDay::for_date(MemoryStore::new(), templates(), day());
        monday.toggle(0).unwrap();
        let next = day().succ_opt().unwrap();
        let tuesday = HabitDay::for_date(monday.into_store(), templates(), next);
        assert_eq!(tuesday.progress_percent(), 0);
    }
}
