//! Weekly planner: a 3 x 7 grid of free-text cells, one store key per cell.

use std::collections::BTreeMap;

use crate::error::{Result, ValidationError};
use crate::storage::KeyValueStore;

pub const SLOTS: [&str; 3] = ["Morning", "Afternoon", "Evening"];
pub const DAYS: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

pub const EXPORT_FILENAME: &str = "planner.json";
pub const EXPORT_MIME: &str = "application/json";

const CELL_KEY_PREFIX: &str = "planner-cell";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CellPos {
    slot: usize,
    day: usize,
}

impl CellPos {
    pub fn new(slot: usize, day: usize) -> Result<Self, ValidationError> {
        if slot >= SLOTS.len() {
            return Err(ValidationError::OutOfBounds {
                collection: "slots".into(),
                index: slot,
                len: SLOTS.len(),
            });
        }
        if day >= DAYS.len() {
            return Err(ValidationError::OutOfBounds {
                collection: "days".into(),
                index: day,
                len: DAYS.len(),
            });
        }
        Ok(Self { slot, day })
    }

    pub fn slot(&self) -> usize {
        self.slot
    }

    pub fn day(&self) -> usize {
        self.day
    }

    /// `planner-cell-<slot>-<day>`
    pub fn key(&self) -> String {
        format!("{CELL_KEY_PREFIX}-{}-{}", self.slot, self.day)
    }
}

/// All 21 positions, slot-major.
pub fn positions() -> impl Iterator<Item = CellPos> {
    (0..SLOTS.len()).flat_map(|slot| (0..DAYS.len()).map(move |day| CellPos { slot, day }))
}

pub struct PlannerGrid<S> {
    store: S,
}

impl<S: KeyValueStore> PlannerGrid<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn set_cell(&mut self, pos: CellPos, text: &str) -> Result<()> {
        self.store.set(&pos.key(), text)?;
        Ok(())
    }

    /// Stored text, or empty when the cell was never written or the read failed.
    pub fn get_cell(&self, pos: CellPos) -> String {
        let key = pos.key();
        match self.store.get(&key) {
            Ok(text) => text.unwrap_or_default(),
            Err(e) => {
                tracing::warn!(key, error = %e, "planner cell unreadable");
                String::new()
            }
        }
    }

    /// Remove every cell. Not undoable.
    pub fn clear_all(&mut self) -> Result<()> {
        for pos in positions() {
            self.store.remove(&pos.key())?;
        }
        tracing::info!("planner cleared");
        Ok(())
    }

    /// Key to text for all 21 positions, empty cells included.
    pub fn export_all(&self) -> BTreeMap<String, String> {
        positions().map(|pos| (pos.key(), self.get_cell(pos))).collect()
    }

    /// Pretty-printed JSON document of [`export_all`](Self::export_all).
    pub fn export_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.export_all())?)
    }

    pub fn into_store(self) -> S {
        self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    fn pos(slot: usize, day: usize) -> CellPos {
        CellPos::new(slot, day).unwrap()
    }

    #[test]
    fn twenty_one_distinct_positions() {
        let keys: std::collections::BTreeSet<_> = positions().map(|p| p.key()).collect();
        assert_eq!(keys.len(), 21);
        assert!(keys.contains("planner-cell-2-6"));
    }

    #[test]
    fn rejects_out_of_range_positions() {
        assert!(CellPos::new(3, 0).is_err());
        assert!(CellPos::new(0, 7).is_err());
    }

    #[test]
    fn set_then_reload() {
        let mut grid = PlannerGrid::new(MemoryStore::new());
        grid.set_cell(pos(1, 4), "gym").unwrap();
        let grid = PlannerGrid::new(grid.into_store());
        assert_eq!(grid.get_cell(pos(1, 4)), "gym");
        assert_eq!(grid.get_cell(pos(0, 0)), "");
    }

    #[test]
    fn clear_all_removes_keys() {
        let mut grid = PlannerGrid::new(MemoryStore::new().with_entry("other", "kept"));
        grid.set_cell(pos(0, 0), "a").unwrap();
        grid.set_cell(pos(2, 6), "b").unwrap();
        grid.clear_all().unwrap();
        let store = grid.into_store();
        assert!(!store.contains_key("planner-cell-0-0"));
        assert!(!store.contains_key("planner-cell-2-6"));
        assert!(store.contains_key("other"));
    }

    #[test]
    fn export_covers_every_cell() {
        let mut grid = PlannerGrid::new(MemoryStore::new());
        grid.set_cell(pos(0, 2), "write").unwrap();
        let exported = grid.export_all();
        assert_eq!(exported.len(), 21);
        assert_eq!(exported["planner-cell-0-2"], "write");
        assert_eq!(exported["planner-cell-1-1"], "");

        let json: serde_json::Value = serde_json::from_str(&grid.export_json().unwrap()).unwrap();
        assert_eq!(json["planner-cell-0-2"], "write");
    }
}
