//! # Lifebalance Core Library
//!
//! Models behind three small personal widgets: a work/life balance gauge with
//! a weekly planner, a focus timer, and a daily habit and mood tracker. Every
//! model takes its [`KeyValueStore`] by injection and has no view dependency;
//! front-ends map user input onto plain method calls.
//!
//! ## Key Components
//!
//! - [`FocusTimer`]: work/break cycle state machine driven by a [`TickSource`]
//! - [`BalanceModel`], [`PlannerGrid`], [`HabitDay`]: persisted widget models
//! - [`SqliteStore`] / [`MemoryStore`]: store implementations
//! - [`Config`]: application configuration

pub mod balance;
pub mod error;
pub mod events;
pub mod habits;
pub mod koan;
pub mod planner;
pub mod storage;
pub mod timer;

pub use balance::{balance_score, BalanceInputs, BalanceModel, BalanceSlider};
pub use error::{ConfigError, CoreError, StorageError, ValidationError};
pub use events::Event;
pub use habits::{HabitDay, HabitDayRecord, Mood};
pub use koan::KoanPicker;
pub use planner::{CellPos, PlannerGrid};
pub use storage::{Config, KeyValueStore, MemoryStore, SqliteStore};
pub use timer::{FocusTimer, ManualTicker, SettingsEdit, TickHandle, TickSource, TimerMode, TimerSettings};
