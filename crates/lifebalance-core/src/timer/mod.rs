mod engine;
mod settings;
mod ticker;

pub use engine::{FocusTimer, TimerMode};
pub use settings::{SettingsEdit, TimerSettings, SETTINGS_KEY};
pub use ticker::{ManualTicker, TickHandle, TickSource};
