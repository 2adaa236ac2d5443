//! Work/life balance gauge.
//!
//! Four sliders feed one score: 100 when the work side (`work + study`)
//! equals the life side (`health + fun`), dropping by one point per unit of
//! imbalance. Only the raw inputs are persisted.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Result, ValidationError};
use crate::storage::{load_json, save_json, KeyValueStore};

pub const BALANCE_KEY: &str = "balance-sliders";

/// Slider value a fresh gauge starts at.
pub const DEFAULT_SLIDER_VALUE: i64 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceInputs {
    #[serde(default = "default_slider")]
    pub work: i64,
    #[serde(default = "default_slider")]
    pub study: i64,
    #[serde(default = "default_slider")]
    pub health: i64,
    #[serde(default = "default_slider")]
    pub fun: i64,
}

fn default_slider() -> i64 {
    DEFAULT_SLIDER_VALUE
}

impl Default for BalanceInputs {
    fn default() -> Self {
        Self {
            work: DEFAULT_SLIDER_VALUE,
            study: DEFAULT_SLIDER_VALUE,
            health: DEFAULT_SLIDER_VALUE,
            fun: DEFAULT_SLIDER_VALUE,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BalanceSlider {
    Work,
    Study,
    Health,
    Fun,
}

impl BalanceSlider {
    pub const ALL: [BalanceSlider; 4] = [
        BalanceSlider::Work,
        BalanceSlider::Study,
        BalanceSlider::Health,
        BalanceSlider::Fun,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            BalanceSlider::Work => "work",
            BalanceSlider::Study => "study",
            BalanceSlider::Health => "health",
            BalanceSlider::Fun => "fun",
        }
    }
}

impl fmt::Display for BalanceSlider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for BalanceSlider {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BalanceSlider::ALL
            .into_iter()
            .find(|slider| slider.name() == s)
            .ok_or_else(|| ValidationError::InvalidValue {
                field: "slider".into(),
                message: format!("expected one of work, study, health, fun; got '{s}'"),
            })
    }
}

impl BalanceInputs {
    pub fn get(&self, slider: BalanceSlider) -> i64 {
        match slider {
            BalanceSlider::Work => self.work,
            BalanceSlider::Study => self.study,
            BalanceSlider::Health => self.health,
            BalanceSlider::Fun => self.fun,
        }
    }

    fn set(&mut self, slider: BalanceSlider, value: i64) {
        match slider {
            BalanceSlider::Work => self.work = value,
            BalanceSlider::Study => self.study = value,
            BalanceSlider::Health => self.health = value,
            BalanceSlider::Fun => self.fun = value,
        }
    }
}

/// `max(0, 100 - |(work + study) - (health + fun)|)`, always in `0..=100`.
pub fn balance_score(inputs: &BalanceInputs) -> u8 {
    let work_side = i128::from(inputs.work) + i128::from(inputs.study);
    let life_side = i128::from(inputs.health) + i128::from(inputs.fun);
    let delta = (work_side - life_side).abs();
    (100 - delta.min(100)) as u8
}

pub struct BalanceModel<S> {
    store: S,
    inputs: BalanceInputs,
}

impl<S: KeyValueStore> BalanceModel<S> {
    /// Restore the persisted sliders, or defaults when absent or malformed.
    pub fn load(store: S) -> Self {
        let inputs = load_json(&store, BALANCE_KEY).unwrap_or_default();
        Self { store, inputs }
    }

    pub fn inputs(&self) -> BalanceInputs {
        self.inputs
    }

    pub fn score(&self) -> u8 {
        balance_score(&self.inputs)
    }

    /// Update one slider and re-persist all four.
    pub fn set_input(&mut self, slider: BalanceSlider, value: i64) -> Result<u8> {
        self.inputs.set(slider, value);
        save_json(&mut self.store, BALANCE_KEY, &self.inputs)?;
        Ok(self.score())
    }

    pub fn into_store(self) -> S {
        self.store
    }
}
