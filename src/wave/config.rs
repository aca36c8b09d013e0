use std::time::Duration;

use serde::Deserialize;
use serde::Serialize;

use crate::error::WfcError;
use crate::rules::RuleTable;
use crate::types::Dimensions;

fn default_auto_run() -> bool {
    true
}

/// Options a [`Wave`](super::Wave) is built from.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WaveConfig {
    /// Identifies the generator in its events.
    pub name: String,

    /// Size of the tile grid.
    pub grid: Dimensions,

    /// PRNG seed. The current time is used when absent.
    #[serde(default)]
    pub seed: Option<u64>,

    #[serde(default)]
    pub rules: RuleTable,

    /// Collapse the whole grid in `generate`. When false, `generate` collapses one tile and the
    /// caller drives the rest with `step`.
    #[serde(default = "default_auto_run")]
    pub auto_run: bool,

    /// Size of the sprite sheet, in sprites. Only the width is used, to map sprite indices to
    /// sheet coordinates.
    pub sprite_sheet: Dimensions,

    /// First tile to collapse. A random tile is chosen when absent.
    #[serde(default)]
    pub starting_index: Option<usize>,

    /// Pause between two collapses in automatic mode.
    #[serde(default)]
    pub step_delay_ms: u64,
}

impl WaveConfig {
    pub fn new(name: impl Into<String>, grid: Dimensions, sprite_sheet: Dimensions) -> Self {
        WaveConfig {
            name: name.into(),
            grid,
            seed: None,
            rules: RuleTable::new(),
            auto_run: true,
            sprite_sheet,
            starting_index: None,
            step_delay_ms: 0,
        }
    }

    pub fn from_json(json: &str) -> Result<Self, WfcError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_rules(mut self, rules: RuleTable) -> Self {
        self.rules = rules;
        self
    }

    pub fn with_starting_index(mut self, index: usize) -> Self {
        self.starting_index = Some(index);
        self
    }

    pub fn manual(mut self) -> Self {
        self.auto_run = false;
        self
    }

    pub fn with_step_delay(mut self, delay: Duration) -> Self {
        self.step_delay_ms = delay.as_millis() as u64;
        self
    }

    pub fn step_delay(&self) -> Duration {
        Duration::from_millis(self.step_delay_ms)
    }
}
