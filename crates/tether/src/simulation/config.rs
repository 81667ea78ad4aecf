use serde::{Deserialize, Serialize};

use super::timestep::{FixedTimestep, DEFAULT_MAX_FRAME_TIME};
use crate::director::PlayerTuning;
use crate::frame::SceneConfig;

pub const DEFAULT_TICK_RATE: u32 = 60;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub tick_rate: u32,
    /// Seconds; longer frame deltas are clamped.
    pub max_frame_time: f64,
    /// Seconds of past ticks kept in the history ring.
    pub history_duration: f64,
    pub scene: SceneConfig,
    pub player: PlayerTuning,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            tick_rate: DEFAULT_TICK_RATE,
            max_frame_time: DEFAULT_MAX_FRAME_TIME,
            history_duration: 0.25,
            scene: SceneConfig::default(),
            player: PlayerTuning::default(),
        }
    }
}

impl SimulationConfig {
    pub fn timestep(&self) -> FixedTimestep {
        FixedTimestep::from_tick_rate(self.tick_rate).with_max_frame_time(self.max_frame_time)
    }
}
