//! Timestamped binding samples and simulation frame time.

use serde::{Deserialize, Serialize};

/// Fixed simulation rate used to convert frame numbers into seconds.
pub const SIMULATION_FRAMES_PER_SECOND: f64 = 60.0;

/// One timestamped observation of a binding's value.
///
/// `stopped` marks that the producer paused sending after this sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sample<T> {
    pub value: T,
    pub stopped: bool,
    pub time: f64,
}

impl<T> Sample<T> {
    pub fn new(value: T, stopped: bool, time: f64) -> Self {
        Self {
            value,
            stopped,
            time,
        }
    }
}

/// Simulation frame number as sent by the authority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SimulationFrame(pub i64);

impl SimulationFrame {
    /// Frame marker for samples replayed from a cache with no usable timestamp.
    pub const INVALID: SimulationFrame = SimulationFrame(i64::MIN);

    pub fn new(frame: i64) -> Self {
        SimulationFrame(frame)
    }

    pub fn is_valid(&self) -> bool {
        *self != Self::INVALID
    }

    /// Frame start in seconds.
    pub fn to_time(self) -> f64 {
        self.0 as f64 / SIMULATION_FRAMES_PER_SECOND
    }

    /// Nearest frame to `time` seconds.
    pub fn from_time(time: f64) -> Self {
        SimulationFrame((time * SIMULATION_FRAMES_PER_SECOND).round() as i64)
    }
}
