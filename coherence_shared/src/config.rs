//! Configuration system.
//!
//! Interpolation settings are plain serde structs loaded from JSON strings
//! (file IO left to app). Missing fields fall back to defaults.

use serde::{Deserialize, Serialize};

use crate::interpolator::InterpolatorKind;

/// Default producer send rate in samples per second.
pub const DEFAULT_SAMPLE_RATE: f64 = 20.0;

/// How much extra delay to add on top of the sample history.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatencySettings {
    /// Multiplier applied to the measured network latency.
    #[serde(default = "default_network_latency_factor")]
    pub network_latency_factor: f64,
    /// Fixed safety margin in seconds.
    #[serde(default)]
    pub additional_latency: f64,
}

fn default_network_latency_factor() -> f64 {
    1.1
}

impl Default for LatencySettings {
    fn default() -> Self {
        Self {
            network_latency_factor: default_network_latency_factor(),
            additional_latency: 0.0,
        }
    }
}

/// Smoothing applied after interpolation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SmoothingSettings {
    /// Approximate time to reach the target, in seconds. 0 disables smoothing.
    #[serde(default)]
    pub smooth_time: f32,
    /// Maximum change per second.
    #[serde(default = "default_max_speed")]
    pub max_speed: f32,
}

fn default_max_speed() -> f32 {
    f32::MAX
}

impl Default for SmoothingSettings {
    fn default() -> Self {
        Self {
            smooth_time: 0.0,
            max_speed: default_max_speed(),
        }
    }
}

impl SmoothingSettings {
    pub fn is_enabled(&self) -> bool {
        self.smooth_time > 0.0
    }
}

/// Per-binding interpolation settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct InterpolationSettings {
    #[serde(default)]
    pub interpolator: InterpolatorKind,
    #[serde(default)]
    pub latency_settings: LatencySettings,
    #[serde(default)]
    pub smoothing: SmoothingSettings,
    /// Teleport threshold; a jump farther than this resets the binding.
    /// 0 disables teleport detection.
    #[serde(default)]
    pub max_distance: f32,
}

impl InterpolationSettings {
    /// Parses settings from JSON.
    pub fn from_json_str(s: &str) -> serde_json::Result<Self> {
        serde_json::from_str(s)
    }

    /// Whether values are passed through without any blending.
    pub fn is_interpolation_none(&self) -> bool {
        self.interpolator == InterpolatorKind::None
    }

    pub fn with_interpolator(mut self, interpolator: InterpolatorKind) -> Self {
        self.interpolator = interpolator;
        self
    }

    pub fn with_max_distance(mut self, max_distance: f32) -> Self {
        self.max_distance = max_distance;
        self
    }

    pub fn with_smoothing(mut self, smooth_time: f32, max_speed: f32) -> Self {
        self.smoothing = SmoothingSettings {
            smooth_time,
            max_speed,
        };
        self
    }
}
