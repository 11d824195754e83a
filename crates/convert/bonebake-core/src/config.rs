//! Conversion configuration for bonebake-core.

use serde::{Deserialize, Serialize};

/// Source units per engine unit used by Cocos Studio exports.
pub const DEFAULT_SCALE_FACTOR: f32 = 100.0;
/// Frames per second of Cocos Studio timelines.
pub const DEFAULT_SAMPLE_RATE: f32 = 60.0;

/// Angular unit written into rotation curves and rest transforms.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AngleUnit {
    #[default]
    Degrees,
    Radians,
}

impl AngleUnit {
    /// Convert a source angle (radians) into this unit.
    #[inline]
    pub fn from_radians(self, radians: f32) -> f32 {
        match self {
            AngleUnit::Degrees => radians.to_degrees(),
            AngleUnit::Radians => radians,
        }
    }
}

/// Knobs for a conversion run. Defaults match the Cocos Studio export conventions.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConvertConfig {
    /// Positions and depth offsets are divided by this factor.
    pub scale_factor: f32,
    /// Frame rate (Hz) mapping frame indices to seconds.
    pub sample_rate: f32,
    pub angle_unit: AngleUnit,
    /// Bake animations, and the tracks inside each animation, on the rayon pool.
    pub parallel: bool,
}

impl Default for ConvertConfig {
    fn default() -> Self {
        Self {
            scale_factor: DEFAULT_SCALE_FACTOR,
            sample_rate: DEFAULT_SAMPLE_RATE,
            angle_unit: AngleUnit::Degrees,
            parallel: false,
        }
    }
}

impl ConvertConfig {
    /// Sample rate with non-finite or non-positive values replaced by the default.
    pub fn effective_sample_rate(&self) -> f32 {
        if self.sample_rate.is_finite() && self.sample_rate > 0.0 {
            self.sample_rate
        } else {
            DEFAULT_SAMPLE_RATE
        }
    }

    /// Scale factor with non-finite or zero values replaced by the default.
    pub fn effective_scale_factor(&self) -> f32 {
        if self.scale_factor.is_finite() && self.scale_factor != 0.0 {
            self.scale_factor
        } else {
            DEFAULT_SCALE_FACTOR
        }
    }

    /// Seconds at which `frame` is sampled.
    #[inline]
    pub fn frame_time(&self, frame: u32) -> f32 {
        frame as f32 / self.effective_sample_rate()
    }

    /// Convert a source length into engine units.
    #[inline]
    pub fn to_engine_units(&self, source: f32) -> f32 {
        source / self.effective_scale_factor()
    }
}
