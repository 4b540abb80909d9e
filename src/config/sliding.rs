//! Configuration for sliding.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Configuration for sliding.
#[derive(Reflect, Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct SlidingConfig {
    /// Speed cap while sliding down a slope or falling.
    pub speed: f32,

    /// Speed cap while sliding on flat ground or moving upward.
    pub flat_speed: f32,

    /// Lateral steering force while sliding on a slope.
    pub force: f32,

    /// Body height used by the probes while sliding.
    pub height: f32,

    /// Vertical scale of the body while sliding (0.0-1.0].
    pub y_scale: f32,

    /// Rate at which the smoothed speed approaches its target.
    pub speed_increase_multiplier: f32,

    /// Extra smoothing rate applied on slopes, on top of `speed_increase_multiplier`.
    pub slope_increase_multiplier: f32,
}

impl Default for SlidingConfig {
    fn default() -> Self {
        Self {
            speed: 15.0,
            flat_speed: 13.0,
            force: 100.0,
            height: 1.0,
            y_scale: 0.5,
            speed_increase_multiplier: 4.0,
            slope_increase_multiplier: 2.0,
        }
    }
}
