//! Configuration for camera and landing feedback.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Configuration for camera and landing feedback.
#[derive(Reflect, Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct FeedbackConfig {
    /// Whether landings produce an effect and camera feedback.
    pub landing_enabled: bool,

    /// Speed at or above which a landing counts as hard.
    pub hard_landing_speed: f32,

    /// Duration of the landing camera feedback.
    pub landing_duration: f32,

    /// Landing strength below `hard_landing_speed`.
    pub soft_landing_strength: f32,

    /// Landing strength at or above `hard_landing_speed`.
    pub hard_landing_strength: f32,

    /// Field of view outside of wall runs.
    pub base_fov: f32,

    /// Field of view while wall running.
    pub wall_run_fov: f32,

    /// Camera roll (degrees) toward the open side while wall running.
    pub wall_run_tilt: f32,

    /// Duration of field-of-view and tilt transitions.
    pub transition: f32,
}

impl Default for FeedbackConfig {
    fn default() -> Self {
        Self {
            landing_enabled: true,
            hard_landing_speed: 11.0,
            landing_duration: 0.4,
            soft_landing_strength: 0.3,
            hard_landing_strength: 0.8,
            base_fov: 80.0,
            wall_run_fov: 90.0,
            wall_run_tilt: 5.0,
            transition: 0.25,
        }
    }
}
