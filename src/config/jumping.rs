//! Configuration for core jump mechanics.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Configuration for core jump mechanics.
#[derive(Reflect, Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct JumpingConfig {
    /// Upward impulse applied when jumping from flat ground.
    pub regular_force: f32,

    /// Upward impulse applied when jumping from a walkable slope.
    pub slope_force: f32,

    /// Seconds after a jump before another jump is accepted.
    /// Also the duration of the "exiting slope" window.
    pub cooldown: f32,
}

impl Default for JumpingConfig {
    fn default() -> Self {
        Self {
            regular_force: 11.0,
            slope_force: 12.0,
            cooldown: 0.2,
        }
    }
}
