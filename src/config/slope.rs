//! Configuration for slope handling.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Configuration for slope handling.
#[derive(Reflect, Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct SlopeConfig {
    /// Movement force scale along a walkable slope.
    pub speed: f32,

    /// Steepest walkable slope (degrees). Steeper ground pushes the body down.
    pub max_angle: f32,

    /// Scale of the force pressing the body onto the slope.
    pub stick_force: f32,
}

impl Default for SlopeConfig {
    fn default() -> Self {
        Self {
            speed: 9.0,
            max_angle: 45.0,
            stick_force: 30.0,
        }
    }
}
