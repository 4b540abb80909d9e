//! Configuration for grounded and airborne movement.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Configuration for grounded and airborne movement.
#[derive(Reflect, Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct WalkingConfig {
    /// Speed cap while walking (units/second).
    pub walk_speed: f32,

    /// Speed cap while sprinting (units/second).
    pub sprint_speed: f32,

    /// Body height used by the probes while standing.
    pub walk_height: f32,

    /// Strength of the force opposing drift when there is no input.
    pub counter_movement: f32,

    /// Scales both movement and counter-movement forces while airborne.
    pub air_multiplier: f32,

    /// Additional scale on the airborne movement force only.
    pub air_speed_multiplier: f32,
}

impl Default for WalkingConfig {
    fn default() -> Self {
        Self {
            walk_speed: 6.0,
            sprint_speed: 10.0,
            walk_height: 2.0,
            counter_movement: 5.0,
            air_multiplier: 0.4,
            air_speed_multiplier: 0.5,
        }
    }
}
