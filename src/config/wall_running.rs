//! Configuration for wall running and wall jumping.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Configuration for wall running and wall jumping.
#[derive(Reflect, Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct WallRunConfig {
    /// Speed cap while wall running.
    pub speed: f32,

    /// Force pushing the body along the wall.
    pub force: f32,

    /// Upward assist while wall running (scaled by the fixed timestep).
    pub upward_force: f32,

    /// Force pressing the body into the wall unless steering away from it.
    pub stick_force: f32,

    /// Length of the lateral wall probes.
    pub check_distance: f32,

    /// Extra clearance below the body required before a wall run may start.
    pub min_jump_height: f32,

    /// Upward component of the wall-jump impulse.
    pub jump_up_force: f32,

    /// Component of the wall-jump impulse along the wall normal.
    pub jump_side_force: f32,

    /// Duration (seconds) after a wall jump during which wall running is suppressed.
    pub exit_time: f32,
}

impl Default for WallRunConfig {
    fn default() -> Self {
        Self {
            speed: 10.0,
            force: 200.0,
            upward_force: 800.0,
            stick_force: 100.0,
            check_distance: 1.0,
            min_jump_height: 0.1,
            jump_up_force: 12.0,
            jump_side_force: 12.0,
            exit_time: 0.2,
        }
    }
}
