//! Configuration for the probe rays and layers.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Configuration for the probe rays and layers.
///
/// Ray lengths are derived from the current body height; these values are the
/// fixed extensions added on top of `height / 2`.
#[derive(Reflect, Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct SensorConfig {
    /// Radius of the ground-contact sphere placed at the feet.
    pub ground_sphere_radius: f32,

    /// Slope ray length beyond the feet.
    pub slope_ray_extension: f32,

    /// Landing ray length beyond the feet.
    pub landing_ray_extension: f32,

    /// Layer bits considered ground.
    pub ground_layers: u32,

    /// Layer bits considered wall.
    pub wall_layers: u32,
}

impl Default for SensorConfig {
    fn default() -> Self {
        Self {
            ground_sphere_radius: 0.2,
            slope_ray_extension: 0.2,
            landing_ray_extension: 0.8,
            ground_layers: 1 << 1,
            wall_layers: 1 << 2,
        }
    }
}
