//! Configuration for crouching.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Configuration for crouching.
#[derive(Reflect, Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct CrouchingConfig {
    /// Speed cap while crouched (units/second).
    pub speed: f32,

    /// Vertical scale of the body while crouched (0.0-1.0].
    pub y_scale: f32,

    /// Body height used by the probes while crouched.
    pub height: f32,
}

impl Default for CrouchingConfig {
    fn default() -> Self {
        Self {
            speed: 3.0,
            y_scale: 0.5,
            height: 1.0,
        }
    }
}
