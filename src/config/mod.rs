//! Movement parameters.
//!
//! [`MovementParameters`] is the flat set of tunables read by every system of the
//! controller. It is set once when the character is spawned and treated as
//! read-only afterwards. Each concern lives in its own struct so presets can
//! override a single area without repeating the rest.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

mod crouching;
mod feedback;
mod jumping;
mod sensors;
mod sliding;
mod slope;
mod walking;
mod wall_running;

pub use crouching::CrouchingConfig;
pub use feedback::FeedbackConfig;
pub use jumping::JumpingConfig;
pub use sensors::SensorConfig;
pub use sliding::SlidingConfig;
pub use slope::SlopeConfig;
pub use walking::WalkingConfig;
pub use wall_running::WallRunConfig;

/// Individually switchable movement abilities.
#[derive(Reflect, Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(default)]
pub struct Abilities {
    pub sprint: bool,
    pub crouch: bool,
    pub slide: bool,
    pub wall_run: bool,
}

impl Default for Abilities {
    fn default() -> Self {
        Self {
            sprint: true,
            crouch: true,
            slide: true,
            wall_run: true,
        }
    }
}

impl Abilities {
    /// Only walking and jumping.
    pub fn none() -> Self {
        Self {
            sprint: false,
            crouch: false,
            slide: false,
            wall_run: false,
        }
    }
}

/// Reasons a [`MovementParameters`] value is rejected.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("`{field}` must be finite, got {value}")]
    NotFinite { field: &'static str, value: f32 },

    #[error("`{field}` must not be negative, got {value}")]
    Negative { field: &'static str, value: f32 },

    #[error("`{field}` must be in (0, 1], got {value}")]
    ScaleOutOfRange { field: &'static str, value: f32 },

    #[error("`slope.max_angle` must be in (0, 90) degrees, got {0}")]
    SlopeAngleOutOfRange(f32),

    #[error("`{field}` must be greater than zero, got {value}")]
    NotPositive { field: &'static str, value: f32 },
}

/// Complete configuration of a first-person locomotion controller.
///
/// # Example
///
/// ```rust
/// use msg_fps_controller::prelude::*;
///
/// let params = MovementParameters::default()
///     .with_walk_speed(5.0)
///     .with_abilities(Abilities { wall_run: false, ..Default::default() });
/// assert!(params.validate().is_ok());
/// ```
#[derive(Component, Reflect, Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Default)]
#[reflect(Component)]
#[serde(default)]
pub struct MovementParameters {
    pub abilities: Abilities,
    pub walking: WalkingConfig,
    pub jumping: JumpingConfig,
    pub crouching: CrouchingConfig,
    pub sliding: SlidingConfig,
    pub wall_run: WallRunConfig,
    pub slope: SlopeConfig,
    pub sensors: SensorConfig,
    pub feedback: FeedbackConfig,
}

impl MovementParameters {
    /// Check every tunable for values the controller cannot work with.
    ///
    /// Returns the first problem found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let non_negative = [
            ("walking.walk_speed", self.walking.walk_speed),
            ("walking.sprint_speed", self.walking.sprint_speed),
            ("walking.counter_movement", self.walking.counter_movement),
            ("walking.air_multiplier", self.walking.air_multiplier),
            ("walking.air_speed_multiplier", self.walking.air_speed_multiplier),
            ("jumping.regular_force", self.jumping.regular_force),
            ("jumping.slope_force", self.jumping.slope_force),
            ("jumping.cooldown", self.jumping.cooldown),
            ("crouching.speed", self.crouching.speed),
            ("sliding.speed", self.sliding.speed),
            ("sliding.flat_speed", self.sliding.flat_speed),
            ("sliding.force", self.sliding.force),
            ("wall_run.speed", self.wall_run.speed),
            ("wall_run.force", self.wall_run.force),
            ("wall_run.upward_force", self.wall_run.upward_force),
            ("wall_run.stick_force", self.wall_run.stick_force),
            ("wall_run.check_distance", self.wall_run.check_distance),
            ("wall_run.min_jump_height", self.wall_run.min_jump_height),
            ("wall_run.exit_time", self.wall_run.exit_time),
            ("slope.speed", self.slope.speed),
            ("slope.stick_force", self.slope.stick_force),
            ("sensors.ground_sphere_radius", self.sensors.ground_sphere_radius),
            ("sensors.slope_ray_extension", self.sensors.slope_ray_extension),
            ("sensors.landing_ray_extension", self.sensors.landing_ray_extension),
            ("feedback.landing_duration", self.feedback.landing_duration),
            ("feedback.transition", self.feedback.transition),
        ];
        for (field, value) in non_negative {
            if !value.is_finite() {
                return Err(ConfigError::NotFinite { field, value });
            }
            if value < 0.0 {
                return Err(ConfigError::Negative { field, value });
            }
        }

        let positive = [
            ("walking.walk_height", self.walking.walk_height),
            ("crouching.height", self.crouching.height),
            ("sliding.height", self.sliding.height),
            ("sliding.speed_increase_multiplier", self.sliding.speed_increase_multiplier),
            ("sliding.slope_increase_multiplier", self.sliding.slope_increase_multiplier),
        ];
        for (field, value) in positive {
            if !value.is_finite() {
                return Err(ConfigError::NotFinite { field, value });
            }
            if value <= 0.0 {
                return Err(ConfigError::NotPositive { field, value });
            }
        }

        for (field, value) in [
            ("crouching.y_scale", self.crouching.y_scale),
            ("sliding.y_scale", self.sliding.y_scale),
        ] {
            if !(value > 0.0 && value <= 1.0) {
                return Err(ConfigError::ScaleOutOfRange { field, value });
            }
        }

        let max_angle = self.slope.max_angle;
        if !(max_angle > 0.0 && max_angle < 90.0) {
            return Err(ConfigError::SlopeAngleOutOfRange(max_angle));
        }

        Ok(())
    }

    /// Builder: set the enabled abilities.
    pub fn with_abilities(mut self, abilities: Abilities) -> Self {
        self.abilities = abilities;
        self
    }

    /// Builder: set walk speed.
    pub fn with_walk_speed(mut self, speed: f32) -> Self {
        self.walking.walk_speed = speed;
        self
    }

    /// Builder: set sprint speed.
    pub fn with_sprint_speed(mut self, speed: f32) -> Self {
        self.walking.sprint_speed = speed;
        self
    }

    /// Builder: set the counter-movement coefficient.
    pub fn with_counter_movement(mut self, factor: f32) -> Self {
        self.walking.counter_movement = factor;
        self
    }

    /// Builder: set jump impulses for flat ground and slopes.
    pub fn with_jump_forces(mut self, regular: f32, slope: f32) -> Self {
        self.jumping.regular_force = regular;
        self.jumping.slope_force = slope;
        self
    }

    /// Builder: set jump cooldown.
    pub fn with_jump_cooldown(mut self, cooldown: f32) -> Self {
        self.jumping.cooldown = cooldown;
        self
    }

    /// Builder: set the steepest walkable slope (degrees).
    pub fn with_max_slope_angle(mut self, degrees: f32) -> Self {
        self.slope.max_angle = degrees;
        self
    }

    /// Builder: set the wall-run exit grace window.
    pub fn with_wall_exit_time(mut self, seconds: f32) -> Self {
        self.wall_run.exit_time = seconds;
        self
    }

    /// Builder: set probe layer bits for ground and walls.
    pub fn with_layers(mut self, ground: u32, wall: u32) -> Self {
        self.sensors.ground_layers = ground;
        self.sensors.wall_layers = wall;
        self
    }

    /// Builder: enable or disable landing feedback.
    pub fn with_landing_feedback(mut self, enabled: bool) -> Self {
        self.feedback.landing_enabled = enabled;
        self
    }
}
