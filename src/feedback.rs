//! Camera and landing-effect collaborator contract.
//!
//! The controller does not animate anything itself. It writes messages that an
//! external camera rig and effect spawner read; those own all timing and easing.

use bevy::prelude::*;

use crate::config::FeedbackConfig;
use crate::detection::WallSide;

/// A request to the camera rig.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CameraCommand {
    /// Ease the field of view (degrees) over `duration` seconds.
    FieldOfView { target: f32, duration: f32 },
    /// Ease the roll (degrees, negative tilts left) over `duration` seconds.
    Tilt { degrees: f32, duration: f32 },
    /// Play a landing dip.
    Landing { duration: f32, strength: f32 },
}

/// Message written when the camera of `entity` should react.
#[derive(Message, Debug, Clone, Copy, PartialEq)]
pub struct CameraFeedback {
    /// The character the camera belongs to.
    pub entity: Entity,
    pub command: CameraCommand,
}

/// Message written when a landing effect should be spawned at `position`.
///
/// Fire-and-forget; nothing waits on the spawn.
#[derive(Message, Debug, Clone, Copy, PartialEq)]
pub struct LandingEffectRequested {
    pub entity: Entity,
    pub position: Vec3,
}

/// Camera commands for entering a wall run on `side`.
pub fn wall_run_entered(config: &FeedbackConfig, side: WallSide) -> [CameraCommand; 2] {
    [
        CameraCommand::FieldOfView {
            target: config.wall_run_fov,
            duration: config.transition,
        },
        wall_run_tilt(config, side),
    ]
}

/// Camera tilt toward the wall on `side`.
pub fn wall_run_tilt(config: &FeedbackConfig, side: WallSide) -> CameraCommand {
    CameraCommand::Tilt {
        degrees: config.wall_run_tilt * side.tilt_sign(),
        duration: config.transition,
    }
}

/// Camera commands for leaving a wall run.
pub fn wall_run_exited(config: &FeedbackConfig) -> [CameraCommand; 2] {
    [
        CameraCommand::FieldOfView {
            target: config.base_fov,
            duration: config.transition,
        },
        CameraCommand::Tilt {
            degrees: 0.0,
            duration: config.transition,
        },
    ]
}

/// Edge latch for landing feedback.
///
/// Fires once when the landing probe first reports contact while falling (or
/// resting) and not wall running, then stays quiet until contact is lost.
#[derive(Reflect, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LandingLatch {
    latched: bool,
}

impl LandingLatch {
    pub fn is_latched(&self) -> bool {
        self.latched
    }

    /// Returns `true` on the tick a landing happens.
    pub fn update(&mut self, contact: bool, vertical_velocity: f32, wall_running: bool) -> bool {
        if !contact {
            self.latched = false;
            return false;
        }
        if self.latched || vertical_velocity > 0.0 || wall_running {
            return false;
        }
        self.latched = true;
        true
    }
}

/// Camera command for a landing at `speed`, or `None` while sliding.
pub fn landing_command(config: &FeedbackConfig, speed: f32, sliding: bool) -> Option<CameraCommand> {
    if sliding {
        return None;
    }
    let strength = if speed < config.hard_landing_speed {
        config.soft_landing_strength
    } else {
        config.hard_landing_strength
    };
    Some(CameraCommand::Landing {
        duration: config.landing_duration,
        strength,
    })
}
