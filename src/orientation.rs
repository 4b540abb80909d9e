//! Body orientation decoupled from camera pitch.
//!
//! Movement directions come from yaw only, so looking up or down never tilts
//! the movement plane. The camera collaborator owns pitch smoothing; this
//! component just stores the result.

use bevy::prelude::*;

/// Yaw and pitch of a first-person character (radians).
#[derive(Component, Reflect, Debug, Clone, Copy, Default, PartialEq)]
#[reflect(Component)]
pub struct LookOrientation {
    /// Rotation around the world up axis. Zero faces -Z.
    pub yaw: f32,
    /// Camera pitch, clamped to [-π/2, π/2].
    pub pitch: f32,
}

impl LookOrientation {
    pub fn new(yaw: f32, pitch: f32) -> Self {
        let mut orientation = Self { yaw, pitch: 0.0 };
        orientation.set_pitch(pitch);
        orientation
    }

    /// Apply a look delta (radians). Pitch is clamped to straight up/down.
    pub fn rotate(&mut self, delta_yaw: f32, delta_pitch: f32) {
        self.yaw += delta_yaw;
        self.set_pitch(self.pitch + delta_pitch);
    }

    pub fn set_pitch(&mut self, pitch: f32) {
        use std::f32::consts::FRAC_PI_2;
        self.pitch = pitch.clamp(-FRAC_PI_2, FRAC_PI_2);
    }

    /// Rotation of the movement basis (yaw only).
    pub fn body_rotation(&self) -> Quat {
        Quat::from_rotation_y(self.yaw)
    }

    /// Rotation of the camera (yaw then pitch).
    pub fn camera_rotation(&self) -> Quat {
        Quat::from_euler(EulerRot::YXZ, self.yaw, self.pitch, 0.0)
    }

    /// Horizontal forward direction.
    pub fn forward(&self) -> Vec3 {
        self.body_rotation() * Vec3::NEG_Z
    }

    /// Horizontal right direction.
    pub fn right(&self) -> Vec3 {
        self.body_rotation() * Vec3::X
    }

    /// World-space move direction for the given input axes (not normalized).
    pub fn move_direction(&self, forward: f32, right: f32) -> Vec3 {
        self.forward() * forward + self.right() * right
    }
}
