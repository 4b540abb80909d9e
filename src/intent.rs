//! Locomotion input component.
//!
//! The input source is polled once per frame by the game (keyboard, gamepad,
//! AI, replay) and written into [`LocomotionInput`]. The controller reads the
//! axes and button levels, and derives press/release edges by comparing against
//! the levels latched at the end of the previous decision tick.

use bevy::prelude::*;

const AXIS_DEADZONE: f32 = 0.001;

/// Per-frame movement input for a first-person character.
///
/// # Example
///
/// ```rust
/// use msg_fps_controller::prelude::*;
///
/// let mut input = LocomotionInput::new();
/// input.set_axes(1.0, 0.0);
/// input.set_crouch(true);
/// assert!(input.has_movement());
/// assert!(input.crouch_pressed());
///
/// input.latch();
/// assert!(!input.crouch_pressed());
/// assert!(input.crouch);
/// ```
#[derive(Component, Reflect, Debug, Clone, Copy, Default, PartialEq)]
#[reflect(Component)]
pub struct LocomotionInput {
    /// Forward/back axis (-1.0 = back, 1.0 = forward).
    pub forward: f32,
    /// Strafe axis (-1.0 = left, 1.0 = right).
    pub right: f32,
    /// Jump button held.
    pub jump: bool,
    /// Sprint button held.
    pub sprint: bool,
    /// Crouch button held.
    pub crouch: bool,
    /// Slide button held.
    pub slide: bool,

    previous_jump: bool,
    previous_crouch: bool,
    previous_slide: bool,
}

impl LocomotionInput {
    /// Create a new empty input.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set both movement axes, clamped to [-1, 1].
    pub fn set_axes(&mut self, forward: f32, right: f32) {
        self.forward = forward.clamp(-1.0, 1.0);
        self.right = right.clamp(-1.0, 1.0);
    }

    pub fn set_jump(&mut self, held: bool) {
        self.jump = held;
    }

    pub fn set_sprint(&mut self, held: bool) {
        self.sprint = held;
    }

    pub fn set_crouch(&mut self, held: bool) {
        self.crouch = held;
    }

    pub fn set_slide(&mut self, held: bool) {
        self.slide = held;
    }

    /// Zero the axes and release every button.
    pub fn clear(&mut self) {
        self.forward = 0.0;
        self.right = 0.0;
        self.jump = false;
        self.sprint = false;
        self.crouch = false;
        self.slide = false;
    }

    /// Whether either movement axis is active.
    pub fn has_movement(&self) -> bool {
        self.forward.abs() > AXIS_DEADZONE || self.right.abs() > AXIS_DEADZONE
    }

    /// Whether the forward axis points forward.
    pub fn is_moving_forward(&self) -> bool {
        self.forward > AXIS_DEADZONE
    }

    /// Whether the strafe axis points right (positive) or left (negative).
    pub fn strafe_sign(&self) -> f32 {
        if self.right > AXIS_DEADZONE {
            1.0
        } else if self.right < -AXIS_DEADZONE {
            -1.0
        } else {
            0.0
        }
    }

    pub fn jump_pressed(&self) -> bool {
        self.jump && !self.previous_jump
    }

    pub fn crouch_pressed(&self) -> bool {
        self.crouch && !self.previous_crouch
    }

    pub fn crouch_released(&self) -> bool {
        !self.crouch && self.previous_crouch
    }

    pub fn slide_pressed(&self) -> bool {
        self.slide && !self.previous_slide
    }

    pub fn slide_released(&self) -> bool {
        !self.slide && self.previous_slide
    }

    /// Remember the current button levels for edge detection on the next tick.
    pub fn latch(&mut self) {
        self.previous_jump = self.jump;
        self.previous_crouch = self.crouch;
        self.previous_slide = self.slide;
    }
}
