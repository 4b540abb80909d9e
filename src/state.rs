//! Locomotion state machine.
//!
//! The active [`LocomotionState`] is derived from scratch every decision tick
//! from the probe results, the input and the current [`Posture`]. Only crouch
//! and slide are stored between ticks (as the posture), because they start and
//! stop on button edges rather than on levels.

use bevy::prelude::*;

use crate::config::MovementParameters;
use crate::detection::{ProbeResult, WallContact};
use crate::intent::LocomotionInput;

/// Vertical velocity below which a slide counts as heading downhill.
const SLIDE_DESCENT_VELOCITY: f32 = 0.1;

/// The six locomotion states. Exactly one is active at any tick.
#[derive(Reflect, Debug, Clone, Copy, Default, PartialEq)]
pub enum LocomotionState {
    #[default]
    Walking,
    Sprinting,
    Crouching,
    Sliding,
    /// Running along the given wall.
    WallRunning(WallContact),
    Airborne,
}

impl LocomotionState {
    pub fn is_wall_running(&self) -> bool {
        matches!(self, Self::WallRunning(_))
    }

    pub fn wall(&self) -> Option<WallContact> {
        match *self {
            Self::WallRunning(contact) => Some(contact),
            _ => None,
        }
    }

    /// Name of the state, without payload.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Walking => "walking",
            Self::Sprinting => "sprinting",
            Self::Crouching => "crouching",
            Self::Sliding => "sliding",
            Self::WallRunning(_) => "wall_running",
            Self::Airborne => "airborne",
        }
    }
}

/// Body posture. Crouch and slide are mutually exclusive by construction.
#[derive(Reflect, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Posture {
    #[default]
    Standing,
    Crouching,
    Sliding,
}

impl Posture {
    pub fn is_crouching(self) -> bool {
        self == Self::Crouching
    }

    pub fn is_sliding(self) -> bool {
        self == Self::Sliding
    }

    /// Vertical body scale for this posture. Standing restores `standing_scale`.
    pub fn y_scale(self, params: &MovementParameters, standing_scale: f32) -> f32 {
        match self {
            Self::Standing => standing_scale,
            Self::Crouching => params.crouching.y_scale,
            Self::Sliding => params.sliding.y_scale,
        }
    }

    /// Body height used by the probes.
    pub fn body_height(self, params: &MovementParameters) -> f32 {
        match self {
            Self::Standing => params.walking.walk_height,
            Self::Crouching => params.crouching.height,
            Self::Sliding => params.sliding.height,
        }
    }
}

/// Jump cooldown and the "exiting slope" window that follows a jump.
#[derive(Reflect, Debug, Clone, Copy, PartialEq)]
pub struct JumpState {
    ready: bool,
    remaining: f32,
    exiting_slope: bool,
}

impl Default for JumpState {
    fn default() -> Self {
        Self {
            ready: true,
            remaining: 0.0,
            exiting_slope: false,
        }
    }
}

impl JumpState {
    pub fn is_ready(&self) -> bool {
        self.ready
    }

    /// Whether the body is still leaving a slope after a jump.
    pub fn exiting_slope(&self) -> bool {
        self.exiting_slope
    }

    /// Mark a jump: block jumping for `cooldown` seconds and skip slope handling.
    pub fn start_cooldown(&mut self, cooldown: f32) {
        self.ready = false;
        self.remaining = cooldown;
        self.exiting_slope = true;
    }

    pub fn tick(&mut self, dt: f32) {
        if self.ready {
            return;
        }
        self.remaining -= dt;
        if self.remaining <= 0.0 {
            self.remaining = 0.0;
            self.ready = true;
            self.exiting_slope = false;
        }
    }
}

/// Timed suppression of wall running after a wall jump.
#[derive(Reflect, Debug, Clone, Copy, Default, PartialEq)]
pub struct WallExitGrace {
    active: bool,
    remaining: f32,
}

impl WallExitGrace {
    /// Open the window for the full `duration`.
    pub fn begin(&mut self, duration: f32) {
        self.active = true;
        self.remaining = duration;
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn remaining(&self) -> f32 {
        self.remaining
    }

    /// Count down; the window closes once the remaining time reaches zero.
    pub fn tick(&mut self, dt: f32) {
        if !self.active {
            return;
        }
        self.remaining = (self.remaining - dt).max(0.0);
        if self.remaining <= 0.0 {
            self.active = false;
        }
    }
}

/// Everything the state machine looks at for one tick.
#[derive(Debug, Clone, Copy)]
pub struct StateInputs<'a> {
    pub params: &'a MovementParameters,
    pub probes: &'a ProbeResult,
    pub input: &'a LocomotionInput,
    pub posture: Posture,
    pub vertical_velocity: f32,
    pub exiting_wall: bool,
}

/// Result of a state evaluation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transition {
    pub state: LocomotionState,
    /// New desired speed. `None` keeps the previous target (airborne).
    pub desired_speed: Option<f32>,
}

/// Whether a wall run may be active this tick.
pub fn can_wall_run(inputs: &StateInputs) -> Option<WallContact> {
    if !inputs.params.abilities.wall_run
        || !inputs.input.is_moving_forward()
        || !inputs.probes.above_ground
        || inputs.exiting_wall
    {
        return None;
    }
    inputs.probes.wall()
}

/// Derive the locomotion state and its desired speed.
///
/// Priority: crouching, sliding, sprinting, wall running, walking, airborne.
pub fn evaluate(inputs: &StateInputs) -> Transition {
    let params = inputs.params;
    let probes = inputs.probes;

    if params.abilities.crouch && inputs.posture.is_crouching() {
        return Transition {
            state: LocomotionState::Crouching,
            desired_speed: Some(params.crouching.speed),
        };
    }

    if params.abilities.slide && inputs.posture.is_sliding() {
        let descending = (probes.on_slope() || !probes.grounded)
            && inputs.vertical_velocity < SLIDE_DESCENT_VELOCITY;
        let speed = if descending {
            params.sliding.speed
        } else {
            params.sliding.flat_speed
        };
        return Transition {
            state: LocomotionState::Sliding,
            desired_speed: Some(speed),
        };
    }

    if params.abilities.sprint && probes.grounded && inputs.input.sprint {
        return Transition {
            state: LocomotionState::Sprinting,
            desired_speed: Some(params.walking.sprint_speed),
        };
    }

    if let Some(contact) = can_wall_run(inputs) {
        return Transition {
            state: LocomotionState::WallRunning(contact),
            desired_speed: Some(params.wall_run.speed),
        };
    }

    if probes.grounded {
        return Transition {
            state: LocomotionState::Walking,
            desired_speed: Some(params.walking.walk_speed),
        };
    }

    Transition {
        state: LocomotionState::Airborne,
        desired_speed: None,
    }
}
