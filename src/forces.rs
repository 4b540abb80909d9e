//! Force generation.
//!
//! [`generate`] turns one tick's probes, state and input into a [`ForcePlan`]:
//! the continuous force and acceleration to apply during the next physics step
//! plus any side effect on the speed target. It is a pure function; the
//! physics systems apply the plan through the backend.
//!
//! Jump and wall-jump impulses are one-shot and run on the decision tick, see
//! [`jump_impulse`] and [`wall_jump_impulse`].

use bevy::prelude::*;

use crate::config::MovementParameters;
use crate::detection::{project_on_plane, GroundSurface, ProbeResult, WallContact};
use crate::intent::LocomotionInput;
use crate::orientation::LookOrientation;
use crate::state::LocomotionState;

/// Slope-follow force per unit of slope speed.
const SLOPE_FOLLOW_SCALE: f32 = 20.0;
/// Slope-stick force per unit of stick force.
const SLOPE_STICK_SCALE: f32 = 10.0;
/// Extra downward acceleration per unit of stick force on steep ground.
const STEEP_SLIDE_SCALE: f32 = 30.0;
/// Downhill push while sliding on a slope, per second of fixed step.
const SLIDE_DOWNHILL_FORCE: f32 = 1500.0;
/// Share of the slide force available for steering on a slope.
const SLIDE_STEER_SCALE: f32 = 0.2;
/// Movement force per unit of current speed.
const MOVE_FORCE_SCALE: f32 = 10.0;
/// Flat slide deceleration scale.
const SLIDE_BRAKE_SCALE: f32 = 400.0;
/// Flat slide deceleration ramps over this speed range.
const SLIDE_BRAKE_SPEED_RANGE: f32 = 30.0;
/// Below this speed a flat slide switches to the idle counter-movement.
const SLIDE_STOP_SPEED: f32 = 2.0;

/// The force-application branch for one physics tick.
///
/// Exactly one branch runs per tick.
#[derive(Reflect, Debug, Clone, Copy, PartialEq)]
pub enum ForceBranch {
    /// Standing on ground of the given shape.
    Grounded(GroundSurface),
    /// Running along a wall.
    WallRunning(WallContact),
    Airborne,
}

impl ForceBranch {
    pub fn select(probes: &ProbeResult, state: &LocomotionState) -> Self {
        if probes.grounded {
            Self::Grounded(probes.surface)
        } else if let Some(contact) = state.wall() {
            Self::WallRunning(contact)
        } else {
            Self::Airborne
        }
    }
}

/// Side effect of a force plan on the speed target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SpeedEffect {
    /// Snap current and desired speed (moving up a slope).
    ResetTo(f32),
    /// Cancel smoothing and fall back to this desired speed (idle counter-movement).
    CancelTo(f32),
}

/// Forces for one physics tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ForcePlan {
    pub branch: ForceBranch,
    /// Continuous force (mass-dependent).
    pub force: Vec3,
    /// Continuous acceleration (mass-independent).
    pub acceleration: Vec3,
    pub speed_effect: Option<SpeedEffect>,
}

impl ForcePlan {
    fn new(branch: ForceBranch) -> Self {
        Self {
            branch,
            force: Vec3::ZERO,
            acceleration: Vec3::ZERO,
            speed_effect: None,
        }
    }

    /// Total force for a body of `mass`.
    pub fn total_force(&self, mass: f32) -> Vec3 {
        self.force + self.acceleration * mass
    }
}

/// Everything the force generator reads for one physics tick.
#[derive(Debug, Clone, Copy)]
pub struct ForceContext<'a> {
    pub params: &'a MovementParameters,
    pub probes: &'a ProbeResult,
    pub state: &'a LocomotionState,
    pub input: &'a LocomotionInput,
    pub orientation: &'a LookOrientation,
    pub sliding: bool,
    pub exiting_slope: bool,
    pub velocity: Vec3,
    pub gravity: Vec3,
    pub current_speed: f32,
    pub fixed_dt: f32,
    pub up: Vec3,
}

impl ForceContext<'_> {
    /// Input direction in world space. Forward input is ignored while sliding
    /// down a slope.
    pub fn move_direction(&self) -> Vec3 {
        let forward = if self.sliding && self.probes.on_slope() {
            0.0
        } else {
            self.input.forward
        };
        self.orientation.move_direction(forward, self.input.right)
    }
}

/// Compute the forces for one physics tick.
pub fn generate(ctx: &ForceContext) -> ForcePlan {
    let branch = ForceBranch::select(ctx.probes, ctx.state);
    let mut plan = ForcePlan::new(branch);

    match branch {
        ForceBranch::Grounded(GroundSurface::Slope { normal, .. }) if !ctx.exiting_slope => {
            slope_forces(ctx, normal, &mut plan);
        }
        ForceBranch::Grounded(GroundSurface::Steep { normal, .. }) if !ctx.exiting_slope => {
            steep_forces(ctx, normal, &mut plan);
        }
        ForceBranch::Grounded(_) => flat_forces(ctx, &mut plan),
        ForceBranch::WallRunning(contact) => wall_run_forces(ctx, contact, &mut plan),
        ForceBranch::Airborne => air_forces(ctx, &mut plan),
    }

    plan
}

fn slope_forces(ctx: &ForceContext, normal: Vec3, plan: &mut ForcePlan) {
    let params = ctx.params;

    if ctx.sliding {
        plan.force += -ctx.up * ctx.fixed_dt * SLIDE_DOWNHILL_FORCE;
        let strafe = ctx.input.strafe_sign();
        if strafe != 0.0 {
            let lateral = project_on_plane(ctx.orientation.right() * ctx.input.right, normal);
            plan.force += lateral * params.sliding.force * SLIDE_STEER_SCALE;
        }
    } else {
        let direction = project_on_plane(ctx.move_direction(), normal);
        plan.force += direction * params.slope.speed * SLOPE_FOLLOW_SCALE;
        if direction.y > 0.0 {
            plan.speed_effect = Some(SpeedEffect::ResetTo(params.walking.walk_speed));
        }
    }

    plan.acceleration += -ctx.gravity;
    plan.force += -normal * params.slope.stick_force * SLOPE_STICK_SCALE;

    if !ctx.sliding && !ctx.input.has_movement() {
        counter_movement(ctx, params.walking.counter_movement, plan);
    }
}

fn steep_forces(ctx: &ForceContext, normal: Vec3, plan: &mut ForcePlan) {
    let params = ctx.params;
    plan.acceleration += -ctx.up * params.slope.stick_force * STEEP_SLIDE_SCALE;
    plan.force += -normal * params.slope.stick_force * SLOPE_STICK_SCALE;

    if !ctx.sliding && !ctx.input.has_movement() {
        counter_movement(ctx, params.walking.counter_movement, plan);
    }
}

fn flat_forces(ctx: &ForceContext, plan: &mut ForcePlan) {
    let walking = &ctx.params.walking;

    if !ctx.sliding {
        plan.force += ctx.move_direction().normalize_or_zero() * ctx.current_speed * MOVE_FORCE_SCALE;
    } else {
        let speed = ctx.velocity.length();
        let t = (speed / SLIDE_BRAKE_SPEED_RANGE).clamp(0.0, 1.0);
        let brake = 0.2 + (0.25 - 0.2) * t;
        plan.force += -ctx.velocity.normalize_or_zero()
            * brake
            * walking.counter_movement
            * ctx.fixed_dt
            * SLIDE_BRAKE_SCALE;

        if speed < SLIDE_STOP_SPEED {
            counter_movement(ctx, walking.counter_movement, plan);
        }
        return;
    }

    if !ctx.input.has_movement() {
        counter_movement(ctx, walking.counter_movement, plan);
    }
}

/// Oppose horizontal drift and drop back to walking speed.
fn counter_movement(ctx: &ForceContext, factor: f32, plan: &mut ForcePlan) {
    plan.force += horizontal(-ctx.velocity * factor);
    plan.speed_effect = Some(SpeedEffect::CancelTo(ctx.params.walking.walk_speed));
}

fn wall_run_forces(ctx: &ForceContext, contact: WallContact, plan: &mut ForcePlan) {
    let wall_run = &ctx.params.wall_run;
    let direction = contact.run_direction(ctx.up, ctx.orientation.forward());

    plan.force += direction * wall_run.force;
    plan.force += ctx.up * wall_run.upward_force * ctx.fixed_dt;

    if !contact.steering_away(ctx.input.strafe_sign()) {
        plan.force += -contact.normal * wall_run.stick_force;
    }
}

fn air_forces(ctx: &ForceContext, plan: &mut ForcePlan) {
    let walking = &ctx.params.walking;

    plan.force += ctx.move_direction().normalize_or_zero()
        * ctx.current_speed
        * MOVE_FORCE_SCALE
        * walking.air_multiplier
        * walking.air_speed_multiplier;

    if !ctx.input.has_movement() {
        plan.force += horizontal(-ctx.velocity * walking.counter_movement * walking.air_multiplier);
    }
}

fn horizontal(v: Vec3) -> Vec3 {
    Vec3::new(v.x, 0.0, v.z)
}

/// Why a ground jump did not happen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JumpRejection {
    NotRequested,
    CoolingDown,
    NotGrounded,
    WallRunning,
    /// Sliding on flat ground.
    Sliding,
    /// Sliding on a slope while looking up it.
    SlopeLaunch,
}

/// Ground jump request for one decision tick.
#[derive(Debug, Clone, Copy)]
pub struct JumpRequest<'a> {
    pub params: &'a MovementParameters,
    pub probes: &'a ProbeResult,
    pub state: &'a LocomotionState,
    pub orientation: &'a LookOrientation,
    pub held: bool,
    pub ready: bool,
    pub sliding: bool,
    pub up: Vec3,
}

/// Impulse for a ground jump, or the reason it was rejected.
///
/// The caller zeroes vertical velocity before applying the impulse and starts
/// the cooldown.
pub fn jump_impulse(request: &JumpRequest) -> Result<Vec3, JumpRejection> {
    if !request.held {
        return Err(JumpRejection::NotRequested);
    }
    if !request.ready {
        return Err(JumpRejection::CoolingDown);
    }
    if !request.probes.grounded {
        return Err(JumpRejection::NotGrounded);
    }
    if request.state.is_wall_running() {
        return Err(JumpRejection::WallRunning);
    }

    let jumping = &request.params.jumping;
    match request.probes.surface {
        GroundSurface::Slope { normal, .. } => {
            if request.sliding {
                let look = project_on_plane(request.orientation.forward(), normal);
                if look.y > 0.0 {
                    return Err(JumpRejection::SlopeLaunch);
                }
            }
            Ok(request.up * jumping.slope_force)
        }
        _ if request.sliding => Err(JumpRejection::Sliding),
        _ => Ok(request.up * jumping.regular_force),
    }
}

/// Impulse for a jump off the given wall.
pub fn wall_jump_impulse(params: &MovementParameters, contact: &WallContact, up: Vec3) -> Vec3 {
    up * params.wall_run.jump_up_force + contact.normal * params.wall_run.jump_side_force
}

/// Remove the vertical component of a velocity.
pub fn without_vertical(velocity: Vec3, up: Vec3) -> Vec3 {
    velocity - up * velocity.dot(up)
}
