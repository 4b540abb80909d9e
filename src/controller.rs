//! The locomotion controller component and its systems.
//!
//! Two cadences drive a controller:
//!
//! - the **decision tick** (`Update`): posture edges, state machine, jumps,
//!   wall jumps, speed target, camera and landing feedback;
//! - the **physics tick** (`FixedUpdate`): force generation and velocity
//!   limiting.
//!
//! Both read the same [`ProbeResult`] written by the backend's sensor systems.
//! The systems are generic over the physics backend and talk to the physics
//! world only through [`LocomotionBackend`].

use bevy::prelude::*;

use crate::backend::LocomotionBackend;
use crate::config::MovementParameters;
use crate::detection::ProbeResult;
use crate::feedback::{
    landing_command, wall_run_entered, wall_run_exited, wall_run_tilt, CameraCommand,
    CameraFeedback, LandingEffectRequested, LandingLatch,
};
use crate::forces::{
    generate, jump_impulse, wall_jump_impulse, without_vertical, ForceContext, ForcePlan,
    JumpRequest, SpeedEffect,
};
use crate::intent::LocomotionInput;
use crate::orientation::LookOrientation;
use crate::speed::{clamp_velocity, smoothing_rate, SpeedController};
use crate::state::{evaluate, JumpState, LocomotionState, Posture, StateInputs, WallExitGrace};

/// World up axis.
pub const UP: Vec3 = Vec3::Y;

/// Downward impulse applied when the body shrinks while grounded.
const POSTURE_DOWN_IMPULSE: f32 = 5.0;

/// Runtime state of a first-person locomotion controller.
///
/// Spawn it with a [`MovementParameters`], a [`LocomotionInput`] and a
/// [`LookOrientation`] (inserted with defaults when missing) plus the physics
/// components of the chosen backend.
#[derive(Component, Reflect, Debug, Clone, PartialEq)]
#[reflect(Component)]
#[require(MovementParameters, LocomotionInput, LookOrientation)]
pub struct LocomotionController {
    /// Probe results for the current tick, written by the backend.
    pub probes: ProbeResult,
    pub state: LocomotionState,
    pub posture: Posture,
    pub speed: SpeedController,
    pub jump: JumpState,
    /// Suppresses wall running after a wall jump.
    pub wall_exit: WallExitGrace,
    pub landing: LandingLatch,
    /// Vertical scale restored when crouch or slide ends.
    pub standing_y_scale: f32,

    accumulated_force: Vec3,
    applied_force: Vec3,
}

impl Default for LocomotionController {
    fn default() -> Self {
        Self {
            probes: ProbeResult::default(),
            state: LocomotionState::default(),
            posture: Posture::default(),
            speed: SpeedController::default(),
            jump: JumpState::default(),
            wall_exit: WallExitGrace::default(),
            landing: LandingLatch::default(),
            standing_y_scale: 1.0,
            accumulated_force: Vec3::ZERO,
            applied_force: Vec3::ZERO,
        }
    }
}

/// One-shot effects of a decision tick, applied through the backend.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DecisionOutcome {
    /// Remove vertical velocity before applying `impulse`.
    pub zero_vertical_velocity: bool,
    pub impulse: Vec3,
    pub camera: Vec<CameraCommand>,
    /// A landing happened this tick.
    pub landed: bool,
    pub jumped: bool,
    pub wall_jumped: bool,
}

impl LocomotionController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current vertical scale of the body.
    pub fn y_scale(&self, params: &MovementParameters) -> f32 {
        self.posture.y_scale(params, self.standing_y_scale)
    }

    /// Body height used by the probes this tick.
    pub fn body_height(&self, params: &MovementParameters) -> f32 {
        self.posture.body_height(params)
    }

    /// Run one decision tick.
    ///
    /// Updates posture, state, jump cooldown, wall-exit grace, speed target and
    /// the landing latch. Effects on the rigid body are returned, not applied.
    pub fn decide(
        &mut self,
        params: &MovementParameters,
        input: &LocomotionInput,
        orientation: &LookOrientation,
        velocity: Vec3,
        dt: f32,
    ) -> DecisionOutcome {
        let mut outcome = DecisionOutcome::default();

        self.jump.tick(dt);
        self.update_posture(params, input, &mut outcome);

        let previous = self.state;
        let vertical_velocity = velocity.dot(UP);
        let mut transition = evaluate(&self.state_inputs(params, input, vertical_velocity));

        if let Some(contact) = transition.state.wall() {
            if input.jump_pressed() {
                self.wall_exit.begin(params.wall_run.exit_time);
                outcome.zero_vertical_velocity = true;
                outcome.impulse += wall_jump_impulse(params, &contact, UP);
                outcome.wall_jumped = true;
                transition = evaluate(&self.state_inputs(params, input, 0.0));
            }
        } else if self.wall_exit.is_active() {
            self.wall_exit.tick(dt);
        }
        self.state = transition.state;

        let jump = jump_impulse(&JumpRequest {
            params,
            probes: &self.probes,
            state: &self.state,
            orientation,
            held: input.jump,
            ready: self.jump.is_ready(),
            sliding: self.posture.is_sliding(),
            up: UP,
        });
        if let Ok(impulse) = jump {
            outcome.zero_vertical_velocity = true;
            outcome.impulse += impulse;
            outcome.jumped = true;
            self.jump.start_cooldown(params.jumping.cooldown);
        }

        match (previous.wall(), self.state.wall()) {
            (None, Some(contact)) => outcome
                .camera
                .extend(wall_run_entered(&params.feedback, contact.side)),
            (Some(_), None) => outcome.camera.extend(wall_run_exited(&params.feedback)),
            (Some(before), Some(now)) if before.side != now.side => outcome
                .camera
                .push(wall_run_tilt(&params.feedback, now.side)),
            _ => {}
        }

        if let Some(speed) = transition.desired_speed {
            self.speed.set_desired(speed);
        }
        let rate = smoothing_rate(&params.sliding, self.probes.surface.slope_angle());
        self.speed.update(dt, rate);

        if params.feedback.landing_enabled
            && self.landing.update(
                self.probes.landing_contact,
                vertical_velocity,
                self.state.is_wall_running(),
            )
        {
            outcome.landed = true;
            let command = landing_command(
                &params.feedback,
                self.speed.current(),
                self.posture.is_sliding(),
            );
            outcome.camera.extend(command);
        }

        outcome
    }

    fn state_inputs<'a>(
        &'a self,
        params: &'a MovementParameters,
        input: &'a LocomotionInput,
        vertical_velocity: f32,
    ) -> StateInputs<'a> {
        StateInputs {
            params,
            probes: &self.probes,
            input,
            posture: self.posture,
            vertical_velocity,
            exiting_wall: self.wall_exit.is_active(),
        }
    }

    /// Start and stop crouch and slide on button edges. A new press replaces
    /// the other posture; a press of both on the same tick crouches.
    fn update_posture(
        &mut self,
        params: &MovementParameters,
        input: &LocomotionInput,
        outcome: &mut DecisionOutcome,
    ) {
        if params.abilities.slide {
            if input.slide_pressed() && input.has_movement() {
                self.enter_posture(Posture::Sliding, outcome);
            } else if input.slide_released() && self.posture.is_sliding() {
                self.posture = Posture::Standing;
                self.speed.snap_to_desired();
            }
        }

        if params.abilities.crouch {
            if input.crouch_pressed() {
                self.enter_posture(Posture::Crouching, outcome);
            } else if input.crouch_released() && self.posture.is_crouching() {
                self.posture = Posture::Standing;
            }
        }
    }

    fn enter_posture(&mut self, posture: Posture, outcome: &mut DecisionOutcome) {
        self.posture = posture;
        if self.probes.grounded {
            outcome.impulse += -UP * POSTURE_DOWN_IMPULSE;
        }
    }

    /// Compute the forces for one physics tick.
    pub fn plan_forces(
        &self,
        params: &MovementParameters,
        input: &LocomotionInput,
        orientation: &LookOrientation,
        velocity: Vec3,
        gravity: Vec3,
        fixed_dt: f32,
    ) -> ForcePlan {
        generate(&ForceContext {
            params,
            probes: &self.probes,
            state: &self.state,
            input,
            orientation,
            sliding: self.posture.is_sliding(),
            exiting_slope: self.jump.exiting_slope(),
            velocity,
            gravity,
            current_speed: self.speed.current(),
            fixed_dt,
            up: UP,
        })
    }

    pub fn apply_speed_effect(&mut self, effect: SpeedEffect) {
        match effect {
            SpeedEffect::ResetTo(speed) => self.speed.reset_to(speed),
            SpeedEffect::CancelTo(speed) => self.speed.cancel_to(speed),
        }
    }

    /// Velocity capped at the current speed, or `None` when within limits.
    pub fn limit_velocity(&self, velocity: Vec3) -> Option<Vec3> {
        let slope_mode =
            self.probes.on_slope() && !self.jump.exiting_slope() && !self.posture.is_sliding();
        clamp_velocity(velocity, self.speed.current(), slope_mode)
    }

    /// Accumulate a force for this physics step.
    pub fn add_force(&mut self, force: Vec3) {
        self.accumulated_force += force;
    }

    /// Force accumulated so far this physics step.
    pub fn accumulated_force(&self) -> Vec3 {
        self.accumulated_force
    }

    /// Start a new physics step. Returns the force applied in the previous
    /// step so the backend can remove it.
    pub fn prepare_new_frame(&mut self) -> Vec3 {
        self.accumulated_force = Vec3::ZERO;
        std::mem::take(&mut self.applied_force)
    }

    /// Finish a physics step. Returns the force to hand to the engine and
    /// remembers it for the next [`prepare_new_frame`](Self::prepare_new_frame).
    pub fn finalize_frame(&mut self) -> Vec3 {
        self.applied_force = self.accumulated_force;
        self.accumulated_force
    }
}

/// Capture the standing scale of new controllers and check their parameters.
pub(crate) fn initialize_controllers(
    mut q: Query<
        (
            Entity,
            &mut LocomotionController,
            &MovementParameters,
            Option<&Transform>,
        ),
        Added<LocomotionController>,
    >,
) {
    for (entity, mut controller, params, transform) in &mut q {
        if let Some(transform) = transform {
            controller.standing_y_scale = transform.scale.y;
        }
        if let Err(err) = params.validate() {
            warn!("{entity}: invalid movement parameters: {err}");
        }
    }
}

/// Decision tick: posture, state machine, jumps, speed target and feedback.
pub(crate) fn update_locomotion<B: LocomotionBackend>(world: &mut World) {
    let dt = world.resource::<Time>().delta_secs();

    let entities: Vec<(
        Entity,
        MovementParameters,
        LocomotionInput,
        LookOrientation,
        LocomotionController,
    )> = world
        .query::<(
            Entity,
            &MovementParameters,
            &LocomotionInput,
            &LookOrientation,
            &LocomotionController,
        )>()
        .iter(world)
        .map(|(e, params, input, orientation, controller)| {
            (e, *params, *input, *orientation, controller.clone())
        })
        .collect();

    for (entity, params, input, orientation, mut controller) in entities {
        let velocity = B::get_velocity(world, entity);
        let previous = controller.state;
        let outcome = controller.decide(&params, &input, &orientation, velocity, dt);

        if previous.name() != controller.state.name() {
            debug!(
                "{entity}: {} -> {} (desired speed {})",
                previous.name(),
                controller.state.name(),
                controller.speed.desired()
            );
        }
        if outcome.wall_jumped {
            debug!("{entity}: wall jump, impulse {}", outcome.impulse);
        } else if outcome.jumped {
            debug!("{entity}: jump, impulse {}", outcome.impulse);
        }

        let feet_offset = UP * controller.body_height(&params) * 0.5;

        if let Some(mut stored) = world.get_mut::<LocomotionController>(entity) {
            *stored = controller;
        }
        if let Some(mut stored) = world.get_mut::<LocomotionInput>(entity) {
            stored.latch();
        }

        if outcome.zero_vertical_velocity {
            let velocity = B::get_velocity(world, entity);
            B::set_velocity(world, entity, without_vertical(velocity, UP));
        }
        if outcome.impulse != Vec3::ZERO {
            B::apply_impulse(world, entity, outcome.impulse);
        }

        if outcome.landed {
            let position = B::get_position(world, entity) - feet_offset;
            world.write_message(LandingEffectRequested { entity, position });
        }
        for command in outcome.camera {
            world.write_message(CameraFeedback { entity, command });
        }
    }
}

/// Physics tick: generate and accumulate movement forces.
pub(crate) fn accumulate_locomotion_forces<B: LocomotionBackend>(world: &mut World) {
    let fixed_dt = B::get_fixed_timestep(world);

    let entities: Vec<(
        Entity,
        MovementParameters,
        LocomotionInput,
        LookOrientation,
        LocomotionController,
    )> = world
        .query::<(
            Entity,
            &MovementParameters,
            &LocomotionInput,
            &LookOrientation,
            &LocomotionController,
        )>()
        .iter(world)
        .map(|(e, params, input, orientation, controller)| {
            (e, *params, *input, *orientation, controller.clone())
        })
        .collect();

    for (entity, params, input, orientation, controller) in entities {
        let velocity = B::get_velocity(world, entity);
        let gravity = B::get_gravity(world, entity);
        let plan = controller.plan_forces(&params, &input, &orientation, velocity, gravity, fixed_dt);
        trace!(
            "{entity}: {:?} force {} accel {}",
            plan.branch,
            plan.force,
            plan.acceleration
        );

        if let Some(effect) = plan.speed_effect {
            if let Some(mut stored) = world.get_mut::<LocomotionController>(entity) {
                stored.apply_speed_effect(effect);
            }
        }

        let force = plan.total_force(B::get_mass(world, entity));
        if force != Vec3::ZERO {
            B::apply_force(world, entity, force);
        }
    }
}

/// Physics tick: cap velocity at the current speed.
pub(crate) fn limit_locomotion_velocity<B: LocomotionBackend>(world: &mut World) {
    let entities: Vec<(Entity, LocomotionController)> = world
        .query::<(Entity, &LocomotionController)>()
        .iter(world)
        .map(|(e, controller)| (e, controller.clone()))
        .collect();

    for (entity, controller) in entities {
        let velocity = B::get_velocity(world, entity);
        if let Some(limited) = controller.limit_velocity(velocity) {
            B::set_velocity(world, entity, limited);
        }
    }
}

/// Keep the body's vertical scale in line with its posture.
pub(crate) fn sync_body_scale(
    mut q: Query<
        (&LocomotionController, &MovementParameters, &mut Transform),
        Changed<LocomotionController>,
    >,
) {
    for (controller, params, mut transform) in &mut q {
        let target = controller.y_scale(params);
        if transform.scale.y != target {
            transform.scale.y = target;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detection::{GroundSurface, SurfaceHit, WallSide};

    const DT: f32 = 1.0 / 60.0;

    fn grounded() -> LocomotionController {
        let mut controller = LocomotionController::new();
        controller.probes.grounded = true;
        controller
    }

    fn near_right_wall() -> LocomotionController {
        let mut controller = LocomotionController::new();
        controller.probes = ProbeResult {
            grounded: false,
            above_ground: true,
            right_wall: Some(SurfaceHit::new(0.6, Vec3::NEG_X, Vec3::ZERO, None)),
            ..default()
        };
        controller
    }

    fn forward() -> LocomotionInput {
        let mut input = LocomotionInput::new();
        input.set_axes(1.0, 0.0);
        input
    }

    /// Run a decision tick and latch input edges like the system does.
    fn tick(
        controller: &mut LocomotionController,
        params: &MovementParameters,
        input: &mut LocomotionInput,
        velocity: Vec3,
    ) -> DecisionOutcome {
        let outcome = controller.decide(params, input, &LookOrientation::default(), velocity, DT);
        input.latch();
        outcome
    }

    fn fov_commands(outcome: &DecisionOutcome) -> usize {
        outcome
            .camera
            .iter()
            .filter(|c| matches!(c, CameraCommand::FieldOfView { .. }))
            .count()
    }

    #[test]
    fn starts_walking_at_walk_speed() {
        let params = MovementParameters::default();
        let mut controller = grounded();
        let mut input = LocomotionInput::new();

        tick(&mut controller, &params, &mut input, Vec3::ZERO);
        assert_eq!(controller.state, LocomotionState::Walking);
        assert_eq!(controller.speed.current(), 6.0);
    }

    #[test]
    fn wall_run_entry_widens_fov_once() {
        let params = MovementParameters::default();
        let mut controller = near_right_wall();
        let mut input = forward();

        let first = tick(&mut controller, &params, &mut input, Vec3::ZERO);
        assert!(controller.state.is_wall_running());
        assert_eq!(fov_commands(&first), 1);
        assert!(first.camera.contains(&CameraCommand::FieldOfView {
            target: 90.0,
            duration: 0.25
        }));
        assert!(first.camera.contains(&CameraCommand::Tilt {
            degrees: 5.0,
            duration: 0.25
        }));

        for _ in 0..10 {
            let sustained = tick(&mut controller, &params, &mut input, Vec3::ZERO);
            assert!(controller.state.is_wall_running());
            assert!(sustained.camera.is_empty());
        }

        controller.probes.right_wall = None;
        let exit = tick(&mut controller, &params, &mut input, Vec3::ZERO);
        assert_eq!(controller.state, LocomotionState::Airborne);
        assert!(exit.camera.contains(&CameraCommand::FieldOfView {
            target: 80.0,
            duration: 0.25
        }));
        assert!(exit.camera.contains(&CameraCommand::Tilt {
            degrees: 0.0,
            duration: 0.25
        }));
    }

    #[test]
    fn wall_jump_opens_exit_grace() {
        let params = MovementParameters::default().with_wall_exit_time(0.1);
        let mut controller = near_right_wall();
        let mut input = forward();
        tick(&mut controller, &params, &mut input, Vec3::ZERO);
        assert!(controller.state.is_wall_running());

        input.set_jump(true);
        let outcome = tick(&mut controller, &params, &mut input, Vec3::new(0.0, -2.0, -8.0));
        assert!(outcome.wall_jumped);
        assert!(outcome.zero_vertical_velocity);
        assert_eq!(outcome.impulse, Vec3::new(-12.0, 12.0, 0.0));
        assert_eq!(controller.state, LocomotionState::Airborne);
        assert!(controller.wall_exit.is_active());
        assert_eq!(controller.wall_exit.remaining(), 0.1);
        assert!(outcome.camera.contains(&CameraCommand::FieldOfView {
            target: 80.0,
            duration: 0.25
        }));

        // Still touching the wall, but the grace window blocks re-entry.
        input.set_jump(false);
        let mut ticks = 0;
        while controller.wall_exit.is_active() {
            tick(&mut controller, &params, &mut input, Vec3::ZERO);
            ticks += 1;
            if controller.wall_exit.is_active() {
                assert_eq!(controller.state, LocomotionState::Airborne);
            }
        }
        assert!((6..=7).contains(&ticks), "grace lasted {ticks} ticks");

        tick(&mut controller, &params, &mut input, Vec3::ZERO);
        assert!(controller.state.is_wall_running());
    }

    #[test]
    fn jump_zeroes_vertical_velocity_and_cools_down() {
        let params = MovementParameters::default();
        let mut controller = grounded();
        let mut input = LocomotionInput::new();
        input.set_jump(true);

        let outcome = tick(&mut controller, &params, &mut input, Vec3::new(0.0, -1.0, 0.0));
        assert!(outcome.jumped);
        assert!(outcome.zero_vertical_velocity);
        assert_eq!(outcome.impulse, Vec3::Y * 11.0);
        assert!(!controller.jump.is_ready());

        // Held jump is rejected until the cooldown expires.
        let outcome = tick(&mut controller, &params, &mut input, Vec3::ZERO);
        assert!(!outcome.jumped);

        input.set_jump(false);
        for _ in 0..12 {
            tick(&mut controller, &params, &mut input, Vec3::ZERO);
        }
        assert!(controller.jump.is_ready());
    }

    #[test]
    fn airborne_jump_is_ignored() {
        let params = MovementParameters::default();
        let mut controller = LocomotionController::new();
        let mut input = LocomotionInput::new();
        input.set_jump(true);

        let outcome = tick(&mut controller, &params, &mut input, Vec3::ZERO);
        assert!(!outcome.jumped);
        assert_eq!(outcome.impulse, Vec3::ZERO);
        assert!(controller.jump.is_ready());
    }

    #[test]
    fn crouch_and_slide_are_exclusive() {
        let params = MovementParameters::default();
        let mut controller = grounded();
        controller.standing_y_scale = 1.0;
        let mut input = forward();

        input.set_crouch(true);
        let outcome = tick(&mut controller, &params, &mut input, Vec3::ZERO);
        assert_eq!(controller.posture, Posture::Crouching);
        assert_eq!(controller.state, LocomotionState::Crouching);
        assert_eq!(outcome.impulse, Vec3::NEG_Y * 5.0);

        input.set_slide(true);
        tick(&mut controller, &params, &mut input, Vec3::ZERO);
        assert_eq!(controller.posture, Posture::Sliding);

        // Releasing crouch does not end the slide.
        input.set_crouch(false);
        tick(&mut controller, &params, &mut input, Vec3::ZERO);
        assert_eq!(controller.posture, Posture::Sliding);

        input.set_slide(false);
        tick(&mut controller, &params, &mut input, Vec3::ZERO);
        assert_eq!(controller.posture, Posture::Standing);
        assert_eq!(controller.y_scale(&params), 1.0);
    }

    #[test]
    fn slide_needs_movement_input() {
        let params = MovementParameters::default();
        let mut controller = grounded();
        let mut input = LocomotionInput::new();
        input.set_slide(true);

        tick(&mut controller, &params, &mut input, Vec3::ZERO);
        assert_eq!(controller.posture, Posture::Standing);
    }

    #[test]
    fn sliding_on_slope_targets_slide_speed() {
        let params = MovementParameters::default();
        let mut controller = grounded();
        controller.probes.surface = GroundSurface::Slope {
            normal: Quat::from_rotation_x(0.5) * Vec3::Y,
            angle: 28.6,
        };
        let mut input = forward();
        input.set_slide(true);

        tick(&mut controller, &params, &mut input, Vec3::new(0.0, -0.2, 3.0));
        assert_eq!(controller.state, LocomotionState::Sliding);
        assert_eq!(controller.speed.desired(), 15.0);
    }

    #[test]
    fn stopping_a_slide_snaps_speed() {
        let params = MovementParameters::default();
        let mut controller = grounded();
        let mut input = forward();
        tick(&mut controller, &params, &mut input, Vec3::ZERO);

        input.set_slide(true);
        tick(&mut controller, &params, &mut input, Vec3::ZERO);
        assert_eq!(controller.speed.desired(), 13.0);
        assert!(controller.speed.smoothing.active().is_some());
        assert!(controller.speed.current() < 13.0);

        input.set_slide(false);
        tick(&mut controller, &params, &mut input, Vec3::ZERO);
        assert_eq!(controller.posture, Posture::Standing);
        assert_eq!(controller.state, LocomotionState::Walking);
        // Current jumps to the slide target, then eases down to walking speed.
        assert_eq!(controller.speed.current(), 13.0);
        assert_eq!(controller.speed.desired(), 6.0);
        assert!(controller.speed.smoothing.active().is_some());
    }

    #[test]
    fn landing_feedback_fires_once() {
        let params = MovementParameters::default();
        let mut controller = LocomotionController::new();
        controller.probes.landing_contact = true;
        let mut input = LocomotionInput::new();

        let outcome = tick(&mut controller, &params, &mut input, Vec3::new(0.0, -9.0, 0.0));
        assert!(outcome.landed);
        assert!(outcome.camera.iter().any(|c| matches!(c, CameraCommand::Landing { .. })));

        let outcome = tick(&mut controller, &params, &mut input, Vec3::new(0.0, -3.0, 0.0));
        assert!(!outcome.landed);
    }

    #[test]
    fn landing_feedback_can_be_disabled() {
        let params = MovementParameters::default().with_landing_feedback(false);
        let mut controller = LocomotionController::new();
        controller.probes.landing_contact = true;
        let mut input = LocomotionInput::new();

        let outcome = tick(&mut controller, &params, &mut input, Vec3::NEG_Y);
        assert!(!outcome.landed);
        assert!(outcome.camera.is_empty());
    }

    #[test]
    fn up_slope_force_resets_speed_to_walk() {
        let params = MovementParameters::default();
        let mut controller = grounded();
        // Ground rises toward -Z, the default facing.
        controller.probes.surface = GroundSurface::Slope {
            normal: Quat::from_rotation_x(30f32.to_radians()) * Vec3::Y,
            angle: 30.0,
        };
        let mut input = forward();
        input.set_sprint(true);
        tick(&mut controller, &params, &mut input, Vec3::ZERO);
        assert_eq!(controller.speed.desired(), 10.0);

        let plan = controller.plan_forces(
            &params,
            &input,
            &LookOrientation::default(),
            Vec3::ZERO,
            Vec3::new(0.0, -9.81, 0.0),
            DT,
        );
        let effect = plan.speed_effect.unwrap();
        controller.apply_speed_effect(effect);
        assert_eq!(controller.speed.desired(), 6.0);
        assert_eq!(controller.speed.current(), 6.0);
    }

    #[test]
    fn velocity_limit_respects_slide_and_slope() {
        let mut controller = grounded();
        controller.speed.reset_to(6.0);
        controller.probes.surface = GroundSurface::Slope {
            normal: Quat::from_rotation_x(0.3) * Vec3::Y,
            angle: 17.2,
        };

        let limited = controller.limit_velocity(Vec3::new(0.0, 4.0, -8.0)).unwrap();
        assert!((limited.length() - 3.0).abs() < 1e-4);

        controller.posture = Posture::Sliding;
        let limited = controller.limit_velocity(Vec3::new(0.0, 4.0, -8.0)).unwrap();
        assert_eq!(limited, Vec3::new(0.0, 4.0, -6.0));
    }

    #[test]
    fn force_accumulation_round_trip() {
        let mut controller = LocomotionController::new();
        controller.add_force(Vec3::X);
        controller.add_force(Vec3::Y);
        assert_eq!(controller.finalize_frame(), Vec3::new(1.0, 1.0, 0.0));
        assert_eq!(controller.prepare_new_frame(), Vec3::new(1.0, 1.0, 0.0));
        assert_eq!(controller.accumulated_force(), Vec3::ZERO);
        assert_eq!(controller.prepare_new_frame(), Vec3::ZERO);
    }

    #[test]
    fn left_wall_tilts_left() {
        let params = MovementParameters::default();
        let mut controller = LocomotionController::new();
        controller.probes = ProbeResult {
            above_ground: true,
            left_wall: Some(SurfaceHit::new(0.4, Vec3::X, Vec3::ZERO, None)),
            ..default()
        };
        let mut input = forward();

        let outcome = tick(&mut controller, &params, &mut input, Vec3::ZERO);
        assert_eq!(
            controller.state.wall().map(|wall| wall.side),
            Some(WallSide::Left)
        );
        assert!(outcome.camera.contains(&CameraCommand::Tilt {
            degrees: -5.0,
            duration: 0.25
        }));
    }

    #[test]
    fn switching_walls_mid_run_retilts_camera() {
        let params = MovementParameters::default();
        let mut controller = near_right_wall();
        let mut input = forward();
        tick(&mut controller, &params, &mut input, Vec3::ZERO);
        assert_eq!(
            controller.state.wall().map(|wall| wall.side),
            Some(WallSide::Right)
        );

        controller.probes.right_wall = None;
        controller.probes.left_wall = Some(SurfaceHit::new(0.5, Vec3::X, Vec3::ZERO, None));
        let outcome = tick(&mut controller, &params, &mut input, Vec3::ZERO);
        assert_eq!(
            controller.state.wall().map(|wall| wall.side),
            Some(WallSide::Left)
        );
        assert_eq!(
            outcome.camera,
            vec![CameraCommand::Tilt {
                degrees: -5.0,
                duration: 0.25
            }]
        );

        let sustained = tick(&mut controller, &params, &mut input, Vec3::ZERO);
        assert!(sustained.camera.is_empty());
    }
}
