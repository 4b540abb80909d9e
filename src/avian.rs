//! Avian3D physics backend implementation.
//!
//! This module provides the physics backend for Avian3D (`avian3d`).
//! Enable with the `avian3d` feature (on by default).

use avian3d::prelude::*;
use bevy::prelude::*;

use crate::backend::LocomotionBackend;
use crate::config::MovementParameters;
use crate::controller::{LocomotionController, UP};
use crate::detection::{ProbeResult, RawProbes, SurfaceHit};
use crate::orientation::LookOrientation;

/// Collision layers matching the default [`SensorConfig`](crate::config::SensorConfig)
/// masks: ground is bit 1, walls are bit 2.
#[derive(PhysicsLayer, Clone, Copy, Debug, Default)]
pub enum LocomotionLayer {
    #[default]
    Default,
    Ground,
    Wall,
}

/// Avian3D physics backend for the locomotion controller.
///
/// Forces are accumulated on the [`LocomotionController`] and handed to
/// [`ConstantForce`] once per physics step; probes use [`SpatialQuery`] in
/// dedicated systems.
pub struct Avian3dBackend;

impl LocomotionBackend for Avian3dBackend {
    type VelocityComponent = LinearVelocity;

    fn plugin() -> impl Plugin {
        Avian3dBackendPlugin
    }

    fn get_velocity(world: &World, entity: Entity) -> Vec3 {
        world
            .get::<LinearVelocity>(entity)
            .map(|v| v.0)
            .unwrap_or(Vec3::ZERO)
    }

    fn set_velocity(world: &mut World, entity: Entity, velocity: Vec3) {
        if let Some(mut vel) = world.get_mut::<LinearVelocity>(entity) {
            vel.0 = velocity;
        }
    }

    fn apply_impulse(world: &mut World, entity: Entity, impulse: Vec3) {
        // Impulse = mass * delta_v
        let mass = Self::get_mass(world, entity);
        if mass <= 0.0 {
            return;
        }
        if let Some(mut vel) = world.get_mut::<LinearVelocity>(entity) {
            vel.0 += impulse / mass;
        }
    }

    fn apply_force(world: &mut World, entity: Entity, force: Vec3) {
        // Applied to ConstantForce in `apply_locomotion_forces`.
        if let Some(mut controller) = world.get_mut::<LocomotionController>(entity) {
            controller.add_force(force);
        }
    }

    fn get_gravity(world: &World, entity: Entity) -> Vec3 {
        let gravity = world
            .get_resource::<Gravity>()
            .map(|g| g.0)
            .unwrap_or(Vec3::ZERO);
        let scale = world.get::<GravityScale>(entity).map_or(1.0, |s| s.0);
        gravity * scale
    }

    fn get_position(world: &World, entity: Entity) -> Vec3 {
        world
            .get::<Position>(entity)
            .map(|p| p.0)
            .or_else(|| world.get::<Transform>(entity).map(|t| t.translation))
            .or_else(|| world.get::<GlobalTransform>(entity).map(|t| t.translation()))
            .unwrap_or(Vec3::ZERO)
    }

    fn get_fixed_timestep(world: &World) -> f32 {
        world
            .get_resource::<Time<Fixed>>()
            .map(|t| t.delta_secs())
            .filter(|&d| d > 0.0)
            .unwrap_or(1.0 / 60.0)
    }

    fn get_mass(world: &World, entity: Entity) -> f32 {
        let Some(computed_mass) = world.get::<ComputedMass>(entity) else {
            return 0.0;
        };
        let mass = computed_mass.value();
        if mass <= 0.0 || !mass.is_finite() {
            return 0.0;
        }
        mass
    }
}

/// Physics components a locomotion body needs with the Avian3D backend.
#[derive(Bundle)]
pub struct Avian3dLocomotionBundle {
    pub rigid_body: RigidBody,
    pub locked_axes: LockedAxes,
    pub velocity: LinearVelocity,
    pub constant_force: ConstantForce,
    pub friction: Friction,
}

impl Default for Avian3dLocomotionBundle {
    fn default() -> Self {
        Self {
            rigid_body: RigidBody::Dynamic,
            locked_axes: LockedAxes::ROTATION_LOCKED,
            velocity: LinearVelocity::ZERO,
            constant_force: ConstantForce::default(),
            friction: Friction::new(0.0).with_combine_rule(CoefficientCombine::Min),
        }
    }
}

/// Plugin that sets up Avian3D-specific systems for the locomotion controller.
pub struct Avian3dBackendPlugin;

impl Plugin for Avian3dBackendPlugin {
    fn build(&self, app: &mut App) {
        use crate::LocomotionSet;

        // Decision tick: probes feed the state machine.
        app.add_systems(Update, avian_probe_detection.in_set(LocomotionSet::Sensors));

        // Physics tick: remove last step's forces, then hand over the new ones.
        app.add_systems(
            FixedUpdate,
            clear_locomotion_forces.in_set(LocomotionSet::Preparation),
        );
        app.add_systems(
            FixedUpdate,
            apply_locomotion_forces.in_set(LocomotionSet::FinalApplication),
        );
    }
}

fn probe_hit(origin: Vec3, direction: Dir3, hit: RayHitData) -> SurfaceHit {
    SurfaceHit::new(
        hit.distance,
        hit.normal,
        origin + direction * hit.distance,
        Some(hit.entity),
    )
}

/// Run the ground, slope, landing, clearance and wall probes.
///
/// All probes start at the body center. Lengths follow the body height of the
/// current posture.
fn avian_probe_detection(
    spatial_query: SpatialQuery,
    mut q_controllers: Query<(
        Entity,
        &GlobalTransform,
        &MovementParameters,
        &LookOrientation,
        &mut LocomotionController,
    )>,
) {
    for (entity, transform, params, orientation, mut controller) in &mut q_controllers {
        let position = transform.translation();
        let sensors = &params.sensors;
        let height = controller.body_height(params);
        let half_height = height * 0.5;

        let ground = SpatialQueryFilter::from_mask(LayerMask(sensors.ground_layers))
            .with_excluded_entities([entity]);
        let walls = SpatialQueryFilter::from_mask(LayerMask(sensors.wall_layers))
            .with_excluded_entities([entity]);

        let feet = position - UP * half_height;
        let ground_sphere = !spatial_query
            .shape_intersections(
                &Collider::sphere(sensors.ground_sphere_radius),
                feet,
                Quat::IDENTITY,
                &ground,
            )
            .is_empty();

        let down = Dir3::NEG_Y;
        let slope_ray = spatial_query
            .cast_ray(
                position,
                down,
                half_height + sensors.slope_ray_extension,
                true,
                &ground,
            )
            .map(|hit| probe_hit(position, down, hit));
        let landing_ray = spatial_query
            .cast_ray(
                position,
                down,
                half_height + sensors.landing_ray_extension,
                true,
                &ground,
            )
            .is_some();
        let clearance_ray = spatial_query
            .cast_ray(
                position,
                down,
                height + params.wall_run.min_jump_height,
                true,
                &ground,
            )
            .is_some();

        let right = Dir3::new(orientation.right()).unwrap_or(Dir3::X);
        let check_distance = params.wall_run.check_distance;
        let right_wall = spatial_query
            .cast_ray(position, right, check_distance, true, &walls)
            .map(|hit| probe_hit(position, right, hit));
        let left_wall = spatial_query
            .cast_ray(position, -right, check_distance, true, &walls)
            .map(|hit| probe_hit(position, -right, hit));

        let raw = RawProbes {
            ground_sphere,
            slope_ray,
            landing_ray,
            clearance_ray,
            left_wall,
            right_wall,
        };
        let probes = ProbeResult::from_raw(raw, UP, params.slope.max_angle);

        if probes.grounded != controller.probes.grounded {
            trace!("{entity}: grounded = {}", probes.grounded);
        }
        controller.probes = probes;
    }
}

/// Remove the force applied by the controller in the previous physics step.
///
/// Only our own contribution is subtracted, so forces added to
/// [`ConstantForce`] by other systems are preserved.
pub fn clear_locomotion_forces(
    mut q: Query<(&mut LocomotionController, Option<&mut ConstantForce>)>,
) {
    const EPSILON: f32 = 1e-6;

    for (mut controller, constant_force) in &mut q {
        let force_to_subtract = controller.prepare_new_frame();

        if let Some(mut force) = constant_force {
            force.0 -= force_to_subtract;

            // Avoid floating point drift
            if force.0.length_squared() < EPSILON * EPSILON {
                force.0 = Vec3::ZERO;
            }
        }
    }
}

/// Apply the accumulated controller force for this physics step.
pub fn apply_locomotion_forces(
    mut q: Query<(&mut LocomotionController, Option<&mut ConstantForce>)>,
) {
    for (mut controller, constant_force) in &mut q {
        let force_to_apply = controller.finalize_frame();
        if let Some(mut force) = constant_force {
            force.0 += force_to_apply;
        }
    }
}
