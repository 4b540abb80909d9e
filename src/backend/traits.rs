//! Physics backend abstraction.
//!
//! This module defines the trait a physics engine integration implements to
//! drive the locomotion controller. The controller systems only talk to the
//! physics world through it, so the engine can be swapped (or replaced by a
//! plain test double) without touching the state machine.

use bevy::prelude::*;

/// Trait for physics backend implementations.
///
/// Besides these operations a backend is expected to fill
/// [`LocomotionController::probes`](crate::controller::LocomotionController::probes)
/// in [`LocomotionSet::Sensors`](crate::LocomotionSet::Sensors) and to push the
/// accumulated forces into the engine in
/// [`LocomotionSet::FinalApplication`](crate::LocomotionSet::FinalApplication).
/// Both are usually systems added by [`LocomotionBackend::plugin`].
pub trait LocomotionBackend: 'static + Send + Sync {
    /// The velocity component type used by this backend.
    type VelocityComponent: Component;

    /// Returns the plugin that sets up this backend.
    fn plugin() -> impl Plugin;

    /// Get the current linear velocity of an entity.
    fn get_velocity(world: &World, entity: Entity) -> Vec3;

    /// Set the linear velocity of an entity.
    fn set_velocity(world: &mut World, entity: Entity, velocity: Vec3);

    /// Apply an impulse to an entity.
    ///
    /// Impulse is an instantaneous change in momentum.
    fn apply_impulse(world: &mut World, entity: Entity, impulse: Vec3);

    /// Apply a force to an entity.
    ///
    /// Force is applied over the next physics step.
    fn apply_force(world: &mut World, entity: Entity, force: Vec3);

    /// Get the gravity vector affecting an entity.
    fn get_gravity(world: &World, entity: Entity) -> Vec3;

    /// Get the current position of an entity.
    fn get_position(world: &World, entity: Entity) -> Vec3;

    /// Get the fixed timestep delta time.
    fn get_fixed_timestep(world: &World) -> f32;

    /// Get the mass of an entity.
    ///
    /// Used to turn accelerations into forces.
    fn get_mass(world: &World, entity: Entity) -> f32;
}
