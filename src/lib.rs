//! # `msg_fps_controller`
//!
//! A first-person, physics-based locomotion controller for Bevy with physics
//! backend abstraction.
//!
//! The controller turns two movement axes and four buttons into rigid-body
//! forces and a discrete movement state:
//! - Walking, sprinting and crouching with smoothed speed changes
//! - Slope following with slope-relative projection and a slope stick force
//! - Sliding (downhill boost on slopes, braking on flat ground)
//! - Wall running with wall jumps and a re-entry grace window
//! - Jumping with cooldown, and reduced air control
//! - Camera feedback (FOV, tilt, landing) through messages
//!
//! ## Architecture
//!
//! Each controlled body carries a [`LocomotionController`](controller::LocomotionController),
//! its [`MovementParameters`](config::MovementParameters), a
//! [`LocomotionInput`](intent::LocomotionInput) written by the game and a
//! [`LookOrientation`](orientation::LookOrientation).
//!
//! The state is derived from scratch every tick from the probe results, the
//! input and the body posture. The force generator then dispatches on the
//! resulting branch (grounded, wall running, airborne).
//!
//! ## System Order
//!
//! Systems run in phases defined by [`LocomotionSet`]. The decision tick runs
//! in `Update`:
//!
//! 1. **Sensors** - Probe ground, slope, walls and clearance
//! 2. **Decision** - Posture edges, state machine, jumps, speed target, feedback
//!
//! The physics tick runs in `FixedUpdate`:
//!
//! 1. **Preparation** - Remove forces applied in the previous step
//! 2. **ForceAccumulation** - Generate movement forces for the active branch
//! 3. **SpeedLimit** - Cap velocity at the current speed
//! 4. **FinalApplication** - Hand accumulated forces to the physics engine
//!
//! ## Usage
//!
//! ```rust
//! use bevy::prelude::*;
//! use msg_fps_controller::prelude::*;
//!
//! let controller = LocomotionController::new();
//! let params = MovementParameters::default();
//! let input = LocomotionInput::default();
//!
//! assert_eq!(controller.state, LocomotionState::Walking);
//! assert!(params.validate().is_ok());
//! assert!(!input.has_movement());
//! ```

use bevy::prelude::*;

pub mod backend;
pub mod config;
pub mod controller;
pub mod detection;
pub mod feedback;
pub mod forces;
pub mod intent;
pub mod orientation;
pub mod speed;
pub mod state;

#[cfg(feature = "avian3d")]
pub mod avian;

/// System sets for locomotion controller phases.
///
/// Sensors and Decision run in `Update`; the rest run in `FixedUpdate`.
/// Backends put their probe systems in [`Sensors`](Self::Sensors) and their
/// force bookkeeping in [`Preparation`](Self::Preparation) and
/// [`FinalApplication`](Self::FinalApplication).
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LocomotionSet {
    /// Collect probe results for the decision tick.
    Sensors,
    /// Posture, state machine, jumps, speed target and feedback.
    Decision,
    /// Clear forces applied in the previous physics step.
    Preparation,
    /// Generate and accumulate movement forces.
    ForceAccumulation,
    /// Cap velocity at the current speed.
    SpeedLimit,
    /// Apply accumulated forces to the physics engine.
    FinalApplication,
}

pub mod prelude {
    //! Convenient re-exports for common usage.
    //!
    //! ```rust,no_run
    //! use avian3d::prelude::*;
    //! use bevy::prelude::*;
    //! use msg_fps_controller::prelude::*;
    //!
    //! fn spawn_player(mut commands: Commands) {
    //!     commands.spawn((
    //!         Transform::from_xyz(0.0, 2.0, 0.0),
    //!         LocomotionController::new(),
    //!         MovementParameters::default(),
    //!         Avian3dLocomotionBundle::default(),
    //!         Collider::capsule(0.5, 1.0),
    //!     ));
    //! }
    //! ```

    pub use crate::backend::LocomotionBackend;
    pub use crate::config::{Abilities, ConfigError, MovementParameters};
    pub use crate::controller::LocomotionController;
    pub use crate::detection::{GroundSurface, ProbeResult, WallContact, WallSide};
    pub use crate::feedback::{CameraCommand, CameraFeedback, LandingEffectRequested};
    pub use crate::intent::LocomotionInput;
    pub use crate::orientation::LookOrientation;
    pub use crate::state::{LocomotionState, Posture};
    pub use crate::LocomotionPlugin;
    pub use crate::LocomotionSet;

    #[cfg(feature = "avian3d")]
    pub use crate::avian::{Avian3dBackend, Avian3dLocomotionBundle, LocomotionLayer};
}

/// Main plugin for the locomotion controller.
///
/// Generic over a physics backend `B` which provides probes and force
/// application.
///
/// # Examples
///
/// ```rust,no_run
/// use avian3d::prelude::*;
/// use bevy::prelude::*;
/// use msg_fps_controller::prelude::*;
///
/// App::new()
///     .add_plugins(DefaultPlugins)
///     .add_plugins(PhysicsPlugins::default())
///     .add_plugins(LocomotionPlugin::<Avian3dBackend>::default())
///     .run();
/// ```
pub struct LocomotionPlugin<B: backend::LocomotionBackend> {
    _marker: std::marker::PhantomData<B>,
}

impl<B: backend::LocomotionBackend> Default for LocomotionPlugin<B> {
    fn default() -> Self {
        Self {
            _marker: std::marker::PhantomData,
        }
    }
}

impl<B: backend::LocomotionBackend> LocomotionPlugin<B> {
    /// Create a new locomotion plugin.
    pub fn new() -> Self {
        Self::default()
    }
}

impl<B: backend::LocomotionBackend> Plugin for LocomotionPlugin<B> {
    fn build(&self, app: &mut App) {
        app.register_type::<controller::LocomotionController>();
        app.register_type::<config::MovementParameters>();
        app.register_type::<intent::LocomotionInput>();
        app.register_type::<orientation::LookOrientation>();
        app.register_type::<state::LocomotionState>();
        app.register_type::<state::Posture>();

        app.add_message::<feedback::CameraFeedback>();
        app.add_message::<feedback::LandingEffectRequested>();

        app.add_plugins(B::plugin());

        app.configure_sets(
            Update,
            (LocomotionSet::Sensors, LocomotionSet::Decision).chain(),
        );
        app.configure_sets(
            FixedUpdate,
            (
                LocomotionSet::Preparation,
                LocomotionSet::ForceAccumulation,
                LocomotionSet::SpeedLimit,
                LocomotionSet::FinalApplication,
            )
                .chain(),
        );

        app.add_systems(
            Update,
            controller::initialize_controllers.before(LocomotionSet::Sensors),
        );
        app.add_systems(
            Update,
            (
                controller::update_locomotion::<B>,
                controller::sync_body_scale,
            )
                .chain()
                .in_set(LocomotionSet::Decision),
        );

        app.add_systems(
            FixedUpdate,
            controller::accumulate_locomotion_forces::<B>.in_set(LocomotionSet::ForceAccumulation),
        );
        app.add_systems(
            FixedUpdate,
            controller::limit_locomotion_velocity::<B>.in_set(LocomotionSet::SpeedLimit),
        );
    }
}
