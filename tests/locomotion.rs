//! Integration tests for the locomotion plugin with a scripted backend.
//!
//! The backend below has no physics engine: probes are written by hand and
//! velocity only changes through the controller. This isolates the plugin's
//! scheduling (decision tick vs. physics tick) and its message output.

use bevy::prelude::*;
use msg_fps_controller::backend::NoOpBackendPlugin;
use msg_fps_controller::prelude::*;

const FIXED_UPDATE_HZ: f64 = 60.0;

/// Rigid body stand-in for the scripted backend.
#[derive(Component, Debug, Default)]
struct ScriptedBody {
    velocity: Vec3,
    position: Vec3,
    /// Force accumulated during the current physics step.
    force: Vec3,
}

struct ScriptedBackend;

impl LocomotionBackend for ScriptedBackend {
    type VelocityComponent = ScriptedBody;

    fn plugin() -> impl Plugin {
        NoOpBackendPlugin
    }

    fn get_velocity(world: &World, entity: Entity) -> Vec3 {
        world
            .get::<ScriptedBody>(entity)
            .map(|b| b.velocity)
            .unwrap_or(Vec3::ZERO)
    }

    fn set_velocity(world: &mut World, entity: Entity, velocity: Vec3) {
        if let Some(mut body) = world.get_mut::<ScriptedBody>(entity) {
            body.velocity = velocity;
        }
    }

    fn apply_impulse(world: &mut World, entity: Entity, impulse: Vec3) {
        if let Some(mut body) = world.get_mut::<ScriptedBody>(entity) {
            body.velocity += impulse;
        }
    }

    fn apply_force(world: &mut World, entity: Entity, force: Vec3) {
        if let Some(mut body) = world.get_mut::<ScriptedBody>(entity) {
            body.force += force;
        }
    }

    fn get_gravity(_world: &World, _entity: Entity) -> Vec3 {
        Vec3::new(0.0, -9.81, 0.0)
    }

    fn get_position(world: &World, entity: Entity) -> Vec3 {
        world
            .get::<ScriptedBody>(entity)
            .map(|b| b.position)
            .unwrap_or(Vec3::ZERO)
    }

    fn get_fixed_timestep(_world: &World) -> f32 {
        1.0 / FIXED_UPDATE_HZ as f32
    }

    fn get_mass(_world: &World, _entity: Entity) -> f32 {
        1.0
    }
}

fn clear_scripted_forces(mut q: Query<&mut ScriptedBody>) {
    for mut body in &mut q {
        body.force = Vec3::ZERO;
    }
}

#[derive(Resource, Default)]
struct CameraLog(Vec<CameraFeedback>);

#[derive(Resource, Default)]
struct LandingLog(Vec<LandingEffectRequested>);

fn record_feedback(
    mut camera: MessageReader<CameraFeedback>,
    mut landing: MessageReader<LandingEffectRequested>,
    mut camera_log: ResMut<CameraLog>,
    mut landing_log: ResMut<LandingLog>,
) {
    camera_log.0.extend(camera.read().copied());
    landing_log.0.extend(landing.read().copied());
}

fn create_test_app() -> App {
    let mut app = App::new();

    app.add_plugins(MinimalPlugins);
    app.add_plugins(LocomotionPlugin::<ScriptedBackend>::default());
    app.insert_resource(Time::<Fixed>::from_hz(FIXED_UPDATE_HZ));
    app.init_resource::<CameraLog>();
    app.init_resource::<LandingLog>();
    app.add_systems(
        FixedUpdate,
        clear_scripted_forces.in_set(LocomotionSet::Preparation),
    );
    app.add_systems(PostUpdate, record_feedback);

    app.finish();
    app.cleanup();
    app
}

fn spawn_character(app: &mut App, params: MovementParameters) -> Entity {
    app.world_mut()
        .spawn((
            Transform::default(),
            LocomotionController::new(),
            params,
            ScriptedBody::default(),
        ))
        .id()
}

/// Advance time by one fixed step and run an update.
fn tick(app: &mut App) {
    let timestep = std::time::Duration::from_secs_f64(1.0 / FIXED_UPDATE_HZ);
    app.world_mut()
        .resource_mut::<Time<Virtual>>()
        .advance_by(timestep);
    app.update();
}

fn run_frames(app: &mut App, frames: usize) {
    for _ in 0..frames {
        tick(app);
    }
}

fn set_probes(app: &mut App, entity: Entity, probes: ProbeResult) {
    app.world_mut()
        .get_mut::<LocomotionController>(entity)
        .unwrap()
        .probes = probes;
}

fn input_mut(app: &mut App, entity: Entity) -> Mut<'_, LocomotionInput> {
    app.world_mut().get_mut::<LocomotionInput>(entity).unwrap()
}

fn body(app: &App, entity: Entity) -> &ScriptedBody {
    app.world().get::<ScriptedBody>(entity).unwrap()
}

fn controller(app: &App, entity: Entity) -> &LocomotionController {
    app.world().get::<LocomotionController>(entity).unwrap()
}

fn grounded() -> ProbeResult {
    ProbeResult {
        grounded: true,
        ..default()
    }
}

#[test]
fn required_components_are_inserted() {
    let mut app = create_test_app();
    let character = app
        .world_mut()
        .spawn((LocomotionController::new(), ScriptedBody::default()))
        .id();

    tick(&mut app);

    assert!(app.world().get::<MovementParameters>(character).is_some());
    assert!(app.world().get::<LocomotionInput>(character).is_some());
    assert!(app.world().get::<LookOrientation>(character).is_some());
}

#[test]
fn idle_counter_movement_opposes_drift() {
    let mut app = create_test_app();
    let character = spawn_character(&mut app, MovementParameters::default());
    set_probes(&mut app, character, grounded());
    // Let the first decision tick set the walking speed before drifting.
    tick(&mut app);

    app.world_mut()
        .get_mut::<ScriptedBody>(character)
        .unwrap()
        .velocity = Vec3::new(5.0, 0.0, 3.0);

    run_frames(&mut app, 5);

    let force = body(&app, character).force;
    println!("PROOF: counter force = {force}");
    assert!((force - Vec3::new(-25.0, 0.0, -15.0)).length() < 1e-3);
    assert_eq!(controller(&app, character).state, LocomotionState::Walking);
}

#[test]
fn jump_replaces_vertical_velocity() {
    let mut app = create_test_app();
    let character = spawn_character(&mut app, MovementParameters::default());
    set_probes(&mut app, character, grounded());
    tick(&mut app);

    app.world_mut()
        .get_mut::<ScriptedBody>(character)
        .unwrap()
        .velocity = Vec3::new(1.0, -3.0, 0.0);
    input_mut(&mut app, character).set_jump(true);
    tick(&mut app);

    let velocity = body(&app, character).velocity;
    println!("PROOF: velocity after jump = {velocity}");
    assert!((velocity.y - 11.0).abs() < 1e-4);
    assert!(!controller(&app, character).jump.is_ready());
}

#[test]
fn crouch_scales_body_and_restores_standing_scale() {
    let mut app = create_test_app();
    let character = app
        .world_mut()
        .spawn((
            Transform::from_scale(Vec3::new(1.0, 1.2, 1.0)),
            LocomotionController::new(),
            MovementParameters::default(),
            ScriptedBody::default(),
        ))
        .id();
    set_probes(&mut app, character, grounded());
    tick(&mut app);

    input_mut(&mut app, character).set_crouch(true);
    tick(&mut app);
    let transform = app.world().get::<Transform>(character).unwrap();
    assert_eq!(transform.scale.y, 0.5);
    assert_eq!(controller(&app, character).state, LocomotionState::Crouching);

    input_mut(&mut app, character).set_crouch(false);
    tick(&mut app);
    let transform = app.world().get::<Transform>(character).unwrap();
    assert_eq!(transform.scale.y, 1.2);
    assert_eq!(controller(&app, character).state, LocomotionState::Walking);
}

#[test]
fn wall_run_entry_sends_feedback_once() {
    let mut app = create_test_app();
    let character = spawn_character(&mut app, MovementParameters::default());
    set_probes(
        &mut app,
        character,
        ProbeResult {
            above_ground: true,
            right_wall: Some(msg_fps_controller::detection::SurfaceHit::new(
                0.6,
                Vec3::NEG_X,
                Vec3::new(0.6, 0.0, 0.0),
                None,
            )),
            ..default()
        },
    );
    input_mut(&mut app, character).set_axes(1.0, 0.0);

    run_frames(&mut app, 10);

    assert!(controller(&app, character).state.is_wall_running());
    let log = &app.world().resource::<CameraLog>().0;
    let widen = log
        .iter()
        .filter(|m| {
            m.entity == character
                && matches!(m.command, CameraCommand::FieldOfView { target, .. } if target == 90.0)
        })
        .count();
    assert_eq!(widen, 1);
    assert!(log.iter().any(|m| matches!(
        m.command,
        CameraCommand::Tilt { degrees, .. } if degrees == 5.0
    )));
}

#[test]
fn landing_requests_effect_at_feet() {
    let mut app = create_test_app();
    let character = spawn_character(&mut app, MovementParameters::default());
    {
        let mut body = app.world_mut().get_mut::<ScriptedBody>(character).unwrap();
        body.position = Vec3::new(2.0, 5.0, -1.0);
        body.velocity = Vec3::new(0.0, -12.0, 0.0);
    }
    set_probes(
        &mut app,
        character,
        ProbeResult {
            landing_contact: true,
            ..default()
        },
    );

    run_frames(&mut app, 3);

    let landings = &app.world().resource::<LandingLog>().0;
    assert_eq!(landings.len(), 1);
    assert_eq!(landings[0].position, Vec3::new(2.0, 4.0, -1.0));

    let camera = &app.world().resource::<CameraLog>().0;
    assert!(camera
        .iter()
        .any(|m| matches!(m.command, CameraCommand::Landing { .. })));
}

#[test]
fn invalid_parameters_do_not_stop_the_controller() {
    let mut app = create_test_app();
    let character = spawn_character(&mut app, MovementParameters::default().with_walk_speed(-1.0));
    set_probes(&mut app, character, grounded());

    run_frames(&mut app, 3);
    assert_eq!(controller(&app, character).state, LocomotionState::Walking);
}
