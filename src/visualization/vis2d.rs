//! Bevy 2D viewer for the sandbox.
//!
//! The scenario is inserted as a `Resource`; per frame the update chain
//! polls input into the neutral snapshot, spawns pending particles, steps
//! the world with the fixed dt, then syncs circle transforms and the stats
//! overlay. Simulation space is y-down with the origin in the top-left
//! corner of the window; Bevy is y-up and centered, hence the flip in the
//! transform sync.

use bevy::app::AppExit;
use bevy::math::primitives::Circle;
use bevy::prelude::*;
use bevy::sprite::{MaterialMesh2dBundle, Mesh2dHandle};

use std::path::Path;

use crate::io::snapshot;
use crate::simulation::input::InputState;
use crate::simulation::params::FIXED_DT;
use crate::simulation::particle::Vec2f;
use crate::simulation::scenario::Scenario;

#[derive(Component)]
struct BodyIndex(pub usize);

#[derive(Component)]
struct StatsText;

#[derive(Resource, Default)]
struct InputSnapshot(InputState);

/// How many particles already have an entity
#[derive(Resource, Default)]
struct SpawnedCount(usize);

pub fn run_2d(scenario: Scenario) {
    let width = scenario.parameters.width;
    let height = scenario.parameters.height;

    App::new()
        .insert_resource(scenario)
        .init_resource::<InputSnapshot>()
        .init_resource::<SpawnedCount>()
        .insert_resource(ClearColor(Color::rgb(0.95, 0.95, 0.95)))
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "verletbox".to_string(),
                resolution: (width, height).into(),
                ..Default::default()
            }),
            ..Default::default()
        }))
        .add_systems(Startup, setup_system)
        .add_systems(
            Update,
            (
                input_system,
                spawn_system,
                physics_step_system,
                sync_transforms_system,
                stats_text_system,
            )
                .chain(),
        )
        .add_systems(Last, snapshot_system)
        .run();
}

fn setup_system(mut commands: Commands) {
    commands.spawn(Camera2dBundle::default());

    commands.spawn((
        TextBundle::from_section(
            "--",
            TextStyle {
                font_size: 24.0,
                color: Color::BLACK,
                ..Default::default()
            },
        )
        .with_style(Style {
            position_type: PositionType::Absolute,
            top: Val::Px(5.0),
            left: Val::Px(5.0),
            ..Default::default()
        }),
        StatsText,
    ));
}

/// Translate window events into the neutral snapshot the core consumes
fn input_system(
    keys: Res<ButtonInput<KeyCode>>,
    buttons: Res<ButtonInput<MouseButton>>,
    windows: Query<&Window>,
    mut snapshot: ResMut<InputSnapshot>,
) {
    let state = &mut snapshot.0;

    state.up = keys.pressed(KeyCode::ArrowUp);
    state.down = keys.pressed(KeyCode::ArrowDown);
    state.left = keys.pressed(KeyCode::ArrowLeft);
    state.right = keys.pressed(KeyCode::ArrowRight);
    state.pointer_held = buttons.pressed(MouseButton::Left);

    // cursor is already top-left origin, y down, like the simulation
    if let Ok(window) = windows.get_single() {
        if let Some(cursor) = window.cursor_position() {
            state.pointer_position = Vec2f::new(cursor.x, cursor.y);
        }
    }
}

/// Let the spawner add particles, then create an entity per newcomer
fn spawn_system(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<ColorMaterial>>,
    mut scenario: ResMut<Scenario>,
    mut spawned: ResMut<SpawnedCount>,
    time: Res<Time>,
) {
    // Split &mut Scenario into &mut fields in one destructuring step
    let Scenario {
        world,
        spawner,
        parameters,
    } = &mut *scenario;

    spawner.update(time.delta_seconds(), world);

    let (width, height) = (parameters.width, parameters.height);
    for (i, particle) in world.particles().iter().enumerate().skip(spawned.0) {
        let [r, g, b] = particle.color;

        commands.spawn((
            MaterialMesh2dBundle {
                mesh: Mesh2dHandle(meshes.add(Circle::new(particle.radius))),
                material: materials.add(ColorMaterial::from(Color::rgb_u8(r, g, b))),
                transform: Transform::from_xyz(
                    particle.position.x - width / 2.0,
                    height / 2.0 - particle.position.y,
                    0.0,
                ),
                ..Default::default()
            },
            BodyIndex(i),
        ));
    }
    spawned.0 = world.particles().len();
}

fn physics_step_system(mut scenario: ResMut<Scenario>, snapshot: Res<InputSnapshot>) {
    let Scenario { world, .. } = &mut *scenario;
    world.update(FIXED_DT, &snapshot.0);
}

fn sync_transforms_system(
    scenario: Res<Scenario>,
    mut query: Query<(&BodyIndex, &mut Transform)>,
) {
    let width = scenario.parameters.width;
    let height = scenario.parameters.height;

    for (BodyIndex(i), mut transform) in &mut query {
        if let Some(particle) = scenario.world.particles().get(*i) {
            transform.translation.x = particle.position.x - width / 2.0;
            transform.translation.y = height / 2.0 - particle.position.y;
        }
    }
}

fn stats_text_system(
    scenario: Res<Scenario>,
    time: Res<Time>,
    mut query: Query<&mut Text, With<StatsText>>,
) {
    for mut text in &mut query {
        text.sections[0].value = format!(
            "particles: {}\nframe: {:.2} ms",
            scenario.world.len(),
            time.delta_seconds() * 1000.0,
        );
    }
}

/// Persist positions on exit, or on demand with S
fn snapshot_system(
    mut exits: EventReader<AppExit>,
    keys: Res<ButtonInput<KeyCode>>,
    scenario: Res<Scenario>,
) {
    let save = exits.read().next().is_some() || keys.just_pressed(KeyCode::KeyS);
    if !save {
        return;
    }

    match snapshot::save_positions(Path::new(snapshot::SNAPSHOT_PATH), scenario.world.particles())
    {
        Ok(()) => log::info!(
            "saved {} positions to {}",
            scenario.world.len(),
            snapshot::SNAPSHOT_PATH
        ),
        Err(err) => log::warn!("snapshot save failed: {err}"),
    }
}
