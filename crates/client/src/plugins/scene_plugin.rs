//! # Scene Plugin
//!
//! Spawns the yard: ground, a handful of dynamic boxes given a random spin,
//! the character and its orbit camera.

use avian3d::prelude::*;
use bevy::core_pipeline::tonemapping::Tonemapping;
use bevy::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use sambayard_common::{DemoConfig, SceneConfig};
use sambayard_runtime::camera::OrbitCamera;
use sambayard_runtime::character::spawn_character;
use sambayard_runtime::physics::box_angular_velocity;

pub struct ScenePlugin;

impl Plugin for ScenePlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, setup_scene);
    }
}

fn setup_scene(
    mut commands: Commands,
    asset_server: Res<AssetServer>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    config: Res<DemoConfig>,
) {
    let scene = &config.scene;

    spawn_ground(&mut commands, &mut meshes, &mut materials, scene);

    let mut rng = match scene.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    for i in 0..scene.box_count {
        spawn_box(&mut commands, &mut meshes, &mut materials, scene, &mut rng, i);
    }

    let character = spawn_character(&mut commands, &asset_server, &config.character);

    commands.spawn((
        Name::new("OrbitCamera"),
        Camera3d::default(),
        Tonemapping::Reinhard, // Avoid magenta bug from missing LUT textures
        OrbitCamera::from_config(character, &config.camera),
        Transform::default(),
    ));

    info!(
        "Scene ready: {}m ground, {} boxes, character {:?}",
        scene.ground_size, scene.box_count, character
    );
}

/// Ground plane with a static box collider whose top face sits at y = 0.
fn spawn_ground(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
    scene: &SceneConfig,
) {
    let size = scene.ground_size;
    commands
        .spawn((
            Name::new("Ground"),
            Mesh3d(meshes.add(Plane3d::default().mesh().size(size, size))),
            MeshMaterial3d(materials.add(StandardMaterial {
                base_color: Color::srgb(0.6, 0.6, 0.6),
                perceptual_roughness: 0.9,
                ..default()
            })),
            Transform::IDENTITY,
            RigidBody::Static,
        ))
        .with_children(|parent| {
            parent.spawn((
                Name::new("GroundCollider"),
                Collider::cuboid(size, 1.0, size),
                Transform::from_xyz(0.0, -0.5, 0.0),
            ));
        });
}

fn spawn_box(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
    scene: &SceneConfig,
    rng: &mut StdRng,
    index: u32,
) {
    let size = scene.box_size;
    let color = Color::srgb(rng.gen(), rng.gen(), rng.gen());
    let position = Vec3::new(
        rng.gen_range(-3.0..3.0),
        rng.gen_range(4.0..6.0),
        rng.gen_range(5.0..7.0),
    );
    let impulse = Vec3::new(rng.gen(), rng.gen(), rng.gen());

    commands.spawn((
        Name::new(format!("Box{index}")),
        Mesh3d(meshes.add(Cuboid::new(size, size, size))),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: color,
            ..default()
        })),
        Transform::from_translation(position),
        RigidBody::Dynamic,
        Collider::cuboid(size, size, size),
        Mass(scene.box_mass),
        AngularVelocity(box_angular_velocity(impulse, scene.box_mass, size)),
    ));
}
