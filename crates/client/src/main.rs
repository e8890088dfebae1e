//! Sambayard Client - third-person character demo
//!
//! A ground plane, a few tumbling boxes, a sky, and a character that walks
//! relative to the orbit camera and dances on demand.
//!
//! ## Controls
//! - WASD: walk (camera-relative), B: dance
//! - Left drag: orbit, wheel: zoom
//! - P: screenshot, V: physics viewer
//!
//! ## Usage
//! ```text
//! sambayard [config.toml]
//! ```

mod plugins;

use avian3d::prelude::*;
use bevy::log::{Level, LogPlugin};
use bevy::prelude::*;
use sambayard_common::config::DEFAULT_CONFIG_PATH;
use sambayard_common::DemoConfig;
use sambayard_runtime::SambayardRuntimePlugin;
use std::path::PathBuf;

use plugins::{DebugKeysPlugin, LightingPlugin, ScenePlugin};

fn main() {
    // Parse command line args
    let args: Vec<String> = std::env::args().collect();
    let config_path = args
        .get(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));

    // Logging isn't up yet, so report the outcome once LogPlugin is built
    let (config, source) = DemoConfig::load_reporting(&config_path);
    let level = config.log.level.parse::<Level>().unwrap_or(Level::INFO);

    let mut app = App::new();
    app.add_plugins(
        DefaultPlugins
            .set(WindowPlugin {
                primary_window: Some(Window {
                    title: "Sambayard".to_string(),
                    present_mode: bevy::window::PresentMode::Fifo, // VSync
                    ..default()
                }),
                ..default()
            })
            .set(LogPlugin {
                level,
                filter: config.log.filter.clone(),
                ..default()
            }),
    );

    source.report(&config_path);

    app
        // Physics (Avian3D)
        .add_plugins(PhysicsPlugins::default())
        .add_plugins(PhysicsDebugPlugin::default())
        .insert_resource(Gravity(Vec3::Y * config.scene.gravity))
        .insert_resource(config)
        // Character, animation, camera
        .add_plugins(SambayardRuntimePlugin)
        // World
        .add_plugins((LightingPlugin, ScenePlugin, DebugKeysPlugin))
        .run();
}
