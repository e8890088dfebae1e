//! # Debug Keys
//!
//! Screenshot key saves the primary window to `screenshot-<n>.png` in the
//! working directory. The physics viewer key lives in the runtime's
//! `RuntimePhysicsPlugin`, which also hides Avian's gizmos on the first frame.

use bevy::prelude::*;
use bevy::render::view::screenshot::{save_to_disk, Screenshot};
use sambayard_common::DemoConfig;

pub struct DebugKeysPlugin;

impl Plugin for DebugKeysPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ScreenshotCounter>()
            .add_systems(Update, take_screenshot);
    }
}

/// Number of screenshots taken this run.
#[derive(Resource, Debug, Default)]
pub struct ScreenshotCounter(pub u32);

impl ScreenshotCounter {
    /// File name for the next screenshot.
    pub fn next_path(&mut self) -> String {
        let path = format!("screenshot-{}.png", self.0);
        self.0 += 1;
        path
    }
}

fn take_screenshot(
    mut commands: Commands,
    keys: Res<ButtonInput<KeyCode>>,
    config: Res<DemoConfig>,
    mut counter: ResMut<ScreenshotCounter>,
) {
    if !keys.just_pressed(config.keys.screenshot) {
        return;
    }
    let path = counter.next_path();
    info!("Saving screenshot to {}", path);
    commands
        .spawn(Screenshot::primary_window())
        .observe(save_to_disk(path));
}
