//! # Sambayard Runtime
//!
//! Bevy plugins that run the Sambayard character demo.
//!
//! ## Modules
//!
//! - [`character`]: Character controller driven by held keys and the camera
//! - [`animation`]: glTF clip lookup, animation graph setup, weight blending
//! - [`camera`]: Arc-rotate camera orbiting the character
//! - [`physics`]: Ground raycast, kinematic velocity, physics debug toggle
//!
//! ## Frame Order
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │  Update                                                         │
//! ├─────────────────────────────────────────────────────────────────┤
//! │  Input      orbit drag/zoom, held movement keys                 │
//! │  Character  facing slerp, body velocity or transform, blend     │
//! │  Animation  graph setup, weights + play/pause onto the player   │
//! ├─────────────────────────────────────────────────────────────────┤
//! │  FixedPostUpdate (Avian)                                        │
//! │  └── kinematic body carried toward its target, boxes pushed     │
//! ├─────────────────────────────────────────────────────────────────┤
//! │  PostUpdate                                                     │
//! │  └── orbit camera follows the character                        │
//! └─────────────────────────────────────────────────────────────────┘
//! ```

pub mod animation;
pub mod camera;
pub mod character;
pub mod physics;

use bevy::prelude::*;
use sambayard_common::DemoConfig;

// ============================================================================
// System Sets
// ============================================================================

/// Ordering of the per-frame character update inside `Update`.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SambayardSet {
    /// Mouse and keyboard read into components
    Input,
    /// Character step and body update
    Character,
    /// Blend weights pushed to the animation player
    Animation,
}

// ============================================================================
// Runtime Plugin
// ============================================================================

/// Main runtime plugin.
///
/// Expects Avian's `PhysicsPlugins` to be added by the app.
///
/// # Example
/// ```rust,ignore
/// use avian3d::prelude::*;
/// use bevy::prelude::*;
/// use sambayard_runtime::SambayardRuntimePlugin;
///
/// fn main() {
///     App::new()
///         .add_plugins((DefaultPlugins, PhysicsPlugins::default()))
///         .add_plugins(SambayardRuntimePlugin)
///         .run();
/// }
/// ```
pub struct SambayardRuntimePlugin;

impl Plugin for SambayardRuntimePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<DemoConfig>().configure_sets(
            Update,
            (
                SambayardSet::Input,
                SambayardSet::Character,
                SambayardSet::Animation,
            )
                .chain(),
        );

        app.add_plugins((
            camera::OrbitCameraPlugin,
            character::CharacterPlugin,
            animation::CharacterAnimationPlugin,
            physics::RuntimePhysicsPlugin,
        ));

        info!("Sambayard runtime initialized");
    }
}

// ============================================================================
// Prelude
// ============================================================================

/// Convenient re-exports for common runtime types.
pub mod prelude {
    pub use super::animation::{
        CharacterAnimationPlugin, CharacterAnimationSource, CharacterAnimations,
    };
    pub use super::camera::{orbit_position, OrbitCamera, OrbitCameraPlugin};
    pub use super::character::{
        plan_body_update, spawn_character, BodyUpdate, CharacterController, CharacterInput,
        CharacterPlugin, CharacterStep,
    };
    pub use super::physics::{PhysicsDebugState, RuntimePhysicsPlugin};
    pub use super::{SambayardRuntimePlugin, SambayardSet};
}
