//! # Physics Integration
//!
//! Helpers between the character controller and Avian:
//! - `cast_ground` -> ground height under a point
//! - `resolve_vertical` -> snap to ground or fall with gravity
//! - `kinematic_velocity` -> velocity carrying a kinematic body to a target
//! - `box_angular_velocity` -> spin a box gets from an angular impulse
//!
//! Also owns the physics viewer toggle (Avian collider gizmos).

use std::any::TypeId;

use avian3d::prelude::*;
use bevy::gizmos::config::GizmoConfigStore;
use bevy::prelude::*;
use sambayard_common::DemoConfig;

use crate::SambayardSet;

/// How far below a point the ground probe looks.
pub const GROUND_RAY_LENGTH: f32 = 100.0;

// ============================================================================
// Physics Plugin
// ============================================================================

/// Plugin for runtime physics helpers.
pub struct RuntimePhysicsPlugin;

impl Plugin for RuntimePhysicsPlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<PhysicsDebugState>()
            .init_resource::<PhysicsDebugState>()
            .add_systems(
                Update,
                (
                    toggle_physics_debug,
                    apply_physics_debug.run_if(resource_changed::<PhysicsDebugState>),
                )
                    .chain()
                    .in_set(SambayardSet::Input),
            );
    }
}

// ============================================================================
// Physics Debug
// ============================================================================

/// Whether Avian's collider gizmos are drawn. Hidden at startup.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq, Eq, Reflect)]
#[reflect(Resource)]
pub struct PhysicsDebugState {
    pub visible: bool,
}

impl PhysicsDebugState {
    /// Flip visibility, returning the new value.
    pub fn toggle(&mut self) -> bool {
        self.visible = !self.visible;
        self.visible
    }
}

/// Flip the physics viewer when its key is pressed.
pub fn toggle_physics_debug(
    keys: Res<ButtonInput<KeyCode>>,
    config: Res<DemoConfig>,
    mut state: ResMut<PhysicsDebugState>,
) {
    if keys.just_pressed(config.keys.toggle_physics_debug) {
        let visible = state.toggle();
        info!("Physics viewer {}", if visible { "shown" } else { "hidden" });
    }
}

/// Push `PhysicsDebugState` into the gizmo config.
///
/// No-op when `PhysicsDebugPlugin` is not installed.
pub fn apply_physics_debug(
    state: Res<PhysicsDebugState>,
    config_store: Option<ResMut<GizmoConfigStore>>,
) {
    let Some(mut config_store) = config_store else { return };
    match config_store.get_config_mut_dyn(&TypeId::of::<PhysicsGizmos>()) {
        Some((config, _)) => config.enabled = state.visible,
        None => trace!("PhysicsGizmos not registered, physics viewer unavailable"),
    }
}

// ============================================================================
// Ground Probe
// ============================================================================

/// Height of the first surface straight below `origin`, ignoring `exclude`.
pub fn cast_ground(
    spatial_query: &SpatialQuery,
    origin: Vec3,
    max_distance: f32,
    exclude: Entity,
) -> Option<f32> {
    let filter = SpatialQueryFilter::default().with_excluded_entities([exclude]);
    spatial_query
        .cast_ray(origin, Dir3::NEG_Y, max_distance, true, &filter)
        .map(|hit| origin.y - hit.distance)
}

/// Result of one vertical update.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VerticalStep {
    /// New height of the body centre
    pub y: f32,
    /// Vertical velocity, negative while falling
    pub fall_speed: f32,
    pub grounded: bool,
}

/// Vertical update for a body whose centre sits `half_height` above its feet.
///
/// - ground within `snap` of the feet (above or below): stand on it
/// - ground further above: a wall or tall box, height unchanged
/// - otherwise: integrate `gravity`, landing on the ground if reached
pub fn resolve_vertical(
    y: f32,
    ground: Option<f32>,
    fall_speed: f32,
    gravity: f32,
    dt: f32,
    half_height: f32,
    snap: f32,
) -> VerticalStep {
    let rest = ground.map(|g| g + half_height);

    if let Some(rest) = rest {
        let gap = y - rest;
        if gap.abs() <= snap {
            return VerticalStep { y: rest, fall_speed: 0.0, grounded: true };
        }
        if gap < 0.0 {
            return VerticalStep { y, fall_speed: 0.0, grounded: true };
        }
    }

    let fall_speed = fall_speed + gravity * dt;
    let next = y + fall_speed * dt;
    match rest {
        Some(rest) if next <= rest => VerticalStep { y: rest, fall_speed: 0.0, grounded: true },
        _ => VerticalStep { y: next, fall_speed, grounded: false },
    }
}

// ============================================================================
// Body Helpers
// ============================================================================

/// Velocity that moves a kinematic body from `current` to `target` in `dt`.
pub fn kinematic_velocity(current: Vec3, target: Vec3, dt: f32) -> Vec3 {
    if dt <= 0.0 {
        return Vec3::ZERO;
    }
    (target - current) / dt
}

/// Angular velocity a resting uniform cube gains from angular impulse `impulse`.
///
/// Solid cube inertia about any axis through its centre: `m * s² / 6`.
pub fn box_angular_velocity(impulse: Vec3, mass: f32, size: f32) -> Vec3 {
    let inertia = mass * size * size / 6.0;
    if inertia <= 0.0 {
        return Vec3::ZERO;
    }
    impulse / inertia
}
