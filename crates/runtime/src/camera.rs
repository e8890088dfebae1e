//! # Orbit Camera
//!
//! Arc-rotate camera: sits on a sphere around its target entity, described
//! by azimuth `alpha`, polar angle `beta` (from +Y) and `radius`.
//! Left-drag rotates, the wheel zooms.

use bevy::input::mouse::{MouseMotion, MouseScrollUnit, MouseWheel};
use bevy::prelude::*;
use bevy::transform::TransformSystems;
use sambayard_common::CameraConfig;

use crate::SambayardSet;

/// Pixels per wheel "line" on devices that report lines.
const PIXELS_PER_LINE: f32 = 100.0;

// ============================================================================
// Component
// ============================================================================

#[derive(Component, Debug, Clone, PartialEq, Reflect)]
#[reflect(Component)]
pub struct OrbitCamera {
    /// Entity orbited and looked at
    pub target: Entity,
    /// Look-at point relative to the target's origin
    pub target_offset: Vec3,
    pub alpha: f32,
    pub beta: f32,
    pub radius: f32,
    pub lower_radius_limit: f32,
    pub upper_radius_limit: Option<f32>,
    pub lower_beta_limit: f32,
    pub upper_beta_limit: f32,
    /// Wheel pixels per unit of radius
    pub wheel_precision: f32,
    /// Mouse pixels per radian
    pub angular_sensibility: f32,
}

impl OrbitCamera {
    pub fn from_config(target: Entity, config: &CameraConfig) -> Self {
        let mut camera = Self {
            target,
            target_offset: Vec3::Y * config.target_offset_y,
            alpha: config.alpha,
            beta: config.beta,
            radius: config.radius,
            lower_radius_limit: config.lower_radius_limit,
            upper_radius_limit: config.upper_radius_limit,
            lower_beta_limit: config.lower_beta_limit,
            upper_beta_limit: config.upper_beta_limit,
            wheel_precision: config.wheel_precision,
            angular_sensibility: config.angular_sensibility,
        };
        camera.clamp_to_limits();
        camera
    }

    /// Camera position relative to the look-at point.
    pub fn offset(&self) -> Vec3 {
        orbit_position(Vec3::ZERO, self.alpha, self.beta, self.radius)
    }

    /// Direction the camera looks in.
    pub fn forward(&self) -> Vec3 {
        (-self.offset()).normalize_or(Vec3::NEG_Z)
    }

    /// Camera transform orbiting `focus`.
    pub fn transform_around(&self, focus: Vec3) -> Transform {
        Transform::from_translation(focus + self.offset()).looking_at(focus, Vec3::Y)
    }

    /// Mouse drag of `delta` pixels. Dragging right swings the camera to the
    /// viewer's left, so the scene turns with the cursor.
    pub fn rotate(&mut self, delta: Vec2) {
        // Bevy is right-handed: +alpha moves the camera toward its own left
        self.alpha += delta.x / self.angular_sensibility;
        self.beta -= delta.y / self.angular_sensibility;
        self.clamp_to_limits();
    }

    /// Wheel scroll of `pixels` (positive = away from the user = zoom in).
    pub fn zoom(&mut self, pixels: f32) {
        self.radius -= pixels / self.wheel_precision;
        self.clamp_to_limits();
    }

    fn clamp_to_limits(&mut self) {
        self.beta = self.beta.clamp(self.lower_beta_limit, self.upper_beta_limit);
        self.radius = self.radius.max(self.lower_radius_limit);
        if let Some(upper) = self.upper_radius_limit {
            self.radius = self.radius.min(upper);
        }
    }
}

/// Point on the orbit sphere around `target`.
pub fn orbit_position(target: Vec3, alpha: f32, beta: f32, radius: f32) -> Vec3 {
    let (sin_a, cos_a) = alpha.sin_cos();
    let (sin_b, cos_b) = beta.sin_cos();
    target + radius * Vec3::new(cos_a * sin_b, cos_b, sin_a * sin_b)
}

// ============================================================================
// Plugin
// ============================================================================

pub struct OrbitCameraPlugin;

impl Plugin for OrbitCameraPlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<OrbitCamera>()
            .add_systems(Update, orbit_camera_input.in_set(SambayardSet::Input))
            // After Avian writes back body transforms, before propagation
            .add_systems(PostUpdate, follow_orbit_target.before(TransformSystems::Propagate));
    }
}

// ============================================================================
// Systems
// ============================================================================

/// Apply mouse drag and wheel to every orbit camera.
pub fn orbit_camera_input(
    buttons: Res<ButtonInput<MouseButton>>,
    mut motion: MessageReader<MouseMotion>,
    mut wheel: MessageReader<MouseWheel>,
    mut cameras: Query<&mut OrbitCamera>,
) {
    let drag: Vec2 = motion.read().map(|m| m.delta).sum();
    let scroll: f32 = wheel
        .read()
        .map(|w| match w.unit {
            MouseScrollUnit::Line => w.y * PIXELS_PER_LINE,
            MouseScrollUnit::Pixel => w.y,
        })
        .sum();

    let dragging = buttons.pressed(MouseButton::Left) && drag != Vec2::ZERO;
    if !dragging && scroll == 0.0 {
        return;
    }

    for mut camera in cameras.iter_mut() {
        if dragging {
            camera.rotate(drag);
        }
        if scroll != 0.0 {
            camera.zoom(scroll);
        }
    }
}

/// Place each orbit camera on its sphere, looking at the target.
pub fn follow_orbit_target(
    targets: Query<&Transform, Without<OrbitCamera>>,
    mut cameras: Query<(&OrbitCamera, &mut Transform)>,
) {
    for (camera, mut transform) in cameras.iter_mut() {
        let Ok(target) = targets.get(camera.target) else {
            continue;
        };
        let focus = target.translation + camera.target_offset;
        *transform = camera.transform_around(focus);
    }
}
