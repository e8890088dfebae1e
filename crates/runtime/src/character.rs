//! # Character Controller
//!
//! Turns held keys and the camera's look direction into a facing, a body
//! update and an animation target every frame.
//!
//! ## Design
//!
//! - **Pure step**: `CharacterController::step` holds all per-frame logic and
//!   needs no `World`, so it is tested directly
//! - **Camera-relative**: forward is wherever the orbit camera looks
//! - **Two body modes**: kinematic target (default) or raycast-ground transform

use avian3d::prelude::*;
use bevy::gltf::GltfAssetLabel;
use bevy::prelude::*;
use sambayard_common::{
    camera_forward_on_ground, facing_rotation, turn_offset, AnimationClip as CharacterClip,
    AnimationWeights, CharacterConfig, DemoConfig, MovementKeys, MovementMode, PlaybackChange,
};

use crate::animation::CharacterAnimationSource;
use crate::camera::OrbitCamera;
use crate::physics::{
    cast_ground, kinematic_velocity, resolve_vertical, VerticalStep, GROUND_RAY_LENGTH,
};
use crate::SambayardSet;

// ============================================================================
// Components
// ============================================================================

/// Runtime state for a character controller.
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct CharacterController {
    /// Current facing, slerped toward the key/camera direction while moving
    pub facing: Quat,
    pub weights: AnimationWeights,
    pub target_clip: CharacterClip,

    pub move_speed: f32,
    pub rotation_speed: f32,
    pub animation_blend_speed: f32,
    pub movement_mode: MovementMode,

    /// Capsule centre to feet
    pub half_height: f32,
    /// Distance within which the feet snap to the ground
    pub ground_probe: f32,
    /// Vertical velocity, negative while falling
    pub fall_speed: f32,
    pub grounded: bool,
}

impl Default for CharacterController {
    fn default() -> Self {
        Self::from_config(&CharacterConfig::default())
    }
}

/// Input held this frame.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Eq, Reflect)]
#[reflect(Component)]
pub struct CharacterInput {
    pub keys: MovementKeys,
    pub dance: bool,
}

/// Output of one controller step.
#[derive(Debug, Clone, PartialEq)]
pub struct CharacterStep {
    /// World-space horizontal movement for this frame
    pub displacement: Vec3,
    pub facing: Quat,
    pub moving: bool,
    pub target_clip: CharacterClip,
    pub playback_changes: Vec<PlaybackChange>,
}

/// What to write to the body this frame. `None` leaves the field alone.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyUpdate {
    pub velocity: Option<Vec3>,
    pub translation: Option<Vec3>,
}

/// Decide how the body reaches `target` from `current`.
///
/// Kinematic target mode drives `LinearVelocity` so the solver pushes what
/// the capsule walks into, and teleports only when there is no velocity to
/// drive. Raycast ground mode zeroes any velocity and writes the position.
pub fn plan_body_update(
    mode: MovementMode,
    has_velocity: bool,
    current: Vec3,
    target: Vec3,
    dt: f32,
) -> BodyUpdate {
    match mode {
        MovementMode::KinematicTarget if has_velocity => BodyUpdate {
            velocity: Some(kinematic_velocity(current, target, dt)),
            translation: None,
        },
        MovementMode::KinematicTarget => BodyUpdate {
            velocity: None,
            translation: Some(target),
        },
        MovementMode::RaycastGround => BodyUpdate {
            velocity: has_velocity.then_some(Vec3::ZERO),
            translation: (target != current).then_some(target),
        },
    }
}

impl CharacterController {
    pub fn from_config(config: &CharacterConfig) -> Self {
        Self {
            facing: Quat::IDENTITY,
            weights: AnimationWeights::default(),
            target_clip: CharacterClip::Idle,
            move_speed: config.move_speed,
            rotation_speed: config.rotation_speed,
            animation_blend_speed: config.animation_blend_speed,
            movement_mode: config.movement_mode,
            half_height: config.half_height(),
            ground_probe: config.ground_probe,
            fall_speed: 0.0,
            grounded: false,
        }
    }

    /// Take the fall state from `vertical`. Returns true on the frame the
    /// character touches down.
    pub fn apply_vertical(&mut self, vertical: &VerticalStep) -> bool {
        let landed = vertical.grounded && !self.grounded;
        self.fall_speed = vertical.fall_speed;
        self.grounded = vertical.grounded;
        landed
    }

    /// Advance facing and blend weights by one frame.
    ///
    /// `camera_forward` is the camera's look direction; only its ground-plane
    /// part is used. Facing changes only while a movement key is held.
    pub fn step(&mut self, input: &CharacterInput, camera_forward: Vec3, dt: f32) -> CharacterStep {
        let dt = dt.max(0.0);
        let moving = input.keys.any();
        let mut displacement = Vec3::ZERO;
        let mut target_clip = CharacterClip::Idle;

        if moving {
            let forward = camera_forward_on_ground(camera_forward)
                .unwrap_or_else(|| self.facing * Vec3::NEG_Z);
            let goal = facing_rotation(forward, turn_offset(input.keys));
            let t = (self.rotation_speed * dt).min(1.0);
            self.facing = self.facing.slerp(goal, t).normalize();
            displacement = self.facing * Vec3::NEG_Z * self.move_speed * dt;
            target_clip = CharacterClip::Walk;
        }

        // Dance wins the animation but movement still applies
        if input.dance {
            target_clip = CharacterClip::Dance;
        }

        self.target_clip = target_clip;
        let playback_changes = self.weights.blend(target_clip, self.animation_blend_speed * dt);

        CharacterStep {
            displacement,
            facing: self.facing,
            moving,
            target_clip,
            playback_changes,
        }
    }
}

// ============================================================================
// Character Plugin
// ============================================================================

/// Plugin for character movement.
pub struct CharacterPlugin;

impl Plugin for CharacterPlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<CharacterController>()
            .register_type::<CharacterInput>()
            .add_systems(Update, read_character_input.in_set(SambayardSet::Input))
            .add_systems(Update, drive_characters.in_set(SambayardSet::Character));
    }
}

// ============================================================================
// Systems
// ============================================================================

/// Refresh `CharacterInput` from the keyboard and the configured bindings.
pub fn read_character_input(
    keys: Res<ButtonInput<KeyCode>>,
    config: Res<DemoConfig>,
    mut query: Query<&mut CharacterInput>,
) {
    let pressed = |key: KeyCode| keys.pressed(key);
    let held = CharacterInput {
        keys: config.keys.movement_keys(pressed),
        dance: config.keys.dance_held(pressed),
    };

    for mut input in query.iter_mut() {
        // Only write on change so Changed<CharacterInput> stays meaningful
        input.set_if_neq(held);
    }
}

/// Run the controller step and move the body.
///
/// Reads:
/// - `CharacterInput`, the `OrbitCamera` targeting this character
/// - ground height below the capsule centre
///
/// Writes:
/// - `CharacterController` (facing, weights, fall state)
/// - `LinearVelocity` + `Transform.rotation` (kinematic target mode)
/// - `Transform` (raycast ground mode)
pub fn drive_characters(
    time: Res<Time>,
    gravity: Option<Res<Gravity>>,
    spatial_query: SpatialQuery,
    cameras: Query<&OrbitCamera>,
    mut characters: Query<(
        Entity,
        &CharacterInput,
        &mut CharacterController,
        &mut Transform,
        Option<&mut LinearVelocity>,
    )>,
) {
    let dt = time.delta_secs();
    let gravity_y = gravity.map(|g| g.0.y).unwrap_or(-9.81);

    for (entity, input, mut controller, mut transform, velocity) in characters.iter_mut() {
        let camera_forward = cameras
            .iter()
            .find(|camera| camera.target == entity)
            .map(OrbitCamera::forward)
            .unwrap_or_else(|| controller.facing * Vec3::NEG_Z);

        let step = controller.step(input, camera_forward, dt);
        for change in &step.playback_changes {
            debug!("Character {:?}: {:?}", entity, change);
        }

        let current = transform.translation;
        let ground = cast_ground(&spatial_query, current, GROUND_RAY_LENGTH, entity);
        if ground.is_none() {
            trace!("No ground under character {:?} at {:?}", entity, current);
        }
        let vertical = resolve_vertical(
            current.y,
            ground,
            controller.fall_speed,
            gravity_y,
            dt,
            controller.half_height,
            controller.ground_probe,
        );
        if controller.apply_vertical(&vertical) {
            debug!("Character {:?} landed at y = {:.2}", entity, vertical.y);
        }

        let mut target = current + step.displacement;
        target.y = vertical.y;

        if step.moving {
            transform.rotation = step.facing;
        }

        let update = plan_body_update(
            controller.movement_mode,
            velocity.is_some(),
            current,
            target,
            dt,
        );
        if let (Some(mut velocity), Some(planned)) = (velocity, update.velocity) {
            velocity.0 = planned;
        }
        if let Some(translation) = update.translation {
            transform.translation = translation;
        }
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Spawn the player character: kinematic capsule body with the glTF model
/// as a child, offset down to the capsule's feet and turned to face -Z.
pub fn spawn_character(
    commands: &mut Commands,
    asset_server: &AssetServer,
    config: &CharacterConfig,
) -> Entity {
    let half_height = config.half_height();
    let cylinder_length = (config.capsule_height - 2.0 * config.capsule_radius).max(0.0);

    let character = commands
        .spawn((
            Name::new("Character"),
            Transform::from_xyz(0.0, config.spawn_height, 0.0),
            Visibility::default(),
            CharacterController::from_config(config),
            CharacterInput::default(),
            CharacterAnimationSource::from_config(asset_server, config),
            RigidBody::Kinematic,
            Collider::capsule(config.capsule_radius, cylinder_length),
            Friction::new(0.5),
            LinearVelocity::default(),
        ))
        .id();

    let scene = asset_server.load(GltfAssetLabel::Scene(0).from_asset(config.model_path.clone()));
    commands.spawn((
        Name::new("CharacterModel"),
        SceneRoot(scene),
        Transform::from_xyz(0.0, -half_height, 0.0)
            .with_rotation(Quat::from_rotation_y(std::f32::consts::PI)),
        ChildOf(character),
    ));

    info!(
        "Spawned character {:?} at height {:.1} ({:?})",
        character, config.spawn_height, config.movement_mode
    );
    character
}
