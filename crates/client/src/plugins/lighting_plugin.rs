//! # Lighting Plugin
//!
//! Provides:
//! - Shadow-casting sun along the configured direction
//! - Ambient light
//! - Procedural sky cubemap, used both as `Skybox` and as the camera's
//!   environment map so PBR materials pick up sky reflections

use bevy::core_pipeline::Skybox;
use bevy::light::{DirectionalLightShadowMap, GlobalAmbientLight};
use bevy::prelude::*;
use bevy::render::render_resource::{
    Extent3d, TextureDimension, TextureFormat, TextureViewDescriptor, TextureViewDimension,
};
use sambayard_common::DemoConfig;

// ============================================================================
// Plugin
// ============================================================================

pub struct LightingPlugin;

impl Plugin for LightingPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<SkyboxHandle>()
            .add_systems(Startup, setup_lighting)
            .add_systems(Update, attach_skybox_to_cameras);
    }
}

/// Handle to the generated sky cubemap
#[derive(Resource, Default)]
pub struct SkyboxHandle {
    pub handle: Option<Handle<Image>>,
}

/// Setup sun, ambient light and sky
fn setup_lighting(
    mut commands: Commands,
    mut images: ResMut<Assets<Image>>,
    mut skybox_handle: ResMut<SkyboxHandle>,
    config: Res<DemoConfig>,
) {
    let scene = &config.scene;
    let sun_dir = Vec3::from(scene.sun_direction).normalize_or(Vec3::NEG_Y);

    skybox_handle.handle = Some(create_procedural_skybox(&mut images, sun_dir));

    commands.insert_resource(DirectionalLightShadowMap {
        size: scene.shadow_map_size,
    });

    commands.spawn((
        DirectionalLight {
            illuminance: 10_000.0,
            shadows_enabled: true,
            ..default()
        },
        Transform::from_translation(-sun_dir * scene.sun_distance).looking_to(sun_dir, Vec3::Y),
        Name::new("Sun"),
    ));

    // GlobalAmbientLight is a Resource in Bevy 0.18
    commands.insert_resource(GlobalAmbientLight {
        color: Color::WHITE,
        brightness: scene.ambient_intensity * 1000.0,
        affects_lightmapped_meshes: true,
    });

    info!("Lighting ready, sun direction {:?}", sun_dir);
}

// ============================================================================
// Skybox Generation
// ============================================================================

/// Create a procedural gradient skybox cubemap
///
/// Each face pixel is mapped to a 3D direction, colored by elevation, then
/// brightened near the sun so the sky agrees with the light.
pub fn create_procedural_skybox(images: &mut Assets<Image>, sun_direction: Vec3) -> Handle<Image> {
    const SIZE: u32 = 256;

    let mut data = Vec::with_capacity((SIZE * SIZE * 6 * 4) as usize);
    let towards_sun = -sun_direction;

    // Cubemap face order: +X, -X, +Y, -Y, +Z, -Z
    for face in 0..6u32 {
        for py in 0..SIZE {
            for px in 0..SIZE {
                // Map pixel to [-1, 1] UV
                let u = (px as f32 + 0.5) / SIZE as f32 * 2.0 - 1.0;
                let v = (py as f32 + 0.5) / SIZE as f32 * 2.0 - 1.0;
                let dir = cube_face_direction(face, u, v);

                let color = sky_color(dir, towards_sun);
                data.extend(color.map(|c| (c.clamp(0.0, 1.0) * 255.0) as u8));
                data.push(255);
            }
        }
    }

    let mut image = Image::new(
        Extent3d {
            width: SIZE,
            height: SIZE,
            depth_or_array_layers: 6,
        },
        TextureDimension::D2,
        data,
        TextureFormat::Rgba8UnormSrgb,
        bevy::asset::RenderAssetUsages::RENDER_WORLD,
    );

    // Configure as cubemap
    image.texture_view_descriptor = Some(TextureViewDescriptor {
        dimension: Some(TextureViewDimension::Cube),
        ..default()
    });

    images.add(image)
}

/// Unit direction through pixel `(u, v)` of cubemap `face`.
fn cube_face_direction(face: u32, u: f32, v: f32) -> Vec3 {
    let dir = match face {
        0 => Vec3::new(1.0, -v, -u),
        1 => Vec3::new(-1.0, -v, u),
        2 => Vec3::new(u, 1.0, v),
        3 => Vec3::new(u, -1.0, -v),
        4 => Vec3::new(u, -v, 1.0),
        _ => Vec3::new(-u, -v, -1.0),
    };
    dir.normalize()
}

/// sRGB colour of the sky looking along `dir`.
fn sky_color(dir: Vec3, towards_sun: Vec3) -> [f32; 3] {
    let zenith = Vec3::new(0.16, 0.32, 0.75);
    let mid_sky = Vec3::new(0.40, 0.60, 0.92);
    let horizon = Vec3::new(0.75, 0.82, 0.90);
    let ground = Vec3::new(0.22, 0.22, 0.20);
    let sun_glow = Vec3::new(1.0, 0.95, 0.85);

    let ny = dir.y;
    let base = if ny > 0.15 {
        let t = ((ny - 0.15) / 0.85).min(1.0);
        mid_sky.lerp(zenith, t * t)
    } else if ny > -0.05 {
        let t = ((ny + 0.05) / 0.20).clamp(0.0, 1.0);
        horizon.lerp(mid_sky, t)
    } else {
        let t = ((-ny - 0.05) / 0.35).min(1.0);
        horizon.lerp(ground, t.sqrt())
    };

    // Tight disc plus a wide halo around the sun, sky only
    let glow = if ny > -0.05 {
        let cos = dir.dot(towards_sun).max(0.0);
        cos.powf(512.0) + 0.25 * cos.powf(8.0)
    } else {
        0.0
    };

    base.lerp(sun_glow, glow.min(1.0)).to_array()
}

// ============================================================================
// Skybox Attachment System
// ============================================================================

/// Attach the sky to any Camera3d that doesn't have one
fn attach_skybox_to_cameras(
    mut commands: Commands,
    skybox_handle: Res<SkyboxHandle>,
    cameras_without_skybox: Query<Entity, (With<Camera3d>, Without<Skybox>)>,
) {
    let Some(ref skybox_image) = skybox_handle.handle else {
        return;
    };

    for camera_entity in cameras_without_skybox.iter() {
        info!("Attaching skybox to camera {:?}", camera_entity);

        commands.entity(camera_entity).insert((
            Skybox {
                image: skybox_image.clone(),
                brightness: 1000.0,
                rotation: Quat::IDENTITY,
            },
            EnvironmentMapLight {
                diffuse_map: skybox_image.clone(),
                specular_map: skybox_image.clone(),
                intensity: 400.0,
                rotation: Quat::IDENTITY,
                affects_lightmapped_mesh_diffuse: false,
            },
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cube_face_directions() {
        assert!((cube_face_direction(0, 0.0, 0.0) - Vec3::X).length() < 1e-6);
        assert!((cube_face_direction(2, 0.0, 0.0) - Vec3::Y).length() < 1e-6);
        assert!((cube_face_direction(5, 0.0, 0.0) - Vec3::NEG_Z).length() < 1e-6);
        assert!((cube_face_direction(3, 0.7, -0.2).length() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_sky_brighter_towards_sun() {
        let towards_sun = Vec3::new(5.0, 10.0, -5.0).normalize();
        let at_sun = Vec3::from(sky_color(towards_sun, towards_sun));
        let opposite = Vec3::new(-towards_sun.x, towards_sun.y, -towards_sun.z);
        let away = Vec3::from(sky_color(opposite, towards_sun));
        assert!(at_sun.element_sum() > away.element_sum());
    }

    #[test]
    fn test_ground_is_darker_than_sky() {
        let up = Vec3::from(sky_color(Vec3::Y, Vec3::NEG_Y));
        let down = Vec3::from(sky_color(Vec3::NEG_Y, Vec3::NEG_Y));
        assert!(down.element_sum() < up.element_sum());
        for c in sky_color(Vec3::NEG_Y, Vec3::NEG_Y) {
            assert!((0.0..=1.0).contains(&c));
        }
    }
}
