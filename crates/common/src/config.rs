//! # Demo Configuration
//!
//! TOML-based configuration for the character, camera, key bindings, scene and
//! logging. Every field has a default, so a config file only needs the values
//! it changes.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::direction::MovementKeys;
use crate::error::ConfigError;

/// Default config file looked up by the client when no path is given.
pub const DEFAULT_CONFIG_PATH: &str = "sambayard.toml";

// ============================================================================
// Main Config
// ============================================================================

/// Top-level configuration resource.
#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct DemoConfig {
    pub character: CharacterConfig,
    pub camera: CameraConfig,
    pub keys: KeyBindings,
    pub scene: SceneConfig,
    pub log: LogConfig,
}

impl DemoConfig {
    /// Load and validate a TOML config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from TOML file or return default
    pub fn load_or_default(path: &Path) -> Self {
        let (config, source) = Self::load_reporting(path);
        source.report(path);
        config
    }

    /// Like [`Self::load_or_default`], but hands back where the config came
    /// from instead of logging it. Lets callers report once logging is up.
    pub fn load_reporting(path: &Path) -> (Self, ConfigSource) {
        if !path.exists() {
            return (Self::default(), ConfigSource::Defaults);
        }
        match Self::load(path) {
            Ok(config) => (config, ConfigSource::Loaded),
            Err(e) => (Self::default(), ConfigSource::Fallback(e)),
        }
    }

    /// Save to TOML file
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content).map_err(|source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Reject values the per-frame update cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
            if value > 0.0 && value.is_finite() {
                Ok(())
            } else {
                Err(ConfigError::Invalid {
                    field,
                    reason: format!("must be positive, got {value}"),
                })
            }
        }

        let c = &self.character;
        positive("character.move_speed", c.move_speed)?;
        positive("character.rotation_speed", c.rotation_speed)?;
        positive("character.animation_blend_speed", c.animation_blend_speed)?;
        positive("character.capsule_radius", c.capsule_radius)?;
        if c.capsule_height < 2.0 * c.capsule_radius {
            return Err(ConfigError::Invalid {
                field: "character.capsule_height",
                reason: format!(
                    "must be at least twice the radius ({}), got {}",
                    2.0 * c.capsule_radius,
                    c.capsule_height
                ),
            });
        }
        if c.ground_probe < 0.0 {
            return Err(ConfigError::Invalid {
                field: "character.ground_probe",
                reason: format!("must not be negative, got {}", c.ground_probe),
            });
        }

        let cam = &self.camera;
        positive("camera.radius", cam.radius)?;
        positive("camera.wheel_precision", cam.wheel_precision)?;
        positive("camera.angular_sensibility", cam.angular_sensibility)?;
        if let Some(upper) = cam.upper_radius_limit {
            if upper < cam.lower_radius_limit {
                return Err(ConfigError::Invalid {
                    field: "camera.upper_radius_limit",
                    reason: format!(
                        "{upper} is below lower_radius_limit {}",
                        cam.lower_radius_limit
                    ),
                });
            }
        }
        if cam.upper_beta_limit < cam.lower_beta_limit {
            return Err(ConfigError::Invalid {
                field: "camera.upper_beta_limit",
                reason: format!(
                    "{} is below lower_beta_limit {}",
                    cam.upper_beta_limit, cam.lower_beta_limit
                ),
            });
        }

        let s = &self.scene;
        positive("scene.ground_size", s.ground_size)?;
        positive("scene.box_size", s.box_size)?;
        positive("scene.box_mass", s.box_mass)?;
        if Vec3::from(s.sun_direction).length_squared() == 0.0 {
            return Err(ConfigError::Invalid {
                field: "scene.sun_direction",
                reason: "must not be zero".to_string(),
            });
        }

        Ok(())
    }
}

/// Where a [`DemoConfig`] came from.
#[derive(Debug)]
pub enum ConfigSource {
    /// No file at the path
    Defaults,
    Loaded,
    /// The file was unreadable or invalid
    Fallback(ConfigError),
}

impl ConfigSource {
    pub fn report(&self, path: &Path) {
        match self {
            Self::Defaults => tracing::info!("No config at {}, using defaults", path.display()),
            Self::Loaded => tracing::info!("Loaded config from {}", path.display()),
            Self::Fallback(e) => tracing::warn!("{}; falling back to defaults", e),
        }
    }
}

// ============================================================================
// Character
// ============================================================================

/// How the character body follows the computed pose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Reflect)]
#[serde(rename_all = "snake_case")]
pub enum MovementMode {
    /// Kinematic body driven by velocity toward the target pose.
    #[default]
    KinematicTarget,
    /// Transform written directly, height taken from a ground raycast.
    RaycastGround,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CharacterConfig {
    /// Linear speed (m/s)
    pub move_speed: f32,
    /// Slerp factor per second toward the target facing
    pub rotation_speed: f32,
    /// Weight change per second
    pub animation_blend_speed: f32,
    pub capsule_height: f32,
    pub capsule_radius: f32,
    pub spawn_height: f32,
    pub movement_mode: MovementMode,
    /// Extra ray length below the capsule used to stay glued to the ground
    pub ground_probe: f32,
    /// glTF asset path, relative to the asset folder
    pub model_path: String,
    pub idle_clip: String,
    pub walk_clip: String,
    pub dance_clip: String,
}

impl Default for CharacterConfig {
    fn default() -> Self {
        Self {
            move_speed: 1.8,
            rotation_speed: 6.0,
            animation_blend_speed: 4.0,
            capsule_height: 2.0,
            capsule_radius: 0.5,
            spawn_height: 3.0,
            movement_mode: MovementMode::KinematicTarget,
            ground_probe: 0.5,
            model_path: "character.glb".to_string(),
            idle_clip: "Idle".to_string(),
            walk_clip: "Walking".to_string(),
            dance_clip: "SambaDancing".to_string(),
        }
    }
}

impl CharacterConfig {
    pub fn half_height(&self) -> f32 {
        self.capsule_height / 2.0
    }
}

// ============================================================================
// Camera
// ============================================================================

/// Arc-rotate camera settings. Angles in radians.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Azimuth around the target
    pub alpha: f32,
    /// Polar angle from +Y
    pub beta: f32,
    pub radius: f32,
    /// Height of the look-at point above the character origin
    pub target_offset_y: f32,
    /// Wheel pixels per unit of zoom
    pub wheel_precision: f32,
    /// Mouse pixels per radian of rotation
    pub angular_sensibility: f32,
    pub lower_radius_limit: f32,
    pub upper_radius_limit: Option<f32>,
    pub lower_beta_limit: f32,
    pub upper_beta_limit: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            alpha: -1.5,
            beta: 1.2,
            radius: 5.0,
            target_offset_y: 1.5,
            wheel_precision: 200.0,
            angular_sensibility: 1000.0,
            lower_radius_limit: 3.0,
            upper_radius_limit: None,
            lower_beta_limit: 0.01,
            upper_beta_limit: 3.14 / 2.0 + 0.2,
        }
    }
}

// ============================================================================
// Key Bindings
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyBindings {
    pub forward: KeyCode,
    pub backward: KeyCode,
    pub left: KeyCode,
    pub right: KeyCode,
    pub dance: KeyCode,
    pub screenshot: KeyCode,
    pub toggle_physics_debug: KeyCode,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            forward: KeyCode::KeyW,
            backward: KeyCode::KeyS,
            left: KeyCode::KeyA,
            right: KeyCode::KeyD,
            dance: KeyCode::KeyB,
            screenshot: KeyCode::KeyP,
            toggle_physics_debug: KeyCode::KeyV,
        }
    }
}

impl KeyBindings {
    /// Movement keys held according to `pressed`.
    pub fn movement_keys(&self, pressed: impl Fn(KeyCode) -> bool) -> MovementKeys {
        MovementKeys::new(
            pressed(self.forward),
            pressed(self.backward),
            pressed(self.left),
            pressed(self.right),
        )
    }

    pub fn dance_held(&self, pressed: impl Fn(KeyCode) -> bool) -> bool {
        pressed(self.dance)
    }
}

// ============================================================================
// Scene
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub ground_size: f32,
    pub box_count: u32,
    pub box_size: f32,
    pub box_mass: f32,
    pub shadow_map_size: usize,
    /// Vertical gravity (m/s², negative = down)
    pub gravity: f32,
    /// Direction the sunlight travels
    pub sun_direction: [f32; 3],
    pub sun_distance: f32,
    pub ambient_intensity: f32,
    /// Fixed seed for box placement; random when unset
    pub seed: Option<u64>,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            ground_size: 100.0,
            box_count: 4,
            box_size: 1.0,
            box_mass: 10.0,
            shadow_map_size: 1024,
            gravity: -9.81,
            sun_direction: [-5.0, -10.0, 5.0],
            sun_distance: 40.0,
            ambient_intensity: 0.4,
            seed: None,
        }
    }
}

// ============================================================================
// Logging
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// `info`, `debug`, `trace`, ...
    pub level: String,
    /// Extra filter directives (EnvFilter syntax)
    pub filter: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            filter: "wgpu=error,naga=warn,sambayard_runtime=info".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("sambayard-{}-{}.toml", name, std::process::id()))
    }

    #[test]
    fn test_defaults_match_demo_constants() {
        let config = DemoConfig::default();
        assert_eq!(config.character.move_speed, 1.8);
        assert_eq!(config.character.rotation_speed, 6.0);
        assert_eq!(config.character.animation_blend_speed, 4.0);
        assert_eq!(config.character.half_height(), 1.0);
        assert_eq!(config.camera.lower_radius_limit, 3.0);
        assert_eq!(config.keys.dance, KeyCode::KeyB);
        assert_eq!(config.scene.box_count, 4);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config: DemoConfig = toml::from_str(
            r#"
            [character]
            move_speed = 3.0
            movement_mode = "raycast_ground"

            [keys]
            dance = "KeyN"
            "#,
        )
        .unwrap();

        assert_eq!(config.character.move_speed, 3.0);
        assert_eq!(config.character.movement_mode, MovementMode::RaycastGround);
        assert_eq!(config.character.walk_clip, "Walking");
        assert_eq!(config.keys.dance, KeyCode::KeyN);
        assert_eq!(config.keys.forward, KeyCode::KeyW);
        assert_eq!(config.camera, CameraConfig::default());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = DemoConfig::default();
        config.character.move_speed = 0.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { field: "character.move_speed", .. })
        ));

        let mut config = DemoConfig::default();
        config.camera.upper_radius_limit = Some(1.0);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { field: "camera.upper_radius_limit", .. })
        ));

        let mut config = DemoConfig::default();
        config.character.capsule_height = 0.5;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { field: "character.capsule_height", .. })
        ));
    }

    #[test]
    fn test_save_then_load() {
        let path = temp_path("save");
        let mut config = DemoConfig::default();
        config.scene.seed = Some(7);
        config.camera.upper_radius_limit = Some(12.0);

        config.save(&path).unwrap();
        let loaded = DemoConfig::load(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(loaded, config);
    }

    #[test]
    fn test_load_or_default_falls_back() {
        let missing = temp_path("missing");
        assert_eq!(DemoConfig::load_or_default(&missing), DemoConfig::default());

        let broken = temp_path("broken");
        std::fs::write(&broken, "[character]\nmove_speed = \"fast\"\n").unwrap();
        assert!(matches!(DemoConfig::load(&broken), Err(ConfigError::Parse(_))));
        assert_eq!(DemoConfig::load_or_default(&broken), DemoConfig::default());
        std::fs::remove_file(&broken).ok();
    }

    #[test]
    fn test_load_reporting_names_the_source() {
        let missing = temp_path("report-missing");
        let (config, source) = DemoConfig::load_reporting(&missing);
        assert!(matches!(source, ConfigSource::Defaults));
        assert_eq!(config, DemoConfig::default());

        let good = temp_path("report-good");
        std::fs::write(&good, "[character]\nmove_speed = 2.5\n").unwrap();
        let (config, source) = DemoConfig::load_reporting(&good);
        std::fs::remove_file(&good).ok();
        assert!(matches!(source, ConfigSource::Loaded));
        assert_eq!(config.character.move_speed, 2.5);

        let invalid = temp_path("report-invalid");
        std::fs::write(&invalid, "[camera]\nradius = -1.0\n").unwrap();
        let (config, source) = DemoConfig::load_reporting(&invalid);
        std::fs::remove_file(&invalid).ok();
        assert!(matches!(
            source,
            ConfigSource::Fallback(ConfigError::Invalid { field: "camera.radius", .. })
        ));
        assert_eq!(config, DemoConfig::default());
    }

    #[test]
    fn test_movement_keys_from_bindings() {
        let bindings = KeyBindings::default();
        let held = [KeyCode::KeyW, KeyCode::KeyD, KeyCode::KeyB];
        let pressed = |key: KeyCode| held.contains(&key);

        let keys = bindings.movement_keys(pressed);
        assert_eq!(keys, MovementKeys::new(true, false, false, true));
        assert!(bindings.dance_held(pressed));
    }
}
