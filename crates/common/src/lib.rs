//! # Sambayard Common
//!
//! Shared types for the Sambayard demo, used by the runtime plugins and the client.
//! Nothing in here touches physics or rendering, so all of it is unit-testable
//! without spinning up an `App`.
//!
//! ## Modules
//!
//! - [`blend`]: `move_towards` and the idle/walk/dance weight blender
//! - [`direction`]: held keys + camera forward -> facing rotation
//! - [`config`]: `DemoConfig` TOML configuration
//! - [`error`]: error types
//!
//! ## Per-frame flow
//!
//! ```text
//! ┌──────────┐   ┌──────────────┐   ┌──────────────┐   ┌──────────────┐
//! │ Held keys│ → │ turn_offset  │ → │ facing slerp │ → │ body target  │
//! └──────────┘   └──────────────┘   └──────────────┘   └──────────────┘
//!       │
//!       └──────→ target clip ──────→ AnimationWeights::blend
//! ```

pub mod blend;
pub mod config;
pub mod direction;
pub mod error;

pub use blend::{move_towards, AnimationClip, AnimationWeights, PlaybackChange};
pub use config::{
    CameraConfig, CharacterConfig, ConfigSource, DemoConfig, KeyBindings, LogConfig, MovementMode,
    SceneConfig,
};
pub use direction::{camera_forward_on_ground, facing_rotation, turn_offset, MovementKeys};
pub use error::{CharacterError, ConfigError};

/// Convenient re-exports for common types.
pub mod prelude {
    pub use super::blend::{move_towards, AnimationClip, AnimationWeights, PlaybackChange};
    pub use super::config::{DemoConfig, KeyBindings, MovementMode};
    pub use super::direction::{facing_rotation, turn_offset, MovementKeys};
    pub use super::error::{CharacterError, ConfigError};
}
