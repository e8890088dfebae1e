//! Client plugins

pub mod debug_keys_plugin;
pub mod lighting_plugin;
pub mod scene_plugin;

pub use debug_keys_plugin::DebugKeysPlugin;
pub use lighting_plugin::LightingPlugin;
pub use scene_plugin::ScenePlugin;
