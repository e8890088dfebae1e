//! # Errors
//!
//! Error types for Sambayard configuration and character setup.

use std::path::PathBuf;
use thiserror::Error;

/// Configuration load/save/validation errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write config {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Invalid config value `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Character setup errors. These surface while assets stream in, so the
/// systems that hit them log and retry rather than abort.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CharacterError {
    #[error("Animation '{0}' not found in character model")]
    MissingAnimation(String),

    #[error("Character model '{0}' failed to load")]
    ModelUnavailable(String),

    #[error("No AnimationPlayer found under character scene")]
    NoAnimationPlayer,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CharacterError::MissingAnimation("Walking".to_string());
        assert_eq!(err.to_string(), "Animation 'Walking' not found in character model");

        let err = ConfigError::Invalid {
            field: "character.move_speed",
            reason: "must be positive".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Invalid config value `character.move_speed`: must be positive"
        );
    }
}
