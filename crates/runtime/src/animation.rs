//! # Character Animation
//!
//! Wires the character's glTF clips into Bevy's `AnimationGraph` and pushes
//! the controller's blend weights onto the `AnimationPlayer` every frame.
//!
//! ## Setup
//!
//! 1. `CharacterAnimationSource` holds the glTF handle and the clip names
//! 2. Once the glTF is loaded, clips are looked up by name
//! 3. Once the scene is spawned, the `AnimationPlayer` is found in the hierarchy
//! 4. All three clips start looping at weights 1/0/0; walk and dance are paused
//!
//! A missing clip is logged once and the character keeps its bind pose.

use bevy::gltf::Gltf;
use bevy::prelude::*;
use sambayard_common::{AnimationClip as CharacterClip, CharacterConfig, CharacterError};

use crate::character::CharacterController;
use crate::SambayardSet;

// ============================================================================
// Components
// ============================================================================

/// Where a character's clips come from.
#[derive(Component, Debug, Clone)]
pub struct CharacterAnimationSource {
    pub gltf: Handle<Gltf>,
    pub idle: String,
    pub walk: String,
    pub dance: String,
}

impl CharacterAnimationSource {
    pub fn from_config(asset_server: &AssetServer, config: &CharacterConfig) -> Self {
        Self {
            gltf: asset_server.load(config.model_path.clone()),
            idle: config.idle_clip.clone(),
            walk: config.walk_clip.clone(),
            dance: config.dance_clip.clone(),
        }
    }

    pub fn clip_name(&self, clip: CharacterClip) -> &str {
        match clip {
            CharacterClip::Idle => &self.idle,
            CharacterClip::Walk => &self.walk,
            CharacterClip::Dance => &self.dance,
        }
    }

    /// Resolve every clip through `lookup`, failing on the first missing name.
    pub fn resolve_clips<F>(&self, lookup: F) -> Result<[Handle<AnimationClip>; 3], CharacterError>
    where
        F: Fn(&str) -> Option<Handle<AnimationClip>>,
    {
        let resolve = |clip| {
            let name = self.clip_name(clip);
            lookup(name).ok_or_else(|| CharacterError::MissingAnimation(name.to_string()))
        };
        Ok([
            resolve(CharacterClip::Idle)?,
            resolve(CharacterClip::Walk)?,
            resolve(CharacterClip::Dance)?,
        ])
    }
}

/// Link from a character to its animation player and graph nodes.
#[derive(Component, Debug, Clone)]
pub struct CharacterAnimations {
    pub player: Entity,
    pub idle: AnimationNodeIndex,
    pub walk: AnimationNodeIndex,
    pub dance: AnimationNodeIndex,
}

impl CharacterAnimations {
    pub fn node(&self, clip: CharacterClip) -> AnimationNodeIndex {
        match clip {
            CharacterClip::Idle => self.idle,
            CharacterClip::Walk => self.walk,
            CharacterClip::Dance => self.dance,
        }
    }
}

/// Animation setup gave up on this character.
#[derive(Component, Debug, Clone)]
pub struct AnimationSetupFailed(pub CharacterError);

// ============================================================================
// Plugin
// ============================================================================

pub struct CharacterAnimationPlugin;

impl Plugin for CharacterAnimationPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            (setup_character_animations, apply_animation_weights)
                .chain()
                .in_set(SambayardSet::Animation),
        );
    }
}

// ============================================================================
// Systems
// ============================================================================

/// Build the animation graph once the glTF and its scene are ready.
pub fn setup_character_animations(
    mut commands: Commands,
    asset_server: Res<AssetServer>,
    gltfs: Res<Assets<Gltf>>,
    mut graphs: ResMut<Assets<AnimationGraph>>,
    characters: Query<
        (Entity, &CharacterAnimationSource),
        (Without<CharacterAnimations>, Without<AnimationSetupFailed>),
    >,
    children_query: Query<&Children>,
    mut animation_players: Query<&mut AnimationPlayer>,
) {
    for (char_entity, source) in characters.iter() {
        let Some(gltf) = gltfs.get(&source.gltf) else {
            if asset_server.load_state(&source.gltf).is_failed() {
                let path = source
                    .gltf
                    .path()
                    .map(|p| p.to_string())
                    .unwrap_or_else(|| "<unknown>".to_string());
                let err = CharacterError::ModelUnavailable(path);
                warn!("{} (character {:?})", err, char_entity);
                commands.entity(char_entity).insert(AnimationSetupFailed(err));
            }
            continue;
        };

        let clips = match source.resolve_clips(|name| gltf.named_animations.get(name).cloned()) {
            Ok(clips) => clips,
            Err(err) => {
                warn!("{} (character {:?})", err, char_entity);
                commands.entity(char_entity).insert(AnimationSetupFailed(err));
                continue;
            }
        };

        // Scene children appear a few frames after the glTF itself
        let Some(player_entity) =
            find_animation_player_recursive(char_entity, &children_query, &animation_players)
        else {
            trace!("Waiting for AnimationPlayer under character {:?}", char_entity);
            continue;
        };
        let Ok(mut player) = animation_players.get_mut(player_entity) else {
            continue;
        };

        let [idle_clip, walk_clip, dance_clip] = clips;
        let mut graph = AnimationGraph::new();
        let idle = graph.add_clip(idle_clip, 1.0, graph.root);
        let walk = graph.add_clip(walk_clip, 1.0, graph.root);
        let dance = graph.add_clip(dance_clip, 1.0, graph.root);
        let graph_handle = graphs.add(graph);

        player.play(idle).repeat().set_weight(1.0);
        player.play(walk).repeat().set_weight(0.0).pause();
        player.play(dance).repeat().set_weight(0.0).pause();

        commands.entity(player_entity).insert(AnimationGraphHandle(graph_handle));
        commands.entity(char_entity).insert(CharacterAnimations {
            player: player_entity,
            idle,
            walk,
            dance,
        });

        info!(
            "Animation graph ready for character {:?} -> player {:?}",
            char_entity, player_entity
        );
    }
}

/// Recursively find AnimationPlayer in entity hierarchy
fn find_animation_player_recursive(
    entity: Entity,
    children_query: &Query<&Children>,
    animation_players: &Query<&mut AnimationPlayer>,
) -> Option<Entity> {
    if animation_players.contains(entity) {
        return Some(entity);
    }

    if let Ok(children) = children_query.get(entity) {
        for child in children.iter() {
            if let Some(found) =
                find_animation_player_recursive(child, children_query, animation_players)
            {
                return Some(found);
            }
        }
    }

    None
}

/// Copy blend weights and play/pause state onto the player.
pub fn apply_animation_weights(
    characters: Query<(&CharacterController, &CharacterAnimations)>,
    mut animation_players: Query<&mut AnimationPlayer>,
) {
    for (controller, animations) in characters.iter() {
        let Ok(mut player) = animation_players.get_mut(animations.player) else {
            continue;
        };

        for clip in CharacterClip::ALL {
            let Some(active) = player.animation_mut(animations.node(clip)) else {
                continue;
            };
            active.set_weight(controller.weights.weight(clip));

            let playing = controller.weights.is_playing(clip);
            if playing && active.is_paused() {
                active.resume();
            } else if !playing && !active.is_paused() {
                active.pause();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn source() -> CharacterAnimationSource {
        CharacterAnimationSource {
            gltf: Handle::default(),
            idle: "Idle".to_string(),
            walk: "Walking".to_string(),
            dance: "SambaDancing".to_string(),
        }
    }

    #[test]
    fn test_resolve_clips_by_name() {
        let names = ["Idle", "Walking", "SambaDancing", "Extra"];
        let clips: HashMap<&str, Handle<AnimationClip>> = names
            .into_iter()
            .map(|name| (name, Handle::default()))
            .collect();

        let resolved = source().resolve_clips(|name| clips.get(name).cloned());
        assert!(resolved.is_ok());
    }

    #[test]
    fn test_missing_clip_is_reported_by_name() {
        let clips: HashMap<&str, Handle<AnimationClip>> = ["Idle", "Walking"]
            .into_iter()
            .map(|name| (name, Handle::default()))
            .collect();

        let err = source()
            .resolve_clips(|name| clips.get(name).cloned())
            .unwrap_err();
        assert_eq!(err, CharacterError::MissingAnimation("SambaDancing".to_string()));
    }

    #[test]
    fn test_clip_names() {
        let source = source();
        assert_eq!(source.clip_name(CharacterClip::Idle), "Idle");
        assert_eq!(source.clip_name(CharacterClip::Walk), "Walking");
        assert_eq!(source.clip_name(CharacterClip::Dance), "SambaDancing");
    }
}
