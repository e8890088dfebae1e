//! # Animation Blend Weights
//!
//! Cross-fades the three character clips (idle, walk, dance) by moving each
//! weight a fixed amount per frame toward its goal. There is no hard sum
//! invariant: during a transition two clips may overlap, and the total settles
//! back to 1 once the inputs stop changing.

use bevy::prelude::*;

/// Move `current` toward `target` by at most `rate`, never overshooting.
pub fn move_towards(current: f32, target: f32, rate: f32) -> f32 {
    if target > current {
        target.min(current + rate)
    } else {
        target.max(current - rate)
    }
}

/// The clips a character can blend between.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Reflect)]
pub enum AnimationClip {
    #[default]
    Idle,
    Walk,
    Dance,
}

impl AnimationClip {
    /// Clips whose weight is driven directly by the target selection.
    /// Idle absorbs whatever mass is left over.
    pub const NON_IDLE: [AnimationClip; 2] = [AnimationClip::Walk, AnimationClip::Dance];

    pub const ALL: [AnimationClip; 3] =
        [AnimationClip::Idle, AnimationClip::Walk, AnimationClip::Dance];
}

/// Playback change produced by a blend step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackChange {
    /// Weight became positive on a paused clip.
    Play(AnimationClip),
    /// Weight reached exactly zero on a playing clip.
    Pause(AnimationClip),
}

/// Blend weights plus the playing flag of each clip.
#[derive(Debug, Clone, PartialEq, Reflect)]
pub struct AnimationWeights {
    pub idle: f32,
    pub walk: f32,
    pub dance: f32,
    walk_playing: bool,
    dance_playing: bool,
}

impl Default for AnimationWeights {
    fn default() -> Self {
        Self {
            idle: 1.0,
            walk: 0.0,
            dance: 0.0,
            walk_playing: false,
            dance_playing: false,
        }
    }
}

impl AnimationWeights {
    pub fn weight(&self, clip: AnimationClip) -> f32 {
        match clip {
            AnimationClip::Idle => self.idle,
            AnimationClip::Walk => self.walk,
            AnimationClip::Dance => self.dance,
        }
    }

    fn weight_mut(&mut self, clip: AnimationClip) -> &mut f32 {
        match clip {
            AnimationClip::Idle => &mut self.idle,
            AnimationClip::Walk => &mut self.walk,
            AnimationClip::Dance => &mut self.dance,
        }
    }

    /// Idle never pauses.
    pub fn is_playing(&self, clip: AnimationClip) -> bool {
        match clip {
            AnimationClip::Idle => true,
            AnimationClip::Walk => self.walk_playing,
            AnimationClip::Dance => self.dance_playing,
        }
    }

    fn set_playing(&mut self, clip: AnimationClip, playing: bool) {
        match clip {
            AnimationClip::Idle => {}
            AnimationClip::Walk => self.walk_playing = playing,
            AnimationClip::Dance => self.dance_playing = playing,
        }
    }

    pub fn sum(&self) -> f32 {
        self.idle + self.walk + self.dance
    }

    /// Advance every weight one frame toward `target`.
    ///
    /// `rate` is the blend speed already scaled by the frame time.
    /// Returns the clips that must start or stop playing this frame.
    pub fn blend(&mut self, target: AnimationClip, rate: f32) -> Vec<PlaybackChange> {
        let mut changes = Vec::new();
        let mut non_idle_sum = 0.0;

        for clip in AnimationClip::NON_IDLE {
            let goal = if clip == target { 1.0 } else { 0.0 };
            let weight = self.weight_mut(clip);
            *weight = move_towards(*weight, goal, rate).clamp(0.0, 1.0);
            let weight = *weight;

            let playing = self.is_playing(clip);
            if weight > 0.0 && !playing {
                self.set_playing(clip, true);
                changes.push(PlaybackChange::Play(clip));
            }
            if weight == 0.0 && playing {
                self.set_playing(clip, false);
                changes.push(PlaybackChange::Pause(clip));
            }

            non_idle_sum += weight;
        }

        let idle_goal = (1.0 - non_idle_sum).clamp(0.0, 1.0);
        self.idle = move_towards(self.idle, idle_goal, rate).clamp(0.0, 1.0);

        changes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-6;

    #[test]
    fn test_move_towards_contract() {
        assert!((move_towards(0.0, 1.0, 0.3) - 0.3).abs() < EPS);
        assert!((move_towards(1.0, 0.0, 0.3) - 0.7).abs() < EPS);
        assert_eq!(move_towards(0.9, 1.0, 0.3), 1.0);
        assert_eq!(move_towards(0.1, 0.0, 0.3), 0.0);
    }

    #[test]
    fn test_move_towards_idempotent_at_target() {
        for target in [0.0, 0.25, 1.0] {
            assert_eq!(move_towards(target, target, 0.5), target);
            assert_eq!(move_towards(move_towards(target, target, 0.5), target, 0.5), target);
        }
    }

    #[test]
    fn test_move_towards_monotonic() {
        let mut value = 0.0;
        let mut previous = value;
        for _ in 0..20 {
            value = move_towards(value, 0.8, 0.07);
            assert!(value >= previous);
            assert!(value <= 0.8);
            previous = value;
        }
        assert_eq!(value, 0.8);

        let mut value = 1.0;
        let mut previous = value;
        for _ in 0..20 {
            value = move_towards(value, -0.5, 0.13);
            assert!(value <= previous);
            assert!(value >= -0.5);
            previous = value;
        }
        assert_eq!(value, -0.5);
    }

    #[test]
    fn test_default_weights() {
        let weights = AnimationWeights::default();
        assert_eq!(weights.idle, 1.0);
        assert_eq!(weights.walk, 0.0);
        assert_eq!(weights.dance, 0.0);
        assert!(weights.is_playing(AnimationClip::Idle));
        assert!(!weights.is_playing(AnimationClip::Walk));
        assert!(!weights.is_playing(AnimationClip::Dance));
    }

    #[test]
    fn test_walk_fades_in_and_idle_fades_out() {
        let mut weights = AnimationWeights::default();
        let changes = weights.blend(AnimationClip::Walk, 0.25);

        assert_eq!(changes, vec![PlaybackChange::Play(AnimationClip::Walk)]);
        assert!((weights.walk - 0.25).abs() < EPS);
        assert!((weights.idle - 0.75).abs() < EPS);
        assert_eq!(weights.dance, 0.0);
    }

    #[test]
    fn test_clip_pauses_when_weight_reaches_zero() {
        let mut weights = AnimationWeights::default();
        weights.blend(AnimationClip::Walk, 0.5);
        assert!(weights.is_playing(AnimationClip::Walk));

        let changes = weights.blend(AnimationClip::Idle, 0.5);
        assert_eq!(changes, vec![PlaybackChange::Pause(AnimationClip::Walk)]);
        assert_eq!(weights.walk, 0.0);
        assert!(!weights.is_playing(AnimationClip::Walk));

        // Already paused, nothing more to report
        assert!(weights.blend(AnimationClip::Idle, 0.5).is_empty());
    }

    #[test]
    fn test_weights_stay_in_unit_range() {
        let targets = [
            AnimationClip::Walk,
            AnimationClip::Dance,
            AnimationClip::Idle,
            AnimationClip::Dance,
            AnimationClip::Walk,
        ];
        for rate in [0.01, 0.066, 0.3, 1.0, 2.5] {
            let mut weights = AnimationWeights::default();
            for (i, target) in targets.iter().cycle().take(200).enumerate() {
                // Change target every few frames so blends overlap
                let target = if i % 7 < 3 { *target } else { AnimationClip::Idle };
                weights.blend(target, rate);
                for clip in AnimationClip::ALL {
                    let w = weights.weight(clip);
                    assert!((0.0..=1.0).contains(&w), "{clip:?} = {w} at rate {rate}");
                }
            }
        }
    }

    #[test]
    fn test_sum_converges_after_input_change() {
        // 60 fps with blend speed 4.0
        let rate: f32 = 4.0 / 60.0;
        let frames = ((1.0 / rate).ceil() as usize) * 2;

        for (from, to) in [
            (AnimationClip::Idle, AnimationClip::Walk),
            (AnimationClip::Walk, AnimationClip::Dance),
            (AnimationClip::Dance, AnimationClip::Idle),
            (AnimationClip::Walk, AnimationClip::Idle),
        ] {
            let mut weights = AnimationWeights::default();
            for _ in 0..frames {
                weights.blend(from, rate);
            }
            for _ in 0..frames {
                weights.blend(to, rate);
            }
            assert!((weights.sum() - 1.0).abs() < 1e-4, "{from:?} -> {to:?}: {}", weights.sum());
            assert!((weights.weight(to) - 1.0).abs() < 1e-4);
        }
    }

    #[test]
    fn test_dance_replaces_walk() {
        let mut weights = AnimationWeights::default();
        for _ in 0..10 {
            weights.blend(AnimationClip::Walk, 0.2);
        }
        assert_eq!(weights.walk, 1.0);
        assert_eq!(weights.idle, 0.0);

        let changes = weights.blend(AnimationClip::Dance, 0.2);
        assert_eq!(changes, vec![PlaybackChange::Play(AnimationClip::Dance)]);
        assert!((weights.walk - 0.8).abs() < EPS);
        assert!((weights.dance - 0.2).abs() < EPS);
        // 1 - (0.8 + 0.2) = 0, idle stays out
        assert!(weights.idle.abs() < EPS);
    }
}
