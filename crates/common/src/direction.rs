//! # Movement Direction
//!
//! Maps the held WASD combination to an angular offset from the camera's
//! forward direction, then builds the facing rotation the character turns
//! toward. Bevy convention: Y up, -Z forward, positive offset = turn right.

use bevy::prelude::*;
use std::f32::consts::{FRAC_PI_2, FRAC_PI_4, PI};

/// Movement keys held this frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Reflect)]
pub struct MovementKeys {
    pub forward: bool,
    pub backward: bool,
    pub left: bool,
    pub right: bool,
}

impl MovementKeys {
    pub fn new(forward: bool, backward: bool, left: bool, right: bool) -> Self {
        Self { forward, backward, left, right }
    }

    /// Any movement key held.
    pub fn any(&self) -> bool {
        self.forward || self.backward || self.left || self.right
    }

    fn held_count(&self) -> usize {
        [self.forward, self.backward, self.left, self.right]
            .iter()
            .filter(|held| **held)
            .count()
    }

    /// `key` is the only movement key held.
    fn only(&self, key: bool) -> bool {
        key && self.held_count() == 1
    }
}

/// Angular offset (radians) from camera-forward for the held keys.
///
/// First matching row wins. Combinations with no row of their own
/// (forward+backward, left+right, ...) fall through to 0.
pub fn turn_offset(keys: MovementKeys) -> f32 {
    const ANGLE_135: f32 = FRAC_PI_4 + FRAC_PI_2;

    if !keys.any() {
        0.0
    } else if keys.only(keys.backward) {
        PI
    } else if keys.only(keys.left) {
        -FRAC_PI_2
    } else if keys.only(keys.right) {
        FRAC_PI_2
    } else if keys.forward && keys.right {
        FRAC_PI_4
    } else if keys.forward && keys.left {
        -FRAC_PI_4
    } else if keys.backward && keys.right {
        ANGLE_135
    } else if keys.backward && keys.left {
        -ANGLE_135
    } else {
        0.0
    }
}

/// Camera look direction flattened onto the ground plane.
///
/// `None` when the camera looks straight up or down.
pub fn camera_forward_on_ground(direction: Vec3) -> Option<Vec3> {
    Vec3::new(direction.x, 0.0, direction.z).try_normalize()
}

/// Rotation that faces along `forward` (on the ground plane) turned right by `offset`.
pub fn facing_rotation(forward: Vec3, offset: f32) -> Quat {
    // Yaw that carries -Z onto `forward`
    let yaw = (-forward.x).atan2(-forward.z);
    Quat::from_rotation_y(yaw - offset)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-5;

    fn keys_from_bits(bits: u8) -> MovementKeys {
        MovementKeys::new(bits & 1 != 0, bits & 2 != 0, bits & 4 != 0, bits & 8 != 0)
    }

    #[test]
    fn test_single_keys() {
        assert_eq!(turn_offset(MovementKeys::default()), 0.0);
        assert_eq!(turn_offset(MovementKeys::new(true, false, false, false)), 0.0);
        assert_eq!(turn_offset(MovementKeys::new(false, true, false, false)), PI);
        assert_eq!(turn_offset(MovementKeys::new(false, false, true, false)), -FRAC_PI_2);
        assert_eq!(turn_offset(MovementKeys::new(false, false, false, true)), FRAC_PI_2);
    }

    #[test]
    fn test_diagonals() {
        assert_eq!(turn_offset(MovementKeys::new(true, false, false, true)), FRAC_PI_4);
        assert_eq!(turn_offset(MovementKeys::new(true, false, true, false)), -FRAC_PI_4);
        let back_right = turn_offset(MovementKeys::new(false, true, false, true));
        assert!((back_right - 3.0 * FRAC_PI_4).abs() < EPS);
        let back_left = turn_offset(MovementKeys::new(false, true, true, false));
        assert!((back_left + 3.0 * FRAC_PI_4).abs() < EPS);
    }

    #[test]
    fn test_opposing_keys_fall_through() {
        // forward + backward: neither "only" row matches
        assert_eq!(turn_offset(MovementKeys::new(true, true, false, false)), 0.0);
        // left + right
        assert_eq!(turn_offset(MovementKeys::new(false, false, true, true)), 0.0);
    }

    #[test]
    fn test_first_row_wins() {
        // forward + left + right: forward+right is listed first
        assert_eq!(turn_offset(MovementKeys::new(true, false, true, true)), FRAC_PI_4);
        // forward + backward + right: forward+right again
        assert_eq!(turn_offset(MovementKeys::new(true, true, false, true)), FRAC_PI_4);
        // backward + left + right
        let offset = turn_offset(MovementKeys::new(false, true, true, true));
        assert!((offset - 3.0 * FRAC_PI_4).abs() < EPS);
        // everything held
        assert_eq!(turn_offset(MovementKeys::new(true, true, true, true)), FRAC_PI_4);
    }

    #[test]
    fn test_table_is_total() {
        let allowed = [
            0.0,
            PI,
            FRAC_PI_2,
            -FRAC_PI_2,
            FRAC_PI_4,
            -FRAC_PI_4,
            3.0 * FRAC_PI_4,
            -3.0 * FRAC_PI_4,
        ];
        for bits in 0..16u8 {
            let keys = keys_from_bits(bits);
            let offset = turn_offset(keys);
            assert!(offset.is_finite());
            assert!(
                allowed.iter().any(|a| (a - offset).abs() < EPS),
                "{keys:?} -> {offset}"
            );
            // Pure function: same keys, same answer
            assert_eq!(offset, turn_offset(keys));
            assert_eq!(keys.any(), bits != 0);
        }
    }

    #[test]
    fn test_camera_forward_on_ground() {
        let flat = camera_forward_on_ground(Vec3::new(3.0, -4.0, 0.0)).unwrap();
        assert!((flat - Vec3::X).length() < EPS);

        assert!(camera_forward_on_ground(Vec3::NEG_Y).is_none());
    }

    #[test]
    fn test_facing_rotation_follows_offset() {
        let forward = Vec3::NEG_Z;
        let cases = [
            (0.0, Vec3::NEG_Z),
            (FRAC_PI_2, Vec3::X),
            (-FRAC_PI_2, Vec3::NEG_X),
            (PI, Vec3::Z),
        ];
        for (offset, expected) in cases {
            let facing = facing_rotation(forward, offset) * Vec3::NEG_Z;
            assert!((facing - expected).length() < EPS, "offset {offset}: {facing:?}");
        }
    }

    #[test]
    fn test_facing_rotation_follows_camera() {
        let forward = Vec3::new(1.0, 0.0, 1.0).normalize();
        let facing = facing_rotation(forward, 0.0) * Vec3::NEG_Z;
        assert!((facing - forward).length() < EPS);

        // Forward-right from a camera looking down +X ends up between +X and +Z
        let facing = facing_rotation(Vec3::X, FRAC_PI_4) * Vec3::NEG_Z;
        let expected = Vec3::new(1.0, 0.0, 1.0).normalize();
        assert!((facing - expected).length() < EPS);
    }
}
