//! Generalized coordinates → Cartesian joint positions
//!
//! The anchor sits at the local origin. Angle 0 hangs straight down and a
//! positive angle swings toward +x; y grows upward.

use glam::DVec2;

use super::GRAVITY;
use super::chain::{ChainSpec, ChainState};
use super::trajectory::Frame;

/// Joint positions for one set of angles, walking the chain from the anchor
pub fn joint_positions(chain: &ChainSpec, angles: &[f64]) -> Frame {
    let mut anchor = DVec2::ZERO;
    let joints = chain
        .lengths()
        .zip(angles)
        .map(|(length, &angle)| {
            let p = DVec2::new(
                length * angle.sin() + anchor.x,
                -length * angle.cos() + anchor.y,
            );
            anchor = p;
            p
        })
        .collect();
    Frame::new(joints)
}

/// Cartesian velocity of every bob
pub fn joint_velocities(chain: &ChainSpec, state: &ChainState) -> Vec<DVec2> {
    let mut acc = DVec2::ZERO;
    chain
        .lengths()
        .zip(state.angles.iter().zip(&state.velocities))
        .map(|(length, (&angle, &omega))| {
            acc += DVec2::new(angle.cos(), angle.sin()) * (length * omega);
            acc
        })
        .collect()
}

/// Kinetic plus gravitational potential energy, with the anchor at zero height
pub fn energy(chain: &ChainSpec, state: &ChainState) -> f64 {
    let positions = joint_positions(chain, &state.angles);
    let velocities = joint_velocities(chain, state);
    chain
        .masses()
        .zip(positions.joints().iter().zip(&velocities))
        .map(|(m, (p, v))| m * (0.5 * v.length_squared() + GRAVITY * p.y))
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use proptest::prelude::*;
    use std::f64::consts::{FRAC_PI_2, PI};

    fn chain(lengths: &[f64]) -> ChainSpec {
        let masses = vec![1.0; lengths.len()];
        ChainSpec::from_slices(lengths, &masses).unwrap()
    }

    #[test]
    fn test_hanging_straight_down() {
        let frame = joint_positions(&chain(&[1.0, 2.0, 3.0]), &[0.0, 0.0, 0.0]);
        assert_eq!(
            frame.joints(),
            &[
                DVec2::new(0.0, -1.0),
                DVec2::new(0.0, -3.0),
                DVec2::new(0.0, -6.0)
            ]
        );
        assert_eq!(frame.tip(), Some(DVec2::new(0.0, -6.0)));
    }

    #[test]
    fn test_positive_angle_swings_right() {
        let frame = joint_positions(&chain(&[2.0, 1.0]), &[FRAC_PI_2, PI]);
        assert_abs_diff_eq!(frame.joints()[0].x, 2.0, epsilon = 1e-12);
        assert_abs_diff_eq!(frame.joints()[0].y, 0.0, epsilon = 1e-12);
        // Second segment points straight up from the first bob
        assert_abs_diff_eq!(frame.joints()[1].x, 2.0, epsilon = 1e-12);
        assert_abs_diff_eq!(frame.joints()[1].y, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_energy_of_resting_chain_is_potential_only() {
        let c = ChainSpec::from_slices(&[1.0, 2.0], &[3.0, 4.0]).unwrap();
        let e = energy(&c, &ChainState::at_rest(2));
        assert_abs_diff_eq!(e, -(3.0 * 1.0 + 4.0 * 3.0) * GRAVITY, epsilon = 1e-12);
    }

    #[test]
    fn test_single_bob_kinetic_energy() {
        let c = ChainSpec::from_slices(&[2.0], &[3.0]).unwrap();
        let state = ChainState::new(vec![FRAC_PI_2], vec![1.5]);
        // Horizontal bob: zero height, speed = l·ω
        assert_abs_diff_eq!(energy(&c, &state), 0.5 * 3.0 * 9.0, epsilon = 1e-9);
    }

    proptest! {
        #[test]
        fn prop_segments_keep_their_length(
            lengths in prop::collection::vec(0.1f64..30.0, 1..6),
            seed_angles in prop::collection::vec(-PI..PI, 6),
        ) {
            let c = chain(&lengths);
            let angles = &seed_angles[..lengths.len()];
            let frame = joint_positions(&c, angles);
            let mut prev = DVec2::ZERO;
            for (p, l) in frame.joints().iter().zip(&lengths) {
                prop_assert!(((*p - prev).length() - l).abs() < 1e-9);
                prev = *p;
            }
            prop_assert!(frame.tip().unwrap().length() <= c.total_length() + 1e-9);
        }
    }
}
