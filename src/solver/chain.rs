//! Chain description, generalized state and sampling horizon

use serde::{Deserialize, Serialize};

use super::error::{InputError, SolveResult};

/// One rigid segment of the chain with a point mass at its end
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bob {
    /// Segment length (m)
    pub length: f64,
    /// Bob mass (kg)
    pub mass: f64,
}

/// Validated chain of bobs, ordered from the anchor outward
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChainSpec {
    bobs: Vec<Bob>,
}

impl ChainSpec {
    pub fn new(bobs: Vec<Bob>) -> SolveResult<Self> {
        if bobs.is_empty() {
            return Err(InputError::EmptyChain.into());
        }
        for (index, bob) in bobs.iter().enumerate() {
            if !bob.length.is_finite() {
                return Err(InputError::NonFiniteValue { what: "lengths", index }.into());
            }
            if !bob.mass.is_finite() {
                return Err(InputError::NonFiniteValue { what: "masses", index }.into());
            }
            if bob.length <= 0.0 {
                return Err(InputError::NonPositiveLength {
                    index,
                    value: bob.length,
                }
                .into());
            }
            if bob.mass <= 0.0 {
                return Err(InputError::NonPositiveMass {
                    index,
                    value: bob.mass,
                }
                .into());
            }
        }
        Ok(Self { bobs })
    }

    /// Build from parallel length/mass sequences
    pub fn from_slices(lengths: &[f64], masses: &[f64]) -> SolveResult<Self> {
        if masses.len() != lengths.len() {
            return Err(InputError::LengthMismatch {
                what: "masses",
                expected: lengths.len(),
                actual: masses.len(),
            }
            .into());
        }
        let bobs = lengths
            .iter()
            .zip(masses)
            .map(|(&length, &mass)| Bob { length, mass })
            .collect();
        Self::new(bobs)
    }

    pub fn len(&self) -> usize {
        self.bobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bobs.is_empty()
    }

    pub fn bobs(&self) -> &[Bob] {
        &self.bobs
    }

    pub fn lengths(&self) -> impl Iterator<Item = f64> + '_ {
        self.bobs.iter().map(|b| b.length)
    }

    pub fn masses(&self) -> impl Iterator<Item = f64> + '_ {
        self.bobs.iter().map(|b| b.mass)
    }

    /// Distance from the anchor to the tip when fully extended
    pub fn total_length(&self) -> f64 {
        self.lengths().sum()
    }
}

/// Angles and angular velocities of every segment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChainState {
    /// Radians from the downward vertical at each joint
    pub angles: Vec<f64>,
    /// rad/s
    pub velocities: Vec<f64>,
}

impl ChainState {
    pub fn new(angles: Vec<f64>, velocities: Vec<f64>) -> Self {
        Self { angles, velocities }
    }

    /// Chain hanging straight down at rest
    pub fn at_rest(n: usize) -> Self {
        Self {
            angles: vec![0.0; n],
            velocities: vec![0.0; n],
        }
    }

    /// Check that this state fits `chain`
    pub fn validate_for(&self, chain: &ChainSpec) -> SolveResult<()> {
        let n = chain.len();
        if self.angles.len() != n {
            return Err(InputError::LengthMismatch {
                what: "initial angles",
                expected: n,
                actual: self.angles.len(),
            }
            .into());
        }
        if self.velocities.len() != n {
            return Err(InputError::LengthMismatch {
                what: "initial velocities",
                expected: n,
                actual: self.velocities.len(),
            }
            .into());
        }
        if let Some(index) = self.angles.iter().position(|a| !a.is_finite()) {
            return Err(InputError::NonFiniteValue { what: "initial angles", index }.into());
        }
        if let Some(index) = self.velocities.iter().position(|v| !v.is_finite()) {
            return Err(InputError::NonFiniteValue {
                what: "initial velocities",
                index,
            }
            .into());
        }
        Ok(())
    }

    /// Flatten to the integrator layout `[angles..., velocities...]`
    pub(crate) fn to_flat(&self) -> Vec<f64> {
        let mut y = Vec::with_capacity(self.angles.len() * 2);
        y.extend_from_slice(&self.angles);
        y.extend_from_slice(&self.velocities);
        y
    }

    pub(crate) fn from_flat(y: &[f64]) -> Self {
        let n = y.len() / 2;
        Self {
            angles: y[..n].to_vec(),
            velocities: y[n..].to_vec(),
        }
    }
}

/// Real-time span and number of equally spaced samples
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Horizon {
    /// Seconds
    pub duration: f64,
    pub frame_count: usize,
}

impl Horizon {
    pub fn new(duration: f64, frame_count: usize) -> SolveResult<Self> {
        let horizon = Self {
            duration,
            frame_count,
        };
        horizon.validate()?;
        Ok(horizon)
    }

    pub fn validate(&self) -> SolveResult<()> {
        if !self.duration.is_finite() || self.duration <= 0.0 {
            return Err(InputError::NonPositiveDuration(self.duration).into());
        }
        if self.frame_count == 0 {
            return Err(InputError::ZeroFrameCount.into());
        }
        Ok(())
    }

    /// Sample time of frame `k`
    pub fn time_of(&self, k: usize) -> f64 {
        if self.frame_count <= 1 {
            0.0
        } else if k + 1 == self.frame_count {
            self.duration
        } else {
            k as f64 * self.duration / (self.frame_count - 1) as f64
        }
    }

    /// All sample times in increasing order
    pub fn sample_times(&self) -> Vec<f64> {
        (0..self.frame_count).map(|k| self.time_of(k)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solver::SolveError;

    #[test]
    fn test_chain_rejects_negative_length() {
        let err = ChainSpec::from_slices(&[10.0, -5.0], &[1.0, 1.0]).unwrap_err();
        assert_eq!(
            err,
            SolveError::InvalidInput(InputError::NonPositiveLength {
                index: 1,
                value: -5.0
            })
        );
    }

    #[test]
    fn test_chain_rejects_zero_mass_and_empty() {
        assert!(ChainSpec::from_slices(&[1.0], &[0.0]).is_err());
        assert_eq!(
            ChainSpec::new(Vec::new()).unwrap_err(),
            SolveError::InvalidInput(InputError::EmptyChain)
        );
        assert!(ChainSpec::from_slices(&[1.0, 2.0], &[1.0]).is_err());
    }

    #[test]
    fn test_state_validation() {
        let chain = ChainSpec::from_slices(&[1.0, 2.0], &[1.0, 1.0]).unwrap();
        assert!(ChainState::at_rest(2).validate_for(&chain).is_ok());
        assert!(ChainState::at_rest(3).validate_for(&chain).is_err());
        let bad = ChainState::new(vec![0.0, f64::NAN], vec![0.0, 0.0]);
        assert!(bad.validate_for(&chain).is_err());
    }

    #[test]
    fn test_horizon_sample_times() {
        let h = Horizon::new(10.0, 5).unwrap();
        assert_eq!(h.sample_times(), vec![0.0, 2.5, 5.0, 7.5, 10.0]);

        let single = Horizon::new(3.0, 1).unwrap();
        assert_eq!(single.sample_times(), vec![0.0]);

        assert!(Horizon::new(0.0, 10).is_err());
        assert!(Horizon::new(-1.0, 10).is_err());
        assert!(Horizon::new(1.0, 0).is_err());
        assert!(Horizon::new(f64::NAN, 10).is_err());
    }

    #[test]
    fn test_flat_layout() {
        let state = ChainState::new(vec![0.1, 0.2], vec![1.0, 2.0]);
        let flat = state.to_flat();
        assert_eq!(flat, vec![0.1, 0.2, 1.0, 2.0]);
        assert_eq!(ChainState::from_flat(&flat), state);
    }
}
