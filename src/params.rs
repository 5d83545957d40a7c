//! Random chain parameters
//!
//! Every value is drawn independently and uniformly from its closed range.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::solver::{Bob, ChainSpec, ChainState, InputError, SolveResult};

/// Closed interval `[lo, hi]`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Interval {
    pub lo: f64,
    pub hi: f64,
}

impl Interval {
    pub const fn new(lo: f64, hi: f64) -> Self {
        Self { lo, hi }
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.lo && value <= self.hi
    }

    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        rng.random_range(self.lo..=self.hi)
    }

    fn is_valid(&self) -> bool {
        self.lo.is_finite() && self.hi.is_finite() && self.lo <= self.hi
    }
}

/// Ranges for every per-bob parameter
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParamRanges {
    /// Segment length
    pub length: Interval,
    /// Bob mass
    pub mass: Interval,
    /// Initial angle (radians)
    pub angle: Interval,
    /// Initial angular velocity (rad/s)
    pub velocity: Interval,
}

impl Default for ParamRanges {
    fn default() -> Self {
        Self {
            length: Interval::new(5.0, 30.0),
            mass: Interval::new(1.0, 10.0),
            angle: Interval::new(-std::f64::consts::PI, std::f64::consts::PI),
            velocity: Interval::new(-1.0, 1.0),
        }
    }
}

impl ParamRanges {
    pub fn validate(&self) -> SolveResult<()> {
        for (name, range) in [
            ("length", self.length),
            ("mass", self.mass),
            ("angle", self.angle),
            ("velocity", self.velocity),
        ] {
            if !range.is_valid() {
                return Err(InputError::InvalidRange(format!(
                    "{name} range [{}, {}] is empty or not finite",
                    range.lo, range.hi
                ))
                .into());
            }
        }
        if self.length.lo <= 0.0 {
            return Err(InputError::NonPositiveLength {
                index: 0,
                value: self.length.lo,
            }
            .into());
        }
        if self.mass.lo <= 0.0 {
            return Err(InputError::NonPositiveMass {
                index: 0,
                value: self.mass.lo,
            }
            .into());
        }
        Ok(())
    }

    /// Draw an `n`-bob chain and its initial state
    ///
    /// Draw order is fixed (lengths, masses, angles, velocities) so a seed
    /// always yields the same chain.
    pub fn draw<R: Rng + ?Sized>(&self, rng: &mut R, n: usize) -> SolveResult<(ChainSpec, ChainState)> {
        self.validate()?;
        let lengths: Vec<f64> = (0..n).map(|_| self.length.sample(rng)).collect();
        let masses: Vec<f64> = (0..n).map(|_| self.mass.sample(rng)).collect();
        let angles: Vec<f64> = (0..n).map(|_| self.angle.sample(rng)).collect();
        let velocities: Vec<f64> = (0..n).map(|_| self.velocity.sample(rng)).collect();

        let bobs = lengths
            .into_iter()
            .zip(masses)
            .map(|(length, mass)| Bob { length, mass })
            .collect();
        let chain = ChainSpec::new(bobs)?;
        Ok((chain, ChainState::new(angles, velocities)))
    }
}
