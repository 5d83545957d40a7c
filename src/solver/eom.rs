//! Equations of motion for an N-bob planar chain in generalized coordinates
//!
//! For every joint pair (i, j) the coupling weight is the mass carried at or
//! beyond the farther joint:
//!
//! ```text
//! coeff(i, j) = Σ_{k >= max(i, j)} m_k
//!
//! A[i][i] = coeff · l_i                          B[i][i] = coeff · g · sin θ_i
//! A[i][j] = coeff · l_j · cos(θ_i - θ_j)         B[i][j] = coeff · l_j · ω_j² · sin(θ_i - θ_j)
//! ```
//!
//! and the angular accelerations solve `A · α = -B · 1`. Both matrices depend
//! on the current state, so they are rebuilt and factorised on every call.

use nalgebra::{DMatrix, DVector};

use super::GRAVITY;
use super::chain::ChainSpec;
use super::error::{SolveError, SolveResult};
use super::integrator::OdeSystem;

/// Pivot magnitude (relative to the largest |A| entry) below which A is treated as singular
const SINGULAR_PIVOT: f64 = 1e-12;

/// Coefficient builder bound to one chain
#[derive(Debug, Clone)]
pub struct EquationsOfMotion {
    lengths: Vec<f64>,
    /// `tail_mass[k] = Σ_{j >= k} m_j`
    tail_mass: Vec<f64>,
}

impl EquationsOfMotion {
    pub fn new(chain: &ChainSpec) -> Self {
        let lengths: Vec<f64> = chain.lengths().collect();
        let masses: Vec<f64> = chain.masses().collect();
        let mut tail_mass = vec![0.0; masses.len()];
        let mut acc = 0.0;
        for k in (0..masses.len()).rev() {
            acc += masses[k];
            tail_mass[k] = acc;
        }
        Self { lengths, tail_mass }
    }

    /// Number of bobs
    pub fn bob_count(&self) -> usize {
        self.lengths.len()
    }

    /// Build the inertia matrix A and the forcing matrix B
    pub fn assemble(&self, angles: &[f64], velocities: &[f64]) -> (DMatrix<f64>, DMatrix<f64>) {
        let n = self.bob_count();
        let mut a = DMatrix::zeros(n, n);
        let mut b = DMatrix::zeros(n, n);

        for i in 0..n {
            for j in 0..n {
                let coeff = self.tail_mass[i.max(j)];
                if i == j {
                    a[(i, j)] = coeff * self.lengths[j];
                    b[(i, j)] = coeff * GRAVITY * angles[i].sin();
                } else {
                    let delta = angles[i] - angles[j];
                    a[(i, j)] = coeff * self.lengths[j] * delta.cos();
                    b[(i, j)] =
                        coeff * self.lengths[j] * velocities[j] * velocities[j] * delta.sin();
                }
            }
        }

        (a, b)
    }

    /// Angular accelerations at the given state
    ///
    /// `t` is only used to label failures.
    pub fn accelerations(&self, t: f64, angles: &[f64], velocities: &[f64]) -> SolveResult<DVector<f64>> {
        let n = self.bob_count();
        let (a, b) = self.assemble(angles, velocities);
        let rhs = -(b * DVector::from_element(n, 1.0));

        let scale = a.amax();
        let lu = a.lu();
        let min_pivot = lu.u().diagonal().amin();
        if scale.is_nan() || scale <= 0.0 || min_pivot.is_nan() || min_pivot <= SINGULAR_PIVOT * scale {
            return Err(SolveError::numerical(t, "inertia matrix is singular"));
        }

        let acc = lu
            .solve(&rhs)
            .ok_or_else(|| SolveError::numerical(t, "inertia matrix is singular"))?;
        if acc.iter().any(|v| !v.is_finite()) {
            return Err(SolveError::numerical(t, "angular acceleration is not finite"));
        }
        Ok(acc)
    }
}

impl OdeSystem for EquationsOfMotion {
    fn dim(&self) -> usize {
        2 * self.bob_count()
    }

    /// `y = [θ; ω]`, `dy/dt = [ω; α(θ, ω)]`
    fn derivative(&self, t: f64, y: &[f64], dydt: &mut [f64]) -> SolveResult<()> {
        let n = self.bob_count();
        let (angles, velocities) = y.split_at(n);
        if y.iter().any(|v| !v.is_finite()) {
            return Err(SolveError::numerical(t, "state is not finite"));
        }
        let acc = self.accelerations(t, angles, velocities)?;
        dydt[..n].copy_from_slice(velocities);
        dydt[n..].copy_from_slice(acc.as_slice());
        Ok(())
    }
}
