//! Multi-bob pendulum solver
//!
//! Pure batch computation: given a chain, an initial state and a horizon, it
//! integrates the coupled equations of motion and returns the joint
//! positions at every sample time. No state survives between calls and
//! nothing in here reads clocks or randomness, so equal inputs give equal
//! trajectories.

pub mod chain;
pub mod eom;
pub mod error;
pub mod integrator;
pub mod kinematics;
pub mod trajectory;

pub use chain::{Bob, ChainSpec, ChainState, Horizon};
pub use eom::EquationsOfMotion;
pub use error::{InputError, SolveError, SolveResult};
pub use integrator::{IntegrationStats, IntegratorConfig, OdeSystem, integrate};
pub use trajectory::{Frame, Trajectory};

/// Gravitational acceleration (m/s²)
pub const GRAVITY: f64 = 9.81;

/// Solver bound to one chain
#[derive(Debug, Clone)]
pub struct PendulumSolver {
    chain: ChainSpec,
    config: IntegratorConfig,
}

impl PendulumSolver {
    pub fn new(chain: ChainSpec, config: IntegratorConfig) -> Self {
        Self { chain, config }
    }

    pub fn chain(&self) -> &ChainSpec {
        &self.chain
    }

    pub fn config(&self) -> &IntegratorConfig {
        &self.config
    }

    /// Sampled angles and angular velocities, one per frame
    pub fn solve_states(&self, initial: &ChainState, horizon: &Horizon) -> SolveResult<Vec<ChainState>> {
        self.sample_states(initial, horizon.duration, &horizon.sample_times())
    }

    /// States at arbitrary increasing times within `[0, duration]`
    pub fn sample_states(
        &self,
        initial: &ChainState,
        duration: f64,
        times: &[f64],
    ) -> SolveResult<Vec<ChainState>> {
        initial.validate_for(&self.chain)?;
        Horizon::new(duration, 1)?;

        let eom = EquationsOfMotion::new(&self.chain);
        let solution = integrate(&eom, &initial.to_flat(), duration, times, &self.config)?;
        log::debug!(
            "pendulum solve: n={} duration={} samples={} accepted={} rejected={} evals={}",
            self.chain.len(),
            duration,
            times.len(),
            solution.stats.accepted,
            solution.stats.rejected,
            solution.stats.evaluations
        );

        Ok(solution
            .samples
            .iter()
            .map(|y| ChainState::from_flat(y))
            .collect())
    }

    /// Integrate over `horizon` and map every sample to joint positions
    pub fn solve(&self, initial: &ChainState, horizon: &Horizon) -> SolveResult<Trajectory> {
        let states = self.solve_states(initial, horizon)?;
        let frames = states
            .iter()
            .map(|s| kinematics::joint_positions(&self.chain, &s.angles))
            .collect();
        Ok(Trajectory::new(horizon.duration, frames))
    }
}

/// Solve a chain given as plain sequences, with default tolerances
///
/// All inputs are validated before any integration work happens.
pub fn solve(
    lengths: &[f64],
    masses: &[f64],
    duration: f64,
    initial_angles: &[f64],
    initial_velocities: &[f64],
    frame_count: usize,
) -> SolveResult<Trajectory> {
    let chain = ChainSpec::from_slices(lengths, masses)?;
    let initial = ChainState::new(initial_angles.to_vec(), initial_velocities.to_vec());
    initial.validate_for(&chain)?;
    let horizon = Horizon::new(duration, frame_count)?;
    PendulumSolver::new(chain, IntegratorConfig::default()).solve(&initial, &horizon)
}
