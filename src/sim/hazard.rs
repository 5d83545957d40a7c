//! Pendulum hazards
//!
//! A hazard is one pre-solved chain hanging from a fixed screen anchor. The
//! trajectory is computed once when the stage is built and then replayed a
//! frame per tick, looping forever.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::collision::{Circle, circles_overlap};
use crate::consts::JOINT_RADIUS;
use crate::settings::Settings;
use crate::solver::{Horizon, PendulumSolver, SolveResult, Trajectory};
use crate::solver_to_screen;

/// Parameter draws tried before a hazard is given up on
pub const MAX_GENERATE_ATTEMPTS: usize = 8;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PendulumHazard {
    /// Screen position of the fixed pivot
    pub anchor: Vec2,
    pub trajectory: Trajectory,
    pub joint_radius: f32,
}

impl PendulumHazard {
    pub fn new(anchor: Vec2, trajectory: Trajectory) -> Self {
        Self {
            anchor,
            trajectory,
            joint_radius: JOINT_RADIUS,
        }
    }

    /// Draw random chain parameters and solve them
    ///
    /// A draw the integrator cannot handle is discarded and redrawn. Rejected
    /// settings are returned immediately since redrawing cannot fix them.
    pub fn generate<R: Rng + ?Sized>(rng: &mut R, settings: &Settings, anchor: Vec2) -> SolveResult<Self> {
        let horizon = Horizon::new(settings.duration, settings.frame_count)?;

        let mut attempt = 1;
        loop {
            let (chain, initial) = settings.ranges.draw(rng, settings.bob_count())?;
            let solver = PendulumSolver::new(chain, settings.integrator);
            match solver.solve(&initial, &horizon) {
                Ok(trajectory) => {
                    log::info!(
                        "Pendulum at ({:.0}, {:.0}): {} bobs, reach {:.1}, attempt {}",
                        anchor.x,
                        anchor.y,
                        solver.chain().len(),
                        solver.chain().total_length(),
                        attempt
                    );
                    return Ok(Self::new(anchor, trajectory));
                }
                Err(e) if e.is_invalid_input() => return Err(e),
                Err(e) if attempt >= MAX_GENERATE_ATTEMPTS => {
                    log::warn!("Giving up on pendulum after {attempt} attempts: {e}");
                    return Err(e);
                }
                Err(e) => {
                    log::warn!("Pendulum draw {attempt} failed, redrawing: {e}");
                    attempt += 1;
                }
            }
        }
    }

    pub fn frame_count(&self) -> usize {
        self.trajectory.len()
    }

    /// Screen positions of the anchor followed by every joint, frame index wrapping
    pub fn joints_at(&self, frame: usize) -> Vec<Vec2> {
        let mut points = vec![self.anchor];
        if self.trajectory.is_empty() {
            return points;
        }
        let index = frame % self.trajectory.len();
        if let Some(f) = self.trajectory.frame(index) {
            points.extend(f.joints().iter().map(|&p| solver_to_screen(self.anchor, p)));
        }
        points
    }

    /// Screen position of the last bob
    pub fn tip_at(&self, frame: usize) -> Vec2 {
        self.joints_at(frame).last().copied().unwrap_or(self.anchor)
    }

    /// Joint circles at `frame`, anchor first
    pub fn circles_at(&self, frame: usize) -> Vec<Circle> {
        self.joints_at(frame)
            .into_iter()
            .map(|p| Circle::new(p, self.joint_radius))
            .collect()
    }

    /// True when any joint circle touches `target`
    pub fn collides(&self, target: &Circle, frame: usize) -> bool {
        self.joints_at(frame)
            .into_iter()
            .any(|p| circles_overlap(p, self.joint_radius, target.center, target.radius))
    }
}
