//! Game state and core simulation types
//!
//! Everything a tick reads or writes lives here, including the seeded RNG, so
//! equal seeds and inputs always replay the same run.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::afterimage::AfterImage;
use super::character::Character;
use super::collision::Circle;
use super::hazard::PendulumHazard;
use crate::consts::*;
use crate::settings::Settings;
use crate::solver::SolveResult;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    Playing,
    /// Out of lives
    GameOver,
}

/// Things that happened during the last tick, for sound and UI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    AppleCollected,
    PlayerHit,
    GameOver,
}

/// A collectible apple
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Apple {
    pub pos: Vec2,
}

impl Apple {
    /// Random spot right of the start pad, at most 50 px above the floor
    pub fn generate<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let x = rng.random_range((WINDOW_W / 4.0) as i32..=WINDOW_W as i32);
        let y = rng.random_range((FLOOR_Y - 50.0) as i32..=FLOOR_Y as i32);
        Self {
            pos: Vec2::new(x as f32, y as f32),
        }
    }

    pub fn circle(&self) -> Circle {
        Circle::new(self.pos, APPLE_RADIUS)
    }
}

/// Screen anchors for `count` pendulums, spread evenly across the top
pub fn hazard_anchors(count: usize) -> Vec<Vec2> {
    (0..count)
        .map(|i| {
            let x = WINDOW_W * (i + 1) as f32 / (count + 1) as f32;
            Vec2::new(x, PENDULUM_ANCHOR_Y)
        })
        .collect()
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng: Pcg32,
    /// Pendulum frame shown this tick
    pub frame: usize,
    /// Frames per pendulum loop
    pub frame_count: usize,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub lives: u8,
    pub score: u64,
    pub phase: GamePhase,
    pub character: Character,
    pub apples: Vec<Apple>,
    pub hazards: Vec<PendulumHazard>,
    /// Tip trail
    pub after_image: AfterImage,
    pub trails: bool,
    /// Events from the most recent tick
    pub events: Vec<GameEvent>,
}

impl GameState {
    /// Build a stage: solve every pendulum, then scatter apples
    pub fn new(seed: u64, settings: &Settings) -> SolveResult<Self> {
        let mut rng = Pcg32::seed_from_u64(seed);

        let hazards = hazard_anchors(settings.hazard_count())
            .into_iter()
            .map(|anchor| PendulumHazard::generate(&mut rng, settings, anchor))
            .collect::<SolveResult<Vec<_>>>()?;
        let apples = (0..APPLE_COUNT).map(|_| Apple::generate(&mut rng)).collect();

        log::info!(
            "Stage ready: seed={} difficulty={} pendulums={} frames={}",
            seed,
            settings.difficulty.as_str(),
            hazards.len(),
            settings.frame_count
        );

        Ok(Self {
            seed,
            rng,
            frame: 0,
            frame_count: settings.frame_count,
            time_ticks: 0,
            lives: settings.difficulty.lives(),
            score: 0,
            phase: GamePhase::Playing,
            character: Character::new(),
            apples,
            hazards,
            after_image: AfterImage::default(),
            trails: settings.trails,
            events: Vec::new(),
        })
    }

    /// Fraction of the pendulum loop already played, in `[0, 1)`
    pub fn loop_progress(&self) -> f32 {
        if self.frame_count == 0 {
            return 0.0;
        }
        self.frame as f32 / self.frame_count as f32
    }
}
