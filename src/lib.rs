//! Pendulum Hop - dodge the chaotic pendulum, grab the apples
//!
//! Core modules:
//! - `solver`: Multi-bob pendulum physics (equations of motion, adaptive RK45, kinematics)
//! - `sim`: Deterministic game simulation (character, hazards, after-images)
//! - `params`: Random chain parameters
//! - `palette`: Colour gradients
//! - `settings`: Game settings and presets

pub mod palette;
pub mod params;
pub mod settings;
pub mod sim;
pub mod solver;

pub use params::{Interval, ParamRanges};
pub use settings::{Difficulty, Settings, SettingsError};
pub use solver::{PendulumSolver, SolveError, Trajectory, solve};

use glam::{DVec2, Vec2};

/// Game configuration constants
pub mod consts {
    /// Screen size (pixels)
    pub const WINDOW_W: f32 = 160.0;
    pub const WINDOW_H: f32 = 120.0;
    /// Floor line, three quarters down the screen
    pub const FLOOR_Y: f32 = WINDOW_H / 4.0 * 3.0;

    /// Simulated pendulum time per loop (seconds)
    pub const TIME_DURATION: f64 = 30.0;
    /// Frames sampled over one loop; the game plays one per tick
    pub const SIMULATION_FRAMES: usize = 300;

    /// Pendulum anchor on screen
    pub const PENDULUM_ANCHOR_Y: f32 = 30.0;
    /// Joint circle radius
    pub const JOINT_RADIUS: f32 = 5.0;

    /// After-image circle radius
    pub const AFTERIMAGE_SIZE: f32 = 5.0;
    /// After-image lifetime (ticks)
    pub const AFTERIMAGE_LIFETIME: u32 = 20;
    /// Drop a tip after-image every N frames
    pub const TRAIL_INTERVAL: usize = 4;

    /// Background ramp
    pub const GRADIENT_START: u32 = 0x2b335f;
    pub const GRADIENT_END: u32 = 0xA9C1FF;
    pub const GRADIENT_STEPS: usize = 8;

    /// Apples
    pub const APPLE_RADIUS: f32 = 4.0;
    pub const APPLE_COUNT: usize = 3;

    /// Start pad (top-left corner and size)
    pub const START_X: f32 = WINDOW_W / 8.0;
    pub const START_SIZE: f32 = 12.0;
    pub const START_Y: f32 = FLOOR_Y - START_SIZE;
}

/// Map a solver-space point (y up, anchor at origin) to screen space (y down)
#[inline]
pub fn solver_to_screen(anchor: Vec2, p: DVec2) -> Vec2 {
    Vec2::new(p.x as f32 + anchor.x, -(p.y as f32) + anchor.y)
}
