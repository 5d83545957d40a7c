//! Game settings and presets
//!
//! Persisted as JSON next to the binary (or wherever the caller points).

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::{SIMULATION_FRAMES, TIME_DURATION};
use crate::params::ParamRanges;
use crate::solver::{Horizon, IntegratorConfig, SolveError};

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("settings I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("settings JSON is malformed: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("settings are invalid: {0}")]
    Invalid(#[from] SolveError),
}

/// Difficulty preset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Difficulty {
    Calm,
    #[default]
    Normal,
    Frantic,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Calm => "Calm",
            Difficulty::Normal => "Normal",
            Difficulty::Frantic => "Frantic",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "calm" | "easy" => Some(Difficulty::Calm),
            "normal" | "med" => Some(Difficulty::Normal),
            "frantic" | "hard" => Some(Difficulty::Frantic),
            _ => None,
        }
    }

    /// Bobs per pendulum
    pub fn bob_count(&self) -> usize {
        match self {
            Difficulty::Calm => 2,
            Difficulty::Normal => 3,
            Difficulty::Frantic => 3,
        }
    }

    /// Pendulums hanging over the stage
    pub fn hazard_count(&self) -> usize {
        match self {
            Difficulty::Calm => 1,
            Difficulty::Normal => 1,
            Difficulty::Frantic => 2,
        }
    }

    /// Lives at the start of a run
    pub fn lives(&self) -> u8 {
        match self {
            Difficulty::Calm => 5,
            Difficulty::Normal => 3,
            Difficulty::Frantic => 1,
        }
    }
}

/// Game settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub difficulty: Difficulty,

    // === Pendulum ===
    /// Simulated seconds per loop
    pub duration: f64,
    /// Frames sampled per loop
    pub frame_count: usize,
    /// Where chain parameters are drawn from
    pub ranges: ParamRanges,
    /// Solver tolerances
    pub integrator: IntegratorConfig,

    // === Effects ===
    /// Tip after-images
    pub trails: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::Normal,
            duration: TIME_DURATION,
            frame_count: SIMULATION_FRAMES,
            ranges: ParamRanges::default(),
            integrator: IntegratorConfig::default(),
            trails: true,
        }
    }
}

impl Settings {
    /// Create settings from a difficulty preset
    pub fn from_preset(difficulty: Difficulty) -> Self {
        Self {
            difficulty,
            ..Self::default()
        }
    }

    pub fn bob_count(&self) -> usize {
        self.difficulty.bob_count()
    }

    pub fn hazard_count(&self) -> usize {
        self.difficulty.hazard_count()
    }

    /// Sampling horizon shared by every pendulum
    pub fn horizon(&self) -> Result<Horizon, SettingsError> {
        Ok(Horizon::new(self.duration, self.frame_count)?)
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        self.horizon()?;
        self.ranges.validate()?;
        self.integrator.validate()?;
        Ok(())
    }

    /// Load settings from a JSON file; a missing file yields defaults
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        if !path.exists() {
            log::info!("No settings at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let json = std::fs::read_to_string(path)?;
        let settings: Settings = serde_json::from_str(&json)?;
        settings.validate()?;
        log::info!(
            "Loaded settings from {} ({})",
            path.display(),
            settings.difficulty.as_str()
        );
        Ok(settings)
    }

    /// Save settings as pretty JSON
    pub fn save(&self, path: &Path) -> Result<(), SettingsError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        log::info!("Settings saved to {}", path.display());
        Ok(())
    }
}
