//! Sampled output of a solve call

use glam::DVec2;
use serde::{Deserialize, Serialize};

/// Joint positions of the whole chain at one sample time
///
/// The anchor is implicit at the origin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    joints: Vec<DVec2>,
}

impl Frame {
    pub fn new(joints: Vec<DVec2>) -> Self {
        Self { joints }
    }

    pub fn joints(&self) -> &[DVec2] {
        &self.joints
    }

    /// Last bob of the chain
    pub fn tip(&self) -> Option<DVec2> {
        self.joints.last().copied()
    }

    /// Anchor followed by every joint, ready for drawing segments
    pub fn polyline(&self) -> impl Iterator<Item = DVec2> + '_ {
        std::iter::once(DVec2::ZERO).chain(self.joints.iter().copied())
    }
}

/// Frames at equally spaced times over the solved horizon
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trajectory {
    duration: f64,
    frames: Vec<Frame>,
}

impl Trajectory {
    pub fn new(duration: f64, frames: Vec<Frame>) -> Self {
        Self { duration, frames }
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }

    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    pub fn frame(&self, index: usize) -> Option<&Frame> {
        self.frames.get(index)
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Tip position of every frame
    pub fn tip_path(&self) -> Vec<DVec2> {
        self.frames.iter().filter_map(Frame::tip).collect()
    }

    /// Largest tip displacement between consecutive frames
    pub fn max_tip_jump(&self) -> f64 {
        self.tip_path()
            .windows(2)
            .map(|w| w[0].distance(w[1]))
            .fold(0.0, f64::max)
    }
}
