//! Fading after-images left behind by the pendulum tip

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::Circle;
use crate::consts::{AFTERIMAGE_LIFETIME, AFTERIMAGE_SIZE};

/// One fading circle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ghost {
    pub pos: Vec2,
    /// Ticks left before the ghost disappears
    pub count: u32,
}

impl Ghost {
    pub fn circle(&self) -> Circle {
        Circle::new(self.pos, AFTERIMAGE_SIZE)
    }
}

/// Owned collection of ghosts, oldest first
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AfterImage {
    ghosts: Vec<Ghost>,
    lifetime: u32,
}

impl Default for AfterImage {
    fn default() -> Self {
        Self::new(AFTERIMAGE_LIFETIME)
    }
}

impl AfterImage {
    pub fn new(lifetime: u32) -> Self {
        Self {
            ghosts: Vec::new(),
            lifetime: lifetime.max(1),
        }
    }

    pub fn lifetime(&self) -> u32 {
        self.lifetime
    }

    /// Drop a fresh ghost at `pos`
    pub fn add(&mut self, pos: Vec2) {
        self.ghosts.push(Ghost {
            pos,
            count: self.lifetime,
        });
    }

    /// Age every ghost by one tick
    ///
    /// A ghost survives one extra tick at count 0 so the faintest shade is drawn.
    pub fn update(&mut self) {
        self.ghosts.retain(|g| g.count > 0);
        for ghost in &mut self.ghosts {
            ghost.count -= 1;
        }
    }

    pub fn reset(&mut self) {
        self.ghosts.clear();
    }

    pub fn ghosts(&self) -> &[Ghost] {
        &self.ghosts
    }

    pub fn len(&self) -> usize {
        self.ghosts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ghosts.is_empty()
    }

    /// Palette index for a ghost with `count` ticks left
    ///
    /// Fresh ghosts map to the top of the palette. `reverse` mirrors the ramp
    /// for the light half of the screen.
    pub fn shade(&self, count: u32, palette_len: usize, reverse: bool) -> usize {
        if palette_len == 0 {
            return 0;
        }
        let raw = palette_len * count as usize / self.lifetime as usize;
        let index = raw.min(palette_len - 1);
        if reverse { palette_len - 1 - index } else { index }
    }
}
