//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed tick only, one pendulum frame per tick
//! - Seeded RNG only
//! - Stable iteration order
//! - No rendering or platform dependencies

pub mod afterimage;
pub mod character;
pub mod collision;
pub mod hazard;
pub mod state;
pub mod tick;

pub use afterimage::{AfterImage, Ghost};
pub use character::{Character, CharacterPhase};
pub use collision::{Circle, circles_overlap, first_overlap};
pub use hazard::PendulumHazard;
pub use state::{Apple, GameEvent, GamePhase, GameState, hazard_anchors};
pub use tick::{TickInput, tick};
