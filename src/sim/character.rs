//! The player character
//!
//! A 10×10 pixel body that runs along the floor and can jump once more in
//! mid-air. All movement is in whole pixels per tick.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::Circle;
use super::tick::TickInput;
use crate::consts::{FLOOR_Y, START_SIZE, START_X, WINDOW_W};

pub const CHARACTER_W: f32 = 10.0;
pub const CHARACTER_H: f32 = 10.0;
pub const MAX_X_VELOCITY: f32 = 2.0;
pub const MAX_Y_VELOCITY: f32 = 8.0;
/// Horizontal acceleration while a direction is held
pub const SPEED: f32 = 1.0;
/// Upward launch speed
pub const JUMP: f32 = 6.0;
pub const GRAVITY: f32 = 1.0;
/// Ticks spent in the jump phase
pub const JUMP_TICKS: u32 = 5;
/// Jump ticks drawn squashed before stretching
pub const JUMP_CHARGE_TICKS: u32 = 2;
/// Ticks spent down after a hit
pub const DEAD_TICKS: u32 = 30;
/// Invulnerable ticks on the start pad
pub const RESPAWN_TICKS: u32 = 60;

/// What the character is doing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CharacterPhase {
    Idle,
    /// Just launched; further jumps are ignored
    Jumping { ticks_left: u32 },
    /// Hit by a pendulum, frozen in place
    Dead { ticks_left: u32 },
    /// Back on the start pad, frozen and invulnerable
    Respawning { ticks_left: u32 },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Character {
    /// Top-left corner (pixels)
    pub pos: Vec2,
    pub vel: Vec2,
    pub phase: CharacterPhase,
    /// Air jump already spent
    pub double_jumped: bool,
    /// Jump input on the previous tick, for press-edge detection
    pub jump_held: bool,
}

impl Default for Character {
    fn default() -> Self {
        Self::new()
    }
}

impl Character {
    /// Standing on the start pad
    pub fn new() -> Self {
        Self {
            pos: Self::start_pos(),
            vel: Vec2::ZERO,
            phase: CharacterPhase::Idle,
            double_jumped: false,
            jump_held: false,
        }
    }

    pub fn start_pos() -> Vec2 {
        Vec2::new(
            START_X + (START_SIZE - CHARACTER_W) / 2.0,
            FLOOR_Y - CHARACTER_H,
        )
    }

    pub fn on_floor(&self) -> bool {
        self.pos.y + CHARACTER_H >= FLOOR_Y
    }

    /// Can be hit by a pendulum
    pub fn is_vulnerable(&self) -> bool {
        matches!(
            self.phase,
            CharacterPhase::Idle | CharacterPhase::Jumping { .. }
        )
    }

    pub fn is_alive(&self) -> bool {
        !matches!(self.phase, CharacterPhase::Dead { .. })
    }

    /// Circle inscribed in the body, used for every collision test
    pub fn bounding_circle(&self) -> Circle {
        let half = Vec2::new(CHARACTER_W, CHARACTER_H) / 2.0;
        Circle::new(self.pos + half, CHARACTER_W.min(CHARACTER_H) / 2.0)
    }

    /// Knock the character out; false if it was not vulnerable
    pub fn kill(&mut self) -> bool {
        if !self.is_vulnerable() {
            return false;
        }
        self.vel = Vec2::ZERO;
        self.phase = CharacterPhase::Dead {
            ticks_left: DEAD_TICKS,
        };
        true
    }

    /// Advance one tick
    pub fn step(&mut self, input: &TickInput) {
        let pressed = input.jump && !self.jump_held;
        self.jump_held = input.jump;

        match self.phase {
            CharacterPhase::Dead { ticks_left } => {
                self.phase = if ticks_left > 1 {
                    CharacterPhase::Dead {
                        ticks_left: ticks_left - 1,
                    }
                } else {
                    self.respawn();
                    CharacterPhase::Respawning {
                        ticks_left: RESPAWN_TICKS,
                    }
                };
                return;
            }
            CharacterPhase::Respawning { ticks_left } => {
                self.phase = if ticks_left > 1 {
                    CharacterPhase::Respawning {
                        ticks_left: ticks_left - 1,
                    }
                } else {
                    CharacterPhase::Idle
                };
                return;
            }
            CharacterPhase::Jumping { ticks_left } => {
                self.phase = if ticks_left > 1 {
                    CharacterPhase::Jumping {
                        ticks_left: ticks_left - 1,
                    }
                } else {
                    CharacterPhase::Idle
                };
            }
            CharacterPhase::Idle => {}
        }

        if self.on_floor() {
            self.double_jumped = false;
        }

        self.pos += self.vel;
        self.pos.x = self.pos.x.clamp(0.0, WINDOW_W - CHARACTER_W);

        self.apply_gravity();
        self.move_x(input);
        self.vel.x = self.vel.x.clamp(-MAX_X_VELOCITY, MAX_X_VELOCITY);
        self.vel.y = self.vel.y.clamp(-MAX_Y_VELOCITY, MAX_Y_VELOCITY);

        if self.phase == CharacterPhase::Idle && pressed {
            if self.on_floor() {
                self.launch();
            } else if !self.double_jumped {
                self.launch();
                self.double_jumped = true;
            }
        }
    }

    /// Draw offset and size, squashed while charging a jump and stretched after
    pub fn body_rect(&self) -> (Vec2, Vec2) {
        let (dx, dy) = match self.phase {
            CharacterPhase::Jumping { ticks_left } => {
                let elapsed = JUMP_TICKS.saturating_sub(ticks_left);
                if elapsed < JUMP_CHARGE_TICKS {
                    (-1.0, 1.0)
                } else if elapsed > JUMP_CHARGE_TICKS {
                    (1.0, -1.0)
                } else {
                    (0.0, 0.0)
                }
            }
            _ => (0.0, 0.0),
        };
        (
            self.pos + Vec2::new(dx, dy),
            Vec2::new(CHARACTER_W - 2.0 * dx, CHARACTER_H - 2.0 * dy),
        )
    }

    fn launch(&mut self) {
        self.vel.y = -JUMP;
        self.phase = CharacterPhase::Jumping {
            ticks_left: JUMP_TICKS,
        };
    }

    fn respawn(&mut self) {
        self.pos = Self::start_pos();
        self.vel = Vec2::ZERO;
        self.double_jumped = false;
    }

    fn apply_gravity(&mut self) {
        if self.on_floor() {
            self.vel.y = 0.0;
            self.pos.y = FLOOR_Y - CHARACTER_H;
        } else {
            self.vel.y += GRAVITY;
        }
    }

    fn move_x(&mut self, input: &TickInput) {
        let mut push = 0.0;
        if input.right {
            push += SPEED;
        }
        if input.left {
            push -= SPEED;
        }
        if push == 0.0 {
            // Friction: bleed one pixel per tick toward rest
            if self.vel.x > 0.0 {
                self.vel.x -= 1.0;
            } else if self.vel.x < 0.0 {
                self.vel.x += 1.0;
            }
        } else {
            self.vel.x += push;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn jump() -> TickInput {
        TickInput {
            jump: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_starts_on_floor() {
        let c = Character::new();
        assert!(c.on_floor());
        assert!(c.is_vulnerable());
    }

    #[test]
    fn test_walk_right_caps_speed() {
        let mut c = Character::new();
        let right = TickInput {
            right: true,
            ..Default::default()
        };
        for _ in 0..5 {
            c.step(&right);
        }
        assert_eq!(c.vel.x, MAX_X_VELOCITY);
        assert!(c.pos.x > Character::start_pos().x);

        // Friction brings it back to rest
        for _ in 0..3 {
            c.step(&TickInput::default());
        }
        assert_eq!(c.vel.x, 0.0);
    }

    #[test]
    fn test_x_clamped_to_window() {
        let mut c = Character::new();
        let left = TickInput {
            left: true,
            ..Default::default()
        };
        for _ in 0..100 {
            c.step(&left);
        }
        assert_eq!(c.pos.x, 0.0);
    }

    #[test]
    fn test_jump_requires_press_edge() {
        let mut c = Character::new();
        c.step(&jump());
        assert_eq!(c.vel.y, -JUMP);
        assert!(matches!(c.phase, CharacterPhase::Jumping { .. }));

        // Holding the button through the jump phase does not air-jump
        for _ in 0..JUMP_TICKS + 2 {
            c.step(&jump());
        }
        assert!(!c.double_jumped);
    }

    #[test]
    fn test_single_air_jump() {
        let mut c = Character::new();
        c.step(&jump());
        for _ in 0..JUMP_TICKS {
            c.step(&TickInput::default());
        }
        assert_eq!(c.phase, CharacterPhase::Idle);
        assert!(!c.on_floor());

        c.step(&jump());
        assert!(c.double_jumped);
        assert_eq!(c.vel.y, -JUMP);

        for _ in 0..JUMP_TICKS {
            c.step(&TickInput::default());
        }
        let vy = c.vel.y;
        c.step(&jump());
        // No third jump: gravity keeps pulling
        assert_eq!(c.vel.y, vy + GRAVITY);
    }

    #[test]
    fn test_lands_back_on_floor() {
        let mut c = Character::new();
        c.step(&jump());
        for _ in 0..60 {
            c.step(&TickInput::default());
        }
        assert!(c.on_floor());
        assert_eq!(c.pos.y, FLOOR_Y - CHARACTER_H);
        assert_eq!(c.vel.y, 0.0);
        assert!(!c.double_jumped);
    }

    #[test]
    fn test_kill_respawn_cycle() {
        let mut c = Character::new();
        c.pos.x = 100.0;
        assert!(c.kill());
        assert!(!c.kill());

        for _ in 0..DEAD_TICKS {
            c.step(&TickInput::default());
        }
        assert_eq!(
            c.phase,
            CharacterPhase::Respawning {
                ticks_left: RESPAWN_TICKS
            }
        );
        assert_eq!(c.pos, Character::start_pos());
        assert!(!c.is_vulnerable());

        for _ in 0..RESPAWN_TICKS {
            c.step(&TickInput::default());
        }
        assert_eq!(c.phase, CharacterPhase::Idle);
        assert!(c.is_vulnerable());
    }

    #[test]
    fn test_body_rect_squash_then_stretch() {
        let mut c = Character::new();
        assert_eq!(c.body_rect().1, Vec2::new(CHARACTER_W, CHARACTER_H));

        c.step(&jump());
        // Just launched: squashed
        assert_eq!(c.body_rect().1, Vec2::new(CHARACTER_W + 2.0, CHARACTER_H - 2.0));

        for _ in 0..3 {
            c.step(&TickInput::default());
        }
        // Late in the jump: stretched
        assert_eq!(c.body_rect().1, Vec2::new(CHARACTER_W - 2.0, CHARACTER_H + 2.0));
    }
}
