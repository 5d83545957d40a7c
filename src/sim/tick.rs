//! Fixed timestep simulation tick
//!
//! One tick shows one pendulum frame. The stage loops when the last frame
//! has been played.

use super::collision::{Circle, first_overlap};
use super::state::{Apple, GameEvent, GamePhase, GameState};
use crate::consts::TRAIL_INTERVAL;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    /// A / Left held
    pub left: bool,
    /// D / Right held
    pub right: bool,
    /// W / Space / Up held
    ///
    /// A jump fires only on the tick the button goes down. Holding it does
    /// not re-jump on landing or spend the air jump, unlike a held-button
    /// poll.
    pub jump: bool,
}

/// Advance the game state by one tick
pub fn tick(state: &mut GameState, input: &TickInput) {
    state.events.clear();
    if state.phase == GamePhase::GameOver {
        return;
    }

    state.time_ticks += 1;
    state.frame = if state.frame_count == 0 {
        0
    } else {
        (state.frame + 1) % state.frame_count
    };

    state.character.step(input);

    state.after_image.update();
    if state.trails && state.frame % TRAIL_INTERVAL == 0 {
        for hazard in &state.hazards {
            state.after_image.add(hazard.tip_at(state.frame));
        }
    }

    let body = state.character.bounding_circle();

    // At most one apple per tick; a collected apple respawns in its slot
    if state.character.is_alive() {
        let circles: Vec<Circle> = state.apples.iter().map(Apple::circle).collect();
        if let Some(i) = first_overlap(&body, &circles) {
            state.score += 1;
            state.apples[i] = Apple::generate(&mut state.rng);
            state.events.push(GameEvent::AppleCollected);
        }
    }

    // Pendulums
    if state.character.is_vulnerable()
        && state.hazards.iter().any(|h| h.collides(&body, state.frame))
        && state.character.kill()
    {
        state.lives = state.lives.saturating_sub(1);
        state.events.push(GameEvent::PlayerHit);
        log::info!("Hit at tick {}: {} lives left", state.time_ticks, state.lives);

        if state.lives == 0 {
            state.phase = GamePhase::GameOver;
            state.events.push(GameEvent::GameOver);
            log::info!("Game over: score={} seed={}", state.score, state.seed);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIMULATION_FRAMES;
    use crate::settings::Settings;
    use crate::sim::character::{CharacterPhase, DEAD_TICKS, RESPAWN_TICKS};
    use crate::sim::hazard::PendulumHazard;
    use crate::solver::{Frame, Trajectory};
    use glam::{DVec2, Vec2};

    fn quick_settings() -> Settings {
        Settings {
            duration: 2.0,
            frame_count: 40,
            ..Default::default()
        }
    }

    /// Empty stage with apples parked far from the character
    fn empty_state() -> GameState {
        let mut state = GameState::new(1, &quick_settings()).unwrap();
        state.hazards.clear();
        for apple in &mut state.apples {
            apple.pos = Vec2::new(150.0, 0.0);
        }
        state
    }

    /// Pendulum whose single bob hangs on the character's start spot
    fn hazard_on_character(state: &GameState) -> PendulumHazard {
        let center = state.character.bounding_circle().center;
        let frame = Frame::new(vec![DVec2::new(0.0, -20.0)]);
        PendulumHazard::new(center - Vec2::new(0.0, 20.0), Trajectory::new(1.0, vec![frame]))
    }

    #[test]
    fn test_frame_wraps() {
        let mut state = empty_state();
        for _ in 0..40 {
            tick(&mut state, &TickInput::default());
        }
        assert_eq!(state.frame, 0);
        assert_eq!(state.time_ticks, 40);
        tick(&mut state, &TickInput::default());
        assert_eq!(state.frame, 1);
    }

    #[test]
    fn test_trail_every_fourth_frame() {
        let mut state = GameState::new(2, &quick_settings()).unwrap();
        state.hazards.truncate(1);
        for _ in 0..4 {
            tick(&mut state, &TickInput::default());
        }
        assert_eq!(state.after_image.len(), 1);
        assert_eq!(state.after_image.ghosts()[0].pos, state.hazards[0].tip_at(4));

        state.trails = false;
        state.after_image.reset();
        for _ in 0..8 {
            tick(&mut state, &TickInput::default());
        }
        assert!(state.after_image.is_empty());
    }

    #[test]
    fn test_apple_pickup() {
        let mut state = empty_state();
        let spot = state.character.bounding_circle().center;
        state.apples[0].pos = spot;

        tick(&mut state, &TickInput::default());
        assert_eq!(state.score, 1);
        assert_eq!(state.events, vec![GameEvent::AppleCollected]);
        assert_ne!(state.apples[0].pos, spot);
    }

    #[test]
    fn test_overlapping_apples_collected_one_per_tick() {
        let mut state = empty_state();
        let spot = state.character.bounding_circle().center;
        state.apples[0].pos = spot;
        state.apples[2].pos = spot + Vec2::new(2.0, 0.0);

        tick(&mut state, &TickInput::default());
        assert_eq!(state.score, 1);
        assert_ne!(state.apples[0].pos, spot);
        assert_eq!(state.apples[2].pos, spot + Vec2::new(2.0, 0.0));

        tick(&mut state, &TickInput::default());
        assert_eq!(state.score, 2);
        assert_eq!(state.events, vec![GameEvent::AppleCollected]);
        assert_ne!(state.apples[2].pos, spot + Vec2::new(2.0, 0.0));
    }

    #[test]
    fn test_pendulum_hit_costs_a_life() {
        let mut state = empty_state();
        state.hazards.push(hazard_on_character(&state));

        tick(&mut state, &TickInput::default());
        assert_eq!(state.lives, 2);
        assert_eq!(state.events, vec![GameEvent::PlayerHit]);
        assert!(matches!(state.character.phase, CharacterPhase::Dead { .. }));

        // No further hits while down or respawning on the pad
        for _ in 0..DEAD_TICKS + RESPAWN_TICKS - 1 {
            tick(&mut state, &TickInput::default());
        }
        assert_eq!(state.lives, 2);
    }

    #[test]
    fn test_game_over() {
        let mut state = empty_state();
        state.lives = 1;
        state.hazards.push(hazard_on_character(&state));

        tick(&mut state, &TickInput::default());
        assert_eq!(state.phase, GamePhase::GameOver);
        assert_eq!(state.events, vec![GameEvent::PlayerHit, GameEvent::GameOver]);

        let frozen = state.time_ticks;
        tick(&mut state, &TickInput::default());
        assert_eq!(state.time_ticks, frozen);
        assert!(state.events.is_empty());
    }

    #[test]
    fn test_determinism() {
        let settings = quick_settings();
        let mut state1 = GameState::new(99999, &settings).unwrap();
        let mut state2 = GameState::new(99999, &settings).unwrap();

        let inputs = [
            TickInput {
                right: true,
                ..Default::default()
            },
            TickInput {
                right: true,
                jump: true,
                ..Default::default()
            },
            TickInput::default(),
            TickInput {
                left: true,
                jump: true,
                ..Default::default()
            },
        ];

        for i in 0..SIMULATION_FRAMES {
            let input = &inputs[i % inputs.len()];
            tick(&mut state1, input);
            tick(&mut state2, input);
        }

        assert_eq!(state1.time_ticks, state2.time_ticks);
        assert_eq!(state1.score, state2.score);
        assert_eq!(state1.lives, state2.lives);
        assert_eq!(state1.character, state2.character);
        assert_eq!(state1.apples, state2.apples);
        assert_eq!(state1.after_image, state2.after_image);
    }
}
