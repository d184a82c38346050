//! Fixed-step simulation tick
//!
//! One call advances the run by exactly one frame: flyer, then gates, then
//! hits and scoring. The tick never changes the session phase itself; it
//! reports a terminal cause and the orchestrator decides when to end the run.

use serde::Serialize;

use super::collision::GateCheck;
use super::state::{FlyerStep, GameState};

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Copy, Default)]
pub struct TickInput {
    /// Impulse requested since the previous tick (key press / click)
    pub impulse: bool,
    /// Demo mode - the autopilot decides impulses
    pub autopilot: bool,
}

/// Why a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TerminalCause {
    /// Flyer touched the floor
    Ground,
    /// Flyer box hit a barrier
    Gate,
}

/// Everything that happened during one tick
#[derive(Debug, Clone, Copy, Default)]
pub struct TickOutcome {
    /// False when the tick was skipped (session already terminal)
    pub advanced: bool,
    pub flyer: FlyerStep,
    pub gates: GateCheck,
    pub spawned: bool,
    pub evicted: usize,
    /// Set when this tick must end the run
    pub terminal: Option<TerminalCause>,
}

/// Advance the game state by one tick
pub fn tick(state: &mut GameState, input: &TickInput) -> TickOutcome {
    if state.session.is_terminal() {
        return TickOutcome::default();
    }

    let wants_impulse = input.impulse || (input.autopilot && autopilot_input(state).impulse);
    if wants_impulse {
        state.impulse();
    }

    state.session.ticks += 1;

    let flyer = state.flyer.update(&state.tuning, state.viewport.height());

    let gate_width = state.viewport.gate_width();
    let evicted = state.gates.advance(state.tuning.gate_speed, gate_width);
    let spawned = state.session.ticks % state.tuning.spawn_interval == 0;
    if spawned {
        state.gates.spawn(
            state.viewport.width(),
            state.viewport.height(),
            &state.tuning,
        );
    }

    let gates = state.gates.check_and_score(
        &state.flyer.bounding_box(),
        state.flyer.pos.x,
        gate_width,
    );
    state.session.score += gates.scored;

    let terminal = if flyer.ground_hit {
        Some(TerminalCause::Ground)
    } else if gates.collided {
        Some(TerminalCause::Gate)
    } else {
        None
    };

    TickOutcome {
        advanced: true,
        flyer,
        gates,
        spawned,
        evicted,
        terminal,
    }
}

/// Velocity above which the autopilot waits instead of impulsing again
const AUTOPILOT_CLIMB_LIMIT: f32 = -2.0;

/// Demo-mode input: steer for the middle of the next opening
///
/// The target is the first gate whose right edge has not passed the flyer's
/// left edge, or the viewport middle when no such gate exists.
pub fn autopilot_input(state: &GameState) -> TickInput {
    let flyer = &state.flyer;
    let gate_width = state.viewport.gate_width();
    let flyer_left = flyer.bounding_box().left();

    let aim = state
        .gates
        .iter()
        .find(|g| g.right(gate_width) >= flyer_left)
        .map(|g| g.top() + g.gap() / 2.0)
        .unwrap_or(state.viewport.height() / 2.0);

    TickInput {
        impulse: flyer.pos.y > aim && flyer.velocity > AUTOPILOT_CLIMB_LIMIT,
        autopilot: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{Obstacle, Phase};
    use glam::Vec2;

    /// Every gate opening contains the band y in [381, 388] for a 24px flyer
    /// with the default gap, so pinning the flyer there never collides.
    fn pin_flyer(state: &mut GameState) {
        state.flyer.pos.y = 384.0;
        state.flyer.velocity = 0.0;
    }

    fn scenario_state() -> GameState {
        let mut state = GameState::new(2024);
        state.resize(480.0, 640.0);
        state
    }

    #[test]
    fn test_spawn_cadence_and_scroll() {
        let mut state = scenario_state();
        let input = TickInput::default();
        assert!(state.gates.is_empty());

        for t in 1..=330u64 {
            pin_flyer(&mut state);
            let outcome = tick(&mut state, &input);
            assert!(outcome.advanced);
            assert_eq!(outcome.terminal, None, "unexpected end at tick {}", t);
            assert_eq!(state.session.ticks, t);

            match t {
                1..=99 => assert!(state.gates.is_empty()),
                100 => {
                    assert!(outcome.spawned);
                    assert_eq!(state.gates.len(), 1);
                    assert_eq!(state.gates.gates()[0].x, 480.0);
                }
                192 => assert_eq!(state.gates.gates()[0].x, 480.0 - 92.0 * 2.5),
                200 => {
                    assert_eq!(state.gates.len(), 2);
                    assert_eq!(state.gates.gates()[0].x, 230.0);
                    assert_eq!(state.gates.gates()[1].x, 480.0);
                }
                320 => {
                    // right edge at 2.0, still alive
                    assert_eq!(state.gates.gates()[0].x, -70.0);
                    assert_eq!(outcome.evicted, 0);
                }
                321 => {
                    // right edge would be -0.5: the first gate is gone
                    assert_eq!(outcome.evicted, 1);
                    assert_eq!(state.gates.gates()[0].x, 480.0 - 121.0 * 2.5);
                }
                _ => {}
            }
        }
        // Only the first gate has cleared the flyer column (tick 301)
        assert_eq!(state.session.score, 1);
    }

    #[test]
    fn test_resize_keeps_gaps_and_widens_gates() {
        let mut state = scenario_state();
        let input = TickInput::default();
        for _ in 0..250 {
            pin_flyer(&mut state);
            tick(&mut state, &input);
        }
        assert_eq!(state.gates.len(), 2);
        let tops: Vec<f32> = state.gates.iter().map(|g| g.top()).collect();

        state.resize(1200.0, 900.0);
        assert_eq!(state.viewport.gate_width(), 180.0);
        let after: Vec<f32> = state.gates.iter().map(|g| g.top()).collect();
        assert_eq!(after, tops);
        for gate in state.gates.iter() {
            assert_eq!(gate.bottom() - gate.top(), state.tuning.gate_gap);
        }

        for t in 251..=350u64 {
            pin_flyer(&mut state);
            let outcome = tick(&mut state, &input);
            assert_eq!(outcome.terminal, None, "unexpected end at tick {}", t);
            match t {
                300 => {
                    assert!(outcome.spawned);
                    assert_eq!(state.gates.gates().last().map(|g| g.x), Some(1200.0));
                }
                // With width 72 the first gate would have scored at tick 301;
                // at width 180 its right edge reaches the flyer column later
                344 => assert_eq!(state.session.score, 0),
                345 => {
                    assert_eq!(outcome.gates.scored, 1);
                    assert_eq!(state.session.score, 1);
                }
                _ => {}
            }
        }

        assert_eq!(state.gates.len(), 3);
        for gate in state.gates.iter() {
            assert_eq!(gate.bottom() - gate.top(), state.tuning.gate_gap);
        }
    }

    #[test]
    fn test_ground_ends_run() {
        let mut state = scenario_state();
        let input = TickInput::default();
        for _ in 0..1000 {
            let outcome = tick(&mut state, &input);
            if let Some(cause) = outcome.terminal {
                assert_eq!(cause, TerminalCause::Ground);
                assert!(outcome.flyer.ground_hit);
                assert_eq!(state.flyer.pos.y, 640.0 - 12.0);
                // The tick only reports, the orchestrator ends the run
                assert_eq!(state.session.phase, Phase::Running);
                return;
            }
        }
        panic!("flyer never hit the ground");
    }

    #[test]
    fn test_gate_hit_ends_run() {
        let mut state = scenario_state();
        // Opening starts at 300, flyer at 150 is above it inside the column
        state.gates.push(Obstacle::new(40.0, 300.0, 350.0, 0));
        let outcome = tick(&mut state, &TickInput::default());
        assert!(outcome.gates.collided);
        assert_eq!(outcome.terminal, Some(TerminalCause::Gate));
    }

    #[test]
    fn test_ceiling_does_not_end_run() {
        let mut state = scenario_state();
        state.flyer.pos.y = 14.0;
        let outcome = tick(
            &mut state,
            &TickInput {
                impulse: true,
                ..Default::default()
            },
        );
        assert!(outcome.flyer.ceiling_hit);
        assert_eq!(outcome.terminal, None);
        assert_eq!(state.flyer.velocity, 0.0);
    }

    #[test]
    fn test_impulse_applied_before_integration() {
        let mut state = scenario_state();
        let input = TickInput {
            impulse: true,
            ..Default::default()
        };
        tick(&mut state, &input);
        let expected = (-6.0f32 + 0.3) * 0.98;
        assert!((state.flyer.velocity - expected).abs() < 1e-5);
    }

    #[test]
    fn test_terminal_state_is_frozen() {
        let mut state = scenario_state();
        for _ in 0..10 {
            tick(&mut state, &TickInput::default());
        }
        state.session.end();
        let pos = state.flyer.pos;
        let ticks = state.session.ticks;

        let outcome = tick(
            &mut state,
            &TickInput {
                impulse: true,
                ..Default::default()
            },
        );
        assert!(!outcome.advanced);
        assert_eq!(state.flyer.pos, pos);
        assert_eq!(state.session.ticks, ticks);
    }

    #[test]
    fn test_restart_resets_exactly() {
        let mut state = scenario_state();
        for _ in 0..150 {
            pin_flyer(&mut state);
            tick(&mut state, &TickInput::default());
        }
        state.session.score = 4;
        state.session.end();

        state.restart();
        assert!(state.gates.is_empty());
        assert_eq!(state.session.score, 0);
        assert_eq!(state.session.ticks, 0);
        assert_eq!(state.session.phase, Phase::Running);
        assert_eq!(state.flyer.pos, Vec2::new(50.0, 150.0));
        assert_eq!(state.flyer.velocity, 0.0);
    }

    #[test]
    fn test_determinism() {
        let mut a = GameState::new(99999);
        let mut b = GameState::new(99999);
        for t in 0..400u32 {
            let input = TickInput {
                impulse: t % 17 == 0,
                autopilot: true,
            };
            tick(&mut a, &input);
            tick(&mut b, &input);
        }
        assert_eq!(a.session.ticks, b.session.ticks);
        assert_eq!(a.session.score, b.session.score);
        assert_eq!(a.gates.gates(), b.gates.gates());
        assert_eq!(a.flyer.pos, b.flyer.pos);
    }

    #[test]
    fn test_autopilot_aims_for_opening() {
        let mut state = scenario_state();
        state.gates.push(Obstacle::new(200.0, 100.0, 350.0, 0));

        // Opening middle is 275
        state.flyer.pos.y = 320.0;
        state.flyer.velocity = 1.0;
        assert!(autopilot_input(&state).impulse);

        state.flyer.velocity = -5.0;
        assert!(!autopilot_input(&state).impulse);

        state.flyer.pos.y = 200.0;
        state.flyer.velocity = 1.0;
        assert!(!autopilot_input(&state).impulse);
    }

    #[test]
    fn test_autopilot_ignores_passed_gates() {
        let mut state = scenario_state();
        // Right edge at 2, left of the flyer's left edge (33)
        state.gates.push(Obstacle::new(-70.0, 50.0, 350.0, 0));
        state.flyer.pos.y = 330.0;
        state.flyer.velocity = 0.0;
        // Aims for the viewport middle (320), not the passed gate (225)
        assert!(autopilot_input(&state).impulse);
        state.flyer.pos.y = 300.0;
        assert!(!autopilot_input(&state).impulse);
    }
}
