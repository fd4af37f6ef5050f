//! Idle/demo mode - the computer skis
//!
//! Taps are the only control, and every tap both brakes and sidesteps, so the
//! autopilot alternates sides when it only wants to brake.

use super::state::RunState;
use super::tick::TapSide;
use crate::tuning::Tuning;

/// Frames between autopilot taps
pub const TAP_COOLDOWN_FRAMES: u32 = 6;
/// How far ahead (world units) obstacles are considered threats
const THREAT_LOOKAHEAD: f32 = 260.0;
/// Braking starts this far ahead of the goal band
const BRAKE_LOOKAHEAD: f32 = 600.0;

/// Tap decisions for demo runs
#[derive(Debug, Clone, Default)]
pub struct Autopilot {
    cooldown: u32,
    last_side: Option<TapSide>,
}

impl Autopilot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decide whether to tap this frame
    pub fn decide(&mut self, state: &RunState, tuning: &Tuning) -> Option<TapSide> {
        if !state.is_running() {
            return None;
        }
        if self.cooldown > 0 {
            self.cooldown -= 1;
            return None;
        }

        let side = self
            .dodge(state, tuning)
            .or_else(|| self.brake_for_goal(state, tuning))
            .or_else(|| self.recenter(state, tuning))?;

        self.cooldown = TAP_COOLDOWN_FRAMES;
        self.last_side = Some(side);
        Some(side)
    }

    /// Step away from the nearest obstacle in our lane
    fn dodge(&self, state: &RunState, tuning: &Tuning) -> Option<TapSide> {
        let player = state.player_world_pos(tuning);
        let lane = tuning.hit_distance() + tuning.lateral_step * 0.5;

        let threat = state
            .obstacles
            .iter()
            .filter(|obs| {
                let ahead = obs.pos.y - player.y;
                ahead > 0.0 && ahead < THREAT_LOOKAHEAD && (obs.pos.x - player.x).abs() < lane
            })
            .min_by(|a, b| a.pos.y.total_cmp(&b.pos.y))?;

        let (min_x, max_x) = tuning.lateral_bounds();
        let side = if threat.pos.x >= player.x {
            TapSide::Left
        } else {
            TapSide::Right
        };
        // Pinned against a wall: go the other way
        Some(match side {
            TapSide::Left if player.x - tuning.lateral_step < min_x => TapSide::Right,
            TapSide::Right if player.x + tuning.lateral_step > max_x => TapSide::Left,
            side => side,
        })
    }

    /// Bleed speed while approaching the toilet
    fn brake_for_goal(&self, state: &RunState, tuning: &Tuning) -> Option<TapSide> {
        let to_goal = state.distance_to_goal(tuning);
        if to_goal > BRAKE_LOOKAHEAD || to_goal < -tuning.goal_band {
            return None;
        }
        // Leave headroom for a few frames of gravity before arrival
        if state.speed + tuning.gravity * 4.0 <= tuning.safe_arrival_speed() {
            return None;
        }
        Some(self.toward_center_or_alternate(state, tuning))
    }

    /// Drift back toward the toilet's opening
    fn recenter(&self, state: &RunState, tuning: &Tuning) -> Option<TapSide> {
        let offset = state.lateral - tuning.track_center();
        if offset.abs() < tuning.lateral_step {
            return None;
        }
        Some(if offset > 0.0 {
            TapSide::Left
        } else {
            TapSide::Right
        })
    }

    fn toward_center_or_alternate(&self, state: &RunState, tuning: &Tuning) -> TapSide {
        let offset = state.lateral - tuning.track_center();
        if offset >= tuning.lateral_step * 0.5 {
            TapSide::Left
        } else if offset <= -tuning.lateral_step * 0.5 {
            TapSide::Right
        } else {
            match self.last_side {
                Some(TapSide::Left) => TapSide::Right,
                _ => TapSide::Left,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::random::seeded;
    use crate::sim::state::{Obstacle, ObstacleKind};
    use crate::sim::{apply_tap, tick};
    use glam::Vec2;

    #[test]
    fn test_dodges_obstacle_ahead() {
        let tuning = Tuning::default();
        let mut state = RunState::new(&tuning);
        state.distance = 1000.0;
        let id = state.next_entity_id();
        state.obstacles.push(Obstacle {
            id,
            pos: Vec2::new(210.0, 1000.0 + tuning.player_screen_y + 100.0),
            kind: ObstacleKind::Tree,
        });

        let mut pilot = Autopilot::new();
        assert_eq!(pilot.decide(&state, &tuning), Some(TapSide::Left));
        // Cooling down
        assert_eq!(pilot.decide(&state, &tuning), None);
    }

    #[test]
    fn test_brakes_near_goal() {
        let tuning = Tuning::default();
        let mut state = RunState::new(&tuning);
        state.distance = tuning.goal_position() - tuning.player_screen_y - 300.0;
        state.speed = 30.0;

        let mut pilot = Autopilot::new();
        assert!(pilot.decide(&state, &tuning).is_some());
    }

    #[test]
    fn test_coasts_when_centered_and_clear() {
        let tuning = Tuning::default();
        let state = RunState::new(&tuning);
        let mut pilot = Autopilot::new();
        assert_eq!(pilot.decide(&state, &tuning), None);
    }

    #[test]
    fn test_recenters() {
        let tuning = Tuning::default();
        let mut state = RunState::new(&tuning);
        state.lateral = 300.0;
        let mut pilot = Autopilot::new();
        assert_eq!(pilot.decide(&state, &tuning), Some(TapSide::Left));
    }

    #[test]
    fn test_demo_run_always_ends() {
        let tuning = Tuning::default();
        let mut state = RunState::new(&tuning);
        let mut rng = seeded(42);
        let mut pilot = Autopilot::new();

        // Pressure alone ends the run after 1250 frames
        let mut outcome = None;
        for _ in 0..2000 {
            if let Some(side) = pilot.decide(&state, &tuning) {
                apply_tap(&mut state, side, &tuning, &mut rng);
            }
            if let Some(result) = tick(&mut state, &tuning, &mut rng) {
                outcome = Some(result);
                break;
            }
        }
        assert!(outcome.is_some());
        assert_eq!(state.outcome, outcome);
    }
}
