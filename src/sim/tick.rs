//! Per-frame simulation step and tap handling
//!
//! Core game loop that advances a run by exactly one animation frame.

use glam::Vec2;

use super::collision::{GoalVerdict, evaluate_goal, find_obstacle_hit};
use super::random::RandomSource;
use super::state::{Obstacle, ObstacleKind, Outcome, ParticleColor, RunState};
use crate::tuning::Tuning;

/// Particles in a crash or explosion burst
pub const IMPACT_BURST_COUNT: usize = 60;
pub const IMPACT_BURST_SPREAD: f32 = 15.0;
/// Particles sprayed by a brake tap
pub const BRAKE_BURST_COUNT: usize = 10;
pub const BRAKE_BURST_SPREAD: f32 = 4.0;
/// Snow spray appears this far below the skier's center
const BRAKE_BURST_OFFSET_Y: f32 = 15.0;

/// Which half of the surface a tap landed on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TapSide {
    Left,
    Right,
}

impl TapSide {
    /// Classify a pointer x coordinate relative to a surface of `width`
    pub fn from_pointer(x: f32, width: f32) -> Self {
        if x < width / 2.0 {
            TapSide::Left
        } else {
            TapSide::Right
        }
    }
}

/// Advance the run by one frame
///
/// Returns the outcome on the frame it is decided; later calls are no-ops
/// and return `None`.
pub fn tick(state: &mut RunState, tuning: &Tuning, rng: &mut impl RandomSource) -> Option<Outcome> {
    if !state.is_running() {
        return None;
    }

    state.frames += 1;

    // Physics
    state.speed = (state.speed + tuning.gravity).min(tuning.max_speed);
    state.distance += state.speed;
    state.pressure += tuning.pressure_growth;

    spawn_obstacles(state, tuning, rng);

    // Obstacles
    let player = state.player_world_pos(tuning);
    if let Some(obstacle) = find_obstacle_hit(&state.obstacles, player, tuning.hit_distance()) {
        log::info!(
            "Hit {:?} #{} at distance {:.0}",
            obstacle.kind,
            obstacle.id,
            state.distance
        );
        return Some(finish(state, tuning, rng, Outcome::Crashed, Some(ParticleColor::Blood)));
    }

    let cull_line = state.distance - tuning.cull_margin;
    let before = state.obstacles.len();
    state.obstacles.retain(|obs| obs.pos.y > cull_line);
    if state.obstacles.len() != before {
        log::debug!("Culled {} obstacles", before - state.obstacles.len());
    }

    // Bladder
    if state.pressure >= tuning.bladder_max {
        return Some(finish(
            state,
            tuning,
            rng,
            Outcome::Exploded,
            Some(ParticleColor::Explosion),
        ));
    }

    // Toilet
    match evaluate_goal(state, tuning) {
        GoalVerdict::Landed => {
            let score = tuning.win_score(state.pressure);
            return Some(finish(state, tuning, rng, Outcome::Won { score }, None));
        }
        GoalVerdict::TooFast => {
            log::info!("Arrived at {:.1}, too fast to land", state.speed);
            return Some(finish(state, tuning, rng, Outcome::Crashed, Some(ParticleColor::Blood)));
        }
        GoalVerdict::Overshot => {
            log::info!("Slid past the toilet");
            return Some(finish(state, tuning, rng, Outcome::Crashed, None));
        }
        GoalVerdict::Missed | GoalVerdict::OutsideBand => {}
    }

    state.advance_particles(tuning.particle_decay);
    None
}

/// Brake and sidestep on a tap; ignored once the run has ended
///
/// Returns whether the tap was applied.
pub fn apply_tap(
    state: &mut RunState,
    side: TapSide,
    tuning: &Tuning,
    rng: &mut impl RandomSource,
) -> bool {
    if !state.is_running() {
        return false;
    }

    state.speed = (state.speed - tuning.brake_force).max(tuning.min_speed);

    let (min_x, max_x) = tuning.lateral_bounds();
    state.lateral = match side {
        TapSide::Left => (state.lateral - tuning.lateral_step).max(min_x),
        TapSide::Right => (state.lateral + tuning.lateral_step).min(max_x),
    };

    let origin = state.player_screen_pos(tuning) + Vec2::new(0.0, BRAKE_BURST_OFFSET_Y);
    state.emit_burst(
        rng,
        origin,
        ParticleColor::Snow,
        BRAKE_BURST_COUNT,
        BRAKE_BURST_SPREAD,
    );
    true
}

/// Roll for a new obstacle once the skier has covered a spawn interval
fn spawn_obstacles(state: &mut RunState, tuning: &Tuning, rng: &mut impl RandomSource) {
    if state.distance - state.last_spawn_distance <= tuning.spawn_interval {
        return;
    }

    let roll = rng.next_unit();
    let spawn_cutoff = tuning.goal_position() - tuning.spawn_safety_margin;
    if roll < tuning.spawn_chance && state.distance < spawn_cutoff {
        let margin = tuning.spawn_lateral_margin;
        let x = margin + rng.next_unit() * (tuning.world_width - margin * 2.0);
        let y = state.distance + tuning.spawn_lookahead;
        let kind = if rng.next_unit() > 0.5 {
            ObstacleKind::Tree
        } else {
            ObstacleKind::Rock
        };
        let id = state.next_entity_id();
        log::debug!("Spawned {:?} #{} at ({:.0}, {:.0})", kind, id, x, y);
        state.obstacles.push(Obstacle {
            id,
            pos: Vec2::new(x, y),
            kind,
        });
    }
    state.last_spawn_distance = state.distance;
}

/// Record the outcome and its burst
fn finish(
    state: &mut RunState,
    tuning: &Tuning,
    rng: &mut impl RandomSource,
    outcome: Outcome,
    burst: Option<ParticleColor>,
) -> Outcome {
    state.outcome = Some(outcome);
    if let Some(color) = burst {
        let origin = state.player_screen_pos(tuning);
        state.emit_burst(rng, origin, color, IMPACT_BURST_COUNT, IMPACT_BURST_SPREAD);
    }
    log::info!(
        "Run over after {} frames: {:?} (distance {:.0}, pressure {:.1})",
        state.frames,
        outcome,
        state.distance,
        state.pressure
    );
    outcome
}
