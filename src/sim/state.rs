//! Run state and core simulation types
//!
//! Everything one play session mutates lives in [`RunState`].

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::random::RandomSource;
use crate::tuning::Tuning;

/// Terminal result of a run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Outcome {
    /// Made it onto the toilet in time
    Won { score: f32 },
    /// Pressure maxed out
    Exploded,
    /// Hit an obstacle, arrived too fast, or slid past the goal
    Crashed,
}

impl Outcome {
    pub fn score(&self) -> Option<f32> {
        match self {
            Outcome::Won { score } => Some(*score),
            _ => None,
        }
    }
}

/// Obstacle categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObstacleKind {
    Tree,
    Rock,
}

/// An obstacle on the track
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: u32,
    /// x: lateral position, y: world distance
    pub pos: Vec2,
    pub kind: ObstacleKind,
}

/// Particle color families
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParticleColor {
    /// Snow spray from braking
    Snow,
    Blood,
    Explosion,
}

/// A particle for visual effects, in surface pixels
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub life: f32, // 1 at birth, removed at 0
    pub color: ParticleColor,
}

/// Complete state of one run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunState {
    /// Distance traveled (world units)
    pub distance: f32,
    pub speed: f32,
    pub pressure: f32,
    /// Lateral position of the skier (world units from the left edge)
    pub lateral: f32,
    pub outcome: Option<Outcome>,
    /// Distance at the last spawn check
    pub last_spawn_distance: f32,
    /// Live obstacles (sorted by id)
    pub obstacles: Vec<Obstacle>,
    /// Visual particles
    pub particles: Vec<Particle>,
    /// Frames simulated
    pub frames: u64,
    next_id: u32,
}

impl RunState {
    /// A fresh run at the top of the slope
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            distance: 0.0,
            speed: tuning.min_speed,
            pressure: 0.0,
            lateral: tuning.track_center(),
            outcome: None,
            last_spawn_distance: 0.0,
            obstacles: Vec::new(),
            particles: Vec::new(),
            frames: 0,
            next_id: 1,
        }
    }

    /// Still skiing
    pub fn is_running(&self) -> bool {
        self.outcome.is_none()
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Skier's position in world space
    pub fn player_world_pos(&self, tuning: &Tuning) -> Vec2 {
        Vec2::new(self.lateral, self.distance + tuning.player_screen_y)
    }

    /// Skier's position on the surface
    pub fn player_screen_pos(&self, tuning: &Tuning) -> Vec2 {
        Vec2::new(self.lateral, tuning.player_screen_y)
    }

    /// Signed distance from the skier to the goal (positive = goal ahead)
    pub fn distance_to_goal(&self, tuning: &Tuning) -> f32 {
        tuning.goal_position() - self.player_world_pos(tuning).y
    }

    /// Emit `count` particles at `origin` with velocities in `±spread / 2`
    pub fn emit_burst(
        &mut self,
        rng: &mut impl RandomSource,
        origin: Vec2,
        color: ParticleColor,
        count: usize,
        spread: f32,
    ) {
        self.particles.reserve(count);
        for _ in 0..count {
            let vx = (rng.next_unit() - 0.5) * spread;
            let vy = (rng.next_unit() - 0.5) * spread;
            self.particles.push(Particle {
                pos: origin,
                vel: Vec2::new(vx, vy),
                life: 1.0,
                color,
            });
        }
    }

    /// Move particles and drop the dead ones
    pub fn advance_particles(&mut self, decay: f32) {
        for particle in &mut self.particles {
            particle.pos += particle.vel;
            particle.life -= decay;
        }
        self.particles.retain(|p| p.life > 0.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::random::SequenceRandom;

    #[test]
    fn test_new_run() {
        let tuning = Tuning::default();
        let state = RunState::new(&tuning);
        assert_eq!(state.speed, tuning.min_speed);
        assert_eq!(state.lateral, 200.0);
        assert!(state.is_running());
        assert!(state.obstacles.is_empty());
    }

    #[test]
    fn test_entity_ids_are_unique() {
        let mut state = RunState::new(&Tuning::default());
        let a = state.next_entity_id();
        let b = state.next_entity_id();
        assert_ne!(a, b);
    }

    #[test]
    fn test_burst_velocity_spread() {
        let mut state = RunState::new(&Tuning::default());
        let mut rng = SequenceRandom::new([0.0, 1.0]);
        state.emit_burst(&mut rng, Vec2::new(10.0, 20.0), ParticleColor::Snow, 3, 4.0);
        assert_eq!(state.particles.len(), 3);
        for p in &state.particles {
            assert_eq!(p.pos, Vec2::new(10.0, 20.0));
            assert_eq!(p.vel, Vec2::new(-2.0, 2.0));
            assert_eq!(p.life, 1.0);
        }
    }

    #[test]
    fn test_particles_expire() {
        let mut state = RunState::new(&Tuning::default());
        let mut rng = SequenceRandom::constant(0.75);
        state.emit_burst(&mut rng, Vec2::ZERO, ParticleColor::Blood, 5, 10.0);

        state.advance_particles(0.4);
        assert_eq!(state.particles.len(), 5);
        assert_eq!(state.particles[0].pos, Vec2::new(2.5, 2.5));

        state.advance_particles(0.4);
        state.advance_particles(0.4);
        assert!(state.particles.is_empty());
    }
}
