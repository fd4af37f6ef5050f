//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One step per animation frame
//! - Injected RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies

pub mod autopilot;
pub mod collision;
pub mod random;
pub mod state;
pub mod tick;

pub use autopilot::Autopilot;
pub use collision::{GoalVerdict, evaluate_goal, find_obstacle_hit};
pub use random::{RandomSource, SequenceRandom, seeded};
pub use state::{Obstacle, ObstacleKind, Outcome, Particle, ParticleColor, RunState};
pub use tick::{TapSide, apply_tap, tick};
