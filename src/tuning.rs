//! Data-driven game balance
//!
//! Every number the simulation reads comes from a [`Tuning`]. Defaults mirror
//! [`crate::consts`]; a host page may override any subset with JSON.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

/// Errors produced while loading tuning overrides
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("malformed tuning JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid tuning value `{field}`: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

/// Numeric game balance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub world_width: f32,
    pub track_length: f32,
    /// Distance before the end of the track where the toilet sits
    pub goal_inset: f32,

    pub gravity: f32,
    pub brake_force: f32,
    pub lateral_step: f32,
    pub lateral_margin: f32,
    pub max_speed: f32,
    pub min_speed: f32,

    pub bladder_max: f32,
    pub pressure_growth: f32,

    pub collision_radius: f32,
    pub collision_padding: f32,
    pub player_screen_y: f32,

    pub spawn_interval: f32,
    pub spawn_chance: f32,
    pub spawn_safety_margin: f32,
    pub spawn_lookahead: f32,
    pub spawn_lateral_margin: f32,
    pub cull_margin: f32,

    pub goal_band: f32,
    pub goal_half_width: f32,
    pub goal_speed_fraction: f32,
    pub overshoot_margin: f32,

    pub particle_decay: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            world_width: WORLD_WIDTH,
            track_length: TRACK_LENGTH,
            goal_inset: TRACK_LENGTH - GOAL_POSITION,

            gravity: GRAVITY,
            brake_force: BRAKE_FORCE,
            lateral_step: LATERAL_STEP,
            lateral_margin: LATERAL_MARGIN,
            max_speed: MAX_SPEED,
            min_speed: MIN_SPEED,

            bladder_max: BLADDER_MAX,
            pressure_growth: PRESSURE_GROWTH,

            collision_radius: COLLISION_RADIUS,
            collision_padding: COLLISION_PADDING,
            player_screen_y: PLAYER_SCREEN_Y,

            spawn_interval: SPAWN_INTERVAL,
            spawn_chance: SPAWN_CHANCE,
            spawn_safety_margin: SPAWN_SAFETY_MARGIN,
            spawn_lookahead: SPAWN_LOOKAHEAD,
            spawn_lateral_margin: SPAWN_LATERAL_MARGIN,
            cull_margin: CULL_MARGIN,

            goal_band: GOAL_BAND,
            goal_half_width: GOAL_HALF_WIDTH,
            goal_speed_fraction: GOAL_SPEED_FRACTION,
            overshoot_margin: OVERSHOOT_MARGIN,

            particle_decay: PARTICLE_DECAY,
        }
    }
}

impl Tuning {
    /// Parse overrides from JSON; missing fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Reject values that would break the run invariants
    pub fn validate(&self) -> Result<(), TuningError> {
        fn invalid(field: &'static str, reason: &'static str) -> Result<(), TuningError> {
            Err(TuningError::Invalid { field, reason })
        }

        if self.min_speed <= 0.0 {
            return invalid("min_speed", "must be positive");
        }
        if self.max_speed < self.min_speed {
            return invalid("max_speed", "must not be below min_speed");
        }
        if self.lateral_margin * 2.0 >= self.world_width {
            return invalid("lateral_margin", "leaves no room on the track");
        }
        if self.spawn_lateral_margin * 2.0 >= self.world_width {
            return invalid("spawn_lateral_margin", "leaves no room to spawn");
        }
        if self.goal_inset <= 0.0 || self.goal_inset >= self.track_length {
            return invalid("goal_inset", "must place the goal on the track");
        }
        if self.bladder_max <= 0.0 {
            return invalid("bladder_max", "must be positive");
        }
        if self.pressure_growth < 0.0 {
            return invalid("pressure_growth", "pressure can't shrink");
        }
        if self.gravity < 0.0 || self.brake_force < 0.0 || self.lateral_step < 0.0 {
            return invalid("gravity", "forces must be non-negative");
        }
        if self.particle_decay <= 0.0 {
            return invalid("particle_decay", "particles would live forever");
        }
        if self.collision_radius <= 0.0 {
            return invalid("collision_radius", "must be positive");
        }
        if !(0.0..=1.0).contains(&self.spawn_chance) {
            return invalid("spawn_chance", "must be a probability");
        }
        Ok(())
    }

    /// World distance of the toilet
    pub fn goal_position(&self) -> f32 {
        self.track_length - self.goal_inset
    }

    /// Lateral bounds of the skier
    pub fn lateral_bounds(&self) -> (f32, f32) {
        (self.lateral_margin, self.world_width - self.lateral_margin)
    }

    pub fn track_center(&self) -> f32 {
        self.world_width / 2.0
    }

    /// Fastest speed at which the skier can land on the toilet
    pub fn safe_arrival_speed(&self) -> f32 {
        self.max_speed * self.goal_speed_fraction
    }

    /// Score for a win at the given pressure
    pub fn win_score(&self, pressure: f32) -> f32 {
        (self.bladder_max - pressure) * 100.0
    }

    /// Distance below which an obstacle counts as a hit
    pub fn hit_distance(&self) -> f32 {
        self.collision_radius + self.collision_padding
    }
}
