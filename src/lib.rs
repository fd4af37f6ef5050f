//! Piste Panic - A downhill dash to the toilet
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, spawning, collisions, outcomes)
//! - `surface`: One play session's frame loop (update, then render)
//! - `shell`: Menu/playing/result state machine
//! - `renderer`: Canvas abstraction, scene drawing and WebGPU pipeline
//! - `platform`: Frame scheduling with cancellation
//! - `tuning`: Data-driven game balance

pub mod highscores;
pub mod hud;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod shell;
pub mod sim;
pub mod surface;
pub mod tuning;

pub use highscores::HighScores;
pub use settings::{QualityPreset, Settings};
pub use shell::{Rank, Screen, Shell};
pub use surface::PlaySurface;
pub use tuning::{Tuning, TuningError};

/// Game configuration constants
///
/// All per-frame values assume one simulation step per animation frame.
pub mod consts {
    /// Width of the play surface in world units (and CSS pixels)
    pub const WORLD_WIDTH: f32 = 400.0;
    /// Total length of the run
    pub const TRACK_LENGTH: f32 = 7500.0;
    /// World distance of the toilet
    pub const GOAL_POSITION: f32 = TRACK_LENGTH - 400.0;

    /// Downhill acceleration per frame
    pub const GRAVITY: f32 = 0.42;
    /// Speed lost per tap
    pub const BRAKE_FORCE: f32 = 10.0;
    /// Sideways movement per tap
    pub const LATERAL_STEP: f32 = 25.0;
    /// Distance from each surface edge the skier can't cross
    pub const LATERAL_MARGIN: f32 = 60.0;
    pub const MAX_SPEED: f32 = 40.0;
    pub const MIN_SPEED: f32 = 1.0;

    /// Pressure at which the bladder bursts
    pub const BLADDER_MAX: f32 = 100.0;
    /// Pressure gained per frame
    pub const PRESSURE_GROWTH: f32 = 0.08;

    /// Hitbox radius; a hit registers below radius + `COLLISION_PADDING`
    pub const COLLISION_RADIUS: f32 = 15.0;
    pub const COLLISION_PADDING: f32 = 10.0;

    /// Screen row the skier is drawn at; also the world offset of the skier
    /// relative to the camera distance
    pub const PLAYER_SCREEN_Y: f32 = 200.0;

    /// Obstacle spawning
    pub const SPAWN_INTERVAL: f32 = 150.0;
    pub const SPAWN_CHANCE: f32 = 0.6;
    pub const SPAWN_SAFETY_MARGIN: f32 = 800.0;
    pub const SPAWN_LOOKAHEAD: f32 = 1000.0;
    pub const SPAWN_LATERAL_MARGIN: f32 = 70.0;
    /// Obstacles this far behind the camera are dropped
    pub const CULL_MARGIN: f32 = 200.0;

    /// Goal evaluation window (world units either side of the goal)
    pub const GOAL_BAND: f32 = 30.0;
    /// Half width of the toilet opening
    pub const GOAL_HALF_WIDTH: f32 = 40.0;
    /// Arrival faster than this fraction of `MAX_SPEED` is a crash
    pub const GOAL_SPEED_FRACTION: f32 = 0.45;
    /// Sliding past the goal by more than this is a crash
    pub const OVERSHOOT_MARGIN: f32 = 60.0;

    /// Particle life lost per frame (life starts at 1.0)
    pub const PARTICLE_DECAY: f32 = 0.03;

    /// Speed lines appear above this speed
    pub const SPEED_LINE_THRESHOLD: f32 = 20.0;
}
