//! Heads-up display model
//!
//! Pure projection of a run into the numbers and styles the overlay shows.

use crate::sim::RunState;
use crate::tuning::Tuning;

/// Distance under which the "tap the sides" hint stays up
pub const HINT_DISTANCE: f32 = 1000.0;
/// Speed readout multiplier (world units per frame to "km/h")
const KMH_PER_SPEED: f32 = 5.0;

/// Pressure bar styling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PressureTier {
    Calm,
    Warning,
    /// Pulsing red
    Critical,
}

impl PressureTier {
    pub fn css_class(&self) -> &'static str {
        match self {
            PressureTier::Calm => "calm",
            PressureTier::Warning => "warning",
            PressureTier::Critical => "critical",
        }
    }
}

/// Everything the HUD overlay displays for one frame
#[derive(Debug, Clone, PartialEq)]
pub struct HudModel {
    /// 0-100
    pub pressure_percent: f32,
    /// Whole-number pressure readout
    pub pressure_readout: u32,
    pub pressure_tier: PressureTier,
    pub speed_kmh: u32,
    /// 0-100
    pub speed_percent: f32,
    pub speed_is_fast: bool,
    /// 0-100, toward the toilet
    pub progress_percent: f32,
    pub show_hint: bool,
}

impl HudModel {
    pub fn from_state(state: &RunState, tuning: &Tuning) -> Self {
        let pressure_percent = (state.pressure / tuning.bladder_max * 100.0).min(100.0);
        let pressure_tier = if pressure_percent > 80.0 {
            PressureTier::Critical
        } else if pressure_percent > 50.0 {
            PressureTier::Warning
        } else {
            PressureTier::Calm
        };
        let speed_percent = (state.speed / tuning.max_speed * 100.0).min(100.0);

        Self {
            pressure_percent,
            pressure_readout: state.pressure.max(0.0).floor() as u32,
            pressure_tier,
            speed_kmh: (state.speed * KMH_PER_SPEED).floor() as u32,
            speed_percent,
            speed_is_fast: speed_percent > 80.0,
            progress_percent: (state.distance / tuning.goal_position() * 100.0).min(100.0),
            show_hint: state.distance < HINT_DISTANCE,
        }
    }
}
