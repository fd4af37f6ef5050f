//! Presentation settings and preferences
//!
//! Read from the page's query string (`?quality=low&reduced_motion=1`).
//! None of these affect the simulation, only what gets drawn.

use serde::{Deserialize, Serialize};

/// Quality preset levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum QualityPreset {
    Low,
    #[default]
    Medium,
    High,
}

impl QualityPreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            QualityPreset::Low => "Low",
            QualityPreset::Medium => "Medium",
            QualityPreset::High => "High",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "low" => Some(QualityPreset::Low),
            "medium" | "med" => Some(QualityPreset::Medium),
            "high" => Some(QualityPreset::High),
            _ => None,
        }
    }

    /// Maximum particles drawn per frame for this preset
    pub fn max_particles(&self) -> usize {
        match self {
            QualityPreset::Low => 60,
            QualityPreset::Medium => 200,
            QualityPreset::High => 1000,
        }
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Graphics quality preset
    pub quality: QualityPreset,

    // === Visual Effects ===
    /// Snow spray, blood and explosion bursts
    pub particles: bool,
    /// Streaks across the screen at high speed
    pub speed_lines: bool,

    // === HUD ===
    /// "Tap the sides" prompt at the top of the run
    pub show_hint: bool,

    // === Accessibility ===
    /// Reduced motion (no speed lines)
    pub reduced_motion: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            quality: QualityPreset::Medium,
            particles: true,
            speed_lines: true,
            show_hint: true,
            reduced_motion: false,
        }
    }
}

impl Settings {
    /// Apply `key=value` pairs from a URL query string; unknown keys are ignored
    pub fn from_query(query: &str) -> Self {
        let mut settings = Self::default();
        let query = query.trim_start_matches('?');

        for pair in query.split('&').filter(|p| !p.is_empty()) {
            let (key, value) = pair.split_once('=').unwrap_or((pair, "1"));
            match key {
                "quality" => match QualityPreset::parse(value) {
                    Some(preset) => settings.quality = preset,
                    None => log::warn!("Unknown quality preset: {}", value),
                },
                "particles" => settings.particles = parse_flag(value),
                "speed_lines" => settings.speed_lines = parse_flag(value),
                "hint" => settings.show_hint = parse_flag(value),
                "reduced_motion" => settings.reduced_motion = parse_flag(value),
                _ => {}
            }
        }

        settings
    }

    /// Effective speed lines (respects reduced_motion)
    pub fn effective_speed_lines(&self) -> bool {
        self.speed_lines && !self.reduced_motion
    }

    /// Effective particle count cap
    pub fn max_particles(&self) -> usize {
        if !self.particles {
            0
        } else {
            self.quality.max_particles()
        }
    }
}

fn parse_flag(value: &str) -> bool {
    !matches!(value.to_lowercase().as_str(), "0" | "false" | "off" | "no")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_parsing() {
        let settings = Settings::from_query("?quality=low&reduced_motion&hint=0&bogus=3");
        assert_eq!(settings.quality, QualityPreset::Low);
        assert!(settings.reduced_motion);
        assert!(!settings.show_hint);
        assert!(!settings.effective_speed_lines());
    }

    #[test]
    fn test_empty_query_is_default() {
        assert_eq!(Settings::from_query(""), Settings::default());
        assert_eq!(Settings::from_query("?"), Settings::default());
    }

    #[test]
    fn test_particles_off_caps_to_zero() {
        let settings = Settings::from_query("particles=off&quality=high");
        assert_eq!(settings.max_particles(), 0);
        assert_eq!(settings.quality.as_str(), "High");
    }
}
