//! Chapter settings and presets
//!
//! Loaded from JSON; any field missing from the document keeps its default.

use serde::{Deserialize, Serialize};

use crate::sim::crater::CraterPreset;
use crate::sim::orbit::ObserverPreset;

/// Quality preset levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum QualityPreset {
    Low,
    Medium,
    #[default]
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

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "low" => Some(QualityPreset::Low),
            "medium" | "med" => Some(QualityPreset::Medium),
            "high" => Some(QualityPreset::High),
            _ => None,
        }
    }

    /// Width and height segments of the impact-chapter moon
    pub fn sphere_segments(&self) -> u32 {
        match self {
            QualityPreset::Low => 48,
            QualityPreset::Medium => 96,
            QualityPreset::High => 128,
        }
    }

    /// Segments per side of the erosion terrain planes
    pub fn plane_segments(&self) -> u32 {
        match self {
            QualityPreset::Low => 50,
            QualityPreset::Medium => 80,
            QualityPreset::High => 100,
        }
    }
}

/// Chapter settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Seed for debris bursts
    pub seed: u64,
    /// Mesh resolution
    pub quality: QualityPreset,

    // === Impact ===
    /// Crater parameterization used by the impact chapter
    pub crater_preset: CraterPreset,
    /// Default slider values
    pub impact_mass: f32,
    pub impact_velocity: f32,
    pub impact_theta: f32,
    pub impact_phi: f32,

    // === Erosion ===
    pub enable_rain: bool,
    pub enable_wind: bool,

    // === Moon phase ===
    /// Use the day + minutes clock instead of a continuous day counter
    pub use_minute_precision: bool,
    pub observer_preset: ObserverPreset,
    /// Continuous clock rate
    pub days_per_second: f32,
    /// Minute clock rate (negative runs backward)
    pub minutes_per_second: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            seed: 0x5EED_1A7E,
            quality: QualityPreset::High,

            crater_preset: CraterPreset::MassScaled,
            impact_mass: 50.0,
            impact_velocity: 50.0,
            impact_theta: 0.0,
            impact_phi: 90.0,

            enable_rain: false,
            enable_wind: false,

            use_minute_precision: false,
            observer_preset: ObserverPreset::Fixed,
            days_per_second: 0.25,
            minutes_per_second: 360.0,
        }
    }
}

impl Settings {
    /// Create settings from a quality preset
    pub fn from_preset(preset: QualityPreset) -> Self {
        Self {
            quality: preset,
            ..Self::default()
        }
    }

    /// Parse settings from JSON
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Parse settings, falling back to defaults on malformed input
    pub fn from_json_or_default(json: &str) -> Self {
        match Self::from_json(json) {
            Ok(settings) => {
                log::info!("Loaded settings ({} quality)", settings.quality.as_str());
                settings
            }
            Err(err) => {
                log::warn!("Invalid settings ({err}), using defaults");
                Self::default()
            }
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preset_names() {
        assert_eq!(QualityPreset::from_str("MED"), Some(QualityPreset::Medium));
        assert_eq!(QualityPreset::from_str("ultra"), None);
        assert_eq!(QualityPreset::High.as_str(), "High");
        assert!(QualityPreset::Low.sphere_segments() < QualityPreset::High.sphere_segments());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let settings = Settings::from_json(r#"{ "enable_rain": true, "quality": "Low" }"#)
            .expect("valid settings");
        assert!(settings.enable_rain);
        assert_eq!(settings.quality, QualityPreset::Low);
        assert_eq!(settings.days_per_second, 0.25);
        assert_eq!(settings.observer_preset, ObserverPreset::Fixed);
    }

    #[test]
    fn test_round_trip_and_fallback() {
        let mut settings = Settings::from_preset(QualityPreset::Medium);
        settings.use_minute_precision = true;
        settings.crater_preset = CraterPreset::Fixed;
        let json = settings.to_json().expect("serializable");
        assert_eq!(Settings::from_json(&json).expect("parses"), settings);

        assert_eq!(Settings::from_json_or_default("{ nope"), Settings::default());
    }
}
