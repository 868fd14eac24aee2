//! Engine settings and tuning
//!
//! Everything the spawner, layout and renderer read lives here so a host can
//! retune the backdrop from JSON. Persisted in LocalStorage on the web.

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};

/// Which themed network the engine animates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Variant {
    /// Server / database / cloud nodes on a hub and ring
    #[default]
    Hero,
    /// Firewall hub, encryption ring, intrusion-detection ring
    Cyber,
}

impl Variant {
    pub fn as_str(&self) -> &'static str {
        match self {
            Variant::Hero => "Hero",
            Variant::Cyber => "Cyber",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "hero" => Some(Variant::Hero),
            "cyber" | "cybersecurity" => Some(Variant::Cyber),
            _ => None,
        }
    }
}

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

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "low" => Some(QualityPreset::Low),
            "medium" | "med" => Some(QualityPreset::Medium),
            "high" => Some(QualityPreset::High),
            _ => None,
        }
    }

    /// Maximum live particles for this preset
    pub fn max_particles(&self) -> usize {
        match self {
            QualityPreset::Low => 60,
            QualityPreset::Medium => 200,
            QualityPreset::High => 600,
        }
    }

    /// Burst size multiplier (1.0 = full)
    pub fn burst_scale(&self) -> f32 {
        match self {
            QualityPreset::Low => 0.5,
            QualityPreset::Medium => 1.0,
            QualityPreset::High => 1.5,
        }
    }

    /// Whether packets draw a fading trail
    pub fn trails_enabled(&self) -> bool {
        !matches!(self, QualityPreset::Low)
    }
}

/// Engine settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub variant: Variant,
    pub quality: QualityPreset,

    // === Layout ===
    /// Servers on the (inner) ring around the hub
    pub ring_count: usize,
    /// Ring radius as a fraction of min(width, height)
    pub ring_ratio: f32,
    /// Outer ring radius (Cyber variant only)
    pub outer_ring_ratio: f32,
    /// Probability that a ring server starts protected (the hub always is)
    pub protected_ratio: f32,

    // === Data flows ===
    /// Seconds between data-flow spawns
    pub flow_interval: f32,
    /// Probability a new flow is encrypted
    pub encrypted_ratio: f32,
    /// Progress per frame, drawn uniformly from [min, max)
    pub flow_speed_min: f32,
    pub flow_speed_max: f32,

    // === Attackers ===
    /// Seconds between attacker waves
    pub attacker_interval: f32,
    /// Live attacker cap
    pub attacker_cap: usize,
    /// Attackers per wave
    pub attacker_batch: usize,
    /// Seconds an attacker stays dormant, drawn from [min, max)
    pub activation_delay_min: f32,
    pub activation_delay_max: f32,
    /// Pixels per frame
    pub attacker_speed_min: f32,
    pub attacker_speed_max: f32,
    /// Percentage of the encryption scale removed on a breach
    pub attack_strength_min: f32,
    pub attack_strength_max: f32,

    // === Effects ===
    /// Particles per burst at Medium quality
    pub burst_size: usize,
    /// Particle effects (impact and shield-block bursts)
    pub particles: bool,
    /// Seconds the attack warning glyph stays up after a hit (0 = one frame)
    pub alert_hold: f32,
    /// Reduced motion (no trails, no bursts)
    pub reduced_motion: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            variant: Variant::Hero,
            quality: QualityPreset::Medium,

            ring_count: 6,
            ring_ratio: 0.3,
            outer_ring_ratio: 0.45,
            protected_ratio: 0.7,

            flow_interval: 1.0,
            encrypted_ratio: 0.9,
            flow_speed_min: 0.005,
            flow_speed_max: 0.015,

            attacker_interval: 8.0,
            attacker_cap: 5,
            attacker_batch: 3,
            activation_delay_min: 3.0,
            activation_delay_max: 8.0,
            attacker_speed_min: 1.0,
            attacker_speed_max: 2.0,
            attack_strength_min: 10.0,
            attack_strength_max: 30.0,

            burst_size: 12,
            particles: true,
            alert_hold: 0.6,
            reduced_motion: false,
        }
    }
}

impl Settings {
    /// Defaults tuned for a variant
    pub fn for_variant(variant: Variant) -> Self {
        match variant {
            Variant::Hero => Self::default(),
            Variant::Cyber => Self {
                variant,
                ring_count: 4,
                ring_ratio: 0.22,
                ..Self::default()
            },
        }
    }

    /// Particles per burst after quality scaling (0 when effects are off)
    pub fn effective_burst_size(&self) -> usize {
        if !self.particles || self.reduced_motion {
            return 0;
        }
        ((self.burst_size as f32) * self.quality.burst_scale()).round() as usize
    }

    /// Effective particle cap
    pub fn max_particles(&self) -> usize {
        if !self.particles {
            0
        } else {
            self.quality.max_particles()
        }
    }

    /// Effective packet trails (respects reduced_motion)
    pub fn effective_trails(&self) -> bool {
        self.quality.trails_enabled() && !self.reduced_motion
    }

    /// Reject settings the engine cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.ring_count == 0 {
            return Err(EngineError::InvalidSettings("ring_count must be > 0".into()));
        }
        if self.flow_interval <= 0.0 || self.attacker_interval <= 0.0 {
            return Err(EngineError::InvalidSettings(format!(
                "spawn intervals must be > 0 (flow {}, attacker {})",
                self.flow_interval, self.attacker_interval
            )));
        }
        if self.attacker_cap == 0 {
            return Err(EngineError::InvalidSettings("attacker_cap must be > 0".into()));
        }
        if self.flow_speed_min <= 0.0 || self.flow_speed_max < self.flow_speed_min {
            return Err(EngineError::InvalidSettings(format!(
                "flow speed range [{}, {}) is empty or non-positive",
                self.flow_speed_min, self.flow_speed_max
            )));
        }
        if self.activation_delay_min < 0.0 || self.activation_delay_max < self.activation_delay_min {
            return Err(EngineError::InvalidSettings(format!(
                "activation delay range [{}, {}) is invalid",
                self.activation_delay_min, self.activation_delay_max
            )));
        }
        if self.attacker_speed_min <= 0.0 || self.attacker_speed_max < self.attacker_speed_min {
            return Err(EngineError::InvalidSettings(format!(
                "attacker speed range [{}, {}) is empty or non-positive",
                self.attacker_speed_min, self.attacker_speed_max
            )));
        }
        if self.attack_strength_min <= 0.0
            || self.attack_strength_max < self.attack_strength_min
            || self.attack_strength_max > 100.0
        {
            return Err(EngineError::InvalidSettings(format!(
                "attack strength range [{}, {}) must lie in (0, 100]",
                self.attack_strength_min, self.attack_strength_max
            )));
        }
        if self.ring_ratio <= 0.0 || self.outer_ring_ratio <= 0.0 {
            return Err(EngineError::InvalidSettings(format!(
                "ring ratios must be > 0 (inner {}, outer {})",
                self.ring_ratio, self.outer_ring_ratio
            )));
        }
        if self.alert_hold < 0.0 {
            return Err(EngineError::InvalidSettings(format!(
                "alert_hold must be >= 0 (got {})",
                self.alert_hold
            )));
        }
        for (name, p) in [
            ("protected_ratio", self.protected_ratio),
            ("encrypted_ratio", self.encrypted_ratio),
        ] {
            if !(0.0..=1.0).contains(&p) {
                return Err(EngineError::InvalidSettings(format!("{name} must be in [0, 1] (got {p})")));
            }
        }
        Ok(())
    }

    /// Parse and validate settings from JSON; missing fields take defaults
    pub fn from_json(json: &str) -> Result<Self> {
        let settings: Self =
            serde_json::from_str(json).map_err(|err| EngineError::SettingsParse(err.to_string()))?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|err| EngineError::SettingsParse(err.to_string()))
    }

    /// LocalStorage key
    #[cfg(target_arch = "wasm32")]
    const STORAGE_KEY: &'static str = "netguard_viz_settings";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load(variant: Variant) -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
                    Ok(settings) => {
                        log::info!("Loaded settings from LocalStorage");
                        return settings;
                    }
                    Err(e) => log::warn!("Ignoring stored settings: {}", e),
                }
            }
        }

        log::info!("Using default {} settings", variant.as_str());
        Self::for_variant(variant)
    }

    /// Native stub
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load(variant: Variant) -> Self {
        Self::for_variant(variant)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        assert!(Settings::default().validate().is_ok());
        assert!(Settings::for_variant(Variant::Cyber).validate().is_ok());
    }

    #[test]
    fn test_json_partial_fills_defaults() {
        let s = Settings::from_json(r#"{"variant":"Cyber","attacker_cap":2}"#).unwrap();
        assert_eq!(s.variant, Variant::Cyber);
        assert_eq!(s.attacker_cap, 2);
        assert_eq!(s.flow_interval, 1.0);
    }

    #[test]
    fn test_json_round_trip() {
        let mut s = Settings::for_variant(Variant::Cyber);
        s.quality = QualityPreset::High;
        let back = Settings::from_json(&s.to_json().unwrap()).unwrap();
        assert_eq!(back, s);
    }

    #[test]
    fn test_rejects_bad_values() {
        let zero_interval = Settings {
            flow_interval: 0.0,
            ..Settings::default()
        };
        assert!(matches!(zero_interval.validate(), Err(EngineError::InvalidSettings(_))));

        let bad_ratio = Settings {
            encrypted_ratio: 1.5,
            ..Settings::default()
        };
        assert!(bad_ratio.validate().is_err());

        let negative_strength =
            Settings::from_json(r#"{"attack_strength_min":-50.0,"attack_strength_max":-40.0}"#);
        assert!(matches!(negative_strength, Err(EngineError::InvalidSettings(_))));

        let reversed_strength = Settings {
            attack_strength_min: 30.0,
            attack_strength_max: 10.0,
            ..Settings::default()
        };
        assert!(reversed_strength.validate().is_err());

        let backwards_speed = Settings {
            attacker_speed_min: -2.0,
            attacker_speed_max: -1.0,
            ..Settings::default()
        };
        assert!(backwards_speed.validate().is_err());

        let reversed_speed = Settings {
            attacker_speed_min: 2.0,
            attacker_speed_max: 1.0,
            ..Settings::default()
        };
        assert!(reversed_speed.validate().is_err());

        let flat_ring = Settings {
            ring_ratio: 0.0,
            ..Settings::default()
        };
        assert!(flat_ring.validate().is_err());

        let flat_outer_ring = Settings {
            outer_ring_ratio: -0.1,
            ..Settings::default()
        };
        assert!(flat_outer_ring.validate().is_err());

        let negative_hold = Settings {
            alert_hold: -1.0,
            ..Settings::default()
        };
        assert!(negative_hold.validate().is_err());

        assert!(matches!(
            Settings::from_json("{not json"),
            Err(EngineError::SettingsParse(_))
        ));
    }

    #[test]
    fn test_burst_size_follows_quality() {
        let mut s = Settings::default();
        assert_eq!(s.effective_burst_size(), 12);
        s.quality = QualityPreset::Low;
        assert_eq!(s.effective_burst_size(), 6);
        s.reduced_motion = true;
        assert_eq!(s.effective_burst_size(), 0);
    }

    #[test]
    fn test_parse_names() {
        assert_eq!(Variant::from_str("CYBER"), Some(Variant::Cyber));
        assert_eq!(QualityPreset::from_str("med"), Some(QualityPreset::Medium));
        assert_eq!(QualityPreset::from_str("ultra"), None);
        assert_eq!(QualityPreset::from_str(QualityPreset::High.as_str()), Some(QualityPreset::High));
    }
}
