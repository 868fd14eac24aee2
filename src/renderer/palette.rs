//! Theme palettes
//!
//! Colors are looked up at draw time by entity kind and theme. Switching
//! theme never touches the world.

use serde::{Deserialize, Serialize};

use super::surface::Color;
use crate::sim::{ConnectionTier, ParticleKind, ServerKind};

/// Host color scheme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

/// Host text direction; right-to-left mirrors the scene
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum TextDirection {
    #[default]
    Ltr,
    Rtl,
}

/// Per-theme colors
#[derive(Debug, Clone, PartialEq)]
pub struct Palette {
    pub background_inner: Color,
    pub background_outer: Color,
    pub connection: Color,
    pub connection_secure: Color,
    pub pulse: Color,
    pub server_body: Color,
    pub server_accent: Color,
    pub server_outline: Color,
    pub encryption_high: Color,
    pub encryption_mid: Color,
    pub encryption_low: Color,
    pub ring_track: Color,
    pub warning: Color,
    pub key: Color,
    pub shield_fill: Color,
    pub shield_edge: Color,
    pub flow_encrypted: Color,
    pub flow_plain: Color,
    pub binary_text: Color,
    pub attacker: Color,
    pub attacker_eyes: Color,
    pub impact: Color,
    pub block: Color,
}

impl Palette {
    pub fn for_theme(theme: Theme) -> Self {
        match theme {
            Theme::Dark => Self::dark(),
            Theme::Light => Self::light(),
        }
    }

    fn dark() -> Self {
        Self {
            background_inner: Color::rgba(15, 30, 60, 0.35),
            background_outer: Color::rgba(5, 10, 25, 0.0),
            connection: Color::rgba(80, 140, 220, 0.35),
            connection_secure: Color::rgba(60, 220, 160, 0.6),
            pulse: Color::rgba(120, 200, 255, 0.9),
            server_body: Color::rgba(30, 50, 90, 0.9),
            server_accent: Color::rgba(90, 170, 255, 1.0),
            server_outline: Color::rgba(140, 190, 255, 0.8),
            encryption_high: Color::rgba(40, 220, 120, 0.9),
            encryption_mid: Color::rgba(250, 200, 40, 0.9),
            encryption_low: Color::rgba(240, 60, 60, 0.9),
            ring_track: Color::rgba(255, 255, 255, 0.1),
            warning: Color::rgba(255, 80, 60, 1.0),
            key: Color::rgba(255, 210, 80, 0.9),
            shield_fill: Color::rgba(60, 160, 255, 0.12),
            shield_edge: Color::rgba(90, 190, 255, 0.6),
            flow_encrypted: Color::rgba(80, 230, 200, 1.0),
            flow_plain: Color::rgba(255, 150, 60, 1.0),
            binary_text: Color::rgba(120, 255, 200, 0.8),
            attacker: Color::rgba(230, 50, 70, 0.95),
            attacker_eyes: Color::rgba(10, 10, 20, 1.0),
            impact: Color::rgba(255, 90, 60, 1.0),
            block: Color::rgba(100, 200, 255, 1.0),
        }
    }

    fn light() -> Self {
        Self {
            background_inner: Color::rgba(200, 225, 255, 0.5),
            background_outer: Color::rgba(255, 255, 255, 0.0),
            connection: Color::rgba(40, 90, 170, 0.3),
            connection_secure: Color::rgba(20, 150, 100, 0.55),
            pulse: Color::rgba(30, 110, 220, 0.9),
            server_body: Color::rgba(225, 235, 250, 0.95),
            server_accent: Color::rgba(30, 100, 210, 1.0),
            server_outline: Color::rgba(40, 80, 150, 0.8),
            encryption_high: Color::rgba(20, 160, 80, 0.9),
            encryption_mid: Color::rgba(210, 150, 0, 0.9),
            encryption_low: Color::rgba(200, 30, 30, 0.9),
            ring_track: Color::rgba(0, 0, 0, 0.08),
            warning: Color::rgba(220, 40, 30, 1.0),
            key: Color::rgba(200, 140, 0, 0.9),
            shield_fill: Color::rgba(30, 110, 220, 0.1),
            shield_edge: Color::rgba(30, 110, 220, 0.5),
            flow_encrypted: Color::rgba(0, 150, 130, 1.0),
            flow_plain: Color::rgba(220, 100, 20, 1.0),
            binary_text: Color::rgba(0, 120, 90, 0.8),
            attacker: Color::rgba(190, 20, 40, 0.95),
            attacker_eyes: Color::rgba(255, 255, 255, 1.0),
            impact: Color::rgba(220, 60, 30, 1.0),
            block: Color::rgba(30, 120, 230, 1.0),
        }
    }

    /// Accent color per server kind
    pub fn server_kind(&self, kind: ServerKind) -> Color {
        let base = self.server_accent;
        match kind {
            ServerKind::Server | ServerKind::Firewall => base,
            ServerKind::Database | ServerKind::Encryption => {
                Color::rgba(base.g, base.b, base.r, base.a)
            }
            ServerKind::Cloud | ServerKind::Ids => Color::rgba(base.b, base.r, base.g, base.a),
        }
    }

    /// Encryption ring color: green above 70, yellow 30-70, red below 30
    pub fn encryption_band(&self, level: f32) -> Color {
        if level > 70.0 {
            self.encryption_high
        } else if level >= 30.0 {
            self.encryption_mid
        } else {
            self.encryption_low
        }
    }

    /// Base line color per connection tier
    pub fn connection_tier(&self, tier: ConnectionTier) -> Color {
        match tier {
            ConnectionTier::Primary => self.connection,
            ConnectionTier::Secondary => self.connection.fade(0.8),
            ConnectionTier::Tertiary => self.connection.fade(0.6),
        }
    }

    pub fn particle(&self, kind: ParticleKind) -> Color {
        match kind {
            ParticleKind::Impact => self.impact,
            ParticleKind::Block => self.block,
        }
    }

    pub fn flow(&self, encrypted: bool) -> Color {
        if encrypted { self.flow_encrypted } else { self.flow_plain }
    }
}
