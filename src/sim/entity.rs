//! Entity records
//!
//! Plain data. Behaviour lives in `step`, `resolve` and `spawn`; colors live
//! in the renderer's palette.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::ENCRYPTION_MAX;

/// Node kinds across both variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ServerKind {
    Server,
    Database,
    Cloud,
    Firewall,
    Encryption,
    Ids,
}

/// A network node. Never removed during a session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Server {
    pub pos: Vec2,
    pub size: f32,
    pub kind: ServerKind,
    pub is_protected: bool,
    pub shield_radius: f32,
    /// 0-100
    pub encryption_level: f32,
    /// Set by the resolver for the frame this server was hit
    pub under_attack: bool,
    /// Seconds left on the warning glyph
    pub alert: f32,
    /// Indices of servers this one links to
    pub connections: Vec<usize>,
    /// 0-1, glow pulse
    pub pulse_phase: f32,
}

impl Server {
    pub fn new(pos: Vec2, size: f32, kind: ServerKind, is_protected: bool, encryption_level: f32) -> Self {
        Self {
            pos,
            size,
            kind,
            is_protected,
            shield_radius: size * 1.6,
            encryption_level: encryption_level.clamp(0.0, ENCRYPTION_MAX),
            under_attack: false,
            alert: 0.0,
            connections: Vec::new(),
            pulse_phase: 0.0,
        }
    }

    /// Whether the renderer should show the warning glyph
    pub fn shows_warning(&self) -> bool {
        self.under_attack || self.alert > 0.0
    }
}

/// Which layer of the topology a link belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConnectionTier {
    /// Hub to ring
    Primary,
    /// Ring neighbours
    Secondary,
    /// Inner ring to outer ring (Cyber)
    Tertiary,
}

/// A link between two servers with a bouncing pulse
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Connection {
    pub from: usize,
    pub to: usize,
    pub tier: ConnectionTier,
    /// 0-100, static
    pub security_level: f32,
    /// Always within [0, 1]
    pub pulse_position: f32,
    /// +1 or -1
    pub pulse_direction: f32,
}

impl Connection {
    pub fn new(from: usize, to: usize, tier: ConnectionTier, security_level: f32, pulse_position: f32) -> Self {
        Self {
            from,
            to,
            tier,
            security_level,
            pulse_position: pulse_position.clamp(0.0, 1.0),
            pulse_direction: 1.0,
        }
    }

    pub fn links(&self, a: usize, b: usize) -> bool {
        (self.from == a && self.to == b) || (self.from == b && self.to == a)
    }
}

/// A packet travelling from one server to another
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataFlow {
    pub id: u32,
    pub source: usize,
    pub destination: usize,
    /// [0, 1); the flow is removed the step it reaches 1
    pub progress: f32,
    pub speed: f32,
    pub pos: Vec2,
    pub is_encrypted: bool,
    /// Cosmetic, drives the binary-digit flicker
    pub cipher_phase: f32,
}

/// Orbiting key glyph bound to one server
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EncryptionKey {
    pub server: usize,
    pub angle: f32,
    pub orbit_radius: f32,
    pub rotation_speed: f32,
}

/// Pulsing shield bound to one server
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Shield {
    pub server: usize,
    /// 0-1
    pub phase: f32,
    pub pulse_rate: f32,
    pub pulse_amount: f32,
}

impl Shield {
    /// Current radial offset of the pulse
    pub fn pulse(&self) -> f32 {
        (self.phase * std::f32::consts::TAU).sin() * self.pulse_amount
    }
}

/// Attacker lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum AttackerState {
    /// Waiting off-canvas; activates once `waited >= delay`
    Dormant { waited: f32, delay: f32 },
    /// Moving toward its target
    Active,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Attacker {
    pub id: u32,
    pub pos: Vec2,
    pub target: usize,
    /// Pixels per frame
    pub speed: f32,
    /// Percentage of the encryption scale removed on a breach
    pub attack_strength: f32,
    pub state: AttackerState,
}

impl Attacker {
    pub fn is_active(&self) -> bool {
        matches!(self.state, AttackerState::Active)
    }

    /// Put the attacker back to sleep at a new position with a new target
    pub fn recycle(&mut self, pos: Vec2, target: usize, delay: f32) {
        self.pos = pos;
        self.target = target;
        self.state = AttackerState::Dormant { waited: 0.0, delay };
    }
}

/// Particle effect kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParticleKind {
    /// Attacker reaching a server
    Impact,
    /// Shield deflecting an attacker
    Block,
}

/// A particle for visual effects
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub kind: ParticleKind,
    pub life: f32, // 0-1, decreases every frame
    pub size: f32,
}
