//! The World aggregate
//!
//! One engine owns one world. No other component reads or writes it.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::entity::{Attacker, Connection, DataFlow, EncryptionKey, Particle, Server, Shield};
use super::rng::RandomSource;
use crate::consts::OFFSCREEN_MARGIN;
use crate::settings::Variant;

/// Spawn accumulators, in seconds
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SpawnTimers {
    pub flow: f32,
    pub attacker: f32,
}

/// All live entities plus canvas size and timing state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct World {
    pub width: f32,
    pub height: f32,
    pub variant: Variant,
    pub servers: Vec<Server>,
    pub connections: Vec<Connection>,
    pub keys: Vec<EncryptionKey>,
    pub shields: Vec<Shield>,
    pub flows: Vec<DataFlow>,
    pub attackers: Vec<Attacker>,
    pub particles: Vec<Particle>,
    pub timers: SpawnTimers,
    /// Seconds simulated so far
    pub elapsed: f64,
    /// Frames simulated so far
    pub frames: u64,
    next_id: u32,
}

impl World {
    /// An empty world; `layout::populate` fills it
    pub fn new(width: f32, height: f32, variant: Variant) -> Self {
        Self {
            width,
            height,
            variant,
            servers: Vec::new(),
            connections: Vec::new(),
            keys: Vec::new(),
            shields: Vec::new(),
            flows: Vec::new(),
            attackers: Vec::new(),
            particles: Vec::new(),
            timers: SpawnTimers::default(),
            elapsed: 0.0,
            frames: 0,
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }

    pub fn has_area(&self) -> bool {
        self.width > 0.0 && self.height > 0.0
    }

    pub fn is_populated(&self) -> bool {
        !self.servers.is_empty()
    }

    /// True if `p` lies inside [0, width] x [0, height]
    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= 0.0 && p.x <= self.width && p.y >= 0.0 && p.y <= self.height
    }

    /// A random point beyond the visible canvas
    ///
    /// Distance from center exceeds the half-diagonal, so the point is outside
    /// the canvas whatever the angle.
    pub fn offscreen_point(&self, rng: &mut impl RandomSource) -> Vec2 {
        let half_diag = self.center().length();
        let radius = half_diag + OFFSCREEN_MARGIN + rng.range(0.0, OFFSCREEN_MARGIN);
        self.center() + rng.direction() * radius
    }

    /// Scale every position by the new/old size ratio
    ///
    /// Radii and sizes keep their pixel values; only placement moves.
    pub fn rescale(&mut self, width: f32, height: f32) {
        if !self.has_area() {
            self.width = width;
            self.height = height;
            return;
        }
        let ratio = Vec2::new(width / self.width, height / self.height);
        for server in &mut self.servers {
            server.pos *= ratio;
        }
        for flow in &mut self.flows {
            flow.pos *= ratio;
        }
        for attacker in &mut self.attackers {
            attacker.pos *= ratio;
        }
        for particle in &mut self.particles {
            particle.pos *= ratio;
        }
        self.width = width;
        self.height = height;
    }
}
