//! NetGuard Viz - animated network-security backdrop
//!
//! Core modules:
//! - `sim`: World model, layout, spawning, per-frame step and attack resolution
//! - `renderer`: Palette-driven 2D draw pass over an abstract drawing surface
//! - `engine`: Frame scheduler and lifecycle (host agnostic)
//! - `platform`: Browser host (canvas, requestAnimationFrame, resize listener)
//! - `settings`: Data-driven tuning, persisted as JSON

pub mod engine;
pub mod error;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use engine::{Engine, Lifecycle};
pub use error::{EngineError, Result};
pub use renderer::{DrawSurface, RecordingSurface, TextDirection, Theme};
pub use settings::{QualityPreset, Settings, Variant};

use glam::Vec2;

/// Engine constants that are not worth exposing as settings
pub mod consts {
    /// Delta time used for the very first frame (no previous timestamp)
    pub const FIRST_FRAME_DT: f32 = 1.0 / 60.0;
    /// Upper bound on a single frame's delta (tab switches, debugger pauses)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Encryption level scale
    pub const ENCRYPTION_MAX: f32 = 100.0;
    /// Connection security scale
    pub const SECURITY_MAX: f32 = 100.0;

    /// Connection pulse advance per frame
    pub const CONNECTION_PULSE_STEP: f32 = 0.005;
    /// Server pulse phase advance per frame
    pub const SERVER_PULSE_STEP: f32 = 0.02;
    /// Cosmetic cipher animation advance per frame
    pub const CIPHER_PHASE_STEP: f32 = 0.1;
    /// Particle life lost per frame
    pub const PARTICLE_DECAY: f32 = 0.02;
    /// Extra distance beyond the shield radius at which an attacker engages
    pub const ENGAGE_MARGIN: f32 = 10.0;
    /// Extra distance beyond the canvas half-diagonal for off-canvas spawns
    pub const OFFSCREEN_MARGIN: f32 = 50.0;
}

/// Convert polar (r, theta) to cartesian (x, y)
#[inline]
pub fn polar_to_cartesian(r: f32, theta: f32) -> Vec2 {
    Vec2::new(r * theta.cos(), r * theta.sin())
}

/// Wrap a phase into [0, 1)
#[inline]
pub fn wrap_unit(phase: f32) -> f32 {
    phase.rem_euclid(1.0)
}
