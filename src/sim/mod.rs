//! Simulation module
//!
//! All world logic lives here. This module must stay free of rendering and
//! platform dependencies:
//! - Randomness only through `RandomSource`
//! - Colors never stored on entities
//! - Stable iteration order (collections are append-only vectors)

pub mod entity;
pub mod layout;
pub mod resolve;
pub mod rng;
pub mod spawn;
pub mod step;
pub mod world;

pub use entity::{
    Attacker, AttackerState, Connection, ConnectionTier, DataFlow, EncryptionKey, Particle, ParticleKind,
    Server, ServerKind, Shield,
};
pub use layout::populate;
pub use resolve::{ResolveReport, resolve};
pub use rng::{RandomSource, seeded, system};
pub use spawn::{SpawnReport, run_timers, spawn_attacker_wave, spawn_burst, spawn_data_flow};
pub use step::advance;
pub use world::{SpawnTimers, World};
