//! Injectable randomness
//!
//! Every random draw in the simulation goes through [`RandomSource`]. Any
//! `rand::RngCore` qualifies, so the browser uses the thread RNG while tests
//! pass a seeded `Pcg32`.

use glam::Vec2;
use rand::{Rng, RngCore, SeedableRng};
use rand_pcg::Pcg32;

/// A source of uniform floats in [0, 1)
pub trait RandomSource {
    fn next(&mut self) -> f32;

    /// Uniform in [lo, hi)
    fn range(&mut self, lo: f32, hi: f32) -> f32 {
        lo + (hi - lo) * self.next()
    }

    /// Uniform index in [0, len); `len` must be non-zero
    fn index(&mut self, len: usize) -> usize {
        ((self.next() * len as f32) as usize).min(len - 1)
    }

    /// True with probability `p`
    fn chance(&mut self, p: f32) -> bool {
        self.next() < p
    }

    /// Random angle in [0, 2π)
    fn angle(&mut self) -> f32 {
        self.next() * std::f32::consts::TAU
    }

    /// Unit vector at a random angle
    fn direction(&mut self) -> Vec2 {
        Vec2::from_angle(self.angle())
    }
}

impl<R: RngCore> RandomSource for R {
    fn next(&mut self) -> f32 {
        self.random::<f32>()
    }
}

/// Reproducible generator for tests and headless runs
pub fn seeded(seed: u64) -> Pcg32 {
    Pcg32::seed_from_u64(seed)
}

/// Generator seeded from the system RNG, for runtime use
pub fn system() -> Pcg32 {
    Pcg32::from_rng(&mut rand::rng())
}
