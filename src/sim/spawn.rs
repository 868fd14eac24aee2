//! Spawn policies
//!
//! Data flows and attacker waves are time gated; particle bursts are fired
//! synchronously by the resolver.

use std::f32::consts::FRAC_PI_3;

use glam::Vec2;

use super::entity::{Attacker, AttackerState, DataFlow, Particle, ParticleKind};
use super::rng::RandomSource;
use super::world::World;
use crate::settings::Settings;

/// Half-width of the reflection cone for shield-block bursts
const BLOCK_CONE: f32 = FRAC_PI_3;

/// What the timers produced this frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SpawnReport {
    pub flows: usize,
    pub attackers: usize,
}

/// Advance both spawn accumulators by `dt` and fire any that elapsed
pub fn run_timers(world: &mut World, settings: &Settings, rng: &mut impl RandomSource, dt: f32) -> SpawnReport {
    let mut report = SpawnReport::default();
    if !world.is_populated() {
        return report;
    }

    world.timers.flow += dt;
    while world.timers.flow >= settings.flow_interval {
        world.timers.flow -= settings.flow_interval;
        if spawn_data_flow(world, settings, rng).is_some() {
            report.flows += 1;
        }
    }

    world.timers.attacker += dt;
    while world.timers.attacker >= settings.attacker_interval {
        world.timers.attacker -= settings.attacker_interval;
        report.attackers += spawn_attacker_wave(world, settings, rng);
    }

    if report.attackers > 0 {
        log::debug!(
            "Attacker wave: +{} ({} live)",
            report.attackers,
            world.attackers.len()
        );
    }
    report
}

/// Create one packet between a random server and one of its neighbours
///
/// Falls back to any other server when the source has no links. Returns
/// `None` when there are fewer than two servers.
pub fn spawn_data_flow(world: &mut World, settings: &Settings, rng: &mut impl RandomSource) -> Option<u32> {
    let count = world.servers.len();
    if count < 2 {
        return None;
    }
    let source = rng.index(count);
    let links = &world.servers[source].connections;
    let destination = if links.is_empty() {
        let other = rng.index(count - 1);
        if other >= source { other + 1 } else { other }
    } else {
        links[rng.index(links.len())]
    };

    let id = world.next_entity_id();
    let pos = world.servers[source].pos;
    world.flows.push(DataFlow {
        id,
        source,
        destination,
        progress: 0.0,
        speed: rng.range(settings.flow_speed_min, settings.flow_speed_max),
        pos,
        is_encrypted: rng.chance(settings.encrypted_ratio),
        cipher_phase: rng.next(),
    });
    Some(id)
}

/// Spawn a batch of dormant attackers, never exceeding the live cap
///
/// Returns how many were created.
pub fn spawn_attacker_wave(world: &mut World, settings: &Settings, rng: &mut impl RandomSource) -> usize {
    if world.servers.is_empty() {
        return 0;
    }
    let room = settings.attacker_cap.saturating_sub(world.attackers.len());
    let count = settings.attacker_batch.min(room);
    for _ in 0..count {
        let attacker = new_attacker(world, settings, rng);
        world.attackers.push(attacker);
    }
    count
}

fn new_attacker(world: &mut World, settings: &Settings, rng: &mut impl RandomSource) -> Attacker {
    let id = world.next_entity_id();
    Attacker {
        id,
        pos: world.offscreen_point(rng),
        target: rng.index(world.servers.len()),
        speed: rng.range(settings.attacker_speed_min, settings.attacker_speed_max),
        attack_strength: rng.range(settings.attack_strength_min, settings.attack_strength_max),
        state: AttackerState::Dormant {
            waited: 0.0,
            delay: activation_delay(settings, rng),
        },
    }
}

/// Fresh dormancy period in seconds
pub fn activation_delay(settings: &Settings, rng: &mut impl RandomSource) -> f32 {
    rng.range(settings.activation_delay_min, settings.activation_delay_max)
}

/// Emit a particle burst at `at`
///
/// `Impact` bursts are fully radial. `Block` bursts spray inside a cone
/// pointing from `shield_center` through `at`. Truncated at the particle cap.
pub fn spawn_burst(
    world: &mut World,
    settings: &Settings,
    rng: &mut impl RandomSource,
    at: Vec2,
    kind: ParticleKind,
    shield_center: Vec2,
) -> usize {
    let room = settings.max_particles().saturating_sub(world.particles.len());
    let count = settings.effective_burst_size().min(room);

    let away = (at - shield_center).try_normalize();
    for _ in 0..count {
        let dir = match (kind, away) {
            (ParticleKind::Block, Some(away)) => {
                let spread = rng.range(-BLOCK_CONE, BLOCK_CONE);
                Vec2::from_angle(spread).rotate(away)
            }
            _ => rng.direction(),
        };
        world.particles.push(Particle {
            pos: at,
            vel: dir * rng.range(1.0, 3.0),
            kind,
            life: 1.0,
            size: rng.range(1.5, 3.5),
        });
    }
    count
}
