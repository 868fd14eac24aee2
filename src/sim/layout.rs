//! Hub-and-ring layout
//!
//! Places the servers, links them, and seeds one key and one shield per
//! server. Runs once per world; resize rescales instead of re-running it.

use std::f32::consts::{FRAC_PI_2, TAU};

use super::entity::{Connection, ConnectionTier, EncryptionKey, Server, ServerKind, Shield};
use super::rng::RandomSource;
use super::world::World;
use crate::polar_to_cartesian;
use crate::settings::{Settings, Variant};

const HUB_SIZE: f32 = 30.0;
const RING_SIZE: f32 = 20.0;
const OUTER_RING_SIZE: f32 = 16.0;

/// Fill an empty world with servers, connections, keys and shields
///
/// No-op on a zero-area canvas or an already populated world.
pub fn populate(world: &mut World, settings: &Settings, rng: &mut impl RandomSource) {
    if !world.has_area() || world.is_populated() {
        return;
    }

    let center = world.center();
    let span = world.width.min(world.height);
    let n = settings.ring_count.max(1);
    let (hub_kind, ring_kinds): (ServerKind, &[ServerKind]) = match world.variant {
        Variant::Hero => (ServerKind::Cloud, &[ServerKind::Server, ServerKind::Database][..]),
        Variant::Cyber => (ServerKind::Firewall, &[ServerKind::Encryption][..]),
    };

    // Hub
    world
        .servers
        .push(Server::new(center, HUB_SIZE, hub_kind, true, rng.range(80.0, 100.0)));

    // Inner ring, starting at the top
    let ring_radius = span * settings.ring_ratio;
    for i in 0..n {
        let theta = -FRAC_PI_2 + TAU * i as f32 / n as f32;
        let pos = center + polar_to_cartesian(ring_radius, theta);
        let kind = ring_kinds[i % ring_kinds.len()];
        let protected = rng.chance(settings.protected_ratio);
        world
            .servers
            .push(Server::new(pos, RING_SIZE, kind, protected, rng.range(60.0, 100.0)));
    }

    // Outer ring, offset half a slot so links fan out
    if world.variant == Variant::Cyber {
        let outer_radius = span * settings.outer_ring_ratio;
        for i in 0..n {
            let theta = -FRAC_PI_2 + TAU * (i as f32 + 0.5) / n as f32;
            let pos = center + polar_to_cartesian(outer_radius, theta);
            let protected = rng.chance(settings.protected_ratio);
            world.servers.push(Server::new(
                pos,
                OUTER_RING_SIZE,
                ServerKind::Ids,
                protected,
                rng.range(60.0, 100.0),
            ));
        }
    }

    // Primary: hub to every ring server
    for i in 1..=n {
        link(world, 0, i, ConnectionTier::Primary, rng);
    }
    // Secondary: close the ring
    if n >= 2 {
        for i in 0..n {
            link(world, 1 + i, 1 + (i + 1) % n, ConnectionTier::Secondary, rng);
        }
    }
    // Tertiary: inner ring i to outer ring i
    if world.variant == Variant::Cyber {
        for i in 0..n {
            link(world, 1 + i, 1 + n + i, ConnectionTier::Tertiary, rng);
        }
    }

    for (index, server) in world.servers.iter().enumerate() {
        world.keys.push(EncryptionKey {
            server: index,
            angle: rng.angle(),
            orbit_radius: server.size + 12.0,
            rotation_speed: rng.range(0.01, 0.03),
        });
        world.shields.push(Shield {
            server: index,
            phase: rng.next(),
            pulse_rate: rng.range(0.01, 0.02),
            pulse_amount: 3.0,
        });
    }

    log::debug!(
        "Layout: {} servers, {} connections ({:?})",
        world.servers.len(),
        world.connections.len(),
        world.variant
    );
}

/// Add an undirected link unless it already exists
fn link(world: &mut World, a: usize, b: usize, tier: ConnectionTier, rng: &mut impl RandomSource) {
    if a == b || world.connections.iter().any(|c| c.links(a, b)) {
        return;
    }
    world
        .connections
        .push(Connection::new(a, b, tier, rng.range(40.0, 100.0), rng.next()));
    world.servers[a].connections.push(b);
    world.servers[b].connections.push(a);
}
