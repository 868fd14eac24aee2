//! Per-frame simulation step
//!
//! Advances every entity's own time-local state. Cosmetic motion uses fixed
//! per-frame increments; dormancy uses real seconds. Nothing here decides
//! encounters, that is `resolve`'s job.

use crate::consts::*;
use crate::wrap_unit;

use super::entity::AttackerState;
use super::world::World;

/// Advance the world by one frame of `dt` seconds
pub fn advance(world: &mut World, dt: f32) {
    world.frames += 1;
    world.elapsed += dt as f64;

    // Transient flags are recomputed every frame by the resolver
    for server in &mut world.servers {
        server.under_attack = false;
        server.alert = (server.alert - dt).max(0.0);
        server.pulse_phase = wrap_unit(server.pulse_phase + SERVER_PULSE_STEP);
    }

    for conn in &mut world.connections {
        conn.pulse_position += CONNECTION_PULSE_STEP * conn.pulse_direction;
        if conn.pulse_position >= 1.0 {
            conn.pulse_position = 1.0;
            conn.pulse_direction = -1.0;
        } else if conn.pulse_position <= 0.0 {
            conn.pulse_position = 0.0;
            conn.pulse_direction = 1.0;
        }
    }

    for key in &mut world.keys {
        key.angle = (key.angle + key.rotation_speed).rem_euclid(std::f32::consts::TAU);
    }

    for shield in &mut world.shields {
        shield.phase = wrap_unit(shield.phase + shield.pulse_rate);
    }

    let servers = &world.servers;
    for flow in &mut world.flows {
        flow.progress += flow.speed;
        flow.cipher_phase = wrap_unit(flow.cipher_phase + CIPHER_PHASE_STEP);
        if let (Some(src), Some(dst)) = (servers.get(flow.source), servers.get(flow.destination)) {
            flow.pos = src.pos.lerp(dst.pos, flow.progress.min(1.0));
        }
    }
    world.flows.retain(|f| f.progress < 1.0);

    for particle in &mut world.particles {
        particle.pos += particle.vel;
        particle.life -= PARTICLE_DECAY;
    }
    world.particles.retain(|p| p.life > 0.0);

    for attacker in &mut world.attackers {
        match attacker.state {
            AttackerState::Dormant { waited, delay } => {
                let waited = waited + dt;
                attacker.state = if waited >= delay {
                    AttackerState::Active
                } else {
                    AttackerState::Dormant { waited, delay }
                };
            }
            AttackerState::Active => {
                let Some(target) = servers.get(attacker.target) else {
                    continue;
                };
                let to_target = target.pos - attacker.pos;
                // Within range: leave it for the resolver this frame
                if to_target.length() > target.shield_radius + ENGAGE_MARGIN {
                    attacker.pos += to_target.normalize_or_zero() * attacker.speed;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::{Settings, Variant};
    use crate::sim::entity::{Attacker, Connection, ConnectionTier, DataFlow, Particle, ParticleKind};
    use crate::sim::layout::populate;
    use crate::sim::rng::seeded;
    use glam::Vec2;
    use proptest::prelude::*;

    const DT: f32 = 1.0 / 60.0;

    fn populated() -> World {
        let mut world = World::new(800.0, 500.0, Variant::Hero);
        populate(&mut world, &Settings::default(), &mut seeded(21));
        world
    }

    fn flow(world: &mut World, speed: f32) -> u32 {
        let id = world.next_entity_id();
        let pos = world.servers[0].pos;
        world.flows.push(DataFlow {
            id,
            source: 0,
            destination: 1,
            progress: 0.0,
            speed,
            pos,
            is_encrypted: true,
            cipher_phase: 0.0,
        });
        id
    }

    #[test]
    fn test_flow_removed_within_hundred_steps() {
        let mut world = populated();
        let id = flow(&mut world, 0.01);
        let mut last = 0.0;
        for _ in 0..100 {
            advance(&mut world, DT);
            if let Some(f) = world.flows.iter().find(|f| f.id == id) {
                assert!(f.progress > last);
                assert!(f.progress < 1.0);
                last = f.progress;
            }
        }
        assert!(world.flows.iter().all(|f| f.id != id));
    }

    #[test]
    fn test_flow_position_interpolates() {
        let mut world = populated();
        flow(&mut world, 0.5);
        advance(&mut world, DT);
        let expected = world.servers[0].pos.lerp(world.servers[1].pos, 0.5);
        assert!(world.flows[0].pos.distance(expected) < 1e-3);
    }

    #[test]
    fn test_particle_life_decays_to_removal() {
        let mut world = populated();
        world.particles.push(Particle {
            pos: Vec2::ZERO,
            vel: Vec2::new(1.0, 0.0),
            kind: ParticleKind::Impact,
            life: 1.0,
            size: 2.0,
        });
        let mut last = 1.0;
        let mut steps = 0;
        while !world.particles.is_empty() {
            advance(&mut world, DT);
            steps += 1;
            for p in &world.particles {
                assert!(p.life < last && p.life > 0.0);
                last = p.life;
            }
        }
        let nominal = (1.0 / PARTICLE_DECAY).round() as usize;
        assert!(steps == nominal || steps == nominal + 1, "took {steps} steps");
    }

    #[test]
    fn test_dormant_attacker_activates_after_delay() {
        let mut world = populated();
        let id = world.next_entity_id();
        world.attackers.push(Attacker {
            id,
            pos: Vec2::new(-100.0, -100.0),
            target: 0,
            speed: 2.0,
            attack_strength: 20.0,
            state: AttackerState::Dormant { waited: 0.0, delay: 0.5 },
        });
        for _ in 0..29 {
            advance(&mut world, DT);
            assert!(!world.attackers[0].is_active());
            assert_eq!(world.attackers[0].pos, Vec2::new(-100.0, -100.0));
        }
        for _ in 0..2 {
            advance(&mut world, DT);
        }
        assert!(world.attackers[0].is_active());
    }

    #[test]
    fn test_active_attacker_closes_distance() {
        let mut world = populated();
        let start = Vec2::new(-100.0, -100.0);
        world.attackers.push(Attacker {
            id: 1,
            pos: start,
            target: 0,
            speed: 2.0,
            attack_strength: 20.0,
            state: AttackerState::Active,
        });
        let target = world.servers[0].pos;
        advance(&mut world, DT);
        let moved = world.attackers[0].pos;
        assert!((start.distance(moved) - 2.0).abs() < 1e-3);
        assert!(moved.distance(target) < start.distance(target));
    }

    #[test]
    fn test_attacker_in_range_does_not_move() {
        let mut world = populated();
        let target = world.servers[0].pos;
        let pos = target + Vec2::new(world.servers[0].shield_radius, 0.0);
        world.attackers.push(Attacker {
            id: 1,
            pos,
            target: 0,
            speed: 2.0,
            attack_strength: 20.0,
            state: AttackerState::Active,
        });
        advance(&mut world, DT);
        assert_eq!(world.attackers[0].pos, pos);
    }

    #[test]
    fn test_under_attack_cleared_each_frame() {
        let mut world = populated();
        world.servers[2].under_attack = true;
        world.servers[2].alert = DT * 1.5;
        advance(&mut world, DT);
        assert!(!world.servers[2].under_attack);
        assert!(world.servers[2].shows_warning());
        advance(&mut world, DT);
        assert!(!world.servers[2].shows_warning());
    }

    proptest! {
        #[test]
        fn prop_connection_pulse_stays_in_unit_range(
            start in 0.0f32..=1.0,
            downward in any::<bool>(),
            ticks in 1usize..2000,
        ) {
            let mut world = World::new(100.0, 100.0, Variant::Hero);
            let mut conn = Connection::new(0, 1, ConnectionTier::Primary, 50.0, start);
            conn.pulse_direction = if downward { -1.0 } else { 1.0 };
            world.connections.push(conn);
            for _ in 0..ticks {
                advance(&mut world, DT);
                let c = &world.connections[0];
                prop_assert!((0.0..=1.0).contains(&c.pulse_position));
                prop_assert!(c.pulse_direction == 1.0 || c.pulse_direction == -1.0);
            }
        }

        #[test]
        fn prop_live_flows_never_complete(speed in 0.001f32..0.5, ticks in 1usize..400) {
            let mut world = populated();
            flow(&mut world, speed);
            for _ in 0..ticks {
                advance(&mut world, DT);
                prop_assert!(world.flows.iter().all(|f| (0.0..1.0).contains(&f.progress)));
            }
        }

        #[test]
        fn prop_shield_phase_wraps(ticks in 1usize..1000) {
            let mut world = populated();
            for _ in 0..ticks {
                advance(&mut world, DT);
            }
            for shield in &world.shields {
                prop_assert!((0.0..1.0).contains(&shield.phase));
                prop_assert!(shield.pulse().abs() <= shield.pulse_amount + 1e-4);
            }
        }
    }
}
