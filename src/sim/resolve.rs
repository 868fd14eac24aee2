//! Attacker encounter resolution
//!
//! Runs after `step::advance`. An active attacker inside its target's shield
//! range is resolved exactly once per frame: blocked attackers are recycled
//! off-canvas, breaching attackers damage encryption and are removed.

use super::entity::ParticleKind;
use super::rng::RandomSource;
use super::spawn::{activation_delay, spawn_burst};
use super::world::World;
use crate::consts::{ENCRYPTION_MAX, ENGAGE_MARGIN};
use crate::settings::Settings;

/// Outcome counts for one resolver pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResolveReport {
    pub blocked: usize,
    pub breached: usize,
}

/// Resolve every active attacker that reached its target
pub fn resolve(world: &mut World, settings: &Settings, rng: &mut impl RandomSource) -> ResolveReport {
    let mut report = ResolveReport::default();
    if world.servers.is_empty() {
        return report;
    }

    let mut breached: Vec<u32> = Vec::new();
    for i in 0..world.attackers.len() {
        let attacker = &world.attackers[i];
        if !attacker.is_active() {
            continue;
        }
        let (id, at, target, strength) = (attacker.id, attacker.pos, attacker.target, attacker.attack_strength);
        let Some(server) = world.servers.get_mut(target) else {
            continue;
        };
        if at.distance(server.pos) > server.shield_radius + ENGAGE_MARGIN {
            continue;
        }

        server.under_attack = true;
        server.alert = settings.alert_hold;
        let center = server.pos;

        if server.is_protected {
            spawn_burst(world, settings, rng, at, ParticleKind::Impact, center);
            spawn_burst(world, settings, rng, at, ParticleKind::Block, center);
            let pos = world.offscreen_point(rng);
            let new_target = rng.index(world.servers.len());
            let delay = activation_delay(settings, rng);
            world.attackers[i].recycle(pos, new_target, delay);
            report.blocked += 1;
        } else {
            let damage = strength / 100.0 * ENCRYPTION_MAX;
            server.encryption_level = (server.encryption_level - damage).clamp(0.0, ENCRYPTION_MAX);
            log::debug!(
                "Server {} breached by attacker {}: encryption {:.1}",
                target,
                id,
                server.encryption_level
            );
            spawn_burst(world, settings, rng, at, ParticleKind::Impact, center);
            breached.push(id);
            report.breached += 1;
        }
    }

    if !breached.is_empty() {
        world.attackers.retain(|a| !breached.contains(&a.id));
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Variant;
    use crate::sim::entity::{Attacker, AttackerState};
    use crate::sim::layout::populate;
    use crate::sim::rng::seeded;
    use glam::Vec2;

    fn setup(protected: bool) -> (World, Settings) {
        let settings = Settings::default();
        let mut world = World::new(800.0, 500.0, Variant::Hero);
        populate(&mut world, &settings, &mut seeded(13));
        world.servers[1].is_protected = protected;
        let id = world.next_entity_id();
        let pos = world.servers[1].pos;
        world.attackers.push(Attacker {
            id,
            pos,
            target: 1,
            speed: 1.5,
            attack_strength: 30.0,
            state: AttackerState::Active,
        });
        (world, settings)
    }

    #[test]
    fn test_blocked_attacker_is_recycled() {
        let (mut world, settings) = setup(true);
        let before = world.attackers.len();
        let report = resolve(&mut world, &settings, &mut seeded(1));

        assert_eq!(report, ResolveReport { blocked: 1, breached: 0 });
        assert_eq!(world.attackers.len(), before);
        let attacker = &world.attackers[0];
        assert!(!attacker.is_active());
        assert!(matches!(attacker.state, AttackerState::Dormant { waited, .. } if waited == 0.0));
        assert!(!world.contains(attacker.pos));
        assert!(attacker.target < world.servers.len());
        assert!(world.servers[1].under_attack);
        assert!(world.particles.iter().any(|p| p.kind == ParticleKind::Block));
        assert!(world.particles.iter().any(|p| p.kind == ParticleKind::Impact));
    }

    #[test]
    fn test_breach_floors_encryption_and_removes() {
        let (mut world, settings) = setup(false);
        world.servers[1].encryption_level = 10.0;
        let report = resolve(&mut world, &settings, &mut seeded(1));

        assert_eq!(report.breached, 1);
        assert!(world.attackers.is_empty());
        assert_eq!(world.servers[1].encryption_level, 0.0);
        assert!(world.servers[1].shows_warning());
        assert!(world.particles.iter().all(|p| p.kind == ParticleKind::Impact));
    }

    #[test]
    fn test_breach_subtracts_strength() {
        let (mut world, settings) = setup(false);
        world.servers[1].encryption_level = 80.0;
        resolve(&mut world, &settings, &mut seeded(1));
        assert!((world.servers[1].encryption_level - 50.0).abs() < 1e-4);
    }

    #[test]
    fn test_breach_keeps_encryption_in_range() {
        let (mut world, settings) = setup(false);
        world.servers[1].encryption_level = 90.0;
        world.attackers[0].attack_strength = -45.0;
        resolve(&mut world, &settings, &mut seeded(1));
        let level = world.servers[1].encryption_level;
        assert!((0.0..=ENCRYPTION_MAX).contains(&level), "encryption after breach = {level}");
    }

    #[test]
    fn test_out_of_range_or_dormant_is_ignored() {
        let (mut world, settings) = setup(false);
        world.attackers[0].pos = Vec2::new(-500.0, -500.0);
        assert_eq!(resolve(&mut world, &settings, &mut seeded(1)), ResolveReport::default());

        world.attackers[0].pos = world.servers[1].pos;
        world.attackers[0].state = AttackerState::Dormant { waited: 0.0, delay: 5.0 };
        assert_eq!(resolve(&mut world, &settings, &mut seeded(1)), ResolveReport::default());
        assert_eq!(world.attackers.len(), 1);
        assert!(!world.servers[1].under_attack);
    }

    #[test]
    fn test_only_breaching_attackers_removed() {
        let (mut world, settings) = setup(false);
        world.servers[0].is_protected = true;
        let id = world.next_entity_id();
        let pos = world.servers[0].pos;
        world.attackers.push(Attacker {
            id,
            pos,
            target: 0,
            speed: 1.0,
            attack_strength: 10.0,
            state: AttackerState::Active,
        });
        let report = resolve(&mut world, &settings, &mut seeded(2));
        assert_eq!(report, ResolveReport { blocked: 1, breached: 1 });
        assert_eq!(world.attackers.len(), 1);
        assert_eq!(world.attackers[0].id, id);
    }
}
