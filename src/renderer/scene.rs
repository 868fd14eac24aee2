//! Frame draw pass
//!
//! Reads the world, never mutates it. Layer order is fixed: background,
//! connections, servers (+ encryption ring, warning), keys, shields, data
//! flows, attackers, particles.

use std::f32::consts::{FRAC_PI_2, TAU};

use glam::Vec2;

use super::glyphs;
use super::palette::{Palette, TextDirection};
use super::surface::{Brush, DrawSurface, RadialGradient};
use crate::consts::{ENCRYPTION_MAX, SECURITY_MAX};
use crate::sim::World;

/// Trail length as a fraction of the route
const TRAIL_SPAN: f32 = 0.08;

/// Render-time switches that do not belong to the world
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SceneOptions {
    pub trails: bool,
    pub direction: TextDirection,
}

impl Default for SceneOptions {
    fn default() -> Self {
        Self {
            trails: true,
            direction: TextDirection::Ltr,
        }
    }
}

/// Paint one frame
pub fn render(world: &World, palette: &Palette, options: &SceneOptions, s: &mut dyn DrawSurface) {
    s.clear();
    if !world.has_area() {
        return;
    }

    let mirrored = options.direction == TextDirection::Rtl;
    s.save();
    if mirrored {
        s.translate(Vec2::new(world.width, 0.0));
        s.scale(Vec2::new(-1.0, 1.0));
    }

    background(world, palette, s);
    connections(world, palette, s);
    servers(world, palette, s);
    keys(world, palette, s);
    shields(world, palette, s);
    flows(world, palette, options.trails, mirrored, s);
    attackers(world, palette, s);
    particles(world, palette, s);

    s.restore();
}

fn background(world: &World, palette: &Palette, s: &mut dyn DrawSurface) {
    let gradient = RadialGradient {
        center: world.center(),
        inner_radius: 0.0,
        outer_radius: world.width.max(world.height) * 0.7,
        stops: vec![(0.0, palette.background_inner), (1.0, palette.background_outer)],
    };
    s.set_fill(&Brush::Radial(gradient));
    s.fill_rect(Vec2::ZERO, Vec2::new(world.width, world.height));
}

fn connections(world: &World, palette: &Palette, s: &mut dyn DrawSurface) {
    for conn in &world.connections {
        let (Some(a), Some(b)) = (world.servers.get(conn.from), world.servers.get(conn.to)) else {
            continue;
        };
        let security = conn.security_level / SECURITY_MAX;

        s.set_line_dash(&[5.0, 5.0]);
        s.set_line_width(1.0);
        s.set_stroke(&palette.connection_tier(conn.tier).into());
        s.begin_path();
        s.move_to(a.pos);
        s.line_to(b.pos);
        s.stroke();

        // Inner highlight scales with link security
        s.set_line_dash(&[]);
        s.set_line_width(0.5 + security * 1.5);
        s.set_stroke(&palette.connection_secure.fade(security).into());
        s.stroke();

        glyphs::dot(s, a.pos.lerp(b.pos, conn.pulse_position), 3.0, palette.pulse);
    }
}

fn servers(world: &World, palette: &Palette, s: &mut dyn DrawSurface) {
    for server in &world.servers {
        glyphs::server(s, server.kind, server.pos, server.size, server.pulse_phase, palette);
        glyphs::progress_ring(
            s,
            server.pos,
            server.size + 6.0,
            server.encryption_level / ENCRYPTION_MAX,
            palette.encryption_band(server.encryption_level),
            palette.ring_track,
        );
        if server.shows_warning() {
            let at = server.pos + Vec2::new(server.size, -server.size);
            glyphs::warning(s, at, 7.0, palette.warning);
        }
    }
}

fn keys(world: &World, palette: &Palette, s: &mut dyn DrawSurface) {
    for key in &world.keys {
        let Some(server) = world.servers.get(key.server) else {
            continue;
        };
        let at = server.pos + Vec2::from_angle(key.angle) * key.orbit_radius;
        // Blade points along the orbit tangent
        glyphs::key(s, at, key.angle + FRAC_PI_2, 7.0, palette.key);
    }
}

fn shields(world: &World, palette: &Palette, s: &mut dyn DrawSurface) {
    for shield in &world.shields {
        let Some(server) = world.servers.get(shield.server) else {
            continue;
        };
        if !server.is_protected {
            continue;
        }
        let radius = server.shield_radius + shield.pulse();

        s.circle(server.pos, radius);
        s.set_fill(&palette.shield_fill.into());
        s.fill();
        s.set_line_dash(&[4.0, 4.0]);
        s.set_line_width(1.0);
        s.set_stroke(&palette.shield_edge.into());
        s.stroke();
        s.set_line_dash(&[]);

        for i in 0..4 {
            let at = server.pos + Vec2::from_angle(i as f32 * TAU / 4.0) * radius;
            glyphs::shield(s, at, 5.0, palette.shield_fill, palette.shield_edge);
        }
    }
}

fn flows(world: &World, palette: &Palette, trails: bool, mirrored: bool, s: &mut dyn DrawSurface) {
    s.set_font("8px monospace");
    for flow in &world.flows {
        let (Some(src), Some(dst)) = (world.servers.get(flow.source), world.servers.get(flow.destination)) else {
            continue;
        };
        let color = palette.flow(flow.is_encrypted);

        if trails {
            let tail = src.pos.lerp(dst.pos, (flow.progress - TRAIL_SPAN).max(0.0));
            s.set_line_width(2.0);
            s.set_stroke(&color.fade(0.4).into());
            s.begin_path();
            s.move_to(tail);
            s.line_to(flow.pos);
            s.stroke();
        }

        s.set_shadow(8.0, color);
        glyphs::dot(s, flow.pos, 4.0, color);
        s.set_shadow(0.0, color);

        if flow.is_encrypted {
            let bits = format!("{:04b}", (flow.cipher_phase * 16.0) as u32 & 0xF);
            s.set_fill(&palette.binary_text.into());
            text(s, &bits, flow.pos + Vec2::new(6.0, -6.0), mirrored);
        } else {
            glyphs::warning(s, flow.pos + Vec2::new(0.0, -10.0), 4.0, palette.warning);
        }
    }
}

fn attackers(world: &World, palette: &Palette, s: &mut dyn DrawSurface) {
    for attacker in world.attackers.iter().filter(|a| a.is_active()) {
        s.set_shadow(10.0, palette.attacker);
        glyphs::skull(s, attacker.pos, 10.0, palette.attacker, palette.attacker_eyes);
        s.set_shadow(0.0, palette.attacker);
    }
}

fn particles(world: &World, palette: &Palette, s: &mut dyn DrawSurface) {
    if world.particles.is_empty() {
        return;
    }
    for particle in &world.particles {
        let life = particle.life.clamp(0.0, 1.0);
        s.set_alpha(life);
        glyphs::dot(s, particle.pos, particle.size * life, palette.particle(particle.kind));
    }
    s.set_alpha(1.0);
}

/// Draw text that stays readable when the scene is mirrored
fn text(s: &mut dyn DrawSurface, content: &str, at: Vec2, mirrored: bool) {
    if mirrored {
        s.save();
        s.translate(at);
        s.scale(Vec2::new(-1.0, 1.0));
        s.fill_text(content, Vec2::ZERO);
        s.restore();
    } else {
        s.fill_text(content, at);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::palette::Theme;
    use crate::renderer::surface::{DrawCommand, RecordingSurface};
    use crate::settings::{Settings, Variant};
    use crate::sim::{Attacker, AttackerState, DataFlow, Particle, ParticleKind, layout::populate, seeded};

    fn world() -> World {
        let mut world = World::new(800.0, 500.0, Variant::Hero);
        populate(&mut world, &Settings::default(), &mut seeded(31));
        world
    }

    fn draw(world: &World, theme: Theme, options: SceneOptions) -> RecordingSurface {
        let mut s = RecordingSurface::new(world.width, world.height);
        render(world, &Palette::for_theme(theme), &options, &mut s);
        s
    }

    #[test]
    fn test_clear_then_background_first() {
        let s = draw(&world(), Theme::Dark, SceneOptions::default());
        assert_eq!(s.commands[0], DrawCommand::Clear);
        let first_fill = s
            .commands
            .iter()
            .position(|c| matches!(c, DrawCommand::SetFill(_)))
            .unwrap();
        assert!(matches!(s.commands[first_fill], DrawCommand::SetFill(Brush::Radial(_))));
    }

    #[test]
    fn test_render_does_not_touch_world() {
        let w = world();
        let before = serde_json::to_string(&w).unwrap();
        draw(&w, Theme::Light, SceneOptions::default());
        assert_eq!(before, serde_json::to_string(&w).unwrap());
    }

    #[test]
    fn test_theme_changes_colors_only() {
        let w = world();
        let dark = draw(&w, Theme::Dark, SceneOptions::default());
        let light = draw(&w, Theme::Light, SceneOptions::default());
        assert_eq!(dark.commands.len(), light.commands.len());
        assert_ne!(dark.solid_colors(), light.solid_colors());
    }

    #[test]
    fn test_dormant_attackers_are_invisible() {
        let mut w = world();
        let baseline = draw(&w, Theme::Dark, SceneOptions::default()).paint_count();
        w.attackers.push(Attacker {
            id: 99,
            pos: Vec2::new(100.0, 100.0),
            target: 0,
            speed: 1.0,
            attack_strength: 10.0,
            state: AttackerState::Dormant { waited: 0.0, delay: 4.0 },
        });
        assert_eq!(draw(&w, Theme::Dark, SceneOptions::default()).paint_count(), baseline);
        w.attackers[0].state = AttackerState::Active;
        assert!(draw(&w, Theme::Dark, SceneOptions::default()).paint_count() > baseline);
    }

    #[test]
    fn test_unprotected_servers_draw_no_shield() {
        let mut w = world();
        let protected = draw(&w, Theme::Dark, SceneOptions::default()).paint_count();
        for server in &mut w.servers {
            server.is_protected = false;
        }
        assert!(draw(&w, Theme::Dark, SceneOptions::default()).paint_count() < protected);
    }

    #[test]
    fn test_flow_decorations() {
        let mut w = world();
        let pos = w.servers[0].pos;
        for (id, is_encrypted) in [(1, true), (2, false)] {
            w.flows.push(DataFlow {
                id,
                source: 0,
                destination: 1,
                progress: 0.5,
                speed: 0.01,
                pos,
                is_encrypted,
                cipher_phase: 0.5,
            });
        }
        let s = draw(&w, Theme::Dark, SceneOptions::default());
        assert_eq!(s.texts(), vec!["1000"]);
    }

    #[test]
    fn test_rtl_mirrors_scene() {
        let s = draw(
            &world(),
            Theme::Dark,
            SceneOptions {
                direction: TextDirection::Rtl,
                ..SceneOptions::default()
            },
        );
        assert!(s.commands.contains(&DrawCommand::Scale(Vec2::new(-1.0, 1.0))));
    }

    #[test]
    fn test_rtl_keeps_text_readable() {
        let mut w = world();
        let pos = w.servers[0].pos;
        w.flows.push(DataFlow {
            id: 1,
            source: 0,
            destination: 1,
            progress: 0.5,
            speed: 0.01,
            pos,
            is_encrypted: true,
            cipher_phase: 0.5,
        });
        let s = draw(
            &w,
            Theme::Dark,
            SceneOptions {
                direction: TextDirection::Rtl,
                ..SceneOptions::default()
            },
        );
        let at = s
            .commands
            .iter()
            .position(|c| matches!(c, DrawCommand::FillText(..)))
            .unwrap();
        assert!(matches!(s.commands[at - 3], DrawCommand::Save));
        assert!(matches!(s.commands[at - 2], DrawCommand::Translate(_)));
        assert_eq!(s.commands[at - 1], DrawCommand::Scale(Vec2::new(-1.0, 1.0)));
        assert!(matches!(s.commands[at + 1], DrawCommand::Restore));

        let ltr = draw(&w, Theme::Dark, SceneOptions::default());
        let mirrors = |s: &RecordingSurface| {
            s.commands
                .iter()
                .filter(|c| **c == DrawCommand::Scale(Vec2::new(-1.0, 1.0)))
                .count()
        };
        assert_eq!(mirrors(&ltr), 0);
        assert_eq!(mirrors(&s), 2);
    }

    #[test]
    fn test_particles_fade_with_alpha() {
        let mut w = world();
        w.particles.push(Particle {
            pos: Vec2::new(50.0, 50.0),
            vel: Vec2::ZERO,
            life: 0.5,
            size: 3.0,
            kind: ParticleKind::Impact,
        });
        let s = draw(&w, Theme::Dark, SceneOptions::default());
        assert!(s.commands.contains(&DrawCommand::SetAlpha(0.5)));
        let last_alpha = s
            .commands
            .iter()
            .rev()
            .find(|c| matches!(c, DrawCommand::SetAlpha(_)));
        assert_eq!(last_alpha, Some(&DrawCommand::SetAlpha(1.0)));
    }

    #[test]
    fn test_server_detail_uses_outline_color() {
        let palette = Palette::for_theme(Theme::Dark);
        let s = draw(&world(), Theme::Dark, SceneOptions::default());
        assert!(s.solid_colors().contains(&palette.server_outline));
    }

    #[test]
    fn test_zero_area_only_clears() {
        let w = World::new(0.0, 0.0, Variant::Hero);
        let s = draw(&w, Theme::Dark, SceneOptions::default());
        assert_eq!(s.commands, vec![DrawCommand::Clear]);
    }
}
