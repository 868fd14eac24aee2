//! Glyph drawing for 2D primitives
//!
//! Each function paints one glyph centered on `at`. Callers own save/restore.

use std::f32::consts::{FRAC_PI_2, PI, TAU};

use glam::Vec2;

use super::palette::Palette;
use super::surface::{Brush, Color, DrawSurface};
use crate::sim::ServerKind;

/// Server body, dispatched by kind
pub fn server(s: &mut dyn DrawSurface, kind: ServerKind, at: Vec2, size: f32, pulse: f32, palette: &Palette) {
    let accent = palette.server_kind(kind);
    // Soft glow that breathes with the pulse phase
    let glow = 6.0 + 4.0 * (pulse * TAU).sin();
    s.set_shadow(glow.max(0.0), accent.fade(0.6));
    match kind {
        ServerKind::Server => rack(s, at, size, accent, palette),
        ServerKind::Database => cylinder(s, at, size, accent, palette),
        ServerKind::Cloud => cloud(s, at, size, accent, palette),
        ServerKind::Firewall => shield(s, at, size, palette.server_body, accent),
        ServerKind::Encryption => lock(s, at, size, accent, palette),
        ServerKind::Ids => hexagon(s, at, size, accent, palette),
    }
    s.set_shadow(0.0, accent);
}

/// Rack cabinet with three drive bays and status LEDs
fn rack(s: &mut dyn DrawSurface, at: Vec2, size: f32, accent: Color, palette: &Palette) {
    let half = Vec2::new(size * 0.6, size * 0.8);
    rounded_rect(s, at - half, half * 2.0, size * 0.15);
    s.set_fill(&palette.server_body.into());
    s.fill();
    s.set_stroke(&accent.into());
    s.set_line_width(1.5);
    s.stroke();

    let bay_h = half.y * 2.0 / 3.0;
    s.set_stroke(&palette.server_outline.into());
    s.set_line_width(1.0);
    for i in 0..3 {
        let top = at.y - half.y + bay_h * i as f32;
        s.begin_path();
        s.move_to(Vec2::new(at.x - half.x * 0.7, top + bay_h * 0.5));
        s.line_to(Vec2::new(at.x + half.x * 0.3, top + bay_h * 0.5));
        s.stroke();
        s.circle(Vec2::new(at.x + half.x * 0.6, top + bay_h * 0.5), size * 0.06);
        s.set_fill(&palette.encryption_high.into());
        s.fill();
    }
}

/// Three stacked disks
fn cylinder(s: &mut dyn DrawSurface, at: Vec2, size: f32, accent: Color, palette: &Palette) {
    let rx = size * 0.65;
    let ry = size * 0.22;
    let height = size * 1.4;
    let top = at.y - height / 2.0;

    s.begin_path();
    s.move_to(Vec2::new(at.x - rx, top));
    s.line_to(Vec2::new(at.x - rx, top + height));
    ellipse_half(s, Vec2::new(at.x, top + height), rx, ry, false);
    s.line_to(Vec2::new(at.x + rx, top));
    s.close_path();
    s.set_fill(&palette.server_body.into());
    s.fill();
    s.set_stroke(&accent.into());
    s.set_line_width(1.5);
    s.stroke();

    s.set_stroke(&palette.server_outline.into());
    s.set_line_width(1.0);
    for i in 0..3 {
        let y = top + height * i as f32 / 3.0;
        s.begin_path();
        s.move_to(Vec2::new(at.x - rx, y));
        ellipse_half(s, Vec2::new(at.x, y), rx, ry, i == 0);
        s.stroke();
    }
}

/// Cloud blob built from three bumps
fn cloud(s: &mut dyn DrawSurface, at: Vec2, size: f32, accent: Color, palette: &Palette) {
    let base = at.y + size * 0.4;
    s.begin_path();
    s.move_to(Vec2::new(at.x - size, base));
    s.bezier_to(
        Vec2::new(at.x - size * 1.3, base - size * 0.6),
        Vec2::new(at.x - size * 0.6, at.y - size * 0.8),
        Vec2::new(at.x - size * 0.2, at.y - size * 0.5),
    );
    s.bezier_to(
        Vec2::new(at.x, at.y - size * 1.1),
        Vec2::new(at.x + size * 0.8, at.y - size * 0.9),
        Vec2::new(at.x + size * 0.6, at.y - size * 0.2),
    );
    s.bezier_to(
        Vec2::new(at.x + size * 1.3, at.y - size * 0.2),
        Vec2::new(at.x + size * 1.3, base),
        Vec2::new(at.x + size, base),
    );
    s.close_path();
    s.set_fill(&palette.server_body.into());
    s.fill();
    s.set_stroke(&accent.into());
    s.set_line_width(1.5);
    s.stroke();
}

/// Heater shield outline (also used for the four cardinal shield marks)
pub fn shield(s: &mut dyn DrawSurface, at: Vec2, size: f32, fill: Color, edge: Color) {
    let w = size * 0.7;
    let h = size * 0.9;
    s.begin_path();
    s.move_to(Vec2::new(at.x, at.y - h));
    s.quadratic_to(Vec2::new(at.x + w * 0.5, at.y - h * 0.7), Vec2::new(at.x + w, at.y - h * 0.7));
    s.quadratic_to(Vec2::new(at.x + w, at.y + h * 0.4), Vec2::new(at.x, at.y + h));
    s.quadratic_to(Vec2::new(at.x - w, at.y + h * 0.4), Vec2::new(at.x - w, at.y - h * 0.7));
    s.quadratic_to(Vec2::new(at.x - w * 0.5, at.y - h * 0.7), Vec2::new(at.x, at.y - h));
    s.close_path();
    s.set_fill(&fill.into());
    s.fill();
    s.set_stroke(&edge.into());
    s.set_line_width(1.5);
    s.stroke();
}

/// Padlock: shackle arc over a body
fn lock(s: &mut dyn DrawSurface, at: Vec2, size: f32, accent: Color, palette: &Palette) {
    let body = Vec2::new(size * 1.2, size * 0.9);
    let origin = Vec2::new(at.x - body.x / 2.0, at.y - body.y * 0.2);

    s.begin_path();
    s.arc(Vec2::new(at.x, origin.y), size * 0.4, PI, TAU);
    s.set_stroke(&accent.into());
    s.set_line_width(size * 0.15);
    s.stroke();

    rounded_rect(s, origin, body, size * 0.12);
    s.set_fill(&palette.server_body.into());
    s.fill();
    s.set_line_width(1.5);
    s.stroke();

    s.circle(Vec2::new(at.x, origin.y + body.y * 0.45), size * 0.12);
    s.set_fill(&accent.into());
    s.fill();
}

/// Flat-topped hexagon with an inner eye dot
fn hexagon(s: &mut dyn DrawSurface, at: Vec2, size: f32, accent: Color, palette: &Palette) {
    s.begin_path();
    for i in 0..6 {
        let p = at + Vec2::from_angle(TAU * i as f32 / 6.0) * size;
        if i == 0 { s.move_to(p) } else { s.line_to(p) }
    }
    s.close_path();
    s.set_fill(&palette.server_body.into());
    s.fill();
    s.set_stroke(&accent.into());
    s.set_line_width(1.5);
    s.stroke();

    s.circle(at, size * 0.3);
    s.set_fill(&accent.fade(0.8).into());
    s.fill();
}

/// Small key: ring bow and a toothed blade pointing along `angle`
pub fn key(s: &mut dyn DrawSurface, at: Vec2, angle: f32, size: f32, color: Color) {
    let dir = Vec2::from_angle(angle);
    let perp = dir.perp();
    s.set_stroke(&color.into());
    s.set_line_width(1.5);

    s.circle(at, size * 0.35);
    s.stroke();

    let blade_start = at + dir * size * 0.35;
    let blade_end = at + dir * size * 1.2;
    s.begin_path();
    s.move_to(blade_start);
    s.line_to(blade_end);
    for t in [0.75, 1.0] {
        let base = at + dir * size * t;
        s.move_to(base);
        s.line_to(base + perp * size * 0.25);
    }
    s.stroke();
}

/// Warning triangle with an exclamation mark
pub fn warning(s: &mut dyn DrawSurface, at: Vec2, size: f32, color: Color) {
    s.begin_path();
    s.move_to(Vec2::new(at.x, at.y - size));
    s.line_to(Vec2::new(at.x + size, at.y + size * 0.8));
    s.line_to(Vec2::new(at.x - size, at.y + size * 0.8));
    s.close_path();
    s.set_fill(&color.into());
    s.fill();

    s.set_fill(&Color::rgb(255, 255, 255).into());
    s.fill_rect(Vec2::new(at.x - size * 0.08, at.y - size * 0.45), Vec2::new(size * 0.16, size * 0.7));
    s.fill_rect(Vec2::new(at.x - size * 0.08, at.y + size * 0.38), Vec2::new(size * 0.16, size * 0.16));
}

/// Skull: cranium, jaw, two eye sockets
pub fn skull(s: &mut dyn DrawSurface, at: Vec2, size: f32, color: Color, eyes: Color) {
    s.circle(Vec2::new(at.x, at.y - size * 0.15), size * 0.7);
    s.set_fill(&color.into());
    s.fill();
    s.fill_rect(Vec2::new(at.x - size * 0.4, at.y + size * 0.3), Vec2::new(size * 0.8, size * 0.45));

    s.set_fill(&eyes.into());
    for side in [-1.0, 1.0] {
        s.circle(Vec2::new(at.x + side * size * 0.28, at.y - size * 0.15), size * 0.17);
        s.fill();
    }
    s.fill_rect(Vec2::new(at.x - size * 0.05, at.y + size * 0.35), Vec2::new(size * 0.1, size * 0.3));
}

/// Fading dot
pub fn dot(s: &mut dyn DrawSurface, at: Vec2, radius: f32, color: Color) {
    s.circle(at, radius);
    s.set_fill(&Brush::Solid(color));
    s.fill();
}

/// Ring arc from 12 o'clock covering `fraction` of the circle
pub fn progress_ring(s: &mut dyn DrawSurface, at: Vec2, radius: f32, fraction: f32, color: Color, track: Color) {
    s.set_line_width(3.0);
    s.circle(at, radius);
    s.set_stroke(&track.into());
    s.stroke();

    let fraction = fraction.clamp(0.0, 1.0);
    if fraction > 0.0 {
        s.begin_path();
        s.arc(at, radius, -FRAC_PI_2, -FRAC_PI_2 + fraction * TAU);
        s.set_stroke(&color.into());
        s.stroke();
    }
}

fn rounded_rect(s: &mut dyn DrawSurface, origin: Vec2, size: Vec2, radius: f32) {
    let r = radius.min(size.x / 2.0).min(size.y / 2.0);
    let (x0, y0) = (origin.x, origin.y);
    let (x1, y1) = (origin.x + size.x, origin.y + size.y);
    s.begin_path();
    s.move_to(Vec2::new(x0 + r, y0));
    s.line_to(Vec2::new(x1 - r, y0));
    s.quadratic_to(Vec2::new(x1, y0), Vec2::new(x1, y0 + r));
    s.line_to(Vec2::new(x1, y1 - r));
    s.quadratic_to(Vec2::new(x1, y1), Vec2::new(x1 - r, y1));
    s.line_to(Vec2::new(x0 + r, y1));
    s.quadratic_to(Vec2::new(x0, y1), Vec2::new(x0, y1 - r));
    s.line_to(Vec2::new(x0, y0 + r));
    s.quadratic_to(Vec2::new(x0, y0), Vec2::new(x0 + r, y0));
    s.close_path();
}

/// Half ellipse as two quadratic segments; `top` draws the upper half
fn ellipse_half(s: &mut dyn DrawSurface, center: Vec2, rx: f32, ry: f32, top: bool) {
    let dy = if top { -ry } else { ry };
    // Left-to-right along the chosen side, ending at the right edge
    s.quadratic_to(Vec2::new(center.x - rx, center.y + dy * 2.0), Vec2::new(center.x, center.y + dy * 2.0));
    s.quadratic_to(Vec2::new(center.x + rx, center.y + dy * 2.0), Vec2::new(center.x + rx, center.y));
}
