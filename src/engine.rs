//! Frame scheduler and lifecycle
//!
//! Host agnostic: the host feeds timestamps, resize events and a drawing
//! surface. Per frame the order is fixed: step, resolve, render, spawn.

use rand_pcg::Pcg32;

use crate::consts::{FIRST_FRAME_DT, MAX_FRAME_DT};
use crate::error::Result;
use crate::renderer::{DrawSurface, Palette, SceneOptions, TextDirection, Theme, render};
use crate::settings::Settings;
use crate::sim::{self, RandomSource, ResolveReport, SpawnReport, World};

/// Engine lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    /// Created, not yet scheduled
    Idle,
    /// Accepting frames
    Running,
    /// Terminal; frames are ignored
    Disposed,
}

/// What one frame did
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameReport {
    pub dt: f32,
    pub resolved: ResolveReport,
    pub spawned: SpawnReport,
}

/// One independent animation instance
pub struct Engine<R: RandomSource = Pcg32> {
    settings: Settings,
    world: World,
    rng: R,
    theme: Theme,
    direction: TextDirection,
    palette: Palette,
    last_timestamp: Option<f64>,
    lifecycle: Lifecycle,
}

impl Engine<Pcg32> {
    /// Engine with system randomness
    pub fn new(settings: Settings, width: f32, height: f32) -> Result<Self> {
        Self::with_rng(settings, width, height, sim::system())
    }
}

impl<R: RandomSource> Engine<R> {
    /// Engine with an injected random source
    ///
    /// A zero-sized canvas is accepted; layout waits for a non-zero resize.
    pub fn with_rng(settings: Settings, width: f32, height: f32, rng: R) -> Result<Self> {
        settings.validate()?;
        let theme = Theme::default();
        let mut engine = Self {
            world: World::new(0.0, 0.0, settings.variant),
            settings,
            rng,
            theme,
            direction: TextDirection::default(),
            palette: Palette::for_theme(theme),
            last_timestamp: None,
            lifecycle: Lifecycle::Idle,
        };
        engine.resize(width, height);
        Ok(engine)
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    pub fn is_running(&self) -> bool {
        self.lifecycle == Lifecycle::Running
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    /// Begin accepting frames. Returns false if already running or disposed.
    pub fn start(&mut self) -> bool {
        if self.lifecycle != Lifecycle::Idle {
            return false;
        }
        self.lifecycle = Lifecycle::Running;
        self.last_timestamp = None;
        log::info!(
            "Engine started ({} variant, {}x{})",
            self.settings.variant.as_str(),
            self.world.width,
            self.world.height
        );
        true
    }

    /// Stop for good. Idempotent; returns true only on the first call.
    pub fn dispose(&mut self) -> bool {
        if self.lifecycle == Lifecycle::Disposed {
            return false;
        }
        self.lifecycle = Lifecycle::Disposed;
        log::info!("Engine disposed after {} frames", self.world.frames);
        true
    }

    /// Swap the palette; the world is untouched
    pub fn set_theme(&mut self, theme: Theme) {
        if theme != self.theme {
            self.theme = theme;
            self.palette = Palette::for_theme(theme);
        }
    }

    pub fn set_direction(&mut self, direction: TextDirection) {
        self.direction = direction;
    }

    /// Apply new canvas dimensions
    ///
    /// The first usable size lays the network out; later sizes rescale
    /// existing positions proportionally. Degenerate sizes are ignored once
    /// a layout exists.
    pub fn resize(&mut self, width: f32, height: f32) {
        let usable = width > 0.0 && height > 0.0;
        if self.world.is_populated() {
            if usable {
                self.world.rescale(width, height);
            } else {
                log::debug!("Ignoring degenerate resize {}x{}", width, height);
            }
            return;
        }
        self.world.width = width.max(0.0);
        self.world.height = height.max(0.0);
        if usable {
            sim::populate(&mut self.world, &self.settings, &mut self.rng);
        }
    }

    /// Advance the simulation without drawing: step, resolve, spawn
    pub fn update(&mut self, dt: f32) -> FrameReport {
        let resolved = self.simulate(dt);
        let spawned = sim::run_timers(&mut self.world, &self.settings, &mut self.rng, dt);
        FrameReport { dt, resolved, spawned }
    }

    /// One scheduled frame at `timestamp_ms` (host clock)
    ///
    /// Returns `None` unless the engine is running.
    pub fn frame(&mut self, timestamp_ms: f64, surface: &mut dyn DrawSurface) -> Option<FrameReport> {
        if !self.is_running() {
            return None;
        }
        let dt = match self.last_timestamp {
            Some(last) => (((timestamp_ms - last) / 1000.0) as f32).clamp(0.0, MAX_FRAME_DT),
            None => FIRST_FRAME_DT,
        };
        self.last_timestamp = Some(timestamp_ms);

        let resolved = self.simulate(dt);
        let options = SceneOptions {
            trails: self.settings.effective_trails(),
            direction: self.direction,
        };
        render(&self.world, &self.palette, &options, surface);
        let spawned = sim::run_timers(&mut self.world, &self.settings, &mut self.rng, dt);
        Some(FrameReport { dt, resolved, spawned })
    }

    fn simulate(&mut self, dt: f32) -> ResolveReport {
        if !self.world.is_populated() {
            return ResolveReport::default();
        }
        sim::advance(&mut self.world, dt);
        sim::resolve(&mut self.world, &self.settings, &mut self.rng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::RecordingSurface;
    use crate::settings::Variant;
    use crate::sim::seeded;

    fn engine(width: f32, height: f32) -> Engine<Pcg32> {
        Engine::with_rng(Settings::default(), width, height, seeded(77)).unwrap()
    }

    #[test]
    fn test_lifecycle_is_idempotent() {
        let mut e = engine(800.0, 500.0);
        let mut s = RecordingSurface::new(800.0, 500.0);
        assert!(e.frame(0.0, &mut s).is_none());
        assert!(e.start());
        assert!(!e.start());
        assert!(e.frame(16.0, &mut s).is_some());
        assert!(e.dispose());
        assert!(!e.dispose());
        assert!(!e.start());

        s.reset();
        assert!(e.frame(32.0, &mut s).is_none());
        assert!(s.commands.is_empty());
    }

    #[test]
    fn test_frame_delta_from_timestamps() {
        let mut e = engine(800.0, 500.0);
        let mut s = RecordingSurface::new(800.0, 500.0);
        e.start();
        assert_eq!(e.frame(1000.0, &mut s).unwrap().dt, FIRST_FRAME_DT);
        let dt = e.frame(1020.0, &mut s).unwrap().dt;
        assert!((dt - 0.02).abs() < 1e-5);
        // Long stalls are clamped
        assert_eq!(e.frame(9000.0, &mut s).unwrap().dt, MAX_FRAME_DT);
    }

    #[test]
    fn test_zero_canvas_defers_layout() {
        let mut e = engine(0.0, 0.0);
        let mut s = RecordingSurface::new(0.0, 0.0);
        e.start();
        assert!(e.frame(0.0, &mut s).is_some());
        assert!(!e.world().is_populated());

        e.resize(800.0, 500.0);
        assert_eq!(e.world().servers.len(), 1 + e.settings().ring_count);
    }

    #[test]
    fn test_resize_rescales_positions() {
        let mut e = engine(800.0, 500.0);
        for _ in 0..600 {
            e.update(1.0 / 60.0);
        }
        let before: Vec<_> = e.world().servers.iter().map(|s| s.pos).collect();
        let flows = e.world().flows.len();
        let attackers = e.world().attackers.len();

        e.resize(400.0, 1000.0);
        for (old, server) in before.iter().zip(&e.world().servers) {
            assert!((server.pos.x - old.x * 0.5).abs() < 1e-3);
            assert!((server.pos.y - old.y * 2.0).abs() < 1e-3);
        }
        assert_eq!(e.world().flows.len(), flows);
        assert_eq!(e.world().attackers.len(), attackers);
        assert_eq!(e.world().servers[0].pos, e.world().center());

        // Degenerate size keeps the layout
        e.resize(0.0, 0.0);
        assert_eq!(e.world().width, 400.0);
    }

    #[test]
    fn test_theme_change_keeps_world() {
        let mut e = engine(800.0, 500.0);
        for _ in 0..120 {
            e.update(1.0 / 60.0);
        }
        let before = serde_json::to_string(e.world()).unwrap();
        e.set_theme(Theme::Light);
        assert_eq!(e.theme(), Theme::Light);
        assert_eq!(before, serde_json::to_string(e.world()).unwrap());
    }

    #[test]
    fn test_long_run_invariants() {
        let settings = Settings::for_variant(Variant::Cyber);
        let cap = settings.attacker_cap;
        let mut e = Engine::with_rng(settings, 1024.0, 768.0, seeded(5)).unwrap();
        let mut s = RecordingSurface::new(1024.0, 768.0);
        e.start();
        let mut t = 0.0;
        for _ in 0..60 * 120 {
            t += 1000.0 / 60.0;
            s.reset();
            e.frame(t, &mut s);
            let w = e.world();
            assert!(w.attackers.len() <= cap);
            assert!(w.flows.iter().all(|f| f.progress < 1.0));
            assert!(w.particles.iter().all(|p| p.life > 0.0));
            assert!(w.servers.iter().all(|s| (0.0..=100.0).contains(&s.encryption_level)));
            assert!(w.connections.iter().all(|c| (0.0..=1.0).contains(&c.pulse_position)));
        }
        assert!(e.world().frames > 0);
    }

    #[test]
    fn test_invalid_settings_rejected() {
        let settings = Settings {
            attacker_cap: 0,
            ..Settings::default()
        };
        assert!(Engine::with_rng(settings, 800.0, 500.0, seeded(1)).is_err());
    }

    #[test]
    fn test_instances_are_independent() {
        let mut a = engine(800.0, 500.0);
        let b = engine(800.0, 500.0);
        for _ in 0..300 {
            a.update(1.0 / 60.0);
        }
        assert_eq!(b.world().frames, 0);
        assert!(b.world().flows.is_empty());
    }
}
