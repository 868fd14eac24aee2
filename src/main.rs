//! NetGuard Viz entry point
//!
//! On the web, exposes mount/dispose hooks for the host page and mounts a
//! default backdrop on `#network-canvas` if one exists. Natively, runs a
//! seeded headless simulation and logs what happened.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_host {
    use std::cell::RefCell;

    use netguard_viz::platform::Backdrop;
    use netguard_viz::{Settings, TextDirection, Theme, Variant};

    thread_local! {
        static BACKDROPS: RefCell<Vec<(String, Backdrop)>> = const { RefCell::new(Vec::new()) };
    }

    fn theme_of(dark: bool) -> Theme {
        if dark { Theme::Dark } else { Theme::Light }
    }

    fn direction_of(rtl: bool) -> TextDirection {
        if rtl { TextDirection::Rtl } else { TextDirection::Ltr }
    }

    /// Mount and start a backdrop; false (and a warning) on any failure
    pub fn mount(canvas_id: &str, variant: &str, dark: bool, rtl: bool) -> bool {
        dispose(canvas_id);
        let variant = Variant::from_str(variant).unwrap_or_default();
        let settings = Settings::load(variant);
        let result = Backdrop::mount(canvas_id, settings, theme_of(dark), direction_of(rtl))
            .and_then(|mut backdrop| backdrop.start().map(|_| backdrop));
        match result {
            Ok(backdrop) => {
                BACKDROPS.with(|b| b.borrow_mut().push((canvas_id.to_string(), backdrop)));
                log::info!("Backdrop mounted on #{}", canvas_id);
                true
            }
            Err(e) => {
                log::warn!("Backdrop disabled on #{}: {}", canvas_id, e);
                false
            }
        }
    }

    pub fn dispose(canvas_id: &str) {
        BACKDROPS.with(|b| {
            let mut list = b.borrow_mut();
            if let Some(i) = list.iter().position(|(id, _)| id == canvas_id) {
                let (_, mut backdrop) = list.remove(i);
                backdrop.dispose();
            }
        });
    }

    pub fn set_theme(canvas_id: &str, dark: bool, rtl: bool) {
        BACKDROPS.with(|b| {
            for (id, backdrop) in b.borrow().iter() {
                if id == canvas_id {
                    backdrop.set_theme(theme_of(dark));
                    backdrop.set_direction(direction_of(rtl));
                }
            }
        });
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        // Already set when the module is re-initialised
        let _ = console_log::init_with_level(log::Level::Info);
        log::info!("NetGuard Viz loaded");

        let has_default_canvas = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id("network-canvas"))
            .is_some();
        if has_default_canvas {
            mount("network-canvas", "hero", true, false);
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_host::run();
}

/// Start the animation on a canvas. Returns false if it cannot run.
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
pub fn mount_backdrop(canvas_id: &str, variant: &str, dark: bool, rtl: bool) -> bool {
    wasm_host::mount(canvas_id, variant, dark, rtl)
}

/// Stop the animation and remove its listeners. Safe to call repeatedly.
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
pub fn dispose_backdrop(canvas_id: &str) {
    wasm_host::dispose(canvas_id);
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
pub fn set_backdrop_theme(canvas_id: &str, dark: bool, rtl: bool) {
    wasm_host::set_theme(canvas_id, dark, rtl);
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    if let Err(e) = headless::run(std::env::args().skip(1).collect()) {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use netguard_viz::renderer::RecordingSurface;
    use netguard_viz::sim::seeded;
    use netguard_viz::{Engine, EngineError, QualityPreset, Result, Settings, Theme, Variant};

    struct Args {
        variant: Variant,
        quality: Option<QualityPreset>,
        seconds: f32,
        seed: u64,
        settings_path: Option<String>,
        dump: bool,
        light: bool,
    }

    fn parse(args: Vec<String>) -> Result<Args> {
        let mut parsed = Args {
            variant: Variant::Hero,
            quality: None,
            seconds: 30.0,
            seed: 1,
            settings_path: None,
            dump: false,
            light: false,
        };
        let mut it = args.into_iter();
        while let Some(arg) = it.next() {
            let mut value = |name: &str| {
                it.next()
                    .ok_or_else(|| EngineError::InvalidSettings(format!("{name} needs a value")))
            };
            match arg.as_str() {
                "--variant" => {
                    let v = value("--variant")?;
                    parsed.variant = Variant::from_str(&v)
                        .ok_or_else(|| EngineError::InvalidSettings(format!("unknown variant '{v}'")))?;
                }
                "--quality" => {
                    let q = value("--quality")?;
                    parsed.quality = Some(
                        QualityPreset::from_str(&q)
                            .ok_or_else(|| EngineError::InvalidSettings(format!("unknown quality '{q}'")))?,
                    );
                }
                "--seconds" => {
                    parsed.seconds = value("--seconds")?
                        .parse()
                        .map_err(|_| EngineError::InvalidSettings("--seconds must be a number".into()))?;
                }
                "--seed" => {
                    parsed.seed = value("--seed")?
                        .parse()
                        .map_err(|_| EngineError::InvalidSettings("--seed must be an integer".into()))?;
                }
                "--settings" => parsed.settings_path = Some(value("--settings")?),
                "--dump" => parsed.dump = true,
                "--light" => parsed.light = true,
                other => return Err(EngineError::InvalidSettings(format!("unknown argument '{other}'"))),
            }
        }
        Ok(parsed)
    }

    pub fn run(args: Vec<String>) -> Result<()> {
        let args = parse(args)?;
        let mut settings = match &args.settings_path {
            Some(path) => {
                let json = std::fs::read_to_string(path)
                    .map_err(|e| EngineError::Host(format!("failed to read '{path}': {e}")))?;
                Settings::from_json(&json)?
            }
            None => Settings::for_variant(args.variant),
        };
        if let Some(quality) = args.quality {
            settings.quality = quality;
        }
        log::info!(
            "Headless run: {} variant, {} quality, {}s, seed {}",
            settings.variant.as_str(),
            settings.quality.as_str(),
            args.seconds,
            args.seed
        );

        let (width, height) = (1280.0, 720.0);
        let mut engine = Engine::with_rng(settings, width, height, seeded(args.seed))?;
        if args.light {
            engine.set_theme(Theme::Light);
        }
        let mut surface = RecordingSurface::new(width, height);
        engine.start();

        let frames = (args.seconds * 60.0) as u64;
        let (mut blocked, mut breached, mut flows, mut attackers, mut paints) = (0, 0, 0, 0, 0);
        for i in 0..frames {
            surface.reset();
            if let Some(report) = engine.frame(i as f64 * 1000.0 / 60.0, &mut surface) {
                blocked += report.resolved.blocked;
                breached += report.resolved.breached;
                flows += report.spawned.flows;
                attackers += report.spawned.attackers;
            }
            paints += surface.paint_count();
        }
        engine.dispose();

        let world = engine.world();
        log::info!(
            "{} frames: {} flows spawned, {} attackers spawned, {} blocked, {} breached",
            frames,
            flows,
            attackers,
            blocked,
            breached
        );
        log::info!(
            "Live: {} flows, {} attackers, {} particles; {:.1} paints/frame",
            world.flows.len(),
            world.attackers.len(),
            world.particles.len(),
            paints as f64 / frames.max(1) as f64
        );
        for (i, server) in world.servers.iter().enumerate() {
            log::info!(
                "  server {:>2} {:?}: encryption {:>5.1}{}",
                i,
                server.kind,
                server.encryption_level,
                if server.is_protected { " (shielded)" } else { "" }
            );
        }

        if args.dump {
            let json = serde_json::to_string_pretty(world).map_err(|e| EngineError::Host(e.to_string()))?;
            println!("{json}");
        }
        Ok(())
    }
}
