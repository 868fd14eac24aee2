//! Browser host
//!
//! Binds an [`Engine`] to a `<canvas>`: 2D context surface,
//! requestAnimationFrame loop, and a window resize listener. Any failure
//! leaves the page untouched; the backdrop simply does not animate.

use std::cell::RefCell;
use std::rc::Rc;

use glam::Vec2;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, Window};

use super::FrameRequest;
use crate::engine::Engine;
use crate::error::{EngineError, Result};
use crate::renderer::{Brush, Color, DrawSurface, TextDirection, Theme};
use crate::settings::Settings;

/// [`DrawSurface`] over a canvas 2D context, in CSS pixels
pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    dpr: f64,
    css_size: (f32, f32),
}

impl CanvasSurface {
    pub fn new(canvas: HtmlCanvasElement) -> Result<Self> {
        let ctx = canvas
            .get_context("2d")
            .map_err(|e| EngineError::Host(format!("{e:?}")))?
            .ok_or(EngineError::NoContext)?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| EngineError::NoContext)?;
        let mut surface = Self {
            canvas,
            ctx,
            dpr: 1.0,
            css_size: (0.0, 0.0),
        };
        surface.fit_to_client();
        Ok(surface)
    }

    /// Match the backing store to the element's layout size
    pub fn fit_to_client(&mut self) -> (f32, f32) {
        self.dpr = web_sys::window().map(|w| w.device_pixel_ratio()).unwrap_or(1.0);
        let w = self.canvas.client_width().max(0);
        let h = self.canvas.client_height().max(0);
        self.canvas.set_width((w as f64 * self.dpr) as u32);
        self.canvas.set_height((h as f64 * self.dpr) as u32);
        self.css_size = (w as f32, h as f32);
        self.css_size
    }

    fn brush_style(&self, brush: &Brush) -> Option<web_sys::CanvasGradient> {
        match brush {
            Brush::Solid(_) => None,
            Brush::Radial(g) => {
                let gradient = self
                    .ctx
                    .create_radial_gradient(
                        g.center.x as f64,
                        g.center.y as f64,
                        g.inner_radius as f64,
                        g.center.x as f64,
                        g.center.y as f64,
                        g.outer_radius as f64,
                    )
                    .ok()?;
                for (offset, color) in &g.stops {
                    let _ = gradient.add_color_stop(*offset, &color.to_css());
                }
                Some(gradient)
            }
        }
    }
}

impl DrawSurface for CanvasSurface {
    fn size(&self) -> (f32, f32) {
        self.css_size
    }

    fn clear(&mut self) {
        let _ = self.ctx.set_transform(self.dpr, 0.0, 0.0, self.dpr, 0.0, 0.0);
        self.ctx
            .clear_rect(0.0, 0.0, self.css_size.0 as f64, self.css_size.1 as f64);
    }

    fn save(&mut self) {
        self.ctx.save();
    }
    fn restore(&mut self) {
        self.ctx.restore();
    }
    fn translate(&mut self, offset: Vec2) {
        let _ = self.ctx.translate(offset.x as f64, offset.y as f64);
    }
    fn scale(&mut self, factor: Vec2) {
        let _ = self.ctx.scale(factor.x as f64, factor.y as f64);
    }

    fn begin_path(&mut self) {
        self.ctx.begin_path();
    }
    fn move_to(&mut self, p: Vec2) {
        self.ctx.move_to(p.x as f64, p.y as f64);
    }
    fn line_to(&mut self, p: Vec2) {
        self.ctx.line_to(p.x as f64, p.y as f64);
    }
    fn arc(&mut self, center: Vec2, radius: f32, start: f32, end: f32) {
        let _ = self
            .ctx
            .arc(center.x as f64, center.y as f64, radius as f64, start as f64, end as f64);
    }
    fn quadratic_to(&mut self, control: Vec2, to: Vec2) {
        self.ctx
            .quadratic_curve_to(control.x as f64, control.y as f64, to.x as f64, to.y as f64);
    }
    fn bezier_to(&mut self, c1: Vec2, c2: Vec2, to: Vec2) {
        self.ctx.bezier_curve_to(
            c1.x as f64,
            c1.y as f64,
            c2.x as f64,
            c2.y as f64,
            to.x as f64,
            to.y as f64,
        );
    }
    fn close_path(&mut self) {
        self.ctx.close_path();
    }

    fn set_fill(&mut self, brush: &Brush) {
        match (brush, self.brush_style(brush)) {
            (Brush::Solid(color), _) => self.ctx.set_fill_style_str(&color.to_css()),
            (_, Some(gradient)) => self.ctx.set_fill_style_canvas_gradient(&gradient),
            (_, None) => {}
        }
    }
    fn set_stroke(&mut self, brush: &Brush) {
        match (brush, self.brush_style(brush)) {
            (Brush::Solid(color), _) => self.ctx.set_stroke_style_str(&color.to_css()),
            (_, Some(gradient)) => self.ctx.set_stroke_style_canvas_gradient(&gradient),
            (_, None) => {}
        }
    }
    fn set_line_width(&mut self, width: f32) {
        self.ctx.set_line_width(width as f64);
    }
    fn set_line_dash(&mut self, pattern: &[f32]) {
        let segments: js_sys::Array = pattern.iter().map(|v| JsValue::from_f64(*v as f64)).collect();
        let _ = self.ctx.set_line_dash(&segments);
    }
    fn set_alpha(&mut self, alpha: f32) {
        self.ctx.set_global_alpha(alpha as f64);
    }
    fn set_shadow(&mut self, blur: f32, color: Color) {
        self.ctx.set_shadow_blur(blur as f64);
        self.ctx.set_shadow_color(&color.to_css());
    }
    fn set_font(&mut self, font: &str) {
        self.ctx.set_font(font);
    }

    fn fill(&mut self) {
        self.ctx.fill();
    }
    fn stroke(&mut self) {
        self.ctx.stroke();
    }
    fn fill_rect(&mut self, origin: Vec2, size: Vec2) {
        self.ctx
            .fill_rect(origin.x as f64, origin.y as f64, size.x as f64, size.y as f64);
    }
    fn fill_text(&mut self, text: &str, at: Vec2) {
        let _ = self.ctx.fill_text(text, at.x as f64, at.y as f64);
    }
}

struct Inner {
    engine: Engine,
    surface: CanvasSurface,
}

type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

/// A mounted, self-scheduling backdrop
pub struct Backdrop {
    window: Window,
    inner: Rc<RefCell<Inner>>,
    raf_id: FrameRequest,
    frame_cb: FrameCallback,
    resize_cb: Option<Closure<dyn FnMut(web_sys::Event)>>,
    disposed: bool,
}

impl Backdrop {
    /// Find the canvas and build the engine. Does not schedule anything yet.
    pub fn mount(canvas_id: &str, settings: Settings, theme: Theme, direction: TextDirection) -> Result<Self> {
        let window = web_sys::window().ok_or(EngineError::NoWindow)?;
        let document = window.document().ok_or(EngineError::NoWindow)?;
        let canvas: HtmlCanvasElement = document
            .get_element_by_id(canvas_id)
            .ok_or_else(|| EngineError::CanvasNotFound(canvas_id.to_string()))?
            .dyn_into()
            .map_err(|_| EngineError::NotACanvas(canvas_id.to_string()))?;

        let surface = CanvasSurface::new(canvas)?;
        let (width, height) = surface.size();
        let mut engine = Engine::new(settings, width, height)?;
        engine.set_theme(theme);
        engine.set_direction(direction);

        Ok(Self {
            window,
            inner: Rc::new(RefCell::new(Inner { engine, surface })),
            raf_id: FrameRequest::default(),
            frame_cb: Rc::new(RefCell::new(None)),
            resize_cb: None,
            disposed: false,
        })
    }

    /// Register the frame loop and the resize listener
    pub fn start(&mut self) -> Result<()> {
        if self.disposed || !self.inner.borrow_mut().engine.start() {
            return Ok(());
        }

        let inner = self.inner.clone();
        let raf_id = self.raf_id.clone();
        let frame_cb = self.frame_cb.clone();
        let window = self.window.clone();
        *self.frame_cb.borrow_mut() = Some(Closure::new(move |time: f64| {
            raf_id.clear();
            let Ok(mut guard) = inner.try_borrow_mut() else {
                return;
            };
            let Inner { engine, surface } = &mut *guard;
            if engine.frame(time, surface).is_none() {
                return;
            }
            if let Some(cb) = frame_cb.borrow().as_ref() {
                match window.request_animation_frame(cb.as_ref().unchecked_ref()) {
                    Ok(id) => raf_id.set(id),
                    Err(e) => log::warn!("requestAnimationFrame failed: {:?}", e),
                }
            }
        }));

        let inner = self.inner.clone();
        let resize_cb = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            if let Ok(mut guard) = inner.try_borrow_mut() {
                let (w, h) = guard.surface.fit_to_client();
                guard.engine.resize(w, h);
            }
        });
        self.window
            .add_event_listener_with_callback("resize", resize_cb.as_ref().unchecked_ref())
            .map_err(|e| EngineError::Host(format!("{e:?}")))?;
        self.resize_cb = Some(resize_cb);

        let id = match self.frame_cb.borrow().as_ref() {
            Some(cb) => self
                .window
                .request_animation_frame(cb.as_ref().unchecked_ref())
                .map_err(|e| EngineError::Host(format!("{e:?}")))?,
            None => return Ok(()),
        };
        self.raf_id.set(id);
        Ok(())
    }

    pub fn set_theme(&self, theme: Theme) {
        if let Ok(mut guard) = self.inner.try_borrow_mut() {
            guard.engine.set_theme(theme);
        }
    }

    pub fn set_direction(&self, direction: TextDirection) {
        if let Ok(mut guard) = self.inner.try_borrow_mut() {
            guard.engine.set_direction(direction);
        }
    }

    /// Cancel the pending frame and remove the resize listener. Idempotent.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.disposed = true;

        if let Some(id) = self.raf_id.take() {
            let _ = self.window.cancel_animation_frame(id);
        }
        if let Ok(mut guard) = self.inner.try_borrow_mut() {
            guard.engine.dispose();
        } else {
            log::warn!("Backdrop disposed from inside a frame");
        }

        if let Some(cb) = self.resize_cb.take() {
            let _ = self
                .window
                .remove_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
        }
        // Breaks the closure's self-reference
        self.frame_cb.borrow_mut().take();
    }
}

impl Drop for Backdrop {
    fn drop(&mut self) {
        self.dispose();
    }
}
