//! Drawing surface contract
//!
//! The renderer only talks to [`DrawSurface`]. The browser backs it with a
//! 2D canvas context; tests and headless runs use [`RecordingSurface`].

use glam::Vec2;

/// RGBA color, alpha in 0-1
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f32,
}

impl Color {
    pub const fn rgba(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::rgba(r, g, b, 1.0)
    }

    /// Same color with alpha multiplied by `factor`
    pub fn fade(self, factor: f32) -> Self {
        Self {
            a: (self.a * factor).clamp(0.0, 1.0),
            ..self
        }
    }

    /// CSS `rgba()` string
    pub fn to_css(&self) -> String {
        format!("rgba({}, {}, {}, {:.3})", self.r, self.g, self.b, self.a)
    }
}

/// Radial gradient between two concentric circles
#[derive(Debug, Clone, PartialEq)]
pub struct RadialGradient {
    pub center: Vec2,
    pub inner_radius: f32,
    pub outer_radius: f32,
    /// (offset 0-1, color)
    pub stops: Vec<(f32, Color)>,
}

/// Fill or stroke source
#[derive(Debug, Clone, PartialEq)]
pub enum Brush {
    Solid(Color),
    Radial(RadialGradient),
}

impl From<Color> for Brush {
    fn from(color: Color) -> Self {
        Brush::Solid(color)
    }
}

/// Primitive 2D drawing operations
pub trait DrawSurface {
    /// Pixel size of the surface
    fn size(&self) -> (f32, f32);
    fn clear(&mut self);

    fn save(&mut self);
    fn restore(&mut self);
    fn translate(&mut self, offset: Vec2);
    fn scale(&mut self, factor: Vec2);

    fn begin_path(&mut self);
    fn move_to(&mut self, p: Vec2);
    fn line_to(&mut self, p: Vec2);
    fn arc(&mut self, center: Vec2, radius: f32, start: f32, end: f32);
    fn quadratic_to(&mut self, control: Vec2, to: Vec2);
    fn bezier_to(&mut self, c1: Vec2, c2: Vec2, to: Vec2);
    fn close_path(&mut self);

    fn set_fill(&mut self, brush: &Brush);
    fn set_stroke(&mut self, brush: &Brush);
    fn set_line_width(&mut self, width: f32);
    /// Empty slice disables dashing
    fn set_line_dash(&mut self, pattern: &[f32]);
    fn set_alpha(&mut self, alpha: f32);
    /// Zero blur disables the shadow
    fn set_shadow(&mut self, blur: f32, color: Color);
    fn set_font(&mut self, font: &str);

    fn fill(&mut self);
    fn stroke(&mut self);
    fn fill_rect(&mut self, origin: Vec2, size: Vec2);
    fn fill_text(&mut self, text: &str, at: Vec2);

    /// Start a new path holding a full circle
    fn circle(&mut self, center: Vec2, radius: f32) {
        self.begin_path();
        self.arc(center, radius.max(0.0), 0.0, std::f32::consts::TAU);
    }
}

/// One recorded surface call
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear,
    Save,
    Restore,
    Translate(Vec2),
    Scale(Vec2),
    BeginPath,
    MoveTo(Vec2),
    LineTo(Vec2),
    Arc { center: Vec2, radius: f32, start: f32, end: f32 },
    QuadraticTo(Vec2, Vec2),
    BezierTo(Vec2, Vec2, Vec2),
    ClosePath,
    SetFill(Brush),
    SetStroke(Brush),
    SetLineWidth(f32),
    SetLineDash(Vec<f32>),
    SetAlpha(f32),
    SetShadow(f32, Color),
    SetFont(String),
    Fill,
    Stroke,
    FillRect(Vec2, Vec2),
    FillText(String, Vec2),
}

/// In-memory surface that records every call
#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    pub width: f32,
    pub height: f32,
    pub commands: Vec<DrawCommand>,
}

impl RecordingSurface {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            commands: Vec::new(),
        }
    }

    pub fn reset(&mut self) {
        self.commands.clear();
    }

    /// Number of fill + stroke operations recorded
    pub fn paint_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Fill | DrawCommand::Stroke | DrawCommand::FillRect(..)))
            .count()
    }

    /// All text drawn, in order
    pub fn texts(&self) -> Vec<&str> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::FillText(text, _) => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Solid colors set as fill or stroke, in order
    pub fn solid_colors(&self) -> Vec<Color> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::SetFill(Brush::Solid(color)) | DrawCommand::SetStroke(Brush::Solid(color)) => {
                    Some(*color)
                }
                _ => None,
            })
            .collect()
    }
}

impl DrawSurface for RecordingSurface {
    fn size(&self) -> (f32, f32) {
        (self.width, self.height)
    }
    fn clear(&mut self) {
        self.commands.push(DrawCommand::Clear);
    }
    fn save(&mut self) {
        self.commands.push(DrawCommand::Save);
    }
    fn restore(&mut self) {
        self.commands.push(DrawCommand::Restore);
    }
    fn translate(&mut self, offset: Vec2) {
        self.commands.push(DrawCommand::Translate(offset));
    }
    fn scale(&mut self, factor: Vec2) {
        self.commands.push(DrawCommand::Scale(factor));
    }
    fn begin_path(&mut self) {
        self.commands.push(DrawCommand::BeginPath);
    }
    fn move_to(&mut self, p: Vec2) {
        self.commands.push(DrawCommand::MoveTo(p));
    }
    fn line_to(&mut self, p: Vec2) {
        self.commands.push(DrawCommand::LineTo(p));
    }
    fn arc(&mut self, center: Vec2, radius: f32, start: f32, end: f32) {
        self.commands.push(DrawCommand::Arc { center, radius, start, end });
    }
    fn quadratic_to(&mut self, control: Vec2, to: Vec2) {
        self.commands.push(DrawCommand::QuadraticTo(control, to));
    }
    fn bezier_to(&mut self, c1: Vec2, c2: Vec2, to: Vec2) {
        self.commands.push(DrawCommand::BezierTo(c1, c2, to));
    }
    fn close_path(&mut self) {
        self.commands.push(DrawCommand::ClosePath);
    }
    fn set_fill(&mut self, brush: &Brush) {
        self.commands.push(DrawCommand::SetFill(brush.clone()));
    }
    fn set_stroke(&mut self, brush: &Brush) {
        self.commands.push(DrawCommand::SetStroke(brush.clone()));
    }
    fn set_line_width(&mut self, width: f32) {
        self.commands.push(DrawCommand::SetLineWidth(width));
    }
    fn set_line_dash(&mut self, pattern: &[f32]) {
        self.commands.push(DrawCommand::SetLineDash(pattern.to_vec()));
    }
    fn set_alpha(&mut self, alpha: f32) {
        self.commands.push(DrawCommand::SetAlpha(alpha));
    }
    fn set_shadow(&mut self, blur: f32, color: Color) {
        self.commands.push(DrawCommand::SetShadow(blur, color));
    }
    fn set_font(&mut self, font: &str) {
        self.commands.push(DrawCommand::SetFont(font.to_string()));
    }
    fn fill(&mut self) {
        self.commands.push(DrawCommand::Fill);
    }
    fn stroke(&mut self) {
        self.commands.push(DrawCommand::Stroke);
    }
    fn fill_rect(&mut self, origin: Vec2, size: Vec2) {
        self.commands.push(DrawCommand::FillRect(origin, size));
    }
    fn fill_text(&mut self, text: &str, at: Vec2) {
        self.commands.push(DrawCommand::FillText(text.to_string(), at));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_css_and_fade() {
        let c = Color::rgba(0, 255, 128, 0.8);
        assert_eq!(c.to_css(), "rgba(0, 255, 128, 0.800)");
        assert_eq!(c.fade(0.5).a, 0.4);
        assert_eq!(c.fade(3.0).a, 1.0);
    }

    #[test]
    fn test_circle_records_full_arc() {
        let mut s = RecordingSurface::new(10.0, 10.0);
        s.circle(Vec2::new(5.0, 5.0), 2.0);
        assert_eq!(s.commands[0], DrawCommand::BeginPath);
        assert!(matches!(s.commands[1], DrawCommand::Arc { radius, .. } if radius == 2.0));
    }
}
