//! 2D rendering module
//!
//! Palette lookup happens here and only here. The draw pass targets the
//! [`DrawSurface`] trait so any 2D host can display the backdrop.

pub mod glyphs;
pub mod palette;
pub mod scene;
pub mod surface;

pub use palette::{Palette, TextDirection, Theme};
pub use scene::{SceneOptions, render};
pub use surface::{Brush, Color, DrawCommand, DrawSurface, RadialGradient, RecordingSurface};
