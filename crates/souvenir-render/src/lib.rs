//! Souvenir Render - painting the bubble field onto a 2D surface
//!
//! - `Surface` - the drawing commands the host's 2D context must support
//! - `paint` - draws one frame (background, tint, bubbles, icons)
//! - `RecordingSurface` - headless surface that records draw commands

pub mod painter;
pub mod recording;
pub mod surface;

pub use painter::{paint, BubbleSprite, PaintStyle, SceneFrame};
pub use recording::{DrawCommand, RecordingSurface};
pub use surface::{GradientStop, Surface};
