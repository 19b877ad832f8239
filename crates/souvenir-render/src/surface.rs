//! Drawing surface contract

use serde::{Deserialize, Serialize};
use souvenir_core::{Color, Rect, Vec2, Viewport};

/// One color stop of a gradient, `offset` in [0, 1]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GradientStop {
    pub offset: f32,
    pub color: Color,
}

impl GradientStop {
    pub const fn new(offset: f32, color: Color) -> Self {
        Self { offset, color }
    }
}

/// A fixed-size 2D drawing context bound to the viewport.
///
/// Image sources are identified by URL; the host is expected to have them
/// decoded already (the engine only draws icons whose load succeeded).
pub trait Surface {
    /// Match the backing store to a new viewport size
    fn resize(&mut self, viewport: Viewport);

    /// Fill the whole surface with a solid color
    fn clear(&mut self, color: Color);

    /// Draw an image stretched into `dest`
    fn draw_image(&mut self, url: &str, dest: Rect, alpha: f32);

    /// Fill `rect` with a linear gradient running from `from` to `to`
    fn fill_linear_gradient(&mut self, rect: Rect, from: Vec2, to: Vec2, stops: &[GradientStop]);

    /// Fill a circle with a radial gradient centered at `center`
    fn fill_radial_gradient(&mut self, center: Vec2, radius: f32, stops: &[GradientStop]);

    /// Draw a square icon of edge `size` centered at `center`, rotated by `rotation` radians
    fn draw_icon(&mut self, url: &str, center: Vec2, size: f32, rotation: f32, alpha: f32);

    /// Release backing resources; nothing is drawn afterwards
    fn release(&mut self);
}
