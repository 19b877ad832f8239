//! Headless surface that records draw calls

use crate::surface::{GradientStop, Surface};
use souvenir_core::{Color, Rect, Vec2, Viewport};

/// A single recorded draw call
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear(Color),
    Image {
        url: String,
        dest: Rect,
        alpha: f32,
    },
    LinearGradient {
        rect: Rect,
        from: Vec2,
        to: Vec2,
        stops: Vec<GradientStop>,
    },
    RadialGradient {
        center: Vec2,
        radius: f32,
        stops: Vec<GradientStop>,
    },
    Icon {
        url: String,
        center: Vec2,
        size: f32,
        rotation: f32,
        alpha: f32,
    },
}

/// Surface that keeps every draw call of the current frame in memory.
///
/// `clear` starts a new frame, so `commands()` always holds the most recent
/// frame only.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    viewport: Viewport,
    commands: Vec<DrawCommand>,
    frames: u64,
    released: bool,
}

impl RecordingSurface {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            ..Self::default()
        }
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Draw calls of the last painted frame
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Number of frames started (clears) since creation
    pub fn frame_count(&self) -> u64 {
        self.frames
    }

    pub fn is_released(&self) -> bool {
        self.released
    }

    /// Count of bubble bodies in the last frame
    pub fn bubble_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::RadialGradient { .. }))
            .count()
    }

    fn record(&mut self, command: DrawCommand) {
        if !self.released {
            self.commands.push(command);
        }
    }
}

impl Surface for RecordingSurface {
    fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    fn clear(&mut self, color: Color) {
        if self.released {
            return;
        }
        self.commands.clear();
        self.frames += 1;
        self.commands.push(DrawCommand::Clear(color));
    }

    fn draw_image(&mut self, url: &str, dest: Rect, alpha: f32) {
        self.record(DrawCommand::Image {
            url: url.to_string(),
            dest,
            alpha,
        });
    }

    fn fill_linear_gradient(&mut self, rect: Rect, from: Vec2, to: Vec2, stops: &[GradientStop]) {
        self.record(DrawCommand::LinearGradient {
            rect,
            from,
            to,
            stops: stops.to_vec(),
        });
    }

    fn fill_radial_gradient(&mut self, center: Vec2, radius: f32, stops: &[GradientStop]) {
        self.record(DrawCommand::RadialGradient {
            center,
            radius,
            stops: stops.to_vec(),
        });
    }

    fn draw_icon(&mut self, url: &str, center: Vec2, size: f32, rotation: f32, alpha: f32) {
        self.record(DrawCommand::Icon {
            url: url.to_string(),
            center,
            size,
            rotation,
            alpha,
        });
    }

    fn release(&mut self) {
        self.commands.clear();
        self.released = true;
    }
}
