//! Frame painter: background, animated tint, then bubbles and their icons

use crate::surface::{GradientStop, Surface};
use serde::{Deserialize, Serialize};
use souvenir_core::{BubbleId, Color, Vec2, Viewport};

/// Read-only view of one bubble for painting
#[derive(Debug, Clone, Copy)]
pub struct BubbleSprite<'a> {
    pub id: BubbleId,
    pub center: Vec2,
    pub radius: f32,
    /// Radians
    pub rotation: f32,
    pub opacity: f32,
    /// Icon URL, None while the icon is unavailable
    pub icon: Option<&'a str>,
    pub hovered: bool,
}

/// Everything the painter reads for one frame
#[derive(Debug, Clone, Copy)]
pub struct SceneFrame<'a> {
    pub viewport: Viewport,
    /// Simulated time in seconds, drives the tint oscillation
    pub time: f64,
    /// Current wind sample, skews the tint gradient
    pub wind: Vec2,
    pub background_image: Option<&'a str>,
    pub sprites: &'a [BubbleSprite<'a>],
}

/// Visual constants of the bubble field
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PaintStyle {
    pub background: Color,
    pub background_image_alpha: f32,
    pub tint_color: Color,
    pub tint_base_alpha: f32,
    pub tint_amplitude: f32,
    /// Oscillations per second
    pub tint_frequency: f32,
    /// Pixels of gradient skew per unit of horizontal wind
    pub tint_wind_skew: f32,
    pub bubble_highlight: Color,
    pub bubble_body: Color,
    pub bubble_rim: Color,
    /// Icon edge length as a fraction of the bubble diameter
    pub icon_scale: f32,
    /// Radius multiplier for the hovered bubble
    pub hover_scale: f32,
}

impl Default for PaintStyle {
    fn default() -> Self {
        Self {
            background: Color::rgb(0.97, 0.96, 0.99),
            background_image_alpha: 0.12,
            tint_color: Color::rgb(0.55, 0.72, 1.0),
            tint_base_alpha: 0.08,
            tint_amplitude: 0.05,
            tint_frequency: 0.05,
            tint_wind_skew: 4.0,
            bubble_highlight: Color::rgba(1.0, 1.0, 1.0, 0.9),
            bubble_body: Color::rgba(0.78, 0.88, 1.0, 0.35),
            bubble_rim: Color::rgba(0.45, 0.6, 0.95, 0.55),
            icon_scale: 0.6,
            hover_scale: 1.08,
        }
    }
}

impl PaintStyle {
    /// Tint alpha at `time`; stays within `base ± amplitude`, never negative
    pub fn tint_alpha(&self, time: f64) -> f32 {
        let phase = (time * self.tint_frequency as f64 * std::f64::consts::TAU) as f32;
        (self.tint_base_alpha + self.tint_amplitude * phase.sin()).max(0.0)
    }
}

/// Paint one frame. Never mutates simulation state; returns the number of
/// bubbles drawn.
pub fn paint(frame: &SceneFrame<'_>, style: &PaintStyle, surface: &mut dyn Surface) -> usize {
    let bounds = frame.viewport.bounds();
    surface.clear(style.background);

    if let Some(url) = frame.background_image {
        surface.draw_image(url, bounds, style.background_image_alpha);
    }

    let tint = style.tint_color.with_alpha(style.tint_alpha(frame.time));
    let skew = frame.wind.x * style.tint_wind_skew;
    surface.fill_linear_gradient(
        bounds,
        Vec2::new(skew, 0.0),
        Vec2::new(bounds.right - skew, bounds.bottom),
        &[
            GradientStop::new(0.0, tint),
            GradientStop::new(1.0, Color::TRANSPARENT),
        ],
    );

    let mut drawn = 0;
    for sprite in frame.sprites {
        if sprite.opacity <= 0.0 || sprite.radius <= 0.0 {
            continue;
        }
        draw_bubble(sprite, style, surface);
        drawn += 1;
    }
    drawn
}

fn draw_bubble(sprite: &BubbleSprite<'_>, style: &PaintStyle, surface: &mut dyn Surface) {
    let radius = if sprite.hovered {
        sprite.radius * style.hover_scale
    } else {
        sprite.radius
    };
    let alpha = sprite.opacity.clamp(0.0, 1.0);

    surface.fill_radial_gradient(
        sprite.center,
        radius,
        &[
            GradientStop::new(0.0, style.bubble_highlight.with_alpha(alpha)),
            GradientStop::new(0.55, style.bubble_body.with_alpha(alpha)),
            GradientStop::new(1.0, style.bubble_rim.with_alpha(alpha)),
        ],
    );

    if let Some(url) = sprite.icon {
        let size = radius * 2.0 * style.icon_scale;
        surface.draw_icon(url, sprite.center, size, sprite.rotation, alpha);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recording::{DrawCommand, RecordingSurface};

    fn sprite(id: u64, icon: Option<&str>) -> BubbleSprite<'_> {
        BubbleSprite {
            id: BubbleId::from_raw(id),
            center: Vec2::new(50.0, 60.0),
            radius: 20.0,
            rotation: 0.5,
            opacity: 1.0,
            icon,
            hovered: false,
        }
    }

    fn frame<'a>(sprites: &'a [BubbleSprite<'a>]) -> SceneFrame<'a> {
        SceneFrame {
            viewport: Viewport::new(200.0, 100.0),
            time: 0.0,
            wind: Vec2::ZERO,
            background_image: None,
            sprites,
        }
    }

    #[test]
    fn paints_background_then_bubbles() {
        let sprites = [sprite(1, Some("a.png")), sprite(2, None)];
        let mut surface = RecordingSurface::new(Viewport::new(200.0, 100.0));
        let drawn = paint(&frame(&sprites), &PaintStyle::default(), &mut surface);

        assert_eq!(drawn, 2);
        let commands = surface.commands();
        assert!(matches!(commands[0], DrawCommand::Clear(_)));
        assert!(matches!(commands[1], DrawCommand::LinearGradient { .. }));
        assert!(matches!(commands[2], DrawCommand::RadialGradient { .. }));
        match &commands[3] {
            DrawCommand::Icon { url, rotation, .. } => {
                assert_eq!(url, "a.png");
                assert!((rotation - 0.5).abs() < 1e-6);
            }
            other => panic!("expected icon, got {other:?}"),
        }
        // Second bubble has no icon
        assert_eq!(commands.len(), 5);
    }

    #[test]
    fn background_image_is_faded() {
        let mut surface = RecordingSurface::new(Viewport::new(200.0, 100.0));
        let mut f = frame(&[]);
        f.background_image = Some("bg.jpg");
        let style = PaintStyle::default();
        paint(&f, &style, &mut surface);
        match &surface.commands()[1] {
            DrawCommand::Image { alpha, .. } => {
                assert!((alpha - style.background_image_alpha).abs() < 1e-6)
            }
            other => panic!("expected image, got {other:?}"),
        }
    }

    #[test]
    fn hover_only_changes_radius() {
        let style = PaintStyle::default();
        let mut hovered = sprite(1, None);
        hovered.hovered = true;
        let sprites = [hovered];
        let mut surface = RecordingSurface::new(Viewport::new(200.0, 100.0));
        paint(&frame(&sprites), &style, &mut surface);
        let radius = surface
            .commands()
            .iter()
            .find_map(|c| match c {
                DrawCommand::RadialGradient { radius, .. } => Some(*radius),
                _ => None,
            })
            .unwrap();
        assert!((radius - 20.0 * style.hover_scale).abs() < 1e-4);
        assert_eq!(sprites[0].radius, 20.0);
    }

    #[test]
    fn invisible_bubbles_are_skipped() {
        let mut faded = sprite(1, Some("a.png"));
        faded.opacity = 0.0;
        let sprites = [faded];
        let mut surface = RecordingSurface::new(Viewport::new(200.0, 100.0));
        assert_eq!(paint(&frame(&sprites), &PaintStyle::default(), &mut surface), 0);
        assert_eq!(surface.bubble_count(), 0);
    }

    #[test]
    fn tint_alpha_oscillates_within_bounds() {
        let style = PaintStyle::default();
        let mut min = f32::MAX;
        let mut max = f32::MIN;
        for i in 0..400 {
            let a = style.tint_alpha(i as f64 * 0.1);
            min = min.min(a);
            max = max.max(a);
        }
        assert!(max > min);
        assert!(max <= style.tint_base_alpha + style.tint_amplitude + 1e-6);
        assert!(min >= 0.0);
    }
}
