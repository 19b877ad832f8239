//! Bubble lifecycle: fade-in, edge fade-out and retirement

use crate::bubble::Bubble;
use crate::config::LifecycleConfig;
use glam::Vec2;
use souvenir_core::Viewport;

/// Per-bubble lifecycle phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BubblePhase {
    /// Opacity ramping up after creation
    Spawning,
    Alive,
    /// Inside the right-edge fade band
    Fading,
    /// Left the viewport bounds; deleted at the end of the frame
    Removed,
}

/// Fade-in opacity at `age`: a linear ramp to the target, never decreasing
pub fn fade_in_opacity(age: f32, config: &LifecycleConfig) -> f32 {
    if config.fade_in_seconds <= 0.0 {
        return config.target_opacity;
    }
    config.target_opacity * (age / config.fade_in_seconds).clamp(0.0, 1.0)
}

/// Opacity factor from the remaining distance to the right edge.
///
/// 1 left of the fade band, 0 at and past the edge, linear in between.
pub fn edge_factor(x: f32, viewport: Viewport, config: &LifecycleConfig) -> f32 {
    let remaining = viewport.width - x;
    (remaining / config.edge_fade_distance).clamp(0.0, 1.0)
}

/// True when a center has left vertically or past the trailing (right) edge,
/// plus margin. The leading edge is where bubbles enter, so it never retires.
pub fn out_of_bounds(position: Vec2, viewport: Viewport, margin: f32) -> bool {
    position.x > viewport.width + margin
        || position.y < -margin
        || position.y > viewport.height + margin
}

/// Age a bubble by `dt` and recompute its phase and opacity.
///
/// Removal is terminal; a removed bubble is left untouched.
pub fn advance(bubble: &mut Bubble, dt: f32, viewport: Viewport, config: &LifecycleConfig) {
    if bubble.phase == BubblePhase::Removed {
        return;
    }
    bubble.age += dt.max(0.0);

    if out_of_bounds(bubble.position, viewport, config.bounds_margin) {
        bubble.phase = BubblePhase::Removed;
        bubble.opacity = 0.0;
        return;
    }

    let fade_in = fade_in_opacity(bubble.age, config);
    let edge = edge_factor(bubble.position.x, viewport, config);

    bubble.phase = if bubble.age < config.fade_in_seconds {
        BubblePhase::Spawning
    } else if edge < 1.0 {
        BubblePhase::Fading
    } else {
        BubblePhase::Alive
    };
    bubble.opacity = fade_in.min(config.target_opacity * edge);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bubble::tests::init_at;
    use crate::bubble::BubblePool;

    const VIEW: Viewport = Viewport::new(1000.0, 600.0);

    #[test]
    fn fade_in_is_monotonic_until_target() {
        let config = LifecycleConfig::default();
        let mut pool = BubblePool::new(1);
        pool.spawn(init_at(300.0, 300.0, 20.0)).unwrap();
        let bubble = &mut pool.as_mut_slice()[0];

        let mut last = bubble.opacity;
        for _ in 0..120 {
            advance(bubble, 1.0 / 60.0, VIEW, &config);
            assert!(bubble.opacity >= last);
            last = bubble.opacity;
        }
        assert!((last - config.target_opacity).abs() < 1e-6);
        assert_eq!(bubble.phase, BubblePhase::Alive);
    }

    #[test]
    fn edge_fade_is_non_increasing_in_x() {
        let config = LifecycleConfig::default();
        let start = VIEW.width - config.edge_fade_distance - 10.0;
        let mut last = edge_factor(start, VIEW, &config);
        assert_eq!(last, 1.0);
        let mut x = start;
        while x < VIEW.width + 20.0 {
            let f = edge_factor(x, VIEW, &config);
            assert!(f <= last);
            last = f;
            x += 3.0;
        }
        assert_eq!(last, 0.0);
    }

    #[test]
    fn enters_fading_near_right_edge() {
        let config = LifecycleConfig::default();
        let mut pool = BubblePool::new(1);
        pool.spawn(init_at(VIEW.width - 30.0, 300.0, 20.0)).unwrap();
        let bubble = &mut pool.as_mut_slice()[0];
        advance(bubble, config.fade_in_seconds + 0.1, VIEW, &config);
        assert_eq!(bubble.phase, BubblePhase::Fading);
        let expected = config.target_opacity * 30.0 / config.edge_fade_distance;
        assert!((bubble.opacity - expected).abs() < 1e-4);
    }

    #[test]
    fn removed_past_margins() {
        let config = LifecycleConfig::default();
        let m = config.bounds_margin;
        for (x, y) in [
            (VIEW.width + m + 1.0, 300.0),
            (300.0, -m - 1.0),
            (300.0, VIEW.height + m + 1.0),
        ] {
            let mut pool = BubblePool::new(1);
            pool.spawn(init_at(x, y, 20.0)).unwrap();
            let bubble = &mut pool.as_mut_slice()[0];
            advance(bubble, 0.016, VIEW, &config);
            assert_eq!(bubble.phase, BubblePhase::Removed, "({x}, {y})");
        }
    }

    #[test]
    fn within_margin_is_kept() {
        let config = LifecycleConfig::default();
        assert!(!out_of_bounds(Vec2::new(-10.0, -10.0), VIEW, config.bounds_margin));
        assert!(!out_of_bounds(
            Vec2::new(VIEW.width + 10.0, 300.0),
            VIEW,
            config.bounds_margin
        ));
    }

    #[test]
    fn leading_edge_never_retires() {
        let config = LifecycleConfig::default();
        let m = config.bounds_margin;
        assert!(!out_of_bounds(Vec2::new(-m - 50.0, 300.0), VIEW, m));

        // Entering bubble wider than the margin survives its first frames
        let mut pool = BubblePool::new(1);
        pool.spawn(init_at(-(m + 10.0), 300.0, m + 10.0)).unwrap();
        let bubble = &mut pool.as_mut_slice()[0];
        advance(bubble, 0.0, VIEW, &config);
        advance(bubble, 0.016, VIEW, &config);
        assert_ne!(bubble.phase, BubblePhase::Removed);
    }
}
