//! Semi-implicit Euler step for one bubble

use crate::bubble::{Bubble, BubbleTraits};
use crate::config::PhysicsConfig;
use glam::Vec2;
use souvenir_core::{Result, SouvenirError};

/// Per-bubble oscillation, independent of wind.
///
/// Two harmonics per axis; the vertical amplitude is the larger one, which
/// is what turns straight wind paths into a drift.
pub fn turbulence(traits: &BubbleTraits, age: f32, config: &PhysicsConfig) -> Vec2 {
    let t = age * traits.turbulence_frequency + traits.turbulence_phase;
    let x = t.sin() + 0.5 * (2.3 * t + 1.1).sin();
    let y = (1.3 * t).sin() + 0.6 * (2.9 * t + 0.4).sin();
    Vec2::new(x * config.turbulence_x, y * config.turbulence_y) * config.turbulence_scale
}

/// Total force on a bubble for the current wind sample.
/// Screen y grows downward, so buoyancy is negative.
pub fn total_force(bubble: &Bubble, wind: Vec2, config: &PhysicsConfig) -> Vec2 {
    let traits = &bubble.traits;
    let wind_force = wind * traits.wind_sensitivity;
    let buoyancy = Vec2::new(0.0, -config.buoyancy * traits.buoyancy_factor);
    let drift = Vec2::new(0.0, traits.vertical_drift_bias);
    wind_force + buoyancy + drift + turbulence(traits, bubble.age, config)
}

/// Advance position, velocity and rotation by `dt`.
///
/// `dt` must already be clamped by the caller. A bubble that ends in a
/// non-finite state is reported so the caller can drop it alone.
pub fn step(bubble: &mut Bubble, wind: Vec2, dt: f32, config: &PhysicsConfig) -> Result<()> {
    let acceleration = total_force(bubble, wind, config) / bubble.mass;

    bubble.velocity += acceleration * dt;
    bubble.velocity *= config.drag;
    bubble.position += bubble.velocity * dt;

    bubble.angular_velocity += (bubble.velocity.x * config.rotation_gain
        - bubble.angular_velocity * config.rotation_smoothing)
        * dt;
    bubble.angular_velocity *= config.rotation_drag;
    bubble.rotation += bubble.angular_velocity * dt;

    if bubble.is_finite() {
        Ok(())
    } else {
        Err(SouvenirError::NonFiniteState(bubble.id.raw()))
    }
}
