//! Global wind: a constant bias plus a smooth gust signal

use crate::config::{Harmonic, WindConfig};
use glam::Vec2;

/// Smoothly varying force shared by every bubble.
///
/// The gust is recomputed from `gust_phase` on every sample, so the field
/// carries no state beyond the phase and is continuous in it.
#[derive(Debug, Clone)]
pub struct WindField {
    base: Vec2,
    gust_phase: f32,
    gust_frequency: f32,
    x_harmonics: Vec<Harmonic>,
    y_harmonics: Vec<Harmonic>,
}

impl WindField {
    pub fn new(config: &WindConfig) -> Self {
        Self {
            base: config.base,
            gust_phase: 0.0,
            gust_frequency: config.gust_frequency,
            x_harmonics: config.x_harmonics.clone(),
            y_harmonics: config.y_harmonics.clone(),
        }
    }

    pub fn with_phase(mut self, phase: f32) -> Self {
        self.gust_phase = phase;
        self
    }

    pub fn phase(&self) -> f32 {
        self.gust_phase
    }

    /// Advance the gust phase; negative deltas are ignored
    pub fn advance(&mut self, dt: f32) {
        self.gust_phase += dt.max(0.0) * self.gust_frequency;
    }

    /// Current force vector: base plus the gust at the current phase
    pub fn sample(&self) -> Vec2 {
        self.sample_at(self.gust_phase)
    }

    /// Force vector at an arbitrary phase (pure)
    pub fn sample_at(&self, phase: f32) -> Vec2 {
        self.base
            + Vec2::new(
                sum_harmonics(&self.x_harmonics, phase),
                sum_harmonics(&self.y_harmonics, phase),
            )
    }

    /// Constant `k` with `|sample_at(p + d) - sample_at(p)| <= k * |d|` for all `p`, `d`
    pub fn lipschitz_bound(&self) -> f32 {
        let kx = derivative_bound(&self.x_harmonics);
        let ky = derivative_bound(&self.y_harmonics);
        (kx * kx + ky * ky).sqrt()
    }
}

fn sum_harmonics(harmonics: &[Harmonic], phase: f32) -> f32 {
    harmonics
        .iter()
        .map(|h| h.amplitude * (phase * h.frequency + h.offset).sin())
        .sum()
}

fn derivative_bound(harmonics: &[Harmonic]) -> f32 {
    harmonics
        .iter()
        .map(|h| (h.amplitude * h.frequency).abs())
        .sum()
}
