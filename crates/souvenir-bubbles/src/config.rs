//! Simulation configuration (parsed from TOML), immutable once the widget mounts

use glam::Vec2;
use serde::{Deserialize, Serialize};
use souvenir_core::{Result, SouvenirError};
use souvenir_render::PaintStyle;
use std::path::Path;

/// Physics tunables shared by the integrator and the collision resolver
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Per-frame multiplicative velocity decay, in (0, 1)
    pub drag: f32,
    /// Constant upward bias, scaled by each bubble's buoyancy factor
    pub buoyancy: f32,
    /// Amplitude multiplier for per-bubble turbulence
    pub turbulence_scale: f32,
    /// Horizontal turbulence amplitude before scaling
    pub turbulence_x: f32,
    /// Vertical turbulence amplitude before scaling; larger than x so bubbles drift
    pub turbulence_y: f32,
    /// Post-collision normal relative-velocity multiplier; > 1 is allowed
    pub restitution: f32,
    /// Fixed separating velocity added to both bubbles on every contact
    pub collision_bump: f32,
    /// Tangential relative velocity to angular velocity gain
    pub collision_spin: f32,
    /// Horizontal velocity to angular acceleration gain
    pub rotation_gain: f32,
    /// Pull of angular velocity back toward zero
    pub rotation_smoothing: f32,
    /// Per-frame angular velocity decay
    pub rotation_drag: f32,
    /// Radius whose mass is exactly 1
    pub reference_radius: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            drag: 0.985,
            buoyancy: 6.0,
            turbulence_scale: 1.0,
            turbulence_x: 4.0,
            turbulence_y: 14.0,
            restitution: 1.2,
            collision_bump: 25.0,
            collision_spin: 0.01,
            rotation_gain: 0.01,
            rotation_smoothing: 1.5,
            rotation_drag: 0.98,
            reference_radius: 40.0,
        }
    }
}

/// One sinusoid of the gust signal
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Harmonic {
    pub amplitude: f32,
    /// Multiplier on the gust phase
    pub frequency: f32,
    /// Phase offset in radians
    pub offset: f32,
}

impl Harmonic {
    pub const fn new(amplitude: f32, frequency: f32, offset: f32) -> Self {
        Self {
            amplitude,
            frequency,
            offset,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WindConfig {
    /// Constant bias, mostly rightward
    pub base: Vec2,
    /// Gust phase advance per second
    pub gust_frequency: f32,
    pub x_harmonics: Vec<Harmonic>,
    pub y_harmonics: Vec<Harmonic>,
}

impl Default for WindConfig {
    fn default() -> Self {
        Self {
            base: Vec2::new(18.0, -2.0),
            gust_frequency: 0.35,
            x_harmonics: vec![
                Harmonic::new(8.0, 1.0, 0.0),
                Harmonic::new(4.0, 2.7, 0.8),
                Harmonic::new(2.0, 5.3, 2.1),
            ],
            y_harmonics: vec![Harmonic::new(3.0, 0.8, 1.7), Harmonic::new(1.5, 3.1, 0.0)],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LifecycleConfig {
    /// Duration of the one-way opacity ramp after spawn
    pub fade_in_seconds: f32,
    /// Opacity reached at the end of the fade-in
    pub target_opacity: f32,
    /// Width of the band before the right edge where bubbles fade out
    pub edge_fade_distance: f32,
    /// Distance past the viewport a center may travel before removal
    pub bounds_margin: f32,
    /// Bubbles kept when the page becomes hidden
    pub retained_when_hidden: usize,
    /// Stall clamp for the frame delta, seconds
    pub max_frame_dt: f64,
}

impl Default for LifecycleConfig {
    fn default() -> Self {
        Self {
            fade_in_seconds: 0.8,
            target_opacity: 0.95,
            edge_fade_distance: 150.0,
            bounds_margin: 120.0,
            retained_when_hidden: 3,
            max_frame_dt: 0.1,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnConfig {
    /// Capacity of the live set
    pub max_particles: usize,
    /// Ambient timer re-arm bounds, seconds
    pub spawn_interval_min: f32,
    pub spawn_interval_max: f32,
    /// Radius range of ambient bubbles
    pub ambient_radius: [f32; 2],
    /// Radius range of click-spawned catalog bubbles
    pub click_radius: [f32; 2],
    pub guide_radius: f32,
    /// Initial horizontal speed range
    pub initial_speed: [f32; 2],
    /// Qualifying clicks that must pass before random click spawns start
    pub click_spawn_threshold: u32,
    /// Probability that a qualifying click past the threshold spawns a bubble
    pub click_spawn_chance: f32,
    /// Fixed RNG seed; None seeds from the host clock
    pub seed: Option<u32>,
}

impl Default for SpawnConfig {
    fn default() -> Self {
        Self {
            max_particles: 10,
            spawn_interval_min: 2.0,
            spawn_interval_max: 5.0,
            ambient_radius: [36.0, 56.0],
            click_radius: [24.0, 30.0],
            guide_radius: 48.0,
            initial_speed: [30.0, 60.0],
            click_spawn_threshold: 3,
            click_spawn_chance: 0.125,
            seed: None,
        }
    }
}

/// Follow-up effect of a guest action bubble
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionEffect {
    Login,
    Dialogue,
}

/// A bubble offered to visitors without a session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuestAction {
    pub key: String,
    pub icon: String,
    pub name: String,
    pub effect: ActionEffect,
}

/// The bubble spawned by the first qualifying click
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuideItem {
    pub key: String,
    pub icon: String,
    pub name: String,
}

impl Default for GuideItem {
    fn default() -> Self {
        Self {
            key: "guide".into(),
            icon: "/images/bubbles/guide.png".into(),
            name: "Guide".into(),
        }
    }
}

/// Complete widget configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub physics: PhysicsConfig,
    pub wind: WindConfig,
    pub lifecycle: LifecycleConfig,
    pub spawn: SpawnConfig,
    pub guide: GuideItem,
    pub guest_actions: Vec<GuestAction>,
    /// Faded contextual image painted behind the bubbles
    pub background_image: Option<String>,
    pub paint: PaintStyle,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            physics: PhysicsConfig::default(),
            wind: WindConfig::default(),
            lifecycle: LifecycleConfig::default(),
            spawn: SpawnConfig::default(),
            guide: GuideItem::default(),
            guest_actions: vec![
                GuestAction {
                    key: "sign_in".into(),
                    icon: "/images/bubbles/sign-in.png".into(),
                    name: "Sign in".into(),
                    effect: ActionEffect::Login,
                },
                GuestAction {
                    key: "say_hello".into(),
                    icon: "/images/bubbles/hello.png".into(),
                    name: "Say hello".into(),
                    effect: ActionEffect::Dialogue,
                },
            ],
            background_image: None,
            paint: PaintStyle::default(),
        }
    }
}

impl SimulationConfig {
    /// Parse and validate a TOML document. Missing sections and fields keep their defaults.
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a TOML file on disk
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&content)
    }

    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<()> {
        let p = &self.physics;
        // Open interval
        if !(p.drag > 0.0 && p.drag < 1.0) {
            return Err(SouvenirError::ValueOutOfRange {
                field: "physics.drag".into(),
                min: 0.0,
                max: 1.0,
                value: p.drag as f64,
            });
        }
        check_finite("physics.buoyancy", p.buoyancy)?;
        check_finite("physics.turbulence_scale", p.turbulence_scale)?;
        check_finite("physics.turbulence_x", p.turbulence_x)?;
        check_finite("physics.turbulence_y", p.turbulence_y)?;
        check_finite("physics.collision_spin", p.collision_spin)?;
        check_finite("physics.rotation_gain", p.rotation_gain)?;
        check_finite("physics.rotation_smoothing", p.rotation_smoothing)?;
        check_range("physics.restitution", p.restitution, 0.0, 4.0)?;
        check_range("physics.rotation_drag", p.rotation_drag, 0.0, 1.0)?;
        check_range("physics.reference_radius", p.reference_radius, f32::EPSILON, 1.0e4)?;
        check_range("physics.collision_bump", p.collision_bump, 0.0, 1.0e4)?;

        let w = &self.wind;
        check_finite("wind.base.x", w.base.x)?;
        check_finite("wind.base.y", w.base.y)?;
        check_finite("wind.gust_frequency", w.gust_frequency)?;
        for h in w.x_harmonics.iter().chain(&w.y_harmonics) {
            check_finite("wind harmonic amplitude", h.amplitude)?;
            check_finite("wind harmonic frequency", h.frequency)?;
            check_finite("wind harmonic offset", h.offset)?;
        }

        let l = &self.lifecycle;
        check_finite("lifecycle.fade_in_seconds", l.fade_in_seconds)?;
        check_range("lifecycle.target_opacity", l.target_opacity, 0.0, 1.0)?;
        check_range("lifecycle.edge_fade_distance", l.edge_fade_distance, f32::EPSILON, 1.0e5)?;
        check_range("lifecycle.bounds_margin", l.bounds_margin, 0.0, 1.0e5)?;
        check_range("lifecycle.max_frame_dt", l.max_frame_dt as f32, f32::EPSILON, 1.0)?;

        let s = &self.spawn;
        if s.max_particles == 0 {
            return Err(SouvenirError::ConfigError(
                "spawn.max_particles must be at least 1".into(),
            ));
        }
        check_range("spawn.spawn_interval_min", s.spawn_interval_min, 0.0, 3600.0)?;
        check_range(
            "spawn.spawn_interval_max",
            s.spawn_interval_max,
            s.spawn_interval_min,
            3600.0,
        )?;
        check_range("spawn.click_spawn_chance", s.click_spawn_chance, 0.0, 1.0)?;
        check_radius("spawn.ambient_radius", s.ambient_radius)?;
        check_radius("spawn.click_radius", s.click_radius)?;
        check_range("spawn.guide_radius", s.guide_radius, f32::EPSILON, 1.0e4)?;
        check_finite("spawn.initial_speed", s.initial_speed[0])?;
        check_finite("spawn.initial_speed", s.initial_speed[1])?;
        if s.initial_speed[0] > s.initial_speed[1] {
            return Err(SouvenirError::ConfigError(
                "spawn.initial_speed must be [min, max]".into(),
            ));
        }
        Ok(())
    }
}

fn check_range(field: &str, value: f32, min: f32, max: f32) -> Result<()> {
    if value.is_finite() && value >= min && value <= max {
        Ok(())
    } else {
        Err(SouvenirError::ValueOutOfRange {
            field: field.to_string(),
            min: min as f64,
            max: max as f64,
            value: value as f64,
        })
    }
}

fn check_finite(field: &str, value: f32) -> Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(SouvenirError::ConfigError(format!(
            "{} must be a finite number, got {}",
            field, value
        )))
    }
}

fn check_radius(field: &str, range: [f32; 2]) -> Result<()> {
    check_range(field, range[0], f32::EPSILON, 1.0e4)?;
    check_range(field, range[1], range[0], 1.0e4)
}
