//! Ambient and click-driven spawning
//!
//! Every path funnels through [`create_bubble`], so guide, click and ambient
//! bubbles share one set of physical initial conditions.

use crate::bubble::{mass_for_radius, BubbleInit, BubbleOrigin, BubblePool, BubbleTraits};
use crate::catalog::{Catalog, IconRegistry};
use crate::config::{ActionEffect, SimulationConfig};
use crate::effect::SpawnEffect;
use crate::rand::BubbleRng;
use glam::Vec2;
use log::debug;
use souvenir_core::{BubbleId, Viewport};
use souvenir_runtime::SpawnTimer;

/// Range of per-bubble wind sensitivity
pub const WIND_SENSITIVITY: [f32; 2] = [0.6, 1.4];
/// Range of per-bubble turbulence frequency multipliers
pub const TURBULENCE_FREQUENCY: [f32; 2] = [0.6, 1.6];
/// Range of constant per-bubble vertical drift force
pub const VERTICAL_DRIFT: [f32; 2] = [-4.0, 4.0];
/// Range of per-bubble buoyancy multipliers
pub const BUOYANCY_FACTOR: [f32; 2] = [0.7, 1.3];
/// Half-range of the initial vertical speed
pub const INITIAL_VERTICAL_SPEED: f32 = 8.0;
/// Ambient bubbles enter at a height within this fraction band of the viewport
pub const AMBIENT_BAND: [f32; 2] = [0.2, 0.8];

/// What to create; physical constants are filled in by [`create_bubble`]
#[derive(Debug, Clone)]
pub struct SpawnRequest {
    pub item_key: String,
    pub effect: SpawnEffect,
    pub origin: BubbleOrigin,
    pub position: Vec2,
    pub radius: f32,
}

/// Create one bubble. Returns None when the live set is at capacity.
pub fn create_bubble(
    pool: &mut BubblePool,
    rng: &mut BubbleRng,
    config: &SimulationConfig,
    request: SpawnRequest,
) -> Option<BubbleId> {
    if pool.is_full() {
        debug!("spawn of '{}' skipped: live set at capacity", request.item_key);
        return None;
    }

    let traits = BubbleTraits {
        wind_sensitivity: rng.range(WIND_SENSITIVITY[0], WIND_SENSITIVITY[1]),
        turbulence_phase: rng.range(0.0, std::f32::consts::TAU),
        turbulence_frequency: rng.range(TURBULENCE_FREQUENCY[0], TURBULENCE_FREQUENCY[1]),
        vertical_drift_bias: rng.range(VERTICAL_DRIFT[0], VERTICAL_DRIFT[1]),
        buoyancy_factor: rng.range(BUOYANCY_FACTOR[0], BUOYANCY_FACTOR[1]),
    };
    let velocity = Vec2::new(
        rng.range(config.spawn.initial_speed[0], config.spawn.initial_speed[1]),
        rng.range(-INITIAL_VERTICAL_SPEED, INITIAL_VERTICAL_SPEED),
    );

    let bubble = pool.spawn(BubbleInit {
        item_key: request.item_key,
        effect: request.effect,
        origin: request.origin,
        position: request.position,
        velocity,
        radius: request.radius,
        mass: mass_for_radius(request.radius, config.physics.reference_radius),
        traits,
    })?;
    debug!(
        "spawned {:?} bubble {} ('{}') at ({:.0}, {:.0})",
        bubble.origin, bubble.id, bubble.item_key, bubble.position.x, bubble.position.y
    );
    Some(bubble.id)
}

/// A spawnable key and the effect its bubble will carry
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub key: String,
    pub effect: SpawnEffect,
}

/// Keys the ambient timer may spawn right now.
///
/// Signed-in visitors get catalog items that navigate; guests get the
/// configured action items. Only keys with a decoded icon qualify.
pub fn ambient_candidates(
    catalog: &Catalog,
    icons: &IconRegistry,
    config: &SimulationConfig,
    authenticated: bool,
) -> Vec<Candidate> {
    if authenticated {
        return catalog_candidates(catalog, icons);
    }
    config
        .guest_actions
        .iter()
        .filter(|action| icons.is_ready(&action.key))
        .map(|action| Candidate {
            key: action.key.clone(),
            effect: match action.effect {
                ActionEffect::Login => SpawnEffect::OpenLogin,
                ActionEffect::Dialogue => SpawnEffect::OpenDialogue,
            },
        })
        .collect()
}

/// Catalog keys with a decoded icon, each wired to navigation
pub fn catalog_candidates(catalog: &Catalog, icons: &IconRegistry) -> Vec<Candidate> {
    catalog
        .iter()
        .filter(|(key, _)| icons.is_ready(key))
        .map(|(key, _)| Candidate {
            key: key.clone(),
            effect: SpawnEffect::Navigate(key.clone()),
        })
        .collect()
}

/// Borrowed simulation state a spawn decision needs
pub struct SpawnContext<'a> {
    pub pool: &'a mut BubblePool,
    pub rng: &'a mut BubbleRng,
    pub config: &'a SimulationConfig,
    pub catalog: &'a Catalog,
    pub icons: &'a IconRegistry,
    pub viewport: Viewport,
    pub authenticated: bool,
}

/// Outcome of a qualifying click
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickSpawn {
    Guide(BubbleId),
    Catalog(BubbleId),
    Nothing,
}

/// Ambient timer plus the session-scoped guide flag
#[derive(Debug, Default)]
pub struct SpawnManager {
    timer: SpawnTimer,
    guide_shown: bool,
}

impl SpawnManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn timer(&self) -> &SpawnTimer {
        &self.timer
    }

    pub fn guide_shown(&self) -> bool {
        self.guide_shown
    }

    /// Re-arm the ambient timer with a random interval in the configured bounds
    pub fn arm(&mut self, now: f64, rng: &mut BubbleRng, config: &SimulationConfig) {
        let interval = rng.range(config.spawn.spawn_interval_min, config.spawn.spawn_interval_max);
        self.timer.arm(now, interval as f64);
    }

    pub fn stop(&mut self) {
        self.timer.stop();
    }

    /// Fire the ambient timer if due: attempt one spawn and re-arm
    pub fn poll_ambient(&mut self, now: f64, ctx: &mut SpawnContext<'_>) -> Option<BubbleId> {
        if !self.timer.poll(now) {
            return None;
        }
        let spawned = self.spawn_ambient(ctx);
        self.arm(now, ctx.rng, ctx.config);
        spawned
    }

    /// One ambient spawn attempt entering from the left edge
    pub fn spawn_ambient(&mut self, ctx: &mut SpawnContext<'_>) -> Option<BubbleId> {
        if ctx.pool.is_full() {
            return None;
        }
        let candidates = ambient_candidates(ctx.catalog, ctx.icons, ctx.config, ctx.authenticated);
        let Some(index) = ctx.rng.pick_index(candidates.len()) else {
            debug!("ambient spawn skipped: no usable items yet");
            return None;
        };
        let candidate = candidates[index].clone();

        let [r_min, r_max] = ctx.config.spawn.ambient_radius;
        let radius = ctx.rng.range(r_min, r_max);
        let height = ctx.viewport.height;
        let y = ctx.rng.range(height * AMBIENT_BAND[0], height * AMBIENT_BAND[1]);

        create_bubble(
            ctx.pool,
            ctx.rng,
            ctx.config,
            SpawnRequest {
                item_key: candidate.key,
                effect: candidate.effect,
                origin: BubbleOrigin::Ambient,
                position: Vec2::new(-radius, y),
                radius,
            },
        )
    }

    /// Handle a click on empty space. `qualifying_clicks` includes this click.
    pub fn on_qualifying_click(
        &mut self,
        position: Vec2,
        qualifying_clicks: u32,
        ctx: &mut SpawnContext<'_>,
    ) -> ClickSpawn {
        if !self.guide_shown {
            let request = SpawnRequest {
                item_key: ctx.config.guide.key.clone(),
                effect: SpawnEffect::OpenDialogue,
                origin: BubbleOrigin::Guide,
                position,
                radius: ctx.config.spawn.guide_radius,
            };
            return match create_bubble(ctx.pool, ctx.rng, ctx.config, request) {
                Some(id) => {
                    self.guide_shown = true;
                    ClickSpawn::Guide(id)
                }
                None => ClickSpawn::Nothing,
            };
        }

        if qualifying_clicks <= ctx.config.spawn.click_spawn_threshold
            || !ctx.rng.chance(ctx.config.spawn.click_spawn_chance)
        {
            return ClickSpawn::Nothing;
        }

        let candidates = catalog_candidates(ctx.catalog, ctx.icons);
        let Some(index) = ctx.rng.pick_index(candidates.len()) else {
            return ClickSpawn::Nothing;
        };
        let candidate = candidates[index].clone();
        let [r_min, r_max] = ctx.config.spawn.click_radius;
        let radius = ctx.rng.range(r_min, r_max);

        create_bubble(
            ctx.pool,
            ctx.rng,
            ctx.config,
            SpawnRequest {
                item_key: candidate.key,
                effect: candidate.effect,
                origin: BubbleOrigin::Click,
                position,
                radius,
            },
        )
        .map_or(ClickSpawn::Nothing, ClickSpawn::Catalog)
    }
}
