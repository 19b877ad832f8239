//! The bubble widget: one owned context driving the whole simulation
//!
//! A frame always runs in the same order:
//! events → ambient timer → wind → integrate → collide → lifecycle → compact → paint.

use crate::bubble::{Bubble, BubblePool};
use crate::catalog::{Catalog, IconLoader, IconRegistry};
use crate::collision;
use crate::config::SimulationConfig;
use crate::effect::{dispatch, EffectHandler};
use crate::integrator;
use crate::lifecycle::{self, BubblePhase};
use crate::rand::BubbleRng;
use crate::session::SessionProvider;
use crate::spawn::{ClickSpawn, SpawnContext, SpawnManager};
use crate::wind::WindField;
use glam::Vec2;
use log::{debug, info, warn};
use souvenir_core::{BubbleId, Rect, Result, SouvenirError, Viewport};
use souvenir_render::{paint, BubbleSprite, SceneFrame, Surface};
use souvenir_runtime::{
    EventQueue, FrameHost, FrameScheduler, PageEvent, PointerState, SchedulerState, Signal,
    VisibilityChange,
};

/// Page layout query for the static obstacle (the content panel)
pub trait LayoutProvider {
    /// Current panel rectangle in viewport pixels; None when there is no panel
    fn obstacle(&self) -> Option<Rect>;
}

/// Everything the engine needs from the page it is mounted in
pub trait BubbleHost: FrameHost + SessionProvider + EffectHandler + IconLoader + LayoutProvider {}

impl<T> BubbleHost for T where T: FrameHost + SessionProvider + EffectHandler + IconLoader + LayoutProvider {}

/// What a click did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickOutcome {
    /// Hit a bubble and fired its effect
    Dispatched(BubbleId),
    /// First qualifying click of the session
    GuideSpawned(BubbleId),
    /// Random catalog bubble from a later qualifying click
    BubbleSpawned(BubbleId),
    /// Landed on the panel, spawned nothing, or the engine is torn down
    Ignored,
}

/// Per-frame counters
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameStats {
    pub frame: u64,
    pub dt: f32,
    pub live: usize,
    pub contacts: usize,
    pub spawned: usize,
    pub removed: usize,
    pub drawn: usize,
}

/// The mounted bubble widget.
///
/// Owns the host handle, the surface and all simulation state. Nothing is
/// global: two engines on one page are fully independent.
pub struct BubbleEngine<H: BubbleHost, S: Surface> {
    host: H,
    surface: S,
    config: SimulationConfig,
    viewport: Viewport,
    wind: WindField,
    pool: BubblePool,
    rng: BubbleRng,
    scheduler: FrameScheduler,
    spawner: SpawnManager,
    catalog: Catalog,
    icons: IconRegistry,
    pointer: PointerState,
    events: EventQueue,
    frames: u64,
    /// Click spawns since the last frame, reported in its stats
    click_spawns: usize,
}

impl<H: BubbleHost, S: Surface> BubbleEngine<H, S> {
    /// Validate the config, attach to the surface and start the frame chain.
    ///
    /// Fails with `MissingSurface` before touching the host when no drawing
    /// surface is available.
    pub fn mount(
        config: SimulationConfig,
        mut host: H,
        surface: Option<S>,
        viewport: Viewport,
    ) -> Result<Self> {
        config.validate()?;
        let Some(mut surface) = surface else {
            return Err(SouvenirError::MissingSurface);
        };
        surface.resize(viewport);

        let seed = config
            .spawn
            .seed
            .unwrap_or_else(|| seed_from_time(host.now()));
        let mut icons = IconRegistry::new();
        icons.request(&config.guide.key, &config.guide.icon, &mut host);
        for action in &config.guest_actions {
            icons.request(&action.key, &action.icon, &mut host);
        }

        let mut engine = Self {
            wind: WindField::new(&config.wind),
            pool: BubblePool::new(config.spawn.max_particles),
            rng: BubbleRng::new(seed),
            scheduler: FrameScheduler::new(config.lifecycle.max_frame_dt),
            spawner: SpawnManager::new(),
            catalog: Catalog::new(),
            icons,
            pointer: PointerState::new(),
            events: EventQueue::new(),
            frames: 0,
            click_spawns: 0,
            host,
            surface,
            config,
            viewport,
        };

        engine.scheduler.start(&mut engine.host, &Signal::ALL);
        let now = engine.host.now();
        engine.spawner.arm(now, &mut engine.rng, &engine.config);
        info!(
            "mounted at {}x{} (capacity {}, seed {})",
            viewport.width, viewport.height, engine.config.spawn.max_particles, seed
        );
        Ok(engine)
    }

    /// Queue an event for the next frame
    pub fn push_event(&mut self, event: PageEvent) {
        if self.is_torn_down() {
            return;
        }
        self.events.push(event);
    }

    /// Apply an event immediately
    pub fn handle_event(&mut self, event: PageEvent) {
        if self.is_torn_down() {
            return;
        }
        debug!("event: {}", event.kind());
        match event {
            PageEvent::Click { x, y } => {
                self.handle_click(Vec2::new(x, y));
            }
            PageEvent::PointerMove { x, y } => {
                self.pointer.process_move(Vec2::new(x, y));
                self.refresh_hover();
            }
            PageEvent::PointerLeave => self.pointer.process_leave(),
            PageEvent::VisibilityChanged { visible } => self.set_visible(visible),
            PageEvent::Resize { width, height } => self.resize(Viewport::new(width, height)),
            PageEvent::IconLoaded { key, ok } => self.icons.mark(&key, ok),
            PageEvent::CatalogLoaded { body } => self.catalog_received(&body),
        }
    }

    /// Hit-test a click: a bubble fires its effect, empty space may spawn
    pub fn handle_click(&mut self, point: Vec2) -> ClickOutcome {
        if self.is_torn_down() {
            return ClickOutcome::Ignored;
        }
        self.pointer.process_click(point);

        if let Some(id) = self.pool.topmost_at(point) {
            if let Some(bubble) = self.pool.get(id) {
                debug!("bubble {} clicked ('{}')", id, bubble.item_key);
                dispatch(&bubble.effect, &mut self.host);
            }
            return ClickOutcome::Dispatched(id);
        }

        if self.host.obstacle().is_some_and(|panel| panel.contains(point)) {
            return ClickOutcome::Ignored;
        }

        let qualifying = self.pointer.register_qualifying_click();
        let authenticated = self.host.is_authenticated();
        let mut ctx = SpawnContext {
            pool: &mut self.pool,
            rng: &mut self.rng,
            config: &self.config,
            catalog: &self.catalog,
            icons: &self.icons,
            viewport: self.viewport,
            authenticated,
        };
        let outcome = match self.spawner.on_qualifying_click(point, qualifying, &mut ctx) {
            ClickSpawn::Guide(id) => ClickOutcome::GuideSpawned(id),
            ClickSpawn::Catalog(id) => ClickOutcome::BubbleSpawned(id),
            ClickSpawn::Nothing => return ClickOutcome::Ignored,
        };
        self.click_spawns += 1;
        outcome
    }

    /// Page visibility change: hiding prunes and stops the timer, showing re-arms it
    pub fn set_visible(&mut self, visible: bool) {
        if self.is_torn_down() {
            return;
        }
        match self.scheduler.set_visible(visible) {
            VisibilityChange::Hidden => {
                let pruned = self
                    .pool
                    .prune_to(self.config.lifecycle.retained_when_hidden);
                self.spawner.stop();
                if self.pointer.hovered().is_some_and(|id| pruned.contains(&id)) {
                    self.pointer.set_hovered(None);
                }
                info!("hidden: pruned {} bubble(s), {} kept", pruned.len(), self.pool.len());
            }
            VisibilityChange::Shown => {
                let now = self.host.now();
                self.spawner.arm(now, &mut self.rng, &self.config);
                info!("visible again: spawn timer re-armed");
            }
            VisibilityChange::Unchanged => {}
        }
    }

    /// Match the surface to a new viewport size
    pub fn resize(&mut self, viewport: Viewport) {
        if self.is_torn_down() {
            return;
        }
        self.viewport = viewport;
        self.surface.resize(viewport);
        debug!("resized to {}x{}", viewport.width, viewport.height);
    }

    /// Install a fetched catalog body and request its icons.
    ///
    /// A malformed body leaves zero usable catalog items; there is no retry.
    pub fn catalog_received(&mut self, body: &str) {
        if self.is_torn_down() {
            return;
        }
        self.catalog = match Catalog::from_json(body) {
            Ok(catalog) => catalog,
            Err(err) => {
                warn!("{err}; continuing without catalog items");
                Catalog::new()
            }
        };
        for (key, item) in self.catalog.iter() {
            self.icons.request(key, &item.icon, &mut self.host);
        }
        info!("catalog loaded with {} item(s)", self.catalog.len());
    }

    /// Run one frame callback. Returns None once torn down.
    pub fn frame(&mut self) -> Option<FrameStats> {
        if self.scheduler.state() != SchedulerState::Running {
            return None;
        }
        for event in self.events.drain() {
            self.handle_event(event);
        }

        let tick = self.scheduler.begin_frame(&mut self.host)?;
        self.frames += 1;
        let mut stats = FrameStats {
            frame: self.frames,
            dt: tick.dt,
            spawned: std::mem::take(&mut self.click_spawns),
            ..FrameStats::default()
        };
        if !tick.run_work {
            stats.live = self.pool.len();
            return Some(stats);
        }

        let authenticated = self.host.is_authenticated();
        let mut ctx = SpawnContext {
            pool: &mut self.pool,
            rng: &mut self.rng,
            config: &self.config,
            catalog: &self.catalog,
            icons: &self.icons,
            viewport: self.viewport,
            authenticated,
        };
        if self.spawner.poll_ambient(tick.now, &mut ctx).is_some() {
            stats.spawned += 1;
        }

        let (contacts, removed) = self.step(tick.dt);
        stats.contacts = contacts;
        stats.removed = removed;
        stats.live = self.pool.len();
        stats.drawn = self.render(tick.time);
        Some(stats)
    }

    /// Physics and lifecycle for one frame; returns (contacts, removed)
    fn step(&mut self, dt: f32) -> (usize, usize) {
        self.wind.advance(dt);
        let wind = self.wind.sample();

        for bubble in self.pool.as_mut_slice() {
            if bubble.is_removed() {
                continue;
            }
            if let Err(err) = integrator::step(bubble, wind, dt, &self.config.physics) {
                debug!("{err}; dropping bubble");
                bubble.phase = BubblePhase::Removed;
            }
        }

        let obstacle = self.host.obstacle().filter(Rect::is_finite);
        let contacts =
            collision::resolve_all(self.pool.as_mut_slice(), obstacle, &self.config.physics);

        for bubble in self.pool.as_mut_slice() {
            lifecycle::advance(bubble, dt, self.viewport, &self.config.lifecycle);
        }

        let removed = self.pool.compact();
        if !removed.is_empty() {
            debug!("retired {} bubble(s)", removed.len());
        }
        self.refresh_hover();
        (contacts, removed.len())
    }

    fn render(&mut self, time: f64) -> usize {
        let hovered = self.pointer.hovered();
        let sprites: Vec<BubbleSprite<'_>> = self
            .pool
            .iter()
            .map(|b| BubbleSprite {
                id: b.id,
                center: b.position,
                radius: b.radius,
                rotation: b.rotation,
                opacity: b.opacity,
                icon: self.icons.ready_url(&b.item_key),
                hovered: hovered == Some(b.id),
            })
            .collect();
        let frame = SceneFrame {
            viewport: self.viewport,
            time,
            wind: self.wind.sample(),
            background_image: self.config.background_image.as_deref(),
            sprites: &sprites,
        };
        paint(&frame, &self.config.paint, &mut self.surface)
    }

    /// Bubbles move under a still pointer, so hover is re-tested every frame
    fn refresh_hover(&mut self) {
        let hovered = self
            .pointer
            .position()
            .and_then(|point| self.pool.topmost_at(point));
        self.pointer.set_hovered(hovered);
    }

    /// Stop everything synchronously. Safe to call more than once.
    pub fn teardown(&mut self) {
        if self.is_torn_down() {
            return;
        }
        self.scheduler.teardown(&mut self.host);
        self.spawner.stop();
        self.events.clear();
        let released = self.pool.clear();
        self.pointer.set_hovered(None);
        self.surface.release();
        info!("torn down, released {} bubble(s)", released.len());
    }

    pub fn is_torn_down(&self) -> bool {
        self.scheduler.state() == SchedulerState::TornDown
    }

    // --- Query methods ---

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn bubbles(&self) -> &[Bubble] {
        self.pool.as_slice()
    }

    pub fn bubble(&self, id: BubbleId) -> Option<&Bubble> {
        self.pool.get(id)
    }

    pub fn live_count(&self) -> usize {
        self.pool.len()
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn icons(&self) -> &IconRegistry {
        &self.icons
    }

    pub fn pointer(&self) -> &PointerState {
        &self.pointer
    }

    pub fn wind(&self) -> &WindField {
        &self.wind
    }

    pub fn scheduler(&self) -> &FrameScheduler {
        &self.scheduler
    }

    pub fn spawner(&self) -> &SpawnManager {
        &self.spawner
    }

    pub fn frame_count(&self) -> u64 {
        self.frames
    }
}

impl<H: BubbleHost, S: Surface> Drop for BubbleEngine<H, S> {
    fn drop(&mut self) {
        self.teardown();
    }
}

fn seed_from_time(now: f64) -> u32 {
    let bits = now.to_bits();
    (bits ^ (bits >> 32)) as u32
}
