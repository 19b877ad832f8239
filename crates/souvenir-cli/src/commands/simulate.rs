//! Headless simulation run

use anyhow::{Context, Result};
use souvenir_bubbles::{
    BubbleEngine, ClickOutcome, EffectHandler, FrameStats, IconLoader, LayoutProvider, Session,
    SessionProvider, SimulationConfig,
};
use souvenir_core::{Rect, Vec2, Viewport};
use souvenir_render::RecordingSurface;
use souvenir_runtime::{FrameHandle, FrameHost, ListenerId, PageEvent, Signal};

pub struct SimulateArgs {
    pub seconds: f64,
    pub fps: u32,
    pub config: Option<String>,
    pub catalog: Option<String>,
    pub authenticated: bool,
    pub clicks: Vec<[f32; 2]>,
    pub panel: Option<[f32; 4]>,
    pub width: f32,
    pub height: f32,
    pub seed: Option<u32>,
    pub report_every: u64,
}

/// Page stand-in with a manual clock. Icons "load" on the next frame
/// unless their URL is empty.
struct HeadlessHost {
    now: f64,
    next_handle: u64,
    pending_frame: Option<FrameHandle>,
    listeners: usize,
    session: Option<Session>,
    panel: Option<Rect>,
    icon_results: Vec<(String, bool)>,
    effects: Vec<String>,
}

impl HeadlessHost {
    fn new(authenticated: bool, panel: Option<Rect>) -> Self {
        Self {
            now: 0.0,
            next_handle: 0,
            pending_frame: None,
            listeners: 0,
            session: authenticated.then(|| Session {
                did: "did:example:headless".into(),
            }),
            panel,
            icon_results: Vec::new(),
            effects: Vec::new(),
        }
    }
}

impl FrameHost for HeadlessHost {
    fn now(&self) -> f64 {
        self.now
    }

    fn request_frame(&mut self) -> FrameHandle {
        self.next_handle += 1;
        let handle = FrameHandle(self.next_handle);
        self.pending_frame = Some(handle);
        handle
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        if self.pending_frame == Some(handle) {
            self.pending_frame = None;
        }
    }

    fn subscribe(&mut self, _signal: Signal) -> ListenerId {
        self.next_handle += 1;
        self.listeners += 1;
        ListenerId(self.next_handle)
    }

    fn unsubscribe(&mut self, _id: ListenerId) {
        self.listeners = self.listeners.saturating_sub(1);
    }
}

impl SessionProvider for HeadlessHost {
    fn session(&self) -> Option<Session> {
        self.session.clone()
    }
}

impl EffectHandler for HeadlessHost {
    fn navigate(&mut self, key: &str) {
        self.effects.push(format!("navigate:{}", key));
    }

    fn open_login(&mut self) {
        self.effects.push("login".into());
    }

    fn open_dialogue(&mut self) {
        self.effects.push("dialogue".into());
    }
}

impl IconLoader for HeadlessHost {
    fn request_icon(&mut self, key: &str, url: &str) {
        self.icon_results.push((key.to_string(), !url.trim().is_empty()));
    }
}

impl LayoutProvider for HeadlessHost {
    fn obstacle(&self) -> Option<Rect> {
        self.panel
    }
}

type Engine = BubbleEngine<HeadlessHost, RecordingSurface>;

pub fn run(args: SimulateArgs) -> Result<()> {
    if args.fps == 0 {
        anyhow::bail!("--fps must be at least 1");
    }

    let mut config = match &args.config {
        Some(path) => SimulationConfig::load(path)
            .with_context(|| format!("Failed to load config: {}", path))?,
        None => SimulationConfig::default(),
    };
    if args.seed.is_some() {
        config.spawn.seed = args.seed;
    }

    let viewport = Viewport::new(args.width, args.height);
    let panel = args.panel.map(|[l, t, r, b]| Rect::new(l, t, r, b));
    let host = HeadlessHost::new(args.authenticated, panel);
    let surface = RecordingSurface::new(viewport);
    let mut engine =
        BubbleEngine::mount(config, host, Some(surface), viewport).context("Failed to mount")?;

    if let Some(path) = &args.catalog {
        let body = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read catalog: {}", path))?;
        engine.push_event(PageEvent::CatalogLoaded { body });
    }

    println!(
        "Simulating {:.1}s at {} fps ({}x{}, {})",
        args.seconds,
        args.fps,
        args.width,
        args.height,
        if args.authenticated { "signed in" } else { "guest" }
    );

    let frame_dt = 1.0 / args.fps as f64;
    let total_frames = (args.seconds * args.fps as f64).ceil() as u64;
    // Scripted clicks are spread evenly across the run
    let click_every = total_frames / (args.clicks.len() as u64 + 1);
    let mut clicks = args.clicks.iter();
    let mut totals = FrameStats::default();

    for frame in 1..=total_frames {
        deliver_icons(&mut engine);
        engine.host_mut().now += frame_dt;

        if click_every > 0 && frame % click_every == 0 {
            if let Some([x, y]) = clicks.next() {
                let outcome = engine.handle_click(Vec2::new(*x, *y));
                println!("  click at ({}, {}): {}", x, y, describe(outcome));
            }
        }

        let Some(stats) = engine.frame() else {
            break;
        };
        totals.contacts += stats.contacts;
        totals.spawned += stats.spawned;
        totals.removed += stats.removed;

        if args.report_every > 0 && frame % args.report_every == 0 {
            println!(
                "  t={:>6.2}s  live={:>2}  contacts={:>2}  drawn={:>2}  wind=({:.1}, {:.1})",
                engine.host().now,
                stats.live,
                stats.contacts,
                stats.drawn,
                engine.wind().sample().x,
                engine.wind().sample().y
            );
        }
    }

    let live = engine.live_count();
    let frames = engine.frame_count();
    let draw_calls = engine.surface().commands().len();
    let icons_ready = engine.icons().ready_count();
    engine.teardown();
    let host = engine.host();

    println!();
    println!("Frames:      {}", frames);
    println!("Spawned:     {}", totals.spawned);
    println!("Retired:     {}", totals.removed);
    println!("Contacts:    {}", totals.contacts);
    println!("Live at end: {}", live);
    println!("Last frame:  {} draw call(s)", draw_calls);
    println!("Icons ready: {}", icons_ready);
    if !host.effects.is_empty() {
        println!("Effects:     {}", host.effects.join(", "));
    }
    println!(
        "Teardown:    {} listener(s), frame pending: {}",
        host.listeners,
        host.pending_frame.is_some()
    );

    Ok(())
}

/// Feed queued icon results back the way a page would after decoding
fn deliver_icons(engine: &mut Engine) {
    let results = std::mem::take(&mut engine.host_mut().icon_results);
    for (key, ok) in results {
        engine.push_event(PageEvent::IconLoaded { key, ok });
    }
}

fn describe(outcome: ClickOutcome) -> String {
    match outcome {
        ClickOutcome::Dispatched(id) => format!("hit bubble {}", id),
        ClickOutcome::GuideSpawned(id) => format!("guide bubble {} spawned", id),
        ClickOutcome::BubbleSpawned(id) => format!("bubble {} spawned", id),
        ClickOutcome::Ignored => "nothing".into(),
    }
}
