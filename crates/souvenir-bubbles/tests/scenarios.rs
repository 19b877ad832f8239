//! End-to-end runs of the mounted engine against a scripted page host

use souvenir_bubbles::{
    BubbleEngine, BubbleOrigin, ClickOutcome, EffectHandler, IconLoader, LayoutProvider,
    Session, SessionProvider, SimulationConfig, SpawnEffect,
};
use souvenir_core::{Rect, SouvenirError, Vec2, Viewport};
use souvenir_render::RecordingSurface;
use souvenir_runtime::{FrameHandle, FrameHost, ListenerId, PageEvent, Signal};
use std::collections::HashSet;

const VIEW: Viewport = Viewport::new(1280.0, 720.0);
const FRAME: f64 = 1.0 / 60.0;

#[derive(Default)]
struct PageHost {
    now: f64,
    next_handle: u64,
    live_frames: HashSet<u64>,
    listeners: HashSet<u64>,
    session: Option<Session>,
    panel: Option<Rect>,
    icon_requests: Vec<(String, String)>,
    navigations: Vec<String>,
    logins: u32,
    dialogues: u32,
}

impl PageHost {
    fn signed_in() -> Self {
        Self {
            session: Some(Session {
                did: "did:plc:visitor".into(),
            }),
            ..Self::default()
        }
    }
}

impl FrameHost for PageHost {
    fn now(&self) -> f64 {
        self.now
    }

    fn request_frame(&mut self) -> FrameHandle {
        self.next_handle += 1;
        self.live_frames.insert(self.next_handle);
        FrameHandle(self.next_handle)
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        self.live_frames.remove(&handle.0);
    }

    fn subscribe(&mut self, _signal: Signal) -> ListenerId {
        self.next_handle += 1;
        self.listeners.insert(self.next_handle);
        ListenerId(self.next_handle)
    }

    fn unsubscribe(&mut self, id: ListenerId) {
        self.listeners.remove(&id.0);
    }
}

impl SessionProvider for PageHost {
    fn session(&self) -> Option<Session> {
        self.session.clone()
    }
}

impl EffectHandler for PageHost {
    fn navigate(&mut self, key: &str) {
        self.navigations.push(key.to_string());
    }

    fn open_login(&mut self) {
        self.logins += 1;
    }

    fn open_dialogue(&mut self) {
        self.dialogues += 1;
    }
}

impl IconLoader for PageHost {
    fn request_icon(&mut self, key: &str, url: &str) {
        self.icon_requests.push((key.to_string(), url.to_string()));
    }
}

impl LayoutProvider for PageHost {
    fn obstacle(&self) -> Option<Rect> {
        self.panel
    }
}

type Engine = BubbleEngine<PageHost, RecordingSurface>;

const CATALOG: &str = r#"{
    "shell": { "icon": "/icons/shell.png", "name": "Shell" },
    "kite": { "icon": "/icons/kite.png", "name": "Kite", "category": "toys" }
}"#;

fn seeded_config() -> SimulationConfig {
    let mut config = SimulationConfig::default();
    config.spawn.seed = Some(7);
    config
}

/// Ambient timer fires every frame
fn rapid_config() -> SimulationConfig {
    let mut config = seeded_config();
    config.spawn.spawn_interval_min = 0.0;
    config.spawn.spawn_interval_max = 0.0;
    config
}

fn mount(config: SimulationConfig, host: PageHost) -> Engine {
    BubbleEngine::mount(config, host, Some(RecordingSurface::new(VIEW)), VIEW)
        .expect("mount should succeed")
}

/// Report every requested icon as decoded
fn load_icons(engine: &mut Engine) {
    let keys: Vec<String> = engine
        .host()
        .icon_requests
        .iter()
        .map(|(key, _)| key.clone())
        .collect();
    for key in keys {
        engine.handle_event(PageEvent::IconLoaded { key, ok: true });
    }
}

/// Advance the host clock and fire the pending frame callback
fn tick(engine: &mut Engine, dt: f64) -> Option<souvenir_bubbles::FrameStats> {
    let pending = engine.scheduler().pending_frame();
    let host = engine.host_mut();
    host.now += dt;
    if let Some(handle) = pending {
        host.live_frames.remove(&handle.0);
    }
    engine.frame()
}

fn run(engine: &mut Engine, frames: usize) {
    for _ in 0..frames {
        tick(engine, FRAME);
    }
}

#[test]
fn mount_without_surface_fails() {
    let result = BubbleEngine::<PageHost, RecordingSurface>::mount(
        seeded_config(),
        PageHost::default(),
        None,
        VIEW,
    );
    assert!(matches!(result, Err(SouvenirError::MissingSurface)));
}

#[test]
fn mount_requests_builtin_icons_and_subscribes() {
    let engine = mount(seeded_config(), PageHost::default());
    let host = engine.host();
    assert_eq!(host.listeners.len(), Signal::ALL.len());
    assert_eq!(host.live_frames.len(), 1);
    let keys: Vec<&str> = host.icon_requests.iter().map(|(k, _)| k.as_str()).collect();
    assert!(keys.contains(&"guide"));
    assert!(keys.contains(&"sign_in"));
    assert!(keys.contains(&"say_hello"));
    assert!(engine.spawner().timer().is_armed());
}

#[test]
fn first_click_spawns_exactly_one_guide() {
    let mut engine = mount(seeded_config(), PageHost::default());
    run(&mut engine, 2);

    let outcome = engine.handle_click(Vec2::new(100.0, 200.0));
    let ClickOutcome::GuideSpawned(id) = outcome else {
        panic!("expected the guide, got {outcome:?}");
    };
    let guide = engine.bubble(id).unwrap();
    assert_eq!(guide.position, Vec2::new(100.0, 200.0));
    assert_eq!(guide.effect, SpawnEffect::OpenDialogue);
    assert_eq!(guide.origin, BubbleOrigin::Guide);

    // Empty space again: no second guide
    let second = engine.handle_click(Vec2::new(900.0, 600.0));
    assert!(!matches!(second, ClickOutcome::GuideSpawned(_)));
    let guides = engine
        .bubbles()
        .iter()
        .filter(|b| b.origin == BubbleOrigin::Guide)
        .count();
    assert_eq!(guides, 1);

    // Clicking the guide itself opens the dialogue
    assert_eq!(engine.handle_click(Vec2::new(100.0, 200.0)), ClickOutcome::Dispatched(id));
    assert_eq!(engine.host().dialogues, 1);
}

#[test]
fn panel_clicks_do_not_qualify() {
    let host = PageHost {
        panel: Some(Rect::new(400.0, 100.0, 880.0, 620.0)),
        ..PageHost::default()
    };
    let mut engine = mount(seeded_config(), host);
    assert_eq!(engine.handle_click(Vec2::new(500.0, 300.0)), ClickOutcome::Ignored);
    assert_eq!(engine.pointer().qualifying_clicks(), 0);
    assert_eq!(engine.pointer().total_clicks(), 1);
    assert!(!engine.spawner().guide_shown());
}

#[test]
fn live_set_never_exceeds_capacity() {
    let mut engine = mount(rapid_config(), PageHost::signed_in());
    engine.catalog_received(CATALOG);
    load_icons(&mut engine);

    let capacity = engine.config().spawn.max_particles;
    let mut peak = 0;
    for _ in 0..600 {
        tick(&mut engine, FRAME);
        assert!(engine.live_count() <= capacity);
        peak = peak.max(engine.live_count());
    }
    assert_eq!(peak, capacity);

    for _ in 0..20 {
        engine.handle_click(Vec2::new(640.0, 30.0));
        assert!(engine.live_count() <= capacity);
    }
}

#[test]
fn hiding_prunes_to_newest_and_resume_is_smooth() {
    let mut engine = mount(rapid_config(), PageHost::default());
    load_icons(&mut engine);
    run(&mut engine, 12);
    assert_eq!(engine.live_count(), 10);
    let newest: Vec<_> = engine.bubbles()[7..].iter().map(|b| b.id).collect();

    engine.push_event(PageEvent::VisibilityChanged { visible: false });
    let hidden = tick(&mut engine, FRAME).unwrap();
    assert_eq!(engine.live_count(), 3);
    assert_eq!(hidden.live, 3);
    assert_eq!(hidden.drawn, 0);
    let kept: Vec<_> = engine.bubbles().iter().map(|b| b.id).collect();
    assert_eq!(kept, newest);
    assert!(!engine.spawner().timer().is_armed());

    // A long hidden stretch keeps the chain alive but does no work
    for _ in 0..30 {
        tick(&mut engine, 2.0).unwrap();
    }
    assert_eq!(engine.live_count(), 3);
    assert!(engine.scheduler().pending_frame().is_some());

    engine.handle_event(PageEvent::VisibilityChanged { visible: true });
    assert!(engine.spawner().timer().is_armed());
    let resumed = tick(&mut engine, 30.0).unwrap();
    assert_eq!(resumed.dt, 0.0);
    assert!(engine.live_count() <= 4);
}

#[test]
fn bubbles_stay_inside_bounds() {
    let host = PageHost {
        panel: Some(Rect::new(420.0, 120.0, 860.0, 600.0)),
        ..PageHost::signed_in()
    };
    let mut engine = mount(rapid_config(), host);
    engine.catalog_received(CATALOG);
    load_icons(&mut engine);

    let margin = engine.config().lifecycle.bounds_margin;
    for frame in 0..3600 {
        let stats = tick(&mut engine, FRAME).unwrap();
        assert_eq!(stats.frame, frame as u64 + 1);
        for bubble in engine.bubbles() {
            let p = bubble.position;
            assert!(p.is_finite());
            assert!(p.x <= VIEW.width + margin, "past the trailing edge: {p}");
            assert!(p.y >= -margin && p.y <= VIEW.height + margin, "y out of bounds: {p}");
            assert!((0.0..=1.0).contains(&bubble.opacity));
        }
    }
}

#[test]
fn inverted_panel_from_layout_is_tolerated() {
    let host = PageHost {
        panel: Some(Rect::new(860.0, 600.0, 420.0, 120.0)),
        ..PageHost::default()
    };
    let mut engine = mount(rapid_config(), host);
    load_icons(&mut engine);
    for _ in 0..1200 {
        tick(&mut engine, FRAME).unwrap();
        for bubble in engine.bubbles() {
            assert!(bubble.position.is_finite());
            let inside = bubble.position.x > 420.0
                && bubble.position.x < 860.0
                && bubble.position.y > 120.0
                && bubble.position.y < 600.0;
            assert!(!inside, "bubble {} inside the panel", bubble.id);
        }
    }
    assert_eq!(engine.handle_click(Vec2::new(600.0, 300.0)), ClickOutcome::Ignored);
}

#[test]
fn non_finite_panel_is_ignored() {
    let host = PageHost {
        panel: Some(Rect::new(f32::NAN, 0.0, 500.0, 500.0)),
        ..PageHost::default()
    };
    let mut engine = mount(rapid_config(), host);
    load_icons(&mut engine);
    run(&mut engine, 120);
    assert!(engine.live_count() > 0);
}

#[test]
fn stalled_clock_is_clamped() {
    let mut engine = mount(seeded_config(), PageHost::default());
    tick(&mut engine, FRAME);
    let stats = tick(&mut engine, 5.0).unwrap();
    assert!(stats.dt <= 0.1 + 1e-6);
}

#[test]
fn malformed_catalog_leaves_no_items() {
    let mut engine = mount(rapid_config(), PageHost::signed_in());
    engine.push_event(PageEvent::CatalogLoaded {
        body: "<html>502</html>".into(),
    });
    run(&mut engine, 5);
    assert!(engine.catalog().is_empty());

    load_icons(&mut engine);
    run(&mut engine, 30);
    assert_eq!(engine.live_count(), 0);
    assert!(tick(&mut engine, FRAME).is_some());
}

#[test]
fn failed_icons_are_never_spawned() {
    let mut engine = mount(rapid_config(), PageHost::signed_in());
    engine.catalog_received(CATALOG);
    engine.handle_event(PageEvent::IconLoaded {
        key: "shell".into(),
        ok: true,
    });
    engine.handle_event(PageEvent::IconLoaded {
        key: "kite".into(),
        ok: false,
    });

    run(&mut engine, 60);
    assert!(engine.live_count() > 0);
    assert!(engine.bubbles().iter().all(|b| b.item_key == "shell"));
}

#[test]
fn clicking_a_bubble_fires_its_effect_once() {
    let mut engine = mount(rapid_config(), PageHost::signed_in());
    engine.catalog_received(CATALOG);
    load_icons(&mut engine);
    run(&mut engine, 1);
    assert_eq!(engine.live_count(), 1);

    let target = engine.bubbles()[0].position;
    let ClickOutcome::Dispatched(id) = engine.handle_click(target) else {
        panic!("expected a bubble hit");
    };
    let SpawnEffect::Navigate(key) = engine.bubble(id).unwrap().effect.clone() else {
        panic!("signed-in bubbles navigate");
    };
    let host = engine.host();
    assert_eq!(host.navigations, vec![key]);
    assert_eq!(host.logins + host.dialogues, 0);
    assert_eq!(engine.pointer().qualifying_clicks(), 0);
}

#[test]
fn guest_bubbles_open_login_or_dialogue() {
    let mut engine = mount(rapid_config(), PageHost::default());
    load_icons(&mut engine);
    run(&mut engine, 1);

    let bubble = &engine.bubbles()[0];
    let (target, effect) = (bubble.position, bubble.effect.clone());
    engine.handle_click(target);
    let host = engine.host();
    match effect {
        SpawnEffect::OpenLogin => assert_eq!((host.logins, host.dialogues), (1, 0)),
        SpawnEffect::OpenDialogue => assert_eq!((host.logins, host.dialogues), (0, 1)),
        SpawnEffect::Navigate(_) => panic!("guests never get navigation bubbles"),
    }
}

#[test]
fn hover_follows_the_pointer() {
    let mut engine = mount(rapid_config(), PageHost::default());
    load_icons(&mut engine);
    run(&mut engine, 1);
    let bubble = &engine.bubbles()[0];
    let (id, center) = (bubble.id, bubble.position);

    engine.handle_event(PageEvent::PointerMove {
        x: center.x,
        y: center.y,
    });
    assert_eq!(engine.pointer().hovered(), Some(id));

    engine.handle_event(PageEvent::PointerLeave);
    assert_eq!(engine.pointer().hovered(), None);
}

#[test]
fn frames_paint_every_live_bubble() {
    let mut engine = mount(rapid_config(), PageHost::default());
    load_icons(&mut engine);
    run(&mut engine, 40);
    let stats = tick(&mut engine, FRAME).unwrap();
    assert!(stats.drawn > 0);
    assert_eq!(engine.surface().bubble_count(), stats.drawn);
}

#[test]
fn resize_updates_the_surface() {
    let mut engine = mount(seeded_config(), PageHost::default());
    engine.push_event(PageEvent::Resize {
        width: 800.0,
        height: 600.0,
    });
    tick(&mut engine, FRAME);
    assert_eq!(engine.viewport(), Viewport::new(800.0, 600.0));
    assert_eq!(engine.surface().viewport(), Viewport::new(800.0, 600.0));
}

#[test]
fn teardown_releases_everything() {
    let mut engine = mount(rapid_config(), PageHost::default());
    load_icons(&mut engine);
    run(&mut engine, 20);
    assert!(engine.live_count() > 0);

    engine.teardown();
    let host = engine.host();
    assert!(host.live_frames.is_empty());
    assert!(host.listeners.is_empty());
    assert!(engine.surface().is_released());
    assert_eq!(engine.live_count(), 0);
    assert!(!engine.spawner().timer().is_armed());

    assert!(engine.frame().is_none());
    assert_eq!(engine.handle_click(Vec2::new(10.0, 10.0)), ClickOutcome::Ignored);
    engine.teardown();
    assert!(engine.is_torn_down());
}
