//! Continuous frame-callback chain with visibility pause and teardown
//!
//! The host owns the real callback mechanism (`requestAnimationFrame`, a
//! winit redraw loop, a headless stepper). The scheduler only tracks which
//! frame is pending, which global listeners it registered, and whether work
//! should run this frame.

use crate::clock::FrameClock;
use log::debug;

/// Handle for a requested frame callback
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameHandle(pub u64);

/// Handle for a listener registered on a shared page signal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(pub u64);

/// Shared page signals the widget listens to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Signal {
    Visibility,
    Click,
    PointerMove,
    Resize,
}

impl Signal {
    pub const ALL: [Signal; 4] = [
        Signal::Visibility,
        Signal::Click,
        Signal::PointerMove,
        Signal::Resize,
    ];
}

/// Host-side frame and listener services
pub trait FrameHost {
    /// Current wall-clock time in seconds
    fn now(&self) -> f64;

    /// Schedule the next frame callback
    fn request_frame(&mut self) -> FrameHandle;

    /// Cancel a previously requested frame callback
    fn cancel_frame(&mut self, handle: FrameHandle);

    /// Register a listener on a shared page signal
    fn subscribe(&mut self, signal: Signal) -> ListenerId;

    /// Remove a listener registered with [`FrameHost::subscribe`]
    fn unsubscribe(&mut self, id: ListenerId);
}

/// Lifecycle of the frame chain
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    /// Constructed, no frame requested yet
    Idle,
    /// A frame chain is live
    Running,
    /// Torn down; no frame will run again
    TornDown,
}

/// Result of a visibility update
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisibilityChange {
    Hidden,
    Shown,
    Unchanged,
}

/// Per-frame timing handed to the simulation
#[derive(Debug, Clone, Copy)]
pub struct FrameTick {
    /// Host timestamp of this frame in seconds
    pub now: f64,
    /// Clamped delta since the previous frame
    pub dt: f32,
    /// Accumulated simulated time
    pub time: f64,
    /// False while the page is hidden; physics and paint are skipped
    pub run_work: bool,
}

pub struct FrameScheduler {
    clock: FrameClock,
    pending: Option<FrameHandle>,
    listeners: Vec<ListenerId>,
    visible: bool,
    state: SchedulerState,
}

impl FrameScheduler {
    pub fn new(max_frame_dt: f64) -> Self {
        Self {
            clock: FrameClock::with_max_delta(max_frame_dt),
            pending: None,
            listeners: Vec::new(),
            visible: true,
            state: SchedulerState::Idle,
        }
    }

    pub fn state(&self) -> SchedulerState {
        self.state
    }

    pub fn pending_frame(&self) -> Option<FrameHandle> {
        self.pending
    }

    /// Register listeners on `signals` and request the first frame
    pub fn start(&mut self, host: &mut dyn FrameHost, signals: &[Signal]) {
        if self.state != SchedulerState::Idle {
            return;
        }
        for signal in signals {
            self.listeners.push(host.subscribe(*signal));
        }
        self.pending = Some(host.request_frame());
        self.state = SchedulerState::Running;
        debug!("frame chain started with {} listener(s)", self.listeners.len());
    }

    /// Enter a frame callback: consume the pending handle, compute the
    /// clamped delta and request the next frame before any work runs.
    ///
    /// Returns None after teardown; the callback must then do nothing.
    pub fn begin_frame(&mut self, host: &mut dyn FrameHost) -> Option<FrameTick> {
        if self.state != SchedulerState::Running {
            return None;
        }
        self.pending = None;

        let now = host.now();
        let dt = self.clock.tick(now);

        // Keep the chain alive while hidden so work resumes on return.
        self.pending = Some(host.request_frame());

        Some(FrameTick {
            now,
            dt: dt as f32,
            time: self.clock.total_time,
            run_work: self.visible,
        })
    }

    /// Record a visibility change. Becoming visible resets the clock so the
    /// first frame back integrates nothing.
    pub fn set_visible(&mut self, visible: bool) -> VisibilityChange {
        if visible == self.visible {
            return VisibilityChange::Unchanged;
        }
        self.visible = visible;
        if visible {
            self.clock.reset();
            VisibilityChange::Shown
        } else {
            VisibilityChange::Hidden
        }
    }

    /// Cancel the pending frame and remove every registered listener.
    /// Idempotent.
    pub fn teardown(&mut self, host: &mut dyn FrameHost) {
        if self.state == SchedulerState::TornDown {
            return;
        }
        if let Some(handle) = self.pending.take() {
            host.cancel_frame(handle);
        }
        for id in self.listeners.drain(..) {
            host.unsubscribe(id);
        }
        self.state = SchedulerState::TornDown;
        debug!("frame chain torn down");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[derive(Default)]
    struct FakeHost {
        now: f64,
        next_handle: u64,
        live_frames: HashSet<u64>,
        listeners: HashSet<u64>,
    }

    impl FrameHost for FakeHost {
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

    /// Simulate the host invoking the pending callback
    fn fire(host: &mut FakeHost, scheduler: &mut FrameScheduler) -> Option<FrameTick> {
        if let Some(handle) = scheduler.pending_frame() {
            host.live_frames.remove(&handle.0);
        }
        scheduler.begin_frame(host)
    }

    #[test]
    fn test_start_subscribes_and_requests() {
        let mut host = FakeHost::default();
        let mut scheduler = FrameScheduler::new(0.1);
        scheduler.start(&mut host, &Signal::ALL);
        assert_eq!(scheduler.state(), SchedulerState::Running);
        assert_eq!(host.listeners.len(), 4);
        assert_eq!(host.live_frames.len(), 1);
    }

    #[test]
    fn test_hidden_frames_keep_scheduling() {
        let mut host = FakeHost::default();
        let mut scheduler = FrameScheduler::new(0.1);
        scheduler.start(&mut host, &[]);
        scheduler.set_visible(false);

        host.now = 1.0;
        let tick = fire(&mut host, &mut scheduler).unwrap();
        assert!(!tick.run_work);
        assert!(scheduler.pending_frame().is_some());
    }

    #[test]
    fn test_resume_has_zero_delta() {
        let mut host = FakeHost::default();
        let mut scheduler = FrameScheduler::new(0.1);
        scheduler.start(&mut host, &[]);
        fire(&mut host, &mut scheduler);
        assert_eq!(scheduler.set_visible(false), VisibilityChange::Hidden);
        host.now = 50.0;
        fire(&mut host, &mut scheduler);
        assert_eq!(scheduler.set_visible(true), VisibilityChange::Shown);
        host.now = 90.0;
        let tick = fire(&mut host, &mut scheduler).unwrap();
        assert_eq!(tick.dt, 0.0);
        assert!(tick.run_work);
    }

    #[test]
    fn test_teardown_cancels_everything() {
        let mut host = FakeHost::default();
        let mut scheduler = FrameScheduler::new(0.1);
        scheduler.start(&mut host, &Signal::ALL);
        fire(&mut host, &mut scheduler);
        assert_eq!(host.live_frames.len(), 1);

        scheduler.teardown(&mut host);
        assert!(host.live_frames.is_empty());
        assert!(host.listeners.is_empty());
        assert!(scheduler.begin_frame(&mut host).is_none());

        // Second teardown is a no-op
        scheduler.teardown(&mut host);
        assert_eq!(scheduler.state(), SchedulerState::TornDown);
    }
}
