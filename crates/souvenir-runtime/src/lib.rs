//! Souvenir Runtime - Frame loop infrastructure
//!
//! Provides the building blocks the bubble widget is driven by:
//! - `FrameClock` - wall-clock frame delta with a stall clamp
//! - `FrameScheduler` / `FrameHost` - the continuous frame-callback chain,
//!   visibility pause/resume and synchronous teardown
//! - `SpawnTimer` - re-armable one-shot wall-clock timer
//! - `PageEvent` / `EventQueue` - host events queued for the next frame, pointer moves coalesced
//! - `PointerState` - pointer position, hover target and click counting

mod clock;
mod event;
mod event_queue;
mod input;
mod scheduler;
mod timer;

pub use clock::FrameClock;
pub use event::PageEvent;
pub use event_queue::EventQueue;
pub use input::PointerState;
pub use scheduler::{
    FrameHandle, FrameHost, FrameScheduler, FrameTick, ListenerId, SchedulerState, Signal,
    VisibilityChange,
};
pub use timer::SpawnTimer;
