//! Page events waiting for the next frame

use crate::event::PageEvent;

/// Events pushed by the host between frames and drained at frame start.
///
/// High-rate events are coalesced as they arrive: a pointer move or resize
/// directly following one of the same kind replaces it, so a frame only
/// sees the latest position or size. Anything in between (a click, a
/// visibility change) keeps both sides, so ordering against discrete
/// events is preserved.
#[derive(Debug, Default)]
pub struct EventQueue {
    pending: Vec<PageEvent>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: PageEvent) {
        if let Some(last) = self.pending.last_mut() {
            if supersedes(last, &event) {
                *last = event;
                return;
            }
        }
        self.pending.push(event);
    }

    /// Take every pending event in arrival order
    pub fn drain(&mut self) -> Vec<PageEvent> {
        std::mem::take(&mut self.pending)
    }

    /// Drop pending events without handling them
    pub fn clear(&mut self) {
        self.pending.clear();
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

fn supersedes(previous: &PageEvent, next: &PageEvent) -> bool {
    matches!(
        (previous, next),
        (PageEvent::PointerMove { .. }, PageEvent::PointerMove { .. })
            | (PageEvent::Resize { .. }, PageEvent::Resize { .. })
    )
}
