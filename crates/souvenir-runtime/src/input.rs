//! Pointer state management

use souvenir_core::{BubbleId, Vec2};

/// Tracks pointer position, the hovered bubble and session click counts
#[derive(Debug, Default)]
pub struct PointerState {
    /// Last known pointer position in viewport pixels, None when outside
    position: Option<Vec2>,
    /// Bubble currently under the pointer
    hovered: Option<BubbleId>,
    /// Every click seen this page session
    total_clicks: u32,
    /// Clicks that landed on empty space (not a bubble, not the panel)
    qualifying_clicks: u32,
}

impl PointerState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Process pointer movement
    pub fn process_move(&mut self, position: Vec2) {
        self.position = Some(position);
    }

    /// Pointer left the surface; hover is cleared
    pub fn process_leave(&mut self) {
        self.position = None;
        self.hovered = None;
    }

    /// Count a click of any kind
    pub fn process_click(&mut self, position: Vec2) {
        self.position = Some(position);
        self.total_clicks += 1;
    }

    /// Count a qualifying click and return the new qualifying total
    pub fn register_qualifying_click(&mut self) -> u32 {
        self.qualifying_clicks += 1;
        self.qualifying_clicks
    }

    pub fn set_hovered(&mut self, hovered: Option<BubbleId>) {
        self.hovered = hovered;
    }

    // --- Query methods ---

    pub fn position(&self) -> Option<Vec2> {
        self.position
    }

    pub fn hovered(&self) -> Option<BubbleId> {
        self.hovered
    }

    pub fn total_clicks(&self) -> u32 {
        self.total_clicks
    }

    pub fn qualifying_clicks(&self) -> u32 {
        self.qualifying_clicks
    }
}
