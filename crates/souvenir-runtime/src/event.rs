//! Discrete events delivered by the page host

use serde::{Deserialize, Serialize};

/// Events the host forwards to the widget between frames
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PageEvent {
    /// Primary-button click in viewport pixels
    Click { x: f32, y: f32 },
    /// Pointer moved over the surface
    PointerMove { x: f32, y: f32 },
    /// Pointer left the surface
    PointerLeave,
    /// Page visibility changed
    VisibilityChanged { visible: bool },
    /// Viewport was resized; the surface always matches it
    Resize { width: f32, height: f32 },
    /// An icon requested through the loader finished loading
    IconLoaded { key: String, ok: bool },
    /// The catalog fetch completed with this response body
    CatalogLoaded { body: String },
}

impl PageEvent {
    /// Short tag used in log lines
    pub fn kind(&self) -> &'static str {
        match self {
            PageEvent::Click { .. } => "click",
            PageEvent::PointerMove { .. } => "pointer_move",
            PageEvent::PointerLeave => "pointer_leave",
            PageEvent::VisibilityChanged { .. } => "visibility",
            PageEvent::Resize { .. } => "resize",
            PageEvent::IconLoaded { .. } => "icon_loaded",
            PageEvent::CatalogLoaded { .. } => "catalog_loaded",
        }
    }
}
