//! Souvenir Core - Foundational types for the souvenir bubble engine
//!
//! This crate provides the types that all other souvenir crates depend on:
//! - `BubbleId` - Stable arena identifiers for live bubbles
//! - `Rect`, `Viewport`, `Color` - Screen-space types (positions are `glam::Vec2`)
//! - Error types and Result alias

mod error;
mod id;
mod types;

pub use error::{Result, SouvenirError};
pub use glam::Vec2;
pub use id::BubbleId;
pub use types::{Color, Rect, Viewport};
