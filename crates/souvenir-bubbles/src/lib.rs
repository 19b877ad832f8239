//! Souvenir Bubbles - the ambient bubble simulation
//!
//! Bubbles enter from the left, ride a smoothly varying wind field, wobble
//! with per-bubble turbulence, bounce off each other and the content panel,
//! fade out near the right edge and are retired once they leave the page.
//!
//! - `BubbleEngine` - the mounted widget; owns every piece of state below
//! - `WindField` - global gust signal sampled once per frame
//! - `integrator` / `collision` / `lifecycle` - the per-frame pipeline
//! - `SpawnManager` - ambient timer, first-click guide and click spawns
//! - `Catalog` / `IconRegistry` - spawnable items and their decoded icons
//! - `SimulationConfig` - TOML-backed tunables

pub mod bubble;
pub mod catalog;
pub mod collision;
pub mod config;
pub mod effect;
pub mod engine;
pub mod integrator;
pub mod lifecycle;
pub mod rand;
pub mod session;
pub mod spawn;
pub mod wind;

pub use bubble::{Bubble, BubbleOrigin, BubblePool, BubbleTraits};
pub use catalog::{Catalog, CatalogItem, IconLoader, IconRegistry, IconStatus};
pub use config::{
    ActionEffect, GuestAction, GuideItem, Harmonic, LifecycleConfig, PhysicsConfig,
    SimulationConfig, SpawnConfig, WindConfig,
};
pub use effect::{dispatch, EffectHandler, SpawnEffect};
pub use engine::{BubbleEngine, BubbleHost, ClickOutcome, FrameStats, LayoutProvider};
pub use lifecycle::BubblePhase;
pub use rand::BubbleRng;
pub use session::{Session, SessionProvider};
pub use spawn::{ClickSpawn, SpawnManager};
pub use wind::WindField;
