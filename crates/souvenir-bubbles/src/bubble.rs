//! Bubble state and the live-set arena

use crate::effect::SpawnEffect;
use crate::lifecycle::BubblePhase;
use glam::Vec2;
use souvenir_core::BubbleId;

/// Per-bubble constants drawn once at creation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BubbleTraits {
    pub wind_sensitivity: f32,
    /// Radians
    pub turbulence_phase: f32,
    pub turbulence_frequency: f32,
    /// Constant vertical force; positive drifts down
    pub vertical_drift_bias: f32,
    pub buoyancy_factor: f32,
}

impl Default for BubbleTraits {
    fn default() -> Self {
        Self {
            wind_sensitivity: 1.0,
            turbulence_phase: 0.0,
            turbulence_frequency: 1.0,
            vertical_drift_bias: 0.0,
            buoyancy_factor: 1.0,
        }
    }
}

/// How a bubble entered the live set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BubbleOrigin {
    Ambient,
    Guide,
    Click,
}

/// One simulated bubble
#[derive(Debug, Clone)]
pub struct Bubble {
    pub id: BubbleId,
    /// Catalog or action key; also the icon registry key
    pub item_key: String,
    pub effect: SpawnEffect,
    pub origin: BubbleOrigin,
    pub position: Vec2,
    pub velocity: Vec2,
    pub radius: f32,
    /// Derived from radius, always > 0
    pub mass: f32,
    /// Radians
    pub rotation: f32,
    pub angular_velocity: f32,
    pub traits: BubbleTraits,
    /// Seconds since spawn
    pub age: f32,
    pub opacity: f32,
    pub phase: BubblePhase,
}

impl Bubble {
    pub fn is_removed(&self) -> bool {
        self.phase == BubblePhase::Removed
    }

    pub fn contains(&self, point: Vec2) -> bool {
        self.position.distance_squared(point) <= self.radius * self.radius
    }

    pub fn is_finite(&self) -> bool {
        self.position.is_finite()
            && self.velocity.is_finite()
            && self.rotation.is_finite()
            && self.angular_velocity.is_finite()
    }
}

/// Mass of a bubble of `radius`, normalized so `reference_radius` weighs 1
pub fn mass_for_radius(radius: f32, reference_radius: f32) -> f32 {
    let r = radius / reference_radius;
    (r * r).max(f32::EPSILON)
}

/// Everything needed to create a bubble except its id
#[derive(Debug, Clone)]
pub struct BubbleInit {
    pub item_key: String,
    pub effect: SpawnEffect,
    pub origin: BubbleOrigin,
    pub position: Vec2,
    pub velocity: Vec2,
    pub radius: f32,
    pub mass: f32,
    pub traits: BubbleTraits,
}

/// Capacity-capped arena of live bubbles.
///
/// Order is spawn order (oldest first) and is preserved by removal, so
/// collision pair order and "newest wins" hit testing stay stable.
#[derive(Debug)]
pub struct BubblePool {
    bubbles: Vec<Bubble>,
    capacity: usize,
    next_id: BubbleId,
}

impl BubblePool {
    pub fn new(capacity: usize) -> Self {
        Self {
            bubbles: Vec::with_capacity(capacity),
            capacity,
            next_id: BubbleId::from_raw(1),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.bubbles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bubbles.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.bubbles.len() >= self.capacity
    }

    /// Insert a new bubble. Returns None if the pool is at capacity;
    /// existing bubbles are never evicted.
    pub fn spawn(&mut self, init: BubbleInit) -> Option<&mut Bubble> {
        if self.is_full() {
            return None;
        }
        let id = self.next_id;
        self.next_id = id.next();
        self.bubbles.push(Bubble {
            id,
            item_key: init.item_key,
            effect: init.effect,
            origin: init.origin,
            position: init.position,
            velocity: init.velocity,
            radius: init.radius,
            mass: init.mass,
            rotation: 0.0,
            angular_velocity: 0.0,
            traits: init.traits,
            age: 0.0,
            opacity: 0.0,
            phase: BubblePhase::Spawning,
        });
        self.bubbles.last_mut()
    }

    pub fn get(&self, id: BubbleId) -> Option<&Bubble> {
        self.bubbles.iter().find(|b| b.id == id)
    }

    pub fn as_slice(&self) -> &[Bubble] {
        &self.bubbles
    }

    pub fn as_mut_slice(&mut self) -> &mut [Bubble] {
        &mut self.bubbles
    }

    pub fn iter(&self) -> impl Iterator<Item = &Bubble> {
        self.bubbles.iter()
    }

    /// Most recently spawned bubble whose disc contains `point`
    pub fn topmost_at(&self, point: Vec2) -> Option<BubbleId> {
        self.bubbles
            .iter()
            .rev()
            .find(|b| !b.is_removed() && b.contains(point))
            .map(|b| b.id)
    }

    /// Drop bubbles marked removed, returning their ids
    pub fn compact(&mut self) -> Vec<BubbleId> {
        let mut removed = Vec::new();
        self.bubbles.retain(|b| {
            if b.is_removed() {
                removed.push(b.id);
                false
            } else {
                true
            }
        });
        removed
    }

    /// Keep only the `keep` newest bubbles, returning the ids dropped
    pub fn prune_to(&mut self, keep: usize) -> Vec<BubbleId> {
        if self.bubbles.len() <= keep {
            return Vec::new();
        }
        let excess = self.bubbles.len() - keep;
        self.bubbles.drain(..excess).map(|b| b.id).collect()
    }

    /// Remove every bubble
    pub fn clear(&mut self) -> Vec<BubbleId> {
        self.bubbles.drain(..).map(|b| b.id).collect()
    }
}
