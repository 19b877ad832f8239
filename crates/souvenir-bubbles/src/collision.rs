//! Pairwise bumper-car collisions plus one static rectangular obstacle
//!
//! Contacts are springier than real spheres: restitution may exceed 1 and
//! every contact adds a fixed separating bump, so resting bubbles still push
//! apart. Pairs are resolved in a single pass
//! in live-set order; with three or more mutually overlapping bubbles the
//! outcome depends on that order.

use crate::bubble::Bubble;
use crate::config::PhysicsConfig;
use glam::Vec2;
use souvenir_core::Rect;

/// Resolve every overlapping pair, then the obstacle. Returns the number of
/// contacts handled. A no-op when nothing overlaps.
pub fn resolve_all(bubbles: &mut [Bubble], obstacle: Option<Rect>, config: &PhysicsConfig) -> usize {
    let mut contacts = 0;

    for i in 0..bubbles.len() {
        let (head, tail) = bubbles.split_at_mut(i + 1);
        let a = &mut head[i];
        if a.is_removed() {
            continue;
        }
        for b in tail.iter_mut() {
            if b.is_removed() {
                continue;
            }
            if resolve_pair(a, b, config) {
                contacts += 1;
            }
        }
    }

    if let Some(rect) = obstacle {
        for bubble in bubbles.iter_mut().filter(|b| !b.is_removed()) {
            if resolve_obstacle(bubble, rect, config) {
                contacts += 1;
            }
        }
    }

    contacts
}

/// Resolve one pair. Returns false when the discs do not overlap or share a center.
pub fn resolve_pair(a: &mut Bubble, b: &mut Bubble, config: &PhysicsConfig) -> bool {
    let delta = b.position - a.position;
    let distance = delta.length();
    let min_distance = a.radius + b.radius;
    if distance <= 0.0 || distance >= min_distance {
        return false;
    }

    let normal = delta / distance;
    let tangent = normal.perp();
    let relative = a.velocity - b.velocity;
    let dvn = relative.dot(normal);
    let dvt = relative.dot(tangent);

    let total_mass = a.mass + b.mass;
    let impulse_a = (1.0 + config.restitution) * (b.mass / total_mass) * dvn.abs();
    let impulse_b = (1.0 + config.restitution) * (a.mass / total_mass) * dvn.abs();
    a.velocity -= normal * (impulse_a + config.collision_bump);
    b.velocity += normal * (impulse_b + config.collision_bump);

    // Tangential slip spins the pair in opposite directions
    a.angular_velocity += dvt * config.collision_spin;
    b.angular_velocity -= dvt * config.collision_spin;

    let correction = normal * ((min_distance - distance) * 0.5);
    a.position -= correction;
    b.position += correction;
    true
}

/// Treat the nearest point of `rect` as an infinite-mass contact.
/// Returns false when the bubble does not touch the rectangle. Edges may
/// come in either order; a rectangle with a non-finite edge is ignored.
pub fn resolve_obstacle(bubble: &mut Bubble, rect: Rect, config: &PhysicsConfig) -> bool {
    if !rect.is_finite() {
        return false;
    }
    let rect = rect.normalized();
    let nearest = rect.nearest_point(bubble.position);
    let delta = bubble.position - nearest;
    let distance = delta.length();

    let (normal, contact) = if distance > 0.0 {
        if distance >= bubble.radius {
            return false;
        }
        (delta / distance, nearest)
    } else {
        // Center inside the rectangle: leave through the closest side
        exit_through_nearest_side(bubble.position, rect)
    };

    let vn = bubble.velocity.dot(normal);
    if vn < 0.0 {
        bubble.velocity -= normal * ((1.0 + config.restitution) * vn);
    }
    bubble.position = contact + normal * bubble.radius;
    true
}

fn exit_through_nearest_side(p: Vec2, rect: Rect) -> (Vec2, Vec2) {
    let sides = [
        (p.x - rect.left, Vec2::NEG_X, Vec2::new(rect.left, p.y)),
        (rect.right - p.x, Vec2::X, Vec2::new(rect.right, p.y)),
        (p.y - rect.top, Vec2::NEG_Y, Vec2::new(p.x, rect.top)),
        (rect.bottom - p.y, Vec2::Y, Vec2::new(p.x, rect.bottom)),
    ];
    let mut best = sides[0];
    for side in &sides[1..] {
        if side.0 < best.0 {
            best = *side;
        }
    }
    (best.1, best.2)
}
