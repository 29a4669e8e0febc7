//! Collision detection between a ball and the other shapes in play
//!
//! All tests are pure: they report whether the ball touches, the surface
//! normal (pointing toward the ball center) and how deep it overlaps.
//! Response lives in the physics engine.

use glam::Vec2;

use super::state::Obstacle;
use crate::consts::CONTACT_EPSILON;
use crate::{rotate, to_local};

/// Result of a collision check
#[derive(Debug, Clone)]
pub struct CollisionResult {
    /// Whether a collision occurred
    pub hit: bool,
    /// Surface normal at contact (pointing toward ball center)
    pub normal: Vec2,
    /// Penetration depth (for position correction)
    pub penetration: f32,
}

impl CollisionResult {
    pub fn miss() -> Self {
        Self {
            hit: false,
            normal: Vec2::ZERO,
            penetration: 0.0,
        }
    }

    fn hit(normal: Vec2, penetration: f32) -> Self {
        Self {
            hit: true,
            normal,
            penetration,
        }
    }
}

/// Normalize `v`, or return `fallback` when it is too short to carry a direction
#[inline]
fn direction_or(v: Vec2, fallback: Vec2) -> Vec2 {
    let len = v.length();
    if len < CONTACT_EPSILON {
        fallback
    } else {
        v / len
    }
}

/// Check two balls for overlap
///
/// The normal points from `a` toward `b`; coincident centers separate along +X.
pub fn ball_ball_collision(a_pos: Vec2, a_radius: f32, b_pos: Vec2, b_radius: f32) -> CollisionResult {
    let delta = b_pos - a_pos;
    let distance = delta.length();
    let min_distance = a_radius + b_radius;

    if distance >= min_distance {
        return CollisionResult::miss();
    }

    let normal = direction_or(delta, Vec2::X);
    CollisionResult::hit(normal, min_distance - distance)
}

/// Check a ball against a disc (spring pads and anything else round)
///
/// Coincident centers push the ball straight up.
pub fn ball_disc_collision(
    ball_pos: Vec2,
    ball_radius: f32,
    center: Vec2,
    disc_radius: f32,
) -> CollisionResult {
    let delta = ball_pos - center;
    let distance = delta.length();
    let min_distance = ball_radius + disc_radius;

    if distance >= min_distance {
        return CollisionResult::miss();
    }

    let normal = direction_or(delta, Vec2::NEG_Y);
    CollisionResult::hit(normal, min_distance - distance)
}

/// Check a ball against an obstacle's (rotated) box
///
/// Uses the closest point on the box in the obstacle's local frame. When the
/// ball center is already inside the box it is pushed out through the nearest
/// face.
pub fn ball_box_collision(ball_pos: Vec2, ball_radius: f32, obstacle: &Obstacle) -> CollisionResult {
    let half = obstacle.half_extents();
    let local = to_local(ball_pos, obstacle.pos, obstacle.rotation);

    // Broad phase: bounding boxes overlap
    if local.x.abs() >= half.x + ball_radius || local.y.abs() >= half.y + ball_radius {
        return CollisionResult::miss();
    }

    let closest = local.clamp(-half, half);
    let offset = local - closest;
    let distance = offset.length();

    let (local_normal, penetration) = if distance < CONTACT_EPSILON {
        // Center inside the box: leave through the face with the least overlap
        let depth_x = half.x - local.x.abs();
        let depth_y = half.y - local.y.abs();
        if depth_y <= depth_x {
            let sign = if local.y < 0.0 { -1.0 } else { 1.0 };
            (Vec2::new(0.0, sign), depth_y + ball_radius)
        } else {
            let sign = if local.x < 0.0 { -1.0 } else { 1.0 };
            (Vec2::new(sign, 0.0), depth_x + ball_radius)
        }
    } else if distance < ball_radius {
        (offset / distance, ball_radius - distance)
    } else {
        return CollisionResult::miss();
    };

    CollisionResult::hit(rotate(local_normal, obstacle.rotation), penetration)
}

/// Check a ball against a ramp's slope
///
/// The slope runs from the top-left to the bottom-right corner of the ramp's
/// box in its local frame. Only balls whose center lies within the box grown
/// by the ball radius are considered.
pub fn ball_ramp_collision(ball_pos: Vec2, ball_radius: f32, ramp: &Obstacle) -> CollisionResult {
    let half = ramp.half_extents();
    let local = to_local(ball_pos, ramp.pos, ramp.rotation);

    if local.x.abs() >= half.x + ball_radius || local.y.abs() >= half.y + ball_radius {
        return CollisionResult::miss();
    }

    let start = Vec2::new(-half.x, -half.y);
    let end = Vec2::new(half.x, half.y);
    let slope = end - start;
    let len_sq = slope.length_squared();
    if len_sq < CONTACT_EPSILON {
        return CollisionResult::miss(); // Degenerate ramp
    }

    let t = ((local - start).dot(slope) / len_sq).clamp(0.0, 1.0);
    let closest = start + slope * t;
    let offset = local - closest;
    let distance = offset.length();

    if distance >= ball_radius {
        return CollisionResult::miss();
    }

    // Ball center on the slope line: treat it as resting on top
    let up = Vec2::new(slope.y, -slope.x).normalize();
    let local_normal = direction_or(offset, up);

    CollisionResult::hit(rotate(local_normal, ramp.rotation), ball_radius - distance)
}

/// Whether a ball center has entered a collector's zone
pub fn ball_in_collector(ball_pos: Vec2, collector_pos: Vec2, collector_radius: f32) -> bool {
    ball_pos.distance(collector_pos) < collector_radius
}

/// Bounce off a surface, keeping `elasticity` of the reflection impulse
///
/// Velocity moving away from the surface is returned unchanged.
#[inline]
pub fn bounce_velocity(velocity: Vec2, normal: Vec2, elasticity: f32) -> Vec2 {
    let dot = velocity.dot(normal);
    if dot >= 0.0 {
        return velocity;
    }
    velocity - 2.0 * dot * normal * elasticity
}
