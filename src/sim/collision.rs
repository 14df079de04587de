//! Collision detection and response for round pegs and the wedge walls

use glam::Vec2;

use super::board::{BoardBounds, Peg};

/// Result of a collision check
#[derive(Debug, Clone)]
pub struct CollisionResult {
    /// Whether a collision occurred
    pub hit: bool,
    /// Surface normal at collision (pointing toward token center)
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
}

/// Check a token against one peg
///
/// Overlap is strict: touching circles do not collide.
pub fn token_peg_collision(pos: Vec2, radius: f32, peg: &Peg) -> CollisionResult {
    let delta = pos - peg.pos;
    let dist = delta.length();
    let reach = radius + peg.radius;
    if dist >= reach {
        return CollisionResult::miss();
    }
    // Dead-center hit: push straight up
    let normal = if dist > f32::EPSILON {
        delta / dist
    } else {
        Vec2::NEG_Y
    };
    CollisionResult {
        hit: true,
        normal,
        penetration: reach - dist,
    }
}

/// First peg (in board order) the token overlaps
pub fn first_peg_hit(pos: Vec2, radius: f32, pegs: &[Peg]) -> Option<(usize, CollisionResult)> {
    pegs.iter()
        .enumerate()
        .map(|(i, peg)| (i, token_peg_collision(pos, radius, peg)))
        .find(|(_, c)| c.hit)
}

/// Reflect velocity off a surface
///
/// Standard reflection: v' = v - 2(v·n)n
#[inline]
pub fn reflect_velocity(velocity: Vec2, normal: Vec2) -> Vec2 {
    velocity - 2.0 * velocity.dot(normal) * normal
}

/// Which wall a token crossed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WallSide {
    Left,
    Right,
}

/// Clamp a token inside the bounds at its height
///
/// Returns the wall it was pushed off, with the horizontal velocity
/// reflected and damped.
pub fn clamp_to_bounds(
    pos: &mut Vec2,
    vel: &mut Vec2,
    radius: f32,
    bounds: &BoardBounds,
    damping: f32,
) -> Option<WallSide> {
    let (left, right) = bounds.at(pos.y);
    if pos.x - radius < left {
        pos.x = left + radius;
        vel.x = vel.x.abs() * damping;
        Some(WallSide::Left)
    } else if pos.x + radius > right {
        pos.x = right - radius;
        vel.x = -vel.x.abs() * damping;
        Some(WallSide::Right)
    } else {
        None
    }
}
