//! Axis-aligned collision detection and response
//!
//! Everything that moves is a rectangle. Detection is a strict overlap test
//! (touching edges do not overlap), and response pushes the mover out of a
//! static obstacle along the axis of least penetration.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle in pixel space (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    /// Top-left corner
    pub min: Vec2,
    pub size: Vec2,
}

impl Aabb {
    pub fn new(min: Vec2, size: Vec2) -> Self {
        Self { min, size }
    }

    pub fn from_corners(min: Vec2, max: Vec2) -> Self {
        Self { min, size: max - min }
    }

    /// Bottom-right corner
    #[inline]
    pub fn max(&self) -> Vec2 {
        self.min + self.size
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.min + self.size * 0.5
    }
}

/// Strict overlap test; shared edges do not count
#[inline]
pub fn overlaps(a: &Aabb, b: &Aabb) -> bool {
    let (a_max, b_max) = (a.max(), b.max());
    a.min.x < b_max.x && a_max.x > b.min.x && a.min.y < b_max.y && a_max.y > b.min.y
}

/// A moving rectangle with velocity and a grounded flag
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Body {
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: Vec2,
    pub on_ground: bool,
}

impl Body {
    pub fn new(pos: Vec2, size: Vec2) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
            size,
            on_ground: false,
        }
    }

    #[inline]
    pub fn rect(&self) -> Aabb {
        Aabb::new(self.pos, self.size)
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.pos + self.size * 0.5
    }
}

/// Direction the mover was pushed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Correction {
    Left,
    Right,
    Up,
    Down,
}

impl Correction {
    pub fn is_vertical(self) -> bool {
        matches!(self, Correction::Up | Correction::Down)
    }
}

/// Push `mover` out of a static `obstacle`
///
/// The smallest of the four side penetrations wins. On a tie between the
/// axes, vertical wins only if the mover is travelling into the obstacle
/// vertically, so falling onto a floor lands while walking into a wall
/// slides back. The velocity component along the correction is zeroed, and
/// an upward push while falling grounds the mover.
///
/// Returns `None` (and changes nothing) when the two do not overlap.
pub fn resolve(mover: &mut Body, obstacle: &Aabb) -> Option<Correction> {
    let rect = mover.rect();
    if !overlaps(&rect, obstacle) {
        return None;
    }

    let (m_max, o_max) = (rect.max(), obstacle.max());
    let push_left = m_max.x - obstacle.min.x;
    let push_right = o_max.x - rect.min.x;
    let push_up = m_max.y - obstacle.min.y;
    let push_down = o_max.y - rect.min.y;

    let (horizontal, depth_x) = if push_left <= push_right {
        (Correction::Left, push_left)
    } else {
        (Correction::Right, push_right)
    };
    let (vertical, depth_y) = if push_up <= push_down {
        (Correction::Up, push_up)
    } else {
        (Correction::Down, push_down)
    };

    let heading_into = match vertical {
        Correction::Up => mover.vel.y > 0.0,
        _ => mover.vel.y < 0.0,
    };
    let correction = if depth_y < depth_x || (depth_y == depth_x && heading_into) {
        vertical
    } else {
        horizontal
    };

    match correction {
        Correction::Left => {
            mover.pos.x = obstacle.min.x - mover.size.x;
            mover.vel.x = 0.0;
        }
        Correction::Right => {
            mover.pos.x = o_max.x;
            mover.vel.x = 0.0;
        }
        Correction::Up => {
            mover.pos.y = obstacle.min.y - mover.size.y;
            if mover.vel.y > 0.0 {
                mover.on_ground = true;
            }
            mover.vel.y = 0.0;
        }
        Correction::Down => {
            mover.pos.y = o_max.y;
            mover.vel.y = 0.0;
        }
    }
    Some(correction)
}
