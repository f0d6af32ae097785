//! Geometry primitives for collision tests
//!
//! Axis-aligned rectangles, circles, closest-point projection and the
//! penetration queries the collision engine resolves against.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle (top-left origin, +y is down)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    /// Rectangle of the given size centered on `center`
    pub fn centered(center: Vec2, w: f32, h: f32) -> Self {
        Self::new(center.x - w / 2.0, center.y - h / 2.0, w, h)
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.w / 2.0, self.y + self.h / 2.0)
    }

    /// Strict overlap (touching edges do not count)
    pub fn intersects(&self, other: &Rect) -> bool {
        self.left() < other.right()
            && self.right() > other.left()
            && self.top() < other.bottom()
            && self.bottom() > other.top()
    }

    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.left() && p.x <= self.right() && p.y >= self.top() && p.y <= self.bottom()
    }

    /// Closest point on (or inside) the rectangle to `p`
    pub fn closest_point(&self, p: Vec2) -> Vec2 {
        Vec2::new(
            p.x.clamp(self.left(), self.right()),
            p.y.clamp(self.top(), self.bottom()),
        )
    }

    /// Horizontal overlap length with another rectangle (<= 0 when apart)
    pub fn overlap_x(&self, other: &Rect) -> f32 {
        self.right().min(other.right()) - self.left().max(other.left())
    }
}

/// A circle for heads, the ball and blast areas
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Circle {
    pub center: Vec2,
    pub radius: f32,
}

impl Circle {
    pub const fn new(center: Vec2, radius: f32) -> Self {
        Self { center, radius }
    }

    /// Strict overlap with another circle
    pub fn intersects(&self, other: &Circle) -> bool {
        let r = self.radius + other.radius;
        self.center.distance_squared(other.center) < r * r
    }

    pub fn contains(&self, p: Vec2) -> bool {
        self.center.distance_squared(p) <= self.radius * self.radius
    }

    /// Strict overlap with a rectangle
    pub fn intersects_rect(&self, rect: &Rect) -> bool {
        let closest = rect.closest_point(self.center);
        self.center.distance_squared(closest) < self.radius * self.radius
    }
}

/// Which axis a penetration is resolved along
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Horizontal,
    Vertical,
}

/// Result of a circle-vs-rectangle penetration query
#[derive(Debug, Clone, Copy)]
pub struct Penetration {
    /// Unit vector pushing the circle out of the rectangle
    pub normal: Vec2,
    /// Overlap depth along `normal`
    pub depth: f32,
    /// Dominant axis of the overlap
    pub axis: Axis,
}

/// Penetration of a circle into a rectangle, via closest-point projection
///
/// Returns `None` when they do not overlap. When the circle center is inside
/// the rectangle the minimum-penetration face is used.
pub fn circle_rect_penetration(circle: &Circle, rect: &Rect) -> Option<Penetration> {
    let closest = rect.closest_point(circle.center);
    let delta = circle.center - closest;
    let dist_sq = delta.length_squared();

    if dist_sq > 0.0 {
        if dist_sq >= circle.radius * circle.radius {
            return None;
        }
        let dist = dist_sq.sqrt();
        let normal = delta / dist;
        let axis = if normal.x.abs() > normal.y.abs() {
            Axis::Horizontal
        } else {
            Axis::Vertical
        };
        return Some(Penetration {
            normal,
            depth: circle.radius - dist,
            axis,
        });
    }

    // Center inside the rectangle: push out through the nearest face
    let c = circle.center;
    let faces = [
        (c.x - rect.left(), Vec2::NEG_X, Axis::Horizontal),
        (rect.right() - c.x, Vec2::X, Axis::Horizontal),
        (c.y - rect.top(), Vec2::NEG_Y, Axis::Vertical),
        (rect.bottom() - c.y, Vec2::Y, Axis::Vertical),
    ];
    let (dist, normal, axis) = faces
        .into_iter()
        .min_by(|a, b| a.0.total_cmp(&b.0))
        .unwrap_or((0.0, Vec2::NEG_Y, Axis::Vertical));

    Some(Penetration {
        normal,
        depth: dist + circle.radius,
        axis,
    })
}

/// Overlap of two circles along the line between their centers
///
/// Returns `(normal from a to b, depth)`; `None` when apart. Coincident
/// centers produce a random direction instead of dividing by zero.
pub fn circle_circle_penetration<R: Rng>(
    a: &Circle,
    b: &Circle,
    rng: &mut R,
) -> Option<(Vec2, f32)> {
    if !a.intersects(b) {
        return None;
    }
    let delta = b.center - a.center;
    let dist = delta.length();
    let normal = if dist > f32::EPSILON {
        delta / dist
    } else {
        random_unit(rng)
    };
    Some((normal, a.radius + b.radius - dist))
}

/// Direction from `from` to `to`, or a uniformly random unit vector when
/// the points coincide
pub fn direction_or_random<R: Rng>(from: Vec2, to: Vec2, rng: &mut R) -> Vec2 {
    let delta = to - from;
    let len = delta.length();
    if len > f32::EPSILON {
        delta / len
    } else {
        random_unit(rng)
    }
}

/// Uniformly distributed unit vector
pub fn random_unit<R: Rng>(rng: &mut R) -> Vec2 {
    let angle = rng.random_range(0.0..std::f32::consts::TAU);
    Vec2::new(angle.cos(), angle.sin())
}
