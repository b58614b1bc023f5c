//! Physics capability consumed by the simulation
//!
//! The core only needs two things from a physics engine: moving a body by a
//! delta (optionally ignoring walls) and asking whether a circle overlaps a
//! wall. `Walls` provides both from signed distance fields.

use glam::Vec2;

pub trait Physics {
    /// Move a circular body by `delta` and return where it ends up
    fn move_body(&self, from: Vec2, delta: Vec2, radius: f32, collide_walls: bool) -> Vec2;

    /// Whether a circle at `point` overlaps any wall
    fn overlaps_wall(&self, point: Vec2, radius: f32) -> bool;
}

/// No walls at all
#[derive(Debug, Clone, Copy, Default)]
pub struct OpenField;

impl Physics for OpenField {
    fn move_body(&self, from: Vec2, delta: Vec2, _radius: f32, _collide_walls: bool) -> Vec2 {
        from + delta
    }

    fn overlaps_wall(&self, _point: Vec2, _radius: f32) -> bool {
        false
    }
}

/// Signed distance to a circle
#[inline]
pub fn sd_circle(p: Vec2, center: Vec2, radius: f32) -> f32 {
    (p - center).length() - radius
}

/// Signed distance to an axis-aligned box
#[inline]
pub fn sd_box(p: Vec2, center: Vec2, half_extents: Vec2) -> f32 {
    let q = (p - center).abs() - half_extents;
    q.max(Vec2::ZERO).length() + q.x.max(q.y).min(0.0)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Wall {
    Circle { center: Vec2, radius: f32 },
    Box { center: Vec2, half_extents: Vec2 },
}

impl Wall {
    pub fn distance(&self, p: Vec2) -> f32 {
        match *self {
            Wall::Circle { center, radius } => sd_circle(p, center, radius),
            Wall::Box {
                center,
                half_extents,
            } => sd_box(p, center, half_extents),
        }
    }
}

/// Static wall layout
#[derive(Debug, Clone, Default)]
pub struct Walls {
    walls: Vec<Wall>,
}

impl Walls {
    pub fn new(walls: Vec<Wall>) -> Self {
        Self { walls }
    }

    /// Distance to the nearest wall surface (negative inside)
    pub fn distance(&self, p: Vec2) -> f32 {
        self.walls
            .iter()
            .map(|w| w.distance(p))
            .fold(f32::INFINITY, f32::min)
    }

    /// A step is allowed if it ends clear of walls, or at least does not sink
    /// deeper into one (so bodies that clipped inside can walk out).
    fn step_allowed(&self, from: Vec2, to: Vec2, radius: f32) -> bool {
        let d = self.distance(to);
        d >= radius || d >= self.distance(from)
    }
}

impl Physics for Walls {
    fn move_body(&self, from: Vec2, delta: Vec2, radius: f32, collide_walls: bool) -> Vec2 {
        if !collide_walls {
            return from + delta;
        }
        // Resolve per axis so bodies slide along walls
        let mut pos = from;
        let step_x = pos + Vec2::new(delta.x, 0.0);
        if self.step_allowed(pos, step_x, radius) {
            pos = step_x;
        }
        let step_y = pos + Vec2::new(0.0, delta.y);
        if self.step_allowed(pos, step_y, radius) {
            pos = step_y;
        }
        pos
    }

    fn overlaps_wall(&self, point: Vec2, radius: f32) -> bool {
        self.distance(point) < radius
    }
}
