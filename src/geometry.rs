//! Orbit geometry and screen rectangles.
//!
//! Everything here is pure: no state, no clocks. Orbit positions are offsets
//! relative to the owning card's center.

use std::f32::consts::TAU;

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle in page coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    /// Left edge.
    pub left: f32,
    /// Top edge.
    pub top: f32,
    /// Width.
    pub width: f32,
    /// Height.
    pub height: f32,
}

impl Rect {
    /// Construct from edges and size.
    #[must_use]
    pub const fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Center point.
    #[must_use]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.left + self.width / 2.0, self.top + self.height / 2.0)
    }

    /// Smaller of width and height.
    #[must_use]
    pub fn min_side(&self) -> f32 {
        self.width.min(self.height)
    }

    /// Rectangle of the same center scaled uniformly and shifted by
    /// `offset`.
    #[must_use]
    pub fn transformed(&self, offset: Vec2, scale: f32) -> Self {
        let center = self.center() + offset;
        let width = self.width * scale;
        let height = self.height * scale;
        Self {
            left: center.x - width / 2.0,
            top: center.y - height / 2.0,
            width,
            height,
        }
    }

    /// Whether `point` lies inside (edges inclusive).
    #[must_use]
    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.left
            && point.x <= self.left + self.width
            && point.y >= self.top
            && point.y <= self.top + self.height
    }
}

/// Position on a circle of `radius` at `angle` radians.
#[inline]
#[must_use]
pub fn position_on_orbit(angle: f32, radius: f32) -> Vec2 {
    Vec2::new(radius * angle.cos(), radius * angle.sin())
}

/// Orbit radius for a card: a fixed fraction of its shorter side.
#[inline]
#[must_use]
pub fn orbit_radius(card: &Rect, fraction: f32) -> f32 {
    card.min_side() * fraction
}

/// Evenly spaced start angle for sub-card `index` of `count`.
#[must_use]
pub fn spawn_angle(index: usize, count: usize) -> f32 {
    if count == 0 {
        return 0.0;
    }
    TAU * index as f32 / count as f32
}

/// Translation that moves the center of `rect` to the center of a viewport
/// of the given size.
#[must_use]
pub fn center_offset(rect: &Rect, viewport: Vec2) -> Vec2 {
    viewport / 2.0 - rect.center()
}
