//! Axis-aligned rectangles in viewport space
//!
//! Origin is the top-left corner of the viewport, y grows downward.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle (top-left corner + size)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    /// Rectangle of the given size centered on `center`
    pub fn from_center(center: Vec2, size: Vec2) -> Self {
        Self {
            x: center.x - size.x / 2.0,
            y: center.y - size.y / 2.0,
            w: size.x,
            h: size.y,
        }
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

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.w / 2.0, self.y + self.h / 2.0)
    }

    /// Open-interval overlap on the x axis (touching edges do not overlap)
    #[inline]
    pub fn overlaps_horizontally(&self, other: &Rect) -> bool {
        self.right() > other.left() && self.left() < other.right()
    }

    /// Open-interval overlap on the y axis
    #[inline]
    pub fn overlaps_vertically(&self, other: &Rect) -> bool {
        self.bottom() > other.top() && self.top() < other.bottom()
    }

    /// Standard AABB test
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.overlaps_horizontally(other) && self.overlaps_vertically(other)
    }
}
