//! Axis-aligned rectangles for meetings and the paddle
//!
//! Canvas space: origin top-left, y grows downward.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::clamp;

/// An axis-aligned rectangle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Point on (or inside) the rectangle closest to `p`
    pub fn closest_point(&self, p: Vec2) -> Vec2 {
        Vec2::new(
            clamp(p.x, self.left(), self.right()),
            clamp(p.y, self.top(), self.bottom()),
        )
    }

    pub fn overlaps(&self, other: &Rect) -> bool {
        rects_overlap(self, other)
    }
}

/// True iff both axis projections overlap. Shared edges don't count.
pub fn rects_overlap(a: &Rect, b: &Rect) -> bool {
    !(a.right() <= b.left()
        || a.left() >= b.right()
        || a.bottom() <= b.top()
        || a.top() >= b.bottom())
}
