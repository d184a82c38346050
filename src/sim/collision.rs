//! Collision detection between the flyer and gates
//!
//! A gate is a full-height column with an opening. The flyer is only safe
//! inside the column while its box stays within the opening.

use serde::Serialize;

use super::rect::Rect;
use super::state::Obstacle;

/// Result of checking every live gate against the flyer for one tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct GateCheck {
    /// Flyer box hit a barrier
    pub collided: bool,
    /// Gates newly passed this tick (can exceed 1)
    pub scored: u32,
}

/// Standard AABB overlap test
#[inline]
pub fn rect_overlap(a: &Rect, b: &Rect) -> bool {
    a.overlaps(b)
}

/// Check whether the flyer box hits a gate
///
/// True when the flyer's horizontal extent intersects the gate column AND the
/// flyer pokes above the top opening edge or below the bottom opening edge.
/// Overlapping the column while fully inside `[top, bottom]` is safe passage.
pub fn hits_gate(flyer_box: &Rect, gate: &Obstacle, gate_width: f32) -> bool {
    let column = Rect::new(gate.x, flyer_box.y, gate_width, flyer_box.h);
    if !flyer_box.overlaps_horizontally(&column) {
        return false;
    }
    flyer_box.top() < gate.top() || flyer_box.bottom() > gate.bottom()
}
