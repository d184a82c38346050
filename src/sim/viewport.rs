//! Viewport adapter
//!
//! The display size is driven by the host (window resize). Everything that
//! depends on it, like gate width, is derived here.

use serde::Serialize;

use crate::consts::{DEFAULT_VIEWPORT, GATE_WIDTH_FRACTION, MIN_VIEWPORT_DIM};

/// Current display dimensions and size-derived values
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Viewport {
    width: f32,
    height: f32,
    gate_width_fraction: f32,
    gate_width: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(DEFAULT_VIEWPORT.0, DEFAULT_VIEWPORT.1, GATE_WIDTH_FRACTION)
    }
}

impl Viewport {
    pub fn new(width: f32, height: f32, gate_width_fraction: f32) -> Self {
        let mut viewport = Self {
            width: MIN_VIEWPORT_DIM,
            height: MIN_VIEWPORT_DIM,
            gate_width_fraction,
            gate_width: 0.0,
        };
        viewport.on_resize(width, height);
        viewport
    }

    /// Apply a new display size and recompute gate width
    ///
    /// Zero, negative and non-finite sizes are out of contract and get clamped
    /// to `MIN_VIEWPORT_DIM`.
    pub fn on_resize(&mut self, width: f32, height: f32) {
        self.width = sanitize_dim(width);
        self.height = sanitize_dim(height);
        self.gate_width = self.width * self.gate_width_fraction;
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.height
    }

    /// Width shared by every live gate
    #[inline]
    pub fn gate_width(&self) -> f32 {
        self.gate_width
    }
}

fn sanitize_dim(value: f32) -> f32 {
    if value.is_finite() {
        value.max(MIN_VIEWPORT_DIM)
    } else {
        MIN_VIEWPORT_DIM
    }
}
