//! Gate stream: spawning, scrolling, eviction and scoring
//!
//! Gates are kept in creation order. Every gate spawns at the right edge and
//! all gates move at the same speed, so creation order is also left-to-right
//! order.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::Serialize;

use super::collision::{GateCheck, hits_gate};
use super::rect::Rect;
use super::state::Obstacle;
use crate::consts::GATE_VARIANTS;
use crate::tuning::Tuning;

/// Owns the live gates and the RNG that shapes new ones
#[derive(Debug, Clone, Serialize)]
pub struct ObstacleStream {
    gates: Vec<Obstacle>,
    #[serde(skip)]
    rng: Pcg32,
}

impl ObstacleStream {
    pub fn new(seed: u64) -> Self {
        Self {
            gates: Vec::new(),
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    /// Create one gate at the right edge of the viewport
    ///
    /// The top barrier height is a whole number drawn from
    /// `[margin, height / 2 + margin)`.
    pub fn spawn(&mut self, viewport_width: f32, viewport_height: f32, tuning: &Tuning) {
        let span = (viewport_height / 2.0).max(f32::EPSILON);
        let top = self.rng.random_range(0.0..span).floor() + tuning.gate_top_margin;
        let variant = self.rng.random_range(0..GATE_VARIANTS);

        log::debug!("Spawn gate at x={} top={} variant={}", viewport_width, top, variant);
        self.push(Obstacle::new(viewport_width, top, tuning.gate_gap, variant));
    }

    /// Append a gate at the right end of the stream
    pub fn push(&mut self, gate: Obstacle) {
        self.gates.push(gate);
    }

    /// Move every gate left by `speed`, then drop gates whose right edge is
    /// at or past x=0. Returns the number of evicted gates.
    pub fn advance(&mut self, speed: f32, gate_width: f32) -> usize {
        for gate in &mut self.gates {
            gate.x -= speed;
        }
        let before = self.gates.len();
        self.gates.retain(|g| g.right(gate_width) > 0.0);
        before - self.gates.len()
    }

    /// Test every gate for a hit and for being passed
    ///
    /// A gate scores once in its lifetime, when its right edge is left of the
    /// flyer's center column. Every gate is checked, so several can score in
    /// the same tick.
    pub fn check_and_score(&mut self, flyer_box: &Rect, flyer_x: f32, gate_width: f32) -> GateCheck {
        let mut check = GateCheck::default();
        for gate in &mut self.gates {
            if hits_gate(flyer_box, gate, gate_width) {
                check.collided = true;
            }
            if gate.right(gate_width) < flyer_x && gate.mark_scored() {
                check.scored += 1;
            }
        }
        check
    }

    pub fn clear(&mut self) {
        self.gates.clear();
    }

    /// Live gates, oldest (leftmost) first
    pub fn gates(&self) -> &[Obstacle] {
        &self.gates
    }

    pub fn iter(&self) -> impl Iterator<Item = &Obstacle> {
        self.gates.iter()
    }

    pub fn len(&self) -> usize {
        self.gates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.gates.is_empty()
    }
}
