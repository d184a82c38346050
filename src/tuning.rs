//! Data-driven game balance
//!
//! Every physics and pacing number the simulation reads comes from here, so a
//! JSON blob can retune the game without a rebuild.

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Physics, pacing and layout numbers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub gravity: f32,
    pub lift: f32,
    pub drag: f32,
    pub gate_gap: f32,
    pub gate_speed: f32,
    pub spawn_interval: u64,
    pub gate_width_fraction: f32,
    pub gate_top_margin: f32,
    pub flyer_x: f32,
    pub flyer_start_y: f32,
    pub flyer_width: f32,
    pub flyer_height: f32,
    pub tilt_divisor: f32,
    pub backdrop_scroll: f32,
    pub ground_strip_height: f32,
    pub banner_width: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            gravity: GRAVITY,
            lift: LIFT,
            drag: DRAG,
            gate_gap: GATE_GAP,
            gate_speed: GATE_SPEED,
            spawn_interval: SPAWN_INTERVAL,
            gate_width_fraction: GATE_WIDTH_FRACTION,
            gate_top_margin: GATE_TOP_MARGIN,
            flyer_x: FLYER_X,
            flyer_start_y: FLYER_START_Y,
            flyer_width: FLYER_WIDTH,
            flyer_height: FLYER_HEIGHT,
            tilt_divisor: FLYER_TILT_DIVISOR,
            backdrop_scroll: BACKDROP_SCROLL,
            ground_strip_height: GROUND_STRIP_HEIGHT,
            banner_width: BANNER_WIDTH,
        }
    }
}

impl Tuning {
    /// Parse tuning from JSON; missing fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str::<Tuning>(json).map(Tuning::sanitized)
    }

    /// Replace values that would break simulation invariants with defaults
    pub fn sanitized(mut self) -> Self {
        let defaults = Tuning::default();

        if !(self.drag > 0.0 && self.drag < 1.0) {
            log::warn!("Tuning: drag {} outside (0, 1), using {}", self.drag, defaults.drag);
            self.drag = defaults.drag;
        }
        if !self.gravity.is_finite() {
            log::warn!("Tuning: gravity is not finite, using {}", defaults.gravity);
            self.gravity = defaults.gravity;
        }
        if !(self.lift.is_finite() && self.lift < 0.0) {
            log::warn!("Tuning: lift {} must be negative, using {}", self.lift, defaults.lift);
            self.lift = defaults.lift;
        }
        if self.spawn_interval == 0 {
            log::warn!("Tuning: spawn_interval 0, using {}", defaults.spawn_interval);
            self.spawn_interval = defaults.spawn_interval;
        }

        let positive = [
            ("gate_gap", &mut self.gate_gap, defaults.gate_gap),
            ("gate_speed", &mut self.gate_speed, defaults.gate_speed),
            (
                "gate_width_fraction",
                &mut self.gate_width_fraction,
                defaults.gate_width_fraction,
            ),
            ("flyer_width", &mut self.flyer_width, defaults.flyer_width),
            ("flyer_height", &mut self.flyer_height, defaults.flyer_height),
            ("tilt_divisor", &mut self.tilt_divisor, defaults.tilt_divisor),
            ("banner_width", &mut self.banner_width, defaults.banner_width),
        ];
        for (name, value, default) in positive {
            if !(value.is_finite() && *value > 0.0) {
                log::warn!("Tuning: {} must be positive, using {}", name, default);
                *value = default;
            }
        }

        self
    }
}
