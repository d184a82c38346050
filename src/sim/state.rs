//! Game state and core simulation types
//!
//! Everything the tick mutates lives in [`GameState`]; there are no globals.

use glam::Vec2;
use serde::Serialize;

use super::obstacles::ObstacleStream;
use super::rect::Rect;
use super::viewport::Viewport;
use crate::tuning::Tuning;

/// Session phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Phase {
    /// Ticks are advancing
    Running,
    /// Run ended, waiting for an explicit restart
    Terminal,
}

/// What happened to the flyer during one integration step
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FlyerStep {
    /// Hit the floor (fatal)
    pub ground_hit: bool,
    /// Hit the ceiling (velocity zeroed, not fatal)
    pub ceiling_hit: bool,
}

/// The player-controlled flyer
///
/// `pos` is the center of the sprite; x never changes during a run.
#[derive(Debug, Clone, Serialize)]
pub struct Flyer {
    pub pos: Vec2,
    /// Vertical velocity (pixels per tick, positive = down)
    pub velocity: f32,
    pub size: Vec2,
    /// Position restored on restart
    start: Vec2,
}

impl Flyer {
    pub fn new(start: Vec2, size: Vec2) -> Self {
        Self {
            pos: start,
            velocity: 0.0,
            size,
            start,
        }
    }

    pub fn from_tuning(tuning: &Tuning) -> Self {
        Self::new(
            Vec2::new(tuning.flyer_x, tuning.flyer_start_y),
            Vec2::new(tuning.flyer_width, tuning.flyer_height),
        )
    }

    #[inline]
    pub fn half_height(&self) -> f32 {
        self.size.y / 2.0
    }

    /// Apply gravity, then drag, then move
    pub fn integrate(&mut self, gravity: f32, drag: f32) {
        self.velocity += gravity;
        self.velocity *= drag;
        self.pos.y += self.velocity;
    }

    /// Keep the flyer between ceiling (y=0) and `floor`
    ///
    /// The floor is checked first; touching it is fatal. Touching the ceiling
    /// only stops upward motion.
    pub fn clamp_to(&mut self, floor: f32) -> FlyerStep {
        let half = self.half_height();
        let mut step = FlyerStep::default();

        if self.pos.y + half >= floor {
            self.pos.y = floor - half;
            step.ground_hit = true;
        }

        if self.pos.y - half <= 0.0 {
            self.pos.y = half;
            self.velocity = 0.0;
            step.ceiling_hit = true;
        }

        step
    }

    /// One full physics step: integrate then clamp
    pub fn update(&mut self, tuning: &Tuning, floor: f32) -> FlyerStep {
        self.integrate(tuning.gravity, tuning.drag);
        self.clamp_to(floor)
    }

    /// Overwrite velocity with the lift impulse
    pub fn impulse(&mut self, lift: f32) {
        self.velocity = lift;
    }

    pub fn bounding_box(&self) -> Rect {
        Rect::from_center(self.pos, self.size)
    }

    /// Display-only tilt in radians
    pub fn tilt(&self, divisor: f32) -> f32 {
        self.velocity / divisor
    }

    /// Back to the start position at rest
    pub fn reset(&mut self) {
        self.pos = self.start;
        self.velocity = 0.0;
    }
}

/// A gate: top barrier, opening of `gap` pixels, bottom barrier
///
/// The opening is fixed at creation; only `x` moves.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Obstacle {
    /// Left edge
    pub x: f32,
    top: f32,
    gap: f32,
    variant: usize,
    scored: bool,
}

impl Obstacle {
    pub fn new(x: f32, top: f32, gap: f32, variant: usize) -> Self {
        Self {
            x,
            top,
            gap,
            variant,
            scored: false,
        }
    }

    /// Bottom edge of the top barrier
    #[inline]
    pub fn top(&self) -> f32 {
        self.top
    }

    /// Top edge of the bottom barrier
    #[inline]
    pub fn bottom(&self) -> f32 {
        self.top + self.gap
    }

    #[inline]
    pub fn gap(&self) -> f32 {
        self.gap
    }

    /// Sprite variant index
    #[inline]
    pub fn variant(&self) -> usize {
        self.variant
    }

    #[inline]
    pub fn right(&self, width: f32) -> f32 {
        self.x + width
    }

    #[inline]
    pub fn scored(&self) -> bool {
        self.scored
    }

    /// Set the scored flag; returns true only on the first call
    pub fn mark_scored(&mut self) -> bool {
        if self.scored {
            return false;
        }
        self.scored = true;
        true
    }
}

/// Score and lifecycle of one run
#[derive(Debug, Clone, Serialize)]
pub struct Session {
    pub score: u32,
    pub phase: Phase,
    /// Ticks since the run started
    pub ticks: u64,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            score: 0,
            phase: Phase::Running,
            ticks: 0,
        }
    }
}

impl Session {
    #[inline]
    pub fn is_terminal(&self) -> bool {
        self.phase == Phase::Terminal
    }

    /// Enter the terminal phase; returns false if already there
    pub fn end(&mut self) -> bool {
        if self.is_terminal() {
            return false;
        }
        self.phase = Phase::Terminal;
        true
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Complete game state (deterministic for a given seed and input sequence)
#[derive(Debug, Clone, Serialize)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub tuning: Tuning,
    pub viewport: Viewport,
    pub flyer: Flyer,
    pub gates: ObstacleStream,
    pub session: Session,
}

impl GameState {
    /// Create a new game state with the given seed and default tuning
    pub fn new(seed: u64) -> Self {
        Self::with_tuning(seed, Tuning::default())
    }

    pub fn with_tuning(seed: u64, tuning: Tuning) -> Self {
        let tuning = tuning.sanitized();
        let viewport = Viewport::new(
            crate::consts::DEFAULT_VIEWPORT.0,
            crate::consts::DEFAULT_VIEWPORT.1,
            tuning.gate_width_fraction,
        );
        Self {
            seed,
            flyer: Flyer::from_tuning(&tuning),
            gates: ObstacleStream::new(seed),
            session: Session::default(),
            viewport,
            tuning,
        }
    }

    /// Host display size changed
    pub fn resize(&mut self, width: f32, height: f32) {
        self.viewport.on_resize(width, height);
        log::debug!(
            "Viewport {}x{}, gate width {}",
            self.viewport.width(),
            self.viewport.height(),
            self.viewport.gate_width()
        );
    }

    /// Apply an impulse immediately; ignored once the run is over
    pub fn impulse(&mut self) -> bool {
        if self.session.is_terminal() {
            return false;
        }
        self.flyer.impulse(self.tuning.lift);
        true
    }

    /// Start a fresh run (keeps viewport, tuning and RNG stream)
    pub fn restart(&mut self) {
        self.gates.clear();
        self.flyer.reset();
        self.session.reset();
    }
}
