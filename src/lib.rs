//! Flap Gates - a side-scrolling reflex game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (flyer physics, gate stream, collisions, scoring)
//! - `renderer`: Host-agnostic frame composition over a canvas-like surface
//! - `game`: Per-frame orchestrator (tick, render, schedule)
//! - `tuning`: Data-driven game balance
//! - `settings`: Presentation preferences and config loading

pub mod game;
pub mod highscores;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use game::{FrameReport, FrameScheduler, Game, Hud};
pub use highscores::HighScores;
pub use settings::{GameConfig, Settings};
pub use tuning::Tuning;

/// Game configuration constants (defaults for [`Tuning`])
pub mod consts {
    /// Downward acceleration added to the flyer velocity every tick
    pub const GRAVITY: f32 = 0.3;
    /// Velocity the flyer is set to by an impulse (negative = up)
    pub const LIFT: f32 = -6.0;
    /// Air resistance multiplier applied after gravity (must be < 1)
    pub const DRAG: f32 = 0.98;

    /// Vertical opening between the top and bottom barrier of a gate
    pub const GATE_GAP: f32 = 350.0;
    /// Horizontal distance every gate travels per tick
    pub const GATE_SPEED: f32 = 2.5;
    /// A new gate is spawned every this many ticks
    pub const SPAWN_INTERVAL: u64 = 100;
    /// Gate width as a fraction of viewport width
    pub const GATE_WIDTH_FRACTION: f32 = 0.15;
    /// Minimum height of the top barrier
    pub const GATE_TOP_MARGIN: f32 = 50.0;
    /// Number of interchangeable gate sprites
    pub const GATE_VARIANTS: usize = 3;

    /// Flyer defaults
    pub const FLYER_X: f32 = 50.0;
    pub const FLYER_START_Y: f32 = 150.0;
    pub const FLYER_WIDTH: f32 = 34.0;
    pub const FLYER_HEIGHT: f32 = 24.0;
    /// Display tilt is velocity / this (radians)
    pub const FLYER_TILT_DIVISOR: f32 = 10.0;

    /// Backdrop scroll per rendered frame
    pub const BACKDROP_SCROLL: f32 = 0.5;
    /// Height of the ground strips at the bottom of the backdrop
    pub const GROUND_STRIP_HEIGHT: f32 = 100.0;
    /// Width of the game-over banner
    pub const BANNER_WIDTH: f32 = 300.0;

    /// Smallest accepted viewport dimension (guards aspect/random ranges)
    pub const MIN_VIEWPORT_DIM: f32 = 1.0;
    /// Viewport used before the host reports its real size
    pub const DEFAULT_VIEWPORT: (f32, f32) = (480.0, 640.0);
}
