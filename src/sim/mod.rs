//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One tick per call, no wall-clock time
//! - Seeded RNG only
//! - Stable iteration order (gate creation order)
//! - No rendering or platform dependencies

pub mod collision;
pub mod obstacles;
pub mod rect;
pub mod state;
pub mod tick;
pub mod viewport;

pub use collision::{GateCheck, hits_gate, rect_overlap};
pub use obstacles::ObstacleStream;
pub use rect::Rect;
pub use state::{Flyer, FlyerStep, GameState, Obstacle, Phase, Session};
pub use tick::{TerminalCause, TickInput, TickOutcome, autopilot_input, tick};
pub use viewport::Viewport;
