//! Frame orchestrator
//!
//! Owns the game state and runs the fixed per-frame pipeline:
//! tick (running only) -> render -> phase transition -> schedule.
//! Hosts supply the drawing surface, the frame scheduler (the browser's
//! animation frame, or a manual loop) and the HUD.

use crate::highscores::HighScores;
use crate::renderer::{Assets, Backdrop, FrameLayout, RenderSurface, render_frame};
use crate::settings::{GameConfig, Settings};
use crate::sim::{GameState, Phase, TerminalCause, TickInput, TickOutcome, tick};

/// Requests one more frame from the host
pub trait FrameScheduler {
    fn schedule_next_frame(&mut self);
}

/// One-way UI outputs outside the drawing surface
pub trait Hud {
    fn show_score(&mut self, score: u32);
    /// Show the restart control with its top edge at `top`
    fn show_restart(&mut self, top: f32);
    fn hide_restart(&mut self);
}

/// What one frame did
#[derive(Debug, Clone, Copy)]
pub struct FrameReport {
    pub outcome: TickOutcome,
    /// Phase after the frame
    pub phase: Phase,
    pub scheduled: bool,
    pub layout: FrameLayout,
}

pub struct Game {
    state: GameState,
    settings: Settings,
    assets: Assets,
    backdrop: Backdrop,
    high_scores: HighScores,
    /// Impulse requested since the last tick
    pending_impulse: bool,
    autopilot: bool,
    /// A frame has been scheduled and not run yet
    frame_pending: bool,
}

impl Game {
    pub fn new(seed: u64, config: GameConfig, assets: Assets) -> Self {
        Self {
            state: GameState::with_tuning(seed, config.tuning),
            settings: config.settings,
            assets,
            backdrop: Backdrop::default(),
            high_scores: HighScores::new(),
            pending_impulse: false,
            autopilot: false,
            frame_pending: false,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn high_scores(&self) -> &HighScores {
        &self.high_scores
    }

    pub fn autopilot(&self) -> bool {
        self.autopilot
    }

    pub fn set_autopilot(&mut self, on: bool) {
        self.autopilot = on;
        log::info!("Autopilot: {}", on);
    }

    /// Start the loop: first frame request plus initial HUD state
    pub fn start(&mut self, scheduler: &mut dyn FrameScheduler, hud: &mut dyn Hud) {
        hud.show_score(self.state.session.score);
        hud.hide_restart();
        self.schedule(scheduler);
    }

    /// Host display size changed
    pub fn resize(&mut self, width: f32, height: f32) {
        self.state.resize(width, height);
    }

    /// Key press / click. Ignored once the run is over.
    pub fn request_impulse(&mut self) {
        if self.state.session.phase == Phase::Running {
            self.pending_impulse = true;
        }
    }

    /// Restart control activated (valid in any phase)
    pub fn restart(&mut self, scheduler: &mut dyn FrameScheduler, hud: &mut dyn Hud) {
        self.state.restart();
        self.pending_impulse = false;
        hud.hide_restart();
        hud.show_score(0);
        log::info!("Run restarted");

        // A running loop already has its next frame queued
        if !self.frame_pending {
            self.schedule(scheduler);
        }
    }

    /// Run one animation frame
    pub fn run_frame(
        &mut self,
        surface: &mut dyn RenderSurface,
        scheduler: &mut dyn FrameScheduler,
        hud: &mut dyn Hud,
    ) -> FrameReport {
        self.frame_pending = false;

        match self.state.session.phase {
            Phase::Running => {
                let input = TickInput {
                    impulse: std::mem::take(&mut self.pending_impulse),
                    autopilot: self.autopilot,
                };
                let outcome = tick(&mut self.state, &input);
                if outcome.gates.scored > 0 {
                    hud.show_score(self.state.session.score);
                }

                // The frame that ends the run is still drawn as a running frame
                let layout = self.render(surface);

                if let Some(cause) = outcome.terminal {
                    self.finish(cause);
                }

                // Either the next tick or the one terminal frame
                self.schedule(scheduler);

                FrameReport {
                    outcome,
                    phase: self.state.session.phase,
                    scheduled: true,
                    layout,
                }
            }
            Phase::Terminal => {
                let layout = self.render(surface);
                if let Some(top) = layout.restart_top {
                    hud.show_restart(top);
                }

                FrameReport {
                    outcome: TickOutcome::default(),
                    phase: Phase::Terminal,
                    scheduled: false,
                    layout,
                }
            }
        }
    }

    fn render(&mut self, surface: &mut dyn RenderSurface) -> FrameLayout {
        render_frame(
            surface,
            &self.state,
            &self.assets,
            &mut self.backdrop,
            &self.settings,
            self.high_scores.top_score(),
        )
    }

    fn finish(&mut self, cause: TerminalCause) {
        if !self.state.session.end() {
            return;
        }
        let score = self.state.session.score;
        let ticks = self.state.session.ticks;
        log::info!("Run over ({:?}): score {} after {} ticks", cause, score, ticks);

        if let Some(rank) = self.high_scores.add_score(score, ticks) {
            if rank == 1 {
                log::info!("New best score: {}", score);
            }
        }
    }

    fn schedule(&mut self, scheduler: &mut dyn FrameScheduler) {
        scheduler.schedule_next_frame();
        self.frame_pending = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::{DrawCall, RecordingSurface, colors};
    use crate::sim::Obstacle;

    #[derive(Default)]
    struct CountingScheduler {
        requests: usize,
    }

    impl FrameScheduler for CountingScheduler {
        fn schedule_next_frame(&mut self) {
            self.requests += 1;
        }
    }

    #[derive(Default)]
    struct TestHud {
        scores: Vec<u32>,
        restart_top: Option<f32>,
    }

    impl Hud for TestHud {
        fn show_score(&mut self, score: u32) {
            self.scores.push(score);
        }

        fn show_restart(&mut self, top: f32) {
            self.restart_top = Some(top);
        }

        fn hide_restart(&mut self) {
            self.restart_top = None;
        }
    }

    struct Host {
        surface: RecordingSurface,
        scheduler: CountingScheduler,
        hud: TestHud,
    }

    impl Host {
        fn new() -> Self {
            Self {
                surface: RecordingSurface::new(),
                scheduler: CountingScheduler::default(),
                hud: TestHud::default(),
            }
        }

        fn frame(&mut self, game: &mut Game) -> FrameReport {
            game.run_frame(&mut self.surface, &mut self.scheduler, &mut self.hud)
        }
    }

    fn game() -> Game {
        let mut game = Game::new(11, GameConfig::default(), Assets::default());
        game.resize(480.0, 640.0);
        game
    }

    fn has_overlay(surface: &RecordingSurface) -> bool {
        surface
            .calls()
            .iter()
            .any(|c| matches!(c, DrawCall::FillRect { color, .. } if *color == colors::DIM_OVERLAY))
    }

    #[test]
    fn test_start_schedules_first_frame() {
        let mut game = game();
        let mut host = Host::new();
        game.start(&mut host.scheduler, &mut host.hud);
        assert_eq!(host.scheduler.requests, 1);
        assert_eq!(host.hud.scores, vec![0]);
    }

    #[test]
    fn test_fall_to_terminal_and_stop() {
        let mut game = game();
        let mut host = Host::new();

        let mut frames = 0;
        let death = loop {
            let report = host.frame(&mut game);
            frames += 1;
            assert!(report.scheduled);
            if report.phase == Phase::Terminal {
                break report;
            }
            assert!(frames < 1000, "never reached the ground");
        };

        // Death frame is drawn as a running frame
        assert_eq!(death.outcome.terminal, Some(TerminalCause::Ground));
        assert!(!has_overlay(&host.surface));
        assert_eq!(host.hud.restart_top, None);
        assert_eq!(host.scheduler.requests, frames);

        // One terminal frame, nothing scheduled after it
        let report = host.frame(&mut game);
        assert!(!report.scheduled);
        assert!(!report.outcome.advanced);
        assert!(has_overlay(&host.surface));
        assert!(host.hud.restart_top.is_some());
        assert_eq!(host.scheduler.requests, frames);

        // Terminal state is frozen
        let ticks = game.state().session.ticks;
        let velocity = game.state().flyer.velocity;
        game.request_impulse();
        host.frame(&mut game);
        assert_eq!(game.state().session.ticks, ticks);
        assert_eq!(game.state().flyer.velocity, velocity);
    }

    #[test]
    fn test_restart_resumes_loop() {
        let mut game = game();
        let mut host = Host::new();
        while host.frame(&mut game).phase == Phase::Running {}
        host.frame(&mut game);
        let requests = host.scheduler.requests;

        game.restart(&mut host.scheduler, &mut host.hud);
        assert_eq!(host.scheduler.requests, requests + 1);
        assert_eq!(host.hud.restart_top, None);
        assert_eq!(host.hud.scores.last(), Some(&0));

        let state = game.state();
        assert_eq!(state.session.phase, Phase::Running);
        assert_eq!(state.session.ticks, 0);
        assert_eq!(state.session.score, 0);
        assert!(state.gates.is_empty());
        assert_eq!(state.flyer.pos, glam::Vec2::new(50.0, 150.0));

        let report = host.frame(&mut game);
        assert!(report.outcome.advanced);
        assert!(report.scheduled);
    }

    #[test]
    fn test_restart_while_running_keeps_single_loop() {
        let mut game = game();
        let mut host = Host::new();
        game.start(&mut host.scheduler, &mut host.hud);
        for _ in 0..5 {
            host.frame(&mut game);
        }
        let requests = host.scheduler.requests;
        game.restart(&mut host.scheduler, &mut host.hud);
        assert_eq!(host.scheduler.requests, requests);
        assert_eq!(game.state().session.ticks, 0);
    }

    #[test]
    fn test_restart_before_terminal_frame_keeps_single_loop() {
        let mut game = game();
        let mut host = Host::new();
        while host.frame(&mut game).phase == Phase::Running {}
        let requests = host.scheduler.requests;

        // The terminal presentation frame is still queued
        game.restart(&mut host.scheduler, &mut host.hud);
        assert_eq!(host.scheduler.requests, requests);
        assert!(host.frame(&mut game).outcome.advanced);
    }

    #[test]
    fn test_restart_drops_queued_impulse() {
        let mut game = game();
        let mut host = Host::new();
        for _ in 0..5 {
            host.frame(&mut game);
        }
        game.request_impulse();
        game.restart(&mut host.scheduler, &mut host.hud);

        // First tick of the new run falls from rest
        host.frame(&mut game);
        assert!(game.state().flyer.velocity > 0.0);
    }

    #[test]
    fn test_impulse_applies_on_next_tick() {
        let mut game = game();
        let mut host = Host::new();
        game.request_impulse();
        host.frame(&mut game);
        assert!(game.state().flyer.velocity < 0.0);
        // Consumed: the following tick falls again
        let before = game.state().flyer.velocity;
        host.frame(&mut game);
        assert!(game.state().flyer.velocity > before);
    }

    #[test]
    fn test_score_shown_on_increment() {
        let mut game = game();
        let mut host = Host::new();
        // Gate already left of the flyer column, opening around the flyer
        game.state.gates.push(Obstacle::new(-40.0, 50.0, 350.0, 0));
        host.frame(&mut game);
        assert_eq!(game.state().session.score, 1);
        assert_eq!(host.hud.scores, vec![1]);

        host.frame(&mut game);
        assert_eq!(host.hud.scores, vec![1]);
    }

    #[test]
    fn test_terminal_records_high_score() {
        let mut game = game();
        let mut host = Host::new();
        game.state.gates.push(Obstacle::new(-40.0, 50.0, 350.0, 0));
        while host.frame(&mut game).phase == Phase::Running {}
        assert_eq!(game.high_scores().top_score(), Some(1));

        host.frame(&mut game);
        assert_eq!(host.surface.texts(), vec!["Final Score: 1"]);
    }

    #[test]
    fn test_best_line_when_enabled() {
        let config = GameConfig {
            settings: Settings {
                show_best: true,
                ..Default::default()
            },
            ..Default::default()
        };
        let mut game = Game::new(11, config, Assets::default());
        game.resize(480.0, 640.0);
        let mut host = Host::new();
        game.state.gates.push(Obstacle::new(-40.0, 50.0, 350.0, 0));
        while host.frame(&mut game).phase == Phase::Running {}
        host.frame(&mut game);
        assert_eq!(host.surface.texts(), vec!["Final Score: 1", "Best: 1"]);
    }

    #[test]
    fn test_autopilot_flag_passes_through() {
        let mut game = game();
        game.set_autopilot(true);
        assert!(game.autopilot());
        let mut host = Host::new();
        // Falling below the viewport middle triggers impulses
        for _ in 0..300 {
            host.frame(&mut game);
        }
        assert_eq!(game.state().session.phase, Phase::Running);
        assert!(game.state().flyer.pos.y < 640.0 - 12.0);
    }
}
