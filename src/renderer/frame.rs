//! Per-frame composition
//!
//! Fixed draw order: clear, backdrop, then either gates + flyer (running) or
//! dim overlay + banner + score text (terminal).

use glam::Vec2;

use super::{Assets, RenderSurface, TextAlign, TextStyle, aspect_ratio, colors};
use crate::settings::Settings;
use crate::sim::{GameState, Phase, Rect};

const SCORE_FONT: &str = "bold 30px Arial";
const BEST_FONT: &str = "bold 20px Arial";

/// Where the host should put its restart control, when it is shown
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameLayout {
    /// Top edge of the restart affordance (terminal frames only)
    pub restart_top: Option<f32>,
}

/// Scrolling sky and ground strips
#[derive(Debug, Clone, Default)]
pub struct Backdrop {
    offset: f32,
}

impl Backdrop {
    pub fn offset(&self) -> f32 {
        self.offset
    }

    /// Scroll left by `amount`, wrapping after one viewport width
    pub fn scroll(&mut self, amount: f32, viewport_width: f32) {
        self.offset -= amount;
        if self.offset <= -viewport_width {
            self.offset = 0.0;
        }
    }

    pub fn draw(&self, surface: &mut dyn RenderSurface, state: &GameState) {
        let w = state.viewport.width();
        let h = state.viewport.height();
        let strip = state.tuning.ground_strip_height;

        surface.fill_rect(Rect::new(0.0, 0.0, w, h), colors::SKY);
        for i in 0..2 {
            surface.fill_rect(
                Rect::new(i as f32 * w + self.offset, h - strip, w, strip),
                colors::GROUND,
            );
        }
    }
}

/// Draw one complete frame for the current state
pub fn render_frame(
    surface: &mut dyn RenderSurface,
    state: &GameState,
    assets: &Assets,
    backdrop: &mut Backdrop,
    settings: &Settings,
    best: Option<u32>,
) -> FrameLayout {
    surface.clear();

    if !settings.reduced_motion {
        backdrop.scroll(state.tuning.backdrop_scroll, state.viewport.width());
    }
    backdrop.draw(surface, state);

    match state.session.phase {
        Phase::Running => {
            draw_gates(surface, state, assets);
            draw_flyer(surface, state, assets, settings);
            FrameLayout::default()
        }
        Phase::Terminal => draw_game_over(surface, state, assets, settings, best),
    }
}

/// Gate sprites are stretched to fill each barrier
fn draw_gates(surface: &mut dyn RenderSurface, state: &GameState, assets: &Assets) {
    let width = state.viewport.gate_width();
    let height = state.viewport.height();

    for gate in state.gates.iter() {
        let image = assets.gates[gate.variant() % assets.gates.len()];
        surface.draw_image(image, Rect::new(gate.x, 0.0, width, gate.top()));
        surface.draw_image(
            image,
            Rect::new(gate.x, gate.bottom(), width, height - gate.bottom()),
        );
    }
}

/// Flyer keeps its sprite aspect: width is fixed, height follows the image
fn draw_flyer(surface: &mut dyn RenderSurface, state: &GameState, assets: &Assets, settings: &Settings) {
    let flyer = &state.flyer;
    let aspect = aspect_ratio(surface, assets.flyer, flyer.size.x / flyer.size.y);
    let size = Vec2::new(flyer.size.x, flyer.size.x / aspect);
    let angle = if settings.reduced_motion {
        0.0
    } else {
        flyer.tilt(state.tuning.tilt_divisor)
    };
    surface.draw_image_rotated(assets.flyer, Rect::from_center(flyer.pos, size), angle);
}

fn draw_game_over(
    surface: &mut dyn RenderSurface,
    state: &GameState,
    assets: &Assets,
    settings: &Settings,
    best: Option<u32>,
) -> FrameLayout {
    let w = state.viewport.width();
    let h = state.viewport.height();

    surface.fill_rect(Rect::new(0.0, 0.0, w, h), colors::DIM_OVERLAY);

    let banner_w = state.tuning.banner_width;
    let banner_h = banner_w / aspect_ratio(surface, assets.banner, 1.0);
    surface.draw_image(
        assets.banner,
        Rect::new(
            w / 2.0 - banner_w / 2.0,
            h / 2.0 - banner_h / 2.0 - 100.0,
            banner_w,
            banner_h,
        ),
    );

    let score_y = h / 2.0 + banner_h / 2.0 + 20.0;
    surface.draw_text(
        &format!("Final Score: {}", state.session.score),
        Vec2::new(w / 2.0, score_y),
        &TextStyle {
            font: SCORE_FONT,
            color: colors::GOLD,
            align: TextAlign::Center,
        },
    );

    if settings.show_best {
        if let Some(best) = best {
            surface.draw_text(
                &format!("Best: {}", best),
                Vec2::new(w / 2.0, score_y + 36.0),
                &TextStyle {
                    font: BEST_FONT,
                    color: colors::WHITE,
                    align: TextAlign::Center,
                },
            );
        }
    }

    FrameLayout {
        restart_top: Some(h / 2.0 + banner_h / 2.0 + 50.0),
    }
}
