//! Frame rendering
//!
//! The game only needs four drawing capabilities: clear, fill a rectangle,
//! draw an image into a rectangle and draw text. Hosts implement
//! [`RenderSurface`] over whatever they have (canvas 2D in the browser, a
//! recorder in tests and in the headless runner).

pub mod frame;
pub mod recording;

pub use frame::{Backdrop, FrameLayout, render_frame};
pub use recording::{DrawCall, RecordingSurface};

use glam::Vec2;

use crate::consts::GATE_VARIANTS;
use crate::sim::Rect;

/// Opaque handle to an image owned by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ImageId(pub usize);

/// Images the frame draws
#[derive(Debug, Clone)]
pub struct Assets {
    pub flyer: ImageId,
    /// Interchangeable gate sprites, picked by `Obstacle::variant`
    pub gates: [ImageId; GATE_VARIANTS],
    /// Game-over banner
    pub banner: ImageId,
}

impl Default for Assets {
    fn default() -> Self {
        Self {
            flyer: ImageId(0),
            gates: [ImageId(1), ImageId(2), ImageId(3)],
            banner: ImageId(4),
        }
    }
}

/// sRGB color with alpha
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f32,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// CSS color string for canvas `fillStyle`
    pub fn to_css(&self) -> String {
        if self.a >= 1.0 {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
        }
    }
}

/// Palette
pub mod colors {
    use super::Color;

    pub const SKY: Color = Color::rgb(0x4e, 0xc0, 0xca);
    pub const GROUND: Color = Color::rgb(0x33, 0xaa, 0xaa);
    pub const DIM_OVERLAY: Color = Color::rgba(0, 0, 0, 0.8);
    pub const GOLD: Color = Color::rgb(0xff, 0xd7, 0x00);
    pub const WHITE: Color = Color::rgb(0xff, 0xff, 0xff);
}

/// Horizontal anchoring of text relative to its position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextAlign {
    #[default]
    Left,
    Center,
}

impl TextAlign {
    pub fn as_str(&self) -> &'static str {
        match self {
            TextAlign::Left => "left",
            TextAlign::Center => "center",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextStyle {
    /// CSS font shorthand
    pub font: &'static str,
    pub color: Color,
    pub align: TextAlign,
}

/// Drawing capabilities the game needs from its host
pub trait RenderSurface {
    /// Wipe the whole surface
    fn clear(&mut self);

    fn fill_rect(&mut self, rect: Rect, color: Color);

    /// Draw an image stretched to `dest`
    fn draw_image(&mut self, image: ImageId, dest: Rect);

    /// Draw an image stretched to `dest`, rotated by `angle` radians about the
    /// center of `dest`
    fn draw_image_rotated(&mut self, image: ImageId, dest: Rect, angle: f32) {
        let _ = angle;
        self.draw_image(image, dest);
    }

    fn draw_text(&mut self, text: &str, pos: Vec2, style: &TextStyle);

    /// Intrinsic pixel size, `None` while the image is not available
    fn image_size(&self, image: ImageId) -> Option<Vec2>;
}

/// Width / height of an image, or `fallback` when unknown or degenerate
pub fn aspect_ratio(surface: &dyn RenderSurface, image: ImageId, fallback: f32) -> f32 {
    match surface.image_size(image) {
        Some(size) if size.x > 0.0 && size.y > 0.0 => size.x / size.y,
        _ => fallback,
    }
}
