//! A surface that records draw calls instead of drawing
//!
//! Used by tests and by the native headless runner.

use std::collections::HashMap;

use glam::Vec2;

use super::{Color, ImageId, RenderSurface, TextStyle};
use crate::sim::Rect;

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCall {
    Clear,
    FillRect { rect: Rect, color: Color },
    Image { image: ImageId, dest: Rect, angle: f32 },
    Text { text: String, pos: Vec2, style: TextStyle },
}

#[derive(Debug, Default)]
pub struct RecordingSurface {
    calls: Vec<DrawCall>,
    image_sizes: HashMap<ImageId, Vec2>,
    /// Calls recorded since creation, including cleared frames
    total_calls: usize,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Give an image an intrinsic size
    pub fn set_image_size(&mut self, image: ImageId, size: Vec2) {
        self.image_sizes.insert(image, size);
    }

    /// Calls of the most recent frame (since the last `clear`)
    pub fn calls(&self) -> &[DrawCall] {
        &self.calls
    }

    pub fn total_calls(&self) -> usize {
        self.total_calls
    }

    pub fn texts(&self) -> Vec<&str> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                DrawCall::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    fn record(&mut self, call: DrawCall) {
        self.total_calls += 1;
        self.calls.push(call);
    }
}

impl RenderSurface for RecordingSurface {
    fn clear(&mut self) {
        self.calls.clear();
        self.record(DrawCall::Clear);
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.record(DrawCall::FillRect { rect, color });
    }

    fn draw_image(&mut self, image: ImageId, dest: Rect) {
        self.draw_image_rotated(image, dest, 0.0);
    }

    fn draw_image_rotated(&mut self, image: ImageId, dest: Rect, angle: f32) {
        self.record(DrawCall::Image { image, dest, angle });
    }

    fn draw_text(&mut self, text: &str, pos: Vec2, style: &TextStyle) {
        self.record(DrawCall::Text {
            text: text.to_string(),
            pos,
            style: style.clone(),
        });
    }

    fn image_size(&self, image: ImageId) -> Option<Vec2> {
        self.image_sizes.get(&image).copied()
    }
}
