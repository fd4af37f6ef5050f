//! Immediate-mode drawing surface
//!
//! Coordinates are surface pixels with the origin at the top-left and y
//! pointing down. Every fill is multiplied by the current global alpha.

use glam::Vec2;

pub type Color = [f32; 4];

/// A 2D surface the scene can be drawn onto
pub trait Canvas {
    /// Size in logical pixels
    fn size(&self) -> Vec2;

    /// Wipe everything and fill with `color`
    fn clear(&mut self, color: Color);

    /// Global alpha applied to subsequent draws (0-1)
    fn set_alpha(&mut self, alpha: f32);

    fn fill_rect(&mut self, origin: Vec2, size: Vec2, color: Color);

    fn fill_triangle(&mut self, a: Vec2, b: Vec2, c: Vec2, color: Color);

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color);

    fn stroke_line(&mut self, from: Vec2, to: Vec2, width: f32, color: Color);

    fn stroke_dashed_line(
        &mut self,
        from: Vec2,
        to: Vec2,
        width: f32,
        dash: f32,
        gap: f32,
        color: Color,
    );

    /// Centered text, `size` in pixels
    fn fill_text(&mut self, text: &str, center: Vec2, size: f32, color: Color);
}
