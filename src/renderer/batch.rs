//! Triangle batching backend for [`Canvas`]
//!
//! Shapes are tessellated into a single vertex list for the WebGPU pipeline.
//! Text can't be drawn with plain triangles, so labels are collected for the
//! DOM overlay instead.

use glam::Vec2;

use super::canvas::{Canvas, Color};
use super::shapes;
use super::vertex::Vertex;

/// A text label to be positioned by the host
#[derive(Debug, Clone, PartialEq)]
pub struct TextLabel {
    pub text: String,
    pub center: Vec2,
    pub size: f32,
    pub color: Color,
}

/// Collects one frame's geometry
#[derive(Debug, Clone)]
pub struct ShapeBatch {
    size: Vec2,
    alpha: f32,
    clear_color: Color,
    vertices: Vec<Vertex>,
    labels: Vec<TextLabel>,
}

impl ShapeBatch {
    pub fn new(size: Vec2) -> Self {
        Self {
            size,
            alpha: 1.0,
            clear_color: [0.0, 0.0, 0.0, 1.0],
            vertices: Vec::with_capacity(4096),
            labels: Vec::new(),
        }
    }

    /// Follow a viewport resize
    pub fn resize(&mut self, size: Vec2) {
        self.size = size;
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn labels(&self) -> &[TextLabel] {
        &self.labels
    }

    pub fn clear_color(&self) -> Color {
        self.clear_color
    }

    fn tint(&self, color: Color) -> Color {
        [color[0], color[1], color[2], color[3] * self.alpha]
    }
}

impl Canvas for ShapeBatch {
    fn size(&self) -> Vec2 {
        self.size
    }

    fn clear(&mut self, color: Color) {
        self.vertices.clear();
        self.labels.clear();
        self.alpha = 1.0;
        self.clear_color = color;
    }

    fn set_alpha(&mut self, alpha: f32) {
        self.alpha = alpha.clamp(0.0, 1.0);
    }

    fn fill_rect(&mut self, origin: Vec2, size: Vec2, color: Color) {
        let color = self.tint(color);
        self.vertices
            .extend_from_slice(&shapes::rect(origin, size, color));
    }

    fn fill_triangle(&mut self, a: Vec2, b: Vec2, c: Vec2, color: Color) {
        let color = self.tint(color);
        self.vertices
            .extend_from_slice(&shapes::triangle(a, b, c, color));
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color) {
        let color = self.tint(color);
        let segments = shapes::circle_segments(radius);
        self.vertices
            .extend(shapes::circle(center, radius, color, segments));
    }

    fn stroke_line(&mut self, from: Vec2, to: Vec2, width: f32, color: Color) {
        let color = self.tint(color);
        self.vertices
            .extend_from_slice(&shapes::line(from, to, width, color));
    }

    fn stroke_dashed_line(
        &mut self,
        from: Vec2,
        to: Vec2,
        width: f32,
        dash: f32,
        gap: f32,
        color: Color,
    ) {
        let color = self.tint(color);
        self.vertices
            .extend(shapes::dashed_line(from, to, width, dash, gap, color));
    }

    fn fill_text(&mut self, text: &str, center: Vec2, size: f32, color: Color) {
        let color = self.tint(color);
        self.labels.push(TextLabel {
            text: text.to_string(),
            center,
            size,
            color,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alpha_tints_vertices() {
        let mut batch = ShapeBatch::new(Vec2::new(400.0, 800.0));
        batch.set_alpha(0.5);
        batch.fill_rect(Vec2::ZERO, Vec2::ONE, [1.0, 0.0, 0.0, 0.8]);
        assert!(batch.vertices().iter().all(|v| (v.color[3] - 0.4).abs() < 1e-6));
    }

    #[test]
    fn test_clear_resets_frame() {
        let mut batch = ShapeBatch::new(Vec2::new(400.0, 800.0));
        batch.set_alpha(0.2);
        batch.fill_circle(Vec2::ZERO, 5.0, [1.0; 4]);
        batch.fill_text("WC", Vec2::ZERO, 12.0, [0.0, 0.0, 0.0, 1.0]);

        batch.clear([1.0; 4]);
        assert!(batch.vertices().is_empty());
        assert!(batch.labels().is_empty());
        assert_eq!(batch.clear_color(), [1.0; 4]);

        batch.fill_rect(Vec2::ZERO, Vec2::ONE, [1.0; 4]);
        assert_eq!(batch.vertices()[0].color[3], 1.0);
    }

    #[test]
    fn test_text_becomes_label() {
        let mut batch = ShapeBatch::new(Vec2::new(400.0, 800.0));
        batch.fill_text("WC", Vec2::new(200.0, 100.0), 12.0, [0.0, 0.0, 0.0, 1.0]);
        assert_eq!(batch.labels().len(), 1);
        assert_eq!(batch.labels()[0].text, "WC");
        assert!(batch.vertices().is_empty());
    }
}
