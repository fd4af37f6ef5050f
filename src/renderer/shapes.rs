//! Shape generation for 2D primitives
//!
//! Everything is emitted as a triangle list in surface pixels (y down).

use glam::Vec2;
use std::f32::consts::PI;

use super::vertex::Vertex;

/// Segment count that keeps circles smooth without wasting triangles
pub fn circle_segments(radius: f32) -> u32 {
    ((radius * 1.5) as u32).clamp(12, 48)
}

/// Generate vertices for a filled triangle
pub fn triangle(a: Vec2, b: Vec2, c: Vec2, color: [f32; 4]) -> [Vertex; 3] {
    [
        Vertex::new(a.x, a.y, color),
        Vertex::new(b.x, b.y, color),
        Vertex::new(c.x, c.y, color),
    ]
}

/// Generate vertices for an axis-aligned rectangle
pub fn rect(origin: Vec2, size: Vec2, color: [f32; 4]) -> [Vertex; 6] {
    let (x0, y0) = (origin.x, origin.y);
    let (x1, y1) = (origin.x + size.x, origin.y + size.y);
    [
        Vertex::new(x0, y0, color),
        Vertex::new(x1, y0, color),
        Vertex::new(x0, y1, color),
        Vertex::new(x0, y1, color),
        Vertex::new(x1, y0, color),
        Vertex::new(x1, y1, color),
    ]
}

/// Generate vertices for a filled circle
pub fn circle(center: Vec2, radius: f32, color: [f32; 4], segments: u32) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity((segments * 3) as usize);

    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * 2.0 * PI;
        let theta2 = ((i + 1) as f32 / segments as f32) * 2.0 * PI;

        // Triangle from center to edge
        vertices.push(Vertex::new(center.x, center.y, color));
        vertices.push(Vertex::new(
            center.x + radius * theta1.cos(),
            center.y + radius * theta1.sin(),
            color,
        ));
        vertices.push(Vertex::new(
            center.x + radius * theta2.cos(),
            center.y + radius * theta2.sin(),
            color,
        ));
    }

    vertices
}

/// Generate vertices for a thick line segment (a quad along the segment)
pub fn line(from: Vec2, to: Vec2, width: f32, color: [f32; 4]) -> [Vertex; 6] {
    let dir = (to - from).normalize_or_zero();
    let perp = Vec2::new(-dir.y, dir.x) * (width / 2.0);

    let a = from + perp;
    let b = from - perp;
    let c = to + perp;
    let d = to - perp;

    [
        Vertex::new(a.x, a.y, color),
        Vertex::new(b.x, b.y, color),
        Vertex::new(c.x, c.y, color),
        Vertex::new(c.x, c.y, color),
        Vertex::new(b.x, b.y, color),
        Vertex::new(d.x, d.y, color),
    ]
}

/// Generate vertices for a dashed line, starting with a dash at `from`
pub fn dashed_line(
    from: Vec2,
    to: Vec2,
    width: f32,
    dash: f32,
    gap: f32,
    color: [f32; 4],
) -> Vec<Vertex> {
    let length = from.distance(to);
    let period = dash + gap;
    if length <= 0.0 || dash <= 0.0 || period <= 0.0 {
        return Vec::new();
    }

    let dir = (to - from) / length;
    let dashes = (length / period).ceil() as usize;
    let mut vertices = Vec::with_capacity(dashes * 6);

    let mut start = 0.0;
    while start < length {
        let end = (start + dash).min(length);
        vertices.extend_from_slice(&line(from + dir * start, from + dir * end, width, color));
        start += period;
    }

    vertices
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_circle_vertex_count() {
        let verts = circle(Vec2::ZERO, 10.0, [1.0; 4], 16);
        assert_eq!(verts.len(), 48);
        assert_eq!(verts[0].position, [0.0, 0.0]);
    }

    #[test]
    fn test_circle_segments_clamped() {
        assert_eq!(circle_segments(1.0), 12);
        assert_eq!(circle_segments(100.0), 48);
    }

    #[test]
    fn test_line_has_width() {
        let verts = line(Vec2::new(0.0, 0.0), Vec2::new(0.0, 10.0), 4.0, [1.0; 4]);
        let xs: Vec<f32> = verts.iter().map(|v| v.position[0]).collect();
        assert!(xs.iter().all(|x| (x.abs() - 2.0).abs() < 1e-5));
    }

    #[test]
    fn test_dashed_line_splits_into_dashes() {
        let verts = dashed_line(
            Vec2::ZERO,
            Vec2::new(0.0, 100.0),
            4.0,
            20.0,
            20.0,
            [1.0; 4],
        );
        // dashes at 0, 40, 80 (the last one clipped to 20 long)
        assert_eq!(verts.len(), 3 * 6);
    }

    #[test]
    fn test_rect_corners() {
        let verts = rect(Vec2::new(1.0, 2.0), Vec2::new(3.0, 4.0), [1.0; 4]);
        assert!(verts.iter().any(|v| v.position == [4.0, 6.0]));
        assert!(verts.iter().any(|v| v.position == [1.0, 2.0]));
    }
}
