//! Shape tessellation for 2D primitives
//!
//! Turns recorded draw commands into triangle lists. Text is left to the host
//! renderer.

use std::f64::consts::TAU;

use super::canvas::{Color, DrawCommand, Stroke};
use super::vertex::Vertex;
use crate::geom::Vector2;
use crate::normalize_angle;

/// Circle segments used when tessellating circles
pub const CIRCLE_SEGMENTS: u32 = 32;
/// Arc resolution
pub const ARC_SEGMENTS_PER_RADIAN: f64 = 8.0;
/// Dash and gap length for dashed strokes
pub const DASH_LENGTH: f64 = 6.0;
pub const DASH_GAP: f64 = 4.0;

/// Generate vertices for a thick line (two triangles)
pub fn line_quad(from: Vector2, to: Vector2, width: f64, color: Color) -> Vec<Vertex> {
    let dir = (to - from).normalize_or_zero();
    if dir == Vector2::ZERO {
        return Vec::new();
    }
    // Perpendicular for width
    let perp = Vector2::new(-dir.y, dir.x) * (width / 2.0);

    let v1a = from + perp;
    let v1b = from - perp;
    let v2a = to + perp;
    let v2b = to - perp;

    vec![
        Vertex::at(v1a, color),
        Vertex::at(v1b, color),
        Vertex::at(v2a, color),
        Vertex::at(v2a, color),
        Vertex::at(v1b, color),
        Vertex::at(v2b, color),
    ]
}

/// Generate vertices for a dashed line
pub fn dashed_line(from: Vector2, to: Vector2, width: f64, color: Color) -> Vec<Vertex> {
    let delta = to - from;
    let length = delta.length();
    if length == 0.0 {
        return Vec::new();
    }
    let dir = delta / length;

    let mut vertices = Vec::new();
    let mut t = 0.0;
    while t < length {
        let end = (t + DASH_LENGTH).min(length);
        vertices.extend(line_quad(from + dir * t, from + dir * end, width, color));
        t = end + DASH_GAP;
    }
    vertices
}

/// Generate vertices for a stroked polyline
pub fn polyline(points: &[Vector2], closed: bool, stroke: Stroke) -> Vec<Vertex> {
    if points.len() < 2 {
        return Vec::new();
    }
    let mut pairs: Vec<(Vector2, Vector2)> = points.windows(2).map(|w| (w[0], w[1])).collect();
    if closed {
        pairs.push((points[points.len() - 1], points[0]));
    }

    pairs
        .into_iter()
        .flat_map(|(a, b)| {
            if stroke.dashed {
                dashed_line(a, b, stroke.weight, stroke.color)
            } else {
                line_quad(a, b, stroke.weight, stroke.color)
            }
        })
        .collect()
}

/// Generate vertices for a filled convex polygon (triangle fan)
pub fn polygon_fan(points: &[Vector2], color: Color) -> Vec<Vertex> {
    if points.len() < 3 {
        return Vec::new();
    }
    let mut vertices = Vec::with_capacity((points.len() - 2) * 3);
    for i in 1..points.len() - 1 {
        vertices.push(Vertex::at(points[0], color));
        vertices.push(Vertex::at(points[i], color));
        vertices.push(Vertex::at(points[i + 1], color));
    }
    vertices
}

/// Generate vertices for a filled circle
pub fn circle(center: Vector2, radius: f64, color: Color, segments: u32) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity((segments * 3) as usize);

    for i in 0..segments {
        let theta1 = (i as f64 / segments as f64) * TAU;
        let theta2 = ((i + 1) as f64 / segments as f64) * TAU;

        // Triangle from center to edge
        vertices.push(Vertex::at(center, color));
        vertices.push(Vertex::at(center + Vector2::from_angle(theta1) * radius, color));
        vertices.push(Vertex::at(center + Vector2::from_angle(theta2) * radius, color));
    }

    vertices
}

/// Points along a clockwise (y-down) arc from `start` to `end`
pub fn arc_points(center: Vector2, radius: f64, start: f64, end: f64) -> Vec<Vector2> {
    let span = normalize_angle(end - start);
    let num_segments = ((span * ARC_SEGMENTS_PER_RADIAN).ceil() as usize).max(2);

    (0..=num_segments)
        .map(|i| {
            let theta = start + span * (i as f64 / num_segments as f64);
            center + Vector2::from_angle(theta) * radius
        })
        .collect()
}

/// Tessellate recorded commands into one triangle list
pub fn tessellate(commands: &[DrawCommand]) -> Vec<Vertex> {
    let mut vertices = Vec::new();

    for cmd in commands {
        match cmd {
            DrawCommand::Line { from, to, stroke } => {
                vertices.extend(polyline(&[*from, *to], false, *stroke));
            }
            DrawCommand::Polygon {
                points,
                fill,
                stroke,
            } => {
                if let Some(fill) = fill.filter(|c| !c.is_transparent()) {
                    vertices.extend(polygon_fan(points, fill));
                }
                if let Some(stroke) = stroke.filter(|s| !s.color.is_transparent()) {
                    vertices.extend(polyline(points, true, stroke));
                }
            }
            DrawCommand::Circle {
                center,
                radius,
                fill,
                stroke,
            } => {
                if let Some(fill) = fill.filter(|c| !c.is_transparent()) {
                    vertices.extend(circle(*center, *radius, fill, CIRCLE_SEGMENTS));
                }
                if let Some(stroke) = stroke.filter(|s| !s.color.is_transparent()) {
                    let outline = arc_points(*center, *radius, 0.0, TAU - 1e-9);
                    vertices.extend(polyline(&outline, true, stroke));
                }
            }
            DrawCommand::Arc {
                center,
                radius,
                start,
                end,
                stroke,
            } => {
                let points = arc_points(*center, *radius, *start, *end);
                vertices.extend(polyline(&points, false, *stroke));
            }
            DrawCommand::Text { .. } => {}
        }
    }

    vertices
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn test_line_quad() {
        let verts = line_quad(Vector2::ZERO, Vector2::new(10.0, 0.0), 2.0, Color::BLACK);
        assert_eq!(verts.len(), 6);
        assert_eq!(verts[0].position, [0.0, 1.0]);
        assert_eq!(verts[1].position, [0.0, -1.0]);
        assert!(line_quad(Vector2::ONE, Vector2::ONE, 2.0, Color::BLACK).is_empty());
    }

    #[test]
    fn test_dashed_line_has_gaps() {
        let solid = line_quad(Vector2::ZERO, Vector2::new(100.0, 0.0), 1.0, Color::BLACK);
        let dashed = dashed_line(Vector2::ZERO, Vector2::new(100.0, 0.0), 1.0, Color::BLACK);
        // 100 px at 6 on / 4 off gives 10 dashes
        assert_eq!(dashed.len(), solid.len() * 10);
    }

    #[test]
    fn test_polygon_fan() {
        let square = [
            Vector2::ZERO,
            Vector2::new(1.0, 0.0),
            Vector2::new(1.0, 1.0),
            Vector2::new(0.0, 1.0),
        ];
        assert_eq!(polygon_fan(&square, Color::BLACK).len(), 6);
        assert!(polygon_fan(&square[..2], Color::BLACK).is_empty());
    }

    #[test]
    fn test_arc_points_span() {
        let pts = arc_points(Vector2::ZERO, 10.0, 0.0, FRAC_PI_2);
        assert!((pts[0] - Vector2::new(10.0, 0.0)).length() < 1e-9);
        assert!((pts[pts.len() - 1] - Vector2::new(0.0, 10.0)).length() < 1e-9);
    }

    #[test]
    fn test_tessellate_skips_transparent_and_text() {
        let commands = vec![
            DrawCommand::Polygon {
                points: vec![Vector2::ZERO, Vector2::X, Vector2::Y],
                fill: Some(Color::TRANSPARENT),
                stroke: None,
            },
            DrawCommand::Text {
                position: Vector2::ZERO,
                text: "label".into(),
                rotation: 0.0,
                color: Color::BLACK,
            },
        ];
        assert!(tessellate(&commands).is_empty());

        let commands = vec![DrawCommand::Circle {
            center: Vector2::ZERO,
            radius: 5.0,
            fill: Some(Color::WHITE),
            stroke: None,
        }];
        assert_eq!(tessellate(&commands).len(), (CIRCLE_SEGMENTS * 3) as usize);
    }
}
