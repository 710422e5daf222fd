//! Directed line segments
//!
//! A segment owns its two endpoints. Heading, magnitude and normals are derived on
//! every call; sketches mutate `pt2` each frame to trace the mouse or a moving
//! ball, so nothing derived is cached.

use std::f64::consts::TAU;

use serde::{Deserialize, Serialize};

use super::vector::{self, Vector2};
use crate::error::GeometryError;
use crate::normalize_angle;
use crate::renderer::{Canvas, Color, Stroke, colors};

/// Length of the arrowhead barbs
const ARROWHEAD_SIZE: f64 = 8.0;
/// Drawn length of each normal
const NORMAL_DRAW_LENGTH: f64 = 25.0;
/// Distance of labels from the segment
const LABEL_OFFSET: f64 = 12.0;

/// Presentation attributes (not geometry)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SegmentStyle {
    pub stroke: Stroke,
    pub show_arrowhead: bool,
    pub show_heading_label: bool,
    pub show_magnitude_label: bool,
    pub show_normals: bool,
}

impl Default for SegmentStyle {
    fn default() -> Self {
        Self {
            stroke: Stroke::solid(colors::SEGMENT, 2.0),
            show_arrowhead: false,
            show_heading_label: false,
            show_magnitude_label: false,
            show_normals: false,
        }
    }
}

/// Clockwise and counterclockwise sweep between two directions
///
/// The two always sum to 2π.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Angles {
    pub clockwise: f64,
    pub counterclockwise: f64,
}

/// A directed segment from `pt1` to `pt2`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LineSegment {
    pub pt1: Vector2,
    pub pt2: Vector2,
    #[serde(default)]
    pub style: SegmentStyle,
}

impl LineSegment {
    pub fn new(pt1: Vector2, pt2: Vector2) -> Self {
        Self {
            pt1,
            pt2,
            style: SegmentStyle::default(),
        }
    }

    pub fn from_coords(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self::new(Vector2::new(x1, y1), Vector2::new(x2, y2))
    }

    /// New segment sharing another segment's endpoint positions (not its style)
    pub fn from_segment(other: &LineSegment) -> Self {
        Self::new(other.pt1, other.pt2)
    }

    pub fn with_style(mut self, style: SegmentStyle) -> Self {
        self.style = style;
        self
    }

    /// Direction vector `pt2 - pt1`
    #[inline]
    pub fn direction(&self) -> Vector2 {
        self.pt2 - self.pt1
    }

    /// The same direction as a segment anchored at the origin
    pub fn at_origin(&self) -> LineSegment {
        LineSegment::new(Vector2::ZERO, self.direction())
    }

    #[inline]
    pub fn magnitude(&self) -> f64 {
        self.direction().length()
    }

    /// Whether the endpoints coincide (no heading, no normals)
    pub fn is_degenerate(&self) -> bool {
        vector::is_zero(self.direction())
    }

    pub fn midpoint(&self) -> Vector2 {
        (self.pt1 + self.pt2) * 0.5
    }

    /// Heading of `pt1 -> pt2` in [0, 2π)
    pub fn heading(&self) -> Result<f64, GeometryError> {
        vector::heading(self.direction()).map_err(|_| Self::degenerate())
    }

    /// The two perpendiculars `(dy, -dx)` and `(-dy, dx)`, same length as the segment
    pub fn normals(&self) -> Result<[Vector2; 2], GeometryError> {
        if self.is_degenerate() {
            return Err(Self::degenerate());
        }
        let v = self.direction();
        Ok([Vector2::new(v.y, -v.x), Vector2::new(-v.y, v.x)])
    }

    /// The two normals scaled to unit length
    pub fn unit_normals(&self) -> Result<[Vector2; 2], GeometryError> {
        let [a, b] = self.normals()?;
        Ok([vector::normalize(a)?, vector::normalize(b)?])
    }

    /// Unit normal on the same side of the line as `point`
    ///
    /// For a point on the line itself the first normal is returned.
    pub fn normal_facing(&self, point: Vector2) -> Result<Vector2, GeometryError> {
        let [a, b] = self.unit_normals()?;
        if vector::dot_product(a, point - self.pt1) >= 0.0 {
            Ok(a)
        } else {
            Ok(b)
        }
    }

    /// Angles between the directions of two segments, both moved to the origin
    pub fn angles_between(a: &LineSegment, b: &LineSegment) -> Result<Angles, GeometryError> {
        if a.is_degenerate() || b.is_degenerate() {
            return Err(Self::degenerate());
        }
        let signed = vector::angle_between(a.direction(), b.direction())?;
        let clockwise = normalize_angle(signed);
        Ok(Angles {
            clockwise,
            counterclockwise: TAU - clockwise,
        })
    }

    /// Angles from this segment to `other`
    pub fn angles_to(&self, other: &LineSegment) -> Result<Angles, GeometryError> {
        Self::angles_between(self, other)
    }

    /// Closest point on the segment (not the infinite line) to `point`
    pub fn orthogonal_projection(&self, point: Vector2) -> Vector2 {
        let dir = self.direction();
        if vector::is_zero(dir) {
            return self.pt1;
        }
        let length = dir.length();
        let unit = dir / length;
        let t = vector::dot_product(point - self.pt1, unit).clamp(0.0, length);
        self.pt1 + unit * t
    }

    /// Distance from `point` to the nearest point on the segment
    pub fn distance(&self, point: Vector2) -> f64 {
        (point - self.orthogonal_projection(point)).length()
    }

    /// Move `pt2` so the segment has `length`, keeping `pt1` and the direction
    pub fn set_magnitude(&mut self, length: f64) -> Result<(), GeometryError> {
        if !(length.is_finite() && length >= 0.0) {
            return Err(GeometryError::InvalidDimension {
                name: "length",
                value: length,
            });
        }
        let unit = vector::normalize(self.direction()).map_err(|_| Self::degenerate())?;
        self.pt2 = self.pt1 + unit * length;
        Ok(())
    }

    pub fn translate(&mut self, offset: Vector2) {
        self.pt1 += offset;
        self.pt2 += offset;
    }

    /// The segment pointing the other way
    pub fn reversed(&self) -> LineSegment {
        LineSegment {
            pt1: self.pt2,
            pt2: self.pt1,
            style: self.style,
        }
    }

    fn degenerate() -> GeometryError {
        GeometryError::DegenerateGeometry("zero-length segment")
    }

    /// Draw the segment and whichever annotations its style enables
    pub fn draw(&self, canvas: &mut impl Canvas) {
        let stroke = self.style.stroke;
        canvas.line(self.pt1, self.pt2, stroke);

        // Annotations need a direction
        let Ok(heading) = self.heading() else {
            return;
        };

        if self.style.show_arrowhead {
            let solid = Stroke { dashed: false, ..stroke };
            for barb in [heading + 5.0 * TAU / 12.0, heading - 5.0 * TAU / 12.0] {
                let tip = self.pt2 + Vector2::from_angle(barb) * ARROWHEAD_SIZE;
                canvas.line(self.pt2, tip, solid);
            }
        }

        if self.style.show_normals {
            if let Ok(normals) = self.unit_normals() {
                let mid = self.midpoint();
                let normal_stroke = Stroke::dashed(colors::NORMAL, 1.0);
                for n in normals {
                    canvas.line(mid, mid + n * NORMAL_DRAW_LENGTH, normal_stroke);
                }
            }
        }

        if self.style.show_heading_label || self.style.show_magnitude_label {
            let mut parts = Vec::with_capacity(2);
            if self.style.show_heading_label {
                parts.push(format!("{:.1}°", heading.to_degrees()));
            }
            if self.style.show_magnitude_label {
                parts.push(format!("{:.1}", self.magnitude()));
            }
            // Label sits above the line on the first normal's side
            let offset = Vector2::from_angle(heading - TAU / 4.0) * LABEL_OFFSET;
            canvas.text(
                self.midpoint() + offset,
                &parts.join(" "),
                heading,
                label_color(stroke.color),
            );
        }
    }
}

fn label_color(stroke: Color) -> Color {
    if stroke.is_transparent() { colors::LABEL } else { stroke }
}
