//! Angle arcs for annotating sketches
//!
//! An arc is centered on a point and swept clockwise (on a y-down canvas) from
//! `start_angle` to `end_angle`. Used to show the angle between two segments and
//! the incidence/reflection angles at a collision point.

use serde::{Deserialize, Serialize};

use super::segment::LineSegment;
use super::vector::{self, Vector2};
use crate::error::GeometryError;
use crate::normalize_angle;
use crate::renderer::{Canvas, Color, Stroke};

/// An angle annotation arc
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AngleArc {
    pub center: Vector2,
    pub radius: f64,
    /// Start angle (radians, normalized to [0, 2π))
    pub start_angle: f64,
    /// End angle (radians, normalized to [0, 2π))
    pub end_angle: f64,
}

impl AngleArc {
    pub fn new(center: Vector2, radius: f64, start_angle: f64, end_angle: f64) -> Self {
        Self {
            center,
            radius,
            start_angle: normalize_angle(start_angle),
            end_angle: normalize_angle(end_angle),
        }
    }

    /// Arc swept from direction `from` to direction `to`
    pub fn from_directions(
        center: Vector2,
        radius: f64,
        from: Vector2,
        to: Vector2,
    ) -> Result<Self, GeometryError> {
        Ok(Self::new(center, radius, vector::heading(from)?, vector::heading(to)?))
    }

    /// The smaller of the two arcs between directions `a` and `b`
    pub fn minor(center: Vector2, radius: f64, a: Vector2, b: Vector2) -> Result<Self, GeometryError> {
        let arc = Self::from_directions(center, radius, a, b)?;
        if arc.sweep() <= std::f64::consts::PI {
            Ok(arc)
        } else {
            Ok(Self::new(center, radius, arc.end_angle, arc.start_angle))
        }
    }

    /// Clockwise arc from segment `a` to segment `b`, drawn at `a.pt1`
    pub fn between_segments(
        a: &LineSegment,
        b: &LineSegment,
        radius: f64,
    ) -> Result<Self, GeometryError> {
        Ok(Self::new(a.pt1, radius, a.heading()?, b.heading()?))
    }

    /// Angle-of-incidence and angle-of-reflection arcs at a contact point
    ///
    /// Incidence is measured between the normal and the reversed incoming velocity,
    /// reflection between the normal and the outgoing velocity.
    pub fn reflection_arcs(
        contact: Vector2,
        normal: Vector2,
        incoming: Vector2,
        outgoing: Vector2,
        radius: f64,
    ) -> Result<(AngleArc, AngleArc), GeometryError> {
        let incidence = Self::minor(contact, radius, normal, -incoming)?;
        let reflection = Self::minor(contact, radius, normal, outgoing)?;
        Ok((incidence, reflection))
    }

    /// Clockwise sweep from start to end, in [0, 2π)
    pub fn sweep(&self) -> f64 {
        normalize_angle(self.end_angle - self.start_angle)
    }

    pub fn degrees(&self) -> f64 {
        self.sweep().to_degrees()
    }

    pub fn mid_angle(&self) -> f64 {
        normalize_angle(self.start_angle + self.sweep() / 2.0)
    }

    /// Check if an angle lies within the swept range
    pub fn contains_angle(&self, theta: f64) -> bool {
        normalize_angle(theta - self.start_angle) <= self.sweep()
    }

    /// Where to place the degrees label (outside the arc, at its middle)
    pub fn label_position(&self, distance_factor: f64) -> Vector2 {
        self.center + Vector2::from_angle(self.mid_angle()) * self.radius * distance_factor
    }

    /// Sample points along the arc (for rendering or debugging)
    pub fn sample_points(&self, num_points: usize) -> Vec<Vector2> {
        let span = self.sweep();

        (0..num_points)
            .map(|i| {
                let t = i as f64 / (num_points.saturating_sub(1)).max(1) as f64;
                self.center + Vector2::from_angle(self.start_angle + t * span) * self.radius
            })
            .collect()
    }

    /// Draw the arc, optionally with a degrees label
    pub fn draw(&self, canvas: &mut impl Canvas, stroke: Stroke, label: Option<Color>) {
        canvas.arc(self.center, self.radius, self.start_angle, self.end_angle, stroke);
        if let Some(color) = label {
            canvas.text(
                self.label_position(1.4),
                &format!("{:.0}°", self.degrees()),
                0.0,
                color,
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::{CommandBuffer, DrawCommand};
    use std::f64::consts::{FRAC_PI_2, FRAC_PI_4, PI, TAU};

    const EPS: f64 = 1e-9;

    #[test]
    fn test_arc_sweep_wraps() {
        let arc = AngleArc::new(Vector2::ZERO, 10.0, 3.0 * FRAC_PI_2, FRAC_PI_2);
        assert!((arc.sweep() - PI).abs() < EPS);
        assert!(arc.contains_angle(0.0));
        assert!(!arc.contains_angle(PI));
    }

    #[test]
    fn test_minor_picks_smaller_side() {
        // From +y (π/2) to +x (0): the direct sweep is 3π/2, the minor arc is π/2
        let arc = AngleArc::minor(Vector2::ZERO, 5.0, Vector2::Y, Vector2::X).unwrap();
        assert!((arc.sweep() - FRAC_PI_2).abs() < EPS);
        assert_eq!(arc.start_angle, 0.0);
        assert!(AngleArc::minor(Vector2::ZERO, 5.0, Vector2::ZERO, Vector2::X).is_err());
    }

    #[test]
    fn test_between_segments() {
        let a = LineSegment::from_coords(0.0, 0.0, 10.0, 0.0);
        let b = LineSegment::from_coords(0.0, 0.0, 10.0, 10.0);
        let arc = AngleArc::between_segments(&a, &b, 20.0).unwrap();
        assert_eq!(arc.center, Vector2::ZERO);
        assert!((arc.sweep() - FRAC_PI_4).abs() < EPS);
        assert!((arc.degrees() - 45.0).abs() < EPS);
    }

    #[test]
    fn test_reflection_arcs_are_equal() {
        // Ball falling down-right onto a floor whose normal points up (y-down canvas)
        let normal = Vector2::new(0.0, -1.0);
        let incoming = Vector2::new(1.0, 1.0);
        let outgoing = vector::reflect(incoming, normal).unwrap();
        let (inc, refl) =
            AngleArc::reflection_arcs(Vector2::ZERO, normal, incoming, outgoing, 30.0).unwrap();
        assert!((inc.sweep() - FRAC_PI_4).abs() < EPS);
        assert!((refl.sweep() - FRAC_PI_4).abs() < EPS);
        // Mirror images about the normal
        let normal_heading = vector::heading(normal).unwrap();
        assert!((inc.mid_angle() + refl.mid_angle() - 2.0 * normal_heading).abs() < EPS);
    }

    #[test]
    fn test_sample_points() {
        let arc = AngleArc::new(Vector2::new(1.0, 1.0), 2.0, 0.0, FRAC_PI_2);
        let pts = arc.sample_points(3);
        assert_eq!(pts.len(), 3);
        assert!((pts[0] - Vector2::new(3.0, 1.0)).length() < EPS);
        assert!((pts[2] - Vector2::new(1.0, 3.0)).length() < EPS);
        assert_eq!(arc.sample_points(1).len(), 1);
    }

    #[test]
    fn test_draw_with_label() {
        let arc = AngleArc::new(Vector2::ZERO, 10.0, 0.0, TAU / 8.0);
        let mut buf = CommandBuffer::new();
        arc.draw(&mut buf, Stroke::default(), Some(Color::BLACK));
        assert!(matches!(buf.commands[0], DrawCommand::Arc { .. }));
        assert_eq!(buf.texts().collect::<Vec<_>>(), vec!["45°"]);
    }
}
