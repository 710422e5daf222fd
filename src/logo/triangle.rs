//! Right triangles, the atom of the logo and grid
//!
//! A triangle fills half of a `size`×`size` square whose top-left corner is at
//! `(x, y)`. Its `direction` names the corner holding the right angle.

use serde::{Deserialize, Serialize};

use crate::geom::{Vector2, vector};
use crate::renderer::{Canvas, Color, Stroke};

/// Corner of the square that holds the right angle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TriangleDir {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl TriangleDir {
    pub const ALL: [TriangleDir; 4] = [
        TriangleDir::TopLeft,
        TriangleDir::TopRight,
        TriangleDir::BottomLeft,
        TriangleDir::BottomRight,
    ];

    /// The triangle that completes the square along the shared hypotenuse
    pub fn opposite(self) -> Self {
        match self {
            TriangleDir::TopLeft => TriangleDir::BottomRight,
            TriangleDir::TopRight => TriangleDir::BottomLeft,
            TriangleDir::BottomLeft => TriangleDir::TopRight,
            TriangleDir::BottomRight => TriangleDir::TopLeft,
        }
    }

    /// Vertices in the unit square, right-angle corner first
    pub fn unit_points(self) -> [Vector2; 3] {
        let (tl, tr, bl, br) = (
            Vector2::new(0.0, 0.0),
            Vector2::new(1.0, 0.0),
            Vector2::new(0.0, 1.0),
            Vector2::new(1.0, 1.0),
        );
        match self {
            TriangleDir::TopLeft => [tl, tr, bl],
            TriangleDir::TopRight => [tr, br, tl],
            TriangleDir::BottomLeft => [bl, tl, br],
            TriangleDir::BottomRight => [br, bl, tr],
        }
    }
}

/// Position, size and rotation of a triangle (what animations interpolate)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    /// Top-left corner of the bounding square
    pub pos: Vector2,
    pub size: f64,
    /// Rotation about the square's center (radians)
    pub angle: f64,
}

impl Transform {
    pub fn lerp(&self, target: &Transform, amount: f64) -> Transform {
        Transform {
            pos: self.pos.lerp(target.pos, amount),
            size: self.size + (target.size - self.size) * amount,
            angle: self.angle + (target.angle - self.angle) * amount,
        }
    }

    /// Largest difference in position, size or angle
    pub fn distance(&self, other: &Transform) -> f64 {
        self.pos
            .distance(other.pos)
            .max((self.size - other.size).abs())
            .max((self.angle - other.angle).abs())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Triangle {
    pub direction: TriangleDir,
    pub transform: Transform,
    pub fill_color: Color,
    pub stroke_color: Color,
    pub stroke_weight: f64,
    pub visible: bool,
    pub fill_visible: bool,
    pub stroke_visible: bool,
}

impl Triangle {
    pub fn new(direction: TriangleDir, x: f64, y: f64, size: f64) -> Self {
        Self {
            direction,
            transform: Transform {
                pos: Vector2::new(x, y),
                size,
                angle: 0.0,
            },
            fill_color: Color::BLACK,
            stroke_color: Color::WHITE,
            stroke_weight: 1.0,
            visible: true,
            fill_visible: true,
            stroke_visible: true,
        }
    }

    pub fn x(&self) -> f64 {
        self.transform.pos.x
    }

    pub fn y(&self) -> f64 {
        self.transform.pos.y
    }

    pub fn size(&self) -> f64 {
        self.transform.size
    }

    /// Center of the bounding square (the rotation pivot)
    pub fn center(&self) -> Vector2 {
        self.transform.pos + Vector2::splat(self.transform.size / 2.0)
    }

    /// Canvas-space vertices, rotation applied
    pub fn points(&self) -> [Vector2; 3] {
        let Transform { pos, size, angle } = self.transform;
        let center = self.center();
        let rotation = Vector2::from_angle(angle);
        self.direction
            .unit_points()
            .map(|p| center + rotation.rotate(pos + p * size - center))
    }

    /// Check if a point lies inside (or on the edge of) the triangle
    pub fn contains_point(&self, p: Vector2) -> bool {
        let [a, b, c] = self.points();
        let d1 = vector::cross_product(b - a, p - a);
        let d2 = vector::cross_product(c - b, p - b);
        let d3 = vector::cross_product(a - c, p - c);
        let has_neg = d1 < 0.0 || d2 < 0.0 || d3 < 0.0;
        let has_pos = d1 > 0.0 || d2 > 0.0 || d3 > 0.0;
        !(has_neg && has_pos)
    }

    pub fn translate(&mut self, offset: Vector2) {
        self.transform.pos += offset;
    }

    /// Whether drawing this triangle would emit anything
    pub fn is_drawn(&self) -> bool {
        self.visible && (self.fill_visible || self.stroke_visible)
    }

    pub fn draw(&self, canvas: &mut impl Canvas) {
        if !self.is_drawn() {
            return;
        }
        let fill = self.fill_visible.then_some(self.fill_color);
        let stroke = self
            .stroke_visible
            .then_some(Stroke::solid(self.stroke_color, self.stroke_weight));
        canvas.polygon(&self.points(), fill, stroke);
    }
}
