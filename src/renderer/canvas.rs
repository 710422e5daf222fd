//! Canvas adapter
//!
//! The rendering surface is external. Geometry types describe what to draw through
//! the `Canvas` trait; `CommandBuffer` records the calls so a host renderer (or a
//! test) can replay or tessellate them.

use serde::{Deserialize, Serialize};

use crate::geom::Vector2;

/// RGBA color, 8 bits per channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const TRANSPARENT: Color = Color::rgba(0, 0, 0, 0);
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Parse `#rrggbb` or `#rrggbbaa` (leading `#` optional)
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        let channel = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
        match hex.len() {
            6 => Some(Self::rgb(channel(0)?, channel(2)?, channel(4)?)),
            8 => Some(Self::rgba(channel(0)?, channel(2)?, channel(4)?, channel(6)?)),
            _ => None,
        }
    }

    pub fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }

    pub fn is_transparent(&self) -> bool {
        self.a == 0
    }

    /// Linear interpolation between two colors (t clamped to [0, 1])
    pub fn lerp(self, other: Color, t: f64) -> Color {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * t).round() as u8;
        Color::rgba(
            mix(self.r, other.r),
            mix(self.g, other.g),
            mix(self.b, other.b),
            mix(self.a, other.a),
        )
    }

    /// Normalized float channels for vertex buffers
    pub fn to_array(self) -> [f32; 4] {
        [
            self.r as f32 / 255.0,
            self.g as f32 / 255.0,
            self.b as f32 / 255.0,
            self.a as f32 / 255.0,
        ]
    }
}

/// Stroke (outline) attributes
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Stroke {
    pub color: Color,
    pub weight: f64,
    pub dashed: bool,
}

impl Stroke {
    pub const fn solid(color: Color, weight: f64) -> Self {
        Self {
            color,
            weight,
            dashed: false,
        }
    }

    pub const fn dashed(color: Color, weight: f64) -> Self {
        Self {
            color,
            weight,
            dashed: true,
        }
    }
}

impl Default for Stroke {
    fn default() -> Self {
        Self::solid(Color::BLACK, 2.0)
    }
}

/// Rendering surface consumed by `draw` methods
pub trait Canvas {
    fn line(&mut self, from: Vector2, to: Vector2, stroke: Stroke);

    /// Closed polygon. Fill assumes a convex outline.
    fn polygon(&mut self, points: &[Vector2], fill: Option<Color>, stroke: Option<Stroke>);

    fn circle(&mut self, center: Vector2, radius: f64, fill: Option<Color>, stroke: Option<Stroke>);

    /// Arc swept clockwise (y-down) from `start` to `end` radians
    fn arc(&mut self, center: Vector2, radius: f64, start: f64, end: f64, stroke: Stroke);

    fn text(&mut self, position: Vector2, text: &str, rotation: f64, color: Color);
}

/// A recorded canvas call
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Line {
        from: Vector2,
        to: Vector2,
        stroke: Stroke,
    },
    Polygon {
        points: Vec<Vector2>,
        fill: Option<Color>,
        stroke: Option<Stroke>,
    },
    Circle {
        center: Vector2,
        radius: f64,
        fill: Option<Color>,
        stroke: Option<Stroke>,
    },
    Arc {
        center: Vector2,
        radius: f64,
        start: f64,
        end: f64,
        stroke: Stroke,
    },
    Text {
        position: Vector2,
        text: String,
        rotation: f64,
        color: Color,
    },
}

/// Canvas that records every call in order
#[derive(Debug, Clone, Default)]
pub struct CommandBuffer {
    pub commands: Vec<DrawCommand>,
}

impl CommandBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Text of every recorded label
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.commands.iter().filter_map(|cmd| match cmd {
            DrawCommand::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }
}

impl Canvas for CommandBuffer {
    fn line(&mut self, from: Vector2, to: Vector2, stroke: Stroke) {
        self.commands.push(DrawCommand::Line { from, to, stroke });
    }

    fn polygon(&mut self, points: &[Vector2], fill: Option<Color>, stroke: Option<Stroke>) {
        self.commands.push(DrawCommand::Polygon {
            points: points.to_vec(),
            fill,
            stroke,
        });
    }

    fn circle(&mut self, center: Vector2, radius: f64, fill: Option<Color>, stroke: Option<Stroke>) {
        self.commands.push(DrawCommand::Circle {
            center,
            radius,
            fill,
            stroke,
        });
    }

    fn arc(&mut self, center: Vector2, radius: f64, start: f64, end: f64, stroke: Stroke) {
        self.commands.push(DrawCommand::Arc {
            center,
            radius,
            start,
            end,
            stroke,
        });
    }

    fn text(&mut self, position: Vector2, text: &str, rotation: f64, color: Color) {
        self.commands.push(DrawCommand::Text {
            position,
            text: text.to_string(),
            rotation,
            color,
        });
    }
}

/// Colors for sketch elements
pub mod colors {
    use super::Color;

    pub const BACKGROUND: Color = Color::rgb(250, 250, 250);
    pub const SEGMENT: Color = Color::rgb(40, 40, 40);
    pub const NORMAL: Color = Color::rgb(80, 120, 220);
    pub const BALL: Color = Color::rgba(200, 30, 120, 200);
    pub const ANGLE_ARC: Color = Color::rgb(230, 140, 20);
    pub const PREDICTION: Color = Color::rgba(30, 160, 90, 180);
    pub const LABEL: Color = Color::rgb(20, 20, 20);
}
