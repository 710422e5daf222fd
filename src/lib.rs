//! Sketchkit - geometry toolkit for frame-driven creative-coding sketches
//!
//! Core modules:
//! - `geom`: Vector and line-segment math (heading, normals, projection, reflection)
//! - `sim`: Ball/segment collision, expected-collision prediction, per-frame scene tick
//! - `logo`: Triangle cells, the tileable triangle grid and the Makeability Lab logo
//! - `renderer`: Canvas adapter and draw-command tessellation
//! - `events`: Typed publish/subscribe for sketch events
//! - `serial`: Serial transport boundary and line-frame codec
//! - `settings`: Data-driven sketch configuration

pub mod error;
pub mod events;
pub mod geom;
pub mod logo;
pub mod renderer;
pub mod serial;
pub mod settings;
pub mod sim;

pub use error::{FrameError, GeometryError, SerialError, SettingsError};
pub use geom::{AngleArc, Angles, LineSegment, SegmentStyle, Vector2};
pub use settings::SketchSettings;

use std::f64::consts::TAU;

/// Sketch configuration constants
pub mod consts {
    /// Default canvas dimensions (pixels)
    pub const CANVAS_WIDTH: f64 = 640.0;
    pub const CANVAS_HEIGHT: f64 = 480.0;

    /// Contact points closer than this to a segment endpoint use point-normal reflection
    pub const ENDPOINT_TOLERANCE: f64 = 1.0;

    /// Ball defaults (pixels, pixels/frame)
    pub const BALL_RADIUS: f64 = 20.0;
    pub const BALL_MIN_SPEED: f64 = 1.0;
    pub const BALL_MAX_SPEED: f64 = 6.0;

    /// Default side length of a logo/grid triangle cell
    pub const TRIANGLE_SIZE: f64 = 50.0;

    /// Radius of the angle arcs drawn at collision points
    pub const ANGLE_ARC_RADIUS: f64 = 30.0;

    /// Default serial port speed (bits per second)
    pub const SERIAL_BAUD_RATE: u32 = 9600;

    /// Tolerance used when comparing derived angles
    pub const ANGLE_EPSILON: f64 = 1e-9;
}

/// Normalize an angle to [0, 2π)
#[inline]
pub fn normalize_angle(angle: f64) -> f64 {
    let wrapped = angle.rem_euclid(TAU);
    // rem_euclid can round up to exactly TAU for tiny negative inputs
    if wrapped >= TAU { 0.0 } else { wrapped }
}

/// Convert polar (r, theta) to cartesian (x, y)
#[inline]
pub fn polar_to_cartesian(r: f64, theta: f64) -> Vector2 {
    Vector2::new(r * theta.cos(), r * theta.sin())
}

/// Convert cartesian (x, y) to polar (r, theta), theta in [0, 2π)
#[inline]
pub fn cartesian_to_polar(pos: Vector2) -> (f64, f64) {
    (pos.length(), normalize_angle(pos.y.atan2(pos.x)))
}
