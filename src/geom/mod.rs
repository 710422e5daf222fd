//! Geometry core
//!
//! Pure value-type math: no I/O, no hidden state. Operations that need a direction
//! return `GeometryError::DegenerateGeometry` for zero-length input.

pub mod arc;
pub mod segment;
pub mod vector;

pub use arc::AngleArc;
pub use segment::{Angles, LineSegment, SegmentStyle};
pub use vector::{Vector2, angle_between, dot_product, magnitude, normalize, reflect};
