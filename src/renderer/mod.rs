//! Rendering adapter
//!
//! Drawing is delegated to an external surface through `Canvas`.

pub mod canvas;
pub mod shapes;
pub mod vertex;

pub use canvas::{Canvas, Color, CommandBuffer, DrawCommand, Stroke, colors};
pub use shapes::tessellate;
pub use vertex::Vertex;
