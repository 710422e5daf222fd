//! Triangle compositor: the Makeability Lab logo and the tileable background grid

pub mod cell;
pub mod grid;
pub mod makelab;
pub mod triangle;

pub use cell::{Cell, CellShape};
pub use grid::{Grid, checkerboard_dir};
pub use makelab::{LOGO_PALETTE, Letter, MakeabilityLabLogo, NUM_COLS, NUM_ROWS};
pub use triangle::{Transform, Triangle, TriangleDir};
