//! Tileable triangle grid
//!
//! Cells alternate their diagonal in a checkerboard so neighbouring triangles
//! line up into continuous diagonals across the whole grid.

use super::cell::Cell;
use super::triangle::{Triangle, TriangleDir};
use crate::error::GeometryError;
use crate::geom::Vector2;
use crate::renderer::{Canvas, Color};

/// Diagonal orientation for the cell at (row, col)
pub fn checkerboard_dir(row: usize, col: usize) -> TriangleDir {
    if (row % 2 == 0) ^ (col % 2 == 0) {
        TriangleDir::TopLeft
    } else {
        TriangleDir::TopRight
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    pub triangle_size: f64,
    pub rows: usize,
    pub cols: usize,
    /// Row-major cells
    pub cells: Vec<Vec<Cell>>,
    pub visible: bool,
}

impl Grid {
    /// Tile `floor(width/size) × floor(height/size)` cells from the origin
    pub fn new(width: f64, height: f64, triangle_size: f64) -> Result<Self, GeometryError> {
        let width = GeometryError::check_dimension("width", width)?;
        let height = GeometryError::check_dimension("height", height)?;
        let triangle_size = GeometryError::check_dimension("triangle_size", triangle_size)?;

        let cols = (width / triangle_size).floor() as usize;
        let rows = (height / triangle_size).floor() as usize;

        let cells = (0..rows)
            .map(|row| {
                (0..cols)
                    .map(|col| {
                        Cell::split(
                            checkerboard_dir(row, col),
                            col as f64 * triangle_size,
                            row as f64 * triangle_size,
                            triangle_size,
                        )
                    })
                    .collect()
            })
            .collect();

        log::debug!("Grid {}x{} cells at size {}", rows, cols, triangle_size);

        Ok(Self {
            triangle_size,
            rows,
            cols,
            cells,
            visible: true,
        })
    }

    pub fn width(&self) -> f64 {
        self.cols as f64 * self.triangle_size
    }

    pub fn height(&self) -> f64 {
        self.rows as f64 * self.triangle_size
    }

    /// Rebuild the grid for a new triangle size, keeping the covered area
    pub fn resize(&mut self, width: f64, height: f64, triangle_size: f64) -> Result<(), GeometryError> {
        let visible = self.visible;
        *self = Self::new(width, height, triangle_size)?;
        self.visible = visible;
        Ok(())
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<&Cell> {
        self.cells.get(row)?.get(col)
    }

    pub fn cell_mut(&mut self, row: usize, col: usize) -> Option<&mut Cell> {
        self.cells.get_mut(row)?.get_mut(col)
    }

    /// (row, col) of the cell under a canvas point
    pub fn cell_at_point(&self, p: Vector2) -> Option<(usize, usize)> {
        if p.x < 0.0 || p.y < 0.0 {
            return None;
        }
        let row = (p.y / self.triangle_size).floor() as usize;
        let col = (p.x / self.triangle_size).floor() as usize;
        (row < self.rows && col < self.cols).then_some((row, col))
    }

    /// The triangle under a canvas point (for hover highlighting)
    pub fn triangle_at_point_mut(&mut self, p: Vector2) -> Option<&mut Triangle> {
        let (row, col) = self.cell_at_point(p)?;
        let cell = self.cell_mut(row, col)?;
        if cell.tri1.contains_point(p) {
            Some(&mut cell.tri1)
        } else {
            Some(&mut cell.tri2)
        }
    }

    pub fn triangles(&self) -> impl Iterator<Item = &Triangle> {
        self.cells.iter().flatten().flat_map(|cell| cell.triangles())
    }

    pub fn triangles_mut(&mut self) -> impl Iterator<Item = &mut Triangle> {
        self.cells
            .iter_mut()
            .flatten()
            .flat_map(|cell| cell.triangles_mut())
    }

    pub fn set_fill_color(&mut self, color: Color) {
        for tri in self.triangles_mut() {
            tri.fill_color = color;
        }
    }

    pub fn set_stroke_color(&mut self, color: Color) {
        for tri in self.triangles_mut() {
            tri.stroke_color = color;
        }
    }

    pub fn draw(&self, canvas: &mut impl Canvas) {
        if !self.visible {
            return;
        }
        for tri in self.triangles() {
            tri.draw(canvas);
        }
    }
}
