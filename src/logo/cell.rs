//! Cells: a square split along one diagonal into two right triangles

use super::triangle::{Triangle, TriangleDir};
use crate::renderer::{Canvas, Color};

/// How a cell is filled, used as row-template data
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellShape {
    /// Neither triangle visible
    Empty,
    /// Both triangles visible, split with `dir` and its opposite
    Full(TriangleDir),
    /// Only the `dir` triangle visible; its opposite is the hidden shadow
    Half(TriangleDir),
}

/// Two triangles sharing one bounding square and its hypotenuse
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cell {
    pub tri1: Triangle,
    pub tri2: Triangle,
}

impl Cell {
    /// Cell split into `dir` and its opposite, both visible
    pub fn split(dir: TriangleDir, x: f64, y: f64, size: f64) -> Self {
        Self {
            tri1: Triangle::new(dir, x, y, size),
            tri2: Triangle::new(dir.opposite(), x, y, size),
        }
    }

    /// Build a cell from its template shape
    pub fn from_shape(shape: CellShape, x: f64, y: f64, size: f64) -> Self {
        match shape {
            CellShape::Empty => {
                let mut cell = Self::split(TriangleDir::TopLeft, x, y, size);
                cell.set_visible(false);
                cell
            }
            CellShape::Full(dir) => Self::split(dir, x, y, size),
            CellShape::Half(dir) => {
                let mut cell = Self::split(dir, x, y, size);
                cell.tri2.visible = false;
                cell
            }
        }
    }

    pub fn triangles(&self) -> [&Triangle; 2] {
        [&self.tri1, &self.tri2]
    }

    pub fn triangles_mut(&mut self) -> [&mut Triangle; 2] {
        [&mut self.tri1, &mut self.tri2]
    }

    pub fn visible_count(&self) -> usize {
        self.triangles().iter().filter(|t| t.visible).count()
    }

    pub fn is_empty(&self) -> bool {
        self.visible_count() == 0
    }

    pub fn set_visible(&mut self, visible: bool) {
        for tri in self.triangles_mut() {
            tri.visible = visible;
        }
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
        self.tri1.draw(canvas);
        self.tri2.draw(canvas);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_shapes() {
        let full = Cell::from_shape(CellShape::Full(TriangleDir::TopRight), 0.0, 0.0, 10.0);
        assert_eq!(full.visible_count(), 2);
        assert_eq!(full.tri2.direction, TriangleDir::BottomLeft);

        let half = Cell::from_shape(CellShape::Half(TriangleDir::BottomRight), 0.0, 0.0, 10.0);
        assert_eq!(half.visible_count(), 1);
        assert!(half.tri1.visible);
        assert_eq!(half.tri2.direction, TriangleDir::TopLeft);

        let empty = Cell::from_shape(CellShape::Empty, 0.0, 0.0, 10.0);
        assert!(empty.is_empty());
    }

    #[test]
    fn test_both_triangles_share_square() {
        let cell = Cell::split(TriangleDir::TopLeft, 30.0, 40.0, 10.0);
        assert_eq!(cell.tri1.transform, cell.tri2.transform);
    }

    #[test]
    fn test_bulk_setters() {
        let mut cell = Cell::split(TriangleDir::TopLeft, 0.0, 0.0, 10.0);
        cell.set_fill_color(Color::WHITE);
        cell.set_stroke_color(Color::BLACK);
        assert!(cell.triangles().iter().all(|t| t.fill_color == Color::WHITE));
        assert!(cell.triangles().iter().all(|t| t.stroke_color == Color::BLACK));
    }
}
