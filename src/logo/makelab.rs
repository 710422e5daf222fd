//! Makeability Lab logo
//!
//! A fixed 4×6 arrangement of cells. The M and L letterforms share the left
//! column; the diagonal strokes of the M are half cells whose hidden halves are
//! the "shadow" triangles that the reassemble animations fade in.
//!
//! Triangles are addressed by flat index `(row * NUM_COLS + col) * 2 + k`, where
//! `k` is 0 for a cell's first triangle and 1 for its second.

use std::f64::consts::TAU;

use rand::Rng;
use rand_pcg::Pcg32;

use super::cell::{Cell, CellShape};
use super::triangle::{Transform, Triangle, TriangleDir};
use crate::error::GeometryError;
use crate::geom::Vector2;
use crate::renderer::{Canvas, Color, Stroke};

pub const NUM_ROWS: usize = 4;
pub const NUM_COLS: usize = 6;
pub const NUM_TRIANGLES: usize = NUM_ROWS * NUM_COLS * 2;

const FULL_LEFT: CellShape = CellShape::Full(TriangleDir::TopLeft);
const FULL_RIGHT: CellShape = CellShape::Full(TriangleDir::TopRight);

/// Per-row cell shapes, top to bottom
const ROW_TEMPLATES: [[CellShape; NUM_COLS]; NUM_ROWS] = [
    [
        FULL_LEFT,
        CellShape::Half(TriangleDir::BottomLeft),
        CellShape::Empty,
        CellShape::Empty,
        CellShape::Half(TriangleDir::BottomRight),
        FULL_RIGHT,
    ],
    [
        FULL_LEFT,
        CellShape::Half(TriangleDir::TopRight),
        CellShape::Half(TriangleDir::BottomLeft),
        CellShape::Half(TriangleDir::BottomRight),
        CellShape::Half(TriangleDir::TopLeft),
        FULL_RIGHT,
    ],
    [
        FULL_LEFT,
        CellShape::Empty,
        CellShape::Half(TriangleDir::TopRight),
        CellShape::Half(TriangleDir::TopLeft),
        CellShape::Empty,
        FULL_RIGHT,
    ],
    [FULL_LEFT, FULL_LEFT, FULL_LEFT, FULL_LEFT, FULL_LEFT, FULL_RIGHT],
];

/// Closed outlines in cell units, clockwise from the top-left corner
const M_OUTLINE: [(f64, f64); 12] = [
    (0.0, 0.0),
    (1.0, 0.0),
    (3.0, 2.0),
    (5.0, 0.0),
    (6.0, 0.0),
    (6.0, 4.0),
    (5.0, 4.0),
    (5.0, 1.0),
    (3.0, 3.0),
    (1.0, 1.0),
    (1.0, 4.0),
    (0.0, 4.0),
];

const L_OUTLINE: [(f64, f64); 6] = [
    (0.0, 0.0),
    (1.0, 0.0),
    (1.0, 3.0),
    (5.0, 3.0),
    (5.0, 4.0),
    (0.0, 4.0),
];

/// Fill colors for the diagonal strokes of the M, in flat-index order
pub const LOGO_PALETTE: [Color; 8] = [
    Color::rgb(237, 28, 36),
    Color::rgb(247, 148, 29),
    Color::rgb(255, 222, 23),
    Color::rgb(141, 198, 63),
    Color::rgb(0, 166, 81),
    Color::rgb(0, 174, 239),
    Color::rgb(46, 49, 146),
    Color::rgb(146, 39, 143),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Letter {
    M,
    L,
}

pub const fn triangle_index(row: usize, col: usize, k: usize) -> usize {
    (row * NUM_COLS + col) * 2 + k
}

fn is_l_cell(row: usize, col: usize) -> bool {
    col == 0 || (row == NUM_ROWS - 1 && col < NUM_COLS - 1)
}

/// Triangle index lists by role, derived once from the row templates
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Roles {
    l: Vec<usize>,
    m_only: Vec<usize>,
    m_shadow: Vec<usize>,
    /// Visible triangles carrying a palette color
    accent: Vec<usize>,
    default_colored: Vec<usize>,
}

impl Roles {
    fn from_templates() -> Self {
        let mut roles = Roles::default();
        for (row, template) in ROW_TEMPLATES.iter().enumerate() {
            for (col, shape) in template.iter().enumerate() {
                let visible: &[usize] = match shape {
                    CellShape::Empty => &[],
                    CellShape::Full(_) => &[0, 1],
                    CellShape::Half(_) => {
                        roles.m_shadow.push(triangle_index(row, col, 1));
                        &[0]
                    }
                };
                for &k in visible {
                    let index = triangle_index(row, col, k);
                    if is_l_cell(row, col) {
                        roles.l.push(index);
                    } else {
                        roles.m_only.push(index);
                    }
                    if matches!(shape, CellShape::Half(_)) {
                        roles.accent.push(index);
                    } else {
                        roles.default_colored.push(index);
                    }
                }
            }
        }
        roles
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MakeabilityLabLogo {
    origin: Vector2,
    triangle_size: f64,
    cells: [[Cell; NUM_COLS]; NUM_ROWS],
    roles: Roles,
    /// Assembled layout, the target of `step_toward_home`
    home: Vec<Transform>,
    pub default_fill: Color,
    pub default_stroke: Color,
    pub m_outline_visible: bool,
    pub l_outline_visible: bool,
    pub m_outline_stroke: Stroke,
    pub l_outline_stroke: Stroke,
}

impl MakeabilityLabLogo {
    pub fn new(x: f64, y: f64, triangle_size: f64) -> Result<Self, GeometryError> {
        let triangle_size = GeometryError::check_dimension("triangle_size", triangle_size)?;

        let cells = std::array::from_fn(|row| {
            std::array::from_fn(|col| {
                Cell::from_shape(
                    ROW_TEMPLATES[row][col],
                    x + col as f64 * triangle_size,
                    y + row as f64 * triangle_size,
                    triangle_size,
                )
            })
        });

        let mut logo = Self {
            origin: Vector2::new(x, y),
            triangle_size,
            cells,
            roles: Roles::from_templates(),
            home: Vec::new(),
            default_fill: Color::WHITE,
            default_stroke: Color::BLACK,
            m_outline_visible: false,
            l_outline_visible: false,
            m_outline_stroke: Stroke::solid(Color::BLACK, 2.0),
            l_outline_stroke: Stroke::solid(Color::BLACK, 2.0),
        };
        logo.reset_colors();
        logo.home = logo.triangles().map(|t| t.transform).collect();

        log::info!(
            "Logo built at ({}, {}) with triangle size {}",
            x,
            y,
            triangle_size
        );
        Ok(logo)
    }

    pub fn x(&self) -> f64 {
        self.origin.x
    }

    pub fn y(&self) -> f64 {
        self.origin.y
    }

    pub fn triangle_size(&self) -> f64 {
        self.triangle_size
    }

    pub fn width(&self) -> f64 {
        NUM_COLS as f64 * self.triangle_size
    }

    pub fn height(&self) -> f64 {
        NUM_ROWS as f64 * self.triangle_size
    }

    pub fn cells(&self) -> &[[Cell; NUM_COLS]; NUM_ROWS] {
        &self.cells
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<&Cell> {
        self.cells.get(row)?.get(col)
    }

    pub fn cell_mut(&mut self, row: usize, col: usize) -> Option<&mut Cell> {
        self.cells.get_mut(row)?.get_mut(col)
    }

    pub fn triangle(&self, index: usize) -> Option<&Triangle> {
        let cell = index / 2;
        let [tri1, tri2] = self.cell(cell / NUM_COLS, cell % NUM_COLS)?.triangles();
        Some(if index % 2 == 0 { tri1 } else { tri2 })
    }

    pub fn triangle_mut(&mut self, index: usize) -> Option<&mut Triangle> {
        let cell = index / 2;
        let cell = self.cell_mut(cell / NUM_COLS, cell % NUM_COLS)?;
        Some(if index % 2 == 0 {
            &mut cell.tri1
        } else {
            &mut cell.tri2
        })
    }

    /// Every triangle in flat-index order
    pub fn triangles(&self) -> impl Iterator<Item = &Triangle> {
        self.cells.iter().flatten().flat_map(|cell| cell.triangles())
    }

    pub fn triangles_mut(&mut self) -> impl Iterator<Item = &mut Triangle> {
        self.cells
            .iter_mut()
            .flatten()
            .flat_map(|cell| cell.triangles_mut())
    }

    pub fn all_triangles(&self, include_invisible: bool) -> Vec<&Triangle> {
        self.triangles()
            .filter(|t| include_invisible || t.visible)
            .collect()
    }

    fn select(&self, indices: &[usize]) -> Vec<&Triangle> {
        indices.iter().filter_map(|&i| self.triangle(i)).collect()
    }

    fn update(&mut self, indices: &[usize], mut f: impl FnMut(&mut Triangle)) {
        for &i in indices {
            if let Some(tri) = self.triangle_mut(i) {
                f(tri);
            }
        }
    }

    /// Triangles of the L letterform (left column and bottom row)
    pub fn l_triangles(&self) -> Vec<&Triangle> {
        self.select(&self.roles.l)
    }

    /// Triangles of the M that the L does not share
    pub fn m_only_triangles(&self) -> Vec<&Triangle> {
        self.select(&self.roles.m_only)
    }

    /// The hidden halves of the M's diagonal cells
    pub fn m_shadow_triangles(&self) -> Vec<&Triangle> {
        self.select(&self.roles.m_shadow)
    }

    /// Visible triangles that do not carry a palette color
    pub fn default_colored_triangles(&self) -> Vec<&Triangle> {
        self.select(&self.roles.default_colored)
    }

    pub fn set_colors(&mut self, fill: Color, stroke: Color) {
        for tri in self.triangles_mut() {
            tri.fill_color = fill;
            tri.stroke_color = stroke;
        }
    }

    /// Restore the default fill and stroke, and the palette on the M diagonals
    pub fn reset_colors(&mut self) {
        self.set_colors(self.default_fill, self.default_stroke);
        let accent = self.roles.accent.clone();
        for (&i, color) in accent.iter().zip(LOGO_PALETTE.iter().cycle()) {
            if let Some(tri) = self.triangle_mut(i) {
                tri.fill_color = *color;
            }
        }
    }

    pub fn set_default_colored_triangles_fill_color(&mut self, color: Color) {
        let indices = self.roles.default_colored.clone();
        self.update(&indices, |t| t.fill_color = color);
    }

    pub fn set_l_triangles_fill_color(&mut self, color: Color) {
        let indices = self.roles.l.clone();
        self.update(&indices, |t| t.fill_color = color);
    }

    pub fn set_fill_visible(&mut self, visible: bool) {
        for tri in self.triangles_mut() {
            tri.fill_visible = visible;
        }
    }

    pub fn set_fill_transparent(&mut self) {
        self.set_fill_visible(false);
    }

    pub fn set_stroke_visible(&mut self, visible: bool) {
        for tri in self.triangles_mut() {
            tri.stroke_visible = visible;
        }
    }

    pub fn set_stroke_transparent(&mut self) {
        self.set_stroke_visible(false);
    }

    pub fn set_l_triangles_visible(&mut self, visible: bool) {
        let indices = self.roles.l.clone();
        self.update(&indices, |t| t.visible = visible);
    }

    pub fn set_m_shadow_triangles_visible(&mut self, visible: bool) {
        let indices = self.roles.m_shadow.clone();
        self.update(&indices, |t| t.visible = visible);
    }

    /// Closed outline of a letterform in canvas coordinates
    pub fn outline_points(&self, letter: Letter) -> Vec<Vector2> {
        let outline: &[(f64, f64)] = match letter {
            Letter::M => &M_OUTLINE,
            Letter::L => &L_OUTLINE,
        };
        outline
            .iter()
            .map(|&(cx, cy)| self.origin + Vector2::new(cx, cy) * self.triangle_size)
            .collect()
    }

    /// Move the logo, keeping any animation offsets
    pub fn set_position(&mut self, x: f64, y: f64) {
        let offset = Vector2::new(x, y) - self.origin;
        self.origin = Vector2::new(x, y);
        for tri in self.triangles_mut() {
            tri.translate(offset);
        }
        for home in &mut self.home {
            home.pos += offset;
        }
    }

    /// Rebuild at a new size. Presentation settings carry over; per-triangle
    /// state is reset.
    pub fn set_triangle_size(&mut self, triangle_size: f64) -> Result<(), GeometryError> {
        let mut rebuilt = Self::new(self.origin.x, self.origin.y, triangle_size)?;
        rebuilt.default_fill = self.default_fill;
        rebuilt.default_stroke = self.default_stroke;
        rebuilt.m_outline_visible = self.m_outline_visible;
        rebuilt.l_outline_visible = self.l_outline_visible;
        rebuilt.m_outline_stroke = self.m_outline_stroke;
        rebuilt.l_outline_stroke = self.l_outline_stroke;
        rebuilt.reset_colors();
        *self = rebuilt;
        Ok(())
    }

    /// Throw every triangle to a random position and rotation inside the area
    pub fn scatter(&mut self, rng: &mut Pcg32, width: f64, height: f64) {
        let size = self.triangle_size;
        let max_x = (width - size).max(0.0);
        let max_y = (height - size).max(0.0);
        for tri in self.triangles_mut() {
            tri.transform.pos = Vector2::new(rng.random_range(0.0..=max_x), rng.random_range(0.0..=max_y));
            tri.transform.angle = rng.random_range(0.0..TAU);
        }
        log::debug!("Logo scattered over {}x{}", width, height);
    }

    /// Ease every triangle toward its assembled transform by `amount` in [0, 1]
    pub fn step_toward_home(&mut self, amount: f64) {
        let amount = amount.clamp(0.0, 1.0);
        let home = std::mem::take(&mut self.home);
        for (tri, target) in self.triangles_mut().zip(&home) {
            tri.transform = tri.transform.lerp(target, amount);
        }
        self.home = home;
    }

    /// Whether every triangle is within `epsilon` of its assembled transform
    pub fn is_home(&self, epsilon: f64) -> bool {
        self.triangles()
            .zip(&self.home)
            .all(|(tri, target)| tri.transform.distance(target) <= epsilon)
    }

    pub fn draw(&self, canvas: &mut impl Canvas) {
        for tri in self.triangles() {
            tri.draw(canvas);
        }
        if self.m_outline_visible {
            canvas.polygon(&self.outline_points(Letter::M), None, Some(self.m_outline_stroke));
        }
        if self.l_outline_visible {
            canvas.polygon(&self.outline_points(Letter::L), None, Some(self.l_outline_stroke));
        }
    }
}
