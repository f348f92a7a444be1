//! Fixed-size cell storage for the pyramid.

use serde::{Deserialize, Serialize};

use super::coord::Coord;
use crate::core::Color;

/// Contents of a single cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cell {
    /// Not yet occupied.
    Empty,
    /// Pre-filled bottom layer; never changes.
    Base,
    /// A piece owned by one of the players.
    Piece(Color),
}

impl Cell {
    #[inline]
    #[must_use]
    pub fn is_empty(self) -> bool {
        matches!(self, Cell::Empty)
    }

    /// The owning color, if this cell holds a piece.
    #[inline]
    #[must_use]
    pub fn color(self) -> Option<Color> {
        match self {
            Cell::Piece(color) => Some(color),
            _ => None,
        }
    }

    /// Numeric code used by board encodings.
    #[must_use]
    pub fn code(self) -> f32 {
        match self {
            Cell::Empty => -2.0,
            Cell::Base => -1.0,
            Cell::Piece(color) => color.index() as f32,
        }
    }
}

/// Triangular-pyramid grid backed by a flat `(size+1)^3` vector.
///
/// Storage positions outside the pyramid (`x + y + z > size`) exist but are
/// never read or written through the rules.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Board {
    size: u8,
    cells: Vec<Cell>,
}

impl Board {
    /// Create an all-empty board. `rules::initial_fill` lays the base.
    #[must_use]
    pub fn new(size: u8) -> Self {
        let side = size as usize + 1;
        Self {
            size,
            cells: vec![Cell::Empty; side * side * side],
        }
    }

    #[inline]
    #[must_use]
    pub fn size(&self) -> u8 {
        self.size
    }

    /// Edge length of the backing cube (`size + 1`).
    #[inline]
    #[must_use]
    pub fn side(&self) -> usize {
        self.size as usize + 1
    }

    /// Flat index of a coordinate, row-major over `x`, `y`, `z`.
    #[inline]
    #[must_use]
    pub fn index(&self, at: Coord) -> usize {
        let side = self.side();
        (at.x as usize * side + at.y as usize) * side + at.z as usize
    }

    /// Whether `at` lies inside the pyramid.
    #[inline]
    #[must_use]
    pub fn contains(&self, at: Coord) -> bool {
        at.layer() <= self.size as u16
    }

    #[inline]
    #[must_use]
    pub fn get(&self, at: Coord) -> Cell {
        self.cells[self.index(at)]
    }

    /// Write a cell. Each cell is written at most once in a board's life.
    #[inline]
    pub fn set(&mut self, at: Coord, cell: Cell) {
        let idx = self.index(at);
        debug_assert!(self.cells[idx].is_empty(), "cell {} written twice", at);
        self.cells[idx] = cell;
    }

    /// True iff all three supporting legs of `at` are occupied.
    ///
    /// Base-layer cells have no legs and always report `false`.
    #[must_use]
    pub fn legs_filled(&self, at: Coord) -> bool {
        at.layer() < self.size as u16 && at.legs().iter().all(|&leg| !self.get(leg).is_empty())
    }

    /// Number of cells holding a piece of `color`.
    #[must_use]
    pub fn count(&self, color: Color) -> usize {
        self.cells.iter().filter(|c| c.color() == Some(color)).count()
    }

    /// Raw cells in flat-index order.
    #[must_use]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }
}
