//! Cell coordinates and pyramid adjacency.

use serde::{Deserialize, Serialize};

/// One of the three lattice directions.
///
/// The order `X, Y, Z` is the fixed exploration order used by the cascade
/// and by incremental move-list maintenance.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    /// All axes in exploration order.
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];
}

/// Position of a cell in the pyramid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Coord {
    pub x: u8,
    pub y: u8,
    pub z: u8,
}

impl Coord {
    /// The topmost cell.
    pub const APEX: Coord = Coord { x: 0, y: 0, z: 0 };

    #[must_use]
    pub const fn new(x: u8, y: u8, z: u8) -> Self {
        Self { x, y, z }
    }

    /// Diagonal layer of this cell (`x + y + z`). The apex is layer 0.
    #[inline]
    #[must_use]
    pub const fn layer(self) -> u16 {
        self.x as u16 + self.y as u16 + self.z as u16
    }

    #[inline]
    #[must_use]
    pub fn component(self, axis: Axis) -> u8 {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
            Axis::Z => self.z,
        }
    }

    /// The supporting cell one step along `axis` (one layer lower).
    #[inline]
    #[must_use]
    pub fn leg(self, axis: Axis) -> Coord {
        match axis {
            Axis::X => Coord::new(self.x + 1, self.y, self.z),
            Axis::Y => Coord::new(self.x, self.y + 1, self.z),
            Axis::Z => Coord::new(self.x, self.y, self.z + 1),
        }
    }

    /// The three supporting cells, in `X, Y, Z` order.
    #[must_use]
    pub fn legs(self) -> [Coord; 3] {
        [self.leg(Axis::X), self.leg(Axis::Y), self.leg(Axis::Z)]
    }

    /// The cell one layer higher that rests on this one via `axis`.
    ///
    /// Returns `None` when the coordinate along `axis` is already zero.
    #[inline]
    #[must_use]
    pub fn parent(self, axis: Axis) -> Option<Coord> {
        match axis {
            Axis::X if self.x > 0 => Some(Coord::new(self.x - 1, self.y, self.z)),
            Axis::Y if self.y > 0 => Some(Coord::new(self.x, self.y - 1, self.z)),
            Axis::Z if self.z > 0 => Some(Coord::new(self.x, self.y, self.z - 1)),
            _ => None,
        }
    }

    /// The two legs of `self.parent(axis)` other than `self`.
    ///
    /// Only meaningful when `parent(axis)` exists.
    #[must_use]
    pub fn sibling_legs(self, axis: Axis) -> [Coord; 2] {
        match axis {
            Axis::X => [
                Coord::new(self.x - 1, self.y + 1, self.z),
                Coord::new(self.x - 1, self.y, self.z + 1),
            ],
            Axis::Y => [
                Coord::new(self.x + 1, self.y - 1, self.z),
                Coord::new(self.x, self.y - 1, self.z + 1),
            ],
            Axis::Z => [
                Coord::new(self.x + 1, self.y, self.z - 1),
                Coord::new(self.x, self.y + 1, self.z - 1),
            ],
        }
    }
}

impl From<(u8, u8, u8)> for Coord {
    fn from((x, y, z): (u8, u8, u8)) -> Self {
        Self::new(x, y, z)
    }
}

impl std::fmt::Display for Coord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({},{},{})", self.x, self.y, self.z)
    }
}
