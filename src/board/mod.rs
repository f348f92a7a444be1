//! Board model for the tetrahedral stacking grid.
//!
//! The pyramid of side `size` holds every cell `(x, y, z)` with
//! `x + y + z <= size`. The bottom diagonal layer (`x + y + z == size`) is
//! pre-filled support; the apex is `(0, 0, 0)`. A cell rests on three
//! "legs" one layer below it: `(x+1, y, z)`, `(x, y+1, z)` and `(x, y, z+1)`.
//!
//! - `Coord`, `Axis`: cell addressing and adjacency
//! - `Cell`, `Board`: the fixed-size grid itself

pub mod coord;
pub mod grid;

pub use coord::{Axis, Coord};
pub use grid::{Board, Cell};
