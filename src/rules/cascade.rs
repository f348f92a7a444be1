//! Cup-fill chain reaction.
//!
//! When a placement leaves a higher cell with all three legs in the same
//! color, the opponent of that color automatically occupies it. The newly
//! filled cell may in turn complete a cup of its own color, so fills
//! alternate upward until nothing more completes or a participant runs out
//! of pieces.
//!
//! The chain is resolved depth-first: from each filled cell the parents are
//! tried in `X, Y, Z` order, and a fill is fully chased upward before the
//! next direction of the cell below it is examined. An explicit frame stack
//! keeps that order without recursion.

use smallvec::SmallVec;
use tracing::trace;

use crate::board::{Axis, Board, Cell, Coord};
use crate::core::{Color, Inventory};

/// A filled cell whose parent directions are still being examined.
struct Frame {
    at: Coord,
    color: Color,
    next_axis: usize,
}

/// Resolve every cup completed by the piece of `placed` just put on `at`.
///
/// A fill is skipped (not attempted) when the filling color has no pieces
/// left, and a filled cell is only chased further while the color it
/// answered still has pieces. Returns whether any cell was filled.
pub fn cascade_fill(board: &mut Board, at: Coord, placed: Color, inventory: &mut Inventory) -> bool {
    let mut filled_any = false;
    let mut stack: SmallVec<[Frame; 16]> = SmallVec::new();
    stack.push(Frame {
        at,
        color: placed,
        next_axis: 0,
    });

    while let Some(frame) = stack.last_mut() {
        let Some(&axis) = Axis::ALL.get(frame.next_axis) else {
            stack.pop();
            continue;
        };
        frame.next_axis += 1;

        let (from, last) = (frame.at, frame.color);
        let fill = last.opponent();
        if !inventory.has_pieces(fill) {
            continue;
        }
        let Some(parent) = from.parent(axis) else {
            continue;
        };
        if !board.get(parent).is_empty() || !completes_cup(board, from, axis, last) {
            continue;
        }

        board.set(parent, Cell::Piece(fill));
        inventory.take(fill);
        filled_any = true;
        trace!(%from, %parent, color = %fill, "cup filled");

        if inventory.has_pieces(last) {
            stack.push(Frame {
                at: parent,
                color: fill,
                next_axis: 0,
            });
        }
    }

    filled_any
}

/// Whether both other legs of `from.parent(axis)` hold `color`.
fn completes_cup(board: &Board, from: Coord, axis: Axis, color: Color) -> bool {
    from.sibling_legs(axis)
        .iter()
        .all(|&leg| board.get(leg) == Cell::Piece(color))
}
