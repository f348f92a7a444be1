//! Per-player remaining-piece counters.

use serde::{Deserialize, Serialize};

use super::player::{Color, ColorMap};

/// Remaining pieces for each color.
///
/// Counters only ever go down: once per cell filled for the owning color,
/// whether played directly or filled by a cascade.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Inventory {
    remaining: ColorMap<u32>,
}

impl Inventory {
    /// Total pieces for a pyramid of side `size`: `size(size+1)(size+2)/6`.
    #[must_use]
    pub fn total_for(size: u8) -> u32 {
        let n = size as u32;
        n * (n + 1) * (n + 2) / 6
    }

    /// Split the total as evenly as possible; an odd piece goes to the
    /// first player.
    #[must_use]
    pub fn for_size(size: u8) -> Self {
        let total = Self::total_for(size);
        let mut remaining = ColorMap::with_value(total / 2);
        remaining[Color::FIRST] += total % 2;
        Self { remaining }
    }

    /// Inventory with explicit counts.
    #[must_use]
    pub fn with_counts(blue: u32, green: u32) -> Self {
        let mut remaining = ColorMap::with_value(0);
        remaining[Color::Blue] = blue;
        remaining[Color::Green] = green;
        Self { remaining }
    }

    #[inline]
    #[must_use]
    pub fn remaining(&self, color: Color) -> u32 {
        self.remaining[color]
    }

    #[inline]
    #[must_use]
    pub fn has_pieces(&self, color: Color) -> bool {
        self.remaining[color] > 0
    }

    /// Use one piece of `color`. Returns `false` (and changes nothing) if
    /// that color has none left.
    pub fn take(&mut self, color: Color) -> bool {
        match self.remaining[color].checked_sub(1) {
            Some(left) => {
                self.remaining[color] = left;
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_for() {
        assert_eq!(Inventory::total_for(1), 1);
        assert_eq!(Inventory::total_for(2), 4);
        assert_eq!(Inventory::total_for(3), 10);
        assert_eq!(Inventory::total_for(5), 35);
    }

    #[test]
    fn test_odd_piece_goes_to_first_player() {
        let inv = Inventory::for_size(5);
        assert_eq!(inv.remaining(Color::Blue), 18);
        assert_eq!(inv.remaining(Color::Green), 17);

        let inv = Inventory::for_size(1);
        assert_eq!(inv.remaining(Color::Blue), 1);
        assert_eq!(inv.remaining(Color::Green), 0);
    }

    #[test]
    fn test_even_split() {
        let inv = Inventory::for_size(3);
        assert_eq!(inv.remaining(Color::Blue), 5);
        assert_eq!(inv.remaining(Color::Green), 5);
    }

    #[test]
    fn test_take_never_goes_negative() {
        let mut inv = Inventory::with_counts(1, 0);
        assert!(inv.take(Color::Blue));
        assert!(!inv.take(Color::Blue));
        assert!(!inv.take(Color::Green));
        assert_eq!(inv.remaining(Color::Blue), 0);
        assert_eq!(inv.remaining(Color::Green), 0);
    }
}
