//! Player colors and per-color data storage.
//!
//! ## Color
//!
//! The game is a fixed two-party competition. `Blue` always moves first.
//!
//! ## ColorMap
//!
//! Per-color storage backed by a two-element array, indexed by `Color`.

use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

/// One of the two players.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Color {
    Blue,
    Green,
}

impl Color {
    /// Both colors, first player first.
    pub const ALL: [Color; 2] = [Color::Blue, Color::Green];

    /// The color that moves first in a new game.
    pub const FIRST: Color = Color::Blue;

    /// The other player.
    #[inline]
    #[must_use]
    pub const fn opponent(self) -> Color {
        match self {
            Color::Blue => Color::Green,
            Color::Green => Color::Blue,
        }
    }

    /// 0 for Blue, 1 for Green.
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Color::Blue => 0,
            Color::Green => 1,
        }
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Color::Blue => write!(f, "Blue"),
            Color::Green => write!(f, "Green"),
        }
    }
}

/// Per-color data with O(1) access.
///
/// ```
/// use cubicup::core::{Color, ColorMap};
///
/// let mut counts = ColorMap::with_value(0u32);
/// counts[Color::Green] += 3;
/// assert_eq!(counts[Color::Blue], 0);
/// assert_eq!(counts[Color::Green], 3);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct ColorMap<T> {
    data: [T; 2],
}

impl<T> ColorMap<T> {
    /// Create a map with values from a factory function.
    pub fn new(factory: impl Fn(Color) -> T) -> Self {
        Self {
            data: [factory(Color::Blue), factory(Color::Green)],
        }
    }

    /// Create a map with both entries set to the same value.
    pub fn with_value(value: T) -> Self
    where
        T: Clone,
    {
        Self::new(|_| value.clone())
    }

    /// Iterate over `(Color, &T)` pairs, Blue first.
    pub fn iter(&self) -> impl Iterator<Item = (Color, &T)> {
        Color::ALL.into_iter().zip(self.data.iter())
    }
}

impl<T> Index<Color> for ColorMap<T> {
    type Output = T;

    fn index(&self, color: Color) -> &Self::Output {
        &self.data[color.index()]
    }
}

impl<T> IndexMut<Color> for ColorMap<T> {
    fn index_mut(&mut self, color: Color) -> &mut Self::Output {
        &mut self.data[color.index()]
    }
}
