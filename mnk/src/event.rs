//! Key events produced by the key state tracker

use postcard::experimental::max_size::MaxSize;
use serde::{Deserialize, Serialize};

/// The position of a key in the matrix.
///
/// `side` selects the column group, `row` and `col` index into that side's grid.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, MaxSize, Eq, PartialEq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct KeyPos {
    pub side: u8,
    pub row: u8,
    pub col: u8,
}

impl KeyPos {
    pub const fn new(side: u8, row: u8, col: u8) -> Self {
        Self { side, row, col }
    }
}

/// A confirmed key change
#[derive(Serialize, Deserialize, Clone, Copy, Debug, MaxSize, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum KeyTransition {
    Pressed,
    Released,
}

/// `KeyEvent` is emitted once per debounced transition of a key.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, MaxSize, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct KeyEvent {
    pub pos: KeyPos,
    pub transition: KeyTransition,
    /// Emission sequence number, wraps around
    pub seq: u32,
}
