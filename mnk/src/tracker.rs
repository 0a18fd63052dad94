use heapless::Vec;

use crate::config::DebounceConfig;
use crate::debounce::{DebounceState, KeyDebouncer, KeyState};
use crate::event::{KeyEvent, KeyPos};
use crate::matrix::{MAX_MATRIX_DIMENSION, RawSnapshot};

/// Turns raw matrix snapshots into debounced key events.
///
/// Every coordinate has its own [`KeyDebouncer`], all sharing one threshold.
pub struct KeyTracker<const SIDE: usize, const ROW: usize, const COL: usize> {
    keys: [[[KeyDebouncer; COL]; ROW]; SIDE],
    threshold: u8,
    /// Sequence number of the next event
    seq: u32,
}

impl<const SIDE: usize, const ROW: usize, const COL: usize> KeyTracker<SIDE, ROW, COL> {
    /// Create a tracker with every key released.
    ///
    /// A zero threshold is treated as 1, `KeyboardConfig::validate` rejects it earlier.
    pub fn new(config: DebounceConfig) -> Self {
        const {
            assert!(
                SIDE <= MAX_MATRIX_DIMENSION && ROW <= MAX_MATRIX_DIMENSION && COL <= MAX_MATRIX_DIMENSION,
                "matrix dimension doesn't fit a key position"
            )
        };
        Self {
            keys: [[[KeyDebouncer::new(); COL]; ROW]; SIDE],
            threshold: config.threshold.max(1),
            seq: 0,
        }
    }

    /// Feed one scan and collect the confirmed transitions.
    ///
    /// Events are ordered side by side, then row-major. `N` must be able to
    /// hold an event for every key, this is checked at compile time.
    pub fn update<const N: usize>(&mut self, snapshot: RawSnapshot<SIDE, ROW, COL>) -> Vec<KeyEvent, N> {
        const { assert!(N >= SIDE * ROW * COL, "event buffer is smaller than the matrix") };

        let mut events = Vec::new();
        for (pos, engaged) in snapshot.iter() {
            let key = &mut self.keys[pos.side as usize][pos.row as usize][pos.col as usize];
            if let DebounceState::Debounced(transition) = key.update(engaged, self.threshold) {
                let event = KeyEvent {
                    pos,
                    transition,
                    seq: self.seq,
                };
                self.seq = self.seq.wrapping_add(1);
                trace!("Key event: {:?}", event);
                // Capacity is asserted above
                let _ = events.push(event);
            }
        }
        events
    }

    /// Current state of `pos`, `None` if it's outside the matrix
    pub fn key_state(&self, pos: KeyPos) -> Option<KeyState> {
        self.keys
            .get(pos.side as usize)
            .and_then(|side| side.get(pos.row as usize))
            .and_then(|row| row.get(pos.col as usize))
            .map(|key| key.state())
    }

}
