//! Per-key debounce state machine.
//!
//! The policy counts scan cycles instead of wall-clock time: a change is accepted
//! after `threshold` consecutive scans agree with it. A reading that flips back
//! before that is treated as contact noise.

use crate::event::KeyTransition;

/// Debounced state of a key
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum KeyState {
    Released,
    /// Engaged readings are being counted
    DebouncingToPress,
    Pressed,
    /// Released readings are being counted
    DebouncingToRelease,
}

impl KeyState {
    /// Whether `next` is reachable from `self` in a single step.
    ///
    /// Staying in the same state is always allowed.
    pub fn can_transition_to(self, next: KeyState) -> bool {
        use KeyState::*;
        self == next
            || matches!(
                (self, next),
                (Released, DebouncingToPress)
                    | (DebouncingToPress, Pressed)
                    | (DebouncingToPress, Released)
                    | (Pressed, DebouncingToRelease)
                    | (DebouncingToRelease, Released)
                    | (DebouncingToRelease, Pressed)
            )
    }

    pub fn is_pressed(self) -> bool {
        matches!(self, KeyState::Pressed | KeyState::DebouncingToRelease)
    }
}

/// Result of feeding one reading to a [`KeyDebouncer`]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DebounceState {
    /// The change is confirmed
    Debounced(KeyTransition),
    /// A change is being counted
    InProgress,
    /// Nothing changed, or the change was noise
    Ignored,
}

/// Tracks the debounce state of a single key.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct KeyDebouncer {
    state: KeyState,
    /// Consecutive readings agreeing with the pending change
    count: u8,
}

impl Default for KeyDebouncer {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyDebouncer {
    pub const fn new() -> Self {
        Self {
            state: KeyState::Released,
            count: 0,
        }
    }

    pub fn state(&self) -> KeyState {
        self.state
    }

    /// Feed the reading of one scan, `threshold` must be at least 1.
    pub fn update(&mut self, engaged: bool, threshold: u8) -> DebounceState {
        match (self.state, engaged) {
            (KeyState::Released, false) | (KeyState::Pressed, true) => DebounceState::Ignored,
            (KeyState::Released, true) => self.start(KeyState::DebouncingToPress, threshold),
            (KeyState::Pressed, false) => self.start(KeyState::DebouncingToRelease, threshold),
            (KeyState::DebouncingToPress, true) | (KeyState::DebouncingToRelease, false) => self.count_up(threshold),
            (KeyState::DebouncingToPress, false) => self.settle(KeyState::Released),
            (KeyState::DebouncingToRelease, true) => self.settle(KeyState::Pressed),
        }
    }

    fn start(&mut self, pending: KeyState, threshold: u8) -> DebounceState {
        self.state = pending;
        self.count = 1;
        self.check(threshold)
    }

    fn count_up(&mut self, threshold: u8) -> DebounceState {
        self.count = self.count.saturating_add(1);
        self.check(threshold)
    }

    fn check(&mut self, threshold: u8) -> DebounceState {
        if self.count < threshold {
            return DebounceState::InProgress;
        }
        let transition = match self.state {
            KeyState::DebouncingToPress => KeyTransition::Pressed,
            _ => KeyTransition::Released,
        };
        self.settle(match transition {
            KeyTransition::Pressed => KeyState::Pressed,
            KeyTransition::Released => KeyState::Released,
        });
        DebounceState::Debounced(transition)
    }

    /// Go back to a stable state
    fn settle(&mut self, stable: KeyState) -> DebounceState {
        self.state = stable;
        self.count = 0;
        DebounceState::Ignored
    }
}
