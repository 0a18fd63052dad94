use core::sync::atomic::{AtomicU8, Ordering};

/// Process-wide connection state, written by the connection manager only.
pub static CONNECTION_STATE: ConnectionStateCell = ConnectionStateCell::new();

/// State of the wireless transport session
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConnectionState {
    /// Before the first advertisement
    Idle = 0,
    /// Discoverable, waiting for a central
    Advertising = 1,
    /// A session is active, key events may be sent
    Connected = 2,
    /// Transient, the session just ended and advertising is about to restart
    Disconnecting = 3,
}

impl From<u8> for ConnectionState {
    fn from(value: u8) -> Self {
        match value {
            1 => ConnectionState::Advertising,
            2 => ConnectionState::Connected,
            3 => ConnectionState::Disconnecting,
            _ => ConnectionState::Idle,
        }
    }
}

impl From<ConnectionState> for u8 {
    fn from(state: ConnectionState) -> Self {
        state as u8
    }
}

/// Single-word cell holding a [`ConnectionState`].
///
/// Stores use `Release` and loads use `Acquire`, so the scan task always sees a
/// complete value written by the transport context.
pub struct ConnectionStateCell {
    state: AtomicU8,
}

impl Default for ConnectionStateCell {
    fn default() -> Self {
        Self::new()
    }
}

impl ConnectionStateCell {
    pub const fn new() -> Self {
        Self {
            state: AtomicU8::new(ConnectionState::Idle as u8),
        }
    }

    pub fn get(&self) -> ConnectionState {
        self.state.load(Ordering::Acquire).into()
    }

    pub fn is_connected(&self) -> bool {
        self.get() == ConnectionState::Connected
    }

    pub(crate) fn set(&self, state: ConnectionState) {
        self.state.store(state.into(), Ordering::Release);
    }
}
