//! Exposed channels which can be used to share data across tasks

use embassy_sync::channel::{Channel, TrySendError};
pub use embassy_sync::{blocking_mutex, channel};

use crate::ble::ConnectionEvent;
use crate::{CONNECTION_EVENT_CHANNEL_SIZE, RawMutex};

/// Channel for link lifecycle notifications, from the BLE stack to the connection manager
pub static CONNECTION_EVENT_CHANNEL: Channel<RawMutex, ConnectionEvent, CONNECTION_EVENT_CHANNEL_SIZE> =
    Channel::new();

/// Report a lifecycle notification to the connection manager.
///
/// It never blocks, so it's safe to call from the BLE stack's callbacks. If the
/// channel is full the notification is dropped and `false` is returned.
pub fn report_connection_event(event: ConnectionEvent) -> bool {
    push_connection_event(&CONNECTION_EVENT_CHANNEL, event)
}

pub(crate) fn push_connection_event<const N: usize>(
    channel: &Channel<RawMutex, ConnectionEvent, N>,
    event: ConnectionEvent,
) -> bool {
    match channel.try_send(event) {
        Ok(()) => true,
        Err(TrySendError::Full(event)) => {
            error!("Connection event channel full, dropping {:?}", event);
            false
        }
    }
}
