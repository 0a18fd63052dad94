//! BLE connection lifecycle.
//!
//! The stack reports what happened to the link as [`ConnectionEvent`]s, the
//! [`ConnectionManager`] turns them into [`ConnectionState`] changes and restarts
//! advertising whenever the keyboard is left without a central.

pub mod advertise;

pub use advertise::{AdvertisingFields, BR_EDR_NOT_SUPPORTED, LE_GENERAL_DISCOVERABLE};
use embassy_sync::channel::Receiver;

use crate::RawMutex;
use crate::config::BleConfig;
use crate::state::{ConnectionState, ConnectionStateCell};
use crate::transport::Advertiser;

/// Handle of a connection, assigned by the BLE stack
pub type ConnHandle = u16;

/// Link lifecycle notifications from the BLE stack
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConnectionEvent {
    /// A central connected
    Connected(ConnHandle),
    /// A connection attempt failed, the stack stopped advertising
    ConnectFailed,
    /// The active connection was lost
    Disconnected,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConnectionError<E> {
    /// The transport refused to start advertising
    Advertise(E),
}

/// State machine of the BLE connection.
///
/// It's the only writer of the shared [`ConnectionStateCell`].
pub struct ConnectionManager<'a, A: Advertiser> {
    advertiser: A,
    fields: AdvertisingFields<'a>,
    state: &'a ConnectionStateCell,
    conn_handle: Option<ConnHandle>,
    /// Whether the last attempt to advertise succeeded
    advertising: bool,
}

impl<'a, A: Advertiser> ConnectionManager<'a, A> {
    pub fn new(advertiser: A, config: &BleConfig<'a>, state: &'a ConnectionStateCell) -> Self {
        Self {
            advertiser,
            fields: AdvertisingFields::new(config),
            state,
            conn_handle: None,
            advertising: false,
        }
    }

    pub fn state(&self) -> ConnectionState {
        self.state.get()
    }

    /// Whether the transport is currently advertising.
    ///
    /// It's `false` after a failed attempt, even though the state is `Advertising`.
    pub fn is_advertising(&self) -> bool {
        self.advertising && self.state.get() == ConnectionState::Advertising
    }

    /// Handle of the active connection
    pub fn conn_handle(&self) -> Option<ConnHandle> {
        self.conn_handle
    }

    pub fn advertiser(&self) -> &A {
        &self.advertiser
    }

    /// Start advertising once the transport is set up.
    ///
    /// It can be called again in `Advertising` to retry a failed start.
    pub async fn start(&mut self) -> Result<(), ConnectionError<A::Error>> {
        match self.state.get() {
            ConnectionState::Idle | ConnectionState::Advertising => self.advertise().await,
            state => {
                warn!("Advertising not started, connection state is {:?}", state);
                Ok(())
            }
        }
    }

    /// Apply a lifecycle notification.
    ///
    /// Notifications that don't apply to the current state are ignored.
    pub async fn handle_event(&mut self, event: ConnectionEvent) -> Result<(), ConnectionError<A::Error>> {
        match (self.state.get(), event) {
            (ConnectionState::Advertising, ConnectionEvent::Connected(handle)) => {
                info!("Connected, handle: {}", handle);
                self.conn_handle = Some(handle);
                self.advertising = false;
                self.state.set(ConnectionState::Connected);
                Ok(())
            }
            (ConnectionState::Advertising, ConnectionEvent::ConnectFailed) => {
                warn!("Connection attempt failed, restart advertising");
                self.advertise().await
            }
            (ConnectionState::Connected, ConnectionEvent::Disconnected) => {
                info!("Disconnected, handle: {:?}", self.conn_handle);
                self.conn_handle = None;
                self.state.set(ConnectionState::Disconnecting);
                self.advertise().await
            }
            (state, event) => {
                warn!("Ignored {:?} in connection state {:?}", event, state);
                Ok(())
            }
        }
    }

    /// Start advertising, then apply the notifications from `events` forever.
    ///
    /// Failures are logged, the next notification can retry.
    pub async fn run<const N: usize>(&mut self, events: Receiver<'_, RawMutex, ConnectionEvent, N>) -> ! {
        if self.start().await.is_err() {
            error!("Failed to start advertising");
        }
        loop {
            let event = events.receive().await;
            debug!("Connection event: {:?}", event);
            if self.handle_event(event).await.is_err() {
                error!("Failed to restart advertising after {:?}", event);
            }
        }
    }

    async fn advertise(&mut self) -> Result<(), ConnectionError<A::Error>> {
        self.state.set(ConnectionState::Advertising);
        self.advertising = false;
        self.advertiser
            .begin_advertising(&self.fields)
            .await
            .map_err(ConnectionError::Advertise)?;
        self.advertising = true;
        info!("Advertising as {}", self.fields.device_name);
        Ok(())
    }
}
