//! Traits for the wireless transport the keyboard talks through.
//!
//! The BLE stack lives outside of this crate, it plugs in by implementing
//! [`Advertiser`] and [`TransportWriter`] and by reporting its lifecycle with
//! [`crate::channel::report_connection_event`].

use core::future::Future;

use crate::ble::AdvertisingFields;

/// Advertiser is used for making the device discoverable.
pub trait Advertiser {
    type Error;

    /// Start advertising with the given payload.
    ///
    /// Returns once advertising has started, not when a central connects.
    fn begin_advertising(&mut self, fields: &AdvertisingFields<'_>) -> impl Future<Output = Result<(), Self::Error>>;
}

/// TransportWriter is used for sending serialized key events to the connected central.
pub trait TransportWriter {
    type Error;

    /// Send `bytes` over the active session, return the number of bytes written if success.
    fn send(&mut self, bytes: &[u8]) -> impl Future<Output = Result<usize, Self::Error>>;
}
