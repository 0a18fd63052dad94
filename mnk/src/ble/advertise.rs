use crate::config::BleConfig;

/// LE General Discoverable Mode
pub const LE_GENERAL_DISCOVERABLE: u8 = 0x02;
/// BR/EDR Not Supported
pub const BR_EDR_NOT_SUPPORTED: u8 = 0x04;

/// Everything announced when advertising starts.
///
/// The transport turns these into its own advertising and scan response payloads.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AdvertisingFields<'a> {
    /// Discoverability flags
    pub flags: u8,
    /// TX power level to announce, `None` leaves it out
    pub tx_power: Option<i8>,
    /// 128-bit service UUID, little endian
    pub service_uuid: [u8; 16],
    pub device_name: &'a str,
}

impl<'a> AdvertisingFields<'a> {
    pub fn new(config: &BleConfig<'a>) -> Self {
        Self {
            flags: LE_GENERAL_DISCOVERABLE | BR_EDR_NOT_SUPPORTED,
            tx_power: Some(config.tx_power),
            service_uuid: config.service_uuid,
            device_name: config.device_name,
        }
    }
}
