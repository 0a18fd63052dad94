use crate::DEVICE_NAME;

/// 128-bit UUID of the Nordic UART service, little endian as it goes on air
pub const NUS_SERVICE_UUID: [u8; 16] = [
    0x9E, 0xCA, 0xDC, 0x24, 0x0E, 0xE5, 0xA9, 0xE0, 0x93, 0xF3, 0xA3, 0xB5, 0x01, 0x00, 0x40, 0x6E,
];

/// Maximum length of the device name, it must fit a legacy scan response
pub const MAX_DEVICE_NAME_LEN: usize = 29;

/// Identity announced while advertising
#[derive(Clone, Copy, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BleConfig<'a> {
    /// Name put in the scan response
    pub device_name: &'a str,
    /// Service carrying the key events
    pub service_uuid: [u8; 16],
    /// Radio TX power announced in the advertisement, in dBm
    pub tx_power: i8,
}

impl Default for BleConfig<'_> {
    fn default() -> Self {
        Self {
            device_name: DEVICE_NAME,
            service_uuid: NUS_SERVICE_UUID,
            tx_power: 0,
        }
    }
}

impl<'a> BleConfig<'a> {
    pub fn new(device_name: &'a str) -> Self {
        Self {
            device_name,
            ..Default::default()
        }
    }
}
