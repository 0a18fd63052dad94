use serde_derive::Deserialize;
use serde_inline_default::serde_inline_default;

/// Maximum length of the advertised device name.
///
/// A legacy scan response carries 31 bytes, 2 of them are the AD header.
pub const MAX_DEVICE_NAME_LEN: usize = 29;

/// Configurations for BLE advertising identity
#[serde_inline_default]
#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BleTomlConfig {
    /// Name put in the scan response
    #[serde_inline_default("Adafruit Mynewt".to_string())]
    pub device_name: String,
}

impl Default for BleTomlConfig {
    fn default() -> Self {
        Self {
            device_name: "Adafruit Mynewt".to_string(),
        }
    }
}

impl BleTomlConfig {
    /// Check the device name fits into the scan response.
    pub fn validate(&self) -> Result<(), String> {
        if self.device_name.is_empty() {
            return Err("ble.device_name must not be empty".to_string());
        }
        if self.device_name.len() > MAX_DEVICE_NAME_LEN {
            return Err(format!(
                "ble.device_name must be at most {} bytes, got {}",
                MAX_DEVICE_NAME_LEN,
                self.device_name.len()
            ));
        }
        Ok(())
    }
}
