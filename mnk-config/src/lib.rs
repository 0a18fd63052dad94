//! Build-time configuration of the mnk firmware.
//!
//! `keyboard.toml` is parsed by the firmware's `build.rs` and turned into
//! constants. Every section is optional, missing values fall back to defaults.

use std::path::Path;

use serde_derive::Deserialize;

pub mod types;

pub use types::*;

/// Top level of `keyboard.toml`
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct KeyboardTomlConfig {
    /// Timing and channel constants
    #[serde(default)]
    pub mnk: MnkConstantsConfig,
    /// Advertising identity
    #[serde(default)]
    pub ble: BleTomlConfig,
}

impl KeyboardTomlConfig {
    /// Parse the config from a toml string, an empty string gives the default config.
    pub fn new_from_toml_str(config: &str) -> Result<Self, String> {
        let parsed: KeyboardTomlConfig = toml::from_str(config).map_err(|e| e.message().to_string())?;
        parsed.ble.validate()?;
        Ok(parsed)
    }

    /// Read and parse the config file at `config_toml_path`.
    pub fn new_from_toml_path<P: AsRef<Path>>(config_toml_path: P) -> Self {
        let content = match std::fs::read_to_string(config_toml_path.as_ref()) {
            Ok(s) => s,
            Err(e) => panic!("Read keyboard config file {:?} error: {}", config_toml_path.as_ref(), e),
        };
        match Self::new_from_toml_str(&content) {
            Ok(c) => c,
            Err(e) => panic!("Parse {:?} error: {}", config_toml_path.as_ref(), e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = KeyboardTomlConfig::new_from_toml_str("").unwrap();
        assert_eq!(config.mnk.debounce_threshold, 3);
        assert_eq!(config.mnk.scan_interval_ms, 1);
        assert_eq!(config.mnk.connection_event_channel_size, 4);
        assert_eq!(config.mnk.status_led_blink_ms, 1000);
        assert_eq!(config.ble.device_name, "Adafruit Mynewt");
    }

    #[test]
    fn test_partial_section() {
        let config = KeyboardTomlConfig::new_from_toml_str(
            r#"
            [mnk]
            debounce_threshold = 5

            [ble]
            device_name = "mnk.01"
            "#,
        )
        .unwrap();
        assert_eq!(config.mnk.debounce_threshold, 5);
        assert_eq!(config.mnk.scan_interval_ms, 1);
        assert_eq!(config.ble.device_name, "mnk.01");
    }

    #[test]
    fn test_unknown_field_rejected() {
        assert!(KeyboardTomlConfig::new_from_toml_str("[mnk]\ndebounce_time = 5\n").is_err());
    }

    #[test]
    fn test_device_name_too_long() {
        let config = format!("[ble]\ndevice_name = \"{}\"\n", "x".repeat(MAX_DEVICE_NAME_LEN + 1));
        assert!(KeyboardTomlConfig::new_from_toml_str(&config).is_err());
    }

    #[test]
    fn test_read_from_path() {
        let path = std::env::temp_dir().join(format!("mnk-keyboard-{}.toml", std::process::id()));
        std::fs::write(&path, "[mnk]\nscan_interval_ms = 2\n").unwrap();
        let config = KeyboardTomlConfig::new_from_toml_path(&path);
        std::fs::remove_file(&path).unwrap();
        assert_eq!(config.mnk.scan_interval_ms, 2);
        assert_eq!(config.mnk.debounce_threshold, 3);
    }

    #[test]
    #[should_panic]
    fn test_missing_file_panics() {
        let _ = KeyboardTomlConfig::new_from_toml_path("/nonexistent/mnk/keyboard.toml");
    }

    #[test]
    #[should_panic]
    fn test_zero_debounce_threshold_panics() {
        let _ = KeyboardTomlConfig::new_from_toml_str("[mnk]\ndebounce_threshold = 0\n");
    }
}
