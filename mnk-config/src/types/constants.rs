// MNK constants configuration types

use serde::{Deserialize as SerdeDeserialize, de};
use serde_derive::Deserialize;
use serde_inline_default::serde_inline_default;

/// Keyboard constants configuration for timing and channel limits
#[serde_inline_default]
#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MnkConstantsConfig {
    /// Number of consecutive consistent scan cycles required to accept a key change
    #[serde_inline_default(3)]
    #[serde(deserialize_with = "check_debounce_threshold")]
    pub debounce_threshold: u8,
    /// Matrix scan interval in ms
    #[serde_inline_default(1)]
    #[serde(deserialize_with = "check_scan_interval")]
    pub scan_interval_ms: u64,
    /// Size of the channel carrying connection lifecycle notifications
    #[serde_inline_default(4)]
    #[serde(deserialize_with = "check_channel_size")]
    pub connection_event_channel_size: usize,
    /// Status led blink period in ms, 0 disables blinking
    #[serde_inline_default(1000)]
    pub status_led_blink_ms: u64,
}

fn check_debounce_threshold<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: de::Deserializer<'de>,
{
    let value = SerdeDeserialize::deserialize(deserializer)?;
    if value == 0 {
        panic!("❌ Parse `keyboard.toml` error: debounce_threshold must be at least 1, got {value}");
    }
    Ok(value)
}

fn check_scan_interval<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: de::Deserializer<'de>,
{
    let value = SerdeDeserialize::deserialize(deserializer)?;
    if !(1..=1000).contains(&value) {
        panic!("❌ Parse `keyboard.toml` error: scan_interval_ms must be between 1 and 1000, got {value}");
    }
    Ok(value)
}

fn check_channel_size<'de, D>(deserializer: D) -> Result<usize, D::Error>
where
    D: de::Deserializer<'de>,
{
    let value = SerdeDeserialize::deserialize(deserializer)?;
    if !(1..=64).contains(&value) {
        panic!("❌ Parse `keyboard.toml` error: connection_event_channel_size must be between 1 and 64, got {value}");
    }
    Ok(value)
}

/// This separate Default impl is needed when `[mnk]` section is not set in keyboard.toml
impl Default for MnkConstantsConfig {
    fn default() -> Self {
        Self {
            debounce_threshold: 3,
            scan_interval_ms: 1,
            connection_event_channel_size: 4,
            status_led_blink_ms: 1000,
        }
    }
}
