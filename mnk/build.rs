use std::path::Path;
use std::{env, fs};

use const_gen::*;
use mnk_config::{BleTomlConfig, KeyboardTomlConfig, MnkConstantsConfig};

fn main() {
    // Ensure build.rs is re-run when files change
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-env-changed=KEYBOARD_TOML_PATH");

    // Read keyboard.toml if it's present
    let user_toml = if let Ok(toml_path) = env::var("KEYBOARD_TOML_PATH") {
        println!("cargo:rerun-if-changed={toml_path}");
        KeyboardTomlConfig::new_from_toml_path(&toml_path)
    } else {
        KeyboardTomlConfig::default()
    };

    let constants = get_constants_str(user_toml.mnk, user_toml.ble);

    // Write to constants.rs file
    let out_dir = env::var("OUT_DIR").unwrap();
    let dest_path = Path::new(&out_dir).join("constants.rs");
    fs::write(&dest_path, constants).expect("Failed to write constants.rs file");
}

fn get_constants_str(constants: MnkConstantsConfig, ble: BleTomlConfig) -> String {
    let constant_strs = vec![
        const_declaration!(pub(crate) DEBOUNCE_THRESHOLD = constants.debounce_threshold),
        const_declaration!(pub(crate) SCAN_INTERVAL_MS = constants.scan_interval_ms),
        const_declaration!(pub(crate) CONNECTION_EVENT_CHANNEL_SIZE = constants.connection_event_channel_size),
        const_declaration!(pub(crate) STATUS_LED_BLINK_MS = constants.status_led_blink_ms),
        format!("pub(crate) const DEVICE_NAME: &str = {:?};", ble.device_name),
    ];

    constant_strs
        .into_iter()
        .map(|s| "#[allow(clippy::redundant_static_lifetimes, dead_code)]\n".to_owned() + s.as_str())
        .collect::<Vec<_>>()
        .join("\n")
}
