mod ble_config;

pub use ble_config::{BleConfig, MAX_DEVICE_NAME_LEN, NUS_SERVICE_UUID};
use embassy_time::Duration;

use crate::driver::gpio::{Gpio, Level, Pin, Pull};
use crate::{DEBOUNCE_THRESHOLD, SCAN_INTERVAL_MS, STATUS_LED_BLINK_MS};

/// The config struct for the keyboard.
///
/// It's built once at startup and passed by reference to the components, nothing
/// in it changes while the firmware runs.
#[derive(Clone, Debug)]
pub struct KeyboardConfig<'a, const SIDE: usize, const ROW: usize, const COL: usize> {
    /// Wiring of the key matrix
    pub matrix: MatrixConfig<SIDE, ROW, COL>,
    pub debounce: DebounceConfig,
    pub ble: BleConfig<'a>,
    /// Heartbeat led, `None` if the board has no spare led
    pub status_led: Option<StatusLedConfig>,
    /// Period of the scan-debounce-dispatch cycle
    pub scan_interval: Duration,
}

impl<'a, const SIDE: usize, const ROW: usize, const COL: usize> KeyboardConfig<'a, SIDE, ROW, COL> {
    pub fn new(matrix: MatrixConfig<SIDE, ROW, COL>) -> Self {
        Self {
            matrix,
            debounce: DebounceConfig::default(),
            ble: BleConfig::default(),
            status_led: None,
            scan_interval: Duration::from_millis(SCAN_INTERVAL_MS),
        }
    }

    /// Check the whole config against the GPIO bank it will drive.
    pub fn validate<G: Gpio>(&self, gpio: &G) -> Result<(), ConfigError> {
        let mut used = PinSet::new();
        self.matrix.check_pins(gpio, &mut used)?;
        if let Some(led) = &self.status_led {
            used.insert(gpio, led.pin)?;
        }
        if self.debounce.threshold == 0 {
            return Err(ConfigError::ZeroDebounceThreshold);
        }
        if self.ble.device_name.is_empty() {
            return Err(ConfigError::EmptyDeviceName);
        }
        if self.ble.device_name.len() > MAX_DEVICE_NAME_LEN {
            return Err(ConfigError::DeviceNameTooLong);
        }
        Ok(())
    }
}

/// Wiring tables of the key matrix.
///
/// Every side shares the row lines and has its own group of column lines.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MatrixConfig<const SIDE: usize, const ROW: usize, const COL: usize> {
    /// Row output pins, driven one at a time
    pub row_pins: [Pin; ROW],
    /// Level that selects a row, the idle level is its inverse
    pub row_active: Level,
    /// Column groups, in side order
    pub sides: [ColumnGroup<COL>; SIDE],
}

/// Column input pins of one side
#[derive(Clone, Copy, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ColumnGroup<const COL: usize> {
    pub col_pins: [Pin; COL],
    pub pull: Pull,
}

impl<const COL: usize> ColumnGroup<COL> {
    pub const fn pull_up(col_pins: [Pin; COL]) -> Self {
        Self {
            col_pins,
            pull: Pull::Up,
        }
    }
}

/// Wiring of the mnk.01 split board: rows on 0..=5, left columns on 6..=11 and
/// right columns on 12..=17, all columns pulled up.
pub const MNK_MATRIX: MatrixConfig<2, 6, 6> = MatrixConfig {
    row_pins: [0, 1, 2, 3, 4, 5],
    row_active: Level::Low,
    sides: [
        ColumnGroup::pull_up([6, 7, 8, 9, 10, 11]),
        ColumnGroup::pull_up([12, 13, 14, 15, 16, 17]),
    ],
};

impl<const SIDE: usize, const ROW: usize, const COL: usize> MatrixConfig<SIDE, ROW, COL> {
    /// Check that every pin exists and is used once.
    pub fn validate<G: Gpio>(&self, gpio: &G) -> Result<(), ConfigError> {
        self.check_pins(gpio, &mut PinSet::new())
    }

    fn check_pins<G: Gpio>(&self, gpio: &G, used: &mut PinSet) -> Result<(), ConfigError> {
        for &pin in self.row_pins.iter() {
            used.insert(gpio, pin)?;
        }
        for side in self.sides.iter() {
            for &pin in side.col_pins.iter() {
                used.insert(gpio, pin)?;
            }
        }
        Ok(())
    }
}

/// Config for the debouncer
#[derive(Clone, Copy, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DebounceConfig {
    /// Number of consecutive consistent scans required to accept a change, at least 1
    pub threshold: u8,
}

impl Default for DebounceConfig {
    fn default() -> Self {
        Self {
            threshold: DEBOUNCE_THRESHOLD,
        }
    }
}

/// Config for the heartbeat led
#[derive(Clone, Copy, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StatusLedConfig {
    pub pin: Pin,
    /// Time between two toggles, zero keeps the led off
    pub period: Duration,
}

impl StatusLedConfig {
    pub fn new(pin: Pin) -> Self {
        Self {
            pin,
            period: Duration::from_millis(STATUS_LED_BLINK_MS),
        }
    }
}

/// Startup configuration errors, these are fatal
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// The pin is used twice in the wiring tables
    DuplicatePin(Pin),
    /// The GPIO bank has no such pin
    InvalidPin(Pin),
    ZeroDebounceThreshold,
    EmptyDeviceName,
    DeviceNameTooLong,
}

/// Bitmap of the pins seen so far
struct PinSet([u32; 8]);

impl PinSet {
    fn new() -> Self {
        Self([0; 8])
    }

    fn insert<G: Gpio>(&mut self, gpio: &G, pin: Pin) -> Result<(), ConfigError> {
        if !gpio.is_valid_pin(pin) {
            return Err(ConfigError::InvalidPin(pin));
        }
        let (word, bit) = ((pin / 32) as usize, pin % 32);
        if self.0[word] & (1 << bit) != 0 {
            return Err(ConfigError::DuplicatePin(pin));
        }
        self.0[word] |= 1 << bit;
        Ok(())
    }
}
