use embassy_time::{Duration, Instant};

use crate::config::StatusLedConfig;
use crate::driver::gpio::{Gpio, Level, Pin};

/// Heartbeat led, blinks while the firmware is alive.
///
/// It shares the GPIO bank with the matrix, so it's driven from the scan task
/// rather than from its own timer.
pub struct StatusLed {
    pin: Pin,
    /// Time between two toggles
    period: Duration,
    last_toggle: Instant,
    on: bool,
}

impl StatusLed {
    pub fn new(pin: Pin, period: Duration) -> Self {
        Self {
            pin,
            period,
            last_toggle: Instant::from_ticks(0),
            on: false,
        }
    }

    pub fn from_config(config: &StatusLedConfig) -> Self {
        Self::new(config.pin, config.period)
    }

    /// Configure the led pin as an output, turned off
    pub fn init<G: Gpio>(&mut self, gpio: &mut G, now: Instant) -> Result<(), G::Error> {
        gpio.configure_output(self.pin, Level::Low)?;
        self.on = false;
        self.last_toggle = now;
        Ok(())
    }

    /// Toggle the led if a period has passed since the last toggle, return whether it toggled.
    ///
    /// A zero period never blinks. GPIO errors are logged and the toggle is skipped.
    pub fn tick<G: Gpio>(&mut self, gpio: &mut G, now: Instant) -> bool {
        if self.period.as_ticks() == 0 || now.saturating_duration_since(self.last_toggle) < self.period {
            return false;
        }
        self.last_toggle = now;
        match gpio.toggle(self.pin) {
            Ok(()) => {
                self.on = !self.on;
                true
            }
            Err(_) => {
                warn!("Failed to toggle status led on pin {}", self.pin);
                false
            }
        }
    }

    pub fn is_on(&self) -> bool {
        self.on
    }

    pub fn pin(&self) -> Pin {
        self.pin
    }
}
