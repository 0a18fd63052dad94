#![allow(dead_code)]

use mnk::ble::AdvertisingFields;
use mnk::driver::{Gpio, Level, Pin, Pull};
use mnk::event::{KeyEvent, KeyPos};
use mnk::transport::{Advertiser, TransportWriter};

// Init logger for tests
#[ctor::ctor]
pub fn init_log() {
    let _ = env_logger::builder()
        .filter_level(log::LevelFilter::Debug)
        .is_test(true)
        .try_init();
}

pub const PIN_COUNT: usize = 20;
pub const LED_PIN: Pin = 19;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FakeGpioError(pub Pin);

/// Electrical model of the mnk.01 board.
///
/// Rows are on pins 0..=5 and select when driven low, left columns are on
/// 6..=11 and right columns on 12..=17, all pulled up. Pin 19 is a spare led.
pub struct FakeBoard {
    pub levels: [Option<Level>; PIN_COUNT],
    pub pulls: [Option<Pull>; PIN_COUNT],
    pub pressed: [[[bool; 6]; 6]; 2],
    pub fail_reads: bool,
    pub toggles: usize,
}

impl Default for FakeBoard {
    fn default() -> Self {
        Self {
            levels: [None; PIN_COUNT],
            pulls: [None; PIN_COUNT],
            pressed: [[[false; 6]; 6]; 2],
            fail_reads: false,
            toggles: 0,
        }
    }
}

impl FakeBoard {
    pub fn press(&mut self, pos: KeyPos) {
        self.pressed[pos.side as usize][pos.row as usize][pos.col as usize] = true;
    }

    pub fn release(&mut self, pos: KeyPos) {
        self.pressed[pos.side as usize][pos.row as usize][pos.col as usize] = false;
    }

    fn selected_row(&self) -> Option<usize> {
        let selected: Vec<usize> = (0..6).filter(|&r| self.levels[r] == Some(Level::Low)).collect();
        assert!(selected.len() <= 1, "rows {:?} selected at once", selected);
        selected.first().copied()
    }
}

impl Gpio for FakeBoard {
    type Error = FakeGpioError;

    fn configure_output(&mut self, pin: Pin, initial: Level) -> Result<(), FakeGpioError> {
        self.levels[pin as usize] = Some(initial);
        Ok(())
    }

    fn configure_input(&mut self, pin: Pin, pull: Pull) -> Result<(), FakeGpioError> {
        self.pulls[pin as usize] = Some(pull);
        Ok(())
    }

    fn write(&mut self, pin: Pin, level: Level) -> Result<(), FakeGpioError> {
        assert!(self.levels[pin as usize].is_some(), "pin {} is not an output", pin);
        self.levels[pin as usize] = Some(level);
        Ok(())
    }

    fn read(&mut self, pin: Pin) -> Result<Level, FakeGpioError> {
        if self.fail_reads {
            return Err(FakeGpioError(pin));
        }
        assert_eq!(self.pulls[pin as usize], Some(Pull::Up), "pin {} is not a column", pin);
        let (side, col) = match pin {
            6..=11 => (0, pin as usize - 6),
            12..=17 => (1, pin as usize - 12),
            _ => return Err(FakeGpioError(pin)),
        };
        let engaged = self.selected_row().is_some_and(|row| self.pressed[side][row][col]);
        Ok(if engaged { Level::Low } else { Level::High })
    }

    fn toggle(&mut self, pin: Pin) -> Result<(), FakeGpioError> {
        let level = self.levels[pin as usize].ok_or(FakeGpioError(pin))?;
        self.levels[pin as usize] = Some(!level);
        self.toggles += 1;
        Ok(())
    }

    fn is_valid_pin(&self, pin: Pin) -> bool {
        (pin as usize) < PIN_COUNT
    }
}

/// Transport writer keeping every frame it was given
#[derive(Default)]
pub struct RecordingWriter {
    pub frames: Vec<Vec<u8>>,
    pub fail: bool,
}

impl RecordingWriter {
    pub fn events(&self) -> Vec<KeyEvent> {
        self.frames.iter().map(|frame| decode(frame)).collect()
    }
}

impl TransportWriter for RecordingWriter {
    type Error = ();

    async fn send(&mut self, bytes: &[u8]) -> Result<usize, ()> {
        if self.fail {
            return Err(());
        }
        self.frames.push(bytes.to_vec());
        Ok(bytes.len())
    }
}

/// Advertiser keeping the announced names, fails while `fail` is set
#[derive(Default)]
pub struct RecordingAdvertiser {
    pub names: Vec<String>,
    pub fail: bool,
}

impl Advertiser for RecordingAdvertiser {
    type Error = &'static str;

    async fn begin_advertising(&mut self, fields: &AdvertisingFields<'_>) -> Result<(), &'static str> {
        if self.fail {
            return Err("radio busy");
        }
        self.names.push(fields.device_name.to_string());
        Ok(())
    }
}

/// Decode a COBS framed postcard record
pub fn decode(frame: &[u8]) -> KeyEvent {
    let mut buf = frame.to_vec();
    postcard::from_bytes_cobs(&mut buf).unwrap()
}
