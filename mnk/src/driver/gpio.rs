use embedded_hal::digital::{Error as _, ErrorKind, InputPin, StatefulOutputPin};

/// GPIO pin number as it appears in the wiring tables
pub type Pin = u8;

/// Logic level of a pin
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Level {
    Low,
    High,
}

impl core::ops::Not for Level {
    type Output = Level;

    fn not(self) -> Self::Output {
        match self {
            Level::Low => Level::High,
            Level::High => Level::Low,
        }
    }
}

impl From<bool> for Level {
    fn from(high: bool) -> Self {
        if high { Level::High } else { Level::Low }
    }
}

/// Pull resistor applied to an input pin
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Pull {
    None,
    Up,
    Down,
}

impl Pull {
    /// The level an input reads when its switch is closed.
    ///
    /// With a pull-up the pressed key pulls the line low, otherwise the closed
    /// switch drives the line high.
    pub fn engaged_level(self) -> Level {
        match self {
            Pull::Up => Level::Low,
            Pull::Down | Pull::None => Level::High,
        }
    }
}

/// Pin-number based GPIO capability.
///
/// This is the only way the matrix scanner and the status led touch hardware.
/// Every operation is synchronous and bounded.
pub trait Gpio {
    type Error;

    /// Configure `pin` as a push-pull output driven to `initial`
    fn configure_output(&mut self, pin: Pin, initial: Level) -> Result<(), Self::Error>;

    /// Configure `pin` as an input with the given pull resistor
    fn configure_input(&mut self, pin: Pin, pull: Pull) -> Result<(), Self::Error>;

    fn write(&mut self, pin: Pin, level: Level) -> Result<(), Self::Error>;

    fn read(&mut self, pin: Pin) -> Result<Level, Self::Error>;

    fn toggle(&mut self, pin: Pin) -> Result<(), Self::Error>;

    /// Whether `pin` exists on this GPIO bank
    fn is_valid_pin(&self, _pin: Pin) -> bool {
        true
    }
}

/// Error of [`HalGpio`]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HalGpioError {
    /// The pin number is not part of the bank
    InvalidPin(Pin),
    /// An output operation was requested on an input pin
    NotAnOutput(Pin),
    /// An input operation was requested on an output pin
    NotAnInput(Pin),
    /// The HAL pin reported an error
    Pin(ErrorKind),
}

/// [`Gpio`] implementation on top of `embedded-hal` pins.
///
/// Pins are numbered in the order they are given: `0..OUTPUT_PIN_NUM` are the
/// outputs, then `OUTPUT_PIN_NUM..OUTPUT_PIN_NUM + INPUT_PIN_NUM` are the inputs.
/// The HAL fixes the pin direction and pull when the pin objects are created, so
/// `configure_input` only checks the pin number.
pub struct HalGpio<In: InputPin, Out: StatefulOutputPin, const INPUT_PIN_NUM: usize, const OUTPUT_PIN_NUM: usize> {
    /// Output pins, rows and indicators
    output_pins: [Out; OUTPUT_PIN_NUM],
    /// Input pins, columns of every side
    input_pins: [In; INPUT_PIN_NUM],
}

impl<In: InputPin, Out: StatefulOutputPin, const INPUT_PIN_NUM: usize, const OUTPUT_PIN_NUM: usize>
    HalGpio<In, Out, INPUT_PIN_NUM, OUTPUT_PIN_NUM>
{
    pub fn new(input_pins: [In; INPUT_PIN_NUM], output_pins: [Out; OUTPUT_PIN_NUM]) -> Self {
        Self {
            output_pins,
            input_pins,
        }
    }

    /// Give the pins back
    pub fn release(self) -> ([In; INPUT_PIN_NUM], [Out; OUTPUT_PIN_NUM]) {
        (self.input_pins, self.output_pins)
    }

    fn output(&mut self, pin: Pin) -> Result<&mut Out, HalGpioError> {
        let idx = pin as usize;
        if idx < OUTPUT_PIN_NUM {
            Ok(&mut self.output_pins[idx])
        } else if idx < OUTPUT_PIN_NUM + INPUT_PIN_NUM {
            Err(HalGpioError::NotAnOutput(pin))
        } else {
            Err(HalGpioError::InvalidPin(pin))
        }
    }

    fn input(&mut self, pin: Pin) -> Result<&mut In, HalGpioError> {
        let idx = pin as usize;
        if idx < OUTPUT_PIN_NUM {
            Err(HalGpioError::NotAnInput(pin))
        } else if idx < OUTPUT_PIN_NUM + INPUT_PIN_NUM {
            Ok(&mut self.input_pins[idx - OUTPUT_PIN_NUM])
        } else {
            Err(HalGpioError::InvalidPin(pin))
        }
    }
}

impl<In: InputPin, Out: StatefulOutputPin, const INPUT_PIN_NUM: usize, const OUTPUT_PIN_NUM: usize> Gpio
    for HalGpio<In, Out, INPUT_PIN_NUM, OUTPUT_PIN_NUM>
{
    type Error = HalGpioError;

    fn configure_output(&mut self, pin: Pin, initial: Level) -> Result<(), Self::Error> {
        self.write(pin, initial)
    }

    fn configure_input(&mut self, pin: Pin, _pull: Pull) -> Result<(), Self::Error> {
        self.input(pin).map(|_| ())
    }

    fn write(&mut self, pin: Pin, level: Level) -> Result<(), Self::Error> {
        let out = self.output(pin)?;
        let result = match level {
            Level::High => out.set_high(),
            Level::Low => out.set_low(),
        };
        result.map_err(|e| HalGpioError::Pin(e.kind()))
    }

    fn read(&mut self, pin: Pin) -> Result<Level, Self::Error> {
        self.input(pin)?
            .is_high()
            .map(Level::from)
            .map_err(|e| HalGpioError::Pin(e.kind()))
    }

    fn toggle(&mut self, pin: Pin) -> Result<(), Self::Error> {
        self.output(pin)?.toggle().map_err(|e| HalGpioError::Pin(e.kind()))
    }

    fn is_valid_pin(&self, pin: Pin) -> bool {
        (pin as usize) < OUTPUT_PIN_NUM + INPUT_PIN_NUM
    }
}
