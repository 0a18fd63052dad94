//! Hardware access used by the input pipeline
pub mod gpio;

pub use gpio::{Gpio, HalGpio, HalGpioError, Level, Pin, Pull};
