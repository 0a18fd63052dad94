// Type definitions for mnk-config

pub mod ble;
pub mod constants;

pub use ble::*;
pub use constants::*;
