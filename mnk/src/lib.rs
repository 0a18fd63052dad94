#![doc = include_str!("../../README.md")]
//! ## Feature flags
#![doc = document_features::document_features!()]
#![no_std]

// Logging macros, must be declared before the other modules
#[macro_use]
mod fmt;

pub mod ble;
pub mod channel;
pub mod config;
pub mod debounce;
pub mod dispatcher;
pub mod driver;
pub mod event;
pub mod keyboard;
pub mod light;
pub mod matrix;
pub mod state;
pub mod tracker;
pub mod transport;

pub use ble::{ConnectionEvent, ConnectionManager};
pub use channel::{CONNECTION_EVENT_CHANNEL, report_connection_event};
pub use config::{ConfigError, KeyboardConfig, MNK_MATRIX};
pub use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex as RawMutex;
pub use keyboard::{CycleReport, Keyboard, MnkKeyboard};
pub use state::{CONNECTION_STATE, ConnectionState};

// Constants generated from `keyboard.toml`
include!(concat!(env!("OUT_DIR"), "/constants.rs"));
