//! Touchscreen UI core for a CNC jog pendant.
//!
//! This crate is platform-agnostic and shared between the desktop simulator
//! and the firmware:
//!
//! - [`screen`]: Screen enum and the current/previous screen state machine
//! - [`layout`]: Declarative screen tables (buttons, chrome, dynamic regions)
//! - [`state`]: Machine status and the per-screen selection state
//! - [`command`]: Command lines sent to the machine controller
//! - [`input`]: Button debouncing, encoder decoding and action dispatch
//! - [`render`]: Sprite-backed render cache and screen drawing
//! - [`pendant`]: The main loop tying it all together
//! - [`ports`]: Traits the host implements (panel, serial sink, preferences, heap)
//! - [`log`]: In-memory event log
//! - [`colors`], [`config`], [`styles`], [`widgets`]: Drawing constants and helpers
//!
//! # no_std Compatibility
//!
//! The crate is `no_std` and only needs `alloc` for region sprites. Time is
//! passed in as milliseconds; nothing here reads a clock.

#![cfg_attr(not(test), no_std)]
// Crate-level lints
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_sign_loss)]

extern crate alloc;

pub mod colors;
pub mod command;
pub mod config;
pub mod input;
pub mod layout;
pub mod log;
pub mod pendant;
pub mod ports;
pub mod render;
pub mod screen;
pub mod state;
pub mod styles;
pub mod widgets;

#[cfg(test)]
mod testing;

// Re-export commonly used items
pub use command::Command;
pub use input::InputSample;
pub use pendant::Pendant;
pub use ports::{CommandSink, HeapMonitor, Panel, Preferences};
pub use screen::Screen;
pub use state::{MachineState, MachineStatus, PendantState, Rotation};
