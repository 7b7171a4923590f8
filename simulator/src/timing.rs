//! Timing constants for the simulator.
//!
//! These constants use `std::time::Duration` which is not available in `no_std`
//! environments, so they are defined here rather than in the common crate.

use std::time::Duration;

/// Target loop time (~100 Hz). The main loop sleeps if an iteration finishes early.
pub const FRAME_TIME: Duration = Duration::from_millis(10);
