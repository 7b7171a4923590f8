//! Machine state displayed by the pendant.
//!
//! Everything the screens render lives in [`MachineState`]. The dispatcher
//! mutates it on operator actions; the host applies inbound status updates
//! between loop iterations through
//! [`Pendant::machine_mut`](crate::pendant::Pendant::machine_mut).

use embedded_graphics::pixelcolor::Rgb565;
use heapless::String;

use super::copy_truncated;
use crate::colors::{CYAN, GREEN, ORANGE, RED};
use crate::config::SD_NAME_LEN;

// =============================================================================
// Machine Status
// =============================================================================

/// Controller state label.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MachineStatus {
    #[default]
    Idle,
    Alarm,
    Hold,
    Run,
}

impl MachineStatus {
    /// Label shown in the status panels.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Idle => "IDLE",
            Self::Alarm => "ALARM",
            Self::Hold => "HOLD",
            Self::Run => "RUN",
        }
    }

    /// Color used for the large status label.
    pub const fn color(self) -> Rgb565 {
        match self {
            Self::Idle => CYAN,
            Self::Alarm => RED,
            Self::Hold => ORANGE,
            Self::Run => GREEN,
        }
    }
}

// =============================================================================
// Axes
// =============================================================================

/// One of the four machine axes.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Axis {
    #[default]
    X,
    Y,
    Z,
    A,
}

impl Axis {
    /// All axes in display order.
    pub const ALL: [Self; 4] = [Self::X, Self::Y, Self::Z, Self::A];

    /// Position index (X=0 .. A=3).
    #[inline]
    pub const fn index(self) -> usize { self as usize }

    /// Axis letter as used on buttons and in commands.
    pub const fn letter(self) -> &'static str {
        match self {
            Self::X => "X",
            Self::Y => "Y",
            Self::Z => "Z",
            Self::A => "A",
        }
    }
}

// =============================================================================
// Spindle Direction
// =============================================================================

/// Spindle rotation direction.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SpindleDirection {
    #[default]
    Forward,
    Reverse,
}

impl SpindleDirection {
    /// Short label ("Fwd" / "Rev").
    pub const fn label(self) -> &'static str {
        match self {
            Self::Forward => "Fwd",
            Self::Reverse => "Rev",
        }
    }
}

// =============================================================================
// Display Rotation
// =============================================================================

/// Display rotation. Only the two portrait orientations are used.
///
/// The persisted raw value follows the panel driver's quarter-turn numbering:
/// `2` is the normal mounting, `0` is upside down.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Rotation {
    /// Inverted orientation (raw 0).
    Deg0,
    /// Normal orientation (raw 2).
    #[default]
    Deg180,
}

impl Rotation {
    /// Raw value stored in preferences.
    pub const fn raw(self) -> i32 {
        match self {
            Self::Deg0 => 0,
            Self::Deg180 => 2,
        }
    }

    /// Parse a stored value. Anything but 0 is the normal orientation, so a
    /// corrupted or quarter-turn value never leaves the pendant sideways.
    pub const fn from_raw(raw: i32) -> Self {
        match raw {
            0 => Self::Deg0,
            _ => Self::Deg180,
        }
    }

    /// The other supported rotation.
    pub const fn toggled(self) -> Self {
        match self {
            Self::Deg0 => Self::Deg180,
            Self::Deg180 => Self::Deg0,
        }
    }

    /// Label shown on the system info screen.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Deg0 => "0 deg",
            Self::Deg180 => "180 deg",
        }
    }
}

// =============================================================================
// Machine State
// =============================================================================

/// Short text fields (versions, connection status).
pub type ShortText = String<16>;

/// Everything the pendant displays about the machine.
#[derive(Clone, Debug, PartialEq)]
pub struct MachineState {
    pub status: MachineStatus,
    pub current_file: String<SD_NAME_LEN>,
    /// Machine positions in mm, indexed by [`Axis::index`].
    pub machine_pos: [f32; 4],
    /// Work positions in mm, indexed by [`Axis::index`].
    pub work_pos: [f32; 4],
    /// Feed rate in mm/min.
    pub feed_rate: u32,
    pub spindle_rpm: u32,
    pub spindle_direction: SpindleDirection,
    pub spindle_running: bool,
    /// Feed override in percent.
    pub feed_override: u16,
    /// Spindle override in percent.
    pub spindle_override: u16,
    pub dial_version: ShortText,
    pub controller_version: ShortText,
    pub baud_rate: u32,
    pub port: String<24>,
    pub connection: ShortText,
    pub rotation: Rotation,
}

impl MachineState {
    /// Machine position of one axis.
    #[inline]
    pub const fn machine(
        &self,
        axis: Axis,
    ) -> f32 {
        self.machine_pos[axis.index()]
    }

    /// Work position of one axis.
    #[inline]
    pub const fn work(
        &self,
        axis: Axis,
    ) -> f32 {
        self.work_pos[axis.index()]
    }

    /// Replace the current file name (truncated to capacity).
    pub fn set_current_file(
        &mut self,
        name: &str,
    ) {
        copy_truncated(&mut self.current_file, name);
    }
}

impl Default for MachineState {
    fn default() -> Self {
        let mut state = Self {
            status: MachineStatus::Idle,
            current_file: String::new(),
            machine_pos: [0.0; 4],
            work_pos: [0.0; 4],
            feed_rate: 1500,
            spindle_rpm: 12000,
            spindle_direction: SpindleDirection::Forward,
            spindle_running: false,
            feed_override: 100,
            spindle_override: 100,
            dial_version: String::new(),
            controller_version: String::new(),
            baud_rate: 115_200,
            port: String::new(),
            connection: String::new(),
            rotation: Rotation::Deg180,
        };
        copy_truncated(&mut state.current_file, "No file loaded");
        copy_truncated(&mut state.dial_version, "v3.7.17");
        copy_truncated(&mut state.controller_version, "v3.7.16");
        copy_truncated(&mut state.port, "/dev/ttyUSB0");
        copy_truncated(&mut state.connection, "Connected");
        state
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
