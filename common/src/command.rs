//! Machine command vocabulary.
//!
//! Every line the pendant sends to the controller is a [`Command`]. The
//! [`Display`](core::fmt::Display) impl produces the exact wire text, so the
//! dispatcher never builds command strings by hand.
//!
//! | Command | Wire |
//! |---------|------|
//! | Feed hold / E-Stop | `!` |
//! | Cycle start | `~` |
//! | Alarm clear | `$X` |
//! | Home one axis | `$HX` |
//! | Spindle on | `M3 S12000` / `M4 S12000` |
//! | Spindle off | `M5` |
//! | Zero work offset | `G10 L20 P1 X0` |
//! | Relative jog | `$J=G91 X-0.1 F1000` |
//! | Probe | `G38.2 Z-25.0 F50` |
//! | Macro | `$Macros/Run=3` |
//! | SD card | `$SD/Run=/part.nc` |

use core::fmt::{self, Write};

use heapless::String;

use crate::config::JOG_FEED_RATE;
use crate::state::{Axis, ProbeKind, SpindleDirection};

/// Longest wire line the pendant emits.
pub const COMMAND_LEN: usize = 64;

/// A command line for the machine controller.
#[derive(Clone, Copy, PartialEq, Debug)]
pub enum Command<'a> {
    /// `!` - feed hold (also used for E-Stop).
    FeedHold,
    /// `~` - cycle start / resume.
    CycleStart,
    /// `$X` - clear alarm lock.
    AlarmClear,
    /// `$H<axis>` - home one axis.
    Home(Axis),
    /// `M3`/`M4 S<rpm>` - spindle on.
    SpindleOn { rpm: u32, direction: SpindleDirection },
    /// `M5` - spindle off.
    SpindleOff,
    /// `G10 L20 P<n> <axis>0` - zero one axis of a work offset.
    ZeroAxis { p: u8, axis: Axis },
    /// `G10 L20 P<n> X0 Y0 Z0 A0` - zero every axis of a work offset.
    ZeroAll { p: u8 },
    /// `$J=G91 <axis><distance> F<feed>` - relative jog.
    Jog { axis: Axis, distance: f32 },
    /// `G38.2 <axis><travel> F<feed>` - probe toward the work.
    Probe { kind: ProbeKind, travel: f32, feed: f32 },
    /// `$Macros/Run=<n>` - run a stored macro.
    RunMacro(u8),
    /// `$SD/Run=/<file>` - run a file from the SD card.
    RunFile(&'a str),
    /// `$SD/Delete=/<file>` - delete a file from the SD card.
    DeleteFile(&'a str),
}

impl Command<'_> {
    /// Render the wire line into a fixed buffer. Overlong file names are cut.
    pub fn to_line(&self) -> String<COMMAND_LEN> {
        let mut line = String::new();
        let _ = write!(line, "{self}");
        line
    }
}

impl fmt::Display for Command<'_> {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        match *self {
            Self::FeedHold => f.write_str("!"),
            Self::CycleStart => f.write_str("~"),
            Self::AlarmClear => f.write_str("$X"),
            Self::Home(axis) => write!(f, "$H{}", axis.letter()),
            Self::SpindleOn { rpm, direction } => {
                let code = match direction {
                    SpindleDirection::Forward => "M3",
                    SpindleDirection::Reverse => "M4",
                };
                write!(f, "{code} S{rpm}")
            }
            Self::SpindleOff => f.write_str("M5"),
            Self::ZeroAxis { p, axis } => write!(f, "G10 L20 P{p} {}0", axis.letter()),
            Self::ZeroAll { p } => write!(f, "G10 L20 P{p} X0 Y0 Z0 A0"),
            Self::Jog { axis, distance } => write!(f, "$J=G91 {}{distance:.1} F{JOG_FEED_RATE}", axis.letter()),
            Self::Probe { kind, travel, feed } => {
                let sign = match kind {
                    ProbeKind::ZSurface => "-",
                    ProbeKind::XEdge => "",
                };
                write!(f, "G38.2 {}{sign}{travel:.1} F{feed:.0}", kind.axis().letter())
            }
            Self::RunMacro(index) => write!(f, "$Macros/Run={index}"),
            Self::RunFile(name) => write!(f, "$SD/Run=/{name}"),
            Self::DeleteFile(name) => write!(f, "$SD/Delete=/{name}"),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn line(cmd: Command<'_>) -> std::string::String { cmd.to_line().as_str().into() }

    #[test]
    fn test_realtime_commands() {
        assert_eq!(line(Command::FeedHold), "!");
        assert_eq!(line(Command::CycleStart), "~");
        assert_eq!(line(Command::AlarmClear), "$X");
    }

    #[test]
    fn test_home_and_zero() {
        assert_eq!(line(Command::Home(Axis::A)), "$HA");
        assert_eq!(line(Command::ZeroAxis { p: 1, axis: Axis::Y }), "G10 L20 P1 Y0");
        assert_eq!(line(Command::ZeroAll { p: 2 }), "G10 L20 P2 X0 Y0 Z0 A0");
    }

    #[test]
    fn test_spindle_commands() {
        let fwd = Command::SpindleOn {
            rpm: 12000,
            direction: SpindleDirection::Forward,
        };
        let rev = Command::SpindleOn {
            rpm: 6000,
            direction: SpindleDirection::Reverse,
        };
        assert_eq!(line(fwd), "M3 S12000");
        assert_eq!(line(rev), "M4 S6000");
        assert_eq!(line(Command::SpindleOff), "M5");
    }

    #[test]
    fn test_jog_format() {
        let pos = Command::Jog {
            axis: Axis::X,
            distance: 1.0,
        };
        let neg = Command::Jog {
            axis: Axis::Z,
            distance: -0.1,
        };
        assert_eq!(line(pos), "$J=G91 X1.0 F1000");
        assert_eq!(line(neg), "$J=G91 Z-0.1 F1000");
    }

    #[test]
    fn test_probe_format() {
        let z = Command::Probe {
            kind: ProbeKind::ZSurface,
            travel: 25.0,
            feed: 50.0,
        };
        let x = Command::Probe {
            kind: ProbeKind::XEdge,
            travel: 10.0,
            feed: 100.0,
        };
        assert_eq!(line(z), "G38.2 Z-25.0 F50");
        assert_eq!(line(x), "G38.2 X10.0 F100");
    }

    #[test]
    fn test_macro_and_file_commands() {
        assert_eq!(line(Command::RunMacro(7)), "$Macros/Run=7");
        assert_eq!(line(Command::RunFile("part.nc")), "$SD/Run=/part.nc");
        assert_eq!(line(Command::DeleteFile("old.nc")), "$SD/Delete=/old.nc");
    }
}
