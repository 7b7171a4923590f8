//! Pendant state model.
//!
//! - [`machine`]: what the machine reports (status, positions, spindle, versions)
//! - [`selection`]: per-screen selections (jog, spindle, overrides, work, probe)
//! - [`sd_card`]: SD card file list with scrolling
//!
//! [`PendantState`] aggregates everything and is owned by the
//! [`Pendant`](crate::pendant::Pendant) context; nothing here is global.

mod machine;
mod sd_card;
mod selection;

use heapless::String;
pub use machine::{Axis, MachineState, MachineStatus, Rotation, ShortText, SpindleDirection};
pub use sd_card::{FileName, SdCardState};
pub use selection::{FeedsState, JogState, ProbeKind, ProbeParam, ProbeState, SpindleState, WorkState};

/// Copy `src` into `dst`, truncating on a char boundary when it does not fit.
pub(crate) fn copy_truncated<const N: usize>(
    dst: &mut String<N>,
    src: &str,
) {
    dst.clear();
    for c in src.chars() {
        if dst.push(c).is_err() {
            break;
        }
    }
}

/// Everything the screens read and the dispatcher writes.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PendantState {
    pub machine: MachineState,
    pub jog: JogState,
    pub spindle: SpindleState,
    pub feeds: FeedsState,
    pub work: WorkState,
    pub probe: ProbeState,
    pub sd_card: SdCardState,
}
