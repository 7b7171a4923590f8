//! Input handling: debouncing, encoder decoding and dispatch.
//!
//! The host samples its pins and touch controller once per loop iteration and
//! hands the levels to [`Pendant::tick`](crate::pendant::Pendant::tick) as an
//! [`InputSample`]. Touch points come from
//! [`Panel::touch`](crate::ports::Panel::touch).

mod debounce;
mod dispatch;
mod encoder;

pub use debounce::{ButtonDebouncer, DebounceState, TouchGate};
pub use dispatch::{Dispatch, InputResult, PhysicalButton};
pub use encoder::{EncoderDecoder, EncoderDirection, EncoderPins};

/// Pin levels for one loop iteration. `true` means pressed (pin low).
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct InputSample {
    pub estop: bool,
    pub context: bool,
    pub cycle_start: bool,
    /// `None` when no encoder is fitted.
    pub encoder: Option<EncoderPins>,
}
