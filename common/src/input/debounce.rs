//! Debouncing for physical buttons and the touch panel.
//!
//! Buttons are active-low; callers pass `pressed = true` when the pin reads
//! low. Time is supplied by the caller in milliseconds.

use crate::config::{BUTTON_DEBOUNCE_MS, TOUCH_INTERVAL_MS};

/// Debounce phase of a button.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DebounceState {
    /// No level change seen since power-up.
    #[default]
    Idle,
    /// Level changed recently; waiting for it to hold.
    Settling,
    /// Level has held for the debounce window.
    Stable,
}

/// One physical button with repeat suppression.
///
/// A press fires once when the pressed level has been stable for
/// [`BUTTON_DEBOUNCE_MS`]. It cannot fire again until the released level has
/// been stable just as long, so holding the button or bouncing while held
/// never repeats the action.
#[derive(Clone, Copy, Debug, Default)]
pub struct ButtonDebouncer {
    /// Last raw level (`true` = pressed).
    raw: bool,
    /// Time of the last raw level change.
    changed_at: u64,
    state: DebounceState,
    /// Set when a press fires, cleared after a stable release.
    handled: bool,
}

impl ButtonDebouncer {
    /// Create a new button state (released).
    pub const fn new() -> Self {
        Self {
            raw: false,
            changed_at: 0,
            state: DebounceState::Idle,
            handled: false,
        }
    }

    #[inline]
    pub const fn state(&self) -> DebounceState { self.state }

    #[inline]
    pub const fn is_handled(&self) -> bool { self.handled }

    /// Feed one sample. Returns `true` exactly once per physical press.
    pub fn just_pressed(
        &mut self,
        pressed: bool,
        now_ms: u64,
    ) -> bool {
        if pressed != self.raw {
            self.raw = pressed;
            self.changed_at = now_ms;
            self.state = DebounceState::Settling;
            return false;
        }

        if self.state == DebounceState::Settling && now_ms.saturating_sub(self.changed_at) >= BUTTON_DEBOUNCE_MS {
            self.state = DebounceState::Stable;
        }
        if self.state != DebounceState::Stable {
            return false;
        }

        if !self.raw {
            self.handled = false;
            return false;
        }
        if self.handled {
            return false;
        }
        self.handled = true;
        true
    }
}

/// Minimum spacing between accepted touch samples.
#[derive(Clone, Copy, Debug, Default)]
pub struct TouchGate {
    last_accepted: Option<u64>,
}

impl TouchGate {
    pub const fn new() -> Self { Self { last_accepted: None } }

    /// Accept a touch sample at `now_ms` only once more than
    /// [`TOUCH_INTERVAL_MS`] have passed since the last accepted one.
    pub fn accept(
        &mut self,
        now_ms: u64,
    ) -> bool {
        if let Some(last) = self.last_accepted
            && now_ms.saturating_sub(last) <= TOUCH_INTERVAL_MS
        {
            return false;
        }
        self.last_accepted = Some(now_ms);
        true
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
