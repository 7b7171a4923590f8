//! Color constants for the pendant UI.
//!
//! # Optimization: Using Built-in `RgbColor` Trait Constants
//!
//! The `embedded_graphics` crate provides pre-defined color constants through the
//! `RgbColor` trait. Using these instead of manually constructing `Rgb565::new(r, g, b)`
//! ensures optimal values and improves code clarity.
//!
//! ## Dark Mode Palette
//!
//! The pendant runs a dark theme: pure black background, very dark gray panels,
//! orange titles and readouts. Raw RGB565 values match what the panel vendor's
//! color picker produces, so they are unpacked from the packed word at compile time.

use embedded_graphics::pixelcolor::{Rgb565, RgbColor};

/// Build a color from a packed RGB565 word.
const fn raw(word: u16) -> Rgb565 {
    // `From<RawU16>` is not const; unpack the channels instead.
    Rgb565::new(((word >> 11) & 0x1F) as u8, ((word >> 5) & 0x3F) as u8, (word & 0x1F) as u8)
}

// =============================================================================
// Standard Colors (from RgbColor trait - guaranteed optimal values)
// =============================================================================

/// Pure black. Screen background.
pub const BACKGROUND: Rgb565 = Rgb565::BLACK;

/// Pure white. Button text.
pub const WHITE: Rgb565 = Rgb565::WHITE;

/// Pure red. Stop / Delete buttons.
pub const RED: Rgb565 = Rgb565::RED;

/// Pure green. Spindle RPM readout, versions, Open button.
pub const GREEN: Rgb565 = Rgb565::GREEN;

/// Cyan. Machine status label and work positions.
pub const CYAN: Rgb565 = Rgb565::CYAN;

// =============================================================================
// Custom Colors (application-specific)
// =============================================================================

/// Very dark gray for the title bar and readout panels.
pub const DARKER_BG: Rgb565 = raw(0x2104);

/// Orange for titles, machine positions and selected buttons.
pub const ORANGE: Rgb565 = raw(0xFD20);

/// Title text color.
pub const TITLE: Rgb565 = ORANGE;

/// Medium gray for captions ("STATUS", "JOG AXIS", units).
pub const GRAY_TEXT: Rgb565 = raw(0x7BEF);

/// Darker green for home / zero / direction buttons.
pub const DARK_GREEN: Rgb565 = raw(0x0360);

/// Navigation button blue.
pub const BLUE: Rgb565 = raw(0x1C9F);

/// Unselected button gray.
pub const BUTTON_GRAY: Rgb565 = raw(0x31A6);

// =============================================================================
// Unit Tests
// =============================================================================
