//! Pre-computed static text styles to avoid per-draw object construction.
//!
//! # Text Sizes
//!
//! Screens describe text in four sizes, from captions to the big RPM readout.
//! Each size maps to one monospace font:
//!
//! | Size | Font | Cell |
//! |------|------|------|
//! | [`TextSize::Caption`] | `FONT_6X10` | 6x10 |
//! | [`TextSize::Body`] | `FONT_10X20` | 10x20 |
//! | [`TextSize::Large`] | `ProFont` 18pt | 12x22 |
//! | [`TextSize::Huge`] | `ProFont` 24pt | 16x29 |
//!
//! Monospace fonts make text measurement a multiplication, which is all the
//! centering and right-alignment code needs.
//!
//! # Dynamic Color Styles
//!
//! Most text needs a per-call color (selected vs. unselected, status color).
//! Callers use [`text_style`] which pairs the shared font reference with a color.

use embedded_graphics::mono_font::ascii::{FONT_6X10, FONT_10X20};
use embedded_graphics::mono_font::{MonoFont, MonoTextStyle};
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::text::{Alignment, Baseline, TextStyle, TextStyleBuilder};
use profont::{PROFONT_18_POINT, PROFONT_24_POINT};

// =============================================================================
// Text Alignment Styles (const - zero runtime cost)
// =============================================================================

/// Text anchored at its top-left corner (the cursor model of the screens).
pub const TOP_LEFT: TextStyle = TextStyleBuilder::new()
    .alignment(Alignment::Left)
    .baseline(Baseline::Top)
    .build();

/// Text anchored at its top-right corner. Used for right-justified units.
pub const TOP_RIGHT: TextStyle = TextStyleBuilder::new()
    .alignment(Alignment::Right)
    .baseline(Baseline::Top)
    .build();

/// Text centered horizontally, anchored at its top edge. Used for two-line labels.
pub const TOP_CENTER: TextStyle = TextStyleBuilder::new()
    .alignment(Alignment::Center)
    .baseline(Baseline::Top)
    .build();

/// Text anchored at its left edge, centered vertically. Used for file rows.
pub const LEFT_MIDDLE: TextStyle = TextStyleBuilder::new()
    .alignment(Alignment::Left)
    .baseline(Baseline::Middle)
    .build();

/// Text centered on a point both horizontally and vertically. Used for button labels.
pub const CENTERED: TextStyle = TextStyleBuilder::new()
    .alignment(Alignment::Center)
    .baseline(Baseline::Middle)
    .build();

// =============================================================================
// Text Sizes
// =============================================================================

/// Logical text size used by the screen layouts.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TextSize {
    /// Captions and small values.
    Caption,
    /// Button labels, titles, most readouts.
    Body,
    /// Axis letters, status label, selected-axis readout.
    Large,
    /// Spindle RPM readout.
    Huge,
}

impl TextSize {
    /// Font for this size.
    #[inline]
    pub const fn font(self) -> &'static MonoFont<'static> {
        match self {
            Self::Caption => &FONT_6X10,
            Self::Body => &FONT_10X20,
            Self::Large => &PROFONT_18_POINT,
            Self::Huge => &PROFONT_24_POINT,
        }
    }

    /// Line height in pixels.
    #[inline]
    pub const fn line_height(self) -> u32 { self.font().character_size.height }

    /// Width of `text` in pixels.
    #[inline]
    pub fn text_width(
        self,
        text: &str,
    ) -> u32 {
        let font = self.font();
        let chars = text.chars().count() as u32;
        if chars == 0 {
            return 0;
        }
        chars * font.character_size.width + (chars - 1) * font.character_spacing
    }
}

/// Text style for `size` in `color`.
#[inline]
pub const fn text_style(
    size: TextSize,
    color: Rgb565,
) -> MonoTextStyle<'static, Rgb565> {
    MonoTextStyle::new(size.font(), color)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_width_is_monospace() {
        assert_eq!(TextSize::Caption.text_width(""), 0);
        assert_eq!(TextSize::Caption.text_width("mm"), 12);
        assert_eq!(TextSize::Body.text_width("Main Menu"), 90);
    }

    #[test]
    fn test_sizes_grow() {
        assert!(TextSize::Caption.line_height() < TextSize::Body.line_height());
        assert!(TextSize::Body.line_height() < TextSize::Large.line_height());
        assert!(TextSize::Large.line_height() < TextSize::Huge.line_height());
    }
}
