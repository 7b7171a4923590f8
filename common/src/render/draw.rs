//! Drawing of the static parts of a screen: chrome and buttons.

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::PrimitiveStyle;

use crate::colors::{BACKGROUND, WHITE};
use crate::layout::{ButtonGroup, Chrome, HitRegion, Label, group_members};
use crate::screen::Screen;
use crate::state::PendantState;
use crate::styles::TOP_LEFT;
use crate::widgets::{draw_button, draw_caption, draw_panel, draw_text};

/// Draw one chrome element.
pub fn draw_chrome<D>(
    display: &mut D,
    chrome: &Chrome,
    state: &PendantState,
) where
    D: DrawTarget<Color = Rgb565>,
{
    match *chrome {
        Chrome::Caption(pos, text) => draw_caption(display, pos, text),
        Chrome::Panel(rect) => draw_panel(display, rect),
        Chrome::Text {
            pos,
            size,
            color,
            source,
        } => draw_text(display, pos, source.resolve(state), size, color, TOP_LEFT),
    }
}

/// Draw the button of a hit region.
///
/// `pressed` inverts the colors: white background, label in the button color.
/// Empty file rows are cleared; hidden regions draw nothing.
pub fn draw_hit<D>(
    display: &mut D,
    hit: &HitRegion,
    state: &PendantState,
    pressed: bool,
) where
    D: DrawTarget<Color = Rgb565>,
{
    let (bg, fg) = hit.style.colors(hit.action.is_selected(state));
    let (bg, fg) = if pressed { (WHITE, bg) } else { (bg, fg) };

    match hit.text(state) {
        Some(text) => draw_button(display, hit.rect, text, bg, fg),
        None if matches!(hit.label, Label::FileRow(_)) => {
            hit.rect.into_styled(PrimitiveStyle::with_fill(BACKGROUND)).draw(display).ok();
        }
        None => {}
    }
}

/// Redraw every button of `group` on `screen`.
pub fn draw_group<D>(
    display: &mut D,
    screen: Screen,
    group: ButtonGroup,
    state: &PendantState,
) where
    D: DrawTarget<Color = Rgb565>,
{
    for (_, hit) in group_members(screen, group) {
        draw_hit(display, hit, state, false);
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
