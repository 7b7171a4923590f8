//! Low-level drawing primitives shared by screens and regions.
//!
//! All coordinates are absolute screen coordinates. Region content draws
//! through the same functions whether the target is a
//! [`Sprite`](crate::render::Sprite) or the panel itself.

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{CornerRadii, PrimitiveStyle, Rectangle, RoundedRectangle};
use embedded_graphics::text::{Text, TextStyle};

use crate::colors::{DARKER_BG, GRAY_TEXT, TITLE};
use crate::config::{BUTTON_RADIUS, PANEL_RADIUS, SCREEN_WIDTH, TITLE_BAR_HEIGHT};
use crate::styles::{CENTERED, LEFT_MIDDLE, TOP_CENTER, TOP_LEFT, TextSize, text_style};

const TITLE_RECT: Rectangle = Rectangle::new(Point::zero(), Size::new(SCREEN_WIDTH, TITLE_BAR_HEIGHT));
const TITLE_POS: Point = Point::new(SCREEN_WIDTH as i32 / 2, 8);
const TITLE_FILL: PrimitiveStyle<Rgb565> = PrimitiveStyle::with_fill(DARKER_BG);
const PANEL_FILL: PrimitiveStyle<Rgb565> = PrimitiveStyle::with_fill(DARKER_BG);

/// Gap between the two lines of a two-line label.
const LINE_GAP: i32 = 4;

/// Left padding of left-aligned button text.
const TEXT_PAD: i32 = 5;

/// Text inside a button.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ButtonText<'a> {
    /// One centered line.
    Single(&'a str, TextSize),
    /// Two centered body lines.
    Double(&'a str, &'a str),
    /// One left-aligned body line, clipped to the button.
    Left(&'a str),
}

/// Fill a rounded rectangle.
pub fn fill_round_rect<D>(
    display: &mut D,
    rect: Rectangle,
    radius: u32,
    color: Rgb565,
) where
    D: DrawTarget<Color = Rgb565>,
{
    RoundedRectangle::new(rect, CornerRadii::new(Size::new(radius, radius)))
        .into_styled(PrimitiveStyle::with_fill(color))
        .draw(display)
        .ok();
}

/// Draw the title bar with centered title text.
pub fn draw_title<D>(
    display: &mut D,
    title: &str,
) where
    D: DrawTarget<Color = Rgb565>,
{
    TITLE_RECT.into_styled(TITLE_FILL).draw(display).ok();
    Text::with_text_style(title, TITLE_POS, text_style(TextSize::Body, TITLE), TOP_CENTER)
        .draw(display)
        .ok();
}

/// Draw a dark readout panel.
pub fn draw_panel<D>(
    display: &mut D,
    rect: Rectangle,
) where
    D: DrawTarget<Color = Rgb565>,
{
    RoundedRectangle::new(rect, CornerRadii::new(Size::new(PANEL_RADIUS, PANEL_RADIUS)))
        .into_styled(PANEL_FILL)
        .draw(display)
        .ok();
}

/// Draw text anchored according to `style`.
pub fn draw_text<D>(
    display: &mut D,
    pos: Point,
    text: &str,
    size: TextSize,
    color: Rgb565,
    style: TextStyle,
) where
    D: DrawTarget<Color = Rgb565>,
{
    Text::with_text_style(text, pos, text_style(size, color), style).draw(display).ok();
}

/// Draw a small gray caption with its top-left corner at `pos`.
pub fn draw_caption<D>(
    display: &mut D,
    pos: Point,
    text: &str,
) where
    D: DrawTarget<Color = Rgb565>,
{
    draw_text(display, pos, text, TextSize::Caption, GRAY_TEXT, TOP_LEFT);
}

/// Draw a rounded button with its label.
pub fn draw_button<D>(
    display: &mut D,
    rect: Rectangle,
    text: ButtonText<'_>,
    bg: Rgb565,
    fg: Rgb565,
) where
    D: DrawTarget<Color = Rgb565>,
{
    fill_round_rect(display, rect, BUTTON_RADIUS, bg);

    match text {
        ButtonText::Single(label, size) => {
            draw_text(display, rect.center(), label, size, fg, CENTERED);
        }
        ButtonText::Double(first, second) => {
            let line_h = TextSize::Body.line_height() as i32;
            let total = line_h * 2 + LINE_GAP;
            let top = rect.top_left.y + (rect.size.height as i32 - total) / 2;
            let x = rect.center().x;
            draw_text(display, Point::new(x, top), first, TextSize::Body, fg, TOP_CENTER);
            draw_text(display, Point::new(x, top + line_h + LINE_GAP), second, TextSize::Body, fg, TOP_CENTER);
        }
        ButtonText::Left(label) => {
            let pos = Point::new(rect.top_left.x + TEXT_PAD, rect.center().y);
            let mut clipped = display.clipped(&rect);
            draw_text(&mut clipped, pos, label, TextSize::Body, fg, LEFT_MIDDLE);
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
