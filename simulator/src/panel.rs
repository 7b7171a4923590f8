//! Simulated touch panel.
//!
//! Wraps a [`SimulatorDisplay`] and turns mouse input into touch points. The
//! normal mounting ([`Rotation::Deg180`]) draws straight through; the inverted
//! mounting flips both drawing and touch by 180 degrees, like the real panel
//! driver does.

use core::convert::Infallible;

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics_simulator::SimulatorDisplay;
use pendant_common::Panel;
use pendant_common::colors::BACKGROUND;
use pendant_common::config::{SCREEN_HEIGHT, SCREEN_WIDTH};
use pendant_common::state::Rotation;

pub struct SimPanel {
    display: SimulatorDisplay<Rgb565>,
    rotation: Rotation,
    /// Mouse position while the left button is held.
    pointer: Option<Point>,
}

impl SimPanel {
    pub fn new() -> Self {
        Self {
            display: SimulatorDisplay::new(Size::new(SCREEN_WIDTH, SCREEN_HEIGHT)),
            rotation: Rotation::default(),
            pointer: None,
        }
    }

    /// Framebuffer for `Window::update`.
    pub const fn display(&self) -> &SimulatorDisplay<Rgb565> { &self.display }

    pub const fn press(
        &mut self,
        point: Point,
    ) {
        self.pointer = Some(point);
    }

    /// Follow the mouse while the button is held.
    pub const fn drag(
        &mut self,
        point: Point,
    ) {
        if self.pointer.is_some() {
            self.pointer = Some(point);
        }
    }

    pub const fn release(&mut self) { self.pointer = None; }
}

/// Map between the operator frame and the framebuffer. A half turn is its own
/// inverse, so the same mapping serves drawing and touch.
const fn to_frame(
    rotation: Rotation,
    p: Point,
) -> Point {
    match rotation {
        Rotation::Deg180 => p,
        Rotation::Deg0 => Point::new(SCREEN_WIDTH as i32 - 1 - p.x, SCREEN_HEIGHT as i32 - 1 - p.y),
    }
}

impl OriginDimensions for SimPanel {
    fn size(&self) -> Size { Size::new(SCREEN_WIDTH, SCREEN_HEIGHT) }
}

impl DrawTarget for SimPanel {
    type Color = Rgb565;
    type Error = Infallible;

    fn draw_iter<I>(
        &mut self,
        pixels: I,
    ) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        let rotation = self.rotation;
        let mapped = pixels.into_iter().map(|Pixel(p, c)| Pixel(to_frame(rotation, p), c));
        self.display.draw_iter(mapped)
    }

    fn clear(
        &mut self,
        color: Self::Color,
    ) -> Result<(), Self::Error> {
        self.display.clear(color)
    }
}

impl Panel for SimPanel {
    fn touch(&mut self) -> Option<Point> { self.pointer.map(|p| to_frame(self.rotation, p)) }

    fn set_rotation(
        &mut self,
        rotation: Rotation,
    ) {
        self.rotation = rotation;
        self.display.clear(BACKGROUND).ok();
    }
}
