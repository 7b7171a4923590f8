//! Off-screen RGB565 buffer for one cached region.
//!
//! A [`Sprite`] covers a fixed rectangle of the screen and is addressed in
//! absolute screen coordinates: region content draws into it exactly as it
//! would draw onto the panel, and pixels outside the rectangle are dropped.
//! [`Sprite::push_to`] composites the whole buffer in one `fill_contiguous`
//! call, which panel drivers turn into a single windowed transfer.

use alloc::vec::Vec;
use core::convert::Infallible;

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;

/// Sprite allocation failure.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SpriteError {
    /// The allocator could not provide the buffer.
    OutOfMemory,
    /// The requested area has no pixels.
    ZeroSized,
}

/// Off-screen buffer for one screen rectangle.
pub struct Sprite {
    area: Rectangle,
    pixels: Vec<Rgb565>,
}

impl Sprite {
    /// Allocate a buffer for `area`, filled with black.
    ///
    /// Uses fallible reservation so a fragmented heap reports
    /// [`SpriteError::OutOfMemory`] instead of aborting.
    pub fn new(area: Rectangle) -> Result<Self, SpriteError> {
        let len = area.size.width as usize * area.size.height as usize;
        if len == 0 {
            return Err(SpriteError::ZeroSized);
        }
        let mut pixels = Vec::new();
        pixels.try_reserve_exact(len).map_err(|_| SpriteError::OutOfMemory)?;
        pixels.resize(len, Rgb565::BLACK);
        Ok(Self { area, pixels })
    }

    /// Buffer size in bytes.
    #[inline]
    pub fn bytes(&self) -> usize { self.pixels.len() * 2 }

    /// Pixel at an absolute screen point, if inside the sprite.
    #[cfg(test)]
    pub fn pixel(
        &self,
        p: Point,
    ) -> Option<Rgb565> {
        self.index(p).map(|i| self.pixels[i])
    }

    /// Fill the whole buffer with one color.
    pub fn fill(
        &mut self,
        color: Rgb565,
    ) {
        self.pixels.fill(color);
    }

    /// Composite the buffer onto `target` at its screen rectangle.
    pub fn push_to<D>(
        &self,
        target: &mut D,
    ) where
        D: DrawTarget<Color = Rgb565>,
    {
        target.fill_contiguous(&self.area, self.pixels.iter().copied()).ok();
    }

    #[inline]
    fn index(
        &self,
        p: Point,
    ) -> Option<usize> {
        let rel = p - self.area.top_left;
        let (w, h) = (self.area.size.width, self.area.size.height);
        if rel.x < 0 || rel.y < 0 || rel.x as u32 >= w || rel.y as u32 >= h {
            return None;
        }
        Some(rel.y as usize * w as usize + rel.x as usize)
    }
}

impl Dimensions for Sprite {
    fn bounding_box(&self) -> Rectangle { self.area }
}

impl DrawTarget for Sprite {
    type Color = Rgb565;
    type Error = Infallible;

    fn draw_iter<I>(
        &mut self,
        pixels: I,
    ) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            if let Some(i) = self.index(point) {
                self.pixels[i] = color;
            }
        }
        Ok(())
    }

    fn clear(
        &mut self,
        color: Self::Color,
    ) -> Result<(), Self::Error> {
        self.fill(color);
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
