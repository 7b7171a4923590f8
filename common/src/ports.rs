//! Capabilities the pendant needs from its host.
//!
//! The core never talks to hardware directly. A host (the desktop simulator,
//! or board firmware) provides:
//!
//! | Trait | Provides |
//! |-------|----------|
//! | [`Panel`] | Pixels (`DrawTarget<Color = Rgb565>`), touch samples, rotation |
//! | [`CommandSink`] | Fire-and-forget command lines to the controller |
//! | [`Preferences`] | One namespaced integer store |
//! | [`HeapMonitor`] | Free heap, for the render cache allocation policy |
//!
//! Text measurement and off-screen buffers are not part of [`Panel`]: fonts
//! are monospace ([`TextSize`](crate::styles::TextSize)) and region buffers are
//! [`Sprite`](crate::render::Sprite)s owned by the core.

use embedded_graphics::geometry::{OriginDimensions, Point};
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::DrawTarget;

use crate::state::Rotation;

/// Display with touch input.
///
/// Coordinates are in the rotated, operator-facing frame: `(0, 0)` is the
/// top-left corner the operator sees, for both drawing and touch.
pub trait Panel: DrawTarget<Color = Rgb565> + OriginDimensions {
    /// Current touch point, if the panel is being touched. Must not block.
    fn touch(&mut self) -> Option<Point>;

    /// Apply a display rotation immediately.
    fn set_rotation(
        &mut self,
        rotation: Rotation,
    );
}

/// Receives single-line commands for the machine controller.
pub trait CommandSink {
    /// Send one line (without terminator). No acknowledgement is expected.
    fn send(
        &mut self,
        line: &str,
    );
}

/// Persistent integer preferences under a namespace.
pub trait Preferences {
    /// Stored value, or `None` if the key was never written.
    fn load_i32(
        &mut self,
        namespace: &str,
        key: &str,
    ) -> Option<i32>;

    /// Store a value.
    fn store_i32(
        &mut self,
        namespace: &str,
        key: &str,
        value: i32,
    );
}

/// Reports free heap in bytes.
pub trait HeapMonitor {
    fn free_heap(&self) -> usize;
}
