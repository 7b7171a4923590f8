//! Host doubles for the capability traits, used by unit tests.

use std::alloc::{GlobalAlloc, Layout, System};
use std::cell::Cell;
use std::collections::{HashMap, VecDeque};

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;

use crate::colors::BACKGROUND;
use crate::config::{SCREEN_HEIGHT, SCREEN_WIDTH};
use crate::ports::{CommandSink, HeapMonitor, Panel, Preferences};
use crate::state::Rotation;

/// Full-size framebuffer that records what was drawn.
pub struct RecordingPanel {
    pixels: Vec<Rgb565>,
    touches: VecDeque<Point>,
    /// Every rotation applied, in order.
    pub rotations: Vec<Rotation>,
    /// Number of full clears.
    pub clears: usize,
    /// Pixels written since the last [`reset_tracking`](Self::reset_tracking).
    pub pixels_drawn: usize,
    drawn: Option<(Point, Point)>,
}

impl RecordingPanel {
    pub fn new() -> Self {
        Self {
            pixels: vec![BACKGROUND; (SCREEN_WIDTH * SCREEN_HEIGHT) as usize],
            touches: VecDeque::new(),
            rotations: Vec::new(),
            clears: 0,
            pixels_drawn: 0,
            drawn: None,
        }
    }

    /// Queue a touch sample returned by the next [`Panel::touch`] call.
    pub fn queue_touch(
        &mut self,
        x: i32,
        y: i32,
    ) {
        self.touches.push_back(Point::new(x, y));
    }

    pub fn pixel(
        &self,
        p: Point,
    ) -> Option<Rgb565> {
        Self::index(p).map(|i| self.pixels[i])
    }

    /// Bounding box of pixels written since the last reset.
    pub fn drawn_area(&self) -> Option<Rectangle> {
        self.drawn.map(|(tl, br)| Rectangle::with_corners(tl, br))
    }

    /// Forget drawn-pixel tracking and the clear count.
    pub fn reset_tracking(&mut self) {
        self.pixels_drawn = 0;
        self.clears = 0;
        self.drawn = None;
    }

    fn index(p: Point) -> Option<usize> {
        if p.x < 0 || p.y < 0 || p.x as u32 >= SCREEN_WIDTH || p.y as u32 >= SCREEN_HEIGHT {
            return None;
        }
        Some(p.y as usize * SCREEN_WIDTH as usize + p.x as usize)
    }

    fn track(
        &mut self,
        p: Point,
    ) {
        self.pixels_drawn += 1;
        self.drawn = Some(match self.drawn {
            None => (p, p),
            Some((tl, br)) => (tl.component_min(p), br.component_max(p)),
        });
    }
}

impl OriginDimensions for RecordingPanel {
    fn size(&self) -> Size { Size::new(SCREEN_WIDTH, SCREEN_HEIGHT) }
}

impl DrawTarget for RecordingPanel {
    type Color = Rgb565;
    type Error = core::convert::Infallible;

    fn draw_iter<I>(
        &mut self,
        pixels: I,
    ) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(p, color) in pixels {
            if let Some(i) = Self::index(p) {
                self.pixels[i] = color;
                self.track(p);
            }
        }
        Ok(())
    }

    fn clear(
        &mut self,
        color: Self::Color,
    ) -> Result<(), Self::Error> {
        self.pixels.fill(color);
        self.clears += 1;
        self.track(Point::zero());
        self.track(Point::new(SCREEN_WIDTH as i32 - 1, SCREEN_HEIGHT as i32 - 1));
        Ok(())
    }
}

impl Panel for RecordingPanel {
    fn touch(&mut self) -> Option<Point> { self.touches.pop_front() }

    fn set_rotation(
        &mut self,
        rotation: Rotation,
    ) {
        self.rotations.push(rotation);
    }
}

/// Collects every command line.
#[derive(Default)]
pub struct RecordingSink {
    pub lines: Vec<String>,
}

impl RecordingSink {
    pub fn take(&mut self) -> Vec<String> { std::mem::take(&mut self.lines) }
}

impl CommandSink for RecordingSink {
    fn send(
        &mut self,
        line: &str,
    ) {
        self.lines.push(line.to_string());
    }
}

/// In-memory preference store.
#[derive(Default, Clone)]
pub struct MemoryPreferences {
    pub values: HashMap<(String, String), i32>,
}

impl Preferences for MemoryPreferences {
    fn load_i32(
        &mut self,
        namespace: &str,
        key: &str,
    ) -> Option<i32> {
        self.values.get(&(namespace.to_string(), key.to_string())).copied()
    }

    fn store_i32(
        &mut self,
        namespace: &str,
        key: &str,
        value: i32,
    ) {
        self.values.insert((namespace.to_string(), key.to_string()), value);
    }
}

/// Fixed free-heap report.
#[derive(Clone, Copy)]
pub struct HeapBudget(pub usize);

impl HeapBudget {
    /// Plenty for any screen.
    pub const AMPLE: Self = Self(256 * 1024);
    /// Below the safety margin.
    pub const STARVED: Self = Self(8 * 1024);
}

impl HeapMonitor for HeapBudget {
    fn free_heap(&self) -> usize { self.0 }
}

// =============================================================================
// Tracked Heap
// =============================================================================

thread_local! {
    /// Bytes currently allocated by this thread (wrapping).
    static LIVE_BYTES: Cell<usize> = const { Cell::new(0) };
}

fn track(delta: isize) { LIVE_BYTES.try_with(|live| live.set(live.get().wrapping_add_signed(delta))).ok(); }

fn live_bytes() -> usize { LIVE_BYTES.try_with(Cell::get).unwrap_or(0) }

/// System allocator that counts live bytes per thread, so each test sees only
/// its own allocations.
struct TrackingAllocator;

unsafe impl GlobalAlloc for TrackingAllocator {
    unsafe fn alloc(
        &self,
        layout: Layout,
    ) -> *mut u8 {
        let ptr = unsafe { System.alloc(layout) };
        if !ptr.is_null() {
            track(layout.size() as isize);
        }
        ptr
    }

    unsafe fn dealloc(
        &self,
        ptr: *mut u8,
        layout: Layout,
    ) {
        unsafe { System.dealloc(ptr, layout) };
        track(-(layout.size() as isize));
    }
}

#[global_allocator]
static ALLOCATOR: TrackingAllocator = TrackingAllocator;

/// Heap of a fixed size that shrinks with every allocation made on this
/// thread after it was created.
pub struct TrackedHeap {
    size: usize,
    baseline: usize,
}

impl TrackedHeap {
    pub fn new(size: usize) -> Self {
        Self {
            size,
            baseline: live_bytes(),
        }
    }

    /// Bytes allocated since creation and still live.
    pub fn used(&self) -> usize { live_bytes().wrapping_sub(self.baseline) }
}

impl HeapMonitor for TrackedHeap {
    fn free_heap(&self) -> usize { self.size.saturating_sub(self.used()) }
}
