//! Screen drawing and the region render cache.
//!
//! # Update Strategy
//!
//! | Element | Update Frequency | Strategy |
//! |---------|-----------------|----------|
//! | Title, chrome, buttons | On screen change | Full redraw ([`RenderCache::draw_screen`]) |
//! | Selection groups | On selection change | Group redraw ([`draw_group`]) |
//! | Cached regions | Every refresh tick | Sprite push, skipped when unchanged |
//!
//! # Region Cache
//!
//! Each screen has up to [`MAX_REGIONS`] frequently changing regions. On a
//! screen change the cache releases every sprite and allocates one per region
//! of the new screen. When free heap is below
//! [`HEAP_SAFETY_MARGIN`] plus the bytes needed, or any allocation fails, the
//! cache is [`CacheStatus::Unavailable`] for that screen and regions are drawn
//! straight onto the panel instead (correct output, visible flicker).
//!
//! A sprite is only pushed while the cache is prepared for the screen that is
//! actually showing; region updates aimed at any other screen are dropped.

mod draw;
mod feedback;
mod regions;
mod sprite;

pub use draw::{draw_chrome, draw_group, draw_hit};
pub use feedback::{FEEDBACK_QUEUE, PendingRevert, PressFeedback};
pub use regions::{RegionData, draw_region, fingerprint};
pub use sprite::{Sprite, SpriteError};

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::PrimitiveStyle;

use crate::colors::BACKGROUND;
use crate::config::{HEAP_SAFETY_MARGIN, MAX_REGIONS};
use crate::layout::{RegionId, spec};
use crate::ports::HeapMonitor;
use crate::screen::Screen;
use crate::state::PendantState;
use crate::widgets::draw_title;

/// Allocation state of the cache.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CacheStatus {
    /// Nothing prepared yet.
    #[default]
    Unallocated,
    /// Sprites allocated for this screen.
    Ready(Screen),
    /// Not enough memory; regions of this screen draw directly.
    Unavailable(Screen),
}

/// Rendering counters, shown on the System Info screen.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RenderStats {
    pub full_redraws: u32,
    /// Sprites composited onto the panel.
    pub region_pushes: u32,
    /// Regions drawn without a sprite.
    pub direct_draws: u32,
    /// Periodic refreshes skipped because nothing visible changed.
    pub skipped: u32,
    /// Successful sprite set allocations.
    pub allocations: u32,
    /// Screens that fell back to direct drawing.
    pub degradations: u32,
}

/// Result of drawing one region.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RegionDraw {
    /// Drawn into its sprite and pushed.
    Pushed,
    /// Drawn directly onto the panel.
    Direct,
    /// Unchanged since the last draw.
    Skipped,
    /// Not part of the showing screen, or the cache belongs to another screen.
    Stale,
}

/// Pool of region sprites for the current screen.
pub struct RenderCache {
    /// Sprite per region slot, in the order of the screen's region list.
    slots: [Option<Sprite>; MAX_REGIONS],
    /// Fingerprint of what each slot last displayed.
    fingerprints: [Option<u32>; MAX_REGIONS],
    status: CacheStatus,
    stats: RenderStats,
}

impl RenderCache {
    pub const fn new() -> Self {
        Self {
            slots: [const { None }; MAX_REGIONS],
            fingerprints: [None; MAX_REGIONS],
            status: CacheStatus::Unallocated,
            stats: RenderStats {
                full_redraws: 0,
                region_pushes: 0,
                direct_draws: 0,
                skipped: 0,
                allocations: 0,
                degradations: 0,
            },
        }
    }

    #[inline]
    pub const fn status(&self) -> CacheStatus { self.status }

    #[inline]
    pub const fn stats(&self) -> RenderStats { self.stats }

    /// Bytes held by allocated sprites.
    pub fn allocated_bytes(&self) -> usize { self.slots.iter().flatten().map(Sprite::bytes).sum() }

    /// Allocate sprites for `screen`.
    ///
    /// No-op when already [`CacheStatus::Ready`] for `screen`. Otherwise every
    /// held sprite is released first, so at most one screen's set exists, and
    /// free heap is read only after that release.
    pub fn prepare_for<H>(
        &mut self,
        screen: Screen,
        heap: &H,
    ) -> CacheStatus
    where
        H: HeapMonitor + ?Sized,
    {
        if self.status == CacheStatus::Ready(screen) {
            return self.status;
        }
        self.release();

        let layout = spec(screen);
        if layout.regions.is_empty() {
            self.status = CacheStatus::Ready(screen);
            return self.status;
        }

        if heap.free_heap() < HEAP_SAFETY_MARGIN + layout.region_bytes() {
            return self.degrade(screen);
        }

        for (slot, id) in layout.regions.iter().enumerate() {
            match Sprite::new(id.spec().area) {
                Ok(sprite) => self.slots[slot] = Some(sprite),
                Err(_) => {
                    self.release();
                    return self.degrade(screen);
                }
            }
        }

        self.stats.allocations += 1;
        self.status = CacheStatus::Ready(screen);
        self.status
    }

    /// Drop every sprite.
    pub fn release(&mut self) {
        self.slots = [const { None }; MAX_REGIONS];
        self.fingerprints = [None; MAX_REGIONS];
        self.status = CacheStatus::Unallocated;
    }

    fn degrade(
        &mut self,
        screen: Screen,
    ) -> CacheStatus {
        self.stats.degradations += 1;
        self.status = CacheStatus::Unavailable(screen);
        self.status
    }

    /// Redraw region `id` through its sprite.
    ///
    /// Returns `false` without drawing unless the cache is ready for `active`
    /// and `id` is one of its regions.
    pub fn update_region<D>(
        &mut self,
        display: &mut D,
        id: RegionId,
        active: Screen,
        data: &RegionData<'_>,
    ) -> bool
    where
        D: DrawTarget<Color = Rgb565>,
    {
        if self.status != CacheStatus::Ready(active) {
            return false;
        }
        let Some(slot) = slot_of(active, id) else {
            return false;
        };
        let Some(sprite) = self.slots[slot].as_mut() else {
            return false;
        };

        sprite.fill(id.spec().background);
        draw_region(sprite, id, data);
        sprite.push_to(display);

        self.fingerprints[slot] = Some(fingerprint(id, data));
        self.stats.region_pushes += 1;
        true
    }

    /// Redraw region `id`, through its sprite when available, else directly.
    pub fn redraw_region<D>(
        &mut self,
        display: &mut D,
        id: RegionId,
        active: Screen,
        data: &RegionData<'_>,
    ) -> RegionDraw
    where
        D: DrawTarget<Color = Rgb565>,
    {
        match self.status {
            CacheStatus::Ready(screen) if screen == active => {
                if self.update_region(display, id, active, data) {
                    RegionDraw::Pushed
                } else {
                    RegionDraw::Stale
                }
            }
            CacheStatus::Unavailable(screen) if screen == active => {
                let Some(slot) = slot_of(active, id) else {
                    return RegionDraw::Stale;
                };
                let region = id.spec();
                region
                    .area
                    .into_styled(PrimitiveStyle::with_fill(region.background))
                    .draw(display)
                    .ok();
                draw_region(&mut display.clipped(&region.area), id, data);

                self.fingerprints[slot] = Some(fingerprint(id, data));
                self.stats.direct_draws += 1;
                RegionDraw::Direct
            }
            _ => RegionDraw::Stale,
        }
    }

    /// Periodic refresh: redraw region `id` only if its content changed.
    pub fn refresh<D>(
        &mut self,
        display: &mut D,
        id: RegionId,
        active: Screen,
        data: &RegionData<'_>,
    ) -> RegionDraw
    where
        D: DrawTarget<Color = Rgb565>,
    {
        let Some(slot) = slot_of(active, id) else {
            return RegionDraw::Stale;
        };
        if self.fingerprints[slot] == Some(fingerprint(id, data)) {
            self.stats.skipped += 1;
            return RegionDraw::Skipped;
        }
        self.redraw_region(display, id, active, data)
    }

    /// Refresh every region of `active`. Returns how many were redrawn.
    pub fn refresh_all<D>(
        &mut self,
        display: &mut D,
        active: Screen,
        state: &PendantState,
        free_heap: usize,
    ) -> usize
    where
        D: DrawTarget<Color = Rgb565>,
    {
        let mut redrawn = 0;
        for id in spec(active).regions {
            let data = RegionData {
                state,
                free_heap,
                stats: self.stats,
            };
            if matches!(self.refresh(display, *id, active, &data), RegionDraw::Pushed | RegionDraw::Direct) {
                redrawn += 1;
            }
        }
        redrawn
    }

    /// Full redraw of `screen`: clear, title, chrome, buttons, then every region.
    pub fn draw_screen<D, H>(
        &mut self,
        display: &mut D,
        screen: Screen,
        state: &PendantState,
        heap: &H,
    ) -> CacheStatus
    where
        D: DrawTarget<Color = Rgb565>,
        H: HeapMonitor + ?Sized,
    {
        let layout = spec(screen);

        display.clear(BACKGROUND).ok();
        draw_title(display, screen.title());
        for chrome in layout.chrome {
            draw_chrome(display, chrome, state);
        }
        for hit in layout.hits {
            draw_hit(display, hit, state, false);
        }

        let status = self.prepare_for(screen, heap);
        self.stats.full_redraws += 1;
        let free_heap = heap.free_heap();

        for id in layout.regions {
            let data = RegionData {
                state,
                free_heap,
                stats: self.stats,
            };
            self.redraw_region(display, *id, screen, &data);
        }
        status
    }
}

impl Default for RenderCache {
    fn default() -> Self { Self::new() }
}

/// Slot of region `id` on `screen`.
fn slot_of(
    screen: Screen,
    id: RegionId,
) -> Option<usize> {
    spec(screen).regions.iter().position(|r| *r == id)
}

// =============================================================================
// Unit Tests
// =============================================================================
