//! The pendant main loop.
//!
//! [`Pendant`] owns every piece of UI state and the host capabilities. The
//! host calls [`Pendant::tick`] from a single loop with fresh pin levels and
//! the current time; each call runs, in order:
//!
//! 1. physical buttons (debounced, one action per press)
//! 2. the rotary encoder, on screens that use it
//! 3. periodic region refresh, every [`REGION_REFRESH_MS`]
//! 4. press-feedback reverts that are due
//! 5. one touch sample, rate limited by [`TOUCH_INTERVAL_MS`]
//!
//! Nothing blocks. Inbound machine status is applied by the host between
//! ticks through [`Pendant::machine_mut`].
//!
//! [`TOUCH_INTERVAL_MS`]: crate::config::TOUCH_INTERVAL_MS

use embedded_graphics::geometry::Point;

use crate::config::{
    JOG_TICK_INTERVAL_MS, PREFS_NAMESPACE, PREFS_ROTATION_KEY, REGION_REFRESH_MS, ROTATION_TICK_INTERVAL_MS,
};
use crate::input::{
    ButtonDebouncer, Dispatch, EncoderDecoder, EncoderPins, InputResult, InputSample, PhysicalButton, TouchGate,
};
use crate::layout::{HitRegion, RegionId, hit_test, spec};
use crate::log::EventLog;
use crate::ports::{CommandSink, HeapMonitor, Panel, Preferences};
use crate::render::{
    CacheStatus, PendingRevert, PressFeedback, RegionData, RenderCache, RenderStats, draw_group, draw_hit,
};
use crate::screen::{Screen, ScreenController};
use crate::state::{MachineState, PendantState, Rotation};
use crate::{log_info, log_warn};

const BUTTONS: [PhysicalButton; 3] = [PhysicalButton::EStop, PhysicalButton::Context, PhysicalButton::CycleStart];

/// The pendant UI: state, screens, render cache and input handling.
pub struct Pendant<P, S, R, H> {
    panel: P,
    sink: S,
    prefs: R,
    heap: H,
    state: PendantState,
    screens: ScreenController,
    cache: RenderCache,
    touch: TouchGate,
    buttons: [ButtonDebouncer; 3],
    encoder: EncoderDecoder,
    encoder_resync: bool,
    feedback: PressFeedback,
    log: EventLog,
    last_refresh: u64,
}

impl<P, S, R, H> Pendant<P, S, R, H>
where
    P: Panel,
    S: CommandSink,
    R: Preferences,
    H: HeapMonitor,
{
    /// Start on the main menu with default state.
    pub fn new(
        panel: P,
        sink: S,
        prefs: R,
        heap: H,
        now_ms: u64,
    ) -> Self {
        Self::with_state(panel, sink, prefs, heap, PendantState::default(), now_ms)
    }

    /// Start on the main menu with `state`.
    ///
    /// Loads the persisted rotation, applies it to the panel and draws the
    /// first screen.
    pub fn with_state(
        mut panel: P,
        sink: S,
        mut prefs: R,
        heap: H,
        mut state: PendantState,
        now_ms: u64,
    ) -> Self {
        let raw = prefs
            .load_i32(PREFS_NAMESPACE, PREFS_ROTATION_KEY)
            .unwrap_or(Rotation::default().raw());
        let rotation = Rotation::from_raw(raw);
        state.machine.rotation = rotation;
        panel.set_rotation(rotation);

        let mut pendant = Self {
            panel,
            sink,
            prefs,
            heap,
            state,
            screens: ScreenController::new(Screen::MainMenu),
            cache: RenderCache::new(),
            touch: TouchGate::new(),
            buttons: [ButtonDebouncer::new(); 3],
            encoder: EncoderDecoder::new(),
            encoder_resync: true,
            feedback: PressFeedback::new(),
            log: EventLog::new(),
            last_refresh: now_ms,
        };
        log_info!(pendant.log, now_ms, "Pendant ready, rotation {}", rotation.label());
        pendant.redraw(now_ms);
        pendant
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    #[inline]
    pub const fn state(&self) -> &PendantState { &self.state }

    /// Mutable UI state. Changes show up on the next region refresh.
    #[inline]
    pub const fn state_mut(&mut self) -> &mut PendantState { &mut self.state }

    /// Mutable machine state, for inbound status updates.
    #[inline]
    pub const fn machine_mut(&mut self) -> &mut MachineState { &mut self.state.machine }

    #[inline]
    pub const fn current_screen(&self) -> Screen { self.screens.current() }

    #[inline]
    pub const fn previous_screen(&self) -> Screen { self.screens.previous() }

    #[inline]
    pub const fn cache_status(&self) -> CacheStatus { self.cache.status() }

    #[inline]
    pub const fn stats(&self) -> RenderStats { self.cache.stats() }

    #[inline]
    pub const fn log(&self) -> &EventLog { &self.log }

    #[inline]
    pub const fn panel(&self) -> &P { &self.panel }

    #[inline]
    pub const fn panel_mut(&mut self) -> &mut P { &mut self.panel }

    #[inline]
    pub const fn sink(&self) -> &S { &self.sink }

    #[inline]
    pub const fn sink_mut(&mut self) -> &mut S { &mut self.sink }

    #[inline]
    pub const fn prefs(&self) -> &R { &self.prefs }

    #[inline]
    pub const fn heap_mut(&mut self) -> &mut H { &mut self.heap }

    // =========================================================================
    // Main Loop
    // =========================================================================

    /// Run one loop iteration.
    pub fn tick(
        &mut self,
        sample: InputSample,
        now_ms: u64,
    ) {
        self.poll_buttons(sample, now_ms);

        if let Some(pins) = sample.encoder {
            self.poll_encoder(pins, now_ms);
        }

        if now_ms.saturating_sub(self.last_refresh) >= REGION_REFRESH_MS {
            self.last_refresh = now_ms;
            self.refresh_regions();
        }

        while let Some(entry) = self.feedback.due(now_ms) {
            self.revert(entry);
        }

        if let Some(point) = self.panel.touch()
            && self.touch.accept(now_ms)
        {
            self.route_touch(point, now_ms);
        }
    }

    /// Switch screens programmatically. Redraws only if the screen changed.
    pub fn navigate(
        &mut self,
        screen: Screen,
        now_ms: u64,
    ) {
        if self.screens.transition_to(screen) {
            log_info!(self.log, now_ms, "Screen {}", screen.title());
            self.redraw(now_ms);
        }
    }

    /// Full redraw of the current screen.
    pub fn redraw(
        &mut self,
        now_ms: u64,
    ) {
        let screen = self.screens.current();
        let before = self.cache.status();

        self.feedback.clear();
        let status = self.cache.draw_screen(&mut self.panel, screen, &self.state, &self.heap);

        if status != before {
            match status {
                CacheStatus::Ready(_) if spec(screen).regions.is_empty() => {}
                CacheStatus::Ready(_) => {
                    log_info!(self.log, now_ms, "Cache {} B for {}", self.cache.allocated_bytes(), screen.title());
                }
                CacheStatus::Unavailable(_) => {
                    log_warn!(self.log, now_ms, "Low memory, {} uncached", screen.title());
                }
                CacheStatus::Unallocated => {}
            }
        }

        if screen.uses_encoder() {
            self.encoder_resync = true;
        }
    }

    /// Handle one touch point as if it had passed the touch gate.
    pub fn route_touch(
        &mut self,
        point: Point,
        now_ms: u64,
    ) {
        let screen = self.screens.current();
        let Some((index, hit)) = hit_test(screen, point) else {
            return;
        };
        let result = self.dispatch(now_ms).action(hit.action);
        self.apply(result, Some((index, hit)), now_ms);
    }

    fn dispatch(
        &mut self,
        now_ms: u64,
    ) -> Dispatch<'_, S> {
        Dispatch {
            state: &mut self.state,
            sink: &mut self.sink,
            log: &mut self.log,
            now_ms,
        }
    }

    /// Carry out the redraw work of an input result.
    fn apply(
        &mut self,
        result: InputResult,
        touched: Option<(usize, &'static HitRegion)>,
        now_ms: u64,
    ) {
        let before = self.screens.current();
        if let Some(screen) = result.navigate {
            self.screens.transition_to(screen);
        }

        let screen = self.screens.current();
        if screen != before {
            log_info!(self.log, now_ms, "Screen {}", screen.title());
            self.redraw(now_ms);
            return;
        }
        if result.full_redraw {
            self.redraw(now_ms);
            return;
        }

        if let Some(group) = result.group {
            draw_group(&mut self.panel, screen, group, &self.state);
        }
        if let Some(id) = result.region {
            self.update_region(id);
        }
        if result.press_feedback
            && let Some((index, hit)) = touched
        {
            draw_hit(&mut self.panel, hit, &self.state, true);
            if let Some(evicted) = self.feedback.schedule(screen, index, now_ms) {
                self.revert(evicted);
            }
        }
    }

    fn poll_buttons(
        &mut self,
        sample: InputSample,
        now_ms: u64,
    ) {
        let levels = [sample.estop, sample.context, sample.cycle_start];
        for (i, button) in BUTTONS.into_iter().enumerate() {
            if self.buttons[i].just_pressed(levels[i], now_ms) {
                let result = self.dispatch(now_ms).button(button);
                self.apply(result, None, now_ms);
            }
        }
    }

    fn poll_encoder(
        &mut self,
        pins: EncoderPins,
        now_ms: u64,
    ) {
        let screen = self.screens.current();
        if !screen.uses_encoder() {
            return;
        }
        if self.encoder_resync {
            self.encoder.resync(pins.clk);
            self.encoder_resync = false;
            return;
        }

        match screen {
            Screen::JogHoming => {
                if let Some(direction) = self.encoder.poll(pins, now_ms, JOG_TICK_INTERVAL_MS) {
                    self.dispatch(now_ms).jog(direction);
                }
            }
            Screen::SystemInfo => {
                if self.encoder.poll(pins, now_ms, ROTATION_TICK_INTERVAL_MS).is_some() {
                    self.toggle_rotation(now_ms);
                }
            }
            _ => {}
        }
    }

    /// Flip the display, persist the new rotation and redraw.
    fn toggle_rotation(
        &mut self,
        now_ms: u64,
    ) {
        let rotation = self.state.machine.rotation.toggled();
        self.state.machine.rotation = rotation;
        self.panel.set_rotation(rotation);
        self.prefs.store_i32(PREFS_NAMESPACE, PREFS_ROTATION_KEY, rotation.raw());
        log_info!(self.log, now_ms, "Rotation {}", rotation.label());
        self.redraw(now_ms);
    }

    fn update_region(
        &mut self,
        id: RegionId,
    ) {
        let data = RegionData {
            state: &self.state,
            free_heap: self.heap.free_heap(),
            stats: self.cache.stats(),
        };
        self.cache.redraw_region(&mut self.panel, id, self.screens.current(), &data);
    }

    fn refresh_regions(&mut self) {
        let free_heap = self.heap.free_heap();
        self.cache.refresh_all(&mut self.panel, self.screens.current(), &self.state, free_heap);
    }

    fn revert(
        &mut self,
        entry: PendingRevert,
    ) {
        if entry.screen != self.screens.current() {
            return;
        }
        if let Some(hit) = spec(entry.screen).hits.get(entry.hit) {
            draw_hit(&mut self.panel, hit, &self.state, false);
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::colors::{DARK_GREEN, WHITE};
    use crate::layout::Action;
    use crate::log::LogLevel;
    use crate::state::{Axis, MachineStatus};
    use crate::config::HEAP_SAFETY_MARGIN;
    use crate::testing::{HeapBudget, MemoryPreferences, RecordingPanel, RecordingSink, TrackedHeap};

    type TestPendant = Pendant<RecordingPanel, RecordingSink, MemoryPreferences, HeapBudget>;

    fn pendant() -> TestPendant { with_prefs(MemoryPreferences::default()) }

    fn with_prefs(prefs: MemoryPreferences) -> TestPendant {
        Pendant::new(RecordingPanel::new(), RecordingSink::default(), prefs, HeapBudget::AMPLE, 0)
    }

    /// Buttons released, encoder resting high.
    fn idle() -> InputSample {
        InputSample {
            encoder: Some(EncoderPins { clk: true, dt: true }),
            ..InputSample::default()
        }
    }

    fn encoder(
        clk: bool,
        dt: bool,
    ) -> InputSample {
        InputSample {
            encoder: Some(EncoderPins { clk, dt }),
            ..InputSample::default()
        }
    }

    fn hit_center(
        screen: Screen,
        action: Action,
    ) -> Point {
        let hit = spec(screen).hits.iter().find(|h| h.action == action).unwrap();
        hit.rect.center()
    }

    #[test]
    fn test_startup_applies_default_rotation() {
        let p = pendant();
        assert_eq!(p.current_screen(), Screen::MainMenu);
        assert_eq!(p.state().machine.rotation, Rotation::Deg180);
        assert_eq!(p.panel().rotations, [Rotation::Deg180]);
        assert_eq!(p.stats().full_redraws, 1);
    }

    #[test]
    fn test_touch_jog_button_opens_jog_screen() {
        let mut p = pendant();
        p.panel_mut().reset_tracking();
        p.panel_mut().queue_touch(30, 130);
        p.tick(idle(), 1000);

        assert_eq!(p.current_screen(), Screen::JogHoming);
        assert_eq!(p.previous_screen(), Screen::MainMenu);
        assert_eq!(p.panel().clears, 1);
        assert_eq!(p.stats().full_redraws, 2);
    }

    #[test]
    fn test_touch_outside_any_button_is_ignored() {
        let mut p = pendant();
        p.panel_mut().reset_tracking();
        p.panel_mut().queue_touch(2, 2);
        p.tick(idle(), 1000);
        assert_eq!(p.current_screen(), Screen::MainMenu);
        assert_eq!(p.panel().clears, 0);
    }

    #[test]
    fn test_touch_rate_limit() {
        let mut p = pendant();
        p.navigate(Screen::JogHoming, 0);
        let y = hit_center(Screen::JogHoming, Action::SelectAxis(Axis::Y));
        let z = hit_center(Screen::JogHoming, Action::SelectAxis(Axis::Z));

        p.panel_mut().queue_touch(y.x, y.y);
        p.tick(idle(), 1000);
        p.panel_mut().queue_touch(z.x, z.y);
        p.tick(idle(), 1100);
        assert_eq!(p.state().jog.selected_axis, Axis::Y);

        p.panel_mut().queue_touch(z.x, z.y);
        p.tick(idle(), 1200);
        assert_eq!(p.state().jog.selected_axis, Axis::Y);

        p.panel_mut().queue_touch(z.x, z.y);
        p.tick(idle(), 1201);
        assert_eq!(p.state().jog.selected_axis, Axis::Z);
    }

    #[test]
    fn test_held_estop_fires_once() {
        let mut p = pendant();
        let held = InputSample {
            estop: true,
            ..idle()
        };
        for t in (0..2000).step_by(5) {
            p.tick(held, t);
        }
        assert_eq!(p.sink().lines, ["!"]);
        assert_eq!(p.state().machine.status, MachineStatus::Alarm);
    }

    #[test]
    fn test_context_button_clears_alarm_then_holds() {
        let mut p = pendant();
        p.machine_mut().status = MachineStatus::Alarm;
        let pressed = InputSample {
            context: true,
            ..idle()
        };

        for t in (0..200).step_by(10) {
            p.tick(pressed, t);
        }
        for t in (200..400).step_by(10) {
            p.tick(idle(), t);
        }
        assert_eq!(p.state().machine.status, MachineStatus::Idle);
        for t in (400..600).step_by(10) {
            p.tick(pressed, t);
        }
        assert_eq!(p.state().machine.status, MachineStatus::Hold);
        assert_eq!(p.sink().lines, ["$X", "!"]);
    }

    #[test]
    fn test_encoder_jogs_on_jog_screen() {
        let mut p = pendant();
        p.panel_mut().queue_touch(30, 130);
        p.tick(idle(), 1000);
        assert_eq!(p.current_screen(), Screen::JogHoming);

        // First sample after entering the screen only resyncs.
        p.tick(encoder(false, true), 1010);
        assert!(p.sink().lines.is_empty());

        p.tick(encoder(true, true), 1020);
        p.tick(encoder(false, true), 1030);
        p.tick(encoder(true, true), 1090);
        p.tick(encoder(false, false), 1100);
        assert_eq!(p.sink().lines, ["$J=G91 X1.0 F1000", "$J=G91 X-1.0 F1000"]);
    }

    #[test]
    fn test_encoder_ignored_elsewhere() {
        let mut p = pendant();
        p.tick(encoder(true, true), 10);
        p.tick(encoder(false, true), 20);
        assert!(p.sink().lines.is_empty());
        assert_eq!(p.panel().rotations.len(), 1);
    }

    #[test]
    fn test_rotation_toggle_persists() {
        let mut p = pendant();
        p.navigate(Screen::SystemInfo, 0);
        p.tick(idle(), 10);
        p.tick(encoder(false, false), 20);

        assert_eq!(p.state().machine.rotation, Rotation::Deg0);
        assert_eq!(p.panel().rotations, [Rotation::Deg180, Rotation::Deg0]);
        assert!(p.sink().lines.is_empty());

        let restarted = with_prefs(p.prefs().clone());
        assert_eq!(restarted.state().machine.rotation, Rotation::Deg0);
        assert_eq!(restarted.state().machine.rotation.label(), p.state().machine.rotation.label());
    }

    #[test]
    fn test_rotation_toggle_rate_limit() {
        let mut p = pendant();
        p.navigate(Screen::SystemInfo, 0);
        p.tick(idle(), 10);
        p.tick(encoder(false, true), 20);
        p.tick(idle(), 30);
        // Inside the rotation interval.
        p.tick(encoder(false, true), 40);
        p.tick(idle(), 50);
        p.tick(encoder(false, true), 60);
        assert_eq!(p.panel().rotations.len(), 2);
    }

    #[test]
    fn test_press_feedback_reverts_on_schedule() {
        let mut p = pendant();
        p.navigate(Screen::SpindleControl, 0);
        let start = spec(Screen::SpindleControl)
            .hits
            .iter()
            .find(|h| h.action == Action::SpindleStart)
            .unwrap();
        let edge = start.rect.top_left + Point::new(3, 20);
        let center = start.rect.center();

        p.panel_mut().queue_touch(center.x, center.y);
        p.tick(idle(), 1000);
        assert_eq!(p.sink().lines, ["M3 S12000"]);
        assert_eq!(p.panel().pixel(edge), Some(WHITE));

        p.tick(idle(), 1100);
        assert_eq!(p.panel().pixel(edge), Some(WHITE));
        p.tick(idle(), 1150);
        assert_eq!(p.panel().pixel(edge), Some(DARK_GREEN));
    }

    #[test]
    fn test_feedback_for_left_screen_is_dropped() {
        let mut p = pendant();
        p.navigate(Screen::Macros, 0);
        let first = hit_center(Screen::Macros, Action::RunMacro(0));
        p.panel_mut().queue_touch(first.x, first.y);
        p.tick(idle(), 1000);
        assert_eq!(p.feedback.len(), 1);

        p.navigate(Screen::MainMenu, 1010);
        assert!(p.feedback.is_empty());
        p.tick(idle(), 1200);
        assert_eq!(p.current_screen(), Screen::MainMenu);
    }

    #[test]
    fn test_periodic_refresh_pushes_changed_region() {
        let mut p = pendant();
        p.navigate(Screen::FeedsSpeeds, 0);
        let pushes = p.stats().region_pushes;

        p.tick(idle(), 100);
        assert_eq!(p.stats().region_pushes, pushes);

        p.machine_mut().feed_rate = 2400;
        p.tick(idle(), 150);
        assert_eq!(p.stats().region_pushes, pushes);
        p.tick(idle(), 200);
        assert_eq!(p.stats().region_pushes, pushes + 1);
    }

    #[test]
    fn test_low_memory_draws_directly() {
        let mut p = Pendant::new(
            RecordingPanel::new(),
            RecordingSink::default(),
            MemoryPreferences::default(),
            HeapBudget::STARVED,
            0,
        );
        let before = p.stats().direct_draws;
        p.navigate(Screen::Status, 0);
        assert_eq!(p.cache_status(), CacheStatus::Unavailable(Screen::Status));
        assert_eq!(p.stats().direct_draws - before, 4);
        assert!(p.log().iter().any(|e| e.level == LogLevel::Warn));

        // Recovers once memory is back.
        p.heap_mut().0 = HeapBudget::AMPLE.0;
        p.redraw(10);
        assert_eq!(p.cache_status(), CacheStatus::Ready(Screen::Status));
    }

    #[test]
    fn test_navigation_reuses_memory_of_previous_screen() {
        let panel = RecordingPanel::new();
        let status_bytes = spec(Screen::Status).region_bytes();
        let heap = TrackedHeap::new(HEAP_SAFETY_MARGIN + status_bytes + 1024);
        let mut p = Pendant::new(panel, RecordingSink::default(), MemoryPreferences::default(), heap, 0);
        assert_eq!(p.cache_status(), CacheStatus::Ready(Screen::MainMenu));

        p.navigate(Screen::Status, 10);
        assert_eq!(p.cache_status(), CacheStatus::Ready(Screen::Status));
        assert_eq!(p.stats().degradations, 0);
    }

    #[test]
    fn test_selection_touch_redraws_group_not_screen() {
        let mut p = pendant();
        p.navigate(Screen::FeedsSpeeds, 0);
        p.panel_mut().reset_tracking();

        let target = hit_center(Screen::FeedsSpeeds, Action::SelectFeedOverride(4));
        p.panel_mut().queue_touch(target.x, target.y);
        p.tick(idle(), 50);

        assert_eq!(p.panel().clears, 0);
        assert_eq!(p.state().machine.feed_override, 150);
        assert!(p.panel().pixels_drawn > 0);
    }
}
