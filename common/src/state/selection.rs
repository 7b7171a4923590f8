//! Per-screen selection state.
//!
//! Each struct stores table indices, never raw values, so a selection can
//! only name an entry of its fixed table. Setters clamp out-of-range indices
//! to the last entry.

use crate::config::{
    COORD_SYSTEMS,
    DEFAULT_JOG_INCREMENT,
    DEFAULT_OVERRIDE,
    DEFAULT_SPINDLE_PRESET,
    JOG_INCREMENTS,
    OVERRIDE_PERCENTAGES,
    PROBE_FEED_PRESETS,
    PROBE_TRAVEL_PRESETS,
    SPINDLE_PRESETS,
    TOOL_DIAMETER_PRESETS,
};
use crate::state::{Axis, SpindleDirection};

#[inline]
const fn clamp_index(
    index: usize,
    len: usize,
) -> usize {
    if index < len { index } else { len - 1 }
}

// =============================================================================
// Jog
// =============================================================================

/// Jog axis and increment selection.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct JogState {
    pub selected_axis: Axis,
    selected_increment: usize,
}

impl JogState {
    /// Selected increment index into [`JOG_INCREMENTS`].
    #[inline]
    pub const fn selected_increment(&self) -> usize { self.selected_increment }

    /// Jog distance in mm for the selected increment.
    #[inline]
    pub const fn increment(&self) -> f32 { JOG_INCREMENTS[self.selected_increment] }

    /// Select an increment. Returns `true` if the selection changed.
    pub fn select_increment(
        &mut self,
        index: usize,
    ) -> bool {
        let index = clamp_index(index, JOG_INCREMENTS.len());
        let changed = index != self.selected_increment;
        self.selected_increment = index;
        changed
    }

    /// Select the jog axis. Returns `true` if the selection changed.
    pub fn select_axis(
        &mut self,
        axis: Axis,
    ) -> bool {
        let changed = axis != self.selected_axis;
        self.selected_axis = axis;
        changed
    }
}

impl Default for JogState {
    fn default() -> Self {
        Self {
            selected_axis: Axis::X,
            selected_increment: DEFAULT_JOG_INCREMENT,
        }
    }
}

// =============================================================================
// Spindle
// =============================================================================

/// Spindle preset and direction selection.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct SpindleState {
    selected_preset: usize,
    pub direction: SpindleDirection,
}

impl SpindleState {
    /// Selected preset index into [`SPINDLE_PRESETS`].
    #[inline]
    pub const fn selected_preset(&self) -> usize { self.selected_preset }

    /// RPM of the selected preset.
    #[inline]
    pub const fn rpm(&self) -> u32 { SPINDLE_PRESETS[self.selected_preset] }

    /// Select a preset. Returns `true` if the selection changed.
    pub fn select_preset(
        &mut self,
        index: usize,
    ) -> bool {
        let index = clamp_index(index, SPINDLE_PRESETS.len());
        let changed = index != self.selected_preset;
        self.selected_preset = index;
        changed
    }
}

impl Default for SpindleState {
    fn default() -> Self {
        Self {
            selected_preset: DEFAULT_SPINDLE_PRESET,
            direction: SpindleDirection::Forward,
        }
    }
}

// =============================================================================
// Overrides
// =============================================================================

/// Feed and spindle override selections.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct FeedsState {
    feed_override: usize,
    spindle_override: usize,
}

impl FeedsState {
    #[inline]
    pub const fn feed_override(&self) -> usize { self.feed_override }

    #[inline]
    pub const fn spindle_override(&self) -> usize { self.spindle_override }

    /// Select the feed override. Returns the new percentage.
    pub fn select_feed_override(
        &mut self,
        index: usize,
    ) -> u16 {
        self.feed_override = clamp_index(index, OVERRIDE_PERCENTAGES.len());
        OVERRIDE_PERCENTAGES[self.feed_override]
    }

    /// Select the spindle override. Returns the new percentage.
    pub fn select_spindle_override(
        &mut self,
        index: usize,
    ) -> u16 {
        self.spindle_override = clamp_index(index, OVERRIDE_PERCENTAGES.len());
        OVERRIDE_PERCENTAGES[self.spindle_override]
    }
}

impl Default for FeedsState {
    fn default() -> Self {
        Self {
            feed_override: DEFAULT_OVERRIDE,
            spindle_override: DEFAULT_OVERRIDE,
        }
    }
}

// =============================================================================
// Work Coordinates
// =============================================================================

/// Work coordinate system selection (G54..G57).
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct WorkState {
    coord_index: usize,
}

impl WorkState {
    #[inline]
    pub const fn coord_index(&self) -> usize { self.coord_index }

    /// Label of the selected system ("G54").
    #[inline]
    pub const fn coord_label(&self) -> &'static str { COORD_SYSTEMS[self.coord_index] }

    /// `P` number addressing the selected system in `G10 L20` (G54 = 1).
    #[inline]
    pub const fn p_number(&self) -> u8 { self.coord_index as u8 + 1 }

    /// Select a system. Returns `true` if the selection changed.
    pub fn select(
        &mut self,
        index: usize,
    ) -> bool {
        let index = clamp_index(index, COORD_SYSTEMS.len());
        let changed = index != self.coord_index;
        self.coord_index = index;
        changed
    }
}

// =============================================================================
// Probing
// =============================================================================

/// Probe cycle type.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ProbeKind {
    /// Probe down onto the work surface.
    ZSurface,
    /// Probe toward an edge along +X.
    XEdge,
}

impl ProbeKind {
    pub const ALL: [Self; 2] = [Self::ZSurface, Self::XEdge];

    pub const fn label(self) -> &'static str {
        match self {
            Self::ZSurface => "Z Surface",
            Self::XEdge => "X Edge",
        }
    }

    /// Axis the cycle measures.
    pub const fn axis(self) -> Axis {
        match self {
            Self::ZSurface => Axis::Z,
            Self::XEdge => Axis::X,
        }
    }
}

/// Probe parameter selected for cycling.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ProbeParam {
    Feed,
    Travel,
    ToolDiameter,
}

/// Probe type, parameters and last result.
#[derive(Clone, Copy, PartialEq, Debug, Default)]
pub struct ProbeState {
    /// Selected probe type, `None` until the operator picks one.
    pub kind: Option<ProbeKind>,
    feed_index: usize,
    travel_index: usize,
    diameter_index: usize,
    /// Last probe result in work coordinates (mm), if any.
    pub last_result: Option<f32>,
}

impl ProbeState {
    /// Probe feed rate (mm/min).
    #[inline]
    pub const fn feed_rate(&self) -> f32 { PROBE_FEED_PRESETS[self.feed_index] }

    /// Maximum probe travel (mm).
    #[inline]
    pub const fn max_travel(&self) -> f32 { PROBE_TRAVEL_PRESETS[self.travel_index] }

    /// Probe tool diameter (mm).
    #[inline]
    pub const fn tool_diameter(&self) -> f32 { TOOL_DIAMETER_PRESETS[self.diameter_index] }

    /// Advance one parameter to its next preset, wrapping around.
    pub fn cycle(
        &mut self,
        param: ProbeParam,
    ) {
        match param {
            ProbeParam::Feed => self.feed_index = (self.feed_index + 1) % PROBE_FEED_PRESETS.len(),
            ProbeParam::Travel => self.travel_index = (self.travel_index + 1) % PROBE_TRAVEL_PRESETS.len(),
            ProbeParam::ToolDiameter => {
                self.diameter_index = (self.diameter_index + 1) % TOOL_DIAMETER_PRESETS.len();
            }
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_jog_increment_tracks_table() {
        let mut jog = JogState::default();
        assert_eq!(jog.increment(), 1.0);
        for (i, expected) in JOG_INCREMENTS.iter().enumerate() {
            jog.select_increment(i);
            assert_eq!(jog.increment(), *expected);
        }
    }

    #[test]
    fn test_jog_increment_clamps() {
        let mut jog = JogState::default();
        jog.select_increment(99);
        assert_eq!(jog.selected_increment(), JOG_INCREMENTS.len() - 1);
        assert_eq!(jog.increment(), 100.0);
    }

    #[test]
    fn test_select_reports_change() {
        let mut jog = JogState::default();
        assert!(jog.select_axis(Axis::Z));
        assert!(!jog.select_axis(Axis::Z));

        let mut work = WorkState::default();
        assert!(!work.select(0));
        assert!(work.select(2));
        assert_eq!(work.coord_label(), "G56");
        assert_eq!(work.p_number(), 3);
    }

    #[test]
    fn test_spindle_preset() {
        let mut spindle = SpindleState::default();
        assert_eq!(spindle.rpm(), 12000);
        spindle.select_preset(2);
        assert_eq!(spindle.rpm(), 24000);
        spindle.select_preset(7);
        assert_eq!(spindle.selected_preset(), 2);
    }

    #[test]
    fn test_overrides() {
        let mut feeds = FeedsState::default();
        assert_eq!(feeds.select_feed_override(0), 50);
        assert_eq!(feeds.select_spindle_override(4), 150);
        assert_eq!(feeds.select_spindle_override(10), 150);
        assert_eq!(feeds.feed_override(), 0);
    }

    #[test]
    fn test_probe_parameters_cycle() {
        let mut probe = ProbeState::default();
        assert!(probe.kind.is_none());
        assert_eq!(probe.feed_rate(), 25.0);
        probe.cycle(ProbeParam::Feed);
        assert_eq!(probe.feed_rate(), 50.0);
        probe.cycle(ProbeParam::Feed);
        probe.cycle(ProbeParam::Feed);
        assert_eq!(probe.feed_rate(), 25.0);

        probe.cycle(ProbeParam::ToolDiameter);
        assert_eq!(probe.tool_diameter(), 6.0);
        assert_eq!(probe.max_travel(), 10.0);
    }
}
