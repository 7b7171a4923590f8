//! Per-screen layout tables.
//!
//! Every screen is described by one [`ScreenSpec`]:
//!
//! - `chrome`: static decoration (captions, panels, fixed text)
//! - `hits`: ordered touch regions, each with the [`Action`] it triggers and the
//!   button drawn for it
//! - `regions`: the frequently changing areas cached by the
//!   [`RenderCache`](crate::render::RenderCache)
//!
//! Drawing, touch handling and cache preparation all read the same table, so
//! a screen is defined in exactly one place ([`tables`]).
//!
//! # Hit Testing
//!
//! [`hit_test`] walks `hits` in declaration order and returns the first region
//! containing the point. Bounds are inclusive on all four edges.

mod tables;

use embedded_graphics::geometry::{Point, Size};
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::primitives::Rectangle;

use crate::colors::{BACKGROUND, BLUE, BUTTON_GRAY, WHITE};
use crate::screen::Screen;
use crate::state::{Axis, PendantState, ProbeKind, ProbeParam, SpindleDirection};
use crate::styles::TextSize;
use crate::widgets::ButtonText;

/// Rectangle from `x, y, w, h`.
pub(crate) const fn rect(
    x: i32,
    y: i32,
    w: u32,
    h: u32,
) -> Rectangle {
    Rectangle::new(Point::new(x, y), Size::new(w, h))
}

// =============================================================================
// Actions
// =============================================================================

/// What a touch region does.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Action {
    Navigate(Screen),
    SelectAxis(Axis),
    Home(Axis),
    SelectIncrement(u8),
    SelectCoord(u8),
    ZeroAxis(Axis),
    ZeroAll,
    SelectProbe(ProbeKind),
    CycleProbeParam(ProbeParam),
    SelectFeedOverride(u8),
    SelectSpindleOverride(u8),
    SetDirection(SpindleDirection),
    SelectPreset(u8),
    SpindleStart,
    SpindleStop,
    RunMacro(u8),
    /// Select the file in a visible row.
    SelectFile(u8),
    ScrollBack,
    ScrollNext,
    OpenFile,
    DeleteFile,
}

/// Buttons whose appearance depends on a shared selection. Changing the
/// selection redraws the whole group.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ButtonGroup {
    JogAxis,
    JogIncrement,
    CoordSystem,
    ProbeType,
    FeedOverride,
    SpindleOverride,
    Direction,
    Preset,
    FileRows,
}

impl Action {
    /// Selection group this action belongs to, if any.
    pub const fn group(self) -> Option<ButtonGroup> {
        match self {
            Self::SelectAxis(_) => Some(ButtonGroup::JogAxis),
            Self::SelectIncrement(_) => Some(ButtonGroup::JogIncrement),
            Self::SelectCoord(_) => Some(ButtonGroup::CoordSystem),
            Self::SelectProbe(_) => Some(ButtonGroup::ProbeType),
            Self::SelectFeedOverride(_) => Some(ButtonGroup::FeedOverride),
            Self::SelectSpindleOverride(_) => Some(ButtonGroup::SpindleOverride),
            Self::SetDirection(_) => Some(ButtonGroup::Direction),
            Self::SelectPreset(_) => Some(ButtonGroup::Preset),
            Self::SelectFile(_) | Self::ScrollBack | Self::ScrollNext | Self::DeleteFile => {
                Some(ButtonGroup::FileRows)
            }
            _ => None,
        }
    }

    /// Whether the button flashes inverted when pressed.
    pub const fn is_momentary(self) -> bool {
        matches!(
            self,
            Self::Home(_)
                | Self::ZeroAxis(_)
                | Self::ZeroAll
                | Self::SpindleStart
                | Self::SpindleStop
                | Self::RunMacro(_)
                | Self::OpenFile
                | Self::DeleteFile
        )
    }

    /// Whether this action's button is drawn as the current selection.
    pub fn is_selected(
        self,
        state: &PendantState,
    ) -> bool {
        match self {
            Self::SelectAxis(axis) => state.jog.selected_axis == axis,
            Self::SelectIncrement(i) => state.jog.selected_increment() == i as usize,
            Self::SelectCoord(i) => state.work.coord_index() == i as usize,
            Self::SelectProbe(kind) => state.probe.kind == Some(kind),
            Self::SelectFeedOverride(i) => state.feeds.feed_override() == i as usize,
            Self::SelectSpindleOverride(i) => state.feeds.spindle_override() == i as usize,
            Self::SetDirection(direction) => state.spindle.direction == direction,
            Self::SelectPreset(i) => state.spindle.selected_preset() == i as usize,
            Self::SelectFile(row) => state
                .sd_card
                .visible(row as usize)
                .is_some_and(|(index, _)| index == state.sd_card.selected()),
            _ => false,
        }
    }
}

// =============================================================================
// Buttons
// =============================================================================

/// Button label.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Label {
    Text(&'static str, TextSize),
    TwoLine(&'static str, &'static str),
    /// Name of the file in this visible row; empty rows draw nothing.
    FileRow(u8),
    /// Touch-only region; its content is drawn by a cached region.
    Hidden,
}

/// Button coloring.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ButtonStyle {
    /// Blue navigation button.
    Nav,
    /// Always the given color.
    Fixed(Rgb565),
    /// `on` when selected, gray otherwise.
    Toggle { on: Rgb565 },
}

impl ButtonStyle {
    /// Background and text colors.
    pub const fn colors(
        self,
        selected: bool,
    ) -> (Rgb565, Rgb565) {
        match self {
            Self::Nav => (BLUE, WHITE),
            Self::Fixed(color) => (color, WHITE),
            Self::Toggle { on } if selected => (on, WHITE),
            Self::Toggle { .. } => (BUTTON_GRAY, WHITE),
        }
    }
}

/// One touch region and the button drawn for it.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct HitRegion {
    pub rect: Rectangle,
    pub action: Action,
    pub label: Label,
    pub style: ButtonStyle,
}

impl HitRegion {
    /// Inclusive containment: the right and bottom edges count as inside.
    pub const fn contains(
        &self,
        p: Point,
    ) -> bool {
        let tl = self.rect.top_left;
        p.x >= tl.x
            && p.x <= tl.x + self.rect.size.width as i32
            && p.y >= tl.y
            && p.y <= tl.y + self.rect.size.height as i32
    }

    /// Resolve the label against current state. `None` draws nothing.
    pub fn text<'a>(
        &self,
        state: &'a PendantState,
    ) -> Option<ButtonText<'a>> {
        match self.label {
            Label::Text(text, size) => Some(ButtonText::Single(text, size)),
            Label::TwoLine(first, second) => Some(ButtonText::Double(first, second)),
            Label::FileRow(row) => state.sd_card.visible(row as usize).map(|(_, name)| ButtonText::Left(name)),
            Label::Hidden => None,
        }
    }
}

// =============================================================================
// Chrome
// =============================================================================

/// Text whose content comes from machine state but only changes on full redraw.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum TextSource {
    CurrentFile,
    DialVersion,
    ControllerVersion,
}

impl TextSource {
    pub fn resolve(
        self,
        state: &PendantState,
    ) -> &str {
        match self {
            Self::CurrentFile => state.machine.current_file.as_str(),
            Self::DialVersion => state.machine.dial_version.as_str(),
            Self::ControllerVersion => state.machine.controller_version.as_str(),
        }
    }
}

/// Static screen decoration drawn once per full redraw.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Chrome {
    /// Gray caption, top-left anchored.
    Caption(Point, &'static str),
    /// Dark readout panel.
    Panel(Rectangle),
    /// State text, top-left anchored.
    Text {
        pos: Point,
        size: TextSize,
        color: Rgb565,
        source: TextSource,
    },
}

// =============================================================================
// Cached Regions
// =============================================================================

/// A cached screen area.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RegionId {
    MenuSummary,
    StatusMachine,
    StatusAxes,
    StatusFeed,
    StatusSpindle,
    JogReadout,
    WorkMachine,
    WorkOffsets,
    ProbeParams,
    ProbeResult,
    FeedValue,
    SpindleValue,
    FeedOverride,
    SpindleOverride,
    SpindleRpm,
    SysConnection,
    SysRender,
    SysHeap,
}

/// Geometry of a cached region.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct RegionSpec {
    pub id: RegionId,
    /// Absolute screen area.
    pub area: Rectangle,
    /// Color the buffer is cleared to before content is drawn.
    pub background: Rgb565,
}

impl RegionId {
    /// Fixed geometry of this region.
    pub const fn spec(self) -> RegionSpec {
        let area = match self {
            Self::MenuSummary => rect(5, 40, 230, 65),
            Self::StatusMachine => rect(5, 40, 230, 50),
            Self::StatusAxes => rect(5, 140, 230, 65),
            Self::StatusFeed => rect(5, 210, 112, 65),
            Self::StatusSpindle => rect(123, 210, 112, 65),
            Self::JogReadout => rect(5, 40, 230, 55),
            Self::WorkMachine => rect(5, 111, 230, 44),
            Self::WorkOffsets => rect(5, 169, 230, 44),
            Self::ProbeParams => rect(5, 113, 230, 50),
            Self::ProbeResult => rect(5, 173, 230, 60),
            Self::FeedValue => rect(5, 40, 112, 35),
            Self::SpindleValue => rect(123, 40, 112, 35),
            Self::FeedOverride => rect(83, 137, 72, 37),
            Self::SpindleOverride => rect(83, 236, 72, 37),
            Self::SpindleRpm => rect(5, 40, 230, 60),
            Self::SysConnection => rect(5, 96, 230, 80),
            Self::SysRender => rect(5, 182, 230, 52),
            Self::SysHeap => rect(5, 240, 230, 38),
        };
        RegionSpec {
            id: self,
            area,
            background: BACKGROUND,
        }
    }

    /// Buffer size in bytes (RGB565, two bytes per pixel).
    pub const fn bytes(self) -> usize {
        let size = self.spec().area.size;
        size.width as usize * size.height as usize * 2
    }
}

// =============================================================================
// Screen Table
// =============================================================================

/// Everything needed to draw and handle one screen.
#[derive(Clone, Copy, Debug)]
pub struct ScreenSpec {
    pub chrome: &'static [Chrome],
    pub hits: &'static [HitRegion],
    pub regions: &'static [RegionId],
}

impl ScreenSpec {
    /// Total sprite memory the screen's regions need.
    pub fn region_bytes(&self) -> usize { self.regions.iter().map(|id| id.bytes()).sum() }
}

/// Layout of `screen`.
#[inline]
pub fn spec(screen: Screen) -> &'static ScreenSpec { &tables::SCREENS[screen.index()] }

/// First hit region of `screen` containing `point`, with its table index.
pub fn hit_test(
    screen: Screen,
    point: Point,
) -> Option<(usize, &'static HitRegion)> {
    spec(screen).hits.iter().enumerate().find(|(_, hit)| hit.contains(point))
}

/// Hit regions of `screen` belonging to `group`, with their table indices.
pub fn group_members(
    screen: Screen,
    group: ButtonGroup,
) -> impl Iterator<Item = (usize, &'static HitRegion)> {
    spec(screen)
        .hits
        .iter()
        .enumerate()
        .filter(move |(_, hit)| hit.action.group() == Some(group))
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{MAX_REGIONS, SCREEN_HEIGHT, SCREEN_WIDTH};

    fn overlaps(
        a: &Rectangle,
        b: &Rectangle,
    ) -> bool {
        // Inclusive edges, matching `HitRegion::contains`.
        let (ax2, ay2) = (a.top_left.x + a.size.width as i32, a.top_left.y + a.size.height as i32);
        let (bx2, by2) = (b.top_left.x + b.size.width as i32, b.top_left.y + b.size.height as i32);
        a.top_left.x <= bx2 && b.top_left.x <= ax2 && a.top_left.y <= by2 && b.top_left.y <= ay2
    }

    #[test]
    fn test_main_menu_jog_button() {
        let (_, hit) = hit_test(Screen::MainMenu, Point::new(30, 130)).unwrap();
        assert_eq!(hit.action, Action::Navigate(Screen::JogHoming));
        assert_eq!(hit.rect, rect(5, 115, 112, 47));
    }

    #[test]
    fn test_hit_regions_do_not_overlap() {
        for screen in Screen::ALL {
            let hits = spec(screen).hits;
            for (i, a) in hits.iter().enumerate() {
                for b in &hits[i + 1..] {
                    assert!(!overlaps(&a.rect, &b.rect), "{screen:?}: {:?} overlaps {:?}", a.action, b.action);
                }
            }
        }
    }

    #[test]
    fn test_everything_fits_on_screen() {
        for screen in Screen::ALL {
            let spec = spec(screen);
            let areas = spec.hits.iter().map(|h| h.rect).chain(spec.regions.iter().map(|id| id.spec().area));
            for area in areas {
                assert!(area.top_left.x >= 0 && area.top_left.y >= 0);
                assert!(area.top_left.x as u32 + area.size.width <= SCREEN_WIDTH, "{screen:?} {area:?}");
                assert!(area.top_left.y as u32 + area.size.height <= SCREEN_HEIGHT, "{screen:?} {area:?}");
            }
        }
    }

    #[test]
    fn test_region_counts() {
        for screen in Screen::ALL {
            assert!(spec(screen).regions.len() <= MAX_REGIONS, "{screen:?}");
        }
        assert!(spec(Screen::Macros).regions.is_empty());
    }

    #[test]
    fn test_every_screen_can_leave() {
        for screen in Screen::ALL {
            let navigates = spec(screen).hits.iter().any(|h| matches!(h.action, Action::Navigate(_)));
            assert!(navigates, "{screen:?} has no navigation");
        }
    }

    #[test]
    fn test_every_screen_is_reachable_from_menu_or_neighbors() {
        for target in Screen::ALL {
            if target == Screen::MainMenu {
                continue;
            }
            let reachable = Screen::ALL.iter().any(|s| {
                spec(*s).hits.iter().any(|h| h.action == Action::Navigate(target))
            });
            assert!(reachable, "{target:?} unreachable");
        }
    }

    #[test]
    fn test_inclusive_edges() {
        let hit = spec(Screen::MainMenu).hits[0];
        let br = hit.rect.top_left + Point::new(hit.rect.size.width as i32, hit.rect.size.height as i32);
        assert!(hit.contains(br));
        assert!(!hit.contains(br + Point::new(1, 0)));
    }

    #[test]
    fn test_file_row_selection() {
        let state = PendantState::default();
        assert!(Action::SelectFile(0).is_selected(&state));
        assert!(!Action::SelectFile(1).is_selected(&state));
        assert!(!Action::SelectFile(3).is_selected(&state));
    }

    #[test]
    fn test_group_members() {
        assert_eq!(group_members(Screen::JogHoming, ButtonGroup::JogAxis).count(), 4);
        assert_eq!(group_members(Screen::FeedsSpeeds, ButtonGroup::FeedOverride).count(), 5);
        assert_eq!(group_members(Screen::SdCard, ButtonGroup::FileRows).count(), 7);
    }
}
