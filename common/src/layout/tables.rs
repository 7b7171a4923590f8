//! Screen layout constants.
//!
//! Coordinates are absolute, in the 240x320 portrait frame the operator sees.
//! Hit regions are listed in priority order (first match wins).

use embedded_graphics::geometry::Point;

use super::{Action, ButtonStyle, Chrome, HitRegion, Label, RegionId, ScreenSpec, TextSource, rect};
use crate::colors::{BUTTON_GRAY, DARK_GREEN, GREEN, ORANGE, RED, WHITE};
use crate::config::{COORD_SYSTEMS, JOG_INCREMENT_LABELS, MACRO_LABELS, OVERRIDE_LABELS, SPINDLE_PRESET_LABELS};
use crate::screen::Screen;
use crate::state::{Axis, ProbeKind, ProbeParam, SpindleDirection};
use crate::styles::TextSize;

// =============================================================================
// Builders
// =============================================================================

const SELECTED: ButtonStyle = ButtonStyle::Toggle { on: ORANGE };
const GRAY: ButtonStyle = ButtonStyle::Fixed(BUTTON_GRAY);

const fn hit(
    x: i32,
    y: i32,
    w: u32,
    h: u32,
    action: Action,
    label: Label,
    style: ButtonStyle,
) -> HitRegion {
    HitRegion {
        rect: rect(x, y, w, h),
        action,
        label,
        style,
    }
}

const fn nav(
    x: i32,
    y: i32,
    w: u32,
    h: u32,
    text: &'static str,
    screen: Screen,
) -> HitRegion {
    hit(x, y, w, h, Action::Navigate(screen), Label::Text(text, TextSize::Body), ButtonStyle::Nav)
}

const fn menu_button(
    x: i32,
    y: i32,
    text: &'static str,
    screen: Screen,
) -> HitRegion {
    nav(x, y, 112, 47, text, screen)
}

const fn menu_button_two_line(
    x: i32,
    y: i32,
    first: &'static str,
    second: &'static str,
    screen: Screen,
) -> HitRegion {
    hit(x, y, 112, 47, Action::Navigate(screen), Label::TwoLine(first, second), ButtonStyle::Nav)
}

const fn body(text: &'static str) -> Label { Label::Text(text, TextSize::Body) }

const fn large(text: &'static str) -> Label { Label::Text(text, TextSize::Large) }

const fn caption(
    x: i32,
    y: i32,
    text: &'static str,
) -> Chrome {
    Chrome::Caption(Point::new(x, y), text)
}

/// Column x of a four-wide button row (52 px buttons, 56 px pitch).
const fn col4(i: i32) -> i32 { 5 + i * 56 }

/// Column x of the three-wide override rows (72 px buttons, 78 px pitch).
const fn col3(i: i32) -> i32 { 5 + i * 78 }

// =============================================================================
// Main Menu
// =============================================================================

const MENU_Y: i32 = 115;
const MENU_PITCH: i32 = 52;

const MAIN_MENU_HITS: [HitRegion; 8] = [
    menu_button(5, MENU_Y, "Jog", Screen::JogHoming),
    menu_button(123, MENU_Y, "Work Area", Screen::ProbingWork),
    menu_button_two_line(5, MENU_Y + MENU_PITCH, "Feeds &", "Speeds", Screen::FeedsSpeeds),
    menu_button_two_line(123, MENU_Y + MENU_PITCH, "Spindle", "Control", Screen::SpindleControl),
    menu_button(5, MENU_Y + MENU_PITCH * 2, "Macros", Screen::Macros),
    menu_button(123, MENU_Y + MENU_PITCH * 2, "SD Card", Screen::SdCard),
    menu_button(5, MENU_Y + MENU_PITCH * 3, "FluidNC", Screen::SystemInfo),
    menu_button(123, MENU_Y + MENU_PITCH * 3, "Status", Screen::Status),
];

// =============================================================================
// Status
// =============================================================================

const STATUS_CHROME: [Chrome; 3] = [
    Chrome::Panel(rect(5, 95, 230, 40)),
    caption(10, 100, "CURRENT FILE"),
    Chrome::Text {
        pos: Point::new(10, 115),
        size: TextSize::Caption,
        color: WHITE,
        source: TextSource::CurrentFile,
    },
];

const STATUS_HITS: [HitRegion; 1] = [nav(5, 280, 230, 40, "Main Menu", Screen::MainMenu)];

// =============================================================================
// Jog & Homing
// =============================================================================

const JOG_CHROME: [Chrome; 3] = [
    caption(5, 103, "JOG AXIS"),
    caption(5, 161, "HOME"),
    caption(5, 219, "JOG INCREMENT"),
];

const fn jog_axis(axis: Axis) -> HitRegion {
    hit(col4(axis as i32), 115, 52, 38, Action::SelectAxis(axis), large(axis.letter()), SELECTED)
}

const fn home(axis: Axis) -> HitRegion {
    hit(
        col4(axis as i32),
        173,
        52,
        38,
        Action::Home(axis),
        large(axis.letter()),
        ButtonStyle::Fixed(DARK_GREEN),
    )
}

const fn increment(i: u8) -> HitRegion {
    hit(
        col4(i as i32),
        231,
        52,
        38,
        Action::SelectIncrement(i),
        body(JOG_INCREMENT_LABELS[i as usize]),
        SELECTED,
    )
}

const JOG_HITS: [HitRegion; 14] = [
    jog_axis(Axis::X),
    jog_axis(Axis::Y),
    jog_axis(Axis::Z),
    jog_axis(Axis::A),
    home(Axis::X),
    home(Axis::Y),
    home(Axis::Z),
    home(Axis::A),
    increment(0),
    increment(1),
    increment(2),
    increment(3),
    nav(5, 277, 112, 40, "Main Menu", Screen::MainMenu),
    nav(123, 277, 112, 40, "Work Area", Screen::ProbingWork),
];

// =============================================================================
// Work Area
// =============================================================================

const WORK_CHROME: [Chrome; 4] = [
    caption(5, 43, "COORDINATE SYSTEM"),
    caption(5, 100, "MACHINE POS"),
    caption(5, 158, "WORK POS"),
    caption(5, 218, "SET WORK ZERO"),
];

const fn coord(i: u8) -> HitRegion {
    hit(col4(i as i32), 55, 52, 38, Action::SelectCoord(i), body(COORD_SYSTEMS[i as usize]), SELECTED)
}

const fn zero(
    x: i32,
    axis: Axis,
) -> HitRegion {
    hit(x, 230, 46, 38, Action::ZeroAxis(axis), large(axis.letter()), ButtonStyle::Fixed(DARK_GREEN))
}

const WORK_HITS: [HitRegion; 12] = [
    coord(0),
    coord(1),
    coord(2),
    coord(3),
    zero(5, Axis::X),
    zero(52, Axis::Y),
    zero(99, Axis::Z),
    zero(146, Axis::A),
    hit(193, 230, 46, 38, Action::ZeroAll, body("ALL"), ButtonStyle::Fixed(DARK_GREEN)),
    nav(5, 277, 74, 40, "Menu", Screen::MainMenu),
    nav(83, 277, 74, 40, "Jog", Screen::JogHoming),
    nav(161, 277, 74, 40, "Probe", Screen::Probing),
];

// =============================================================================
// Probing
// =============================================================================

const PROBE_CHROME: [Chrome; 2] = [caption(5, 43, "PROBE TYPE"), caption(5, 101, "PARAMETERS")];

const fn probe_type(
    x: i32,
    kind: ProbeKind,
) -> HitRegion {
    hit(x, 55, 112, 38, Action::SelectProbe(kind), body(kind.label()), SELECTED)
}

const fn probe_param(
    x: i32,
    param: ProbeParam,
) -> HitRegion {
    hit(x, 113, 72, 50, Action::CycleProbeParam(param), Label::Hidden, GRAY)
}

const PROBE_HITS: [HitRegion; 7] = [
    probe_type(5, ProbeKind::ZSurface),
    probe_type(123, ProbeKind::XEdge),
    probe_param(5, ProbeParam::Feed),
    probe_param(83, ProbeParam::Travel),
    probe_param(161, ProbeParam::ToolDiameter),
    nav(5, 277, 112, 40, "Work Area", Screen::ProbingWork),
    nav(123, 277, 112, 40, "Main Menu", Screen::MainMenu),
];

// =============================================================================
// Feeds & Speeds
// =============================================================================

const FEEDS_CHROME: [Chrome; 2] = [caption(5, 83, "FEED OVERRIDE"), caption(5, 182, "SPINDLE OVERRIDE")];

const fn feed_override(
    x: i32,
    y: i32,
    i: u8,
) -> HitRegion {
    hit(x, y, 72, 37, Action::SelectFeedOverride(i), body(OVERRIDE_LABELS[i as usize]), SELECTED)
}

const fn spindle_override(
    x: i32,
    y: i32,
    i: u8,
) -> HitRegion {
    hit(x, y, 72, 37, Action::SelectSpindleOverride(i), body(OVERRIDE_LABELS[i as usize]), SELECTED)
}

const FEEDS_HITS: [HitRegion; 11] = [
    feed_override(col3(0), 95, 0),
    feed_override(col3(1), 95, 1),
    feed_override(col3(2), 95, 2),
    feed_override(5, 137, 3),
    feed_override(161, 137, 4),
    spindle_override(col3(0), 194, 0),
    spindle_override(col3(1), 194, 1),
    spindle_override(col3(2), 194, 2),
    spindle_override(5, 236, 3),
    spindle_override(161, 236, 4),
    nav(5, 280, 230, 40, "Main Menu", Screen::MainMenu),
];

// =============================================================================
// Spindle Control
// =============================================================================

const SPINDLE_CHROME: [Chrome; 2] = [caption(5, 106, "DIRECTION"), caption(5, 166, "RPM PRESETS")];

const fn direction(
    x: i32,
    dir: SpindleDirection,
) -> HitRegion {
    hit(x, 118, 112, 38, Action::SetDirection(dir), body(dir.label()), ButtonStyle::Toggle { on: DARK_GREEN })
}

const fn preset(i: u8) -> HitRegion {
    hit(5 + i as i32 * 75, 178, 70, 37, Action::SelectPreset(i), body(SPINDLE_PRESET_LABELS[i as usize]), SELECTED)
}

const SPINDLE_HITS: [HitRegion; 8] = [
    direction(5, SpindleDirection::Forward),
    direction(123, SpindleDirection::Reverse),
    preset(0),
    preset(1),
    preset(2),
    hit(5, 230, 112, 40, Action::SpindleStart, body("Start"), ButtonStyle::Fixed(DARK_GREEN)),
    hit(123, 230, 112, 40, Action::SpindleStop, body("Stop"), ButtonStyle::Fixed(RED)),
    nav(5, 280, 230, 37, "Main Menu", Screen::MainMenu),
];

// =============================================================================
// Macros
// =============================================================================

const fn macro_button(i: u8) -> HitRegion {
    let x = 5 + (i as i32 % 2) * 118;
    let y = 40 + (i as i32 / 2) * 48;
    hit(x, y, 112, 43, Action::RunMacro(i), body(MACRO_LABELS[i as usize]), GRAY)
}

const MACRO_HITS: [HitRegion; 11] = [
    macro_button(0),
    macro_button(1),
    macro_button(2),
    macro_button(3),
    macro_button(4),
    macro_button(5),
    macro_button(6),
    macro_button(7),
    macro_button(8),
    macro_button(9),
    nav(5, 280, 230, 37, "Main Menu", Screen::MainMenu),
];

// =============================================================================
// SD Card
// =============================================================================

const fn file_row(row: u8) -> HitRegion {
    hit(5, 40 + row as i32 * 42, 230, 38, Action::SelectFile(row), Label::FileRow(row), SELECTED)
}

const SD_HITS: [HitRegion; 9] = [
    file_row(0),
    file_row(1),
    file_row(2),
    file_row(3),
    hit(5, 208, 112, 34, Action::ScrollBack, body("Back"), GRAY),
    hit(123, 208, 112, 34, Action::ScrollNext, body("Next"), GRAY),
    hit(5, 246, 112, 34, Action::OpenFile, body("Open"), ButtonStyle::Fixed(GREEN)),
    hit(123, 246, 112, 34, Action::DeleteFile, body("Delete"), ButtonStyle::Fixed(RED)),
    nav(5, 284, 230, 34, "Main Menu", Screen::MainMenu),
];

// =============================================================================
// System Info
// =============================================================================

const SYSTEM_CHROME: [Chrome; 5] = [
    Chrome::Panel(rect(5, 40, 230, 50)),
    caption(10, 45, "FLUIDDIAL"),
    Chrome::Text {
        pos: Point::new(10, 60),
        size: TextSize::Body,
        color: GREEN,
        source: TextSource::DialVersion,
    },
    caption(123, 45, "FLUIDNC"),
    Chrome::Text {
        pos: Point::new(123, 60),
        size: TextSize::Body,
        color: GREEN,
        source: TextSource::ControllerVersion,
    },
];

const SYSTEM_HITS: [HitRegion; 1] = [nav(5, 282, 230, 36, "Main Menu", Screen::MainMenu)];

// =============================================================================
// Screen Table (indexed by `Screen::index`)
// =============================================================================

pub(super) const SCREENS: [ScreenSpec; Screen::COUNT] = [
    // MainMenu
    ScreenSpec {
        chrome: &[],
        hits: &MAIN_MENU_HITS,
        regions: &[RegionId::MenuSummary],
    },
    // Status
    ScreenSpec {
        chrome: &STATUS_CHROME,
        hits: &STATUS_HITS,
        regions: &[
            RegionId::StatusMachine,
            RegionId::StatusAxes,
            RegionId::StatusFeed,
            RegionId::StatusSpindle,
        ],
    },
    // JogHoming
    ScreenSpec {
        chrome: &JOG_CHROME,
        hits: &JOG_HITS,
        regions: &[RegionId::JogReadout],
    },
    // ProbingWork
    ScreenSpec {
        chrome: &WORK_CHROME,
        hits: &WORK_HITS,
        regions: &[RegionId::WorkMachine, RegionId::WorkOffsets],
    },
    // Probing
    ScreenSpec {
        chrome: &PROBE_CHROME,
        hits: &PROBE_HITS,
        regions: &[RegionId::ProbeParams, RegionId::ProbeResult],
    },
    // FeedsSpeeds
    ScreenSpec {
        chrome: &FEEDS_CHROME,
        hits: &FEEDS_HITS,
        regions: &[
            RegionId::FeedValue,
            RegionId::SpindleValue,
            RegionId::FeedOverride,
            RegionId::SpindleOverride,
        ],
    },
    // SpindleControl
    ScreenSpec {
        chrome: &SPINDLE_CHROME,
        hits: &SPINDLE_HITS,
        regions: &[RegionId::SpindleRpm],
    },
    // Macros
    ScreenSpec {
        chrome: &[],
        hits: &MACRO_HITS,
        regions: &[],
    },
    // SdCard
    ScreenSpec {
        chrome: &[],
        hits: &SD_HITS,
        regions: &[],
    },
    // SystemInfo
    ScreenSpec {
        chrome: &SYSTEM_CHROME,
        hits: &SYSTEM_HITS,
        regions: &[RegionId::SysConnection, RegionId::SysRender, RegionId::SysHeap],
    },
];

// =============================================================================
// Unit Tests
// =============================================================================
