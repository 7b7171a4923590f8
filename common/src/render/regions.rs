//! Content of the cached regions.
//!
//! [`draw_region`] renders one region in absolute screen coordinates, so the
//! same call draws into a [`Sprite`](super::Sprite) or, when the cache is
//! unavailable, straight onto the panel through a clipped target.
//!
//! [`fingerprint`] hashes exactly the values a region displays, rounded to the
//! precision they are printed with. The periodic refresh skips a region whose
//! fingerprint did not change: a position moving from 1.01 to 1.04 mm prints
//! as "1.0" both times and costs no transfer.

use core::fmt::{self, Write};

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use heapless::String;

use super::RenderStats;
use crate::colors::{CYAN, GRAY_TEXT, GREEN, ORANGE, WHITE};
use crate::layout::{RegionId, rect};
use crate::state::{Axis, MachineState, PendantState};
use crate::styles::{CENTERED, TOP_LEFT, TOP_RIGHT, TextSize};
use crate::widgets::{draw_caption, draw_panel, draw_text};

/// Everything region content is drawn from.
#[derive(Clone, Copy, Debug)]
pub struct RegionData<'a> {
    pub state: &'a PendantState,
    /// Free heap in bytes, shown on the System Info screen.
    pub free_heap: usize,
    pub stats: RenderStats,
}

/// Format into a fixed-capacity line. Overflow truncates.
fn line<const N: usize>(args: fmt::Arguments<'_>) -> String<N> {
    let mut s = String::new();
    let _ = s.write_fmt(args);
    s
}

// =============================================================================
// Drawing
// =============================================================================

/// Draw the content of region `id`. The background is not cleared.
pub fn draw_region<D>(
    display: &mut D,
    id: RegionId,
    data: &RegionData<'_>,
) where
    D: DrawTarget<Color = Rgb565>,
{
    let state = data.state;
    let m = &state.machine;
    let area = id.spec().area;

    match id {
        RegionId::MenuSummary => {
            draw_panel(display, area);
            draw_caption(display, Point::new(10, 45), "STATUS");
            draw_text(display, Point::new(10, 62), m.status.label(), TextSize::Large, m.status.color(), TOP_LEFT);
            draw_caption(display, Point::new(95, 45), "POSITION");
            for axis in Axis::ALL {
                let i = axis.index() as i32;
                let pos = Point::new(95 + (i % 2) * 70, 58 + (i / 2) * 22);
                let text: String<12> = line(format_args!("{}{:.1}", axis.letter(), m.machine(axis)));
                draw_text(display, pos, &text, TextSize::Body, ORANGE, TOP_LEFT);
            }
        }
        RegionId::StatusMachine => {
            draw_panel(display, area);
            draw_caption(display, Point::new(10, 45), "MACHINE STATUS");
            draw_text(display, Point::new(10, 60), m.status.label(), TextSize::Large, m.status.color(), TOP_LEFT);
        }
        RegionId::StatusAxes => {
            draw_panel(display, area);
            draw_caption(display, Point::new(10, 145), "AXIS POSITIONS");
            axis_grid(display, Point::new(10, 160), 120, &m.machine_pos, ORANGE);
        }
        RegionId::StatusFeed => {
            draw_panel(display, area);
            draw_caption(display, Point::new(10, 215), "FEED");
            let feed: String<12> = line(format_args!("{}", m.feed_rate));
            draw_text(display, Point::new(10, 230), &feed, TextSize::Body, ORANGE, TOP_LEFT);
            let ovr: String<8> = line(format_args!("{}%", m.feed_override));
            draw_caption(display, Point::new(10, 258), &ovr);
            draw_text(display, Point::new(112, 258), "mm/min", TextSize::Caption, GRAY_TEXT, TOP_RIGHT);
        }
        RegionId::StatusSpindle => {
            draw_panel(display, area);
            draw_caption(display, Point::new(128, 215), "SPINDLE");
            draw_text(display, Point::new(230, 215), m.spindle_direction.label(), TextSize::Caption, ORANGE, TOP_RIGHT);
            let rpm: String<12> = line(format_args!("{}", m.spindle_rpm));
            draw_text(display, Point::new(128, 230), &rpm, TextSize::Body, GREEN, TOP_LEFT);
            let (running, color) = if m.spindle_running { ("ON", GREEN) } else { ("OFF", GRAY_TEXT) };
            draw_text(display, Point::new(128, 258), running, TextSize::Caption, color, TOP_LEFT);
            draw_text(display, Point::new(230, 258), "RPM", TextSize::Caption, GRAY_TEXT, TOP_RIGHT);
        }
        RegionId::JogReadout => jog_readout(display, state),
        RegionId::WorkMachine => axis_grid(display, Point::new(5, 113), 120, &m.machine_pos, ORANGE),
        RegionId::WorkOffsets => axis_grid(display, Point::new(5, 171), 120, &m.work_pos, CYAN),
        RegionId::ProbeParams => {
            let probe = &state.probe;
            let feed: String<8> = line(format_args!("{:.0}", probe.feed_rate()));
            let travel: String<8> = line(format_args!("{:.0}", probe.max_travel()));
            let tool: String<8> = line(format_args!("{:.3}", probe.tool_diameter()));
            let boxes = [("FEED", feed), ("TRAVEL", travel), ("TOOL D", tool)];
            for (i, (caption, value)) in boxes.iter().enumerate() {
                let x = 5 + 78 * i as i32;
                draw_panel(display, rect(x, 113, 72, 50));
                draw_caption(display, Point::new(x + 5, 118), caption);
                draw_text(display, Point::new(x + 5, 135), value, TextSize::Body, ORANGE, TOP_LEFT);
            }
        }
        RegionId::ProbeResult => {
            let probe = &state.probe;
            draw_panel(display, area);
            draw_caption(display, Point::new(10, 178), "LAST RESULT");
            draw_text(display, Point::new(230, 178), state.work.coord_label(), TextSize::Caption, GRAY_TEXT, TOP_RIGHT);
            match probe.last_result {
                Some(value) => {
                    let axis = probe.kind.map_or("", |kind| kind.axis().letter());
                    let text: String<16> = line(format_args!("{axis}: {value:.3}"));
                    draw_text(display, Point::new(10, 195), &text, TextSize::Large, GREEN, TOP_LEFT);
                }
                None => draw_text(display, Point::new(10, 195), "--", TextSize::Large, GRAY_TEXT, TOP_LEFT),
            }
            let kind = probe.kind.map_or("No probe selected", |kind| kind.label());
            draw_caption(display, Point::new(10, 220), kind);
        }
        RegionId::FeedValue => value_box(display, Point::new(10, 43), "FEED", m.feed_rate, "mm/min", ORANGE),
        RegionId::SpindleValue => value_box(display, Point::new(128, 43), "SPINDLE", m.spindle_rpm, "RPM", GREEN),
        RegionId::FeedOverride => percent_readout(display, id, m.feed_override, ORANGE),
        RegionId::SpindleOverride => percent_readout(display, id, m.spindle_override, GREEN),
        RegionId::SpindleRpm => {
            draw_panel(display, area);
            draw_caption(display, Point::new(10, 45), "RPM");
            let rpm: String<12> = line(format_args!("{}", m.spindle_rpm));
            draw_text(display, Point::new(10, 58), &rpm, TextSize::Huge, ORANGE, TOP_LEFT);
            let (running, color) = if m.spindle_running { ("RUNNING", GREEN) } else { ("STOPPED", GRAY_TEXT) };
            draw_text(display, Point::new(160, 45), running, TextSize::Caption, color, TOP_LEFT);
            draw_text(display, Point::new(160, 65), m.spindle_direction.label(), TextSize::Body, CYAN, TOP_LEFT);
        }
        RegionId::SysConnection => {
            draw_panel(display, area);
            draw_caption(display, Point::new(10, 101), "CONNECTION");
            draw_caption(display, Point::new(10, 118), "Baud:");
            let baud: String<12> = line(format_args!("{}", m.baud_rate));
            draw_text(display, Point::new(100, 114), &baud, TextSize::Body, ORANGE, TOP_LEFT);
            draw_caption(display, Point::new(10, 138), "Port:");
            draw_text(display, Point::new(10, 150), m.port.as_str(), TextSize::Caption, CYAN, TOP_LEFT);
            draw_caption(display, Point::new(10, 163), "Status:");
            draw_text(display, Point::new(100, 163), m.connection.as_str(), TextSize::Caption, GREEN, TOP_LEFT);
        }
        RegionId::SysRender => {
            let stats = data.stats;
            draw_panel(display, area);
            draw_caption(display, Point::new(10, 187), "RENDER");
            let first: String<40> =
                line(format_args!("Full {}  Alloc {}", stats.full_redraws, stats.allocations));
            draw_text(display, Point::new(10, 201), &first, TextSize::Caption, WHITE, TOP_LEFT);
            let second: String<40> = line(format_args!("Low mem {}", stats.degradations));
            draw_text(display, Point::new(10, 216), &second, TextSize::Caption, WHITE, TOP_LEFT);
        }
        RegionId::SysHeap => {
            draw_panel(display, area);
            draw_caption(display, Point::new(10, 244), "FREE HEAP");
            let heap: String<12> = line(format_args!("{} KB", data.free_heap / 1024));
            draw_text(display, Point::new(10, 256), &heap, TextSize::Body, ORANGE, TOP_LEFT);
            draw_caption(display, Point::new(130, 244), "ROTATION");
            draw_text(display, Point::new(130, 256), m.rotation.label(), TextSize::Body, CYAN, TOP_LEFT);
        }
    }
}

/// Two-column "X:0.0" grid, one row per axis pair.
fn axis_grid<D>(
    display: &mut D,
    origin: Point,
    column: i32,
    values: &[f32; 4],
    color: Rgb565,
) where
    D: DrawTarget<Color = Rgb565>,
{
    let row = TextSize::Body.line_height() as i32;
    for axis in Axis::ALL {
        let i = axis.index() as i32;
        let pos = origin + Point::new((i % 2) * column, (i / 2) * row);
        let text: String<12> = line(format_args!("{}:{:.1}", axis.letter(), values[axis.index()]));
        draw_text(display, pos, &text, TextSize::Body, color, TOP_LEFT);
    }
}

/// Selected axis in large type plus a small grid of all four.
fn jog_readout<D>(
    display: &mut D,
    state: &PendantState,
) where
    D: DrawTarget<Color = Rgb565>,
{
    let m: &MachineState = &state.machine;
    let axis = state.jog.selected_axis;
    draw_panel(display, RegionId::JogReadout.spec().area);

    draw_text(display, Point::new(10, 52), axis.letter(), TextSize::Large, GREEN, TOP_LEFT);
    let pos: String<12> = line(format_args!("{:.2}", m.machine(axis)));
    draw_text(display, Point::new(55, 52), &pos, TextSize::Large, GREEN, TOP_LEFT);
    let unit_x = 55 + TextSize::Large.text_width(&pos) as i32;
    draw_text(display, Point::new(unit_x, 74), "mm", TextSize::Body, GRAY_TEXT, TOP_RIGHT);

    for other in Axis::ALL {
        let y = 48 + 12 * other.index() as i32;
        let text: String<12> = line(format_args!("{}:{:.1}", other.letter(), m.machine(other)));
        let color = if other == axis { WHITE } else { GRAY_TEXT };
        draw_text(display, Point::new(155, y), &text, TextSize::Caption, color, TOP_LEFT);
    }
}

/// Caption, value and a unit caption following the value.
fn value_box<D>(
    display: &mut D,
    origin: Point,
    caption: &str,
    value: u32,
    unit: &str,
    color: Rgb565,
) where
    D: DrawTarget<Color = Rgb565>,
{
    draw_panel(display, rect(origin.x - 5, 40, 112, 35));
    draw_caption(display, origin, caption);
    let text: String<12> = line(format_args!("{value}"));
    let value_pos = origin + Point::new(0, 10);
    draw_text(display, value_pos, &text, TextSize::Body, color, TOP_LEFT);
    let unit_x = value_pos.x + TextSize::Body.text_width(&text) as i32 + 4;
    draw_caption(display, Point::new(unit_x, value_pos.y + 7), unit);
}

/// Centered "NNN%" in a small panel.
fn percent_readout<D>(
    display: &mut D,
    id: RegionId,
    percent: u16,
    color: Rgb565,
) where
    D: DrawTarget<Color = Rgb565>,
{
    let area = id.spec().area;
    draw_panel(display, area);
    let text: String<8> = line(format_args!("{percent}%"));
    draw_text(display, area.center(), &text, TextSize::Body, color, CENTERED);
}

// =============================================================================
// Fingerprints
// =============================================================================

/// FNV-1a over the displayed values.
#[derive(Clone, Copy)]
struct Fingerprint(u32);

impl Fingerprint {
    const OFFSET: u32 = 0x811c_9dc5;
    const PRIME: u32 = 0x0100_0193;

    const fn new() -> Self { Self(Self::OFFSET) }

    fn bytes(
        mut self,
        bytes: &[u8],
    ) -> Self {
        for b in bytes {
            self.0 ^= u32::from(*b);
            self.0 = self.0.wrapping_mul(Self::PRIME);
        }
        self
    }

    fn word(
        self,
        value: u32,
    ) -> Self {
        self.bytes(&value.to_le_bytes())
    }

    /// `value` exactly as `{:.decimals$}` prints it, sign of zero included.
    fn value(
        self,
        value: f32,
        decimals: usize,
    ) -> Self {
        let text: String<24> = line(format_args!("{value:.decimals$}"));
        self.text(&text)
    }

    fn positions(
        self,
        values: &[f32; 4],
        decimals: usize,
    ) -> Self {
        values.iter().fold(self, |fp, v| fp.value(*v, decimals))
    }

    fn text(
        self,
        text: &str,
    ) -> Self {
        self.bytes(text.as_bytes()).word(0)
    }
}

/// Hash of everything region `id` displays.
///
/// Equal fingerprints mean the region would draw identical pixels.
pub fn fingerprint(
    id: RegionId,
    data: &RegionData<'_>,
) -> u32 {
    let state = data.state;
    let m = &state.machine;
    let fp = Fingerprint::new().word(id as u32);

    let fp = match id {
        RegionId::MenuSummary => fp.word(m.status as u32).positions(&m.machine_pos, 1),
        RegionId::StatusMachine => fp.word(m.status as u32),
        RegionId::StatusAxes | RegionId::WorkMachine => fp.positions(&m.machine_pos, 1),
        RegionId::StatusFeed => fp.word(m.feed_rate).word(u32::from(m.feed_override)),
        RegionId::StatusSpindle | RegionId::SpindleRpm => fp
            .word(m.spindle_rpm)
            .word(m.spindle_direction as u32)
            .word(u32::from(m.spindle_running)),
        RegionId::JogReadout => {
            let selected = state.jog.selected_axis;
            fp.word(selected as u32).value(m.machine(selected), 2).positions(&m.machine_pos, 1)
        },
        RegionId::WorkOffsets => fp.positions(&m.work_pos, 1),
        RegionId::ProbeParams => fp
            .value(state.probe.feed_rate(), 0)
            .value(state.probe.max_travel(), 0)
            .value(state.probe.tool_diameter(), 3),
        RegionId::ProbeResult => fp
            .word(state.probe.kind.map_or(0, |kind| kind as u32 + 1))
            .word(state.work.coord_index() as u32)
            .word(u32::from(state.probe.last_result.is_some()))
            .value(state.probe.last_result.unwrap_or(0.0), 3),
        RegionId::FeedValue => fp.word(m.feed_rate),
        RegionId::SpindleValue => fp.word(m.spindle_rpm),
        RegionId::FeedOverride => fp.word(u32::from(m.feed_override)),
        RegionId::SpindleOverride => fp.word(u32::from(m.spindle_override)),
        RegionId::SysConnection => fp.word(m.baud_rate).text(&m.port).text(&m.connection),
        RegionId::SysRender => {
            let stats = data.stats;
            fp.word(stats.full_redraws).word(stats.allocations).word(stats.degradations)
        }
        RegionId::SysHeap => fp.word((data.free_heap / 1024) as u32).word(m.rotation.raw() as u32),
    };
    fp.0
}

// =============================================================================
// Unit Tests
// =============================================================================
