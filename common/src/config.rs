//! Pendant configuration constants.
//!
//! # Optimization: Pre-computed Layout Constants
//!
//! Layout values are `const` so per-screen tables and region geometry are
//! computed at compile time. Nothing here is derived at runtime; a constrained
//! device should not spend cycles on layout.
//!
//! # Compile-Time Validation
//!
//! Fixed tables carry `const` assertions (ascending order, non-empty) so a bad
//! edit fails the build instead of producing a confusing UI.

// =============================================================================
// Display Configuration
// =============================================================================

/// Display width in pixels (portrait, 240x320 ST7789 panel).
pub const SCREEN_WIDTH: u32 = 240;

/// Display height in pixels.
pub const SCREEN_HEIGHT: u32 = 320;

/// Title bar height in pixels.
pub const TITLE_BAR_HEIGHT: u32 = 35;

/// Corner radius for buttons.
pub const BUTTON_RADIUS: u32 = 8;

/// Corner radius for readout panels.
pub const PANEL_RADIUS: u32 = 5;

// =============================================================================
// Timing Configuration (milliseconds)
// =============================================================================

/// Minimum interval between accepted touches.
pub const TOUCH_INTERVAL_MS: u64 = 200;

/// A physical button level must be stable this long before it counts.
pub const BUTTON_DEBOUNCE_MS: u64 = 50;

/// Minimum interval between accepted jog ticks from the encoder.
pub const JOG_TICK_INTERVAL_MS: u64 = 50;

/// Minimum interval between accepted rotation toggles from the encoder.
/// Coarser than jogging: a toggle redraws the whole screen and writes flash.
pub const ROTATION_TICK_INTERVAL_MS: u64 = 300;

/// Interval between periodic refreshes of cached regions.
pub const REGION_REFRESH_MS: u64 = 100;

/// How long a momentary button stays inverted after a press.
pub const PRESS_FEEDBACK_MS: u64 = 150;

const _: () = assert!(JOG_TICK_INTERVAL_MS < ROTATION_TICK_INTERVAL_MS);
const _: () = assert!(PRESS_FEEDBACK_MS < TOUCH_INTERVAL_MS);

// =============================================================================
// Memory Configuration
// =============================================================================

/// Free heap that must remain after sprite allocation for a screen.
/// Below this the render cache stays unallocated and regions draw directly.
pub const HEAP_SAFETY_MARGIN: usize = 24 * 1024;

/// Maximum cached regions per screen.
pub const MAX_REGIONS: usize = 4;

// =============================================================================
// Persistence
// =============================================================================

/// Preferences namespace.
pub const PREFS_NAMESPACE: &str = "pendant";

/// Preferences key for the display rotation.
pub const PREFS_ROTATION_KEY: &str = "rotation";

// =============================================================================
// Machine Command Configuration
// =============================================================================

/// Feed rate for relative jog commands (mm/min).
pub const JOG_FEED_RATE: u32 = 1000;

// =============================================================================
// Selection Tables
// =============================================================================

/// Jog increments in millimeters.
pub const JOG_INCREMENTS: [f32; 4] = [0.1, 1.0, 10.0, 100.0];

/// Jog increment button labels (same order as [`JOG_INCREMENTS`]).
pub const JOG_INCREMENT_LABELS: [&str; 4] = ["0.1", "1", "10", "100"];

/// Default jog increment index (1 mm).
pub const DEFAULT_JOG_INCREMENT: usize = 1;

const _: () = assert!(JOG_INCREMENTS[0] < JOG_INCREMENTS[1]);
const _: () = assert!(JOG_INCREMENTS[1] < JOG_INCREMENTS[2]);
const _: () = assert!(JOG_INCREMENTS[2] < JOG_INCREMENTS[3]);
const _: () = assert!(DEFAULT_JOG_INCREMENT < JOG_INCREMENTS.len());

/// Spindle RPM presets.
pub const SPINDLE_PRESETS: [u32; 3] = [6000, 12000, 24000];

/// Spindle preset button labels.
pub const SPINDLE_PRESET_LABELS: [&str; 3] = ["6000", "12000", "24000"];

/// Default spindle preset index (12000 RPM).
pub const DEFAULT_SPINDLE_PRESET: usize = 1;

const _: () = assert!(SPINDLE_PRESETS[0] < SPINDLE_PRESETS[1]);
const _: () = assert!(SPINDLE_PRESETS[1] < SPINDLE_PRESETS[2]);

/// Feed / spindle override percentages.
pub const OVERRIDE_PERCENTAGES: [u16; 5] = [50, 75, 100, 125, 150];

/// Override button labels.
pub const OVERRIDE_LABELS: [&str; 5] = ["50%", "75%", "100%", "125%", "150%"];

/// Default override index (100%).
pub const DEFAULT_OVERRIDE: usize = 2;

const _: () = assert!(OVERRIDE_PERCENTAGES[DEFAULT_OVERRIDE] == 100);

/// Work coordinate systems selectable on the work area screen.
pub const COORD_SYSTEMS: [&str; 4] = ["G54", "G55", "G56", "G57"];

/// Probe feed rate presets (mm/min).
pub const PROBE_FEED_PRESETS: [f32; 3] = [25.0, 50.0, 100.0];

/// Probe maximum travel presets (mm).
pub const PROBE_TRAVEL_PRESETS: [f32; 3] = [10.0, 25.0, 50.0];

/// Probe tool diameter presets (mm).
pub const TOOL_DIAMETER_PRESETS: [f32; 3] = [3.175, 6.0, 6.35];

/// Number of macro buttons.
pub const MACRO_COUNT: usize = 10;

/// Macro button labels.
pub const MACRO_LABELS: [&str; MACRO_COUNT] = [
    "Macro 0", "Macro 1", "Macro 2", "Macro 3", "Macro 4", "Macro 5", "Macro 6", "Macro 7", "Macro 8", "Macro 9",
];

// =============================================================================
// SD Card
// =============================================================================

/// Maximum number of file names held in the list.
pub const SD_MAX_FILES: usize = 20;

/// Maximum file name length.
pub const SD_NAME_LEN: usize = 32;

/// File rows visible at once.
pub const SD_VISIBLE_ROWS: usize = 4;
