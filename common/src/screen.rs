//! Screen identifiers and the current/previous screen controller.
//!
//! # Screens
//!
//! - [`Screen::MainMenu`]: status, axis summary, navigation grid
//! - [`Screen::Status`]: status, current file, axes, feed and spindle
//! - [`Screen::JogHoming`]: axis/increment selection, homing, encoder jogging
//! - [`Screen::ProbingWork`]: coordinate system, positions, work zero
//! - [`Screen::Probing`]: probe type and parameters, last result
//! - [`Screen::FeedsSpeeds`]: feed and spindle overrides
//! - [`Screen::SpindleControl`]: RPM presets, direction, start/stop
//! - [`Screen::Macros`]: ten macro buttons
//! - [`Screen::SdCard`]: file browser
//! - [`Screen::SystemInfo`]: versions, connection, heap, encoder rotation toggle

/// One full-page layout. Exactly one is current at a time.
#[derive(Clone, Copy, PartialEq, Eq, Default, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Screen {
    #[default]
    MainMenu,
    Status,
    JogHoming,
    ProbingWork,
    Probing,
    FeedsSpeeds,
    SpindleControl,
    Macros,
    SdCard,
    SystemInfo,
}

impl Screen {
    /// Number of screens.
    pub const COUNT: usize = 10;

    /// All screens in declaration order.
    pub const ALL: [Self; Self::COUNT] = [
        Self::MainMenu,
        Self::Status,
        Self::JogHoming,
        Self::ProbingWork,
        Self::Probing,
        Self::FeedsSpeeds,
        Self::SpindleControl,
        Self::Macros,
        Self::SdCard,
        Self::SystemInfo,
    ];

    /// Index into per-screen tables.
    #[inline]
    pub const fn index(self) -> usize { self as usize }

    /// Title bar text.
    pub const fn title(self) -> &'static str {
        match self {
            Self::MainMenu => "MAIN MENU",
            Self::Status => "STATUS",
            Self::JogHoming => "JOG & HOMING",
            Self::ProbingWork => "WORK AREA",
            Self::Probing => "PROBING",
            Self::FeedsSpeeds => "FEEDS & SPEEDS",
            Self::SpindleControl => "SPINDLE CONTROL",
            Self::Macros => "MACROS",
            Self::SdCard => "SD CARD",
            Self::SystemInfo => "FLUIDNC",
        }
    }

    /// Whether the rotary encoder does anything on this screen.
    #[inline]
    pub const fn uses_encoder(self) -> bool { matches!(self, Self::JogHoming | Self::SystemInfo) }
}

/// Tracks the current screen and the one before the last transition.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct ScreenController {
    current: Screen,
    previous: Screen,
}

impl ScreenController {
    /// Controller showing `screen`.
    pub const fn new(screen: Screen) -> Self {
        Self {
            current: screen,
            previous: screen,
        }
    }

    #[inline]
    pub const fn current(&self) -> Screen { self.current }

    #[inline]
    pub const fn previous(&self) -> Screen { self.previous }

    /// Switch to `screen`, keeping the old one as previous.
    ///
    /// Returns `true` (full redraw needed) iff the screen actually changed.
    pub fn transition_to(
        &mut self,
        screen: Screen,
    ) -> bool {
        self.previous = self.current;
        self.current = screen;
        self.current != self.previous
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
