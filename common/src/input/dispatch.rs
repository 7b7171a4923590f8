//! Turns debounced input into state changes and commands.
//!
//! [`Dispatch`] borrows the pendant state, the command sink and the event log
//! for one input event and reports what must be redrawn in an
//! [`InputResult`]. It never draws.

use super::EncoderDirection;
use crate::command::Command;
use crate::layout::{Action, ButtonGroup, RegionId};
use crate::log::EventLog;
use crate::ports::CommandSink;
use crate::screen::Screen;
use crate::state::{FileName, MachineStatus, PendantState};
use crate::{log_debug, log_info};

/// Physical buttons beside the panel.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PhysicalButton {
    /// Red: feed hold and alarm.
    EStop,
    /// Yellow: alarm clear when in ALARM, otherwise feed hold.
    Context,
    /// Green: cycle start.
    CycleStart,
}

/// Redraw work resulting from one input event.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct InputResult {
    /// Screen to switch to.
    pub navigate: Option<Screen>,
    /// Selection group whose buttons changed.
    pub group: Option<ButtonGroup>,
    /// Cached region whose content changed.
    pub region: Option<RegionId>,
    /// Flash the touched button.
    pub press_feedback: bool,
    /// Redraw the whole current screen.
    pub full_redraw: bool,
}

/// Context for handling one input event.
pub struct Dispatch<'a, S> {
    pub state: &'a mut PendantState,
    pub sink: &'a mut S,
    pub log: &'a mut EventLog,
    pub now_ms: u64,
}

/// Send one command and log it.
fn emit<S: CommandSink>(
    sink: &mut S,
    log: &mut EventLog,
    now_ms: u64,
    command: Command<'_>,
) {
    let line = command.to_line();
    sink.send(&line);
    log_debug!(log, now_ms, "> {}", line);
}

impl<S: CommandSink> Dispatch<'_, S> {
    fn emit(
        &mut self,
        command: Command<'_>,
    ) {
        emit(self.sink, self.log, self.now_ms, command);
    }

    /// Handle a debounced physical button press.
    ///
    /// The context button's meaning depends on the machine status. Every
    /// button changes the status label, so the whole screen is redrawn.
    pub fn button(
        &mut self,
        button: PhysicalButton,
    ) -> InputResult {
        let (command, status) = match button {
            PhysicalButton::EStop => (Command::FeedHold, MachineStatus::Alarm),
            PhysicalButton::Context if self.state.machine.status == MachineStatus::Alarm => {
                (Command::AlarmClear, MachineStatus::Idle)
            }
            PhysicalButton::Context => (Command::FeedHold, MachineStatus::Hold),
            PhysicalButton::CycleStart => (Command::CycleStart, MachineStatus::Run),
        };
        self.emit(command);
        self.state.machine.status = status;
        log_info!(self.log, self.now_ms, "{:?}: {}", button, status.label());

        InputResult {
            full_redraw: true,
            ..InputResult::default()
        }
    }

    /// Jog the selected axis by one increment in `direction`.
    pub fn jog(
        &mut self,
        direction: EncoderDirection,
    ) {
        let axis = self.state.jog.selected_axis;
        let distance = direction.sign() * self.state.jog.increment();
        self.emit(Command::Jog { axis, distance });
    }

    /// Apply the action of a touched button.
    pub fn action(
        &mut self,
        action: Action,
    ) -> InputResult {
        let mut result = InputResult {
            group: action.group(),
            press_feedback: action.is_momentary(),
            ..InputResult::default()
        };

        // Selection setters report whether anything changed; unchanged
        // selections need no redraw.
        let changed = match action {
            Action::Navigate(screen) => {
                result.navigate = Some(screen);
                true
            }
            Action::SelectAxis(axis) => {
                result.region = Some(RegionId::JogReadout);
                self.state.jog.select_axis(axis)
            }
            Action::SelectIncrement(index) => self.state.jog.select_increment(index.into()),
            Action::SelectCoord(index) => {
                let changed = self.state.work.select(index.into());
                if changed {
                    result.region = Some(RegionId::WorkOffsets);
                }
                changed
            }
            Action::Home(axis) => {
                self.emit(Command::Home(axis));
                true
            }
            Action::ZeroAxis(axis) => {
                let p = self.state.work.p_number();
                self.emit(Command::ZeroAxis { p, axis });
                true
            }
            Action::ZeroAll => {
                let p = self.state.work.p_number();
                self.emit(Command::ZeroAll { p });
                true
            }
            Action::SelectProbe(kind) => {
                let probe = &mut self.state.probe;
                probe.kind = Some(kind);
                let command = Command::Probe {
                    kind,
                    travel: probe.max_travel(),
                    feed: probe.feed_rate(),
                };
                self.emit(command);
                result.region = Some(RegionId::ProbeResult);
                true
            }
            Action::CycleProbeParam(param) => {
                self.state.probe.cycle(param);
                result.region = Some(RegionId::ProbeParams);
                true
            }
            Action::SelectFeedOverride(index) => {
                self.state.machine.feed_override = self.state.feeds.select_feed_override(index.into());
                result.region = Some(RegionId::FeedOverride);
                true
            }
            Action::SelectSpindleOverride(index) => {
                self.state.machine.spindle_override = self.state.feeds.select_spindle_override(index.into());
                result.region = Some(RegionId::SpindleOverride);
                true
            }
            Action::SetDirection(direction) => {
                self.state.spindle.direction = direction;
                self.state.machine.spindle_direction = direction;
                result.region = Some(RegionId::SpindleRpm);
                true
            }
            Action::SelectPreset(index) => {
                self.state.spindle.select_preset(index.into());
                let machine = &mut self.state.machine;
                machine.spindle_rpm = self.state.spindle.rpm();
                if machine.spindle_running {
                    let command = Command::SpindleOn {
                        rpm: machine.spindle_rpm,
                        direction: machine.spindle_direction,
                    };
                    self.emit(command);
                }
                result.region = Some(RegionId::SpindleRpm);
                true
            }
            Action::SpindleStart => {
                let machine = &mut self.state.machine;
                let command = Command::SpindleOn {
                    rpm: machine.spindle_rpm,
                    direction: machine.spindle_direction,
                };
                machine.spindle_running = true;
                self.emit(command);
                result.region = Some(RegionId::SpindleRpm);
                true
            }
            Action::SpindleStop => {
                self.state.machine.spindle_running = false;
                self.emit(Command::SpindleOff);
                result.region = Some(RegionId::SpindleRpm);
                true
            }
            Action::RunMacro(index) => {
                self.emit(Command::RunMacro(index));
                true
            }
            Action::SelectFile(row) => self.state.sd_card.select_row(row.into()),
            Action::ScrollBack => self.state.sd_card.scroll_back(),
            Action::ScrollNext => self.state.sd_card.scroll_next(),
            Action::OpenFile => self.open_file(),
            Action::DeleteFile => self.delete_file(),
        };

        if !changed {
            result.group = None;
            result.region = None;
            result.press_feedback = false;
        }
        result
    }

    fn open_file(&mut self) -> bool {
        let Some(name) = self.state.sd_card.selected_file().and_then(|name| FileName::try_from(name).ok()) else {
            return false;
        };
        self.emit(Command::RunFile(&name));
        self.state.machine.set_current_file(&name);
        log_info!(self.log, self.now_ms, "Run {}", name);
        true
    }

    fn delete_file(&mut self) -> bool {
        let Some(name) = self.state.sd_card.remove_selected() else {
            return false;
        };
        self.emit(Command::DeleteFile(&name));
        log_info!(self.log, self.now_ms, "Deleted {}", name);
        true
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{Axis, ProbeKind, ProbeParam, SdCardState, SpindleDirection};
    use crate::testing::RecordingSink;

    struct Fixture {
        state: PendantState,
        sink: RecordingSink,
        log: EventLog,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                state: PendantState::default(),
                sink: RecordingSink::default(),
                log: EventLog::new(),
            }
        }

        fn dispatch(&mut self) -> Dispatch<'_, RecordingSink> {
            Dispatch {
                state: &mut self.state,
                sink: &mut self.sink,
                log: &mut self.log,
                now_ms: 1000,
            }
        }
    }

    #[test]
    fn test_context_button_depends_on_status() {
        let mut fx = Fixture::new();
        fx.state.machine.status = MachineStatus::Alarm;

        let result = fx.dispatch().button(PhysicalButton::Context);
        assert!(result.full_redraw);
        assert_eq!(fx.state.machine.status, MachineStatus::Idle);

        fx.dispatch().button(PhysicalButton::Context);
        assert_eq!(fx.state.machine.status, MachineStatus::Hold);
        assert_eq!(fx.sink.take(), ["$X", "!"]);
    }

    #[test]
    fn test_estop_and_cycle_start() {
        let mut fx = Fixture::new();
        fx.dispatch().button(PhysicalButton::EStop);
        assert_eq!(fx.state.machine.status, MachineStatus::Alarm);
        fx.dispatch().button(PhysicalButton::CycleStart);
        assert_eq!(fx.state.machine.status, MachineStatus::Run);
        assert_eq!(fx.sink.take(), ["!", "~"]);
        assert!(fx.log.iter().any(|e| e.message.as_str() == "CycleStart: RUN"));
    }

    #[test]
    fn test_jog_uses_selected_axis_and_increment() {
        let mut fx = Fixture::new();
        fx.dispatch().jog(EncoderDirection::Clockwise);
        fx.dispatch().jog(EncoderDirection::CounterClockwise);

        fx.dispatch().action(Action::SelectAxis(Axis::Z));
        fx.dispatch().action(Action::SelectIncrement(2));
        fx.dispatch().jog(EncoderDirection::CounterClockwise);

        assert_eq!(fx.sink.take(), ["$J=G91 X1.0 F1000", "$J=G91 X-1.0 F1000", "$J=G91 Z-10.0 F1000"]);
    }

    #[test]
    fn test_selection_redraws_group_only_when_changed() {
        let mut fx = Fixture::new();
        let result = fx.dispatch().action(Action::SelectAxis(Axis::Y));
        assert_eq!(result.group, Some(ButtonGroup::JogAxis));
        assert_eq!(result.region, Some(RegionId::JogReadout));

        let result = fx.dispatch().action(Action::SelectAxis(Axis::Y));
        assert_eq!(result, InputResult::default());
    }

    #[test]
    fn test_increment_follows_table() {
        let mut fx = Fixture::new();
        for (i, expected) in [0.1, 1.0, 10.0, 100.0].iter().enumerate() {
            fx.dispatch().action(Action::SelectIncrement(i as u8));
            assert_eq!(fx.state.jog.increment(), *expected);
        }
    }

    #[test]
    fn test_zero_uses_selected_coordinate_system() {
        let mut fx = Fixture::new();
        let result = fx.dispatch().action(Action::ZeroAxis(Axis::X));
        assert!(result.press_feedback);
        fx.dispatch().action(Action::SelectCoord(1));
        fx.dispatch().action(Action::ZeroAll);
        assert_eq!(fx.sink.take(), ["G10 L20 P1 X0", "G10 L20 P2 X0 Y0 Z0 A0"]);
    }

    #[test]
    fn test_home() {
        let mut fx = Fixture::new();
        fx.dispatch().action(Action::Home(Axis::A));
        assert_eq!(fx.sink.take(), ["$HA"]);
    }

    #[test]
    fn test_spindle_start_stop_and_presets() {
        let mut fx = Fixture::new();
        // Preset while stopped: no command.
        fx.dispatch().action(Action::SelectPreset(0));
        assert!(fx.sink.lines.is_empty());
        assert_eq!(fx.state.machine.spindle_rpm, 6000);

        fx.dispatch().action(Action::SetDirection(SpindleDirection::Reverse));
        let result = fx.dispatch().action(Action::SpindleStart);
        assert!(result.press_feedback);
        assert_eq!(result.region, Some(RegionId::SpindleRpm));
        assert!(fx.state.machine.spindle_running);

        // Preset while running: re-emitted at the new speed.
        fx.dispatch().action(Action::SelectPreset(2));
        fx.dispatch().action(Action::SpindleStop);
        assert!(!fx.state.machine.spindle_running);
        assert_eq!(fx.sink.take(), ["M4 S6000", "M4 S24000", "M5"]);
    }

    #[test]
    fn test_overrides_update_machine() {
        let mut fx = Fixture::new();
        let result = fx.dispatch().action(Action::SelectFeedOverride(4));
        assert_eq!(result.region, Some(RegionId::FeedOverride));
        assert_eq!(fx.state.machine.feed_override, 150);

        fx.dispatch().action(Action::SelectSpindleOverride(0));
        assert_eq!(fx.state.machine.spindle_override, 50);
        assert!(fx.sink.lines.is_empty());
    }

    #[test]
    fn test_probe_select_and_parameters() {
        let mut fx = Fixture::new();
        fx.dispatch().action(Action::CycleProbeParam(ProbeParam::Travel));
        let result = fx.dispatch().action(Action::SelectProbe(ProbeKind::ZSurface));
        assert_eq!(result.group, Some(ButtonGroup::ProbeType));
        assert_eq!(fx.state.probe.kind, Some(ProbeKind::ZSurface));
        assert_eq!(fx.sink.take(), ["G38.2 Z-25.0 F25"]);
    }

    #[test]
    fn test_macro() {
        let mut fx = Fixture::new();
        let result = fx.dispatch().action(Action::RunMacro(7));
        assert!(result.press_feedback);
        assert_eq!(fx.sink.take(), ["$Macros/Run=7"]);
    }

    #[test]
    fn test_sd_open_and_delete() {
        let mut fx = Fixture::new();
        fx.state.sd_card = SdCardState::with_files(&["a.nc", "b.nc", "c.nc", "d.nc", "e.nc"]);

        assert_eq!(fx.dispatch().action(Action::ScrollBack).group, None);
        assert_eq!(fx.dispatch().action(Action::ScrollNext).group, Some(ButtonGroup::FileRows));
        assert_eq!(fx.dispatch().action(Action::ScrollNext).group, None);

        fx.dispatch().action(Action::SelectFile(3));
        fx.dispatch().action(Action::OpenFile);
        assert_eq!(fx.state.machine.current_file.as_str(), "e.nc");

        let result = fx.dispatch().action(Action::DeleteFile);
        assert_eq!(result.group, Some(ButtonGroup::FileRows));
        assert_eq!(fx.state.sd_card.file_count(), 4);
        assert_eq!(fx.state.sd_card.scroll(), 0);
        assert_eq!(fx.sink.take(), ["$SD/Run=/e.nc", "$SD/Delete=/e.nc"]);
    }

    #[test]
    fn test_open_with_no_files_is_ignored() {
        let mut fx = Fixture::new();
        fx.state.sd_card = SdCardState::new();
        let result = fx.dispatch().action(Action::OpenFile);
        assert!(!result.press_feedback);
        assert!(fx.sink.lines.is_empty());
    }
}
