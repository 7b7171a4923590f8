//! Fake machine controller.
//!
//! Interprets the command lines the pendant sends and moves the axes toward
//! their targets at the jog feed rate, so the position readouts change the
//! way they would on a real machine.

use pendant_common::config::JOG_FEED_RATE;
use pendant_common::state::{Axis, MachineStatus, PendantState};

/// Fraction of the probe travel at which the simulated probe touches.
const PROBE_CONTACT: f32 = 0.4;

pub struct MachineSim {
    targets: [f32; 4],
    /// Work offset per axis: work = machine - offset.
    offsets: [f32; 4],
    /// Axis being probed, reported when it stops.
    probing: Option<Axis>,
}

impl MachineSim {
    pub const fn new() -> Self {
        Self {
            targets: [0.0; 4],
            offsets: [0.0; 4],
            probing: None,
        }
    }

    /// Apply one command line from the pendant.
    pub fn apply(
        &mut self,
        line: &str,
        state: &mut PendantState,
    ) {
        let machine = &mut state.machine;
        if line == "!" {
            self.targets = machine.machine_pos;
            self.probing = None;
        } else if let Some(axis) = line.strip_prefix("$H").and_then(axis_of) {
            self.targets[axis.index()] = 0.0;
        } else if let Some(rest) = line.strip_prefix("$J=G91 ") {
            if let Some((axis, distance)) = rest.split_whitespace().next().and_then(word) {
                self.targets[axis.index()] += distance;
            }
        } else if let Some(rest) = line.strip_prefix("G10 L20 ") {
            for (axis, _) in rest.split_whitespace().skip(1).filter_map(word) {
                self.offsets[axis.index()] = machine.machine_pos[axis.index()];
            }
        } else if let Some(rest) = line.strip_prefix("G38.2 ") {
            if let Some((axis, travel)) = rest.split_whitespace().next().and_then(word) {
                self.targets[axis.index()] = machine.machine_pos[axis.index()] + travel * PROBE_CONTACT;
                self.probing = Some(axis);
                state.probe.last_result = None;
            }
        } else if line.starts_with("$SD/Run=") || line.starts_with("$Macros/Run=") {
            machine.status = MachineStatus::Run;
        }
    }

    /// Advance motion by `dt_s` seconds.
    pub fn step(
        &mut self,
        state: &mut PendantState,
        dt_s: f32,
    ) {
        let machine = &mut state.machine;
        let max_step = JOG_FEED_RATE as f32 / 60.0 * dt_s;
        let mut moving = false;

        for i in 0..4 {
            let delta = self.targets[i] - machine.machine_pos[i];
            if delta.abs() > f32::EPSILON {
                moving = true;
                machine.machine_pos[i] += delta.clamp(-max_step, max_step);
            }
            machine.work_pos[i] = machine.machine_pos[i] - self.offsets[i];
        }

        if !moving && let Some(axis) = self.probing.take() {
            state.probe.last_result = Some(machine.work(axis));
        }
    }
}

fn axis_of(letter: &str) -> Option<Axis> {
    match letter {
        "X" => Some(Axis::X),
        "Y" => Some(Axis::Y),
        "Z" => Some(Axis::Z),
        "A" => Some(Axis::A),
        _ => None,
    }
}

/// Split a word like `X-1.5` into its axis and value.
fn word(word: &str) -> Option<(Axis, f32)> {
    let (letter, value) = word.split_at_checked(1)?;
    Some((axis_of(letter)?, value.parse().ok()?))
}

// =============================================================================
// Unit Tests
// =============================================================================
