//! CNC Pendant Simulator for Windows/Desktop.
//!
//! Runs the pendant UI against the embedded-graphics-simulator window.
//!
//! | Input | Pendant |
//! |-------|---------|
//! | Left mouse button | Touch |
//! | `1` / `2` / `3` | E-Stop / context / cycle start buttons |
//! | Left / Right | One encoder detent counter-clockwise / clockwise |
//! | `M` | Toggle simulated low memory |
//! | `Esc` | Quit |

// Crate-level lints
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_sign_loss)]

mod host;
mod machine;
mod panel;
mod timing;

use std::collections::VecDeque;
use std::thread;
use std::time::Instant;

use embedded_graphics_simulator::sdl2::{Keycode, MouseButton};
use embedded_graphics_simulator::{OutputSettingsBuilder, SimulatorEvent, Window};
use pendant_common::input::EncoderPins;
use pendant_common::{InputSample, Pendant};

use crate::host::{FilePreferences, SimHeap, StdoutSink};
use crate::machine::MachineSim;
use crate::panel::SimPanel;
use crate::timing::FRAME_TIME;

const PREFS_PATH: &str = "pendant-prefs.txt";

/// Encoder pins at rest (both pulled up).
const ENCODER_REST: EncoderPins = EncoderPins { clk: true, dt: true };

fn main() {
    let output_settings = OutputSettingsBuilder::new().scale(2).build();
    let mut window = Window::new("CNC Pendant Sim", &output_settings);

    let start = Instant::now();
    let mut pendant = Pendant::new(
        SimPanel::new(),
        StdoutSink::default(),
        FilePreferences::open(PREFS_PATH),
        SimHeap::default(),
        0,
    );
    let mut machine = MachineSim::new();

    let mut buttons = [false; 3];
    let mut encoder: VecDeque<EncoderPins> = VecDeque::new();
    let mut log_seq = 0u32;
    let mut last_ms = 0u64;

    window.update(pendant.panel().display());

    loop {
        let frame_start = Instant::now();
        let now_ms = start.elapsed().as_millis() as u64;

        for ev in window.events() {
            match ev {
                SimulatorEvent::Quit => return,
                SimulatorEvent::KeyDown { keycode, repeat, .. } => {
                    if repeat {
                        continue;
                    }
                    match keycode {
                        Keycode::Escape => return,
                        Keycode::Num1 => buttons[0] = true,
                        Keycode::Num2 => buttons[1] = true,
                        Keycode::Num3 => buttons[2] = true,
                        // One detent: CLK falls then rises; DT high means clockwise.
                        Keycode::Left | Keycode::Right => {
                            let dt = keycode == Keycode::Right;
                            encoder.push_back(EncoderPins { clk: false, dt });
                            encoder.push_back(EncoderPins { clk: true, dt });
                        }
                        Keycode::M => {
                            let heap = pendant.heap_mut();
                            heap.low_memory = !heap.low_memory;
                            println!("Low memory: {}", if heap.low_memory { "ON" } else { "OFF" });
                            pendant.redraw(now_ms);
                        }
                        _ => {}
                    }
                }
                SimulatorEvent::KeyUp { keycode, .. } => match keycode {
                    Keycode::Num1 => buttons[0] = false,
                    Keycode::Num2 => buttons[1] = false,
                    Keycode::Num3 => buttons[2] = false,
                    _ => {}
                },
                SimulatorEvent::MouseButtonDown {
                    mouse_btn: MouseButton::Left,
                    point,
                } => pendant.panel_mut().press(point),
                SimulatorEvent::MouseMove { point } => pendant.panel_mut().drag(point),
                SimulatorEvent::MouseButtonUp {
                    mouse_btn: MouseButton::Left,
                    ..
                } => pendant.panel_mut().release(),
                _ => {}
            }
        }

        let sample = InputSample {
            estop: buttons[0],
            context: buttons[1],
            cycle_start: buttons[2],
            encoder: Some(encoder.pop_front().unwrap_or(ENCODER_REST)),
        };
        pendant.tick(sample, now_ms);

        // Feed sent commands to the fake machine, then advance its motion.
        for line in pendant.sink_mut().drain() {
            machine.apply(&line, pendant.state_mut());
        }
        machine.step(pendant.state_mut(), now_ms.saturating_sub(last_ms) as f32 / 1000.0);
        last_ms = now_ms;

        for entry in pendant.log().since(log_seq) {
            println!("[{:>8}] {} {}", entry.timestamp_ms, entry.level.prefix(), entry.message);
        }
        log_seq = pendant.log().next_seq();

        window.update(pendant.panel().display());

        let elapsed = frame_start.elapsed();
        if let Some(remaining) = FRAME_TIME.checked_sub(elapsed) {
            thread::sleep(remaining);
        }
    }
}
