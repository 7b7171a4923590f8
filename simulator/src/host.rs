//! Desktop stand-ins for the serial link, preferences store and heap probe.

use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

use pendant_common::{CommandSink, HeapMonitor, Preferences};

// =============================================================================
// Command Sink
// =============================================================================

/// Prints every command and keeps it for the fake machine.
#[derive(Default)]
pub struct StdoutSink {
    sent: Vec<String>,
}

impl StdoutSink {
    /// Commands sent since the last drain.
    pub fn drain(&mut self) -> Vec<String> { std::mem::take(&mut self.sent) }
}

impl CommandSink for StdoutSink {
    fn send(
        &mut self,
        line: &str,
    ) {
        println!("TX {line}");
        self.sent.push(line.to_owned());
    }
}

// =============================================================================
// Preferences
// =============================================================================

/// `namespace.key=value` lines in a text file.
///
/// A missing or unreadable file starts empty. Write failures are reported and
/// otherwise ignored; the value stays in memory for this session.
pub struct FilePreferences {
    path: PathBuf,
    values: BTreeMap<String, i32>,
}

impl FilePreferences {
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let values = fs::read_to_string(&path)
            .map(|text| {
                text.lines()
                    .filter_map(|line| {
                        let (key, value) = line.split_once('=')?;
                        Some((key.trim().to_owned(), value.trim().parse().ok()?))
                    })
                    .collect()
            })
            .unwrap_or_default();
        Self { path, values }
    }

    fn save(&self) {
        let text: String = self.values.iter().map(|(k, v)| format!("{k}={v}\n")).collect();
        if let Err(e) = fs::write(&self.path, text) {
            eprintln!("Failed to save {}: {e}", self.path.display());
        }
    }
}

impl Preferences for FilePreferences {
    fn load_i32(
        &mut self,
        namespace: &str,
        key: &str,
    ) -> Option<i32> {
        self.values.get(&format!("{namespace}.{key}")).copied()
    }

    fn store_i32(
        &mut self,
        namespace: &str,
        key: &str,
        value: i32,
    ) {
        self.values.insert(format!("{namespace}.{key}"), value);
        self.save();
    }
}

// =============================================================================
// Heap
// =============================================================================

/// Free heap reported to the render cache. `M` toggles the low-memory mode.
#[derive(Default)]
pub struct SimHeap {
    pub low_memory: bool,
}

impl SimHeap {
    const NORMAL: usize = 200 * 1024;
    const LOW: usize = 16 * 1024;
}

impl HeapMonitor for SimHeap {
    fn free_heap(&self) -> usize { if self.low_memory { Self::LOW } else { Self::NORMAL } }
}
