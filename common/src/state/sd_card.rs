//! SD card file list with selection and scrolling.
//!
//! Scrolling keeps `scroll + SD_VISIBLE_ROWS <= file_count` whenever the list
//! is longer than one page, and `scroll == 0` otherwise.

use heapless::{String, Vec};

use super::copy_truncated;
use crate::config::{SD_MAX_FILES, SD_NAME_LEN, SD_VISIBLE_ROWS};

/// One file name.
pub type FileName = String<SD_NAME_LEN>;

/// File list, selection and scroll position.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SdCardState {
    files: Vec<FileName, SD_MAX_FILES>,
    selected: usize,
    scroll: usize,
}

impl SdCardState {
    /// Empty list.
    pub const fn new() -> Self {
        Self {
            files: Vec::new(),
            selected: 0,
            scroll: 0,
        }
    }

    /// List holding `names` (extra names past capacity are dropped).
    pub fn with_files(names: &[&str]) -> Self {
        let mut state = Self::new();
        for name in names {
            if !state.push_file(name) {
                break;
            }
        }
        state
    }

    /// Append a file name. Returns `false` when the list is full.
    pub fn push_file(
        &mut self,
        name: &str,
    ) -> bool {
        let mut entry = FileName::new();
        copy_truncated(&mut entry, name);
        self.files.push(entry).is_ok()
    }

    #[inline]
    pub fn file_count(&self) -> usize { self.files.len() }

    #[inline]
    pub const fn scroll(&self) -> usize { self.scroll }

    #[inline]
    pub const fn selected(&self) -> usize { self.selected }

    /// File name at absolute index.
    pub fn file(
        &self,
        index: usize,
    ) -> Option<&str> {
        self.files.get(index).map(|name| name.as_str())
    }

    /// Name of the selected file.
    pub fn selected_file(&self) -> Option<&str> { self.file(self.selected) }

    /// File shown in visible row `row`, with its absolute index.
    pub fn visible(
        &self,
        row: usize,
    ) -> Option<(usize, &str)> {
        if row >= SD_VISIBLE_ROWS {
            return None;
        }
        let index = self.scroll + row;
        self.file(index).map(|name| (index, name))
    }

    /// Largest valid scroll offset.
    #[inline]
    fn max_scroll(&self) -> usize { self.files.len().saturating_sub(SD_VISIBLE_ROWS) }

    /// Select the file in visible row `row`. Empty rows are ignored.
    /// Returns `true` if the selection changed.
    pub fn select_row(
        &mut self,
        row: usize,
    ) -> bool {
        match self.visible(row) {
            Some((index, _)) if index != self.selected => {
                self.selected = index;
                true
            }
            _ => false,
        }
    }

    /// Scroll up one row. No-op at the top.
    pub fn scroll_back(&mut self) -> bool {
        if self.scroll == 0 {
            return false;
        }
        self.scroll -= 1;
        true
    }

    /// Scroll down one row. No-op once the last file is visible.
    pub fn scroll_next(&mut self) -> bool {
        if self.scroll >= self.max_scroll() {
            return false;
        }
        self.scroll += 1;
        true
    }

    /// Remove the selected file and re-clamp selection and scroll.
    pub fn remove_selected(&mut self) -> Option<FileName> {
        if self.selected >= self.files.len() {
            return None;
        }
        let removed = self.files.remove(self.selected);
        self.selected = self.selected.min(self.files.len().saturating_sub(1));
        self.scroll = self.scroll.min(self.max_scroll());
        Some(removed)
    }
}

impl Default for SdCardState {
    fn default() -> Self { Self::with_files(&["project1.gcode", "test_cut.nc", "enclosure.gcode"]) }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn six_files() -> SdCardState { SdCardState::with_files(&["a.nc", "b.nc", "c.nc", "d.nc", "e.nc", "f.nc"]) }

    fn assert_scroll_invariant(sd: &SdCardState) {
        if sd.file_count() >= SD_VISIBLE_ROWS {
            assert!(sd.scroll() + SD_VISIBLE_ROWS <= sd.file_count());
        } else {
            assert_eq!(sd.scroll(), 0);
        }
    }

    #[test]
    fn test_back_is_noop_at_top() {
        let mut sd = six_files();
        assert!(!sd.scroll_back());
        assert_eq!(sd.scroll(), 0);
    }

    #[test]
    fn test_next_stops_at_last_page() {
        let mut sd = six_files();
        assert!(sd.scroll_next());
        assert!(sd.scroll_next());
        assert!(!sd.scroll_next());
        assert_eq!(sd.scroll() + SD_VISIBLE_ROWS, sd.file_count());
        assert_scroll_invariant(&sd);
    }

    #[test]
    fn test_short_list_never_scrolls() {
        let mut sd = SdCardState::default();
        assert!(!sd.scroll_next());
        assert!(!sd.scroll_back());
        assert_scroll_invariant(&sd);
    }

    #[test]
    fn test_scroll_invariant_over_navigation() {
        let mut sd = six_files();
        for step in 0..20 {
            if step % 3 == 0 {
                sd.scroll_back();
            } else {
                sd.scroll_next();
            }
            assert_scroll_invariant(&sd);
        }
    }

    #[test]
    fn test_select_row_uses_scroll() {
        let mut sd = six_files();
        sd.scroll_next();
        assert!(sd.select_row(2));
        assert_eq!(sd.selected_file(), Some("d.nc"));
        assert!(!sd.select_row(2));
    }

    #[test]
    fn test_select_empty_row_ignored() {
        let mut sd = SdCardState::default();
        assert!(!sd.select_row(3));
        assert_eq!(sd.selected(), 0);
    }

    #[test]
    fn test_remove_reclamps() {
        let mut sd = six_files();
        sd.scroll_next();
        sd.scroll_next();
        sd.select_row(3);
        assert_eq!(sd.remove_selected().as_deref(), Some("f.nc"));
        assert_eq!(sd.selected_file(), Some("e.nc"));
        assert_eq!(sd.scroll(), 1);
        assert_scroll_invariant(&sd);
    }

    #[test]
    fn test_remove_from_empty() {
        let mut sd = SdCardState::new();
        assert!(sd.remove_selected().is_none());
    }

    #[test]
    fn test_capacity_and_truncation() {
        let mut sd = SdCardState::new();
        for _ in 0..SD_MAX_FILES {
            assert!(sd.push_file("x.nc"));
        }
        assert!(!sd.push_file("overflow.nc"));

        let long = "n".repeat(SD_NAME_LEN + 8);
        let sd = SdCardState::with_files(&[long.as_str()]);
        assert_eq!(sd.file(0).map(str::len), Some(SD_NAME_LEN));
    }
}
