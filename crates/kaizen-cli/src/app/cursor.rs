//! Selection cursor shared by the results table and the episode lists.

/// Rows jumped by page up / page down.
pub const PAGE_STEP: isize = 10;

/// Index of the highlighted row, if the list has any rows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Cursor {
    selected: Option<usize>,
}

impl Cursor {
    /// Cursor on the first row of a list of `len` rows.
    pub const fn at_start(len: usize) -> Self {
        Self {
            selected: if len == 0 { None } else { Some(0) },
        }
    }

    /// Highlighted row.
    pub const fn selected(self) -> Option<usize> {
        self.selected
    }

    /// Move by `delta` rows, clamped to the list.
    pub fn step(&mut self, delta: isize, len: usize) {
        if len == 0 {
            self.selected = None;
            return;
        }
        let current = self.selected.unwrap_or(0);
        let next = current.saturating_add_signed(delta).min(len - 1);
        self.selected = Some(next);
    }

    /// Jump to the first row.
    pub const fn first(&mut self, len: usize) {
        *self = Self::at_start(len);
    }

    /// Jump to the last row.
    pub const fn last(&mut self, len: usize) {
        self.selected = if len == 0 { None } else { Some(len - 1) };
    }
}
