// Copyright 2025 Google LLC
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! A screen buffer pairs a `Grid` with its own cursor and saved-cursor
//! slot. The engine owns exactly two of these (primary, alternate) and
//! dispatches through whichever is active, the way the teacher crate's
//! `Screen` wraps a `Grid` enum and lets the engine pick a variant —
//! except here both buffers share one concrete `Grid` type, since the
//! only structural difference between them is whether scrolling retires
//! rows to scrollback, which is the engine's call to make, not the
//! buffer's.

use crate::grid::Grid;

/// A cursor position. `col == cols` is a transient state that exists only
/// just before a wrapping write; every other caller should see
/// `col < cols`.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct Pos {
    pub row: usize,
    pub col: usize,
}

impl Pos {
    pub fn origin() -> Self {
        Pos { row: 0, col: 0 }
    }

    pub fn clamp_to(&mut self, rows: usize, cols: usize) {
        self.row = self.row.min(rows.saturating_sub(1));
        self.col = self.col.min(cols.saturating_sub(1));
    }
}

pub struct ScreenBuffer {
    pub grid: Grid,
    pub cursor: Pos,
    pub saved_cursor: Option<Pos>,
}

impl ScreenBuffer {
    pub fn new(rows: usize, cols: usize) -> Self {
        ScreenBuffer {
            grid: Grid::new(rows, cols),
            cursor: Pos::origin(),
            saved_cursor: None,
        }
    }

    pub fn resize(&mut self, rows: usize, cols: usize) {
        self.grid.resize(rows, cols);
        self.cursor.clamp_to(rows, cols);
    }

    /// Clear the buffer and reset its cursor; used when entering the
    /// alternate screen, which is always shown blank.
    pub fn reset(&mut self) {
        self.grid.clear_all();
        self.cursor = Pos::origin();
    }

    pub fn save_cursor(&mut self) {
        self.saved_cursor = Some(self.cursor);
    }

    /// Restore the saved cursor, clamped to the current grid size. A
    /// restore with no prior save is a no-op (there is nothing to
    /// restore to).
    pub fn restore_cursor(&mut self) {
        if let Some(mut pos) = self.saved_cursor {
            pos.clamp_to(self.grid.rows(), self.grid.cols());
            self.cursor = pos;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn save_restore_round_trips() {
        let mut s = ScreenBuffer::new(10, 10);
        s.cursor = Pos { row: 3, col: 4 };
        s.save_cursor();
        s.cursor = Pos { row: 9, col: 9 };
        s.restore_cursor();
        assert_eq!(s.cursor, Pos { row: 3, col: 4 });
    }

    #[test]
    fn restore_with_no_save_is_noop() {
        let mut s = ScreenBuffer::new(10, 10);
        s.cursor = Pos { row: 2, col: 2 };
        s.restore_cursor();
        assert_eq!(s.cursor, Pos { row: 2, col: 2 });
    }

    #[test]
    fn reset_clears_and_homes_cursor() {
        let mut s = ScreenBuffer::new(5, 5);
        s.grid.write_cell(0, 0, crate::cell::Cell::new(b'x', 0, 0));
        s.cursor = Pos { row: 3, col: 3 };
        s.reset();
        assert_eq!(s.cursor, Pos::origin());
        assert!(s.grid.cell(0, 0).is_blank());
    }
}
