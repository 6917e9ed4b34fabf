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

//! Selection over a unified row-space: rows `0..scrollback.len()` are
//! scrollback (oldest first), rows `scrollback.len()..scrollback.len()+
//! rows` are the live grid. A pure data/logic layer with no rendering or
//! I/O, in the spirit of the corpus's standalone selection modules.

use crate::grid::Grid;
use crate::scrollback::Scrollback;

/// A position in the unified row-space.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct RowPos {
    pub row: usize,
    pub col: usize,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Selection {
    anchor: Option<RowPos>,
    focus: Option<RowPos>,
    active: bool,
}

impl Selection {
    pub fn new() -> Self {
        Selection::default()
    }

    pub fn begin(&mut self, row: usize, col: usize) {
        let pos = RowPos { row, col };
        self.anchor = Some(pos);
        self.focus = Some(pos);
        self.active = true;
    }

    pub fn extend(&mut self, row: usize, col: usize) {
        if self.active {
            self.focus = Some(RowPos { row, col });
        }
    }

    pub fn end(&mut self) {
        self.active = false;
    }

    pub fn clear(&mut self) {
        self.anchor = None;
        self.focus = None;
        self.active = false;
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn anchor(&self) -> Option<RowPos> {
        self.anchor
    }

    pub fn focus(&self) -> Option<RowPos> {
        self.focus
    }

    /// Walk the selected rows and emit non-blank cell bytes, joining rows
    /// with `\n`. Column ranges per row: first row
    /// `[sel_start_col, cols-1]`, last row `[0, sel_end_col]`, a
    /// single-row selection `[sel_start_col, sel_end_col]`, middle rows
    /// `[0, cols-1]`. `sel_start_col`/`sel_end_col` are whichever column
    /// belongs to the earlier-row/later-row endpoint, not simply
    /// `min`/`max` of the two columns.
    /// The selection's endpoints in row order (earlier row first), not
    /// necessarily in anchor/focus (drag) order.
    fn bounds(&self) -> Option<(RowPos, RowPos)> {
        let (anchor, focus) = (self.anchor?, self.focus?);
        Some(if anchor.row < focus.row {
            (anchor, focus)
        } else if focus.row < anchor.row {
            (focus, anchor)
        } else {
            let (lo, hi) = if anchor.col <= focus.col {
                (anchor.col, focus.col)
            } else {
                (focus.col, anchor.col)
            };
            (
                RowPos {
                    row: anchor.row,
                    col: lo,
                },
                RowPos {
                    row: anchor.row,
                    col: hi,
                },
            )
        })
    }

    /// The selected column range `[start, end]` within unified row `row`,
    /// or `None` if `row` falls outside the selection. First row
    /// `[sel_start_col, cols-1]`, last row `[0, sel_end_col]`, a
    /// single-row selection `[sel_start_col, sel_end_col]`, middle rows
    /// `[0, cols-1]`.
    fn row_range(&self, row: usize, cols: usize) -> Option<(usize, usize)> {
        let (first, last) = self.bounds()?;
        if row < first.row || row > last.row || cols == 0 {
            return None;
        }
        let (start, end) = if first.row == last.row {
            (first.col, last.col)
        } else if row == first.row {
            (first.col, cols - 1)
        } else if row == last.row {
            (0, last.col)
        } else {
            (0, cols - 1)
        };
        Some((start, end.min(cols - 1)))
    }

    /// Whether unified position `(row, col)` falls inside the current
    /// selection, for renderers to decide whether to invert a cell.
    pub fn contains(&self, row: usize, col: usize, cols: usize) -> bool {
        match self.row_range(row, cols) {
            Some((start, end)) => col >= start && col <= end,
            None => false,
        }
    }

    pub fn materialize(&self, grid: &Grid, scrollback: &Scrollback) -> Vec<u8> {
        let Some((first, last)) = self.bounds() else {
            return Vec::new();
        };

        let cols = grid.cols();
        if cols == 0 {
            return Vec::new();
        }

        let mut out = Vec::new();
        for r in first.row..=last.row {
            let Some((start, end)) = self.row_range(r, cols) else {
                continue;
            };

            if r > first.row {
                out.push(b'\n');
            }

            let row_cells = resolve_row(r, grid, scrollback);
            let Some(row_cells) = row_cells else { continue };
            for cell in row_cells.iter().take(end + 1).skip(start) {
                if !cell.is_blank() {
                    out.push(cell.ch());
                }
            }
        }
        out
    }
}

/// Look up unified row `row` (scrollback rows first, then the live grid),
/// shared by [`Selection::materialize`] and the display backend's
/// scrollback-aware rendering.
pub(crate) fn resolve_row<'a>(
    row: usize,
    grid: &'a Grid,
    scrollback: &'a Scrollback,
) -> Option<&'a [crate::cell::Cell]> {
    if row < scrollback.len() {
        Some(scrollback.at(row))
    } else {
        let live_row = row - scrollback.len();
        if live_row < grid.rows() {
            Some(grid.row(live_row))
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::Cell;

    fn grid_with_text(rows: usize, cols: usize, lines: &[&str]) -> Grid {
        let mut g = Grid::new(rows, cols);
        for (r, line) in lines.iter().enumerate() {
            for (c, b) in line.bytes().enumerate() {
                g.write_cell(r, c, Cell::new(b, 0, 0));
            }
        }
        g
    }

    #[test]
    fn single_row_selection() {
        let g = grid_with_text(2, 10, &["HELLO"]);
        let sb = Scrollback::new();
        let mut sel = Selection::new();
        sel.begin(0, 1);
        sel.extend(0, 3);
        sel.end();
        assert_eq!(sel.materialize(&g, &sb), b"ELL");
    }

    #[test]
    fn reversed_drag_uses_endpoint_columns_not_min_max() {
        // dragging from a later row back to an earlier row with a
        // larger column should still take the earlier row's column as
        // the start of that row's range.
        let g = grid_with_text(3, 5, &["ABCDE", "FGHIJ"]);
        let sb = Scrollback::new();
        let mut sel = Selection::new();
        sel.begin(1, 1); // focus row later in the drag
        sel.extend(0, 3); // anchor at the final mouse-up position
        sel.end();
        let text = sel.materialize(&g, &sb);
        assert_eq!(text, b"DE\nFG");
    }

    #[test]
    fn spans_scrollback_and_live_grid() {
        let g = grid_with_text(2, 5, &["LIVE0", "LIVE1"]);
        let mut sb = Scrollback::new();
        let mut row = [Cell::blank(); crate::grid::MAX_COLS];
        for (c, b) in b"OLD".iter().enumerate() {
            row[c] = Cell::new(*b, 0, 0);
        }
        sb.push(row);

        let mut sel = Selection::new();
        sel.begin(0, 0);
        sel.extend(1, 1);
        sel.end();
        assert_eq!(sel.materialize(&g, &sb), b"OLD\nLI");
    }

    #[test]
    fn empty_selection_materializes_to_empty() {
        let g = grid_with_text(1, 5, &["ABCDE"]);
        let sb = Scrollback::new();
        let sel = Selection::new();
        assert!(sel.materialize(&g, &sb).is_empty());
    }

    #[test]
    fn contains_matches_the_same_ranges_materialize_uses() {
        let mut sel = Selection::new();
        sel.begin(0, 2);
        sel.extend(1, 1);
        sel.end();
        // row 0 (first row): [2, cols-1]; row 1 (last row): [0, 1].
        assert!(!sel.contains(0, 1, 5));
        assert!(sel.contains(0, 2, 5));
        assert!(sel.contains(0, 4, 5));
        assert!(sel.contains(1, 0, 5));
        assert!(sel.contains(1, 1, 5));
        assert!(!sel.contains(1, 2, 5));
        assert!(!sel.contains(2, 0, 5), "outside the selected row range");
    }

    #[test]
    fn contains_is_false_with_no_active_selection() {
        let sel = Selection::new();
        assert!(!sel.contains(0, 0, 5));
    }
}
