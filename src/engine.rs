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

//! The terminal state engine: an escape-sequence parser driving a pair of
//! screen buffers, a scrollback ring, and mode state, the way the teacher
//! crate's `Term { parser, state }` pairs a `vte::Parser` with a `State`
//! that implements `vte::Perform`. Tests construct an `Engine`, feed it
//! bytes, and inspect the grid directly; no PTY or display dependency.

use crate::cell::Cell;
use crate::grid::Grid;
use crate::modes::{Modes, MouseMode, Sgr};
use crate::palette::{DEFAULT_BG, DEFAULT_FG};
use crate::screen::{Pos, ScreenBuffer};
use crate::scrollback::Scrollback;
use crate::selection::Selection;

use tracing::warn;

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum ActiveBuffer {
    Primary,
    Alternate,
}

pub struct Engine {
    parser: vte::Parser,
    state: EngineState,
    selection: Selection,
}

/// Everything the escape parser touches. Split out from `Engine` so the
/// `vte::Parser` can hold `&mut EngineState` while `Engine` still owns the
/// parser itself.
struct EngineState {
    primary: ScreenBuffer,
    alternate: ScreenBuffer,
    active: ActiveBuffer,
    scrollback: Scrollback,
    scroll_region: crate::modes::ScrollRegion,
    sgr: Sgr,
    modes: Modes,
}

impl EngineState {
    fn new(rows: usize, cols: usize, scrollback_lines: usize) -> Self {
        EngineState {
            primary: ScreenBuffer::new(rows, cols),
            alternate: ScreenBuffer::new(rows, cols),
            active: ActiveBuffer::Primary,
            scrollback: Scrollback::with_capacity(scrollback_lines),
            scroll_region: crate::modes::ScrollRegion::full(rows),
            sgr: Sgr::default(),
            modes: Modes::default(),
        }
    }

    fn active(&self) -> &ScreenBuffer {
        match self.active {
            ActiveBuffer::Primary => &self.primary,
            ActiveBuffer::Alternate => &self.alternate,
        }
    }

    fn active_mut(&mut self) -> &mut ScreenBuffer {
        match self.active {
            ActiveBuffer::Primary => &mut self.primary,
            ActiveBuffer::Alternate => &mut self.alternate,
        }
    }

    fn rows(&self) -> usize {
        self.active().grid.rows()
    }

    fn cols(&self) -> usize {
        self.active().grid.cols()
    }

    /// Newline semantics shared by `\n` and wrap-on-write: reset column,
    /// advance row, and scroll the region if that falls off the bottom.
    fn newline(&mut self) {
        let bottom = self.scroll_region.bottom;
        let top = self.scroll_region.top;
        let active_buf = self.active;
        let buf = self.active_mut();
        buf.cursor.col = 0;
        buf.cursor.row += 1;
        if buf.cursor.row > bottom {
            let retired = buf.grid.scroll_up_in_region(top, bottom);
            buf.cursor.row = bottom;
            if active_buf == ActiveBuffer::Primary {
                self.scrollback.push(retired);
            }
        }
    }

    fn write_printable(&mut self, ch: u8) {
        let cols = self.cols();
        let (fg, bg) = (self.sgr.fg, self.sgr.bg);

        if self.active().cursor.col >= cols {
            // Pending overwrite state: wrap is off and a prior write
            // already filled the rightmost column.
            let row = self.active().cursor.row;
            self.active_mut()
                .grid
                .write_cell(row, cols - 1, Cell::new(ch, fg, bg));
            return;
        }

        let cur = self.active().cursor;
        self.active_mut()
            .grid
            .write_cell(cur.row, cur.col, Cell::new(ch, fg, bg));
        self.active_mut().cursor.col = cur.col + 1;

        if self.active().cursor.col == cols && self.modes.wrap {
            self.newline();
        }
        // else: col stays at cols, the pending-overwrite state above.
    }

    fn backspace(&mut self) {
        let buf = self.active_mut();
        if buf.cursor.col > 0 {
            buf.cursor.col -= 1;
            let (row, col) = (buf.cursor.row, buf.cursor.col);
            buf.grid
                .write_cell(row, col, Cell::new(b' ', DEFAULT_FG, DEFAULT_BG));
        }
    }

    fn cursor_up(&mut self, n: usize) {
        let buf = self.active_mut();
        buf.cursor.row = buf.cursor.row.saturating_sub(n);
    }

    fn cursor_down(&mut self, n: usize) {
        let rows = self.rows();
        let buf = self.active_mut();
        buf.cursor.row = (buf.cursor.row + n).min(rows.saturating_sub(1));
    }

    fn cursor_right(&mut self, n: usize) {
        let cols = self.cols();
        let buf = self.active_mut();
        buf.cursor.col = (buf.cursor.col + n).min(cols.saturating_sub(1));
    }

    fn cursor_left(&mut self, n: usize) {
        let buf = self.active_mut();
        buf.cursor.col = buf.cursor.col.saturating_sub(n);
    }

    fn cursor_to(&mut self, row: usize, col: usize) {
        let (rows, cols) = (self.rows(), self.cols());
        let buf = self.active_mut();
        buf.cursor = Pos { row, col };
        buf.cursor.clamp_to(rows, cols);
    }

    fn erase_in_display(&mut self, code: u16) {
        let (row, col) = {
            let c = self.active().cursor;
            (c.row, c.col)
        };
        match code {
            0 => self.active_mut().grid.clear_below(row, col),
            1 => self.active_mut().grid.clear_above(row, col),
            2 => {
                self.active_mut().grid.clear_all();
                self.active_mut().cursor = Pos::origin();
            }
            _ => warn!("unhandled 'CSI {code} J'"),
        }
    }

    fn erase_in_line(&mut self, code: u16) {
        let (row, col) = {
            let c = self.active().cursor;
            (c.row, c.col)
        };
        match code {
            0 => self.active_mut().grid.clear_to_eol(row, col),
            _ => warn!("unhandled 'CSI {code} K'"),
        }
    }

    fn sgr(&mut self, codes: &[u16]) {
        for &code in codes {
            match code {
                0 => self.sgr = Sgr::default(),
                30..=37 => self.sgr.fg = (code - 30) as u8,
                40..=47 => self.sgr.bg = (code - 40) as u8,
                90..=97 => self.sgr.fg = (code - 90) as u8 + 8,
                100..=107 => self.sgr.bg = (code - 100) as u8 + 8,
                _ => warn!("unhandled 'CSI {code} m'"),
            }
        }
    }

    fn set_scroll_region(&mut self, top: usize, bottom: usize) {
        let rows = self.rows();
        let mut region = crate::modes::ScrollRegion { top, bottom };
        region.clamp_to(rows);
        self.scroll_region = region;
    }

    fn insert_blanks(&mut self, n: usize) {
        let (row, col) = {
            let c = self.active().cursor;
            (c.row, c.col)
        };
        self.active_mut().grid.insert_blanks(row, col, n);
    }

    fn save_cursor(&mut self) {
        self.active_mut().save_cursor();
    }

    fn restore_cursor(&mut self) {
        self.active_mut().restore_cursor();
    }

    fn enter_alternate(&mut self) {
        self.alternate.reset();
        self.active = ActiveBuffer::Alternate;
    }

    fn leave_alternate(&mut self) {
        self.active = ActiveBuffer::Primary;
        self.primary.cursor = Pos::origin();
    }

    fn set_mouse_mode(&mut self, mode: MouseMode) {
        self.modes.mouse_enabled = true;
        self.modes.mouse_mode = mode;
    }

    fn clear_mouse_mode(&mut self) {
        self.modes.mouse_enabled = false;
        self.modes.mouse_mode = MouseMode::Off;
    }
}

impl vte::Perform for EngineState {
    fn print(&mut self, c: char) {
        if c.is_ascii() {
            self.write_printable(c as u8);
        }
    }

    fn execute(&mut self, byte: u8) {
        match byte {
            b'\n' => self.newline(),
            b'\r' => self.active_mut().cursor.col = 0,
            0x08 => self.backspace(),
            0x09 => {} // tab: no-op at parse time, see module docs.
            _ => {}
        }
    }

    fn hook(&mut self, _params: &vte::Params, _intermediates: &[u8], _ignore: bool, _action: char) {
    }
    fn put(&mut self, _byte: u8) {}
    fn unhook(&mut self) {}
    fn osc_dispatch(&mut self, _params: &[&[u8]], _bell_terminated: bool) {}

    #[rustfmt::skip]
    fn csi_dispatch(&mut self, params: &vte::Params, intermediates: &[u8], ignore: bool, action: char) {
        if ignore {
            warn!("malformed CSI seq");
            return;
        }

        let private = intermediates == [b'?'];
        let mut iter = params.iter();

        match action {
            'A' => self.cursor_up(p1_or(params, 1) as usize),
            'B' => self.cursor_down(p1_or(params, 1) as usize),
            'C' => self.cursor_right(p1_or(params, 1) as usize),
            'D' => self.cursor_left(p1_or(params, 1) as usize),
            'H' => {
                let row = first_or(iter.next(), 1);
                let col = first_or(iter.next(), 1);
                self.cursor_to(row.saturating_sub(1) as usize, col.saturating_sub(1) as usize);
            }
            'J' => {
                if params.is_empty() {
                    self.erase_in_display(0);
                } else {
                    for code in iter.by_ref() {
                        self.erase_in_display(code.first().copied().unwrap_or(0));
                    }
                }
            }
            'K' => {
                if params.is_empty() {
                    self.erase_in_line(0);
                } else {
                    for code in iter.by_ref() {
                        self.erase_in_line(code.first().copied().unwrap_or(0));
                    }
                }
            }
            'm' => {
                if params.is_empty() {
                    self.sgr(&[0]);
                } else {
                    let codes: Vec<u16> = params.iter().map(|p| p.first().copied().unwrap_or(0)).collect();
                    self.sgr(&codes);
                }
            }
            'r' => {
                let top = first_or(iter.next(), 1);
                let bottom = first_or(iter.next(), self.rows() as u16);
                self.set_scroll_region(top.saturating_sub(1) as usize, bottom.saturating_sub(1) as usize);
            }
            '@' => self.insert_blanks(p1_or(params, 1) as usize),
            'h' if private => {
                for code in iter.by_ref() {
                    match code {
                        [7] => self.modes.wrap = true,
                        [25] => {}
                        [1000] => self.set_mouse_mode(MouseMode::Normal),
                        [1002] => self.set_mouse_mode(MouseMode::ButtonEvent),
                        [1003] => self.set_mouse_mode(MouseMode::AnyEvent),
                        [1049] => self.enter_alternate(),
                        [1] => {}
                        _ => warn!("unhandled 'CSI ? {code:?} h'"),
                    }
                }
            }
            'l' if private => {
                for code in iter {
                    match code {
                        [7] => self.modes.wrap = false,
                        [25] => {}
                        [1000] | [1002] | [1003] => self.clear_mouse_mode(),
                        [1049] => self.leave_alternate(),
                        [1] => {}
                        _ => warn!("unhandled 'CSI ? {code:?} l'"),
                    }
                }
            }
            's' => self.save_cursor(),
            'u' => self.restore_cursor(),
            _ => warn!("unhandled CSI action {action}"),
        }
    }

    fn esc_dispatch(&mut self, intermediates: &[u8], ignore: bool, byte: u8) {
        if ignore {
            warn!("malformed ESC seq");
            return;
        }
        match (intermediates, byte) {
            ([], b'7') => self.save_cursor(),
            ([], b'8') => self.restore_cursor(),
            _ => warn!("unhandled ESC seq ({intermediates:?}, {byte})"),
        }
    }
}

fn p1_or(params: &vte::Params, default: u16) -> u16 {
    let n = params.iter().flatten().next().copied().unwrap_or(0);
    if n == 0 {
        default
    } else {
        n
    }
}

fn first_or(group: Option<&[u16]>, default: u16) -> u16 {
    match group.and_then(|g| g.first().copied()) {
        Some(0) | None => default,
        Some(n) => n,
    }
}

impl Engine {
    /// A new engine with the design-default scrollback capacity
    /// (`scrollback::SCROLLBACK_SIZE`). See [`Engine::with_scrollback_capacity`]
    /// to override it.
    pub fn new(rows: usize, cols: usize) -> Self {
        Engine::with_scrollback_capacity(rows, cols, crate::scrollback::SCROLLBACK_SIZE)
    }

    /// A new engine whose scrollback ring holds `scrollback_lines` rows,
    /// the way the teacher crate's `Term::new(scrollback_lines, size)`
    /// takes scrollback capacity as a constructor argument rather than a
    /// fixed constant.
    pub fn with_scrollback_capacity(rows: usize, cols: usize, scrollback_lines: usize) -> Self {
        Engine {
            parser: vte::Parser::new(),
            state: EngineState::new(rows, cols, scrollback_lines),
            selection: Selection::new(),
        }
    }

    /// Feed a chunk of bytes read off the PTY to the parser.
    pub fn process(&mut self, bytes: &[u8]) {
        self.parser.advance(&mut self.state, bytes);
    }

    pub fn resize(&mut self, rows: usize, cols: usize) {
        self.state.primary.resize(rows, cols);
        self.state.alternate.resize(rows, cols);
        self.state.scroll_region.clamp_to(rows);
    }

    pub fn rows(&self) -> usize {
        self.state.rows()
    }

    pub fn cols(&self) -> usize {
        self.state.cols()
    }

    pub fn active_buffer(&self) -> ActiveBuffer {
        self.state.active
    }

    pub fn active_grid(&self) -> &Grid {
        &self.state.active().grid
    }

    pub fn primary_grid(&self) -> &Grid {
        &self.state.primary.grid
    }

    pub fn alternate_grid(&self) -> &Grid {
        &self.state.alternate.grid
    }

    pub fn cursor(&self) -> Pos {
        self.state.active().cursor
    }

    pub fn scrollback(&self) -> &Scrollback {
        &self.state.scrollback
    }

    pub fn modes(&self) -> &Modes {
        &self.state.modes
    }

    pub fn selection_mut(&mut self) -> &mut Selection {
        &mut self.selection
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn materialize_selection(&self) -> Vec<u8> {
        self.selection
            .materialize(self.active_grid(), self.scrollback())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row_text(engine: &Engine, row: usize) -> String {
        engine
            .active_grid()
            .row(row)
            .iter()
            .map(|c| if c.is_blank() { ' ' } else { c.ch() as char })
            .collect()
    }

    #[test]
    fn simple_write() {
        let mut e = Engine::new(24, 80);
        e.process(b"Hi\n");
        assert!(row_text(&e, 0).starts_with("Hi"));
        assert_eq!(e.cursor(), Pos { row: 1, col: 0 });
    }

    #[test]
    fn sgr_color() {
        let mut e = Engine::new(24, 80);
        e.process(b"\x1b[31mR\x1b[0mN");
        let g = e.active_grid();
        assert_eq!(g.cell(0, 0).ch(), b'R');
        assert_eq!(g.cell(0, 0).fg(), 1);
        assert_eq!(g.cell(0, 1).ch(), b'N');
        assert_eq!(g.cell(0, 1).fg(), DEFAULT_FG);
    }

    #[test]
    fn alternate_buffer_round_trip() {
        let mut e = Engine::new(24, 80);
        e.process(b"X");
        // undo the cursor advance from writing 'X' so (0,0) still reads 'X'.
        assert_eq!(e.primary_grid().cell(0, 0).ch(), b'X');

        e.process(b"\x1b[?1049hY\x1b[?1049l");
        assert_eq!(e.active_buffer(), ActiveBuffer::Primary);
        assert_eq!(e.primary_grid().cell(0, 0).ch(), b'X');
        assert!(e.scrollback().is_empty());
        assert_eq!(e.cursor(), Pos::origin());
    }

    #[test]
    fn scroll_region_and_scroll_up() {
        let mut e = Engine::new(5, 10);
        e.process(b"\x1b[2;4r");
        e.process(b"A\nB\nC\nD\n");
        assert_eq!(e.scrollback().len(), 1);
        assert_eq!(e.scrollback().at(0)[0].ch(), b'B');
        assert_eq!(e.active_grid().cell(0, 0).ch(), b'A');
    }

    #[test]
    fn cursor_save_restore() {
        let mut e = Engine::new(24, 80);
        e.process(b"\x1b7ABC\x1b8XY");
        assert_eq!(row_text(&e, 0).trim_end(), "XYC");
    }

    #[test]
    fn insert_blanks() {
        let mut e = Engine::new(24, 80);
        e.process(b"ABCDE");
        e.process(b"\x1b[1;3H\x1b[2@");
        let g = e.active_grid();
        assert!(g.cell(0, 2).is_blank());
        assert!(g.cell(0, 3).is_blank());
        assert_eq!(g.cell(0, 4).ch(), b'C');
        assert_eq!(e.cursor(), Pos { row: 0, col: 2 });
    }

    #[test]
    fn erase_display_then_home_is_all_blank() {
        let mut e = Engine::new(24, 80);
        e.process(b"hello world");
        e.process(b"\x1b[2J\x1b[H");
        assert_eq!(e.cursor(), Pos::origin());
        for c in e.active_grid().row(0) {
            assert!(c.is_blank());
        }
    }

    #[test]
    fn wrap_boundary() {
        let mut e = Engine::new(5, 10);
        e.process(&[b'a'; 10]);
        assert_eq!(e.cursor(), Pos { row: 1, col: 0 });

        let mut e2 = Engine::new(5, 10);
        e2.process(b"\x1b[?7l"); // DECAWM off: disable wrap
        e2.process(&[b'a'; 10]);
        assert_eq!(e2.cursor(), Pos { row: 0, col: 10 });
    }

    #[test]
    fn cursor_up_clamps_at_zero() {
        let mut e = Engine::new(24, 80);
        e.process(b"\x1b[999A");
        assert_eq!(e.cursor().row, 0);
    }

    #[test]
    fn alt_1049_h_is_idempotent() {
        let mut e = Engine::new(24, 80);
        e.process(b"\x1b[?1049h");
        e.process(b"Z");
        e.process(b"\x1b[?1049h");
        assert_eq!(e.active_buffer(), ActiveBuffer::Alternate);
        assert!(e.active_grid().cell(0, 0).is_blank());
    }
}
