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

//! The display backend: a windowed surface is out of scope for this crate
//! (no font rendering stack is in the corpus), so `TuiBackend` renders the
//! grid into the controlling terminal itself via `crossterm`, the way
//! `kenpiano-smash`'s `CrosstermBackend` paints a `Cell` grid cell by cell.
//! Pixel-addressed events (`MouseButton`, `MouseMotion`, `Resize`) are kept
//! in the contract so the pixel-to-cell mapping in `pixel_to_cell` stays
//! faithful to the spec even though this backend measures in cells.

use std::io::Write;
use std::time::Duration;

use crossterm::cursor::{Hide, MoveTo, Show};
use crossterm::event::{self, KeyCode, KeyModifiers, MouseEventKind};
use crossterm::style::{Print, ResetColor, SetBackgroundColor, SetForegroundColor};
use crossterm::terminal::{Clear, ClearType};

use crate::grid::Grid;
use crate::palette::Palette;
use crate::screen::Pos;
use crate::scrollback::Scrollback;
use crate::selection::Selection;
use crate::{Error, Result};

#[derive(Debug, Clone, Copy, Default, Eq, PartialEq)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
}

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum MouseButton {
    Left,
    Middle,
    Right,
}

#[derive(Debug, Clone)]
pub enum Event {
    Expose,
    Resize {
        width_px: u32,
        height_px: u32,
    },
    KeyPress {
        keysym: KeyCode,
        codepoint: Option<char>,
        modifiers: Modifiers,
    },
    MouseButton {
        button: MouseButton,
        x_px: u32,
        y_px: u32,
        pressed: bool,
    },
    MouseMotion {
        x_px: u32,
        y_px: u32,
    },
    MouseScroll {
        lines: i32,
    },
    SelectionNotify {
        bytes: Vec<u8>,
    },
}

/// Arguments to a render pass: everything the backend needs to paint one
/// frame, borrowed from the engine for the duration of the call.
pub struct DrawView<'a> {
    pub scrollback: &'a Scrollback,
    pub grid: &'a Grid,
    pub selection: &'a Selection,
    pub cursor: Pos,
    /// Lines scrolled back from the live view, `0` meaning "at the bottom".
    pub scroll_offset: usize,
}

pub trait Backend {
    /// Block for at most `timeout` waiting for the next event.
    fn poll_event(&mut self, timeout: Duration) -> Result<Option<Event>>;
    fn draw(&mut self, view: DrawView<'_>) -> Result<()>;
    /// Current size in cells, `(cols, rows)`.
    fn size(&self) -> Result<(usize, usize)>;
}

/// Maps a pixel coordinate to a grid cell, per the border/font-metrics
/// contract: `col = (x_px - border) / font_width`, `row = (y_px - border)
/// / font_height`.
pub fn pixel_to_cell(
    x_px: u32,
    y_px: u32,
    border: u32,
    font_width: u32,
    font_height: u32,
) -> (usize, usize) {
    let col = x_px.saturating_sub(border) / font_width.max(1);
    let row = y_px.saturating_sub(border) / font_height.max(1);
    (col as usize, row as usize)
}

pub struct TuiBackend {
    stdout: std::io::Stdout,
    palette: Palette,
}

impl TuiBackend {
    pub fn new() -> Result<Self> {
        crossterm::terminal::enable_raw_mode().map_err(|e| Error::Display(e.into()))?;
        crossterm::execute!(
            std::io::stdout(),
            crossterm::terminal::EnterAlternateScreen,
            event::EnableMouseCapture,
            Hide,
        )
        .map_err(|e| Error::Display(e.into()))?;
        Ok(TuiBackend {
            stdout: std::io::stdout(),
            palette: Palette::default(),
        })
    }
}

impl Drop for TuiBackend {
    fn drop(&mut self) {
        let _ = crossterm::execute!(
            self.stdout,
            Show,
            event::DisableMouseCapture,
            crossterm::terminal::LeaveAlternateScreen,
        );
        let _ = crossterm::terminal::disable_raw_mode();
    }
}

impl Backend for TuiBackend {
    fn poll_event(&mut self, timeout: Duration) -> Result<Option<Event>> {
        if !event::poll(timeout).map_err(|e| Error::Display(e.into()))? {
            return Ok(None);
        }
        let ev = event::read().map_err(|e| Error::Display(e.into()))?;
        Ok(translate_event(ev))
    }

    fn draw(&mut self, view: DrawView<'_>) -> Result<()> {
        crossterm::execute!(self.stdout, Clear(ClearType::All))
            .map_err(|e| Error::Display(e.into()))?;

        let rows = view.grid.rows();
        let cols = view.grid.cols();

        // Unified row space is scrollback rows then live grid rows; a
        // `scroll_offset` of 0 shows the live grid, same as before.
        // Scrolling back walks the viewport start backwards through
        // scrollback, clamped so it never runs past the oldest row.
        let clamped_offset = view.scroll_offset.min(view.scrollback.len());
        let viewport_start = view.scrollback.len() - clamped_offset;

        for r in 0..rows {
            let unified_row = viewport_start + r;
            let Some(row_cells) =
                crate::selection::resolve_row(unified_row, view.grid, view.scrollback)
            else {
                continue;
            };
            for (c, cell) in row_cells.iter().enumerate().take(cols) {
                if cell.is_blank() && !view.selection.contains(unified_row, c, cols) {
                    continue;
                }
                let (mut fg, mut bg) = (
                    self.palette.resolve(cell.fg()),
                    self.palette.resolve(cell.bg()),
                );
                if view.selection.contains(unified_row, c, cols) {
                    std::mem::swap(&mut fg, &mut bg);
                }
                crossterm::execute!(
                    self.stdout,
                    MoveTo(c as u16, r as u16),
                    SetForegroundColor(crossterm::style::Color::Rgb {
                        r: fg.0,
                        g: fg.1,
                        b: fg.2
                    }),
                    SetBackgroundColor(crossterm::style::Color::Rgb {
                        r: bg.0,
                        g: bg.1,
                        b: bg.2
                    }),
                    Print(cell.ch() as char),
                )
                .map_err(|e| Error::Display(e.into()))?;
            }
        }

        crossterm::execute!(self.stdout, ResetColor).map_err(|e| Error::Display(e.into()))?;
        if clamped_offset == 0 {
            // The cursor belongs to the live grid; once scrolled back
            // into history there is nothing at the cursor position to
            // point at, so it is left wherever the last draw put it.
            crossterm::execute!(
                self.stdout,
                MoveTo(view.cursor.col as u16, view.cursor.row as u16),
            )
            .map_err(|e| Error::Display(e.into()))?;
        }
        self.stdout.flush().map_err(Error::PtyIo)
    }

    fn size(&self) -> Result<(usize, usize)> {
        let (cols, rows) = crossterm::terminal::size().map_err(|e| Error::Display(e.into()))?;
        Ok((cols as usize, rows as usize))
    }
}

fn translate_event(ev: event::Event) -> Option<Event> {
    match ev {
        event::Event::Resize(cols, rows) => Some(Event::Resize {
            width_px: cols as u32,
            height_px: rows as u32,
        }),
        event::Event::Key(key) => {
            let modifiers = Modifiers {
                shift: key.modifiers.contains(KeyModifiers::SHIFT),
                ctrl: key.modifiers.contains(KeyModifiers::CONTROL),
            };
            let codepoint = match key.code {
                KeyCode::Char(c) => Some(c),
                _ => None,
            };
            Some(Event::KeyPress {
                keysym: key.code,
                codepoint,
                modifiers,
            })
        }
        event::Event::Mouse(mouse) => match mouse.kind {
            MouseEventKind::Down(button) => Some(Event::MouseButton {
                button: translate_mouse_button(button),
                x_px: mouse.column as u32,
                y_px: mouse.row as u32,
                pressed: true,
            }),
            MouseEventKind::Up(button) => Some(Event::MouseButton {
                button: translate_mouse_button(button),
                x_px: mouse.column as u32,
                y_px: mouse.row as u32,
                pressed: false,
            }),
            MouseEventKind::Drag(_) | MouseEventKind::Moved => Some(Event::MouseMotion {
                x_px: mouse.column as u32,
                y_px: mouse.row as u32,
            }),
            MouseEventKind::ScrollUp => Some(Event::MouseScroll { lines: 1 }),
            MouseEventKind::ScrollDown => Some(Event::MouseScroll { lines: -1 }),
            _ => None,
        },
        event::Event::FocusGained | event::Event::FocusLost | event::Event::Paste(_) => None,
    }
}

fn translate_mouse_button(button: event::MouseButton) -> MouseButton {
    match button {
        event::MouseButton::Left => MouseButton::Left,
        event::MouseButton::Middle => MouseButton::Middle,
        event::MouseButton::Right => MouseButton::Right,
    }
}

/// A no-op backend used by tests and by anything driving the engine
/// headlessly: events can be queued in, draws are simply counted.
#[derive(Default)]
pub struct NullBackend {
    pub queued: std::collections::VecDeque<Event>,
    pub draw_count: usize,
    pub cols: usize,
    pub rows: usize,
}

impl NullBackend {
    pub fn new(cols: usize, rows: usize) -> Self {
        NullBackend {
            queued: std::collections::VecDeque::new(),
            draw_count: 0,
            cols,
            rows,
        }
    }

    pub fn push_event(&mut self, ev: Event) {
        self.queued.push_back(ev);
    }
}

impl Backend for NullBackend {
    fn poll_event(&mut self, _timeout: Duration) -> Result<Option<Event>> {
        Ok(self.queued.pop_front())
    }

    fn draw(&mut self, _view: DrawView<'_>) -> Result<()> {
        self.draw_count += 1;
        Ok(())
    }

    fn size(&self) -> Result<(usize, usize)> {
        Ok((self.cols, self.rows))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pixel_to_cell_honors_border_and_metrics() {
        assert_eq!(pixel_to_cell(20, 20, 20, 8, 16), (0, 0));
        assert_eq!(pixel_to_cell(28, 36, 20, 8, 16), (1, 1));
    }

    #[test]
    fn null_backend_drains_queued_events_in_order() {
        let mut b = NullBackend::new(80, 24);
        b.push_event(Event::Expose);
        b.push_event(Event::MouseScroll { lines: -1 });
        assert!(matches!(
            b.poll_event(Duration::from_millis(0)).unwrap(),
            Some(Event::Expose)
        ));
        assert!(matches!(
            b.poll_event(Duration::from_millis(0)).unwrap(),
            Some(Event::MouseScroll { lines: -1 })
        ));
        assert!(b.poll_event(Duration::from_millis(0)).unwrap().is_none());
    }
}
