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

//! Cursor-adjacent mode state that is not part of either screen buffer:
//! the scroll region, line-wrap flag, mouse reporting mode, and the SGR
//! colors that new cells are written with.

use crate::palette::{PaletteIndex, DEFAULT_BG, DEFAULT_FG};

/// `(top, bottom)`, both within `[0, rows)`, `top <= bottom`.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct ScrollRegion {
    pub top: usize,
    pub bottom: usize,
}

impl ScrollRegion {
    pub fn full(rows: usize) -> Self {
        ScrollRegion {
            top: 0,
            bottom: rows.saturating_sub(1),
        }
    }

    /// Clamp to the grid, restoring the invariant `top <= bottom < rows`.
    pub fn clamp_to(&mut self, rows: usize) {
        let max = rows.saturating_sub(1);
        self.top = self.top.min(max);
        self.bottom = self.bottom.min(max);
        if self.top > self.bottom {
            std::mem::swap(&mut self.top, &mut self.bottom);
        }
    }
}

/// Current SGR colors used for newly written cells.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct Sgr {
    pub fg: PaletteIndex,
    pub bg: PaletteIndex,
}

impl Default for Sgr {
    fn default() -> Self {
        Sgr {
            fg: DEFAULT_FG,
            bg: DEFAULT_BG,
        }
    }
}

/// DEC private mouse-reporting mode (set via `CSI ?100x h/l`). Ordered by
/// capability (`Off < Normal < ButtonEvent < AnyEvent`) so callers can test
/// "at least ButtonEvent" with a plain comparison.
#[derive(Debug, Clone, Copy, Eq, PartialEq, PartialOrd, Ord, Default)]
pub enum MouseMode {
    #[default]
    Off,
    Normal,
    ButtonEvent,
    AnyEvent,
}

#[derive(Debug, Clone, Copy)]
pub struct Modes {
    pub wrap: bool,
    pub mouse_enabled: bool,
    pub mouse_mode: MouseMode,
}

impl Default for Modes {
    fn default() -> Self {
        Modes {
            wrap: true,
            mouse_enabled: false,
            mouse_mode: MouseMode::Off,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scroll_region_clamps_and_keeps_order() {
        let mut r = ScrollRegion { top: 50, bottom: 2 };
        r.clamp_to(10);
        assert!(r.top <= r.bottom);
        assert!(r.bottom < 10);
    }
}
