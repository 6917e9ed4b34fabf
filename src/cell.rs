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

use crate::palette::{PaletteIndex, DEFAULT_BG, DEFAULT_FG};

/// A single grid position: one printable ASCII byte plus the fg/bg
/// palette indices it was written with. A zero `ch` means "blank"; blanks
/// still carry whatever fg/bg were current when the cell was cleared.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct Cell {
    ch: u8,
    fg: PaletteIndex,
    bg: PaletteIndex,
}

impl Cell {
    /// A new cell holding a printable byte, using the given SGR colors.
    pub fn new(ch: u8, fg: PaletteIndex, bg: PaletteIndex) -> Self {
        Cell { ch, fg, bg }
    }

    /// A blank cell with the default colors.
    pub fn blank() -> Self {
        Cell {
            ch: 0,
            fg: DEFAULT_FG,
            bg: DEFAULT_BG,
        }
    }

    /// A blank cell carrying the given colors (used by clear operations
    /// that should preserve whatever the default fg/bg happen to be,
    /// never the cursor's current SGR state).
    pub fn blank_with(fg: PaletteIndex, bg: PaletteIndex) -> Self {
        Cell { ch: 0, fg, bg }
    }

    pub fn ch(&self) -> u8 {
        self.ch
    }

    pub fn fg(&self) -> PaletteIndex {
        self.fg
    }

    pub fn bg(&self) -> PaletteIndex {
        self.bg
    }

    pub fn is_blank(&self) -> bool {
        self.ch == 0
    }
}

impl Default for Cell {
    fn default() -> Self {
        Cell::blank()
    }
}

impl std::fmt::Display for Cell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_blank() {
            write!(f, " ")
        } else {
            write!(f, "{}", self.ch as char)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_is_blank() {
        assert!(Cell::blank().is_blank());
        assert!(!Cell::new(b'x', 1, 2).is_blank());
    }

    #[test]
    fn blank_carries_default_colors_not_sgr() {
        let c = Cell::blank_with(3, 4);
        assert_eq!(c.fg(), 3);
        assert_eq!(c.bg(), 4);
        assert!(c.is_blank());
    }
}
