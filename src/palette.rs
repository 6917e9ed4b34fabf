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

//! The fixed 16-entry color table. Cells and SGR state only ever carry a
//! `PaletteIndex` (0..15); resolving that index to an RGB triple is the
//! display backend's job, not the grid's.

/// An index into the 16-entry palette.
pub type PaletteIndex = u8;

/// The default foreground index (ANSI "white"/light gray).
pub const DEFAULT_FG: PaletteIndex = 7;
/// The default background index (ANSI "black").
pub const DEFAULT_BG: PaletteIndex = 0;

/// An RGB color as painted by the display backend.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct Rgb(pub u8, pub u8, pub u8);

/// The standard 16-color ANSI palette, indexed 0..15.
#[derive(Debug, Clone, Copy)]
pub struct Palette {
    entries: [Rgb; 16],
}

impl Palette {
    /// Look up the RGB value for a palette index. Indices outside 0..15
    /// clamp to the last entry rather than panicking; the parser never
    /// produces an out-of-range index, but callers constructing cells by
    /// hand (tests) get a defined result either way.
    pub fn resolve(&self, idx: PaletteIndex) -> Rgb {
        self.entries[idx.min(15) as usize]
    }
}

impl Default for Palette {
    fn default() -> Self {
        // Standard xterm default 16-color table.
        Palette {
            entries: [
                Rgb(0x00, 0x00, 0x00), // 0 black
                Rgb(0xcd, 0x00, 0x00), // 1 red
                Rgb(0x00, 0xcd, 0x00), // 2 green
                Rgb(0xcd, 0xcd, 0x00), // 3 yellow
                Rgb(0x00, 0x00, 0xee), // 4 blue
                Rgb(0xcd, 0x00, 0xcd), // 5 magenta
                Rgb(0x00, 0xcd, 0xcd), // 6 cyan
                Rgb(0xe5, 0xe5, 0xe5), // 7 white
                Rgb(0x7f, 0x7f, 0x7f), // 8 bright black
                Rgb(0xff, 0x00, 0x00), // 9 bright red
                Rgb(0x00, 0xff, 0x00), // 10 bright green
                Rgb(0xff, 0xff, 0x00), // 11 bright yellow
                Rgb(0x5c, 0x5c, 0xff), // 12 bright blue
                Rgb(0xff, 0x00, 0xff), // 13 bright magenta
                Rgb(0x00, 0xff, 0xff), // 14 bright cyan
                Rgb(0xff, 0xff, 0xff), // 15 bright white
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_in_range() {
        let p = Palette::default();
        assert_eq!(p.resolve(0), Rgb(0x00, 0x00, 0x00));
        assert_eq!(p.resolve(15), Rgb(0xff, 0xff, 0xff));
    }

    #[test]
    fn clamps_out_of_range() {
        let p = Palette::default();
        assert_eq!(p.resolve(200), p.resolve(15));
    }
}
