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

//! Configuration constants (compile-time defaults, overridable via a TOML
//! file), laid out the way `smash-config`'s `Config` is: one `#[derive]`d
//! struct per concern, `#[serde(default = "...")]` per field so a partial
//! file only overrides what it mentions.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::palette::{DEFAULT_BG, DEFAULT_FG};
use crate::{Error, Result};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayConfig {
    #[serde(default = "default_rows")]
    pub rows: usize,
    #[serde(default = "default_cols")]
    pub cols: usize,
    #[serde(default = "default_border_px")]
    pub border_px: u32,
    #[serde(default = "default_font")]
    pub font: String,
}

fn default_rows() -> usize {
    24
}
fn default_cols() -> usize {
    80
}
fn default_border_px() -> u32 {
    20
}
fn default_font() -> String {
    "monospace".to_string()
}

impl Default for DisplayConfig {
    fn default() -> Self {
        DisplayConfig {
            rows: default_rows(),
            cols: default_cols(),
            border_px: default_border_px(),
            font: default_font(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectionConfig {
    #[serde(default = "default_selection_fg")]
    pub fg: u8,
    #[serde(default = "default_selection_bg")]
    pub bg: u8,
}

fn default_selection_fg() -> u8 {
    DEFAULT_BG
}
fn default_selection_bg() -> u8 {
    DEFAULT_FG
}

impl Default for SelectionConfig {
    fn default() -> Self {
        SelectionConfig {
            fg: default_selection_fg(),
            bg: default_selection_bg(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub display: DisplayConfig,
    #[serde(default)]
    pub selection: SelectionConfig,
    #[serde(default = "default_scrollback_lines")]
    pub scrollback_lines: usize,
    #[serde(default = "default_scroll_wheel_lines")]
    pub scroll_wheel_lines: i32,
}

fn default_scrollback_lines() -> usize {
    crate::scrollback::SCROLLBACK_SIZE
}
fn default_scroll_wheel_lines() -> i32 {
    crate::keymap::MOUSE_SCROLL_LINES
}

impl Default for Config {
    fn default() -> Self {
        Config {
            display: DisplayConfig::default(),
            selection: SelectionConfig::default(),
            scrollback_lines: default_scrollback_lines(),
            scroll_wheel_lines: default_scroll_wheel_lines(),
        }
    }
}

impl Config {
    /// Read and parse a config file; a missing file is not an error, since
    /// every field has a default.
    pub fn load(path: &Path) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(contents) => toml::from_str(&contents).map_err(|e| Error::Config(e.into())),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Config::default()),
            Err(e) => Err(Error::Config(e.into())),
        }
    }

    /// `$XDG_CONFIG_HOME/miniterm/config.toml`, or the platform equivalent.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("miniterm").join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_matches_spec_constants() {
        let cfg = Config::default();
        assert_eq!(cfg.display.rows, 24);
        assert_eq!(cfg.display.cols, 80);
        assert_eq!(cfg.display.border_px, 20);
        assert_eq!(cfg.scroll_wheel_lines, 3);
    }

    #[test]
    fn missing_file_yields_defaults() {
        let cfg = Config::load(Path::new("/nonexistent/miniterm-config-test.toml")).unwrap();
        assert_eq!(cfg, Config::default());
    }

    #[test]
    fn partial_toml_keeps_other_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[display]\ncols = 132\n").unwrap();
        let cfg = Config::load(&path).unwrap();
        assert_eq!(cfg.display.cols, 132);
        assert_eq!(cfg.display.rows, 24);
        assert_eq!(cfg.scrollback_lines, crate::scrollback::SCROLLBACK_SIZE);
    }
}
