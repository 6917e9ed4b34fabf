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

//! Process bootstrap: argument parsing, PTY spawn, and the readiness loop
//! that multiplexes PTY bytes against display events. The loop itself
//! stays single-threaded; a background thread only forwards PTY bytes
//! into an `mpsc` channel; nothing else touches shared state off the main
//! thread.

use std::path::PathBuf;
use std::sync::mpsc;
use std::time::Duration;

use clap::Parser;
use tracing::{error, info, warn};

use miniterm::config::Config;
use miniterm::display::{Backend, DrawView, Event, MouseButton as DisplayMouseButton, TuiBackend};
use miniterm::keymap::{self, KeyAction};
use miniterm::pty::PtySession;
use miniterm::Engine;

#[derive(Parser)]
#[command(name = "miniterm", about = "A minimal terminal emulator")]
struct Cli {
    /// Override the config file path (default: platform config dir).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the scrollback capacity.
    #[arg(long)]
    scrollback_lines: Option<usize>,

    /// Command to run in place of the default shell.
    command: Vec<String>,
}

enum Wake {
    PtyBytes(Vec<u8>),
    PtyEof,
}

fn main() {
    std::process::exit(run());
}

fn run() -> i32 {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let config_path = cli.config.or_else(Config::default_path);
    let mut config = match config_path.as_deref().map(Config::load) {
        Some(Ok(cfg)) => cfg,
        Some(Err(e)) => {
            warn!("failed to load config, using defaults: {e}");
            Config::default()
        }
        None => Config::default(),
    };
    if let Some(n) = cli.scrollback_lines {
        config.scrollback_lines = n;
    }

    let rows = config.display.rows;
    let cols = config.display.cols;

    let mut pty = match PtySession::spawn(&cli.command, rows, cols) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("miniterm: failed to start pty: {e}");
            return 1;
        }
    };

    let mut reader = match pty.try_clone_reader() {
        Ok(r) => r,
        Err(e) => {
            eprintln!("miniterm: failed to clone pty reader: {e}");
            return 1;
        }
    };

    let (tx, rx) = mpsc::channel::<Wake>();
    let pty_tx = tx.clone();
    std::thread::spawn(move || {
        use std::io::Read;
        let mut buf = [0u8; 4096];
        loop {
            match reader.read(&mut buf) {
                Ok(0) => {
                    let _ = pty_tx.send(Wake::PtyEof);
                    return;
                }
                Ok(n) => {
                    if pty_tx.send(Wake::PtyBytes(buf[..n].to_vec())).is_err() {
                        return;
                    }
                }
                Err(e) => {
                    warn!("pty read error: {e}");
                    let _ = pty_tx.send(Wake::PtyEof);
                    return;
                }
            }
        }
    });

    let mut backend = match TuiBackend::new() {
        Ok(b) => b,
        Err(e) => {
            eprintln!("miniterm: failed to open display: {e}");
            return 1;
        }
    };

    let mut engine = Engine::with_scrollback_capacity(rows, cols, config.scrollback_lines);
    let mut scroll_offset: usize = 0;
    let mut clipboard = arboard::Clipboard::new().ok();

    info!("miniterm started ({rows}x{cols})");

    let exit_code = 'outer: loop {
        if let Ok(Some(status)) = pty.try_wait() {
            break status.0;
        }

        match backend.poll_event(Duration::from_millis(16)) {
            Ok(Some(ev)) => {
                if let Some(code) = handle_display_event(
                    ev,
                    &mut engine,
                    &mut pty,
                    &mut scroll_offset,
                    &mut clipboard,
                ) {
                    break 'outer code;
                }
            }
            Ok(None) => {}
            Err(e) => warn!("display event error: {e}"),
        }

        while let Ok(wake) = rx.try_recv() {
            match wake {
                Wake::PtyBytes(bytes) => engine.process(&bytes),
                Wake::PtyEof => {
                    if let Ok(Some(status)) = pty.try_wait() {
                        break 'outer status.0;
                    }
                    break 'outer 0;
                }
            }
        }

        if let Err(e) = backend.draw(DrawView {
            scrollback: engine.scrollback(),
            grid: engine.active_grid(),
            selection: engine.selection(),
            cursor: engine.cursor(),
            scroll_offset,
        }) {
            error!("draw error: {e}");
        }
    };

    info!("miniterm exiting with status {exit_code}");
    exit_code
}

fn handle_display_event(
    ev: Event,
    engine: &mut Engine,
    pty: &mut PtySession,
    scroll_offset: &mut usize,
    clipboard: &mut Option<arboard::Clipboard>,
) -> Option<i32> {
    match ev {
        Event::Resize {
            width_px,
            height_px,
        } => {
            let (cols, rows) = (width_px as usize, height_px as usize);
            engine.resize(rows, cols);
            let _ = pty.resize(rows, cols);
        }
        Event::KeyPress {
            keysym,
            codepoint,
            modifiers,
        } => match keymap::translate_key(keysym, codepoint, modifiers) {
            KeyAction::WriteBytes(bytes) => {
                let _ = pty.write(&bytes);
            }
            KeyAction::ClipboardCopy => {
                let text = engine.materialize_selection();
                if let (Some(cb), Ok(text)) = (clipboard.as_mut(), String::from_utf8(text)) {
                    let _ = cb.set_text(text);
                }
            }
            KeyAction::ClipboardPasteRequest => {
                if let Some(cb) = clipboard.as_mut() {
                    if let Ok(text) = cb.get_text() {
                        let _ = pty.write(text.as_bytes());
                    }
                }
            }
            KeyAction::Scroll(delta) => {
                *scroll_offset = scroll_offset
                    .saturating_add_signed(delta as isize)
                    .min(engine.scrollback().len());
            }
            KeyAction::None => {}
        },
        Event::MouseButton {
            button,
            x_px,
            y_px,
            pressed,
        } => {
            if !matches!(button, DisplayMouseButton::Left) {
                return None;
            }
            let (col, row) = (x_px as usize, y_px as usize);
            let mode = engine.modes().mouse_mode;
            if pressed {
                match keymap::mouse_press_bytes(mode, col, row) {
                    Some(bytes) => {
                        let _ = pty.write(&bytes);
                    }
                    // The running program isn't capturing mouse clicks
                    // itself, so a left click starts our own selection.
                    None => {
                        let unified_row = unified_row(engine, *scroll_offset, row);
                        engine.selection_mut().begin(unified_row, col);
                    }
                }
            } else {
                match keymap::mouse_release_bytes(mode, col, row) {
                    Some(bytes) => {
                        let _ = pty.write(&bytes);
                    }
                    None => engine.selection_mut().end(),
                }
            }
        }
        Event::MouseMotion { x_px, y_px } => {
            let (col, row) = (x_px as usize, y_px as usize);
            let mode = engine.modes().mouse_mode;
            match keymap::mouse_motion_bytes(mode, col, row) {
                Some(bytes) => {
                    let _ = pty.write(&bytes);
                }
                None if engine.selection().is_active() => {
                    let unified_row = unified_row(engine, *scroll_offset, row);
                    engine.selection_mut().extend(unified_row, col);
                }
                None => {}
            }
        }
        Event::MouseScroll { lines } => {
            let delta = lines * keymap::MOUSE_SCROLL_LINES;
            *scroll_offset = scroll_offset
                .saturating_add_signed(delta as isize)
                .min(engine.scrollback().len());
        }
        Event::SelectionNotify { bytes } => {
            let _ = pty.write(&bytes);
        }
        Event::Expose => {}
    }
    None
}

/// Map a screen row (0-indexed, top of the current viewport) to its
/// position in the unified scrollback+grid row space used by
/// `Selection`, honoring the current scrollback-scroll offset the same
/// way `TuiBackend::draw` does.
fn unified_row(engine: &Engine, scroll_offset: usize, screen_row: usize) -> usize {
    let clamped_offset = scroll_offset.min(engine.scrollback().len());
    (engine.scrollback().len() - clamped_offset) + screen_row
}
