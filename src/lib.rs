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

//! A minimal terminal emulator: a PTY-backed shell host, an escape-sequence
//! parser, a grid/scrollback/selection model, and a `crossterm` display.
//! [`Engine`] is the core state machine; everything else is a collaborator
//! around it.

pub mod cell;
pub mod config;
pub mod display;
pub mod engine;
pub mod grid;
pub mod keymap;
pub mod modes;
pub mod palette;
pub mod pty;
pub mod screen;
pub mod scrollback;
pub mod selection;

pub use engine::{ActiveBuffer, Engine};

/// Errors surfaced by the ambient stack (PTY, display, config). Parser and
/// selection anomalies never reach this type; they are handled locally and
/// silently, per the engine's error-handling contract.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to allocate a pty: {0}")]
    PtyAlloc(#[source] anyhow::Error),
    #[error("pty i/o error: {0}")]
    PtyIo(#[source] std::io::Error),
    #[error("failed to open the display backend: {0}")]
    Display(#[source] anyhow::Error),
    #[error("clipboard error: {0}")]
    Clipboard(#[source] anyhow::Error),
    #[error("invalid configuration: {0}")]
    Config(#[source] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
