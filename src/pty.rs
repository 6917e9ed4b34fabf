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

//! The PTY host: spawns a child process attached to a pseudo-terminal
//! master and exposes read/write/resize and an exit-status channel. This
//! is a collaborator, not core logic — the engine never touches
//! `portable_pty` types directly.

use std::io::{Read, Write};

use portable_pty::{native_pty_system, Child, CommandBuilder, MasterPty, PtySize};

use crate::{Error, Result};

/// A running child shell attached to a PTY master.
pub struct PtySession {
    master: Box<dyn MasterPty + Send>,
    writer: Box<dyn Write + Send>,
    child: Box<dyn Child + Send + Sync>,
}

impl PtySession {
    /// Spawn `argv[0]` with the remaining elements as arguments, attached
    /// to a new PTY sized `rows x cols`. An empty `argv` spawns the user's
    /// default shell (`$SHELL`, falling back to `/bin/sh`).
    pub fn spawn(argv: &[String], rows: usize, cols: usize) -> Result<Self> {
        let pty_system = native_pty_system();
        let pair = pty_system
            .openpty(PtySize {
                rows: rows as u16,
                cols: cols as u16,
                pixel_width: 0,
                pixel_height: 0,
            })
            .map_err(Error::PtyAlloc)?;

        let mut cmd = if let Some(prog) = argv.first() {
            let mut cmd = CommandBuilder::new(prog);
            cmd.args(&argv[1..]);
            cmd
        } else {
            CommandBuilder::new(default_shell())
        };
        cmd.cwd(std::env::current_dir().unwrap_or_else(|_| ".".into()));

        let child = pair.slave.spawn_command(cmd).map_err(Error::PtyAlloc)?;
        let writer = pair.master.take_writer().map_err(Error::PtyAlloc)?;
        drop(pair.slave);

        Ok(PtySession {
            master: pair.master,
            writer,
            child,
        })
    }

    /// A reader for the master side. `portable_pty` readers block, so this
    /// is meant to be driven from a dedicated background thread that only
    /// forwards bytes; the engine itself remains single-threaded.
    pub fn try_clone_reader(&self) -> Result<Box<dyn Read + Send>> {
        self.master
            .try_clone_reader()
            .map_err(|e| Error::PtyIo(std::io::Error::other(e)))
    }

    pub fn write(&mut self, bytes: &[u8]) -> Result<()> {
        self.writer.write_all(bytes).map_err(Error::PtyIo)
    }

    pub fn resize(&self, rows: usize, cols: usize) -> Result<()> {
        self.master
            .resize(PtySize {
                rows: rows as u16,
                cols: cols as u16,
                pixel_width: 0,
                pixel_height: 0,
            })
            .map_err(|e| Error::PtyIo(std::io::Error::other(e)))
    }

    /// Non-blocking poll of child exit status. `Ok(None)` means still
    /// running.
    pub fn try_wait(&mut self) -> Result<Option<ExitStatus>> {
        match self.child.try_wait() {
            Ok(Some(status)) => Ok(Some(ExitStatus::from_portable_pty(&status))),
            Ok(None) => Ok(None),
            Err(e) => Err(Error::PtyIo(e)),
        }
    }
}

/// The child's exit status, normalized to the `exit code, or 128 + signal`
/// convention used throughout POSIX shells.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct ExitStatus(pub i32);

impl ExitStatus {
    fn from_portable_pty(status: &portable_pty::ExitStatus) -> Self {
        if status.success() {
            ExitStatus(0)
        } else {
            // portable_pty does not expose the killing signal separately
            // from a generic non-zero code; treat any failure as a bare
            // exit code, consistent with non-POSIX hosts.
            ExitStatus(status.exit_code() as i32)
        }
    }
}

fn default_shell() -> String {
    std::env::var("SHELL").unwrap_or_else(|_| "/bin/sh".to_string())
}
