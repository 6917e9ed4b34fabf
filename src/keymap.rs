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

//! Pure translation from display-layer input events to PTY byte payloads.
//! Nothing here touches the PTY or the engine directly; callers act on the
//! returned [`KeyAction`]/mouse bytes.

use crossterm::event::KeyCode;

use crate::display::Modifiers;
use crate::modes::MouseMode;

/// Lines scrolled per wheel notch (`CONFIGURATION CONSTANTS`, default 3).
pub const MOUSE_SCROLL_LINES: i32 = 3;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyAction {
    /// Bytes to write straight to the PTY.
    WriteBytes(Vec<u8>),
    /// `Ctrl+Shift+C`: materialize the selection and publish it to the
    /// clipboard. No PTY write.
    ClipboardCopy,
    /// `Ctrl+V` / `Ctrl+Shift+V`: request the clipboard; its contents are
    /// written to the PTY once the `SelectionNotify` event arrives.
    ClipboardPasteRequest,
    /// `Shift+Up` / `Shift+Down`: adjust `scroll_offset`, no PTY write.
    Scroll(i32),
    None,
}

/// Translate one key-press event into the action it should cause. The
/// general `Shift+arrow` rule (`CSI 1;2 <dir>`) applies to left/right;
/// `Shift+Up`/`Shift+Down` are carved out to scroll the view instead, per
/// the more specific keyboard-translation table entries.
pub fn translate_key(keysym: KeyCode, codepoint: Option<char>, modifiers: Modifiers) -> KeyAction {
    match keysym {
        KeyCode::Enter => KeyAction::WriteBytes(vec![b'\r']),
        KeyCode::Backspace => KeyAction::WriteBytes(vec![0x08]),
        KeyCode::Tab => KeyAction::WriteBytes(vec![b'\t']),
        KeyCode::Up if modifiers.shift => KeyAction::Scroll(-1),
        KeyCode::Down if modifiers.shift => KeyAction::Scroll(1),
        KeyCode::Up => KeyAction::WriteBytes(arrow_bytes(b'A', modifiers)),
        KeyCode::Down => KeyAction::WriteBytes(arrow_bytes(b'B', modifiers)),
        KeyCode::Right => KeyAction::WriteBytes(arrow_bytes(b'C', modifiers)),
        KeyCode::Left => KeyAction::WriteBytes(arrow_bytes(b'D', modifiers)),
        KeyCode::Char('c') if modifiers.ctrl && modifiers.shift => KeyAction::ClipboardCopy,
        KeyCode::Char('c') if modifiers.ctrl => KeyAction::WriteBytes(vec![0x03]),
        KeyCode::Char('v') if modifiers.ctrl => KeyAction::ClipboardPasteRequest,
        KeyCode::Char(c) if codepoint.is_some() => {
            let mut buf = [0u8; 4];
            KeyAction::WriteBytes(c.encode_utf8(&mut buf).as_bytes().to_vec())
        }
        _ => KeyAction::None,
    }
}

fn arrow_bytes(direction: u8, modifiers: Modifiers) -> Vec<u8> {
    if modifiers.shift {
        let mut v = b"\x1b[1;2".to_vec();
        v.push(direction);
        v
    } else {
        vec![0x1b, b'[', direction]
    }
}

/// `ESC [ M <code> <col+33> <row+33>`: the xterm normal-tracking mouse
/// wire format shared by press/release/motion, differing only in the
/// code byte (`32` press, `33` release, `34` motion).
fn mouse_report(code: u8, col: usize, row: usize) -> Vec<u8> {
    vec![
        0x1b,
        b'[',
        b'M',
        code,
        (col as u8).wrapping_add(33),
        (row as u8).wrapping_add(33),
    ]
}

/// `None` if the current mouse mode is not at least `Normal`.
pub fn mouse_press_bytes(mode: MouseMode, col: usize, row: usize) -> Option<Vec<u8>> {
    (mode >= MouseMode::Normal).then(|| mouse_report(32, col, row))
}

pub fn mouse_release_bytes(mode: MouseMode, col: usize, row: usize) -> Option<Vec<u8>> {
    (mode >= MouseMode::Normal).then(|| mouse_report(33, col, row))
}

/// `None` if the current mouse mode is not at least `ButtonEvent`.
pub fn mouse_motion_bytes(mode: MouseMode, col: usize, row: usize) -> Option<Vec<u8>> {
    (mode >= MouseMode::ButtonEvent).then(|| mouse_report(34, col, row))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mods(shift: bool, ctrl: bool) -> Modifiers {
        Modifiers { shift, ctrl }
    }

    #[test]
    fn plain_arrows_are_three_bytes() {
        assert_eq!(
            translate_key(KeyCode::Up, None, mods(false, false)),
            KeyAction::WriteBytes(vec![0x1b, b'[', b'A'])
        );
    }

    #[test]
    fn shift_left_right_use_csi_1_2() {
        assert_eq!(
            translate_key(KeyCode::Right, None, mods(true, false)),
            KeyAction::WriteBytes(b"\x1b[1;2C".to_vec())
        );
    }

    #[test]
    fn shift_up_down_scroll_instead_of_writing() {
        assert_eq!(
            translate_key(KeyCode::Up, None, mods(true, false)),
            KeyAction::Scroll(-1)
        );
        assert_eq!(
            translate_key(KeyCode::Down, None, mods(true, false)),
            KeyAction::Scroll(1)
        );
    }

    #[test]
    fn ctrl_c_vs_ctrl_shift_c() {
        assert_eq!(
            translate_key(KeyCode::Char('c'), Some('c'), mods(false, true)),
            KeyAction::WriteBytes(vec![0x03])
        );
        assert_eq!(
            translate_key(KeyCode::Char('c'), Some('c'), mods(true, true)),
            KeyAction::ClipboardCopy
        );
    }

    #[test]
    fn ctrl_v_requests_clipboard() {
        assert_eq!(
            translate_key(KeyCode::Char('v'), Some('v'), mods(false, true)),
            KeyAction::ClipboardPasteRequest
        );
        assert_eq!(
            translate_key(KeyCode::Char('v'), Some('v'), mods(true, true)),
            KeyAction::ClipboardPasteRequest
        );
    }

    #[test]
    fn mouse_wire_format_uses_plus_33_offsets() {
        assert_eq!(
            mouse_press_bytes(MouseMode::Normal, 0, 0).unwrap(),
            vec![0x1b, b'[', b'M', 32, 33, 33]
        );
        assert_eq!(
            mouse_release_bytes(MouseMode::Normal, 1, 2).unwrap(),
            vec![0x1b, b'[', b'M', 33, 34, 35]
        );
    }

    #[test]
    fn mouse_reports_gated_by_mode() {
        assert!(mouse_press_bytes(MouseMode::Off, 0, 0).is_none());
        assert!(mouse_motion_bytes(MouseMode::Normal, 0, 0).is_none());
        assert!(mouse_motion_bytes(MouseMode::ButtonEvent, 0, 0).is_some());
    }
}
