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

//! A fixed-capacity ring of retired primary-buffer rows. Unlike the
//! teacher crate's `VecDeque`-backed scrollback (which shifts storage
//! around to support reflow on resize), this ring is a plain
//! preallocated buffer with `head`/`len` indices, exactly as laid out in
//! the spec: reflow is a non-goal here, so there is nothing to gain from
//! a deque. Capacity is a runtime parameter (`config::Config::scrollback_lines`
//! / `--scrollback-lines`), the way the teacher's own
//! `Term::new(scrollback_lines, size)` takes it as a constructor
//! argument rather than a compile-time constant.

use crate::grid::{Row, MAX_COLS};

/// Design-default scrollback capacity.
pub const SCROLLBACK_SIZE: usize = 1000;

fn blank_row() -> Row {
    [crate::cell::Cell::blank(); MAX_COLS]
}

pub struct Scrollback {
    buf: Box<[Row]>,
    /// Occupancy, in `[0, buf.len()]`.
    len: usize,
    /// Next write position, in `[0, buf.len())`.
    head: usize,
}

impl Scrollback {
    /// Capacity `SCROLLBACK_SIZE`. See [`Scrollback::with_capacity`] to
    /// override it.
    pub fn new() -> Self {
        Scrollback::with_capacity(SCROLLBACK_SIZE)
    }

    /// `capacity` is clamped to at least 1: a zero-capacity ring can
    /// never hold a row, and `push`/`at`'s modulo arithmetic requires a
    /// non-zero divisor.
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Scrollback {
            buf: vec![blank_row(); capacity].into_boxed_slice(),
            len: 0,
            head: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    fn capacity(&self) -> usize {
        self.buf.len()
    }

    /// Write `row` at `head`, advance `head` modulo capacity, and grow
    /// `len` up to capacity. Once full, every push retires exactly the
    /// oldest row.
    pub fn push(&mut self, row: Row) {
        let capacity = self.capacity();
        self.buf[self.head] = row;
        self.head = (self.head + 1) % capacity;
        if self.len < capacity {
            self.len += 1;
        }
    }

    /// The `i`-th row counted from oldest, `0 <= i < len`.
    pub fn at(&self, i: usize) -> &Row {
        assert!(
            i < self.len,
            "scrollback index {i} out of bounds (len={})",
            self.len
        );
        let capacity = self.capacity();
        let oldest = (self.head + capacity - self.len) % capacity;
        &self.buf[(oldest + i) % capacity]
    }
}

impl Default for Scrollback {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::Cell;

    fn row_of(ch: u8) -> Row {
        let mut r = blank_row();
        r[0] = Cell::new(ch, 0, 0);
        r
    }

    #[test]
    fn push_and_at_in_order() {
        let mut s = Scrollback::new();
        s.push(row_of(b'a'));
        s.push(row_of(b'b'));
        assert_eq!(s.len(), 2);
        assert_eq!(s.at(0)[0].ch(), b'a');
        assert_eq!(s.at(1)[0].ch(), b'b');
    }

    #[test]
    fn with_capacity_overrides_default_size() {
        let mut s = Scrollback::with_capacity(2);
        s.push(row_of(b'a'));
        s.push(row_of(b'b'));
        s.push(row_of(b'c'));
        assert_eq!(s.len(), 2, "ring stays at the configured capacity");
        assert_eq!(s.at(0)[0].ch(), b'b');
        assert_eq!(s.at(1)[0].ch(), b'c');
    }

    #[test]
    fn overwrites_oldest_once_full() {
        let mut s = Scrollback::new();
        for i in 0..SCROLLBACK_SIZE {
            s.push(row_of((i % 256) as u8));
        }
        assert_eq!(s.len(), SCROLLBACK_SIZE);
        s.push(row_of(b'X'));
        assert_eq!(s.len(), SCROLLBACK_SIZE, "len stays at capacity once full");
        // oldest row (index 0) is now what used to be index 1.
        assert_eq!(s.at(0)[0].ch(), 1u8);
        assert_eq!(s.at(SCROLLBACK_SIZE - 1)[0].ch(), b'X');
    }
}
