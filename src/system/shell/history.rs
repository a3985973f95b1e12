//! The edited line and the history of accepted lines.
//!
//! [`LineBuffer`] owns `SLOTS` fixed-capacity slots. Slot 0 is the line being
//! typed, slots `1..SLOTS` are previously accepted lines, most recent first.
//! The slots live in a ring addressed through a head index, so accepting a
//! line recycles the oldest slot instead of moving bytes around.
//!
//! History entries are never edited in place: the first edit made while an
//! older entry is displayed copies that entry into slot 0 and continues from
//! there.

use heapless::Vec;

/// Direction of a history step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryDirection {
    /// Towards older entries.
    Older,
    /// Towards newer entries, ending at the line being typed.
    Newer,
}

/// Cursor and content of the active slot, as drawn by the render surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineView<'a> {
    /// Bytes of the active slot.
    pub content: &'a [u8],
    /// Cursor position, `0..=content.len()`.
    pub cursor: usize,
}

/// Editable line with history.
///
/// `LINE` is the capacity of a slot; a line holds at most `LINE - 1` bytes.
/// `SLOTS` is the history depth plus one for the line being typed and must
/// be at least 2.
///
/// Every mutating method returns `true` when it changed what is displayed
/// and `false` when the request was out of range and nothing happened.
#[derive(Debug, Clone)]
pub struct LineBuffer<const LINE: usize, const SLOTS: usize> {
    slots: [Vec<u8, LINE>; SLOTS],
    head: usize,
    active: usize,
    cursor: usize,
    overwrite: bool,
}

impl<const LINE: usize, const SLOTS: usize> Default for LineBuffer<LINE, SLOTS> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const LINE: usize, const SLOTS: usize> LineBuffer<LINE, SLOTS> {
    const VALID: () = assert!(
        LINE >= 2 && SLOTS >= 2,
        "a line buffer needs room for one byte and one history slot"
    );

    /// Create an empty buffer.
    pub fn new() -> Self {
        #[allow(clippy::let_unit_value)]
        let () = Self::VALID;
        Self {
            slots: core::array::from_fn(|_| Vec::new()),
            head: 0,
            active: 0,
            cursor: 0,
            overwrite: false,
        }
    }

    /// Bytes of the active slot.
    pub fn content(&self) -> &[u8] {
        &self.slots[self.physical(self.active)]
    }

    /// Length of the active slot.
    pub fn len(&self) -> usize {
        self.content().len()
    }

    /// Whether the active slot is empty.
    pub fn is_empty(&self) -> bool {
        self.content().is_empty()
    }

    /// Cursor position in the active slot.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Index of the displayed slot, 0 being the line being typed.
    pub fn active_index(&self) -> usize {
        self.active
    }

    /// Whether typed bytes overwrite the byte under the cursor.
    pub fn overwrite(&self) -> bool {
        self.overwrite
    }

    /// Flip between inserting and overwriting.
    pub fn toggle_overwrite(&mut self) {
        self.overwrite = !self.overwrite;
    }

    /// Content of slot `index`, 0 being the line being typed.
    pub fn slot(&self, index: usize) -> Option<&[u8]> {
        (index < SLOTS).then(|| self.slots[self.physical(index)].as_slice())
    }

    /// What the render surface draws.
    pub fn view(&self) -> LineView<'_> {
        LineView {
            content: self.content(),
            cursor: self.cursor,
        }
    }

    /// Put `byte` at `pos`.
    ///
    /// Nothing happens when the line is full or `pos` is past its end. At the
    /// end of the line `overwrite` is ignored and the byte is appended.
    ///
    /// # Arguments
    ///
    /// * `pos` - Index in the active line, `0..=len`
    /// * `byte` - Byte to store
    /// * `overwrite` - Replace the byte at `pos` instead of shifting the rest
    ///
    /// # Returns
    ///
    /// `true` if the line changed. The cursor advances by one.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use fwshell::system::shell::LineBuffer;
    ///
    /// let mut buffer = LineBuffer::<8, 2>::new();
    /// for &byte in b"hep" {
    ///     buffer.insert_at(buffer.cursor(), byte, false);
    /// }
    /// assert!(buffer.insert_at(2, b'a', false));
    /// assert_eq!(buffer.content(), b"heap");
    ///
    /// assert!(buffer.insert_at(0, b'c', true));
    /// assert_eq!(buffer.content(), b"ceap");
    /// ```
    pub fn insert_at(&mut self, pos: usize, byte: u8, overwrite: bool) -> bool {
        let len = self.len();
        if len >= LINE - 1 || pos > len {
            return false;
        }
        self.detach();

        let slot = self.current_mut();
        if overwrite && pos < len {
            slot[pos] = byte;
        } else if slot.insert(pos, byte).is_err() {
            return false;
        }
        self.cursor += 1;
        true
    }

    /// Remove the byte at `pos`, stepping the cursor back if `move_cursor`.
    ///
    /// Nothing happens on an empty line, when `pos` is past the last byte, or
    /// when `move_cursor` is set and the cursor already is at the start.
    ///
    /// # Arguments
    ///
    /// * `pos` - Index of the byte to remove
    /// * `move_cursor` - Backspace semantics: the cursor follows the removal
    ///
    /// # Returns
    ///
    /// `true` if a byte was removed.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use fwshell::system::shell::LineBuffer;
    ///
    /// let mut buffer = LineBuffer::<8, 2>::new();
    /// for &byte in b"heap" {
    ///     buffer.insert_at(buffer.cursor(), byte, false);
    /// }
    /// assert!(buffer.remove_at(3, true));
    /// assert_eq!(buffer.content(), b"hea");
    /// assert_eq!(buffer.cursor(), 3);
    ///
    /// assert!(!buffer.remove_at(3, false));
    /// ```
    pub fn remove_at(&mut self, pos: usize, move_cursor: bool) -> bool {
        let len = self.len();
        if len == 0 || pos >= len || (move_cursor && self.cursor == 0) {
            return false;
        }
        self.detach();

        self.current_mut().remove(pos);
        if move_cursor {
            self.cursor -= 1;
        }
        self.cursor = self.cursor.min(self.len());
        true
    }

    /// Delete the byte left of the cursor.
    pub fn backspace(&mut self) -> bool {
        match self.cursor.checked_sub(1) {
            Some(pos) => self.remove_at(pos, true),
            None => false,
        }
    }

    /// Delete the byte under the cursor.
    pub fn delete(&mut self) -> bool {
        self.remove_at(self.cursor, false)
    }

    /// Move the cursor one byte left.
    pub fn move_left(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        self.cursor -= 1;
        true
    }

    /// Move the cursor one byte right.
    pub fn move_right(&mut self) -> bool {
        if self.cursor >= self.len() {
            return false;
        }
        self.cursor += 1;
        true
    }

    /// Show an older or newer history entry.
    ///
    /// Stepping older stops at the last entry holding text; stepping newer
    /// stops at the line being typed. The cursor lands at the end of the
    /// shown line.
    ///
    /// # Returns
    ///
    /// `true` if another entry is now shown.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use fwshell::system::shell::{HistoryDirection, LineBuffer};
    ///
    /// let mut buffer = LineBuffer::<8, 3>::new();
    /// buffer.insert_at(0, b'l', false);
    /// buffer.accept_line();
    ///
    /// assert!(buffer.navigate(HistoryDirection::Older));
    /// assert_eq!(buffer.content(), b"l");
    /// assert!(!buffer.navigate(HistoryDirection::Older));
    /// assert!(buffer.navigate(HistoryDirection::Newer));
    /// assert_eq!(buffer.content(), b"");
    /// ```
    pub fn navigate(&mut self, direction: HistoryDirection) -> bool {
        let target = match direction {
            HistoryDirection::Older => {
                let next = self.active + 1;
                if next >= SLOTS || self.slots[self.physical(next)].is_empty() {
                    return false;
                }
                next
            }
            HistoryDirection::Newer => match self.active.checked_sub(1) {
                Some(previous) => previous,
                None => return false,
            },
        };
        self.active = target;
        self.cursor = self.len();
        true
    }

    /// Accept the displayed line.
    ///
    /// An empty line is not recorded and `None` is returned. Otherwise the
    /// line becomes history entry 1, the oldest entry is dropped, slot 0
    /// starts out empty and the accepted bytes are returned.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use fwshell::system::shell::LineBuffer;
    ///
    /// let mut buffer = LineBuffer::<8, 3>::new();
    /// assert_eq!(buffer.accept_line(), None);
    ///
    /// for &byte in b"ls" {
    ///     buffer.insert_at(buffer.cursor(), byte, false);
    /// }
    /// assert_eq!(buffer.accept_line(), Some(&b"ls"[..]));
    /// assert_eq!(buffer.slot(0), Some(&b""[..]));
    /// assert_eq!(buffer.slot(1), Some(&b"ls"[..]));
    /// ```
    pub fn accept_line(&mut self) -> Option<&[u8]> {
        if self.is_empty() {
            return None;
        }
        self.detach();

        self.head = (self.head + SLOTS - 1) % SLOTS;
        let head = self.head;
        self.slots[head].clear();
        self.active = 0;
        self.cursor = 0;
        self.slot(1)
    }

    /// Copy the displayed history entry into slot 0 and make it active.
    fn detach(&mut self) {
        if self.active == 0 {
            return;
        }
        let source = self.slots[self.physical(self.active)].clone();
        let target = self.physical(0);
        self.slots[target] = source;
        self.active = 0;
    }

    fn current_mut(&mut self) -> &mut Vec<u8, LINE> {
        let index = self.physical(self.active);
        &mut self.slots[index]
    }

    fn physical(&self, index: usize) -> usize {
        (self.head + index) % SLOTS
    }
}
