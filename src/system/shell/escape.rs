//! Decoder for the cursor and editing control sequences.
//!
//! Terminals send arrow keys and the insert/delete keys as short control
//! sequences. The escape byte itself is not printable and is dropped by the
//! editor, so a sequence starts at the [`INTRODUCER`]:
//!
//! ```text
//! [A   history up        [2~  toggle insert mode
//! [B   history down      [3~  delete at cursor
//! [C   cursor right
//! [D   cursor left
//! ```
//!
//! Anything else after an introducer rejects the sequence. The decoder then
//! hands back the bytes it buffered so they can be replayed as typed text;
//! the byte that caused the rejection is not part of the replay and must be
//! processed as fresh input by the caller. No byte is ever lost.

use heapless::Vec;

/// Byte that opens a control sequence.
pub const INTRODUCER: u8 = b'[';

/// Keystroke noise byte. It is skipped while a sequence is pending.
pub const IGNORE: u8 = 0xFF;

/// Longest control sequence, introducer included.
pub const MAX_SEQUENCE_LEN: usize = 3;

/// Editing action carried by an accepted sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EscapeAction {
    /// Move the cursor one byte to the left.
    CursorLeft,
    /// Move the cursor one byte to the right.
    CursorRight,
    /// Show the next older history entry.
    HistoryUp,
    /// Show the next newer history entry.
    HistoryDown,
    /// Flip between insert and overwrite mode.
    ToggleInsert,
    /// Delete the byte under the cursor.
    DeleteAtCursor,
}

/// Classification of the decoder after the last byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EscapeState {
    /// No sequence in progress.
    #[default]
    Idle,
    /// Bytes of a possible sequence are buffered.
    Pending,
    /// The last byte completed a sequence.
    Accepted,
    /// The last byte did not fit the grammar.
    Rejected,
}

/// Outcome of feeding one byte to the decoder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decoded {
    /// Not part of a sequence; handle the byte as ordinary input.
    Literal(u8),
    /// The byte was buffered, more are needed.
    Pending,
    /// The byte was the ignore sentinel inside a sequence.
    Ignored,
    /// A sequence completed. The caller should redraw the whole line since
    /// the terminal may have echoed the control bytes.
    Action(EscapeAction),
    /// The sequence was rejected. `replay` holds the buffered bytes in the
    /// order received; `byte` is the rejecting byte, still unprocessed.
    Rejected {
        /// Buffered bytes to insert as literal text.
        replay: Vec<u8, MAX_SEQUENCE_LEN>,
        /// Byte that broke the sequence.
        byte: u8,
    },
}

/// Control sequence state machine.
#[derive(Debug, Clone, Default)]
pub struct EscapeDecoder {
    buffer: Vec<u8, MAX_SEQUENCE_LEN>,
    state: EscapeState,
}

impl EscapeDecoder {
    /// Create an idle decoder.
    pub fn new() -> Self {
        Self::default()
    }

    /// State after the last [`feed`](Self::feed).
    pub fn state(&self) -> EscapeState {
        self.state
    }

    /// Whether a sequence is in progress.
    pub fn is_pending(&self) -> bool {
        self.state == EscapeState::Pending
    }

    /// Bytes buffered for the sequence in progress.
    pub fn pending(&self) -> &[u8] {
        &self.buffer
    }

    /// Feed one byte.
    pub fn feed(&mut self, byte: u8) -> Decoded {
        if !self.is_pending() {
            if byte == INTRODUCER {
                self.buffer.clear();
                // Capacity is at least one, the push cannot fail.
                let _ = self.buffer.push(byte);
                self.state = EscapeState::Pending;
                return Decoded::Pending;
            }
            self.state = EscapeState::Idle;
            return Decoded::Literal(byte);
        }

        if byte == IGNORE {
            return Decoded::Ignored;
        }

        match self.classify(byte) {
            Step::Continue => {
                if self.buffer.push(byte).is_err() {
                    return self.reject(byte);
                }
                Decoded::Pending
            }
            Step::Accept(action) => {
                self.buffer.clear();
                self.state = EscapeState::Accepted;
                Decoded::Action(action)
            }
            Step::Reject => self.reject(byte),
        }
    }

    /// Abandon any sequence in progress, returning the buffered bytes.
    pub fn reset(&mut self) -> Vec<u8, MAX_SEQUENCE_LEN> {
        self.state = EscapeState::Idle;
        core::mem::take(&mut self.buffer)
    }

    fn reject(&mut self, byte: u8) -> Decoded {
        let replay = core::mem::take(&mut self.buffer);
        self.state = EscapeState::Rejected;
        Decoded::Rejected { replay, byte }
    }

    fn classify(&self, byte: u8) -> Step {
        match (self.buffer.as_slice(), byte) {
            ([INTRODUCER], b'A') => Step::Accept(EscapeAction::HistoryUp),
            ([INTRODUCER], b'B') => Step::Accept(EscapeAction::HistoryDown),
            ([INTRODUCER], b'C') => Step::Accept(EscapeAction::CursorRight),
            ([INTRODUCER], b'D') => Step::Accept(EscapeAction::CursorLeft),
            ([INTRODUCER], b'2' | b'3') => Step::Continue,
            ([INTRODUCER, b'2'], b'~') => Step::Accept(EscapeAction::ToggleInsert),
            ([INTRODUCER, b'3'], b'~') => Step::Accept(EscapeAction::DeleteAtCursor),
            _ => Step::Reject,
        }
    }
}

enum Step {
    Continue,
    Accept(EscapeAction),
    Reject,
}
