//! Drawing the prompt line.
//!
//! `draw` emits the prompt, the line and enough cursor-left moves to put the
//! terminal cursor where the editing cursor is. `clear` erases the current
//! terminal line. Both depend only on the [`LineView`] given, so a redraw
//! is deterministic: two redraws of the same state emit the same bytes.

use super::history::LineView;
use super::transport::Sink;

/// Moves the terminal cursor one column left.
pub const CURSOR_LEFT: &[u8] = b"\x1b[1D";

/// Returns to column 0 and erases to the end of the line.
pub const ERASE_LINE: &[u8] = b"\r\x1b[K";

const BLANKS: [u8; 16] = [b' '; 16];

/// Prompt line renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Renderer {
    prompt: u8,
    ansi: bool,
    width: usize,
}

impl Renderer {
    /// Renderer drawing `prompt` in front of lines of at most `width` bytes.
    ///
    /// Without `ansi` the cursor cannot be positioned: the line is cleared
    /// by overwriting it with blanks and the cursor is left at its end.
    pub const fn new(prompt: u8, ansi: bool, width: usize) -> Self {
        Self {
            prompt,
            ansi,
            width,
        }
    }

    /// Emit prompt, content and cursor positioning, then flush.
    ///
    /// # Errors
    ///
    /// Forwards the sink's error.
    pub fn draw<S: Sink + ?Sized>(&self, sink: &mut S, view: LineView<'_>) -> Result<(), S::Error> {
        sink.write(&[self.prompt, b' '])?;
        sink.write(view.content)?;
        if self.ansi {
            let behind = view.content.len().saturating_sub(view.cursor);
            for _ in 0..behind {
                sink.write(CURSOR_LEFT)?;
            }
        }
        sink.flush()
    }

    /// Erase the rendered line.
    ///
    /// # Errors
    ///
    /// Forwards the sink's error.
    pub fn clear<S: Sink + ?Sized>(&self, sink: &mut S) -> Result<(), S::Error> {
        if self.ansi {
            return sink.write(ERASE_LINE);
        }
        sink.write(b"\r")?;
        // Prompt and separator take two columns.
        let mut remaining = self.width + 2;
        while remaining > 0 {
            let chunk = remaining.min(BLANKS.len());
            sink.write(&BLANKS[..chunk])?;
            remaining -= chunk;
        }
        sink.write(b"\r")
    }

    /// Clear, then draw.
    ///
    /// # Errors
    ///
    /// Forwards the sink's error.
    pub fn redraw<S: Sink + ?Sized>(&self, sink: &mut S, view: LineView<'_>) -> Result<(), S::Error> {
        self.clear(sink)?;
        self.draw(sink, view)
    }
}
