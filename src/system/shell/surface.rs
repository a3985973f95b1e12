//! The render surface shared by the editor, commands and the logger.
//!
//! Three writers reach the console: the input loop redrawing the prompt,
//! command workers printing results, and log records. [`Surface`] funnels
//! them through one lock so their output never interleaves, and keeps the
//! last prompt state so any writer can clear it before printing and draw it
//! again afterwards.
//!
//! While a synchronous command runs, the prompt is not on screen and the
//! command owns the console: [`Surface::suppress`] turns printing into raw
//! writes until the returned guard is dropped.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use super::error::Error;
use super::history::LineView;
use super::render::Renderer;
use super::transport::Sink;

/// Newline sequence used for shell output.
pub const NEWLINE: &[u8] = b"\r\n";

#[derive(Debug)]
struct State<S> {
    sink: S,
    renderer: Renderer,
    content: Vec<u8>,
    cursor: usize,
    suppressed: bool,
    // Raw output left the terminal cursor after text on an unfinished line.
    dangling: bool,
}

impl<S: Sink> State<S> {
    fn store(&mut self, view: LineView<'_>) {
        self.content.clear();
        self.content.extend_from_slice(view.content);
        self.cursor = view.cursor;
    }

    fn clear(&mut self) -> Result<(), Error> {
        if core::mem::take(&mut self.dangling) {
            return self.write(NEWLINE);
        }
        let renderer = self.renderer;
        renderer.clear(&mut self.sink).map_err(|_| Error::WriteError)
    }

    fn draw(&mut self) -> Result<(), Error> {
        let renderer = self.renderer;
        let view = LineView {
            content: &self.content,
            cursor: self.cursor,
        };
        renderer
            .draw(&mut self.sink, view)
            .map_err(|_| Error::WriteError)
    }

    fn write(&mut self, bytes: &[u8]) -> Result<(), Error> {
        if self.suppressed && !bytes.is_empty() {
            self.dangling = !bytes.ends_with(b"\n");
        }
        self.sink.write(bytes).map_err(|_| Error::WriteError)
    }

    fn flush(&mut self) -> Result<(), Error> {
        self.sink.flush().map_err(|_| Error::WriteError)
    }

    /// Run `body` between a clear and a draw of the prompt, unless suppressed.
    fn around_prompt(
        &mut self,
        body: impl FnOnce(&mut Self) -> Result<(), Error>,
    ) -> Result<(), Error> {
        if self.suppressed {
            body(self)?;
            return self.flush();
        }
        self.clear()?;
        body(self)?;
        self.draw()
    }
}

/// Shared handle to the console sink and the displayed prompt line.
///
/// Cloning is cheap; all clones refer to the same console.
#[derive(Debug)]
pub struct Surface<S> {
    state: Arc<Mutex<State<S>>>,
}

impl<S> Clone for Surface<S> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
        }
    }
}

impl<S> Surface<S> {
    // A writer that panicked mid-write leaves at worst a garbled line; the
    // next redraw repairs it.
    fn lock(&self) -> MutexGuard<'_, State<S>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<S: Sink> Surface<S> {
    /// Surface over `sink` for lines of up to `capacity` bytes.
    pub fn new(sink: S, renderer: Renderer, capacity: usize) -> Self {
        Self {
            state: Arc::new(Mutex::new(State {
                sink,
                renderer,
                content: Vec::with_capacity(capacity),
                cursor: 0,
                suppressed: false,
                dangling: false,
            })),
        }
    }

    /// Record the prompt state without drawing it.
    pub fn set_view(&self, view: LineView<'_>) {
        self.lock().store(view);
    }

    /// Record the prompt state and redraw it.
    ///
    /// # Errors
    ///
    /// [`Error::WriteError`] if the sink fails.
    pub fn show(&self, view: LineView<'_>) -> Result<(), Error> {
        let mut state = self.lock();
        state.store(view);
        state.clear()?;
        state.draw()
    }

    /// Draw the recorded prompt state.
    ///
    /// # Errors
    ///
    /// [`Error::WriteError`] if the sink fails.
    pub fn draw(&self) -> Result<(), Error> {
        self.lock().draw()
    }

    /// Clear and draw the recorded prompt state.
    ///
    /// When a synchronous command left its last line unfinished, a newline
    /// is written instead of the clear so that line stays visible.
    ///
    /// # Errors
    ///
    /// [`Error::WriteError`] if the sink fails.
    pub fn redraw(&self) -> Result<(), Error> {
        let mut state = self.lock();
        state.clear()?;
        state.draw()
    }

    /// Print text above the prompt.
    ///
    /// The prompt is cleared, `text` written and the prompt drawn again. While
    /// suppressed the text is written as is.
    ///
    /// # Arguments
    ///
    /// * `text` - Text to print, including any line endings it needs
    ///
    /// # Errors
    ///
    /// [`Error::WriteError`] if the sink fails.
    ///
    /// # Examples
    ///
    /// ```
    /// use fwshell::system::shell::{IoSink, LineView, Renderer, Surface};
    ///
    /// let surface = Surface::new(IoSink::new(Vec::new()), Renderer::new(b'$', true, 32), 32);
    /// surface.set_view(LineView { content: b"he", cursor: 2 });
    ///
    /// surface.print("link up\r\n").unwrap();
    ///
    /// let output = surface
    ///     .with_sink(|sink| std::mem::replace(sink, IoSink::new(Vec::new())))
    ///     .into_inner();
    /// assert_eq!(output, b"\r\x1b[Klink up\r\n$ he");
    /// ```
    pub fn print(&self, text: &str) -> Result<(), Error> {
        self.print_bytes(text.as_bytes())
    }

    /// [`print`](Self::print) for raw bytes.
    ///
    /// # Errors
    ///
    /// [`Error::WriteError`] if the sink fails.
    pub fn print_bytes(&self, bytes: &[u8]) -> Result<(), Error> {
        self.lock().around_prompt(|state| state.write(bytes))
    }

    /// Print `text` followed by a newline, as one unit.
    ///
    /// # Errors
    ///
    /// [`Error::WriteError`] if the sink fails.
    pub fn println(&self, text: &str) -> Result<(), Error> {
        self.lock().around_prompt(|state| {
            state.write(text.as_bytes())?;
            state.write(NEWLINE)
        })
    }

    /// Print one line per item below the current prompt line, then draw
    /// the prompt again.
    ///
    /// # Errors
    ///
    /// [`Error::WriteError`] if the sink fails.
    pub fn print_list<'a>(&self, lines: impl IntoIterator<Item = &'a str>) -> Result<(), Error> {
        let mut state = self.lock();
        state.write(NEWLINE)?;
        for line in lines {
            state.write(line.as_bytes())?;
            state.write(NEWLINE)?;
        }
        if state.suppressed {
            return state.flush();
        }
        state.draw()
    }

    /// Write bytes without touching the prompt.
    ///
    /// # Errors
    ///
    /// [`Error::WriteError`] if the sink fails.
    pub fn write_raw(&self, bytes: &[u8]) -> Result<(), Error> {
        let mut state = self.lock();
        state.write(bytes)?;
        state.flush()
    }

    /// Hand the console to a synchronous command until the guard drops.
    pub fn suppress(&self) -> SuppressGuard<S> {
        self.lock().suppressed = true;
        SuppressGuard {
            surface: self.clone(),
        }
    }

    /// Whether a synchronous command currently owns the console.
    pub fn is_suppressed(&self) -> bool {
        self.lock().suppressed
    }

    /// Run `f` with exclusive access to the sink.
    pub fn with_sink<R>(&self, f: impl FnOnce(&mut S) -> R) -> R {
        f(&mut self.lock().sink)
    }
}

/// Ends a [`Surface::suppress`] window when dropped.
#[derive(Debug)]
pub struct SuppressGuard<S> {
    surface: Surface<S>,
}

impl<S> Drop for SuppressGuard<S> {
    fn drop(&mut self) {
        self.surface.lock().suppressed = false;
    }
}
