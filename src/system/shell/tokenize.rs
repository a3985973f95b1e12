//! Splitting an accepted line into arguments.
//!
//! ```text
//! foo "hello world" bar     ["foo", "hello world", "bar"]
//! foo bar &                 ["foo", "bar"], asynchronous
//! foo \"bar                 ["foo", "\"bar"]
//! say "unterminated text    ["say", "unterminated text"]
//! ```
//!
//! Spaces separate arguments outside double quotes and are kept inside
//! them. A double quote preceded by a backslash is a literal quote and the
//! backslash is dropped; any other backslash is kept as is. A `&` at the end
//! of the line, trailing spaces aside, requests asynchronous execution and
//! is removed. Tokenizing never fails.

use heapless::Vec;

/// How the dispatcher waits for a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExecutionMode {
    /// Wait until the command returns.
    #[default]
    Sync,
    /// Wait only for the worker to start, then let it run detached.
    Async,
}

/// Byte marking an asynchronous invocation.
pub const ASYNC_MARKER: u8 = b'&';

/// Byte that makes the following double quote literal.
pub const ESCAPE: u8 = b'\\';

const QUOTE: u8 = b'"';
const SPACE: u8 = b' ';

/// Argument vector of one line, owning its bytes.
///
/// `N` bounds the line length; a line of `N` bytes has at most `N / 2 + 1`
/// arguments, so the span table never runs out of room.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Tokens<const N: usize> {
    bytes: Vec<u8, N>,
    spans: Vec<(usize, usize), N>,
    mode: ExecutionMode,
}

impl<const N: usize> Tokens<N> {
    /// Number of arguments, command name included.
    pub fn argc(&self) -> usize {
        self.spans.len()
    }

    /// Whether the line held no argument at all.
    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }

    /// Execution mode requested by the line.
    pub fn mode(&self) -> ExecutionMode {
        self.mode
    }

    /// Whether the line ended with the asynchronous marker.
    pub fn is_async(&self) -> bool {
        self.mode == ExecutionMode::Async
    }

    /// Raw bytes of argument `index`.
    pub fn get_bytes(&self, index: usize) -> Option<&[u8]> {
        let &(start, end) = self.spans.get(index)?;
        self.bytes.get(start..end)
    }

    /// Argument `index` as text, `None` if out of range or not UTF-8.
    pub fn get(&self, index: usize) -> Option<&str> {
        core::str::from_utf8(self.get_bytes(index)?).ok()
    }

    /// The command name.
    pub fn command(&self) -> Option<&[u8]> {
        self.get_bytes(0)
    }

    /// Arguments as raw bytes, in order.
    pub fn iter(&self) -> impl Iterator<Item = &[u8]> + '_ {
        self.spans
            .iter()
            .filter_map(|&(start, end)| self.bytes.get(start..end))
    }

    fn close(&mut self, begin: usize) {
        let _ = self.spans.push((begin, self.bytes.len()));
    }
}

/// Split `line` into arguments.
///
/// Bytes beyond the capacity `N` are dropped; lines coming from a
/// [`LineBuffer`](super::LineBuffer) of the same capacity always fit.
///
/// # Arguments
///
/// * `line` - An accepted command line
///
/// # Returns
///
/// The arguments, command name first, and the execution mode requested by a
/// trailing `&`.
///
/// # Examples
///
/// ```rust
/// use fwshell::system::shell::{ExecutionMode, tokenize};
///
/// let tokens = tokenize::<64>(br#"scan "lab network" --ssid \"x &"#);
/// assert_eq!(tokens.argc(), 4);
/// assert_eq!(tokens.get(1), Some("lab network"));
/// assert_eq!(tokens.get(3), Some("\"x"));
/// assert_eq!(tokens.mode(), ExecutionMode::Async);
/// ```
pub fn tokenize<const N: usize>(line: &[u8]) -> Tokens<N> {
    let (line, mode) = split_async_marker(line);
    let mut tokens = Tokens {
        mode,
        ..Tokens::default()
    };

    let mut in_quotes = false;
    let mut start: Option<usize> = None;
    let mut i = 0;
    while i < line.len() {
        let byte = line[i];
        match byte {
            ESCAPE if line.get(i + 1) == Some(&QUOTE) => {
                start.get_or_insert(tokens.bytes.len());
                if tokens.bytes.push(QUOTE).is_err() {
                    break;
                }
                i += 2;
                continue;
            }
            QUOTE => {
                in_quotes = !in_quotes;
                start.get_or_insert(tokens.bytes.len());
            }
            SPACE if !in_quotes => {
                if let Some(begin) = start.take() {
                    tokens.close(begin);
                }
            }
            _ => {
                start.get_or_insert(tokens.bytes.len());
                if tokens.bytes.push(byte).is_err() {
                    break;
                }
            }
        }
        i += 1;
    }
    if let Some(begin) = start {
        tokens.close(begin);
    }
    tokens
}

/// Strip a trailing asynchronous marker.
///
/// The marker is only recognized past the first byte, so a line made of a
/// lone `&` is a command named `&`.
pub fn split_async_marker(line: &[u8]) -> (&[u8], ExecutionMode) {
    match line.iter().rposition(|&byte| byte != SPACE) {
        Some(last) if last > 0 && line[last] == ASYNC_MARKER => {
            (&line[..last], ExecutionMode::Async)
        }
        _ => (line, ExecutionMode::Sync),
    }
}
