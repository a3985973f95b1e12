//! Command name completion.

use super::registry::Registry;

/// What a completion request asks the editor to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion<'r> {
    /// Leave the line alone.
    Nothing,
    /// Insert `suffix` at the cursor, then a space if `separator` is set.
    Insert {
        /// Bytes completing the typed prefix.
        suffix: &'r [u8],
        /// The match is unique; close the command name with a space.
        separator: bool,
    },
    /// Print every name in [`Registry::matching`] for the typed prefix, one
    /// per line, then redraw. The line is not changed.
    List,
}

/// Resolve a completion request.
///
/// `line` is the active line and `cursor` the cursor position in it;
/// `repeat` counts consecutive requests, starting at 1. Only the command
/// name can be completed: the request does nothing on an empty line or when
/// a space precedes the cursor.
///
/// On the first request a unique match is completed in full and followed by
/// a space, several matches are completed up to their longest common prefix.
/// Later requests list the matches.
///
/// # Examples
///
/// ```rust
/// use fwshell::system::shell::{Command, CommandResult, Completion, Registry, complete};
///
/// fn ok(_argc: usize, _argv: &[&str]) -> CommandResult {
///     CommandResult::Ok
/// }
///
/// static COMMANDS: &[Command] = &[
///     Command::new("help", "", ok),
///     Command::new("heap", "", ok),
///     Command::new("heap_min", "", ok),
/// ];
/// let registry = Registry::from_static(COMMANDS).unwrap();
///
/// assert_eq!(
///     complete(&registry, b"hel", 3, 1),
///     Completion::Insert { suffix: b"p", separator: true }
/// );
/// assert_eq!(
///     complete(&registry, b"hea", 3, 1),
///     Completion::Insert { suffix: b"p", separator: false }
/// );
/// assert_eq!(complete(&registry, b"he", 2, 1), Completion::Nothing);
/// assert_eq!(complete(&registry, b"he", 2, 2), Completion::List);
/// ```
pub fn complete<'r>(
    registry: &'r Registry,
    line: &[u8],
    cursor: usize,
    repeat: usize,
) -> Completion<'r> {
    if line.is_empty() || cursor > line.len() {
        return Completion::Nothing;
    }
    let prefix = &line[..cursor];
    if prefix.contains(&b' ') {
        return Completion::Nothing;
    }

    let mut matches = registry.matching(prefix);
    let Some(first) = matches.next() else {
        return Completion::Nothing;
    };

    if repeat > 1 {
        return Completion::List;
    }

    let first = first.name.as_bytes();
    let mut common = first.len();
    let mut count = 1;
    for other in matches {
        common = common_prefix_len(&first[..common], other.name.as_bytes());
        count += 1;
    }

    if count == 1 {
        return Completion::Insert {
            suffix: &first[cursor..],
            separator: true,
        };
    }
    if common > cursor {
        return Completion::Insert {
            suffix: &first[cursor..common],
            separator: false,
        };
    }
    Completion::Nothing
}

/// Length of the longest common prefix of `a` and `b`.
pub fn common_prefix_len(a: &[u8], b: &[u8]) -> usize {
    a.iter().zip(b).take_while(|(x, y)| x == y).count()
}
