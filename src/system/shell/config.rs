//! Runtime configuration of a shell session.
//!
//! Capacities (maximum line length and history depth) are compile-time
//! parameters of [`LineBuffer`](super::LineBuffer) and
//! [`Shell`](super::Shell); everything else lives here and can be loaded
//! from a small JSON document, for example one stored in a flash partition:
//!
//! ```rust
//! use fwshell::system::shell::Config;
//!
//! let config = Config::from_json(br#"{"prompt": 62, "async_timeout_ms": 250}"#).unwrap();
//! assert_eq!(config.prompt, b'>');
//! assert!(config.autocomplete);
//! ```

use core::time::Duration;

use serde::Deserialize;

use super::error::ConfigError;

/// Default prompt delimiter.
pub const DEFAULT_PROMPT: u8 = b'$';

/// Default acknowledgement timeout for asynchronous commands, in milliseconds.
pub const DEFAULT_ASYNC_TIMEOUT_MS: u32 = 100;

/// Default pause of the input loop between two bytes, in milliseconds.
pub const DEFAULT_INPUT_POLL_MS: u32 = 20;

/// Shell configuration.
///
/// Missing JSON fields take their [`Default`] value.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Byte drawn in front of the edited line.
    pub prompt: u8,
    /// Lowest byte inserted as literal input.
    pub printable_min: u8,
    /// Highest byte inserted as literal input. Must stay within ASCII.
    pub printable_max: u8,
    /// Decode cursor/history/insert/delete escape sequences.
    pub escape_sequences: bool,
    /// Keep a history of accepted lines. Needs `escape_sequences`.
    pub history: bool,
    /// Complete command names on tab.
    pub autocomplete: bool,
    /// How long an asynchronous dispatch waits for the worker to acknowledge.
    pub async_timeout_ms: u32,
    /// Pause of the input loop after each processed byte.
    pub input_poll_ms: u32,
    /// Answer `list` with the registered commands when no command of that
    /// name is registered. Off by default, so `list` is otherwise not found.
    pub list_command: bool,
    /// Answer `<command> -h` and `<command> --help` with the description
    /// instead of running the command. Off by default, so commands see the
    /// flag in their own arguments.
    pub help_flags: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            prompt: DEFAULT_PROMPT,
            printable_min: 0x20,
            printable_max: 0x7E,
            escape_sequences: true,
            history: true,
            autocomplete: true,
            async_timeout_ms: DEFAULT_ASYNC_TIMEOUT_MS,
            input_poll_ms: DEFAULT_INPUT_POLL_MS,
            list_command: false,
            help_flags: false,
        }
    }
}

impl Config {
    /// Parse and validate a JSON configuration document.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Parse`] if the document is not valid JSON for this
    /// struct, [`ConfigError::InvalidPrintableRange`] if it fails
    /// [`validate`](Self::validate).
    pub fn from_json(json: &[u8]) -> Result<Self, ConfigError> {
        let (config, _) =
            serde_json_core::from_slice::<Config>(json).map_err(|_| ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    /// Check the invariants the editor relies on.
    ///
    /// # Errors
    ///
    /// [`ConfigError::InvalidPrintableRange`] when the printable range is
    /// empty, starts below the space character or extends past ASCII `~`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.printable_min > self.printable_max
            || self.printable_min < 0x20
            || self.printable_max > 0x7E
        {
            return Err(ConfigError::InvalidPrintableRange);
        }
        Ok(())
    }

    /// Whether `byte` is inserted into the line as typed.
    pub fn is_printable(&self, byte: u8) -> bool {
        (self.printable_min..=self.printable_max).contains(&byte)
    }

    /// History navigation is only reachable through the arrow-key sequences.
    pub fn history_active(&self) -> bool {
        self.history && self.escape_sequences
    }

    /// The default acknowledgement timeout of asynchronous dispatch.
    pub fn async_timeout(&self) -> Duration {
        Duration::from_millis(u64::from(self.async_timeout_ms))
    }

    /// The pause of the input loop between two bytes.
    pub fn input_poll(&self) -> Duration {
        Duration::from_millis(u64::from(self.input_poll_ms))
    }
}
