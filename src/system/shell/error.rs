//! Result codes and error types for the shell

use core::fmt;

/// Outcome of running a command.
///
/// Command entry points return one of the first three variants. The
/// remaining ones are produced by the dispatcher when it cannot hand the
/// invocation to a worker or cannot observe its result. Every variant is
/// recoverable: the session prints [`message`](Self::message), if any, and
/// goes back to editing.
///
/// The integer codes are stable and match the ones used on the firmware
/// side, so a code reported over another channel can be mapped back with
/// [`from_code`](Self::from_code).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandResult {
    /// The command completed successfully.
    Ok,
    /// The command rejected its arguments.
    ArgError,
    /// The command failed for a reason of its own.
    GenericError,
    /// No registered command has the requested name.
    NotFound,
    /// An asynchronous command did not acknowledge within its timeout.
    AsyncTimeout,
    /// The invocation could not be prepared or its worker could not be started.
    RuntimeError,
}

impl CommandResult {
    /// Integer code of this result.
    pub const fn code(self) -> i32 {
        match self {
            CommandResult::Ok => 0,
            CommandResult::ArgError => -0x01,
            CommandResult::GenericError => -0x02,
            CommandResult::NotFound => -0x11,
            CommandResult::AsyncTimeout => -0x12,
            CommandResult::RuntimeError => -0x13,
        }
    }

    /// Map an integer code back to a result.
    ///
    /// Unknown codes are reported as [`CommandResult::GenericError`].
    pub const fn from_code(code: i32) -> Self {
        match code {
            0 => CommandResult::Ok,
            -0x01 => CommandResult::ArgError,
            -0x11 => CommandResult::NotFound,
            -0x12 => CommandResult::AsyncTimeout,
            -0x13 => CommandResult::RuntimeError,
            _ => CommandResult::GenericError,
        }
    }

    /// The line shown to the user after dispatch, if any.
    ///
    /// Errors reported by the command itself print nothing here; the command
    /// is expected to have explained itself.
    pub const fn message(self) -> Option<&'static str> {
        match self {
            CommandResult::NotFound => Some("Command not found"),
            CommandResult::AsyncTimeout | CommandResult::RuntimeError => {
                Some("Error running the command...")
            }
            CommandResult::Ok | CommandResult::ArgError | CommandResult::GenericError => None,
        }
    }
}

impl fmt::Display for CommandResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CommandResult::Ok => "ok",
            CommandResult::ArgError => "argument error",
            CommandResult::GenericError => "command error",
            CommandResult::NotFound => "command not found",
            CommandResult::AsyncTimeout => "async acknowledgement timed out",
            CommandResult::RuntimeError => "runtime error",
        };
        write!(f, "{} ({})", name, self.code())
    }
}

/// Errors raised while assembling a [`Registry`](super::Registry).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistryError {
    /// A command was registered with an empty name.
    EmptyName,
    /// The registry already holds [`MAX_COMMANDS`](super::registry::MAX_COMMANDS) commands.
    Full,
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegistryError::EmptyName => f.write_str("command name must not be empty"),
            RegistryError::Full => f.write_str("command registry is full"),
        }
    }
}

/// Errors raised while loading a [`Config`](super::Config).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// The JSON document could not be parsed.
    Parse,
    /// The printable range is empty or not ASCII.
    InvalidPrintableRange,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Parse => f.write_str("malformed shell configuration"),
            ConfigError::InvalidPrintableRange => f.write_str("invalid printable byte range"),
        }
    }
}

/// Transport failures seen by the input loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// Reading from the console failed.
    ReadError,
    /// Writing to or flushing the console failed.
    WriteError,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::ReadError => f.write_str("console read failed"),
            Error::WriteError => f.write_str("console write failed"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

#[cfg(feature = "defmt")]
impl defmt::Format for CommandResult {
    fn format(&self, f: defmt::Formatter) {
        match self {
            CommandResult::Ok => defmt::write!(f, "Ok"),
            CommandResult::ArgError => defmt::write!(f, "ArgError"),
            CommandResult::GenericError => defmt::write!(f, "GenericError"),
            CommandResult::NotFound => defmt::write!(f, "NotFound"),
            CommandResult::AsyncTimeout => defmt::write!(f, "AsyncTimeout"),
            CommandResult::RuntimeError => defmt::write!(f, "RuntimeError"),
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for RegistryError {
    fn format(&self, f: defmt::Formatter) {
        match self {
            RegistryError::EmptyName => defmt::write!(f, "EmptyName"),
            RegistryError::Full => defmt::write!(f, "Full"),
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for ConfigError {
    fn format(&self, f: defmt::Formatter) {
        match self {
            ConfigError::Parse => defmt::write!(f, "Parse"),
            ConfigError::InvalidPrintableRange => defmt::write!(f, "InvalidPrintableRange"),
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Error {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Error::ReadError => defmt::write!(f, "ReadError"),
            Error::WriteError => defmt::write!(f, "WriteError"),
        }
    }
}
