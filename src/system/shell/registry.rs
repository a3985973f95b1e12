//! Command descriptors and the ordered command registry.
//!
//! The registry is assembled once during start-up with a [`RegistryBuilder`]
//! and is read-only afterwards. Lookup and completion walk it in
//! registration order, so when two commands share a name the first one
//! registered wins.
//!
//! ```rust
//! use fwshell::system::shell::{Command, CommandResult, Registry};
//!
//! fn heap(_argc: usize, _argv: &[&str]) -> CommandResult {
//!     CommandResult::Ok
//! }
//!
//! static SYSTEM: &[Command] = &[
//!     Command::new("heap", "Show free heap", heap),
//!     Command::new("heap_min", "Show minimum free heap", heap).with_priority(5),
//! ];
//!
//! let registry = Registry::builder()
//!     .with_static(SYSTEM)
//!     .unwrap()
//!     .with(Command::new("restart", "Restart the device", heap).with_stack_size(8 * 1024))
//!     .unwrap()
//!     .build();
//!
//! assert_eq!(registry.len(), 3);
//! assert!(registry.find(b"heap_min").is_some());
//! ```

use core::fmt;
use core::time::Duration;

use heapless::Vec;

use super::error::{CommandResult, RegistryError};

/// Maximum number of commands in a registry.
pub const MAX_COMMANDS: usize = 32;

/// Stack size hint given to a command's worker when none is declared.
pub const DEFAULT_STACK_SIZE: usize = 32 * 1024;

/// Priority hint given to a command's worker when none is declared.
pub const DEFAULT_PRIORITY: u8 = 10;

/// Entry point of a command.
///
/// `argv[0]` is the command name; `argc == argv.len()`.
pub type CommandFn = fn(argc: usize, argv: &[&str]) -> CommandResult;

/// A registered command.
#[derive(Clone, Copy)]
pub struct Command {
    /// Name typed by the user. Case-sensitive.
    pub name: &'static str,
    /// One line shown by `list` and `<name> --help`.
    pub description: &'static str,
    /// Stack size requested for the worker running the command.
    pub stack_size: usize,
    /// Scheduling priority hint. Host threads have no priorities, so this is
    /// only reported in diagnostics there.
    pub priority: u8,
    /// Acknowledgement timeout for asynchronous runs, overriding the
    /// session-wide one.
    pub async_timeout: Option<Duration>,
    /// The function that implements the command.
    pub handler: CommandFn,
}

impl Command {
    /// Describe a command with default worker hints.
    pub const fn new(name: &'static str, description: &'static str, handler: CommandFn) -> Self {
        Self {
            name,
            description,
            stack_size: DEFAULT_STACK_SIZE,
            priority: DEFAULT_PRIORITY,
            async_timeout: None,
            handler,
        }
    }

    /// Request a specific worker stack size.
    pub const fn with_stack_size(mut self, stack_size: usize) -> Self {
        self.stack_size = stack_size;
        self
    }

    /// Request a specific worker priority.
    pub const fn with_priority(mut self, priority: u8) -> Self {
        self.priority = priority;
        self
    }

    /// Give asynchronous runs of this command their own acknowledgement timeout.
    pub const fn with_async_timeout(mut self, timeout: Duration) -> Self {
        self.async_timeout = Some(timeout);
        self
    }
}

impl fmt::Debug for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Command")
            .field("name", &self.name)
            .field("stack_size", &self.stack_size)
            .field("priority", &self.priority)
            .field("async_timeout", &self.async_timeout)
            .finish_non_exhaustive()
    }
}

/// Ordered, read-only set of commands.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    commands: Vec<Command, MAX_COMMANDS>,
}

impl Registry {
    /// Start assembling a registry.
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::default()
    }

    /// Registry holding exactly the given table.
    ///
    /// # Errors
    ///
    /// See [`RegistryBuilder::with_static`].
    pub fn from_static(commands: &'static [Command]) -> Result<Self, RegistryError> {
        Ok(Self::builder().with_static(commands)?.build())
    }

    /// Commands in registration order.
    pub fn iter(&self) -> core::slice::Iter<'_, Command> {
        self.commands.iter()
    }

    /// Number of commands.
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// Whether no command is registered.
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// First command whose name is exactly `name`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use fwshell::system::shell::{Command, CommandResult, Registry};
    ///
    /// fn ok(_argc: usize, _argv: &[&str]) -> CommandResult {
    ///     CommandResult::Ok
    /// }
    ///
    /// let registry = Registry::builder()
    ///     .with(Command::new("heap", "Show free heap", ok))
    ///     .unwrap()
    ///     .build();
    ///
    /// assert_eq!(registry.find(b"heap").map(|c| c.description), Some("Show free heap"));
    /// assert!(registry.find(b"hea").is_none());
    /// ```
    pub fn find(&self, name: &[u8]) -> Option<&Command> {
        self.commands
            .iter()
            .find(|command| command.name.as_bytes() == name)
    }

    /// Commands whose name starts with `prefix`, in registration order.
    pub fn matching<'a>(&'a self, prefix: &'a [u8]) -> impl Iterator<Item = &'a Command> + 'a {
        self.commands
            .iter()
            .filter(move |command| command.name.as_bytes().starts_with(prefix))
    }
}

impl<'a> IntoIterator for &'a Registry {
    type Item = &'a Command;
    type IntoIter = core::slice::Iter<'a, Command>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Assembles a [`Registry`] during start-up.
#[derive(Debug, Clone, Default)]
pub struct RegistryBuilder {
    commands: Vec<Command, MAX_COMMANDS>,
}

impl RegistryBuilder {
    /// Append one command.
    ///
    /// # Errors
    ///
    /// [`RegistryError::EmptyName`] for a command without a name,
    /// [`RegistryError::Full`] once [`MAX_COMMANDS`] are registered.
    pub fn register(&mut self, command: Command) -> Result<&mut Self, RegistryError> {
        if command.name.is_empty() {
            return Err(RegistryError::EmptyName);
        }
        self.commands
            .push(command)
            .map_err(|_| RegistryError::Full)?;
        Ok(self)
    }

    /// Append one command, builder style.
    ///
    /// # Errors
    ///
    /// See [`register`](Self::register).
    pub fn with(mut self, command: Command) -> Result<Self, RegistryError> {
        self.register(command)?;
        Ok(self)
    }

    /// Append a whole table, keeping its order.
    ///
    /// # Errors
    ///
    /// See [`register`](Self::register). Commands of the table that come
    /// before the failing one stay registered.
    pub fn with_static(mut self, commands: &'static [Command]) -> Result<Self, RegistryError> {
        for command in commands {
            self.register(*command)?;
        }
        Ok(self)
    }

    /// Freeze the registry.
    pub fn build(self) -> Registry {
        Registry {
            commands: self.commands,
        }
    }
}
