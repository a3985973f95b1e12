//! Running commands on worker threads.
//!
//! Every dispatch spawns one worker for the matched command and waits on a
//! single-use completion channel:
//!
//! - **Sync**: the caller blocks until the worker reports the command's
//!   result. A worker that panics drops its end of the channel and the
//!   dispatch reports [`CommandResult::RuntimeError`].
//! - **Async**: the worker acknowledges once its arguments are prepared and
//!   only then runs the command. The caller waits for the acknowledgement up
//!   to a timeout and returns. The command's own result is not observed.
//!
//! There is no cancellation. A worker whose acknowledgement timed out still
//! runs to completion; its result goes nowhere.

use std::fmt;
use std::io;
use std::sync::mpsc::{self, RecvTimeoutError, SyncSender};
use std::thread;
use std::time::Duration;

use log::{debug, warn};

use super::error::CommandResult;
use super::registry::{Command, CommandFn, Registry};
use super::tokenize::{ExecutionMode, Tokens};

/// Work handed to a [`Spawn`] implementation.
pub type Job = Box<dyn FnOnce() + Send + 'static>;

/// Creates the execution context a command runs in.
pub trait Spawn: Send {
    /// Start `job` concurrently with the caller.
    ///
    /// `command` carries the name and the stack and priority hints.
    ///
    /// # Errors
    ///
    /// Returns the error of the underlying scheduler when the context cannot
    /// be created; `job` is dropped without running.
    fn spawn(&self, command: &Command, job: Job) -> io::Result<()>;
}

/// Runs each command on its own detached OS thread.
///
/// The thread is named after the command and gets the command's stack size.
/// The priority hint has no portable equivalent and is only logged.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadSpawner;

impl Spawn for ThreadSpawner {
    fn spawn(&self, command: &Command, job: Job) -> io::Result<()> {
        thread::Builder::new()
            .name(command.name.into())
            .stack_size(command.stack_size)
            .spawn(job)
            .map(drop)
    }
}

/// Resolves command lines against a registry and runs them.
pub struct Dispatcher {
    async_timeout: Duration,
    spawner: Box<dyn Spawn>,
}

impl fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher")
            .field("async_timeout", &self.async_timeout)
            .finish_non_exhaustive()
    }
}

impl Dispatcher {
    /// Dispatcher running commands on OS threads.
    ///
    /// `async_timeout` bounds the wait for an asynchronous command's
    /// acknowledgement unless the command declares its own.
    pub fn new(async_timeout: Duration) -> Self {
        Self::with_spawner(async_timeout, ThreadSpawner)
    }

    /// Dispatcher creating workers through `spawner`.
    pub fn with_spawner(async_timeout: Duration, spawner: impl Spawn + 'static) -> Self {
        Self {
            async_timeout,
            spawner: Box::new(spawner),
        }
    }

    /// Look up the command named by the first token and run it.
    ///
    /// A line without tokens succeeds without running anything; an unknown
    /// name yields [`CommandResult::NotFound`].
    ///
    /// # Arguments
    ///
    /// * `registry` - Commands to resolve the name against
    /// * `tokens` - The tokenized line, command name first
    ///
    /// # Examples
    ///
    /// ```rust
    /// use std::time::Duration;
    /// use fwshell::system::shell::{Command, CommandResult, Dispatcher, Registry, tokenize};
    ///
    /// fn check(argc: usize, _argv: &[&str]) -> CommandResult {
    ///     if argc < 2 { CommandResult::ArgError } else { CommandResult::Ok }
    /// }
    ///
    /// static COMMANDS: &[Command] = &[Command::new("check", "Check a value", check)];
    /// let registry = Registry::from_static(COMMANDS).unwrap();
    /// let dispatcher = Dispatcher::new(Duration::from_millis(100));
    ///
    /// assert_eq!(dispatcher.dispatch(&registry, tokenize::<64>(b"check")), CommandResult::ArgError);
    /// assert_eq!(dispatcher.dispatch(&registry, tokenize::<64>(b"check &")), CommandResult::Ok);
    /// assert_eq!(dispatcher.dispatch(&registry, tokenize::<64>(b"chk")), CommandResult::NotFound);
    /// ```
    pub fn dispatch<const N: usize>(&self, registry: &Registry, tokens: Tokens<N>) -> CommandResult {
        let Some(name) = tokens.command() else {
            return CommandResult::Ok;
        };
        match registry.find(name) {
            Some(command) => self.run(command, tokens),
            None => CommandResult::NotFound,
        }
    }

    /// Run `command` with `tokens` as its argument vector.
    ///
    /// The wait protocol follows [`Tokens::mode`].
    ///
    /// # Returns
    ///
    /// - Sync: the command's own result, or [`CommandResult::RuntimeError`]
    ///   if the worker could not start, could not prepare its arguments, or
    ///   panicked
    /// - Async: [`CommandResult::Ok`] once the worker acknowledged,
    ///   [`CommandResult::AsyncTimeout`] if it did not do so in time
    pub fn run<const N: usize>(&self, command: &Command, tokens: Tokens<N>) -> CommandResult {
        let mode = tokens.mode();
        let (completion, receiver) = mpsc::sync_channel(1);
        let invocation = Invocation {
            handler: command.handler,
            tokens,
            mode,
            completion,
        };

        debug!(
            "spawning {} ({:?}, stack {}, priority {})",
            command.name, mode, command.stack_size, command.priority
        );
        if let Err(e) = self
            .spawner
            .spawn(command, Box::new(move || invocation.execute()))
        {
            warn!("cannot start {}: {}", command.name, e);
            return CommandResult::RuntimeError;
        }

        match mode {
            ExecutionMode::Sync => receiver.recv().unwrap_or(CommandResult::RuntimeError),
            ExecutionMode::Async => {
                let timeout = command.async_timeout.unwrap_or(self.async_timeout);
                match receiver.recv_timeout(timeout) {
                    Ok(result) => result,
                    Err(RecvTimeoutError::Timeout) => {
                        warn!("{} not started within {:?}", command.name, timeout);
                        CommandResult::AsyncTimeout
                    }
                    Err(RecvTimeoutError::Disconnected) => CommandResult::RuntimeError,
                }
            }
        }
    }
}

/// One dispatch, moved into the worker.
struct Invocation<const N: usize> {
    handler: CommandFn,
    tokens: Tokens<N>,
    mode: ExecutionMode,
    completion: SyncSender<CommandResult>,
}

impl<const N: usize> Invocation<N> {
    fn execute(self) {
        let argc = self.tokens.argc();
        let mut argv: Vec<&str> = Vec::new();
        if argv.try_reserve_exact(argc).is_err() {
            let _ = self.completion.send(CommandResult::RuntimeError);
            return;
        }
        for index in 0..argc {
            match self.tokens.get(index) {
                Some(arg) => argv.push(arg),
                None => {
                    // Handlers take text; a non UTF-8 argument aborts the run.
                    let _ = self.completion.send(CommandResult::RuntimeError);
                    return;
                }
            }
        }

        // The receiver may be gone after a timeout; nobody is left to tell.
        if self.mode == ExecutionMode::Async {
            let _ = self.completion.send(CommandResult::Ok);
        }
        let result = (self.handler)(argc, &argv);
        if self.mode == ExecutionMode::Sync {
            let _ = self.completion.send(result);
        }
    }
}
