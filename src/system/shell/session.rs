//! The interactive session: input loop, editing and dispatch.

use std::thread;

use log::{debug, warn};

use super::complete::{Completion, complete};
use super::config::Config;
use super::dispatch::Dispatcher;
use super::error::{CommandResult, ConfigError, Error};
use super::escape::{Decoded, EscapeAction, EscapeDecoder, IGNORE};
use super::history::{HistoryDirection, LineBuffer};
use super::registry::Registry;
use super::render::Renderer;
use super::surface::{NEWLINE, Surface};
use super::tokenize::{ExecutionMode, Tokens, tokenize};
use super::transport::{ReadByte, Sink};
use super::{
    ASCII_BACKSPACE, ASCII_CR, ASCII_DEL, ASCII_LF, ASCII_NUL, ASCII_SPACE, ASCII_TAB,
    LIST_COMMAND,
};

/// Maximum line length, terminator included, when not chosen explicitly.
pub const DEFAULT_LINE: usize = 128;

/// History depth plus the line being typed, when not chosen explicitly.
pub const DEFAULT_SLOTS: usize = 11;

/// One shell session over a console.
///
/// The session owns the editor state and is its only writer. Output goes
/// through a [`Surface`] that commands and the logger may share through
/// [`Shell::surface`].
///
/// `LINE` bounds the line length (at most `LINE - 1` bytes are typed) and
/// `SLOTS - 1` lines of history are kept.
#[derive(Debug)]
pub struct Shell<S, const LINE: usize = DEFAULT_LINE, const SLOTS: usize = DEFAULT_SLOTS> {
    config: Config,
    registry: Registry,
    buffer: LineBuffer<LINE, SLOTS>,
    decoder: EscapeDecoder,
    dispatcher: Dispatcher,
    surface: Surface<S>,
    completion_requests: usize,
    last_was_cr: bool,
}

impl<S: Sink> Shell<S> {
    /// Session with the default line length and history depth.
    ///
    /// # Arguments
    ///
    /// * `config` - Editing features, prompt and timeouts
    /// * `registry` - Commands available to the session
    /// * `sink` - Console output
    ///
    /// # Errors
    ///
    /// See [`Config::validate`].
    ///
    /// # Examples
    ///
    /// ```rust
    /// use fwshell::system::shell::{Config, IoSink, Registry, Shell};
    ///
    /// let shell = Shell::new(Config::default(), Registry::default(), IoSink::new(Vec::new()));
    /// assert!(shell.is_ok());
    ///
    /// let broken = Config { printable_min: b'z', printable_max: b'a', ..Config::default() };
    /// assert!(Shell::new(broken, Registry::default(), IoSink::new(Vec::new())).is_err());
    /// ```
    pub fn new(config: Config, registry: Registry, sink: S) -> Result<Self, ConfigError> {
        Self::from_parts(config, registry, sink)
    }
}

impl<S: Sink, const LINE: usize, const SLOTS: usize> Shell<S, LINE, SLOTS> {
    /// Session with explicit capacities.
    ///
    /// # Errors
    ///
    /// See [`Config::validate`].
    pub fn from_parts(config: Config, registry: Registry, sink: S) -> Result<Self, ConfigError> {
        config.validate()?;
        let renderer = Renderer::new(config.prompt, config.escape_sequences, LINE);
        Ok(Self {
            dispatcher: Dispatcher::new(config.async_timeout()),
            surface: Surface::new(sink, renderer, LINE),
            config,
            registry,
            buffer: LineBuffer::new(),
            decoder: EscapeDecoder::new(),
            completion_requests: 0,
            last_was_cr: false,
        })
    }

    /// Replace the dispatcher.
    pub fn with_dispatcher(mut self, dispatcher: Dispatcher) -> Self {
        self.dispatcher = dispatcher;
        self
    }

    /// The render surface, for command output and logging.
    pub fn surface(&self) -> &Surface<S> {
        &self.surface
    }

    /// The editor state.
    pub fn buffer(&self) -> &LineBuffer<LINE, SLOTS> {
        &self.buffer
    }

    /// Active configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Registered commands.
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Draw the initial prompt.
    ///
    /// # Errors
    ///
    /// Forwards rendering failures.
    pub fn start(&mut self) -> Result<(), Error> {
        self.refresh()
    }

    /// Read and process bytes until the input ends.
    ///
    /// After every byte the loop sleeps for the configured poll interval.
    ///
    /// # Errors
    ///
    /// [`Error::ReadError`] when the reader fails, or a rendering failure.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use fwshell::system::shell::{Config, IoReader, IoSink, Registry, Shell};
    ///
    /// let config = Config { input_poll_ms: 0, ..Config::default() };
    /// let mut shell = Shell::new(config, Registry::default(), IoSink::new(Vec::new())).unwrap();
    ///
    /// shell.run(&mut IoReader::new(&b"uptime\rver"[..])).unwrap();
    /// assert_eq!(shell.buffer().slot(1), Some(&b"uptime"[..]));
    /// assert_eq!(shell.buffer().content(), b"ver");
    /// ```
    pub fn run<R: ReadByte>(&mut self, reader: &mut R) -> Result<(), Error> {
        self.start()?;
        let poll = self.config.input_poll();
        loop {
            match reader.read_byte() {
                Ok(Some(byte)) => self.process_byte(byte)?,
                Ok(None) => return Ok(()),
                Err(e) => {
                    warn!("console read failed: {:?}", e);
                    return Err(Error::ReadError);
                }
            }
            if !poll.is_zero() {
                thread::sleep(poll);
            }
        }
    }

    /// Process a chunk of input without pacing.
    ///
    /// # Arguments
    ///
    /// * `data` - Raw console bytes, control sequences included
    ///
    /// # Errors
    ///
    /// Stops at the first rendering failure.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use fwshell::system::shell::{Config, IoSink, Registry, Shell};
    ///
    /// let mut shell = Shell::new(Config::default(), Registry::default(), IoSink::new(Vec::new())).unwrap();
    ///
    /// // Type "hep", move left once, insert "a".
    /// shell.input(b"hep\x1b[Da").unwrap();
    /// assert_eq!(shell.buffer().content(), b"heap");
    /// assert_eq!(shell.buffer().cursor(), 3);
    /// ```
    pub fn input(&mut self, data: &[u8]) -> Result<(), Error> {
        data.iter().try_for_each(|&byte| self.process_byte(byte))
    }

    /// Process one input byte.
    ///
    /// # Errors
    ///
    /// Forwards rendering failures.
    pub fn process_byte(&mut self, byte: u8) -> Result<(), Error> {
        if !matches!(byte, ASCII_TAB | ASCII_NUL | IGNORE) {
            self.completion_requests = 0;
        }
        let after_cr = core::mem::replace(&mut self.last_was_cr, byte == ASCII_CR);
        if byte == ASCII_LF && after_cr {
            return Ok(());
        }
        if self.config.escape_sequences {
            self.decode(byte)
        } else {
            self.handle(byte)
        }
    }

    /// Run an accepted line's tokens, handling the built-ins.
    ///
    /// Rendering is suppressed while a synchronous command runs. The `list`
    /// and help-flag built-ins only answer when enabled in [`Config`];
    /// otherwise every line reaches the dispatcher unchanged.
    ///
    /// # Returns
    ///
    /// The dispatch result. The caller prints [`CommandResult::message`].
    ///
    /// # Errors
    ///
    /// Forwards rendering failures of the built-ins.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use fwshell::system::shell::{
    ///     Command, CommandResult, Config, IoSink, Registry, Shell, tokenize,
    /// };
    ///
    /// fn reboot(_argc: usize, argv: &[&str]) -> CommandResult {
    ///     match argv.get(1) {
    ///         Some(&"now") => CommandResult::Ok,
    ///         _ => CommandResult::ArgError,
    ///     }
    /// }
    ///
    /// static COMMANDS: &[Command] = &[Command::new("reboot", "Reboot the device", reboot)];
    /// let registry = Registry::from_static(COMMANDS).unwrap();
    /// let shell = Shell::new(Config::default(), registry, IoSink::new(Vec::new())).unwrap();
    ///
    /// assert_eq!(shell.execute(tokenize::<64>(b"reboot now")).unwrap(), CommandResult::Ok);
    /// assert_eq!(shell.execute(tokenize::<64>(b"reboot -h")).unwrap(), CommandResult::ArgError);
    /// assert_eq!(shell.execute(tokenize::<64>(b"list")).unwrap(), CommandResult::NotFound);
    /// ```
    pub fn execute<const N: usize>(&self, tokens: Tokens<N>) -> Result<CommandResult, Error> {
        let Some(name) = tokens.command() else {
            return Ok(CommandResult::Ok);
        };
        let command = self.registry.find(name);

        if self.config.help_flags
            && tokens.argc() == 2
            && matches!(tokens.get(1), Some("-h" | "--help"))
        {
            return match command {
                Some(command) => {
                    self.surface.println(command.description)?;
                    Ok(CommandResult::Ok)
                }
                None => Ok(CommandResult::NotFound),
            };
        }

        let Some(command) = command else {
            if self.config.list_command && name == LIST_COMMAND.as_bytes() {
                self.list_commands()?;
                return Ok(CommandResult::Ok);
            }
            debug!("no command named {:?}", String::from_utf8_lossy(name));
            return Ok(CommandResult::NotFound);
        };

        let _guard = match tokens.mode() {
            ExecutionMode::Sync => Some(self.surface.suppress()),
            ExecutionMode::Async => None,
        };
        Ok(self.dispatcher.run(command, tokens))
    }

    fn decode(&mut self, byte: u8) -> Result<(), Error> {
        match self.decoder.feed(byte) {
            Decoded::Literal(byte) => self.handle(byte),
            Decoded::Pending | Decoded::Ignored => Ok(()),
            Decoded::Action(action) => {
                self.apply(action);
                self.refresh()
            }
            Decoded::Rejected { replay, byte } => {
                for replayed in replay {
                    self.handle(replayed)?;
                }
                self.decode(byte)
            }
        }
    }

    fn handle(&mut self, byte: u8) -> Result<(), Error> {
        match byte {
            ASCII_CR | ASCII_LF => self.accept_line(),
            ASCII_BACKSPACE | ASCII_DEL => {
                if self.buffer.backspace() {
                    self.refresh()?;
                }
                Ok(())
            }
            ASCII_TAB if self.config.autocomplete => self.complete(),
            IGNORE => Ok(()),
            _ if self.config.is_printable(byte) => {
                if self.insert(byte) {
                    self.refresh()?;
                }
                Ok(())
            }
            _ => Ok(()),
        }
    }

    fn apply(&mut self, action: EscapeAction) {
        match action {
            EscapeAction::CursorLeft => {
                self.buffer.move_left();
            }
            EscapeAction::CursorRight => {
                self.buffer.move_right();
            }
            EscapeAction::HistoryUp if self.config.history_active() => {
                self.buffer.navigate(HistoryDirection::Older);
            }
            EscapeAction::HistoryDown if self.config.history_active() => {
                self.buffer.navigate(HistoryDirection::Newer);
            }
            EscapeAction::HistoryUp | EscapeAction::HistoryDown => {}
            EscapeAction::ToggleInsert => self.buffer.toggle_overwrite(),
            EscapeAction::DeleteAtCursor => {
                self.buffer.delete();
            }
        }
    }

    fn insert(&mut self, byte: u8) -> bool {
        let overwrite = self.buffer.overwrite();
        self.buffer.insert_at(self.buffer.cursor(), byte, overwrite)
    }

    fn complete(&mut self) -> Result<(), Error> {
        self.completion_requests += 1;
        let view = self.buffer.view();
        let completion = complete(
            &self.registry,
            view.content,
            view.cursor,
            self.completion_requests,
        );

        match completion {
            Completion::Nothing => Ok(()),
            Completion::Insert { suffix, separator } => {
                if !suffix.is_empty() {
                    self.completion_requests = 0;
                }
                let mut changed = false;
                for &byte in suffix {
                    let cursor = self.buffer.cursor();
                    changed |= self.buffer.insert_at(cursor, byte, false);
                }
                if separator {
                    let cursor = self.buffer.cursor();
                    changed |= self.buffer.insert_at(cursor, ASCII_SPACE, false);
                }
                if changed {
                    self.refresh()?;
                }
                Ok(())
            }
            Completion::List => {
                let view = self.buffer.view();
                let prefix = &view.content[..view.cursor];
                self.surface
                    .print_list(self.registry.matching(prefix).map(|command| command.name))
            }
        }
    }

    fn accept_line(&mut self) -> Result<(), Error> {
        self.surface.write_raw(NEWLINE)?;
        let tokens = match self.buffer.accept_line() {
            Some(line) => tokenize::<LINE>(line),
            None => return self.refresh(),
        };
        self.surface.set_view(self.buffer.view());

        let result = self.execute(tokens)?;
        match result.message() {
            Some(message) => self.surface.println(message),
            None => self.surface.redraw(),
        }
    }

    fn list_commands(&self) -> Result<(), Error> {
        let mut text = String::from("Available commands:");
        for command in &self.registry {
            text.push_str("\r\n");
            text.push_str(command.name);
            text.push_str("\t\t");
            text.push_str(command.description);
        }
        self.surface.println(&text)
    }

    fn refresh(&self) -> Result<(), Error> {
        self.surface.show(self.buffer.view())
    }
}
