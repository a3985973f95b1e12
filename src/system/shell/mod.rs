//! Interactive command shell for embedded consoles.
//!
//! This module provides a line-editing shell that reads raw bytes from a
//! console, keeps an editable command line with history and command name
//! completion, and runs accepted lines as registered commands on their own
//! workers.
//!
//! # Features
//!
//! - **Fixed capacities**: the line and its history live in `heapless`
//!   buffers sized by const generics; no allocation while editing
//! - **Line editing**: cursor movement, insert and overwrite modes, delete
//!   and backspace, driven by terminal control sequences
//! - **History**: accepted lines are kept in a ring and recalled with the
//!   arrow keys; recalled entries are copied before being edited
//! - **Completion**: tab completes command names up to the longest common
//!   prefix and lists the candidates on a second tab
//! - **Quoted arguments**: `"..."` groups words, `\"` is a literal quote
//! - **Concurrent execution**: each command runs on its own worker, either
//!   waited for or detached with a trailing `&`
//! - **Built-ins**: optional `list` and `<command> -h|--help`, enabled in
//!   [`Config`]
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────┐    ┌─────────────────┐    ┌─────────────────┐
//! │   ReadByte      │───▶│  EscapeDecoder  │───▶│   LineBuffer    │
//! │   (console)     │    │                 │    │   (history)     │
//! └─────────────────┘    └─────────────────┘    └─────────────────┘
//!                                                        │ accept
//!                                                        ▼
//! ┌─────────────────┐    ┌─────────────────┐    ┌─────────────────┐
//! │   Surface       │◀───│   Dispatcher    │◀───│   tokenize      │
//! │   (Sink)        │    │   (workers)     │    │                 │
//! └─────────────────┘    └─────────────────┘    └─────────────────┘
//! ```
//!
//! The editing core ([`escape`], [`history`], [`complete`], [`tokenize`],
//! [`registry`], [`render`]) is `no_std`. The session, the dispatcher, the
//! shared render surface and the logger need the `std` feature.
//!
//! # Usage Examples
//!
//! ```rust
//! use fwshell::system::shell::{Command, CommandResult, Config, IoSink, Registry, Shell};
//!
//! fn hello(argc: usize, _argv: &[&str]) -> CommandResult {
//!     if argc < 2 {
//!         return CommandResult::ArgError;
//!     }
//!     CommandResult::Ok
//! }
//!
//! let registry = Registry::builder()
//!     .with(Command::new("hello", "Say hello", hello))
//!     .unwrap()
//!     .build();
//! let mut shell = Shell::new(Config::default(), registry, IoSink::new(Vec::new())).unwrap();
//!
//! shell.input(b"hel\t").unwrap();
//! assert_eq!(shell.buffer().content(), b"hello ");
//!
//! shell.input(b"world\r").unwrap();
//! assert_eq!(shell.buffer().slot(1), Some(&b"hello world"[..]));
//! ```
//!
//! Commands are started in the background with a trailing `&`:
//!
//! ```text
//! $ scan "lab network" &
//! ```

// ASCII control character constants for input processing
/// ASCII null character (0x00).
pub const ASCII_NUL: u8 = 0x00;
/// ASCII backspace character (0x08).
pub const ASCII_BACKSPACE: u8 = 0x08;
/// ASCII horizontal tab character (0x09).
pub const ASCII_TAB: u8 = 0x09;
/// ASCII line feed character (0x0A).
pub const ASCII_LF: u8 = 0x0A;
/// ASCII carriage return character (0x0D).
pub const ASCII_CR: u8 = 0x0D;
/// ASCII delete character (0x7F).
pub const ASCII_DEL: u8 = 0x7F;
/// ASCII space character (0x20).
pub const ASCII_SPACE: u8 = 0x20;

/// Name of the built-in command listing every registered command.
pub const LIST_COMMAND: &str = "list";

pub mod args;
pub mod complete;
pub mod config;
pub mod error;
pub mod escape;
pub mod history;
pub mod registry;
pub mod render;
pub mod tokenize;
pub mod transport;

#[cfg(feature = "std")]
pub mod dispatch;
#[cfg(feature = "std")]
pub mod logger;
#[cfg(feature = "std")]
pub mod session;
#[cfg(feature = "std")]
pub mod surface;

pub use complete::{Completion, complete};
pub use config::Config;
pub use error::{CommandResult, ConfigError, Error, RegistryError};
pub use escape::{Decoded, EscapeAction, EscapeDecoder, EscapeState};
pub use history::{HistoryDirection, LineBuffer, LineView};
pub use registry::{Command, CommandFn, Registry, RegistryBuilder};
pub use render::Renderer;
pub use tokenize::{ExecutionMode, Tokens, tokenize};
pub use transport::{ReadByte, Sink};

#[cfg(feature = "std")]
pub use dispatch::{Dispatcher, Job, Spawn, ThreadSpawner};
#[cfg(feature = "std")]
pub use logger::SurfaceLogger;
#[cfg(feature = "std")]
pub use session::Shell;
#[cfg(feature = "std")]
pub use surface::{Surface, SuppressGuard};
#[cfg(feature = "std")]
pub use transport::{IoReader, IoSink};
