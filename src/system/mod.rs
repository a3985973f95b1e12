//! System utilities for embedded devices.
//!
//! This module groups the device-side tools an operator interacts with over
//! a serial console.
//!
//! # Available Utilities
//!
//! - **[`shell`]**: line-editing command shell with history, completion and
//!   concurrent command execution
//!
//! # Design Principles
//!
//! - **Embedded-First**: the editing core runs without an allocator
//! - **Fixed Capacities**: line length and history depth are compile-time
//!   parameters
//! - **Injected I/O**: the console is a pair of traits, never owned
//!
//! # Usage
//!
//! ```rust,no_run
//! use fwshell::system::shell::{Command, CommandResult, Config, IoReader, IoSink, Registry, Shell};
//!
//! fn status(_argc: usize, _argv: &[&str]) -> CommandResult {
//!     CommandResult::Ok
//! }
//!
//! let registry = Registry::builder()
//!     .with(Command::new("status", "Show device status", status))
//!     .unwrap()
//!     .build();
//! let mut shell = Shell::new(Config::default(), registry, IoSink::new(std::io::stdout())).unwrap();
//! shell.run(&mut IoReader::new(std::io::stdin())).unwrap();
//! ```

/// Line-editing command shell.
///
/// Provides the escape decoder, line and history buffer, completion,
/// tokenizer and the session that dispatches commands to workers.
pub mod shell;
