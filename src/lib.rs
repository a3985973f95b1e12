//! # fwshell - firmware command shell
//!
//! An interactive, line-oriented command shell for device firmware. It reads
//! raw bytes from a console transport, presents an editable command line with
//! history and command name completion, and runs accepted lines as registered
//! commands concurrently with the editor.
//!
//! ## Features
//!
//! ### Line Editing
//! - Cursor movement, insert/overwrite toggle and delete via terminal control
//!   sequences
//! - Fixed-capacity history ring, recalled entries are copied before editing
//! - Tab completion of command names
//!
//! ### Command Execution
//! - Ordered command registry assembled at start-up
//! - Quoted arguments and a trailing `&` for background execution
//! - One worker per command, waited for or acknowledged within a timeout
//! - Optional built-in `list` and `-h/--help`
//!
//! ### Integration
//! - Console transport injected through the `ReadByte` and `Sink` traits
//! - `log` records printed above the prompt without corrupting the line
//! - Configuration loadable from JSON
//!
//! ## Usage
//!
//! Add this to your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! fwshell = "0.1.0"
//! ```
//!
//! ### Basic Session
//!
//! ```rust,no_run
//! use fwshell::system::shell::{
//!     Command, CommandResult, Config, IoReader, IoSink, Registry, Shell, SurfaceLogger,
//! };
//!
//! fn restart(_argc: usize, _argv: &[&str]) -> CommandResult {
//!     log::info!("restarting");
//!     CommandResult::Ok
//! }
//!
//! static COMMANDS: &[Command] = &[Command::new("restart", "Restart the device", restart)];
//!
//! let registry = Registry::from_static(COMMANDS).unwrap();
//! let mut shell = Shell::new(Config::default(), registry, IoSink::new(std::io::stdout())).unwrap();
//! SurfaceLogger::new(shell.surface().clone(), log::LevelFilter::Info)
//!     .install()
//!     .unwrap();
//!
//! shell.run(&mut IoReader::new(std::io::stdin())).unwrap();
//! ```
//!
//! ## Platform Support
//!
//! The editing core builds on any platform supporting Rust's `core` library.
//! The session and the dispatcher need threads and build on hosts and on
//! embedded targets with `std` support.
//!
//! ## Optional Features
//!
//! - `std`: Session, dispatcher, render surface and logger (default: enabled)
//! - `defmt`: Enable defmt formatting of result and error types

#![cfg_attr(not(feature = "std"), no_std)]
#![deny(missing_docs)]
#![warn(missing_debug_implementations)]

/// System utilities for embedded devices.
///
/// Contains the command shell used to operate the device over its console.
pub mod system;
