//! Helpers for command implementations inspecting their `argv`.
//!
//! ```rust
//! use fwshell::system::shell::args;
//!
//! let argv = ["wifi", "connect", "--ssid", "lab", "-v"];
//! assert!(args::has_option("-v", &argv));
//! assert!(args::has_option_at(1, "connect", &argv));
//! assert_eq!(args::option_value("--ssid", &argv), Some("lab"));
//! assert_eq!(args::option_value("-v", &argv), None);
//! ```

/// Whether `option` appears among the arguments after the command name.
pub fn has_option(option: &str, argv: &[&str]) -> bool {
    argv.iter().skip(1).any(|arg| *arg == option)
}

/// Whether argument `index` is exactly `option`.
pub fn has_option_at(index: usize, option: &str, argv: &[&str]) -> bool {
    argv.get(index).is_some_and(|arg| *arg == option)
}

/// The argument following the first occurrence of `option`.
///
/// `None` when the option is absent or is the last argument.
pub fn option_value<'a>(option: &str, argv: &[&'a str]) -> Option<&'a str> {
    let position = argv.iter().skip(1).position(|arg| *arg == option)? + 1;
    argv.get(position + 1).copied()
}
