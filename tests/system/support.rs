use fwshell::system::shell::*;
use std::collections::HashMap;
use std::sync::{Mutex, OnceLock};

/// Console sink collecting everything written to it.
#[derive(Debug, Default)]
pub struct Capture(pub Vec<u8>);

impl Sink for Capture {
    type Error = ();

    fn write(&mut self, buf: &[u8]) -> Result<(), Self::Error> {
        self.0.extend_from_slice(buf);
        Ok(())
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

/// Drain what the shell wrote so far.
pub fn take_output(surface: &Surface<Capture>) -> String {
    let bytes = surface.with_sink(|sink| std::mem::take(&mut sink.0));
    String::from_utf8(bytes).unwrap()
}

pub fn ok_handler(_argc: usize, _argv: &[&str]) -> CommandResult {
    CommandResult::Ok
}

pub fn fail_handler(_argc: usize, _argv: &[&str]) -> CommandResult {
    CommandResult::GenericError
}

/// Arguments seen by `capture_args_handler`, keyed by command name.
static CAPTURED_ARGS: OnceLock<Mutex<HashMap<String, Vec<String>>>> = OnceLock::new();

fn captured_args_buffer() -> &'static Mutex<HashMap<String, Vec<String>>> {
    CAPTURED_ARGS.get_or_init(|| Mutex::new(HashMap::new()))
}

pub fn capture_args_handler(_argc: usize, argv: &[&str]) -> CommandResult {
    let args = argv.iter().map(|arg| arg.to_string()).collect();
    captured_args_buffer()
        .lock()
        .unwrap()
        .insert(argv[0].to_string(), args);
    CommandResult::Ok
}

pub fn captured_args(name: &str) -> Vec<String> {
    captured_args_buffer()
        .lock()
        .unwrap()
        .remove(name)
        .unwrap_or_default()
}
