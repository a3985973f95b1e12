use crate::support::*;
use fwshell::system::shell::*;
use pretty_assertions::assert_eq;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};

const UP: &[u8] = b"\x1b[A";
const DOWN: &[u8] = b"\x1b[B";
const RIGHT: &[u8] = b"\x1b[C";
const LEFT: &[u8] = b"\x1b[D";
const INSERT: &[u8] = b"\x1b[2~";
const DELETE: &[u8] = b"\x1b[3~";

static COMMANDS: &[Command] = &[
    Command::new("help", "Show help", ok_handler),
    Command::new("heap", "Show free heap", ok_handler),
    Command::new("heap_min", "Show minimum free heap", ok_handler),
    Command::new("fail", "Always fails", fail_handler),
    Command::new("cap_quote", "Capture arguments", capture_args_handler),
    Command::new("cap_escape", "Capture arguments", capture_args_handler),
    Command::new("cap_async", "Capture arguments", capture_args_handler),
];

fn small_shell() -> Shell<Capture, 16, 4> {
    Shell::from_parts(
        Config::default(),
        Registry::from_static(COMMANDS).unwrap(),
        Capture::default(),
    )
    .unwrap()
}

fn shell() -> Shell<Capture> {
    Shell::new(
        Config::default(),
        Registry::from_static(COMMANDS).unwrap(),
        Capture::default(),
    )
    .unwrap()
}

#[test]
fn test_typing_inserts_at_cursor() {
    let mut shell = small_shell();
    shell.input(b"hep").unwrap();
    shell.input(LEFT).unwrap();
    shell.input(b"a").unwrap();

    assert_eq!(shell.buffer().content(), b"heap");
    assert_eq!(shell.buffer().cursor(), 3);
}

#[test]
fn test_accept_rotates_history() {
    let mut shell = small_shell();
    shell.input(b"heap\r").unwrap();

    assert_eq!(shell.buffer().content(), b"");
    assert_eq!(shell.buffer().cursor(), 0);
    assert_eq!(shell.buffer().slot(1), Some(&b"heap"[..]));
}

#[test]
fn test_empty_line_does_not_rotate() {
    let mut shell = small_shell();
    shell.input(b"heap\r").unwrap();
    shell.input(b"\r\r").unwrap();

    assert_eq!(shell.buffer().slot(1), Some(&b"heap"[..]));
    assert_eq!(shell.buffer().slot(2), Some(&b""[..]));
}

#[test]
fn test_oldest_entry_is_recycled() {
    let mut shell = small_shell();
    for line in [&b"help\r"[..], b"heap\r", b"fail\r", b"heap_min\r"] {
        shell.input(line).unwrap();
    }

    assert_eq!(shell.buffer().slot(1), Some(&b"heap_min"[..]));
    assert_eq!(shell.buffer().slot(2), Some(&b"fail"[..]));
    assert_eq!(shell.buffer().slot(3), Some(&b"heap"[..]));
}

#[test]
fn test_history_navigation_stops_at_ends() {
    let mut shell = small_shell();
    shell.input(b"help\rheap\r").unwrap();

    shell.input(UP).unwrap();
    assert_eq!(shell.buffer().content(), b"heap");
    shell.input(UP).unwrap();
    shell.input(UP).unwrap();
    assert_eq!(shell.buffer().content(), b"help");
    assert_eq!(shell.buffer().active_index(), 2);
    assert_eq!(shell.buffer().cursor(), 4);

    shell.input(DOWN).unwrap();
    shell.input(DOWN).unwrap();
    shell.input(DOWN).unwrap();
    assert_eq!(shell.buffer().active_index(), 0);
    assert_eq!(shell.buffer().content(), b"");
}

#[test]
fn test_editing_history_entry_edits_a_copy() {
    let mut shell = small_shell();
    shell.input(b"help\rheap\r").unwrap();
    shell.input(UP).unwrap();
    shell.input(UP).unwrap();

    shell.input(b"x").unwrap();

    assert_eq!(shell.buffer().active_index(), 0);
    assert_eq!(shell.buffer().content(), b"helpx");
    assert_eq!(shell.buffer().slot(1), Some(&b"heap"[..]));
    assert_eq!(shell.buffer().slot(2), Some(&b"help"[..]));
}

#[test]
fn test_overwrite_toggle_and_delete() {
    let mut shell = small_shell();
    shell.input(b"abc").unwrap();
    shell.input(LEFT).unwrap();
    shell.input(LEFT).unwrap();
    shell.input(INSERT).unwrap();
    shell.input(b"x").unwrap();
    assert_eq!(shell.buffer().content(), b"axc");

    shell.input(INSERT).unwrap();
    shell.input(b"y").unwrap();
    assert_eq!(shell.buffer().content(), b"axyc");

    shell.input(DELETE).unwrap();
    assert_eq!(shell.buffer().content(), b"axy");
    assert_eq!(shell.buffer().cursor(), 3);

    shell.input(RIGHT).unwrap();
    assert_eq!(shell.buffer().cursor(), 3);
}

#[test]
fn test_backspace_and_delete_bytes() {
    let mut shell = small_shell();
    shell.input(b"abc\x7f\x08").unwrap();
    assert_eq!(shell.buffer().content(), b"a");

    shell.input(b"\x08\x08\x7f").unwrap();
    assert_eq!(shell.buffer().content(), b"");
}

#[test]
fn test_line_capacity_is_enforced() {
    let mut shell: Shell<Capture, 8, 3> = Shell::from_parts(
        Config::default(),
        Registry::default(),
        Capture::default(),
    )
    .unwrap();
    shell.input(b"abcdefghijkl").unwrap();

    assert_eq!(shell.buffer().content(), b"abcdefg");
    assert_eq!(shell.buffer().cursor(), 7);
}

#[test]
fn test_rejected_sequence_is_typed_text() {
    let mut shell = small_shell();
    shell.input(b"\x1b[Z").unwrap();
    assert_eq!(shell.buffer().content(), b"[Z");

    shell.input(b"\x1b[2x").unwrap();
    assert_eq!(shell.buffer().content(), b"[Z[2x");
}

#[test]
fn test_ignore_sentinel_inside_sequence() {
    let mut shell = small_shell();
    shell.input(b"ab\x1b[\xffD").unwrap();

    assert_eq!(shell.buffer().content(), b"ab");
    assert_eq!(shell.buffer().cursor(), 1);
}

#[test]
fn test_crlf_accepts_a_single_line() {
    let mut shell = small_shell();
    shell.input(b"help\r\nheap\n").unwrap();

    assert_eq!(shell.buffer().slot(1), Some(&b"heap"[..]));
    assert_eq!(shell.buffer().slot(2), Some(&b"help"[..]));
    assert_eq!(shell.buffer().slot(3), Some(&b""[..]));
}

#[test]
fn test_autocomplete_longest_common_prefix() {
    let mut shell = shell();

    shell.input(b"he\t").unwrap();
    assert_eq!(shell.buffer().content(), b"he");

    shell.input(b"a\t").unwrap();
    assert_eq!(shell.buffer().content(), b"heap");
}

#[test]
fn test_autocomplete_unique_match_adds_separator() {
    let mut shell = shell();
    shell.input(b"hel\t").unwrap();

    assert_eq!(shell.buffer().content(), b"help ");
    assert_eq!(shell.buffer().cursor(), 5);

    shell.input(b"\t").unwrap();
    assert_eq!(shell.buffer().content(), b"help ");
}

#[test]
fn test_autocomplete_second_request_lists_matches() {
    let mut shell = shell();
    shell.input(b"heap\t").unwrap();
    take_output(shell.surface());

    shell.input(b"\t").unwrap();

    assert_eq!(
        take_output(shell.surface()),
        "\r\nheap\r\nheap_min\r\n$ heap"
    );
    assert_eq!(shell.buffer().content(), b"heap");
}

#[test]
fn test_other_keys_reset_completion_requests() {
    let mut shell = shell();
    shell.input(b"heap\tx\x08\t").unwrap();

    assert!(!take_output(shell.surface()).contains("heap_min\r\n"));
}

#[test]
fn test_autocomplete_disabled_drops_tab() {
    let config = Config {
        autocomplete: false,
        ..Config::default()
    };
    let mut shell: Shell<Capture> = Shell::new(
        config,
        Registry::from_static(COMMANDS).unwrap(),
        Capture::default(),
    )
    .unwrap();
    shell.input(b"hel\t").unwrap();

    assert_eq!(shell.buffer().content(), b"hel");
}

#[test]
fn test_quoted_arguments_reach_command() {
    let mut shell = shell();
    shell.input(b"cap_quote \"hello world\"  bar\r").unwrap();

    assert_eq!(
        captured_args("cap_quote"),
        vec!["cap_quote", "hello world", "bar"]
    );
}

#[test]
fn test_escaped_quote_is_literal() {
    let mut shell = shell();
    shell.input(b"cap_escape \\\"bar\r").unwrap();

    assert_eq!(captured_args("cap_escape"), vec!["cap_escape", "\"bar"]);
}

#[test]
fn test_async_line_runs_detached() {
    let mut shell = shell();
    shell.input(b"cap_async one two &\r").unwrap();

    let deadline = Instant::now() + Duration::from_secs(5);
    let mut args = Vec::new();
    while args.is_empty() && Instant::now() < deadline {
        std::thread::sleep(Duration::from_millis(5));
        args = captured_args("cap_async");
    }
    assert_eq!(args, vec!["cap_async", "one", "two"]);
}

#[test]
fn test_unknown_command_message() {
    let mut shell = shell();
    shell.input(b"reboot\r").unwrap();

    let output = take_output(shell.surface());
    assert!(output.ends_with("\r\n\r\x1b[KCommand not found\r\n$ "));
}

#[test]
fn test_command_error_prints_nothing() {
    let mut shell = shell();
    shell.input(b"fail").unwrap();
    take_output(shell.surface());

    shell.input(b"\r").unwrap();
    assert_eq!(take_output(shell.surface()), "\r\n\r\x1b[K$ ");
}

fn builtins_config() -> Config {
    Config {
        list_command: true,
        help_flags: true,
        ..Config::default()
    }
}

fn builtins_shell() -> Shell<Capture> {
    Shell::new(
        builtins_config(),
        Registry::from_static(COMMANDS).unwrap(),
        Capture::default(),
    )
    .unwrap()
}

#[test]
fn test_help_flag_prints_description() {
    let mut shell = builtins_shell();
    shell.input(b"heap_min --help\r").unwrap();
    assert!(take_output(shell.surface()).contains("Show minimum free heap\r\n"));

    shell.input(b"reboot -h\r").unwrap();
    assert!(take_output(shell.surface()).contains("Command not found\r\n"));
}

#[test]
fn test_list_builtin() {
    let mut shell = builtins_shell();
    shell.input(b"list\r").unwrap();

    let output = take_output(shell.surface());
    assert!(output.contains("Available commands:\r\nhelp\t\tShow help\r\nheap\t\tShow free heap"));
}

#[test]
fn test_registered_list_command_wins() {
    static OVERRIDE: &[Command] = &[Command::new("list", "Custom list", capture_args_handler)];
    let mut shell: Shell<Capture> = Shell::new(
        builtins_config(),
        Registry::from_static(OVERRIDE).unwrap(),
        Capture::default(),
    )
    .unwrap();
    shell.input(b"list all\r").unwrap();

    assert_eq!(captured_args("list"), vec!["list", "all"]);
    assert!(!take_output(shell.surface()).contains("Available commands:"));
}

static SIZEOF_CALLS: AtomicUsize = AtomicUsize::new(0);

fn sizeof_handler(_argc: usize, argv: &[&str]) -> CommandResult {
    SIZEOF_CALLS.fetch_add(1, Ordering::SeqCst);
    match argv.get(1) {
        Some(&"-h") => CommandResult::ArgError,
        _ => CommandResult::Ok,
    }
}

#[test]
fn test_default_config_dispatches_every_line() {
    static SIZEOF: &[Command] = &[Command::new("sizeof", "Print type sizes", sizeof_handler)];
    let shell: Shell<Capture> = Shell::new(
        Config::default(),
        Registry::from_static(SIZEOF).unwrap(),
        Capture::default(),
    )
    .unwrap();

    // The command sees its own help flag and its result is kept.
    assert_eq!(
        shell.execute(tokenize::<64>(b"sizeof -h")).unwrap(),
        CommandResult::ArgError
    );
    assert_eq!(SIZEOF_CALLS.load(Ordering::SeqCst), 1);

    assert_eq!(
        shell.execute(tokenize::<64>(b"list")).unwrap(),
        CommandResult::NotFound
    );
    assert!(take_output(shell.surface()).is_empty());
}

#[test]
fn test_redraw_is_idempotent() {
    let mut shell = shell();
    shell.input(b"heap").unwrap();
    shell.input(LEFT).unwrap();
    take_output(shell.surface());

    shell.surface().redraw().unwrap();
    let first = take_output(shell.surface());
    shell.surface().redraw().unwrap();
    let second = take_output(shell.surface());

    assert_eq!(first, "\r\x1b[K$ heap\x1b[1D");
    assert_eq!(first, second);
}

#[test]
fn test_every_edit_redraws_the_line() {
    let mut shell = small_shell();
    shell.input(b"help\r").unwrap();
    take_output(shell.surface());

    shell.input(UP).unwrap();
    assert_eq!(take_output(shell.surface()), "\r\x1b[K$ help");

    shell.input(LEFT).unwrap();
    assert_eq!(take_output(shell.surface()), "\r\x1b[K$ help\x1b[1D");

    shell.input(LEFT).unwrap();
    shell.input(DELETE).unwrap();
    assert_eq!(
        take_output(shell.surface()),
        "\r\x1b[K$ help\x1b[1D\x1b[1D\r\x1b[K$ hep\x1b[1D"
    );

    shell.input(b"a").unwrap();
    assert_eq!(take_output(shell.surface()), "\r\x1b[K$ heap\x1b[1D");

    shell.input(INSERT).unwrap();
    assert_eq!(take_output(shell.surface()), "\r\x1b[K$ heap\x1b[1D");

    shell.input(b"\x08").unwrap();
    assert_eq!(take_output(shell.surface()), "\r\x1b[K$ hep\x1b[1D");
}

#[test]
fn test_plain_terminal_rendering() {
    let config = Config {
        escape_sequences: false,
        ..Config::default()
    };
    let mut shell: Shell<Capture, 8, 2> =
        Shell::from_parts(config, Registry::default(), Capture::default()).unwrap();
    shell.input(b"[D").unwrap();

    assert_eq!(shell.buffer().content(), b"[D");
    let output = take_output(shell.surface());
    assert!(output.ends_with("\r          \r$ [D"));
    assert!(!output.contains('\x1b'));
}

#[test]
fn test_history_needs_escape_sequences() {
    let config = Config {
        escape_sequences: false,
        ..Config::default()
    };
    let mut shell: Shell<Capture, 16, 4> =
        Shell::from_parts(config, Registry::from_static(COMMANDS).unwrap(), Capture::default())
            .unwrap();
    shell.input(b"heap\r\x1b[A").unwrap();

    assert_eq!(shell.buffer().content(), b"[A");
}

#[test]
fn test_run_reads_until_input_ends() {
    let config = Config {
        input_poll_ms: 0,
        ..Config::default()
    };
    let mut shell: Shell<Capture> = Shell::new(
        config,
        Registry::from_static(COMMANDS).unwrap(),
        Capture::default(),
    )
    .unwrap();
    let mut reader = IoReader::new(&b"heap\rhelp"[..]);

    shell.run(&mut reader).unwrap();

    assert_eq!(shell.buffer().slot(1), Some(&b"heap"[..]));
    assert_eq!(shell.buffer().content(), b"help");
}

#[test]
fn test_run_reports_read_error() {
    struct Unplugged;

    impl ReadByte for Unplugged {
        type Error = &'static str;

        fn read_byte(&mut self) -> Result<Option<u8>, Self::Error> {
            Err("uart detached")
        }
    }

    let mut shell = shell();
    assert_eq!(shell.run(&mut Unplugged), Err(Error::ReadError));
}

#[test]
fn test_invalid_config_is_rejected() {
    let config = Config {
        printable_min: b'z',
        printable_max: b'a',
        ..Config::default()
    };
    let result: Result<Shell<Capture>, _> =
        Shell::new(config, Registry::default(), Capture::default());

    assert_eq!(result.err(), Some(ConfigError::InvalidPrintableRange));
}

#[test]
fn test_random_editing_keeps_cursor_in_bounds() {
    const KEYS: &[&[u8]] = &[
        b"a", b"b", b" ", b"\x08", b"\x7f", b"\t", b"\r", UP, DOWN, LEFT, RIGHT, INSERT, DELETE,
        b"\x1b[", b"\xff",
    ];
    let mut rng = StdRng::seed_from_u64(0x5eed);
    let mut shell = small_shell();

    for _ in 0..2_000 {
        let key = KEYS[rng.gen_range(0..KEYS.len())];
        shell.input(key).unwrap();

        let buffer = shell.buffer();
        assert!(buffer.cursor() <= buffer.len());
        assert!(buffer.len() < 16);
        assert!(buffer.active_index() < 4);
    }
}
