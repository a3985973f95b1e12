use criterion::{criterion_group, criterion_main};


criterion_group!(
    benches,
    system::shell::bench_tokenize,
    system::shell::bench_escape_decoder,
    system::shell::bench_line_editing,
    system::shell::bench_session_input
);
criterion_main!(benches);
