//! Criterion benchmarks for the CBv0 frame codec.
//!
//! Measures encode and decode latency for every command shape.  The bridge
//! decodes every datagram on its control loop, so decode sits on the hot path.
//!
//! Run with:
//! ```bash
//! cargo bench --package cbv0-core --bench codec_bench
//! ```

use cbv0_core::protocol::{decode_command, FrameEncoder};
use cbv0_core::{ActionOp, Command, Side};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

// ── Command fixtures ──────────────────────────────────────────────────────────

fn commands() -> Vec<(&'static str, Command)> {
    vec![
        ("KeyEvent", Command::KeyEvent { op: ActionOp::Press, key: "enter".to_string() }),
        ("MouseDelta", Command::MouseDelta { dx: 12, dy: -7 }),
        ("MouseButton", Command::MouseButton { op: ActionOp::Hold, button: 0 }),
        ("GamepadButton", Command::GamepadButton { op: ActionOp::Press, button: 0 }),
        ("GamepadStick", Command::GamepadStick { side: Side::Left, x: 16000, y: -16000 }),
        ("GamepadTrigger", Command::GamepadTrigger { side: Side::Right, value: 200 }),
    ]
}

// ── Benchmarks ────────────────────────────────────────────────────────────────

fn bench_encode(c: &mut Criterion) {
    let encoder = FrameEncoder::new();
    let mut group = c.benchmark_group("encode_frame");
    for (name, cmd) in commands() {
        group.bench_with_input(BenchmarkId::new("cmd", name), &cmd, |b, cmd| {
            b.iter(|| encoder.encode(black_box(cmd)).expect("encode must succeed"))
        });
    }
    group.finish();
}

fn bench_decode(c: &mut Criterion) {
    let encoder = FrameEncoder::new();
    let mut group = c.benchmark_group("decode_frame");
    for (name, cmd) in commands() {
        let bytes = encoder.encode(&cmd).expect("encode must succeed for benchmark setup");
        group.bench_with_input(BenchmarkId::new("cmd", name), &bytes, |b, bytes| {
            b.iter(|| decode_command(black_box(bytes)).expect("decode must succeed"))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_encode, bench_decode);
criterion_main!(benches);
