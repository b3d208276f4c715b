//! Criterion benchmarks for the legacy text path: tokenizing, parsing, and
//! translating a typical multi-token line.
//!
//! Run with:
//! ```bash
//! cargo bench --package cbv0-core --bench grammar_bench
//! ```

use cbv0_core::legacy::{classify_payload, parse_token, tokenize_line};
use cbv0_core::semantics::translate;
use criterion::{black_box, criterion_group, criterion_main, Criterion};

const LINE: &str = "MOUSE_LEFT_DOWN,WAIT_50,MOUSE_LEFT_UP,DELTA:0.5,-0.25,LS:0.3, 0.9 X360A_HOLD";

fn bench_tokenize(c: &mut Criterion) {
    c.bench_function("tokenize_line", |b| b.iter(|| tokenize_line(black_box(LINE))));
}

fn bench_parse_and_translate(c: &mut Criterion) {
    let tokens = tokenize_line(LINE);
    c.bench_function("parse_and_translate_line", |b| {
        b.iter(|| {
            tokens
                .iter()
                .filter_map(|t| parse_token(black_box(t)).ok())
                .filter_map(|t| translate(&t))
                .count()
        })
    });
}

fn bench_classify(c: &mut Criterion) {
    let mut group = c.benchmark_group("classify_payload");
    group.bench_function("text", |b| b.iter(|| classify_payload(black_box(LINE.as_bytes()))));
    group.bench_function("delta", |b| {
        b.iter(|| classify_payload(black_box(&[0xF6u8, 0xFF, 0x05, 0x00][..])))
    });
    group.finish();
}

criterion_group!(benches, bench_tokenize, bench_parse_and_translate, bench_classify);
criterion_main!(benches);
