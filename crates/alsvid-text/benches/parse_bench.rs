//! Benchmarks for circuit text parsing
//!
//! Run with: cargo bench -p alsvid-text

use alsvid_text::parse;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use std::fmt::Write;

/// A distance-`d` repetition-code memory experiment, written out as
/// one measurement round inside a REPEAT block.
fn repetition_code_text(distance: u32, rounds: u32) -> String {
    let mut text = String::new();
    for q in 0..distance {
        writeln!(text, "H {q}").unwrap();
    }
    writeln!(text, "REPEAT {rounds} {{").unwrap();
    for q in 0..distance - 1 {
        writeln!(text, "    CNOT {q} {}", q + 1).unwrap();
    }
    for q in 0..distance {
        writeln!(text, "    M {q}").unwrap();
    }
    for q in 0..distance {
        writeln!(text, "    DETECTOR {q}@-1").unwrap();
    }
    writeln!(text, "}}").unwrap();
    text
}

fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse");

    for rounds in &[10u32, 100, 1000] {
        let text = repetition_code_text(9, *rounds);
        group.bench_with_input(BenchmarkId::new("rep_code_rounds", rounds), &text, |b, text| {
            b.iter(|| black_box(parse(text).unwrap()));
        });
    }

    let flat: String = (0..1000)
        .map(|q| format!("H {}\nM {}\n", q % 64, q % 64))
        .collect();
    group.bench_function("flat_fused_lines", |b| {
        b.iter(|| black_box(parse(&flat).unwrap()));
    });

    group.finish();
}

fn bench_resolution_after_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_and_resolve");

    let text = repetition_code_text(9, 100);
    group.bench_function("rep_code_100_rounds", |b| {
        b.iter(|| {
            let circuit = parse(black_box(&text)).unwrap();
            black_box(circuit.detectors_and_observables().unwrap())
        });
    });

    group.finish();
}

criterion_group!(benches, bench_parse, bench_resolution_after_parse);
criterion_main!(benches);
