use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};

use snippet_composer::{
    convert::convert,
    core::registry::Registry,
    serialize::to_pretty_json,
    snippet::SnippetPayload,
    types::SnippetKind,
};

fn filled(n: u64) -> Registry {
    let mut reg = Registry::starting_at(1);
    for i in 0..n {
        let (id, _) = reg.add(SnippetKind::Paragraph).expect("add");
        reg.update(id, SnippetPayload::paragraph(format!("paragraph {i}")))
            .expect("update");
    }
    reg
}

fn bench_adds(c: &mut Criterion) {
    c.bench_function("registry_add_10k", |b| {
        b.iter(|| {
            let mut reg = Registry::starting_at(1);
            reg.add(SnippetKind::Meta).expect("meta");
            for _ in 0..10_000u64 {
                let _ = reg.add(SnippetKind::Verse).expect("add");
            }
        });
    });
}

fn bench_moves(c: &mut Criterion) {
    c.bench_function("registry_move_1k_of_1k", |b| {
        b.iter(|| {
            let mut reg = filled(1_000);
            for i in 0..1_000usize {
                let _ = reg.move_item(i % 1_000, (i * 7) % 1_000).expect("move");
            }
        });
    });
}

fn bench_serialize(c: &mut Criterion) {
    let mut group = c.benchmark_group("serialize_pretty");
    for n in [10u64, 100, 1_000] {
        let reg = filled(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &reg, |b, reg| {
            b.iter(|| to_pretty_json(reg.iter()).expect("json"));
        });
    }
    group.finish();
}

fn bench_convert(c: &mut Criterion) {
    let html = "<p><b>Bold</b> and <i>italic</i></p><ul><li>one</li><li>two</li></ul>".repeat(50);
    c.bench_function("convert_clipboard_fragment", |b| {
        b.iter(|| convert(&html));
    });
}

criterion_group!(benches, bench_adds, bench_moves, bench_serialize, bench_convert);
criterion_main!(benches);
