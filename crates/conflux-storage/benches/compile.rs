//! Benchmarks for Markdown to storage format compilation.

#![allow(clippy::format_push_string)] // Benchmark setup code, performance not critical

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use conflux_storage::{Compiler, EmitOptions, ParseOptions, compile, parse};

/// Generate markdown content with specified structure.
fn generate_markdown(headings: usize, paragraphs_per_section: usize) -> String {
    let mut md = String::with_capacity(headings * 50 + headings * paragraphs_per_section * 200);
    md.push_str("# Document Title\n\n");

    for i in 0..headings {
        md.push_str(&format!("## Section {i}\n\n"));
        for j in 0..paragraphs_per_section {
            md.push_str(&format!(
                "Paragraph {j} in section {i} has **bold**, *italic* and `code` & <angle> text.\n\n"
            ));
        }
        md.push_str("- [x] done\n- [ ] pending\n\n```rust\nfn main() {}\n```\n\n");
    }
    md
}

fn bench_compile_simple(c: &mut Criterion) {
    c.bench_function("compile_simple_markdown", |b| {
        b.iter(|| compile(black_box("# Hello\n\nSimple content.")));
    });
}

fn bench_compile_varying_sizes(c: &mut Criterion) {
    let mut group = c.benchmark_group("compile_by_size");

    for (headings, paragraphs) in [(5, 2), (20, 3), (100, 5)] {
        let markdown = generate_markdown(headings, paragraphs);
        group.throughput(Throughput::Bytes(markdown.len() as u64));
        group.bench_with_input(
            BenchmarkId::new("markdown", format!("{headings}h_{paragraphs}p")),
            &markdown,
            |b, md| b.iter(|| compile(md)),
        );
    }

    group.finish();
}

fn bench_parse_only(c: &mut Criterion) {
    let markdown = generate_markdown(100, 5);
    c.bench_function("parse_large_document", |b| {
        b.iter(|| parse(black_box(&markdown)));
    });
}

fn bench_compile_with_options(c: &mut Criterion) {
    let markdown = generate_markdown(20, 3);
    let compiler = Compiler::new(
        ParseOptions::default(),
        EmitOptions {
            prepend_toc: true,
            extract_title: true,
        },
    );
    c.bench_function("compile_with_toc_and_title", |b| {
        b.iter(|| compiler.compile(black_box(&markdown)));
    });
}

fn bench_pathological_delimiters(c: &mut Criterion) {
    let mut group = c.benchmark_group("pathological");

    let openers = "*a ".repeat(10_000);
    group.bench_function("unmatched_openers", |b| b.iter(|| compile(&openers)));

    let brackets = "[".repeat(10_000) + &"]".repeat(10_000);
    group.bench_function("unmatched_brackets", |b| b.iter(|| compile(&brackets)));

    let quotes = "> ".repeat(1_000) + "deep";
    group.bench_function("deep_block_quotes", |b| b.iter(|| compile(&quotes)));

    group.finish();
}

criterion_group!(
    benches,
    bench_compile_simple,
    bench_compile_varying_sizes,
    bench_parse_only,
    bench_compile_with_options,
    bench_pathological_delimiters,
);
criterion_main!(benches);
