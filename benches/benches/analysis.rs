use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use engine::Analyzer;
use ir::FileTokens;
use loader::Settings;
use std::time::Duration;

/// One long function reading request data `reads` times, with the nonce
/// check halfway through. Stresses the incremental guard search.
fn long_handler(reads: usize) -> String {
    let mut src = String::from("<?php\nfunction handler() {\n");
    for i in 0..reads {
        if i == reads / 2 {
            src.push_str("\tcheck_admin_referer( 'save' );\n");
        }
        src.push_str(&format!(
            "\t$v{i} = sanitize_text_field( wp_unslash( $_POST['f{i}'] ) );\n"
        ));
    }
    src.push_str("}\n");
    src
}

/// Many small functions, each with its own scope and guard.
fn many_functions(count: usize) -> String {
    let mut src = String::from("<?php\n");
    for i in 0..count {
        src.push_str(&format!(
            "function f{i}() {{\n\tglobal $post;\n\tif ( isset( $_GET['a'] ) ) {{ wp_verify_nonce( $_GET['n'] ); }}\n\t$post = $_REQUEST['p{i}'];\n}}\n"
        ));
    }
    src
}

fn parse(src: &str) -> FileTokens {
    parsers::parse_php(src, "bench.php").expect("parse bench source")
}

fn bench_tokenize(c: &mut Criterion) {
    let src = many_functions(200);
    c.bench_function("tokenize_php", |b| {
        b.iter(|| parsers::tokenize_php(black_box(&src)))
    });
}

fn bench_analyze(c: &mut Criterion) {
    let analyzer = Analyzer::from_settings(&Settings::default()).expect("default analyzer");
    let mut group = c.benchmark_group("analyze");
    for reads in [100, 1_000, 5_000] {
        let file = parse(&long_handler(reads));
        group.bench_with_input(BenchmarkId::new("long_handler", reads), &file, |b, f| {
            b.iter(|| analyzer.analyze(black_box(f)))
        });
    }
    let file = parse(&many_functions(500));
    group.bench_function("many_functions", |b| {
        b.iter(|| analyzer.analyze(black_box(&file)))
    });
    group.finish();
}

fn bench_parallel(c: &mut Criterion) {
    let analyzer = Analyzer::from_settings(&Settings::default()).expect("default analyzer");
    let files: Vec<FileTokens> = (0..64)
        .map(|i| parsers::parse_php(&many_functions(20), &format!("f{i}.php")).expect("parse"))
        .collect();
    c.bench_function("analyze_files_64", |b| {
        b.iter(|| analyzer.analyze_files(black_box(&files)))
    });
}

criterion_group! {
    name = benches;
    config = Criterion::default().measurement_time(Duration::from_secs(5));
    targets = bench_tokenize, bench_analyze, bench_parallel
}
criterion_main!(benches);
