//! Parser throughput benchmark.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use tablec_par::Parser;
use tablec_util::{Handler, SourceFile};

fn sample_source() -> String {
    let mut source = String::new();
    for i in 0..100 {
        source.push_str(&format!(
            "const limit_{i} = {i} * 2 + 1\n\
             func process_{i}(input: []int, scale: float = 1.0): float {{\n\
                 total: float = 0.0\n\
                 for value in input {{\n\
                     if value > limit_{i} {{\n\
                         total += value \\times scale\n\
                     }}\n\
                 }}\n\
                 return total\n\
             }}\n"
        ));
    }
    source
}

fn bench_parser(c: &mut Criterion) {
    let source = sample_source();
    c.bench_function("parse_full_file", |b| {
        b.iter(|| {
            let file = SourceFile::from_source("bench.tbl", black_box(source.as_str()));
            let handler = Handler::new();
            let mut parser = Parser::new(&file, &handler);
            let module = parser.execute();
            assert!(module.is_some(), "{:?}", handler.diagnostics());
            black_box(module)
        })
    });
}

criterion_group!(benches, bench_parser);
criterion_main!(benches);
