use criterion::{criterion_group, criterion_main, Criterion};
use hcl2json::{convert_bytes, to_value, ConvertOptions};

const INPUT: &[u8] = include_bytes!("../tests/fixtures/simple-resources.hcl");

fn benchmark_convert(c: &mut Criterion) {
    let input = std::str::from_utf8(INPUT).unwrap();

    c.bench_function("to_value", |b| b.iter(|| to_value(input, "")));

    c.bench_function("convert_bytes", |b| {
        let opts = ConvertOptions::default();
        b.iter(|| convert_bytes(INPUT, "", &opts))
    });

    c.bench_function("convert_bytes_repeated_blocks", |b| {
        let input: String = (0..200)
            .map(|i| format!("provider \"aws\" {{\n  alias = \"p{}\"\n  region = var.region\n}}\n", i))
            .collect();
        let opts = ConvertOptions::default();

        b.iter(|| convert_bytes(input.as_bytes(), "", &opts))
    });
}

criterion_group!(benches, benchmark_convert);
criterion_main!(benches);
