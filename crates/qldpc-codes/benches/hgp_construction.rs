use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use qldpc_codes::{ClassicalCode, HGPCode};
use qldpc_core::{GaloisField, RngHandle};

fn bench_hgp(c: &mut Criterion) {
    let mut group = c.benchmark_group("hgp_construction");
    for (bits, checks) in [(10, 8), (20, 15), (40, 30)] {
        let field = GaloisField::binary();
        let mut rng = RngHandle::from_seed(bits as u64);
        let code_a = ClassicalCode::random(bits, checks, &field, &mut rng).unwrap();
        let code_b = ClassicalCode::random(bits, checks, &field, &mut rng).unwrap();
        group.bench_with_input(BenchmarkId::from_parameter(bits), &(code_a, code_b), |b, (code_a, code_b)| {
            b.iter(|| HGPCode::new(code_a.clone(), code_b.clone(), false).unwrap())
        });
    }
    group.finish();
}

criterion_group!(benches, bench_hgp);
criterion_main!(benches);
