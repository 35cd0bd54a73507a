use criterion::{criterion_group, criterion_main, Criterion};
use qldpc_codes::{CSSCode, ClassicalCode, HGPCode};
use qldpc_core::GaloisField;

fn build_code() -> CSSCode {
    let field = GaloisField::new(3).unwrap();
    HGPCode::new(ClassicalCode::ring(6, &field), ClassicalCode::ring(5, &field), false)
        .unwrap()
        .into_css()
}

fn bench_logical_ops(c: &mut Criterion) {
    let code = build_code();
    c.bench_function("logical_ops", |b| {
        b.iter(|| {
            // rebuilt each iteration so the logical operators are never cached
            let fresh = CSSCode::from_matrices(code.matrix_x().clone(), code.matrix_z().clone()).unwrap();
            fresh.get_logical_ops().dimension()
        })
    });
}

criterion_group!(benches, bench_logical_ops);
criterion_main!(benches);
