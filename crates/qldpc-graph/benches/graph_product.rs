use criterion::{black_box, criterion_group, criterion_main, Criterion};
use qldpc_core::{FieldMatrix, GaloisField};
use qldpc_graph::{graph_product, ClassicalGraph};

fn ring_matrix(size: usize) -> FieldMatrix {
    let field = GaloisField::binary();
    let mut matrix = FieldMatrix::zeros(&field, size, size);
    for row in 0..size {
        matrix.set(row, row, 1);
        matrix.set(row, (row + 1) % size, 1);
    }
    matrix
}

fn graph_product_bench(c: &mut Criterion) {
    let graph = ClassicalGraph::from_matrix(&ring_matrix(24));
    c.bench_function("graph_product_ring24", |b| {
        b.iter(|| {
            let product = graph_product(&graph, &graph, false).unwrap();
            black_box(product);
        });
    });
}

criterion_group!(benches, graph_product_bench);
criterion_main!(benches);
