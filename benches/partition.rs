use criterion::{black_box, criterion_group, criterion_main, Criterion};
use phenosplit::prelude::*;
use phenosplit::test_utilities::random_table;

const NROWS: usize = 5_000;
const NGROWOUTS: usize = 40;
const NTRAITS: usize = 12;

fn bench_partition(c: &mut Criterion) {
    let table = random_table(NROWS, NGROWOUTS, NTRAITS, 0.4);
    let parser = IdentifierParser::new(GrowoutStrictness::FirstLetter, CenturyWindow::new(2024));

    c.bench_function("partition", |b| {
        b.iter(|| {
            let partition = partition(black_box(&table), &parser).unwrap();
            black_box(partition.len())
        });
    });
}

criterion_group!(benches, bench_partition);
criterion_main!(benches);
