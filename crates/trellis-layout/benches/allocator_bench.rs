use criterion::{Criterion, black_box, criterion_group, criterion_main};
use trellis_layout::{SlotSpec, distribute};

fn bench_distribute(c: &mut Criterion) {
    let mixed: Vec<SlotSpec> = (0..64)
        .map(|i| SlotSpec::new((i % 7) as f32 * 4.0, (i % 3) as f32))
        .collect();
    c.bench_function("distribute_64_mixed", |b| {
        b.iter(|| distribute(black_box(2000.0), black_box(&mixed)))
    });

    let flat = vec![SlotSpec::new(0.0, 0.0); 64];
    c.bench_function("distribute_64_even_split", |b| {
        b.iter(|| distribute(black_box(2000.0), black_box(&flat)))
    });
}

criterion_group!(benches, bench_distribute);
criterion_main!(benches);
