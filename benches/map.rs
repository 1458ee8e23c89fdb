use criterion::{black_box, criterion_group, criterion_main, Criterion};

use orthosweep::{rect_overlaps, OrderedMap, Rect};

// splitmix64, good enough for shuffled benchmark keys.
fn keys(n: u64) -> Vec<u64> {
    (0..n)
        .map(|i| {
            let mut z = i.wrapping_mul(0x9e3779b97f4a7c15);
            z = (z ^ (z >> 30)).wrapping_mul(0xbf58476d1ce4e5b9);
            z = (z ^ (z >> 27)).wrapping_mul(0x94d049bb133111eb);
            z ^ (z >> 31)
        })
        .collect()
}

fn insert_remove(c: &mut Criterion) {
    let keys = keys(10_000);

    c.bench_function("insert 10k", |b| {
        b.iter(|| {
            let mut map = OrderedMap::<u64, u64>::new();
            for &k in &keys {
                map.insert(k, k);
            }
            black_box(map)
        });
    });

    let mut full = OrderedMap::<u64, u64>::new();
    for &k in &keys {
        full.insert(k, k);
    }

    c.bench_function("drain 10k via remove_min", |b| {
        b.iter(|| {
            let mut map = full.clone();
            while map.remove_min().is_some() {}
        });
    });
}

fn queries(c: &mut Criterion) {
    let keys = keys(10_000);
    let mut map = OrderedMap::<u64, u64>::new();
    for &k in &keys {
        map.insert(k, k);
    }

    c.bench_function("get 10k", |b| {
        b.iter(|| {
            for &k in &keys {
                black_box(map.get(&k));
            }
        });
    });

    c.bench_function("range scan", |b| {
        b.iter(|| black_box(map.range(u64::MAX / 4, u64::MAX / 2).count()));
    });
}

fn rect_sweep(c: &mut Criterion) {
    // Overlapping grid: each cell overlaps its right and lower neighbors.
    // Min-y is jittered per cell; the active index keys by min-y and cells
    // in a row coexist along x.
    let mut rects = Vec::new();
    for i in 0..40 {
        for j in 0..40 {
            let x = i as f64 * 2.0;
            let y = j as f64 * 2.0 + (i * 40 + j) as f64 * 1e-4;
            rects.push(Rect::new(x, y, x + 3.0, y + 3.0).unwrap());
        }
    }

    c.bench_function("rect sweep 40x40 grid", |b| {
        b.iter(|| black_box(rect_overlaps(&rects).unwrap()));
    });
}

criterion_group!(benches, insert_remove, queries, rect_sweep);
criterion_main!(benches);
